pub mod interpreter;
pub mod parser;
pub mod scanner;

use interpreter::RuntimeErrorType;
use parser::ParseErrorType;
use scanner::ScanErrorType;

use crate::scanner::Token;

/// SemanticError is the top-level error type of the command line front end.
#[derive(thiserror::Error, Debug)]
pub enum SemanticError {
	/// Internal or I/O error, never produced by descriptor content
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// The descriptor did not compile
	#[error("Generated {0} compile errors")]
	CompileErrors(usize),
}

/// A lexical or syntactic diagnostic.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("line {line}: {kind}")]
pub struct CompileError {
	/// 1-based source line.
	pub line: usize,
	pub kind: CompileErrorType,
	/// The offending source text.
	pub text: String,
}

impl CompileError {
	pub fn new(line: usize, kind: impl Into<CompileErrorType>, text: impl Into<String>) -> Self {
		Self { line, kind: kind.into(), text: text.into() }
	}
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CompileErrorType {
	#[error(transparent)]
	Scan(#[from] ScanErrorType),
	#[error(transparent)]
	Parse(#[from] ParseErrorType),
}

/// A diagnostic raised while a compiled descriptor runs.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("line {}: {kind}", .token.line)]
pub struct RuntimeError {
	/// The token the failing operation is attached to.
	pub token: Token,
	pub kind:  RuntimeErrorType,
}

impl RuntimeError {
	pub fn new(token: &Token, kind: RuntimeErrorType) -> Self { Self { token: token.clone(), kind } }
}

/// Accumulates diagnostics instead of raising them.
#[derive(Debug, Default, Clone)]
pub struct ErrorTracker {
	compile_errors: Vec<CompileError>,
	runtime_errors: Vec<RuntimeError>,
}

impl ErrorTracker {
	pub fn new() -> Self { Self::default() }

	pub fn capture_compile_error(&mut self, error: CompileError) {
		tracing::debug!(line = error.line, text = %error.text, "compile error: {}", error.kind);
		self.compile_errors.push(error);
	}

	pub fn capture_runtime_error(&mut self, error: RuntimeError) {
		tracing::debug!(line = error.token.line, lexeme = %error.token.lexeme, "runtime error: {}", error.kind);
		self.runtime_errors.push(error);
	}

	pub fn compile_errors(&self) -> &[CompileError] { &self.compile_errors }

	pub fn runtime_errors(&self) -> &[RuntimeError] { &self.runtime_errors }

	pub fn has_compile_errors(&self) -> bool { !self.compile_errors.is_empty() }

	pub fn into_compile_errors(self) -> Vec<CompileError> { self.compile_errors }

	pub fn into_runtime_errors(self) -> Vec<RuntimeError> { self.runtime_errors }
}
