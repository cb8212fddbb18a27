//! Compiles a descriptor once into a function that can be called any number of
//! times with different arguments.

use std::iter;

use crate::{environment::Environment, error::{CompileError, ErrorTracker, RuntimeError}, interpreter::{self, value::Value}, normalizer::normalize, parser::parse, scanner::scan, statement::Statement};

/// How a descriptor is compiled and what it can see when called.
#[derive(Debug, Clone, Default)]
pub struct Options {
	/// Names the positional call arguments are bound to.
	pub arg_names:     Vec<String>,
	/// Readonly globals, in definition order.
	pub scope:         Vec<(String, Value)>,
	/// Returned by every call when the descriptor does not compile.
	pub default_value: Value,
}

impl Options {
	pub fn new() -> Self { Self::default() }

	pub fn with_args<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
		self.arg_names.extend(names.into_iter().map(Into::into));
		self
	}

	pub fn with_global(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.scope.push((name.into(), value.into()));
		self
	}

	pub fn with_default(mut self, value: impl Into<Value>) -> Self {
		self.default_value = value.into();
		self
	}
}

/// The outcome of one call, the value together with what went wrong while
/// computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
	pub value:          Value,
	pub runtime_errors: Vec<RuntimeError>,
}

impl Evaluation {
	pub fn has_errors(&self) -> bool { !self.runtime_errors.is_empty() }
}

/// A compiled descriptor.
///
/// Arrays and objects are shared through `Rc`, so a `SemanticFn` stays on the
/// thread that built it.
#[derive(Debug)]
pub struct SemanticFn {
	statements:     Vec<Statement>,
	globals:        Environment<'static>,
	arg_names:      Vec<String>,
	default_value:  Value,
	compile_errors: Vec<CompileError>,
}

impl SemanticFn {
	/// Normalize, scan and parse `descriptor`. Compile errors don't fail the
	/// build, they turn the function into one that returns the default value.
	#[tracing::instrument(level = "debug", skip(options))]
	pub fn build(descriptor: &str, options: Options) -> Self {
		let mut errors = ErrorTracker::new();
		let tokens = scan(&normalize(descriptor), &mut errors);
		tracing::trace!(tokens = tokens.len(), "scanned descriptor");
		let statements = parse(tokens, &mut errors);

		let Options { arg_names, scope, default_value } = options;
		let compile_errors = errors.into_compile_errors();
		let statements = if compile_errors.is_empty() {
			statements
		} else {
			tracing::debug!(count = compile_errors.len(), "descriptor falls back to its default value");
			Vec::new()
		};

		Self { statements, globals: Environment::new(true).with_bindings(scope), arg_names, default_value, compile_errors }
	}

	/// Call with positional arguments. Missing arguments are `undefined`,
	/// extra ones are ignored.
	pub fn call(&self, args: impl IntoIterator<Item = Value>) -> Value { self.call_with_report(args).value }

	pub fn call_with_report(&self, args: impl IntoIterator<Item = Value>) -> Evaluation {
		if !self.is_compiled() {
			return Evaluation { value: self.default_value.clone(), runtime_errors: Vec::new() };
		}

		let args = args.into_iter().chain(iter::repeat_with(Value::default));
		let arguments = Environment::with_enclosing(&self.globals, true)
			.with_bindings(self.arg_names.iter().map(String::as_str).zip(args));

		let mut errors = ErrorTracker::new();
		let value = interpreter::evaluate(&self.statements, &arguments, &mut errors);
		Evaluation { value, runtime_errors: errors.into_runtime_errors() }
	}

	/// The diagnostics of the build, empty when the descriptor compiled.
	pub fn compile_errors(&self) -> &[CompileError] { &self.compile_errors }

	pub fn is_compiled(&self) -> bool { self.compile_errors.is_empty() }
}

/// Shorthand for [`SemanticFn::build`].
pub fn build_semantic_fn(descriptor: &str, options: Options) -> SemanticFn { SemanticFn::build(descriptor, options) }
