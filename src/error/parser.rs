/// Failure signal returned by grammar rules. The matching [`CompileError`]
/// has already been recorded when this is produced, so callers only use it to
/// unwind to the next synchronization point.
///
/// [`CompileError`]: super::CompileError
#[derive(thiserror::Error, Debug)]
#[error("line {line}: {type}")]
pub struct ParseError {
	line:   usize,
	r#type: ParseErrorType,
}

impl ParseError {
	pub fn new(line: usize, r#type: ParseErrorType) -> Self { Self { line, r#type } }

	pub fn line(&self) -> usize { self.line }

	pub fn r#type(&self) -> &ParseErrorType { &self.r#type }
}

/// Types of syntax errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseErrorType {
	#[error("Expect expression.")]
	ExpectedExpression,
	#[error("Invalid assignment target.")]
	InvalidAssignmentTarget,
	#[error("Expected a ')' after the expression.")]
	UnterminatedParenthesis,
	#[error("Expect a property name after `.`.")]
	ExpectedPropertyName,
	#[error("Expect `]` after index.")]
	UnterminatedIndex,
	#[error("Expect `]` after array elements.")]
	UnterminatedArray,
	#[error("Expect `{{` to start object.")]
	ExpectedObjectBrace,
	#[error("Expected a property name.")]
	ExpectedObjectKey,
	#[error("Expected a `:` after a property name.")]
	ExpectedObjectColon,
	#[error("Expect `,` between object properties.")]
	ExpectedObjectComma,
	#[error("Expect `}}` after object.")]
	UnterminatedObject,
	#[error("Expect `}}` after block.")]
	UnterminatedBlock,
	#[error("Expect a variable name.")]
	ExpectedVariableName,
	#[error("Expect a `\\n` after {0}.")]
	ExpectedNewLine(&'static str),
	#[error("Expect `)` after if condition.")]
	UnterminatedCondition,
	#[error("Expect `,` after if condition.")]
	ExpectedConditionComma,
	#[error("Expect `do` after if expression condition.")]
	ExpectedDo,
	#[error("Expect `:` after do.")]
	ExpectedDoColon,
	#[error("Expect `else` after `,` in if expression.")]
	ExpectedElse,
	#[error("Expect `:` after else.")]
	ExpectedElseColon,
	#[error("Descriptor nested too deeply.")]
	TooDeeplyNested,
}
