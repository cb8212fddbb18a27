use crate::interpreter::value::Value;

/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub r#type: TokenType,
	pub lexeme: String,
	pub line:   usize,
}

impl Token {
	pub fn new(r#type: TokenType, lexeme: impl Into<String>, line: usize) -> Self {
		Self { r#type, lexeme: lexeme.into(), line }
	}

	/// The decoded value carried by literal tokens.
	pub fn literal(&self) -> Option<Value> {
		use TokenType::*;

		Some(match &self.r#type {
			NumberLiteral(n) => Value::Number(*n),
			StringLiteral(s) => Value::String(s.clone()),
			True => Value::Bool(true),
			False => Value::Bool(false),
			Null => Value::Null,
			Undefined => Value::Undefined,
			Modifier(conversion) => Value::String(conversion.name().to_string()),
			_ => return None,
		})
	}
}

/// The value-conversion operators usable in prefix position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
	/// `toString`
	ToString,
	/// `toBool`
	ToBool,
}

impl Conversion {
	pub fn name(self) -> &'static str {
		match self {
			Conversion::ToString => "toString",
			Conversion::ToBool => "toBool",
		}
	}
}

/// The different types of tokens in a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
	/// Statement separator: `\n` or `;`.
	NewLine,
	/// Colon `:`.
	Colon,
	/// Comma `,`.
	Comma,
	/// Dot `.`.
	Dot,
	/// Left brace `{`.
	LeftBrace,
	/// Right brace `}`.
	RightBrace,
	/// Left bracket `[`.
	LeftBracket,
	/// Right bracket `]`.
	RightBracket,
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Minus `-`.
	Minus,
	/// Percent `%`, only meaningful as the start of `%{`.
	Percent,
	/// Plus `+`.
	Plus,
	/// Slash `/`.
	Slash,
	/// Asterisk `*`.
	Star,
	/// Bang `!`.
	Bang,
	/// Bang equal `!=`.
	BangEqual,
	/// Bang equal equal `!==`.
	BangEqualEqual,
	/// Equal `=`.
	Equal,
	/// Equal equal `==`.
	EqualEqual,
	/// Equal equal equal `===`.
	EqualEqualEqual,
	/// Greater than `>`.
	Greater,
	/// Greater than or equal `>=`.
	GreaterEqual,
	/// Less than `<`.
	Less,
	/// Less than or equal `<=`.
	LessEqual,
	/// Identifier, the name lives in the lexeme.
	Identifier,
	/// String literal, e.g. `"hello"` or `'hello'`.
	StringLiteral(String),
	/// Number literal, e.g. `123.45`.
	NumberLiteral(f64),
	/// `toString` or `toBool`.
	Modifier(Conversion),
	/// Logical AND keyword.
	And,
	/// Logical OR keyword.
	Or,
	/// Boolean literal `true`.
	True,
	/// Boolean literal `false`.
	False,
	/// `null` literal.
	Null,
	/// `undefined` literal.
	Undefined,
	/// Variable declaration keyword.
	Let,
	/// If statement keyword.
	If,
	/// Else keyword.
	Else,
	/// `do` keyword of the single-line if.
	Do,
	/// End of text.
	Eot,
}

impl TokenType {
	pub fn keyword_or_identifier(value: &str) -> Self {
		match value {
			"and" => TokenType::And,
			"or" => TokenType::Or,
			"true" => TokenType::True,
			"false" => TokenType::False,
			"null" => TokenType::Null,
			"undefined" => TokenType::Undefined,
			"let" => TokenType::Let,
			"if" => TokenType::If,
			"else" => TokenType::Else,
			"do" => TokenType::Do,
			"toString" => TokenType::Modifier(Conversion::ToString),
			"toBool" => TokenType::Modifier(Conversion::ToBool),
			_ => TokenType::Identifier,
		}
	}
}
