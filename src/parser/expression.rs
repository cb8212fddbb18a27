//! Expression AST nodes
//!
//! An `Expression` is a tree structure representing code like `-123 *
//! (45.67)` as nested nodes. Operators keep their token for diagnostics and
//! printing, next to a closed operator enum the interpreter dispatches on.

use Expression::*;

use crate::{error::parser::ParseErrorType, scanner::{Conversion, Token, TokenType}};

/// Expression AST nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
	Array(Vec<Expression>),
	Object(Vec<(Token, Expression)>),
	Assign { target: Token, value: Box<Expression> },
	Binary { left: Box<Expression>, operator: BinaryOperator, token: Token, right: Box<Expression> },
	Get { object: Box<Expression>, accessor: Accessor },
	Grouping(Box<Expression>),
	Literal(LiteralValue),
	Set { object: Box<Expression>, accessor: Accessor, value: Box<Expression> },
	Unary { operator: UnaryOperator, token: Token, right: Box<Expression> },
	Variable(Token),
}

impl Expression {
	pub fn unary(operator: UnaryOperator, token: Token, right: Self) -> Self {
		Unary { operator, token, right: Box::new(right) }
	}

	pub fn binary(left: Self, operator: BinaryOperator, token: Token, right: Self) -> Self {
		Binary { left: Box::new(left), operator, token, right: Box::new(right) }
	}

	pub fn grouping(expr: Self) -> Self { Grouping(Box::new(expr)) }

	pub fn assign(target: Token, value: Self) -> Self { Assign { target, value: Box::new(value) } }

	pub fn get(object: Self, accessor: Accessor) -> Self { Get { object: Box::new(object), accessor } }

	pub fn set(object: Box<Self>, accessor: Accessor, value: Self) -> Self {
		Set { object, accessor, value: Box::new(value) }
	}
}

/// The last step of a property access: `.name` or `[index]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Accessor {
	Name(Token),
	Index {
		/// The opening `[`, kept for diagnostics.
		bracket: Token,
		index:   Box<Expression>,
	},
}

impl Accessor {
	/// The token runtime errors about this access point at.
	pub fn token(&self) -> &Token {
		match self {
			Accessor::Name(name) => name,
			Accessor::Index { bracket, .. } => bracket,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
	Add,
	Subtract,
	Multiply,
	Divide,
	Greater,
	GreaterEqual,
	Less,
	LessEqual,
	LooseEqual,
	LooseNotEqual,
	StrictEqual,
	StrictNotEqual,
	And,
	Or,
}

impl BinaryOperator {
	pub fn from_token_type(r#type: &TokenType) -> Option<Self> {
		use BinaryOperator::*;

		Some(match r#type {
			TokenType::Plus => Add,
			TokenType::Minus => Subtract,
			TokenType::Star => Multiply,
			TokenType::Slash => Divide,
			TokenType::Greater => Greater,
			TokenType::GreaterEqual => GreaterEqual,
			TokenType::Less => Less,
			TokenType::LessEqual => LessEqual,
			TokenType::EqualEqual => LooseEqual,
			TokenType::BangEqual => LooseNotEqual,
			TokenType::EqualEqualEqual => StrictEqual,
			TokenType::BangEqualEqual => StrictNotEqual,
			TokenType::And => And,
			TokenType::Or => Or,
			_ => return None,
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
	Negate,
	Not,
	Convert(Conversion),
}

impl UnaryOperator {
	pub fn from_token_type(r#type: &TokenType) -> Option<Self> {
		Some(match r#type {
			TokenType::Minus => UnaryOperator::Negate,
			TokenType::Bang => UnaryOperator::Not,
			TokenType::Modifier(conversion) => UnaryOperator::Convert(*conversion),
			_ => return None,
		})
	}
}

/// Literal values in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
	Number(f64),
	StringLiteral(String),
	Boolean(bool),
	Null,
	Undefined,
}

impl TryFrom<Token> for Expression {
	type Error = ParseErrorType;

	/// Literal and identifier tokens map directly onto a leaf expression.
	fn try_from(token: Token) -> Result<Self, Self::Error> {
		use crate::scanner::TokenType::*;

		Ok(match token.r#type {
			NumberLiteral(n) => Literal(LiteralValue::Number(n)),
			StringLiteral(s) => Literal(LiteralValue::StringLiteral(s)),
			True => Literal(LiteralValue::Boolean(true)),
			False => Literal(LiteralValue::Boolean(false)),
			Null => Literal(LiteralValue::Null),
			Undefined => Literal(LiteralValue::Undefined),
			Identifier => Expression::Variable(token),
			_ => return Err(ParseErrorType::ExpectedExpression),
		})
	}
}

impl std::fmt::Display for Expression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Array(values) => {
				write!(f, "(array")?;
				for value in values {
					write!(f, " {value}")?;
				}
				write!(f, ")")
			}
			Object(properties) => {
				write!(f, "(object")?;
				for (name, value) in properties {
					write!(f, " {}:{value}", name.lexeme)?;
				}
				write!(f, ")")
			}
			Assign { target, value } => write!(f, "(= {} {value})", target.lexeme),
			Binary { left, token, right, .. } => write!(f, "({} {left} {right})", token.lexeme),
			Get { object, accessor } => write!(f, "(get {object}{accessor})"),
			Grouping(expression) => write!(f, "(group {expression})"),
			Literal(lit) => write!(f, "{lit}"),
			Set { object, accessor, value } => write!(f, "(set {object}{accessor} {value})"),
			Unary { token, right, .. } => write!(f, "({} {right})", token.lexeme),
			Variable(token) => write!(f, "{}", token.lexeme),
		}
	}
}

impl std::fmt::Display for Accessor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Accessor::Name(name) => write!(f, ".{}", name.lexeme),
			Accessor::Index { index, .. } => write!(f, "[{index}]"),
		}
	}
}

impl std::fmt::Display for LiteralValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LiteralValue::Number(n) => write!(f, "{n}"),
			LiteralValue::StringLiteral(s) => write!(f, "\"{s}\""),
			LiteralValue::Boolean(b) => write!(f, "{b}"),
			LiteralValue::Null => write!(f, "null"),
			LiteralValue::Undefined => write!(f, "undefined"),
		}
	}
}
