//! There is no place in the grammar where both an expression and a statement
//! are allowed. The operands of, say, `+` are always expressions, never
//! statements. Every statement still produces a value though: a program
//! evaluates to the value of the last statement it executed.

use crate::{parser::expression::Expression, scanner::Token};

/// A statement in the descriptor language.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	/// A block of statements with its own scope.
	Block(Vec<Statement>),
	/// An expression used as a statement.
	Expression(Expression),
	/// `if (condition) statement else statement`
	If {
		condition:   Expression,
		then_branch: Box<Statement>,
		else_branch: Option<Box<Statement>>,
	},
	/// `if condition, do: expression, else: expression`
	IfExpression {
		condition:   Expression,
		then_branch: Expression,
		else_branch: Option<Expression>,
	},
	/// A variable declaration statement.
	LetDeclaration {
		/// The token of the variable being declared.
		name_token:  Token,
		/// An optional initializer expression.
		initializer: Option<Expression>,
	},
}

impl std::fmt::Display for Statement {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Statement::Block(statements) => {
				write!(f, "(block")?;
				for statement in statements {
					write!(f, " {statement}")?;
				}
				write!(f, ")")
			}
			Statement::Expression(expression) => write!(f, "{expression}"),
			Statement::If { condition, then_branch, else_branch } => match else_branch {
				Some(else_branch) => write!(f, "(if {condition} {then_branch} {else_branch})"),
				None => write!(f, "(if {condition} {then_branch})"),
			},
			Statement::IfExpression { condition, then_branch, else_branch } => match else_branch {
				Some(else_branch) => write!(f, "(if-do {condition} {then_branch} {else_branch})"),
				None => write!(f, "(if-do {condition} {then_branch})"),
			},
			Statement::LetDeclaration { name_token, initializer } => match initializer {
				Some(initializer) => write!(f, "(let {} {initializer})", name_token.lexeme),
				None => write!(f, "(let {})", name_token.lexeme),
			},
		}
	}
}
