//! The `Scanner` use `Lexical grammar`, implement `alphabet` as `Characters`,
//! `string` as `Lexme` or `Token`
//! The `Parser` use `Syntactic grammar`, implement `alphabet` as `Tokens`,
//! `string` as `Expression`
//!
//! |Name|Operators|Associates
//! --|--|--
//! Assignment|=|Right
//! Or|or|Left
//! And|and|Left
//! Equality|== != === !==|Left
//! Comparison|< > <= >=|Left
//! Term|+ -|Left
//! Factor|* /|Left
//! Unary|! - toString toBool|Right
//! Postfix|.name [index]|Left
//!
//! Expression grammar:
//!
//! ``` BNF
//! expression     → assignment ;
//! assignment     → ( postfix "=" assignment ) | or ;
//! or             → and ( "or" and )* ;
//! and            → equality ( "and" equality )* ;
//! equality       → comparison ( ( "!=" | "!==" | "==" | "===" ) comparison )* ;
//! comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
//! term           → factor ( ( "-" | "+" ) factor )* ;
//! factor         → unary ( ( "/" | "*" ) unary )* ;
//! unary          → ( "!" | "-" | MODIFIER ) unary | postfix ;
//! postfix        → primary ( "." IDENTIFIER | "[" expression "]" )* ;
//! primary        → "true" | "false" | "null" | "undefined" | NUMBER | STRING
//!                | IDENTIFIER | "(" expression ")" | array | object ;
//! array          → "[" ( expression ( "," expression )* )? "]" ;
//! object         → "%{" ( IDENTIFIER ":" expression ( "," IDENTIFIER ":" expression )* )? "}" ;
//! ```
//!
//! Statement grammar:
//!
//! ``` BNF
//! program        → declaration* EOT ;
//! declaration    → "let" IDENTIFIER ( "=" expression )? NEWLINE | statement ;
//! statement      → block | ifStatement | ifExpression | exprStatement ;
//! block          → "{" declaration* "}" ;
//! ifStatement    → "if" "(" expression ")" statement ( "else" statement )? ;
//! ifExpression   → "if" expression "," "do" ":" expression ( "," "else" ":" expression )? NEWLINE ;
//! exprStatement  → expression NEWLINE ;
//! ```
//!
//! A statement terminator may be left out before `}`, before `else` and at the
//! end of the input.

pub mod expression;

use TokenType::*;
use expression::{Accessor, BinaryOperator, Expression, UnaryOperator};

use crate::{error::{CompileError, ErrorTracker, parser::{ParseError, ParseErrorType}}, scanner::{Token, TokenType}, statement::Statement};

type ParseResult<T> = Result<T, ParseError>;

/// How many statements and expressions may be open inside each other.
const MAX_NESTING: usize = 64;

/// Parse `tokens` into statements, reporting syntax errors to `errors`.
/// Malformed statements are reported and dropped.
pub fn parse(tokens: Vec<Token>, errors: &mut ErrorTracker) -> Vec<Statement> { Parser::new(tokens, errors).parse() }

/// Recursive descent parser with one token of lookahead.
pub struct Parser<'e> {
	/// The tokens to parse, always terminated by `Eot`.
	tokens:  Vec<Token>,
	/// Index of the next token to consume.
	current: usize,
	/// How many blocks enclose the current token.
	depth:   usize,
	/// How many statement and expression rules are open.
	nesting: usize,
	errors:  &'e mut ErrorTracker,
}

impl<'e> Parser<'e> {
	pub fn new(mut tokens: Vec<Token>, errors: &'e mut ErrorTracker) -> Self {
		if !tokens.last().is_some_and(|token| token.r#type == Eot) {
			let line = tokens.last().map_or(1, |token| token.line);
			tokens.push(Token::new(Eot, "", line));
		}
		Self { tokens, current: 0, depth: 0, nesting: 0, errors }
	}

	pub fn parse(mut self) -> Vec<Statement> {
		let mut statements = Vec::new();
		loop {
			self.skip_separators();
			if self.is_at_end() {
				break;
			}
			if let Some(statement) = self.declaration() {
				statements.push(statement);
			}
		}
		tracing::trace!(count = statements.len(), "parsed statements");
		statements
	}

	/// Parse one declaration, recovering from a syntax error by skipping to
	/// the next statement boundary.
	fn declaration(&mut self) -> Option<Statement> {
		let statement = if self.match_type(&Let) { self.let_declaration() } else { self.statement() };
		match statement {
			Ok(statement) => Some(statement),
			Err(error) => {
				tracing::trace!(%error, "synchronizing after parse error");
				self.synchronize();
				None
			}
		}
	}

	fn let_declaration(&mut self) -> ParseResult<Statement> {
		let name_token = self.consume(Identifier, ParseErrorType::ExpectedVariableName)?;
		let initializer = if self.match_type(&Equal) { Some(self.expression()?) } else { None };
		self.end_statement("a variable declaration")?;
		Ok(Statement::LetDeclaration { name_token, initializer })
	}

	fn statement(&mut self) -> ParseResult<Statement> {
		self.nested(|parser| {
			if parser.match_type(&LeftBrace) {
				return parser.block();
			}
			if parser.match_type(&If) {
				return if parser.check(&LeftParen) { parser.if_statement() } else { parser.if_expression_statement() };
			}
			parser.expression_statement()
		})
	}

	fn block(&mut self) -> ParseResult<Statement> {
		self.depth += 1;
		let mut statements = Vec::new();
		loop {
			self.skip_separators();
			if self.check(&RightBrace) || self.is_at_end() {
				break;
			}
			if let Some(statement) = self.declaration() {
				statements.push(statement);
			}
		}
		self.depth -= 1;
		self.consume(RightBrace, ParseErrorType::UnterminatedBlock)?;
		Ok(Statement::Block(statements))
	}

	/// `if (condition) statement else statement`
	fn if_statement(&mut self) -> ParseResult<Statement> {
		self.consume(LeftParen, ParseErrorType::ExpectedExpression)?;
		let condition = self.expression()?;
		self.consume(RightParen, ParseErrorType::UnterminatedCondition)?;

		self.skip_separators();
		let then_branch = Box::new(self.statement()?);
		let else_branch = if self.match_else() {
			self.skip_separators();
			Some(Box::new(self.statement()?))
		} else {
			None
		};
		Ok(Statement::If { condition, then_branch, else_branch })
	}

	/// `if condition, do: expression, else: expression`
	fn if_expression_statement(&mut self) -> ParseResult<Statement> {
		let condition = self.expression()?;
		self.consume(Comma, ParseErrorType::ExpectedConditionComma)?;
		self.consume(Do, ParseErrorType::ExpectedDo)?;
		self.consume(Colon, ParseErrorType::ExpectedDoColon)?;
		let then_branch = self.expression()?;

		let else_branch = if self.match_type(&Comma) {
			self.consume(Else, ParseErrorType::ExpectedElse)?;
			self.consume(Colon, ParseErrorType::ExpectedElseColon)?;
			Some(self.expression()?)
		} else {
			None
		};
		self.end_statement("an if expression statement")?;
		Ok(Statement::IfExpression { condition, then_branch, else_branch })
	}

	fn expression_statement(&mut self) -> ParseResult<Statement> {
		let expression = self.expression()?;
		self.end_statement("an expression")?;
		Ok(Statement::Expression(expression))
	}

	/// Statements end at a separator. The separator may be left out before a
	/// closing `}`, an `else`, or the end of the input.
	fn end_statement(&mut self, after: &'static str) -> ParseResult<()> {
		if self.match_type(&NewLine) || self.check(&RightBrace) || self.check(&Else) || self.is_at_end() {
			return Ok(());
		}
		Err(self.error_at_peek(ParseErrorType::ExpectedNewLine(after)))
	}

	fn expression(&mut self) -> ParseResult<Expression> { self.nested(Self::assignment) }

	/// Assignment is right associative and its target is only known once the
	/// left side has been parsed as an ordinary expression.
	fn assignment(&mut self) -> ParseResult<Expression> {
		let expression = self.or()?;

		if self.check(&Equal) {
			let equals = self.advance();
			let value = self.nested(Self::assignment)?;
			return match expression {
				Expression::Variable(target) => Ok(Expression::assign(target, value)),
				Expression::Get { object, accessor } => Ok(Expression::set(object, accessor, value)),
				_ => Err(self.error(&equals, ParseErrorType::InvalidAssignmentTarget)),
			};
		}
		Ok(expression)
	}

	fn or(&mut self) -> ParseResult<Expression> { self.left_associative(&[BinaryOperator::Or], Self::and) }

	fn and(&mut self) -> ParseResult<Expression> { self.left_associative(&[BinaryOperator::And], Self::equality) }

	/// Parse equality expressions.
	fn equality(&mut self) -> ParseResult<Expression> {
		const OPERATORS: [BinaryOperator; 4] = [
			BinaryOperator::LooseNotEqual,
			BinaryOperator::StrictNotEqual,
			BinaryOperator::LooseEqual,
			BinaryOperator::StrictEqual,
		];
		self.left_associative(&OPERATORS, Self::comparison)
	}

	/// Parse comparison expressions.
	fn comparison(&mut self) -> ParseResult<Expression> {
		const OPERATORS: [BinaryOperator; 4] =
			[BinaryOperator::Greater, BinaryOperator::GreaterEqual, BinaryOperator::Less, BinaryOperator::LessEqual];
		self.left_associative(&OPERATORS, Self::term)
	}

	/// Parse term expressions.
	fn term(&mut self) -> ParseResult<Expression> {
		self.left_associative(&[BinaryOperator::Subtract, BinaryOperator::Add], Self::factor)
	}

	/// Parse factor expressions.
	fn factor(&mut self) -> ParseResult<Expression> {
		self.left_associative(&[BinaryOperator::Divide, BinaryOperator::Multiply], Self::unary)
	}

	/// One binary precedence level: `operand ( operator operand )*`.
	fn left_associative(
		&mut self,
		accepted: &[BinaryOperator],
		operand: fn(&mut Self) -> ParseResult<Expression>,
	) -> ParseResult<Expression> {
		let mut expression = operand(self)?;
		while let Some(operator) =
			BinaryOperator::from_token_type(&self.peek().r#type).filter(|operator| accepted.contains(operator))
		{
			let token = self.advance();
			expression = Expression::binary(expression, operator, token, operand(self)?);
		}
		Ok(expression)
	}

	/// Parse unary expressions.
	fn unary(&mut self) -> ParseResult<Expression> {
		if let Some(operator) = UnaryOperator::from_token_type(&self.peek().r#type) {
			let token = self.advance();
			return Ok(Expression::unary(operator, token, self.nested(Self::unary)?));
		}
		self.postfix()
	}

	/// Parse property accesses, `.name` and `[index]` chained after a primary.
	fn postfix(&mut self) -> ParseResult<Expression> {
		let mut expression = self.primary()?;
		loop {
			if self.match_type(&Dot) {
				let name = self.consume(Identifier, ParseErrorType::ExpectedPropertyName)?;
				expression = Expression::get(expression, Accessor::Name(name));
			} else if self.check(&LeftBracket) {
				let bracket = self.advance();
				let index = Box::new(self.expression()?);
				self.consume(RightBracket, ParseErrorType::UnterminatedIndex)?;
				expression = Expression::get(expression, Accessor::Index { bracket, index });
			} else {
				return Ok(expression);
			}
		}
	}

	/// Parse primary expressions.
	fn primary(&mut self) -> ParseResult<Expression> {
		if self.match_type(&LeftParen) {
			let expression = self.expression()?;
			self.consume(RightParen, ParseErrorType::UnterminatedParenthesis)?;
			return Ok(Expression::grouping(expression));
		}
		if self.match_type(&LeftBracket) {
			return self.array();
		}
		if self.match_type(&Percent) {
			return self.object();
		}

		let expression = Expression::try_from(self.peek().clone()).map_err(|kind| self.error_at_peek(kind))?;
		self.advance();
		Ok(expression)
	}

	/// The elements of `[a, b]`, the opening bracket already consumed.
	fn array(&mut self) -> ParseResult<Expression> {
		let mut values = Vec::new();
		self.skip_separators();
		while !self.check(&RightBracket) && !self.is_at_end() {
			values.push(self.expression()?);
			self.skip_separators();
			if !self.match_type(&Comma) {
				break;
			}
			self.skip_separators();
		}
		self.consume(RightBracket, ParseErrorType::UnterminatedArray)?;
		Ok(Expression::Array(values))
	}

	/// The properties of `%{ name: value }`, the `%` already consumed.
	fn object(&mut self) -> ParseResult<Expression> {
		self.consume(LeftBrace, ParseErrorType::ExpectedObjectBrace)?;
		let mut properties = Vec::new();

		self.skip_separators();
		while !self.check(&RightBrace) && !self.is_at_end() {
			let name = self.consume(Identifier, ParseErrorType::ExpectedObjectKey)?;
			self.consume(Colon, ParseErrorType::ExpectedObjectColon)?;
			let value = self.expression()?;
			properties.push((name, value));

			self.skip_separators();
			if !self.check(&RightBrace) {
				self.consume(Comma, ParseErrorType::ExpectedObjectComma)?;
				self.skip_separators();
			}
		}

		self.consume(RightBrace, ParseErrorType::UnterminatedObject)?;
		Ok(Expression::Object(properties))
	}

	/// Peek at the current token.
	fn peek(&self) -> &Token { &self.tokens[self.current] }

	fn is_at_end(&self) -> bool { self.peek().r#type == Eot }

	fn check(&self, r#type: &TokenType) -> bool { self.peek().r#type == *r#type }

	/// Advance to the next token, staying on `Eot` once reached.
	fn advance(&mut self) -> Token {
		let token = self.peek().clone();
		if !self.is_at_end() {
			self.current += 1;
		}
		token
	}

	fn match_type(&mut self, r#type: &TokenType) -> bool {
		if self.check(r#type) && !self.is_at_end() {
			self.current += 1;
			true
		} else {
			false
		}
	}

	fn consume(&mut self, r#type: TokenType, error: ParseErrorType) -> ParseResult<Token> {
		if self.check(&r#type) {
			return Ok(self.advance());
		}
		Err(self.error_at_peek(error))
	}

	/// An `else` may sit on a later line than the end of the then-branch.
	fn match_else(&mut self) -> bool {
		let mut lookahead = self.current;
		while self.tokens[lookahead].r#type == NewLine {
			lookahead += 1;
		}
		if self.tokens[lookahead].r#type == Else {
			self.current = lookahead + 1;
			return true;
		}
		false
	}

	fn skip_separators(&mut self) {
		while self.check(&NewLine) {
			self.current += 1;
		}
	}

	fn report(&mut self, token: &Token, r#type: &ParseErrorType) {
		self.errors.capture_compile_error(CompileError::new(token.line, r#type.clone(), token.lexeme.clone()));
	}

	fn error(&mut self, token: &Token, r#type: ParseErrorType) -> ParseError {
		self.report(token, &r#type);
		ParseError::new(token.line, r#type)
	}

	fn error_at_peek(&mut self, r#type: ParseErrorType) -> ParseError {
		let token = self.peek().clone();
		self.error(&token, r#type)
	}

	/// Run `rule` one level deeper, failing once [`MAX_NESTING`] levels are
	/// open.
	fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
		if self.nesting >= MAX_NESTING {
			return Err(self.error_at_peek(ParseErrorType::TooDeeplyNested));
		}
		self.nesting += 1;
		let result = rule(self);
		self.nesting -= 1;
		result
	}

	/// Discard the rest of a malformed statement: skip the offending token,
	/// then up to and including the next separator. A `}` is left in place
	/// so the enclosing block can still close.
	fn synchronize(&mut self) {
		let closes_block = self.depth > 0 && self.check(&RightBrace);
		if !closes_block {
			let mut skipped = self.advance();
			while !matches!(skipped.r#type, NewLine | Eot) && !self.check(&RightBrace) {
				skipped = self.advance();
			}
		}
		self.skip_separators();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scanner::scan;

	fn parse_with_errors(input: &str) -> (String, Vec<CompileError>) {
		let mut errors = ErrorTracker::new();
		let tokens = scan(input, &mut errors);
		let statements = super::parse(tokens, &mut errors);
		let printed = statements.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
		(printed, errors.into_compile_errors())
	}

	fn parse(input: &str, equals: &str) {
		let (printed, errors) = parse_with_errors(input);
		assert!(errors.is_empty(), "{input:?} produced {errors:?}");
		assert_eq!(printed, equals);
	}

	fn parse_error(input: &str, line: usize, message: &str) {
		let (_, errors) = parse_with_errors(input);
		assert!(!errors.is_empty(), "{input:?} should not parse");
		assert_eq!(errors[0].line, line);
		assert_eq!(errors[0].kind.to_string(), message);
	}

	#[test]
	fn parse_expressions() {
		parse("3 + 4 * (-2 - 1)", "(+ 3 (* 4 (group (- (- 2) 1))))");
		parse("1 + 2 * 3 / 4 - 5", "(- (+ 1 (/ (* 2 3) 4)) 5)");
		parse("10 + 10 * 2", "(+ 10 (* 10 2))");
		parse("10 - 5 - 3", "(- (- 10 5) 3)");
	}

	#[test]
	fn parse_comparison() {
		parse("1 < 2", "(< 1 2)");
		parse("1 <= 2", "(<= 1 2)");
		parse("1 > 2", "(> 1 2)");
		parse("1 >= 2", "(>= 1 2)");
		parse("1 < 2 < 3", "(< (< 1 2) 3)");
	}

	#[test]
	fn parse_equality() {
		parse("1 == 2", "(== 1 2)");
		parse("1 != 2", "(!= 1 2)");
		parse("1 + 5 === 6", "(=== (+ 1 5) 6)");
		parse("1 === 2 !== 3", "(!== (=== 1 2) 3)");
	}

	#[test]
	fn parse_logical() {
		parse("a or b and c", "(or a (and b c))");
		parse("a == 1 and b or c", "(or (and (== a 1) b) c)");
		parse("person.age > 20 or toBool 0", "(or (> (get person.age) 20) (toBool 0))");
	}

	#[test]
	fn parse_unary() {
		parse("-123", "(- 123)");
		parse("!true", "(! true)");
		parse("!!true", "(! (! true))");
		parse("-1 + 2", "(+ (- 1) 2)");
		parse("toString 5 + 2", "(+ (toString 5) 2)");
		parse("-a.b", "(- (get a.b))");
	}

	#[test]
	fn parse_literals() {
		parse("42", "42");
		parse("3.14", "3.14");
		parse("\"hello\"", "\"hello\"");
		parse("'hello'", "\"hello\"");
		parse("true", "true");
		parse("false", "false");
		parse("null", "null");
		parse("undefined", "undefined");
	}

	#[test]
	fn parse_containers() {
		parse("[]", "(array)");
		parse("[1, 1 + 2, [3, 4], %{a: 1}]", "(array 1 (+ 1 2) (array 3 4) (object a:1))");
		parse("%{}", "(object)");
		parse("%{\n  a: 1,\n  b: [2,\n 3],\n}", "(object a:1 b:(array 2 3))");
	}

	#[test]
	fn parse_property_access() {
		parse("a.b.c", "(get (get a.b).c)");
		parse("arr[2][1]", "(get (get arr[2])[1])");
		parse("arr[i + 1].name", "(get (get arr[(+ i 1)]).name)");
	}

	#[test]
	fn parse_assignment() {
		parse("a = b = 3", "(= a (= b 3))");
		parse("let b = a = 3", "(let b (= a 3))");
		parse("arr[0] = 4", "(set arr[0] 4)");
		parse("arr[2][1] = 8", "(set (get arr[2])[1] 8)");
		parse("arr[3].a = 2", "(set (get arr[3]).a 2)");
	}

	#[test]
	fn parse_statements() {
		parse("let a = 1\nlet b\n{ let a = 5; b = a }\na + b", "(let a 1); (let b); (block (let a 5) (= b a)); (+ a b)");
		parse("\n\n  1 + 2  \n\n", "(+ 1 2)");
		parse("{\n1 + 2\n}", "(block (+ 1 2))");
		parse("{}", "(block)");
	}

	#[test]
	fn parse_if() {
		parse("if (true) \"true\" \n else \"false\"", "(if true \"true\" \"false\")");
		parse("if (x) 1 else 2", "(if x 1 2)");
		parse("if (x) { 1 } else if (y) 2 else 3", "(if x (block 1) (if y 2 3))");
		parse("if (x) {\n1\n}\nelse {\n2\n}", "(if x (block 1) (block 2))");
		parse("if (x)\n  1\n2", "(if x 1); 2");
		parse("if true, do: \"t\", else: \"f\"", "(if-do true \"t\" \"f\")");
		parse("if a > 1, do: a\nb", "(if-do (> a 1) a); b");
	}

	#[test]
	fn parse_errors() {
		parse_error("(1 + 2", 1, "Expected a ')' after the expression.");
		parse_error("1 = 2", 1, "Invalid assignment target.");
		parse_error("(a) = 2", 1, "Invalid assignment target.");
		parse_error("1 2", 1, "Expect a `\\n` after an expression.");
		parse_error("let = 1", 1, "Expect a variable name.");
		parse_error("a.1", 1, "Expect a property name after `.`.");
		parse_error("%a", 1, "Expect `{` to start object.");
		parse_error("%{a 1}", 1, "Expected a `:` after a property name.");
		parse_error("[1 2]", 1, "Expect `]` after array elements.");
		parse_error("{ 1", 1, "Expect `}` after block.");
		parse_error("if x, 1", 1, "Expect `do` after if expression condition.");
		parse_error("1 +\n\n(2", 1, "Expect expression.");
		parse_error("\n\n(1 + 2", 3, "Expected a ')' after the expression.");
	}

	#[test]
	fn parse_limits_nesting() {
		let parens = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
		let (printed, errors) = parse_with_errors(&parens);
		assert_eq!(printed, "");
		assert_eq!(errors.len(), 1);
		parse_error(&parens, 1, "Descriptor nested too deeply.");

		parse_error(&format!("{}1", "-".repeat(5000)), 1, "Descriptor nested too deeply.");
		parse_error(&format!("{}1", "a = ".repeat(5000)), 1, "Descriptor nested too deeply.");
		parse_error(&format!("{}1", "[".repeat(5000)), 1, "Descriptor nested too deeply.");

		let blocks = format!("{}1{}", "{\n".repeat(200), "\n}".repeat(200));
		parse_error(&blocks, MAX_NESTING + 1, "Descriptor nested too deeply.");

		parse(&format!("{}1{}", "(".repeat(20), ")".repeat(20)), &format!("{}1{}", "(group ".repeat(20), ")".repeat(20)));
	}

	#[test]
	fn parse_recovers_after_errors() {
		let (printed, errors) = parse_with_errors("let = 1\nlet b = 2\n1 +\nb");
		assert_eq!(errors.len(), 2);
		assert_eq!(errors[0].line, 1);
		assert_eq!(errors[1].line, 3);
		assert_eq!(errors[1].kind.to_string(), "Expect expression.");
		assert_eq!(printed, "(let b 2); b");
	}

	#[test]
	fn parse_recovers_inside_blocks() {
		let (printed, errors) = parse_with_errors("{ 1 + }\n2");
		assert_eq!(errors.len(), 1);
		assert_eq!(printed, "(block); 2");

		let (printed, errors) = parse_with_errors("{ let = 1\n let a = 2 }\n}\na");
		assert_eq!(errors.len(), 2);
		assert_eq!(printed, "(block (let a 2)); a");
	}
}
