//! Descriptor interpreter.
//!
//! The interpreter walks the abstract syntax tree (AST) produced by the parser,
//! recursively evaluating each statement and expression and computing its
//! runtime value. Every statement produces a value, a program evaluates to the
//! value of the last statement it executed.
//!
//! # Expression Types
//!
//! - **Literals**: `null`, `undefined`, booleans, numbers, strings
//! - **Containers**: `[1, 2]` arrays and `%{a: 1}` objects
//! - **Unary**: `-` (negation), `!` (logical NOT), `toString`, `toBool`
//! - **Binary**: `+`, `-`, `*`, `/`, comparisons, loose and strict equality
//! - **Logical**: `and`, `or`, short-circuiting and returning an operand
//! - **Property access**: `a.b`, `a[0]`, and assignment through them
//!
//! Runtime problems never stop evaluation. They are reported to the
//! [`ErrorTracker`] and the failing operation yields a placeholder value.

pub mod value;

use Expression::*;
use value::Value;

use crate::{environment::Environment, error::{ErrorTracker, RuntimeError, interpreter::RuntimeErrorType}, parser::expression::{Accessor, BinaryOperator, Expression, LiteralValue}, scanner::Token, statement::Statement};

/// Arrays cannot grow past the largest index a dynamic-language array
/// accepts.
const MAX_ARRAY_INDEX: f64 = (u32::MAX - 1) as f64;
/// How many slots past its end a single write may grow an array by.
const MAX_ARRAY_GROWTH: usize = 1 << 16;

/// Evaluate `statements` in a fresh mutable frame chained under
/// `environment`.
pub fn evaluate(statements: &[Statement], environment: &Environment<'_>, errors: &mut ErrorTracker) -> Value {
	Interpreter::new(errors).interpret(statements, environment)
}

/// Interpreter that evaluates descriptor statements.
pub struct Interpreter<'e> {
	errors: &'e mut ErrorTracker,
}

/// A property key once the accessor has been evaluated.
enum PropertyKey<'a> {
	Name(&'a str),
	Index(Value),
}

impl PropertyKey<'_> {
	/// Objects are keyed by strings, indexes go through the `toString`
	/// conversion.
	fn object_key(&self) -> String {
		match self {
			PropertyKey::Name(name) => name.to_string(),
			PropertyKey::Index(index) => index.to_string(),
		}
	}

	/// A valid array position, if this key is one.
	fn array_index(&self) -> Option<usize> {
		match self {
			PropertyKey::Name(_) => None,
			PropertyKey::Index(index) => {
				let index = index.to_number();
				(index >= 0.0 && index.fract() == 0.0 && index <= MAX_ARRAY_INDEX).then_some(index as usize)
			}
		}
	}
}

impl<'e> Interpreter<'e> {
	pub fn new(errors: &'e mut ErrorTracker) -> Self { Self { errors } }

	/// Run a whole program. Top-level `let`s live in their own frame so they
	/// can shadow readonly arguments and globals.
	pub fn interpret(&mut self, statements: &[Statement], environment: &Environment<'_>) -> Value {
		let program = Environment::with_enclosing(environment, false);
		let value = self.execute_all(statements, &program);
		tracing::trace!(
			runtime_errors = self.errors.runtime_errors().len(),
			result = %value.repr(),
			"evaluated descriptor"
		);
		value
	}

	fn execute_all(&mut self, statements: &[Statement], environment: &Environment<'_>) -> Value {
		let mut last = Value::Undefined;
		for statement in statements {
			last = self.execute(statement, environment);
		}
		last
	}

	fn execute(&mut self, statement: &Statement, environment: &Environment<'_>) -> Value {
		match statement {
			Statement::Expression(expression) => self.evaluate(expression, environment),
			Statement::LetDeclaration { name_token, initializer } => {
				let value = match initializer {
					Some(initializer) => self.evaluate(initializer, environment),
					None => Value::Undefined,
				};
				environment.define(name_token.lexeme.clone(), value.clone());
				value
			}
			Statement::Block(statements) => {
				let scope = Environment::with_enclosing(environment, false);
				self.execute_all(statements, &scope)
			}
			Statement::If { condition, then_branch, else_branch } => {
				if self.evaluate(condition, environment).to_bool() {
					self.execute(then_branch, environment)
				} else if let Some(else_branch) = else_branch {
					self.execute(else_branch, environment)
				} else {
					Value::Undefined
				}
			}
			Statement::IfExpression { condition, then_branch, else_branch } => {
				if self.evaluate(condition, environment).to_bool() {
					self.evaluate(then_branch, environment)
				} else if let Some(else_branch) = else_branch {
					self.evaluate(else_branch, environment)
				} else {
					Value::Undefined
				}
			}
		}
	}

	/// Evaluate the given expression and return its value.
	fn evaluate(&mut self, expression: &Expression, environment: &Environment<'_>) -> Value {
		match expression {
			Literal(literal) => literal.into(),
			Grouping(inner) => self.evaluate(inner, environment),
			Variable(name) => environment.get(name, self.errors).value,
			Assign { target, value } => {
				let value = self.evaluate(value, environment);
				environment.assign(target, value, self.errors)
			}
			Unary { operator, right, .. } => self.evaluate(right, environment).unary_op(*operator),
			Binary { left, operator, right, .. } => {
				let left = self.evaluate(left, environment);
				match operator {
					BinaryOperator::And if !left.to_bool() => left,
					BinaryOperator::Or if left.to_bool() => left,
					BinaryOperator::And | BinaryOperator::Or => self.evaluate(right, environment),
					_ => {
						let right = self.evaluate(right, environment);
						left.binary_op(*operator, &right)
					}
				}
			}
			Array(elements) => {
				let values: Vec<Value> = elements.iter().map(|element| self.evaluate(element, environment)).collect();
				Value::from(values)
			}
			Object(properties) => {
				let entries: Vec<(String, Value)> = properties
					.iter()
					.map(|(name, value)| (name.lexeme.clone(), self.evaluate(value, environment)))
					.collect();
				Value::object(entries)
			}
			Get { object, accessor } => {
				let object = self.evaluate(object, environment);
				let key = self.property_key(accessor, environment);
				self.get_property(&object, &key, accessor.token())
			}
			Set { object, accessor, value } => {
				let (object, readonly) = self.evaluate_target(object, environment);
				let key = self.property_key(accessor, environment);
				let value = self.evaluate(value, environment);

				if readonly {
					self.report(accessor.token(), RuntimeErrorType::ReadonlyUpdate);
					return lookup(&object, &key).unwrap_or_default();
				}
				self.set_property(&object, &key, value, accessor.token())
			}
		}
	}

	/// Evaluate the object side of a property write, remembering whether the
	/// variable it was reached through is readonly. Containers held by a
	/// readonly frame cannot be mutated at any depth.
	fn evaluate_target(&mut self, expression: &Expression, environment: &Environment<'_>) -> (Value, bool) {
		match expression {
			Variable(name) => {
				let binding = environment.get(name, self.errors);
				(binding.value, binding.readonly)
			}
			Get { object, accessor } => {
				let (object, readonly) = self.evaluate_target(object, environment);
				let key = self.property_key(accessor, environment);
				(self.get_property(&object, &key, accessor.token()), readonly)
			}
			Grouping(inner) => self.evaluate_target(inner, environment),
			other => (self.evaluate(other, environment), false),
		}
	}

	fn property_key<'a>(&mut self, accessor: &'a Accessor, environment: &Environment<'_>) -> PropertyKey<'a> {
		match accessor {
			Accessor::Name(name) => PropertyKey::Name(&name.lexeme),
			Accessor::Index { index, .. } => PropertyKey::Index(self.evaluate(index, environment)),
		}
	}

	fn get_property(&mut self, object: &Value, key: &PropertyKey<'_>, token: &Token) -> Value {
		lookup(object, key).unwrap_or_else(|| {
			self.report(token, RuntimeErrorType::PropertyDoesNotExist);
			Value::Undefined
		})
	}

	/// Write a property and return the written value. Arrays grow to fit the
	/// index, the gap is filled with `undefined`, but never by more than
	/// [`MAX_ARRAY_GROWTH`] slots at once.
	fn set_property(&mut self, object: &Value, key: &PropertyKey<'_>, value: Value, token: &Token) -> Value {
		match object {
			Value::Array(elements) => match key.array_index() {
				Some(index) if index > elements.borrow().len() + MAX_ARRAY_GROWTH => {
					self.report(token, RuntimeErrorType::IndexTooFar(index));
					Value::Undefined
				}
				Some(index) => {
					let mut elements = elements.borrow_mut();
					if index >= elements.len() {
						elements.resize(index + 1, Value::Undefined);
					}
					elements[index] = value.clone();
					value
				}
				None => {
					self.report(token, RuntimeErrorType::InvalidIndex);
					Value::Undefined
				}
			},
			Value::Object(properties) => {
				properties.borrow_mut().insert(key.object_key(), value.clone());
				value
			}
			_ => {
				self.report(token, RuntimeErrorType::PropertyDoesNotExist);
				Value::Undefined
			}
		}
	}

	fn report(&mut self, token: &Token, kind: RuntimeErrorType) {
		self.errors.capture_runtime_error(RuntimeError::new(token, kind));
	}
}

/// Read a property. `None` when `object` has no properties at all, missing
/// properties of arrays and objects read as `undefined`.
fn lookup(object: &Value, key: &PropertyKey<'_>) -> Option<Value> {
	match object {
		Value::Array(elements) => {
			let elements = elements.borrow();
			Some(match key {
				PropertyKey::Name("length") => Value::Number(elements.len() as f64),
				_ => key.array_index().and_then(|index| elements.get(index).cloned()).unwrap_or_default(),
			})
		}
		Value::Object(properties) => Some(properties.borrow().get(&key.object_key()).cloned().unwrap_or_default()),
		_ => None,
	}
}

impl From<&LiteralValue> for Value {
	fn from(literal: &LiteralValue) -> Self {
		match literal {
			LiteralValue::Number(n) => Value::Number(*n),
			LiteralValue::StringLiteral(s) => Value::String(s.clone()),
			LiteralValue::Boolean(b) => Value::Bool(*b),
			LiteralValue::Null => Value::Null,
			LiteralValue::Undefined => Value::Undefined,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{parser::parse, scanner::scan};

	fn run_in(source: &str, environment: &Environment<'_>) -> (Value, Vec<RuntimeError>) {
		let mut errors = ErrorTracker::new();
		let tokens = scan(source, &mut errors);
		let statements = parse(tokens, &mut errors);
		assert!(!errors.has_compile_errors(), "{source:?} produced {:?}", errors.compile_errors());
		let value = evaluate(&statements, environment, &mut errors);
		(value, errors.into_runtime_errors())
	}

	fn run(source: &str) -> Value {
		let (value, errors) = run_in(source, &Environment::new(true));
		assert!(errors.is_empty(), "{source:?} produced {errors:?}");
		value
	}

	fn messages(errors: &[RuntimeError]) -> Vec<String> { errors.iter().map(|error| error.kind.to_string()).collect() }

	#[test]
	fn arithmetic() {
		assert_eq!(run("10 + 10 * 2"), Value::from(30));
		assert_eq!(run("10 - 5 - 3"), Value::from(2));
		assert_eq!(run("(10 + 10) * 2"), Value::from(40));
		assert_eq!(run("-(1 + 2)"), Value::from(-3));
		assert_eq!(run("\"4\" * 2"), Value::from(8));
		assert_eq!(run("\"4\" + 2"), Value::from(6));
		assert!(matches!(run("undefined + 1"), Value::Number(n) if n.is_nan()));
		assert_eq!(run("1 / 0"), Value::Number(f64::INFINITY));
	}

	#[test]
	fn comparison_and_equality() {
		assert_eq!(run("1 + 5 === 6"), Value::Bool(true));
		assert_eq!(run("\"20\" == 20"), Value::Bool(true));
		assert_eq!(run("\"20\" === 20"), Value::Bool(false));
		assert_eq!(run("null == undefined"), Value::Bool(true));
		assert_eq!(run("null === undefined"), Value::Bool(false));
		assert_eq!(run("null != 0"), Value::Bool(true));
		assert_eq!(run("\"10\" > 9"), Value::Bool(true));
		assert_eq!(run("1 <= 1"), Value::Bool(true));
		assert_eq!(run("let a = [1]\nlet b = a\na === b"), Value::Bool(true));
		assert_eq!(run("[1] == [1]"), Value::Bool(false));
		assert_eq!(run("1 !== \"1\""), Value::Bool(true));
		assert_eq!(run("1 != \"1\""), Value::Bool(false));
		assert_eq!(run("null != undefined"), Value::Bool(false));
		assert_eq!(run("null !== undefined"), Value::Bool(true));
		assert_eq!(run("true != \"1\""), Value::Bool(false));
		assert_eq!(run("0 !== false"), Value::Bool(true));
	}

	#[test]
	fn logical_operators_return_operands() {
		assert_eq!(run("true and \"x\""), Value::from("x"));
		assert_eq!(run("false and \"x\""), Value::Bool(false));
		assert_eq!(run("true or \"x\""), Value::Bool(true));
		assert_eq!(run("false or \"x\""), Value::from("x"));
		assert_eq!(run("0 or null"), Value::Null);
	}

	#[test]
	fn logical_operators_short_circuit() {
		let (value, errors) = run_in("false and missing", &Environment::new(true));
		assert_eq!(value, Value::Bool(false));
		assert!(errors.is_empty());

		let (value, errors) = run_in("true or missing", &Environment::new(true));
		assert_eq!(value, Value::Bool(true));
		assert!(errors.is_empty());
	}

	#[test]
	fn unary_operators() {
		assert_eq!(run("!0"), Value::Bool(true));
		assert_eq!(run("!\"\""), Value::Bool(true));
		assert_eq!(run("-\"3\""), Value::from(-3));
		assert_eq!(run("toString 5 + 2"), Value::from(7));
		assert_eq!(run("toString (5 + 2)"), Value::from("7"));
		assert_eq!(run("toBool \"false\""), Value::Bool(true));
		assert_eq!(run("toBool 0"), Value::Bool(false));
		assert_eq!(run("toString [1, null, 2]"), Value::from("1,,2"));
	}

	#[test]
	fn last_statement_value() {
		assert_eq!(run(""), Value::Undefined);
		assert_eq!(run("1\n2\n3"), Value::from(3));
		assert_eq!(run("let a = 4"), Value::from(4));
		assert_eq!(run("let a"), Value::Undefined);
		assert_eq!(run("{ 1\n 2 }"), Value::from(2));
		assert_eq!(run("{}"), Value::Undefined);
		assert_eq!(run("if (true) 1 else 2"), Value::from(1));
		assert_eq!(run("if (false) 1 else { 2\n3 }"), Value::from(3));
		assert_eq!(run("if (false) 1"), Value::Undefined);
		assert_eq!(run("if 1 > 2, do: \"a\", else: \"b\""), Value::from("b"));
		assert_eq!(run("if 1 > 2, do: \"a\""), Value::Undefined);
	}

	#[test]
	fn block_scoping() {
		assert_eq!(run("let a = 1\nlet b = 1\n{ let a = 5; b = a }\n[a, b]"), Value::array([1.into(), 5.into()]));
		assert_eq!(run("let a = 1\n{ a = 2 }\na"), Value::from(2));
	}

	#[test]
	fn block_scope_is_dropped_after_errors() {
		let (value, errors) = run_in("{ let a = 1\n missing }\na", &Environment::new(true));
		assert_eq!(value, Value::Undefined);
		assert_eq!(messages(&errors), ["Undefined variable missing.", "Undefined variable a."]);
	}

	#[test]
	fn scoping_through_arguments_and_globals() {
		let globals =
			Environment::new(true).with_bindings([("globalArg", Value::from(100)), ("shadowed", Value::from(500))]);
		let arguments =
			Environment::with_enclosing(&globals, true).with_bindings([("fnArg", Value::from(50)), ("shadowed", 200.into())]);
		let source = "let a = 1\nlet b = 1\nlet shadowed = 10\n{ let a = 5; b = a }\nglobalArg + fnArg + a + b + shadowed";

		let (value, errors) = run_in(source, &arguments);
		assert_eq!(value, Value::from(166));
		assert!(errors.is_empty());
	}

	#[test]
	fn readonly_assignment() {
		let arguments = Environment::new(true).with_bindings([("a", Value::from(1))]);

		let (value, errors) = run_in("let b = a = 3\n[a, b]", &arguments);
		assert_eq!(value, Value::array([1.into(), 1.into()]));
		assert_eq!(messages(&errors), ["a is readonly."]);
	}

	#[test]
	fn readonly_containers() {
		let arguments = Environment::new(true).with_bindings([("person", Value::object([("age", Value::from(20))]))]);

		let (value, errors) = run_in("person.age = 30", &arguments);
		assert_eq!(value, Value::from(20));
		assert_eq!(messages(&errors), ["Trying to update a readonly variable."]);

		let (value, errors) = run_in("person.age", &arguments);
		assert_eq!(value, Value::from(20));
		assert!(errors.is_empty());

		let (value, errors) = run_in("let copy = person\ncopy.age = 30\nperson.age", &arguments);
		assert_eq!(value, Value::from(30));
		assert!(errors.is_empty());
	}

	#[test]
	fn container_literals_and_mutation() {
		let value = run("let arr=[1,1+2,[3,4],%{a:1}]; arr[0]=4; arr[2][1]=8; arr[3].a=2; arr");
		assert_eq!(
			value,
			Value::array([
				4.into(),
				3.into(),
				Value::array([3.into(), 8.into()]),
				Value::object([("a", Value::from(2))]),
			])
		);
		assert_eq!(value.repr(), "[4, 3, [3, 8], %{a: 2}]");
	}

	#[test]
	fn containers_alias() {
		assert_eq!(run("let a = %{n: 1}\nlet b = a\nb.n = 2\na.n"), Value::from(2));
		assert_eq!(run("let a = [1]\nlet b = [a]\nb[0][0] = 7\na[0]"), Value::from(7));
	}

	#[test]
	fn property_reads() {
		assert_eq!(run("[1, 2, 3][1]"), Value::from(2));
		assert_eq!(run("[1, 2, 3][\"2\"]"), Value::from(3));
		assert_eq!(run("[1, 2, 3][5]"), Value::Undefined);
		assert_eq!(run("[1, 2, 3][-1]"), Value::Undefined);
		assert_eq!(run("[1, 2, 3].length"), Value::from(3));
		assert_eq!(run("[1, 2, 3].size"), Value::Undefined);
		assert_eq!(run("%{a: %{b: 2}}.a.b"), Value::from(2));
		assert_eq!(run("%{a: 1}[\"a\"]"), Value::from(1));
		assert_eq!(run("%{a: 1}.b"), Value::Undefined);
	}

	#[test]
	fn property_of_primitive() {
		let (value, errors) = run_in("let n = 1\nn.a", &Environment::new(true));
		assert_eq!(value, Value::Undefined);
		assert_eq!(messages(&errors), ["Property does not exist."]);
		assert_eq!(errors[0].token.lexeme, "a");

		let (value, errors) = run_in("let n = 1\nn[0] = 2", &Environment::new(true));
		assert_eq!(value, Value::Undefined);
		assert_eq!(messages(&errors), ["Property does not exist."]);
	}

	#[test]
	fn array_writes() {
		assert_eq!(run("let a = [1]\na[3] = 4\na"), Value::array([1.into(), Value::Undefined, Value::Undefined, 4.into()]));
		assert_eq!(run("let a = []\na[0] = 1\na.length"), Value::from(1));

		let (value, errors) = run_in("let a = [1]\na[-1] = 2\na[0.5] = 2\na.b = 2\na", &Environment::new(true));
		assert_eq!(value, Value::array([1.into()]));
		assert_eq!(messages(&errors), ["Array index must be a non-negative integer."; 3]);
	}

	#[test]
	fn array_writes_far_past_the_end() {
		let source = "let a = []\nlet b = a[4000000000] = 1\na[65537] = 1\na[65536] = 1\n[a.length, b]";
		let (value, errors) = run_in(source, &Environment::new(true));
		assert_eq!(value, Value::array([Value::from(65537), Value::Undefined]));
		assert_eq!(messages(&errors), [
			"Array index 4000000000 is too far past the end of the array.",
			"Array index 65537 is too far past the end of the array.",
		]);
		assert_eq!(errors[0].token.line, 2);
	}

	#[test]
	fn self_referencing_arrays() {
		assert_eq!(run("let a = [1]\na[0] = a\na + 1"), Value::from(1));
		assert_eq!(run("let a = [1]\na[1] = a\ntoString a"), Value::from("1,"));
		assert_eq!(run("let a = [1]\na[0] = a\na === a[0]"), Value::Bool(true));
	}

	#[test]
	fn object_writes() {
		assert_eq!(run("let o = %{}\no.a = 1\no[\"b\"] = 2\no[3] = 3\no").repr(), "%{a: 1, b: 2, 3: 3}");
	}

	#[test]
	fn undefined_variables_keep_evaluating() {
		let (value, errors) = run_in("missing = 1\nlet a = missing\na or 2", &Environment::new(true));
		assert_eq!(value, Value::from(2));
		assert_eq!(messages(&errors), ["Undefined variable missing.", "Undefined variable missing."]);
		assert_eq!(errors[1].token.line, 2);
	}
}
