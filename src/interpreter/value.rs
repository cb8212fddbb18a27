//! Runtime values.
//!
//! The language is dynamically typed, so every conversion the operators rely
//! on is spelled out here: [`Value::to_number`], [`Value::to_bool`] and the
//! [`Display`] impl (the `toString` conversion). Arrays and objects live in
//! [`RcCell`]s, cloning a `Value` aliases them rather than copying them.

use std::fmt::{self, Display};

use serde_json::Value as Json;

use crate::{parser::expression::{BinaryOperator, UnaryOperator}, scanner::Conversion, utils::RcCell};

/// The containers enclosing the one being visited. Meeting one of them again
/// means a container holds itself.
type Ancestors = Vec<*const ()>;

/// Value represents a runtime value.
#[derive(Clone, Default)]
pub enum Value {
	Null,
	#[default]
	Undefined,
	Bool(bool),
	Number(f64),
	String(String),
	Array(RcCell<Vec<Value>>),
	Object(RcCell<ObjectMap>),
}

/// String-keyed map that remembers insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMap {
	entries: Vec<(String, Value)>,
}

impl ObjectMap {
	pub fn new() -> Self { Self::default() }

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.iter().find(|(name, _)| name == key).map(|(_, value)| value)
	}

	/// Insert or overwrite in place, returning the previous value.
	pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
		let key = key.into();
		match self.entries.iter_mut().find(|(name, _)| *name == key) {
			Some((_, slot)) => Some(std::mem::replace(slot, value)),
			None => {
				self.entries.push((key, value));
				None
			}
		}
	}

	pub fn len(&self) -> usize { self.entries.len() }

	pub fn is_empty(&self) -> bool { self.entries.is_empty() }

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries.iter().map(|(name, value)| (name.as_str(), value))
	}
}

impl<K: Into<String>> FromIterator<(K, Value)> for ObjectMap {
	fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
		let mut map = ObjectMap::new();
		for (key, value) in iter {
			map.insert(key, value);
		}
		map
	}
}

impl Value {
	pub fn array(values: impl IntoIterator<Item = Value>) -> Self {
		Value::Array(RcCell::new(values.into_iter().collect()))
	}

	pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
		Value::Object(RcCell::new(entries.into_iter().collect()))
	}

	/// Truthiness: `null`, `undefined`, `false`, `0`, `NaN` and `""` are false.
	pub fn to_bool(&self) -> bool {
		match self {
			Value::Null | Value::Undefined => false,
			Value::Bool(b) => *b,
			Value::Number(n) => *n != 0.0 && !n.is_nan(),
			Value::String(s) => !s.is_empty(),
			Value::Array(_) | Value::Object(_) => true,
		}
	}

	/// Numeric conversion used by arithmetic, comparison and loose equality.
	pub fn to_number(&self) -> f64 {
		match self {
			Value::Null => 0.0,
			Value::Undefined => f64::NAN,
			Value::Bool(b) => f64::from(u8::from(*b)),
			Value::Number(n) => *n,
			Value::String(s) => string_to_number(s),
			Value::Array(_) | Value::Object(_) => string_to_number(&self.to_string()),
		}
	}

	/// Descriptor-literal rendering, strings quoted and containers expanded.
	/// A container nested inside itself renders as `[...]` or `%{...}`.
	pub fn repr(&self) -> String { self.repr_within(&mut Vec::new()) }

	fn repr_within(&self, ancestors: &mut Ancestors) -> String {
		match self {
			Value::String(s) => format!("\"{s}\""),
			Value::Array(items) => {
				if ancestors.contains(&items.as_ptr()) {
					return "[...]".to_string();
				}
				ancestors.push(items.as_ptr());
				let items: Vec<String> = items.borrow().iter().map(|item| item.repr_within(ancestors)).collect();
				ancestors.pop();
				format!("[{}]", items.join(", "))
			}
			Value::Object(map) => {
				if ancestors.contains(&map.as_ptr()) {
					return "%{...}".to_string();
				}
				ancestors.push(map.as_ptr());
				let entries: Vec<String> = map
					.borrow()
					.iter()
					.map(|(name, value)| format!("{name}: {}", value.repr_within(ancestors)))
					.collect();
				ancestors.pop();
				format!("%{{{}}}", entries.join(", "))
			}
			other => other.to_string(),
		}
	}

	/// `==`: null and undefined only equal each other, booleans and strings
	/// meeting a number are compared numerically, containers by identity.
	pub fn loose_equals(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null | Value::Undefined, Value::Null | Value::Undefined) => true,
			(Value::Null | Value::Undefined, _) | (_, Value::Null | Value::Undefined) => false,
			(Value::Bool(l), Value::Bool(r)) => l == r,
			(Value::Bool(_), _) => Value::Number(self.to_number()).loose_equals(other),
			(_, Value::Bool(_)) => self.loose_equals(&Value::Number(other.to_number())),
			(Value::Number(l), Value::Number(r)) => l == r,
			(Value::String(l), Value::String(r)) => l == r,
			(Value::Number(n), Value::String(_)) => *n == other.to_number(),
			(Value::String(_), Value::Number(n)) => self.to_number() == *n,
			(Value::Array(l), Value::Array(r)) => l.ptr_eq(r),
			(Value::Object(l), Value::Object(r)) => l.ptr_eq(r),
			_ => false,
		}
	}

	/// `===`: same variant and same value, containers by identity.
	pub fn strict_equals(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
			(Value::Bool(l), Value::Bool(r)) => l == r,
			(Value::Number(l), Value::Number(r)) => l == r,
			(Value::String(l), Value::String(r)) => l == r,
			(Value::Array(l), Value::Array(r)) => l.ptr_eq(r),
			(Value::Object(l), Value::Object(r)) => l.ptr_eq(r),
			_ => false,
		}
	}

	/// Performs a binary operation between two already evaluated values.
	/// `and`/`or` select one of the operands, the interpreter short-circuits
	/// them before the right side is evaluated.
	pub fn binary_op(&self, op: BinaryOperator, right: &Self) -> Value {
		use BinaryOperator::*;

		match op {
			Add => Value::Number(self.to_number() + right.to_number()),
			Subtract => Value::Number(self.to_number() - right.to_number()),
			Multiply => Value::Number(self.to_number() * right.to_number()),
			Divide => Value::Number(self.to_number() / right.to_number()),
			Greater => Value::Bool(self.to_number() > right.to_number()),
			GreaterEqual => Value::Bool(self.to_number() >= right.to_number()),
			Less => Value::Bool(self.to_number() < right.to_number()),
			LessEqual => Value::Bool(self.to_number() <= right.to_number()),
			LooseEqual => Value::Bool(self.loose_equals(right)),
			LooseNotEqual => Value::Bool(!self.loose_equals(right)),
			StrictEqual => Value::Bool(self.strict_equals(right)),
			StrictNotEqual => Value::Bool(!self.strict_equals(right)),
			And => if self.to_bool() { right.clone() } else { self.clone() },
			Or => if self.to_bool() { self.clone() } else { right.clone() },
		}
	}

	pub fn unary_op(&self, op: UnaryOperator) -> Value {
		match op {
			UnaryOperator::Negate => Value::Number(-self.to_number()),
			UnaryOperator::Not => Value::Bool(!self.to_bool()),
			UnaryOperator::Convert(Conversion::ToString) => Value::String(self.to_string()),
			UnaryOperator::Convert(Conversion::ToBool) => Value::Bool(self.to_bool()),
		}
	}

	/// Host-facing JSON form. `undefined`, non-finite numbers and containers
	/// nested inside themselves become `null`.
	pub fn to_json(&self) -> Json { self.to_json_within(&mut Vec::new()) }

	fn to_json_within(&self, ancestors: &mut Ancestors) -> Json {
		match self {
			Value::Null | Value::Undefined => Json::Null,
			Value::Bool(b) => Json::Bool(*b),
			Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => Json::from(*n as i64),
			Value::Number(n) => serde_json::Number::from_f64(*n).map_or(Json::Null, Json::Number),
			Value::String(s) => Json::String(s.clone()),
			Value::Array(items) => {
				if ancestors.contains(&items.as_ptr()) {
					return Json::Null;
				}
				ancestors.push(items.as_ptr());
				let items = items.borrow().iter().map(|item| item.to_json_within(ancestors)).collect();
				ancestors.pop();
				Json::Array(items)
			}
			Value::Object(map) => {
				if ancestors.contains(&map.as_ptr()) {
					return Json::Null;
				}
				ancestors.push(map.as_ptr());
				let entries =
					map.borrow().iter().map(|(name, value)| (name.to_string(), value.to_json_within(ancestors))).collect();
				ancestors.pop();
				Json::Object(entries)
			}
		}
	}

	/// Structural comparison. A pair of containers met again while it is
	/// still being compared is taken as equal.
	fn structural_eq(&self, other: &Self, pairs: &mut Vec<(*const (), *const ())>) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
			(Value::Bool(l), Value::Bool(r)) => l == r,
			(Value::Number(l), Value::Number(r)) => l == r,
			(Value::String(l), Value::String(r)) => l == r,
			(Value::Array(l), Value::Array(r)) => {
				let pair = (l.as_ptr(), r.as_ptr());
				if l.ptr_eq(r) || pairs.contains(&pair) {
					return true;
				}
				let (l, r) = (l.borrow(), r.borrow());
				pairs.push(pair);
				let equal = l.len() == r.len() && l.iter().zip(r.iter()).all(|(l, r)| l.structural_eq(r, pairs));
				pairs.pop();
				equal
			}
			(Value::Object(l), Value::Object(r)) => {
				let pair = (l.as_ptr(), r.as_ptr());
				if l.ptr_eq(r) || pairs.contains(&pair) {
					return true;
				}
				let (l, r) = (l.borrow(), r.borrow());
				pairs.push(pair);
				let equal = l.len() == r.len()
					&& l.iter().zip(r.iter()).all(|((l_name, l), (r_name, r))| l_name == r_name && l.structural_eq(r, pairs));
				pairs.pop();
				equal
			}
			_ => false,
		}
	}

	/// The `toString` conversion. A nested array that contains itself joins
	/// as an empty string.
	fn write_string(&self, f: &mut fmt::Formatter<'_>, ancestors: &mut Ancestors) -> fmt::Result {
		match self {
			Value::Null => write!(f, "null"),
			Value::Undefined => write!(f, "undefined"),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Number(n) => format_number(*n, f),
			Value::String(s) => write!(f, "{s}"),
			Value::Array(items) => {
				if ancestors.contains(&items.as_ptr()) {
					return Ok(());
				}
				ancestors.push(items.as_ptr());
				for (index, item) in items.borrow().iter().enumerate() {
					if index > 0 {
						write!(f, ",")?;
					}
					if !matches!(item, Value::Null | Value::Undefined) {
						item.write_string(f, ancestors)?;
					}
				}
				ancestors.pop();
				Ok(())
			}
			Value::Object(_) => write!(f, "[object Object]"),
		}
	}
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn string_to_number(text: &str) -> f64 {
	let text = text.trim();
	if text.is_empty() {
		return 0.0;
	}
	let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
	if unsigned == "Infinity" {
		return if text.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
	}
	// Rust also accepts `inf` and `nan`, which are not numbers here.
	if !unsigned.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) {
		return f64::NAN;
	}
	text.parse().unwrap_or(f64::NAN)
}

fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	if n.is_nan() {
		write!(f, "NaN")
	} else if n.is_infinite() {
		write!(f, "{}", if n > 0.0 { "Infinity" } else { "-Infinity" })
	} else if n == 0.0 {
		// Also covers -0.
		write!(f, "0")
	} else if n.abs() >= 1e21 || n.abs() < 1e-6 {
		let exponential = format!("{n:e}");
		match exponential.split_once('e') {
			Some((mantissa, exponent)) if !exponent.starts_with('-') => write!(f, "{mantissa}e+{exponent}"),
			_ => write!(f, "{exponential}"),
		}
	} else {
		write!(f, "{n}")
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.write_string(f, &mut Vec::new()) }
}

/// Debug output is the descriptor-literal rendering.
impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.repr()) }
}

/// Structural equality for hosts and tests. This is not the language's `==`.
impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool { self.structural_eq(other, &mut Vec::new()) }
}

impl From<f64> for Value {
	fn from(value: f64) -> Self { Value::Number(value) }
}

impl From<i32> for Value {
	fn from(value: i32) -> Self { Value::Number(f64::from(value)) }
}

impl From<bool> for Value {
	fn from(value: bool) -> Self { Value::Bool(value) }
}

impl From<&str> for Value {
	fn from(value: &str) -> Self { Value::String(value.to_string()) }
}

impl From<String> for Value {
	fn from(value: String) -> Self { Value::String(value) }
}

impl From<Vec<Value>> for Value {
	fn from(values: Vec<Value>) -> Self { Value::array(values) }
}

impl From<Json> for Value {
	fn from(json: Json) -> Self {
		match json {
			Json::Null => Value::Null,
			Json::Bool(b) => Value::Bool(b),
			Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
			Json::String(s) => Value::String(s),
			Json::Array(items) => Value::array(items.into_iter().map(Value::from)),
			Json::Object(map) => Value::object(map.into_iter().map(|(name, value)| (name, Value::from(value)))),
		}
	}
}
