use std::{cell::RefCell, collections::HashMap};

use crate::{error::{ErrorTracker, RuntimeError, interpreter::RuntimeErrorType}, interpreter::value::Value, scanner::Token};

/// One frame of the scope chain.
///
/// A frame borrows its enclosing frame, so frames live on the evaluator's
/// stack and a block scope disappears as soon as the block is left, whatever
/// path it leaves by. Readonly applies to every binding the frame holds
/// directly: the global scope and the argument scope are readonly, program
/// and block scopes are not.
#[derive(Debug, Default)]
pub struct Environment<'p> {
	values:    RefCell<HashMap<String, Value>>,
	enclosing: Option<&'p Environment<'p>>,
	readonly:  bool,
}

/// The result of a lookup: the value and whether the frame holding it is
/// readonly.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
	pub value:    Value,
	pub readonly: bool,
}

impl Environment<'static> {
	/// A root frame with no enclosing scope.
	pub fn new(readonly: bool) -> Self { Self { readonly, ..Default::default() } }
}

impl<'p> Environment<'p> {
	/// A frame chained under `enclosing`.
	pub fn with_enclosing(enclosing: &'p Environment<'p>, readonly: bool) -> Self {
		Self { values: RefCell::default(), enclosing: Some(enclosing), readonly }
	}

	/// Bind every `(name, value)` pair in this frame, in order.
	pub fn with_bindings<K: Into<String>>(self, bindings: impl IntoIterator<Item = (K, Value)>) -> Self {
		for (name, value) in bindings {
			self.define(name, value);
		}
		self
	}

	pub fn is_readonly(&self) -> bool { self.readonly }

	/// A `let` doesn't just define a new variable, it can also redefine an
	/// existing one of this frame. Readonly frames are filled through here
	/// too.
	pub fn define(&self, name: impl Into<String>, value: Value) { self.values.borrow_mut().insert(name.into(), value); }

	/// Look `name` up from this frame outwards.
	pub fn get(&self, name: &Token, errors: &mut ErrorTracker) -> Binding {
		match self.lookup(&name.lexeme) {
			Some(binding) => binding,
			None => {
				errors.capture_runtime_error(RuntimeError::new(
					name,
					RuntimeErrorType::UndefinedVariable(name.lexeme.clone()),
				));
				Binding { value: Value::Undefined, readonly: self.readonly }
			}
		}
	}

	/// Assign to an existing variable, returning the value it holds
	/// afterwards. Rejected writes leave the binding as it was.
	pub fn assign(&self, name: &Token, value: Value, errors: &mut ErrorTracker) -> Value {
		if let Some(current) = self.values.borrow_mut().get_mut(&name.lexeme) {
			if self.readonly {
				errors.capture_runtime_error(RuntimeError::new(name, RuntimeErrorType::Readonly(name.lexeme.clone())));
				return current.clone();
			}
			*current = value.clone();
			return value;
		}

		match self.enclosing {
			Some(enclosing) => enclosing.assign(name, value, errors),
			None => {
				errors.capture_runtime_error(RuntimeError::new(
					name,
					RuntimeErrorType::UndefinedVariable(name.lexeme.clone()),
				));
				Value::Undefined
			}
		}
	}

	fn lookup(&self, name: &str) -> Option<Binding> {
		if let Some(value) = self.values.borrow().get(name) {
			return Some(Binding { value: value.clone(), readonly: self.readonly });
		}
		self.enclosing.and_then(|enclosing| enclosing.lookup(name))
	}
}
