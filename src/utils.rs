use std::{cell::{Ref, RefCell, RefMut}, rc::Rc};

/// Shared, interior-mutable cell. Clones alias the same value, which is what
/// gives arrays and objects their reference semantics.
#[derive(Debug, Default)]
pub struct RcCell<T> {
	inner: Rc<RefCell<T>>,
}

impl<T> Clone for RcCell<T> {
	fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<T> RcCell<T> {
	pub fn new(value: T) -> Self { Self { inner: Rc::new(RefCell::new(value)) } }

	pub fn borrow(&self) -> Ref<'_, T> { self.inner.borrow() }

	pub fn borrow_mut(&self) -> RefMut<'_, T> { self.inner.borrow_mut() }

	/// Identity comparison, the cells are the same allocation.
	pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.inner, &other.inner) }

	/// The address of the shared allocation, the identity of the cell.
	pub fn as_ptr(&self) -> *const () { Rc::as_ptr(&self.inner).cast() }
}

impl<T> From<T> for RcCell<T> {
	fn from(value: T) -> Self { Self::new(value) }
}
