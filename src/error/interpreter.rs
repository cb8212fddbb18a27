/// Errors that can occur during evaluation. None of them stop evaluation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeErrorType {
	/// No frame in the chain binds the name
	#[error("Undefined variable {0}.")]
	UndefinedVariable(String),
	/// Reassignment of a binding held by a readonly frame
	#[error("{0} is readonly.")]
	Readonly(String),
	/// Property write through a binding held by a readonly frame
	#[error("Trying to update a readonly variable.")]
	ReadonlyUpdate,
	/// Property access on something that is neither an array nor an object
	#[error("Property does not exist.")]
	PropertyDoesNotExist,
	/// Array write with a negative, fractional or non-numeric index
	#[error("Array index must be a non-negative integer.")]
	InvalidIndex,
	/// Array write that would grow the array too far past its end
	#[error("Array index {0} is too far past the end of the array.")]
	IndexTooFar(usize),
}
