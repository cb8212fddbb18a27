/// Types of scanning errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
	/// A quote was opened but the input ended before it was closed.
	#[error("Unterminated string")]
	UnterminatedString,
	/// A number literal such as `1.2.3`.
	#[error("You can only have one '.' in a decimal number")]
	ExtraDecimalPoint,
	/// A number literal such as `12ab`.
	#[error("An alpha character cannot immediately follow a number")]
	AlphaAfterNumber,
	/// A character no rule matches.
	#[error("Unknown token starting with {0}")]
	UnknownToken(char),
}
