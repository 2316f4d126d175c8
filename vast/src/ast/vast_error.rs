use thiserror::Error;

/// Recoverable error raised while building or querying a file.
/// Misuse of the builder API (broken structural rules) panics instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VastError {
	#[error("Width is not a literal: {0}")]
	NonLiteralWidth(String),

	#[error("Packed dimension is not a literal: {0}")]
	NonLiteralDimension(String),

	#[error("Value {value} is too large")]
	ValueTooLarge { value: String },

	#[error("Value {value} does not fit in {width} bits")]
	ValueDoesNotFit { value: String, width: u64 },

	#[error("Flattened bit count does not fit in 64 bits")]
	BitCountOverflow,

	#[error("Port '{0}' has zero width")]
	ZeroWidthPort(String),
}
