use thiserror::Error;

use crate::wire::InvalidType;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, WireError>;

/// Recoverable errors produced while building values and encoding them.
///
/// Invalid-type conditions raised during `encode` are not part of this enum's
/// contract: the encoder panics for those. [`WireError::InvalidType`] only
/// appears when a caller asks for the non-panicking pre-flight check.
#[derive(Debug, Error)]
pub enum WireError {
	/// Destination write failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Container nesting exceeded the configured ceiling.
	#[error("input exceeds container depth limit (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Body does not fit a 32-bit length prefix.
	#[error("length {len} does not fit a 32-bit length prefix")]
	LengthOverflow {
		/// Byte length of the rejected body.
		len: usize,
	},
	/// Indirection had no referent.
	#[error("null indirection to {ty}")]
	NullIndirection {
		/// Signature text of the declared referent type.
		ty: String,
	},
	/// Signature text is malformed.
	#[error("invalid signature {signature:?}: {reason}")]
	InvalidSignature {
		/// Offending signature text.
		signature: String,
		/// What the parser rejected.
		reason: &'static str,
	},
	/// Signature does not fit its one-byte length prefix.
	#[error("signature too long: {len} bytes (max 255)")]
	SignatureTooLong {
		/// Byte length of the rejected signature.
		len: usize,
	},
	/// Object path is not syntactically valid.
	#[error("invalid object path: {path:?}")]
	InvalidObjectPath {
		/// Offending path text.
		path: String,
	},
	/// Pre-flight type check failed.
	#[error(transparent)]
	InvalidType(#[from] InvalidType),
	/// JSON input did not match the requested wire type.
	#[error("json mismatch: expected {expected}, got {got}")]
	JsonMismatch {
		/// Expected wire type or JSON shape.
		expected: String,
		/// Actual JSON kind.
		got: &'static str,
	},
	/// JSON number does not fit the requested integer width.
	#[error("integer {value} out of range for {ty}")]
	IntegerOutOfRange {
		/// Target wire type text.
		ty: &'static str,
		/// Offending number as written.
		value: String,
	},
}
