mod encode;
mod error;
mod signature;
mod sink;
mod types;
mod value;

/// Encoder entry points and options.
pub use encode::{EncodeOptions, Encoder, MAX_DEPTH, to_bytes};
/// Error and result aliases.
pub use error::{Result, WireError};
/// Signature values and parser limits.
pub use signature::{MAX_ARRAY_NESTING, MAX_SIGNATURE_LEN, MAX_STRUCT_NESTING, Signature};
/// Position-tracked output sink and byte order selection.
pub use sink::{Endianness, Sink};
/// Wire-type classification.
pub use types::{Category, InvalidType, WireType};
/// Value tree accepted by the encoder.
pub use value::{Array, Dict, Field, FieldMode, Indirect, ObjectPath, StructValue, UnixFdIndex, Value, Variant};
