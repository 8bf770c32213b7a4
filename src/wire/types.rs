use std::fmt;

use thiserror::Error;

/// Semantic type of one wire value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireType {
	/// `y`: unsigned 8-bit integer.
	Byte,
	/// `b`: boolean, marshaled as a 32-bit 0 or 1.
	Boolean,
	/// `n`: signed 16-bit integer.
	Int16,
	/// `q`: unsigned 16-bit integer.
	UInt16,
	/// `i`: signed 32-bit integer.
	Int32,
	/// `u`: unsigned 32-bit integer.
	UInt32,
	/// `x`: signed 64-bit integer.
	Int64,
	/// `t`: unsigned 64-bit integer.
	UInt64,
	/// `d`: IEEE-754 double.
	Double,
	/// `h`: index into the out-of-band file descriptor list.
	UnixFd,
	/// `s`: UTF-8 string.
	String,
	/// `o`: object path.
	ObjectPath,
	/// `g`: type signature.
	Signature,
	/// `v`: self-describing boxed value.
	Variant,
	/// `a`: homogeneous array of the element type.
	Array(Box<WireType>),
	/// `(...)`: ordered heterogeneous fields.
	Struct(Vec<WireType>),
	/// `a{kv}`: dictionary from a basic key type to a value type.
	Dict(Box<WireType>, Box<WireType>),
}

/// Dispatch category used by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
	/// Fixed-width numeric.
	ScalarFixed,
	/// String, object path or signature.
	LengthPrefixed,
	/// Variant.
	Boxed,
	/// Array, struct or dictionary.
	Container,
}

impl Category {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::ScalarFixed => "scalar-fixed",
			Self::LengthPrefixed => "length-prefixed",
			Self::Boxed => "boxed",
			Self::Container => "container",
		}
	}
}

impl WireType {
	/// Required start alignment in bytes.
	pub fn alignment(&self) -> usize {
		match self {
			Self::Byte | Self::Signature | Self::Variant => 1,
			Self::Int16 | Self::UInt16 => 2,
			Self::Boolean | Self::Int32 | Self::UInt32 | Self::UnixFd | Self::String | Self::ObjectPath | Self::Array(_) | Self::Dict(..) => 4,
			Self::Int64 | Self::UInt64 | Self::Double | Self::Struct(_) => 8,
		}
	}

	/// Encoder dispatch category.
	pub fn category(&self) -> Category {
		match self {
			Self::String | Self::ObjectPath | Self::Signature => Category::LengthPrefixed,
			Self::Variant => Category::Boxed,
			Self::Array(_) | Self::Struct(_) | Self::Dict(..) => Category::Container,
			_ => Category::ScalarFixed,
		}
	}

	/// Whether the type may be used as a dictionary key.
	pub fn is_basic(&self) -> bool {
		!matches!(self, Self::Variant | Self::Array(_) | Self::Struct(_) | Self::Dict(..))
	}

	/// Single-character type code for non-container types.
	pub fn type_code(&self) -> Option<u8> {
		Some(match self {
			Self::Byte => b'y',
			Self::Boolean => b'b',
			Self::Int16 => b'n',
			Self::UInt16 => b'q',
			Self::Int32 => b'i',
			Self::UInt32 => b'u',
			Self::Int64 => b'x',
			Self::UInt64 => b't',
			Self::Double => b'd',
			Self::UnixFd => b'h',
			Self::String => b's',
			Self::ObjectPath => b'o',
			Self::Signature => b'g',
			Self::Variant => b'v',
			Self::Array(_) | Self::Struct(_) | Self::Dict(..) => return None,
		})
	}

	/// Basic or variant type for a single-character code.
	pub fn from_code(code: u8) -> Option<Self> {
		Some(match code {
			b'y' => Self::Byte,
			b'b' => Self::Boolean,
			b'n' => Self::Int16,
			b'q' => Self::UInt16,
			b'i' => Self::Int32,
			b'u' => Self::UInt32,
			b'x' => Self::Int64,
			b't' => Self::UInt64,
			b'd' => Self::Double,
			b'h' => Self::UnixFd,
			b's' => Self::String,
			b'o' => Self::ObjectPath,
			b'g' => Self::Signature,
			b'v' => Self::Variant,
			_ => return None,
		})
	}

	/// Check that the type is representable: dict keys are basic and structs
	/// have at least one field, at every nesting level.
	pub fn check(&self) -> Result<(), InvalidType> {
		match self {
			Self::Array(elem) => elem.check(),
			Self::Struct(fields) => fields.iter().try_for_each(Self::check),
			Self::Dict(key, value) => {
				if !key.is_basic() {
					return Err(InvalidType::new(self, "dict key is not a basic type"));
				}
				value.check()
			}
			_ => Ok(()),
		}
	}

	/// Alignment of the body of a container, used after its length prefix.
	///
	/// Dictionary bodies are runs of 8-aligned entries regardless of the key type.
	pub(crate) fn body_alignment(&self) -> usize {
		match self {
			Self::Array(elem) => elem.alignment(),
			Self::Dict(..) => 8,
			other => other.alignment(),
		}
	}
}

impl fmt::Display for WireType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(code) = self.type_code() {
			return write!(f, "{}", char::from(code));
		}
		match self {
			Self::Array(elem) => write!(f, "a{elem}"),
			Self::Struct(fields) => {
				f.write_str("(")?;
				for field in fields {
					write!(f, "{field}")?;
				}
				f.write_str(")")
			}
			Self::Dict(key, value) => write!(f, "a{{{key}{value}}}"),
			_ => Ok(()),
		}
	}
}

/// A value shape the encoder cannot represent.
///
/// This is a defect in the calling code, not in a particular input. The
/// encoder raises it as a panic; [`crate::wire::Value::check`] returns it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type {ty}: {reason}")]
pub struct InvalidType {
	/// Signature text of the offending type.
	pub ty: String,
	/// Which rule the type broke.
	pub reason: &'static str,
}

impl InvalidType {
	pub(crate) fn new(ty: &WireType, reason: &'static str) -> Self {
		Self { ty: ty.to_string(), reason }
	}
}
