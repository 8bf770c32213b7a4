use std::fmt;

use crate::wire::{InvalidType, Result, Signature, WireError, WireType};

/// One value accepted by the encoder.
///
/// Host types without a fixed wire width (`usize`, `isize`, `i128`, ...) have
/// no conversion into this type and are rejected at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Byte(u8),
	Bool(bool),
	I16(i16),
	U16(u16),
	I32(i32),
	U32(u32),
	I64(i64),
	U64(u64),
	F64(f64),
	UnixFd(UnixFdIndex),
	String(String),
	ObjectPath(ObjectPath),
	Signature(Signature),
	Variant(Box<Variant>),
	Array(Array),
	Struct(StructValue),
	Dict(Dict),
	Indirect(Indirect),
}

impl Value {
	/// Wire type of this value's shape.
	///
	/// Containers report their declared element types; contents are not inspected.
	pub fn wire_type(&self) -> WireType {
		match self {
			Self::Byte(_) => WireType::Byte,
			Self::Bool(_) => WireType::Boolean,
			Self::I16(_) => WireType::Int16,
			Self::U16(_) => WireType::UInt16,
			Self::I32(_) => WireType::Int32,
			Self::U32(_) => WireType::UInt32,
			Self::I64(_) => WireType::Int64,
			Self::U64(_) => WireType::UInt64,
			Self::F64(_) => WireType::Double,
			Self::UnixFd(_) => WireType::UnixFd,
			Self::String(_) => WireType::String,
			Self::ObjectPath(_) => WireType::ObjectPath,
			Self::Signature(_) => WireType::Signature,
			Self::Variant(_) => WireType::Variant,
			Self::Array(item) => WireType::Array(Box::new(item.elem.clone())),
			Self::Struct(item) => WireType::Struct(item.encoded_fields().map(|field| field.value.wire_type()).collect()),
			Self::Dict(item) => WireType::Dict(Box::new(item.key.clone()), Box::new(item.value.clone())),
			Self::Indirect(item) => item.ty.clone(),
		}
	}

	/// Validate the whole tree without encoding it and return its wire type.
	///
	/// Reports the same invalid-type conditions the encoder panics on.
	pub fn check(&self) -> std::result::Result<WireType, InvalidType> {
		let ty = self.wire_type();
		ty.check()?;

		match self {
			Self::Array(item) => {
				for elem in &item.items {
					expect_type(elem, &item.elem, &ty, "array element does not match element type")?;
				}
			}
			Self::Struct(item) => {
				for field in item.encoded_fields() {
					field.value.check()?;
				}
			}
			Self::Dict(item) => {
				for (key, value) in &item.entries {
					expect_type(key, &item.key, &ty, "dict key does not match key type")?;
					expect_type(value, &item.value, &ty, "dict value does not match value type")?;
				}
			}
			Self::Indirect(item) => {
				if let Some(target) = item.target.as_deref() {
					expect_type(target, &item.ty, &ty, "indirection target does not match declared type")?;
				}
			}
			Self::Variant(item) => {
				item.value.check()?;
			}
			_ => {}
		}

		Ok(ty)
	}

	/// Short kind label for diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Byte(_) => "byte",
			Self::Bool(_) => "bool",
			Self::I16(_) => "int16",
			Self::U16(_) => "uint16",
			Self::I32(_) => "int32",
			Self::U32(_) => "uint32",
			Self::I64(_) => "int64",
			Self::U64(_) => "uint64",
			Self::F64(_) => "double",
			Self::UnixFd(_) => "unix_fd",
			Self::String(_) => "string",
			Self::ObjectPath(_) => "object_path",
			Self::Signature(_) => "signature",
			Self::Variant(_) => "variant",
			Self::Array(_) => "array",
			Self::Struct(_) => "struct",
			Self::Dict(_) => "dict",
			Self::Indirect(_) => "indirect",
		}
	}
}

fn expect_type(value: &Value, expected: &WireType, container: &WireType, reason: &'static str) -> std::result::Result<(), InvalidType> {
	if value.check()? != *expected {
		return Err(InvalidType::new(container, reason));
	}
	Ok(())
}

/// Index into the out-of-band file descriptor list of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnixFdIndex(pub u32);

/// Validated object path such as `/org/example/Thing`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPath(String);

impl ObjectPath {
	/// Validate and wrap path text.
	pub fn new(path: impl Into<String>) -> Result<Self> {
		let path = path.into();
		if !is_valid_object_path(&path) {
			return Err(WireError::InvalidObjectPath { path });
		}
		Ok(Self(path))
	}

	/// Path text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ObjectPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

fn is_valid_object_path(path: &str) -> bool {
	if path == "/" {
		return true;
	}
	let Some(rest) = path.strip_prefix('/') else {
		return false;
	};
	rest.split('/')
		.all(|element| !element.is_empty() && element.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_'))
}

/// Homogeneous run of values with an explicit element type.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
	/// Element wire type; fixes body alignment even when empty.
	pub elem: WireType,
	/// Elements in wire order.
	pub items: Vec<Value>,
}

impl Array {
	/// Create an array of `elem` values.
	pub fn new(elem: WireType, items: Vec<Value>) -> Self {
		Self { elem, items }
	}

	/// Byte array (`ay`).
	pub fn bytes(bytes: &[u8]) -> Self {
		Self::new(WireType::Byte, bytes.iter().copied().map(Value::Byte).collect())
	}
}

/// How a struct field participates in the wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
	/// Field is encoded.
	#[default]
	Encoded,
	/// Field is explicitly excluded.
	Skipped,
	/// Field is not visible outside its owner and is excluded.
	Private,
}

/// One named struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
	pub name: Box<str>,
	pub value: Value,
	pub mode: FieldMode,
}

impl Field {
	/// Encoded field.
	pub fn new(name: &str, value: impl Into<Value>) -> Self {
		Self::with_mode(name, value, FieldMode::Encoded)
	}

	/// Field excluded by annotation.
	pub fn skipped(name: &str, value: impl Into<Value>) -> Self {
		Self::with_mode(name, value, FieldMode::Skipped)
	}

	/// Field excluded by visibility.
	pub fn private(name: &str, value: impl Into<Value>) -> Self {
		Self::with_mode(name, value, FieldMode::Private)
	}

	fn with_mode(name: &str, value: impl Into<Value>, mode: FieldMode) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			mode,
		}
	}

	/// Whether the field is part of the wire form.
	pub fn is_encoded(&self) -> bool {
		self.mode == FieldMode::Encoded
	}
}

/// Ordered, named, heterogeneous fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
	pub type_name: Box<str>,
	pub fields: Vec<Field>,
}

impl StructValue {
	/// Create a struct value.
	pub fn new(type_name: &str, fields: Vec<Field>) -> Self {
		Self {
			type_name: type_name.into(),
			fields,
		}
	}

	/// Fields that appear on the wire, in declaration order.
	pub fn encoded_fields(&self) -> impl Iterator<Item = &Field> {
		self.fields.iter().filter(|field| field.is_encoded())
	}
}

/// Dictionary from a basic key type to a value type.
///
/// Entries are emitted in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dict {
	/// Key wire type; must be basic.
	pub key: WireType,
	/// Value wire type.
	pub value: WireType,
	/// Key/value pairs in wire order.
	pub entries: Vec<(Value, Value)>,
}

impl Dict {
	/// Create an empty dictionary.
	pub fn new(key: WireType, value: WireType) -> Self {
		Self {
			key,
			value,
			entries: Vec::new(),
		}
	}

	/// Append one entry.
	pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
		self.entries.push((key.into(), value.into()));
	}

	/// Builder-style [`Dict::insert`].
	pub fn with(mut self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
		self.insert(key, value);
		self
	}
}

/// Self-describing box of one value and its signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
	signature: Signature,
	value: Value,
}

impl Variant {
	/// Box a value, deriving its signature from the value's type.
	pub fn new(value: impl Into<Value>) -> Result<Self> {
		let value = value.into();
		let ty = value.check()?;
		let signature = Signature::from_types(&[ty])?;
		Ok(Self { signature, value })
	}

	/// Signature of the contained value.
	pub fn signature(&self) -> &Signature {
		&self.signature
	}

	/// Contained value.
	pub fn value(&self) -> &Value {
		&self.value
	}
}

/// Pointer-like wrapper encoded as its referent.
#[derive(Debug, Clone, PartialEq)]
pub struct Indirect {
	/// Declared referent type.
	pub ty: WireType,
	/// Referent, or `None` for a null indirection.
	pub target: Option<Box<Value>>,
}

impl Indirect {
	/// Indirection to `value`.
	pub fn to(value: impl Into<Value>) -> Self {
		let value = value.into();
		Self {
			ty: value.wire_type(),
			target: Some(Box::new(value)),
		}
	}

	/// Null indirection declared to point at `ty`.
	pub fn null(ty: WireType) -> Self {
		Self { ty, target: None }
	}
}

macro_rules! impl_from_scalar {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Self::$variant(value)
				}
			}
		)*
	};
}

impl_from_scalar!(
	u8 => Byte,
	bool => Bool,
	i16 => I16,
	u16 => U16,
	i32 => I32,
	u32 => U32,
	i64 => I64,
	u64 => U64,
	f64 => F64,
	UnixFdIndex => UnixFd,
	String => String,
	ObjectPath => ObjectPath,
	Signature => Signature,
	Array => Array,
	StructValue => Struct,
	Dict => Dict,
	Indirect => Indirect,
);

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<Variant> for Value {
	fn from(value: Variant) -> Self {
		Self::Variant(Box::new(value))
	}
}
