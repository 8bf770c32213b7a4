use std::fmt;

use crate::wire::{Result, WireError, WireType};

/// Longest signature that fits the one-byte length prefix.
pub const MAX_SIGNATURE_LEN: usize = 255;
/// Maximum `a` nesting inside one signature.
pub const MAX_ARRAY_NESTING: u32 = 32;
/// Maximum `(` nesting inside one signature.
pub const MAX_STRUCT_NESTING: u32 = 32;

/// Validated type signature: zero or more complete types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature {
	text: String,
	types: Vec<WireType>,
}

impl Signature {
	/// Parse and validate signature text.
	pub fn new(text: impl Into<String>) -> Result<Self> {
		let text = text.into();
		if text.len() > MAX_SIGNATURE_LEN {
			return Err(WireError::SignatureTooLong { len: text.len() });
		}

		let types = parse_types(&text)?;
		Ok(Self { text, types })
	}

	/// Build the signature describing `types` in order.
	pub fn from_types(types: &[WireType]) -> Result<Self> {
		let text: String = types.iter().map(ToString::to_string).collect();
		Self::new(text)
	}

	/// Signature text without terminator.
	pub fn as_str(&self) -> &str {
		&self.text
	}

	/// Complete types in order.
	pub fn types(&self) -> &[WireType] {
		&self.types
	}

	/// The only complete type, when the signature holds exactly one.
	pub fn single(&self) -> Option<&WireType> {
		match self.types.as_slice() {
			[ty] => Some(ty),
			_ => None,
		}
	}

	/// Whether no types are described.
	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}

impl std::str::FromStr for Signature {
	type Err = WireError;

	fn from_str(s: &str) -> Result<Self> {
		Self::new(s)
	}
}

fn parse_types(text: &str) -> Result<Vec<WireType>> {
	let mut parser = Parser { text, bytes: text.as_bytes(), idx: 0 };
	let mut out = Vec::new();
	while parser.idx < parser.bytes.len() {
		out.push(parser.complete(0, 0)?);
	}
	Ok(out)
}

struct Parser<'a> {
	text: &'a str,
	bytes: &'a [u8],
	idx: usize,
}

impl Parser<'_> {
	fn complete(&mut self, arrays: u32, structs: u32) -> Result<WireType> {
		let Some(&code) = self.bytes.get(self.idx) else {
			return Err(self.fail("missing element type"));
		};
		self.idx += 1;

		match code {
			b'a' => {
				if arrays + 1 > MAX_ARRAY_NESTING {
					return Err(self.fail("array nesting too deep"));
				}
				if self.bytes.get(self.idx) == Some(&b'{') {
					self.idx += 1;
					return self.dict_entry(arrays + 1, structs);
				}
				let elem = self.complete(arrays + 1, structs)?;
				Ok(WireType::Array(Box::new(elem)))
			}
			b'(' => {
				if structs + 1 > MAX_STRUCT_NESTING {
					return Err(self.fail("struct nesting too deep"));
				}
				let mut fields = Vec::new();
				loop {
					match self.bytes.get(self.idx) {
						Some(b')') => {
							self.idx += 1;
							break;
						}
						Some(_) => fields.push(self.complete(arrays, structs + 1)?),
						None => return Err(self.fail("unterminated struct")),
					}
				}
				if fields.is_empty() {
					return Err(self.fail("empty struct"));
				}
				Ok(WireType::Struct(fields))
			}
			b'{' => Err(self.fail("dict entry outside array")),
			b')' | b'}' => Err(self.fail("unbalanced closing bracket")),
			other => WireType::from_code(other).ok_or_else(|| self.fail("unknown type code")),
		}
	}

	fn dict_entry(&mut self, arrays: u32, structs: u32) -> Result<WireType> {
		let key = match self.bytes.get(self.idx).copied().and_then(WireType::from_code) {
			Some(key) if key.is_basic() => key,
			Some(_) | None => return Err(self.fail("dict key must be a basic type")),
		};
		self.idx += 1;

		let value = self.complete(arrays, structs + 1)?;
		if self.bytes.get(self.idx) != Some(&b'}') {
			return Err(self.fail("dict entry must hold exactly two types"));
		}
		self.idx += 1;
		Ok(WireType::Dict(Box::new(key), Box::new(value)))
	}

	fn fail(&self, reason: &'static str) -> WireError {
		WireError::InvalidSignature {
			signature: self.text.to_owned(),
			reason,
		}
	}
}
