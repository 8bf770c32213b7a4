use std::io::Write;

use crate::wire::{Array, Dict, Endianness, Indirect, InvalidType, Result, Signature, Sink, StructValue, Value, Variant, WireError, WireType};

/// Container nesting ceiling of the bus format.
pub const MAX_DEPTH: u32 = 64;

/// Runtime limits for encoding.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
	/// Maximum container nesting depth. Dictionaries count two levels.
	pub max_depth: u32,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self { max_depth: MAX_DEPTH }
	}
}

/// Encodes values into the wire format.
///
/// Consecutive [`Encoder::encode`] calls share one alignment frame, so a
/// message body is built by encoding its values in order. After an error the
/// destination may hold a truncated value and must be discarded.
///
/// Passing a value whose shape cannot be represented (heterogeneous array,
/// non-basic dictionary key, indirection whose target contradicts its
/// declared type) is a defect in the caller and panics
/// with the [`InvalidType`] message. Use [`Value::check`] to test a tree first.
pub struct Encoder<W> {
	sink: Sink<W>,
	opt: EncodeOptions,
}

impl<W: Write> Encoder<W> {
	/// Create an encoder writing to `out` in the given byte order.
	pub fn new(out: W, order: Endianness) -> Self {
		Self::with_options(out, order, EncodeOptions::default())
	}

	/// Create an encoder with explicit limits.
	pub fn with_options(out: W, order: Endianness, opt: EncodeOptions) -> Self {
		Self {
			sink: Sink::new(out, order),
			opt,
		}
	}

	/// Encode one value, padding first to its alignment.
	pub fn encode(&mut self, value: &Value) -> Result<()> {
		encode_value(&mut self.sink, value, &self.opt, 0)
	}

	/// Encode values in order, stopping at the first error.
	pub fn encode_all<'a>(&mut self, values: impl IntoIterator<Item = &'a Value>) -> Result<()> {
		for value in values {
			self.encode(value)?;
		}
		Ok(())
	}

	/// Bytes written so far, padding included.
	pub fn position(&self) -> usize {
		self.sink.position()
	}

	/// Configured byte order.
	pub fn order(&self) -> Endianness {
		self.sink.order()
	}

	/// Flush a buffered destination.
	pub fn flush(&mut self) -> Result<()> {
		self.sink.flush()
	}

	/// Borrow the destination.
	pub fn get_ref(&self) -> &W {
		self.sink.get_ref()
	}

	/// Consume the encoder and return the destination.
	pub fn into_inner(self) -> W {
		self.sink.into_inner()
	}
}

/// Encode one value into a fresh buffer.
pub fn to_bytes(value: &Value, order: Endianness) -> Result<Vec<u8>> {
	let mut encoder = Encoder::new(Vec::new(), order);
	encoder.encode(value)?;
	Ok(encoder.into_inner())
}

fn encode_value<W: Write>(sink: &mut Sink<W>, value: &Value, opt: &EncodeOptions, depth: u32) -> Result<()> {
	match value {
		Value::Byte(v) => sink.write_u8(*v),
		Value::Bool(v) => encode_u32(sink, u32::from(*v)),
		Value::I16(v) => {
			sink.align(2)?;
			sink.write_i16(*v)
		}
		Value::U16(v) => {
			sink.align(2)?;
			sink.write_u16(*v)
		}
		Value::I32(v) => {
			sink.align(4)?;
			sink.write_i32(*v)
		}
		Value::U32(v) => encode_u32(sink, *v),
		Value::UnixFd(v) => encode_u32(sink, v.0),
		Value::I64(v) => {
			sink.align(8)?;
			sink.write_i64(*v)
		}
		Value::U64(v) => {
			sink.align(8)?;
			sink.write_u64(*v)
		}
		Value::F64(v) => {
			sink.align(8)?;
			sink.write_f64(*v)
		}
		Value::String(v) => encode_str(sink, v),
		Value::ObjectPath(v) => encode_str(sink, v.as_str()),
		Value::Signature(v) => encode_signature(sink, v),
		Value::Variant(v) => encode_variant(sink, v, opt, depth),
		Value::Array(v) => encode_array(sink, v, opt, depth),
		Value::Struct(v) => encode_struct(sink, v, opt, depth),
		Value::Dict(v) => encode_dict(sink, v, opt, depth),
		Value::Indirect(v) => encode_indirect(sink, v, opt, depth),
	}
}

fn encode_u32<W: Write>(sink: &mut Sink<W>, value: u32) -> Result<()> {
	sink.align(4)?;
	sink.write_u32(value)
}

fn encode_len<W: Write>(sink: &mut Sink<W>, len: usize) -> Result<()> {
	let len32 = u32::try_from(len).map_err(|_| WireError::LengthOverflow { len })?;
	encode_u32(sink, len32)
}

fn encode_str<W: Write>(sink: &mut Sink<W>, text: &str) -> Result<()> {
	encode_len(sink, text.len())?;
	sink.write(text.as_bytes())?;
	sink.write_u8(0)
}

fn encode_signature<W: Write>(sink: &mut Sink<W>, sig: &Signature) -> Result<()> {
	let text = sig.as_str();
	// Signature construction caps the length at 255.
	let len = u8::try_from(text.len()).map_err(|_| WireError::SignatureTooLong { len: text.len() })?;
	sink.write_u8(len)?;
	sink.write(text.as_bytes())?;
	sink.write_u8(0)
}

fn encode_variant<W: Write>(sink: &mut Sink<W>, item: &Variant, opt: &EncodeOptions, depth: u32) -> Result<()> {
	check_depth(depth, opt.max_depth)?;
	encode_signature(sink, item.signature())?;
	encode_value(sink, item.value(), opt, depth + 1)
}

fn encode_array<W: Write>(sink: &mut Sink<W>, item: &Array, opt: &EncodeOptions, depth: u32) -> Result<()> {
	sink.align(4)?;
	check_depth(depth, opt.max_depth)?;
	if let Err(err) = item.elem.check() {
		invalid_type(err);
	}

	let mut scratch = Sink::new(Vec::new(), sink.order());
	for elem in &item.items {
		if elem.wire_type() != item.elem {
			let ty = WireType::Array(Box::new(item.elem.clone()));
			invalid_type(InvalidType::new(&ty, "array element does not match element type"));
		}
		encode_value(&mut scratch, elem, opt, depth + 1)?;
	}

	tracing::trace!(depth, elem = %item.elem, count = item.items.len(), len = scratch.position(), "array encoded");
	emit_body(sink, scratch, item.elem.alignment())
}

fn encode_struct<W: Write>(sink: &mut Sink<W>, item: &StructValue, opt: &EncodeOptions, depth: u32) -> Result<()> {
	sink.align(8)?;
	check_depth(depth, opt.max_depth)?;
	for field in item.encoded_fields() {
		encode_value(sink, &field.value, opt, depth + 1)?;
	}
	Ok(())
}

fn encode_dict<W: Write>(sink: &mut Sink<W>, item: &Dict, opt: &EncodeOptions, depth: u32) -> Result<()> {
	sink.align(4)?;
	// Implied array plus per-entry struct: two levels.
	check_depth(depth.saturating_add(1), opt.max_depth)?;

	let ty = WireType::Dict(Box::new(item.key.clone()), Box::new(item.value.clone()));
	if let Err(err) = ty.check() {
		invalid_type(err);
	}
	for (key, value) in &item.entries {
		if key.wire_type() != item.key {
			invalid_type(InvalidType::new(&ty, "dict key does not match key type"));
		}
		if value.wire_type() != item.value {
			invalid_type(InvalidType::new(&ty, "dict value does not match value type"));
		}
	}

	let mut scratch = Sink::new(Vec::new(), sink.order());
	for (key, value) in &item.entries {
		scratch.align(8)?;
		encode_value(&mut scratch, key, opt, depth + 2)?;
		encode_value(&mut scratch, value, opt, depth + 2)?;
	}

	tracing::trace!(depth, ty = %ty, count = item.entries.len(), len = scratch.position(), "dict encoded");
	emit_body(sink, scratch, ty.body_alignment())
}

fn encode_indirect<W: Write>(sink: &mut Sink<W>, item: &Indirect, opt: &EncodeOptions, depth: u32) -> Result<()> {
	let Some(target) = item.target.as_deref() else {
		tracing::debug!(ty = %item.ty, "null indirection");
		return Err(WireError::NullIndirection { ty: item.ty.to_string() });
	};
	if target.wire_type() != item.ty {
		invalid_type(InvalidType::new(&item.ty, "indirection target does not match declared type"));
	}
	encode_value(sink, target, opt, depth)
}

/// Write the length prefix, pad to the body alignment, then copy the body.
///
/// The scratch sink started at position 0, so every padding decision made
/// inside it stays valid once the real stream is aligned to `body_align`.
fn emit_body<W: Write>(sink: &mut Sink<W>, scratch: Sink<Vec<u8>>, body_align: usize) -> Result<()> {
	let body = scratch.into_inner();
	encode_len(sink, body.len())?;
	sink.align(body_align)?;
	sink.write(&body)
}

fn check_depth(depth: u32, max_depth: u32) -> Result<()> {
	if depth >= max_depth {
		tracing::debug!(depth, max_depth, "container depth limit reached");
		return Err(WireError::DepthExceeded { max_depth });
	}
	Ok(())
}

#[track_caller]
fn invalid_type(err: InvalidType) -> ! {
	panic!("{err}")
}

#[cfg(test)]
mod tests;
