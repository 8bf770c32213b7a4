use std::io::BufWriter;

use buswire_testkit::{FailingWriter, hex};

use crate::wire::{
	Array, Dict, EncodeOptions, Encoder, Endianness, Field, Indirect, ObjectPath, Signature, StructValue, UnixFdIndex, Value, Variant, WireError, WireType,
	to_bytes,
};

fn encode_le(values: &[Value]) -> (Vec<u8>, usize) {
	let mut enc = Encoder::new(Vec::new(), Endianness::Little);
	enc.encode_all(values).expect("values encode");
	let pos = enc.position();
	(enc.into_inner(), pos)
}

fn nested_arrays(levels: u32) -> Value {
	let mut value = Value::from(Array::new(WireType::Byte, Vec::new()));
	for _ in 0..levels {
		value = Value::from(Array::new(value.wire_type(), vec![value]));
	}
	value
}

fn nested_structs(levels: u32) -> Value {
	let mut value = Value::from(StructValue::new("Leaf", vec![Field::new("v", 1_u8)]));
	for _ in 0..levels {
		value = Value::from(StructValue::new("Node", vec![Field::new("inner", value)]));
	}
	value
}

fn dict_at_depth(depth: u32) -> Value {
	let mut value = Value::from(Dict::new(WireType::Byte, WireType::Byte).with(1_u8, 2_u8));
	for _ in 0..depth {
		value = Value::from(Array::new(value.wire_type(), vec![value]));
	}
	value
}

#[test]
fn byte_at_start() {
	let (bytes, pos) = encode_le(&[Value::Byte(0x07)]);
	assert_eq!(bytes, vec![0x07]);
	assert_eq!(pos, 1);
}

#[test]
fn uint16_at_odd_position_is_padded() {
	let (bytes, pos) = encode_le(&[Value::Byte(0xaa), Value::U16(0x0102)]);
	assert_eq!(bytes, hex("aa 00 02 01"));
	assert_eq!(pos, 4);
}

#[test]
fn string_layout() {
	let (bytes, pos) = encode_le(&[Value::from("AB")]);
	assert_eq!(bytes, hex("02 00 00 00 41 42 00"));
	assert_eq!(pos, 7);

	let big = to_bytes(&Value::from("AB"), Endianness::Big).expect("big-endian string");
	assert_eq!(big, hex("00 00 00 02 41 42 00"));
}

#[test]
fn empty_byte_array_has_only_length() {
	let (bytes, pos) = encode_le(&[Value::from(Array::bytes(&[]))]);
	assert_eq!(bytes, hex("00 00 00 00"));
	assert_eq!(pos, 4);
}

#[test]
fn empty_array_still_pads_to_element_alignment() {
	let (bytes, pos) = encode_le(&[Value::from(Array::new(WireType::UInt64, Vec::new()))]);
	assert_eq!(bytes, hex("00 00 00 00 00 00 00 00"));
	assert_eq!(pos, 8);
}

#[test]
fn uint64_array_body_starts_on_eight() {
	let (bytes, _) = encode_le(&[Value::from(Array::new(WireType::UInt64, vec![Value::U64(1)]))]);
	assert_eq!(bytes, hex("08 00 00 00 00 00 00 00 01 00 00 00 00 00 00 00"));
}

#[test]
fn byte_array_after_odd_offset() {
	let (bytes, pos) = encode_le(&[Value::Byte(9), Value::from(Array::bytes(&[1, 2]))]);
	assert_eq!(bytes, hex("09 00 00 00 02 00 00 00 01 02"));
	assert_eq!(pos, 10);
}

#[test]
fn struct_array_keeps_scratch_alignment() {
	let elem = WireType::Struct(vec![WireType::Byte]);
	let items = vec![
		Value::from(StructValue::new("B", vec![Field::new("v", 2_u8)])),
		Value::from(StructValue::new("B", vec![Field::new("v", 3_u8)])),
	];
	let (bytes, pos) = encode_le(&[Value::Byte(1), Value::from(Array::new(elem, items))]);

	assert_eq!(bytes, hex("01 00 00 00 09 00 00 00 02 00 00 00 00 00 00 00 03"));
	assert_eq!(pos, 17);
}

#[test]
fn scalars() {
	let (bytes, _) = encode_le(&[Value::F64(1.0)]);
	assert_eq!(bytes, hex("00 00 00 00 00 00 f0 3f"));

	let (bytes, _) = encode_le(&[Value::I16(-2), Value::I32(-1), Value::I64(2)]);
	assert_eq!(bytes, hex("fe ff 00 00 ff ff ff ff 02 00 00 00 00 00 00 00"));

	let (bytes, _) = encode_le(&[Value::UnixFd(UnixFdIndex(3))]);
	assert_eq!(bytes, hex("03 00 00 00"));

	let big = to_bytes(&Value::Bool(true), Endianness::Big).expect("bool");
	assert_eq!(big, hex("00 00 00 01"));
}

#[test]
fn scalar_starts_at_next_multiple_of_width() {
	let scalars = [(Value::Byte(1), 1), (Value::U16(1), 2), (Value::U32(1), 4), (Value::U64(1), 8)];
	for start in 0..16_usize {
		for (scalar, width) in &scalars {
			let mut values: Vec<Value> = (0..start).map(|_| Value::Byte(0xee)).collect();
			values.push(scalar.clone());
			let (_, pos) = encode_le(&values);

			let expected_start = start.div_ceil(*width) * width;
			assert_eq!(pos - width, expected_start, "start={start} width={width}");
		}
	}
}

#[test]
fn object_path_and_signature() {
	let path = ObjectPath::new("/").expect("root path");
	let sig = Signature::new("a{sv}").expect("signature");
	let (bytes, pos) = encode_le(&[Value::from(path), Value::from(sig)]);

	assert_eq!(bytes, hex("01 00 00 00 2f 00 05 61 7b 73 76 7d 00"));
	assert_eq!(pos, 13);
}

#[test]
fn struct_aligns_to_eight_and_skips_excluded_fields() {
	let value = Value::from(StructValue::new(
		"Item",
		vec![
			Field::new("x", 1_i32),
			Field::skipped("tag", "not sent"),
			Field::private("cache", 7_u64),
			Field::new("y", 2_u8),
		],
	));
	let (bytes, pos) = encode_le(&[Value::Byte(1), value]);

	assert_eq!(bytes, hex("01 00 00 00 00 00 00 00 01 00 00 00 02"));
	assert_eq!(pos, 13);
}

#[test]
fn variant_is_self_describing() {
	let variant = Variant::new(-1_i32).expect("variant");
	let (bytes, _) = encode_le(&[Value::from(variant)]);
	assert_eq!(bytes, hex("01 69 00 00 ff ff ff ff"));
}

#[test]
fn string_variant_dict() {
	let dict = Dict::new(WireType::String, WireType::Variant).with("a", Variant::new(7_u32).expect("variant"));
	let (bytes, pos) = encode_le(&[Value::from(dict)]);

	assert_eq!(bytes, hex("10 00 00 00 00 00 00 00 01 00 00 00 61 00 01 75 00 00 00 00 07 00 00 00"));
	assert_eq!(pos, 24);
}

#[test]
fn dict_entries_align_to_eight_in_body() {
	let dict = Dict::new(WireType::Byte, WireType::Byte).with(1_u8, 2_u8).with(3_u8, 4_u8);
	let (bytes, _) = encode_le(&[Value::from(dict)]);
	assert_eq!(bytes, hex("0a 00 00 00 00 00 00 00 01 02 00 00 00 00 00 00 03 04"));
}

#[test]
fn empty_dict_pads_to_eight() {
	let dict = Dict::new(WireType::String, WireType::Variant);
	let (bytes, pos) = encode_le(&[Value::from(dict)]);
	assert_eq!(bytes, hex("00 00 00 00 00 00 00 00"));
	assert_eq!(pos, 8);
}

#[test]
fn indirection_is_transparent() {
	let (bytes, pos) = encode_le(&[Value::Byte(1), Value::from(Indirect::to(0x0102_u16))]);
	assert_eq!(bytes, hex("01 00 02 01"));
	assert_eq!(pos, 4);
}

#[test]
fn null_indirection_is_reported() {
	let mut enc = Encoder::new(Vec::new(), Endianness::Little);
	let err = enc.encode(&Value::from(Indirect::null(WireType::String))).expect_err("null target");

	assert!(matches!(err, WireError::NullIndirection { ref ty } if ty == "s"));
	assert_eq!(enc.position(), 0);
}

#[test]
fn array_nested_64_levels_is_rejected() {
	let mut enc = Encoder::new(Vec::new(), Endianness::Little);
	let err = enc.encode(&nested_arrays(64)).expect_err("too deep");
	assert!(matches!(err, WireError::DepthExceeded { max_depth: 64 }));
}

#[test]
fn array_nested_63_levels_is_accepted() {
	let bytes = to_bytes(&nested_arrays(63), Endianness::Little).expect("63 levels fit");
	// 63 non-empty length prefixes plus the innermost empty one.
	assert_eq!(bytes.len(), 64 * 4);
	assert_eq!(&bytes[bytes.len() - 4..], &[0, 0, 0, 0]);
}

#[test]
fn dict_counts_two_levels() {
	// Depth is the number of enclosing containers; the dict's entries sit at depth + 2.
	let err = to_bytes(&dict_at_depth(63), Endianness::Little).expect_err("dict at 63 rejected");
	assert!(matches!(err, WireError::DepthExceeded { max_depth: 64 }));

	to_bytes(&dict_at_depth(62), Endianness::Little).expect("dict at 62 accepted");
}

#[test]
fn struct_nesting_hits_the_ceiling() {
	let opt = EncodeOptions { max_depth: 2 };

	let mut enc = Encoder::with_options(Vec::new(), Endianness::Little, opt);
	enc.encode(&nested_structs(1)).expect("innermost struct at depth 1");
	assert_eq!(enc.into_inner(), vec![1]);

	let mut enc = Encoder::with_options(Vec::new(), Endianness::Little, opt);
	let err = enc.encode(&nested_structs(2)).expect_err("innermost struct at depth 2");
	assert!(matches!(err, WireError::DepthExceeded { max_depth: 2 }));
}

#[test]
fn signature_does_not_count_toward_depth() {
	let opt = EncodeOptions { max_depth: 2 };
	let sig = Signature::new("y").expect("signature");
	let inner = StructValue::new("Inner", vec![Field::new("sig", sig)]);
	let outer = StructValue::new("Outer", vec![Field::new("inner", inner)]);

	let mut enc = Encoder::with_options(Vec::new(), Endianness::Little, opt);
	enc.encode(&Value::from(outer)).expect("signature at the ceiling encodes");
	assert_eq!(enc.into_inner(), hex("01 79 00"));
}

#[test]
fn flush_reaches_buffered_destination() {
	let mut enc = Encoder::new(BufWriter::new(Vec::new()), Endianness::Little);
	enc.encode(&Value::U32(7)).expect("u32");
	enc.flush().expect("flush");
	assert_eq!(enc.get_ref().get_ref(), &hex("07 00 00 00"));
}

#[test]
fn variant_counts_toward_depth() {
	let opt = EncodeOptions { max_depth: 1 };
	let value = Value::from(Array::new(WireType::Variant, vec![Value::from(Variant::new(1_u8).expect("variant"))]));
	let mut enc = Encoder::with_options(Vec::new(), Endianness::Little, opt);

	let err = enc.encode(&value).expect_err("variant below ceiling");
	assert!(matches!(err, WireError::DepthExceeded { max_depth: 1 }));
}

#[test]
fn custom_depth_limit() {
	let opt = EncodeOptions { max_depth: 2 };
	let mut enc = Encoder::with_options(Vec::new(), Endianness::Little, opt);
	enc.encode(&nested_arrays(1)).expect("one nested level fits");
	assert!(matches!(enc.encode(&nested_arrays(2)), Err(WireError::DepthExceeded { max_depth: 2 })));
}

#[test]
#[should_panic(expected = "dict key is not a basic type")]
fn struct_keyed_dict_panics() {
	let key = WireType::Struct(vec![WireType::Int32]);
	let dict = Dict::new(key, WireType::String);
	let _ = to_bytes(&Value::from(dict), Endianness::Little);
}

#[test]
#[should_panic(expected = "array element does not match element type")]
fn heterogeneous_array_panics() {
	let array = Array::new(WireType::Byte, vec![Value::Byte(1), Value::U32(2)]);
	let _ = to_bytes(&Value::from(array), Endianness::Little);
}

#[test]
fn struct_with_only_hidden_fields_writes_padding() {
	let value = StructValue::new("Opaque", vec![Field::private("inner", 1_u32), Field::skipped("tag", "x")]);
	let (bytes, pos) = encode_le(&[Value::Byte(1), Value::from(value)]);

	assert_eq!(bytes, hex("01 00 00 00 00 00 00 00"));
	assert_eq!(pos, 8);
}

#[test]
fn fieldless_struct_cannot_be_boxed() {
	let value = StructValue::new("Opaque", vec![Field::private("inner", 1_u32)]);
	let err = Variant::new(value).expect_err("() has no signature");
	assert!(matches!(err, WireError::InvalidSignature { reason: "empty struct", .. }));
}

#[test]
fn io_failure_is_reported() {
	let mut enc = Encoder::new(FailingWriter::new(2), Endianness::Little);
	let err = enc.encode(&Value::from("AB")).expect_err("sink fails");

	assert!(matches!(err, WireError::Io(_)));
	assert_eq!(enc.get_ref().written, vec![2, 0]);
}

#[test]
fn batch_stops_at_first_error() {
	let values = [Value::U32(1), Value::from(Indirect::null(WireType::Byte)), Value::U32(2)];
	let mut enc = Encoder::new(Vec::new(), Endianness::Little);

	let err = enc.encode_all(&values).expect_err("null stops the batch");
	assert!(matches!(err, WireError::NullIndirection { .. }));
	assert_eq!(enc.position(), 4);
}
