use buswire::wire::{Array, Dict, Field, ObjectPath, Result, Signature, StructValue, UnixFdIndex, Value, Variant, WireError, WireType};
use serde_json::Value as Json;

/// Convert a JSON document into a value of wire type `ty`.
///
/// Structs are JSON arrays with one item per field. Dictionaries are JSON
/// objects (keys parsed into the key type, emitted in key order) or arrays of
/// `[key, value]` pairs. Variants are `{"signature": "...", "value": ...}`.
pub(crate) fn to_value(ty: &WireType, json: &Json) -> Result<Value> {
	match ty {
		WireType::Byte => Ok(Value::Byte(unsigned(json, "byte", u64::from(u8::MAX))? as u8)),
		WireType::UInt16 => Ok(Value::U16(unsigned(json, "uint16", u64::from(u16::MAX))? as u16)),
		WireType::UInt32 => Ok(Value::U32(unsigned(json, "uint32", u64::from(u32::MAX))? as u32)),
		WireType::UnixFd => Ok(Value::UnixFd(UnixFdIndex(unsigned(json, "unix_fd", u64::from(u32::MAX))? as u32))),
		WireType::UInt64 => Ok(Value::U64(unsigned(json, "uint64", u64::MAX)?)),
		WireType::Int16 => Ok(Value::I16(signed(json, "int16", i64::from(i16::MIN), i64::from(i16::MAX))? as i16)),
		WireType::Int32 => Ok(Value::I32(signed(json, "int32", i64::from(i32::MIN), i64::from(i32::MAX))? as i32)),
		WireType::Int64 => Ok(Value::I64(signed(json, "int64", i64::MIN, i64::MAX)?)),
		WireType::Double => json.as_f64().map(Value::F64).ok_or_else(|| mismatch(ty, json)),
		WireType::Boolean => json.as_bool().map(Value::Bool).ok_or_else(|| mismatch(ty, json)),
		WireType::String => Ok(Value::String(text(ty, json)?.to_owned())),
		WireType::ObjectPath => Ok(Value::ObjectPath(ObjectPath::new(text(ty, json)?)?)),
		WireType::Signature => Ok(Value::Signature(Signature::new(text(ty, json)?)?)),
		WireType::Variant => variant(json),
		WireType::Array(elem) => {
			let items = json.as_array().ok_or_else(|| mismatch(ty, json))?;
			let items = items.iter().map(|item| to_value(elem, item)).collect::<Result<Vec<_>>>()?;
			Ok(Value::Array(Array::new((**elem).clone(), items)))
		}
		WireType::Struct(fields) => {
			let items = json.as_array().ok_or_else(|| mismatch(ty, json))?;
			if items.len() != fields.len() {
				return Err(WireError::JsonMismatch {
					expected: format!("{ty} with {} fields", fields.len()),
					got: "array of different length",
				});
			}
			let fields = fields
				.iter()
				.zip(items)
				.enumerate()
				.map(|(idx, (field_ty, item))| Ok(Field::new(&format!("_{idx}"), to_value(field_ty, item)?)))
				.collect::<Result<Vec<_>>>()?;
			Ok(Value::Struct(StructValue::new("struct", fields)))
		}
		WireType::Dict(key, value) => dict(ty, key, value, json),
	}
}

fn variant(json: &Json) -> Result<Value> {
	let expected = || WireError::JsonMismatch {
		expected: "{\"signature\": ..., \"value\": ...}".to_owned(),
		got: kind(json),
	};
	let object = json.as_object().ok_or_else(expected)?;
	let signature = object.get("signature").and_then(Json::as_str).ok_or_else(expected)?;
	let inner = object.get("value").ok_or_else(expected)?;

	let signature = Signature::new(signature)?;
	let Some(inner_ty) = signature.single() else {
		return Err(WireError::InvalidSignature {
			signature: signature.to_string(),
			reason: "variant needs exactly one complete type",
		});
	};
	Ok(Value::from(Variant::new(to_value(inner_ty, inner)?)?))
}

fn dict(ty: &WireType, key: &WireType, value: &WireType, json: &Json) -> Result<Value> {
	let mut out = Dict::new(key.clone(), value.clone());
	match json {
		Json::Object(map) => {
			for (raw_key, raw_value) in map {
				out.insert(key_from_str(key, raw_key)?, to_value(value, raw_value)?);
			}
		}
		Json::Array(pairs) => {
			for pair in pairs {
				let Some([raw_key, raw_value]) = pair.as_array().map(Vec::as_slice) else {
					return Err(WireError::JsonMismatch {
						expected: "[key, value] pair".to_owned(),
						got: kind(pair),
					});
				};
				out.insert(to_value(key, raw_key)?, to_value(value, raw_value)?);
			}
		}
		other => return Err(mismatch(ty, other)),
	}
	Ok(Value::Dict(out))
}

/// Object keys are always JSON strings; reinterpret them for non-string key types.
fn key_from_str(key: &WireType, raw: &str) -> Result<Value> {
	match key {
		WireType::String | WireType::ObjectPath | WireType::Signature => to_value(key, &Json::String(raw.to_owned())),
		_ => {
			let parsed: Json = serde_json::from_str(raw).map_err(|_| WireError::JsonMismatch {
				expected: format!("{key} key"),
				got: "unparsable object key",
			})?;
			to_value(key, &parsed)
		}
	}
}

fn unsigned(json: &Json, ty: &'static str, max: u64) -> Result<u64> {
	let number = json.as_u64().ok_or_else(|| number_error(json, ty))?;
	if number > max {
		return Err(WireError::IntegerOutOfRange { ty, value: number.to_string() });
	}
	Ok(number)
}

fn signed(json: &Json, ty: &'static str, min: i64, max: i64) -> Result<i64> {
	let number = json.as_i64().ok_or_else(|| number_error(json, ty))?;
	if number < min || number > max {
		return Err(WireError::IntegerOutOfRange { ty, value: number.to_string() });
	}
	Ok(number)
}

fn number_error(json: &Json, ty: &'static str) -> WireError {
	match json {
		Json::Number(number) => WireError::IntegerOutOfRange { ty, value: number.to_string() },
		other => WireError::JsonMismatch {
			expected: ty.to_owned(),
			got: kind(other),
		},
	}
}

fn text<'a>(ty: &WireType, json: &'a Json) -> Result<&'a str> {
	json.as_str().ok_or_else(|| mismatch(ty, json))
}

fn mismatch(ty: &WireType, json: &Json) -> WireError {
	WireError::JsonMismatch {
		expected: ty.to_string(),
		got: kind(json),
	}
}

fn kind(json: &Json) -> &'static str {
	match json {
		Json::Null => "null",
		Json::Bool(_) => "bool",
		Json::Number(_) => "number",
		Json::String(_) => "string",
		Json::Array(_) => "array",
		Json::Object(_) => "object",
	}
}
