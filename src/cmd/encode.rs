use std::io::Write;

use buswire::wire::{EncodeOptions, Encoder, Endianness, MAX_DEPTH, Result, Signature, Value, WireError};

use crate::cmd::json::to_value;
use crate::cmd::util::{emit_json, hex_dump, hex_string};

#[derive(clap::Args)]
pub struct Args {
	/// Signature of the values to encode, e.g. `a{sv}` or `su`.
	pub signature: String,
	/// JSON document; an array with one item per type when the signature holds several.
	#[arg(allow_hyphen_values = true)]
	pub json: String,
	#[arg(long = "big-endian")]
	pub big_endian: bool,
	#[arg(long = "max-depth", default_value_t = MAX_DEPTH)]
	pub max_depth: u32,
	/// Write the encoded bytes to stdout unchanged.
	#[arg(long, conflicts_with = "json_output")]
	pub raw: bool,
	#[arg(long = "json", id = "json_output")]
	pub json_output: bool,
}

#[derive(serde::Serialize)]
struct EncodeJson {
	signature: String,
	endianness: &'static str,
	length: usize,
	hex: String,
}

/// Encode a signature-typed JSON document and print the wire bytes.
pub fn run(args: Args) -> Result<()> {
	let Args {
		signature,
		json,
		big_endian,
		max_depth,
		raw,
		json_output,
	} = args;

	let signature = Signature::new(signature)?;
	let document: serde_json::Value = serde_json::from_str(&json).map_err(|err| WireError::JsonMismatch {
		expected: format!("json document ({err})"),
		got: "unparsable text",
	})?;
	let values = values_for_signature(&signature, &document)?;
	for value in &values {
		value.check()?;
	}

	let order = if big_endian { Endianness::Big } else { Endianness::Little };
	let bytes = encode_values(&values, order, EncodeOptions { max_depth })?;
	tracing::debug!(signature = %signature, len = bytes.len(), "encoded");

	if raw {
		let mut stdout = std::io::stdout().lock();
		stdout.write_all(&bytes)?;
		stdout.flush()?;
	} else if json_output {
		emit_json(&EncodeJson {
			signature: signature.to_string(),
			endianness: order.as_str(),
			length: bytes.len(),
			hex: hex_string(&bytes),
		});
	} else {
		print!("{}", hex_dump(&bytes));
	}
	Ok(())
}

fn values_for_signature(signature: &Signature, document: &serde_json::Value) -> Result<Vec<Value>> {
	if let Some(ty) = signature.single() {
		return Ok(vec![to_value(ty, document)?]);
	}

	let items = document.as_array().ok_or(WireError::JsonMismatch {
		expected: format!("array of {} values", signature.types().len()),
		got: "non-array document",
	})?;
	if items.len() != signature.types().len() {
		return Err(WireError::JsonMismatch {
			expected: format!("array of {} values", signature.types().len()),
			got: "array of different length",
		});
	}
	signature.types().iter().zip(items).map(|(ty, item)| to_value(ty, item)).collect()
}

fn encode_values(values: &[Value], order: Endianness, opt: EncodeOptions) -> Result<Vec<u8>> {
	let mut encoder = Encoder::with_options(Vec::new(), order, opt);
	encoder.encode_all(values)?;
	Ok(encoder.into_inner())
}
