use serde::Serialize;

/// Print a value as pretty JSON on stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to render json: {err}"),
	}
}

/// Render bytes as lowercase hex pairs separated by spaces.
pub(crate) fn hex_string(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len() * 3);
	for (idx, byte) in bytes.iter().enumerate() {
		if idx > 0 {
			out.push(' ');
		}
		out.push_str(&format!("{byte:02x}"));
	}
	out
}

/// Render bytes as offset-prefixed rows of 16.
pub(crate) fn hex_dump(bytes: &[u8]) -> String {
	let mut out = String::new();
	for (row, chunk) in bytes.chunks(16).enumerate() {
		out.push_str(&format!("{:08x}  {}\n", row * 16, hex_string(chunk)));
	}
	out
}
