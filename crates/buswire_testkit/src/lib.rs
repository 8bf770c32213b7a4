//! Shared test helpers for workspace crates.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Load a JSON fixture under `<workspace>/fixtures`.
pub fn load_json_fixture(name: &str) -> serde_json::Value {
	let path = fixture_path(name);
	let raw = std::fs::read(&path).unwrap_or_else(|err| panic!("read fixture {}: {err}", path.display()));
	serde_json::from_slice(&raw).unwrap_or_else(|err| panic!("parse fixture {}: {err}", path.display()))
}

/// Parse whitespace-separated hex byte pairs such as `"02 00 00 00 41"`.
pub fn hex(input: &str) -> Vec<u8> {
	let digits: String = input.chars().filter(|ch| !ch.is_whitespace()).collect();
	assert!(digits.len() % 2 == 0, "odd number of hex digits in {input:?}");
	(0..digits.len())
		.step_by(2)
		.map(|idx| u8::from_str_radix(&digits[idx..idx + 2], 16).unwrap_or_else(|_| panic!("bad hex pair in {input:?}")))
		.collect()
}

/// Writer that accepts `limit` bytes and then fails every write.
#[derive(Debug, Default)]
pub struct FailingWriter {
	/// Bytes accepted so far.
	pub written: Vec<u8>,
	limit: usize,
}

impl FailingWriter {
	/// Accept up to `limit` bytes.
	pub fn new(limit: usize) -> Self {
		Self { written: Vec::new(), limit }
	}
}

impl Write for FailingWriter {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		let room = self.limit.saturating_sub(self.written.len());
		if room == 0 {
			return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
		}
		let n = room.min(buf.len());
		self.written.extend_from_slice(&buf[..n]);
		Ok(n)
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}
