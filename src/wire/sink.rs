use std::io::Write;

use crate::wire::Result;

/// Byte order used for every multi-byte value of one encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
	/// Little-endian byte order (`l` marker).
	Little,
	/// Big-endian byte order (`B` marker).
	Big,
}

impl Endianness {
	/// Byte order of the running host.
	pub fn native() -> Self {
		if cfg!(target_endian = "big") { Self::Big } else { Self::Little }
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}

	/// Marker byte announcing this order in a message header.
	pub fn marker(self) -> u8 {
		match self {
			Self::Little => b'l',
			Self::Big => b'B',
		}
	}

	/// Parse a message header order marker.
	pub fn from_marker(byte: u8) -> Option<Self> {
		match byte {
			b'l' => Some(Self::Little),
			b'B' => Some(Self::Big),
			_ => None,
		}
	}
}

/// Output stream that tracks how many bytes were written since creation.
///
/// The position is the single source of truth for alignment padding. A
/// scratch sink over a fresh `Vec<u8>` starts at logical position 0.
pub struct Sink<W> {
	out: W,
	order: Endianness,
	pos: usize,
}

impl<W: Write> Sink<W> {
	/// Create a sink at position 0.
	pub fn new(out: W, order: Endianness) -> Self {
		Self { out, order, pos: 0 }
	}

	/// Return bytes written so far, padding included.
	pub fn position(&self) -> usize {
		self.pos
	}

	/// Return the configured byte order.
	pub fn order(&self) -> Endianness {
		self.order
	}

	/// Pad with zero bytes up to the next multiple of `n` (1, 2, 4 or 8).
	///
	/// `0` and `1` never pad.
	pub fn align(&mut self, n: usize) -> Result<()> {
		debug_assert!(matches!(n, 0 | 1 | 2 | 4 | 8), "unsupported alignment {n}");
		if n <= 1 {
			return Ok(());
		}
		let rem = self.pos % n;
		if rem == 0 {
			return Ok(());
		}
		const ZEROS: [u8; 8] = [0; 8];
		self.write(&ZEROS[..n - rem])
	}

	/// Write raw bytes and advance the position by their length.
	pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
		self.out.write_all(bytes)?;
		self.pos += bytes.len();
		Ok(())
	}

	/// Write one byte.
	pub fn write_u8(&mut self, value: u8) -> Result<()> {
		self.write(&[value])
	}

	/// Write a `u16` using the configured order.
	pub fn write_u16(&mut self, value: u16) -> Result<()> {
		match self.order {
			Endianness::Little => self.write(&value.to_le_bytes()),
			Endianness::Big => self.write(&value.to_be_bytes()),
		}
	}

	/// Write an `i16` using the configured order.
	pub fn write_i16(&mut self, value: i16) -> Result<()> {
		match self.order {
			Endianness::Little => self.write(&value.to_le_bytes()),
			Endianness::Big => self.write(&value.to_be_bytes()),
		}
	}

	/// Write a `u32` using the configured order.
	pub fn write_u32(&mut self, value: u32) -> Result<()> {
		match self.order {
			Endianness::Little => self.write(&value.to_le_bytes()),
			Endianness::Big => self.write(&value.to_be_bytes()),
		}
	}

	/// Write an `i32` using the configured order.
	pub fn write_i32(&mut self, value: i32) -> Result<()> {
		match self.order {
			Endianness::Little => self.write(&value.to_le_bytes()),
			Endianness::Big => self.write(&value.to_be_bytes()),
		}
	}

	/// Write a `u64` using the configured order.
	pub fn write_u64(&mut self, value: u64) -> Result<()> {
		match self.order {
			Endianness::Little => self.write(&value.to_le_bytes()),
			Endianness::Big => self.write(&value.to_be_bytes()),
		}
	}

	/// Write an `i64` using the configured order.
	pub fn write_i64(&mut self, value: i64) -> Result<()> {
		match self.order {
			Endianness::Little => self.write(&value.to_le_bytes()),
			Endianness::Big => self.write(&value.to_be_bytes()),
		}
	}

	/// Write an IEEE-754 double using the configured order.
	pub fn write_f64(&mut self, value: f64) -> Result<()> {
		self.write_u64(value.to_bits())
	}

	/// Borrow the destination.
	pub fn get_ref(&self) -> &W {
		&self.out
	}

	/// Flush the destination.
	pub fn flush(&mut self) -> Result<()> {
		self.out.flush()?;
		Ok(())
	}

	/// Consume the sink and return the destination.
	pub fn into_inner(self) -> W {
		self.out
	}
}
