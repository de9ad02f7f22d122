use std::fmt;

/// An 8-byte, NUL-padded ASCII name, as used for WAD lump names, flats, and
/// wall/door textures.
#[derive(Clone, Copy, PartialEq, Eq, Hash, bytemuck::AnyBitPattern, bytemuck::NoUninit)]
#[repr(transparent)]
pub struct Id8([u8; 8]);

impl Id8 {
	/// Truncates `s` to 8 bytes and NUL-pads the remainder.
	#[must_use]
	pub fn new(s: &str) -> Self {
		let mut bytes = [0u8; 8];
		let src = s.as_bytes();
		let n = src.len().min(8);
		bytes[..n].copy_from_slice(&src[..n]);
		Self(bytes)
	}

	#[must_use]
	pub fn to_bytes(self) -> [u8; 8] {
		self.0
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		let end = self.0.iter().position(|&b| b == 0).unwrap_or(8);
		std::str::from_utf8(&self.0[..end]).unwrap_or("")
	}
}

impl fmt::Display for Id8 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl fmt::Debug for Id8 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Id8({:?})", self.as_str())
	}
}

impl From<&str> for Id8 {
	fn from(s: &str) -> Self {
		Self::new(s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncates_and_pads() {
		let id = Id8::new("DOORTRAK");
		assert_eq!(id.as_str(), "DOORTRAK");
		let id = Id8::new("-");
		assert_eq!(id.to_bytes(), [b'-', 0, 0, 0, 0, 0, 0, 0]);
		let id = Id8::new("TOOLONGNAME");
		assert_eq!(id.as_str(), "TOOLONGN");
	}
}
