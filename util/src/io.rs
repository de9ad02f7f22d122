use std::io;

use byteorder::{ByteOrder, LittleEndian};

/// Checks for the 4-byte magic number, directory info, and that the file size is
/// as expected given the number of entries. `len` should be the entire WAD's file
/// length, regardless of the length of `bytes`.
pub fn is_valid_wad(bytes: &[u8], len: u64) -> io::Result<bool> {
	if len < 12 {
		return Ok(false);
	}

	match &bytes[0..4] {
		b"IWAD" | b"PWAD" => {}
		_ => {
			return Ok(false);
		}
	};

	let num_entries = LittleEndian::read_i32(&bytes[4..8]);
	let dir_offs = LittleEndian::read_i32(&bytes[8..12]);

	if num_entries < 0 || dir_offs < 0 {
		return Ok(false);
	}

	let expected_dir_len = match num_entries.checked_mul(16) {
		Some(edl) => edl,
		None => {
			return Ok(false);
		}
	};

	let expected_bin_len = match dir_offs.checked_add(expected_dir_len) {
		Some(ebl) => ebl,
		None => {
			return Ok(false);
		}
	};

	Ok(len >= expected_bin_len as u64)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_short_buffers() {
		assert!(!is_valid_wad(b"PWA", 3).unwrap());
	}

	#[test]
	fn accepts_well_formed_header() {
		let mut bytes = vec![0u8; 12];
		bytes[0..4].copy_from_slice(b"PWAD");
		LittleEndian::write_i32(&mut bytes[4..8], 0);
		LittleEndian::write_i32(&mut bytes[8..12], 12);
		assert!(is_valid_wad(&bytes, 12).unwrap());
	}
}
