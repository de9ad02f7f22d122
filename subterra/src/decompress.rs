//! Carmack and RLEW decompression for a single map plane.
//!
//! Carmack coding is a near/far back-reference scheme over 16-bit words; RLEW
//! coding runs on top of that, collapsing repeated words into (count, value)
//! pairs. The pointer-chasing self-copy loops are expressed as bounds-checked
//! index walks: running past the declared output size is reported as
//! [`FormatError::DecompressionOverrun`] instead of reading whatever bytes
//! happen to follow the buffer.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::FormatError;

const CARMACK_NEAR: u8 = 0xA7;
const CARMACK_FAR: u8 = 0xA8;

fn read_u16le(buf: &[u8], pos: usize, plane: &'static str) -> Result<u16, FormatError> {
	buf.get(pos..pos + 2)
		.map(LittleEndian::read_u16)
		.ok_or(FormatError::DecompressionOverrun { plane })
}

/// Expands a Carmack-compressed plane. The first two bytes of `input` give
/// the decompressed byte length; the remainder is the token stream.
pub fn decompress_carmack(input: &[u8], plane: &'static str) -> Result<Vec<u8>, FormatError> {
	let target_len = read_u16le(input, 0, plane)? as usize;
	let mut out = Vec::with_capacity(target_len);
	let mut pos = 2usize;

	while out.len() < target_len {
		let length = *input.get(pos).ok_or(FormatError::DecompressionOverrun { plane })?;
		pos += 1;
		let tag = *input.get(pos).ok_or(FormatError::DecompressionOverrun { plane })?;

		if length == 0 && (tag == CARMACK_NEAR || tag == CARMACK_FAR) {
			let next = *input.get(pos + 1).ok_or(FormatError::DecompressionOverrun { plane })?;
			out.push(next);
			out.push(tag);
			pos += 2;
			continue;
		}

		let copy_start = if tag == CARMACK_NEAR {
			let distance = *input.get(pos + 1).ok_or(FormatError::DecompressionOverrun { plane })? as usize;
			pos += 2;
			out.len().checked_sub(distance * 2).ok_or(FormatError::DecompressionOverrun { plane })?
		} else if tag == CARMACK_FAR {
			let offset = read_u16le(input, pos + 1, plane)? as usize;
			pos += 3;
			offset * 2
		} else {
			out.push(length);
			out.push(tag);
			pos += 1;
			continue;
		};

		if out.len() + (length as usize) * 2 > target_len {
			return Err(FormatError::DecompressionOverrun { plane });
		}

		let mut copy_pos = copy_start;
		for _ in 0..length {
			let lo = *out.get(copy_pos).ok_or(FormatError::DecompressionOverrun { plane })?;
			let hi = *out.get(copy_pos + 1).ok_or(FormatError::DecompressionOverrun { plane })?;
			out.push(lo);
			out.push(hi);
			copy_pos += 2;
		}
	}

	Ok(out)
}

/// Expands an RLEW-compressed buffer. The first two bytes give the
/// decompressed byte length; `magic` is the RLEW marker read from the start
/// of MAPHEAD.
pub fn decompress_rlew(input: &[u8], magic: u16, plane: &'static str) -> Result<Vec<u8>, FormatError> {
	let target_len = read_u16le(input, 0, plane)? as usize;
	let mut out = Vec::with_capacity(target_len);
	let mut pos = 2usize;

	while out.len() < target_len {
		let word = read_u16le(input, pos, plane)?;
		if word != magic {
			out.push(input[pos]);
			out.push(input[pos + 1]);
			pos += 2;
		} else {
			let count = read_u16le(input, pos + 2, plane)?;
			let value = read_u16le(input, pos + 4, plane)?;
			pos += 6;
			let bytes = value.to_le_bytes();
			for _ in 0..count {
				out.push(bytes[0]);
				out.push(bytes[1]);
			}
		}
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn carmack_literal_pairs_round_trip() {
		// length=0x02 (not a NEAR/FAR tag) followed by one byte: a "literal
		// pair" token that emits (length, byte) verbatim, twice.
		let input = [4, 0, 0x02, 0xAA, 0x02, 0xBB];
		let out = decompress_carmack(&input, "test").unwrap();
		assert_eq!(out, vec![0x02, 0xAA, 0x02, 0xBB]);
	}

	#[test]
	fn carmack_near_pointer_repeats_recent_output() {
		// Two literal pairs establish 4 bytes of output, then a near
		// pointer token repeats the most recent 2-byte pair once.
		let input = [6, 0, 0x02, 0x11, 0x02, 0x22, 1, CARMACK_NEAR, 1];
		let out = decompress_carmack(&input, "test").unwrap();
		assert_eq!(out, vec![0x02, 0x11, 0x02, 0x22, 0x02, 0x22]);
	}

	#[test]
	fn carmack_overrun_is_an_error() {
		let input = [10, 0, 1, CARMACK_NEAR, 50];
		assert!(matches!(
			decompress_carmack(&input, "test"),
			Err(FormatError::DecompressionOverrun { .. })
		));
	}

	#[test]
	fn rlew_expands_runs() {
		const MAGIC: u16 = 0xABCD;
		let magic_bytes = MAGIC.to_le_bytes();
		let mut input = vec![8, 0]; // 8 decompressed bytes = 4 u16 tiles
		input.extend_from_slice(&magic_bytes);
		input.extend_from_slice(&4u16.to_le_bytes()); // run count
		input.extend_from_slice(&0x1234u16.to_le_bytes()); // run value
		let out = decompress_rlew(&input, MAGIC, "test").unwrap();
		assert_eq!(out, vec![0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12]);
	}

	#[test]
	fn rlew_passes_through_non_magic_words() {
		const MAGIC: u16 = 0xABCD;
		let input = vec![2, 0, 0x11, 0x22];
		let out = decompress_rlew(&input, MAGIC, "test").unwrap();
		assert_eq!(out, vec![0x11, 0x22]);
	}
}
