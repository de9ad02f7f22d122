//! Decompressed Wolfenstein-family map planes: the walls, objects, and misc
//! tile arrays, plus the level name and dimensions.
//!
//! MAPHEAD gives per-level offsets into GAMEMAPS; each of the (up to) three
//! planes there is Carmack-compressed, and that payload is in turn
//! RLEW-compressed.

use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};

use crate::decompress::{decompress_carmack, decompress_rlew};
use crate::error::FormatError;

const MAX_LEVELS: usize = 100;
const LEVEL_NAME_MAX: usize = 16;

/// One decompressed level: up to three tile planes over a shared
/// `width` x `height` grid of 16-bit tile IDs.
#[derive(Debug)]
pub struct Grid {
	pub id: u8,
	pub name: String,
	pub width: u16,
	pub height: u16,
	walls: Option<Vec<u16>>,
	objects: Option<Vec<u16>>,
	misc: Option<Vec<u16>>,
}

impl Grid {
	pub fn load(maphead_path: &Path, gamemaps_path: &Path, level: u8) -> Result<Self, FormatError> {
		if level as usize >= MAX_LEVELS {
			return Err(FormatError::NoSuchLevel(level));
		}

		let maphead = std::fs::read(maphead_path)?;
		let magic = read_u16(&maphead, 0, "MAPHEAD")?;

		let offset_pos = 2 + level as usize * 4;
		let level_offset = read_i32(&maphead, offset_pos, "MAPHEAD")?;
		if level_offset <= 0 {
			return Err(FormatError::NoSuchLevel(level));
		}

		let gamemaps = std::fs::read(gamemaps_path)?;
		if gamemaps.len() < 8 || &gamemaps[0..8] != b"TED5v1.0" {
			return Err(FormatError::BadMagic { expected: "TED5v1.0", file: "GAMEMAPS" });
		}

		let mut pos = level_offset as usize;
		let mut plane_offsets = [0i32; 3];
		for slot in &mut plane_offsets {
			*slot = read_i32(&gamemaps, pos, "GAMEMAPS")?;
			pos += 4;
		}
		let mut plane_sizes = [0u16; 3];
		for slot in &mut plane_sizes {
			*slot = read_u16(&gamemaps, pos, "GAMEMAPS")?;
			pos += 2;
		}
		let width = read_u16(&gamemaps, pos, "GAMEMAPS")?;
		pos += 2;
		let height = read_u16(&gamemaps, pos, "GAMEMAPS")?;
		pos += 2;
		let name_bytes = gamemaps.get(pos..pos + LEVEL_NAME_MAX).ok_or(FormatError::BadMagic {
			expected: "16-byte level name",
			file: "GAMEMAPS",
		})?;
		let name = ascii_nul_terminated(name_bytes);

		let plane_labels: [&'static str; 3] = ["walls", "objects", "misc"];
		let mut planes: [Option<Vec<u16>>; 3] = [None, None, None];
		for i in 0..3 {
			if plane_sizes[i] == 0 {
				continue;
			}
			let start = plane_offsets[i] as usize;
			let end = start + plane_sizes[i] as usize;
			let compressed = gamemaps.get(start..end).ok_or(FormatError::DecompressionOverrun { plane: plane_labels[i] })?;
			let carmack_out = decompress_carmack(compressed, plane_labels[i])?;
			let bytes = decompress_rlew(&carmack_out, magic, plane_labels[i])?;

			let expected_len = width as usize * height as usize * 2;
			if bytes.len() != expected_len {
				return Err(FormatError::MalformedPlane { plane: plane_labels[i] });
			}

			let mut tiles = Vec::with_capacity(width as usize * height as usize);
			for chunk in bytes.chunks_exact(2) {
				tiles.push(LittleEndian::read_u16(chunk));
			}
			planes[i] = Some(tiles);
		}

		let [walls, objects, misc] = planes;
		log::debug!("grid: loaded level {level} ({name}, {width}x{height})");

		Ok(Self { id: level, name, width, height, walls, objects, misc })
	}

	#[must_use]
	pub fn walls(&self) -> Option<&[u16]> {
		self.walls.as_deref()
	}

	#[must_use]
	pub fn objects(&self) -> Option<&[u16]> {
		self.objects.as_deref()
	}

	#[must_use]
	pub fn misc(&self) -> Option<&[u16]> {
		self.misc.as_deref()
	}

	/// Index into any decompressed plane slice at `(x, y)`.
	#[must_use]
	pub fn index(&self, x: u16, y: u16) -> usize {
		y as usize * self.width as usize + x as usize
	}

	#[must_use]
	pub fn in_bounds(&self, x: i32, y: i32) -> bool {
		x >= 0 && y >= 0 && (x as u32) < self.width as u32 && (y as u32) < self.height as u32
	}
}

#[cfg(test)]
impl Grid {
	/// Builds a [`Grid`] directly from already-decompressed planes, for
	/// synthetic fixtures in other modules' tests.
	pub(crate) fn synthetic(width: u16, height: u16, walls: Option<Vec<u16>>, objects: Option<Vec<u16>>) -> Self {
		Self { id: 0, name: "TEST".to_owned(), width, height, walls, objects, misc: None }
	}
}

fn ascii_nul_terminated(bytes: &[u8]) -> String {
	let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
	String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn read_u16(buf: &[u8], pos: usize, file: &'static str) -> Result<u16, FormatError> {
	buf.get(pos..pos + 2)
		.map(LittleEndian::read_u16)
		.ok_or(FormatError::BadMagic { expected: "more bytes", file })
}

fn read_i32(buf: &[u8], pos: usize, file: &'static str) -> Result<i32, FormatError> {
	buf.get(pos..pos + 4)
		.map(LittleEndian::read_i32)
		.ok_or(FormatError::BadMagic { expected: "more bytes", file })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ascii_name_stops_at_nul() {
		let mut bytes = [0u8; LEVEL_NAME_MAX];
		bytes[..4].copy_from_slice(b"E1M1");
		assert_eq!(ascii_nul_terminated(&bytes), "E1M1");
	}

	#[test]
	fn in_bounds_rejects_negative_and_oversized() {
		let grid = Grid { id: 0, name: String::new(), width: 4, height: 4, walls: None, objects: None, misc: None };
		assert!(grid.in_bounds(0, 0));
		assert!(grid.in_bounds(3, 3));
		assert!(!grid.in_bounds(-1, 0));
		assert!(!grid.in_bounds(4, 0));
	}
}
