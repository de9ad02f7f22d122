//! Serialises a populated [`GeometryArena`] into an in-memory PWAD image:
//! fixed-width records written by hand via `byteorder`, since the arena
//! holds owned [`util::Id8`] names rather than `#[repr(C)]` byte arrays and
//! so has no single struct to transmute. The BSP-derived lumps (SEGS,
//! SSECTORS, NODES, REJECT, BLOCKMAP) are emitted as empty placeholders for
//! a later node-builder pass to fill in.

use byteorder::{LittleEndian, WriteBytesExt};
use util::Id8;

use super::GeometryArena;

const NUM_LUMPS: u32 = 11;
const HEADER_LEN: u32 = 12;
const DIR_ENTRY_LEN: u32 = 16;
/// `12 + 11 * 16 = 188`: where the first lump payload begins.
const FIRST_LUMP_OFFSET: u32 = HEADER_LEN + NUM_LUMPS * DIR_ENTRY_LEN;

struct LumpEntry {
	filepos: u32,
	size: u32,
	name: Id8,
}

/// Builds the full PWAD byte image for `level_id` (used to name the `MAPxx`
/// marker lump as `level_id + 1`, zero-padded to two digits).
#[must_use]
pub fn write_wad(arena: &GeometryArena, level_id: u8) -> Vec<u8> {
	let things = encode_things(arena);
	let linedefs = encode_linedefs(arena);
	let sidedefs = encode_sidedefs(arena);
	let vertexes = encode_vertexes(arena);
	let sectors = encode_sectors(arena);

	let things_off = FIRST_LUMP_OFFSET;
	let linedefs_off = things_off + things.len() as u32;
	let sidedefs_off = linedefs_off + linedefs.len() as u32;
	let vertexes_off = sidedefs_off + sidedefs.len() as u32;
	let sectors_off = vertexes_off + vertexes.len() as u32;

	let map_name = Id8::new(&format!("MAP{:02}", level_id as u32 + 1));

	let entries = [
		LumpEntry { filepos: 0, size: 0, name: map_name },
		LumpEntry { filepos: things_off, size: things.len() as u32, name: Id8::new("THINGS") },
		LumpEntry { filepos: linedefs_off, size: linedefs.len() as u32, name: Id8::new("LINEDEFS") },
		LumpEntry { filepos: sidedefs_off, size: sidedefs.len() as u32, name: Id8::new("SIDEDEFS") },
		LumpEntry { filepos: vertexes_off, size: vertexes.len() as u32, name: Id8::new("VERTEXES") },
		LumpEntry { filepos: 0, size: 0, name: Id8::new("SEGS") },
		LumpEntry { filepos: 0, size: 0, name: Id8::new("SSECTORS") },
		LumpEntry { filepos: 0, size: 0, name: Id8::new("NODES") },
		LumpEntry { filepos: sectors_off, size: sectors.len() as u32, name: Id8::new("SECTORS") },
		LumpEntry { filepos: 0, size: 0, name: Id8::new("REJECT") },
		LumpEntry { filepos: 0, size: 0, name: Id8::new("BLOCKMAP") },
	];

	let capacity = sectors_off as usize + sectors.len();
	let mut out = Vec::with_capacity(capacity);

	out.extend_from_slice(b"PWAD");
	out.write_u32::<LittleEndian>(NUM_LUMPS).expect("writes to a Vec never fail");
	out.write_u32::<LittleEndian>(HEADER_LEN).expect("writes to a Vec never fail");

	for entry in &entries {
		out.write_u32::<LittleEndian>(entry.filepos).expect("writes to a Vec never fail");
		out.write_u32::<LittleEndian>(entry.size).expect("writes to a Vec never fail");
		out.extend_from_slice(&entry.name.to_bytes());
	}

	out.extend_from_slice(&things);
	out.extend_from_slice(&linedefs);
	out.extend_from_slice(&sidedefs);
	out.extend_from_slice(&vertexes);
	out.extend_from_slice(&sectors);

	out
}

/// 10 bytes/thing: x, y, angle, ednum, flags.
fn encode_things(arena: &GeometryArena) -> Vec<u8> {
	let mut buf = Vec::with_capacity(arena.things().len() * 10);
	for t in arena.things() {
		buf.write_i16::<LittleEndian>(t.x).expect("writes to a Vec never fail");
		buf.write_i16::<LittleEndian>(t.y).expect("writes to a Vec never fail");
		buf.write_u16::<LittleEndian>(t.angle).expect("writes to a Vec never fail");
		buf.write_u16::<LittleEndian>(t.ednum).expect("writes to a Vec never fail");
		buf.write_u16::<LittleEndian>(t.flags).expect("writes to a Vec never fail");
	}
	buf
}

/// 14 bytes/linedef: start, end, flags, special, tag, front side, back side.
fn encode_linedefs(arena: &GeometryArena) -> Vec<u8> {
	let mut buf = Vec::with_capacity(arena.lines().len() * 14);
	for l in arena.lines() {
		buf.write_u16::<LittleEndian>(l.start).expect("writes to a Vec never fail");
		buf.write_u16::<LittleEndian>(l.end).expect("writes to a Vec never fail");
		buf.write_u16::<LittleEndian>(l.flags.bits()).expect("writes to a Vec never fail");
		buf.write_u16::<LittleEndian>(l.special).expect("writes to a Vec never fail");
		buf.write_u16::<LittleEndian>(l.tag).expect("writes to a Vec never fail");
		buf.write_u16::<LittleEndian>(l.front_side).expect("writes to a Vec never fail");
		buf.write_u16::<LittleEndian>(l.back_side).expect("writes to a Vec never fail");
	}
	buf
}

/// 30 bytes/sidedef: x offset, y offset, upper, lower, middle, sector. The
/// vanilla wire format's texture order is upper/lower/middle, not the
/// upper/middle/lower order the arena's own `Sidedef` struct is declared in
/// (see `arena.rs`'s `SideTex`, which mirrors `add_side`'s argument order
/// instead of the on-disk layout).
fn encode_sidedefs(arena: &GeometryArena) -> Vec<u8> {
	let mut buf = Vec::with_capacity(arena.sides().len() * 30);
	for s in arena.sides() {
		buf.write_i16::<LittleEndian>(s.x_offset).expect("writes to a Vec never fail");
		buf.write_i16::<LittleEndian>(s.y_offset).expect("writes to a Vec never fail");
		buf.extend_from_slice(&s.upper.to_bytes());
		buf.extend_from_slice(&s.lower.to_bytes());
		buf.extend_from_slice(&s.middle.to_bytes());
		buf.write_u16::<LittleEndian>(s.sector).expect("writes to a Vec never fail");
	}
	buf
}

/// 4 bytes/vertex: x, y.
fn encode_vertexes(arena: &GeometryArena) -> Vec<u8> {
	let mut buf = Vec::with_capacity(arena.vertices().len() * 4);
	for v in arena.vertices() {
		buf.write_i16::<LittleEndian>(v.x).expect("writes to a Vec never fail");
		buf.write_i16::<LittleEndian>(v.y).expect("writes to a Vec never fail");
	}
	buf
}

/// 26 bytes/sector: floor height, ceiling height, floor flat, ceiling flat,
/// brightness, special, tag.
fn encode_sectors(arena: &GeometryArena) -> Vec<u8> {
	let mut buf = Vec::with_capacity(arena.sectors().len() * 26);
	for s in arena.sectors() {
		buf.write_i16::<LittleEndian>(s.floor_z).expect("writes to a Vec never fail");
		buf.write_i16::<LittleEndian>(s.ceiling_z).expect("writes to a Vec never fail");
		buf.extend_from_slice(&s.floor_flat.to_bytes());
		buf.extend_from_slice(&s.ceiling_flat.to_bytes());
		buf.write_u16::<LittleEndian>(s.brightness).expect("writes to a Vec never fail");
		buf.write_u16::<LittleEndian>(s.special).expect("writes to a Vec never fail");
		buf.write_u16::<LittleEndian>(s.tag).expect("writes to a Vec never fail");
	}
	buf
}

#[cfg(test)]
mod tests {
	use byteorder::ByteOrder;

	use super::*;
	use crate::level::{LineFlags, SideTex, Thing};

	#[test]
	fn header_and_directory_are_fixed_width() {
		let arena = GeometryArena::new();
		let wad = write_wad(&arena, 0);

		assert_eq!(&wad[0..4], b"PWAD");
		assert_eq!(LittleEndian::read_u32(&wad[4..8]), NUM_LUMPS);
		assert_eq!(LittleEndian::read_u32(&wad[8..12]), HEADER_LEN);
		assert_eq!(wad.len(), FIRST_LUMP_OFFSET as usize, "empty arena emits no payload bytes");
	}

	#[test]
	fn map_name_is_level_id_plus_one_zero_padded() {
		let arena = GeometryArena::new();
		let wad = write_wad(&arena, 0);
		let name = &wad[HEADER_LEN as usize + 8..HEADER_LEN as usize + 16];
		assert_eq!(&name[..5], b"MAP01");
	}

	#[test]
	fn placeholder_lumps_are_zero_size_with_zero_filepos() {
		let arena = GeometryArena::new();
		let wad = write_wad(&arena, 0);

		// SEGS is directory entry index 5 (0-based): MAPxx, THINGS, LINEDEFS,
		// SIDEDEFS, VERTEXES, SEGS.
		let entry_off = (HEADER_LEN + 5 * DIR_ENTRY_LEN) as usize;
		assert_eq!(LittleEndian::read_u32(&wad[entry_off..entry_off + 4]), 0);
		assert_eq!(LittleEndian::read_u32(&wad[entry_off + 4..entry_off + 8]), 0);
	}

	#[test]
	fn payload_offsets_chain_from_188() {
		let mut arena = GeometryArena::new();
		arena.add_thing(Thing { x: 32, y: -32, angle: 0, ednum: 1, flags: 0 });
		let v0 = arena.add_vertex(0, 0);
		let v1 = arena.add_vertex(64, 0);
		arena.add_line(v0, v1, SideTex::BLANK, SideTex::BLANK, 0, super::super::NO_SECTOR, LineFlags::BLOCKING, 0, 0, 0, 0);

		let wad = write_wad(&arena, 0);

		let things_entry = (HEADER_LEN + DIR_ENTRY_LEN) as usize;
		let things_filepos = LittleEndian::read_u32(&wad[things_entry..things_entry + 4]);
		assert_eq!(things_filepos, FIRST_LUMP_OFFSET);

		let linedefs_entry = things_entry + DIR_ENTRY_LEN as usize;
		let linedefs_filepos = LittleEndian::read_u32(&wad[linedefs_entry..linedefs_entry + 4]);
		assert_eq!(linedefs_filepos, FIRST_LUMP_OFFSET + 10);
	}

	#[test]
	fn sidedef_wire_order_is_upper_lower_middle() {
		let mut arena = GeometryArena::new();
		arena.add_side(SideTex { upper: "UP", middle: "MID", lower: "LOW" }, 0, 0, 0);
		let bytes = encode_sidedefs(&arena);
		assert_eq!(&bytes[4..6], b"UP");
		assert_eq!(&bytes[12..15], b"LOW");
		assert_eq!(&bytes[20..23], b"MID");
	}
}
