//! Append-only, index-returning stores for the five Doom-format entity
//! kinds. Each store is a growable `Vec`, scanned linearly for whatever
//! dedup check its entity kind needs. Realistic level sizes (a grid of at
//! most 64x64x3 cells) make the O(N) scan acceptable without a hash index.
//!
//! No method ever returns a reference into these `Vec`s: every insertion
//! can reallocate, so only `u16` indices are handed back. Holding a
//! reference across a later insertion would be a dangling-reference bug.

use util::Id8;

use super::flags::LineFlags;
use super::NO_SECTOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
	pub x: i16,
	pub y: i16,
}

#[derive(Debug, Clone, Copy)]
pub struct Sidedef {
	pub x_offset: i16,
	pub y_offset: i16,
	pub upper: Id8,
	pub middle: Id8,
	pub lower: Id8,
	pub sector: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct Linedef {
	pub start: u16,
	pub end: u16,
	pub flags: LineFlags,
	pub special: u16,
	pub tag: u16,
	pub front_side: u16,
	pub back_side: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct Sector {
	pub floor_z: i16,
	pub ceiling_z: i16,
	pub floor_flat: Id8,
	pub ceiling_flat: Id8,
	pub brightness: u16,
	pub special: u16,
	pub tag: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct Thing {
	pub x: i16,
	pub y: i16,
	pub angle: u16,
	pub ednum: u16,
	pub flags: u16,
}

/// The three texture names a sidedef (or the front/back half of a new
/// linedef) carries. `"-"` is the conventional Doom "no texture" name.
#[derive(Debug, Clone, Copy)]
pub struct SideTex<'a> {
	pub upper: &'a str,
	pub middle: &'a str,
	pub lower: &'a str,
}

impl SideTex<'_> {
	pub const BLANK: SideTex<'static> = SideTex { upper: "-", middle: "-", lower: "-" };
}

#[derive(Debug, Default)]
pub struct GeometryArena {
	vertices: Vec<Vertex>,
	sides: Vec<Sidedef>,
	lines: Vec<Linedef>,
	sectors: Vec<Sector>,
	/// Parallel to `sectors`: the synthetic key each sector was inserted
	/// under, so repeat `add_sector` calls with the same key reuse the
	/// same index.
	sector_keys: Vec<u16>,
	things: Vec<Thing>,
}

impl GeometryArena {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Deduplicates by exact coordinate match.
	pub fn add_vertex(&mut self, x: i16, y: i16) -> u16 {
		if let Some(i) = self.vertices.iter().position(|v| v.x == x && v.y == y) {
			return i as u16;
		}
		self.vertices.push(Vertex { x, y });
		(self.vertices.len() - 1) as u16
	}

	/// Never deduplicated: two linedefs with identical texturing
	/// still need distinct sidedefs, since they may face different ways.
	pub fn add_side(&mut self, tex: SideTex<'_>, sector: u16, x_offset: i16, y_offset: i16) -> u16 {
		self.sides.push(Sidedef {
			x_offset,
			y_offset,
			upper: Id8::new(tex.upper),
			middle: Id8::new(tex.middle),
			lower: Id8::new(tex.lower),
			sector,
		});
		(self.sides.len() - 1) as u16
	}

	/// Deduplicates against any linedef whose `(start, end)` matches
	/// exactly, or whose `(end, start)` matches *and* the existing line's
	/// flags are *exactly* [`LineFlags::TWO_SIDED`] (no other bit set).
	/// That second clause is not "has the two-sided bit"; it is a literal
	/// equality against the full flag word, a narrower rule than it looks,
	/// kept intentionally rather than loosened to a bit test. On a hit, no
	/// new sidedefs are created.
	#[allow(clippy::too_many_arguments)]
	pub fn add_line(
		&mut self,
		start: u16,
		end: u16,
		front_tex: SideTex<'_>,
		back_tex: SideTex<'_>,
		sector: u16,
		back_sector: u16,
		flags: LineFlags,
		special: u16,
		tag: u16,
		x_offset: i16,
		y_offset: i16,
	) -> u16 {
		for (i, line) in self.lines.iter().enumerate() {
			let forward = line.start == start && line.end == end;
			let reversed = line.start == end && line.end == start && line.flags == LineFlags::TWO_SIDED;
			if forward || reversed {
				return i as u16;
			}
		}

		let front_side = self.add_side(front_tex, sector, x_offset, y_offset);
		let back_side = self.add_side(back_tex, back_sector, x_offset, y_offset);
		self.lines.push(Linedef { start, end, flags, special, tag, front_side, back_side });
		(self.lines.len() - 1) as u16
	}

	/// Deduplicates on `key` alone; a repeat key returns the first sector
	/// ever inserted under it regardless of any other parameter
	/// ("first writer wins").
	#[allow(clippy::too_many_arguments)]
	pub fn add_sector(
		&mut self,
		key: u16,
		floor_z: i16,
		ceiling_z: i16,
		floor_flat: Id8,
		ceiling_flat: Id8,
		brightness: u16,
		special: u16,
		tag: u16,
	) -> u16 {
		if let Some(i) = self.sector_keys.iter().position(|&k| k == key) {
			return i as u16;
		}

		self.sectors.push(Sector { floor_z, ceiling_z, floor_flat, ceiling_flat, brightness, special, tag });
		self.sector_keys.push(key);
		(self.sectors.len() - 1) as u16
	}

	pub fn add_thing(&mut self, thing: Thing) -> u16 {
		self.things.push(thing);
		(self.things.len() - 1) as u16
	}

	#[must_use]
	pub fn vertices(&self) -> &[Vertex] {
		&self.vertices
	}

	#[must_use]
	pub fn sides(&self) -> &[Sidedef] {
		&self.sides
	}

	#[must_use]
	pub fn lines(&self) -> &[Linedef] {
		&self.lines
	}

	#[must_use]
	pub fn sectors(&self) -> &[Sector] {
		&self.sectors
	}

	#[must_use]
	pub fn sector_keys(&self) -> &[u16] {
		&self.sector_keys
	}

	#[must_use]
	pub fn things(&self) -> &[Thing] {
		&self.things
	}

	/// Overwrite the start vertex of an already-emitted linedef, used when
	/// extending a collinear run.
	pub fn set_line_start(&mut self, line: u16, vertex: u16) {
		self.lines[line as usize].start = vertex;
	}

	/// Overwrite the end vertex of an already-emitted linedef, used when
	/// extending a collinear run.
	pub fn set_line_end(&mut self, line: u16, vertex: u16) {
		self.lines[line as usize].end = vertex;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn vertex_dedup_is_exact() {
		let mut arena = GeometryArena::new();
		let a = arena.add_vertex(10, 20);
		let b = arena.add_vertex(10, 20);
		let c = arena.add_vertex(10, 21);
		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_eq!(arena.vertices().len(), 2);
	}

	#[test]
	fn side_is_never_deduplicated() {
		let mut arena = GeometryArena::new();
		let a = arena.add_side(SideTex::BLANK, 0, 0, 0);
		let b = arena.add_side(SideTex::BLANK, 0, 0, 0);
		assert_ne!(a, b);
		assert_eq!(arena.sides().len(), 2);
	}

	#[test]
	fn line_dedup_matches_forward_direction() {
		let mut arena = GeometryArena::new();
		let a = arena.add_line(0, 1, SideTex::BLANK, SideTex::BLANK, 0, NO_SECTOR, LineFlags::BLOCKING, 0, 0, 0, 0);
		let b = arena.add_line(0, 1, SideTex::BLANK, SideTex::BLANK, 1, NO_SECTOR, LineFlags::BLOCKING, 0, 0, 0, 0);
		assert_eq!(a, b);
		assert_eq!(arena.lines().len(), 1);
	}

	#[test]
	fn line_dedup_reversed_requires_exact_two_sided_only_flags() {
		let mut arena = GeometryArena::new();
		// Existing line is two-sided only: reversed direction should hit.
		let a = arena.add_line(0, 1, SideTex::BLANK, SideTex::BLANK, 0, 1, LineFlags::TWO_SIDED, 0, 0, 0, 0);
		let b = arena.add_line(1, 0, SideTex::BLANK, SideTex::BLANK, 2, 3, LineFlags::TWO_SIDED, 0, 0, 0, 0);
		assert_eq!(a, b);
		assert_eq!(arena.lines().len(), 1);

		// A second existing line carries an extra flag bit alongside
		// TWO_SIDED: the literal full-bitmask-equality rule means a
		// reversed request must NOT dedup against it.
		let c = arena.add_line(
			5,
			6,
			SideTex::BLANK,
			SideTex::BLANK,
			0,
			1,
			LineFlags::TWO_SIDED | LineFlags::BLOCK_SOUND,
			0,
			0,
			0,
			0,
		);
		let d = arena.add_line(6, 5, SideTex::BLANK, SideTex::BLANK, 2, 3, LineFlags::TWO_SIDED, 0, 0, 0, 0);
		assert_ne!(c, d);
		assert_eq!(arena.lines().len(), 3);
	}

	#[test]
	fn sector_dedup_keeps_first_writer() {
		let mut arena = GeometryArena::new();
		let a = arena.add_sector(42, 0, 64, Id8::new("FLAT1"), Id8::new("CEIL1"), 160, 0, 0);
		let b = arena.add_sector(42, 0, 0, Id8::new("OTHER"), Id8::new("OTHER"), 0, 9, 5);
		assert_eq!(a, b);
		assert_eq!(arena.sectors()[a as usize].floor_flat.as_str(), "FLAT1");
	}

	#[test]
	fn collinear_extension_rewrites_endpoint() {
		let mut arena = GeometryArena::new();
		let v0 = arena.add_vertex(0, 0);
		let v1 = arena.add_vertex(64, 0);
		let line = arena.add_line(v0, v1, SideTex::BLANK, SideTex::BLANK, 0, NO_SECTOR, LineFlags::BLOCKING, 0, 0, 0, 0);
		let v2 = arena.add_vertex(128, 0);
		arena.set_line_end(line, v2);
		assert_eq!(arena.lines()[line as usize].end, v2);
	}
}
