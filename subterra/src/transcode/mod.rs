//! The grid-to-geometry transcoder: the multi-pass algorithm that turns a
//! decompressed [`Grid`] into a populated [`GeometryArena`].
//!
//! A [`CellGrid`] plus a [`GeometryArena`] are threaded explicitly through
//! each pass rather than kept as process-global mutable state, so nothing
//! here depends on call order beyond what each pass documents.

mod door;
mod lines;

use crate::catalog::{AreaInfo, AreaType, Catalog, WallInfo, WallKind};
use crate::error::TranscodeError;
use crate::grid::Grid;
use crate::level::{GeometryArena, SectorSpecial, Thing, NO_SECTOR};

/// The four cardinal sides a tile's square can carry an edge on, in the
/// fixed emission order used throughout Pass 3: right, top, left, bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
	Right,
	Top,
	Left,
	Bottom,
}

impl Side {
	pub(crate) const ALL: [Side; 4] = [Side::Right, Side::Top, Side::Left, Side::Bottom];

	/// The grid offset of the cell this side faces.
	fn offset(self) -> (i32, i32) {
		match self {
			Side::Right => (1, 0),
			Side::Top => (0, -1),
			Side::Left => (-1, 0),
			Side::Bottom => (0, 1),
		}
	}

	/// The grid offset of the "merge partner" neighbour used to extend a
	/// collinear run of edges on this side.
	fn merge_offset(self) -> (i32, i32) {
		match self {
			Side::Right | Side::Left => (0, -1),
			Side::Top | Side::Bottom => (-1, 0),
		}
	}

	/// X-facing sides (top, bottom) use a wall's X texture; Y-facing
	/// (right, left) use Y.
	fn is_x_facing(self) -> bool {
		matches!(self, Side::Top | Side::Bottom)
	}

	/// When a collinear run extends, the forward endpoint overwritten is
	/// `start` for right/top and `end` for left/bottom.
	fn updates_start(self) -> bool {
		matches!(self, Side::Right | Side::Top)
	}

	/// Start/end map-unit vertices for the edge on this side of tile
	/// `(x, y)`. One map tile is a 64x64 unit square; the Y axis is
	/// inverted, so increasing `y` moves towards negative map coordinates.
	fn winding(self, x: u16, y: u16) -> ((i16, i16), (i16, i16)) {
		let x0 = x as i32 * 64;
		let y0 = -(y as i32) * 64;
		let x1 = (x as i32 + 1) * 64;
		let y1 = -(y as i32 + 1) * 64;
		let (start, end) = match self {
			Side::Right => ((x1, y1), (x1, y0)),
			Side::Top => ((x1, y0), (x0, y0)),
			Side::Left => ((x0, y0), (x0, y1)),
			Side::Bottom => ((x0, y1), (x1, y1)),
		};
		((start.0 as i16, start.1 as i16), (end.0 as i16, end.1 as i16))
	}
}

/// Four values, one per [`Side`].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Sides<T> {
	pub right: T,
	pub top: T,
	pub left: T,
	pub bottom: T,
}

impl<T: Copy> Sides<T> {
	fn get(&self, side: Side) -> T {
		match side {
			Side::Right => self.right,
			Side::Top => self.top,
			Side::Left => self.left,
			Side::Bottom => self.bottom,
		}
	}

	fn set(&mut self, side: Side, value: T) {
		match side {
			Side::Right => self.right = value,
			Side::Top => self.top = value,
			Side::Left => self.left = value,
			Side::Bottom => self.bottom = value,
		}
	}
}

/// A cell's resolved classification and transcoding state.
/// Kept `Copy`: cells are small, and the passes repeatedly read a neighbour
/// by value rather than juggle borrows into a `Vec` being mutated elsewhere.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cell<'cat> {
	pub tile: u16,
	pub wall: Option<&'cat WallInfo>,
	pub door: Option<&'cat crate::catalog::DoorInfo>,
	pub area: Option<&'cat AreaInfo>,
	pub secret: bool,
	pub sector: u16,
	pub free: Sides<bool>,
	pub boundary: Sides<bool>,
	pub lines: Sides<Option<u16>>,
}

impl Default for Cell<'_> {
	fn default() -> Self {
		Self {
			tile: 0,
			wall: None,
			door: None,
			area: None,
			secret: false,
			sector: NO_SECTOR,
			free: Sides::default(),
			boundary: Sides::default(),
			lines: Sides::default(),
		}
	}
}

/// Width x height array of [`Cell`] records, owned by the transcoder for the
/// duration of one conversion and dropped after WAD emission.
pub(crate) struct CellGrid<'cat> {
	width: u16,
	height: u16,
	cells: Vec<Cell<'cat>>,
}

impl<'cat> CellGrid<'cat> {
	fn new(width: u16, height: u16) -> Self {
		Self { width, height, cells: vec![Cell::default(); width as usize * height as usize] }
	}

	fn index(&self, x: u16, y: u16) -> usize {
		y as usize * self.width as usize + x as usize
	}

	pub(crate) fn cell(&self, x: u16, y: u16) -> Cell<'cat> {
		self.cells[self.index(x, y)]
	}

	pub(crate) fn set(&mut self, x: u16, y: u16, cell: Cell<'cat>) {
		let i = self.index(x, y);
		self.cells[i] = cell;
	}

	/// Copy of the cell at `(x, y)` if both coordinates are non-negative and
	/// in bounds.
	pub(crate) fn get(&self, x: i32, y: i32) -> Option<Cell<'cat>> {
		if x < 0 || y < 0 || x as u32 >= self.width as u32 || y as u32 >= self.height as u32 {
			None
		} else {
			Some(self.cell(x as u16, y as u16))
		}
	}
}

/// The descending counter reserved for sectors with no stable tile-ID key:
/// doors, pushwall secrets, orphaned ambushes, and door track pockets.
/// Starts at `0xFFFE`; `0xFFFF` is [`NO_SECTOR`], so running past the bottom
/// is a fatal error rather than a silent collision.
pub(crate) struct AnonymousSectors {
	next: u16,
}

impl AnonymousSectors {
	fn new() -> Self {
		Self { next: 0xFFFE }
	}

	fn alloc(&mut self) -> Result<u16, TranscodeError> {
		if self.next == NO_SECTOR {
			return Err(TranscodeError::AnonymousSectorExhausted);
		}
		let id = self.next;
		self.next = self.next.wrapping_sub(1);
		Ok(id)
	}
}

/// Runs all transcoder passes over `catalog` + `grid` and returns the
/// populated [`GeometryArena`].
pub fn transcode(catalog: &Catalog, grid: &Grid) -> Result<GeometryArena, TranscodeError> {
	let mut arena = GeometryArena::new();

	place_things(catalog, grid, &mut arena);

	if grid.walls().is_none() {
		log::debug!("transcode: no walls plane, level has no geometry");
		return Ok(arena);
	}

	let mut cells = CellGrid::new(grid.width, grid.height);
	let mut anon = AnonymousSectors::new();

	assign_sectors(catalog, grid, &mut cells, &mut arena, &mut anon)?;
	log::debug!("transcode: pass 1 complete, {} sector(s)", arena.sectors().len());

	classify_faces(grid, &mut cells);
	log::debug!("transcode: pass 2 complete");

	lines::emit(catalog, grid, &mut cells, &mut arena, &mut anon)?;
	log::info!(
		"transcode: placed {} line(s), {} sector(s)",
		arena.lines().len(),
		arena.sectors().len()
	);

	Ok(arena)
}

/// Places one [`Thing`] per objects-plane cell whose object classifies as a
/// thing marker, tagging it `AMBUSH` if the colocated walls-plane tile is an
/// ambush area.
fn place_things(catalog: &Catalog, grid: &Grid, arena: &mut GeometryArena) {
	let Some(objects) = grid.objects() else { return };

	let mut placed = 0usize;
	for y in 0..grid.height {
		for x in 0..grid.width {
			let pos = grid.index(x, y);
			let Some(object) = catalog.object_info(objects[pos]) else { continue };
			if object.kind != crate::catalog::ObjectType::Thing {
				continue;
			}

			let mut flags = object.flags;
			if let Some(walls) = grid.walls() {
				if catalog.is_ambush(walls[pos]) {
					flags |= crate::catalog::ThingFlagSet::AMBUSH;
				}
			}

			arena.add_thing(Thing {
				x: (x as i32 * 64 + 32) as i16,
				y: (y as i32 * -64 - 32) as i16,
				angle: object.angle,
				ednum: object.ednum,
				flags: flags.bits(),
			});
			placed += 1;
		}
	}

	if placed > 0 {
		log::info!("transcode: placed {placed} thing(s)");
	}
}

/// Pass 1: resolves each cell's classification and assigns it a sector, in
/// row-major order.
fn assign_sectors(
	catalog: &Catalog,
	grid: &Grid,
	cells: &mut CellGrid<'_>,
	arena: &mut GeometryArena,
	anon: &mut AnonymousSectors,
) -> Result<(), TranscodeError> {
	let walls = grid.walls().expect("caller checked walls plane is present");
	let objects = grid.objects();

	for y in 0..grid.height {
		for x in 0..grid.width {
			let pos = grid.index(x, y);
			let tile = walls[pos];
			let wall = catalog.wall_info(tile);
			let door = if wall.is_none() { catalog.door_info(tile) } else { None };
			let is_midtex = wall.is_some_and(|w| w.kind == WallKind::Midtex);
			let area = if (wall.is_none() || is_midtex) && door.is_none() { catalog.area_info(tile) } else { None };
			let secret = objects.is_some_and(|o| catalog.is_pushwall(o[pos]));

			let mut cell = Cell { tile, wall, door, area, secret, ..Cell::default() };

			let key_special = if door.is_some() || secret {
				Some((anon.alloc()?, if secret { SectorSpecial::SECRET } else { SectorSpecial::NORMAL }))
			} else if let Some(w) = wall {
				if w.kind == WallKind::Midtex {
					Some((tile, SectorSpecial::NORMAL))
				} else {
					None
				}
			} else if let Some(a) = area {
				match a.kind {
					AreaType::Slime5 => Some((tile, SectorSpecial::SLIME5)),
					AreaType::Slime10 => Some((tile, SectorSpecial::SLIME10)),
					AreaType::Slime20 => Some((tile, SectorSpecial::SLIME20)),
					AreaType::Ambush => Some(resolve_ambush(catalog, grid, cells, &mut cell, x, y, anon)?),
					AreaType::SecretExit | AreaType::Normal | AreaType::Teleport => Some((tile, SectorSpecial::NORMAL)),
				}
			} else {
				Some((tile, SectorSpecial::NORMAL))
			};

			let Some((key, special)) = key_special else {
				cell.sector = NO_SECTOR;
				cells.set(x, y, cell);
				continue;
			};

			let ceiling_z: i16 = if door.is_some() || secret { 0 } else { 64 };
			let (floor_flat, ceiling_flat) = if let Some(d) = door {
				(d.floor, d.ceiling)
			} else if let Some(a) = cell.area {
				(a.floor, a.ceiling)
			} else {
				(catalog.default_floor, catalog.default_ceiling)
			};
			let brightness = cell.area.map_or(catalog.default_brightness, |a| a.brightness) as u16;
			let tag = door.map_or_else(|| cell.area.map_or(0, |a| a.tag), |d| d.tag);

			cell.sector = arena.add_sector(key, 0, ceiling_z, floor_flat, ceiling_flat, brightness, special, tag);
			cells.set(x, y, cell);
		}
	}

	Ok(())
}

/// The ambush-promotion rule: prefer an already-resolved neighbour to the
/// north, then west; else peek at the raw (not-yet-resolved) tile to the
/// south, then east; else allocate a fresh anonymous sector. The north/west
/// lookups read resolved [`Cell`] records; the south/east lookups read the
/// raw walls-plane tile directly, since row-major order hasn't reached those
/// cells yet. This asymmetry is intentional and preserved rather than
/// "fixed" into a symmetric rule.
fn resolve_ambush(
	catalog: &Catalog,
	grid: &Grid,
	cells: &CellGrid<'_>,
	cell: &mut Cell<'_>,
	x: u16,
	y: u16,
	anon: &mut AnonymousSectors,
) -> Result<(u16, u16), TranscodeError> {
	let north = (y > 0)
		.then(|| cells.cell(x, y - 1))
		.filter(|n| n.wall.is_none() && n.door.is_none());
	let west = (x > 0)
		.then(|| cells.cell(x - 1, y))
		.filter(|n| n.wall.is_none() && n.door.is_none());

	if let Some(host) = north.or(west) {
		cell.tile = host.tile;
		cell.area = host.area;
		return Ok((host.tile, SectorSpecial::NORMAL));
	}

	let walls = grid.walls().expect("caller checked walls plane is present");
	let is_host = |id: u16| catalog.wall_info(id).is_none() && catalog.door_info(id).is_none() && !catalog.is_ambush(id);

	let south_id = (y + 1 < grid.height).then(|| walls[grid.index(x, y + 1)]).filter(|&id| is_host(id));
	let east_id = (x + 1 < grid.width).then(|| walls[grid.index(x + 1, y)]).filter(|&id| is_host(id));

	if let Some(id) = south_id.or(east_id) {
		cell.tile = id;
		cell.area = catalog.area_info(id);
		return Ok((id, SectorSpecial::NORMAL));
	}

	Ok((anon.alloc()?, SectorSpecial::NORMAL))
}

/// Pass 2: computes the four free-face and four sector-boundary booleans
/// for every cell.
fn classify_faces(grid: &Grid, cells: &mut CellGrid<'_>) {
	for y in 0..grid.height {
		for x in 0..grid.width {
			let mut cell = cells.cell(x, y);

			if cell.wall.is_some() {
				for side in Side::ALL {
					let (dx, dy) = side.offset();
					let free = place_free(grid, cells, &cell, x as i32 + dx, y as i32 + dy);
					cell.free.set(side, free);
				}
			}

			if cell.sector != NO_SECTOR {
				for side in Side::ALL {
					let (dx, dy) = side.offset();
					let boundary = !cell.free.get(side) && floor_free(grid, cells, &cell, x as i32 + dx, y as i32 + dy);
					cell.boundary.set(side, boundary);
				}
			}

			cells.set(x, y, cell);
		}
	}
}

/// Whether `(x, y)` is open space relative to `from`, and thus whether
/// `from`'s face on that side needs to be drawn at all. A midtex wall does
/// not block an adjacent midtex wall; a pushwall is passable regardless of
/// its own classification.
fn place_free(grid: &Grid, cells: &CellGrid<'_>, from: &Cell<'_>, x: i32, y: i32) -> bool {
	if !grid.in_bounds(x, y) {
		return false;
	}
	let cell = cells.cell(x as u16, y as u16);

	if cell.door.is_some() {
		return false;
	}
	if let Some(w) = cell.wall {
		let blocks = w.kind != WallKind::Midtex || from.wall.is_some_and(|fw| fw.kind == WallKind::Midtex);
		if blocks && !cell.secret {
			return false;
		}
	}
	true
}

/// Whether `(x, y)` counts as a floor boundary relative to `from`.
fn floor_free(grid: &Grid, cells: &CellGrid<'_>, from: &Cell<'_>, x: i32, y: i32) -> bool {
	if !grid.in_bounds(x, y) {
		return true;
	}
	let cell = cells.cell(x as u16, y as u16);

	if cell.sector != from.sector && cell.sector != NO_SECTOR {
		if from.wall.is_some_and(|w| w.kind == WallKind::Midtex) {
			if cell.wall.is_some_and(|w| w.kind == WallKind::Midtex) {
				return true;
			}
		} else if cell.wall.is_none() && cell.door.is_none() {
			return true;
		}
	}

	false
}

/// The pair-uniformity check used by the collinear merge: true if either
/// position is out of bounds (nothing to compare), else whether the two
/// raw walls-plane tiles match.
pub(crate) fn tiles_match_or_either_oob(grid: &Grid, ax: i32, ay: i32, bx: i32, by: i32) -> bool {
	match (grid.in_bounds(ax, ay), grid.in_bounds(bx, by)) {
		(true, true) => {
			let walls = grid.walls().expect("caller checked walls plane is present");
			walls[grid.index(ax as u16, ay as u16)] == walls[grid.index(bx as u16, by as u16)]
		}
		_ => true,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::level::{LineFlags, LineSpecial};

	#[test]
	fn anonymous_sectors_descend_from_0xfffe() {
		let mut anon = AnonymousSectors::new();
		assert_eq!(anon.alloc().unwrap(), 0xFFFE);
		assert_eq!(anon.alloc().unwrap(), 0xFFFD);
	}

	#[test]
	fn anonymous_sectors_error_before_colliding_with_no_sector() {
		let mut anon = AnonymousSectors { next: 0 };
		assert_eq!(anon.alloc().unwrap(), 0);
		assert!(matches!(anon.alloc(), Err(TranscodeError::AnonymousSectorExhausted)));
	}

	#[test]
	fn sides_get_set_round_trip() {
		let mut sides = Sides::<bool>::default();
		sides.set(Side::Left, true);
		assert!(sides.get(Side::Left));
		assert!(!sides.get(Side::Right));
	}

	#[test]
	fn winding_right_side_matches_table() {
		let (start, end) = Side::Right.winding(1, 1);
		assert_eq!(start, (128, -128));
		assert_eq!(end, (128, -64));
	}

	#[test]
	fn winding_top_side_matches_table() {
		let (start, end) = Side::Top.winding(1, 1);
		assert_eq!(start, (128, -64));
		assert_eq!(end, (64, -64));
	}

	/// An all-floor grid with no distinguishing tile should collapse to one
	/// sector and four merged boundary linedefs, one per grid edge.
	#[test]
	fn empty_level_is_one_sector_with_four_boundary_lines() {
		let catalog = Catalog::test_from_json("{}");
		let grid = Grid::synthetic(4, 4, Some(vec![5; 16]), None);

		let arena = transcode(&catalog, &grid).unwrap();

		assert_eq!(arena.sectors().len(), 1);
		assert_eq!(arena.things().len(), 0);
		assert_eq!(arena.lines().len(), 4);
		for line in arena.lines() {
			assert_eq!(line.flags, LineFlags::TWO_SIDED | LineFlags::BLOCK_SOUND);
			assert_eq!(line.special, LineSpecial::NORMAL);
		}
	}

	/// A single solid wall cell surrounded by floor gets exactly four
	/// textured, one-sided faces, one per cardinal direction, none merged
	/// since it has no same-wall neighbour to extend into.
	#[test]
	fn single_wall_cell_gets_four_blocking_faces() {
		let catalog = Catalog::test_from_json(
			r#"{"walls": [{"id": 2, "name": "Stone", "xtex": "WALL1", "ytex": "WALL1"}]}"#,
		);
		#[rustfmt::skip]
		let walls = vec![
			1, 1, 1,
			1, 2, 1,
			1, 1, 1,
		];
		let grid = Grid::synthetic(3, 3, Some(walls), None);

		let arena = transcode(&catalog, &grid).unwrap();

		assert_eq!(arena.sectors().len(), 1);
		let wall_lines: Vec<_> = arena
			.lines()
			.iter()
			.filter(|l| l.flags == (LineFlags::BLOCKING | LineFlags::UNPEG_LOW) && l.special == LineSpecial::NORMAL)
			.collect();
		assert_eq!(wall_lines.len(), 4);
		for line in &wall_lines {
			let front = &arena.sides()[line.front_side as usize];
			assert_eq!(front.middle.as_str(), "WALL1");
			let back = &arena.sides()[line.back_side as usize];
			assert_eq!(back.middle.as_str(), "-");
		}
	}

	/// A Y-axis door between two rooms synthesizes its own sector plus two
	/// anonymous track sectors, and its two slab faces are the only lines
	/// carrying the door's action special.
	#[test]
	fn y_axis_door_synthesizes_three_sectors_and_two_action_lines() {
		let catalog = Catalog::test_from_json(
			r#"{"doors": [{"id": 90, "type": "normal", "axis": "y", "ltex": "DOORL", "rtex": "DOORR", "track": "DOORTRAK"}]}"#,
		);
		let grid = Grid::synthetic(3, 1, Some(vec![10, 90, 11]), None);

		let arena = transcode(&catalog, &grid).unwrap();

		// Two rooms (keyed by tile 10 and 11) plus the door's own sector and
		// its two anonymous track sectors.
		assert_eq!(arena.sectors().len(), 5);

		let action_lines: Vec<_> = arena
			.lines()
			.iter()
			.filter(|l| l.special == LineSpecial::DOOR && l.flags == LineFlags::TWO_SIDED)
			.collect();
		assert_eq!(action_lines.len(), 2);
	}

	/// An X-axis door is the same three-sector, twelve-incidence shape as the
	/// Y-axis case, rotated 90 degrees: the rooms sit north/south instead of
	/// east/west.
	#[test]
	fn x_axis_door_synthesizes_three_sectors_and_two_action_lines() {
		let catalog = Catalog::test_from_json(
			r#"{"doors": [{"id": 90, "type": "normal", "axis": "x", "ltex": "DOORL", "rtex": "DOORR", "track": "DOORTRAK"}]}"#,
		);
		let grid = Grid::synthetic(1, 3, Some(vec![10, 90, 11]), None);

		let arena = transcode(&catalog, &grid).unwrap();

		assert_eq!(arena.sectors().len(), 5);

		let action_lines: Vec<_> = arena
			.lines()
			.iter()
			.filter(|l| l.special == LineSpecial::DOOR && l.flags == LineFlags::TWO_SIDED)
			.collect();
		assert_eq!(action_lines.len(), 2);
	}

	/// Running the transcoder twice on identical inputs is idempotent: the
	/// same arena shape comes out both times.
	#[test]
	fn transcode_is_idempotent() {
		let catalog = Catalog::test_from_json(
			r#"{"doors": [{"id": 90, "type": "normal", "axis": "y", "ltex": "DOORL", "rtex": "DOORR", "track": "DOORTRAK"}]}"#,
		);
		let grid = Grid::synthetic(3, 1, Some(vec![10, 90, 11]), None);

		let a = transcode(&catalog, &grid).unwrap();
		let b = transcode(&catalog, &grid).unwrap();

		assert_eq!(a.vertices().len(), b.vertices().len());
		assert_eq!(a.lines().len(), b.lines().len());
		assert_eq!(a.sectors().len(), b.sectors().len());
		assert_eq!(a.sector_keys(), b.sector_keys());
	}

	/// The ambush-promotion asymmetry: a resolved neighbour to the west is
	/// adopted even though the matching raw tile to the east would also
	/// qualify, because north/west are checked first and read already-resolved
	/// cells.
	#[test]
	fn ambush_promotion_prefers_resolved_west_neighbour_over_raw_east() {
		let catalog = Catalog::test_from_json(r#"{"areas": [{"id": 100, "type": "ambush"}]}"#);
		// tile 10 (west, already resolved) | 100 (ambush) | 10 (east, raw, same tile)
		let grid = Grid::synthetic(3, 1, Some(vec![10, 100, 10]), None);

		let arena = transcode(&catalog, &grid).unwrap();

		// All three cells share one sector keyed by tile 10; the ambush cell
		// adopts it via the west neighbour rather than allocating a fresh one.
		assert_eq!(arena.sectors().len(), 1);
	}

	/// A pushwall secret cell keeps its own `SECRET` sector, and its faces
	/// carry the secret texture on the back side only, with the front left
	/// blank (the wall retreats inward, so the visible face at rest is the
	/// one away from the passage).
	#[test]
	fn pushwall_cell_is_secret_sector_with_blank_front_faces() {
		let catalog = Catalog::test_from_json(
			r#"{
				"walls": [{"id": 3, "name": "Pushwall", "xtex": "PUSHTEX", "ytex": "PUSHTEX", "back_xtex": "PUSHBACK", "back_ytex": "PUSHBACK"}],
				"objects": [{"id": 50, "type": "pushwall"}]
			}"#,
		);
		#[rustfmt::skip]
		let walls = vec![
			1, 1, 1,
			1, 3, 1,
			1, 1, 1,
		];
		#[rustfmt::skip]
		let objects = vec![
			0, 0, 0,
			0, 50, 0,
			0, 0, 0,
		];
		let grid = Grid::synthetic(3, 3, Some(walls), Some(objects));

		let arena = transcode(&catalog, &grid).unwrap();

		// The room sector plus the pushwall's own anonymous secret sector.
		assert_eq!(arena.sectors().len(), 2);
		let secret_sector = arena.sectors().iter().find(|s| s.special == SectorSpecial::SECRET).unwrap();
		assert_eq!(secret_sector.special, SectorSpecial::SECRET);

		let secret_lines: Vec<_> = arena
			.lines()
			.iter()
			.filter(|l| l.flags == (LineFlags::TWO_SIDED | LineFlags::SECRET) && l.special == LineSpecial::SECRET)
			.collect();
		assert_eq!(secret_lines.len(), 4);
		for line in &secret_lines {
			// A pushwall face lands in the upper texture slot (not middle),
			// and only on the back side: the front is blank since the wall
			// retreats inward, away from the visible passage.
			let front = &arena.sides()[line.front_side as usize];
			assert_eq!(front.upper.as_str(), "-");
			let back = &arena.sides()[line.back_side as usize];
			assert_eq!(back.upper.as_str(), "PUSHBACK");
		}
	}

	/// An exit wall's special depends on what lies across it: the normal
	/// `EXIT` special facing an ordinary room, `SECRET_EXIT` facing a
	/// secret-exit area.
	#[test]
	fn exit_wall_special_depends_on_facing_area() {
		let catalog = Catalog::test_from_json(
			r#"{
				"walls": [{"id": 20, "name": "Exit", "xtex": "EXITDOOR", "xact": "exit"}],
				"areas": [{"id": 11, "type": "secret_exit"}]
			}"#,
		);
		let grid = Grid::synthetic(1, 3, Some(vec![10, 20, 11]), None);

		let arena = transcode(&catalog, &grid).unwrap();

		assert!(arena.lines().iter().any(|l| l.special == LineSpecial::EXIT));
		assert!(arena.lines().iter().any(|l| l.special == LineSpecial::SECRET_EXIT));
	}

	/// A thing placed on an ambush-area floor tile carries the `AMBUSH` bit;
	/// map coordinates are tile-centered (`x*64+32`, inverted-Y `-y*64-32`).
	#[test]
	fn thing_on_ambush_floor_is_flagged() {
		let catalog = Catalog::test_from_json(
			r#"{
				"areas": [{"id": 100, "type": "ambush"}],
				"objects": [{"id": 23, "type": "thing", "ednum": 2015, "angle": 90, "flags": ["easy", "normal", "hard"]}]
			}"#,
		);
		let grid = Grid::synthetic(2, 1, Some(vec![100, 5]), Some(vec![23, 0]));

		let mut arena = GeometryArena::new();
		place_things(&catalog, &grid, &mut arena);

		assert_eq!(arena.things().len(), 1);
		let thing = &arena.things()[0];
		assert_eq!((thing.x, thing.y), (32, -32));
		assert_eq!(thing.flags & crate::catalog::ThingFlagSet::AMBUSH.bits(), crate::catalog::ThingFlagSet::AMBUSH.bits());
	}
}
