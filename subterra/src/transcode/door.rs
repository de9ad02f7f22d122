//! Door synthesis: expands one door cell into two anonymous "track" sectors
//! plus the ten linedefs that frame, face, and cap the slab. The Y-axis and
//! X-axis branches build the same geometry rotated 90 degrees; kept as two
//! explicit branches rather than unified into one parameterized routine, so
//! the vertex layout for each axis stays readable end to end.
//!
//! Ten *unique* linedefs are built, two of which (the slab faces) are
//! shared (two-sided) between the door sector and a track sector. Counted
//! as sector incidences rather than unique lines, that is 3 sectors x 4
//! bounding edges each = 12 incident linedefs total.

use crate::catalog::{Catalog, DoorAxis};
use crate::error::TranscodeError;
use crate::grid::Grid;
use crate::level::{GeometryArena, LineFlags, SectorSpecial, SideTex, NO_SECTOR};

use super::{AnonymousSectors, CellGrid};

pub(super) fn emit(
	catalog: &Catalog,
	grid: &Grid,
	cells: &mut CellGrid<'_>,
	arena: &mut GeometryArena,
	anon: &mut AnonymousSectors,
	x: u16,
	y: u16,
) -> Result<(), TranscodeError> {
	let cell = cells.cell(x, y);
	let door = cell.door.expect("caller checked cell.door.is_some()");

	let ltrack = arena.add_sector(
		anon.alloc()?,
		0,
		64,
		catalog.default_floor,
		catalog.default_ceiling,
		catalog.default_brightness as u16,
		SectorSpecial::NORMAL,
		0,
	);
	let rtrack = arena.add_sector(
		anon.alloc()?,
		0,
		64,
		catalog.default_floor,
		catalog.default_ceiling,
		catalog.default_brightness as u16,
		SectorSpecial::NORMAL,
		0,
	);

	let action = door.kind.action();
	let blank = "-";

	match door.axis {
		DoorAxis::Y => {
			let x0 = x as i32 * 64;
			let x1 = x0 + 64;
			let xa = x0 + 29;
			let xb = x0 + 35;
			let y0 = -(y as i32) * 64;
			let y1 = y0 - 64;

			let west_sector = neighbor_sector(cells, x as i32 - 1, y as i32);
			let east_sector = neighbor_sector(cells, x as i32 + 1, y as i32);

			// Entrances.
			let v_x0y0 = arena.add_vertex(x0 as i16, y0 as i16);
			let v_x0y1 = arena.add_vertex(x0 as i16, y1 as i16);
			arena.add_line(v_x0y0, v_x0y1, SideTex::BLANK, SideTex::BLANK, west_sector, ltrack, LineFlags::TWO_SIDED, 0, 0, 0, 0);

			let v_x1y1 = arena.add_vertex(x1 as i16, y1 as i16);
			let v_x1y0 = arena.add_vertex(x1 as i16, y0 as i16);
			arena.add_line(v_x1y1, v_x1y0, SideTex::BLANK, SideTex::BLANK, east_sector, rtrack, LineFlags::TWO_SIDED, 0, 0, 0, 0);

			// North/south track stubs flanking the slab.
			let v_xay0 = arena.add_vertex(xa as i16, y0 as i16);
			let v_xby0 = arena.add_vertex(xb as i16, y0 as i16);
			let v_xay1 = arena.add_vertex(xa as i16, y1 as i16);
			let v_xby1 = arena.add_vertex(xb as i16, y1 as i16);

			let track_tex = SideTex { upper: blank, middle: door.track.as_str(), lower: blank };
			arena.add_line(v_x0y0, v_xay0, track_tex, SideTex::BLANK, ltrack, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 0, 0);
			arena.add_line(v_xby0, v_x1y0, track_tex, SideTex::BLANK, rtrack, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 35, 0);
			arena.add_line(v_x1y1, v_xby1, track_tex, SideTex::BLANK, rtrack, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 0, 0);
			arena.add_line(v_xay1, v_x0y1, track_tex, SideTex::BLANK, ltrack, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 35, 0);

			// The slab's two faces: the actual moving door.
			let left_tex = SideTex { upper: door.side_left.as_str(), middle: blank, lower: blank };
			let right_tex = SideTex { upper: door.side_right.as_str(), middle: blank, lower: blank };
			arena.add_line(v_xay0, v_xay1, left_tex, SideTex::BLANK, ltrack, cell.sector, LineFlags::TWO_SIDED, action, 0, 0, 0);
			arena.add_line(v_xby1, v_xby0, right_tex, SideTex::BLANK, rtrack, cell.sector, LineFlags::TWO_SIDED, action, 0, 0, 0);

			// Caps: the door sector's own north/south header.
			arena.add_line(v_xay0, v_xby0, track_tex, SideTex::BLANK, cell.sector, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 29, 0);
			arena.add_line(v_xby1, v_xay1, track_tex, SideTex::BLANK, cell.sector, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 29, 0);
		}
		DoorAxis::X => {
			let y0 = -(y as i32) * 64;
			let y1 = y0 - 64;
			let ya = y0 - 29;
			let yb = y0 - 35;
			let x0 = x as i32 * 64;
			let x1 = x0 + 64;

			let north_sector = neighbor_sector(cells, x as i32, y as i32 - 1);
			let south_sector = neighbor_sector(cells, x as i32, y as i32 + 1);

			// Entrances.
			let v_x1y0 = arena.add_vertex(x1 as i16, y0 as i16);
			let v_x0y0 = arena.add_vertex(x0 as i16, y0 as i16);
			arena.add_line(v_x1y0, v_x0y0, SideTex::BLANK, SideTex::BLANK, north_sector, ltrack, LineFlags::TWO_SIDED, 0, 0, 0, 0);

			let v_x0y1 = arena.add_vertex(x0 as i16, y1 as i16);
			let v_x1y1 = arena.add_vertex(x1 as i16, y1 as i16);
			arena.add_line(v_x0y1, v_x1y1, SideTex::BLANK, SideTex::BLANK, south_sector, rtrack, LineFlags::TWO_SIDED, 0, 0, 0, 0);

			// East/west track stubs flanking the slab.
			let v_x0ya = arena.add_vertex(x0 as i16, ya as i16);
			let v_x0yb = arena.add_vertex(x0 as i16, yb as i16);
			let v_x1ya = arena.add_vertex(x1 as i16, ya as i16);
			let v_x1yb = arena.add_vertex(x1 as i16, yb as i16);

			let track_tex = SideTex { upper: blank, middle: door.track.as_str(), lower: blank };
			arena.add_line(v_x0y1, v_x0yb, track_tex, SideTex::BLANK, rtrack, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 0, 0);
			arena.add_line(v_x0ya, v_x0y0, track_tex, SideTex::BLANK, ltrack, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 35, 0);
			arena.add_line(v_x1yb, v_x1y1, track_tex, SideTex::BLANK, rtrack, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 35, 0);
			arena.add_line(v_x1y0, v_x1ya, track_tex, SideTex::BLANK, ltrack, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 0, 0);

			// The slab's two faces: the actual moving door. Unlike the Y
			// axis, the left track carries the right-facing texture and
			// vice versa. The original preserves this asymmetry rather
			// than mirroring the Y-axis assignment.
			let left_tex = SideTex { upper: door.side_left.as_str(), middle: blank, lower: blank };
			let right_tex = SideTex { upper: door.side_right.as_str(), middle: blank, lower: blank };
			arena.add_line(v_x1ya, v_x0ya, right_tex, SideTex::BLANK, ltrack, cell.sector, LineFlags::TWO_SIDED, action, 0, 0, 0);
			arena.add_line(v_x0yb, v_x1yb, left_tex, SideTex::BLANK, rtrack, cell.sector, LineFlags::TWO_SIDED, action, 0, 0, 0);

			// Caps: the door sector's own west/east header.
			arena.add_line(v_x0yb, v_x0ya, track_tex, SideTex::BLANK, cell.sector, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 29, 0);
			arena.add_line(v_x1ya, v_x1yb, track_tex, SideTex::BLANK, cell.sector, NO_SECTOR, LineFlags::BLOCKING | LineFlags::UNPEG_LOW, 0, 0, 29, 0);
		}
	}

	Ok(())
}

fn neighbor_sector(cells: &CellGrid<'_>, x: i32, y: i32) -> u16 {
	cells.get(x, y).map_or(NO_SECTOR, |c| c.sector)
}
