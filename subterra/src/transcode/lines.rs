//! Pass 3: walks every cell once more and emits the sector-boundary and
//! wall-face linedefs, merging each run of collinear edges that shares a
//! sector pairing into a single linedef instead of one per tile. Door cells
//! are skipped here and handled by [`super::door`] instead.

use crate::catalog::{AreaType, Catalog, WallAction, WallKind};
use crate::error::TranscodeError;
use crate::grid::Grid;
use crate::level::{GeometryArena, LineFlags, LineSpecial, SideTex, NO_SECTOR};

use super::{tiles_match_or_either_oob, Cell, CellGrid, Side};

/// Emits every non-door linedef over the whole grid, then hands off doors
/// to [`super::door::emit`].
pub(super) fn emit(
	catalog: &Catalog,
	grid: &Grid,
	cells: &mut CellGrid<'_>,
	arena: &mut GeometryArena,
	anon: &mut super::AnonymousSectors,
) -> Result<(), TranscodeError> {
	for y in 0..grid.height {
		for x in 0..grid.width {
			let cell = cells.cell(x, y);

			if cell.door.is_some() {
				super::door::emit(catalog, grid, cells, arena, anon, x, y)?;
				continue;
			}

			for side in Side::ALL {
				emit_boundary_side(grid, cells, arena, x, y, side);
			}

			if cell.wall.is_some() {
				for side in Side::ALL {
					emit_wall_side(grid, cells, arena, x, y, side);
				}
			}
		}
	}

	Ok(())
}

/// One `s*` block: a sector-boundary edge facing an open neighbour.
fn emit_boundary_side(grid: &Grid, cells: &mut CellGrid<'_>, arena: &mut GeometryArena, x: u16, y: u16, side: Side) {
	let cell = cells.cell(x, y);
	if !cell.boundary.get(side) {
		return;
	}

	let (ox, oy) = side.offset();
	let (mx, my) = side.merge_offset();
	let partner_pos = (x as i32 + mx, y as i32 + my);

	if let Some(partner) = cells.get(partner_pos.0, partner_pos.1) {
		let uniform = tiles_match_or_either_oob(
			grid,
			x as i32 + ox,
			y as i32 + oy,
			partner_pos.0 + ox,
			partner_pos.1 + oy,
		);
		if partner.boundary.get(side) && partner.sector == cell.sector && uniform {
			if let Some(line) = partner.lines.get(side) {
				extend_edge(arena, cells, x, y, side, line);
				return;
			}
		}
	}

	let (start, end) = side.winding(x, y);
	let v0 = arena.add_vertex(start.0, start.1);
	let v1 = arena.add_vertex(end.0, end.1);

	let neighbor = grid_neighbor_cell(grid, cells, x as i32 + ox, y as i32 + oy);
	let neighbor_sector = neighbor.map_or(NO_SECTOR, |n| n.sector);

	let teleport_tag = cell.area.filter(|a| a.kind == AreaType::Teleport).map(|a| a.tag);
	let special = if teleport_tag.is_some() { LineSpecial::TELEPORT } else { LineSpecial::NORMAL };
	let tag = teleport_tag.unwrap_or(0);

	let line = arena.add_line(
		v0,
		v1,
		SideTex::BLANK,
		SideTex::BLANK,
		neighbor_sector,
		cell.sector,
		LineFlags::TWO_SIDED | LineFlags::BLOCK_SOUND,
		special,
		tag,
		0,
		0,
	);

	let mut updated = cell;
	updated.lines.set(side, Some(line));
	cells.set(x, y, updated);
}

/// One `f*` block: a wall face, textured towards its open neighbour.
fn emit_wall_side(grid: &Grid, cells: &mut CellGrid<'_>, arena: &mut GeometryArena, x: u16, y: u16, side: Side) {
	let cell = cells.cell(x, y);
	if !cell.free.get(side) {
		return;
	}
	let wall = cell.wall.expect("caller checked cell.wall.is_some()");

	let (ox, oy) = side.offset();
	let (mx, my) = side.merge_offset();
	let partner_pos = (x as i32 + mx, y as i32 + my);

	if let Some(partner) = cells.get(partner_pos.0, partner_pos.1) {
		let same_wall = partner.wall.is_some_and(|pw| pw.id == wall.id);
		if same_wall && partner.free.get(side) && partner.sector == cell.sector {
			let uniform = tiles_match_or_either_oob(
				grid,
				x as i32 + ox,
				y as i32 + oy,
				partner_pos.0 + ox,
				partner_pos.1 + oy,
			);
			if uniform {
				if let Some(line) = partner.lines.get(side) {
					extend_edge(arena, cells, x, y, side, line);
					return;
				}
			}
		}
	}

	let (start, end) = side.winding(x, y);
	let v0 = arena.add_vertex(start.0, start.1);
	let v1 = arena.add_vertex(end.0, end.1);

	let neighbor = grid_neighbor_cell(grid, cells, x as i32 + ox, y as i32 + oy);
	let is_midtex = wall.kind == WallKind::Midtex;

	let (tex_facing, back_tex_facing) = if side.is_x_facing() {
		(wall.texture_x, wall.back_texture_x)
	} else {
		(wall.texture_y, wall.back_texture_y)
	};

	// The texture lands in the upper slot for a visible pushwall face, the
	// middle slot otherwise (map.c's four near-identical wall-face blocks).
	// For a pushwall the *back* carries the texture and the front is left
	// blank, since the wall retreats inward when triggered; for an ordinary
	// wall it's the reverse.
	let slot_is_upper = cell.secret && !is_midtex;
	let blank = "-";
	let (front_name, back_name) = if cell.secret { (blank, back_tex_facing.as_str()) } else { (tex_facing.as_str(), blank) };
	let front_tex = if slot_is_upper {
		SideTex { upper: front_name, middle: blank, lower: blank }
	} else {
		SideTex { upper: blank, middle: front_name, lower: blank }
	};
	let back_tex = if slot_is_upper {
		SideTex { upper: back_name, middle: blank, lower: blank }
	} else {
		SideTex { upper: blank, middle: back_name, lower: blank }
	};

	let flags = if is_midtex {
		if cell.secret {
			LineFlags::TWO_SIDED | LineFlags::UNPEG_LOW
		} else {
			LineFlags::TWO_SIDED | LineFlags::UNPEG_LOW | LineFlags::BLOCKING | LineFlags::BLOCK_SOUND
		}
	} else if cell.sector == NO_SECTOR {
		LineFlags::BLOCKING | LineFlags::UNPEG_LOW
	} else {
		LineFlags::TWO_SIDED | LineFlags::SECRET
	};

	let special = if cell.sector == NO_SECTOR {
		let action = if side.is_x_facing() { wall.action_x } else { wall.action_y };
		if action == WallAction::Exit {
			let secret_exit = neighbor.is_some_and(|n| n.area.is_some_and(|a| a.kind == AreaType::SecretExit));
			if secret_exit { LineSpecial::SECRET_EXIT } else { LineSpecial::EXIT }
		} else {
			LineSpecial::NORMAL
		}
	} else if cell.secret && !is_midtex {
		LineSpecial::SECRET
	} else {
		LineSpecial::NORMAL
	};

	let neighbor_sector = neighbor.map_or(NO_SECTOR, |n| n.sector);

	let line = arena.add_line(v0, v1, front_tex, back_tex, neighbor_sector, cell.sector, flags, special, wall.tag, 0, 0);

	let mut updated = cell;
	updated.lines.set(side, Some(line));
	cells.set(x, y, updated);
}

/// Rewrites `line`'s matching endpoint to this cell's own winding vertex
/// and records the (unchanged) linedef index as this cell's edge for
/// `side`.
fn extend_edge(arena: &mut GeometryArena, cells: &mut CellGrid<'_>, x: u16, y: u16, side: Side, line: u16) {
	let (start, end) = side.winding(x, y);
	if side.updates_start() {
		let v = arena.add_vertex(start.0, start.1);
		arena.set_line_start(line, v);
	} else {
		let v = arena.add_vertex(end.0, end.1);
		arena.set_line_end(line, v);
	}

	let mut updated = cells.cell(x, y);
	updated.lines.set(side, Some(line));
	cells.set(x, y, updated);
}

fn grid_neighbor_cell<'cat>(grid: &Grid, cells: &CellGrid<'cat>, x: i32, y: i32) -> Option<Cell<'cat>> {
	if grid.in_bounds(x, y) {
		cells.get(x, y)
	} else {
		None
	}
}
