//! In-memory lookup tables keyed by tile ID: walls, doors, areas, objects,
//! plus the handful of global defaults every other table falls back on.
//!
//! The on-disk shape is a plain JSON array of entries with an explicit `id`
//! field per table, rather than an object keyed by stringified ID, which is
//! more idiomatic for `serde` and easier to validate up front.

use std::path::Path;

use serde::Deserialize;
use util::Id8;

use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
	Doom,
	Boom,
	Mbf,
	Mbf21,
}

impl MapFormat {
	fn parse(s: Option<&str>) -> Self {
		match s {
			Some("doom") => Self::Doom,
			Some("boom") => Self::Boom,
			Some("mbf") => Self::Mbf,
			_ => Self::Mbf21,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallKind {
	Solid,
	Midtex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallAction {
	None,
	Switch,
	Exit,
}

impl WallAction {
	fn parse(s: Option<&str>) -> Self {
		match s {
			Some("switch") => Self::Switch,
			Some("exit") => Self::Exit,
			_ => Self::None,
		}
	}
}

#[derive(Debug, Clone)]
pub struct WallInfo {
	pub id: u16,
	pub name: String,
	pub kind: WallKind,
	pub texture_x: Id8,
	pub texture_y: Id8,
	/// Only meaningful for a pushwall; textured on the side facing *away*
	/// from the secret passage: the outside face is textured and the front
	/// left blank, since the wall retreats inward when triggered.
	pub back_texture_x: Id8,
	pub back_texture_y: Id8,
	pub action_x: WallAction,
	pub action_y: WallAction,
	pub tag: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorType {
	Normal,
	Fast,
	Switch,
	Red,
	Yellow,
	Blue,
	RedCard,
	YellowCard,
	BlueCard,
	RedSkull,
	YellowSkull,
	BlueSkull,
}

impl DoorType {
	fn parse(s: Option<&str>) -> Self {
		match s {
			Some("fast") => Self::Fast,
			Some("switch") => Self::Switch,
			Some("red") => Self::Red,
			Some("yellow") => Self::Yellow,
			Some("blue") => Self::Blue,
			Some("red_card") => Self::RedCard,
			Some("yellow_card") => Self::YellowCard,
			Some("blue_card") => Self::BlueCard,
			Some("red_skull") => Self::RedSkull,
			Some("yellow_skull") => Self::YellowSkull,
			Some("blue_skull") => Self::BlueSkull,
			_ => Self::Normal,
		}
	}

	/// The LT_DOOR* special assigned to both door linedefs.
	#[must_use]
	pub fn action(self) -> u16 {
		use crate::level::LineSpecial as LS;
		match self {
			Self::Normal | Self::Switch => LS::DOOR,
			Self::Fast => LS::DOOR_FAST,
			Self::Red => LS::DOOR_RED,
			Self::Yellow => LS::DOOR_YELLOW,
			Self::Blue => LS::DOOR_BLUE,
			Self::RedCard => LS::DOOR_RED_CARD,
			Self::YellowCard => LS::DOOR_YELLOW_CARD,
			Self::BlueCard => LS::DOOR_BLUE_CARD,
			Self::RedSkull => LS::DOOR_RED_SKULL,
			Self::YellowSkull => LS::DOOR_YELLOW_SKULL,
			Self::BlueSkull => LS::DOOR_BLUE_SKULL,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorAxis {
	X,
	Y,
}

impl DoorAxis {
	fn parse(s: Option<&str>) -> Self {
		if s == Some("y") {
			Self::Y
		} else {
			Self::X
		}
	}
}

#[derive(Debug, Clone)]
pub struct DoorInfo {
	pub id: u16,
	pub name: String,
	pub kind: DoorType,
	pub axis: DoorAxis,
	pub floor: Id8,
	pub ceiling: Id8,
	pub side_left: Id8,
	pub side_right: Id8,
	pub track: Id8,
	pub tag: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaType {
	Normal,
	Ambush,
	SecretExit,
	Slime5,
	Slime10,
	Slime20,
	Teleport,
}

impl AreaType {
	fn parse(s: Option<&str>) -> Self {
		match s {
			Some("ambush") => Self::Ambush,
			Some("secret_exit") => Self::SecretExit,
			Some("slime5") => Self::Slime5,
			Some("slime10") => Self::Slime10,
			Some("slime20") => Self::Slime20,
			Some("teleport") => Self::Teleport,
			_ => Self::Normal,
		}
	}
}

#[derive(Debug, Clone)]
pub struct AreaInfo {
	pub id: u16,
	pub name: String,
	pub kind: AreaType,
	pub floor: Id8,
	pub ceiling: Id8,
	pub brightness: u8,
	pub tag: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
	Marker,
	Thing,
	Pushwall,
}

impl ObjectType {
	fn parse(s: Option<&str>) -> Self {
		match s {
			Some("thing") => Self::Thing,
			Some("pushwall") => Self::Pushwall,
			_ => Self::Marker,
		}
	}
}

bitflags::bitflags! {
	/// Skill and multiplayer gating flags for a placed thing.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct ThingFlagSet: u16 {
		const EASY = 0x0001;
		const NORMAL = 0x0002;
		const HARD = 0x0004;
		const AMBUSH = 0x0008;
		const MULTIPLAYER = 0x0010;
		const NO_DEATHMATCH = 0x0020;
		const NO_COOP = 0x0040;
		const FRIENDLY = 0x0080;
	}
}

impl ThingFlagSet {
	fn parse(names: &[String]) -> Self {
		let mut flags = Self::empty();
		for name in names {
			flags |= match name.as_str() {
				"easy" => Self::EASY,
				"normal" => Self::NORMAL,
				"hard" => Self::HARD,
				"ambush" => Self::AMBUSH,
				"multiplayer" => Self::MULTIPLAYER,
				"no_deathmatch" => Self::NO_DEATHMATCH,
				"no_coop" => Self::NO_COOP,
				"friendly" => Self::FRIENDLY,
				_ => Self::empty(),
			};
		}
		flags
	}
}

#[derive(Debug, Clone)]
pub struct ObjectInfo {
	pub id: u16,
	pub name: String,
	pub kind: ObjectType,
	pub ednum: u16,
	pub angle: u16,
	pub flags: ThingFlagSet,
}

/// Read-only lookup tables, plus the global defaults every area/door falls
/// back on when it omits its own flats or brightness.
#[derive(Debug)]
pub struct Catalog {
	pub name: String,
	pub format: MapFormat,
	pub default_floor: Id8,
	pub default_ceiling: Id8,
	pub default_brightness: u8,
	walls: Vec<WallInfo>,
	doors: Vec<DoorInfo>,
	objects: Vec<ObjectInfo>,
	areas: Vec<AreaInfo>,
}

impl Catalog {
	pub fn load(path: &Path) -> Result<Self, CatalogError> {
		let text = std::fs::read_to_string(path)?;
		let doc: CatalogDoc = serde_json::from_str(&text)?;
		Self::lower(doc)
	}

	fn lower(doc: CatalogDoc) -> Result<Self, CatalogError> {
		let default_floor = Id8::new(doc.floor.as_deref().unwrap_or("FLAT5_4"));
		let default_ceiling = Id8::new(doc.ceiling.as_deref().unwrap_or("CEIL5_1"));
		let default_brightness = doc.brightness.unwrap_or(160);

		let mut walls = Vec::with_capacity(doc.walls.len());
		let mut seen = std::collections::HashSet::new();
		for (index, w) in doc.walls.into_iter().enumerate() {
			let id = non_zero_id("walls", index, w.id)?;
			if !seen.insert(id) {
				return Err(CatalogError::DuplicateId { table: "walls", id });
			}
			let texture_x = Id8::new(w.xtex.as_deref().unwrap_or(""));
			let texture_y = Id8::new(w.ytex.as_deref().unwrap_or(w.xtex.as_deref().unwrap_or("")));
			walls.push(WallInfo {
				id,
				name: w.name.unwrap_or_else(|| "Untitled".to_owned()),
				kind: if w.midtex.unwrap_or(false) { WallKind::Midtex } else { WallKind::Solid },
				texture_x,
				texture_y,
				back_texture_x: Id8::new(w.back_xtex.as_deref().unwrap_or("")),
				back_texture_y: Id8::new(w.back_ytex.as_deref().unwrap_or("")),
				action_x: WallAction::parse(w.xact.as_deref()),
				action_y: WallAction::parse(w.yact.as_deref()),
				tag: w.tag.unwrap_or(0),
			});
		}

		let mut doors = Vec::with_capacity(doc.doors.len());
		seen.clear();
		for (index, d) in doc.doors.into_iter().enumerate() {
			let id = non_zero_id("doors", index, d.id)?;
			if !seen.insert(id) {
				return Err(CatalogError::DuplicateId { table: "doors", id });
			}
			let side_left = Id8::new(d.ltex.as_deref().unwrap_or(""));
			let side_right = Id8::new(d.rtex.as_deref().unwrap_or(d.ltex.as_deref().unwrap_or("")));
			doors.push(DoorInfo {
				id,
				name: d.name.unwrap_or_else(|| "Untitled".to_owned()),
				kind: DoorType::parse(d.kind.as_deref()),
				axis: DoorAxis::parse(d.axis.as_deref()),
				floor: d.floor.map_or(default_floor, |s| Id8::new(&s)),
				ceiling: d.ceiling.map_or(default_ceiling, |s| Id8::new(&s)),
				side_left,
				side_right,
				track: Id8::new(d.track.as_deref().unwrap_or("")),
				tag: d.tag.unwrap_or(0),
			});
		}

		let mut objects = Vec::with_capacity(doc.objects.len());
		seen.clear();
		for (index, o) in doc.objects.into_iter().enumerate() {
			let id = non_zero_id("objects", index, o.id)?;
			if !seen.insert(id) {
				return Err(CatalogError::DuplicateId { table: "objects", id });
			}
			let kind = ObjectType::parse(o.kind.as_deref());
			let (ednum, angle, flags) = if kind == ObjectType::Thing {
				let ednum = o.ednum.unwrap_or(0);
				if ednum == 0 {
					return Err(CatalogError::MissingEdnum { id });
				}
				(ednum, o.angle.unwrap_or(0), ThingFlagSet::parse(&o.flags))
			} else {
				(0, 0, ThingFlagSet::empty())
			};
			objects.push(ObjectInfo { id, name: o.name.unwrap_or_else(|| "Untitled".to_owned()), kind, ednum, angle, flags });
		}

		let mut areas = Vec::with_capacity(doc.areas.len());
		seen.clear();
		for (index, a) in doc.areas.into_iter().enumerate() {
			let id = non_zero_id("areas", index, a.id)?;
			if !seen.insert(id) {
				return Err(CatalogError::DuplicateId { table: "areas", id });
			}
			areas.push(AreaInfo {
				id,
				name: a.name.unwrap_or_else(|| "Untitled".to_owned()),
				kind: AreaType::parse(a.kind.as_deref()),
				floor: a.floor.map_or(default_floor, |s| Id8::new(&s)),
				ceiling: a.ceiling.map_or(default_ceiling, |s| Id8::new(&s)),
				brightness: a.brightness.unwrap_or(default_brightness),
				tag: a.tag.unwrap_or(0),
			});
		}

		Ok(Self {
			name: doc.name.unwrap_or_else(|| "Untitled".to_owned()),
			format: MapFormat::parse(doc.format.as_deref()),
			default_floor,
			default_ceiling,
			default_brightness,
			walls,
			doors,
			objects,
			areas,
		})
	}

	#[must_use]
	pub fn wall_info(&self, id: u16) -> Option<&WallInfo> {
		if id == 0 {
			return None;
		}
		self.walls.iter().find(|w| w.id == id)
	}

	#[must_use]
	pub fn door_info(&self, id: u16) -> Option<&DoorInfo> {
		if id == 0 {
			return None;
		}
		self.doors.iter().find(|d| d.id == id)
	}

	#[must_use]
	pub fn object_info(&self, id: u16) -> Option<&ObjectInfo> {
		if id == 0 {
			return None;
		}
		self.objects.iter().find(|o| o.id == id)
	}

	#[must_use]
	pub fn area_info(&self, id: u16) -> Option<&AreaInfo> {
		if id == 0 {
			return None;
		}
		self.areas.iter().find(|a| a.id == id)
	}

	#[must_use]
	pub fn is_pushwall(&self, id: u16) -> bool {
		self.object_info(id).is_some_and(|o| o.kind == ObjectType::Pushwall)
	}

	#[must_use]
	pub fn is_secret_exit(&self, id: u16) -> bool {
		self.area_info(id).is_some_and(|a| a.kind == AreaType::SecretExit)
	}

	#[must_use]
	pub fn is_ambush(&self, id: u16) -> bool {
		self.area_info(id).is_some_and(|a| a.kind == AreaType::Ambush)
	}
}

#[cfg(test)]
impl Catalog {
	/// Parses and lowers a catalog document from an in-memory JSON string,
	/// for building synthetic fixtures in other modules' tests without
	/// touching the filesystem.
	pub(crate) fn test_from_json(json: &str) -> Self {
		let doc: CatalogDoc = serde_json::from_str(json).expect("valid test catalog json");
		Self::lower(doc).expect("valid test catalog")
	}
}

fn non_zero_id(table: &'static str, index: usize, id: Option<u16>) -> Result<u16, CatalogError> {
	match id {
		Some(0) | None => Err(CatalogError::MissingId { table, index }),
		Some(id) => Ok(id),
	}
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CatalogDoc {
	name: Option<String>,
	format: Option<String>,
	floor: Option<String>,
	ceiling: Option<String>,
	brightness: Option<u8>,
	walls: Vec<WallDoc>,
	doors: Vec<DoorDoc>,
	objects: Vec<ObjectDoc>,
	areas: Vec<AreaDoc>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct WallDoc {
	id: Option<u16>,
	name: Option<String>,
	midtex: Option<bool>,
	xtex: Option<String>,
	ytex: Option<String>,
	back_xtex: Option<String>,
	back_ytex: Option<String>,
	xact: Option<String>,
	yact: Option<String>,
	tag: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DoorDoc {
	id: Option<u16>,
	name: Option<String>,
	#[serde(rename = "type")]
	kind: Option<String>,
	axis: Option<String>,
	floor: Option<String>,
	ceiling: Option<String>,
	ltex: Option<String>,
	rtex: Option<String>,
	track: Option<String>,
	tag: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ObjectDoc {
	id: Option<u16>,
	name: Option<String>,
	#[serde(rename = "type")]
	kind: Option<String>,
	ednum: Option<u16>,
	angle: Option<u16>,
	flags: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AreaDoc {
	id: Option<u16>,
	name: Option<String>,
	#[serde(rename = "type")]
	kind: Option<String>,
	floor: Option<String>,
	ceiling: Option<String>,
	brightness: Option<u8>,
	tag: Option<u16>,
}
