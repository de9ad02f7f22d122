//! Linedef flag bits and the small numeric "special" vocabularies a
//! vanilla-format level needs. Modern source ports define twenty-odd line
//! flags; this transcoder's output only ever sets five of them, so only
//! those are reproduced here.

bitflags::bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct LineFlags: u16 {
		const BLOCKING = 0x0001;
		const TWO_SIDED = 0x0004;
		const UNPEG_LOW = 0x0010;
		const SECRET = 0x0020;
		const BLOCK_SOUND = 0x0040;
	}
}

/// Sector `special` values (`ST_*`).
pub struct SectorSpecial;

impl SectorSpecial {
	pub const NORMAL: u16 = 0;
	pub const SLIME10: u16 = 5;
	pub const SLIME5: u16 = 7;
	pub const SECRET: u16 = 9;
	pub const SLIME20: u16 = 16;
}

/// Linedef `special` (action) values (`LT_*`).
pub struct LineSpecial;

impl LineSpecial {
	pub const NORMAL: u16 = 0;
	pub const DOOR: u16 = 1;
	pub const EXIT: u16 = 11;
	pub const DOOR_BLUE: u16 = 26;
	pub const DOOR_YELLOW: u16 = 27;
	pub const DOOR_RED: u16 = 28;
	pub const SECRET_EXIT: u16 = 51;
	pub const TELEPORT: u16 = 97;
	pub const SWITCH: u16 = 103;
	pub const DOOR_FAST: u16 = 117;
	pub const SECRET: u16 = 118;
	pub const DOOR_RED_CARD: u16 = 14407;
	pub const DOOR_BLUE_CARD: u16 = 14471;
	pub const DOOR_YELLOW_CARD: u16 = 14535;
	pub const DOOR_RED_SKULL: u16 = 14599;
	pub const DOOR_BLUE_SKULL: u16 = 14663;
	pub const DOOR_YELLOW_SKULL: u16 = 14727;
}
