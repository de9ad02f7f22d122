use std::fmt;

/// Errors raised while loading or validating a [`crate::catalog::Catalog`].
#[derive(Debug)]
pub enum CatalogError {
	Io(std::io::Error),
	Json(serde_json::Error),
	/// A `walls`/`doors`/`objects`/`areas` entry is missing its `id` field,
	/// or its `id` is `0` (reserved, invariant C1).
	MissingId { table: &'static str, index: usize },
	/// Two entries in the same table declared the same `id`.
	DuplicateId { table: &'static str, id: u16 },
	/// An `objects` entry of type `thing` is missing its `ednum` field, or
	/// its `ednum` is `0`.
	MissingEdnum { id: u16 },
}

impl std::error::Error for CatalogError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io(err) => Some(err),
			Self::Json(err) => Some(err),
			_ => None,
		}
	}
}

impl fmt::Display for CatalogError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Io(err) => write!(f, "failed to read config file: {err}"),
			Self::Json(err) => write!(f, "failed to parse config JSON: {err}"),
			Self::MissingId { table, index } => {
				write!(f, "{table}[{index}] is missing a non-zero `id` field")
			}
			Self::DuplicateId { table, id } => {
				write!(f, "{table} entry with id {id} is defined more than once")
			}
			Self::MissingEdnum { id } => {
				write!(f, "object {id} is a thing but has no non-zero `ednum`")
			}
		}
	}
}

impl From<std::io::Error> for CatalogError {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for CatalogError {
	fn from(err: serde_json::Error) -> Self {
		Self::Json(err)
	}
}

/// Errors raised while reading the MAPHEAD/GAMEMAPS container or decompressing
/// a plane.
#[derive(Debug)]
pub enum FormatError {
	Io(std::io::Error),
	/// The GAMEMAPS header did not read `TED5v1.0`.
	BadMagic { expected: &'static str, file: &'static str },
	/// `level` was outside `0..100`, or had no offset recorded in MAPHEAD.
	NoSuchLevel(u8),
	/// A plane's compressed payload ran past the declared decompressed size,
	/// or a Carmack/RLEW token pointed outside the output buffer.
	DecompressionOverrun { plane: &'static str },
	/// A plane's decompressed byte length was not a multiple of 2 (u16 tiles).
	MalformedPlane { plane: &'static str },
}

impl std::error::Error for FormatError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl fmt::Display for FormatError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Io(err) => write!(f, "I/O error reading map container: {err}"),
			Self::BadMagic { expected, file } => {
				write!(f, "{file}: expected magic {expected:?}")
			}
			Self::NoSuchLevel(level) => write!(f, "no data found for level {level}"),
			Self::DecompressionOverrun { plane } => {
				write!(f, "plane {plane}: decompression ran past the expected output size")
			}
			Self::MalformedPlane { plane } => {
				write!(f, "plane {plane}: decompressed byte length is not a multiple of 2")
			}
		}
	}
}

impl From<std::io::Error> for FormatError {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

/// Internal invariant violations surfaced by the transcoder. The anonymous
/// sector counter starts at `0xFFFE` and counts down; past roughly 32767
/// anonymous sectors it would collide with `NO_SECTOR` (`0xFFFF`), so
/// allocation is checked rather than left to wrap silently.
#[derive(Debug)]
pub enum TranscodeError {
	AnonymousSectorExhausted,
}

impl std::error::Error for TranscodeError {}

impl fmt::Display for TranscodeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::AnonymousSectorExhausted => {
				write!(f, "anonymous sector counter collided with NO_SECTOR (0xFFFF)")
			}
		}
	}
}
