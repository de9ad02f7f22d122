//! Grid-to-geometry transcoder: turns a Carmack+RLEW-compressed Wolfenstein
//! tile grid into a Doom-family PWAD level.
//!
//! The crate is laid out leaves-first, matching its own data flow:
//! [`catalog`] and [`grid`] are read-only inputs, [`transcode`] is the
//! multi-pass algorithm that consumes them, and [`level`] holds both the
//! geometry arena it populates and the WAD emitter that serialises it.

pub mod catalog;
mod decompress;
mod error;
pub mod grid;
pub mod level;
mod transcode;

pub use catalog::Catalog;
pub use error::{CatalogError, FormatError, TranscodeError};
pub use grid::Grid;
pub use transcode::transcode;
