//! wolf2doom: converts a single Wolfenstein-family grid level into a
//! Doom-family PWAD.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use clap::Parser;
use subterra::{Catalog, Grid};

/// Wraps a fatal error with the name of the stage that raised it, so the
/// top-level handler can report "stage: message" without every error type
/// needing to know its own place in the pipeline.
#[derive(Debug)]
struct StageError {
	stage: &'static str,
	source: Box<dyn StdError>,
}

impl fmt::Display for StageError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.stage, self.source)
	}
}

impl StdError for StageError {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		self.source.source()
	}
}

trait StageContext<T> {
	fn stage(self, stage: &'static str) -> Result<T, StageError>;
}

impl<T, E: StdError + 'static> StageContext<T> for Result<T, E> {
	fn stage(self, stage: &'static str) -> Result<T, StageError> {
		self.map_err(|err| StageError { stage, source: Box::new(err) })
	}
}

/// Converts one level from a Carmack+RLEW-compressed Wolfenstein map
/// container into a Doom-format PWAD.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
	/// Catalog document describing wall/door/area/object tile tables.
	#[arg(short, long, value_name = "FILE", default_value = "config.json")]
	config: PathBuf,

	/// MAPHEAD and GAMEMAPS container files, in that order.
	#[arg(short, long, value_names = ["MAPHEAD", "GAMEMAPS"], num_args = 2, default_values = ["MAPHEAD.wl6", "GAMEMAPS.wl6"])]
	input: Vec<PathBuf>,

	/// Level index within the container (0-99; out-of-range values are
	/// rejected when the container is loaded).
	#[arg(short, long, value_name = "N", default_value_t = 0)]
	level: u8,

	/// Output PWAD path.
	#[arg(short, long, value_name = "FILE", default_value = "output.wad")]
	output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();

	if let Err(err) = run(&cli) {
		log::error!("{err}");
		let mut source = err.source();
		while let Some(cause) = source {
			log::error!("caused by: {cause}");
			source = cause.source();
		}
		std::process::exit(1);
	}

	Ok(())
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
	log::info!("wolf2doom: loading catalog from {}", cli.config.display());
	let catalog = Catalog::load(&cli.config).stage("config")?;

	let [maphead, gamemaps] = &cli.input[..] else {
		unreachable!("clap enforces exactly two --input values");
	};
	log::info!(
		"wolf2doom: loading level {} from {} / {}",
		cli.level,
		maphead.display(),
		gamemaps.display()
	);
	let grid = Grid::load(maphead, gamemaps, cli.level).stage("map container")?;

	let arena = subterra::transcode(&catalog, &grid).stage("transcode")?;

	let wad = subterra::level::write_wad(&arena, grid.id);
	if !util::is_valid_wad(&wad, wad.len() as u64)? {
		unreachable!("write_wad always produces a well-formed PWAD header and directory");
	}
	std::fs::write(&cli.output, &wad).stage("output")?;
	log::info!("wolf2doom: saved as {} ({} bytes)", cli.output.display(), wad.len());

	Ok(())
}
