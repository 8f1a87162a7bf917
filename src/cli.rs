use std::path::PathBuf;

use palc::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tacc", after_long_help = "Compiles token listings to three-address code.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Compile a token listing and print its instructions
	Compile {
		path:       PathBuf,
		/// Patch every match jump to the end of its construct
		#[arg(long)]
		flat_match: bool,
	},
	/// Only check a token listing
	Check { path: PathBuf },
}
