use std::path::PathBuf;

use palc::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "semfn", after_long_help = "Compiles semantic descriptors into functions and runs them.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Run the descriptor in a file
	File { path: PathBuf },
	/// Run a descriptor given on the command line
	Eval { descriptor: String },
	/// Input prompt
	Repl,
}
