use std::process::ExitCode;

use palc::Parser;
use semfn::cli::*;

/// Logs go to stderr, and only when `RUST_LOG` asks for them.
fn init_tracing() {
	use tracing_subscriber::{EnvFilter, fmt, prelude::*};

	if std::env::var("RUST_LOG").is_ok() {
		tracing_subscriber::registry()
			.with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
			.with(EnvFilter::from_default_env())
			.init();
	}
}

fn main() -> ExitCode {
	init_tracing();
	let semfn = semfn::Semfn::default();

	let result = match Cli::parse().mode {
		Mode::File { path } => semfn.run_file(&path),
		Mode::Eval { descriptor } => semfn.run(&descriptor),
		Mode::Repl => {
			semfn.run_prompt();
			return ExitCode::SUCCESS;
		}
	};

	match result {
		Ok(value) => {
			println!("{}", value.repr());
			ExitCode::SUCCESS
		}
		Err(e) => {
			eprintln!("Failed run descriptor: {e}");
			ExitCode::FAILURE
		}
	}
}
