use std::{fs::read_to_string, io::Write, path::Path};

use anyhow::Context;

use crate::{SemanticError, interpreter::value::Value, semantic_fn::{Options, SemanticFn}};

/// Semfn runs descriptors from files, the command line or a prompt.
#[derive(Debug, Default)]
pub struct Semfn {
	options: Options,
}

impl Semfn {
	pub fn new(options: Options) -> Self { Self { options } }

	/// Run the descriptor stored in the file at `path`.
	pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<Value, SemanticError> {
		let path = path.as_ref();
		let source = read_to_string(path).with_context(|| format!("Failed open descriptor file {}", path.display()))?;
		self.run(&source)
	}

	/// Run the REPL prompt. Every line is a descriptor of its own.
	pub fn run_prompt(&self) {
		let mut input = String::new();
		let stdin = std::io::stdin();
		loop {
			input.clear();
			print!("> ");
			if let Err(e) = std::io::stdout().flush() {
				eprintln!("Failed flush: {e}");
			}
			match stdin.read_line(&mut input) {
				Ok(0) => {
					println!("\nExited semfn repl");
					break;
				}
				Ok(_) => {}
				Err(e) => {
					eprintln!("Failed read line: {e}");
					continue;
				}
			}
			match self.run(input.trim()) {
				Ok(value) => println!("{}", value.repr()),
				Err(e) => eprintln!("Failed run prompt: {e}"),
			}
		}
	}

	/// Compile and call `source` once without arguments. Diagnostics are
	/// printed to stderr, compile errors also fail the run.
	pub fn run(&self, source: &str) -> Result<Value, SemanticError> {
		let semantic_fn = SemanticFn::build(source, self.options.clone());
		if !semantic_fn.is_compiled() {
			for error in semantic_fn.compile_errors() {
				eprintln!("{error} at '{}'", error.text);
			}
			return Err(SemanticError::CompileErrors(semantic_fn.compile_errors().len()));
		}

		let evaluation = semantic_fn.call_with_report([]);
		for error in &evaluation.runtime_errors {
			eprintln!("{error}");
		}
		Ok(evaluation.value)
	}
}
