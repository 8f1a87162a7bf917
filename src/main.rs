use env_logger::Env;
use palc::Parser;
use tacc::{CompileOptions, Compiler, MatchJumps, cli::*};

fn main() {
	env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

	let (path, options) = match Cli::parse().mode {
		Mode::Compile { path, flat_match } => {
			let match_jumps = if flat_match { MatchJumps::Flat } else { MatchJumps::Chained };
			(path, Some(CompileOptions { match_jumps }))
		}
		Mode::Check { path } => (path, None),
	};

	let compiler = Compiler::new(options.unwrap_or_default());
	match compiler.compile_file(&path) {
		Ok(program) if options.is_some() => print!("{}", program.instructions),
		Ok(program) => println!("{}: ok, {} instructions", path.display(), program.instructions.len()),
		Err(e) => {
			eprintln!("Failed compile: {e}");
			std::process::exit(1);
		}
	}
}
