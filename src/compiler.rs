use std::{fs::read_to_string, path::Path};

use anyhow::Context;

use crate::{CompileError, analyzer::{Analyzer, CompiledProgram}, token::{TokenReader, TokenStream}};

/// How the jumps of a `match` construct are patched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchJumps {
	/// A failed comparison jumps to the next case, a finished branch leaves
	/// the construct. The first matching case wins.
	#[default]
	Chained,
	/// Every jump of the construct points right after it.
	Flat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
	pub match_jumps: MatchJumps,
}

/// Compiler is the driver from token listing to instruction table.
#[derive(Debug, Default)]
pub struct Compiler {
	options: CompileOptions,
}

impl Compiler {
	pub fn new(options: CompileOptions) -> Self { Self { options } }

	/// Compile the token listing stored at `path`.
	pub fn compile_file<P: AsRef<Path>>(&self, path: P) -> Result<CompiledProgram, CompileError> {
		let listing = read_to_string(path).context("Failed open token listing")?;
		self.compile_listing(&listing)
	}

	/// Compile a token listing.
	pub fn compile_listing(&self, listing: &str) -> Result<CompiledProgram, CompileError> {
		let stream = TokenReader::new(listing).read_tokens()?;
		self.compile(stream)
	}

	/// Compile an already read token stream.
	pub fn compile(&self, stream: TokenStream) -> Result<CompiledProgram, CompileError> {
		let program = Analyzer::new(stream, self.options).analyze()?;
		log::debug!("compiled {} instructions", program.instructions.len());
		Ok(program)
	}
}
