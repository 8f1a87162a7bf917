//! Three-address instructions and the table they are appended to.
//!
//! The table only grows. An instruction's index never changes once it is
//! appended, so jump targets are plain indices. A construct that does not
//! know its target yet appends a placeholder and patches it in place later.

mod temp;

use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, bail};
pub use temp::TempVar;

/// A jump target, `None` while it is still a placeholder.
pub type JumpTarget = Option<usize>;

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
	/// `target = source`, the source already in its final text form.
	Assign { target: String, source: String },
	/// `if cond goto target`.
	Condition { cond: String, target: JumpTarget },
	/// `goto target`.
	Goto { target: JumpTarget },
}

impl Instruction {
	pub fn assign(target: impl Into<String>, source: impl Into<String>) -> Self {
		Instruction::Assign { target: target.into(), source: source.into() }
	}

	pub fn condition(cond: impl Into<String>, target: JumpTarget) -> Self {
		Instruction::Condition { cond: cond.into(), target }
	}

	pub fn goto(target: JumpTarget) -> Self { Instruction::Goto { target } }

	/// The jump target of a `Condition` or `Goto`.
	pub fn jump_target(&self) -> Option<JumpTarget> {
		match self {
			Instruction::Condition { target, .. } | Instruction::Goto { target } => Some(*target),
			Instruction::Assign { .. } => None,
		}
	}
}

struct Target(JumpTarget);

impl Display for Target {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.0 {
			Some(index) => write!(f, "{index}"),
			None => write!(f, "?"),
		}
	}
}

impl Display for Instruction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Instruction::Assign { target, source } => write!(f, "{target} = {source}"),
			Instruction::Condition { cond, target } => write!(f, "if {cond} goto {}", Target(*target)),
			Instruction::Goto { target } => write!(f, "goto {}", Target(*target)),
		}
	}
}

fn parse_target(text: &str) -> anyhow::Result<JumpTarget> {
	match text.trim() {
		"?" => Ok(None),
		index => Ok(Some(index.parse().map_err(|_| anyhow!("Invalid jump target '{index}'"))?)),
	}
}

impl FromStr for Instruction {
	type Err = anyhow::Error;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		if let Some(target) = line.strip_prefix("goto ") {
			return Ok(Instruction::goto(parse_target(target)?));
		}
		if let Some(rest) = line.strip_prefix("if ") {
			let (cond, target) = rest.rsplit_once(" goto ").ok_or_else(|| anyhow!("Condition without goto: '{line}'"))?;
			return Ok(Instruction::condition(cond, parse_target(target)?));
		}
		match line.split_once(" = ") {
			Some((target, source)) if !target.is_empty() && !source.is_empty() => {
				Ok(Instruction::assign(target, source))
			}
			_ => bail!("Unrecognized instruction '{line}'"),
		}
	}
}

/// The append-only instruction buffer of one compilation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionTable {
	instructions: Vec<Instruction>,
}

impl InstructionTable {
	pub fn new() -> Self { Self::default() }

	/// Appends `instruction`, returning its index.
	pub fn append(&mut self, instruction: Instruction) -> usize {
		let index = self.instructions.len();
		log::trace!("{index}: {instruction}");
		self.instructions.push(instruction);
		index
	}

	pub fn len(&self) -> usize { self.instructions.len() }

	pub fn is_empty(&self) -> bool { self.instructions.is_empty() }

	pub fn get(&self, index: usize) -> Option<&Instruction> { self.instructions.get(index) }

	pub fn iter(&self) -> impl Iterator<Item = &Instruction> { self.instructions.iter() }

	/// Points the jump at `index` to `target`.
	pub fn patch(&mut self, index: usize, target: usize) -> anyhow::Result<()> {
		match self.instructions.get_mut(index) {
			Some(Instruction::Condition { target: slot, .. } | Instruction::Goto { target: slot }) => {
				log::trace!("patch {index} -> {target}");
				*slot = Some(target);
				Ok(())
			}
			Some(instruction) => bail!("Cannot patch non-jump instruction {index}: {instruction}"),
			None => bail!("Cannot patch instruction {index}, table has {}", self.instructions.len()),
		}
	}

	/// Opens a block of `size` instructions starting at the current end.
	pub fn block(&mut self, size: usize) -> Block<'_> {
		let base = self.len();
		Block { table: self, base, size }
	}

	/// Parses a listing as produced by `Display`.
	pub fn parse_listing(listing: &str) -> anyhow::Result<Self> {
		let instructions = listing
			.lines()
			.filter(|line| !line.trim().is_empty())
			.map(str::parse::<Instruction>)
			.collect::<Result<_, _>>()?;
		Ok(Self { instructions })
	}
}

impl Display for InstructionTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for instruction in &self.instructions {
			writeln!(f, "{instruction}")?;
		}
		Ok(())
	}
}

/// A fixed-size run of instructions whose jumps are written relative to the
/// first instruction of the run.
///
/// `label(k)` is the absolute index of the `k`-th instruction of the block;
/// `label(size)` is the first instruction after it.
pub struct Block<'t> {
	table: &'t mut InstructionTable,
	base:  usize,
	size:  usize,
}

impl Block<'_> {
	pub fn base(&self) -> usize { self.base }

	pub fn label(&self, offset: usize) -> usize {
		debug_assert!(offset <= self.size, "label {offset} outside a block of {}", self.size);
		self.base + offset
	}

	pub fn assign(&mut self, target: &str, source: impl Into<String>) -> &mut Self {
		self.table.append(Instruction::assign(target, source));
		self
	}

	pub fn condition(&mut self, cond: impl Into<String>, offset: usize) -> &mut Self {
		let target = self.label(offset);
		self.table.append(Instruction::condition(cond, Some(target)));
		self
	}

	pub fn goto(&mut self, offset: usize) -> &mut Self {
		let target = self.label(offset);
		self.table.append(Instruction::goto(Some(target)));
		self
	}
}

impl Drop for Block<'_> {
	fn drop(&mut self) {
		debug_assert_eq!(self.table.len(), self.base + self.size, "block emitted a different instruction count");
	}
}
