use std::fmt::Display;

use super::InstructionTable;
use crate::symbols::SymbolId;

/// A compiler-made variable holding an intermediate result.
///
/// Named `$N` with `N` the table length when it was made. Every temp is
/// followed by at least one instruction before the next one is made, so the
/// names never repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct TempVar {
	pub name:   String,
	pub r#type: SymbolId,
}

impl TempVar {
	pub fn fresh(table: &InstructionTable, r#type: SymbolId) -> Self {
		Self { name: format!("${}", table.len()), r#type }
	}
}

impl Display for TempVar {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.name) }
}
