//! One emission routine per operator class.
//!
//! Each routine opens a [`Block`](crate::instruction::Block) of a fixed size
//! and writes its jumps relative to the block start, so the pattern for an
//! operator reads the same wherever it lands in the table. Boolean operators
//! short-circuit through conditional jumps alone.
//!
//! | Operator | Block |
//! |---|---|
//! | `not x` | `T = True`; `if x goto +2`; `T = False` |
//! | `x and y` | `T = True`; `if x goto +4`; `T = False`; `goto +6`; `if y goto +6`; `T = False` |
//! | `x or y` | `T = True`; `if x goto +4`; `if y goto +4`; `T = False` |
//! | `x op y` arithmetic | `T = x op y` |
//! | `x op y` relational | `T = True`; `if x op y goto +3`; `T = False` |

use super::expression::Operand;
use crate::{instruction::{Instruction, InstructionTable, TempVar}, symbols::SymbolTable, token::Operator};

pub(crate) fn not(table: &mut InstructionTable, operand: &Operand) -> Operand {
	let temp = TempVar::fresh(table, SymbolTable::BOOL);
	table.block(3).assign(&temp.name, "True").condition(&operand.repr, 2).assign(&temp.name, "False");
	temp.into()
}

pub(crate) fn and(table: &mut InstructionTable, left: &Operand, right: &Operand) -> Operand {
	let temp = TempVar::fresh(table, SymbolTable::BOOL);
	table
		.block(6)
		.assign(&temp.name, "True")
		.condition(&left.repr, 4)
		.assign(&temp.name, "False")
		.goto(6)
		.condition(&right.repr, 6)
		.assign(&temp.name, "False");
	temp.into()
}

pub(crate) fn or(table: &mut InstructionTable, left: &Operand, right: &Operand) -> Operand {
	let temp = TempVar::fresh(table, SymbolTable::BOOL);
	table
		.block(4)
		.assign(&temp.name, "True")
		.condition(&left.repr, 4)
		.condition(&right.repr, 4)
		.assign(&temp.name, "False");
	temp.into()
}

/// `+ - * /`, the result has the operand type.
pub(crate) fn arithmetic(table: &mut InstructionTable, operator: Operator, left: &Operand, right: &Operand) -> Operand {
	let temp = TempVar::fresh(table, left.r#type);
	table.block(1).assign(&temp.name, format!("{} {operator} {}", left.repr, right.repr));
	temp.into()
}

pub(crate) fn relational(table: &mut InstructionTable, operator: Operator, left: &Operand, right: &Operand) -> Operand {
	let temp = TempVar::fresh(table, SymbolTable::BOOL);
	table
		.block(3)
		.assign(&temp.name, "True")
		.condition(format!("{} {operator} {}", left.repr, right.repr), 3)
		.assign(&temp.name, "False");
	temp.into()
}

pub(crate) fn assignment(table: &mut InstructionTable, target: &str, source: &str) -> usize {
	table.append(Instruction::assign(target, source))
}
