//! # From tokens to three-address code
//!
//! User's program:
//!
//! ``` text
//! start_prog
//! block_var_def
//! class Point :
//! 	int x
//! Point p
//! int n
//! endblock_var_def
//! p.x = n * 2 + 1
//! end_prog
//! ```

//! ## Token listing
//!
//! The lexer has already turned the characters into tokens and hands them
//! over one per line. Newlines and tabs are tokens too, the layout is part of
//! the grammar. Identifiers are interned on the way in, so every `p` of the
//! program refers to the same entry of the identifier table.

//! ## Declaration block
//!
//! Everything between `block_var_def` and `endblock_var_def` declares names.
//! A class gets a field template, every variable of that class gets its own
//! copy of the template. Names are categorized once, as a type or as a
//! variable, and redeclaring one is an error.

//! ## Statements
//!
//! After the block, every line is an assignment or a `match`. Dotted paths
//! are folded into one operand (`p.x`), then the right-hand side is reduced
//! one precedence tier at a time. Every reduction emits a few instructions
//! and leaves a temp var (`$N`) holding its result.
//!
//! ``` text
//! $0 = n * 2
//! $1 = $0 + 1
//! p.x = $1
//! ```

//! ## Three-address code
//!
//! An instruction has at most one operator. There are only three kinds:
//! `a = b op c`, `if cond goto N` and `goto N`. Boolean operators have no
//! instruction of their own, `and`, `or` and `not` are spelled out with
//! conditional jumps. Jump targets are indices into the instruction table,
//! which only grows, so an index stays valid forever. A jump whose target is
//! not known yet is appended as a placeholder and backpatched later.

pub mod analyzer;
pub mod cli;
mod compiler;
mod error;
pub mod instruction;
pub mod symbols;
pub mod token;

pub use analyzer::{Analyzer, CompiledProgram};
pub use compiler::{CompileOptions, Compiler, MatchJumps};
pub use error::{
	CompileError,
	analyzer::{AnalysisError, AnalysisErrorType, AnalyzerError},
	reader::{ReadError, ReadErrorType, ReaderError},
};
pub use instruction::{Instruction, InstructionTable, TempVar};
pub use symbols::SymbolTable;
pub use token::{Token, TokenReader, TokenStream};
