//! The statement loop after the declaration block.
//!
//! Every line is either an expression statement, starting with an
//! identifier, or a `match` construct. Empty lines are skipped.

use super::{ExpressionAnalyzer, line_at, match_case::MatchCaseAnalyzer};
use crate::{compiler::MatchJumps, error::analyzer::{AnalysisError, AnalysisErrorType, AnalyzerError}, instruction::InstructionTable, symbols::SymbolTable, token::Token};

/// Finds the end of the expression statement starting at `start`: the index
/// of the next newline, or the end of `tokens`. Only tokens that may appear
/// in an expression are allowed on the way.
pub(super) fn expression_end(tokens: &[Token], start: usize) -> Result<usize, AnalysisError> {
	for (index, token) in tokens.iter().enumerate().skip(start) {
		if *token == Token::NewLine {
			return Ok(index);
		}
		if !token.is_expression_part() {
			return Err(AnalysisError::new(line_at(tokens, index), AnalysisErrorType::WrongToken(token.describe())));
		}
	}
	Ok(tokens.len())
}

pub(crate) struct StatementSequencer<'a> {
	tokens:       &'a [Token],
	symbols:      &'a SymbolTable,
	instructions: &'a mut InstructionTable,
	jumps:        MatchJumps,
}

impl<'a> StatementSequencer<'a> {
	pub fn new(
		tokens: &'a [Token],
		symbols: &'a SymbolTable,
		instructions: &'a mut InstructionTable,
		jumps: MatchJumps,
	) -> Self {
		Self { tokens, symbols, instructions, jumps }
	}

	/// Analyzes every statement from `start` to the end of `tokens`.
	pub fn run(&mut self, start: usize) -> Result<(), AnalyzerError> {
		let mut index = start;
		while let Some(token) = self.tokens.get(index) {
			index = match token {
				Token::NewLine => index + 1,
				Token::Identifier(_) => {
					let end = expression_end(self.tokens, index)?;
					log::debug!("expression statement, tokens {index}..{end}");
					ExpressionAnalyzer::new(self.symbols, self.instructions).analyze(self.tokens, index..end)?;
					end
				}
				Token::Match => {
					log::debug!("match statement at token {index}");
					MatchCaseAnalyzer::new(self.tokens, self.symbols, self.instructions, self.jumps).analyze(index)?
				}
				token => {
					let error = AnalysisErrorType::UnexpectedStatement(token.describe());
					return Err(AnalysisError::new(line_at(self.tokens, index), error).into());
				}
			};
		}
		Ok(())
	}
}
