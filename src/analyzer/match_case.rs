//! `match` constructs.
//!
//! ``` BNF
//! match        → "match" path ":" ( NL TAB case )+ ;
//! case         → "case" ( CONST | "_" ) ":" NL TAB TAB statement ;
//! ```
//!
//! Each case with a literal compiles to a `Condition` that skips its branch
//! when the target differs, the branch itself, and a `Goto` leaving the
//! construct. The default case `_` is a bare branch and must come last.
//! All jumps are emitted as placeholders and patched once the whole
//! construct is in the table.

use std::ops::Range;

use super::{ExpressionAnalyzer, line_at, statement::expression_end};
use crate::{compiler::MatchJumps, error::analyzer::{AnalysisError, AnalysisErrorType, AnalyzerError}, instruction::{Instruction, InstructionTable}, symbols::SymbolTable, token::{Constant, Token}};

/// One `case` line and its branch.
#[derive(Debug)]
struct Case {
	/// `None` for the default case.
	literal: Option<Constant>,
	/// Index of the `case` token.
	header:  usize,
	body:    Option<Range<usize>>,
}

/// Jumps of one emitted case, still placeholders.
struct Emitted {
	start:     usize,
	condition: Option<usize>,
	exit:      Option<usize>,
}

pub(crate) struct MatchCaseAnalyzer<'a> {
	tokens:       &'a [Token],
	symbols:      &'a SymbolTable,
	instructions: &'a mut InstructionTable,
	jumps:        MatchJumps,
}

impl<'a> MatchCaseAnalyzer<'a> {
	pub fn new(
		tokens: &'a [Token],
		symbols: &'a SymbolTable,
		instructions: &'a mut InstructionTable,
		jumps: MatchJumps,
	) -> Self {
		Self { tokens, symbols, instructions, jumps }
	}

	/// Analyzes the construct whose `match` token is at `start` and returns
	/// the index right after it.
	pub fn analyze(&mut self, start: usize) -> Result<usize, AnalyzerError> {
		let colon = self.target(start)?;
		let (cases, resume) = self.cases(colon + 1)?;
		self.validate(&cases)?;

		let target = ExpressionAnalyzer::new(self.symbols, self.instructions).resolve(self.tokens, start + 1..colon)?;
		log::debug!("match on {} with {} cases", target.repr, cases.len());

		let mut emitted = Vec::with_capacity(cases.len());
		for case in &cases {
			let start = self.instructions.len();
			let condition = match &case.literal {
				Some(literal) => {
					if literal.r#type != target.r#type {
						return Err(self.error(case.header, AnalysisErrorType::TypeIncompatibility {
							expected: self.symbols.name(target.r#type).to_string(),
							found:    self.symbols.name(literal.r#type).to_string(),
						})
						.into());
					}
					let cond = format!("{} != {}", target.repr, literal.text);
					Some(self.instructions.append(Instruction::condition(cond, None)))
				}
				None => None,
			};
			let body = case.body.clone().ok_or_else(|| self.error(case.header, AnalysisErrorType::ExpectedTab))?;
			ExpressionAnalyzer::new(self.symbols, self.instructions).analyze(self.tokens, body)?;
			let exit = condition.map(|_| self.instructions.append(Instruction::goto(None)));
			emitted.push(Emitted { start, condition, exit });
		}
		self.patch(&emitted)?;
		Ok(resume)
	}

	/// Checks the target path after `match` and returns the index of the
	/// colon closing the header.
	fn target(&self, start: usize) -> Result<usize, AnalysisError> {
		if !self.tokens.get(start + 1).is_some_and(Token::is_identifier) {
			return Err(self.error(start + 1, AnalysisErrorType::ExpectedIdentifier));
		}
		for index in start + 1..self.tokens.len() {
			let prev = &self.tokens[index - 1];
			let next = self.tokens.get(index + 1);
			match &self.tokens[index] {
				Token::Identifier(_) => {
					if !matches!(prev, Token::Match | Token::Dot) {
						return Err(self.error(index, AnalysisErrorType::WrongToken("identifier")));
					}
					match next {
						Some(Token::Colon | Token::Dot) => {}
						None | Some(Token::NewLine) => return Err(self.error(index, AnalysisErrorType::ExpectedColon)),
						Some(token) => return Err(self.error(index + 1, AnalysisErrorType::WrongToken(token.describe()))),
					}
				}
				Token::Dot => {
					if !prev.is_identifier() || !next.is_some_and(Token::is_identifier) {
						return Err(self.error(index, AnalysisErrorType::ExpectedIdentifier));
					}
				}
				Token::Colon => {
					return match next {
						None | Some(Token::NewLine) => Ok(index),
						Some(_) => Err(self.error(index + 1, AnalysisErrorType::ExpectedNewLine)),
					};
				}
				token => return Err(self.error(index, AnalysisErrorType::WrongToken(token.describe()))),
			}
		}
		Err(self.error(self.tokens.len(), AnalysisErrorType::ExpectedColon))
	}

	/// Collects the indented case lines following the header. Returns them
	/// with the index where the construct ends.
	fn cases(&self, mut index: usize) -> Result<(Vec<Case>, usize), AnalysisError> {
		let mut cases: Vec<Case> = Vec::new();
		while self.tokens.get(index) == Some(&Token::NewLine) {
			let line = index + 1;
			let pending = cases.last().is_some_and(|case| case.body.is_none());
			index = match (self.tokens.get(line), self.tokens.get(line + 1)) {
				(Some(Token::Tab), Some(Token::Case)) => {
					if pending {
						return Err(self.error(line, AnalysisErrorType::ExpectedTab));
					}
					let header = line + 1;
					let literal = match self.tokens.get(header + 1) {
						Some(Token::Constant(constant)) => Some(constant.clone()),
						Some(Token::Underscore) => None,
						_ => return Err(self.error(header + 1, AnalysisErrorType::ExpectedConstant)),
					};
					if self.tokens.get(header + 2) != Some(&Token::Colon) {
						return Err(self.error(header + 2, AnalysisErrorType::ExpectedColon));
					}
					if !matches!(self.tokens.get(header + 3), None | Some(Token::NewLine)) {
						return Err(self.error(header + 3, AnalysisErrorType::ExpectedNewLine));
					}
					cases.push(Case { literal, header, body: None });
					header + 3
				}
				(Some(Token::Tab), Some(Token::Tab)) => {
					let Some(case) = cases.last_mut().filter(|case| case.body.is_none()) else {
						return Err(self.error(line, AnalysisErrorType::ExpectedCase));
					};
					let body = line + 2;
					if !self.tokens.get(body).is_some_and(Token::is_identifier) {
						return Err(self.error(body, AnalysisErrorType::ExpectedIdentifier));
					}
					let end = expression_end(self.tokens, body)?;
					case.body = Some(body..end);
					end
				}
				(Some(Token::Tab), Some(token)) => {
					return Err(self.error(line + 1, AnalysisErrorType::WrongToken(token.describe())));
				}
				(Some(Token::Tab), None) => return Err(self.error(line, AnalysisErrorType::ExpectedCase)),
				_ => break,
			};
		}
		match cases.last() {
			None => Err(self.error(index, AnalysisErrorType::ExpectedCase)),
			Some(case) if case.body.is_none() => Err(self.error(index, AnalysisErrorType::ExpectedTab)),
			Some(_) => Ok((cases, index)),
		}
	}

	fn validate(&self, cases: &[Case]) -> Result<(), AnalysisError> {
		let mut defaults = cases.iter().enumerate().filter(|(_, case)| case.literal.is_none());
		let Some((position, default)) = defaults.next() else {
			return Ok(());
		};
		if let Some((_, second)) = defaults.next() {
			return Err(self.error(second.header, AnalysisErrorType::TooManyDefaultCases));
		}
		if position + 1 != cases.len() {
			return Err(self.error(default.header, AnalysisErrorType::DefaultCaseNotLast));
		}
		Ok(())
	}

	/// Resolves the placeholders of every emitted case.
	fn patch(&mut self, emitted: &[Emitted]) -> anyhow::Result<()> {
		let end = self.instructions.len();
		for (position, case) in emitted.iter().enumerate() {
			if let Some(condition) = case.condition {
				let target = match self.jumps {
					MatchJumps::Chained => emitted.get(position + 1).map_or(end, |next| next.start),
					MatchJumps::Flat => end,
				};
				self.instructions.patch(condition, target)?;
			}
			if let Some(exit) = case.exit {
				self.instructions.patch(exit, end)?;
			}
		}
		Ok(())
	}

	fn error(&self, index: usize, r#type: AnalysisErrorType) -> AnalysisError {
		AnalysisError::new(line_at(self.tokens, index), r#type)
	}
}
