//! Semantic analysis and three-address code generation.
//!
//! A program is laid out as:
//!
//! ``` BNF
//! program      → "start_prog" NL "block_var_def" NL block "endblock_var_def" NL statement* "end_prog" ;
//! statement    → ( expression | match ) NL ;
//! expression   → path "=" rhs ;
//! path         → IDENT ( "." IDENT )* ;
//! ```
//!
//! The declaration block fills the identifier table, which is read-only
//! from then on. Statements are analyzed in order, each appending its
//! instructions to the table. The first error stops the whole pass.

mod declaration;
pub(crate) mod expression;
mod handlers;
mod match_case;
mod statement;

use declaration::DeclarationParser;
use expression::ExpressionAnalyzer;
use statement::StatementSequencer;

use crate::{CompileOptions, error::analyzer::{AnalysisError, AnalysisErrorType, AnalyzerError}, instruction::InstructionTable, symbols::SymbolTable, token::{Token, TokenStream}};

/// Source line of `tokens[index]`, counted from `1` by the newlines before it.
pub(crate) fn line_at(tokens: &[Token], index: usize) -> usize {
	1 + tokens[..index.min(tokens.len())].iter().filter(|token| **token == Token::NewLine).count()
}

/// Output of a successful analysis.
#[derive(Debug)]
pub struct CompiledProgram {
	pub symbols:      SymbolTable,
	pub instructions: InstructionTable,
}

pub struct Analyzer {
	tokens:  Vec<Token>,
	symbols: SymbolTable,
	options: CompileOptions,
}

impl Analyzer {
	pub fn new(stream: TokenStream, options: CompileOptions) -> Self {
		Self { tokens: stream.tokens, symbols: stream.symbols, options }
	}

	/// Analyze the whole program.
	pub fn analyze(mut self) -> Result<CompiledProgram, AnalyzerError> {
		let tokens = self.tokens.as_slice();
		let error = |index: usize, r#type| AnalysisError::new(line_at(tokens, index), r#type);

		let start = tokens.iter().position(|token| *token != Token::NewLine).unwrap_or(tokens.len());
		if tokens.get(start) != Some(&Token::StartProgram) {
			return Err(error(start, AnalysisErrorType::MissingProgramStart).into());
		}
		let end = tokens.iter().rposition(|token| *token != Token::NewLine).unwrap_or(start);
		if end == start || tokens[end] != Token::EndProgram {
			return Err(error(end + 1, AnalysisErrorType::MissingProgramEnd).into());
		}
		let body = &tokens[..end];

		let block = (start + 1..end).find(|&index| body[index] != Token::NewLine).unwrap_or(end);
		if body.get(block) != Some(&Token::BlockVarDef) {
			return Err(error(block, AnalysisErrorType::MissingBlockStart).into());
		}
		if body.get(block + 1) != Some(&Token::NewLine) {
			return Err(error(block + 1, AnalysisErrorType::ExpectedNewLine).into());
		}

		let block_end = DeclarationParser::new(body, &mut self.symbols).parse(block + 1)?;
		if !matches!(body.get(block_end + 1), None | Some(Token::NewLine)) {
			return Err(error(block_end + 1, AnalysisErrorType::ExpectedNewLine).into());
		}
		log::debug!("declaration block ends at token {block_end}, {} identifiers known", self.symbols.len());

		let mut instructions = InstructionTable::new();
		StatementSequencer::new(body, &self.symbols, &mut instructions, self.options.match_jumps).run(block_end + 1)?;
		log::debug!("analysis emitted {} instructions", instructions.len());

		Ok(CompiledProgram { symbols: self.symbols, instructions })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{MatchJumps, token::words};

	fn analyze_with(source: &str, options: CompileOptions) -> Result<Vec<String>, AnalysisErrorType> {
		Analyzer::new(words(source), options)
			.analyze()
			.map(|program| program.instructions.iter().map(ToString::to_string).collect())
			.map_err(|e| e.kind().cloned().expect("analysis error"))
	}

	/// Compiles a program made of `declarations` and `body`.
	fn compile(declarations: &str, body: &str) -> Result<Vec<String>, AnalysisErrorType> {
		let source = format!("start_prog\nblock_var_def\n{declarations}\nendblock_var_def\n{body}\nend_prog");
		analyze_with(&source, CompileOptions::default())
	}

	#[test]
	fn line_numbers() {
		let stream = words("a\nb\n\nc");
		assert_eq!(line_at(&stream.tokens, 0), 1);
		assert_eq!(line_at(&stream.tokens, 2), 2);
		assert_eq!(line_at(&stream.tokens, 5), 4);
		assert_eq!(line_at(&stream.tokens, 99), 4);
	}

	#[test]
	fn not_emits_three_instructions() {
		let listing = compile("bool a\nbool x", "a = not x").unwrap();
		assert_eq!(listing, ["$0 = True", "if x goto 2", "$0 = False", "a = $0"]);
	}

	#[test]
	fn and_emits_six_instructions() {
		let listing = compile("bool a\nbool x\nbool y", "a = x and y").unwrap();
		assert_eq!(listing, [
			"$0 = True",
			"if x goto 4",
			"$0 = False",
			"goto 6",
			"if y goto 6",
			"$0 = False",
			"a = $0"
		]);
	}

	#[test]
	fn or_emits_four_instructions() {
		let listing = compile("bool a\nbool x\nbool y", "a = x or y").unwrap();
		assert_eq!(listing, ["$0 = True", "if x goto 4", "if y goto 4", "$0 = False", "a = $0"]);
	}

	#[test]
	fn arithmetic_without_widening() {
		assert_eq!(
			compile("int a\nint b\nfloat c", "a = b + c"),
			Err(AnalysisErrorType::TypeIncompatibility { expected: "int".into(), found: "float".into() })
		);
		assert_eq!(compile("int a\nint b\nint c", "a = b + c").unwrap(), ["$0 = b + c", "a = $0"]);
	}

	#[test]
	fn precedence_tiers() {
		let listing = compile("int a\nint b\nint c\nint d", "a = b + c * d - 2").unwrap();
		assert_eq!(listing, ["$0 = c * d", "$1 = b + $0", "$2 = $1 - 2", "a = $2"]);

		let listing = compile("bool a\nint x\nint y\nbool z", "a = x == y and z").unwrap();
		assert_eq!(listing, [
			"$0 = True",
			"if x == y goto 3",
			"$0 = False",
			"$3 = True",
			"if $0 goto 7",
			"$3 = False",
			"goto 9",
			"if z goto 9",
			"$3 = False",
			"a = $3"
		]);

		let listing = compile("bool a\nbool x\nbool y", "a = not x or y").unwrap();
		assert_eq!(listing[3..], ["$3 = True", "if $0 goto 7", "if y goto 7", "$3 = False", "a = $3"]);
	}

	#[test]
	fn boolean_gate() {
		assert_eq!(
			compile("int a\nint x\nint y", "a = x == y"),
			Err(AnalysisErrorType::TypeIncompatibility { expected: "int".into(), found: "bool".into() })
		);
		assert_eq!(
			compile("int a", "a = True"),
			Err(AnalysisErrorType::TypeIncompatibility { expected: "int".into(), found: "bool".into() })
		);
		assert_eq!(compile("bool a\nint x", "a = x < 1 == x"), Err(AnalysisErrorType::RelationCount(2)));
		assert_eq!(compile("bool a", "a = False").unwrap(), ["a = False"]);
	}

	#[test]
	fn operand_types() {
		assert_eq!(
			compile("bool a\nint x\nbool y", "a = x and y"),
			Err(AnalysisErrorType::WrongTypeForOperator { operator: "and", found: "int".into() })
		);
		assert_eq!(
			compile("bool a\nint x", "a = not x"),
			Err(AnalysisErrorType::WrongTypeForOperator { operator: "not", found: "int".into() })
		);
		assert_eq!(
			compile("bool a\nbool x", "a = x + x"),
			Err(AnalysisErrorType::WrongTypeForOperator { operator: "+", found: "bool".into() })
		);
		assert_eq!(
			compile("bool a\nint x\nfloat y", "a = x < y"),
			Err(AnalysisErrorType::TypeIncompatibility { expected: "int".into(), found: "float".into() })
		);
	}

	#[test]
	fn malformed_statements() {
		let declarations = "int a\nint b";
		assert_eq!(compile(declarations, "a = b = 1"), Err(AnalysisErrorType::AssignmentCount(2)));
		assert_eq!(compile(declarations, "a"), Err(AnalysisErrorType::AssignmentCount(0)));
		assert_eq!(compile(declarations, "a b = 1"), Err(AnalysisErrorType::WrongToken("identifier")));
		assert_eq!(compile(declarations, "a ="), Err(AnalysisErrorType::MissingRightHandSide));
		assert_eq!(compile(declarations, "a + b = 1"), Err(AnalysisErrorType::WrongToken("+")));
		assert_eq!(compile(declarations, "a = b +"), Err(AnalysisErrorType::WrongToken("+")));
		assert_eq!(compile(declarations, "a = b 1"), Err(AnalysisErrorType::WrongExpression));
		assert_eq!(compile(declarations, "a = c"), Err(AnalysisErrorType::UnknownIdentifier("c".into())));
		assert_eq!(compile(declarations, "a = int"), Err(AnalysisErrorType::ExpectedVarName));
		assert_eq!(compile(declarations, "a = b :"), Err(AnalysisErrorType::WrongToken(":")));
		assert_eq!(compile(declarations, "case"), Err(AnalysisErrorType::UnexpectedStatement("case")));
		assert_eq!(compile(declarations, "\ta = b"), Err(AnalysisErrorType::UnexpectedStatement("tab")));
	}

	#[test]
	fn field_paths() {
		let declarations = "class Vec :\n\tfloat x\nclass Body :\n\tVec pos\n\tbool alive\nBody b\nfloat f";
		assert_eq!(compile(declarations, "b . pos . x = f * 2.0").unwrap(), ["$0 = f * 2.0", "b.pos.x = $0"]);
		assert_eq!(compile(declarations, "b . alive = not b . alive").unwrap()[1], "if b.alive goto 2");
		assert_eq!(
			compile(declarations, "b . pos . y = f"),
			Err(AnalysisErrorType::UnknownField("b.pos.y".into()))
		);
		assert_eq!(compile(declarations, "b . pos = f"), Err(AnalysisErrorType::TypeIncompatibility {
			expected: "Vec".into(),
			found:    "float".into(),
		}));
	}

	#[test]
	fn match_with_duplicate_defaults() {
		let body = "match n :\n\tcase _ :\n\t\tn = 1\n\tcase _ :\n\t\tn = 2";
		assert_eq!(compile("int n", body), Err(AnalysisErrorType::TooManyDefaultCases));
		let body = "match n :\n\tcase _ :\n\t\tn = 1\n\tcase 1 :\n\t\tn = 2";
		assert_eq!(compile("int n", body), Err(AnalysisErrorType::DefaultCaseNotLast));
	}

	#[test]
	fn jumps_stay_inside_the_table() {
		let body = "match n :\n\tcase 1 :\n\t\tok = n > 0\n\tcase 2 :\n\t\tok = not ok\nn = n + 1";
		for match_jumps in [MatchJumps::Chained, MatchJumps::Flat] {
			let source = format!("start_prog\nblock_var_def\nint n\nbool ok\nendblock_var_def\n{body}\nend_prog");
			let program = Analyzer::new(words(&source), CompileOptions { match_jumps }).analyze().unwrap();
			let table = &program.instructions;
			for instruction in table.iter() {
				if let Some(target) = instruction.jump_target() {
					assert!(target.unwrap() < table.len(), "{instruction} leaves a table of {}", table.len());
				}
			}
		}
	}

	#[test]
	fn statements_follow_each_other() {
		let listing = compile("int n\nbool ok", "n = 1\n\nmatch n :\n\tcase 1 :\n\t\tn = 2\nok = True").unwrap();
		assert_eq!(listing, ["n = 1", "if n != 1 goto 4", "n = 2", "goto 4", "ok = True"]);
	}

	#[test]
	fn listing_round_trips() {
		let source = "start_prog\nblock_var_def\nint n\nbool ok\nendblock_var_def\nmatch n :\n\tcase 3 :\n\t\tok = n \
		              >= 2 or ok\n\tcase _ :\n\t\tok = False\nend_prog";
		let program = Analyzer::new(words(source), CompileOptions::default()).analyze().unwrap();
		let listing = program.instructions.to_string();
		assert_eq!(InstructionTable::parse_listing(&listing).unwrap(), program.instructions);
	}

	#[test]
	fn program_structure() {
		let options = CompileOptions::default;
		assert_eq!(analyze_with("", options()), Err(AnalysisErrorType::MissingProgramStart));
		assert_eq!(analyze_with("block_var_def", options()), Err(AnalysisErrorType::MissingProgramStart));
		assert_eq!(analyze_with("start_prog", options()), Err(AnalysisErrorType::MissingProgramEnd));
		assert_eq!(
			analyze_with("start_prog\nblock_var_def\nendblock_var_def", options()),
			Err(AnalysisErrorType::MissingProgramEnd)
		);
		assert_eq!(analyze_with("start_prog\nend_prog", options()), Err(AnalysisErrorType::MissingBlockStart));
		assert_eq!(
			analyze_with("start_prog\nblock_var_def\nint a\nend_prog", options()),
			Err(AnalysisErrorType::MissingBlockEnd)
		);
		assert_eq!(
			analyze_with("start_prog\nblock_var_def int a\nendblock_var_def\nend_prog", options()),
			Err(AnalysisErrorType::ExpectedNewLine)
		);
		assert!(analyze_with("\nstart_prog\nblock_var_def\nendblock_var_def\nend_prog\n", options()).unwrap().is_empty());
	}

	#[test]
	fn errors_report_their_line() {
		let source = "start_prog\nblock_var_def\nint a\nendblock_var_def\na = 1\na = 1.5\nend_prog";
		let error = Analyzer::new(words(source), CompileOptions::default()).analyze().unwrap_err();
		assert_eq!(error.to_string(), "line 6: Expected type int, found float");
	}
}
