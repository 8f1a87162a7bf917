//! The declaration block between `block_var_def` and `endblock_var_def`.
//!
//! Line grammar:
//!
//! ``` BNF
//! block        → ( line? NL )* ;
//! line         → variable | class ;
//! variable     → TYPE NAME ;
//! class        → "class" NAME ":" ( NL TAB TYPE NAME )+ ;
//! ```
//!
//! The parser walks the tokens once and judges each one by its neighbours.
//! Inside a class body it remembers which class it is filling and whether a
//! field line is still waiting for its name.

use super::line_at;
use crate::{error::analyzer::{AnalysisError, AnalysisErrorType}, symbols::{DeclareError, SymbolId, SymbolTable}, token::Token};

#[derive(Debug, Clone, Copy)]
enum State {
	/// Between declarations.
	Declarations,
	/// After `class NAME`.
	ClassBody {
		class:      SymbolId,
		/// The header's `:` was seen.
		opened:     bool,
		/// Type of a field line still waiting for its name.
		field_type: Option<SymbolId>,
	},
}

pub(crate) struct DeclarationParser<'a> {
	tokens:  &'a [Token],
	symbols: &'a mut SymbolTable,
}

impl<'a> DeclarationParser<'a> {
	pub fn new(tokens: &'a [Token], symbols: &'a mut SymbolTable) -> Self { Self { tokens, symbols } }

	/// Declares everything from `start` on and returns the index of
	/// `endblock_var_def`. The token before `start` counts as a newline.
	pub fn parse(&mut self, start: usize) -> Result<usize, AnalysisError> {
		let mut state = State::Declarations;
		for index in start..self.tokens.len() {
			let token = &self.tokens[index];
			let prev = if index == start { &Token::NewLine } else { &self.tokens[index - 1] };
			let next = self.tokens.get(index + 1);

			state = match state {
				State::Declarations => match token {
					Token::NewLine => match prev {
						Token::NewLine => state,
						Token::Identifier(id) if self.symbols.get(*id).is_var() => state,
						_ => return Err(self.error(index, AnalysisErrorType::ExpectedVarName)),
					},
					Token::EndBlockVarDef => {
						if prev != &Token::NewLine {
							return Err(self.error(index, AnalysisErrorType::ExpectedNewLine));
						}
						return Ok(index);
					}
					Token::Class => {
						if prev != &Token::NewLine {
							return Err(self.error(index, AnalysisErrorType::ExpectedNewLine));
						}
						state
					}
					Token::Identifier(id) => match prev {
						Token::NewLine => {
							if !self.symbols.get(*id).is_type() {
								return Err(self.error(index, AnalysisErrorType::ExpectedTypeName));
							}
							state
						}
						Token::Class => {
							self.symbols.declare_type(*id).map_err(|e| self.declare_error(index, e))?;
							log::debug!("declared class {}", self.symbols.name(*id));
							State::ClassBody { class: *id, opened: false, field_type: None }
						}
						Token::Identifier(r#type) if self.symbols.get(*r#type).is_type() => {
							if self.symbols.get(*id).is_type() {
								return Err(self.error(index, AnalysisErrorType::ExpectedVarName));
							}
							self.symbols.declare_var(*id, *r#type).map_err(|e| self.declare_error(index, e))?;
							log::debug!("declared {} {}", self.symbols.name(*r#type), self.symbols.name(*id));
							state
						}
						_ => return Err(self.error(index, AnalysisErrorType::ExpectedNewLine)),
					},
					token => return Err(self.error(index, AnalysisErrorType::WrongToken(token.describe()))),
				},
				State::ClassBody { class, opened, field_type } => match token {
					Token::Colon if !opened && prev == &Token::Identifier(class) => {
						State::ClassBody { class, opened: true, field_type }
					}
					Token::NewLine => {
						if !opened {
							return Err(self.error(index, AnalysisErrorType::ExpectedColon));
						}
						if field_type.is_some() {
							return Err(self.error(index, AnalysisErrorType::ExpectedVarName));
						}
						match (prev, next) {
							(_, Some(Token::Tab)) => state,
							(Token::Colon, _) => return Err(self.error(index, AnalysisErrorType::ExpectedTab)),
							_ => State::Declarations,
						}
					}
					Token::Tab => {
						if prev != &Token::NewLine {
							return Err(self.error(index, AnalysisErrorType::ExpectedNewLine));
						}
						state
					}
					Token::Identifier(id) => match (prev, field_type) {
						(Token::Tab, None) => {
							if !self.symbols.get(*id).is_type() {
								return Err(self.error(index, AnalysisErrorType::ExpectedTypeName));
							}
							if !next.is_some_and(Token::is_identifier) {
								return Err(self.error(index, AnalysisErrorType::ExpectedVarName));
							}
							State::ClassBody { class, opened, field_type: Some(*id) }
						}
						(Token::Identifier(_), Some(r#type)) => {
							if self.symbols.get(*id).is_type() {
								return Err(self.error(index, AnalysisErrorType::ExpectedVarName));
							}
							let position =
								self.symbols.declare_field(class, *id, r#type).map_err(|e| self.declare_error(index, e))?;
							log::debug!(
								"declared field {}.{} #{position}",
								self.symbols.name(class),
								self.symbols.name(*id)
							);
							State::ClassBody { class, opened, field_type: None }
						}
						_ => return Err(self.error(index, AnalysisErrorType::WrongToken("identifier"))),
					},
					token => return Err(self.error(index, AnalysisErrorType::WrongToken(token.describe()))),
				},
			};
		}
		Err(self.error(self.tokens.len(), AnalysisErrorType::MissingBlockEnd))
	}

	fn error(&self, index: usize, r#type: AnalysisErrorType) -> AnalysisError {
		AnalysisError::new(line_at(self.tokens, index), r#type)
	}

	fn declare_error(&self, index: usize, error: DeclareError) -> AnalysisError {
		self.error(index, match error {
			DeclareError::Redeclared(name) => AnalysisErrorType::IdentifierRedeclaration(name),
			DeclareError::FieldRedeclared(name) => AnalysisErrorType::FieldRedeclaration(name),
			DeclareError::NotAType(_) => AnalysisErrorType::ExpectedTypeName,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::token::words;

	/// Parses a declaration block given without its markers.
	fn declare(block: &str) -> Result<SymbolTable, AnalysisErrorType> {
		let mut stream = words(&format!("{block}\nendblock_var_def"));
		let end = DeclarationParser::new(&stream.tokens, &mut stream.symbols).parse(0).map_err(|e| e.r#type().clone())?;
		assert_eq!(stream.tokens[end], Token::EndBlockVarDef);
		Ok(stream.symbols)
	}

	fn id(symbols: &SymbolTable, name: &str) -> SymbolId { symbols.lookup(name).unwrap() }

	#[test]
	fn primitive_variables() {
		let symbols = declare("int a\nfloat b\nbool c").unwrap();
		assert_eq!(symbols.get(id(&symbols, "a")).r#type, Some(SymbolTable::INT));
		assert_eq!(symbols.get(id(&symbols, "b")).r#type, Some(SymbolTable::FLOAT));
		assert_eq!(symbols.get(id(&symbols, "c")).r#type, Some(SymbolTable::BOOL));
		assert!(symbols.get(id(&symbols, "c")).is_var());
	}

	#[test]
	fn class_and_instances() {
		let mut symbols = declare("class Point :\n\tint x\n\tint y\nPoint p\nPoint q").unwrap();
		let point = id(&symbols, "Point");
		let p = id(&symbols, "p");
		let q = id(&symbols, "q");
		assert!(symbols.get(point).is_type());
		assert_eq!(symbols.get(p).r#type, Some(point));

		let names: Vec<&str> = symbols.get(p).fields.iter().map(|f| f.name.as_str()).collect();
		assert_eq!(names, ["x", "y"]);
		assert!(symbols.get(p).fields.iter().all(|f| f.r#type == Some(SymbolTable::INT)));

		symbols.get_mut(p).fields[0].r#type = Some(SymbolTable::BOOL);
		assert_eq!(symbols.get(q).fields[0].r#type, Some(SymbolTable::INT));
		assert_eq!(symbols.get(point).fields[0].r#type, Some(SymbolTable::INT));
	}

	#[test]
	fn nested_class_fields() {
		let symbols = declare("class Inner :\n\tfloat v\nclass Outer :\n\tInner i\n\tbool ok\nOuter o").unwrap();
		let o = symbols.get(id(&symbols, "o"));
		let inner = o.field("i").unwrap();
		assert_eq!(inner.index, 0);
		assert_eq!(inner.field("v").unwrap().r#type, Some(SymbolTable::FLOAT));
		assert_eq!(o.field("ok").unwrap().index, 1);
	}

	#[test]
	fn blank_lines_are_skipped() {
		assert!(declare("int a\n\nint b").is_ok());
	}

	#[test]
	fn field_names_do_not_collide_with_variables() {
		let symbols = declare("int x\nclass P :\n\tfloat x\nP p").unwrap();
		assert_eq!(symbols.get(id(&symbols, "x")).r#type, Some(SymbolTable::INT));
		assert_eq!(symbols.get(id(&symbols, "p")).field("x").unwrap().r#type, Some(SymbolTable::FLOAT));
	}

	#[test]
	fn redeclarations() {
		assert_eq!(declare("int a\nfloat a"), Err(AnalysisErrorType::IdentifierRedeclaration("a".into())));
		assert_eq!(declare("class P :\n\tint x\n\tfloat x"), Err(AnalysisErrorType::FieldRedeclaration("x".into())));
		assert_eq!(
			declare("class P :\n\tint x\nclass P :\n\tint y"),
			Err(AnalysisErrorType::IdentifierRedeclaration("P".into()))
		);
	}

	#[test]
	fn malformed_lines() {
		assert_eq!(declare("int"), Err(AnalysisErrorType::ExpectedVarName));
		assert_eq!(declare("a b"), Err(AnalysisErrorType::ExpectedTypeName));
		assert_eq!(declare("int a b"), Err(AnalysisErrorType::ExpectedNewLine));
		assert_eq!(declare("int float"), Err(AnalysisErrorType::ExpectedVarName));
		assert_eq!(declare("int a class P :\n\tint x"), Err(AnalysisErrorType::ExpectedNewLine));
		assert_eq!(declare("\tint a"), Err(AnalysisErrorType::WrongToken("tab")));
	}

	#[test]
	fn malformed_classes() {
		assert_eq!(declare("class P :\nint a"), Err(AnalysisErrorType::ExpectedTab));
		assert_eq!(declare("class P\n\tint x"), Err(AnalysisErrorType::ExpectedColon));
		assert_eq!(declare("class P :\n\tq x"), Err(AnalysisErrorType::ExpectedTypeName));
		assert_eq!(declare("class P :\n\tint"), Err(AnalysisErrorType::ExpectedVarName));
		assert_eq!(declare("class P :\n\tint int"), Err(AnalysisErrorType::ExpectedVarName));
		assert_eq!(declare("class P :\n\tint x :"), Err(AnalysisErrorType::WrongToken(":")));
	}

	#[test]
	fn missing_end_marker() {
		let mut stream = words("int a\n");
		let result = DeclarationParser::new(&stream.tokens, &mut stream.symbols).parse(0);
		assert_eq!(result.unwrap_err().r#type(), &AnalysisErrorType::MissingBlockEnd);
	}

	#[test]
	fn errors_carry_lines() {
		let mut stream = words("int a\nint b\nfloat a\nendblock_var_def");
		let error = DeclarationParser::new(&stream.tokens, &mut stream.symbols).parse(0).unwrap_err();
		assert_eq!(error.line(), 3);
	}
}
