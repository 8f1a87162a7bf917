//! Reads the lexer's token listing.
//!
//! The listing is the hand-off format between the lexer and this front-end:
//! one token per line, a kind optionally followed by a value.
//!
//! ``` text
//! START_PROG
//! NL
//! BLOCK_VAR_DEF
//! NL
//! IDENT int
//! IDENT a
//! ...
//! CONST 3.5
//! ```
//!
//! Blank lines and `#` comments are skipped. A malformed line does not stop
//! the reader; every one is reported and the read fails at the end.

use anyhow::Context;

use super::{Constant, Token, TokenStream};
use crate::error::{CompileError, reader::{ReadError, ReadErrorType, ReaderError}};

/// A reader for token listings
pub struct TokenReader<'a> {
	/// The listing text
	source: &'a str,
	/// Current listing line, 1-based
	line:   usize,
}

impl<'a> TokenReader<'a> {
	pub fn new(source: &'a str) -> Self { Self { source, line: 0 } }

	/// Read every token of the listing.
	pub fn read_tokens(&mut self) -> Result<TokenStream, CompileError> {
		let mut stream = TokenStream::new();
		let mut error_count = 0;
		for (index, text) in self.source.lines().enumerate() {
			self.line = index + 1;
			match self.read_line(text.trim(), &mut stream) {
				Err(ReaderError::ReadError(e)) => {
					log::error!("Token listing error: {e}");
					error_count += 1;
				}
				Err(ReaderError::InternalError(e)) => {
					return Err(e.into());
				}
				Ok(_) => {}
			}
		}
		if error_count != 0 {
			return Err(CompileError::TokenErrors(error_count));
		}
		log::debug!("read {} tokens, {} symbols", stream.len(), stream.symbols.len());
		Ok(stream)
	}

	/// Read a single listing line into `stream`
	fn read_line(&mut self, text: &str, stream: &mut TokenStream) -> Result<(), ReaderError> {
		if text.is_empty() || text.starts_with('#') {
			return Ok(());
		}
		let mut parts = text.splitn(2, char::is_whitespace);
		let kind = parts.next().context("Empty listing line")?;
		let payload = parts.next().map(str::trim).filter(|payload| !payload.is_empty());

		match kind {
			"IDENT" => {
				let name = payload.ok_or_else(|| self.error(ReadErrorType::MissingPayload("IDENT")))?;
				stream.identifier(name);
			}
			"CONST" => {
				let text = payload.ok_or_else(|| self.error(ReadErrorType::MissingPayload("CONST")))?;
				let constant =
					Constant::parse(text).ok_or_else(|| self.error(ReadErrorType::InvalidConstant(text.to_string())))?;
				stream.push(Token::Constant(constant));
			}
			kind => {
				let token = Self::simple_token(kind).ok_or_else(|| self.error(ReadErrorType::UnknownKind(kind.into())))?;
				if payload.is_some() {
					return Err(self.error(ReadErrorType::UnexpectedPayload(kind.to_string())).into());
				}
				stream.push(token);
			}
		}
		Ok(())
	}

	fn error(&self, r#type: ReadErrorType) -> ReadError { ReadError::new(self.line, r#type) }

	/// Tokens without a value
	fn simple_token(kind: &str) -> Option<Token> {
		#[rustfmt::skip]
		let token = match kind {
			"START_PROG" => Token::StartProgram,
			"END_PROG" => Token::EndProgram,
			"NL" => Token::NewLine,
			"TAB" => Token::Tab,
			"BLOCK_VAR_DEF" => Token::BlockVarDef,
			"ENDBLOCK_VAR_DEF" => Token::EndBlockVarDef,
			"CLASS" => Token::Class,
			"MATCH" => Token::Match,
			"CASE" => Token::Case,
			"TRUE" => Token::True,
			"FALSE" => Token::False,
			"AND" => Token::And,
			"OR" => Token::Or,
			"NOT" => Token::Not,
			"COLON" => Token::Colon,
			"POINT" => Token::Dot,
			"UNDERSCORE" => Token::Underscore,
			"ASSIGNMENT" => Token::Assign,
			"EQUAL" => Token::Equal,
			"NOT_EQUAL" => Token::NotEqual,
			"LESS" => Token::Less,
			"LESS_EQUAL" => Token::LessEqual,
			"MORE" => Token::Greater,
			"MORE_EQUAL" => Token::GreaterEqual,
			"PLUS" => Token::Plus,
			"MINUS" => Token::Minus,
			"MULT" => Token::Star,
			"DIV" => Token::Slash,
			_ => return None,
		};
		Some(token)
	}
}
