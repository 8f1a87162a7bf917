//! Tokens as the lexer delivers them.
//!
//! The lexer has already done all character-level work: keywords are told
//! apart from names, numbers carry their inferred type, and indentation is
//! one [`Token::Tab`] per level. Lines are significant, so newlines and tabs
//! are real tokens here rather than ignored whitespace.
//!
//! Identifier tokens only carry a [`SymbolId`]. Two occurrences of the same
//! name are the same symbol, which is what ties an expression back to the
//! declaration it refers to.

mod reader;

use std::fmt::Display;

pub use reader::TokenReader;

use crate::symbols::{SymbolId, SymbolTable};

/// A numeric literal and its inferred primitive type.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
	/// Literal text, emitted unchanged.
	pub text:   String,
	/// [`SymbolTable::INT`] or [`SymbolTable::FLOAT`].
	pub r#type: SymbolId,
}

impl Constant {
	/// Infers the type from the literal: a fractional part makes it `float`.
	pub fn parse(text: &str) -> Option<Self> {
		let r#type = if text.contains('.') {
			text.parse::<f64>().ok().filter(|value| value.is_finite())?;
			SymbolTable::FLOAT
		} else {
			text.parse::<u64>().ok()?;
			SymbolTable::INT
		};
		Some(Self { text: text.to_string(), r#type })
	}
}

/// The closed set of tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
	/// `start_prog`.
	StartProgram,
	/// `end_prog`.
	EndProgram,
	/// End of a line.
	NewLine,
	/// One level of indentation.
	Tab,
	/// `block_var_def`, opens the declaration block.
	BlockVarDef,
	/// `endblock_var_def`, closes the declaration block.
	EndBlockVarDef,
	Class,
	Match,
	Case,
	/// Boolean literal `True`.
	True,
	/// Boolean literal `False`.
	False,
	And,
	Or,
	Not,
	/// Colon `:`.
	Colon,
	/// Dot `.`.
	Dot,
	/// Underscore `_`, the default case.
	Underscore,
	/// Assignment `=`.
	Assign,
	/// Equal `==`.
	Equal,
	/// Not equal `!=`.
	NotEqual,
	/// Less than `<`.
	Less,
	/// Less than or equal `<=`.
	LessEqual,
	/// Greater than `>`.
	Greater,
	/// Greater than or equal `>=`.
	GreaterEqual,
	/// Plus `+`.
	Plus,
	/// Minus `-`.
	Minus,
	/// Asterisk `*`.
	Star,
	/// Slash `/`.
	Slash,
	/// A type, variable or field name.
	Identifier(SymbolId),
	/// A numeric literal.
	Constant(Constant),
}

impl Token {
	/// Short human readable kind, used in error messages.
	pub fn describe(&self) -> &'static str {
		match self {
			Token::StartProgram => "start_prog",
			Token::EndProgram => "end_prog",
			Token::NewLine => "newline",
			Token::Tab => "tab",
			Token::BlockVarDef => "block_var_def",
			Token::EndBlockVarDef => "endblock_var_def",
			Token::Class => "class",
			Token::Match => "match",
			Token::Case => "case",
			Token::True => "True",
			Token::False => "False",
			Token::And => "and",
			Token::Or => "or",
			Token::Not => "not",
			Token::Colon => ":",
			Token::Dot => ".",
			Token::Underscore => "_",
			Token::Assign => "=",
			Token::Equal => "==",
			Token::NotEqual => "!=",
			Token::Less => "<",
			Token::LessEqual => "<=",
			Token::Greater => ">",
			Token::GreaterEqual => ">=",
			Token::Plus => "+",
			Token::Minus => "-",
			Token::Star => "*",
			Token::Slash => "/",
			Token::Identifier(_) => "identifier",
			Token::Constant(_) => "constant",
		}
	}

	pub fn is_identifier(&self) -> bool { matches!(self, Token::Identifier(_)) }

	/// Tokens allowed inside an expression statement.
	pub fn is_expression_part(&self) -> bool {
		matches!(self, Token::Identifier(_) | Token::Constant(_) | Token::True | Token::False | Token::Assign | Token::Dot)
			|| Operator::from_token(self).is_some()
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Token::Constant(constant) => write!(f, "{}", constant.text),
			token => write!(f, "{}", token.describe()),
		}
	}
}

/// Operators the expression analyzer reduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
	Not,
	And,
	Or,
	Star,
	Slash,
	Plus,
	Minus,
	Equal,
	NotEqual,
	Less,
	LessEqual,
	Greater,
	GreaterEqual,
}

impl Operator {
	pub fn from_token(token: &Token) -> Option<Self> {
		Some(match token {
			Token::Not => Operator::Not,
			Token::And => Operator::And,
			Token::Or => Operator::Or,
			Token::Star => Operator::Star,
			Token::Slash => Operator::Slash,
			Token::Plus => Operator::Plus,
			Token::Minus => Operator::Minus,
			Token::Equal => Operator::Equal,
			Token::NotEqual => Operator::NotEqual,
			Token::Less => Operator::Less,
			Token::LessEqual => Operator::LessEqual,
			Token::Greater => Operator::Greater,
			Token::GreaterEqual => Operator::GreaterEqual,
			_ => return None,
		})
	}

	/// Text of the operator inside an emitted instruction.
	pub fn symbol(self) -> &'static str {
		match self {
			Operator::Not => "not",
			Operator::And => "and",
			Operator::Or => "or",
			Operator::Star => "*",
			Operator::Slash => "/",
			Operator::Plus => "+",
			Operator::Minus => "-",
			Operator::Equal => "==",
			Operator::NotEqual => "!=",
			Operator::Less => "<",
			Operator::LessEqual => "<=",
			Operator::Greater => ">",
			Operator::GreaterEqual => ">=",
		}
	}

	pub fn is_relational(self) -> bool {
		matches!(
			self,
			Operator::Equal
				| Operator::NotEqual
				| Operator::Less
				| Operator::LessEqual
				| Operator::Greater
				| Operator::GreaterEqual
		)
	}

	pub fn is_logical(self) -> bool { matches!(self, Operator::Not | Operator::And | Operator::Or) }

	pub fn is_arithmetic(self) -> bool {
		matches!(self, Operator::Star | Operator::Slash | Operator::Plus | Operator::Minus)
	}
}

impl Display for Operator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.symbol()) }
}

/// The lexer's output: the ordered tokens plus the table their identifiers
/// point into.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
	pub tokens:  Vec<Token>,
	pub symbols: SymbolTable,
}

impl TokenStream {
	pub fn new() -> Self { Self::default() }

	pub fn push(&mut self, token: Token) -> &mut Self {
		self.tokens.push(token);
		self
	}

	/// Pushes an identifier token for `name`, interning it.
	pub fn identifier(&mut self, name: &str) -> &mut Self {
		let id = self.symbols.intern(name);
		self.push(Token::Identifier(id))
	}

	pub fn len(&self) -> usize { self.tokens.len() }

	pub fn is_empty(&self) -> bool { self.tokens.is_empty() }
}

/// Builds a token stream from space separated words, one source line per
/// text line. Leading tabs become [`Token::Tab`]s, every line break a
/// [`Token::NewLine`].
#[cfg(test)]
pub(crate) fn words(source: &str) -> TokenStream {
	let mut stream = TokenStream::new();
	let lines: Vec<&str> = source.lines().collect();
	for (number, line) in lines.iter().enumerate() {
		for _ in line.chars().take_while(|&c| c == '\t') {
			stream.push(Token::Tab);
		}
		for word in line.split_whitespace() {
			let token = match word {
				"start_prog" => Token::StartProgram,
				"end_prog" => Token::EndProgram,
				"block_var_def" => Token::BlockVarDef,
				"endblock_var_def" => Token::EndBlockVarDef,
				"class" => Token::Class,
				"match" => Token::Match,
				"case" => Token::Case,
				"True" => Token::True,
				"False" => Token::False,
				"and" => Token::And,
				"or" => Token::Or,
				"not" => Token::Not,
				":" => Token::Colon,
				"." => Token::Dot,
				"_" => Token::Underscore,
				"=" => Token::Assign,
				"==" => Token::Equal,
				"!=" => Token::NotEqual,
				"<" => Token::Less,
				"<=" => Token::LessEqual,
				">" => Token::Greater,
				">=" => Token::GreaterEqual,
				"+" => Token::Plus,
				"-" => Token::Minus,
				"*" => Token::Star,
				"/" => Token::Slash,
				word if word.starts_with(|c: char| c.is_ascii_digit()) => {
					Token::Constant(Constant::parse(word).expect("numeric literal"))
				}
				word => {
					stream.identifier(word);
					continue;
				}
			};
			stream.push(token);
		}
		if number + 1 < lines.len() {
			stream.push(Token::NewLine);
		}
	}
	stream
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn constants_infer_their_type() {
		assert_eq!(Constant::parse("42").unwrap().r#type, SymbolTable::INT);
		assert_eq!(Constant::parse("4.5").unwrap().r#type, SymbolTable::FLOAT);
		assert_eq!(Constant::parse("0.0").unwrap().text, "0.0");
		assert!(Constant::parse("4x").is_none());
		assert!(Constant::parse("1.2.3").is_none());
		assert!(Constant::parse("-").is_none());
	}

	#[test]
	fn identifiers_share_symbols() {
		let stream = words("a = a + b");
		assert_eq!(stream.tokens[0], stream.tokens[2]);
		assert_ne!(stream.tokens[0], stream.tokens[4]);
	}

	#[test]
	fn words_keep_layout() {
		let stream = words("class P :\n\tint x\nP p");
		let kinds: Vec<&str> = stream.tokens.iter().map(Token::describe).collect();
		assert_eq!(kinds, [
			"class",
			"identifier",
			":",
			"newline",
			"tab",
			"identifier",
			"identifier",
			"newline",
			"identifier",
			"identifier"
		]);
	}

	#[test]
	fn expression_whitelist() {
		assert!(Token::Not.is_expression_part());
		assert!(Token::GreaterEqual.is_expression_part());
		assert!(Token::Dot.is_expression_part());
		assert!(!Token::Colon.is_expression_part());
		assert!(!Token::Tab.is_expression_part());
		assert!(!Token::Case.is_expression_part());
	}

	#[test]
	fn operator_classes() {
		assert!(Operator::LessEqual.is_relational());
		assert!(Operator::Not.is_logical());
		assert!(Operator::Slash.is_arithmetic());
		assert!(!Operator::And.is_relational());
		assert_eq!(Operator::from_token(&Token::NotEqual).map(Operator::symbol), Some("!="));
		assert_eq!(Operator::from_token(&Token::Assign), None);
	}
}
