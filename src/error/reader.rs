/// Token listing related errors
#[derive(thiserror::Error, Debug)]
pub enum ReaderError {
	/// Internal compiler error, should never happen
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	/// Errors encountered while reading a listing line
	#[error(transparent)]
	ReadError(#[from] ReadError),
}

/// A malformed listing line with its line number and type.
#[derive(thiserror::Error, Debug)]
#[error("line {line}: {type}")]
pub struct ReadError {
	/// The listing line where the error occurred.
	line:   usize,
	/// The type of reading error.
	r#type: ReadErrorType,
}

impl ReadError {
	pub fn new(line: usize, r#type: ReadErrorType) -> Self { Self { line, r#type } }

	pub fn line(&self) -> usize { self.line }

	pub fn r#type(&self) -> &ReadErrorType { &self.r#type }
}

/// Types of reading errors.
#[derive(Debug, PartialEq)]
pub enum ReadErrorType {
	/// The token kind is not part of the language.
	UnknownKind(String),
	/// `IDENT` or `CONST` without a value.
	MissingPayload(&'static str),
	/// A value after a kind that takes none.
	UnexpectedPayload(String),
	/// A `CONST` value that is not a number.
	InvalidConstant(String),
}

impl std::fmt::Display for ReadErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ReadErrorType::*;
		match self {
			UnknownKind(kind) => {
				write!(f, "Unknown token kind '{kind}'")
			}
			MissingPayload(kind) => {
				write!(f, "Token {kind} needs a value")
			}
			UnexpectedPayload(kind) => {
				write!(f, "Token {kind} takes no value")
			}
			InvalidConstant(text) => {
				write!(f, "Invalid numeric constant '{text}'")
			}
		}
	}
}
