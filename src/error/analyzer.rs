#[derive(thiserror::Error, Debug)]
pub enum AnalyzerError {
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	#[error(transparent)]
	Analysis(#[from] AnalysisError),
}

impl AnalyzerError {
	/// The analysis error kind, `None` for internal errors.
	pub fn kind(&self) -> Option<&AnalysisErrorType> {
		match self {
			AnalyzerError::Analysis(error) => Some(error.r#type()),
			AnalyzerError::InternalError(_) => None,
		}
	}
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("line {line}: {type}")]
pub struct AnalysisError {
	line:   usize,
	r#type: AnalysisErrorType,
}

impl AnalysisError {
	pub fn new(line: usize, r#type: AnalysisErrorType) -> Self { Self { line, r#type } }

	pub fn line(&self) -> usize { self.line }

	pub fn r#type(&self) -> &AnalysisErrorType { &self.r#type }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisErrorType {
	// Program structure
	MissingProgramStart,
	MissingProgramEnd,
	MissingBlockStart,
	MissingBlockEnd,
	// Declaration block
	IdentifierRedeclaration(String),
	FieldRedeclaration(String),
	ExpectedTypeName,
	ExpectedVarName,
	ExpectedTab,
	ExpectedNewLine,
	// Statements and expressions
	UnexpectedStatement(&'static str),
	UnknownIdentifier(String),
	UnknownField(String),
	WrongToken(&'static str),
	AssignmentCount(usize),
	MissingRightHandSide,
	WrongExpression,
	TypeIncompatibility { expected: String, found: String },
	WrongTypeForOperator { operator: &'static str, found: String },
	RelationCount(usize),
	// Match construct
	ExpectedIdentifier,
	ExpectedCase,
	ExpectedConstant,
	ExpectedColon,
	TooManyDefaultCases,
	DefaultCaseNotLast,
}

impl std::fmt::Display for AnalysisErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use AnalysisErrorType::*;
		match self {
			MissingProgramStart => write!(f, "Program must start with start_prog"),
			MissingProgramEnd => write!(f, "Program must end with end_prog"),
			MissingBlockStart => write!(f, "Expected block_var_def"),
			MissingBlockEnd => write!(f, "Expected endblock_var_def"),
			IdentifierRedeclaration(name) => write!(f, "Identifier '{name}' is already declared"),
			FieldRedeclaration(name) => write!(f, "Field '{name}' is already declared"),
			ExpectedTypeName => write!(f, "Expected type name"),
			ExpectedVarName => write!(f, "Expected variable name"),
			ExpectedTab => write!(f, "Expected tab"),
			ExpectedNewLine => write!(f, "Expected newline"),
			UnexpectedStatement(token) => write!(f, "A statement cannot start with '{token}'"),
			UnknownIdentifier(name) => write!(f, "Unknown identifier '{name}'"),
			UnknownField(name) => write!(f, "Unknown field '{name}'"),
			WrongToken(token) => write!(f, "Wrong token '{token}'"),
			AssignmentCount(count) => write!(f, "Expected exactly one assignment, found {count}"),
			MissingRightHandSide => write!(f, "Missing right-hand side"),
			WrongExpression => write!(f, "Expression does not reduce to a single value"),
			TypeIncompatibility { expected, found } => write!(f, "Expected type {expected}, found {found}"),
			WrongTypeForOperator { operator, found } => write!(f, "Operator '{operator}' cannot take {found}"),
			RelationCount(count) => write!(f, "At most one comparison is allowed, found {count}"),
			ExpectedIdentifier => write!(f, "Expected identifier"),
			ExpectedCase => write!(f, "Expected case"),
			ExpectedConstant => write!(f, "Expected numeric constant or '_'"),
			ExpectedColon => write!(f, "Expected ':'"),
			TooManyDefaultCases => write!(f, "More than one default case"),
			DefaultCaseNotLast => write!(f, "Default case must be the last case"),
		}
	}
}
