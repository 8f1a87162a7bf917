pub mod analyzer;
pub mod reader;

/// CompileError is the top-level error type of the compiler front-end.
#[derive(thiserror::Error, Debug)]
pub enum CompileError {
	/// Internal compiler error, should never happen
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// Errors encountered while reading a token listing
	#[error("Generated {0} token listing errors")]
	TokenErrors(usize),
	/// The first analysis error, analysis stops there
	#[error("Analysis error: {0}")]
	Analysis(#[from] analyzer::AnalysisError),
}

impl From<analyzer::AnalyzerError> for CompileError {
	fn from(error: analyzer::AnalyzerError) -> Self {
		match error {
			analyzer::AnalyzerError::InternalError(e) => CompileError::InternalError(e),
			analyzer::AnalyzerError::Analysis(e) => CompileError::Analysis(e),
		}
	}
}
