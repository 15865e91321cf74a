use crate::core::compiler_diagnostic::*;
use crate::lexer::LexerError;
use thiserror::Error;

/// General tool error
///
/// Includes errors from all stages, from reading files to template generation
#[derive(Debug, Error)]
pub enum CompilerError {
	#[error(transparent)]
	LexerError(#[from] LexerError),

	#[error(transparent)]
	IoError(#[from] std::io::Error),

	#[error("File not found")]
	FileNotFound(String),

	#[error(transparent)]
	JsonError(#[from] serde_json::Error),

	#[error(transparent)]
	DesignError(#[from] vdesign::DesignError),

	#[error(transparent)]
	CodegenError(#[from] vdesign::CodegenError),
}

impl ProvidesCompilerDiagnostic for CompilerError {
	fn to_diagnostic(&self) -> CompilerDiagnostic {
		use CompilerError::*;
		match self {
			LexerError(lexer_error) => lexer_error.to_diagnostic(),

			IoError(ref io_error) => CompilerDiagnosticBuilder::from_error(&self)
				.help(&io_error.to_string())
				.build(),

			JsonError(serde_error) => CompilerDiagnosticBuilder::from_error(&self)
				.help(&serde_error.to_string())
				.build(),

			FileNotFound(file_name) => CompilerDiagnosticBuilder::from_error(&self)
				.help(&format!("Make sure this file exists: {}", file_name))
				.build(),

			DesignError(vdesign::DesignError::ModuleNotFound(name)) => CompilerDiagnosticBuilder::from_error(&self)
				.help(&format!("Make sure the file declaring '{}' is in the file list", name))
				.build(),

			DesignError(_) => CompilerDiagnosticBuilder::from_error(&self).build(),

			CodegenError(vdesign::CodegenError::EmptyDesign) => CompilerDiagnosticBuilder::from_error(&self)
				.help("None of the source files declares a module")
				.build(),

			CodegenError(_) => CompilerDiagnosticBuilder::from_error(&self).build(),
		}
	}
}
