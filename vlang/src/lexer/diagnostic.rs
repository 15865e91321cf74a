use super::LexerError;
use super::LexerErrorKind;
use crate::core::{CompilerDiagnostic, CompilerDiagnosticBuilder, ProvidesCompilerDiagnostic};

impl ProvidesCompilerDiagnostic for LexerError {
	fn to_diagnostic(&self) -> CompilerDiagnostic {
		let diag = CompilerDiagnosticBuilder::from_error(self);
		match self.kind {
			LexerErrorKind::UnterminatedBlockComment => diag
				.label(self.range, "This comment never ends")
				.help("Did you forget to use '*/'?")
				.build(),

			LexerErrorKind::InvalidToken => diag
				.label(self.range, "This token doesn't make sense")
				.help("This is neither a keyword, an identifier nor a valid number")
				.build(),
		}
	}
}
