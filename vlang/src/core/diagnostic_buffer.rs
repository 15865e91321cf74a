use super::compiler_diagnostic::{CompilerDiagnostic, ProvidesCompilerDiagnostic};
use miette::Severity;

/// Collects the non-fatal diagnostics produced while processing one file
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBuffer {
	buffer: Vec<CompilerDiagnostic>,
}

impl DiagnosticBuffer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push_diagnostic(&mut self, diag: CompilerDiagnostic) {
		self.buffer.push(diag);
	}

	/// Records an error as a warning, processing continues
	pub fn push_warning(&mut self, err: &dyn ProvidesCompilerDiagnostic) {
		self.push_diagnostic(err.to_diagnostic_builder().severity(Severity::Warning).build());
	}

	pub fn len(&self) -> usize {
		self.buffer.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buffer.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &CompilerDiagnostic> {
		self.buffer.iter()
	}

	/// Prints all diagnostics to stderr with the file's source code attached
	pub fn print_diagnostics(self, file_name: &str, source_code: &str) {
		for diag in self.buffer {
			eprintln!(
				"{:?}",
				miette::Report::new(diag)
					.with_source_code(miette::NamedSource::new(file_name, source_code.to_string()))
			);
		}
	}
}
