pub mod compiler_diagnostic;
pub mod compiler_error;
pub mod diagnostic_buffer;
pub mod source_span;

pub use compiler_diagnostic::{CompilerDiagnostic, CompilerDiagnosticBuilder, ProvidesCompilerDiagnostic};
pub use compiler_error::CompilerError;
pub use diagnostic_buffer::DiagnosticBuffer;
pub use source_span::SourceSpan;
