pub mod core;
pub mod lexer;
pub mod parser;

pub use crate::core::{CompilerDiagnostic, CompilerError, DiagnosticBuffer, ProvidesCompilerDiagnostic, SourceSpan};

use crate::core::CompilerDiagnosticBuilder;
use lexer::{Lexer, LogosLexer};
use log::debug;
use parser::ast::SourceText;
use parser::VerilogParser;
use vdesign::{Design, DesignVisitor, ModuleId};

/// Lexes and parses a Verilog source file, failing on the first lexer error
pub fn parse_source(code: &str) -> Result<SourceText, CompilerError> {
	let tokens = LogosLexer::new(code).process()?;
	debug!("Lexed {} tokens", tokens.len());
	Ok(VerilogParser::new(code, tokens).parse())
}

/// Lexes and parses a Verilog source file, skipping characters that do
/// not form a token
///
/// Lexer errors and unnamed module declarations are recorded as warnings.
pub fn parse_source_recovering(code: &str, diagnostics: &mut DiagnosticBuffer) -> SourceText {
	let (tokens, errors) = LogosLexer::new(code).process_recovering();
	debug!("Lexed {} tokens, {} error(s)", tokens.len(), errors.len());
	for err in &errors {
		diagnostics.push_warning(err);
	}

	let tree = VerilogParser::new(code, tokens).parse();
	for module in tree.modules.iter().filter(|m| m.id.is_none()) {
		diagnostics.push_diagnostic(
			CompilerDiagnosticBuilder::new_warning("Module declaration without a name")
				.label(module.location, "This module is skipped")
				.build(),
		);
	}
	tree
}

/// Parses a source file and folds its modules into the design
///
/// Returns the IDs of the modules registered from this file.
pub fn analyze_source(code: &str, name: &str, design: &mut Design, diagnostics: &mut DiagnosticBuffer) -> Vec<ModuleId> {
	let tree = parse_source_recovering(code, diagnostics);
	DesignVisitor::new(design).with_source(name).visit_source_text(&tree)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn analyze(code: &str) -> (Design, DiagnosticBuffer) {
		let mut design = Design::new();
		let mut diagnostics = DiagnosticBuffer::new();
		analyze_source(code, "test.v", &mut design, &mut diagnostics);
		(design, diagnostics)
	}

	#[test]
	fn test_byte_order_mark() {
		let (design, diagnostics) = analyze("\u{feff}module leaf (input wire [7:0] i_data);\nendmodule\n");
		assert!(diagnostics.is_empty());
		let leaf = design.find_module("leaf").unwrap();
		assert_eq!(leaf.ports.len(), 1);
	}

	#[test]
	fn test_invalid_character_keeps_modules() {
		let (design, diagnostics) =
			analyze("module a (input x); endmodule module b (input \u{00a0}y); endmodule");
		let names: Vec<_> = design.modules().map(|m| m.name.as_str()).collect();
		assert_eq!(names, vec!["a", "b"]);
		assert_eq!(design.find_module("b").unwrap().ports[0].name, "y");

		assert_eq!(diagnostics.len(), 1);
		let diag = diagnostics.iter().next().unwrap();
		assert_eq!(diag.to_string(), "Invalid token");
		assert_eq!(miette::Diagnostic::severity(diag), Some(miette::Severity::Warning));
	}

	#[test]
	fn test_unnamed_module_reported() {
		let (design, diagnostics) = analyze("module; endmodule\nmodule named; endmodule");
		assert_eq!(design.len(), 1);
		assert_eq!(diagnostics.len(), 1);
		assert_eq!(
			diagnostics.iter().next().unwrap().to_string(),
			"Module declaration without a name"
		);
	}

	#[test]
	fn test_strict_parse_fails() {
		assert!(matches!(
			parse_source("module m; \u{00a7} endmodule"),
			Err(CompilerError::LexerError(_))
		));
	}
}
