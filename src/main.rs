extern crate vdesign;
extern crate vlang;

use clap::{command, value_parser, Arg, ArgAction};
use log::{info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use vdesign::{Design, DesignError, ModuleId, TemplateConfig};
use vlang::core::CompilerDiagnosticBuilder;
use vlang::{CompilerDiagnostic, CompilerError, DiagnosticBuffer, ProvidesCompilerDiagnostic};

/// Errors caused by the command line selection rather than by the sources
#[derive(Error, Debug)]
enum UsageError {
	#[error("Cannot choose a module for the template")]
	AmbiguousTemplateTarget(usize),
}

impl ProvidesCompilerDiagnostic for UsageError {
	fn to_diagnostic(&self) -> CompilerDiagnostic {
		use UsageError::*;
		match self {
			AmbiguousTemplateTarget(count) => CompilerDiagnosticBuilder::from_error(self)
				.help(&format!(
					"The design has {} modules, select one with --module or --top",
					count
				))
				.build(),
		}
	}
}

fn read_file(path: &Path) -> Result<String, CompilerError> {
	fs::read_to_string(path).map_err(|err| match err.kind() {
		io::ErrorKind::NotFound => CompilerError::FileNotFound(path.display().to_string()),
		_ => err.into(),
	})
}

/// Reads a file list with one source path per line.
/// Empty lines and lines starting with `#` are ignored.
fn read_filelist(path: &Path) -> Result<Vec<PathBuf>, CompilerError> {
	Ok(read_file(path)?
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty() && !line.starts_with('#'))
		.map(PathBuf::from)
		.collect())
}

/// Processes all source files in order. Characters that cannot be lexed
/// are reported as warnings and skipped.
fn build_design(sources: &[PathBuf], top: Option<&str>) -> Result<Design, CompilerError> {
	let mut design = Design::new();
	design.set_top_name(top.map(String::from));

	for path in sources {
		let name = path.display().to_string();
		let code = read_file(path)?;
		let mut diagnostics = DiagnosticBuffer::new();
		let ids = vlang::analyze_source(&code, &name, &mut design, &mut diagnostics);
		info!("Processed '{}', found {} module(s)", name, ids.len());
		if !diagnostics.is_empty() {
			warn!("'{}' produced {} warning(s)", name, diagnostics.len());
			diagnostics.print_diagnostics(&name, &code);
		}
	}

	info!("Design has {} module(s)", design.len());
	Ok(design)
}

fn format_top(design: &Design) -> String {
	match (design.top_name(), design.top()) {
		(Some(name), Some(id)) => format!("top module '{}': {}", name, id),
		(Some(name), None) => {
			warn!("Top module '{}' not found", name);
			format!("top module '{}': none", name)
		},
		(None, _) => "top module: none".into(),
	}
}

fn emit_dump(design: &Design, output: &mut dyn Write) -> Result<(), CompilerError> {
	writeln!(output, "{}", serde_json::to_string_pretty(design)?)?;
	writeln!(output, "{}", format_top(design))?;
	Ok(())
}

fn emit_hierarchy(design: &Design, output: &mut dyn Write) -> Result<(), CompilerError> {
	if design.has_recursive_instantiation() {
		warn!("Design contains recursive module instantiations");
	}

	let roots = match design.top() {
		Some(top) => vec![top],
		None => design.root_modules(),
	};
	for root in roots {
		write!(output, "{}", design.hierarchy(root)?)?;
	}
	Ok(())
}

/// Picks the module a template is generated for
fn template_target(design: &Design, module: Option<&str>) -> miette::Result<ModuleId> {
	if let Some(name) = module {
		return design
			.resolve_top(name)
			.ok_or_else(|| CompilerError::from(DesignError::ModuleNotFound(name.into())).to_miette_report());
	}
	if let Some(top) = design.top() {
		return Ok(top);
	}

	let mut modules = design.modules();
	match (modules.next(), modules.next()) {
		(Some(only), None) => Ok(only.id()),
		(None, _) => Err(CompilerError::from(vdesign::CodegenError::EmptyDesign).to_miette_report()),
		(Some(_), Some(_)) => Err(UsageError::AmbiguousTemplateTarget(design.len()).to_miette_report()),
	}
}

fn main() -> miette::Result<()> {
	let _ = env_logger::builder().try_init();

	let matches = command!()
		.arg(
			Arg::new("sources")
				.value_name("SOURCES")
				.help("Source files, the file list is used when none are given")
				.action(ArgAction::Append)
				.value_parser(value_parser!(PathBuf)),
		)
		.arg(
			Arg::new("filelist")
				.short('f')
				.long("filelist")
				.value_name("PATH")
				.help("File with one source path per line")
				.default_value("filelist")
				.value_parser(value_parser!(PathBuf)),
		)
		.arg(
			Arg::new("top")
				.short('t')
				.long("top")
				.value_name("NAME")
				.help("Name of the top module"),
		)
		.arg(
			Arg::new("mode")
				.short('m')
				.long("mode")
				.value_name("MODE")
				.help("Specify which action should be performed")
				.value_parser(["dump", "top", "hierarchy", "template"])
				.default_value("dump"),
		)
		.arg(
			Arg::new("module")
				.long("module")
				.value_name("NAME")
				.help("Module to generate the instantiation template for"),
		)
		.arg(
			Arg::new("params")
				.long("params")
				.help("Include module parameters in the template")
				.action(ArgAction::SetTrue),
		)
		.arg(
			Arg::new("inst-name")
				.long("inst-name")
				.value_name("NAME")
				.help("Instance name used in the template"),
		)
		.arg(
			Arg::new("output")
				.short('o')
				.long("output")
				.value_name("PATH")
				.help("Write the output to a file")
				.value_parser(value_parser!(PathBuf)),
		)
		.get_matches();

	let sources: Vec<PathBuf> = match matches.get_many::<PathBuf>("sources") {
		Some(paths) => paths.cloned().collect(),
		None => {
			let filelist = matches
				.get_one::<PathBuf>("filelist")
				.cloned()
				.unwrap_or_else(|| PathBuf::from("filelist"));
			read_filelist(&filelist).map_err(|e| e.to_miette_report())?
		},
	};

	let top = matches.get_one::<String>("top").map(String::as_str);
	let design = build_design(&sources, top).map_err(|e| e.to_miette_report())?;

	let mut output: Box<dyn Write> = match matches.get_one::<PathBuf>("output") {
		None => Box::new(io::stdout()),
		Some(path) => Box::new(
			fs::File::create(path).map_err(|e| CompilerError::from(e).to_miette_report())?,
		),
	};

	let mode = matches.get_one::<String>("mode").map_or("dump", String::as_str);
	let result = match mode {
		"top" => writeln!(output, "{}", format_top(&design)).map_err(CompilerError::from),
		"hierarchy" => emit_hierarchy(&design, &mut output),
		"template" => {
			let target = template_target(&design, matches.get_one::<String>("module").map(String::as_str))?;
			let config = TemplateConfig {
				instance_name: matches.get_one::<String>("inst-name").cloned(),
				with_parameters: matches.get_flag("params"),
			};
			design
				.instantiation_template(target, &config)
				.map_err(CompilerError::from)
				.and_then(|text| write!(output, "{}", text).map_err(CompilerError::from))
		},
		_ => emit_dump(&design, &mut output),
	};

	result.map_err(|e| e.to_miette_report())
}
