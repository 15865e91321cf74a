mod inst_template;

use std::fmt;

use thiserror::Error;

use crate::design::{Design, ModuleId};

pub use inst_template::{local_wire_name, InstTemplateCodegen};

#[derive(Clone, Error, Debug)]
pub enum CodegenError {
	#[error(transparent)]
	FormatError(#[from] fmt::Error),

	#[error("Invalid module ID")]
	InvalidModuleId(ModuleId),

	#[error("Design contains no modules")]
	EmptyDesign,
}

pub trait Codegen {
	fn emit_module(&mut self, module: ModuleId) -> Result<(), CodegenError>;
}

/// Options for instantiation template generation
#[derive(Clone, Debug, Default)]
pub struct TemplateConfig {
	/// Instance name, `inst_<module>` when not set
	pub instance_name: Option<String>,

	/// Emit a `#( ... )` block with the module parameters and their defaults
	pub with_parameters: bool,
}

impl Design {
	/// Generates the instantiation template of a module
	pub fn instantiation_template(&self, module: ModuleId, config: &TemplateConfig) -> Result<String, CodegenError> {
		let mut output = String::new();
		InstTemplateCodegen::new(self, config, &mut output).emit_module(module)?;
		Ok(output)
	}
}
