use std::collections::HashSet;
use std::fmt;

use log::debug;

use super::{Codegen, CodegenError, TemplateConfig};
use crate::design::{Design, Module, ModuleId, Port, PortDirection, StorageKind};

macro_rules! emitln {
	($self:ident, $($arg:tt)*) => {
		writeln!($self.output_stream, "{}{}", "  ".repeat($self.indent_level as usize), format!($($arg)*))
	}
}

/// Name of the local wire connected to a port in the template
///
/// `i_` and `o_` prefixes become `w_`, other names are kept.
pub fn local_wire_name(port_name: &str) -> String {
	match port_name.strip_prefix("i_").or_else(|| port_name.strip_prefix("o_")) {
		Some(rest) => format!("w_{}", rest),
		None => port_name.into(),
	}
}

/// Emits instantiation templates: local wire declarations followed by an
/// aligned, commented port map
pub struct InstTemplateCodegen<'a> {
	design: &'a Design,
	config: &'a TemplateConfig,
	indent_level: u32,
	output_stream: &'a mut dyn fmt::Write,
}

impl<'a> InstTemplateCodegen<'a> {
	pub fn new(design: &'a Design, config: &'a TemplateConfig, w: &'a mut dyn fmt::Write) -> Self {
		Self {
			design,
			config,
			indent_level: 0,
			output_stream: w,
		}
	}

	fn begin_indent(&mut self) {
		self.indent_level += 1;
	}

	fn end_indent(&mut self) {
		assert!(self.indent_level > 0);
		self.indent_level -= 1;
	}

	/// Documentation comment for one connection
	fn format_port_info(&self, port: &Port) -> String {
		let mut info = match port.direction {
			PortDirection::Input => format!("{}  ", port.direction),
			_ => format!("{} ", port.direction),
		};
		match port.storage {
			Some(StorageKind::Variable) => info += "reg  ",
			Some(storage) => info += &format!("{} ", storage),
			None => {},
		}
		if let Some(range) = port.range {
			info += &range.to_string();
		}
		info.trim_end().into()
	}

	fn emit_wire_declarations(&mut self, ports: &[(&Port, String)]) -> Result<(), CodegenError> {
		let mut declared = HashSet::new();
		for (port, wire) in ports {
			if let Some(range) = port.range {
				// `i_x` and `o_x` share `w_x`
				if wire.starts_with("w_") && declared.insert(wire.as_str()) {
					emitln!(self, "wire [{}:0] {};", range.size().saturating_sub(1), wire)?;
				}
			}
		}

		if !declared.is_empty() {
			emitln!(self, "")?;
		}
		Ok(())
	}

	fn emit_parameter_block(&mut self, m: &Module) -> Result<(), CodegenError> {
		let width = m.parameters.iter().map(|p| p.name.len()).max().unwrap_or(0);

		emitln!(self, "{} #(", m.name)?;
		self.begin_indent();
		for (i, param) in m.parameters.iter().enumerate() {
			let sep = if i + 1 == m.parameters.len() { "" } else { "," };
			emitln!(self, ".{:<width$} ({}){}", param.name, param.value, sep, width = width)?;
		}
		self.end_indent();
		Ok(())
	}
}

impl<'a> Codegen for InstTemplateCodegen<'a> {
	fn emit_module(&mut self, module: ModuleId) -> Result<(), CodegenError> {
		if self.design.is_empty() {
			return Err(CodegenError::EmptyDesign);
		}
		let design = self.design;
		let m = design.get(module).map_err(|_| CodegenError::InvalidModuleId(module))?;
		debug!("Generating instantiation template for '{}'", m.name);

		let ports: Vec<(&Port, String)> = m.ports.iter().map(|p| (p, local_wire_name(&p.name))).collect();
		let width = ports
			.iter()
			.map(|(p, w)| p.name.len().max(w.len()))
			.max()
			.unwrap_or(0);

		self.emit_wire_declarations(&ports)?;

		let instance_name = match &self.config.instance_name {
			Some(name) => name.clone(),
			None => format!("inst_{}", m.name),
		};
		if self.config.with_parameters && !m.parameters.is_empty() {
			self.emit_parameter_block(m)?;
			emitln!(self, ") {}(", instance_name)?;
		}
		else {
			emitln!(self, "{} {}(", m.name, instance_name)?;
		}

		self.begin_indent();
		for (i, (port, wire)) in ports.iter().enumerate() {
			let sep = if i + 1 == ports.len() { " " } else { "," };
			emitln!(
				self,
				".{:<width$} ({:<width$} ){}// {}",
				port.name,
				wire,
				sep,
				self.format_port_info(port),
				width = width
			)?;
		}
		self.end_indent();

		emitln!(self, ");")?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;
	use crate::design::Module;

	fn design_with(ports: &[&str]) -> (Design, ModuleId) {
		let mut m = Module::new("dut");
		for decl in ports {
			m.add_port_declaration(decl);
		}
		let mut d = Design::new();
		let id = d.add_module(m);
		(d, id)
	}

	#[rstest]
	#[case("i_data", "w_data")]
	#[case("o_valid", "w_valid")]
	#[case("clk", "clk")]
	#[case("data_i_", "data_i_")]
	#[case("io_pad", "io_pad")]
	fn test_local_wire_name(#[case] port: &str, #[case] wire: &str) {
		assert_eq!(local_wire_name(port), wire);
	}

	#[test]
	fn test_template() {
		let (d, id) = design_with(&["inputwire[7:0]i_data", "inputclk", "outputreg[3:0]o_q", "inoutpad"]);
		let text = d.instantiation_template(id, &TemplateConfig::default()).unwrap();
		assert_eq!(
			text,
			"wire [7:0] w_data;\n\
			 wire [3:0] w_q;\n\
			 \n\
			 dut inst_dut(\n  \
			 .i_data (w_data ),// input  wire [7:0]\n  \
			 .clk    (clk    ),// input\n  \
			 .o_q    (w_q    ),// output reg  [3:0]\n  \
			 .pad    (pad    ) // inout\n\
			 );\n"
		);
	}

	#[test]
	fn test_unprefixed_ranged_port_has_no_declaration() {
		let (d, id) = design_with(&["input[15:0]addr"]);
		let text = d.instantiation_template(id, &TemplateConfig::default()).unwrap();
		assert_eq!(text, "dut inst_dut(\n  .addr (addr ) // input  [15:0]\n);\n");
	}

	#[test]
	fn test_parameters_and_instance_name() {
		let mut m = Module::new("ram");
		m.add_parameter_list("#(parameterADDR_WIDTH=32,parameterDW=8)");
		m.add_port_declaration("input[ADDR_WIDTH-1:0]i_addr");
		let mut d = Design::new();
		let id = d.add_module(m);

		let config = TemplateConfig {
			instance_name: Some("u_ram".into()),
			with_parameters: true,
		};
		let text = d.instantiation_template(id, &config).unwrap();
		assert_eq!(
			text,
			"wire [31:0] w_addr;\n\
			 \n\
			 ram #(\n  \
			 .ADDR_WIDTH (32),\n  \
			 .DW         (8)\n\
			 ) u_ram(\n  \
			 .i_addr (w_addr ) // input  [31:0]\n\
			 );\n"
		);
	}

	#[test]
	fn test_shared_wire_declared_once() {
		let (d, id) = design_with(&["input[7:0]i_data", "output[7:0]o_data", "output[3:0]o_flag"]);
		let text = d.instantiation_template(id, &TemplateConfig::default()).unwrap();
		assert!(text.starts_with("wire [7:0] w_data;\nwire [3:0] w_flag;\n\n"));
		assert_eq!(text.matches("wire [7:0] w_data;").count(), 1);
		assert!(text.contains(".i_data (w_data ),"));
		assert!(text.contains(".o_data (w_data ),"));
	}

	#[test]
	fn test_oversized_range_dropped() {
		let (d, id) = design_with(&["input[9223372036854775807:0]i_x", "inputclk"]);
		let text = d.instantiation_template(id, &TemplateConfig::default()).unwrap();
		assert_eq!(text, "dut inst_dut(\n  .clk (clk ) // input\n);\n");
	}

	#[test]
	fn test_module_without_ports() {
		let (d, id) = design_with(&[]);
		let text = d.instantiation_template(id, &TemplateConfig::default()).unwrap();
		assert_eq!(text, "dut inst_dut(\n);\n");
	}

	#[test]
	fn test_errors() {
		let empty = Design::new();
		let (d, id) = design_with(&[]);
		assert!(matches!(
			empty.instantiation_template(id, &TemplateConfig::default()),
			Err(CodegenError::EmptyDesign)
		));

		let mut other = Design::new();
		other.add_module(Module::new("a"));
		let missing = other.add_module(Module::new("b"));
		assert!(matches!(
			d.instantiation_template(missing, &TemplateConfig::default()),
			Err(CodegenError::InvalidModuleId(_))
		));
	}
}
