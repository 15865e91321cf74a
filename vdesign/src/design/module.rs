use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::Serialize;

use super::pattern::{extract_params, extract_ports};
use super::port::substitute_params;
use super::{Instance, InstanceId, ModuleId, Parameter, Port};

/// Represents a module declaration extracted from the source
#[derive(Clone, Debug, Serialize)]
pub struct Module {
	/// Self-reference
	pub(super) id: ModuleId,

	/// Name of the module
	pub name: String,

	/// File the module was read from
	#[serde(skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,

	/// Interface ports in declaration order
	pub ports: Vec<Port>,

	/// Parameters in declaration order
	pub parameters: Vec<Parameter>,

	/// Instances of other modules, keyed by module-local instance ID
	pub instances: BTreeMap<InstanceId, Instance>,
}

impl Module {
	/// Creates a new module, the ID is assigned when it is added to a design
	pub fn new(name: &str) -> Self {
		Self {
			id: ModuleId { id: 0 },
			name: name.into(),
			source: None,
			ports: vec![],
			parameters: vec![],
			instances: BTreeMap::new(),
		}
	}

	pub fn id(&self) -> ModuleId {
		self.id
	}

	/// Looks up a parameter by name
	pub fn parameter(&self, name: &str) -> Option<&Parameter> {
		self.parameters.iter().find(|p| p.name == name)
	}

	/// Looks up a port by name
	pub fn port(&self, name: &str) -> Option<&Port> {
		self.ports.iter().find(|p| p.name == name)
	}

	/// Sets a parameter value. A later value for an existing name replaces
	/// the earlier one.
	pub fn set_parameter(&mut self, name: &str, value: &str) {
		match self.parameters.iter_mut().find(|p| p.name == name) {
			Some(param) => {
				debug!("Parameter '{}' redefined in module '{}'", name, self.name);
				param.value = value.into();
			},
			None => self.parameters.push(Parameter::new(name, value)),
		}
	}

	/// Extracts parameters from the text of a parameter port list
	pub fn add_parameter_list(&mut self, text: &str) {
		for (name, value) in extract_params(text) {
			self.set_parameter(name, value);
		}
	}

	/// Extracts ports from the text of a port declaration
	///
	/// `NAME-1` widths are resolved against the parameters known so far.
	/// Returns the number of ports added.
	pub fn add_port_declaration(&mut self, text: &str) -> usize {
		let text = substitute_params(text, &self.parameters);
		let matches = extract_ports(&text);
		if matches.is_empty() {
			info!("No results to update.");
			return 0;
		}

		let mut added = 0;
		for m in matches {
			match Port::try_from(m) {
				Ok(port) => {
					self.ports.push(port);
					added += 1;
				},
				Err(err) => warn!("Skipping port '{}' in module '{}': {}", m.name, self.name, err),
			}
		}
		added
	}

	/// Adds an instance under the next free instance ID
	pub fn add_instance(&mut self, mut instance: Instance) -> InstanceId {
		let id = self.next_instance_id();
		instance.id = id;
		self.instances.insert(id, instance);
		id
	}

	/// Returns the instance with the given module-local ID
	pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
		self.instances.get(&id)
	}

	fn next_instance_id(&self) -> InstanceId {
		InstanceId {
			id: self.instances.keys().next_back().map_or(0, |last| last.id + 1),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::design::{BitRange, PortDirection};

	#[test]
	fn test_parameter_last_write_wins() {
		let mut m = Module::new("fifo");
		m.add_parameter_list("#(parameterDEPTH=4,parameterWIDTH=8,parameterDEPTH=16)");
		assert_eq!(m.parameters.len(), 2);
		assert_eq!(m.parameters[0], Parameter::new("DEPTH", "16"));
		assert_eq!(m.parameters[1], Parameter::new("WIDTH", "8"));
	}

	#[test]
	fn test_ports_use_parameters() {
		let mut m = Module::new("ram");
		m.add_parameter_list("#(parameterADDR_WIDTH=32)");
		assert_eq!(m.add_port_declaration("input[ADDR_WIDTH-1:0]i_addr"), 1);
		assert_eq!(m.ports[0].direction, PortDirection::Input);
		assert_eq!(m.ports[0].range, Some(BitRange::new(31, 0)));
	}

	#[test]
	fn test_declaration_without_ports() {
		let mut m = Module::new("empty");
		assert_eq!(m.add_port_declaration("wire[3:0]x"), 0);
		assert!(m.ports.is_empty());
	}

	#[test]
	fn test_instance_ids() {
		let mut m = Module::new("top");
		let a = m.add_instance(Instance::new("u_a", "leaf"));
		let b = m.add_instance(Instance::new("u_b", "leaf"));
		assert_eq!(a, InstanceId { id: 0 });
		assert_eq!(b, InstanceId { id: 1 });
		assert_eq!(m.instance(b).unwrap().instance_name, "u_b");
	}
}
