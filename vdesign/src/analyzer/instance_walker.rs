use log::debug;

use crate::design::{Design, Instance, ModuleId, PortConnection};
use crate::syntax::{ModuleDeclarationNode, ModuleInstantiationNode, ModuleItem};

/// Records the instances found in one module declaration
///
/// Every instantiation statement is handled in a single step: all of its
/// instance sites share the statement's module name and parameter value
/// assignment.
pub struct InstanceWalker<'d> {
	design: &'d mut Design,
	module_id: ModuleId,
	recorded: usize,
}

impl<'d> InstanceWalker<'d> {
	pub fn new(design: &'d mut Design, module_id: ModuleId) -> Self {
		Self {
			design,
			module_id,
			recorded: 0,
		}
	}

	/// Walks the module body and returns the number of recorded instances
	pub fn walk_module(mut self, node: &dyn ModuleDeclarationNode) -> usize {
		self.walk_items(node.module_items());
		self.recorded
	}

	fn walk_items(&mut self, items: Vec<ModuleItem<'_>>) {
		for item in items {
			match item {
				ModuleItem::Instantiation(inst) => self.visit_instantiation(inst),
				ModuleItem::Block(block) => {
					if let Some(label) = block.block_identifier() {
						debug!("Entering block '{}'", label.get_text());
					}
					self.walk_items(block.items());
				},
				ModuleItem::PortDeclaration(_) => {},
			}
		}
	}

	fn visit_instantiation(&mut self, node: &dyn ModuleInstantiationNode) {
		let module_name = match node.module_identifier() {
			Some(ident) => ident.get_text(),
			None => {
				debug!("Skipping instantiation without a module name");
				return;
			},
		};
		let parameter_override = node
			.parameter_value_assignment()
			.map(|p| p.get_text())
			.unwrap_or_default();

		for site in node.module_instances() {
			let instance_name = match site.name_of_module_instance() {
				Some(name) => name.get_text(),
				None => continue,
			};

			let mut instance = Instance::new(instance_name, module_name);
			instance.parameter_override = parameter_override.into();
			if let Some(list) = site.list_of_port_connections() {
				instance.port_connection_text = list.get_text().into();
			}
			for conn in site.port_connections() {
				let expression = conn.expression().map(|e| e.get_text());
				instance.connections.push(match conn.port_identifier() {
					Some(port) => PortConnection::named(port.get_text(), expression),
					None => PortConnection::ordered(expression),
				});
			}

			self.record(instance);
		}
	}

	fn record(&mut self, instance: Instance) {
		match self.design.get_mut(self.module_id) {
			Some(module) => {
				let id = module.add_instance(instance);
				debug!("Added instance {} to module '{}'", id.index(), module.name);
				self.recorded += 1;
			},
			None => debug!(
				"Dropping instance '{}', module {} is not registered",
				instance.instance_name, self.module_id
			),
		}
	}
}
