pub mod design_error;
pub mod hierarchy;
pub mod instance;
pub mod module;
pub mod pattern;
pub mod port;

pub use design_error::DesignError;
pub use hierarchy::HierarchyNode;
pub use instance::{Instance, PortConnection};
pub use module::Module;
pub use port::{BitRange, Parameter, Port, PortDirection, StorageKind};

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::syntax::{ModuleDeclarationNode, ModuleItem, PortDeclarationNode};

/// References a module in a design
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize)]
#[serde(transparent)]
pub struct ModuleId {
	id: usize,
}

impl ModuleId {
	/// Position of the module in registration order
	pub fn index(&self) -> usize {
		self.id
	}
}

impl fmt::Display for ModuleId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.id)
	}
}

/// References an instance within its parent module
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize)]
#[serde(transparent)]
pub struct InstanceId {
	id: usize,
}

impl InstanceId {
	pub fn index(&self) -> usize {
		self.id
	}
}

/// Registry of all modules found in the processed source files
///
/// Modules are never removed, so module IDs are stable for the lifetime of
/// the design and follow registration order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Design {
	#[serde(skip_serializing_if = "Option::is_none")]
	top_name: Option<String>,
	modules: Vec<Module>,
	#[serde(skip)]
	next_module_id: usize,
}

impl Design {
	/// Creates a new empty design
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a new empty design with a configured top module name
	pub fn with_top(top_name: &str) -> Self {
		Self {
			top_name: Some(top_name.into()),
			..Self::default()
		}
	}

	pub fn set_top_name(&mut self, top_name: Option<String>) {
		self.top_name = top_name;
	}

	pub fn top_name(&self) -> Option<&str> {
		self.top_name.as_deref()
	}

	/// Adds an existing module to the design
	pub fn add_module(&mut self, module: Module) -> ModuleId {
		let id = ModuleId { id: self.next_module_id };
		self.next_module_id += 1;

		let mut m = module;
		m.id = id;
		self.modules.push(m);
		id
	}

	/// Creates a module record from a module declaration
	///
	/// Parameters are extracted first so port widths written as `NAME-1`
	/// can be resolved. Declarations without a name are skipped.
	pub fn register(&mut self, node: &dyn ModuleDeclarationNode) -> Option<ModuleId> {
		let name = match node.module_identifier() {
			Some(ident) => ident.get_text().to_string(),
			None => {
				debug!("Skipping module declaration without a name");
				return None;
			},
		};

		let mut module = Module::new(&name);
		if let Some(param_list) = node.module_parameter_port_list() {
			module.add_parameter_list(param_list.get_text());
		}

		let mut declarations = node.port_declarations();
		collect_port_declarations(node.module_items(), &mut declarations);
		for decl in declarations {
			let sub_nodes = [decl.inout_declaration(), decl.input_declaration(), decl.output_declaration()];
			for text_node in sub_nodes.into_iter().flatten() {
				module.add_port_declaration(text_node.get_text());
			}
		}

		let id = self.add_module(module);
		debug!("Registered module '{}' as {}", name, id);
		Some(id)
	}

	/// Returns the module with the given ID
	pub fn get(&self, id: ModuleId) -> Result<&Module, DesignError> {
		self.modules.get(id.id).ok_or(DesignError::InvalidModuleId(id))
	}

	/// Returns a mutable reference to the module with the given ID
	pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
		self.modules.get_mut(id.id)
	}

	/// Returns the first registered module with the given name
	pub fn find_module(&self, name: &str) -> Option<&Module> {
		self.modules.iter().find(|m| m.name == name)
	}

	/// Resolves a top module name to the first registered module with that name
	pub fn resolve_top(&self, name: &str) -> Option<ModuleId> {
		self.find_module(name).map(|m| m.id)
	}

	/// Resolves the configured top module name
	pub fn top(&self) -> Option<ModuleId> {
		self.resolve_top(self.top_name.as_deref()?)
	}

	/// Iterates over the modules in registration order
	pub fn modules(&self) -> impl Iterator<Item = &Module> {
		self.modules.iter()
	}

	pub fn len(&self) -> usize {
		self.modules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.modules.is_empty()
	}
}

/// Gathers port declarations from module items, descending into nested blocks
fn collect_port_declarations<'a>(items: Vec<ModuleItem<'a>>, out: &mut Vec<&'a dyn PortDeclarationNode>) {
	for item in items {
		match item {
			ModuleItem::PortDeclaration(decl) => out.push(decl),
			ModuleItem::Block(block) => collect_port_declarations(block.items(), out),
			ModuleItem::Instantiation(_) => {},
		}
	}
}

#[cfg(test)]
pub(crate) mod test_tree;

#[cfg(test)]
mod tests {
	use super::test_tree::*;
	use super::*;

	#[test]
	fn test_ids_follow_registration_order() {
		let mut d = Design::new();
		let leaf = d.register(&MockModule::new("leaf")).unwrap();
		let top = d.register(&MockModule::new("top")).unwrap();
		assert_eq!(leaf.index(), 0);
		assert_eq!(top.index(), 1);
		assert_eq!(d.resolve_top("top"), Some(top));
	}

	#[test]
	fn test_nameless_module_is_skipped() {
		let mut d = Design::new();
		assert_eq!(d.register(&MockModule::nameless()), None);
		assert!(d.is_empty());
		let id = d.register(&MockModule::new("after")).unwrap();
		assert_eq!(id.index(), 0);
	}

	#[test]
	fn test_resolve_top_first_match() {
		let mut d = Design::with_top("dup");
		let first = d.register(&MockModule::new("dup")).unwrap();
		d.register(&MockModule::new("dup")).unwrap();
		assert_eq!(d.top(), Some(first));
		assert_eq!(d.resolve_top("missing"), None);
	}

	#[test]
	fn test_unknown_id() {
		let mut d = Design::new();
		d.register(&MockModule::new("only"));
		let mut other = Design::new();
		other.add_module(Module::new("a"));
		let second = other.add_module(Module::new("b"));
		assert!(matches!(d.get(second), Err(DesignError::InvalidModuleId(_))));
	}

	#[test]
	fn test_register_ports_and_params() {
		let node = MockModule::new("ram")
			.params("#(parameterADDR_WIDTH=32,parameterDATA_WIDTH=8)")
			.port("input", "inputwireclk")
			.port("input", "input[ADDR_WIDTH-1:0]i_addr")
			.port("output", "outputreg[DATA_WIDTH-1:0]o_data");

		let mut d = Design::new();
		let id = d.register(&node).unwrap();
		let m = d.get(id).unwrap();
		assert_eq!(m.parameters.len(), 2);
		assert_eq!(
			m.ports,
			vec![
				Port::new(PortDirection::Input, "clk").with_storage(StorageKind::Net),
				Port::new(PortDirection::Input, "i_addr").with_range(31, 0),
				Port::new(PortDirection::Output, "o_data")
					.with_storage(StorageKind::Variable)
					.with_range(7, 0),
			]
		);
	}

	#[test]
	fn test_register_body_ports_in_blocks() {
		let node = MockModule::new("legacy")
			.item(MockItem::Port(MockPortDecl::new("input", "input[3:0]a")))
			.item(MockItem::Block(MockBlock::new(vec![MockItem::Port(MockPortDecl::new(
				"output", "outputb",
			))])));

		let mut d = Design::new();
		let id = d.register(&node).unwrap();
		let names: Vec<_> = d.get(id).unwrap().ports.iter().map(|p| p.name.as_str()).collect();
		assert_eq!(names, vec!["a", "b"]);
	}
}
