//! Minimal in-memory syntax tree used by unit tests

use crate::syntax::*;

pub struct MockText(pub String);

impl TextNode for MockText {
	fn get_text(&self) -> &str {
		&self.0
	}
}

fn text(s: &str) -> MockText {
	MockText(s.into())
}

fn as_text(t: &Option<MockText>) -> Option<&dyn TextNode> {
	t.as_ref().map(|t| t as &dyn TextNode)
}

pub struct MockPortDecl {
	direction: String,
	text: MockText,
}

impl MockPortDecl {
	pub fn new(direction: &str, declaration: &str) -> Self {
		Self {
			direction: direction.into(),
			text: text(declaration),
		}
	}

	fn sub_node(&self, direction: &str) -> Option<&dyn TextNode> {
		if self.direction == direction {
			Some(&self.text as &dyn TextNode)
		}
		else {
			None
		}
	}
}

impl PortDeclarationNode for MockPortDecl {
	fn input_declaration(&self) -> Option<&dyn TextNode> {
		self.sub_node("input")
	}

	fn output_declaration(&self) -> Option<&dyn TextNode> {
		self.sub_node("output")
	}

	fn inout_declaration(&self) -> Option<&dyn TextNode> {
		self.sub_node("inout")
	}
}

pub struct MockConnection {
	port: Option<MockText>,
	expression: Option<MockText>,
}

impl PortConnectionNode for MockConnection {
	fn port_identifier(&self) -> Option<&dyn TextNode> {
		as_text(&self.port)
	}

	fn expression(&self) -> Option<&dyn TextNode> {
		as_text(&self.expression)
	}
}

pub struct MockInstance {
	name: Option<MockText>,
	list: Option<MockText>,
	connections: Vec<MockConnection>,
}

impl MockInstance {
	pub fn new(name: &str) -> Self {
		Self {
			name: Some(text(name)),
			list: None,
			connections: vec![],
		}
	}

	pub fn nameless() -> Self {
		Self {
			name: None,
			list: None,
			connections: vec![],
		}
	}

	/// Adds a named connection and keeps the raw list text in sync
	pub fn connect(mut self, port: &str, expression: &str) -> Self {
		let entry = format!(".{}({})", port, expression);
		self.list = Some(match self.list.take() {
			Some(MockText(prev)) => text(&format!("{},{}", prev, entry)),
			None => text(&entry),
		});
		self.connections.push(MockConnection {
			port: Some(text(port)),
			expression: Some(text(expression)),
		});
		self
	}

	/// Adds an ordered connection, `None` leaves the position empty
	pub fn connect_ordered(mut self, expression: Option<&str>) -> Self {
		self.connections.push(MockConnection {
			port: None,
			expression: expression.map(text),
		});
		self
	}
}

impl ModuleInstanceNode for MockInstance {
	fn name_of_module_instance(&self) -> Option<&dyn TextNode> {
		as_text(&self.name)
	}

	fn list_of_port_connections(&self) -> Option<&dyn TextNode> {
		as_text(&self.list)
	}

	fn port_connections(&self) -> Vec<&dyn PortConnectionNode> {
		self.connections.iter().map(|c| c as &dyn PortConnectionNode).collect()
	}
}

pub struct MockInstantiation {
	module: Option<MockText>,
	params: Option<MockText>,
	instances: Vec<MockInstance>,
}

impl MockInstantiation {
	pub fn new(module: &str, instances: Vec<MockInstance>) -> Self {
		Self {
			module: Some(text(module)),
			params: None,
			instances,
		}
	}

	pub fn anonymous(instances: Vec<MockInstance>) -> Self {
		Self {
			module: None,
			params: None,
			instances,
		}
	}

	pub fn params(mut self, params: &str) -> Self {
		self.params = Some(text(params));
		self
	}
}

impl ModuleInstantiationNode for MockInstantiation {
	fn module_identifier(&self) -> Option<&dyn TextNode> {
		as_text(&self.module)
	}

	fn parameter_value_assignment(&self) -> Option<&dyn TextNode> {
		as_text(&self.params)
	}

	fn module_instances(&self) -> Vec<&dyn ModuleInstanceNode> {
		self.instances.iter().map(|i| i as &dyn ModuleInstanceNode).collect()
	}
}

pub struct MockBlock {
	items: Vec<MockItem>,
}

impl MockBlock {
	pub fn new(items: Vec<MockItem>) -> Self {
		Self { items }
	}
}

impl BlockNode for MockBlock {
	fn block_identifier(&self) -> Option<&dyn TextNode> {
		None
	}

	fn items(&self) -> Vec<ModuleItem<'_>> {
		item_refs(&self.items)
	}
}

pub enum MockItem {
	Port(MockPortDecl),
	Instantiation(MockInstantiation),
	Block(MockBlock),
}

fn item_refs(items: &[MockItem]) -> Vec<ModuleItem<'_>> {
	items
		.iter()
		.map(|item| match item {
			MockItem::Port(p) => ModuleItem::PortDeclaration(p),
			MockItem::Instantiation(i) => ModuleItem::Instantiation(i),
			MockItem::Block(b) => ModuleItem::Block(b),
		})
		.collect()
}

pub struct MockModule {
	name: Option<MockText>,
	params: Option<MockText>,
	ports: Vec<MockPortDecl>,
	items: Vec<MockItem>,
}

impl MockModule {
	pub fn new(name: &str) -> Self {
		Self {
			name: Some(text(name)),
			params: None,
			ports: vec![],
			items: vec![],
		}
	}

	pub fn nameless() -> Self {
		Self {
			name: None,
			params: None,
			ports: vec![],
			items: vec![],
		}
	}

	pub fn params(mut self, params: &str) -> Self {
		self.params = Some(text(params));
		self
	}

	pub fn port(mut self, direction: &str, declaration: &str) -> Self {
		self.ports.push(MockPortDecl::new(direction, declaration));
		self
	}

	pub fn item(mut self, item: MockItem) -> Self {
		self.items.push(item);
		self
	}
}

impl ModuleDeclarationNode for MockModule {
	fn module_identifier(&self) -> Option<&dyn TextNode> {
		as_text(&self.name)
	}

	fn module_parameter_port_list(&self) -> Option<&dyn TextNode> {
		as_text(&self.params)
	}

	fn port_declarations(&self) -> Vec<&dyn PortDeclarationNode> {
		self.ports.iter().map(|p| p as &dyn PortDeclarationNode).collect()
	}

	fn module_items(&self) -> Vec<ModuleItem<'_>> {
		item_refs(&self.items)
	}
}

pub struct MockSource {
	pub modules: Vec<MockModule>,
}

impl SourceTextNode for MockSource {
	fn module_declarations(&self) -> Vec<&dyn ModuleDeclarationNode> {
		self.modules.iter().map(|m| m as &dyn ModuleDeclarationNode).collect()
	}
}
