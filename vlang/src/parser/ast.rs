mod syntax_nodes;

use crate::SourceSpan;
use vdesign::PortDirection;

/// Source text of a tree fragment, tokens concatenated without whitespace
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Text {
	pub text: String,
	pub location: SourceSpan,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SourceText {
	pub modules: Vec<ModuleDeclaration>,
	pub location: SourceSpan,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ModuleDeclaration {
	pub id: Option<Text>,

	/// `#( ... )` including the hash and both parentheses
	pub parameter_port_list: Option<Text>,

	/// Declarations from an ANSI-style port list
	pub port_declarations: Vec<PortDeclaration>,

	pub items: Vec<ModuleItem>,
	pub location: SourceSpan,
}

/// `input wire [7:0] a, b` up to, but not including, the terminator
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PortDeclaration {
	pub direction: PortDirection,
	pub declaration: Text,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ModuleItem {
	PortDeclaration(PortDeclaration),
	Instantiation(ModuleInstantiation),
	Block(Block),
}

/// `begin ... end` or `generate ... endgenerate`
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Block {
	pub label: Option<Text>,
	pub items: Vec<ModuleItem>,
	pub location: SourceSpan,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ModuleInstantiation {
	pub module_id: Text,

	/// `#( ... )` or `#value`
	pub parameter_value_assignment: Option<Text>,

	pub instances: Vec<ModuleInstance>,
	pub location: SourceSpan,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ModuleInstance {
	pub name: Text,

	/// Everything between the connection list parentheses
	pub port_connection_list: Option<Text>,

	pub connections: Vec<PortConnection>,
	pub location: SourceSpan,
}

/// `.port(expr)`, `.port`, `.*` or a plain ordered expression
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PortConnection {
	pub port: Option<Text>,
	pub expression: Option<Text>,
	pub location: SourceSpan,
}
