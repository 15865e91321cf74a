//! Capabilities the design builder needs from a parsed syntax tree.
//!
//! The front end owns the tree. The design builder only reads through these
//! traits and copies out every value it keeps, so no node reference outlives
//! a single `DesignVisitor` call.

/// Any node whose source text can be reconstructed
pub trait TextNode {
	/// Source text of the node with whitespace and comments removed
	fn get_text(&self) -> &str;
}

/// Root of a parsed source file
pub trait SourceTextNode {
	/// Module declarations in source order
	fn module_declarations(&self) -> Vec<&dyn ModuleDeclarationNode>;
}

/// A `module ... endmodule` declaration
pub trait ModuleDeclarationNode {
	/// Declared module name, absent for malformed declarations
	fn module_identifier(&self) -> Option<&dyn TextNode>;

	/// The `#( ... )` parameter port list
	fn module_parameter_port_list(&self) -> Option<&dyn TextNode>;

	/// Port declarations of an ANSI-style port list header
	fn port_declarations(&self) -> Vec<&dyn PortDeclarationNode>;

	/// Items of the module body
	fn module_items(&self) -> Vec<ModuleItem<'_>>;
}

/// Module body item kinds relevant to structure extraction
#[derive(Clone, Copy)]
pub enum ModuleItem<'a> {
	PortDeclaration(&'a dyn PortDeclarationNode),
	Instantiation(&'a dyn ModuleInstantiationNode),
	Block(&'a dyn BlockNode),
}

/// A nested region of module items (generate region or begin/end block)
pub trait BlockNode {
	/// Block label (`begin : label`)
	fn block_identifier(&self) -> Option<&dyn TextNode>;

	/// Items nested in the block
	fn items(&self) -> Vec<ModuleItem<'_>>;
}

/// A port declaration; exactly one of the sub-nodes is present
pub trait PortDeclarationNode {
	fn input_declaration(&self) -> Option<&dyn TextNode>;
	fn output_declaration(&self) -> Option<&dyn TextNode>;
	fn inout_declaration(&self) -> Option<&dyn TextNode>;
}

/// `module_name #(params) inst_a (...), inst_b (...);`
pub trait ModuleInstantiationNode {
	/// Name of the instantiated module
	fn module_identifier(&self) -> Option<&dyn TextNode>;

	/// The `#( ... )` parameter value assignment
	fn parameter_value_assignment(&self) -> Option<&dyn TextNode>;

	/// Instance sites sharing the module name and parameters
	fn module_instances(&self) -> Vec<&dyn ModuleInstanceNode>;
}

/// One `inst_name [range] ( connections )` site
pub trait ModuleInstanceNode {
	fn name_of_module_instance(&self) -> Option<&dyn TextNode>;

	/// Connection list without the enclosing parentheses
	fn list_of_port_connections(&self) -> Option<&dyn TextNode>;

	/// Connection list split into single connections
	fn port_connections(&self) -> Vec<&dyn PortConnectionNode>;
}

/// A single port connection. Ordered connections have no port identifier,
/// `.*` is reported with `*` as the port identifier.
pub trait PortConnectionNode {
	fn port_identifier(&self) -> Option<&dyn TextNode>;
	fn expression(&self) -> Option<&dyn TextNode>;
}
