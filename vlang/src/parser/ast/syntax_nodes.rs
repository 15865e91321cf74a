use vdesign::syntax::{
	self, BlockNode, ModuleDeclarationNode, ModuleInstanceNode, ModuleInstantiationNode, PortConnectionNode,
	PortDeclarationNode, SourceTextNode, TextNode,
};
use vdesign::PortDirection;

use super::*;

fn as_text(text: &Option<Text>) -> Option<&dyn TextNode> {
	text.as_ref().map(|t| t as &dyn TextNode)
}

fn item_nodes(items: &[ModuleItem]) -> Vec<syntax::ModuleItem<'_>> {
	items
		.iter()
		.map(|item| match item {
			ModuleItem::PortDeclaration(decl) => syntax::ModuleItem::PortDeclaration(decl),
			ModuleItem::Instantiation(inst) => syntax::ModuleItem::Instantiation(inst),
			ModuleItem::Block(block) => syntax::ModuleItem::Block(block),
		})
		.collect()
}

impl TextNode for Text {
	fn get_text(&self) -> &str {
		&self.text
	}
}

impl SourceTextNode for SourceText {
	fn module_declarations(&self) -> Vec<&dyn ModuleDeclarationNode> {
		self.modules.iter().map(|m| m as &dyn ModuleDeclarationNode).collect()
	}
}

impl ModuleDeclarationNode for ModuleDeclaration {
	fn module_identifier(&self) -> Option<&dyn TextNode> {
		as_text(&self.id)
	}

	fn module_parameter_port_list(&self) -> Option<&dyn TextNode> {
		as_text(&self.parameter_port_list)
	}

	fn port_declarations(&self) -> Vec<&dyn PortDeclarationNode> {
		self.port_declarations
			.iter()
			.map(|p| p as &dyn PortDeclarationNode)
			.collect()
	}

	fn module_items(&self) -> Vec<syntax::ModuleItem<'_>> {
		item_nodes(&self.items)
	}
}

impl PortDeclaration {
	fn declaration_for(&self, direction: PortDirection) -> Option<&dyn TextNode> {
		if self.direction == direction {
			Some(&self.declaration as &dyn TextNode)
		}
		else {
			None
		}
	}
}

impl PortDeclarationNode for PortDeclaration {
	fn input_declaration(&self) -> Option<&dyn TextNode> {
		self.declaration_for(PortDirection::Input)
	}

	fn output_declaration(&self) -> Option<&dyn TextNode> {
		self.declaration_for(PortDirection::Output)
	}

	fn inout_declaration(&self) -> Option<&dyn TextNode> {
		self.declaration_for(PortDirection::Inout)
	}
}

impl BlockNode for Block {
	fn block_identifier(&self) -> Option<&dyn TextNode> {
		as_text(&self.label)
	}

	fn items(&self) -> Vec<syntax::ModuleItem<'_>> {
		item_nodes(&self.items)
	}
}

impl ModuleInstantiationNode for ModuleInstantiation {
	fn module_identifier(&self) -> Option<&dyn TextNode> {
		Some(&self.module_id as &dyn TextNode)
	}

	fn parameter_value_assignment(&self) -> Option<&dyn TextNode> {
		as_text(&self.parameter_value_assignment)
	}

	fn module_instances(&self) -> Vec<&dyn ModuleInstanceNode> {
		self.instances.iter().map(|i| i as &dyn ModuleInstanceNode).collect()
	}
}

impl ModuleInstanceNode for ModuleInstance {
	fn name_of_module_instance(&self) -> Option<&dyn TextNode> {
		Some(&self.name as &dyn TextNode)
	}

	fn list_of_port_connections(&self) -> Option<&dyn TextNode> {
		as_text(&self.port_connection_list)
	}

	fn port_connections(&self) -> Vec<&dyn PortConnectionNode> {
		self.connections.iter().map(|c| c as &dyn PortConnectionNode).collect()
	}
}

impl PortConnectionNode for PortConnection {
	fn port_identifier(&self) -> Option<&dyn TextNode> {
		as_text(&self.port)
	}

	fn expression(&self) -> Option<&dyn TextNode> {
		as_text(&self.expression)
	}
}
