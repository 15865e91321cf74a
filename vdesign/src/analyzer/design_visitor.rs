use log::debug;

use super::InstanceWalker;
use crate::design::{Design, ModuleId};
use crate::syntax::SourceTextNode;

/// Folds the module declarations of one source file into a design
pub struct DesignVisitor<'d> {
	design: &'d mut Design,
	source: Option<String>,
}

impl<'d> DesignVisitor<'d> {
	pub fn new(design: &'d mut Design) -> Self {
		Self { design, source: None }
	}

	/// Name of the file the visited tree was parsed from
	pub fn with_source(mut self, source: &str) -> Self {
		self.source = Some(source.into());
		self
	}

	/// Registers each module declaration and records its instances.
	/// Returns the IDs of the registered modules in source order.
	pub fn visit_source_text(&mut self, node: &dyn SourceTextNode) -> Vec<ModuleId> {
		let mut ids = vec![];
		for decl in node.module_declarations() {
			let id = match self.design.register(decl) {
				Some(id) => id,
				None => continue,
			};

			if let Some(module) = self.design.get_mut(id) {
				module.source = self.source.clone();
			}

			let count = InstanceWalker::new(self.design, id).walk_module(decl);
			debug!("Module {} has {} instance(s)", id, count);
			ids.push(id);
		}
		ids
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::design::test_tree::*;

	#[test]
	fn test_visit_files_in_order() {
		let leaf_file = MockSource {
			modules: vec![MockModule::new("leaf").port("input", "inputwire[7:0]i_data")],
		};
		let top_file = MockSource {
			modules: vec![
				MockModule::nameless(),
				MockModule::new("top").item(MockItem::Instantiation(MockInstantiation::new(
					"leaf",
					vec![MockInstance::new("u_leaf").connect("i_data", "data")],
				))),
			],
		};

		let mut d = Design::with_top("top");
		let first = DesignVisitor::new(&mut d).with_source("leaf.v").visit_source_text(&leaf_file);
		let second = DesignVisitor::new(&mut d).with_source("top.v").visit_source_text(&top_file);

		assert_eq!(first.iter().map(|id| id.index()).collect::<Vec<_>>(), vec![0]);
		assert_eq!(second.iter().map(|id| id.index()).collect::<Vec<_>>(), vec![1]);
		assert_eq!(d.top(), Some(second[0]));

		let top = d.get(second[0]).unwrap();
		assert_eq!(top.source.as_deref(), Some("top.v"));
		assert_eq!(top.instances.len(), 1);
	}

	#[test]
	fn test_repeated_runs_are_deterministic() {
		let file = MockSource {
			modules: vec![MockModule::new("a"), MockModule::new("b")],
		};
		let run = || {
			let mut d = Design::new();
			DesignVisitor::new(&mut d).visit_source_text(&file)
		};
		assert_eq!(run(), run());
	}
}
