use std::fmt;

use log::warn;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;

use super::{Design, DesignError, InstanceId, Module, ModuleId};

/// A node of the instance tree below a module
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
	/// Instance name, `None` for the root of the tree
	#[serde(skip_serializing_if = "Option::is_none")]
	pub instance_name: Option<String>,

	pub module_name: String,

	/// Registered module the name resolves to, `None` for modules
	/// that were not found in the processed files
	pub module: Option<ModuleId>,

	pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
	/// Total number of instances below this node
	pub fn instance_count(&self) -> usize {
		self.children.iter().map(|c| 1 + c.instance_count()).sum()
	}

	fn fmt_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
		write!(f, "{}", "  ".repeat(depth))?;
		match &self.instance_name {
			Some(name) => write!(f, "{} ({})", name, self.module_name)?,
			None => write!(f, "{}", self.module_name)?,
		}
		if self.module.is_none() {
			write!(f, " [external]")?;
		}
		writeln!(f)?;

		for child in &self.children {
			child.fmt_indented(f, depth + 1)?;
		}
		Ok(())
	}
}

impl fmt::Display for HierarchyNode {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.fmt_indented(f, 0)
	}
}

impl Design {
	/// Builds a graph with an edge from every module to each module it instantiates
	///
	/// Instances of modules missing from the design produce no edge.
	pub fn instance_graph(&self) -> DiGraph<ModuleId, InstanceId> {
		let mut graph = DiGraph::new();
		let nodes: Vec<NodeIndex> = self.modules().map(|m| graph.add_node(m.id())).collect();

		for m in self.modules() {
			for inst in m.instances.values() {
				if let Some(target) = self.resolve_top(&inst.module_name) {
					graph.add_edge(nodes[m.id().index()], nodes[target.index()], inst.id());
				}
			}
		}
		graph
	}

	/// Modules that are not instantiated by any other module of the design
	pub fn root_modules(&self) -> Vec<ModuleId> {
		let graph = self.instance_graph();
		graph
			.node_indices()
			.filter(|&n| graph.neighbors_directed(n, Direction::Incoming).next().is_none())
			.map(|n| graph[n])
			.collect()
	}

	/// Checks whether some module (indirectly) instantiates itself
	pub fn has_recursive_instantiation(&self) -> bool {
		is_cyclic_directed(&self.instance_graph())
	}

	/// Expands the instance tree below the given module
	pub fn hierarchy(&self, root: ModuleId) -> Result<HierarchyNode, DesignError> {
		let module = self.get(root)?;
		let mut path = vec![root];
		Ok(HierarchyNode {
			instance_name: None,
			module_name: module.name.clone(),
			module: Some(root),
			children: self.expand_instances(module, &mut path),
		})
	}

	fn expand_instances(&self, module: &Module, path: &mut Vec<ModuleId>) -> Vec<HierarchyNode> {
		let mut nodes = vec![];
		for inst in module.instances.values() {
			let target = self.find_module(&inst.module_name);
			let children = match target {
				Some(t) if path.contains(&t.id()) => {
					warn!(
						"Module '{}' recursively instantiated as '{}' in '{}'",
						t.name, inst.instance_name, module.name
					);
					vec![]
				},
				Some(t) => {
					path.push(t.id());
					let children = self.expand_instances(t, path);
					path.pop();
					children
				},
				None => vec![],
			};

			nodes.push(HierarchyNode {
				instance_name: Some(inst.instance_name.clone()),
				module_name: inst.module_name.clone(),
				module: target.map(|t| t.id()),
				children,
			});
		}
		nodes
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::design::Instance;

	fn design_with(modules: &[(&str, &[(&str, &str)])]) -> Design {
		let mut d = Design::new();
		for (name, instances) in modules {
			let mut m = Module::new(name);
			for (inst, module) in instances.iter() {
				m.add_instance(Instance::new(inst, module));
			}
			d.add_module(m);
		}
		d
	}

	#[test]
	fn test_tree() {
		let d = design_with(&[
			("leaf", &[]),
			("mid", &[("u_leaf0", "leaf"), ("u_leaf1", "leaf")]),
			("top", &[("u_mid", "mid"), ("u_ip", "vendor_ip")]),
		]);
		let top = d.resolve_top("top").unwrap();
		let tree = d.hierarchy(top).unwrap();

		assert_eq!(tree.instance_count(), 4);
		assert_eq!(tree.children[0].children.len(), 2);
		assert_eq!(tree.children[1].module, None);
		assert_eq!(
			tree.to_string(),
			"top\n  u_mid (mid)\n    u_leaf0 (leaf)\n    u_leaf1 (leaf)\n  u_ip (vendor_ip) [external]\n"
		);
	}

	#[test]
	fn test_roots() {
		let d = design_with(&[("leaf", &[]), ("top", &[("u_leaf", "leaf")]), ("tb", &[("dut", "top")])]);
		assert_eq!(d.root_modules(), vec![d.resolve_top("tb").unwrap()]);
		assert!(!d.has_recursive_instantiation());
	}

	#[test]
	fn test_recursion_terminates() {
		let d = design_with(&[("a", &[("u_b", "b")]), ("b", &[("u_a", "a")])]);
		assert!(d.has_recursive_instantiation());

		let tree = d.hierarchy(d.resolve_top("a").unwrap()).unwrap();
		assert_eq!(tree.instance_count(), 2);
		assert!(tree.children[0].children[0].children.is_empty());
	}
}
