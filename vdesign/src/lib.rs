pub mod analyzer;
pub mod codegen;
pub mod design;
pub mod syntax;

pub use analyzer::{DesignVisitor, InstanceWalker};
pub use codegen::{Codegen, CodegenError, InstTemplateCodegen, TemplateConfig};
pub use design::{
	BitRange, Design, DesignError, HierarchyNode, Instance, InstanceId, Module, ModuleId, Parameter, Port,
	PortConnection, PortDirection, StorageKind,
};
