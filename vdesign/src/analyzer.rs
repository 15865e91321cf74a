mod design_visitor;
mod instance_walker;

pub use design_visitor::DesignVisitor;
pub use instance_walker::InstanceWalker;
