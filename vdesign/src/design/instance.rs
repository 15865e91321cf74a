use serde::Serialize;

use super::InstanceId;

/// A single connection in an instance port list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PortConnection {
	/// Formal port name, `None` for ordered connections
	pub port: Option<String>,

	/// Connected expression, `None` when left unconnected
	pub expression: Option<String>,
}

impl PortConnection {
	pub fn named(port: &str, expression: Option<&str>) -> Self {
		Self {
			port: Some(port.into()),
			expression: expression.map(String::from),
		}
	}

	pub fn ordered(expression: Option<&str>) -> Self {
		Self {
			port: None,
			expression: expression.map(String::from),
		}
	}
}

/// Represents an instantiation of another module
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Instance {
	/// Self-reference, only unique within the parent module
	pub(super) id: InstanceId,

	/// Name given to the instance
	pub instance_name: String,

	/// Name of the instantiated module (not resolved)
	pub module_name: String,

	/// Raw parameter value assignment, empty when absent
	pub parameter_override: String,

	/// Raw text of the port connection list
	pub port_connection_text: String,

	pub connections: Vec<PortConnection>,
}

impl Instance {
	pub fn new(instance_name: &str, module_name: &str) -> Self {
		Self {
			id: InstanceId { id: 0 },
			instance_name: instance_name.into(),
			module_name: module_name.into(),
			parameter_override: String::new(),
			port_connection_text: String::new(),
			connections: vec![],
		}
	}

	pub fn id(&self) -> InstanceId {
		self.id
	}

	/// Returns the expression connected to the named port
	pub fn connection(&self, port: &str) -> Option<&str> {
		self.connections
			.iter()
			.find(|c| c.port.as_deref() == Some(port))
			.and_then(|c| c.expression.as_deref())
	}
}
