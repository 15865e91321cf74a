use thiserror::Error;

use super::ModuleId;

/// Represents an error that can occur during design construction or lookup.
#[derive(Clone, Debug, Error)]
pub enum DesignError {
	#[error("Invalid module ID")]
	InvalidModuleId(ModuleId),

	#[error("Module '{0}' not found in design")]
	ModuleNotFound(String),

	#[error("Invalid port direction '{0}'")]
	InvalidDirection(String),

	#[error("Range bound '{0}' is not a valid integer")]
	InvalidRangeBound(String),

	#[error("Range [{0}:{1}] is too wide")]
	RangeTooWide(i64, i64),
}
