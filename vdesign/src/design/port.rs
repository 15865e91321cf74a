use std::fmt;

use log::warn;
use serde::Serialize;

use super::pattern::PortMatch;
use super::DesignError;

/// Direction of a module port
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
	Input,
	Output,
	Inout,
}

impl PortDirection {
	pub fn keyword(&self) -> &'static str {
		use PortDirection::*;
		match self {
			Input => "input",
			Output => "output",
			Inout => "inout",
		}
	}

	fn from_keyword(keyword: &str) -> Option<Self> {
		use PortDirection::*;
		match keyword {
			"input" => Some(Input),
			"output" => Some(Output),
			"inout" => Some(Inout),
			_ => None,
		}
	}
}

/// Storage keyword given in a port declaration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
	/// `wire`
	Net,
	/// `reg`
	Variable,
	/// `signed`
	SignedNet,
}

impl StorageKind {
	pub fn keyword(&self) -> &'static str {
		use StorageKind::*;
		match self {
			Net => "wire",
			Variable => "reg",
			SignedNet => "signed",
		}
	}

	fn from_keyword(keyword: &str) -> Option<Self> {
		use StorageKind::*;
		match keyword {
			"wire" => Some(Net),
			"reg" => Some(Variable),
			"signed" => Some(SignedNet),
			_ => None,
		}
	}
}

impl fmt::Display for PortDirection {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.pad(self.keyword())
	}
}

impl fmt::Display for StorageKind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.pad(self.keyword())
	}
}

/// `[msb:lsb]` bit range of a vector port
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BitRange {
	pub msb: i64,
	pub lsb: i64,
}

impl BitRange {
	pub fn new(msb: i64, lsb: i64) -> Self {
		Self { msb, lsb }
	}

	/// Number of bits covered by the range (`msb - lsb + 1`), saturating
	pub fn size(&self) -> i64 {
		self.msb.saturating_sub(self.lsb).saturating_add(1)
	}

	/// Number of bits covered by the range, `None` if it does not fit in an `i64`
	pub fn checked_size(&self) -> Option<i64> {
		self.msb.checked_sub(self.lsb)?.checked_add(1)
	}
}

impl fmt::Display for BitRange {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "[{}:{}]", self.msb, self.lsb)
	}
}

/// Represents a port of a module interface
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Port {
	pub direction: PortDirection,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub storage: Option<StorageKind>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub range: Option<BitRange>,
	pub name: String,
}

impl Port {
	pub fn new(direction: PortDirection, name: &str) -> Self {
		Self {
			direction,
			storage: None,
			range: None,
			name: name.into(),
		}
	}

	pub fn with_storage(mut self, storage: StorageKind) -> Self {
		self.storage = Some(storage);
		self
	}

	pub fn with_range(mut self, msb: i64, lsb: i64) -> Self {
		self.range = Some(BitRange::new(msb, lsb));
		self
	}

	/// Port width in bits, scalar ports are 1 bit wide
	pub fn width(&self) -> i64 {
		self.range.map_or(1, |r| r.size())
	}
}

fn parse_bound(text: &str) -> Result<i64, DesignError> {
	text.parse().map_err(|_| DesignError::InvalidRangeBound(text.into()))
}

impl TryFrom<PortMatch<'_>> for Port {
	type Error = DesignError;

	fn try_from(m: PortMatch<'_>) -> Result<Self, Self::Error> {
		let direction =
			PortDirection::from_keyword(m.direction).ok_or_else(|| DesignError::InvalidDirection(m.direction.into()))?;
		let range = match (m.msb, m.lsb) {
			(Some(msb), Some(lsb)) => Some(BitRange::new(parse_bound(msb)?, parse_bound(lsb)?)),
			_ => None,
		};
		if let Some(r) = range {
			r.checked_size().ok_or(DesignError::RangeTooWide(r.msb, r.lsb))?;
		}

		Ok(Self {
			direction,
			storage: m.storage.and_then(StorageKind::from_keyword),
			range,
			name: m.name.into(),
		})
	}
}

/// Represents a module parameter with an integer default value
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Parameter {
	pub name: String,
	pub value: String,
}

impl Parameter {
	pub fn new(name: &str, value: &str) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}

/// Replaces every `NAME-1` with the literal value of `NAME` minus one
///
/// Only this single form is resolved. Any other arithmetic on parameters is
/// left untouched.
pub fn substitute_params(text: &str, params: &[Parameter]) -> String {
	let mut text = text.to_string();
	for param in params {
		let value: i64 = match param.value.parse() {
			Ok(value) => value,
			Err(_) => {
				warn!("Parameter '{}' has non-integer value '{}'", param.name, param.value);
				continue;
			},
		};

		let pattern = format!("{}-1", param.name);
		text = text.replace(&pattern, &(value - 1).to_string());
	}
	text
}
