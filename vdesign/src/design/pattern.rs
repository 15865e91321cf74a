use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	static ref PORT_REGEX: Regex =
		Regex::new(r"(input|output|inout)(wire|reg|signed)?(?:\[(\d+):(\d+)\])?(\w+)").unwrap();
	static ref PARAM_REGEX: Regex = Regex::new(r"(\w+)\s*=\s*(\d+)").unwrap();
}

const PARAMETER_KEYWORD: &str = "parameter";

/// Raw port tuple as captured from declaration text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortMatch<'t> {
	pub direction: &'t str,
	pub storage: Option<&'t str>,
	pub msb: Option<&'t str>,
	pub lsb: Option<&'t str>,
	pub name: &'t str,
}

/// Finds all `<direction><storage>?<[msb:lsb]>?<name>` occurrences
///
/// The text is expected to be whitespace-collapsed, so no separators are
/// required between the tokens.
pub fn extract_ports(text: &str) -> Vec<PortMatch<'_>> {
	PORT_REGEX
		.captures_iter(text)
		.map(|caps| PortMatch {
			direction: caps.get(1).map_or("", |m| m.as_str()),
			storage: caps.get(2).map(|m| m.as_str()),
			msb: caps.get(3).map(|m| m.as_str()),
			lsb: caps.get(4).map(|m| m.as_str()),
			name: caps.get(5).map_or("", |m| m.as_str()),
		})
		.collect()
}

/// Finds all `<name> = <integer>` assignments
///
/// A leading `parameter` keyword glued to the name is removed.
pub fn extract_params(text: &str) -> Vec<(&str, &str)> {
	PARAM_REGEX
		.captures_iter(text)
		.filter_map(|caps| {
			let name = caps.get(1)?.as_str();
			let value = caps.get(2)?.as_str();
			Some((name.strip_prefix(PARAMETER_KEYWORD).unwrap_or(name), value))
		})
		.filter(|(name, _)| !name.is_empty())
		.collect()
}
