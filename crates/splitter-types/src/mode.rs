//! Leg replication mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many identical legs a bridge call carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
	/// One leg.
	#[default]
	Single,
	/// The quoted leg duplicated into two legs.
	Multi,
}

impl Mode {
	/// Number of legs produced in this mode.
	pub fn leg_count(self) -> usize {
		match self {
			Mode::Single => 1,
			Mode::Multi => 2,
		}
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Mode::Single => write!(f, "single"),
			Mode::Multi => write!(f, "multi"),
		}
	}
}

impl FromStr for Mode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"single" => Ok(Mode::Single),
			"multi" => Ok(Mode::Multi),
			other => Err(format!(
				"Unknown mode '{}', expected 'single' or 'multi'",
				other
			)),
		}
	}
}
