use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
	#[default]
	Person,
	Group,
}
impl ContactType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Person => "person",
			Self::Group => "group",
		}
	}
}
impl fmt::Display for ContactType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for ContactType {
	type Err = UnknownContactType;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"person" => Ok(Self::Person),
			"group" => Ok(Self::Group),
			other => Err(UnknownContactType(other.to_string())),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownContactType(pub String);
impl fmt::Display for UnknownContactType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Unknown contact type {:?}.", self.0)
	}
}
impl std::error::Error for UnknownContactType {}

/// One autocomplete entry as exchanged with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
	#[serde(rename = "type", default)]
	pub contact_type: ContactType,
	pub id: String,
	pub source: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display: Option<String>,
}
impl Contact {
	pub fn group(id: impl Into<String>, source: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			contact_type: ContactType::Group,
			id: id.into(),
			source: source.into(),
			name: name.into(),
			email: None,
			display: None,
		}
	}

	pub fn person(
		id: impl Into<String>,
		source: impl Into<String>,
		name: impl Into<String>,
		email: impl Into<String>,
	) -> Self {
		Self {
			contact_type: ContactType::Person,
			id: id.into(),
			source: source.into(),
			name: name.into(),
			email: Some(email.into()),
			display: None,
		}
	}

	/// True when the contact carries an email longer than `max_chars` characters.
	pub fn email_exceeds(&self, max_chars: usize) -> bool {
		self.email.as_deref().map(|email| email.chars().count() > max_chars).unwrap_or(false)
	}
}
