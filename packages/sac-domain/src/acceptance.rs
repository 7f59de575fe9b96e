//! Validation of accepted-suggestion events coming from untrusted clients.

use regex::Regex;

use crate::{contact::ContactType, email};

const LOWER_ALPHA_PATTERN: &str = r"^[a-z]+$";
const POSITIVE_INTEGER_PATTERN: &str = r"^[1-9][0-9]*$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectCode {
	RejectSearchString,
	RejectAcceptedType,
	RejectAcceptedId,
	RejectAcceptedEmail,
	RejectAcceptedSource,
}
impl RejectCode {
	pub fn field(self) -> &'static str {
		match self {
			Self::RejectSearchString => "search_string",
			Self::RejectAcceptedType => "accepted_type",
			Self::RejectAcceptedId => "accepted_id",
			Self::RejectAcceptedEmail => "accepted_email",
			Self::RejectAcceptedSource => "accepted_source",
		}
	}
}

/// Raw acceptance fields, as received.
pub struct AcceptanceInput<'a> {
	pub search_string: &'a str,
	pub accepted_type: &'a str,
	pub accepted_id: &'a str,
	pub accepted_email: Option<&'a str>,
	pub accepted_source: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
	pub search_string: String,
	pub accepted_type: ContactType,
	pub accepted_id: String,
	/// Always `None` for groups.
	pub accepted_email: Option<String>,
	pub accepted_source: String,
}

pub fn validate(input: &AcceptanceInput<'_>) -> Result<Acceptance, RejectCode> {
	if input.search_string.is_empty() || input.search_string.contains('\n') {
		return Err(RejectCode::RejectSearchString);
	}

	let accepted_type = if input.accepted_type.is_empty() { "person" } else { input.accepted_type };

	if !matches_pattern(LOWER_ALPHA_PATTERN, accepted_type) {
		return Err(RejectCode::RejectAcceptedType);
	}

	let accepted_type =
		accepted_type.parse::<ContactType>().map_err(|_| RejectCode::RejectAcceptedType)?;

	if !matches_pattern(POSITIVE_INTEGER_PATTERN, input.accepted_id) {
		return Err(RejectCode::RejectAcceptedId);
	}

	let accepted_email = input.accepted_email.filter(|email| !email.is_empty());

	if let Some(email) = accepted_email
		&& !email::check_email(email)
	{
		return Err(RejectCode::RejectAcceptedEmail);
	}
	if !matches_pattern(LOWER_ALPHA_PATTERN, input.accepted_source) {
		return Err(RejectCode::RejectAcceptedSource);
	}

	let accepted_email = match accepted_type {
		ContactType::Group => None,
		ContactType::Person => accepted_email.map(str::to_string),
	};

	Ok(Acceptance {
		search_string: input.search_string.to_string(),
		accepted_type,
		accepted_id: input.accepted_id.to_string(),
		accepted_email,
		accepted_source: input.accepted_source.to_string(),
	})
}

fn matches_pattern(pattern: &str, text: &str) -> bool {
	Regex::new(pattern).map(|re| re.is_match(text)).unwrap_or(false)
}
