use time::OffsetDateTime;
use uuid::Uuid;

/// One learned suggestion: a contact or group the user accepted for a search string.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Suggestion {
	pub id: Uuid,
	pub user_id: i64,
	pub search_string: String,
	pub accepted_type: String,
	pub accepted_id: String,
	pub accepted_email: Option<String>,
	pub accepted_source: String,
	pub accepted_count: i64,
	pub accepted_datetime_first: OffsetDateTime,
	pub accepted_datetime_last: OffsetDateTime,
}

#[derive(Debug, Clone, Copy)]
pub struct NewSuggestion<'a> {
	pub search_string: &'a str,
	pub accepted_type: &'a str,
	pub accepted_id: &'a str,
	pub accepted_email: Option<&'a str>,
	pub accepted_source: &'a str,
}

/// The contact or group a suggestion points at, independent of search string and email.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionTarget<'a> {
	pub accepted_type: &'a str,
	pub accepted_source: &'a str,
	pub accepted_id: &'a str,
}
