use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, SacService};
use sac_domain::acceptance::{self, AcceptanceInput, RejectCode};
use sac_storage::models::NewSuggestion;

/// An accepted suggestion as reported by the client. Missing strings arrive empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AcceptRequest {
	pub user_id: i64,
	#[serde(default)]
	pub search_string: String,
	#[serde(default)]
	pub accepted_type: String,
	#[serde(default)]
	pub accepted_id: String,
	#[serde(default)]
	pub accepted_email: String,
	#[serde(default)]
	pub accepted_source: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum AcceptOutcome {
	/// The search string is below the configured minimum length.
	Skipped,
	Recorded { suggestion_id: Uuid, accepted_count: i64 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptResponse {
	#[serde(flatten)]
	pub outcome: AcceptOutcome,
}

impl SacService {
	pub async fn record_acceptance(&self, req: AcceptRequest) -> Result<AcceptResponse> {
		let min_length = self.cfg.min_search_string_length();

		if req.search_string.chars().count() < min_length {
			tracing::debug!(
				user_id = req.user_id,
				min_length,
				"Search string below minimum length. Acceptance not recorded."
			);

			return Ok(AcceptResponse { outcome: AcceptOutcome::Skipped });
		}

		let input = AcceptanceInput {
			search_string: &req.search_string,
			accepted_type: &req.accepted_type,
			accepted_id: &req.accepted_id,
			accepted_email: Some(req.accepted_email.as_str()),
			accepted_source: &req.accepted_source,
		};
		let accepted = acceptance::validate(&input).map_err(|code| Error::InvalidInput {
			field: code.field().to_string(),
			message: reject_message(code).to_string(),
		})?;
		let suggestion = NewSuggestion {
			search_string: &accepted.search_string,
			accepted_type: accepted.accepted_type.as_str(),
			accepted_id: &accepted.accepted_id,
			accepted_email: accepted.accepted_email.as_deref(),
			accepted_source: &accepted.accepted_source,
		};
		let row =
			self.store.upsert_acceptance(req.user_id, &suggestion, OffsetDateTime::now_utc()).await?;

		tracing::info!(
			user_id = req.user_id,
			suggestion_id = %row.id,
			accepted_type = %row.accepted_type,
			accepted_source = %row.accepted_source,
			accepted_id = %row.accepted_id,
			accepted_count = row.accepted_count,
			"Recorded accepted suggestion."
		);

		Ok(AcceptResponse {
			outcome: AcceptOutcome::Recorded {
				suggestion_id: row.id,
				accepted_count: row.accepted_count,
			},
		})
	}
}

fn reject_message(code: RejectCode) -> &'static str {
	match code {
		RejectCode::RejectSearchString => "Search string must be non-empty and single-line.",
		RejectCode::RejectAcceptedType => "Accepted type must be person or group.",
		RejectCode::RejectAcceptedId => "Accepted id must be a positive integer.",
		RejectCode::RejectAcceptedEmail => "Accepted email is not a valid address.",
		RejectCode::RejectAcceptedSource => "Accepted source must be lowercase letters.",
	}
}
