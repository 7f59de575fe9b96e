use serde::{Deserialize, Serialize};

use crate::{SacService, SearchMode, merge};
use sac_domain::{Contact, IdentityMap};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompleteRequest {
	pub user_id: i64,
	pub search_string: String,
	/// Baseline matches from the address-book provider, in provider order.
	#[serde(default)]
	pub contacts: Vec<Contact>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteResponse {
	pub contacts: Vec<Contact>,
}

impl SacService {
	/// Puts the user's learned suggestions ahead of the baseline matches.
	///
	/// Store failures only cost the affected tier; the baseline is always returned.
	pub async fn complete(&self, req: CompleteRequest) -> CompleteResponse {
		let limits = self.merge_limits();

		if req.search_string.chars().count() < limits.min_length {
			return CompleteResponse { contacts: req.contacts };
		}

		let exact = self.learned_tier(req.user_id, &req.search_string, SearchMode::Exact).await;
		let prefix = self.learned_tier(req.user_id, &req.search_string, SearchMode::Prefix).await;
		let contacts = merge::merge(&req.search_string, exact, prefix, req.contacts, &limits);

		CompleteResponse { contacts }
	}

	async fn learned_tier(&self, user_id: i64, search_string: &str, mode: SearchMode) -> IdentityMap {
		match self.search_matches(user_id, search_string, mode).await {
			Ok(matches) => matches,
			Err(err) => {
				tracing::warn!(
					error = %err,
					user_id,
					?mode,
					"Failed to load learned suggestions. Continuing without them."
				);

				IdentityMap::new()
			},
		}
	}
}
