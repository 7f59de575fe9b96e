//! Folding learned tiers and the baseline provider output into one ranked list.

use sac_domain::{Contact, IdentityMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeLimits {
	/// Shorter search strings leave the baseline untouched.
	pub min_length: usize,
	pub max_email_length: usize,
	pub max_results: usize,
}

/// Ranks exact matches first, then prefix matches, then the baseline.
///
/// Every identity appears once and keeps the attributes of the tier that produced it first.
/// Persons with emails longer than `max_email_length` characters are dropped before the list is
/// cut to `max_results`.
pub fn merge(
	search_string: &str,
	exact: IdentityMap,
	prefix: IdentityMap,
	baseline: Vec<Contact>,
	limits: &MergeLimits,
) -> Vec<Contact> {
	if search_string.chars().count() < limits.min_length {
		return baseline;
	}

	let mut merged = exact;

	merged.extend_first_wins(prefix);
	merged.extend_first_wins(baseline.into_iter().collect());
	merged.retain(|contact| !contact.email_exceeds(limits.max_email_length));
	merged.truncate(limits.max_results);

	merged.into_contacts()
}
