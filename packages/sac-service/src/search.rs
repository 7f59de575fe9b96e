use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Result, SacService};
use sac_domain::{
	Contact, ContactType, IdentityMap, PersonEntry, identity_of, recipient::format_recipient,
};
use sac_storage::models::{Suggestion, SuggestionTarget};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
	/// Suggestions learned for exactly the search string.
	Exact,
	/// Suggestions learned for longer search strings that start with it.
	Prefix,
}

enum Resolution {
	Found(Contact),
	/// The directory answered and the target no longer exists.
	Missing,
	Skipped,
}

impl SacService {
	/// Loads the user's learned suggestions for one tier and reconciles them with the directory.
	///
	/// Targets the directory reports missing are pruned from storage. Persons whose stored email
	/// is gone are moved to their first current email. Reconciliation writes never fail the call;
	/// only the store read does.
	pub async fn search_matches(
		&self,
		user_id: i64,
		search_string: &str,
		mode: SearchMode,
	) -> Result<IdentityMap> {
		let records = match mode {
			SearchMode::Exact => self.store.find_by_exact_string(user_id, search_string).await?,
			SearchMode::Prefix => self.store.find_by_prefix(user_id, search_string).await?,
		};
		let max_email_length = self.cfg.suggestions.max_email_length;
		let mut matches = IdentityMap::new();
		let mut pruned = HashSet::new();

		for record in &records {
			let target = (
				record.accepted_type.as_str(),
				record.accepted_source.as_str(),
				record.accepted_id.as_str(),
			);

			if pruned.contains(&target) {
				continue;
			}

			let Ok(contact_type) = record.accepted_type.parse::<ContactType>() else {
				tracing::warn!(
					user_id,
					suggestion_id = %record.id,
					accepted_type = %record.accepted_type,
					"Skipping suggestion with an unknown contact type."
				);

				continue;
			};
			let resolution = match contact_type {
				ContactType::Group => self.resolve_group(user_id, record).await,
				ContactType::Person => self.resolve_person(user_id, record).await,
			};

			match resolution {
				Resolution::Found(contact) => {
					if contact.email_exceeds(max_email_length) {
						tracing::debug!(
							user_id,
							accepted_source = %record.accepted_source,
							accepted_id = %record.accepted_id,
							"Skipping suggestion with an email above the length limit."
						);

						continue;
					}

					matches.insert_or_replace(identity_of(&contact), contact);
				},
				Resolution::Missing => {
					self.prune(user_id, record).await;
					pruned.insert(target);
				},
				Resolution::Skipped => {},
			}
		}

		tracing::debug!(
			user_id,
			?mode,
			records = records.len(),
			matches = matches.len(),
			"Resolved learned suggestions."
		);

		Ok(matches)
	}

	async fn resolve_group(&self, user_id: i64, record: &Suggestion) -> Resolution {
		match self.directory.group(&record.accepted_source, &record.accepted_id).await {
			Ok(Some(group)) => Resolution::Found(Contact::group(
				record.accepted_id.as_str(),
				record.accepted_source.as_str(),
				format!("{} ({})", group.name, group.member_count),
			)),
			Ok(None) => Resolution::Missing,
			Err(err) => {
				tracing::warn!(
					error = %err,
					user_id,
					accepted_source = %record.accepted_source,
					accepted_id = %record.accepted_id,
					"Group lookup failed. Skipping suggestion."
				);

				Resolution::Skipped
			},
		}
	}

	async fn resolve_person(&self, user_id: i64, record: &Suggestion) -> Resolution {
		let person = match self.directory.person(&record.accepted_source, &record.accepted_id).await {
			Ok(Some(person)) => person,
			Ok(None) => return Resolution::Missing,
			Err(err) => {
				tracing::warn!(
					error = %err,
					user_id,
					accepted_source = %record.accepted_source,
					accepted_id = %record.accepted_id,
					"Person lookup failed. Skipping suggestion."
				);

				return Resolution::Skipped;
			},
		};
		let stored = record.accepted_email.as_deref();
		let email = match stored.filter(|stored| person.emails().any(|email| email == *stored)) {
			Some(email) => email.to_string(),
			None => {
				let Some(replacement) = person.emails().next() else {
					tracing::debug!(
						user_id,
						accepted_source = %record.accepted_source,
						accepted_id = %record.accepted_id,
						"Person has no email. Skipping suggestion."
					);

					return Resolution::Skipped;
				};

				self.rewrite_stale_email(user_id, record, replacement).await;

				replacement.to_string()
			},
		};

		Resolution::Found(person_contact(record, &person, email))
	}

	async fn rewrite_stale_email(&self, user_id: i64, record: &Suggestion, new_email: &str) {
		let old_email = record.accepted_email.as_deref();

		if let Err(err) = self.store.rewrite_email(record.id, user_id, new_email).await {
			tracing::warn!(
				error = %err,
				user_id,
				suggestion_id = %record.id,
				"Failed to rewrite stale suggestion email."
			);
		}

		let target = target_of(record);

		match self
			.store
			.rewrite_email_for_all_matching(user_id, &target, old_email, new_email)
			.await
		{
			Ok(touched) => tracing::info!(
				user_id,
				accepted_source = %record.accepted_source,
				accepted_id = %record.accepted_id,
				touched,
				"Moved suggestions to the contact's current email."
			),
			Err(err) => tracing::warn!(
				error = %err,
				user_id,
				accepted_source = %record.accepted_source,
				accepted_id = %record.accepted_id,
				"Failed to rewrite sibling suggestion emails."
			),
		}
	}

	async fn prune(&self, user_id: i64, record: &Suggestion) {
		let target = target_of(record);

		match self.store.delete_all(user_id, &target).await {
			Ok(deleted) => tracing::info!(
				user_id,
				accepted_type = %record.accepted_type,
				accepted_source = %record.accepted_source,
				accepted_id = %record.accepted_id,
				deleted,
				"Pruned suggestions for a contact missing from the directory."
			),
			Err(err) => tracing::warn!(
				error = %err,
				user_id,
				accepted_source = %record.accepted_source,
				accepted_id = %record.accepted_id,
				"Failed to prune suggestions."
			),
		}
	}
}

fn target_of(record: &Suggestion) -> SuggestionTarget<'_> {
	SuggestionTarget {
		accepted_type: &record.accepted_type,
		accepted_source: &record.accepted_source,
		accepted_id: &record.accepted_id,
	}
}

fn person_contact(record: &Suggestion, person: &PersonEntry, email: String) -> Contact {
	let name = format_recipient(&email, &person.name);
	let mut contact =
		Contact::person(record.accepted_id.as_str(), record.accepted_source.as_str(), name, email);

	contact.display = person
		.display_name
		.as_deref()
		.map(str::trim)
		.filter(|display| !display.is_empty() && *display != person.name.trim())
		.map(str::to_string);

	contact
}
