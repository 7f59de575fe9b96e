pub mod complete;
pub mod merge;
pub mod record;
pub mod search;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use time::OffsetDateTime;
use uuid::Uuid;

pub use complete::{CompleteRequest, CompleteResponse};
pub use error::{Error, Result};
pub use merge::MergeLimits;
pub use record::{AcceptOutcome, AcceptRequest, AcceptResponse};
pub use search::SearchMode;
use sac_config::Config;
use sac_domain::{GroupEntry, PersonEntry};
use sac_providers::DirectoryClient;
use sac_storage::{
	db::Db,
	models::{NewSuggestion, Suggestion, SuggestionTarget},
	queries,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence of learned suggestions, scoped per user.
pub trait SuggestionStore
where
	Self: Send + Sync,
{
	fn find_by_exact_string<'a>(
		&'a self,
		user_id: i64,
		search_string: &'a str,
	) -> BoxFuture<'a, Result<Vec<Suggestion>>>;

	fn find_by_prefix<'a>(
		&'a self,
		user_id: i64,
		search_string: &'a str,
	) -> BoxFuture<'a, Result<Vec<Suggestion>>>;

	fn upsert_acceptance<'a>(
		&'a self,
		user_id: i64,
		suggestion: &'a NewSuggestion<'a>,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Suggestion>>;

	fn rewrite_email<'a>(
		&'a self,
		record_id: Uuid,
		user_id: i64,
		new_email: &'a str,
	) -> BoxFuture<'a, Result<u64>>;

	fn rewrite_email_for_all_matching<'a>(
		&'a self,
		user_id: i64,
		target: &'a SuggestionTarget<'a>,
		old_email: Option<&'a str>,
		new_email: &'a str,
	) -> BoxFuture<'a, Result<u64>>;

	fn delete_all<'a>(
		&'a self,
		user_id: i64,
		target: &'a SuggestionTarget<'a>,
	) -> BoxFuture<'a, Result<u64>>;
}

/// Live lookup of groups and persons by address book and id.
///
/// `Ok(None)` means the directory answered and the entry no longer exists.
pub trait Directory
where
	Self: Send + Sync,
{
	fn group<'a>(
		&'a self,
		source: &'a str,
		id: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Option<GroupEntry>>>;

	fn person<'a>(
		&'a self,
		source: &'a str,
		id: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Option<PersonEntry>>>;
}

pub struct PgSuggestionStore {
	pub db: Db,
}
impl PgSuggestionStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}

impl SuggestionStore for PgSuggestionStore {
	fn find_by_exact_string<'a>(
		&'a self,
		user_id: i64,
		search_string: &'a str,
	) -> BoxFuture<'a, Result<Vec<Suggestion>>> {
		Box::pin(async move {
			Ok(queries::find_by_exact_string(&self.db, user_id, search_string).await?)
		})
	}

	fn find_by_prefix<'a>(
		&'a self,
		user_id: i64,
		search_string: &'a str,
	) -> BoxFuture<'a, Result<Vec<Suggestion>>> {
		Box::pin(async move { Ok(queries::find_by_prefix(&self.db, user_id, search_string).await?) })
	}

	fn upsert_acceptance<'a>(
		&'a self,
		user_id: i64,
		suggestion: &'a NewSuggestion<'a>,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Suggestion>> {
		Box::pin(async move {
			Ok(queries::upsert_acceptance(&self.db, user_id, suggestion, now).await?)
		})
	}

	fn rewrite_email<'a>(
		&'a self,
		record_id: Uuid,
		user_id: i64,
		new_email: &'a str,
	) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			Ok(queries::rewrite_email(&self.db, record_id, user_id, new_email).await?)
		})
	}

	fn rewrite_email_for_all_matching<'a>(
		&'a self,
		user_id: i64,
		target: &'a SuggestionTarget<'a>,
		old_email: Option<&'a str>,
		new_email: &'a str,
	) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			Ok(queries::rewrite_email_for_all_matching(
				&self.db, user_id, target, old_email, new_email,
			)
			.await?)
		})
	}

	fn delete_all<'a>(
		&'a self,
		user_id: i64,
		target: &'a SuggestionTarget<'a>,
	) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move { Ok(queries::delete_all(&self.db, user_id, target).await?) })
	}
}

impl Directory for DirectoryClient {
	fn group<'a>(
		&'a self,
		source: &'a str,
		id: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Option<GroupEntry>>> {
		Box::pin(DirectoryClient::group(self, source, id))
	}

	fn person<'a>(
		&'a self,
		source: &'a str,
		id: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Option<PersonEntry>>> {
		Box::pin(DirectoryClient::person(self, source, id))
	}
}

pub struct SacService {
	pub cfg: Config,
	pub store: Arc<dyn SuggestionStore>,
	pub directory: Arc<dyn Directory>,
}
impl SacService {
	/// Wires the Postgres store and the HTTP directory client described by `cfg`.
	pub fn new(cfg: Config, db: Db) -> Result<Self> {
		let directory = DirectoryClient::new(&cfg.directory)?;

		Ok(Self::with_collaborators(cfg, Arc::new(PgSuggestionStore::new(db)), Arc::new(directory)))
	}

	pub fn with_collaborators(
		cfg: Config,
		store: Arc<dyn SuggestionStore>,
		directory: Arc<dyn Directory>,
	) -> Self {
		Self { cfg, store, directory }
	}

	pub fn merge_limits(&self) -> MergeLimits {
		MergeLimits {
			min_length: self.cfg.min_search_string_length(),
			max_email_length: self.cfg.suggestions.max_email_length,
			max_results: self.cfg.autocomplete.max_results,
		}
	}
}
