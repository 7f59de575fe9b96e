use std::sync::Arc;

use sac_service::SacService;
use sac_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SacService>,
}
impl AppState {
	/// Connects Postgres, bootstraps the suggestions table and wires the directory client.
	pub async fn new(config: sac_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres, &config.suggestions.table_name).await?;

		db.ensure_schema().await?;

		let service = SacService::new(config, db)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: SacService) -> Self {
		Self { service: Arc::new(service) }
	}
}
