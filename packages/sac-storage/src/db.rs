use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Error, Result, schema};

pub struct Db {
	pub pool: PgPool,
	/// Suggestion table; checked to be a plain identifier because it is spliced into SQL.
	pub table: String,
}
impl Db {
	pub async fn connect(cfg: &sac_config::Postgres, table: &str) -> Result<Self> {
		check_table_name(table)?;

		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool, table: table.to_string() })
	}

	pub fn from_pool(pool: PgPool, table: &str) -> Result<Self> {
		check_table_name(table)?;

		Ok(Self { pool, table: table.to_string() })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema(&self.table);
		let lock_id: i64 = 7_120_115;
		// Released when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}

fn check_table_name(table: &str) -> Result<()> {
	if !sac_config::is_valid_table_name(table) {
		return Err(Error::InvalidArgument(format!("{table:?} is not a valid table name.")));
	}

	Ok(())
}
