use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{NewSuggestion, Suggestion, SuggestionTarget},
};

const COLUMNS: &str = "\
id,
	user_id,
	search_string,
	accepted_type,
	accepted_id,
	accepted_email,
	accepted_source,
	accepted_count,
	accepted_datetime_first,
	accepted_datetime_last";

/// Suggestions recorded for exactly `search_string`, most accepted first.
pub async fn find_by_exact_string(
	db: &Db,
	user_id: i64,
	search_string: &str,
) -> Result<Vec<Suggestion>> {
	let sql = format!(
		"\
SELECT
	{COLUMNS}
FROM {table}
WHERE user_id = $1
	AND search_string = $2
ORDER BY accepted_count DESC, accepted_datetime_last DESC, id",
		table = db.table,
	);
	let rows = sqlx::query_as::<_, Suggestion>(&sql)
		.bind(user_id)
		.bind(search_string)
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

/// Suggestions recorded for longer search strings starting with `search_string`.
///
/// Rows equal to `search_string` belong to [`find_by_exact_string`] and are excluded.
pub async fn find_by_prefix(
	db: &Db,
	user_id: i64,
	search_string: &str,
) -> Result<Vec<Suggestion>> {
	let sql = format!(
		"\
SELECT
	{COLUMNS}
FROM {table}
WHERE user_id = $1
	AND starts_with(search_string, $2)
	AND search_string <> $2
ORDER BY accepted_count DESC, accepted_datetime_last DESC, id",
		table = db.table,
	);
	let rows = sqlx::query_as::<_, Suggestion>(&sql)
		.bind(user_id)
		.bind(search_string)
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

/// Records one acceptance: inserts the tuple with a count of one or increments the existing row.
///
/// A single statement keyed on the acceptance constraint, so concurrent identical acceptances
/// converge on one row.
pub async fn upsert_acceptance(
	db: &Db,
	user_id: i64,
	suggestion: &NewSuggestion<'_>,
	now: OffsetDateTime,
) -> Result<Suggestion> {
	let sql = format!(
		"\
INSERT INTO {table} (
	id,
	user_id,
	search_string,
	accepted_type,
	accepted_id,
	accepted_email,
	accepted_source,
	accepted_count,
	accepted_datetime_first,
	accepted_datetime_last
)
VALUES ($1, $2, $3, $4, $5, $6, $7, 1, $8, $8)
ON CONFLICT ON CONSTRAINT {table}_acceptance_key DO UPDATE
SET
	accepted_count = {table}.accepted_count + 1,
	accepted_datetime_last = GREATEST({table}.accepted_datetime_last, EXCLUDED.accepted_datetime_last)
RETURNING
	{COLUMNS}",
		table = db.table,
	);
	let row = sqlx::query_as::<_, Suggestion>(&sql)
		.bind(Uuid::new_v4())
		.bind(user_id)
		.bind(suggestion.search_string)
		.bind(suggestion.accepted_type)
		.bind(suggestion.accepted_id)
		.bind(suggestion.accepted_email)
		.bind(suggestion.accepted_source)
		.bind(now)
		.fetch_one(&db.pool)
		.await?;

	Ok(row)
}

/// Points one suggestion at `new_email`. Returns the number of rows touched.
pub async fn rewrite_email(db: &Db, record_id: Uuid, user_id: i64, new_email: &str) -> Result<u64> {
	let sql = format!(
		"\
SELECT
	{COLUMNS}
FROM {table}
WHERE id = $1
	AND user_id = $2
FOR UPDATE",
		table = db.table,
	);
	let mut tx = db.pool.begin().await?;
	let row = sqlx::query_as::<_, Suggestion>(&sql)
		.bind(record_id)
		.bind(user_id)
		.fetch_optional(&mut *tx)
		.await?;
	let touched = match row {
		Some(row) => move_to_email(&mut tx, &db.table, &row, new_email).await?,
		None => 0,
	};

	tx.commit().await?;

	Ok(touched)
}

/// Points every suggestion of `target` that still uses `old_email` at `new_email`.
///
/// `None` matches rows without an email. Returns the number of rows touched.
pub async fn rewrite_email_for_all_matching(
	db: &Db,
	user_id: i64,
	target: &SuggestionTarget<'_>,
	old_email: Option<&str>,
	new_email: &str,
) -> Result<u64> {
	let sql = format!(
		"\
SELECT
	{COLUMNS}
FROM {table}
WHERE user_id = $1
	AND accepted_type = $2
	AND accepted_source = $3
	AND accepted_id = $4
	AND accepted_email IS NOT DISTINCT FROM $5
ORDER BY id
FOR UPDATE",
		table = db.table,
	);
	let mut tx = db.pool.begin().await?;
	let rows = sqlx::query_as::<_, Suggestion>(&sql)
		.bind(user_id)
		.bind(target.accepted_type)
		.bind(target.accepted_source)
		.bind(target.accepted_id)
		.bind(old_email)
		.fetch_all(&mut *tx)
		.await?;
	let mut touched = 0;

	for row in &rows {
		touched += move_to_email(&mut tx, &db.table, row, new_email).await?;
	}

	tx.commit().await?;

	Ok(touched)
}

/// Forgets every suggestion pointing at `target`. Returns the number of rows deleted.
pub async fn delete_all(db: &Db, user_id: i64, target: &SuggestionTarget<'_>) -> Result<u64> {
	let sql = format!(
		"\
DELETE FROM {table}
WHERE user_id = $1
	AND accepted_type = $2
	AND accepted_id = $3
	AND accepted_source = $4",
		table = db.table,
	);
	let result = sqlx::query(&sql)
		.bind(user_id)
		.bind(target.accepted_type)
		.bind(target.accepted_id)
		.bind(target.accepted_source)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected())
}

/// Moves `row` to `new_email`, folding it into an existing row for the same tuple when there is
/// one. The acceptance constraint never sees two rows for one tuple.
async fn move_to_email(
	conn: &mut PgConnection,
	table: &str,
	row: &Suggestion,
	new_email: &str,
) -> Result<u64> {
	if row.accepted_email.as_deref() == Some(new_email) {
		return Ok(0);
	}

	let find_sql = format!(
		"\
SELECT id
FROM {table}
WHERE user_id = $1
	AND search_string = $2
	AND accepted_type = $3
	AND accepted_id = $4
	AND accepted_email = $5
	AND accepted_source = $6
	AND id <> $7
FOR UPDATE"
	);
	let existing: Option<Uuid> = sqlx::query_scalar(&find_sql)
		.bind(row.user_id)
		.bind(row.search_string.as_str())
		.bind(row.accepted_type.as_str())
		.bind(row.accepted_id.as_str())
		.bind(new_email)
		.bind(row.accepted_source.as_str())
		.bind(row.id)
		.fetch_optional(&mut *conn)
		.await?;

	match existing {
		Some(existing_id) => {
			let merge_sql = format!(
				"\
UPDATE {table}
SET
	accepted_count = accepted_count + $2,
	accepted_datetime_first = LEAST(accepted_datetime_first, $3),
	accepted_datetime_last = GREATEST(accepted_datetime_last, $4)
WHERE id = $1"
			);
			let delete_sql = format!("DELETE FROM {table} WHERE id = $1");

			sqlx::query(&merge_sql)
				.bind(existing_id)
				.bind(row.accepted_count)
				.bind(row.accepted_datetime_first)
				.bind(row.accepted_datetime_last)
				.execute(&mut *conn)
				.await?;
			sqlx::query(&delete_sql).bind(row.id).execute(&mut *conn).await?;

			tracing::debug!(
				from = %row.id,
				into = %existing_id,
				accepted_count = row.accepted_count,
				"Folded suggestion into existing row for the new email."
			);
		},
		None => {
			let update_sql = format!("UPDATE {table} SET accepted_email = $1 WHERE id = $2");

			sqlx::query(&update_sql).bind(new_email).bind(row.id).execute(&mut *conn).await?;
		},
	}

	Ok(1)
}
