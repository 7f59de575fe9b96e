pub fn render_schema(table: &str) -> String {
	let init = include_str!("../../../sql/init.sql");
	let expanded = expand_includes(init);

	expanded.replace("<TABLE_NAME>", table)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_suggestions.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_suggestions.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_table_name_everywhere() {
		let sql = render_schema("learned_suggestions");

		assert!(!sql.contains("<TABLE_NAME>"));
		assert!(!sql.contains("\\ir "));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS learned_suggestions ("));
		assert!(sql.contains("CONSTRAINT learned_suggestions_acceptance_key UNIQUE NULLS NOT DISTINCT"));
	}
}
