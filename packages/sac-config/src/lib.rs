mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Autocomplete, Config, DirectoryProviderConfig, Postgres, Service, Storage, Suggestions,
};

use std::{fs, path::Path};

use regex::Regex;

const TABLE_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]{0,39}$";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if !is_valid_table_name(&cfg.suggestions.table_name) {
		return Err(Error::Validation {
			message: "suggestions.table_name must be a plain SQL identifier of at most 40 characters."
				.to_string(),
		});
	}
	if cfg.suggestions.max_email_length == 0 {
		return Err(Error::Validation {
			message: "suggestions.max_email_length must be greater than zero.".to_string(),
		});
	}
	if cfg.autocomplete.max_results == 0 {
		return Err(Error::Validation {
			message: "autocomplete.max_results must be greater than zero.".to_string(),
		});
	}
	if cfg.directory.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "directory.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.directory.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "directory.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.directory.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("directory.default_headers.{key} must be a string."),
			});
		}
	}

	Ok(())
}

pub fn is_valid_table_name(name: &str) -> bool {
	Regex::new(TABLE_NAME_PATTERN).map(|re| re.is_match(name)).unwrap_or(false)
}

fn normalize(cfg: &mut Config) {
	if cfg.suggestions.min_search_string_length == Some(0) {
		cfg.suggestions.min_search_string_length = None;
	}
	if cfg.directory.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.directory.api_key = None;
	}

	let trimmed = cfg.directory.api_base.trim_end_matches('/').to_string();

	cfg.directory.api_base = trimmed;
}
