use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub suggestions: Suggestions,
	#[serde(default)]
	pub autocomplete: Autocomplete,
	pub directory: DirectoryProviderConfig,
}
impl Config {
	/// Search strings shorter than this are neither matched nor recorded.
	///
	/// The suggestion-specific setting wins; the host autocomplete threshold is the fallback.
	pub fn min_search_string_length(&self) -> usize {
		self.suggestions
			.min_search_string_length
			.filter(|&length| length > 0)
			.unwrap_or(self.autocomplete.min_length)
	}
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Suggestions {
	pub table_name: String,
	/// Optional. Zero is treated as unset.
	pub min_search_string_length: Option<usize>,
	/// Learned and baseline persons with longer emails are never suggested.
	pub max_email_length: usize,
}
impl Default for Suggestions {
	fn default() -> Self {
		Self {
			table_name: "smart_autocomplete".to_string(),
			min_search_string_length: None,
			max_email_length: 40,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Autocomplete {
	pub min_length: usize,
	pub max_results: usize,
}
impl Default for Autocomplete {
	fn default() -> Self {
		Self { min_length: 1, max_results: 15 }
	}
}

#[derive(Debug, Deserialize)]
pub struct DirectoryProviderConfig {
	pub api_base: String,
	pub api_key: Option<String>,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

fn default_log_level() -> String {
	"info".to_string()
}
