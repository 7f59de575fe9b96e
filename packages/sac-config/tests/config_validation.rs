use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let table = root
		.as_table_mut()
		.expect("Template config must be a table.")
		.get_mut(section)
		.and_then(Value::as_table_mut)
		.expect("Template config must include the requested section.");

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn sample_toml_without(section: &str) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");

	root.as_table_mut().expect("Template config must be a table.").remove(section);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("sac_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> sac_config::Result<sac_config::Config> {
	let path = write_temp_config(payload);
	let result = sac_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation_error(payload: String, needle: &str) {
	let err = load_payload(payload).expect_err("Expected validation error.");
	let message = err.to_string();

	assert!(message.contains(needle), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads_and_normalizes() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Sample config must be valid.");

	assert_eq!(cfg.suggestions.table_name, "smart_autocomplete");
	assert_eq!(cfg.suggestions.max_email_length, 40);
	assert_eq!(cfg.autocomplete.max_results, 15);
	assert_eq!(cfg.directory.api_base, "http://127.0.0.1:9000");
	assert_eq!(cfg.directory.api_key.as_deref(), Some("key"));
	assert_eq!(cfg.min_search_string_length(), 1);
}

#[test]
fn missing_sections_use_defaults() {
	let mut payload = sample_toml_without("suggestions");

	payload = {
		let mut root: Value = toml::from_str(&payload).expect("Failed to parse payload.");

		root.as_table_mut().expect("Payload must be a table.").remove("autocomplete");

		toml::to_string(&root).expect("Failed to render payload.")
	};

	let cfg = load_payload(payload).expect("Defaults must be valid.");

	assert_eq!(cfg.suggestions.table_name, "smart_autocomplete");
	assert_eq!(cfg.suggestions.max_email_length, 40);
	assert_eq!(cfg.autocomplete.min_length, 1);
	assert_eq!(cfg.autocomplete.max_results, 15);
}

#[test]
fn suggestion_min_length_overrides_autocomplete_min_length() {
	let payload = sample_toml_with("suggestions", "min_search_string_length", Value::Integer(3));
	let cfg = load_payload(payload).expect("Config must be valid.");

	assert_eq!(cfg.min_search_string_length(), 3);
}

#[test]
fn zero_suggestion_min_length_falls_back_to_autocomplete_min_length() {
	let payload = sample_toml_with("suggestions", "min_search_string_length", Value::Integer(0));
	let mut root: Value = toml::from_str(&payload).expect("Failed to parse payload.");

	root.get_mut("autocomplete")
		.and_then(Value::as_table_mut)
		.expect("Payload must include [autocomplete].")
		.insert("min_length".to_string(), Value::Integer(2));

	let cfg = load_payload(toml::to_string(&root).expect("Failed to render payload."))
		.expect("Config must be valid.");

	assert_eq!(cfg.suggestions.min_search_string_length, None);
	assert_eq!(cfg.min_search_string_length(), 2);
}

#[test]
fn blank_api_key_is_normalized_to_none() {
	let payload = sample_toml_with("directory", "api_key", Value::String("   ".to_string()));
	let cfg = load_payload(payload).expect("Config must be valid.");

	assert!(cfg.directory.api_key.is_none());
}

#[test]
fn table_name_must_be_an_identifier() {
	for name in ["smart autocomplete", "1table", "t;DROP TABLE users", ""] {
		let payload = sample_toml_with("suggestions", "table_name", Value::String(name.to_string()));

		expect_validation_error(payload, "suggestions.table_name must be a plain SQL identifier");
	}

	let long_name = "t".repeat(41);
	let payload = sample_toml_with("suggestions", "table_name", Value::String(long_name));

	expect_validation_error(payload, "suggestions.table_name must be a plain SQL identifier");
}

#[test]
fn max_results_must_be_positive() {
	let payload = sample_toml_with("autocomplete", "max_results", Value::Integer(0));

	expect_validation_error(payload, "autocomplete.max_results must be greater than zero.");
}

#[test]
fn max_email_length_must_be_positive() {
	let payload = sample_toml_with("suggestions", "max_email_length", Value::Integer(0));

	expect_validation_error(payload, "suggestions.max_email_length must be greater than zero.");
}

#[test]
fn pool_max_conns_must_be_positive() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");

	root.get_mut("storage")
		.and_then(|storage| storage.get_mut("postgres"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [storage.postgres].")
		.insert("pool_max_conns".to_string(), Value::Integer(0));

	expect_validation_error(
		toml::to_string(&root).expect("Failed to render payload."),
		"storage.postgres.pool_max_conns must be greater than zero.",
	);
}

#[test]
fn directory_headers_must_be_strings() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");

	root.get_mut("directory")
		.and_then(|directory| directory.get_mut("default_headers"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [directory.default_headers].")
		.insert("x-retries".to_string(), Value::Integer(3));

	expect_validation_error(
		toml::to_string(&root).expect("Failed to render payload."),
		"directory.default_headers.x-retries must be a string.",
	);
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("sac_config_test_missing_file.toml");
	let err = sac_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, sac_config::Error::ReadConfig { .. }));
}

#[test]
fn malformed_toml_reports_parse_error() {
	let err = load_payload("[service\nhttp_bind =".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, sac_config::Error::ParseConfig { .. }));
}
