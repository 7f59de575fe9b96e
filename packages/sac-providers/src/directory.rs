//! Client for the address-book directory that owns contacts and groups.
//!
//! `GET {api_base}/v1/sources/{source}/groups/{id}` and
//! `GET {api_base}/v1/sources/{source}/contacts/{id}` answer 404 for unknown entries.

use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use sac_domain::{GroupEntry, PersonEntry};

pub struct DirectoryClient {
	client: Client,
	api_base: Url,
}
impl DirectoryClient {
	pub fn new(cfg: &sac_config::DirectoryProviderConfig) -> Result<Self> {
		let headers = crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?;
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(headers)
			.build()?;
		let api_base = Url::parse(&cfg.api_base)?;

		if api_base.cannot_be_a_base() {
			return Err(eyre::eyre!("Directory api_base must be a base URL."));
		}

		Ok(Self { client, api_base })
	}

	/// Looks a group up, including its current member count. `None` when the directory no
	/// longer knows it.
	pub async fn group(&self, source: &str, id: &str) -> Result<Option<GroupEntry>> {
		let Some(json) = self.fetch(source, "groups", id).await? else {
			return Ok(None);
		};

		parse_group_response(json).map(Some)
	}

	/// Looks a person up with their current email addresses. `None` when the directory no
	/// longer knows them.
	pub async fn person(&self, source: &str, id: &str) -> Result<Option<PersonEntry>> {
		let Some(json) = self.fetch(source, "contacts", id).await? else {
			return Ok(None);
		};

		parse_person_response(json).map(Some)
	}

	async fn fetch(&self, source: &str, kind: &str, id: &str) -> Result<Option<Value>> {
		let url = self.entry_url(source, kind, id)?;
		let res = self.client.get(url).send().await?;

		if res.status() == StatusCode::NOT_FOUND {
			return Ok(None);
		}

		let json: Value = res.error_for_status()?.json().await?;

		Ok(Some(json))
	}

	fn entry_url(&self, source: &str, kind: &str, id: &str) -> Result<Url> {
		let mut url = self.api_base.clone();

		url.path_segments_mut()
			.map_err(|_| eyre::eyre!("Directory api_base must be a base URL."))?
			.pop_if_empty()
			.extend(["v1", "sources", source, kind, id]);

		Ok(url)
	}
}

fn parse_group_response(json: Value) -> Result<GroupEntry> {
	let name = json
		.get("name")
		.and_then(|v| v.as_str())
		.ok_or_else(|| eyre::eyre!("Group response is missing name."))?
		.to_string();
	let member_count = json
		.get("member_count")
		.and_then(|v| v.as_u64())
		.ok_or_else(|| eyre::eyre!("Group response is missing member_count."))?;

	Ok(GroupEntry { name, member_count })
}

fn parse_person_response(json: Value) -> Result<PersonEntry> {
	let name = json.get("name").and_then(|v| v.as_str()).unwrap_or_default().to_string();
	let display_name = json
		.get("display_name")
		.and_then(|v| v.as_str())
		.filter(|v| !v.is_empty())
		.map(str::to_string);
	let emails = json
		.get("emails")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Contact response is missing emails array."))?
		.iter()
		.filter_map(|v| v.as_str())
		.map(str::to_string)
		.collect();

	Ok(PersonEntry { name, display_name, emails })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_group() {
		let json = serde_json::json!({ "name": "Team", "member_count": 4 });
		let group = parse_group_response(json).expect("parse failed");

		assert_eq!(group, GroupEntry { name: "Team".to_string(), member_count: 4 });
	}

	#[test]
	fn group_requires_member_count() {
		let json = serde_json::json!({ "name": "Team" });

		assert!(parse_group_response(json).is_err());
	}

	#[test]
	fn parses_person_and_skips_non_string_emails() {
		let json = serde_json::json!({
			"name": "Jo Doe",
			"display_name": "",
			"emails": ["a@x.com", null, "", "b@x.com"]
		});
		let person = parse_person_response(json).expect("parse failed");

		assert_eq!(person.name, "Jo Doe");
		assert_eq!(person.display_name, None);
		assert_eq!(person.emails, vec!["a@x.com", "", "b@x.com"]);
		assert_eq!(person.emails().collect::<Vec<_>>(), vec!["a@x.com", "b@x.com"]);
	}

	#[test]
	fn entry_urls_escape_segments() {
		let cfg = sac_config::DirectoryProviderConfig {
			api_base: "http://127.0.0.1:9000/directory".to_string(),
			api_key: None,
			timeout_ms: 1_000,
			default_headers: serde_json::Map::new(),
		};
		let client = DirectoryClient::new(&cfg).expect("client");
		let url = client.entry_url("sql", "contacts", "4 2").expect("url");

		assert_eq!(url.as_str(), "http://127.0.0.1:9000/directory/v1/sources/sql/contacts/4%202");
	}
}
