//! Email address checks applied to untrusted acceptance input.

use regex::Regex;
use url::Host;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;
const LOCAL_ATOM_PATTERN: &str = r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$";
const LOCAL_QUOTED_PATTERN: &str = r#"^"([^"\\\r\n]|\\.)*"$"#;
const DOMAIN_LABEL_PATTERN: &str = r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$";
const ADDRESS_LITERAL_PATTERN: &str = r"^\[((IPv6:[0-9A-Fa-f:.]+)|([0-9.]+))\]$";

/// Converts an internationalized domain part to its ASCII (punycode) form.
///
/// The local part is left untouched. Returns `None` when the domain cannot be converted.
pub fn idn_to_ascii(email: &str) -> Option<String> {
	let Some((local, domain)) = email.rsplit_once('@') else {
		return Some(email.to_string());
	};

	if domain.starts_with('[') || domain.is_ascii() {
		return Some(email.to_string());
	}

	match Host::parse(domain) {
		Ok(Host::Domain(ascii)) => Some(format!("{local}@{ascii}")),
		_ => None,
	}
}

/// Syntactic validation of an ASCII email address.
pub fn is_valid_email(email: &str) -> bool {
	if email.is_empty() || email.len() > MAX_EMAIL_LEN || !email.is_ascii() {
		return false;
	}

	let Some((local, domain)) = email.rsplit_once('@') else {
		return false;
	};

	is_valid_local_part(local) && is_valid_domain(domain)
}

/// IDN normalization followed by [`is_valid_email`].
pub fn check_email(email: &str) -> bool {
	idn_to_ascii(email).map(|ascii| is_valid_email(&ascii)).unwrap_or(false)
}

fn is_valid_local_part(local: &str) -> bool {
	if local.is_empty() || local.len() > MAX_LOCAL_PART_LEN {
		return false;
	}

	matches_pattern(LOCAL_ATOM_PATTERN, local) || matches_pattern(LOCAL_QUOTED_PATTERN, local)
}

fn is_valid_domain(domain: &str) -> bool {
	if domain.starts_with('[') {
		return matches_pattern(ADDRESS_LITERAL_PATTERN, domain);
	}

	let labels = domain.split('.').collect::<Vec<_>>();

	if labels.len() < 2 {
		return false;
	}

	labels.iter().all(|label| matches_pattern(DOMAIN_LABEL_PATTERN, label))
}

fn matches_pattern(pattern: &str, text: &str) -> bool {
	Regex::new(pattern).map(|re| re.is_match(text)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn converts_unicode_domains() {
		assert_eq!(idn_to_ascii("jo@bücher.de").as_deref(), Some("jo@xn--bcher-kva.de"));
		assert_eq!(idn_to_ascii("jo@example.com").as_deref(), Some("jo@example.com"));
	}

	#[test]
	fn accepts_common_addresses() {
		for email in [
			"a@x.com",
			"first.last+tag@mail.example.org",
			"\"quoted name\"@example.com",
			"ops@[192.168.0.1]",
		] {
			assert!(is_valid_email(email), "{email} should be valid");
		}
	}

	#[test]
	fn rejects_malformed_addresses() {
		for email in [
			"",
			"plain",
			"@x.com",
			"a@",
			"a@localhost",
			"a..b@x.com",
			"a@-x.com",
			"a@x..com",
			"a b@x.com",
		] {
			assert!(!is_valid_email(email), "{email} should be invalid");
		}
	}

	#[test]
	fn internationalized_domains_pass_after_normalization() {
		assert!(!is_valid_email("jo@bücher.de"));
		assert!(check_email("jo@bücher.de"));
	}
}
