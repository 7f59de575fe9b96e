const SPECIALS: &[char] = &['(', ')', '<', '>', '[', ']', ':', ';', '@', '\\', ',', '.', '"'];

/// Formats a recipient the way mail composers expect it: `Name <email>`.
///
/// Falls back to the bare address when the name is empty or repeats the address. Names with
/// RFC 5322 specials are quoted.
pub fn format_recipient(email: &str, name: &str) -> String {
	let name = name.trim();

	if name.is_empty() || name == email {
		return email.to_string();
	}
	if name.contains(SPECIALS) {
		let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");

		return format!("\"{escaped}\" <{email}>");
	}

	format!("{name} <{email}>")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bare_email_without_name() {
		assert_eq!(format_recipient("a@x.com", ""), "a@x.com");
		assert_eq!(format_recipient("a@x.com", "a@x.com"), "a@x.com");
	}

	#[test]
	fn plain_name() {
		assert_eq!(format_recipient("a@x.com", "Jo Doe"), "Jo Doe <a@x.com>");
	}

	#[test]
	fn quotes_specials() {
		assert_eq!(format_recipient("a@x.com", "Doe, Jo"), "\"Doe, Jo\" <a@x.com>");
		assert_eq!(format_recipient("a@x.com", "Jo \"J\" Doe"), "\"Jo \\\"J\\\" Doe\" <a@x.com>");
	}
}
