/// A group as currently known to its address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
	pub name: String,
	pub member_count: u64,
}

/// A person as currently known to its address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonEntry {
	pub name: String,
	/// The host's composed search/display name, when it has one.
	pub display_name: Option<String>,
	pub emails: Vec<String>,
}
impl PersonEntry {
	/// Current addresses, skipping blanks.
	pub fn emails(&self) -> impl Iterator<Item = &str> {
		self.emails.iter().map(String::as_str).filter(|email| !email.is_empty())
	}
}
