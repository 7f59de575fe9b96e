//! Stable identity keys used to collapse the same person or group across result tiers.

use std::{collections::HashMap, fmt};

use crate::contact::{Contact, ContactType};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactIdentity(String);
impl ContactIdentity {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl fmt::Display for ContactIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Groups are keyed by source and id; persons additionally by the email in use, so two
/// addresses of one person are distinct suggestions.
pub fn identity_of(contact: &Contact) -> ContactIdentity {
	let key = match contact.contact_type {
		ContactType::Group => format!("{}-group-{}", contact.source, contact.id),
		ContactType::Person => format!(
			"{}-person-{}-{}",
			contact.source,
			contact.id,
			contact.email.as_deref().unwrap_or_default()
		),
	};

	ContactIdentity(key)
}

/// Insertion-ordered contacts with unique identities.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
	entries: Vec<(ContactIdentity, Contact)>,
	positions: HashMap<ContactIdentity, usize>,
}
impl IdentityMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn contains(&self, identity: &ContactIdentity) -> bool {
		self.positions.contains_key(identity)
	}

	pub fn get(&self, identity: &ContactIdentity) -> Option<&Contact> {
		self.positions.get(identity).map(|&position| &self.entries[position].1)
	}

	/// Inserts unless the identity is already present. Returns whether the contact was kept.
	pub fn insert_first_wins(&mut self, identity: ContactIdentity, contact: Contact) -> bool {
		if self.positions.contains_key(&identity) {
			return false;
		}

		self.positions.insert(identity.clone(), self.entries.len());
		self.entries.push((identity, contact));

		true
	}

	/// Inserts, replacing an existing value in place. The first position of an identity is kept.
	pub fn insert_or_replace(&mut self, identity: ContactIdentity, contact: Contact) {
		match self.positions.get(&identity) {
			Some(&position) => self.entries[position].1 = contact,
			None => {
				self.positions.insert(identity.clone(), self.entries.len());
				self.entries.push((identity, contact));
			},
		}
	}

	/// Folds `other` behind the current entries without overwriting any of them.
	pub fn extend_first_wins(&mut self, other: IdentityMap) {
		for (identity, contact) in other.entries {
			self.insert_first_wins(identity, contact);
		}
	}

	pub fn retain<F>(&mut self, mut keep: F)
	where
		F: FnMut(&Contact) -> bool,
	{
		self.entries.retain(|(_, contact)| keep(contact));
		self.reindex();
	}

	pub fn truncate(&mut self, len: usize) {
		if len >= self.entries.len() {
			return;
		}

		self.entries.truncate(len);
		self.reindex();
	}

	pub fn iter(&self) -> impl Iterator<Item = (&ContactIdentity, &Contact)> {
		self.entries.iter().map(|(identity, contact)| (identity, contact))
	}

	pub fn into_contacts(self) -> Vec<Contact> {
		self.entries.into_iter().map(|(_, contact)| contact).collect()
	}

	fn reindex(&mut self) {
		self.positions = self
			.entries
			.iter()
			.enumerate()
			.map(|(position, (identity, _))| (identity.clone(), position))
			.collect();
	}
}
impl FromIterator<Contact> for IdentityMap {
	/// Keys every contact with [`identity_of`]; the first occurrence of an identity wins.
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = Contact>,
	{
		let mut map = Self::new();

		for contact in iter {
			map.insert_first_wins(identity_of(&contact), contact);
		}

		map
	}
}
