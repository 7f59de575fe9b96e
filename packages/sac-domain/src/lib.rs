pub mod acceptance;
pub mod contact;
pub mod directory;
pub mod email;
pub mod identity;
pub mod recipient;

pub use contact::{Contact, ContactType};
pub use directory::{GroupEntry, PersonEntry};
pub use identity::{ContactIdentity, IdentityMap, identity_of};
