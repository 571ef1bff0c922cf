//! In-process data stores.
//!
//! Stand-ins for the site's database: users keyed by phone number and the
//! contact-form inbox. Everything is lost on restart.

pub mod messages;
pub mod users;

pub use messages::{ContactInbox, ContactMessage};
pub use users::{normalize_phone, User, UserDirectory};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} already exists")]
    Conflict(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
}
