//! User records for Userdesk.
//!
//! SQLite-backed storage, an async client for use from request handlers,
//! and the duplicate-name aggregation.

pub mod client;
pub mod duplicates;
pub mod error;
pub mod store;
pub mod types;

pub use client::UserClient;
pub use duplicates::{find_duplicate_names, parse_min_count, DEFAULT_MIN_COUNT};
pub use error::{UserStoreError, UserStoreResult};
pub use store::SqliteUserStore;
pub use types::{DuplicateName, NewUser, User};
