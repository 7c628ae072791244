//! In-memory adapters for tests and embedded setups.

mod capability;
mod messaging;
mod permission;
mod prefix;

pub use capability::InMemoryChannelCapabilities;
pub use messaging::{InMemoryMessenger, SentMessage};
pub use permission::InMemoryPermissionResolver;
pub use prefix::InMemoryPrefixStore;
