//! Port contracts for the collaborators the dispatcher consumes.
//!
//! Ports define infrastructure-agnostic interfaces; the chat gateway,
//! settings store and permission store live outside this crate.

pub mod capability;
pub mod messaging;
pub mod permission;
pub mod prefix;

pub use capability::{CapabilityLookupError, ChannelCapabilities};
pub use messaging::{Messenger, MessagingError, MessagingResult};
pub use permission::{PermissionError, PermissionResolver};
pub use prefix::{PrefixStore, PrefixStoreError};
