//! In-memory channel capability table.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::command::{
    domain::{Capability, ChannelId, ChannelRef, ChatUser, ClientId, UserId},
    ports::{CapabilityLookupError, ChannelCapabilities},
};

/// Thread-safe capability assignments per channel and user.
///
/// Users without an explicit assignment hold the default capabilities.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChannelCapabilities {
    defaults: BTreeSet<Capability>,
    assigned: Arc<RwLock<HashMap<(ChannelId, UserId), BTreeSet<Capability>>>>,
}

impl InMemoryChannelCapabilities {
    /// Creates a table granting `defaults` to unassigned users.
    #[must_use]
    pub fn new(defaults: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            defaults: defaults.into_iter().collect(),
            assigned: Arc::default(),
        }
    }

    /// Assigns `capabilities` to `user` in `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityLookupError`] when the table lock is poisoned.
    pub fn assign(
        &self,
        channel: ChannelId,
        user: UserId,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Result<(), CapabilityLookupError> {
        let mut assigned = self.assigned.write().map_err(|err| {
            CapabilityLookupError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        assigned.insert((channel, user), capabilities.into_iter().collect());
        Ok(())
    }
}

#[async_trait]
impl ChannelCapabilities for InMemoryChannelCapabilities {
    async fn capabilities_of(
        &self,
        _client: &ClientId,
        channel: &ChannelRef,
        user: &ChatUser,
    ) -> Result<BTreeSet<Capability>, CapabilityLookupError> {
        let assigned = self.assigned.read().map_err(|err| {
            CapabilityLookupError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let key = (channel.id.clone(), user.id.clone());
        Ok(assigned.get(&key).unwrap_or(&self.defaults).clone())
    }
}
