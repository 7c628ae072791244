//! Channel capability query port.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::{Capability, ChannelRef, ChatUser, ClientId};

/// Resolves the effective capabilities of a user in a channel.
#[async_trait]
pub trait ChannelCapabilities: Send + Sync {
    /// Returns the capabilities `user` holds in `channel`, as seen by
    /// `client`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityLookupError`] when the gateway cannot resolve
    /// them.
    async fn capabilities_of(
        &self,
        client: &ClientId,
        channel: &ChannelRef,
        user: &ChatUser,
    ) -> Result<BTreeSet<Capability>, CapabilityLookupError>;
}

/// Errors returned by capability lookups.
#[derive(Debug, Clone, Error)]
#[error("capability lookup failed: {0}")]
pub struct CapabilityLookupError(Arc<dyn std::error::Error + Send + Sync>);

impl CapabilityLookupError {
    /// Wraps a gateway failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
