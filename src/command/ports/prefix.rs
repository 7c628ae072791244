//! Prefix settings port.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::PrefixScope;

/// Source of the command prefixes configured per guild.
#[async_trait]
pub trait PrefixStore: Send + Sync {
    /// Returns the prefixes recognized in `scope`.
    ///
    /// Implementations fall back to the wildcard scope, then to built-in
    /// defaults, when nothing is configured for a guild.
    ///
    /// # Errors
    ///
    /// Returns [`PrefixStoreError`] when the settings store is unavailable.
    async fn prefixes(&self, scope: &PrefixScope) -> Result<BTreeSet<String>, PrefixStoreError>;
}

/// Errors returned by prefix store adapters.
#[derive(Debug, Clone, Error)]
#[error("prefix store unavailable: {0}")]
pub struct PrefixStoreError(Arc<dyn std::error::Error + Send + Sync>);

impl PrefixStoreError {
    /// Wraps a storage failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
