//! In-memory prefix store.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::command::{
    domain::PrefixScope,
    ports::{PrefixStore, PrefixStoreError},
};

/// Thread-safe prefix settings keyed by scope.
///
/// Lookups fall back from the guild to the wildcard scope, then to the
/// defaults given at construction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPrefixStore {
    defaults: BTreeSet<String>,
    scopes: Arc<RwLock<HashMap<PrefixScope, BTreeSet<String>>>>,
}

impl InMemoryPrefixStore {
    /// Creates a store answering `defaults` when nothing is configured.
    #[must_use]
    pub fn new(defaults: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            defaults: defaults.into_iter().map(Into::into).collect(),
            scopes: Arc::default(),
        }
    }

    /// Replaces the prefixes configured for `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`PrefixStoreError`] when the store lock is poisoned.
    pub fn set_prefixes(
        &self,
        scope: PrefixScope,
        prefixes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<(), PrefixStoreError> {
        let mut scopes = self.scopes.write().map_err(|err| {
            PrefixStoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        scopes.insert(scope, prefixes.into_iter().map(Into::into).collect());
        Ok(())
    }
}

#[async_trait]
impl PrefixStore for InMemoryPrefixStore {
    async fn prefixes(&self, scope: &PrefixScope) -> Result<BTreeSet<String>, PrefixStoreError> {
        let scopes = self.scopes.read().map_err(|err| {
            PrefixStoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let configured = scopes
            .get(scope)
            .or_else(|| scopes.get(&PrefixScope::Any))
            .filter(|prefixes| !prefixes.is_empty());
        Ok(configured.unwrap_or(&self.defaults).clone())
    }
}
