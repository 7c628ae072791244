//! In-memory permission resolver.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use crate::command::{
    domain::{ChatMessage, Decision, UserId},
    ports::{PermissionError, PermissionResolver},
};

/// Principal a permission entry applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Principal {
    Everyone,
    User(UserId),
}

#[derive(Debug, Clone)]
struct PermissionEntry {
    principal: Principal,
    operation: String,
    resource: String,
    decision: Decision,
}

/// Thread-safe permission table of per-user and everyone entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPermissionResolver {
    entries: Arc<RwLock<Vec<PermissionEntry>>>,
}

impl InMemoryPermissionResolver {
    /// Creates an empty resolver; every check answers an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `decision` for `user` performing `operation` on `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] when the table lock is poisoned.
    pub fn grant_user(
        &self,
        user: UserId,
        operation: &str,
        resource: &str,
        decision: Decision,
    ) -> Result<(), PermissionError> {
        self.push(PermissionEntry {
            principal: Principal::User(user),
            operation: operation.to_owned(),
            resource: resource.to_owned(),
            decision,
        })
    }

    /// Records `decision` for every user performing `operation` on
    /// `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] when the table lock is poisoned.
    pub fn grant_everyone(
        &self,
        operation: &str,
        resource: &str,
        decision: Decision,
    ) -> Result<(), PermissionError> {
        self.push(PermissionEntry {
            principal: Principal::Everyone,
            operation: operation.to_owned(),
            resource: resource.to_owned(),
            decision,
        })
    }

    fn push(&self, entry: PermissionEntry) -> Result<(), PermissionError> {
        let mut entries = self.entries.write().map_err(|err| {
            PermissionError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        entries.push(entry);
        Ok(())
    }
}

#[async_trait]
impl PermissionResolver for InMemoryPermissionResolver {
    async fn check(
        &self,
        invoker: &ChatMessage,
        operation: &str,
        resources: &[String],
    ) -> Result<BTreeSet<Decision>, PermissionError> {
        let entries = self.entries.read().map_err(|err| {
            PermissionError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let decisions = entries
            .iter()
            .filter(|entry| match &entry.principal {
                Principal::Everyone => true,
                Principal::User(user) => *user == invoker.author.id,
            })
            .filter(|entry| entry.operation == operation)
            .filter(|entry| resources.contains(&entry.resource))
            .map(|entry| entry.decision)
            .collect();
        Ok(decisions)
    }
}
