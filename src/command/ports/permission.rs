//! Permission store port.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::{ChatMessage, Decision};

/// Authorization decisions for a principal over a resource chain.
#[async_trait]
pub trait PermissionResolver: Send + Sync {
    /// Returns every decision recorded for the message author performing
    /// `operation` on any of `resources`.
    ///
    /// An empty set means no entry matched.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] when the permission store is unavailable.
    async fn check(
        &self,
        invoker: &ChatMessage,
        operation: &str,
        resources: &[String],
    ) -> Result<BTreeSet<Decision>, PermissionError>;
}

/// Errors returned by permission resolver adapters.
#[derive(Debug, Clone, Error)]
#[error("permission store unavailable: {0}")]
pub struct PermissionError(Arc<dyn std::error::Error + Send + Sync>);

impl PermissionError {
    /// Wraps a storage failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
