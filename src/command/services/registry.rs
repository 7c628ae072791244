//! Per-client command registry.
//!
//! Lifecycle: each client's list is created empty on first access, extended
//! by bulk registration while the bot boots, and only read afterwards.
//! Entries are never removed. Every list is an immutable snapshot; a
//! registration swaps in a new snapshot, so lookups clone an `Arc` and match
//! without holding any lock.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use crate::command::domain::{ClientId, CommandDefinition};

/// Immutable view of one client's registered commands.
pub type CommandSnapshot = Arc<[Arc<CommandDefinition>]>;

/// Multi-tenant table of registered commands keyed by bot client.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    clients: DashMap<ClientId, CommandSnapshot>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the commands registered for `client`, creating an empty list
    /// on first access.
    #[must_use]
    pub fn commands(&self, client: &ClientId) -> CommandSnapshot {
        Arc::clone(
            self.clients
                .entry(client.clone())
                .or_insert_with(|| Arc::from(Vec::new()))
                .value(),
        )
    }

    /// Appends `commands` to the list of `client`.
    ///
    /// Duplicate names are not rejected; the first registered match wins at
    /// lookup time.
    pub fn register_all(
        &self,
        client: &ClientId,
        commands: impl IntoIterator<Item = CommandDefinition>,
    ) {
        // Built before the entry is locked: the iterator may read the registry.
        let added: Vec<Arc<CommandDefinition>> = commands.into_iter().map(Arc::new).collect();
        let mut entry = self
            .clients
            .entry(client.clone())
            .or_insert_with(|| Arc::from(Vec::new()));
        let mut updated: Vec<Arc<CommandDefinition>> = entry.iter().cloned().collect();
        let count = added.len();
        updated.extend(added);
        debug!(
            client = %client,
            added = count,
            total = updated.len(),
            "Registered commands"
        );
        *entry = Arc::from(updated);
    }

    /// Finds the command a user token selects for `client`.
    ///
    /// The token is lower-cased and compared with each command's name and
    /// aliases as stored.
    #[must_use]
    pub fn find(&self, client: &ClientId, token: &str) -> Option<Arc<CommandDefinition>> {
        let snapshot = self
            .clients
            .get(client)
            .map(|entry| Arc::clone(entry.value()))?;
        let lowered = token.to_lowercase();
        snapshot
            .iter()
            .find(|command| command.matches(&lowered))
            .cloned()
    }
}
