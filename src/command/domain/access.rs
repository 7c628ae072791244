//! Permission decisions and the command access policy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{Capability, CommandDefinition};

/// Operation checked against the permission store before running a command.
pub const EXECUTE_OPERATION: &str = "execute";

/// Resource identifier matching every command.
pub const WILDCARD_RESOURCE: &str = "*";

/// Outcome contributed by one matching permission entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// An entry explicitly grants the operation.
    Allow,
    /// An entry explicitly forbids the operation.
    Deny,
}

impl Decision {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the resource chain checked for a command: the wildcard, the
/// command name, then the category when it is not blank.
#[must_use]
pub fn resource_chain(command: &CommandDefinition) -> Vec<String> {
    let mut chain = vec![WILDCARD_RESOURCE.to_owned(), command.name().to_owned()];
    if !command.category().trim().is_empty() {
        chain.push(command.category().to_owned());
    }
    chain
}

/// Result of evaluating the access policy for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessVerdict {
    /// Whether the permission decisions permit execution.
    pub permitted: bool,
    /// Whether the author holds every required capability.
    pub capable: bool,
}

impl AccessVerdict {
    /// Returns whether the command may run.
    #[must_use]
    pub const fn can_execute(self) -> bool {
        self.permitted && self.capable
    }
}

/// Evaluates whether an author may execute a command.
///
/// A secured command needs an explicit [`Decision::Allow`]; any command is
/// refused when a [`Decision::Deny`] is present. The author must also hold
/// every capability the command requires.
#[must_use]
pub fn evaluate_access(
    command: &CommandDefinition,
    decisions: &BTreeSet<Decision>,
    capabilities: &BTreeSet<Capability>,
) -> AccessVerdict {
    let is_allowed = decisions.contains(&Decision::Allow);
    let is_denied = decisions.contains(&Decision::Deny);
    let permitted = if command.is_secured() {
        is_allowed && !is_denied
    } else {
        !is_denied
    };
    AccessVerdict {
        permitted,
        capable: command.required_capabilities().is_subset(capabilities),
    }
}
