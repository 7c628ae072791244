//! Herald: prefix-triggered command dispatch for chat bots.
//!
//! Herald takes messages received by one or more bot clients, recognizes
//! the ones addressed to a registered command through a per-guild prefix,
//! checks the author's access, parses the arguments and runs the command's
//! callbacks. Every message is dispatched independently on the Tokio
//! runtime.
//!
//! # Modules
//!
//! - [`command`]: command definitions, the dispatch pipeline and its ports

pub mod command;
