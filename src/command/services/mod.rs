//! Application services: the command registry, the dispatch pipeline, help
//! rendering and the dispatcher configuration.

mod config;
mod dispatcher;
mod help;
mod help_command;
mod registry;

pub use config::{ConfigError, DispatcherConfig, HelpDelivery, MIN_MESSAGE_LENGTH};
pub use dispatcher::{CommandDispatcher, DispatchOutcome, DispatchPorts, IgnoreReason};
pub use help::{HelpReplier, command_help, format_options, split_message};
pub use help_command::{HELP_COMMAND_NAME, help_command};
pub use registry::{CommandRegistry, CommandSnapshot};
