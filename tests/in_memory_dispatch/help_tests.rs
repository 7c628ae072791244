//! Help replies routed through the messenger.

use std::io;

use crate::in_memory_dispatch::helpers::{
    Harness, client, echo_name, guild_message, harness, runtime,
};
use herald::command::{
    domain::{CommandBuilder, OptionArgument, OptionDescriptor, OptionSpec, ValueType},
    services::{DispatchOutcome, DispatcherConfig, HelpDelivery, help_command},
};
use rstest::rstest;
use tokio::runtime::Runtime;

fn kick() -> CommandBuilder {
    CommandBuilder::new("kick")
        .described_as("Kick a member from the guild")
        .parsed_by(
            OptionSpec::new()
                .with_option(
                    OptionDescriptor::new(["r", "reason"], "Reason recorded in the audit log")
                        .with_argument(OptionArgument::required(ValueType::String)),
                )
                .with_option(OptionDescriptor::new(["s", "silent"], "Do not announce the kick"))
                .with_positional("Member to kick")
                .accepting_help(),
        )
        .on_execute(echo_name)
}

#[rstest]
fn help_request_can_be_answered_in_the_channel(runtime: io::Result<Runtime>, harness: Harness) {
    let rt = runtime.expect("runtime");
    let bot = client("bot-1");
    harness
        .registry
        .register_all(&bot.id, [kick().build().expect("kick is a valid command")]);
    let config = DispatcherConfig {
        help_delivery: HelpDelivery::Channel,
        ..DispatcherConfig::default()
    };
    let dispatcher = harness.dispatcher(&config);

    let outcome = rt.block_on(dispatcher.dispatch(guild_message(&bot, "!kick --help")));

    assert_eq!(outcome, DispatchOutcome::HelpRequested);
    assert!(harness.private_replies().is_empty());
    let help = harness.channel_replies().concat();
    assert!(help.starts_with("\u{2022} Help for **kick**: Kick a member from the guild\n"));
    assert!(help.contains("Reason recorded in the audit log"));
}

#[rstest]
fn long_help_is_split_into_bounded_chunks(runtime: io::Result<Runtime>, harness: Harness) {
    let rt = runtime.expect("runtime");
    let bot = client("bot-1");
    harness
        .registry
        .register_all(&bot.id, [kick().build().expect("kick is a valid command")]);
    let config = DispatcherConfig {
        max_message_length: 48,
        ..DispatcherConfig::default()
    };
    config.validate().expect("valid configuration");
    let dispatcher = harness.dispatcher(&config);

    let outcome = rt.block_on(dispatcher.dispatch(guild_message(&bot, "!kick -h")));

    assert_eq!(outcome, DispatchOutcome::HelpRequested);
    let chunks = harness.private_replies();
    assert!(chunks.len() > 1, "expected several chunks, got {chunks:?}");
    assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 48));
    assert!(harness.channel_replies().is_empty());
}

#[rstest]
fn help_command_describes_a_named_command(runtime: io::Result<Runtime>, harness: Harness) {
    let rt = runtime.expect("runtime");
    let bot = client("bot-1");
    let config = DispatcherConfig::default();
    let help = help_command(&harness.registry, &harness.ports(), &config)
        .expect("help is a valid command");
    harness.registry.register_all(
        &bot.id,
        [kick().build().expect("kick is a valid command"), help],
    );
    let dispatcher = harness.dispatcher(&config);

    let outcome = rt.block_on(dispatcher.dispatch(guild_message(&bot, "!help KICK")));

    assert_eq!(outcome, DispatchOutcome::Executed { succeeded: true });
    let reply = harness.private_replies().concat();
    assert!(reply.starts_with("\u{2022} Help for **kick**"));
    assert!(reply.contains("*Parameters*"));
}
