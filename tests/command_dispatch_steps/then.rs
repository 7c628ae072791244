//! Then steps for command dispatch BDD scenarios.

use herald::command::services::{DispatchOutcome, IgnoreReason};
use rstest_bdd_macros::then;

use super::world::DispatchWorld;

fn expect_outcome(world: &DispatchWorld, expected: DispatchOutcome) -> Result<(), eyre::Report> {
    match world.outcome {
        Some(outcome) if outcome == expected => Ok(()),
        other => Err(eyre::eyre!("expected {expected:?}, got {other:?}")),
    }
}

#[then("the dispatch is ignored")]
fn dispatch_ignored(world: &DispatchWorld) -> Result<(), eyre::Report> {
    expect_outcome(world, DispatchOutcome::Ignored(IgnoreReason::NoPrefixMatch))
}

#[then("the command executes")]
fn command_executes(world: &DispatchWorld) -> Result<(), eyre::Report> {
    expect_outcome(world, DispatchOutcome::Executed { succeeded: true })
}

#[then("the author is denied")]
fn author_denied(world: &DispatchWorld) -> Result<(), eyre::Report> {
    expect_outcome(world, DispatchOutcome::AuthorDenied)
}

#[then("the dispatch reports a usage error")]
fn usage_error(world: &DispatchWorld) -> Result<(), eyre::Report> {
    expect_outcome(world, DispatchOutcome::UsageError)
}

#[then("no message is sent")]
fn no_message_sent(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let sent = world.messenger.sent();
    if sent.is_empty() {
        Ok(())
    } else {
        Err(eyre::eyre!("expected no outbound messages, got {sent:?}"))
    }
}

#[then(r#"the channel receives "{text}""#)]
fn channel_receives(world: &DispatchWorld, text: String) -> Result<(), eyre::Report> {
    let replies = world.channel_replies();
    if replies.as_slice() == std::slice::from_ref(&text) {
        Ok(())
    } else {
        Err(eyre::eyre!("expected channel reply '{text}', got {replies:?}"))
    }
}

#[then(r#"the author privately receives help for "{name}""#)]
fn private_help(world: &DispatchWorld, name: String) -> Result<(), eyre::Report> {
    let help = world.private_replies().concat();
    let header = format!("Help for **{name}**");
    if help.contains(&header) {
        Ok(())
    } else {
        Err(eyre::eyre!("expected private help for '{name}', got {help:?}"))
    }
}

#[then(r#"the author privately receives "{text}""#)]
fn private_reply(world: &DispatchWorld, text: String) -> Result<(), eyre::Report> {
    let replies = world.private_replies();
    if replies.as_slice() == std::slice::from_ref(&text) {
        Ok(())
    } else {
        Err(eyre::eyre!("expected private reply '{text}', got {replies:?}"))
    }
}
