//! Help rendering and delivery.
//!
//! Help text is plain chat markdown: bold option names, a `\*` marker on
//! required options and one row per option. Long replies are split into
//! chunks that respect the chat's message limit without breaking code
//! blocks.

use std::fmt;
use std::sync::Arc;

use super::{DispatcherConfig, HelpDelivery, MIN_MESSAGE_LENGTH};
use crate::command::{
    domain::{ChannelId, CommandContext, CommandDefinition, OptionDescriptor, OptionSpec},
    ports::{Messenger, MessagingResult},
};

const CODE_FENCE: &str = "```";
const COLUMN_GAP: &str = "     ";
/// Room kept free in each chunk for reopening and closing a code block.
const FENCE_RESERVE: usize = 8;

/// Renders the option table of `spec`.
///
/// Positional parameters come first, then the options sorted by their
/// shortest name.
#[must_use]
pub fn format_options(spec: &OptionSpec) -> String {
    let mut lines = Vec::new();
    if let Some(positional) = spec.positional() {
        lines.push("*Parameters*".to_owned());
        lines.extend(positional.split('\n').map(str::to_owned));
    }

    if spec.options().is_empty() {
        lines.push("No options specified".to_owned());
        return lines.join("\n");
    }

    let mut options: Vec<&OptionDescriptor> = spec.options().iter().collect();
    options.sort_by(|left, right| left.names().first().cmp(&right.names().first()));

    let header = if options.iter().any(|option| option.is_required()) {
        "*Parameters with options* (\\* = required)"
    } else {
        "*Parameters with options*"
    };
    lines.push(header.to_owned());

    let rows: Vec<(String, &str)> = options
        .iter()
        .map(|option| (option_display(option), option.description()))
        .collect();
    let width = rows
        .iter()
        .map(|(display, _)| display.chars().count())
        .max()
        .unwrap_or_default();
    lines.extend(rows.iter().map(|(display, description)| {
        if description.is_empty() {
            display.clone()
        } else {
            format!("{display:<width$}{COLUMN_GAP}{description}")
        }
    }));
    lines.join("\n")
}

fn option_display(option: &OptionDescriptor) -> String {
    let mut display = String::from("**");
    if option.is_required() {
        display.push_str("\\* ");
    }
    let names: Vec<String> = option
        .names()
        .iter()
        .map(|name| {
            if name.chars().count() == 1 {
                format!("-{name}")
            } else {
                name.clone()
            }
        })
        .collect();
    display.push_str(&names.join(", "));
    if let Some(argument) = option.argument() {
        let label = if argument.description().is_empty() {
            argument.value_type().indicator()
        } else {
            argument.description().to_owned()
        };
        if argument.is_required() {
            display.push_str(&format!(" <{label}>"));
        } else {
            display.push_str(&format!(" [{label}]"));
        }
    }
    display.push_str("**");
    display
}

/// Renders the help reply for `command`, optionally preceded by `comment`
/// (typically the usage error that triggered it).
#[must_use]
pub fn command_help(command: &CommandDefinition, comment: Option<&str>) -> String {
    let mut text = String::new();
    if let Some(note) = comment.filter(|note| !note.is_empty()) {
        text.push_str(note);
        text.push('\n');
    }
    text.push_str(&format!(
        "\u{2022} Help for **{}**: {}\n",
        command.name(),
        command.description()
    ));
    if let Some(spec) = command.option_spec() {
        text.push_str(&format_options(spec));
        text.push('\n');
    }
    text
}

/// Splits `text` into chunks of at most `max_len` characters.
///
/// Chunks break on line boundaries. A code block left open at a break is
/// closed at the end of the chunk and reopened at the start of the next
/// one. Lines too long for one chunk are wrapped at whitespace, or cut
/// when they contain none.
///
/// ```
/// use herald::command::services::split_message;
///
/// let chunks = split_message("one\ntwo\nthree\n", 16);
/// assert_eq!(chunks, vec!["one\ntwo\nthree\n".to_owned()]);
/// ```
#[must_use]
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let line_width = max_len.saturating_sub(FENCE_RESERVE).max(1);
    let lines = text
        .split_inclusive('\n')
        .flat_map(|line| wrap_line(line, line_width));

    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut chunk_len = 0;
    let mut unmatched = false;
    for line in lines {
        let line_len = line.chars().count();
        let toggles = !line.matches(CODE_FENCE).count().is_multiple_of(2);
        let reserve = if unmatched || toggles {
            CODE_FENCE.len()
        } else {
            0
        };
        if chunk_len > 0 && chunk_len + line_len > max_len.saturating_sub(reserve) {
            if unmatched {
                chunk.push_str(CODE_FENCE);
            }
            chunks.push(std::mem::take(&mut chunk));
            chunk_len = 0;
            if unmatched {
                chunk.push_str(CODE_FENCE);
                chunk.push('\n');
                chunk_len = CODE_FENCE.len() + 1;
            }
        }
        if toggles {
            unmatched = !unmatched;
        }
        chunk.push_str(&line);
        chunk_len += line_len;
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}

/// Breaks a line longer than `width` characters into newline-terminated
/// pieces.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let (body, newline) = line
        .strip_suffix('\n')
        .map_or((line, ""), |body| (body, "\n"));
    let mut pieces = Vec::new();
    let mut rest = body;
    while let Some((cut, _)) = rest.char_indices().nth(width) {
        let (head, tail) = rest.split_at(cut);
        let break_at = head
            .char_indices()
            .rev()
            .find(|(index, ch)| *index > 0 && ch.is_whitespace())
            .map(|(index, ch)| (index, index + ch.len_utf8()));
        let (piece, next) = match break_at {
            Some((end, resume)) => (
                head.get(..end).unwrap_or(head),
                rest.get(resume..).unwrap_or_default(),
            ),
            None => (head, tail),
        };
        pieces.push(format!("{piece}\n"));
        rest = next;
    }
    pieces.push(format!("{rest}{newline}"));
    pieces
}

/// Delivers help text to the author or the invoking channel.
#[derive(Clone)]
pub struct HelpReplier {
    messenger: Arc<dyn Messenger>,
    delivery: HelpDelivery,
    max_message_length: usize,
}

impl HelpReplier {
    /// Creates a replier sending through `messenger` as `config` dictates.
    ///
    /// The chunk size is raised to [`MIN_MESSAGE_LENGTH`] when `config`
    /// asks for less.
    #[must_use]
    pub fn new(messenger: Arc<dyn Messenger>, config: &DispatcherConfig) -> Self {
        Self {
            messenger,
            delivery: config.help_delivery,
            max_message_length: config.max_message_length.max(MIN_MESSAGE_LENGTH),
        }
    }

    /// Sends `text` in chunks to the configured destination.
    ///
    /// # Errors
    ///
    /// Returns the first messaging failure; later chunks are not sent.
    pub async fn reply(&self, context: &CommandContext, text: &str) -> MessagingResult<()> {
        match self.delivery {
            HelpDelivery::Private => self.reply_privately(context, text).await,
            HelpDelivery::Channel => {
                self.send_chunks(context, &context.message().channel.id, text)
                    .await
            }
        }
    }

    /// Sends `text` in chunks to the author's private channel.
    ///
    /// # Errors
    ///
    /// Returns the messaging failure when the channel cannot be opened or a
    /// chunk cannot be sent.
    pub async fn reply_privately(&self, context: &CommandContext, text: &str) -> MessagingResult<()> {
        let channel = self
            .messenger
            .private_channel(&context.client().id, &context.message().author.id)
            .await?;
        self.send_chunks(context, &channel, text).await
    }

    async fn send_chunks(
        &self,
        context: &CommandContext,
        channel: &ChannelId,
        text: &str,
    ) -> MessagingResult<()> {
        for chunk in split_message(text, self.max_message_length) {
            self.messenger
                .send_reply(&context.client().id, channel, &chunk)
                .await?;
        }
        Ok(())
    }
}

impl fmt::Debug for HelpReplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpReplier")
            .field("delivery", &self.delivery)
            .field("max_message_length", &self.max_message_length)
            .finish_non_exhaustive()
    }
}
