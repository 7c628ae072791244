//! Channel-scoped capability flags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A permission flag held by a user within a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create channel invites.
    CreateInvite,
    /// Kick members from the guild.
    KickMembers,
    /// Ban members from the guild.
    BanMembers,
    /// Full administrative access.
    Administrator,
    /// Create, edit and delete channels.
    ManageChannels,
    /// Edit guild settings.
    ManageGuild,
    /// Add reactions to messages.
    AddReactions,
    /// Read messages in the channel.
    ReadMessages,
    /// Send messages in the channel.
    SendMessages,
    /// Delete or pin messages of other users.
    ManageMessages,
    /// Embed links in messages.
    EmbedLinks,
    /// Attach files to messages.
    AttachFiles,
    /// Read the channel message history.
    ReadMessageHistory,
    /// Mention everyone in the channel.
    MentionEveryone,
    /// Change other members' nicknames.
    ManageNicknames,
    /// Create, edit and assign roles.
    ManageRoles,
    /// Manage channel webhooks.
    ManageWebhooks,
    /// Manage guild emojis.
    ManageEmojis,
}

impl Capability {
    /// Returns the canonical snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateInvite => "create_invite",
            Self::KickMembers => "kick_members",
            Self::BanMembers => "ban_members",
            Self::Administrator => "administrator",
            Self::ManageChannels => "manage_channels",
            Self::ManageGuild => "manage_guild",
            Self::AddReactions => "add_reactions",
            Self::ReadMessages => "read_messages",
            Self::SendMessages => "send_messages",
            Self::ManageMessages => "manage_messages",
            Self::EmbedLinks => "embed_links",
            Self::AttachFiles => "attach_files",
            Self::ReadMessageHistory => "read_message_history",
            Self::MentionEveryone => "mention_everyone",
            Self::ManageNicknames => "manage_nicknames",
            Self::ManageRoles => "manage_roles",
            Self::ManageWebhooks => "manage_webhooks",
            Self::ManageEmojis => "manage_emojis",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
