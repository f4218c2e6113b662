use serde::{Deserialize, Serialize};

use crate::acl::{AclEntry, AclEntryDto, AclEntryError, ChannelAcl};

/// Coarse sharing level of a pre-migration channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyAccess {
    Public,
    Org,
    Private,
}

/// The legacy sharing fields of a channel that has not been migrated to ACLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacySharing {
    pub access: LegacyAccess,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub orgs: Vec<String>,
    #[serde(default)]
    pub allow_anonymous: bool,
}

/// Which permission generation governs a channel. Selected once when the
/// channel record is converted, never re-checked inside the predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum PermissionModel {
    Acl(ChannelAcl),
    Legacy(LegacySharing),
}

/// Kinds of reaction a post can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    ThumbsUp,
    ThumbsDown,
    Heart,
    OneHundred,
    Sad,
    Laugh,
    Surprised,
    Eyes,
}

/// Moderation state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Pending,
    Approved,
    Rejected,
    Hidden,
    Deleted,
    Blocked,
}

/// A discussion post, as the predicates need to see it. `parent_id` present
/// means the post is a reply; `creator` is `None` for posts whose author
/// record was purged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub status: PostStatus,
}

impl Post {
    #[must_use]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// A discussion channel with its toggles and its permission model.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub org_id: String,
    pub name: String,
    pub block_words: Vec<String>,
    pub allow_post: bool,
    pub allow_reply: bool,
    pub allow_reaction: bool,
    pub allow_as_anonymous: bool,
    /// `None` means every reaction kind is allowed.
    pub allowed_reactions: Option<Vec<Reaction>>,
    pub permissions: PermissionModel,
}

impl Channel {
    /// The channel's ACL, for call paths that only make sense on migrated
    /// channels. Reaching this on a legacy channel is a programming error —
    /// the caller chose the ACL path without ACL data — surfaced loudly so
    /// migration bugs show up in testing instead of as silent denials.
    ///
    /// # Errors
    /// Returns [`PermissionError::MissingAcl`] when the channel still uses
    /// the legacy sharing model.
    pub fn acl(&self) -> Result<&ChannelAcl, PermissionError> {
        match &self.permissions {
            PermissionModel::Acl(acl) => Ok(acl),
            PermissionModel::Legacy(_) => Err(PermissionError::MissingAcl),
        }
    }

    #[must_use]
    pub fn allows_reaction_kind(&self, kind: Reaction) -> bool {
        self.allowed_reactions
            .as_ref()
            .is_none_or(|allowed| allowed.contains(&kind))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    #[error("channel has no acl; caller took the acl path on a legacy channel")]
    MissingAcl,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChannelRecordError {
    #[error("channel record declares neither an acl nor legacy sharing fields")]
    MissingPermissionModel,
    #[error("channel acl entry is invalid: {0}")]
    Entry(#[from] AclEntryError),
}

/// Wire shape of a channel record. Carries both generations of permission
/// fields; conversion picks exactly one.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelRecordDto {
    pub org_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub block_words: Vec<String>,
    #[serde(default = "default_toggle")]
    pub allow_post: bool,
    #[serde(default = "default_toggle")]
    pub allow_reply: bool,
    #[serde(default = "default_toggle")]
    pub allow_reaction: bool,
    #[serde(default)]
    pub allow_as_anonymous: bool,
    #[serde(default)]
    pub allowed_reactions: Option<Vec<Reaction>>,
    #[serde(default)]
    pub channel_acl: Option<Vec<AclEntryDto>>,
    #[serde(default)]
    pub legacy: Option<LegacySharing>,
}

const fn default_toggle() -> bool {
    true
}

impl TryFrom<ChannelRecordDto> for Channel {
    type Error = ChannelRecordError;

    fn try_from(value: ChannelRecordDto) -> Result<Self, Self::Error> {
        // The presence of `channel_acl` selects the model; a record carrying
        // both is mid-migration and the ACL generation wins.
        let permissions = match (value.channel_acl, value.legacy) {
            (Some(entries), _) => {
                let entries = entries
                    .into_iter()
                    .map(AclEntry::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                PermissionModel::Acl(ChannelAcl::new(entries))
            }
            (None, Some(sharing)) => PermissionModel::Legacy(sharing),
            (None, None) => return Err(ChannelRecordError::MissingPermissionModel),
        };

        Ok(Self {
            org_id: value.org_id,
            name: value.name,
            block_words: value.block_words,
            allow_post: value.allow_post,
            allow_reply: value.allow_reply,
            allow_reaction: value.allow_reaction,
            allow_as_anonymous: value.allow_as_anonymous,
            allowed_reactions: value.allowed_reactions,
            permissions,
        })
    }
}
