#![forbid(unsafe_code)]

//! Permission derivation for discussion channels: the ACL evaluator, its
//! legacy-sharing counterpart, and the capability predicates built on them.
//! Everything here is a pure function over value data; transport, storage,
//! and the group directory live elsewhere.

pub mod acl;
pub mod channel;
pub mod directory;
pub mod identity;
pub mod legacy;
pub mod moderation;
pub mod predicates;
pub mod role;

pub use acl::{
    derive_role, AclEntry, AclEntryDto, AclEntryError, AclPrincipal, AclSubCategory, ChannelAcl,
};
pub use channel::{
    Channel, ChannelRecordDto, ChannelRecordError, LegacyAccess, LegacySharing, PermissionError,
    PermissionModel, Post, PostStatus, Reaction,
};
pub use directory::{
    resolve_affiliations, DirectoryError, GroupDirectory, GroupSummary, InMemoryDirectory,
    MembershipRecord,
};
pub use identity::{GroupAffiliation, GroupMembership, Identity, SiteRole};
pub use moderation::screen_post_body;
pub use predicates::{
    can_create_channel, can_create_channel_with, can_create_reaction, can_delete_channel,
    can_delete_post, can_edit_channel, can_edit_post, can_edit_post_status, can_moderate_channel,
    can_post_to_channel, can_read_channel, can_reply_to_channel,
    cannot_create_post_groups_blocked, channel_role, CreateChannelPolicy,
};
pub use role::{role_rank, Role};
