//! Capability checks built on the two role evaluators.
//!
//! Every predicate is a pure function over channel/post/identity values. The
//! single model dispatch point is [`channel_role`]; no predicate inspects
//! which permission generation the channel uses beyond calling it.

use crate::acl::{self, AclPrincipal, ChannelAcl};
use crate::channel::{Channel, PermissionModel, Post, Reaction};
use crate::identity::Identity;
use crate::legacy;
use crate::role::Role;

/// Effective role of one caller on one channel, under whichever permission
/// generation the channel carries.
#[must_use]
pub fn channel_role(channel: &Channel, identity: &Identity) -> Role {
    match &channel.permissions {
        PermissionModel::Acl(channel_acl) => acl::derive_role(channel_acl, identity),
        PermissionModel::Legacy(sharing) => legacy::derive_role(sharing, identity),
    }
}

/// Minimum role a caller must hold under a proposed ACL to create the
/// channel it describes. The exact threshold is deployment policy; the
/// default requires the creator to be able to act on what they create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateChannelPolicy {
    pub minimum_role: Role,
}

impl Default for CreateChannelPolicy {
    fn default() -> Self {
        Self {
            minimum_role: Role::Write,
        }
    }
}

/// Whether the caller, under the proposed grants, may create the channel.
/// Uses the default creation policy.
#[must_use]
pub fn can_create_channel(proposed_acl: &ChannelAcl, identity: &Identity) -> bool {
    can_create_channel_with(proposed_acl, identity, CreateChannelPolicy::default())
}

/// [`can_create_channel`] under an explicit creation policy.
#[must_use]
pub fn can_create_channel_with(
    proposed_acl: &ChannelAcl,
    identity: &Identity,
    policy: CreateChannelPolicy,
) -> bool {
    let derived = acl::derive_role(proposed_acl, identity);
    derived != Role::None && derived.dominates(policy.minimum_role)
}

/// Whether the caller may see the channel at all.
#[must_use]
pub fn can_read_channel(channel: &Channel, identity: &Identity) -> bool {
    identity.is_org_admin_for(&channel.org_id) || channel_role(channel, identity).allows_read()
}

/// Whether the caller may create a top-level post. Admins of the channel's
/// org always may — an operational override so moderation and support are
/// never locked out — otherwise the channel toggle gates the derived role.
#[must_use]
pub fn can_post_to_channel(channel: &Channel, identity: &Identity) -> bool {
    if identity.is_org_admin_for(&channel.org_id) {
        return true;
    }
    channel.allow_post && channel_role(channel, identity).allows_write()
}

/// Whether the caller may reply to an existing post.
#[must_use]
pub fn can_reply_to_channel(channel: &Channel, identity: &Identity) -> bool {
    if identity.is_org_admin_for(&channel.org_id) {
        return true;
    }
    channel.allow_reply && channel_role(channel, identity).allows_write()
}

/// Whether the caller may moderate the channel.
#[must_use]
pub fn can_moderate_channel(channel: &Channel, identity: &Identity) -> bool {
    identity.is_org_admin_for(&channel.org_id)
        || channel_role(channel, identity).allows_moderation()
}

/// Whether the caller may change the channel's settings.
#[must_use]
pub fn can_edit_channel(channel: &Channel, identity: &Identity) -> bool {
    identity.is_org_admin_for(&channel.org_id)
        || channel_role(channel, identity).allows_management()
}

/// Whether the caller may delete the channel.
#[must_use]
pub fn can_delete_channel(channel: &Channel, identity: &Identity) -> bool {
    identity.is_org_admin_for(&channel.org_id) || channel_role(channel, identity).is_owner()
}

/// Whether the caller may edit a post's content. Only the author ever may;
/// moderators change status, never content. A post with no recorded creator
/// is editable by no one.
#[must_use]
pub fn can_edit_post(post: &Post, channel: &Channel, identity: &Identity) -> bool {
    let is_author = post
        .creator
        .as_deref()
        .is_some_and(|creator| identity.is_username(creator));
    if !is_author {
        return false;
    }
    if post.is_reply() {
        can_reply_to_channel(channel, identity)
    } else {
        can_post_to_channel(channel, identity)
    }
}

/// Whether the caller may change a post's moderation status
/// (approve/hide/reject). Distinct from [`can_edit_post`]: status changes
/// are a moderation action independent of authorship.
#[must_use]
pub fn can_edit_post_status(channel: &Channel, identity: &Identity) -> bool {
    can_moderate_channel(channel, identity)
}

/// Whether the caller may delete a post. Authors may delete their own; a
/// site-level org admin may delete any, without an ACL walk and without the
/// org-scoping the other bypasses carry; everyone else needs moderation
/// rights on the channel.
#[must_use]
pub fn can_delete_post(post: &Post, channel: &Channel, identity: &Identity) -> bool {
    if post
        .creator
        .as_deref()
        .is_some_and(|creator| identity.is_username(creator))
    {
        return true;
    }
    if identity.is_org_admin() {
        return true;
    }
    can_moderate_channel(channel, identity)
}

/// Whether the caller may attach a reaction of the given kind.
#[must_use]
pub fn can_create_reaction(channel: &Channel, kind: Reaction, identity: &Identity) -> bool {
    channel.allow_reaction
        && channel.allows_reaction_kind(kind)
        && can_read_channel(channel, identity)
}

/// Diagnostic for a denied post: is the denial explained by every
/// write-granting group the caller belongs to being blocked from
/// discussions? Never grants or denies anything itself — callers use it to
/// pick an accurate error message after [`can_post_to_channel`] has already
/// said no.
#[must_use]
pub fn cannot_create_post_groups_blocked(channel: &Channel, identity: &Identity) -> bool {
    if can_post_to_channel(channel, identity) {
        return false;
    }
    // Legacy channels have no ACL group entries; discussability is already
    // enforced inside the legacy evaluator.
    let PermissionModel::Acl(channel_acl) = &channel.permissions else {
        return false;
    };

    let mut matched_any = false;
    let mut all_blocked = true;
    for entry in channel_acl.entries() {
        let AclPrincipal::Group { key, .. } = &entry.principal else {
            continue;
        };
        if !entry.role.allows_write() || !entry.principal.matches(identity) {
            continue;
        }
        matched_any = true;
        if identity
            .affiliation(key)
            .is_some_and(|group| group.discussable)
        {
            all_blocked = false;
        }
    }
    matched_any && all_blocked
}
