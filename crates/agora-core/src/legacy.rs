//! Role derivation for channels still on the pre-ACL sharing model.
//!
//! The old model predates moderation tiers, so it grants at most
//! `ReadWrite`; moderation and management on legacy channels are reachable
//! only through the org-admin bypass in the predicate layer.

use crate::channel::{LegacyAccess, LegacySharing};
use crate::identity::Identity;
use crate::role::Role;

/// Effective role of one caller under the legacy sharing fields.
#[must_use]
pub fn derive_role(sharing: &LegacySharing, identity: &Identity) -> Role {
    let role = match sharing.access {
        LegacyAccess::Public => {
            if identity.is_authenticated() || sharing.allow_anonymous {
                Role::ReadWrite
            } else {
                Role::Read
            }
        }
        LegacyAccess::Org => {
            if in_shared_org(sharing, identity) || in_discussable_shared_group(sharing, identity) {
                Role::ReadWrite
            } else {
                Role::None
            }
        }
        LegacyAccess::Private => {
            if in_discussable_shared_group(sharing, identity) {
                Role::ReadWrite
            } else {
                Role::None
            }
        }
    };
    tracing::debug!(
        event = "legacy_role_derived",
        role = role.as_str(),
        authenticated = identity.is_authenticated(),
        "derived channel role from legacy sharing"
    );
    role
}

fn in_shared_org(sharing: &LegacySharing, identity: &Identity) -> bool {
    identity
        .org_id
        .as_ref()
        .is_some_and(|org_id| sharing.orgs.contains(org_id))
}

/// A shared group only grants when the caller belongs to it and the group is
/// discussable; an org can block a group from discussions without
/// unsharing it.
fn in_discussable_shared_group(sharing: &LegacySharing, identity: &Identity) -> bool {
    identity
        .groups
        .iter()
        .any(|group| group.discussable && sharing.groups.contains(&group.id))
}
