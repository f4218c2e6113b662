#![forbid(unsafe_code)]

//! The seam between the channel ACL model and the generic entity-permission
//! representation the wider platform uses. Both mappings are exhaustive
//! matches over closed enums, so an unmapped combination is a compile error,
//! never a runtime "unknown".

use agora_core::{AclEntry, AclPrincipal, AclSubCategory, ChannelAcl, Role};
use serde::{Deserialize, Serialize};

/// Permission label of the entity-permission service. Wire names are the
/// service's camelCase labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PolicyPermission {
    /// Explicit no-grant label; keeps the role mapping total instead of
    /// rejecting `Role::None` entries at transform time.
    ChannelNone,
    ChannelRead,
    ChannelWrite,
    ChannelReadWrite,
    ChannelModerate,
    ChannelManage,
    ChannelOwner,
}

/// Who an entity permission collaborates with, in the service's kebab-case
/// vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollaborationType {
    Group,
    GroupAdmin,
    Org,
    OrgAdmin,
    User,
    Anonymous,
    Authenticated,
}

/// One storage-ready entity-permission record. Field names follow the
/// entity-permission service, not this workspace's snake_case convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PermissionPolicy {
    pub permission: PolicyPermission,
    pub collaboration_id: Option<String>,
    pub collaboration_type: CollaborationType,
    pub id: Option<String>,
}

/// Transforms one ACL entry into the entity-permission record that persists
/// it. Total over every principal/role combination.
#[must_use]
pub fn entity_policy(entry: &AclEntry) -> PermissionPolicy {
    PermissionPolicy {
        permission: permission_label(entry.role),
        collaboration_id: entry.principal.key().map(String::from),
        collaboration_type: collaboration_type(&entry.principal),
        id: entry.id.clone(),
    }
}

fn permission_label(role: Role) -> PolicyPermission {
    match role {
        Role::None => PolicyPermission::ChannelNone,
        Role::Read => PolicyPermission::ChannelRead,
        Role::Write => PolicyPermission::ChannelWrite,
        Role::ReadWrite => PolicyPermission::ChannelReadWrite,
        Role::Moderate => PolicyPermission::ChannelModerate,
        Role::Manage => PolicyPermission::ChannelManage,
        Role::Owner => PolicyPermission::ChannelOwner,
    }
}

fn collaboration_type(principal: &AclPrincipal) -> CollaborationType {
    match principal {
        AclPrincipal::AnonymousUsers => CollaborationType::Anonymous,
        AclPrincipal::AuthenticatedUsers => CollaborationType::Authenticated,
        AclPrincipal::Group {
            sub: AclSubCategory::Member,
            ..
        } => CollaborationType::Group,
        AclPrincipal::Group {
            sub: AclSubCategory::Admin,
            ..
        } => CollaborationType::GroupAdmin,
        AclPrincipal::Org {
            sub: AclSubCategory::Member,
            ..
        } => CollaborationType::Org,
        AclPrincipal::Org {
            sub: AclSubCategory::Admin,
            ..
        } => CollaborationType::OrgAdmin,
        AclPrincipal::User { .. } => CollaborationType::User,
    }
}

/// Seed state of a not-yet-created channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChannelSeed {
    pub name: String,
    pub block_words: Vec<String>,
    pub allow_as_anonymous: bool,
    pub policies: Vec<PermissionPolicy>,
}

/// Seed for a new channel in the given org: empty name, no block words,
/// anonymous posting off, and exactly one policy handing ownership to the
/// creating org's admins.
#[must_use]
pub fn default_channel(org_id: &str) -> ChannelSeed {
    let acl = ChannelAcl::default_for_org(org_id);
    ChannelSeed {
        name: String::new(),
        block_words: Vec::new(),
        allow_as_anonymous: false,
        policies: acl.entries().iter().map(entity_policy).collect(),
    }
}
