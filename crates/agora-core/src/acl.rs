use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{GroupMembership, Identity};
use crate::role::Role;

/// Membership tier an ACL grant is scoped to, for categories that have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AclSubCategory {
    Member,
    Admin,
}

/// Who an ACL grant applies to.
///
/// Category, subcategory, and key collapse into one algebraic type so
/// structurally invalid combinations (a group grant with no key, a user
/// grant with a subcategory) are unrepresentable past the wire boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AclPrincipal {
    AnonymousUsers,
    AuthenticatedUsers,
    Group { key: String, sub: AclSubCategory },
    Org { key: String, sub: AclSubCategory },
    User { key: String },
}

impl AclPrincipal {
    /// Whether the grant applies to this caller at all, ignoring any
    /// time restriction on the entry.
    #[must_use]
    pub fn matches(&self, identity: &Identity) -> bool {
        match self {
            Self::AnonymousUsers => true,
            Self::AuthenticatedUsers => identity.is_authenticated(),
            Self::Group { key, sub } => match (identity.group_membership(key), sub) {
                (Some(_), AclSubCategory::Member) => true,
                (Some(membership), AclSubCategory::Admin) => membership == GroupMembership::Admin,
                (None, _) => false,
            },
            Self::Org { key, sub } => {
                identity.is_org_member(key)
                    && match sub {
                        AclSubCategory::Member => true,
                        AclSubCategory::Admin => identity.is_org_admin(),
                    }
            }
            Self::User { key } => identity.is_username(key),
        }
    }

    /// When the caller joined the group or org this grant references, if the
    /// directory reported one. Anonymous/authenticated/user grants carry no
    /// join concept.
    #[must_use]
    pub fn joined(&self, identity: &Identity) -> Option<DateTime<Utc>> {
        match self {
            Self::Group { key, .. } => identity.affiliation(key).and_then(|group| group.joined),
            Self::Org { key, .. } if identity.is_org_member(key) => identity.org_joined,
            Self::Org { .. } | Self::AnonymousUsers | Self::AuthenticatedUsers | Self::User { .. } => {
                None
            }
        }
    }

    /// The group or org id the grant references, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Group { key, .. } | Self::Org { key, .. } | Self::User { key } => Some(key),
            Self::AnonymousUsers | Self::AuthenticatedUsers => None,
        }
    }
}

/// One grant on a channel.
///
/// `restricted_before` is a grandfather clause: the grant is inactive for
/// callers known to have joined the referenced group or org at or after this
/// instant. `id` is `None` until the entry has been persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AclEntry {
    pub principal: AclPrincipal,
    pub role: Role,
    pub restricted_before: Option<DateTime<Utc>>,
    pub id: Option<String>,
}

impl AclEntry {
    #[must_use]
    pub fn new(principal: AclPrincipal, role: Role) -> Self {
        Self {
            principal,
            role,
            restricted_before: None,
            id: None,
        }
    }

    /// Whether this grant is active for the caller: the principal matches and
    /// the grandfather clause, if present, does not exclude them.
    ///
    /// An unknown join date never excludes — deny-by-default already happens
    /// at the "no matching entry" level, not here.
    #[must_use]
    pub fn applies_to(&self, identity: &Identity) -> bool {
        if !self.principal.matches(identity) {
            return false;
        }
        let Some(restricted_before) = self.restricted_before else {
            return true;
        };
        match self.principal.joined(identity) {
            Some(joined) => joined < restricted_before,
            None => true,
        }
    }
}

/// All grants on one channel. Entries are unordered additive grants; several
/// may match the same caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelAcl {
    entries: Vec<AclEntry>,
}

impl ChannelAcl {
    #[must_use]
    pub fn new(entries: Vec<AclEntry>) -> Self {
        Self { entries }
    }

    /// Seed ACL for a newly created channel: the creating org's admins own it.
    #[must_use]
    pub fn default_for_org(org_id: &str) -> Self {
        Self::new(vec![AclEntry::new(
            AclPrincipal::Org {
                key: String::from(org_id),
                sub: AclSubCategory::Admin,
            },
            Role::Owner,
        )])
    }

    #[must_use]
    pub fn entries(&self) -> &[AclEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<AclEntry>> for ChannelAcl {
    fn from(entries: Vec<AclEntry>) -> Self {
        Self::new(entries)
    }
}

/// Effective role of one caller under one ACL: the strongest role among all
/// active grants, `Role::None` when no grant applies.
///
/// Maximum, not first-match: the entries come from independent sources (a
/// caller can be an org member and a group admin at once), so the most
/// permissive applicable grant wins.
#[must_use]
pub fn derive_role(acl: &ChannelAcl, identity: &Identity) -> Role {
    let role = acl
        .entries()
        .iter()
        .filter(|entry| entry.applies_to(identity))
        .fold(Role::None, |strongest, entry| strongest.strongest(entry.role));
    tracing::debug!(
        event = "acl_role_derived",
        role = role.as_str(),
        entries = acl.entries().len(),
        authenticated = identity.is_authenticated(),
        "derived channel role from acl"
    );
    role
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AclEntryError {
    #[error("unknown acl category {0:?}")]
    UnknownCategory(String),
    #[error("unknown acl subcategory {0:?}")]
    UnknownSubCategory(String),
    #[error("{0} entries require a key")]
    MissingKey(&'static str),
    #[error("{0} entries require a subcategory")]
    MissingSubCategory(&'static str),
    #[error("{0} entries do not take a subcategory")]
    UnexpectedSubCategory(&'static str),
    #[error("{0} entries do not take a key")]
    UnexpectedKey(&'static str),
}

/// Flat wire shape of one ACL entry, as the discussion service stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AclEntryDto {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_before: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl TryFrom<AclEntryDto> for AclEntry {
    type Error = AclEntryError;

    fn try_from(value: AclEntryDto) -> Result<Self, Self::Error> {
        let principal = match value.category.as_str() {
            "anonymous_user" => {
                reject_scoping("anonymous_user", &value)?;
                AclPrincipal::AnonymousUsers
            }
            "authenticated_user" => {
                reject_scoping("authenticated_user", &value)?;
                AclPrincipal::AuthenticatedUsers
            }
            "group" => AclPrincipal::Group {
                key: require_key("group", value.key)?,
                sub: require_sub("group", value.sub_category)?,
            },
            "org" => AclPrincipal::Org {
                key: require_key("org", value.key)?,
                sub: require_sub("org", value.sub_category)?,
            },
            "user" => {
                if value.sub_category.is_some() {
                    return Err(AclEntryError::UnexpectedSubCategory("user"));
                }
                AclPrincipal::User {
                    key: require_key("user", value.key)?,
                }
            }
            other => return Err(AclEntryError::UnknownCategory(String::from(other))),
        };

        Ok(Self {
            principal,
            role: value.role,
            restricted_before: value.restricted_before,
            id: value.id,
        })
    }
}

impl From<&AclEntry> for AclEntryDto {
    fn from(entry: &AclEntry) -> Self {
        let (category, sub_category) = match &entry.principal {
            AclPrincipal::AnonymousUsers => ("anonymous_user", None),
            AclPrincipal::AuthenticatedUsers => ("authenticated_user", None),
            AclPrincipal::Group { sub, .. } => ("group", Some(*sub)),
            AclPrincipal::Org { sub, .. } => ("org", Some(*sub)),
            AclPrincipal::User { .. } => ("user", None),
        };
        Self {
            category: String::from(category),
            sub_category: sub_category.map(|sub| {
                String::from(match sub {
                    AclSubCategory::Member => "member",
                    AclSubCategory::Admin => "admin",
                })
            }),
            key: entry.principal.key().map(String::from),
            role: entry.role,
            restricted_before: entry.restricted_before,
            id: entry.id.clone(),
        }
    }
}

fn reject_scoping(category: &'static str, value: &AclEntryDto) -> Result<(), AclEntryError> {
    if value.sub_category.is_some() {
        return Err(AclEntryError::UnexpectedSubCategory(category));
    }
    if value.key.is_some() {
        return Err(AclEntryError::UnexpectedKey(category));
    }
    Ok(())
}

fn require_key(category: &'static str, key: Option<String>) -> Result<String, AclEntryError> {
    key.ok_or(AclEntryError::MissingKey(category))
}

fn require_sub(
    category: &'static str,
    sub: Option<String>,
) -> Result<AclSubCategory, AclEntryError> {
    match sub.as_deref() {
        Some("member") => Ok(AclSubCategory::Member),
        Some("admin") => Ok(AclSubCategory::Admin),
        Some(other) => Err(AclEntryError::UnknownSubCategory(String::from(other))),
        None => Err(AclEntryError::MissingSubCategory(category)),
    }
}
