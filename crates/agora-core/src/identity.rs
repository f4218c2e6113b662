use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Site-level role assigned by the identity provider, independent of any
/// channel grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteRole {
    OrgAdmin,
    OrgPublisher,
    OrgUser,
}

/// Membership tier inside one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMembership {
    Member,
    Admin,
}

/// One group the caller belongs to, as reported by the group directory.
///
/// `joined` feeds the grandfather clause on ACL entries; `None` means the
/// directory did not report a join date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupAffiliation {
    pub id: String,
    pub membership: GroupMembership,
    #[serde(default = "default_discussable")]
    pub discussable: bool,
    #[serde(default)]
    pub joined: Option<DateTime<Utc>>,
}

const fn default_discussable() -> bool {
    true
}

/// The caller, as seen by every evaluator and predicate.
///
/// Anonymous callers are a plain value with no username — never an `Option`
/// at the evaluation seam. An empty JSON object deserializes to
/// [`Identity::anonymous`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Identity {
    pub username: Option<String>,
    pub org_id: Option<String>,
    pub site_role: Option<SiteRole>,
    pub org_joined: Option<DateTime<Utc>>,
    pub groups: Vec<GroupAffiliation>,
}

impl Identity {
    /// The identity every unauthenticated caller evaluates as.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    #[must_use]
    pub fn is_username(&self, candidate: &str) -> bool {
        self.username.as_deref() == Some(candidate)
    }

    #[must_use]
    pub fn affiliation(&self, group_id: &str) -> Option<&GroupAffiliation> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    /// Membership tier for one group, or `None` when the caller is not a
    /// member.
    #[must_use]
    pub fn group_membership(&self, group_id: &str) -> Option<GroupMembership> {
        self.affiliation(group_id).map(|group| group.membership)
    }

    #[must_use]
    pub fn is_org_member(&self, org_id: &str) -> bool {
        self.org_id.as_deref() == Some(org_id)
    }

    /// Site-level administrator flag, not scoped to any org.
    #[must_use]
    pub fn is_org_admin(&self) -> bool {
        self.site_role == Some(SiteRole::OrgAdmin)
    }

    /// Administrator of the given org: site-level admin whose own org is
    /// `org_id`. This is the bypass used by the post/reply/moderate
    /// predicates.
    #[must_use]
    pub fn is_org_admin_for(&self, org_id: &str) -> bool {
        self.is_org_admin() && self.is_org_member(org_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{GroupAffiliation, GroupMembership, Identity, SiteRole};

    pub(crate) fn member_of(group_id: &str) -> GroupAffiliation {
        GroupAffiliation {
            id: String::from(group_id),
            membership: GroupMembership::Member,
            discussable: true,
            joined: None,
        }
    }

    #[test]
    fn anonymous_identity_has_no_username_and_no_grants() {
        let identity = Identity::anonymous();
        assert!(!identity.is_authenticated());
        assert!(identity.groups.is_empty());
        assert!(!identity.is_org_admin());
        assert!(!identity.is_org_admin_for("org1"));
    }

    #[test]
    fn empty_json_object_deserializes_to_anonymous() {
        let identity: Identity = serde_json::from_str("{}").expect("empty object parses");
        assert_eq!(identity, Identity::anonymous());
    }

    #[test]
    fn unknown_identity_fields_are_rejected() {
        let result = serde_json::from_str::<Identity>(r#"{"user_name":"carol"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn affiliation_lookup_matches_by_group_id() {
        let identity = Identity {
            username: Some(String::from("carol")),
            groups: vec![member_of("g1"), member_of("g2")],
            ..Identity::anonymous()
        };
        assert_eq!(
            identity.group_membership("g2"),
            Some(GroupMembership::Member)
        );
        assert_eq!(identity.group_membership("g9"), None);
    }

    #[test]
    fn org_admin_scoping_requires_matching_org() {
        let admin = Identity {
            username: Some(String::from("ada")),
            org_id: Some(String::from("org1")),
            site_role: Some(SiteRole::OrgAdmin),
            ..Identity::anonymous()
        };
        assert!(admin.is_org_admin());
        assert!(admin.is_org_admin_for("org1"));
        assert!(!admin.is_org_admin_for("org2"));

        let publisher = Identity {
            site_role: Some(SiteRole::OrgPublisher),
            ..admin.clone()
        };
        assert!(!publisher.is_org_admin());
        assert!(!publisher.is_org_admin_for("org1"));
    }

    #[test]
    fn group_affiliation_defaults_to_discussable_on_the_wire() {
        let affiliation: GroupAffiliation =
            serde_json::from_str(r#"{"id":"g1","membership":"admin"}"#)
                .expect("affiliation parses");
        assert!(affiliation.discussable);
        assert_eq!(affiliation.membership, GroupMembership::Admin);
        assert_eq!(affiliation.joined, None);
    }
}
