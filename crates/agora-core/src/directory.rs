//! The group-directory capability the core consumes but never implements
//! against a real backend: membership, admin status, and discussability live
//! in an external service.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::identity::{GroupAffiliation, GroupMembership};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("group {0:?} is not accessible to this caller")]
    GroupInaccessible(String),
    #[error("group {0:?} does not exist")]
    GroupNotFound(String),
}

/// What the directory says about one group, independent of any caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub id: String,
    pub discussable: bool,
}

/// One caller's standing in one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipRecord {
    pub membership: GroupMembership,
    pub joined: Option<DateTime<Utc>>,
}

/// Directory lookups the evaluator's inputs are resolved from.
pub trait GroupDirectory {
    /// # Errors
    /// Fails when the group does not exist or the caller may not see it.
    fn group_summary(&self, group_id: &str) -> Result<GroupSummary, DirectoryError>;

    /// The caller's membership in one group, `None` for non-members.
    ///
    /// # Errors
    /// Fails when the group does not exist or the caller may not see it.
    fn membership(
        &self,
        username: &str,
        group_id: &str,
    ) -> Result<Option<MembershipRecord>, DirectoryError>;
}

/// Resolves the caller's affiliations for a set of group ids.
///
/// A lookup failure skips that one group and continues: a single stale or
/// inaccessible group reference must never block grants the remaining groups
/// carry. Failures are logged, not returned.
pub fn resolve_affiliations<D: GroupDirectory>(
    directory: &D,
    username: &str,
    group_ids: &[String],
) -> Vec<GroupAffiliation> {
    let mut affiliations = Vec::new();
    for group_id in group_ids {
        let summary = match directory.group_summary(group_id) {
            Ok(summary) => summary,
            Err(error) => {
                tracing::debug!(
                    event = "directory_lookup_skipped",
                    group_id = group_id.as_str(),
                    error = %error,
                    "skipping unresolvable group"
                );
                continue;
            }
        };
        let record = match directory.membership(username, group_id) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(error) => {
                tracing::debug!(
                    event = "directory_lookup_skipped",
                    group_id = group_id.as_str(),
                    error = %error,
                    "skipping unresolvable membership"
                );
                continue;
            }
        };
        affiliations.push(GroupAffiliation {
            id: summary.id,
            membership: record.membership,
            discussable: summary.discussable,
            joined: record.joined,
        });
    }
    affiliations
}

/// Directory backed by in-process maps, for tests and local inspection.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    groups: HashMap<String, GroupSummary>,
    members: HashMap<String, HashMap<String, MembershipRecord>>,
    sealed: Vec<String>,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_group(&mut self, group_id: &str, discussable: bool) {
        self.groups.insert(
            String::from(group_id),
            GroupSummary {
                id: String::from(group_id),
                discussable,
            },
        );
    }

    pub fn insert_member(
        &mut self,
        group_id: &str,
        username: &str,
        membership: GroupMembership,
        joined: Option<DateTime<Utc>>,
    ) {
        self.members
            .entry(String::from(group_id))
            .or_default()
            .insert(String::from(username), MembershipRecord { membership, joined });
    }

    /// Marks a group as existing but inaccessible, so callers can exercise
    /// the skip-on-failure path.
    pub fn seal_group(&mut self, group_id: &str) {
        self.sealed.push(String::from(group_id));
    }

    fn check_access(&self, group_id: &str) -> Result<(), DirectoryError> {
        if self.sealed.iter().any(|sealed| sealed == group_id) {
            return Err(DirectoryError::GroupInaccessible(String::from(group_id)));
        }
        Ok(())
    }
}

impl GroupDirectory for InMemoryDirectory {
    fn group_summary(&self, group_id: &str) -> Result<GroupSummary, DirectoryError> {
        self.check_access(group_id)?;
        self.groups
            .get(group_id)
            .cloned()
            .ok_or_else(|| DirectoryError::GroupNotFound(String::from(group_id)))
    }

    fn membership(
        &self,
        username: &str,
        group_id: &str,
    ) -> Result<Option<MembershipRecord>, DirectoryError> {
        self.check_access(group_id)?;
        if !self.groups.contains_key(group_id) {
            return Err(DirectoryError::GroupNotFound(String::from(group_id)));
        }
        Ok(self
            .members
            .get(group_id)
            .and_then(|members| members.get(username))
            .copied())
    }
}
