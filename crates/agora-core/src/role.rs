use serde::{Deserialize, Serialize};

/// Effective role of one identity on one channel, weakest to strongest.
///
/// `Read` and `Write` are disjoint capabilities: neither implies the other,
/// and `ReadWrite` covers both. The declaration order doubles as the
/// aggregation order used when several grants apply to the same identity;
/// it is exposed through [`role_rank`] and consulted nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    None,
    Read,
    Write,
    ReadWrite,
    Moderate,
    Manage,
    Owner,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::ReadWrite => "read_write",
            Self::Moderate => "moderate",
            Self::Manage => "manage",
            Self::Owner => "owner",
        }
    }

    /// Returns the stronger of two roles under the aggregation order.
    #[must_use]
    pub fn strongest(self, other: Self) -> Self {
        if role_rank(other) > role_rank(self) {
            other
        } else {
            self
        }
    }

    /// Returns true if `self` sits at or above `other` in the aggregation
    /// order. This is the ladder used for configurable thresholds; predicate
    /// gating goes through the capability checks below instead, because the
    /// ladder places `Write` above `Read` while the capabilities stay
    /// disjoint.
    #[must_use]
    pub fn dominates(self, other: Self) -> bool {
        role_rank(self) >= role_rank(other)
    }

    #[must_use]
    pub const fn allows_read(self) -> bool {
        matches!(
            self,
            Self::Read | Self::ReadWrite | Self::Moderate | Self::Manage | Self::Owner
        )
    }

    #[must_use]
    pub const fn allows_write(self) -> bool {
        matches!(
            self,
            Self::Write | Self::ReadWrite | Self::Moderate | Self::Manage | Self::Owner
        )
    }

    #[must_use]
    pub const fn allows_moderation(self) -> bool {
        matches!(self, Self::Moderate | Self::Manage | Self::Owner)
    }

    #[must_use]
    pub const fn allows_management(self) -> bool {
        matches!(self, Self::Manage | Self::Owner)
    }

    #[must_use]
    pub const fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }
}

/// Position of a role in the aggregation order. The one place the order is
/// written down.
#[must_use]
pub fn role_rank(role: Role) -> u8 {
    match role {
        Role::None => 0,
        Role::Read => 1,
        Role::Write => 2,
        Role::ReadWrite => 3,
        Role::Moderate => 4,
        Role::Manage => 5,
        Role::Owner => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::{role_rank, Role};

    const LADDER: [Role; 7] = [
        Role::None,
        Role::Read,
        Role::Write,
        Role::ReadWrite,
        Role::Moderate,
        Role::Manage,
        Role::Owner,
    ];

    #[test]
    fn aggregation_order_is_strictly_increasing() {
        for pair in LADDER.windows(2) {
            assert!(role_rank(pair[0]) < role_rank(pair[1]));
        }
    }

    #[test]
    fn strongest_picks_the_higher_grant_in_either_argument_order() {
        assert_eq!(Role::Read.strongest(Role::Owner), Role::Owner);
        assert_eq!(Role::Owner.strongest(Role::Read), Role::Owner);
        assert_eq!(Role::None.strongest(Role::None), Role::None);
        assert_eq!(Role::Write.strongest(Role::ReadWrite), Role::ReadWrite);
    }

    #[test]
    fn dominates_is_reflexive_and_follows_the_ladder() {
        for role in LADDER {
            assert!(role.dominates(role));
            assert!(Role::Owner.dominates(role));
            assert!(role.dominates(Role::None));
        }
        assert!(!Role::Moderate.dominates(Role::Manage));
    }

    #[test]
    fn read_and_write_capabilities_are_disjoint() {
        assert!(Role::Read.allows_read());
        assert!(!Role::Read.allows_write());
        assert!(Role::Write.allows_write());
        assert!(!Role::Write.allows_read());
        assert!(Role::ReadWrite.allows_read());
        assert!(Role::ReadWrite.allows_write());
    }

    #[test]
    fn moderation_tiers_carry_read_and_write() {
        for role in [Role::Moderate, Role::Manage, Role::Owner] {
            assert!(role.allows_read());
            assert!(role.allows_write());
            assert!(role.allows_moderation());
        }
        assert!(!Role::ReadWrite.allows_moderation());
    }

    #[test]
    fn management_is_above_moderation() {
        assert!(!Role::Moderate.allows_management());
        assert!(Role::Manage.allows_management());
        assert!(Role::Owner.allows_management());
        assert!(Role::Owner.is_owner());
        assert!(!Role::Manage.is_owner());
    }

    #[test]
    fn none_grants_nothing() {
        assert!(!Role::None.allows_read());
        assert!(!Role::None.allows_write());
        assert!(!Role::None.allows_moderation());
        assert!(!Role::None.allows_management());
    }

    #[test]
    fn wire_names_are_snake_case() {
        for (role, expected) in [
            (Role::ReadWrite, "\"read_write\""),
            (Role::Owner, "\"owner\""),
            (Role::None, "\"none\""),
        ] {
            assert_eq!(serde_json::to_string(&role).expect("role serializes"), expected);
        }
    }
}
