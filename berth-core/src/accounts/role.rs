//! Role hierarchy backing every authorization decision.
//!
//! Roles form a strict total order via integer ranks. Rank comparison lives
//! here and nowhere else; policy predicates and callers compose these methods
//! instead of reimplementing rank logic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ranked account role.
///
/// Ordering is member < contributor < moderator < administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Contributor,
    Moderator,
    Administrator,
}

impl Role {
    /// All roles in ascending rank order.
    pub const ALL: [Role; 4] = [
        Role::Member,
        Role::Contributor,
        Role::Moderator,
        Role::Administrator,
    ];

    /// Numeric rank for comparison. Higher rank means more permissions.
    pub fn rank(self) -> u8 {
        match self {
            Role::Member => 0,
            Role::Contributor => 1,
            Role::Moderator => 2,
            Role::Administrator => 3,
        }
    }

    /// Whether this role ranks at or above the given role.
    pub fn is_at_least(self, other: Role) -> bool {
        self.rank() >= other.rank()
    }

    /// Whether this role ranks strictly above the given role.
    pub fn is_higher_than(self, other: Role) -> bool {
        self.rank() > other.rank()
    }

    /// All roles ranking at or above the given role, ascending.
    pub fn at_least(minimum: Role) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| role.is_at_least(minimum))
            .collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Member => "member",
            Role::Contributor => "contributor",
            Role::Moderator => "moderator",
            Role::Administrator => "administrator",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "member" => Ok(Role::Member),
            "contributor" => Ok(Role::Contributor),
            "moderator" => Ok(Role::Moderator),
            "administrator" => Ok(Role::Administrator),
            _ => Err(RoleParseError {
                input: text.to_string(),
            }),
        }
    }
}

/// Error from parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {input:?}")]
pub struct RoleParseError {
    pub input: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_strictly_ordered() {
        assert_eq!(Role::Member.rank(), 0);
        assert_eq!(Role::Contributor.rank(), 1);
        assert_eq!(Role::Moderator.rank(), 2);
        assert_eq!(Role::Administrator.rank(), 3);

        for window in Role::ALL.windows(2) {
            assert!(window[1].is_higher_than(window[0]));
        }
    }

    #[test]
    fn at_least_comparisons() {
        assert!(Role::Moderator.is_at_least(Role::Contributor));
        assert!(!Role::Contributor.is_at_least(Role::Moderator));
        assert!(Role::Member.is_at_least(Role::Member));
        assert!(!Role::Administrator.is_higher_than(Role::Administrator));
    }

    #[test]
    fn at_least_lists_roles_from_minimum_upward() {
        assert_eq!(
            Role::at_least(Role::Moderator),
            vec![Role::Moderator, Role::Administrator]
        );
        assert_eq!(Role::at_least(Role::Member), Role::ALL.to_vec());
    }

    #[test]
    fn string_forms_round_trip() {
        for role in Role::ALL {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }

        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_as_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&Role::Administrator).unwrap(),
            "\"administrator\""
        );
        let parsed: Role = serde_json::from_str("\"contributor\"").unwrap();
        assert_eq!(parsed, Role::Contributor);
    }
}
