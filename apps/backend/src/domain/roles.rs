//! Roles and positions.
//!
//! A [`Role`] is one of the three concrete slots a group is built from. A
//! [`Position`] is what a member currently holds: either a concrete role or
//! the unresolved `Flex` placeholder, which contributes nothing to role counts
//! until completion resolves it exactly once.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;

/// Maximum members in a group.
pub const GROUP_SIZE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Tank,
    Damage,
    Support,
}

impl Role {
    /// All roles, in the priority order used when a Flex joiner picks a slot.
    pub const ALL: [Role; 3] = [Role::Tank, Role::Damage, Role::Support];

    /// Per-group ceiling for this role.
    pub const fn capacity(self) -> u8 {
        match self {
            Role::Tank => 1,
            Role::Damage => 2,
            Role::Support => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Tank => "Tank",
            Role::Damage => "Damage",
            Role::Support => "Support",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tank" => Ok(Role::Tank),
            "Damage" => Ok(Role::Damage),
            "Support" => Ok(Role::Support),
            other => Err(DomainError::validation(format!("unknown role '{other}'"))),
        }
    }
}

/// What a member holds inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Position {
    Role(Role),
    /// Unresolved; counted toward group size only.
    Flex,
}

impl Position {
    pub const TANK: Position = Position::Role(Role::Tank);
    pub const DAMAGE: Position = Position::Role(Role::Damage);
    pub const SUPPORT: Position = Position::Role(Role::Support);

    /// Concrete role, if resolved.
    pub const fn role(self) -> Option<Role> {
        match self {
            Position::Role(role) => Some(role),
            Position::Flex => None,
        }
    }

    pub const fn is_flex(self) -> bool {
        matches!(self, Position::Flex)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Position::Role(role) => role.as_str(),
            Position::Flex => "Flex",
        }
    }
}

impl From<Role> for Position {
    fn from(role: Role) -> Self {
        Position::Role(role)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Flex" => Ok(Position::Flex),
            other => other.parse::<Role>().map(Position::Role).map_err(|_| {
                DomainError::validation(format!("unknown position '{other}'"))
            }),
        }
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.as_str().to_string()
    }
}

impl TryFrom<String> for Position {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
