//! Group and Member aggregates plus read-side views.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::composition::RoleCounts;
use super::roles::{Position, Role, GROUP_SIZE};
use crate::errors::domain::DomainError;

/// Group lifecycle. `Matched` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupStatus {
    Waiting,
    Matched,
}

impl GroupStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            GroupStatus::Waiting => "WAITING",
            GroupStatus::Matched => "MATCHED",
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(GroupStatus::Waiting),
            "MATCHED" => Ok(GroupStatus::Matched),
            other => Err(DomainError::validation(format!(
                "unknown group status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub leader_id: String,
    pub counts: RoleCounts,
    pub total_members: u8,
    pub status: GroupStatus,
    pub created_at: OffsetDateTime,
    pub matched_at: Option<OffsetDateTime>,
}

impl Group {
    pub fn is_waiting(&self) -> bool {
        self.status == GroupStatus::Waiting
    }

    pub fn is_matched(&self) -> bool {
        self.status == GroupStatus::Matched
    }

    pub fn is_full(&self) -> bool {
        self.total_members >= GROUP_SIZE
    }

    /// Members counted in `total_members` but not in any role.
    pub fn unresolved_flex(&self) -> u8 {
        self.total_members.saturating_sub(self.counts.assigned())
    }

    /// Whether a joiner asking for `position` would find room here.
    ///
    /// A Flex joiner takes the first open concrete role, so it needs one.
    pub fn accepts(&self, position: Position) -> bool {
        if !self.is_waiting() || self.is_full() {
            return false;
        }
        match position.role() {
            Some(role) => self.counts.has_room(role),
            None => self.counts.has_any_room(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub group_id: i64,
    pub player_id: String,
    pub position: Position,
    pub is_leader: bool,
    pub joined_at: OffsetDateTime,
}

/// Group plus its members, ordered by `(joined_at, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub group: Group,
    pub members: Vec<Member>,
}

impl GroupSnapshot {
    pub fn flex_count(&self) -> usize {
        self.members.iter().filter(|m| m.position.is_flex()).count()
    }

    pub fn leader(&self) -> Option<&Member> {
        self.members.iter().find(|m| m.is_leader)
    }

    pub fn member(&self, player_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.player_id == player_id)
    }

    pub fn count_of(&self, role: Role) -> usize {
        self.members
            .iter()
            .filter(|m| m.position.role() == Some(role))
            .count()
    }

    /// Structural rules a quiescent group must satisfy.
    ///
    /// Returns every violated rule rather than stopping at the first.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let g = &self.group;

        if !g.counts.within_capacity() {
            problems.push(format!("role counts over capacity: {:?}", g.counts));
        }
        if g.total_members > GROUP_SIZE {
            problems.push(format!("total_members {} exceeds {GROUP_SIZE}", g.total_members));
        }

        let flex = self.flex_count();
        let expected_total = usize::from(g.counts.assigned()) + flex;
        if usize::from(g.total_members) != expected_total {
            problems.push(format!(
                "total_members {} != assigned {} + flex {flex}",
                g.total_members,
                g.counts.assigned()
            ));
        }
        if self.members.len() != usize::from(g.total_members) {
            problems.push(format!(
                "{} member rows but total_members {}",
                self.members.len(),
                g.total_members
            ));
        }
        for role in Role::ALL {
            let rows = self.count_of(role);
            if rows != usize::from(g.counts.get(role)) {
                problems.push(format!(
                    "{role} count {} but {rows} {role} rows",
                    g.counts.get(role)
                ));
            }
        }

        let leaders: Vec<&Member> = self.members.iter().filter(|m| m.is_leader).collect();
        match leaders.as_slice() {
            [leader] if leader.player_id == g.leader_id => {}
            [leader] => problems.push(format!(
                "leader row {} disagrees with group leader {}",
                leader.player_id, g.leader_id
            )),
            other => problems.push(format!("{} leader rows", other.len())),
        }

        if g.is_matched() {
            if !g.counts.is_complete() || flex != 0 {
                problems.push("matched group is not role-complete".to_string());
            }
            if g.matched_at.is_none() {
                problems.push("matched group has no matched_at".to_string());
            }
        }

        problems
    }
}

/// Waiting-queue summary: how many groups are waiting and how many of them
/// still have room for each role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub total_waiting_groups: u64,
    pub tank_needed: u64,
    pub damage_needed: u64,
    pub support_needed: u64,
}

impl QueueStats {
    pub fn from_groups<'a>(groups: impl IntoIterator<Item = &'a Group>) -> Self {
        groups
            .into_iter()
            .filter(|g| g.is_waiting())
            .fold(Self::default(), |mut stats, g| {
                stats.total_waiting_groups += 1;
                stats.tank_needed += u64::from(g.counts.has_room(Role::Tank));
                stats.damage_needed += u64::from(g.counts.has_room(Role::Damage));
                stats.support_needed += u64::from(g.counts.has_room(Role::Support));
                stats
            })
    }

    pub fn needed(&self, role: Role) -> u64 {
        match role {
            Role::Tank => self.tank_needed,
            Role::Damage => self.damage_needed,
            Role::Support => self.support_needed,
        }
    }
}
