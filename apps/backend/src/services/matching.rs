//! Matching coordinator - places a queued player into a waiting group.
//!
//! One pass over the waiting groups, oldest first. No retries: if the pass
//! finds nothing the caller starts a new group.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{Group, GroupSnapshot, Position, QueueStats, Role};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::groups::GroupStore;
use crate::services::formation::FormationService;

/// Result of a single matching pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinOutcome {
    pub group_id: Option<i64>,
    pub joined: bool,
    /// The concrete role the player was admitted with.
    pub assigned_role: Option<Role>,
}

impl JoinOutcome {
    fn joined(group_id: i64, role: Role) -> Self {
        Self {
            group_id: Some(group_id),
            joined: true,
            assigned_role: Some(role),
        }
    }

    fn not_joined() -> Self {
        Self {
            group_id: None,
            joined: false,
            assigned_role: None,
        }
    }
}

/// Join an existing group or, failing that, lead a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueueOutcome {
    Joined { group_id: i64, role: Role },
    Created { group: Group },
}

pub struct MatchingCoordinator {
    formation: Arc<FormationService>,
    store: Arc<dyn GroupStore>,
    matchable_limit: usize,
}

/// Store failures and duplicate membership abort the pass; other domain
/// rejections only skip a candidate.
fn is_skippable(err: &DomainError) -> bool {
    !err.is_infra() && !matches!(err, DomainError::Conflict(ConflictKind::AlreadyInGroup, _))
}

impl MatchingCoordinator {
    pub fn new(formation: Arc<FormationService>, matchable_limit: usize) -> Self {
        let store = formation.store().clone();
        Self {
            formation,
            store,
            matchable_limit,
        }
    }

    pub fn formation(&self) -> &Arc<FormationService> {
        &self.formation
    }

    /// Try to place `player_id` in the oldest waiting group with room.
    ///
    /// A concrete role gets one attempt at the first group with an open slot.
    /// A Flex joiner takes each group's first open role (Tank, then Damage,
    /// then Support) and moves on to the next group if admission fails.
    ///
    /// Fails `Conflict(AlreadyInGroup)` when the player already sits in a
    /// waiting group.
    pub async fn find_group_and_join(
        &self,
        player_id: &str,
        position: Position,
    ) -> Result<JoinOutcome, DomainError> {
        let waiting = self.store.list_waiting_groups().await?;
        debug!(player_id, position = %position, waiting = waiting.len(), "Scanning waiting groups");
        self.ensure_not_waiting(player_id, &waiting).await?;

        match position.role() {
            Some(role) => {
                let Some(group) = waiting.iter().find(|g| g.accepts(position)) else {
                    debug!(player_id, role = %role, "No waiting group has room");
                    return Ok(JoinOutcome::not_joined());
                };
                match self.formation.admit_member(group.id, player_id, role).await {
                    Ok(_) => {
                        info!(group_id = group.id, player_id, role = %role, "Joined waiting group");
                        Ok(JoinOutcome::joined(group.id, role))
                    }
                    Err(err) if is_skippable(&err) => {
                        warn!(group_id = group.id, player_id, error = %err, "Join attempt lost");
                        Ok(JoinOutcome::not_joined())
                    }
                    Err(err) => Err(err),
                }
            }
            None => {
                for group in &waiting {
                    let Some(role) = group.counts.first_open_role() else {
                        continue;
                    };
                    match self.formation.admit_member(group.id, player_id, role).await {
                        Ok(_) => {
                            info!(group_id = group.id, player_id, role = %role, "Flex joiner placed");
                            return Ok(JoinOutcome::joined(group.id, role));
                        }
                        Err(err) if is_skippable(&err) => {
                            warn!(group_id = group.id, player_id, error = %err, "Flex join attempt lost, trying next group");
                        }
                        Err(err) => return Err(err),
                    }
                }
                debug!(player_id, "No waiting group could take a Flex joiner");
                Ok(JoinOutcome::not_joined())
            }
        }
    }

    /// Matched groups are finished, so only a waiting group counts.
    async fn ensure_not_waiting(
        &self,
        player_id: &str,
        waiting: &[Group],
    ) -> Result<(), DomainError> {
        let memberships = self.store.find_memberships(player_id).await?;
        match memberships
            .iter()
            .find(|m| waiting.iter().any(|g| g.id == m.group_id))
        {
            Some(member) => Err(DomainError::conflict(
                ConflictKind::AlreadyInGroup,
                format!(
                    "player {player_id} is already in waiting group {}",
                    member.group_id
                ),
            )),
            None => Ok(()),
        }
    }

    /// Matching pass with a fallback to starting a new group.
    pub async fn queue(
        &self,
        player_id: &str,
        position: Position,
    ) -> Result<QueueOutcome, DomainError> {
        let outcome = self.find_group_and_join(player_id, position).await?;
        match (outcome.group_id, outcome.assigned_role) {
            (Some(group_id), Some(role)) if outcome.joined => {
                Ok(QueueOutcome::Joined { group_id, role })
            }
            _ => {
                let group = self.formation.create_group(player_id, position).await?;
                Ok(QueueOutcome::Created { group })
            }
        }
    }

    /// Waiting groups with room for `position`, oldest first, with members.
    ///
    /// `limit` defaults to the configured page size.
    pub async fn find_matchable_groups(
        &self,
        position: Position,
        limit: Option<usize>,
    ) -> Result<Vec<GroupSnapshot>, DomainError> {
        let limit = limit.unwrap_or(self.matchable_limit);
        let candidates: Vec<Group> = self
            .store
            .list_waiting_groups()
            .await?
            .into_iter()
            .filter(|g| g.accepts(position))
            .take(limit)
            .collect();

        let store = &self.store;
        try_join_all(candidates.into_iter().map(|group| async move {
            let members = store.list_members(group.id).await?;
            Ok::<_, DomainError>(GroupSnapshot { group, members })
        }))
        .await
    }

    pub async fn list_waiting_groups(&self) -> Result<Vec<Group>, DomainError> {
        self.store.list_waiting_groups().await
    }

    pub async fn queue_stats(&self) -> Result<QueueStats, DomainError> {
        let waiting = self.store.list_waiting_groups().await?;
        Ok(QueueStats::from_groups(&waiting))
    }
}
