//! Leaving, kicking and leadership succession.

use serde::Serialize;
use tracing::{info, warn};

use super::FormationService;
use crate::domain::{Group, Member, RoleDelta};
use crate::errors::domain::{DomainError, ForbiddenKind};

/// What happened to the group when a player left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveOutcome {
    /// Leadership passed to `new_leader`.
    pub leadership_transferred: bool,
    pub new_leader: Option<String>,
    /// The departing player was the last member.
    pub group_deleted: bool,
}

/// Caller-side guard: a leader may not kick themselves.
pub fn ensure_not_self_kick(requester_id: &str, target_id: &str) -> Result<(), DomainError> {
    if requester_id == target_id {
        return Err(DomainError::forbidden(
            ForbiddenKind::SelfKick,
            "cannot kick yourself",
        ));
    }
    Ok(())
}

impl FormationService {
    /// Remove a player from the group, deleting the group when it empties.
    ///
    /// Removing the leader hands leadership to the longest-standing remaining
    /// member first, so the group never loses its leader.
    pub async fn remove_member(&self, group_id: i64, player_id: &str) -> Result<(), DomainError> {
        self.leave_group(group_id, player_id).await.map(|_| ())
    }

    /// Leader-only removal of another member.
    pub async fn kick_member(
        &self,
        group_id: i64,
        requester_id: &str,
        target_id: &str,
    ) -> Result<(), DomainError> {
        let _guard = self.lock_group(group_id).await;

        let group = self.load_waiting_group(group_id).await?;
        if group.leader_id != requester_id {
            return Err(DomainError::forbidden(
                ForbiddenKind::NotLeader,
                format!("only the leader of group {group_id} can kick members"),
            ));
        }
        let target = self
            .store
            .find_member(group_id, target_id)
            .await?
            .ok_or_else(|| DomainError::member_not_found(group_id, target_id))?;
        if target.is_leader {
            return Err(DomainError::forbidden(
                ForbiddenKind::CannotKickLeader,
                "the group leader cannot be kicked",
            ));
        }

        self.remove_row(&group, &target).await?;
        info!(group_id, requester_id, target_id, "Member kicked");
        Ok(())
    }

    /// Hand leadership to the earliest-joined remaining member and remove the
    /// current leader. With nobody left to promote, the group is deleted.
    ///
    /// Returns the new leader's row, or `None` when the group was deleted.
    pub async fn transfer_leadership(
        &self,
        group_id: i64,
        current_leader: &str,
    ) -> Result<Option<Member>, DomainError> {
        let _guard = self.lock_group(group_id).await;
        let group = self.load_waiting_group(group_id).await?;
        let leader = self.find_departing(group_id, current_leader).await?;
        if !leader.is_leader {
            return Err(DomainError::forbidden(
                ForbiddenKind::NotLeader,
                format!("player {current_leader} does not lead group {group_id}"),
            ));
        }

        self.transfer_locked(&group, &leader).await
    }

    /// A member leaves on their own. Leaders go through succession.
    pub async fn leave_group(
        &self,
        group_id: i64,
        player_id: &str,
    ) -> Result<LeaveOutcome, DomainError> {
        let _guard = self.lock_group(group_id).await;
        let group = self.load_waiting_group(group_id).await?;
        let member = self.find_departing(group_id, player_id).await?;

        let outcome = if member.is_leader {
            match self.transfer_locked(&group, &member).await? {
                Some(successor) => LeaveOutcome {
                    leadership_transferred: true,
                    new_leader: Some(successor.player_id),
                    group_deleted: false,
                },
                None => LeaveOutcome {
                    leadership_transferred: false,
                    new_leader: None,
                    group_deleted: true,
                },
            }
        } else {
            let deleted = self.remove_row(&group, &member).await?;
            LeaveOutcome {
                leadership_transferred: false,
                new_leader: None,
                group_deleted: deleted,
            }
        };

        info!(
            group_id,
            player_id,
            transferred = outcome.leadership_transferred,
            deleted = outcome.group_deleted,
            "Member left"
        );
        Ok(outcome)
    }

    async fn find_departing(&self, group_id: i64, player_id: &str) -> Result<Member, DomainError> {
        self.store
            .find_member(group_id, player_id)
            .await?
            .ok_or_else(|| DomainError::member_not_found(group_id, player_id))
    }

    async fn transfer_locked(
        &self,
        group: &Group,
        leader: &Member,
    ) -> Result<Option<Member>, DomainError> {
        let remaining: Vec<Member> = self
            .store
            .list_members(group.id)
            .await?
            .into_iter()
            .filter(|m| m.player_id != leader.player_id)
            .collect();

        let Some(successor) = remaining.into_iter().next() else {
            self.store.delete_group(group.id).await?;
            info!(group_id = group.id, player_id = %leader.player_id, "Last member left, group deleted");
            return Ok(None);
        };

        self.store.set_member_leader(successor.id, true).await?;
        self.store
            .set_group_leader(group.id, &successor.player_id)
            .await?;
        self.remove_row(group, leader).await?;

        info!(
            group_id = group.id,
            from = %leader.player_id,
            to = %successor.player_id,
            "Leadership transferred"
        );
        Ok(Some(Member {
            is_leader: true,
            ..successor
        }))
    }

    /// Delete one member row and adjust counts; delete the group if that was
    /// the last row. Returns whether the group was deleted.
    async fn remove_row(&self, group: &Group, member: &Member) -> Result<bool, DomainError> {
        if !self.store.delete_member(group.id, &member.player_id).await? {
            warn!(group_id = group.id, player_id = %member.player_id, "Member row already gone");
            return Err(DomainError::member_not_found(group.id, &member.player_id));
        }
        self.store
            .update_role_counts(group.id, RoleDelta::leave(member.position))
            .await?;

        if self.store.list_members(group.id).await?.is_empty() {
            self.store.delete_group(group.id).await?;
            info!(group_id = group.id, "Group emptied and deleted");
            return Ok(true);
        }
        Ok(false)
    }
}
