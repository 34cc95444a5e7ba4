//! Member admission: insert, re-read, validate, compensate.

use tracing::{info, warn};

use super::FormationService;
use crate::domain::{Group, Member, Position, Role, RoleDelta};
use crate::errors::domain::DomainError;

/// Why a freshly inserted row has to be taken back out, judged against the
/// group as re-read after the insert.
fn rejection(group: &Group, position: Position) -> Option<DomainError> {
    if group.is_matched() {
        return Some(DomainError::already_matched(group.id));
    }
    if let Some(role) = position.role() {
        if !group.counts.has_room(role) {
            return Some(DomainError::role_full(role));
        }
    }
    if group.is_full() {
        return Some(DomainError::group_full(group.id));
    }
    None
}

impl FormationService {
    /// Admit `player_id` into a concrete role.
    ///
    /// Fails `RoleFull` when the role is at capacity, `GroupFull` when five
    /// members are already counted, `AlreadyMatched` once the group is terminal.
    pub async fn admit_member(
        &self,
        group_id: i64,
        player_id: &str,
        role: Role,
    ) -> Result<Member, DomainError> {
        let _guard = self.lock_group(group_id).await;
        self.admit_locked(group_id, player_id, Position::Role(role))
            .await
    }

    /// Admit `player_id` as an unresolved Flex member.
    ///
    /// Only the member total is checked; the role is picked when the group
    /// fills.
    pub async fn admit_flex(&self, group_id: i64, player_id: &str) -> Result<Member, DomainError> {
        let _guard = self.lock_group(group_id).await;
        self.admit_locked(group_id, player_id, Position::Flex).await
    }

    async fn admit_locked(
        &self,
        group_id: i64,
        player_id: &str,
        position: Position,
    ) -> Result<Member, DomainError> {
        self.load_waiting_group(group_id).await?;

        let member = self
            .store
            .insert_member(group_id, player_id, position, false)
            .await?;

        let current = match self.store.get_group(group_id).await? {
            Some(group) => group,
            None => {
                self.compensate(group_id, player_id, "group vanished")
                    .await?;
                return Err(DomainError::group_not_found(group_id));
            }
        };

        if let Some(err) = rejection(&current, position) {
            self.compensate(group_id, player_id, &err.to_string())
                .await?;
            return Err(err);
        }

        self.store
            .update_role_counts(group_id, RoleDelta::join(position))
            .await?;
        info!(group_id, player_id, position = %position, "Member admitted");

        self.complete_if_ready(group_id).await?;
        Ok(member)
    }

    /// Remove a row inserted by a rejected admission.
    async fn compensate(
        &self,
        group_id: i64,
        player_id: &str,
        reason: &str,
    ) -> Result<(), DomainError> {
        warn!(group_id, player_id, reason, "Admission rejected, removing inserted member");
        self.store.delete_member(group_id, player_id).await?;
        Ok(())
    }
}
