//! Completion detection and Flex resolution.

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::FormationService;
use crate::domain::{plan_flex_resolution, GroupStatus, RoleDelta, GROUP_SIZE};
use crate::errors::domain::DomainError;

/// Result of an on-demand completion check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionCheck {
    pub matched: bool,
    pub status: GroupStatus,
    pub member_count: usize,
}

impl FormationService {
    /// Settle a full group: resolve Flex members, then mark it `Matched` if
    /// every role is covered.
    ///
    /// Returns whether this call made the group `Matched`. Groups that are not
    /// full, already matched or gone are left alone.
    pub(super) async fn complete_if_ready(&self, group_id: i64) -> Result<bool, DomainError> {
        let Some(group) = self.store.get_group(group_id).await? else {
            return Ok(false);
        };
        if group.total_members != GROUP_SIZE || !group.is_waiting() {
            return Ok(false);
        }

        let members = self.store.list_members(group_id).await?;
        let has_flex = members.iter().any(|m| m.position.is_flex());

        let counts = if has_flex {
            let plan = {
                let mut rng = self.rng.lock();
                plan_flex_resolution(&group.counts, &members, &mut *rng)
            };
            for assignment in &plan {
                self.store
                    .update_member_position(assignment.member_id, assignment.role.into())
                    .await?;
                self.store
                    .update_role_counts(group_id, RoleDelta::resolve(assignment.role))
                    .await?;
                info!(
                    group_id,
                    player_id = %assignment.player_id,
                    role = %assignment.role,
                    "Flex member resolved"
                );
            }

            match self.store.get_group(group_id).await? {
                Some(refreshed) => refreshed.counts,
                None => return Ok(false),
            }
        } else {
            group.counts
        };

        if !counts.is_complete() {
            debug!(group_id, ?counts, "Full group is not role-complete");
            return Ok(false);
        }

        self.store
            .set_group_status(group_id, GroupStatus::Matched, Some(OffsetDateTime::now_utc()))
            .await?;
        info!(group_id, "Group matched");
        Ok(true)
    }

    /// Re-run completion detection on request.
    ///
    /// A group that is already matched reports so without touching the store
    /// again; a group with fewer than five member rows reports not matched.
    pub async fn force_check_complete(&self, group_id: i64) -> Result<CompletionCheck, DomainError> {
        let _guard = self.lock_group(group_id).await;

        let snapshot = self.snapshot(group_id).await?;
        let member_count = snapshot.members.len();
        if snapshot.group.is_matched() {
            return Ok(CompletionCheck {
                matched: true,
                status: GroupStatus::Matched,
                member_count,
            });
        }
        if member_count != usize::from(GROUP_SIZE) {
            debug!(group_id, member_count, "Not enough members to complete");
            return Ok(CompletionCheck {
                matched: false,
                status: snapshot.group.status,
                member_count,
            });
        }

        self.complete_if_ready(group_id).await?;
        let group = self.load_group(group_id).await?;
        Ok(CompletionCheck {
            matched: group.is_matched(),
            status: group.status,
            member_count,
        })
    }
}
