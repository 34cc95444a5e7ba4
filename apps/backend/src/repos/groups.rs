//! Group store abstraction.
//!
//! The formation engine talks to storage only through [`GroupStore`]. Each
//! method is one atomic read or write; the engine composes them and owns any
//! compensation when a later step fails a domain rule.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::{Group, GroupStatus, Member, Position, RoleCounts, RoleDelta};
use crate::errors::domain::DomainError;

/// Storage operations used by the formation engine and matching coordinator.
///
/// Implementations map their own failures to `DomainError::Infra` (or
/// `Conflict(AlreadyInGroup)` for a duplicate member row).
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Insert a new `Waiting` group. The leader's member row is inserted
    /// separately.
    async fn create_group(
        &self,
        leader_id: &str,
        counts: RoleCounts,
        total_members: u8,
    ) -> Result<Group, DomainError>;

    async fn get_group(&self, group_id: i64) -> Result<Option<Group>, DomainError>;

    /// Waiting groups, oldest first, ties broken by id.
    async fn list_waiting_groups(&self) -> Result<Vec<Group>, DomainError>;

    async fn insert_member(
        &self,
        group_id: i64,
        player_id: &str,
        position: Position,
        is_leader: bool,
    ) -> Result<Member, DomainError>;

    async fn find_member(
        &self,
        group_id: i64,
        player_id: &str,
    ) -> Result<Option<Member>, DomainError>;

    /// Every row `player_id` holds, across all groups, in join order.
    async fn find_memberships(&self, player_id: &str) -> Result<Vec<Member>, DomainError>;

    /// Returns whether a row was removed.
    async fn delete_member(&self, group_id: i64, player_id: &str) -> Result<bool, DomainError>;

    /// Members ordered by `(joined_at, id)`.
    async fn list_members(&self, group_id: i64) -> Result<Vec<Member>, DomainError>;

    /// Apply `delta` to the role counts and total in a single write.
    ///
    /// Returns `NotFound(Group)` if the group no longer exists.
    async fn update_role_counts(&self, group_id: i64, delta: RoleDelta)
        -> Result<(), DomainError>;

    async fn update_member_position(
        &self,
        member_id: i64,
        position: Position,
    ) -> Result<(), DomainError>;

    async fn set_member_leader(&self, member_id: i64, is_leader: bool)
        -> Result<(), DomainError>;

    async fn set_group_status(
        &self,
        group_id: i64,
        status: GroupStatus,
        matched_at: Option<OffsetDateTime>,
    ) -> Result<(), DomainError>;

    async fn set_group_leader(&self, group_id: i64, leader_id: &str) -> Result<(), DomainError>;

    /// Remove the group and any member rows it still owns.
    async fn delete_group(&self, group_id: i64) -> Result<(), DomainError>;
}
