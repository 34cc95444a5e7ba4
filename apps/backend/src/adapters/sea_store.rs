//! SeaORM implementation of GroupStore.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};
use time::OffsetDateTime;

use crate::adapters::groups_sea::{self, CountsDelta, GroupCreate};
use crate::adapters::members_sea::{self, MemberCreate};
use crate::domain::{Group, GroupStatus, Member, Position, Role, RoleCounts, RoleDelta};
use crate::entities::{group_members, groups};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::infra::db_errors::map_db_err;
use crate::repos::groups::GroupStore;

/// Group store backed by the `groups` / `group_members` tables.
#[derive(Debug, Clone)]
pub struct SeaGroupStore {
    db: DatabaseConnection,
}

impl SeaGroupStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn corrupt(detail: String) -> DomainError {
    DomainError::infra(InfraErrorKind::DataCorruption, detail)
}

fn small(value: i16, column: &str, group_id: i64) -> Result<u8, DomainError> {
    u8::try_from(value).map_err(|_| corrupt(format!("group {group_id}: {column} = {value}")))
}

impl TryFrom<groups::Model> for Group {
    type Error = DomainError;

    fn try_from(row: groups::Model) -> Result<Self, Self::Error> {
        let id = row.id;
        Ok(Group {
            id,
            leader_id: row.leader_player_id,
            counts: RoleCounts::new(
                small(row.tank_count, "tank_count", id)?,
                small(row.damage_count, "damage_count", id)?,
                small(row.support_count, "support_count", id)?,
            ),
            total_members: small(row.total_members, "total_members", id)?,
            status: row.status.into(),
            created_at: row.created_at,
            matched_at: row.matched_at,
        })
    }
}

impl From<group_members::Model> for Member {
    fn from(row: group_members::Model) -> Self {
        Member {
            id: row.id,
            group_id: row.group_id,
            player_id: row.player_id,
            position: row.position.into(),
            is_leader: row.is_leader,
            joined_at: row.joined_at,
        }
    }
}

impl From<groups::GroupStatus> for GroupStatus {
    fn from(status: groups::GroupStatus) -> Self {
        match status {
            groups::GroupStatus::Waiting => GroupStatus::Waiting,
            groups::GroupStatus::Matched => GroupStatus::Matched,
        }
    }
}

impl From<GroupStatus> for groups::GroupStatus {
    fn from(status: GroupStatus) -> Self {
        match status {
            GroupStatus::Waiting => groups::GroupStatus::Waiting,
            GroupStatus::Matched => groups::GroupStatus::Matched,
        }
    }
}

impl From<group_members::MemberPosition> for Position {
    fn from(position: group_members::MemberPosition) -> Self {
        match position {
            group_members::MemberPosition::Tank => Position::Role(Role::Tank),
            group_members::MemberPosition::Damage => Position::Role(Role::Damage),
            group_members::MemberPosition::Support => Position::Role(Role::Support),
            group_members::MemberPosition::Flex => Position::Flex,
        }
    }
}

impl From<Position> for group_members::MemberPosition {
    fn from(position: Position) -> Self {
        match position {
            Position::Role(Role::Tank) => group_members::MemberPosition::Tank,
            Position::Role(Role::Damage) => group_members::MemberPosition::Damage,
            Position::Role(Role::Support) => group_members::MemberPosition::Support,
            Position::Flex => group_members::MemberPosition::Flex,
        }
    }
}

impl From<RoleDelta> for CountsDelta {
    fn from(delta: RoleDelta) -> Self {
        CountsDelta {
            tank: delta.tank.into(),
            damage: delta.damage.into(),
            support: delta.support.into(),
            total: delta.total.into(),
        }
    }
}

fn require_row(rows: u64, missing: impl FnOnce() -> DomainError) -> Result<(), DomainError> {
    if rows == 0 {
        Err(missing())
    } else {
        Ok(())
    }
}

fn member_row_missing(member_id: i64) -> DomainError {
    DomainError::not_found(
        NotFoundKind::Member,
        format!("member row {member_id} not found"),
    )
}

#[async_trait]
impl GroupStore for SeaGroupStore {
    async fn create_group(
        &self,
        leader_id: &str,
        counts: RoleCounts,
        total_members: u8,
    ) -> Result<Group, DomainError> {
        let dto = GroupCreate {
            leader_player_id: leader_id.to_string(),
            tank_count: counts.tank.into(),
            damage_count: counts.damage.into(),
            support_count: counts.support.into(),
            total_members: total_members.into(),
        };
        let row = groups_sea::create_group(&self.db, dto)
            .await
            .map_err(map_db_err)?;
        Group::try_from(row)
    }

    async fn get_group(&self, group_id: i64) -> Result<Option<Group>, DomainError> {
        groups_sea::find_by_id(&self.db, group_id)
            .await
            .map_err(map_db_err)?
            .map(Group::try_from)
            .transpose()
    }

    async fn list_waiting_groups(&self) -> Result<Vec<Group>, DomainError> {
        groups_sea::find_waiting(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(Group::try_from)
            .collect()
    }

    async fn insert_member(
        &self,
        group_id: i64,
        player_id: &str,
        position: Position,
        is_leader: bool,
    ) -> Result<Member, DomainError> {
        let dto = MemberCreate {
            group_id,
            player_id: player_id.to_string(),
            position: position.into(),
            is_leader,
        };
        let row = members_sea::create_member(&self.db, dto)
            .await
            .map_err(map_db_err)?;
        Ok(row.into())
    }

    async fn find_member(
        &self,
        group_id: i64,
        player_id: &str,
    ) -> Result<Option<Member>, DomainError> {
        let row = members_sea::find_member(&self.db, group_id, player_id)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(Member::from))
    }

    async fn find_memberships(&self, player_id: &str) -> Result<Vec<Member>, DomainError> {
        let rows = members_sea::find_all_by_player(&self.db, player_id)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn delete_member(&self, group_id: i64, player_id: &str) -> Result<bool, DomainError> {
        let rows = members_sea::delete_member(&self.db, group_id, player_id)
            .await
            .map_err(map_db_err)?;
        Ok(rows > 0)
    }

    async fn list_members(&self, group_id: i64) -> Result<Vec<Member>, DomainError> {
        let rows = members_sea::find_all_by_group(&self.db, group_id)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn update_role_counts(
        &self,
        group_id: i64,
        delta: RoleDelta,
    ) -> Result<(), DomainError> {
        let rows = groups_sea::apply_counts_delta(&self.db, group_id, delta.into())
            .await
            .map_err(map_db_err)?;
        require_row(rows, || DomainError::group_not_found(group_id))
    }

    async fn update_member_position(
        &self,
        member_id: i64,
        position: Position,
    ) -> Result<(), DomainError> {
        let rows = members_sea::set_position(&self.db, member_id, position.into())
            .await
            .map_err(map_db_err)?;
        require_row(rows, || member_row_missing(member_id))
    }

    async fn set_member_leader(&self, member_id: i64, is_leader: bool) -> Result<(), DomainError> {
        let rows = members_sea::set_leader_flag(&self.db, member_id, is_leader)
            .await
            .map_err(map_db_err)?;
        require_row(rows, || member_row_missing(member_id))
    }

    async fn set_group_status(
        &self,
        group_id: i64,
        status: GroupStatus,
        matched_at: Option<OffsetDateTime>,
    ) -> Result<(), DomainError> {
        let rows = groups_sea::set_status(&self.db, group_id, status.into(), matched_at)
            .await
            .map_err(map_db_err)?;
        require_row(rows, || DomainError::group_not_found(group_id))
    }

    async fn set_group_leader(&self, group_id: i64, leader_id: &str) -> Result<(), DomainError> {
        let rows = groups_sea::set_leader(&self.db, group_id, leader_id)
            .await
            .map_err(map_db_err)?;
        require_row(rows, || DomainError::group_not_found(group_id))
    }

    async fn delete_group(&self, group_id: i64) -> Result<(), DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        members_sea::delete_all_by_group(&txn, group_id)
            .await
            .map_err(map_db_err)?;
        groups_sea::delete_group(&txn, group_id)
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)
    }
}
