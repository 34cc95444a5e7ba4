//! Process-local GroupStore.
//!
//! Backs the simulator and the service tests. Every method takes the table
//! lock once, so each call is atomic on its own while a sequence of calls is
//! not, the same guarantee a SQL store gives per statement.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use time::OffsetDateTime;
use tracing::debug;

use crate::domain::{Group, GroupStatus, Member, Position, RoleCounts, RoleDelta};
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::repos::groups::GroupStore;

/// Store operations, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    CreateGroup,
    GetGroup,
    ListWaitingGroups,
    InsertMember,
    FindMember,
    FindMemberships,
    DeleteMember,
    ListMembers,
    UpdateRoleCounts,
    UpdateMemberPosition,
    SetMemberLeader,
    SetGroupStatus,
    SetGroupLeader,
    DeleteGroup,
}

#[derive(Debug, Default)]
struct Tables {
    groups: BTreeMap<i64, Group>,
    members: BTreeMap<i64, Member>,
    next_group_id: i64,
    next_member_id: i64,
}

impl Tables {
    fn group_mut(&mut self, group_id: i64) -> Result<&mut Group, DomainError> {
        self.groups
            .get_mut(&group_id)
            .ok_or_else(|| DomainError::group_not_found(group_id))
    }

    fn member_mut(&mut self, member_id: i64) -> Result<&mut Member, DomainError> {
        self.members.get_mut(&member_id).ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Member,
                format!("member row {member_id} not found"),
            )
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    tables: RwLock<Tables>,
    faults: Mutex<Vec<StoreOp>>,
    yield_between_ops: bool,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Yield to the scheduler before every operation so concurrent callers
    /// interleave at each store call, the way they would against a remote
    /// database.
    pub fn with_interleaving(mut self) -> Self {
        self.yield_between_ops = true;
        self
    }

    /// Make the next call to `op` fail with `Infra(Injected)`.
    ///
    /// Each registration fires once.
    pub fn fail_on(&self, op: StoreOp) {
        self.faults.lock().push(op);
    }

    /// Every group, waiting or not. Used by the simulator summary.
    pub fn all_groups(&self) -> Vec<Group> {
        self.tables.read().groups.values().cloned().collect()
    }

    pub fn member_rows(&self) -> usize {
        self.tables.read().members.len()
    }

    async fn enter(&self, op: StoreOp) -> Result<(), DomainError> {
        if self.yield_between_ops {
            tokio::task::yield_now().await;
        }
        let mut faults = self.faults.lock();
        if let Some(idx) = faults.iter().position(|f| *f == op) {
            faults.remove(idx);
            debug!(?op, "injected store failure");
            return Err(DomainError::infra(
                InfraErrorKind::Injected,
                format!("injected failure on {op:?}"),
            ));
        }
        Ok(())
    }
}

fn sorted_members<'a>(members: impl Iterator<Item = &'a Member>) -> Vec<Member> {
    let mut out: Vec<Member> = members.cloned().collect();
    out.sort_by_key(|m| (m.joined_at, m.id));
    out
}

#[async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn create_group(
        &self,
        leader_id: &str,
        counts: RoleCounts,
        total_members: u8,
    ) -> Result<Group, DomainError> {
        self.enter(StoreOp::CreateGroup).await?;
        let mut tables = self.tables.write();
        tables.next_group_id += 1;
        let group = Group {
            id: tables.next_group_id,
            leader_id: leader_id.to_string(),
            counts,
            total_members,
            status: GroupStatus::Waiting,
            created_at: OffsetDateTime::now_utc(),
            matched_at: None,
        };
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn get_group(&self, group_id: i64) -> Result<Option<Group>, DomainError> {
        self.enter(StoreOp::GetGroup).await?;
        Ok(self.tables.read().groups.get(&group_id).cloned())
    }

    async fn list_waiting_groups(&self) -> Result<Vec<Group>, DomainError> {
        self.enter(StoreOp::ListWaitingGroups).await?;
        let tables = self.tables.read();
        let mut waiting: Vec<Group> = tables
            .groups
            .values()
            .filter(|g| g.is_waiting())
            .cloned()
            .collect();
        waiting.sort_by_key(|g| (g.created_at, g.id));
        Ok(waiting)
    }

    async fn insert_member(
        &self,
        group_id: i64,
        player_id: &str,
        position: Position,
        is_leader: bool,
    ) -> Result<Member, DomainError> {
        self.enter(StoreOp::InsertMember).await?;
        let mut tables = self.tables.write();
        if !tables.groups.contains_key(&group_id) {
            return Err(DomainError::group_not_found(group_id));
        }
        if tables
            .members
            .values()
            .any(|m| m.group_id == group_id && m.player_id == player_id)
        {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyInGroup,
                format!("player {player_id} is already in group {group_id}"),
            ));
        }
        tables.next_member_id += 1;
        let member = Member {
            id: tables.next_member_id,
            group_id,
            player_id: player_id.to_string(),
            position,
            is_leader,
            joined_at: OffsetDateTime::now_utc(),
        };
        tables.members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn find_member(
        &self,
        group_id: i64,
        player_id: &str,
    ) -> Result<Option<Member>, DomainError> {
        self.enter(StoreOp::FindMember).await?;
        Ok(self
            .tables
            .read()
            .members
            .values()
            .find(|m| m.group_id == group_id && m.player_id == player_id)
            .cloned())
    }

    async fn find_memberships(&self, player_id: &str) -> Result<Vec<Member>, DomainError> {
        self.enter(StoreOp::FindMemberships).await?;
        let tables = self.tables.read();
        Ok(sorted_members(
            tables.members.values().filter(|m| m.player_id == player_id),
        ))
    }

    async fn delete_member(&self, group_id: i64, player_id: &str) -> Result<bool, DomainError> {
        self.enter(StoreOp::DeleteMember).await?;
        let mut tables = self.tables.write();
        let before = tables.members.len();
        tables
            .members
            .retain(|_, m| !(m.group_id == group_id && m.player_id == player_id));
        Ok(tables.members.len() < before)
    }

    async fn list_members(&self, group_id: i64) -> Result<Vec<Member>, DomainError> {
        self.enter(StoreOp::ListMembers).await?;
        let tables = self.tables.read();
        Ok(sorted_members(
            tables.members.values().filter(|m| m.group_id == group_id),
        ))
    }

    async fn update_role_counts(
        &self,
        group_id: i64,
        delta: RoleDelta,
    ) -> Result<(), DomainError> {
        self.enter(StoreOp::UpdateRoleCounts).await?;
        let mut tables = self.tables.write();
        let group = tables.group_mut(group_id)?;
        group.counts = group.counts.apply(&delta);
        group.total_members = (i16::from(group.total_members) + i16::from(delta.total)).max(0) as u8;
        Ok(())
    }

    async fn update_member_position(
        &self,
        member_id: i64,
        position: Position,
    ) -> Result<(), DomainError> {
        self.enter(StoreOp::UpdateMemberPosition).await?;
        self.tables.write().member_mut(member_id)?.position = position;
        Ok(())
    }

    async fn set_member_leader(&self, member_id: i64, is_leader: bool) -> Result<(), DomainError> {
        self.enter(StoreOp::SetMemberLeader).await?;
        self.tables.write().member_mut(member_id)?.is_leader = is_leader;
        Ok(())
    }

    async fn set_group_status(
        &self,
        group_id: i64,
        status: GroupStatus,
        matched_at: Option<OffsetDateTime>,
    ) -> Result<(), DomainError> {
        self.enter(StoreOp::SetGroupStatus).await?;
        let mut tables = self.tables.write();
        let group = tables.group_mut(group_id)?;
        group.status = status;
        group.matched_at = matched_at;
        Ok(())
    }

    async fn set_group_leader(&self, group_id: i64, leader_id: &str) -> Result<(), DomainError> {
        self.enter(StoreOp::SetGroupLeader).await?;
        self.tables.write().group_mut(group_id)?.leader_id = leader_id.to_string();
        Ok(())
    }

    async fn delete_group(&self, group_id: i64) -> Result<(), DomainError> {
        self.enter(StoreOp::DeleteGroup).await?;
        let mut tables = self.tables.write();
        tables.members.retain(|_, m| m.group_id != group_id);
        tables.groups.remove(&group_id);
        Ok(())
    }
}
