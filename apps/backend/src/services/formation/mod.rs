//! Group formation engine - lifecycle of a single group on top of a GroupStore.
//!
//! Admission, departures and completion each live in their own module and add
//! methods to [`FormationService`]. Every public mutating method takes the
//! group's lock first when running in [`AdmissionMode::Serialized`]; the
//! `*_locked` helpers assume the caller already did.

mod admission;
mod completion;
mod departures;

use std::sync::Arc;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::formation::{AdmissionMode, FormationConfig};
use crate::domain::{Group, GroupSnapshot, Member, Position, RoleCounts};
use crate::errors::domain::{DomainError, ForbiddenKind};
use crate::infra::group_locks::{GroupLockGuard, GroupLocks};
use crate::repos::groups::GroupStore;

pub use completion::CompletionCheck;
pub use departures::{ensure_not_self_kick, LeaveOutcome};

pub struct FormationService {
    store: Arc<dyn GroupStore>,
    locks: GroupLocks,
    mode: AdmissionMode,
    rng: Mutex<ChaCha8Rng>,
}

impl FormationService {
    pub fn new(store: Arc<dyn GroupStore>, config: &FormationConfig) -> Self {
        let rng = match config.flex_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            store,
            locks: GroupLocks::new(),
            mode: config.admission_mode,
            rng: Mutex::new(rng),
        }
    }

    pub fn mode(&self) -> AdmissionMode {
        self.mode
    }

    pub fn store(&self) -> &Arc<dyn GroupStore> {
        &self.store
    }

    /// Group ids currently holding a lock entry.
    pub fn lock_entries(&self) -> usize {
        self.locks.len()
    }

    /// Hold the group's lock in serialized mode; no-op otherwise.
    async fn lock_group(&self, group_id: i64) -> Option<GroupLockGuard> {
        match self.mode {
            AdmissionMode::Serialized => Some(self.locks.acquire(group_id).await),
            AdmissionMode::Optimistic => None,
        }
    }

    async fn load_group(&self, group_id: i64) -> Result<Group, DomainError> {
        self.store
            .get_group(group_id)
            .await?
            .ok_or_else(|| DomainError::group_not_found(group_id))
    }

    /// Load a group that may still change: fails `AlreadyMatched` once terminal.
    async fn load_waiting_group(&self, group_id: i64) -> Result<Group, DomainError> {
        let group = self.load_group(group_id).await?;
        if group.is_matched() {
            return Err(DomainError::already_matched(group_id));
        }
        Ok(group)
    }

    /// Start a group with `leader_id` as its only member.
    ///
    /// A Flex leader contributes to the member total only; its role is settled
    /// when the group fills.
    pub async fn create_group(
        &self,
        leader_id: &str,
        position: Position,
    ) -> Result<Group, DomainError> {
        let group = self
            .store
            .create_group(leader_id, RoleCounts::for_leader(position), 1)
            .await?;
        self.store
            .insert_member(group.id, leader_id, position, true)
            .await?;
        info!(group_id = group.id, player_id = leader_id, position = %position, "Group created");
        Ok(group)
    }

    /// Group plus members in join order.
    pub async fn snapshot(&self, group_id: i64) -> Result<GroupSnapshot, DomainError> {
        let group = self.load_group(group_id).await?;
        let members = self.store.list_members(group_id).await?;
        debug!(group_id, members = members.len(), "Loaded group snapshot");
        Ok(GroupSnapshot { group, members })
    }

    /// The player's member row, or `MemberNotFound`.
    pub async fn require_member(
        &self,
        group_id: i64,
        player_id: &str,
    ) -> Result<Member, DomainError> {
        self.load_group(group_id).await?;
        self.store
            .find_member(group_id, player_id)
            .await?
            .ok_or_else(|| DomainError::member_not_found(group_id, player_id))
    }

    /// The player's member row if they lead the group, else `NotLeader`.
    pub async fn require_leader(
        &self,
        group_id: i64,
        player_id: &str,
    ) -> Result<Member, DomainError> {
        let member = self.require_member(group_id, player_id).await?;
        if !member.is_leader {
            return Err(DomainError::forbidden(
                ForbiddenKind::NotLeader,
                format!("player {player_id} does not lead group {group_id}"),
            ));
        }
        Ok(member)
    }
}
