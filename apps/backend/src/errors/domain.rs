//! Domain-level error type used across services and adapters.
//!
//! This error type is transport- and DB-agnostic. Callers translate it to
//! their own response shape through [`crate::errors::ErrorCode`].

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::Role;

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    DataCorruption,
    /// Failure injected by a test store
    Injected,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Group,
    Member,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// The requested role is already at capacity
    RoleFull(Role),
    /// The group already holds five members
    GroupFull,
    /// The group reached its terminal state
    AlreadyMatched,
    /// The player already has a row in this group
    AlreadyInGroup,
    Other(String),
}

/// Leadership/authorization failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenKind {
    NotLeader,
    CannotKickLeader,
    SelfKick,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation (unknown position, bad config value)
    Validation(String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Leadership rules
    Forbidden(ForbiddenKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(d) => write!(f, "validation error: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Forbidden(kind, d) => write!(f, "forbidden {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn forbidden(kind: ForbiddenKind, detail: impl Into<String>) -> Self {
        Self::Forbidden(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    pub fn group_not_found(group_id: i64) -> Self {
        Self::not_found(NotFoundKind::Group, format!("group {group_id} not found"))
    }

    pub fn member_not_found(group_id: i64, player_id: &str) -> Self {
        Self::not_found(
            NotFoundKind::Member,
            format!("player {player_id} is not a member of group {group_id}"),
        )
    }

    pub fn role_full(role: Role) -> Self {
        Self::conflict(ConflictKind::RoleFull(role), format!("{role} slots are full"))
    }

    pub fn group_full(group_id: i64) -> Self {
        Self::conflict(ConflictKind::GroupFull, format!("group {group_id} is full"))
    }

    pub fn already_matched(group_id: i64) -> Self {
        Self::conflict(
            ConflictKind::AlreadyMatched,
            format!("group {group_id} is already matched"),
        )
    }

    /// True for failures the store reported, as opposed to domain rule violations.
    pub fn is_infra(&self) -> bool {
        matches!(self, DomainError::Infra(..))
    }
}
