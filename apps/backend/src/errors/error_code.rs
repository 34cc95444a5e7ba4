//! Error codes for the group formation core.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE. The API layer surfaces them
//! verbatim so every domain failure stays observable and unambiguous.

use core::fmt;

use super::domain::{ConflictKind, DomainError, ForbiddenKind, InfraErrorKind, NotFoundKind};

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Resource Not Found
    /// Group does not exist (never created, or deleted after emptying)
    GroupNotFound,
    /// Player has no membership in the group
    MemberNotFound,
    /// General not found error
    NotFound,

    // Slot Conflicts
    /// Requested role is at capacity
    RoleFull,
    /// Group already has five members
    GroupFull,
    /// Group reached the terminal Matched state
    AlreadyMatched,
    /// Player already holds a row in the group
    AlreadyInGroup,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // Leadership
    /// Requester is not the group leader
    NotLeader,
    /// Leader cannot be kicked
    CannotKickLeader,
    /// Leader tried to kick themselves
    SelfKick,

    // Request Validation
    /// General validation error
    ValidationError,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Data corruption detected
    DataCorruption,
    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GroupNotFound => "GROUP_NOT_FOUND",
            Self::MemberNotFound => "MEMBER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::RoleFull => "ROLE_FULL",
            Self::GroupFull => "GROUP_FULL",
            Self::AlreadyMatched => "ALREADY_MATCHED",
            Self::AlreadyInGroup => "ALREADY_IN_GROUP",
            Self::Conflict => "CONFLICT",

            Self::NotLeader => "NOT_LEADER",
            Self::CannotKickLeader => "CANNOT_KICK_LEADER",
            Self::SelfKick => "SELF_KICK",

            Self::ValidationError => "VALIDATION_ERROR",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(_) => Self::ValidationError,
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Group => Self::GroupNotFound,
                NotFoundKind::Member => Self::MemberNotFound,
                NotFoundKind::Other(_) => Self::NotFound,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::RoleFull(_) => Self::RoleFull,
                ConflictKind::GroupFull => Self::GroupFull,
                ConflictKind::AlreadyMatched => Self::AlreadyMatched,
                ConflictKind::AlreadyInGroup => Self::AlreadyInGroup,
                ConflictKind::Other(_) => Self::Conflict,
            },
            DomainError::Forbidden(kind, _) => match kind {
                ForbiddenKind::NotLeader => Self::NotLeader,
                ForbiddenKind::CannotKickLeader => Self::CannotKickLeader,
                ForbiddenKind::SelfKick => Self::SelfKick,
            },
            DomainError::Infra(kind, _) => match kind {
                InfraErrorKind::Timeout => Self::DbTimeout,
                InfraErrorKind::DbUnavailable => Self::DbUnavailable,
                InfraErrorKind::DataCorruption => Self::DataCorruption,
                InfraErrorKind::Injected | InfraErrorKind::Other(_) => Self::DbError,
            },
        }
    }
}

impl DomainError {
    /// Error code for this failure.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::from(self)
    }
}
