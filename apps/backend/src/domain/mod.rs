//! Domain layer: role-queue group types and pure helpers.

pub mod composition;
pub mod flex;
pub mod group;
pub mod roles;

// Re-exports for ergonomics
pub use composition::{RoleCounts, RoleDelta};
pub use flex::{plan_flex_resolution, FlexAssignment};
pub use group::{Group, GroupSnapshot, GroupStatus, Member, QueueStats};
pub use roles::{Position, Role, GROUP_SIZE};
