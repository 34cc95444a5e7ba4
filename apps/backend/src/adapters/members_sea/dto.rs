//! DTOs for members_sea adapter.

use crate::entities::group_members::MemberPosition;

/// DTO for inserting a member row.
#[derive(Debug, Clone)]
pub struct MemberCreate {
    pub group_id: i64,
    pub player_id: String,
    pub position: MemberPosition,
    pub is_leader: bool,
}
