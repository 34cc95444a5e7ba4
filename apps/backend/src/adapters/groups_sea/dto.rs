//! DTOs for groups_sea adapter.

/// DTO for inserting a group row.
#[derive(Debug, Clone)]
pub struct GroupCreate {
    pub leader_player_id: String,
    pub tank_count: i16,
    pub damage_count: i16,
    pub support_count: i16,
    pub total_members: i16,
}

/// Signed adjustments applied to the count columns in one UPDATE.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountsDelta {
    pub tank: i16,
    pub damage: i16,
    pub support: i16,
    pub total: i16,
}
