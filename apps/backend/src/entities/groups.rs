use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum GroupStatus {
    #[sea_orm(string_value = "WAITING")]
    Waiting,
    #[sea_orm(string_value = "MATCHED")]
    Matched,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "leader_player_id")]
    pub leader_player_id: String,
    #[sea_orm(column_name = "tank_count", column_type = "SmallInteger")]
    pub tank_count: i16,
    #[sea_orm(column_name = "damage_count", column_type = "SmallInteger")]
    pub damage_count: i16,
    #[sea_orm(column_name = "support_count", column_type = "SmallInteger")]
    pub support_count: i16,
    #[sea_orm(column_name = "total_members", column_type = "SmallInteger")]
    pub total_members: i16,
    pub status: GroupStatus,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "matched_at")]
    pub matched_at: Option<OffsetDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::group_members::Entity")]
    GroupMembers,
}

impl Related<super::group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
