//! SeaORM adapter for the `group_members` table.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::group_members;

pub mod dto;

pub use dto::MemberCreate;

pub async fn create_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MemberCreate,
) -> Result<group_members::Model, sea_orm::DbErr> {
    let member_active = group_members::ActiveModel {
        id: NotSet,
        group_id: Set(dto.group_id),
        player_id: Set(dto.player_id),
        position: Set(dto.position),
        is_leader: Set(dto.is_leader),
        joined_at: Set(time::OffsetDateTime::now_utc()),
    };

    member_active.insert(conn).await
}

pub async fn find_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    player_id: &str,
) -> Result<Option<group_members::Model>, sea_orm::DbErr> {
    group_members::Entity::find()
        .filter(group_members::Column::GroupId.eq(group_id))
        .filter(group_members::Column::PlayerId.eq(player_id))
        .one(conn)
        .await
}

/// Members in join order; id breaks ties between equal timestamps.
pub async fn find_all_by_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<Vec<group_members::Model>, sea_orm::DbErr> {
    group_members::Entity::find()
        .filter(group_members::Column::GroupId.eq(group_id))
        .order_by_asc(group_members::Column::JoinedAt)
        .order_by_asc(group_members::Column::Id)
        .all(conn)
        .await
}

pub async fn find_all_by_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: &str,
) -> Result<Vec<group_members::Model>, sea_orm::DbErr> {
    group_members::Entity::find()
        .filter(group_members::Column::PlayerId.eq(player_id))
        .order_by_asc(group_members::Column::JoinedAt)
        .order_by_asc(group_members::Column::Id)
        .all(conn)
        .await
}

pub async fn delete_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    player_id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let result = group_members::Entity::delete_many()
        .filter(group_members::Column::GroupId.eq(group_id))
        .filter(group_members::Column::PlayerId.eq(player_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_all_by_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = group_members::Entity::delete_many()
        .filter(group_members::Column::GroupId.eq(group_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn set_position<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
    position: group_members::MemberPosition,
) -> Result<u64, sea_orm::DbErr> {
    let result = group_members::Entity::update_many()
        .col_expr(group_members::Column::Position, Expr::value(position))
        .filter(group_members::Column::Id.eq(member_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn set_leader_flag<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
    is_leader: bool,
) -> Result<u64, sea_orm::DbErr> {
    let result = group_members::Entity::update_many()
        .col_expr(group_members::Column::IsLeader, Expr::value(is_leader))
        .filter(group_members::Column::Id.eq(member_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
