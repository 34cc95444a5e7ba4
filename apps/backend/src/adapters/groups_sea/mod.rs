//! SeaORM adapter for the `groups` table.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::groups;

pub mod dto;

pub use dto::{CountsDelta, GroupCreate};

// Adapter functions return DbErr; the store maps to DomainError.

pub async fn create_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GroupCreate,
) -> Result<groups::Model, sea_orm::DbErr> {
    let group_active = groups::ActiveModel {
        id: NotSet,
        leader_player_id: Set(dto.leader_player_id),
        tank_count: Set(dto.tank_count),
        damage_count: Set(dto.damage_count),
        support_count: Set(dto.support_count),
        total_members: Set(dto.total_members),
        status: Set(groups::GroupStatus::Waiting),
        created_at: Set(OffsetDateTime::now_utc()),
        matched_at: Set(None),
    };

    group_active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<Option<groups::Model>, sea_orm::DbErr> {
    groups::Entity::find_by_id(group_id).one(conn).await
}

pub async fn find_waiting<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<groups::Model>, sea_orm::DbErr> {
    groups::Entity::find()
        .filter(groups::Column::Status.eq(groups::GroupStatus::Waiting))
        .order_by_asc(groups::Column::CreatedAt)
        .order_by_asc(groups::Column::Id)
        .all(conn)
        .await
}

/// Single `UPDATE groups SET col = col + delta ...` statement.
///
/// Returns the number of rows touched (0 when the group is gone).
pub async fn apply_counts_delta<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    delta: CountsDelta,
) -> Result<u64, sea_orm::DbErr> {
    let result = groups::Entity::update_many()
        .col_expr(
            groups::Column::TankCount,
            Expr::col(groups::Column::TankCount).add(delta.tank),
        )
        .col_expr(
            groups::Column::DamageCount,
            Expr::col(groups::Column::DamageCount).add(delta.damage),
        )
        .col_expr(
            groups::Column::SupportCount,
            Expr::col(groups::Column::SupportCount).add(delta.support),
        )
        .col_expr(
            groups::Column::TotalMembers,
            Expr::col(groups::Column::TotalMembers).add(delta.total),
        )
        .filter(groups::Column::Id.eq(group_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn set_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    status: groups::GroupStatus,
    matched_at: Option<OffsetDateTime>,
) -> Result<u64, sea_orm::DbErr> {
    let result = groups::Entity::update_many()
        .col_expr(groups::Column::Status, Expr::value(status))
        .col_expr(groups::Column::MatchedAt, Expr::value(matched_at))
        .filter(groups::Column::Id.eq(group_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn set_leader<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
    leader_player_id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let result = groups::Entity::update_many()
        .col_expr(
            groups::Column::LeaderPlayerId,
            Expr::value(leader_player_id.to_string()),
        )
        .filter(groups::Column::Id.eq(group_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = groups::Entity::delete_by_id(group_id).exec(conn).await?;
    Ok(result.rows_affected)
}
