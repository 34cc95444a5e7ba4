use lfg_backend::adapters::groups_sea::{self, CountsDelta, GroupCreate};
use lfg_backend::entities::groups;
use lfg_backend::{bootstrap_db, DbProfile};
use sea_orm::DbErr;
use time::OffsetDateTime;

fn lone_tank(leader: &str) -> GroupCreate {
    GroupCreate {
        leader_player_id: leader.to_string(),
        tank_count: 1,
        damage_count: 0,
        support_count: 0,
        total_members: 1,
    }
}

#[tokio::test]
async fn test_create_and_find_group() -> Result<(), Box<dyn std::error::Error>> {
    let db = bootstrap_db(&DbProfile::InMemory).await?;

    let created = groups_sea::create_group(&db, lone_tank("alice")).await?;
    assert_eq!(created.status, groups::GroupStatus::Waiting);
    assert_eq!(created.matched_at, None);

    let found = groups_sea::find_by_id(&db, created.id)
        .await?
        .expect("group row");
    assert_eq!(found, created);
    assert!(groups_sea::find_by_id(&db, created.id + 1).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_find_waiting_is_oldest_first() -> Result<(), Box<dyn std::error::Error>> {
    let db = bootstrap_db(&DbProfile::InMemory).await?;

    let a = groups_sea::create_group(&db, lone_tank("a")).await?;
    let b = groups_sea::create_group(&db, lone_tank("b")).await?;
    let c = groups_sea::create_group(&db, lone_tank("c")).await?;
    groups_sea::set_status(
        &db,
        b.id,
        groups::GroupStatus::Matched,
        Some(OffsetDateTime::now_utc()),
    )
    .await?;

    let ids: Vec<i64> = groups_sea::find_waiting(&db)
        .await?
        .into_iter()
        .map(|g| g.id)
        .collect();
    assert_eq!(ids, vec![a.id, c.id]);
    Ok(())
}

#[tokio::test]
async fn test_counts_delta_is_one_update() -> Result<(), DbErr> {
    let db = bootstrap_db(&DbProfile::InMemory)
        .await
        .map_err(|e| DbErr::Custom(e.to_string()))?;
    let group = groups_sea::create_group(&db, lone_tank("lead")).await?;

    let touched = groups_sea::apply_counts_delta(
        &db,
        group.id,
        CountsDelta {
            tank: 0,
            damage: 1,
            support: 0,
            total: 1,
        },
    )
    .await?;
    assert_eq!(touched, 1);

    // Flex resolution: role up, total unchanged.
    groups_sea::apply_counts_delta(
        &db,
        group.id,
        CountsDelta {
            tank: 0,
            damage: 0,
            support: 1,
            total: 0,
        },
    )
    .await?;

    let row = groups_sea::find_by_id(&db, group.id)
        .await?
        .ok_or(DbErr::RecordNotFound("group".into()))?;
    assert_eq!(
        (row.tank_count, row.damage_count, row.support_count, row.total_members),
        (1, 1, 1, 2)
    );

    let missing = groups_sea::apply_counts_delta(&db, group.id + 100, CountsDelta::default()).await?;
    assert_eq!(missing, 0);
    Ok(())
}

#[tokio::test]
async fn test_set_leader_and_delete() -> Result<(), Box<dyn std::error::Error>> {
    let db = bootstrap_db(&DbProfile::InMemory).await?;
    let group = groups_sea::create_group(&db, lone_tank("old")).await?;

    assert_eq!(groups_sea::set_leader(&db, group.id, "new").await?, 1);
    let row = groups_sea::find_by_id(&db, group.id).await?.expect("group row");
    assert_eq!(row.leader_player_id, "new");

    assert_eq!(groups_sea::delete_group(&db, group.id).await?, 1);
    assert_eq!(groups_sea::delete_group(&db, group.id).await?, 0);
    assert!(groups_sea::find_by_id(&db, group.id).await?.is_none());
    Ok(())
}
