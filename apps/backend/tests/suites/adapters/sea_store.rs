use lfg_backend::domain::{GroupStatus, Position, Role, RoleCounts, RoleDelta};
use lfg_backend::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use lfg_backend::{bootstrap_db, DbProfile, GroupStore, SeaGroupStore};
use time::OffsetDateTime;

use crate::support::{fill_group, group_with, player, sqlite_state};

async fn store() -> Result<SeaGroupStore, Box<dyn std::error::Error>> {
    Ok(SeaGroupStore::new(bootstrap_db(&DbProfile::InMemory).await?))
}

#[tokio::test]
async fn test_store_round_trips_domain_types() -> Result<(), Box<dyn std::error::Error>> {
    let store = store().await?;
    let group = store
        .create_group("lead", RoleCounts::for_leader(Position::SUPPORT), 1)
        .await?;
    store
        .insert_member(group.id, "lead", Position::SUPPORT, true)
        .await?;
    let flex = store
        .insert_member(group.id, "flex", Position::Flex, false)
        .await?;
    store
        .update_role_counts(group.id, RoleDelta::join(Position::Flex))
        .await?;

    let loaded = store.get_group(group.id).await?.expect("group");
    assert_eq!(loaded.counts, RoleCounts::new(0, 0, 1));
    assert_eq!(loaded.total_members, 2);
    assert_eq!(loaded.status, GroupStatus::Waiting);

    store
        .update_member_position(flex.id, Position::TANK)
        .await?;
    store
        .update_role_counts(group.id, RoleDelta::resolve(Role::Tank))
        .await?;
    let loaded = store.get_group(group.id).await?.expect("group");
    assert_eq!(loaded.counts, RoleCounts::new(1, 0, 1));
    assert_eq!(loaded.total_members, 2);

    let members = store.list_members(group.id).await?;
    assert_eq!(members[1].position, Position::TANK);
    Ok(())
}

#[tokio::test]
async fn test_store_maps_constraint_errors() -> Result<(), Box<dyn std::error::Error>> {
    let store = store().await?;
    let group = store.create_group("lead", RoleCounts::default(), 1).await?;
    store
        .insert_member(group.id, "lead", Position::Flex, true)
        .await?;

    let dup = store
        .insert_member(group.id, "lead", Position::TANK, false)
        .await
        .unwrap_err();
    assert!(matches!(
        dup,
        DomainError::Conflict(ConflictKind::AlreadyInGroup, _)
    ));

    let orphan = store
        .insert_member(group.id + 50, "ghost", Position::TANK, false)
        .await
        .unwrap_err();
    assert!(matches!(orphan, DomainError::NotFound(NotFoundKind::Group, _)));

    let missing = store
        .update_role_counts(group.id + 50, RoleDelta::join(Position::TANK))
        .await
        .unwrap_err();
    assert!(matches!(missing, DomainError::NotFound(NotFoundKind::Group, _)));

    let missing_member = store.set_member_leader(9_999, true).await.unwrap_err();
    assert!(matches!(
        missing_member,
        DomainError::NotFound(NotFoundKind::Member, _)
    ));
    Ok(())
}

#[tokio::test]
async fn test_store_status_and_deletion() -> Result<(), Box<dyn std::error::Error>> {
    let store = store().await?;
    let group = store.create_group("lead", RoleCounts::default(), 1).await?;
    store
        .insert_member(group.id, "lead", Position::Flex, true)
        .await?;

    store
        .set_group_status(group.id, GroupStatus::Matched, Some(OffsetDateTime::now_utc()))
        .await?;
    assert!(store.list_waiting_groups().await?.is_empty());
    let matched = store.get_group(group.id).await?.expect("group");
    assert!(matched.is_matched());
    assert!(matched.matched_at.is_some());

    store.delete_group(group.id).await?;
    assert!(store.get_group(group.id).await?.is_none());
    assert!(store.list_members(group.id).await?.is_empty());
    assert!(!store.delete_member(group.id, "lead").await?);
    Ok(())
}

#[tokio::test]
async fn test_engine_over_sqlite() -> Result<(), Box<dyn std::error::Error>> {
    let state = sqlite_state().await?;

    let (group, _) = fill_group(&state.formation).await?;
    let snapshot = state.formation.snapshot(group.id).await?;
    assert_eq!(snapshot.group.status, GroupStatus::Matched);
    assert!(snapshot.check_invariants().is_empty());

    let (flexy, players) = group_with(
        &state.formation,
        Position::Flex,
        &[Position::TANK, Position::DAMAGE],
    )
    .await?;
    let err = state
        .formation
        .admit_member(flexy.id, &player("tank"), Role::Tank)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::role_full(Role::Tank));

    let outcome = state.formation.leave_group(flexy.id, &players[0]).await?;
    assert_eq!(outcome.new_leader.as_deref(), Some(players[1].as_str()));

    let snapshot = state.formation.snapshot(flexy.id).await?;
    assert_eq!(snapshot.group.counts, RoleCounts::new(1, 1, 0));
    assert_eq!(snapshot.group.total_members, 2);
    assert!(snapshot.check_invariants().is_empty());
    Ok(())
}
