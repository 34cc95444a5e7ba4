use std::sync::Arc;

use lfg_backend::domain::{GroupStatus, Position, Role, RoleCounts};
use lfg_backend::{AdmissionMode, InMemoryGroupStore, StoreOp};

use crate::support::{build_test_state, fill_group, group_with, memory_state};

/// Positions in join order after a Flex-heavy group fills.
async fn resolved_positions() -> Result<Vec<Position>, Box<dyn std::error::Error>> {
    let store = Arc::new(InMemoryGroupStore::new());
    let state = memory_state(AdmissionMode::Serialized, store).await?;
    let (group, _) = group_with(
        &state.formation,
        Position::Flex,
        &[
            Position::TANK,
            Position::Flex,
            Position::Flex,
            Position::DAMAGE,
        ],
    )
    .await?;

    let snapshot = state.formation.snapshot(group.id).await?;
    assert_eq!(snapshot.group.status, GroupStatus::Matched);
    assert!(snapshot.check_invariants().is_empty());
    Ok(snapshot.members.iter().map(|m| m.position).collect())
}

#[tokio::test]
async fn test_seeded_flex_resolution_is_reproducible() -> Result<(), Box<dyn std::error::Error>> {
    let first = resolved_positions().await?;
    let second = resolved_positions().await?;
    assert_eq!(first, second);

    // The three Flex members cover exactly the open Damage and Support slots.
    let mut flex_roles: Vec<Role> = [0, 2, 3]
        .iter()
        .filter_map(|&i| first[i].role())
        .collect();
    flex_roles.sort();
    assert_eq!(flex_roles, vec![Role::Damage, Role::Support, Role::Support]);
    assert_eq!(first[1], Position::TANK);
    assert_eq!(first[4], Position::DAMAGE);
    Ok(())
}

#[tokio::test]
async fn test_force_check_on_partial_group() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (group, _) = group_with(
        &state.formation,
        Position::TANK,
        &[Position::DAMAGE, Position::Flex],
    )
    .await?;

    let check = state.formation.force_check_complete(group.id).await?;
    assert!(!check.matched);
    assert_eq!(check.status, GroupStatus::Waiting);
    assert_eq!(check.member_count, 3);

    let snapshot = state.formation.snapshot(group.id).await?;
    assert_eq!(snapshot.flex_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_force_check_on_matched_group() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (group, _) = fill_group(&state.formation).await?;

    let check = state.formation.force_check_complete(group.id).await?;
    assert!(check.matched);
    assert_eq!(check.status, GroupStatus::Matched);
    assert_eq!(check.member_count, 5);
    Ok(())
}

#[tokio::test]
async fn test_force_check_finishes_interrupted_completion() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(InMemoryGroupStore::new());
    let state = memory_state(AdmissionMode::Serialized, store.clone()).await?;
    let (group, _) = group_with(
        &state.formation,
        Position::TANK,
        &[Position::DAMAGE, Position::DAMAGE, Position::SUPPORT],
    )
    .await?;

    // The fifth admission lands but the status flip fails.
    store.fail_on(StoreOp::SetGroupStatus);
    let err = state
        .formation
        .admit_flex(group.id, "late-flex")
        .await
        .unwrap_err();
    assert!(err.is_infra());

    let stuck = state.formation.snapshot(group.id).await?;
    assert_eq!(stuck.group.status, GroupStatus::Waiting);
    assert_eq!(stuck.group.total_members, 5);
    assert_eq!(stuck.group.counts, RoleCounts::new(1, 2, 2));

    let check = state.formation.force_check_complete(group.id).await?;
    assert!(check.matched);
    assert_eq!(check.member_count, 5);

    let snapshot = state.formation.snapshot(group.id).await?;
    assert_eq!(snapshot.group.status, GroupStatus::Matched);
    assert!(snapshot.check_invariants().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_force_check_unknown_group() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let err = state.formation.force_check_complete(424_242).await.unwrap_err();
    assert_eq!(err.code(), lfg_backend::ErrorCode::GroupNotFound);
    Ok(())
}
