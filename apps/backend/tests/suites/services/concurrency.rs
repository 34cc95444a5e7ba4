//! Two joiners racing for the same slot, and many joiners at once.
//!
//! The in-memory store yields before every call, so two admissions driven by
//! `tokio::join!` on one task advance one store call at a time in lockstep.

use std::sync::Arc;

use futures::future::join_all;
use lfg_backend::domain::{Position, Role, RoleCounts};
use lfg_backend::errors::domain::{ConflictKind, DomainError};
use lfg_backend::{AdmissionMode, InMemoryGroupStore};

use crate::support::{fill_group, group_with, memory_state, player};

#[tokio::test]
async fn test_serialized_mode_admits_one_tank() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(InMemoryGroupStore::new().with_interleaving());
    let state = memory_state(AdmissionMode::Serialized, store.clone()).await?;
    let (group, _) = group_with(&state.formation, Position::DAMAGE, &[]).await?;

    let (a, b) = (player("tank"), player("tank"));
    let (first, second) = tokio::join!(
        state.formation.admit_member(group.id, &a, Role::Tank),
        state.formation.admit_member(group.id, &b, Role::Tank),
    );

    let failures: Vec<DomainError> = [first, second]
        .into_iter()
        .filter_map(Result::err)
        .collect();
    assert_eq!(failures, vec![DomainError::role_full(Role::Tank)]);

    let snapshot = state.formation.snapshot(group.id).await?;
    assert_eq!(snapshot.group.counts, RoleCounts::new(1, 1, 0));
    assert_eq!(snapshot.members.len(), 2);
    assert!(snapshot.check_invariants().is_empty());
    assert_eq!(store.member_rows(), 2);
    Ok(())
}

#[tokio::test]
async fn test_optimistic_mode_lets_both_tanks_in() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(InMemoryGroupStore::new().with_interleaving());
    let state = memory_state(AdmissionMode::Optimistic, store.clone()).await?;
    let (group, _) = group_with(&state.formation, Position::DAMAGE, &[]).await?;

    let (a, b) = (player("tank"), player("tank"));
    let (first, second) = tokio::join!(
        state.formation.admit_member(group.id, &a, Role::Tank),
        state.formation.admit_member(group.id, &b, Role::Tank),
    );
    assert!(first.is_ok());
    assert!(second.is_ok());

    // Both re-reads ran before either count update landed.
    let snapshot = state.formation.snapshot(group.id).await?;
    assert_eq!(snapshot.group.counts.tank, 2);
    assert_eq!(snapshot.count_of(Role::Tank), 2);
    assert!(!snapshot.check_invariants().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_optimistic_mode_still_rejects_sequential_overflow(
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(InMemoryGroupStore::new());
    let state = memory_state(AdmissionMode::Optimistic, store).await?;
    let (group, _) = group_with(&state.formation, Position::TANK, &[]).await?;

    let err = state
        .formation
        .admit_member(group.id, &player("tank"), Role::Tank)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::RoleFull(Role::Tank), _)
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_serialized_queue_keeps_every_group_consistent(
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(InMemoryGroupStore::new().with_interleaving());
    let state = memory_state(AdmissionMode::Serialized, store.clone()).await?;

    let positions = [
        Position::TANK,
        Position::DAMAGE,
        Position::DAMAGE,
        Position::SUPPORT,
        Position::SUPPORT,
        Position::Flex,
    ];
    let handles = (0..60).map(|n| {
        let matching = state.matching.clone();
        let position = positions[n % positions.len()];
        tokio::spawn(async move { matching.queue(&format!("racer-{n}"), position).await })
    });

    for result in join_all(handles).await {
        result??;
    }

    let groups = store.all_groups();
    let mut placed = 0;
    for group in &groups {
        let snapshot = state.formation.snapshot(group.id).await?;
        let problems = snapshot.check_invariants();
        assert!(problems.is_empty(), "group {}: {problems:?}", group.id);
        placed += snapshot.members.len();
    }
    assert_eq!(placed, 60);
    assert_eq!(store.member_rows(), 60);
    assert_eq!(state.formation.lock_entries(), 0);
    Ok(())
}

#[tokio::test]
async fn test_lock_entries_do_not_outlive_calls() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(InMemoryGroupStore::new());
    let state = memory_state(AdmissionMode::Serialized, store).await?;

    for _ in 0..5 {
        let (group, _) = fill_group(&state.formation).await?;
        assert!(state.formation.snapshot(group.id).await?.group.is_matched());
    }
    for missing in 1000..1020 {
        let err = state
            .formation
            .admit_member(missing, &player("dps"), Role::Damage)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(..)));
        assert!(state.formation.kick_member(missing, "lead", "dps").await.is_err());
        assert!(state.formation.force_check_complete(missing).await.is_err());
    }
    let (solo, players) = group_with(&state.formation, Position::TANK, &[]).await?;
    assert!(state.formation.leave_group(solo.id, &players[0]).await?.group_deleted);

    assert_eq!(state.formation.lock_entries(), 0);
    Ok(())
}
