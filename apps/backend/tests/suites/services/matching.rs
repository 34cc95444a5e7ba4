use lfg_backend::domain::{Position, QueueStats, Role, RoleCounts};
use lfg_backend::errors::domain::{ConflictKind, DomainError};
use lfg_backend::{ErrorCode, QueueOutcome};

use crate::support::{build_test_state, fill_group, group_with, player};

#[tokio::test]
async fn test_joins_oldest_group_with_room() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (older, _) = group_with(&state.formation, Position::TANK, &[]).await?;
    let (newer, _) = group_with(&state.formation, Position::SUPPORT, &[]).await?;

    let outcome = state
        .matching
        .find_group_and_join(&player("dps"), Position::DAMAGE)
        .await?;
    assert!(outcome.joined);
    assert_eq!(outcome.group_id, Some(older.id));
    assert_eq!(outcome.assigned_role, Some(Role::Damage));

    // The older group has no Tank slot left, so the next Tank goes to the newer one.
    let outcome = state
        .matching
        .find_group_and_join(&player("tank"), Position::TANK)
        .await?;
    assert_eq!(outcome.group_id, Some(newer.id));
    Ok(())
}

#[tokio::test]
async fn test_no_room_means_not_joined() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    group_with(&state.formation, Position::TANK, &[]).await?;

    let outcome = state
        .matching
        .find_group_and_join(&player("tank"), Position::TANK)
        .await?;
    assert!(!outcome.joined);
    assert_eq!(outcome.group_id, None);
    assert_eq!(outcome.assigned_role, None);
    Ok(())
}

#[tokio::test]
async fn test_flex_takes_first_open_role() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (tank_led, _) = group_with(&state.formation, Position::TANK, &[]).await?;

    let outcome = state
        .matching
        .find_group_and_join(&player("flex"), Position::Flex)
        .await?;
    assert_eq!(outcome.group_id, Some(tank_led.id));
    assert_eq!(outcome.assigned_role, Some(Role::Damage));

    let snapshot = state.formation.snapshot(tank_led.id).await?;
    assert_eq!(snapshot.group.counts, RoleCounts::new(1, 1, 0));
    assert_eq!(snapshot.flex_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_waiting_member_cannot_join_another_group() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (first, players) = group_with(&state.formation, Position::TANK, &[]).await?;
    let (second, _) = group_with(&state.formation, Position::SUPPORT, &[]).await?;

    for position in [Position::Flex, Position::DAMAGE] {
        let err = state
            .matching
            .find_group_and_join(&players[0], position)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Conflict(ConflictKind::AlreadyInGroup, _)
        ));
        assert_eq!(err.code(), ErrorCode::AlreadyInGroup);
    }

    assert_eq!(state.formation.snapshot(first.id).await?.members.len(), 1);
    assert_eq!(state.formation.snapshot(second.id).await?.members.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_queue_refuses_player_already_waiting() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    group_with(&state.formation, Position::TANK, &[]).await?;
    let (_, players) = group_with(&state.formation, Position::DAMAGE, &[]).await?;

    // Room for Damage in the older group, but the player already waits in the newer one.
    let err = state
        .matching
        .queue(&players[0], Position::DAMAGE)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyInGroup, _)
    ));

    let waiting = state.matching.list_waiting_groups().await?;
    assert_eq!(waiting.len(), 2);
    assert!(waiting.iter().all(|g| g.total_members == 1));
    Ok(())
}

#[tokio::test]
async fn test_matched_member_can_queue_again() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (matched, players) = fill_group(&state.formation).await?;
    assert!(state.formation.snapshot(matched.id).await?.group.is_matched());

    let outcome = state.matching.queue(&players[1], Position::DAMAGE).await?;
    let group = match outcome {
        QueueOutcome::Created { group } => group,
        other => panic!("expected a new group, got {other:?}"),
    };
    assert_ne!(group.id, matched.id);
    assert_eq!(group.leader_id, players[1]);
    Ok(())
}

#[tokio::test]
async fn test_queue_creates_when_nothing_fits() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;

    let first = player("tank");
    let group = match state.matching.queue(&first, Position::TANK).await? {
        QueueOutcome::Created { group } => group,
        other => panic!("expected a new group, got {other:?}"),
    };
    assert_eq!(group.leader_id, first);

    let joined = state.matching.queue(&player("dps"), Position::DAMAGE).await?;
    assert_eq!(
        joined,
        QueueOutcome::Joined {
            group_id: group.id,
            role: Role::Damage
        }
    );

    let second_tank = state.matching.queue(&player("tank"), Position::TANK).await?;
    assert!(matches!(second_tank, QueueOutcome::Created { .. }));
    assert_eq!(state.matching.list_waiting_groups().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_queue_fills_groups_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let positions = [
        Position::TANK,
        Position::DAMAGE,
        Position::Flex,
        Position::SUPPORT,
        Position::SUPPORT,
        Position::TANK,
    ];
    for position in positions {
        state.matching.queue(&player("p"), position).await?;
    }

    let waiting = state.matching.list_waiting_groups().await?;
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0].counts, RoleCounts::new(1, 0, 0));

    let stats = state.matching.queue_stats().await?;
    assert_eq!(stats.total_waiting_groups, 1);
    Ok(())
}

#[tokio::test]
async fn test_queue_stats_count_groups_with_room() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    assert_eq!(state.matching.queue_stats().await?, QueueStats::default());

    group_with(&state.formation, Position::TANK, &[Position::DAMAGE]).await?;
    group_with(&state.formation, Position::DAMAGE, &[Position::DAMAGE]).await?;
    group_with(&state.formation, Position::Flex, &[]).await?;

    let stats = state.matching.queue_stats().await?;
    assert_eq!(stats.total_waiting_groups, 3);
    assert_eq!(stats.tank_needed, 2);
    assert_eq!(stats.damage_needed, 2);
    assert_eq!(stats.support_needed, 3);
    assert_eq!(stats.needed(Role::Support), 3);
    Ok(())
}

#[tokio::test]
async fn test_matchable_groups_filter_and_limit() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let (a, _) = group_with(&state.formation, Position::TANK, &[Position::DAMAGE]).await?;
    let (b, _) = group_with(&state.formation, Position::DAMAGE, &[]).await?;
    let (c, _) = group_with(&state.formation, Position::SUPPORT, &[]).await?;

    let tanks = state
        .matching
        .find_matchable_groups(Position::TANK, None)
        .await?;
    let ids: Vec<i64> = tanks.iter().map(|s| s.group.id).collect();
    assert_eq!(ids, vec![b.id, c.id]);

    let any = state
        .matching
        .find_matchable_groups(Position::Flex, Some(2))
        .await?;
    let ids: Vec<i64> = any.iter().map(|s| s.group.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
    assert_eq!(any[0].members.len(), 2);
    Ok(())
}
