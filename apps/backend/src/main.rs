use std::sync::Arc;

use clap::{Parser, ValueEnum};
use futures::future::join_all;
use lfg_backend::config::logging::LogConfig;
use lfg_backend::domain::{Position, Role};
use lfg_backend::infra::state::build_state;
use lfg_backend::{
    AdmissionMode, DbProfile, FormationConfig, GroupStore, InMemoryGroupStore, QueueOutcome,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, warn};

mod telemetry;

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Serialized,
    Optimistic,
}

impl From<Mode> for AdmissionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Serialized => AdmissionMode::Serialized,
            Mode::Optimistic => AdmissionMode::Optimistic,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Store {
    /// Process-local store; every call yields so joiners interleave
    Memory,
    /// SQLite in-memory database
    SqliteMemory,
    /// SQLite file (see --sqlite-path)
    SqliteFile,
    /// Postgres from POSTGRES_* / LFG_DB* variables
    Postgres,
}

#[derive(Parser)]
#[command(name = "lfg-sim")]
#[command(about = "Queue many players at once and report how groups formed")]
struct Args {
    /// Number of concurrent joiners
    #[arg(short, long, default_value_t = 100)]
    players: usize,

    /// Admission mode (overrides LFG_ADMISSION_MODE)
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    #[arg(short, long, value_enum, default_value = "memory")]
    store: Store,

    #[arg(long, default_value = "lfg-sim.db")]
    sqlite_path: String,

    /// Seed for player positions and Flex resolution (overrides LFG_FLEX_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Percentage of players queuing as Flex
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(0..=100))]
    flex_percent: u32,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    players: usize,
    joined: usize,
    created: usize,
    failed: usize,
    groups_matched: usize,
    groups_waiting: usize,
    invariant_violations: Vec<Violation>,
}

#[derive(Debug, Serialize)]
struct Violation {
    group_id: i64,
    problems: Vec<String>,
}

fn pick_position(rng: &mut ChaCha8Rng, flex_percent: u32) -> Position {
    if rng.random_range(0..100) < flex_percent {
        return Position::Flex;
    }
    // Queue shares roughly follow slot shares: 1 Tank : 2 Damage : 2 Support.
    match rng.random_range(0..5) {
        0 => Position::Role(Role::Tank),
        1 | 2 => Position::Role(Role::Damage),
        _ => Position::Role(Role::Support),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    match LogConfig::from_env() {
        Ok(log) => telemetry::init_tracing(&log),
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(2);
        }
    }

    let mut config = match FormationConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(2);
        }
    };
    if let Some(mode) = args.mode {
        config = config.with_mode(mode.into());
    }
    if let Some(seed) = args.seed {
        config = config.with_flex_seed(seed);
    }

    let builder = build_state().with_formation(config.clone());
    let builder = match args.store {
        Store::Memory => {
            let store: Arc<dyn GroupStore> = Arc::new(InMemoryGroupStore::new().with_interleaving());
            builder.with_store(store)
        }
        Store::SqliteMemory => builder.with_db(DbProfile::InMemory),
        Store::SqliteFile => builder.with_db(DbProfile::SqliteFile {
            path: args.sqlite_path.clone(),
        }),
        Store::Postgres => builder.with_db(DbProfile::Postgres),
    };
    let state = match builder.build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let mut rng = match config.flex_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };
    let queued: Vec<(String, Position)> = (0..args.players)
        .map(|n| (format!("player-{n}"), pick_position(&mut rng, args.flex_percent)))
        .collect();

    info!(players = args.players, mode = ?config.admission_mode, "Simulation starting");

    let handles = queued.into_iter().map(|(player_id, position)| {
        let matching = state.matching.clone();
        tokio::spawn(async move { matching.queue(&player_id, position).await })
    });

    let mut summary = Summary {
        players: args.players,
        ..Summary::default()
    };
    let mut group_ids = Vec::new();
    for result in join_all(handles).await {
        match result {
            Ok(Ok(QueueOutcome::Joined { group_id, .. })) => {
                summary.joined += 1;
                group_ids.push(group_id);
            }
            Ok(Ok(QueueOutcome::Created { group })) => {
                summary.created += 1;
                group_ids.push(group.id);
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Queue attempt failed");
                summary.failed += 1;
            }
            Err(e) => {
                warn!(error = %e, "Joiner task aborted");
                summary.failed += 1;
            }
        }
    }
    group_ids.sort_unstable();
    group_ids.dedup();

    for group_id in group_ids {
        let snapshot = match state.formation.snapshot(group_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(group_id, error = %e, "Could not load group");
                continue;
            }
        };
        if snapshot.group.is_matched() {
            summary.groups_matched += 1;
        } else {
            summary.groups_waiting += 1;
        }
        let problems = snapshot.check_invariants();
        if !problems.is_empty() {
            summary
                .invariant_violations
                .push(Violation { group_id, problems });
        }
    }

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("❌ Failed to render summary: {e}");
            std::process::exit(1);
        }
    }
}
