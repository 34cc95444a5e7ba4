use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::formation::FormationConfig;
use crate::repos::groups::GroupStore;
use crate::services::formation::FormationService;
use crate::services::matching::MatchingCoordinator;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection when the store is SQL-backed
    pub db: Option<DatabaseConnection>,
    pub store: Arc<dyn GroupStore>,
    pub formation: Arc<FormationService>,
    pub matching: Arc<MatchingCoordinator>,
    pub config: FormationConfig,
}

impl AppState {
    /// Wire the engine and coordinator over `store`.
    pub fn new(
        store: Arc<dyn GroupStore>,
        config: FormationConfig,
        db: Option<DatabaseConnection>,
    ) -> Self {
        let formation = Arc::new(FormationService::new(store.clone(), &config));
        let matching = Arc::new(MatchingCoordinator::new(
            formation.clone(),
            config.matchable_limit,
        ));
        Self {
            db,
            store,
            formation,
            matching,
            config,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
