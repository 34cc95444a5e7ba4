use std::sync::Arc;

use crate::adapters::memory::InMemoryGroupStore;
use crate::adapters::sea_store::SeaGroupStore;
use crate::config::db::DbProfile;
use crate::config::formation::FormationConfig;
use crate::infra::db::{bootstrap_db, BootstrapError};
use crate::repos::groups::GroupStore;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and the simulator)
pub struct StateBuilder {
    formation: FormationConfig,
    db_profile: Option<DbProfile>,
    store: Option<Arc<dyn GroupStore>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            formation: FormationConfig::default(),
            db_profile: None,
            store: None,
        }
    }
    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }
    pub fn with_formation(mut self, config: FormationConfig) -> Self {
        self.formation = config;
        self
    }
    /// Use a ready-made store. Takes precedence over `with_db`.
    pub fn with_store(mut self, store: Arc<dyn GroupStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub async fn build(self) -> Result<AppState, BootstrapError> {
        if let Some(store) = self.store {
            return Ok(AppState::new(store, self.formation, None));
        }
        if let Some(profile) = self.db_profile {
            // single entrypoint: build + migrate
            let conn = bootstrap_db(&profile).await?;
            let store: Arc<dyn GroupStore> = Arc::new(SeaGroupStore::new(conn.clone()));
            Ok(AppState::new(store, self.formation, Some(conn)))
        } else {
            Ok(AppState::new(
                Arc::new(InMemoryGroupStore::new()),
                self.formation,
                None,
            ))
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
