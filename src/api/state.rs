use std::sync::Arc;

use tokio::sync::RwLock;

use crate::league::League;
use crate::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub league: Arc<RwLock<League>>,
}

impl AppState {
    pub fn new(storage: StorageConfig, league: League) -> Self {
        Self {
            storage: Arc::new(storage),
            league: Arc::new(RwLock::new(league)),
        }
    }
}
