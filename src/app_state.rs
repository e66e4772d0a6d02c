use std::sync::Arc;

use crate::config::Config;
use crate::database::DatabasePool;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabasePool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db_pool: DatabasePool, config: Arc<Config>) -> Self {
        Self { db_pool, config }
    }
}
