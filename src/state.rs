use std::sync::Arc;

use crate::db::Database;
use crate::services::Providers;

#[derive(Clone)]
pub struct AppState {
    db: Arc<Database>,
    providers: Arc<Providers>,
}

impl AppState {
    pub fn new(db: Database, providers: Providers) -> Self {
        Self {
            db: Arc::new(db),
            providers: Arc::new(providers),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn providers(&self) -> &Providers {
        &self.providers
    }
}
