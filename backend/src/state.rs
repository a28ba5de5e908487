use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::store::TodoStore;

/// Everything a handler needs, created once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub config: Arc<Config>,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
