use rand::{rngs::StdRng, SeedableRng};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

use crate::models::{config::ServerConfig, session::Session};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        AppState {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            config: Arc::new(config),
        }
    }

    /// 乱数源はセッションごとに1つ。RNG_SEED があれば再現可能にする
    pub fn session_rng(&self) -> StdRng {
        match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
