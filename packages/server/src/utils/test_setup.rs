use dotenvy::dotenv;
use log::LevelFilter;
use std::sync::Once;

use crate::{models::config::ServerConfig, state::AppState};

static INIT: Once = Once::new();

pub fn setup_test_env() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .try_init();
    });
}

/// 固定シードの状態（テスト用）
pub fn seeded_state(seed: u64) -> AppState {
    AppState::with_config(ServerConfig {
        rng_seed: Some(seed),
        ..ServerConfig::default()
    })
}
