use std::{env, net::SocketAddr, str::FromStr};
use werewolf_engine::{FirstDaySeerRule, GameRules};

pub const DEFAULT_MIN_PLAYERS: usize = 4;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub allowed_origin: String,
    // 固定シード（テスト・再現用）。未設定ならエントロピーから生成
    pub rng_seed: Option<u64>,
    // ゲーム開始に必要な最少人数
    pub min_players: usize,
    pub day_seconds: u64,
    pub night_seconds: u64,
    pub first_day_seer: FirstDaySeerRule,
    pub verbose_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let rules = GameRules::default();

        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            allowed_origin: "http://localhost:3000".to_string(),
            rng_seed: None,
            min_players: DEFAULT_MIN_PLAYERS,
            day_seconds: rules.day_seconds,
            night_seconds: rules.night_seconds,
            first_day_seer: rules.first_day_seer,
            verbose_logging: cfg!(debug_assertions),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: parse_var("WEREWOLF_BIND_ADDR").unwrap_or(defaults.bind_addr),
            allowed_origin: env::var("WEREWOLF_ALLOWED_ORIGIN")
                .unwrap_or(defaults.allowed_origin),
            rng_seed: parse_var("RNG_SEED"),
            min_players: parse_var("MIN_PLAYERS").unwrap_or(defaults.min_players),
            day_seconds: parse_var("DAY_SECONDS").unwrap_or(defaults.day_seconds),
            night_seconds: parse_var("NIGHT_SECONDS").unwrap_or(defaults.night_seconds),
            first_day_seer: parse_var("FIRST_DAY_SEER").unwrap_or(defaults.first_day_seer),
            verbose_logging: parse_flag("VERBOSE_LOGGING").unwrap_or(defaults.verbose_logging),
        }
    }

    /// Rules every new session starts with.
    pub fn default_rules(&self) -> GameRules {
        GameRules {
            day_seconds: self.day_seconds,
            night_seconds: self.night_seconds,
            first_day_seer: self.first_day_seer,
        }
    }
}

fn parse_flag(name: &str) -> Option<bool> {
    env::var(name).ok().map(|v| v.trim().eq_ignore_ascii_case("true"))
}

fn parse_var<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", name, raw, e);
            None
        }
    }
}
