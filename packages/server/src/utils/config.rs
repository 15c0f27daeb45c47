use once_cell::sync::Lazy;

use crate::models::config::ServerConfig;

pub static CONFIG: Lazy<ServerConfig> = Lazy::new(ServerConfig::from_env);
