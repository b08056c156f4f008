use std::fs::File;
use std::collections::HashMap;

use serde::Deserialize;
use serde_json;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ServerConfig {
    pub host: String,
    pub password: String,
    /// Secret for `/login` in the interactive console.
    #[serde(default)]
    pub bot_password: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ServerConfigMap {
    configs: HashMap<String, ServerConfig>,
}

const CONFIG_PATH_KEY: &str = "SAMP_RCON_CONFIG_PATH";
pub const SERVER_HOST_KEY: &str = "SAMP_RCON_SERVER_HOST";
pub const SERVER_PASSWORD_KEY: &str = "SAMP_RCON_SERVER_PASSWORD";
pub const BOT_PASSWORD_KEY: &str = "SAMP_RCON_BOT_PASSWORD";

fn get_config_path_env_var() -> Option<String> {
    let env_var = std::env::var(CONFIG_PATH_KEY);
    match env_var {
        Ok(path) => {
            log::debug!("Found environment variable {}: {}", CONFIG_PATH_KEY, path);
            Some(path)
        },
        Err(_) => {
            log::warn!("Environment variable {} not set", CONFIG_PATH_KEY);
            None
        }
    }
}

pub fn load_config_from_env(config_name: Option<String>) -> Option<ServerConfig> {
    if let Some(config_path) = get_config_path_env_var() {
        load_config(&config_path, config_name)
    } else {
        None
    }
}

fn load_config(config_file_path: &str, config_name: Option<String>) -> Option<ServerConfig> {
    let mut file = match File::open(config_file_path) {
        Ok(f) => f,
        Err(_) => {
            log::error!("Failed to open config file: {}", config_file_path);
            return None;
        }
    };

    let config: Result<ServerConfigMap, serde_json::Error> = serde_json::from_reader(&mut file);
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to parse config file {}: {}", config_file_path, e);
            return None;
        }
    };
    log::debug!("Loaded {} server configs from {}", config.configs.len(), config_file_path);

    if let Some(name) = config_name {
        match config.configs.get(&name) {
            Some(server_config) => {
                log::info!("Using config: {}", name);
                Some(server_config.clone())
            }
            None => {
                log::error!("Config with name '{}' not found in config file.", name);
                None
            }
        }
    } else {
        let mut configs = config.configs.into_iter();
        match (configs.next(), configs.next()) {
            (Some((name, server_config)), None) => {
                log::info!("No config name provided. Using the only available config: {}", name);
                Some(server_config)
            }
            _ => {
                log::error!("No config name provided. Please specify a config name.");
                None
            }
        }
    }
}

/// Reads the variables the original chat bot was configured with.
/// Blank values count as unset. `lookup` is `std::env::var` outside tests.
pub fn load_config_from_vars(lookup: impl Fn(&str) -> Option<String>) -> Option<ServerConfig> {
    let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let host = read(SERVER_HOST_KEY)?;
    let Some(password) = read(SERVER_PASSWORD_KEY) else {
        log::warn!("{} is set but {} is empty", SERVER_HOST_KEY, SERVER_PASSWORD_KEY);
        return None;
    };

    log::info!("Using server {} from {}", host, SERVER_HOST_KEY);
    Some(ServerConfig {
        host,
        password,
        bot_password: read(BOT_PASSWORD_KEY),
    })
}
