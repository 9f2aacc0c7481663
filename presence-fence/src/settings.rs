use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gateway {
    /// Base URL of the gateway API, e.g. `http://127.0.0.1:8080/api`
    pub api: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fence {
    /// URL of the presence register's list endpoint
    pub geo_api: String,
    pub username: String,
    pub password: String,
    /// Devices whose presence decides the alarm state
    pub devices: Vec<String>,
    #[serde(default = "default_enter_status")]
    pub enter_status: String,
    #[serde(default = "default_exit_status")]
    pub exit_status: String,
    /// Seconds between two checks
    #[serde(default = "default_loop_time")]
    pub loop_time: u64,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_enter_status() -> String {
    String::from("enter")
}

fn default_exit_status() -> String {
    String::from("exit")
}

fn default_loop_time() -> u64 {
    60
}

fn default_timeout() -> u64 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub gateway: Gateway,
    pub fence: Fence,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let settings: Settings = Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        settings.validated()
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        // An empty list would count zero exits as "everyone left"
        if self.fence.devices.is_empty() {
            return Err(ConfigError::Message("fence.devices must list at least one device".into()));
        }

        if self.fence.loop_time == 0 {
            return Err(ConfigError::Message("fence.loop_time must be positive".into()));
        }

        Ok(self)
    }
}

/// `PRESENCE__SECTION__KEY` overrides; `PRESENCE__FENCE__DEVICES` takes a
/// comma separated list.
pub fn environment() -> Environment {
    Environment::with_prefix("PRESENCE")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("fence.devices")
}
