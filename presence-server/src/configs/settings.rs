use std::collections::{HashMap, HashSet};
use std::env;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::configs::normalize_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

/// What to do when the store file holds something other than a presence map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Move the file aside to `<store>.corrupt` and start from an empty map.
    #[default]
    Reset,
    /// Fail the request and leave the file untouched.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub path: PathBuf,
    #[serde(default)]
    pub on_corrupt: CorruptPolicy,
}

/// One entry of the credential set.
///
/// Usernames are values rather than table keys so their case survives
/// config loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// Plain password, or an argon2 PHC hash starting with `$argon2`
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Auth {
    #[serde(default)]
    pub users: Vec<User>,
    /// Username to password, built from `users` by [`Settings::normalized`].
    #[serde(skip)]
    pub credentials: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Devices {
    #[serde(default)]
    pub trusted: HashSet<String>,
    /// Let trusted devices report without valid credentials.
    #[serde(default)]
    pub skip_auth_for_trusted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub store: Store,
    #[serde(default)]
    pub auth: Auth,
    #[serde(default)]
    pub devices: Devices,
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

        settings.normalized()
    }

    /// Validates the loaded values and resolves the store path.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        if self.devices.trusted.iter().any(|device| device.is_empty()) {
            return Err(ConfigError::Message("trusted device identifiers must not be empty".into()));
        }

        let mut credentials = HashMap::with_capacity(self.auth.users.len());
        for user in &self.auth.users {
            if user.username.is_empty() {
                return Err(ConfigError::Message("usernames must not be empty".into()));
            }

            if credentials.insert(user.username.clone(), user.password.clone()).is_some() {
                return Err(ConfigError::Message(format!("duplicate user {:?}", user.username)));
            }
        }
        self.auth.credentials = credentials;

        self.store.path = normalize_path(&self.store.path)
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(self)
    }
}

/// `PRESENCE__SECTION__KEY` overrides; list settings take comma separated values.
pub fn environment() -> Environment {
    Environment::with_prefix("PRESENCE")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("devices.trusted")
}
