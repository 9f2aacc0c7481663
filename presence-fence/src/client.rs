use std::time::Duration;

use presence_api::models::{AlarmStatus, ArmRequest, PresenceMap};
use reqwest::Client;

use crate::error::FenceError;
use crate::settings::Settings;

pub fn http_client(settings: &Settings) -> Result<Client, FenceError> {
    Client::builder()
        .timeout(Duration::from_secs(settings.fence.timeout))
        .danger_accept_invalid_certs(settings.fence.accept_invalid_certs)
        .build()
        .map_err(FenceError::Client)
}

/// Reads and sets the alarm flags through the gateway's `/action/status`.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    status_url: String,
}

impl GatewayClient {
    pub fn new(http: Client, api: &str) -> Self {
        Self {
            http,
            status_url: format!("{}/action/status", api.trim_end_matches('/')),
        }
    }

    pub async fn status(&self) -> Result<AlarmStatus, FenceError> {
        self.http
            .get(&self.status_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| FenceError::Request(self.status_url.clone(), e))?
            .json()
            .await
            .map_err(|e| FenceError::Request(self.status_url.clone(), e))
    }

    pub async fn set_armed(&self, armed: u8) -> Result<(), FenceError> {
        self.http
            .post(&self.status_url)
            .json(&ArmRequest { armed })
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| FenceError::Request(self.status_url.clone(), e))?;

        Ok(())
    }
}

/// Fetches the presence map from the register's list endpoint.
#[derive(Clone)]
pub struct GeofenceClient {
    http: Client,
    url: String,
    username: String,
    password: String,
}

impl GeofenceClient {
    pub fn new(http: Client, url: &str, username: &str, password: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub async fn presence(&self) -> Result<PresenceMap, FenceError> {
        self.http
            .get(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| FenceError::Request(self.url.clone(), e))?
            .json()
            .await
            .map_err(|e| FenceError::Request(self.url.clone(), e))
    }
}
