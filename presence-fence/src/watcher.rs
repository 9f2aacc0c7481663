use std::collections::HashSet;
use std::time::Duration;

use presence_api::models::{AlarmStatus, PresenceMap};

use crate::client::{GatewayClient, GeofenceClient, http_client};
use crate::error::FenceError;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmCommand {
    Arm,
    Disarm,
}

impl AlarmCommand {
    pub fn armed(self) -> u8 {
        match self {
            AlarmCommand::Arm => 1,
            AlarmCommand::Disarm => 0,
        }
    }
}

/// Which devices count and which actions mean entering or leaving.
#[derive(Debug, Clone)]
pub struct FenceRules {
    pub devices: HashSet<String>,
    pub enter_status: String,
    pub exit_status: String,
}

impl FenceRules {
    /// Disarm as soon as one tracked device is home; arm once all have left.
    pub fn evaluate(&self, presence: &PresenceMap, armed: Option<u8>) -> Option<AlarmCommand> {
        let (mut enter, mut exit) = (0, 0);

        for (device_id, record) in presence.iter().filter(|(id, _)| self.devices.contains(*id)) {
            if record.action == self.enter_status {
                enter += 1;
            } else if record.action == self.exit_status {
                exit += 1;
            } else {
                tracing::debug!(device_id, action = %record.action, "ignoring unknown action");
            }
        }

        tracing::debug!(enter, exit, ?armed, "fence tally");

        match armed {
            Some(1) if enter > 0 => Some(AlarmCommand::Disarm),
            Some(0) if exit == self.devices.len() => Some(AlarmCommand::Arm),
            _ => None,
        }
    }
}

pub struct Watcher {
    gateway: GatewayClient,
    geofence: GeofenceClient,
    rules: FenceRules,
    loop_time: Duration,
}

impl Watcher {
    pub fn new(settings: &Settings) -> Result<Self, FenceError> {
        let http = http_client(settings)?;
        let fence = &settings.fence;

        Ok(Self {
            gateway: GatewayClient::new(http.clone(), &settings.gateway.api),
            geofence: GeofenceClient::new(http, &fence.geo_api, &fence.username, &fence.password),
            rules: FenceRules {
                devices: fence.devices.iter().cloned().collect(),
                enter_status: fence.enter_status.clone(),
                exit_status: fence.exit_status.clone(),
            },
            loop_time: Duration::from_secs(fence.loop_time),
        })
    }

    pub fn loop_time(&self) -> Duration {
        self.loop_time
    }

    /// Runs one check and returns the command sent to the gateway, if any.
    pub async fn tick(&self) -> Option<AlarmCommand> {
        let status = self.gateway.status().await.unwrap_or_else(|e| {
            tracing::error!("failed to read alarm status: {}", e);
            AlarmStatus::default()
        });

        if !status.fence_enabled() {
            tracing::debug!("fence disabled");
            return None;
        }

        let command = match self.geofence.presence().await {
            Ok(presence) if !presence.is_empty() => self.rules.evaluate(&presence, status.armed),
            result => {
                if let Err(e) = result {
                    tracing::error!("failed to read presence: {}", e);
                }

                // Nobody can be confirmed home
                (status.armed == Some(0)).then_some(AlarmCommand::Arm)
            }
        };

        let command = command?;

        match command {
            AlarmCommand::Arm => tracing::info!("Arm alarm"),
            AlarmCommand::Disarm => tracing::info!("Disarm alarm"),
        }

        if let Err(e) = self.gateway.set_armed(command.armed()).await {
            tracing::error!("failed to update alarm status: {}", e);
        }

        Some(command)
    }
}
