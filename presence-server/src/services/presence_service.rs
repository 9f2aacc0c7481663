use std::collections::HashSet;
use std::sync::Arc;

use presence_api::models::{DeviceRecord, PresenceMap};
use time::OffsetDateTime;

use crate::configs::{Devices, Storage};
use crate::errors::{ApiError, PresenceError, StorageError};
use crate::services::{CredentialService, Credentials};

/// One call to the geofence endpoint, already decoded from the transport.
#[derive(Debug, Clone, Default)]
pub struct PresenceRequest {
    pub device_id: String,
    pub action: String,
    pub credentials: Option<Credentials>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceOutcome {
    /// The device's record was replaced.
    Recorded(DeviceRecord),
    /// The caller authenticated and gets every record.
    Listing(PresenceMap),
}

pub struct PresenceService {
    storage: Arc<Storage>,
    credential_service: Arc<CredentialService>,
    trusted: HashSet<String>,
    skip_auth_for_trusted: bool,
}

impl PresenceService {
    pub fn new(storage: Arc<Storage>, credential_service: Arc<CredentialService>, devices: Devices) -> Self {
        if devices.skip_auth_for_trusted {
            tracing::warn!("trusted devices may report without credentials");
        }

        Self {
            storage,
            credential_service,
            trusted: devices.trusted,
            skip_auth_for_trusted: devices.skip_auth_for_trusted,
        }
    }

    /// Runs the endpoint's decision chain: a trusted device reports, an
    /// authenticated caller lists, everyone else is refused.
    pub async fn handle(&self, request: PresenceRequest) -> Result<PresenceOutcome, ApiError> {
        let trusted = self.is_trusted(&request.device_id);

        if trusted && self.skip_auth_for_trusted {
            let record = self.report(&request.device_id, request.action).await?;
            return Ok(PresenceOutcome::Recorded(record));
        }

        let authenticated = self.credential_service.verify(request.credentials.as_ref()).await?;

        if trusted && authenticated {
            let record = self.report(&request.device_id, request.action).await?;
            return Ok(PresenceOutcome::Recorded(record));
        }

        if authenticated {
            return Ok(PresenceOutcome::Listing(self.list().await?));
        }

        tracing::info!(
            device_id = %request.device_id,
            username = request.credentials.as_ref().map(|c| c.username.as_str()),
            "presence request refused"
        );

        Err(PresenceError::NotAuthorized.into())
    }

    pub fn is_trusted(&self, device_id: &str) -> bool {
        self.trusted.contains(device_id)
    }

    pub async fn report(&self, device_id: &str, action: String) -> Result<DeviceRecord, StorageError> {
        let record = DeviceRecord {
            action,
            time: OffsetDateTime::now_utc().unix_timestamp(),
        };

        self.storage.upsert(device_id, record.clone()).await?;

        tracing::info!(device_id, action = %record.action, time = record.time, "presence recorded");

        Ok(record)
    }

    pub async fn list(&self) -> Result<PresenceMap, StorageError> {
        self.storage.load().await
    }
}
