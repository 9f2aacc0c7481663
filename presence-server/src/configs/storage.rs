use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use presence_api::models::{DeviceRecord, PresenceMap};
use tokio::fs;
use tokio::sync::Mutex;

use crate::configs::settings::{CorruptPolicy, Store};
use crate::errors::StorageError;

/// JSON file holding the presence map.
///
/// Every access holds `lock` across the whole read (and write), so two
/// reports never interleave their read-modify-write cycles. Writes land in
/// a sibling temporary file which is then renamed over the store.
pub struct Storage {
    path: PathBuf,
    on_corrupt: CorruptPolicy,
    lock: Mutex<()>,
}

impl Storage {
    pub async fn new(store: Store) -> Result<Self, StorageError> {
        if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(parent.to_path_buf(), e))?;
        }

        tracing::debug!(path = %store.path.display(), policy = ?store.on_corrupt, "presence store ready");

        Ok(Self {
            path: store.path,
            on_corrupt: store.on_corrupt,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full map. A missing or empty file is an empty map.
    pub async fn load(&self) -> Result<PresenceMap, StorageError> {
        let _guard = self.lock.lock().await;

        self.read().await
    }

    /// Sets the record of `device_id` and rewrites the whole file.
    pub async fn upsert(&self, device_id: &str, record: DeviceRecord) -> Result<PresenceMap, StorageError> {
        let _guard = self.lock.lock().await;

        let mut presence = self.read().await?;
        presence.insert(device_id, record);
        self.write(&presence).await?;

        Ok(presence)
    }

    async fn read(&self) -> Result<PresenceMap, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PresenceMap::new()),
            Err(e) => return Err(StorageError::Io(self.path.clone(), e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(PresenceMap::new());
        }

        match serde_json::from_slice(&bytes) {
            Ok(presence) => Ok(presence),
            Err(e) => match self.on_corrupt {
                CorruptPolicy::Reject => Err(StorageError::Corrupt(self.path.clone(), e)),
                CorruptPolicy::Reset => {
                    let backup = self.backup_path();
                    fs::rename(&self.path, &backup)
                        .await
                        .map_err(|e| StorageError::Io(backup.clone(), e))?;

                    tracing::warn!(
                        path = %self.path.display(),
                        backup = %backup.display(),
                        "corrupt presence store moved aside: {}", e
                    );

                    Ok(PresenceMap::new())
                }
            },
        }
    }

    async fn write(&self, presence: &PresenceMap) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(presence).map_err(StorageError::Encode)?;
        let temporary = self.sibling("tmp");

        fs::write(&temporary, &bytes)
            .await
            .map_err(|e| StorageError::Io(temporary.clone(), e))?;
        fs::rename(&temporary, &self.path)
            .await
            .map_err(|e| StorageError::Io(self.path.clone(), e))?;

        Ok(())
    }

    pub fn backup_path(&self) -> PathBuf {
        self.sibling("corrupt")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".");
        name.push(suffix);

        self.path.with_file_name(name)
    }
}
