use std::collections::BTreeMap;
use std::collections::btree_map::Iter;

use serde::{Deserialize, Serialize};

/// Last action reported by one device.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Free-form action string sent by the device, e.g. `enter` or `exit`
    pub action: String,
    /// Unix timestamp (seconds) at which the action was recorded
    pub time: i64,
}

/// Every known device mapped to its last record.
///
/// Keys are kept sorted so that two reads of an unchanged store serialize
/// to the same bytes.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresenceMap(BTreeMap<String, DeviceRecord>);

impl PresenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the record of `device_id`, returning the previous one.
    pub fn insert(&mut self, device_id: impl Into<String>, record: DeviceRecord) -> Option<DeviceRecord> {
        self.0.insert(device_id.into(), record)
    }

    pub fn get(&self, device_id: &str) -> Option<&DeviceRecord> {
        self.0.get(device_id)
    }

    pub fn iter(&self) -> Iter<'_, String, DeviceRecord> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a PresenceMap {
    type Item = (&'a String, &'a DeviceRecord);
    type IntoIter = Iter<'a, String, DeviceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, DeviceRecord)> for PresenceMap {
    fn from_iter<T: IntoIterator<Item = (String, DeviceRecord)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Form body posted by a device when it crosses a fence.
///
/// Missing fields decode as empty strings.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportForm {
    /// Device identifier
    #[serde(rename = "device-id", default)]
    pub device_id: String,
    /// Reported action
    #[serde(default)]
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_serializes_as_plain_object() {
        let map: PresenceMap = [
            ("B".to_string(), DeviceRecord { action: "exit".into(), time: 2 }),
            ("A".to_string(), DeviceRecord { action: "enter".into(), time: 1 }),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&map).unwrap();

        assert_eq!(
            json,
            r#"{"A":{"action":"enter","time":1},"B":{"action":"exit","time":2}}"#
        );
    }

    #[test]
    fn test_map_rejects_non_record_values() {
        assert!(serde_json::from_str::<PresenceMap>(r#"{"A": 1}"#).is_err());
        assert!(serde_json::from_str::<PresenceMap>("[]").is_err());
    }

    #[test]
    fn test_report_form_defaults_missing_fields() {
        let form: ReportForm = serde_json::from_str(r#"{"device-id": "D1"}"#).unwrap();

        assert_eq!(form.device_id, "D1");
        assert_eq!(form.action, "");
    }
}
