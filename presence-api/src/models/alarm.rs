use serde::{Deserialize, Deserializer, Serialize};

/// Subset of the gateway's `/action/status` document used by the fence.
///
/// The gateway reports flags either as integers or as booleans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmStatus {
    #[serde(default, deserialize_with = "flag")]
    pub armed: Option<u8>,
    #[serde(default, deserialize_with = "flag")]
    pub fence: Option<u8>,
}

impl AlarmStatus {
    pub fn fence_enabled(&self) -> bool {
        self.fence.is_some_and(|fence| fence != 0)
    }
}

/// Body posted to `/action/status` to change the alarm state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmRequest {
    pub armed: u8,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
}

fn flag<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FlagRepr>::deserialize(deserializer)?.map(|repr| match repr {
        FlagRepr::Bool(value) => u8::from(value),
        FlagRepr::Int(value) => u8::from(value != 0),
    }))
}
