//! The vanilla status response, as sent in a Status Response packet.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{error::StatusError, report::StatusPayload};

/// Falls back to `T::default()` when the value does not have the expected
/// shape, so one odd section does not sink the whole response.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Version {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Player {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Players {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<Value>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub sample: Vec<Player>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ServerList {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub players: Option<Players>,
    /// Chat component or plain string, passed on untouched as the MOTD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<Value>,
}

impl ServerList {
    /// Maps the nested vanilla layout onto the flat status payload. Fields the
    /// server left out stay absent so the payload defaults apply.
    pub fn into_payload(self, ping_ms: u64) -> Result<StatusPayload, StatusError> {
        let mut fields = Map::new();

        if let Some(version) = self.version {
            if let Some(name) = version.name {
                fields.insert("version".into(), name);
            }
            if let Some(protocol) = version.protocol {
                fields.insert("protocol".into(), protocol);
            }
        }
        if let Some(players) = self.players {
            if let Some(online) = players.online {
                fields.insert("playersOnline".into(), online);
            }
            if let Some(max) = players.max {
                fields.insert("maxPlayers".into(), max);
            }
        }
        fields.insert("ping".into(), Value::from(ping_ms));
        if let Some(description) = self.description {
            fields.insert("motd".into(), description);
        }

        StatusPayload::from_value(Value::Object(fields))
    }
}
