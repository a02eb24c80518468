use serde::{Deserialize, Deserializer, Serialize};

/// Wire representation of a customer. The service assigns `customer_id`
/// (currently an integer) and echoes it back on every 2xx body; we never
/// send it, and we keep it as text so a change of id scheme on the server
/// stays invisible here.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Customer {
    #[serde(skip_serializing, default, deserialize_with = "opaque_id")]
    pub customer_id: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub email_id: String,
    pub address: String,
    pub phone_number: String,
    pub card_number: String,
    #[serde(default)]
    pub active: bool,
}

fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
