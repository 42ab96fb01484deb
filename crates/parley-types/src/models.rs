use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A single chat message.
///
/// Field names on the wire follow the original client contract:
/// `nome` (sender), `mensagem` (body) and `data` (timestamp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Assigned by the store on creation. Ignored when sent by a client.
    #[serde(default)]
    pub id: Option<Uuid>,

    #[serde(rename = "nome")]
    pub sender_name: String,

    #[serde(rename = "mensagem")]
    pub text: String,

    /// Client-supplied send time, normalized to UTC. May be null.
    /// See [`parse_timestamp`] for the accepted forms.
    #[serde(rename = "data", default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    EpochMillis(i64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;

    raw.map(|raw| match raw {
        RawTimestamp::EpochMillis(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| format!("epoch milliseconds out of range: {ms}")),
        RawTimestamp::Text(text) => parse_timestamp(&text),
    })
    .transpose()
    .map_err(serde::de::Error::custom)
}

/// Parse a textual timestamp the way Java date clients send them:
/// RFC 3339 (any offset, with or without a colon), a zone-less date-time
/// taken as UTC, or a bare date at UTC midnight.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, String> {
    let text = text.trim();

    if let Ok(ts) = text.parse::<DateTime<Utc>>() {
        return Ok(ts);
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("unrecognized timestamp '{text}'"))
}
