/// Database row types, mapped one-to-one from SQLite rows.
/// Distinct from parley-types so the storage layer has no serde or chrono dependency.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub id: String,
    pub sender_name: String,
    pub text: String,
    /// Client-supplied send time as RFC 3339 text, if any.
    pub sent_at: Option<String>,
    pub created_at: String,
}
