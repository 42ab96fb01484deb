use crate::models::MessageRow;
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, Row};
use uuid::Uuid;

const MESSAGE_COLUMNS: &str = "id, sender_name, text, sent_at, created_at";

impl Database {
    /// Insert a new message under a freshly generated id and return the stored row.
    pub fn save_message(
        &self,
        sender_name: &str,
        text: &str,
        sent_at: Option<&str>,
    ) -> Result<MessageRow> {
        let id = Uuid::new_v4().to_string();

        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO messages (id, sender_name, text, sent_at) VALUES (?1, ?2, ?3, ?4)
                     RETURNING {MESSAGE_COLUMNS}"
                ),
                rusqlite::params![id, sender_name, text, sent_at],
                map_message_row,
            )?;
            Ok(row)
        })
    }

    /// Every stored message. Rows come back in insertion order, which callers
    /// should treat as incidental.
    pub fn find_all_messages(&self) -> Result<Vec<MessageRow>> {
        self.with_conn(query_all_messages)
    }

    pub fn find_message_by_id(&self, id: &str) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| query_message_by_id(conn, id))
    }

    /// Delete a message. Missing ids are not an error.
    /// Returns true if a row was actually removed.
    pub fn delete_message_by_id(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    pub fn count_messages(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: u64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
            Ok(count)
        })
    }
}

fn query_all_messages(conn: &Connection) -> Result<Vec<MessageRow>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY rowid"))?;

    let rows = stmt
        .query_map([], map_message_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_message_by_id(conn: &Connection, id: &str) -> Result<Option<MessageRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"))?;

    let row = stmt.query_row([id], map_message_row).optional()?;

    Ok(row)
}

fn map_message_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        sender_name: row.get(1)?,
        text: row.get(2)?,
        sent_at: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn saved_message_can_be_found_by_id() {
        let db = db();
        let saved = db
            .save_message("Alice", "hi", Some("2024-01-01T00:00:00Z"))
            .unwrap();

        assert!(saved.id.parse::<Uuid>().is_ok());
        assert_eq!(saved.sender_name, "Alice");
        assert_eq!(saved.text, "hi");
        assert_eq!(saved.sent_at.as_deref(), Some("2024-01-01T00:00:00Z"));

        let found = db.find_message_by_id(&saved.id).unwrap();
        assert_eq!(found, Some(saved));
    }

    #[test]
    fn save_keeps_missing_timestamp_missing() {
        let db = db();
        let saved = db.save_message("Bob", "", None).unwrap();
        assert_eq!(saved.sent_at, None);
        assert_eq!(saved.text, "");
    }

    #[test]
    fn each_save_gets_a_distinct_id() {
        let db = db();
        let a = db.save_message("Alice", "same", None).unwrap();
        let b = db.save_message("Alice", "same", None).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn find_missing_id_returns_none() {
        let db = db();
        assert_eq!(db.find_message_by_id("no-such-id").unwrap(), None);
    }

    #[test]
    fn delete_removes_message() {
        let db = db();
        let saved = db.save_message("Alice", "bye", None).unwrap();

        assert!(db.delete_message_by_id(&saved.id).unwrap());
        assert_eq!(db.find_message_by_id(&saved.id).unwrap(), None);
    }

    #[test]
    fn delete_of_unknown_id_is_a_noop() {
        let db = db();
        let kept = db.save_message("Alice", "stay", None).unwrap();

        assert!(!db.delete_message_by_id(&Uuid::new_v4().to_string()).unwrap());
        assert!(!db.delete_message_by_id("not-a-uuid").unwrap());
        assert_eq!(db.find_all_messages().unwrap(), vec![kept]);
    }

    #[test]
    fn delete_twice_is_a_noop() {
        let db = db();
        let saved = db.save_message("Alice", "once", None).unwrap();

        assert!(db.delete_message_by_id(&saved.id).unwrap());
        assert!(!db.delete_message_by_id(&saved.id).unwrap());
    }

    #[test]
    fn find_all_reflects_creates_minus_deletes() {
        let db = db();
        assert!(db.find_all_messages().unwrap().is_empty());

        let ids: Vec<String> = (0..5)
            .map(|i| db.save_message("Alice", &format!("msg {i}"), None).unwrap().id)
            .collect();

        db.delete_message_by_id(&ids[1]).unwrap();
        let late = db.save_message("Bob", "late", None).unwrap();
        db.delete_message_by_id(&ids[3]).unwrap();

        let all = db.find_all_messages().unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(db.count_messages().unwrap(), 4);

        let remaining: Vec<&str> = all.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(
            remaining,
            vec![ids[0].as_str(), ids[2].as_str(), ids[4].as_str(), late.id.as_str()]
        );
    }

    #[test]
    fn count_starts_at_zero_and_follows_saves() {
        let db = db();
        assert_eq!(db.count_messages().unwrap(), 0);

        db.save_message("Alice", "one", None).unwrap();
        db.save_message("Bob", "two", None).unwrap();
        assert_eq!(db.count_messages().unwrap(), 2);
    }

    #[test]
    fn file_backed_database_persists_across_reopen() {
        let path = std::env::temp_dir().join(format!("parley-test-{}.db", Uuid::new_v4()));

        let saved = {
            let db = Database::open(&path).unwrap();
            db.save_message("Alice", "durable", None).unwrap()
        };

        let db = Database::open(&path).unwrap();
        assert_eq!(db.find_message_by_id(&saved.id).unwrap(), Some(saved));

        drop(db);
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
