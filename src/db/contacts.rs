use chrono::Local;
use rusqlite::params;

use super::*;

impl ContactDb {
    /// True if a ledger entry exists for this profile URL.
    pub fn exists(&self, url: &str) -> Result<bool, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM contacts WHERE linkedin_url = ?1)",
            params![url],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Insert-or-replace a ledger entry, keyed by profile URL. Idempotent:
    /// a later write for the same URL replaces the earlier one. Committed
    /// immediately (autocommit), so the record survives a crash after this
    /// call returns.
    pub fn upsert(
        &self,
        url: &str,
        last_contacted: &str,
        message: &str,
        sent: bool,
    ) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO contacts (linkedin_url, last_contacted, message_used, sent)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(linkedin_url) DO UPDATE SET
                last_contacted = excluded.last_contacted,
                message_used = excluded.message_used,
                sent = excluded.sent",
            params![url, last_contacted, message, sent_to_column(sent)],
        )?;
        Ok(())
    }

    /// Record an outreach decision stamped with today's date. `sent = true`
    /// for mark-as-sent, `false` for skip.
    pub fn log_outreach(&self, url: &str, message: &str, sent: bool) -> Result<(), DbError> {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        self.upsert(url, &today, message, sent)
    }

    /// All ledger entries in storage (insertion) order.
    pub fn list_all(&self) -> Result<Vec<DbContact>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT linkedin_url, last_contacted, message_used, sent
             FROM contacts ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            let sent: String = row.get(3)?;
            Ok(DbContact {
                linkedin_url: row.get(0)?,
                last_contacted: row.get(1)?,
                message_used: row.get(2)?,
                sent: sent_from_column(&sent),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_db() -> (tempfile::TempDir, ContactDb) {
        let dir = tempfile::tempdir().unwrap();
        let db = ContactDb::open_at(dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_upsert_then_exists() {
        let (_dir, db) = open_test_db();
        assert!(!db.exists("https://linkedin.com/in/jane").unwrap());
        db.upsert("https://linkedin.com/in/jane", "2024-02-07", "hi", true)
            .unwrap();
        assert!(db.exists("https://linkedin.com/in/jane").unwrap());
    }

    #[test]
    fn test_second_upsert_replaces_instead_of_duplicating() {
        let (_dir, db) = open_test_db();
        db.upsert("u1", "2024-01-01", "first", false).unwrap();
        db.upsert("u1", "2024-02-02", "second", true).unwrap();

        let all = db.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].last_contacted.as_deref(), Some("2024-02-02"));
        assert_eq!(all[0].message_used.as_deref(), Some("second"));
        assert!(all[0].sent);
    }

    #[test]
    fn test_list_all_preserves_insertion_order() {
        let (_dir, db) = open_test_db();
        db.upsert("u2", "2024-01-01", "", false).unwrap();
        db.upsert("u1", "2024-01-02", "", true).unwrap();
        db.upsert("u3", "2024-01-03", "", false).unwrap();

        let urls: Vec<String> = db
            .list_all()
            .unwrap()
            .into_iter()
            .map(|c| c.linkedin_url)
            .collect();
        assert_eq!(urls, vec!["u2", "u1", "u3"]);
    }

    #[test]
    fn test_skip_is_recorded_as_not_sent() {
        let (_dir, db) = open_test_db();
        db.log_outreach("u1", "", false).unwrap();
        let all = db.list_all().unwrap();
        assert!(!all[0].sent);
        assert!(all[0].last_contacted.is_some());
    }

    #[test]
    fn test_reads_legacy_true_false_rows() {
        let (_dir, db) = open_test_db();
        db.conn
            .execute(
                "INSERT INTO contacts (linkedin_url, last_contacted, message_used, sent)
                 VALUES ('legacy', '2023-05-01', 'old message', 'True')",
                [],
            )
            .unwrap();
        let all = db.list_all().unwrap();
        assert!(all[0].sent);
    }
}
