use crate::Database;
use crate::models::{MessageRow, UserRow};
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;

/// Fixed-width RFC 3339 UTC timestamp. Lexicographic order matches
/// chronological order, which the newest-first message listing relies on.
fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Database {
    // -- Users --

    /// Inserts a new account. Accounts start verified and accepting messages;
    /// the email UNIQUE constraint is the last line of defense if the
    /// service-level pre-check races with a concurrent sign-up.
    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password, is_verified, is_accepting_messages, created_at)
                 VALUES (?1, ?2, ?3, ?4, 1, 1, ?5)",
                rusqlite::params![id, username, email, password_hash, now_rfc3339()],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(conn, "SELECT * FROM users WHERE username = ?1", username)
        })
    }

    /// Username uniqueness is scoped to verified accounts, so availability
    /// checks and sign-up conflicts go through this lookup, not the plain one.
    pub fn get_verified_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(
                conn,
                "SELECT * FROM users WHERE username = ?1 AND is_verified = 1",
                username,
            )
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "SELECT * FROM users WHERE email = ?1", email))
    }

    /// Sign-in accepts a username or an email as the identifier.
    pub fn get_user_by_identifier(&self, identifier: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(
                conn,
                "SELECT * FROM users WHERE username = ?1 OR email = ?1",
                identifier,
            )
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "SELECT * FROM users WHERE id = ?1", id))
    }

    // -- Acceptance flag --

    /// Unconditional overwrite, any boolean may follow any boolean.
    /// Returns false if no such account exists.
    pub fn set_accepting_messages(&self, user_id: &str, value: bool) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET is_accepting_messages = ?1 WHERE id = ?2",
                rusqlite::params![value, user_id],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Messages --

    /// Appends one message as a single row INSERT. Concurrent senders each
    /// insert their own row, so no append can overwrite another.
    /// Returns the stored created_at timestamp.
    pub fn insert_message(&self, id: &str, user_id: &str, content: &str) -> Result<String> {
        self.with_conn(|conn| {
            let created_at = now_rfc3339();
            conn.execute(
                "INSERT INTO messages (id, user_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, user_id, content, created_at],
            )?;
            Ok(created_at)
        })
    }

    /// All messages owned by `user_id`, newest first.
    pub fn list_messages(&self, user_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, content, created_at FROM messages
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id",
            )?;

            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(MessageRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        content: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Owner-scoped delete: the filter carries both the message id and the
    /// owning account id, so a caller can never delete another account's
    /// message no matter what id it supplies. Returns false when nothing
    /// matched (absent id or wrong owner).
    pub fn delete_message(&self, user_id: &str, message_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM messages WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![message_id, user_id],
            )?;
            Ok(changed > 0)
        })
    }
}

fn query_user(conn: &Connection, sql: &str, param: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(sql)?;

    let row = stmt
        .query_row([param], |row| {
            Ok(UserRow {
                id: row.get("id")?,
                username: row.get("username")?,
                email: row.get("email")?,
                password: row.get("password")?,
                is_verified: row.get("is_verified")?,
                is_accepting_messages: row.get("is_accepting_messages")?,
                created_at: row.get("created_at")?,
            })
        })
        .optional()?;

    Ok(row)
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
    use crate::Database;
    use uuid::Uuid;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn new_user(db: &Database, username: &str, email: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_user(&id, username, email, "argon2-hash").unwrap();
        id
    }

    #[test]
    fn create_and_look_up_user() {
        let db = db();
        let id = new_user(&db, "alice", "alice@example.com");

        let row = db.get_verified_user_by_username("alice").unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.email, "alice@example.com");
        assert!(row.is_verified);
        assert!(row.is_accepting_messages);

        assert!(db.get_user_by_email("alice@example.com").unwrap().is_some());
        assert!(db.get_user_by_identifier("alice").unwrap().is_some());
        assert!(db.get_user_by_identifier("alice@example.com").unwrap().is_some());
        assert!(db.get_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected_by_constraint() {
        let db = db();
        new_user(&db, "alice", "shared@example.com");

        let err = db
            .create_user(&Uuid::new_v4().to_string(), "bob", "shared@example.com", "h")
            .unwrap_err();
        let sqlite_err = err.downcast_ref::<rusqlite::Error>().unwrap();
        assert!(matches!(
            sqlite_err.sqlite_error_code(),
            Some(rusqlite::ErrorCode::ConstraintViolation)
        ));
    }

    #[test]
    fn acceptance_flag_is_last_write_wins() {
        let db = db();
        let id = new_user(&db, "carol", "carol@example.com");

        assert!(db.set_accepting_messages(&id, true).unwrap());
        assert!(db.set_accepting_messages(&id, false).unwrap());
        let row = db.get_user_by_id(&id).unwrap().unwrap();
        assert!(!row.is_accepting_messages);

        // Unknown account updates nothing
        assert!(!db.set_accepting_messages("no-such-id", true).unwrap());
    }

    #[test]
    fn messages_list_newest_first() {
        let db = db();
        let id = new_user(&db, "dave", "dave@example.com");

        for content in ["first", "second", "third"] {
            db.insert_message(&Uuid::new_v4().to_string(), &id, content)
                .unwrap();
        }

        let rows = db.list_messages(&id).unwrap();
        let contents: Vec<&str> = rows.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["third", "second", "first"]);
    }

    #[test]
    fn delete_is_scoped_to_the_owner() {
        let db = db();
        let alice = new_user(&db, "alice", "alice@example.com");
        let bob = new_user(&db, "bob", "bob@example.com");

        let mid = Uuid::new_v4().to_string();
        db.insert_message(&mid, &bob, "for bob only").unwrap();

        // Alice cannot delete Bob's message
        assert!(!db.delete_message(&alice, &mid).unwrap());
        assert_eq!(db.list_messages(&bob).unwrap().len(), 1);

        // Bob can, and a second delete reports a miss
        assert!(db.delete_message(&bob, &mid).unwrap());
        assert!(!db.delete_message(&bob, &mid).unwrap());
        assert!(db.list_messages(&bob).unwrap().is_empty());
    }
}
