use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- username is intentionally NOT UNIQUE: uniqueness is enforced by the
        -- provisioning service against verified accounts only, so an
        -- unverified duplicate may transiently exist.
        CREATE TABLE IF NOT EXISTS users (
            id                      TEXT PRIMARY KEY,
            username                TEXT NOT NULL,
            email                   TEXT NOT NULL UNIQUE,
            password                TEXT NOT NULL,
            is_verified             INTEGER NOT NULL DEFAULT 1,
            is_accepting_messages   INTEGER NOT NULL DEFAULT 1,
            created_at              TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_users_username
            ON users(username);

        CREATE TABLE IF NOT EXISTS messages (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_user
            ON messages(user_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
