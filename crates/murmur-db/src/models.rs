/// Database row types — these map directly to SQLite rows.
/// Distinct from murmur-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
}
