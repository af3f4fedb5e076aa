//! Table definition for the embedded wishlist store.

use rusqlite::Connection;

/// Creates `wishlist_items` and its listing index if they are absent.
///
/// Idempotent; runs on every open.
pub fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS wishlist_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            link TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_wishlist_items_created_at ON wishlist_items(created_at);
        ",
    )
}
