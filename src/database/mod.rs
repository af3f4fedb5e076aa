//! SQLite database layer.
//!
//! Provides connection management and table creation for the embedded
//! storage backend.
//!
//! # Usage
//!
//! ```no_run
//! use wishlist::database::Database;
//!
//! // Open a persistent database
//! let db = Database::open("data/wishlist.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//!
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod schema;

pub use connection::Database;
