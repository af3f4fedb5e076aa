//! HTTP API for the wishlist.
//!
//! | Method | Path             | Success                 |
//! |--------|------------------|-------------------------|
//! | GET    | `/wishlist`      | 200, items newest first |
//! | POST   | `/wishlist`      | 201, created item       |
//! | GET    | `/wishlist/:id`  | 200, item               |
//! | PUT    | `/wishlist/:id`  | 200, updated item       |
//! | DELETE | `/wishlist/:id`  | 200, `{"success":true}` |
//!
//! The same routes are mounted under `/api`. `GET /health` reports backend
//! reachability.

pub mod error;
pub mod routes;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use routes::{health_routes, wishlist_routes, SharedStore};
pub use server::{build_router, HttpServer};
