//! Wishlist: a personal wishlist manager.
//!
//! A JSON CRUD API over link + notes records, backed by an embedded SQLite
//! file or a PostgreSQL server. This library crate exposes all modules for
//! use by the binary and integration tests.

pub mod api;
pub mod app;
pub mod config;
pub mod database;
pub mod storage;
pub mod types;
