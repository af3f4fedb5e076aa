// Shared type definitions for the wishlist service.

pub mod errors;
pub mod wishlist;

pub use errors::{ConfigError, StorageError};
pub use wishlist::{ItemPayload, NewWishlistItem, WishlistItem, WishlistItemPatch};
