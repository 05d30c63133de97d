//! Local persistence for Skycast
//!
//! Two independent JSON-file stores: saved favourite locations and
//! contact-form submissions. Both are deliberately best-effort - a missing
//! or corrupt file degrades to an empty collection rather than failing the
//! primary action.

pub mod contact;
pub mod favorites;

pub use contact::{ContactError, ContactStore, ContactSubmission};
pub use favorites::{FavoriteLocation, FavoritesStore};
