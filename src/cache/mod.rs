//! Listing caches

pub mod listing;

pub use listing::{CachedLister, ListingCache};
