//! Cache Module
//!
//! Provides an expiring key-value store layered over a storage port.

mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::ExpiringStore;

// == Public Constants ==
/// Milliseconds in one TTL minute
pub const MS_PER_MINUTE: u64 = 60_000;
