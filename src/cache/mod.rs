//! Local cache of fetched records.
//!
//! Records are grouped by model kind, then by site, then by a tag made of the
//! media kind, the site-specific id and, for user data, the username. The
//! store lives in memory and is mirrored to a single JSON file:
//! - Records expire a fixed time after they were stored; expiry is checked on read
//! - The file is rewritten after a configurable number of additions
//! - Id translations are memoized in their own slice (`ID_MAPPING`)

mod storage;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use storage::{CacheDocument, CacheRecord, CacheStore, Expiry, Slots, CACHE_FILE};
pub use traits::{slot_tag, Cacheable, Clock, ModelKind, SystemClock};
