//! Core traits and types for the cache store.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::storage::{CacheDocument, Slots};
use crate::codec::Codec;
use crate::models::{Identifier, MediaKind};

/// The slices of the cache document, one per kind of stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelKind {
  IdMapping,
  MediaData,
  MediaUserData,
}

impl fmt::Display for ModelKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ModelKind::IdMapping => "ID_MAPPING",
      ModelKind::MediaData => "MEDIA_DATA",
      ModelKind::MediaUserData => "MEDIA_USER_DATA",
    };
    f.write_str(name)
  }
}

/// Values the store can hold.
///
/// Implementors say which slice they live in and what goes into their tag.
pub trait Cacheable: Codec + Clone {
  const MODEL: ModelKind;

  fn identifier(&self) -> &Identifier;

  fn media_kind(&self) -> MediaKind;

  /// Only user data is per user.
  fn username(&self) -> Option<&str> {
    None
  }

  fn slots(document: &CacheDocument) -> &Slots<Self>;

  fn slots_mut(document: &mut CacheDocument) -> &mut Slots<Self>;
}

/// Slot tag within one site: `KIND-id` or `KIND-id-username`.
pub fn slot_tag(kind: MediaKind, id: u32, username: Option<&str>) -> String {
  match username {
    Some(username) => format!("{}-{}-{}", kind, id, username),
    None => format!("{}-{}", kind, id),
  }
}

/// Source of the current time, in seconds since the epoch.
pub trait Clock: Send + Sync {
  fn now(&self) -> f64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slot_tag() {
    assert_eq!(slot_tag(MediaKind::Anime, 9253, None), "ANIME-9253");
    assert_eq!(slot_tag(MediaKind::Manga, 2, Some("namboy94")), "MANGA-2-namboy94");
  }

  #[test]
  fn test_system_clock_is_recent() {
    // 2020-01-01
    assert!(SystemClock.now() > 1_577_836_800.0);
  }
}
