use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ModelError;

/// Anime or manga. Serialized as the `media_type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaKind {
  Anime,
  Manga,
}

impl MediaKind {
  pub fn name(self) -> &'static str {
    match self {
      MediaKind::Anime => "ANIME",
      MediaKind::Manga => "MANGA",
    }
  }
}

impl fmt::Display for MediaKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for MediaKind {
  type Err = ModelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_uppercase().as_str() {
      "ANIME" => Ok(MediaKind::Anime),
      "MANGA" => Ok(MediaKind::Manga),
      _ => Err(ModelError::UnknownMediaKind(s.to_string())),
    }
  }
}

/// Publication state of a media entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseStatus {
  Finished,
  Releasing,
  NotReleased,
  Cancelled,
}

/// Where a user stands with an entry on their list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumingStatus {
  Current,
  Planning,
  Completed,
  Dropped,
  Paused,
  Repeating,
}

impl ConsumingStatus {
  /// Completed at least once.
  pub fn is_finished(self) -> bool {
    matches!(self, ConsumingStatus::Completed | ConsumingStatus::Repeating)
  }

  /// Started but not completed.
  pub fn is_started(self) -> bool {
    matches!(
      self,
      ConsumingStatus::Current | ConsumingStatus::Paused | ConsumingStatus::Dropped
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_media_kind_parse() {
    assert_eq!("anime".parse::<MediaKind>(), Ok(MediaKind::Anime));
    assert_eq!("MANGA".parse::<MediaKind>(), Ok(MediaKind::Manga));
    assert!("novel".parse::<MediaKind>().is_err());
  }

  #[test]
  fn test_status_groups() {
    assert!(ConsumingStatus::Repeating.is_finished());
    assert!(!ConsumingStatus::Repeating.is_started());
    assert!(ConsumingStatus::Dropped.is_started());
    assert!(!ConsumingStatus::Planning.is_started());
    assert!(!ConsumingStatus::Planning.is_finished());
  }

  #[test]
  fn test_wire_names() {
    assert_eq!(
      serde_json::to_string(&ReleaseStatus::NotReleased).unwrap(),
      "\"NOT_RELEASED\""
    );
    assert_eq!(serde_json::to_string(&MediaKind::Anime).unwrap(), "\"ANIME\"");
  }
}
