use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{check_variant_keys, ConsumingStatus, Date, Identifier, MediaKind, ModelError, Score};

/// Per-kind progress counters. The variant is the `media_type`
/// discriminator in serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Progress {
  Anime { episode_progress: u32 },
  Manga { chapter_progress: u32, volume_progress: u32 },
}

impl Progress {
  pub fn kind(&self) -> MediaKind {
    match self {
      Progress::Anime { .. } => MediaKind::Anime,
      Progress::Manga { .. } => MediaKind::Manga,
    }
  }

  fn field_names(&self) -> &'static [&'static str] {
    match self {
      Progress::Anime { .. } => &["episode_progress"],
      Progress::Manga { .. } => &["chapter_progress", "volume_progress"],
    }
  }
}

/// One user's consumption state for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDataRecord")]
pub struct UserData {
  id: Identifier,
  username: String,
  score: Score,
  consuming_status: ConsumingStatus,
  #[serde(deserialize_with = "Option::deserialize")]
  consuming_start: Option<Date>,
  #[serde(deserialize_with = "Option::deserialize")]
  consuming_end: Option<Date>,
  #[serde(flatten)]
  progress: Progress,
}

impl UserData {
  pub fn new(
    id: Identifier,
    username: impl Into<String>,
    score: Score,
    consuming_status: ConsumingStatus,
    progress: Progress,
  ) -> Self {
    Self {
      id,
      username: username.into(),
      score,
      consuming_status,
      consuming_start: None,
      consuming_end: None,
      progress,
    }
  }

  pub fn with_dates(mut self, start: Option<Date>, end: Option<Date>) -> Self {
    self.consuming_start = start;
    self.consuming_end = end;
    self
  }

  /// Id of the media entry this data belongs to.
  pub fn id(&self) -> &Identifier {
    &self.id
  }

  pub fn kind(&self) -> MediaKind {
    self.progress.kind()
  }

  pub fn username(&self) -> &str {
    &self.username
  }

  pub fn score(&self) -> Score {
    self.score
  }

  pub fn consuming_status(&self) -> ConsumingStatus {
    self.consuming_status
  }

  pub fn consuming_start(&self) -> Option<Date> {
    self.consuming_start
  }

  pub fn consuming_end(&self) -> Option<Date> {
    self.consuming_end
  }

  pub fn progress(&self) -> Progress {
    self.progress
  }

  /// Whether score, dates and status agree with each other.
  ///
  /// Finished entries need a score and both dates, started ones a start date
  /// and no end date, planned ones neither date and no score.
  pub fn is_valid_entry(&self) -> bool {
    let scored = !self.score.is_zero();
    let started = self.consuming_start.is_some();
    let ended = self.consuming_end.is_some();

    match self.consuming_status {
      ConsumingStatus::Completed | ConsumingStatus::Repeating => scored && started && ended,
      ConsumingStatus::Current | ConsumingStatus::Paused | ConsumingStatus::Dropped => started && !ended,
      ConsumingStatus::Planning => !scored && !started && !ended,
    }
  }
}

#[derive(Deserialize)]
struct UserDataRecord {
  id: Identifier,
  username: String,
  score: Score,
  consuming_status: ConsumingStatus,
  #[serde(deserialize_with = "Option::deserialize")]
  consuming_start: Option<Date>,
  #[serde(deserialize_with = "Option::deserialize")]
  consuming_end: Option<Date>,
  #[serde(flatten)]
  progress: Progress,
  #[serde(flatten)]
  rest: Map<String, Value>,
}

impl TryFrom<UserDataRecord> for UserData {
  type Error = ModelError;

  fn try_from(record: UserDataRecord) -> Result<Self, Self::Error> {
    check_variant_keys(&record.rest, record.progress.field_names())?;
    Ok(
      UserData::new(
        record.id,
        record.username,
        record.score,
        record.consuming_status,
        record.progress,
      )
      .with_dates(record.consuming_start, record.consuming_end),
    )
  }
}
