use serde::{Deserialize, Serialize};

use super::{ConsumingStatus, Identifier, MediaData, MediaKind, ModelError, ReleaseStatus, UserData};

/// A media entry paired with one user's state for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ListEntryRecord", into = "ListEntryRecord")]
pub struct ListEntry {
  media: MediaData,
  user: UserData,
}

impl ListEntry {
  /// Both halves must describe the same entry: same identifier, same kind.
  pub fn new(media: MediaData, user: UserData) -> Result<Self, ModelError> {
    if media.id() != user.id() || media.kind() != user.kind() {
      return Err(ModelError::MismatchedEntry);
    }
    Ok(Self { media, user })
  }

  pub fn media(&self) -> &MediaData {
    &self.media
  }

  pub fn user(&self) -> &UserData {
    &self.user
  }

  /// Owned copy of the media half.
  pub fn media_data(&self) -> MediaData {
    self.media.clone()
  }

  /// Owned copy of the user half.
  pub fn user_data(&self) -> UserData {
    self.user.clone()
  }

  pub fn into_parts(self) -> (MediaData, UserData) {
    (self.media, self.user)
  }

  pub fn kind(&self) -> MediaKind {
    self.media.kind()
  }

  pub fn id(&self) -> &Identifier {
    self.media.id()
  }

  pub fn username(&self) -> &str {
    self.user.username()
  }

  /// Whether the user state is plausible given how far the media has been released.
  pub fn is_valid_entry(&self) -> bool {
    if !self.user.is_valid_entry() {
      return false;
    }

    let status = self.user.consuming_status();
    let scored = !self.user.score().is_zero();
    let ended = self.user.consuming_end().is_some();

    match self.media.releasing_status() {
      ReleaseStatus::Finished => true,
      ReleaseStatus::Releasing | ReleaseStatus::Cancelled => !status.is_finished() && !ended && !scored,
      ReleaseStatus::NotReleased => {
        status == ConsumingStatus::Planning && self.user.consuming_start().is_none() && !ended && !scored
      }
    }
  }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListEntryRecord {
  media_type: MediaKind,
  media_data: MediaData,
  user_data: UserData,
}

impl From<ListEntry> for ListEntryRecord {
  fn from(entry: ListEntry) -> Self {
    Self {
      media_type: entry.kind(),
      media_data: entry.media,
      user_data: entry.user,
    }
  }
}

impl TryFrom<ListEntryRecord> for ListEntry {
  type Error = ModelError;

  fn try_from(record: ListEntryRecord) -> Result<Self, Self::Error> {
    if record.media_data.kind() != record.media_type {
      return Err(ModelError::MismatchedEntry);
    }
    ListEntry::new(record.media_data, record.user_data)
  }
}
