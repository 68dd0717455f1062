use serde::{Deserialize, Serialize};

use super::{Identifier, MediaData, MediaKind, UserData};
use crate::cache::{CacheDocument, Cacheable, ModelKind, Slots};

/// What a foreign site id is known to translate to.
///
/// Stored under the foreign site. When the translation turned up nothing the
/// identifier carries only the foreign id, so the lookup is not repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdMapping {
  media_type: MediaKind,
  id: Identifier,
}

impl IdMapping {
  pub fn new(media_type: MediaKind, id: Identifier) -> Self {
    Self { media_type, id }
  }

  pub fn id(&self) -> &Identifier {
    &self.id
  }

  pub fn into_id(self) -> Identifier {
    self.id
  }
}

impl Cacheable for IdMapping {
  const MODEL: ModelKind = ModelKind::IdMapping;

  fn identifier(&self) -> &Identifier {
    &self.id
  }

  fn media_kind(&self) -> MediaKind {
    self.media_type
  }

  fn slots(document: &CacheDocument) -> &Slots<Self> {
    &document.id_mapping
  }

  fn slots_mut(document: &mut CacheDocument) -> &mut Slots<Self> {
    &mut document.id_mapping
  }
}

impl Cacheable for MediaData {
  const MODEL: ModelKind = ModelKind::MediaData;

  fn identifier(&self) -> &Identifier {
    self.id()
  }

  fn media_kind(&self) -> MediaKind {
    self.kind()
  }

  fn slots(document: &CacheDocument) -> &Slots<Self> {
    &document.media_data
  }

  fn slots_mut(document: &mut CacheDocument) -> &mut Slots<Self> {
    &mut document.media_data
  }
}

impl Cacheable for UserData {
  const MODEL: ModelKind = ModelKind::MediaUserData;

  fn identifier(&self) -> &Identifier {
    self.id()
  }

  fn media_kind(&self) -> MediaKind {
    self.kind()
  }

  fn username(&self) -> Option<&str> {
    Some(UserData::username(self))
  }

  fn slots(document: &CacheDocument) -> &Slots<Self> {
    &document.media_user_data
  }

  fn slots_mut(document: &mut CacheDocument) -> &mut Slots<Self> {
    &mut document.media_user_data
  }
}
