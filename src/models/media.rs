use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{check_variant_keys, Date, Identifier, MediaKind, ModelError, Relation, ReleaseStatus, Title};

/// Fields only one media kind has. The variant is the `media_type`
/// discriminator in serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaDetails {
  Anime {
    #[serde(deserialize_with = "Option::deserialize")]
    episode_count: Option<u32>,
    /// Minutes per episode
    #[serde(deserialize_with = "Option::deserialize")]
    episode_duration: Option<u32>,
  },
  Manga {
    #[serde(deserialize_with = "Option::deserialize")]
    chapter_count: Option<u32>,
    #[serde(deserialize_with = "Option::deserialize")]
    volume_count: Option<u32>,
  },
}

impl MediaDetails {
  pub fn kind(&self) -> MediaKind {
    match self {
      MediaDetails::Anime { .. } => MediaKind::Anime,
      MediaDetails::Manga { .. } => MediaKind::Manga,
    }
  }

  fn field_names(&self) -> &'static [&'static str] {
    match self {
      MediaDetails::Anime { .. } => &["episode_count", "episode_duration"],
      MediaDetails::Manga { .. } => &["chapter_count", "volume_count"],
    }
  }
}

/// User-independent catalog facts about one anime or manga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MediaDataRecord")]
pub struct MediaData {
  id: Identifier,
  title: Title,
  relations: Vec<Relation>,
  releasing_status: ReleaseStatus,
  #[serde(deserialize_with = "Option::deserialize")]
  releasing_start: Option<Date>,
  #[serde(deserialize_with = "Option::deserialize")]
  releasing_end: Option<Date>,
  #[serde(deserialize_with = "Option::deserialize")]
  cover_url: Option<String>,
  #[serde(flatten)]
  details: MediaDetails,
}

impl MediaData {
  /// Media data without dates, cover or relations; see the `with_*` builders.
  pub fn new(id: Identifier, title: Title, releasing_status: ReleaseStatus, details: MediaDetails) -> Self {
    Self {
      id,
      title,
      relations: Vec::new(),
      releasing_status,
      releasing_start: None,
      releasing_end: None,
      cover_url: None,
      details,
    }
  }

  pub fn with_dates(mut self, start: Option<Date>, end: Option<Date>) -> Self {
    self.releasing_start = start;
    self.releasing_end = end;
    self
  }

  pub fn with_cover_url(mut self, cover_url: Option<String>) -> Self {
    self.cover_url = cover_url;
    self
  }

  pub fn with_relations(mut self, relations: Vec<Relation>) -> Self {
    self.relations = relations;
    self
  }

  pub fn id(&self) -> &Identifier {
    &self.id
  }

  pub fn kind(&self) -> MediaKind {
    self.details.kind()
  }

  pub fn title(&self) -> &Title {
    &self.title
  }

  pub fn relations(&self) -> &[Relation] {
    &self.relations
  }

  pub fn releasing_status(&self) -> ReleaseStatus {
    self.releasing_status
  }

  pub fn releasing_start(&self) -> Option<Date> {
    self.releasing_start
  }

  pub fn releasing_end(&self) -> Option<Date> {
    self.releasing_end
  }

  pub fn cover_url(&self) -> Option<&str> {
    self.cover_url.as_deref()
  }

  pub fn details(&self) -> &MediaDetails {
    &self.details
  }
}

// `deny_unknown_fields` has no effect next to `flatten`, so stray keys are
// collected into `rest` and checked against the selected variant.
#[derive(Deserialize)]
struct MediaDataRecord {
  id: Identifier,
  title: Title,
  relations: Vec<Relation>,
  releasing_status: ReleaseStatus,
  #[serde(deserialize_with = "Option::deserialize")]
  releasing_start: Option<Date>,
  #[serde(deserialize_with = "Option::deserialize")]
  releasing_end: Option<Date>,
  #[serde(deserialize_with = "Option::deserialize")]
  cover_url: Option<String>,
  #[serde(flatten)]
  details: MediaDetails,
  #[serde(flatten)]
  rest: Map<String, Value>,
}

impl TryFrom<MediaDataRecord> for MediaData {
  type Error = ModelError;

  fn try_from(record: MediaDataRecord) -> Result<Self, Self::Error> {
    check_variant_keys(&record.rest, record.details.field_names())?;
    Ok(
      MediaData::new(record.id, record.title, record.releasing_status, record.details)
        .with_dates(record.releasing_start, record.releasing_end)
        .with_cover_url(record.cover_url)
        .with_relations(record.relations),
    )
  }
}

#[cfg(test)]
pub(crate) mod fixtures {
  use super::*;
  use crate::models::{RelationKind, SiteType, TitleLocale};

  pub fn title(romaji: &str) -> Title {
    Title::new([(TitleLocale::Romaji, Some(romaji.to_string()))], TitleLocale::Romaji).unwrap()
  }

  /// Fullmetal Alchemist: Brotherhood, with both AniList and MAL ids.
  pub fn anime() -> MediaData {
    let id = Identifier::new(SiteType::Anilist, 5114).with(SiteType::MyAnimeList, 5114);
    let sequel = Relation::new(
      id.clone(),
      MediaKind::Anime,
      Identifier::new(SiteType::Anilist, 6421).with(SiteType::MyAnimeList, 6421),
      MediaKind::Anime,
      RelationKind::SideStory,
    )
    .unwrap();
    MediaData::new(
      id,
      title("Hagane no Renkinjutsushi: FULLMETAL ALCHEMIST"),
      ReleaseStatus::Finished,
      MediaDetails::Anime {
        episode_count: Some(64),
        episode_duration: Some(24),
      },
    )
    .with_dates(Some(Date::new(2009, 4, 5).unwrap()), Some(Date::new(2010, 7, 4).unwrap()))
    .with_cover_url(Some("https://example.org/cover/5114.jpg".to_string()))
    .with_relations(vec![sequel])
  }

  pub fn manga() -> MediaData {
    let id = Identifier::new(SiteType::Anilist, 30002).with(SiteType::MyAnimeList, 2);
    MediaData::new(
      id,
      title("Berserk"),
      ReleaseStatus::Releasing,
      MediaDetails::Manga {
        chapter_count: None,
        volume_count: None,
      },
    )
    .with_dates(Some(Date::new(1989, 8, 25).unwrap()), None)
  }
}
