//! Serde-deserializable types matching AniList GraphQL responses.
//!
//! These types are separate from domain types so the wire format can be
//! lenient (nulls everywhere, fuzzy dates) while domain values stay validated.

use serde::Deserialize;

use crate::models::{
  ConsumingStatus, Date, Identifier, ListEntry, MediaData, MediaDetails, MediaKind, ModelError, Progress,
  Relation, RelationKind, ReleaseStatus, Score, ScoreScale, SiteType, Title, TitleLocale, UserData,
};

// ============================================================================
// Envelope
// ============================================================================

/// Every GraphQL response. Any entry in `errors` means there is no data.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
  pub data: Option<serde_json::Value>,
  pub errors: Option<Vec<serde_json::Value>>,
}

// ============================================================================
// Common nested field types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiTitle {
  pub romaji: Option<String>,
  pub english: Option<String>,
  pub native: Option<String>,
}

/// Any of the parts may be missing.
#[derive(Debug, Default, Deserialize)]
pub struct ApiFuzzyDate {
  pub year: Option<i32>,
  pub month: Option<u32>,
  pub day: Option<u32>,
}

impl ApiFuzzyDate {
  /// A full, valid date or nothing.
  pub fn to_date(&self) -> Option<Date> {
    Date::new(self.year?, self.month?, self.day?).ok()
  }
}

#[derive(Debug, Deserialize)]
pub struct ApiCoverImage {
  pub large: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiUser {
  pub name: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiMediaStatus {
  Finished,
  Releasing,
  NotYetReleased,
  Cancelled,
  Hiatus,
}

impl From<ApiMediaStatus> for ReleaseStatus {
  fn from(status: ApiMediaStatus) -> Self {
    match status {
      ApiMediaStatus::Finished => ReleaseStatus::Finished,
      ApiMediaStatus::Releasing | ApiMediaStatus::Hiatus => ReleaseStatus::Releasing,
      ApiMediaStatus::NotYetReleased => ReleaseStatus::NotReleased,
      ApiMediaStatus::Cancelled => ReleaseStatus::Cancelled,
    }
  }
}

fn identifier(anilist: u32, myanimelist: Option<u32>) -> Identifier {
  let id = Identifier::new(SiteType::Anilist, anilist);
  match myanimelist {
    Some(mal) => id.with(SiteType::MyAnimeList, mal),
    None => id,
  }
}

// ============================================================================
// Media
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiRelationNode {
  pub id: u32,
  #[serde(rename = "idMal")]
  pub id_mal: Option<u32>,
  #[serde(rename = "type")]
  pub media_type: MediaKind,
}

#[derive(Debug, Deserialize)]
pub struct ApiRelationEdge {
  pub node: ApiRelationNode,
  #[serde(rename = "relationType")]
  pub relation_type: RelationKind,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiRelations {
  #[serde(default)]
  pub edges: Vec<ApiRelationEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMedia {
  pub id: u32,
  pub id_mal: Option<u32>,
  #[serde(rename = "type")]
  pub media_type: MediaKind,
  pub title: ApiTitle,
  pub status: Option<ApiMediaStatus>,
  #[serde(default)]
  pub episodes: Option<u32>,
  #[serde(default)]
  pub duration: Option<u32>,
  #[serde(default)]
  pub chapters: Option<u32>,
  #[serde(default)]
  pub volumes: Option<u32>,
  pub cover_image: Option<ApiCoverImage>,
  #[serde(default)]
  pub start_date: Option<ApiFuzzyDate>,
  #[serde(default)]
  pub end_date: Option<ApiFuzzyDate>,
  #[serde(default)]
  pub relations: Option<ApiRelations>,
}

impl ApiMedia {
  pub fn identifier(&self) -> Identifier {
    identifier(self.id, self.id_mal)
  }

  pub fn into_media(self) -> Result<MediaData, ModelError> {
    let id = self.identifier();
    let title = Title::new(
      [
        (TitleLocale::Romaji, self.title.romaji),
        (TitleLocale::English, self.title.english),
        (TitleLocale::Native, self.title.native),
      ],
      TitleLocale::Romaji,
    )?;

    let relations = self
      .relations
      .unwrap_or_default()
      .edges
      .into_iter()
      .map(|edge| {
        Relation::new(
          id.clone(),
          self.media_type,
          identifier(edge.node.id, edge.node.id_mal),
          edge.node.media_type,
          edge.relation_type,
        )
      })
      .collect::<Result<Vec<_>, _>>()?;

    let details = match self.media_type {
      MediaKind::Anime => MediaDetails::Anime {
        episode_count: self.episodes,
        episode_duration: self.duration,
      },
      MediaKind::Manga => MediaDetails::Manga {
        chapter_count: self.chapters,
        volume_count: self.volumes,
      },
    };

    // A media without a status has not been released yet
    let status = self.status.map_or(ReleaseStatus::NotReleased, ReleaseStatus::from);
    let start = self.start_date.as_ref().and_then(ApiFuzzyDate::to_date);
    let end = self.end_date.as_ref().and_then(ApiFuzzyDate::to_date);

    Ok(
      MediaData::new(id, title, status, details)
        .with_dates(start, end)
        .with_cover_url(self.cover_image.and_then(|c| c.large))
        .with_relations(relations),
    )
  }
}

// ============================================================================
// Media list entries
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMediaList {
  pub user: ApiUser,
  /// Requested as POINT_100
  pub score: Option<f64>,
  pub status: ConsumingStatus,
  #[serde(default)]
  pub progress: Option<u32>,
  #[serde(default)]
  pub progress_volumes: Option<u32>,
  #[serde(default)]
  pub started_at: Option<ApiFuzzyDate>,
  #[serde(default)]
  pub completed_at: Option<ApiFuzzyDate>,
  pub media: ApiMedia,
}

impl ApiMediaList {
  pub fn into_entry(self) -> Result<ListEntry, ModelError> {
    let kind = self.media.media_type;
    let media = self.media.into_media()?;

    let points = self.score.unwrap_or(0.0).round_ties_even().max(0.0) as u32;
    let score = Score::new(points, ScoreScale::Percentage)?;

    let progress = match kind {
      MediaKind::Anime => Progress::Anime {
        episode_progress: self.progress.unwrap_or(0),
      },
      MediaKind::Manga => Progress::Manga {
        chapter_progress: self.progress.unwrap_or(0),
        volume_progress: self.progress_volumes.unwrap_or(0),
      },
    };

    let user = UserData::new(media.id().clone(), self.user.name, score, self.status, progress).with_dates(
      self.started_at.as_ref().and_then(ApiFuzzyDate::to_date),
      self.completed_at.as_ref().and_then(ApiFuzzyDate::to_date),
    );

    ListEntry::new(media, user)
  }
}

// ============================================================================
// Query responses
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiMediaResponse {
  #[serde(rename = "Media")]
  pub media: Option<ApiMedia>,
}

#[derive(Debug, Deserialize)]
pub struct ApiMediaListResponse {
  #[serde(rename = "MediaList")]
  pub media_list: Option<ApiMediaList>,
}

#[derive(Debug, Deserialize)]
pub struct ApiListGroup {
  #[serde(default)]
  pub entries: Vec<ApiMediaList>,
}

#[derive(Debug, Deserialize)]
pub struct ApiCollection {
  #[serde(default)]
  pub lists: Vec<ApiListGroup>,
}

#[derive(Debug, Deserialize)]
pub struct ApiCollectionResponse {
  #[serde(rename = "MediaListCollection")]
  pub collection: Option<ApiCollection>,
}

#[derive(Debug, Deserialize)]
pub struct ApiIdPair {
  pub id: u32,
  #[serde(rename = "idMal")]
  pub id_mal: Option<u32>,
}

impl ApiIdPair {
  pub fn identifier(&self) -> Identifier {
    identifier(self.id, self.id_mal)
  }
}

#[derive(Debug, Deserialize)]
pub struct ApiIdResponse {
  #[serde(rename = "Media")]
  pub media: Option<ApiIdPair>,
}


#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn media() -> ApiMedia {
    serde_json::from_value(fixtures::media_json()).unwrap()
  }

  #[test]
  fn test_media_conversion() {
    let media = media().into_media().unwrap();
    assert_eq!(media.id(), &identifier(5114, Some(5114)));
    assert_eq!(media.kind(), MediaKind::Anime);
    assert_eq!(media.title().get(), "Hagane no Renkinjutsushi: FULLMETAL ALCHEMIST");
    assert_eq!(media.releasing_status(), ReleaseStatus::Finished);
    assert_eq!(media.releasing_start(), Some(Date::new(2009, 4, 5).unwrap()));
    assert_eq!(media.cover_url(), Some("https://example.org/cover/5114.jpg"));
    assert_eq!(
      media.details(),
      &MediaDetails::Anime {
        episode_count: Some(64),
        episode_duration: Some(24)
      }
    );

    let relations = media.relations();
    assert_eq!(relations.len(), 2);
    assert_eq!(relations[0].dest_type(), MediaKind::Manga);
    assert_eq!(relations[0].relation_type(), RelationKind::Source);
    assert!(relations[1].is_important());
  }

  #[test]
  fn test_status_mapping() {
    let mut value = fixtures::media_json();
    for (wire, expected) in [
      (json!("NOT_YET_RELEASED"), ReleaseStatus::NotReleased),
      (json!("HIATUS"), ReleaseStatus::Releasing),
      (json!("CANCELLED"), ReleaseStatus::Cancelled),
      (json!(null), ReleaseStatus::NotReleased),
    ] {
      value["status"] = wire;
      let media: ApiMedia = serde_json::from_value(value.clone()).unwrap();
      assert_eq!(media.into_media().unwrap().releasing_status(), expected);
    }
  }

  #[test]
  fn test_sparse_media() {
    let value = json!({
      "id": 1,
      "idMal": null,
      "type": "MANGA",
      "title": {"romaji": null, "english": "Only English", "native": null},
      "status": "RELEASING",
      "coverImage": null,
      "startDate": {"year": 2020, "month": null, "day": null},
      "relations": {"edges": []}
    });
    let media: ApiMedia = serde_json::from_value(value).unwrap();
    let media = media.into_media().unwrap();
    assert_eq!(media.id(), &Identifier::new(SiteType::Anilist, 1));
    assert_eq!(media.title().get(), "Only English");
    assert_eq!(media.releasing_start(), None);
    assert_eq!(media.cover_url(), None);
    assert_eq!(
      media.details(),
      &MediaDetails::Manga {
        chapter_count: None,
        volume_count: None
      }
    );
  }

  #[test]
  fn test_untitled_media_rejected() {
    let mut value = fixtures::media_json();
    value["title"] = json!({"romaji": null, "english": null, "native": null});
    let media: ApiMedia = serde_json::from_value(value).unwrap();
    assert_eq!(media.into_media().unwrap_err(), ModelError::EmptyTitle);
  }

  #[test]
  fn test_list_entry_conversion() {
    let list: ApiMediaList = serde_json::from_value(fixtures::list_entry_json()).unwrap();
    let entry = list.into_entry().unwrap();
    let user = entry.user();

    assert_eq!(user.username(), "namboy94");
    assert_eq!(user.score(), Score::new(95, ScoreScale::Percentage).unwrap());
    assert_eq!(user.consuming_status(), ConsumingStatus::Completed);
    assert_eq!(user.progress(), Progress::Anime { episode_progress: 64 });
    assert_eq!(user.consuming_start(), Some(Date::new(2018, 1, 1).unwrap()));
    // Fuzzy dates without a day are dropped
    assert_eq!(user.consuming_end(), None);
    assert_eq!(user.id(), entry.id());
  }

  #[test]
  fn test_unscored_entry() {
    let mut value = fixtures::list_entry_json();
    value["score"] = json!(null);
    value["status"] = json!("PLANNING");
    let list: ApiMediaList = serde_json::from_value(value).unwrap();
    let entry = list.into_entry().unwrap();
    assert!(entry.user().score().is_zero());
  }

  #[test]
  fn test_fractional_score_rounds() {
    let mut value = fixtures::list_entry_json();
    value["score"] = json!(72.5);
    let list: ApiMediaList = serde_json::from_value(value).unwrap();
    assert_eq!(list.into_entry().unwrap().user().score().value(), 72);
  }
}
