//! AniList, reached through its GraphQL API.

mod api_types;
mod client;
mod queries;

#[cfg(test)]
pub(crate) mod testing;

use color_eyre::{eyre::eyre, Result};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::api::{MediaApi, SiteId};
use crate::config::AnilistConfig;
use crate::models::{Identifier, ListEntry, MediaData, MediaKind, SiteType};

use api_types::{ApiCollectionResponse, ApiIdResponse, ApiMediaListResponse, ApiMediaResponse};
pub use client::AnilistClient;

/// [`MediaApi`] over AniList. Media can be looked up by MyAnimeList id
/// directly; list entries need the AniList id.
pub struct AnilistApi {
  client: AnilistClient,
}

impl AnilistApi {
  pub fn new(client: AnilistClient) -> Self {
    Self { client }
  }

  pub fn from_config(config: &AnilistConfig) -> Result<Self> {
    let client = AnilistClient::new(config.endpoint.clone())?.with_rate_limit(
      Duration::from_millis(config.rate_limit_pause_ms),
      Duration::from_secs(config.rate_limit_backoff_secs),
    );
    Ok(Self::new(client))
  }
}

impl MediaApi for AnilistApi {
  fn site(&self) -> SiteType {
    SiteType::Anilist
  }

  fn accepts_foreign(&self, site: SiteType) -> bool {
    site == SiteType::MyAnimeList
  }

  async fn fetch_media(&self, kind: MediaKind, id: SiteId) -> Result<Option<MediaData>> {
    let query = match id.site {
      SiteType::Anilist => queries::MEDIA_BY_ID,
      SiteType::MyAnimeList => queries::MEDIA_BY_MAL_ID,
      SiteType::Kitsu => {
        debug!(%id, "AniList cannot look up Kitsu ids");
        return Ok(None);
      }
    };

    let variables = json!({ "id": id.id, "type": kind });
    let Some(response) = self.client.query::<ApiMediaResponse>(query, variables).await? else {
      return Ok(None);
    };

    response
      .media
      .map(|media| media.into_media())
      .transpose()
      .map_err(|e| eyre!("Invalid media {} from AniList: {}", id, e))
  }

  async fn fetch_list_entry(&self, kind: MediaKind, id: u32, username: &str) -> Result<Option<ListEntry>> {
    let variables = json!({ "id": id, "username": username, "type": kind });
    let Some(response) = self
      .client
      .query::<ApiMediaListResponse>(queries::LIST_ENTRY, variables)
      .await?
    else {
      return Ok(None);
    };

    response
      .media_list
      .map(|entry| entry.into_entry())
      .transpose()
      .map_err(|e| eyre!("Invalid list entry {} for {} from AniList: {}", id, username, e))
  }

  async fn fetch_list(&self, kind: MediaKind, username: &str) -> Result<Vec<ListEntry>> {
    let variables = json!({ "username": username, "type": kind });
    let Some(response) = self
      .client
      .query::<ApiCollectionResponse>(queries::LIST, variables)
      .await?
    else {
      return Ok(Vec::new());
    };

    response
      .collection
      .into_iter()
      .flat_map(|collection| collection.lists)
      .flat_map(|group| group.entries)
      .map(|entry| entry.into_entry())
      .collect::<Result<Vec<_>, _>>()
      .map_err(|e| eyre!("Invalid list entry for {} from AniList: {}", username, e))
  }

  async fn translate_id(&self, kind: MediaKind, id: SiteId) -> Result<Option<Identifier>> {
    if id.site != SiteType::MyAnimeList {
      debug!(%id, "AniList can only translate MyAnimeList ids");
      return Ok(None);
    }

    let variables = json!({ "id": id.id, "type": kind });
    let response = self
      .client
      .query::<ApiIdResponse>(queries::ID_BY_MAL_ID, variables)
      .await?;
    Ok(response.and_then(|r| r.media).map(|pair| pair.identifier()))
  }
}
