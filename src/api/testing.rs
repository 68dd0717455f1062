use color_eyre::Result;
use std::sync::Mutex;

use super::{MediaApi, SiteId};
use crate::models::{Identifier, ListEntry, MediaData, MediaKind, SiteType};

/// How often each remote operation was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calls {
  pub media: usize,
  pub entry: usize,
  pub list: usize,
  pub translate: usize,
}

/// In-memory AniList stand-in. Accepts MyAnimeList ids for media lookups.
#[derive(Default)]
pub struct FakeApi {
  media: Vec<MediaData>,
  entries: Vec<ListEntry>,
  calls: Mutex<Calls>,
}

impl FakeApi {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_media(mut self, media: MediaData) -> Self {
    self.media.push(media);
    self
  }

  pub fn with_entry(mut self, entry: ListEntry) -> Self {
    self.media.push(entry.media_data());
    self.entries.push(entry);
    self
  }

  pub fn calls(&self) -> Calls {
    *self.calls.lock().unwrap()
  }

  fn count(&self, f: impl FnOnce(&mut Calls)) {
    let mut calls = self.calls.lock().unwrap();
    f(&mut *calls);
  }

  fn find_media(&self, kind: MediaKind, id: SiteId) -> Option<&MediaData> {
    self
      .media
      .iter()
      .find(|m| m.kind() == kind && m.id().get(id.site) == Some(id.id))
  }
}

impl MediaApi for FakeApi {
  fn site(&self) -> SiteType {
    SiteType::Anilist
  }

  fn accepts_foreign(&self, site: SiteType) -> bool {
    site == SiteType::MyAnimeList
  }

  async fn fetch_media(&self, kind: MediaKind, id: SiteId) -> Result<Option<MediaData>> {
    self.count(|c| c.media += 1);
    Ok(self.find_media(kind, id).cloned())
  }

  async fn fetch_list_entry(&self, kind: MediaKind, id: u32, username: &str) -> Result<Option<ListEntry>> {
    self.count(|c| c.entry += 1);
    let entry = self.entries.iter().find(|e| {
      e.kind() == kind && e.id().get(SiteType::Anilist) == Some(id) && e.username() == username
    });
    Ok(entry.cloned())
  }

  async fn fetch_list(&self, kind: MediaKind, username: &str) -> Result<Vec<ListEntry>> {
    self.count(|c| c.list += 1);
    let entries = self
      .entries
      .iter()
      .filter(|e| e.kind() == kind && e.username() == username)
      .cloned()
      .collect();
    Ok(entries)
  }

  async fn translate_id(&self, kind: MediaKind, id: SiteId) -> Result<Option<Identifier>> {
    self.count(|c| c.translate += 1);
    // Let concurrent callers interleave like real requests would
    tokio::task::yield_now().await;
    Ok(self.find_media(kind, id).map(|m| m.id().clone()))
  }
}
