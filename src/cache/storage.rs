//! JSON file backed cache store.

use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

use super::traits::{slot_tag, Cacheable, Clock, SystemClock};
use crate::codec::Codec;
use crate::models::{AnyId, IdMapping, ListEntry, MediaData, MediaKind, SiteType, UserData};

/// Name of the cache file inside the cache directory.
pub const CACHE_FILE: &str = "cache.json";

/// A stored value and when it was stored (seconds since the epoch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheRecord<T> {
  pub timestamp: f64,
  pub data: T,
}

/// Site → tag → record, for one model kind.
pub type Slots<T> = BTreeMap<SiteType, BTreeMap<String, CacheRecord<T>>>;

/// The whole cache file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheDocument {
  #[serde(rename = "ID_MAPPING", default)]
  pub(crate) id_mapping: Slots<IdMapping>,
  #[serde(rename = "MEDIA_DATA", default)]
  pub(crate) media_data: Slots<MediaData>,
  #[serde(rename = "MEDIA_USER_DATA", default)]
  pub(crate) media_user_data: Slots<UserData>,
}

impl CacheDocument {
  pub fn len(&self) -> usize {
    fn count<T>(slots: &Slots<T>) -> usize {
      slots.values().map(BTreeMap::len).sum()
    }
    count(&self.id_mapping) + count(&self.media_data) + count(&self.media_user_data)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl Codec for CacheDocument {}

/// How long a record stays valid after it was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
  Never,
  After(Duration),
}

impl Expiry {
  /// Negative values mean records never expire.
  pub fn from_seconds(seconds: i64) -> Self {
    match u64::try_from(seconds) {
      Ok(seconds) => Expiry::After(Duration::from_secs(seconds)),
      Err(_) => Expiry::Never,
    }
  }

  fn is_expired(&self, stored_at: f64, now: f64) -> bool {
    match self {
      Expiry::Never => false,
      Expiry::After(ttl) => now - stored_at > ttl.as_secs_f64(),
    }
  }
}

impl Default for Expiry {
  fn default() -> Self {
    Expiry::After(Duration::from_secs(6000))
  }
}

struct StoreState {
  document: CacheDocument,
  /// Counted writes since the last flush
  pending: usize,
}

/// Keeps fetched values in memory and mirrors them to one JSON file.
///
/// Expired records are dropped when they are read. The file is rewritten
/// whenever `write_after` counted additions have piled up, or on [`write`].
///
/// [`write`]: CacheStore::write
pub struct CacheStore {
  path: PathBuf,
  expiry: Expiry,
  write_after: usize,
  clock: Box<dyn Clock>,
  state: Mutex<StoreState>,
}

impl CacheStore {
  /// Open the store in `directory`, creating the directory and an empty
  /// cache file if needed.
  pub fn open(directory: impl AsRef<Path>) -> Result<Self> {
    let directory = directory.as_ref();
    std::fs::create_dir_all(directory)
      .map_err(|e| eyre!("Failed to create cache directory {}: {}", directory.display(), e))?;

    let store = Self {
      path: directory.join(CACHE_FILE),
      expiry: Expiry::default(),
      write_after: 20,
      clock: Box::new(SystemClock),
      state: Mutex::new(StoreState {
        document: CacheDocument::default(),
        pending: 0,
      }),
    };

    if !store.path.exists() {
      store.write()?;
    }
    store.load()?;

    Ok(store)
  }

  pub fn with_expiry(mut self, expiry: Expiry) -> Self {
    self.expiry = expiry;
    self
  }

  pub fn with_write_after(mut self, write_after: usize) -> Self {
    self.write_after = write_after;
    self
  }

  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.clock = Box::new(clock);
    self
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Store `value` under `site`.
  ///
  /// Values without an id on `site` are skipped. Unless `suppress_counting`
  /// is set the addition counts towards the next flush.
  pub fn add<T: Cacheable>(&self, site: SiteType, value: T, suppress_counting: bool) -> Result<()> {
    let Some(id) = value.identifier().get(site) else {
      debug!(model = %T::MODEL, %site, id = %value.identifier(), "No id for site, not caching");
      return Ok(());
    };
    let tag = slot_tag(value.media_kind(), id, value.username());
    let timestamp = self.clock.now();

    let mut state = self.lock()?;
    debug!(model = %T::MODEL, %site, %tag, "Caching");
    T::slots_mut(&mut state.document)
      .entry(site)
      .or_default()
      .insert(tag, CacheRecord { timestamp, data: value });

    if !suppress_counting {
      state.pending += 1;
      if state.pending >= self.write_after {
        self.flush(&mut state)?;
      }
    }
    Ok(())
  }

  /// Both halves of `entry`, each counted on its own.
  pub fn add_entry(&self, site: SiteType, entry: ListEntry, suppress_counting: bool) -> Result<()> {
    let (media, user) = entry.into_parts();
    self.add(site, media, suppress_counting)?;
    self.add(site, user, suppress_counting)
  }

  /// Look up a value. An expired record is evicted and reported as a miss.
  pub fn get<T: Cacheable>(
    &self,
    site: SiteType,
    kind: MediaKind,
    id: impl Into<AnyId>,
    username: Option<&str>,
  ) -> Result<Option<T>> {
    let Some(id) = id.into().for_site(site) else {
      return Ok(None);
    };
    let tag = slot_tag(kind, id, username);
    let now = self.clock.now();

    let mut state = self.lock()?;
    let record = T::slots(&state.document).get(&site).and_then(|slot| slot.get(&tag));
    let Some(record) = record else {
      debug!(model = %T::MODEL, %site, %tag, "Cache miss");
      return Ok(None);
    };

    if self.expiry.is_expired(record.timestamp, now) {
      debug!(model = %T::MODEL, %site, %tag, "Evicting expired record");
      if let Some(slot) = T::slots_mut(&mut state.document).get_mut(&site) {
        slot.remove(&tag);
      }
      return Ok(None);
    }

    debug!(model = %T::MODEL, %site, %tag, "Cache hit");
    Ok(Some(record.data.clone()))
  }

  /// Rebuild a list entry from its two halves. Either half missing, or the
  /// halves not matching, is a miss.
  pub fn get_entry(
    &self,
    site: SiteType,
    kind: MediaKind,
    id: impl Into<AnyId>,
    username: &str,
  ) -> Result<Option<ListEntry>> {
    let id = id.into();
    let media = self.get::<MediaData>(site, kind, id.clone(), None)?;
    let user = self.get::<UserData>(site, kind, id, Some(username))?;

    match (media, user) {
      (Some(media), Some(user)) => Ok(ListEntry::new(media, user).ok()),
      _ => Ok(None),
    }
  }

  /// Number of records held, expired or not.
  pub fn len(&self) -> Result<usize> {
    Ok(self.lock()?.document.len())
  }

  pub fn is_empty(&self) -> Result<bool> {
    Ok(self.len()? == 0)
  }

  /// Write everything to disk and reset the pending counter.
  pub fn write(&self) -> Result<()> {
    let mut state = self.lock()?;
    self.flush(&mut state)
  }

  /// Replace the in-memory contents with what is on disk. Unwritten
  /// additions are lost.
  pub fn load(&self) -> Result<()> {
    let text = std::fs::read_to_string(&self.path)
      .map_err(|e| eyre!("Failed to read cache file {}: {}", self.path.display(), e))?;
    let document = CacheDocument::from_json(&text)
      .map_err(|e| eyre!("Failed to decode cache file {}: {}", self.path.display(), e))?;

    let mut state = self.lock()?;
    info!(path = %self.path.display(), records = document.len(), "Loaded cache");
    state.document = document;
    state.pending = 0;
    Ok(())
  }

  fn flush(&self, state: &mut StoreState) -> Result<()> {
    let json = state
      .document
      .to_json()
      .map_err(|e| eyre!("Failed to encode cache: {}", e))?;
    std::fs::write(&self.path, json)
      .map_err(|e| eyre!("Failed to write cache file {}: {}", self.path.display(), e))?;
    debug!(path = %self.path.display(), records = state.document.len(), "Wrote cache");
    state.pending = 0;
    Ok(())
  }

  fn lock(&self) -> Result<MutexGuard<'_, StoreState>> {
    self.state.lock().map_err(|e| eyre!("Lock poisoned: {}", e))
  }
}
