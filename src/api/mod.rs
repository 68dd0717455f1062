//! Remote cataloguing services and the cached front end over them.

mod cached_client;
mod resolver;

#[cfg(test)]
pub(crate) mod testing;

use color_eyre::Result;
use std::fmt;

use crate::models::{Identifier, ListEntry, MediaData, MediaKind, SiteType};

pub use cached_client::CachedClient;
pub use resolver::IdentityResolver;

/// An id together with the site whose namespace it is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiteId {
  pub site: SiteType,
  pub id: u32,
}

impl SiteId {
  pub fn new(site: SiteType, id: u32) -> Self {
    Self { site, id }
  }
}

impl fmt::Display for SiteId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.site, self.id)
  }
}

/// What the cache needs from a remote service.
///
/// "Not found" is `Ok(None)` or an empty list. Errors are transport or
/// decoding failures.
#[allow(async_fn_in_trait)]
pub trait MediaApi {
  /// The site whose ids this service speaks natively.
  fn site(&self) -> SiteType;

  /// Whether [`MediaApi::fetch_media`] can look up an entry by an id from `site`.
  fn accepts_foreign(&self, site: SiteType) -> bool;

  async fn fetch_media(&self, kind: MediaKind, id: SiteId) -> Result<Option<MediaData>>;

  /// `id` is always a native id.
  async fn fetch_list_entry(&self, kind: MediaKind, id: u32, username: &str) -> Result<Option<ListEntry>>;

  async fn fetch_list(&self, kind: MediaKind, username: &str) -> Result<Vec<ListEntry>>;

  /// Full identifier for a foreign id, or `None` if the service has no such entry.
  async fn translate_id(&self, kind: MediaKind, id: SiteId) -> Result<Option<Identifier>>;
}
