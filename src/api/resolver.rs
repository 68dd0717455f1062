//! Turning whatever id a caller has into one a service can be queried with.

use color_eyre::Result;
use tracing::{debug, info};

use super::{MediaApi, SiteId};
use crate::cache::CacheStore;
use crate::models::{AnyId, IdMapping, Identifier, MediaKind, SiteType};

/// Resolves ids against a service, memoizing translations in the store's
/// `ID_MAPPING` slice.
///
/// Concurrent resolutions of the same foreign id are not merged; each one
/// that misses the memo makes its own remote call.
pub struct IdentityResolver<'a, A> {
  api: &'a A,
  store: &'a CacheStore,
}

impl<'a, A: MediaApi> IdentityResolver<'a, A> {
  pub fn new(api: &'a A, store: &'a CacheStore) -> Self {
    Self { api, store }
  }

  /// The native id, if the argument carries it or a translation is memoized.
  /// Never calls the service.
  pub fn resolve_cached(&self, kind: MediaKind, id: &AnyId) -> Result<Option<u32>> {
    let native = self.api.site();
    if let Some(id) = id.for_site(native) {
      return Ok(Some(id));
    }

    for foreign in foreign_ids(id, native) {
      if let Some(mapping) = self.memo(kind, foreign)? {
        if let Some(id) = mapping.id().get(native) {
          return Ok(Some(id));
        }
      }
    }
    Ok(None)
  }

  /// An id the service can be queried with.
  ///
  /// Prefers the native id, then (when `foreign_allowed`) a foreign id the
  /// service accepts directly, then a translation of each foreign id in turn.
  pub async fn resolve(&self, kind: MediaKind, id: &AnyId, foreign_allowed: bool) -> Result<Option<SiteId>> {
    let native = self.api.site();
    if let Some(id) = id.for_site(native) {
      return Ok(Some(SiteId::new(native, id)));
    }

    let foreign = foreign_ids(id, native);
    if foreign_allowed {
      if let Some(direct) = foreign.iter().find(|f| self.api.accepts_foreign(f.site)) {
        return Ok(Some(*direct));
      }
    }

    for candidate in foreign {
      if let Some(id) = self.translate(kind, candidate).await? {
        return Ok(Some(SiteId::new(native, id)));
      }
    }
    Ok(None)
  }

  /// Memoize every foreign id of a fetched identifier, so later lookups by
  /// those ids need no translation. Does nothing without a native id.
  pub fn remember(&self, kind: MediaKind, identifier: &Identifier) -> Result<()> {
    let native = self.api.site();
    if identifier.get(native).is_none() {
      return Ok(());
    }
    for (site, _) in identifier.sites().filter(|(site, _)| *site != native) {
      self.store.add(site, IdMapping::new(kind, identifier.clone()), true)?;
    }
    Ok(())
  }

  async fn translate(&self, kind: MediaKind, foreign: SiteId) -> Result<Option<u32>> {
    let native = self.api.site();
    if let Some(mapping) = self.memo(kind, foreign)? {
      debug!(%foreign, "Translation memoized");
      return Ok(mapping.id().get(native));
    }

    info!(%kind, %foreign, "Translating id");
    let mut known = Identifier::new(foreign.site, foreign.id);
    if let Some(translated) = self.api.translate_id(kind, foreign).await? {
      known.merge(&translated);
    }
    let resolved = known.get(native);
    self.store.add(foreign.site, IdMapping::new(kind, known), false)?;
    Ok(resolved)
  }

  fn memo(&self, kind: MediaKind, foreign: SiteId) -> Result<Option<IdMapping>> {
    self.store.get::<IdMapping>(foreign.site, kind, foreign.id, None)
  }
}

fn foreign_ids(id: &AnyId, native: SiteType) -> Vec<SiteId> {
  match id {
    AnyId::Site(_) => Vec::new(),
    AnyId::Identifier(identifier) => identifier
      .sites()
      .filter(|(site, _)| *site != native)
      .map(|(site, id)| SiteId::new(site, id))
      .collect(),
  }
}
