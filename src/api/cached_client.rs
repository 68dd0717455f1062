//! Service client with transparent caching.

use color_eyre::Result;
use tracing::debug;

use super::{IdentityResolver, MediaApi};
use crate::cache::CacheStore;
use crate::models::{AnyId, ListEntry, MediaData, MediaKind, UserData};

/// Wraps a [`MediaApi`] and answers from the cache where it can.
///
/// Everything fetched is stored under the service's own site, and the
/// foreign ids it carries are memoized so that later lookups by those ids
/// are answered locally too. `fresh` skips the cache read but still stores
/// what was fetched.
pub struct CachedClient<A> {
  api: A,
  store: CacheStore,
}

impl<A: MediaApi> CachedClient<A> {
  pub fn new(api: A, store: CacheStore) -> Self {
    Self { api, store }
  }

  pub fn api(&self) -> &A {
    &self.api
  }

  pub fn store(&self) -> &CacheStore {
    &self.store
  }

  fn resolver(&self) -> IdentityResolver<'_, A> {
    IdentityResolver::new(&self.api, &self.store)
  }

  pub async fn get_media(&self, kind: MediaKind, id: impl Into<AnyId>, fresh: bool) -> Result<Option<MediaData>> {
    let id = id.into();
    let resolver = self.resolver();

    if !fresh {
      if let Some(native) = resolver.resolve_cached(kind, &id)? {
        if let Some(cached) = self.store.get(self.api.site(), kind, native, None)? {
          return Ok(Some(cached));
        }
      }
    }

    let Some(query) = resolver.resolve(kind, &id, true).await? else {
      debug!(%kind, ?id, "Unresolvable id");
      return Ok(None);
    };
    let Some(media) = self.api.fetch_media(kind, query).await? else {
      return Ok(None);
    };

    resolver.remember(kind, media.id())?;
    self.store.add(self.api.site(), media.clone(), false)?;
    Ok(Some(media))
  }

  /// A user's state for one entry. A miss fetches the whole list entry, so
  /// the media half gets cached as well.
  pub async fn get_user_data(
    &self,
    kind: MediaKind,
    id: impl Into<AnyId>,
    username: &str,
    fresh: bool,
  ) -> Result<Option<UserData>> {
    let id = id.into();

    if !fresh {
      if let Some(native) = self.resolver().resolve_cached(kind, &id)? {
        if let Some(cached) = self.store.get(self.api.site(), kind, native, Some(username))? {
          return Ok(Some(cached));
        }
      }
    }

    let entry = self.fetch_list_entry(kind, &id, username).await?;
    Ok(entry.map(|entry| entry.user_data()))
  }

  pub async fn get_list_entry(
    &self,
    kind: MediaKind,
    id: impl Into<AnyId>,
    username: &str,
    fresh: bool,
  ) -> Result<Option<ListEntry>> {
    let id = id.into();

    if !fresh {
      if let Some(native) = self.resolver().resolve_cached(kind, &id)? {
        if let Some(cached) = self.store.get_entry(self.api.site(), kind, native, username)? {
          return Ok(Some(cached));
        }
      }
    }

    self.fetch_list_entry(kind, &id, username).await
  }

  /// A user's whole list. Always fetched; every entry is cached and the
  /// store written once at the end.
  pub async fn get_list(&self, kind: MediaKind, username: &str) -> Result<Vec<ListEntry>> {
    let entries = self.api.fetch_list(kind, username).await?;
    let resolver = self.resolver();
    for entry in &entries {
      resolver.remember(kind, entry.id())?;
      self.store.add_entry(self.api.site(), entry.clone(), true)?;
    }
    self.store.write()?;
    debug!(%kind, username, count = entries.len(), "Cached list");
    Ok(entries)
  }

  /// The user halves of [`CachedClient::get_list`]. Only those are cached.
  pub async fn get_user_data_list(&self, kind: MediaKind, username: &str) -> Result<Vec<UserData>> {
    let entries = self.api.fetch_list(kind, username).await?;
    let resolver = self.resolver();
    let mut users = Vec::with_capacity(entries.len());
    for entry in entries {
      resolver.remember(kind, entry.id())?;
      let (_, user) = entry.into_parts();
      self.store.add(self.api.site(), user.clone(), true)?;
      users.push(user);
    }
    self.store.write()?;
    Ok(users)
  }

  async fn fetch_list_entry(&self, kind: MediaKind, id: &AnyId, username: &str) -> Result<Option<ListEntry>> {
    let resolver = self.resolver();
    let Some(query) = resolver.resolve(kind, id, false).await? else {
      debug!(%kind, ?id, "Unresolvable id");
      return Ok(None);
    };
    let Some(entry) = self.api.fetch_list_entry(kind, query.id, username).await? else {
      return Ok(None);
    };

    resolver.remember(kind, entry.id())?;
    self.store.add_entry(self.api.site(), entry.clone(), false)?;
    Ok(Some(entry))
  }
}
