use serde::{Deserialize, Serialize};
use std::fmt;

use super::ModelError;

/// The cataloguing sites an id can belong to.
///
/// Declared in name order so maps keyed by site serialize with sorted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SiteType {
  #[serde(rename = "ANILIST")]
  Anilist,
  #[serde(rename = "KITSU")]
  Kitsu,
  #[serde(rename = "MYANIMELIST")]
  MyAnimeList,
}

impl SiteType {
  pub const ALL: [SiteType; 3] = [SiteType::Anilist, SiteType::Kitsu, SiteType::MyAnimeList];

  pub fn name(self) -> &'static str {
    match self {
      SiteType::Anilist => "ANILIST",
      SiteType::Kitsu => "KITSU",
      SiteType::MyAnimeList => "MYANIMELIST",
    }
  }
}

impl fmt::Display for SiteType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Ids of one media entry across every site.
///
/// All sites are always represented; an absent id serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IdentifierRecord")]
pub struct Identifier {
  #[serde(rename = "ANILIST")]
  anilist: Option<u32>,
  #[serde(rename = "KITSU")]
  kitsu: Option<u32>,
  #[serde(rename = "MYANIMELIST")]
  myanimelist: Option<u32>,
}

impl Identifier {
  /// Identifier known on a single site.
  pub fn new(site: SiteType, id: u32) -> Self {
    let mut identifier = Self {
      anilist: None,
      kitsu: None,
      myanimelist: None,
    };
    identifier.set(site, id);
    identifier
  }

  /// Build from any mix of present and absent ids; at least one must be present.
  pub fn from_ids<I>(ids: I) -> Result<Self, ModelError>
  where
    I: IntoIterator<Item = (SiteType, Option<u32>)>,
  {
    let mut identifier: Option<Self> = None;
    for (site, id) in ids {
      let Some(id) = id else { continue };
      match identifier.as_mut() {
        Some(existing) => existing.set(site, id),
        None => identifier = Some(Self::new(site, id)),
      }
    }
    identifier.ok_or(ModelError::EmptyIdentifier)
  }

  /// Builder form of [`Identifier::set`].
  pub fn with(mut self, site: SiteType, id: u32) -> Self {
    self.set(site, id);
    self
  }

  pub fn get(&self, site: SiteType) -> Option<u32> {
    match site {
      SiteType::Anilist => self.anilist,
      SiteType::Kitsu => self.kitsu,
      SiteType::MyAnimeList => self.myanimelist,
    }
  }

  pub fn set(&mut self, site: SiteType, id: u32) {
    let slot = match site {
      SiteType::Anilist => &mut self.anilist,
      SiteType::Kitsu => &mut self.kitsu,
      SiteType::MyAnimeList => &mut self.myanimelist,
    };
    *slot = Some(id);
  }

  /// Present ids in site order.
  pub fn sites(&self) -> impl Iterator<Item = (SiteType, u32)> + '_ {
    SiteType::ALL
      .into_iter()
      .filter_map(move |site| self.get(site).map(|id| (site, id)))
  }

  /// Fill ids this identifier lacks from `other`. Ids already present win.
  pub fn merge(&mut self, other: &Identifier) {
    for (site, id) in other.sites() {
      if self.get(site).is_none() {
        self.set(site, id);
      }
    }
  }
}

impl fmt::Display for Identifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = self
      .sites()
      .map(|(site, id)| format!("{}:{}", site, id))
      .collect();
    f.write_str(&parts.join(","))
  }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct IdentifierRecord {
  #[serde(rename = "ANILIST", deserialize_with = "Option::deserialize")]
  anilist: Option<u32>,
  #[serde(rename = "KITSU", deserialize_with = "Option::deserialize")]
  kitsu: Option<u32>,
  #[serde(rename = "MYANIMELIST", deserialize_with = "Option::deserialize")]
  myanimelist: Option<u32>,
}

impl TryFrom<IdentifierRecord> for Identifier {
  type Error = ModelError;

  fn try_from(record: IdentifierRecord) -> Result<Self, Self::Error> {
    Identifier::from_ids([
      (SiteType::Anilist, record.anilist),
      (SiteType::Kitsu, record.kitsu),
      (SiteType::MyAnimeList, record.myanimelist),
    ])
  }
}

/// An id argument: either a bare id on the site being asked, or a full
/// [`Identifier`] from which the site-specific id is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyId {
  Site(u32),
  Identifier(Identifier),
}

impl AnyId {
  /// The id for `site`. A bare id is taken to already be in `site`'s namespace.
  pub fn for_site(&self, site: SiteType) -> Option<u32> {
    match self {
      AnyId::Site(id) => Some(*id),
      AnyId::Identifier(identifier) => identifier.get(site),
    }
  }
}

impl From<u32> for AnyId {
  fn from(id: u32) -> Self {
    AnyId::Site(id)
  }
}

impl From<Identifier> for AnyId {
  fn from(identifier: Identifier) -> Self {
    AnyId::Identifier(identifier)
  }
}

impl From<&Identifier> for AnyId {
  fn from(identifier: &Identifier) -> Self {
    AnyId::Identifier(identifier.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::codec::{Codec, CodecError};
  use serde_json::json;

  #[test]
  fn test_missing_sites_are_represented() {
    let id = Identifier::new(SiteType::MyAnimeList, 1);
    assert_eq!(id.get(SiteType::MyAnimeList), Some(1));
    assert_eq!(id.get(SiteType::Anilist), None);
    assert_eq!(id.get(SiteType::Kitsu), None);

    let record = id.to_record().unwrap();
    assert_eq!(record.len(), 3);
    assert_eq!(record["KITSU"], json!(null));
  }

  #[test]
  fn test_missing_site_key_is_malformed() {
    let mut record = Identifier::new(SiteType::Anilist, 1).to_record().unwrap();
    record.remove("KITSU");
    let err = Identifier::from_record(&record).unwrap_err();
    assert!(matches!(err, CodecError::MalformedRecord { .. }), "{err}");
  }

  #[test]
  fn test_empty_identifier_rejected() {
    let result = Identifier::from_ids([(SiteType::Anilist, None), (SiteType::Kitsu, None)]);
    assert_eq!(result, Err(ModelError::EmptyIdentifier));

    let record = json!({"ANILIST": null, "KITSU": null, "MYANIMELIST": null});
    let err = Identifier::from_record(record.as_object().unwrap()).unwrap_err();
    assert!(matches!(err, CodecError::InvalidValue { .. }));
  }

  #[test]
  fn test_set_and_merge() {
    let mut id = Identifier::new(SiteType::Anilist, 1);
    id.set(SiteType::Kitsu, 2);
    assert_eq!(id.get(SiteType::Kitsu), Some(2));

    let other = Identifier::new(SiteType::MyAnimeList, 3).with(SiteType::Anilist, 99);
    id.merge(&other);
    assert_eq!(id.get(SiteType::MyAnimeList), Some(3));
    assert_eq!(id.get(SiteType::Anilist), Some(1));
  }

  #[test]
  fn test_equality_is_over_all_sites() {
    let a = Identifier::new(SiteType::Anilist, 9253).with(SiteType::MyAnimeList, 9253);
    let b = Identifier::new(SiteType::MyAnimeList, 9253);
    assert_ne!(a, b);
    assert_eq!(a, b.clone().with(SiteType::Anilist, 9253));
  }

  #[test]
  fn test_wrong_id_type() {
    let record = json!({"ANILIST": "1", "KITSU": null, "MYANIMELIST": null});
    let err = Identifier::from_record(record.as_object().unwrap()).unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { .. }));
  }

  #[test]
  fn test_any_id_for_site() {
    let id = AnyId::from(Identifier::new(SiteType::MyAnimeList, 5));
    assert_eq!(id.for_site(SiteType::MyAnimeList), Some(5));
    assert_eq!(id.for_site(SiteType::Anilist), None);
    assert_eq!(AnyId::from(7).for_site(SiteType::Kitsu), Some(7));
  }
}
