//! Domain values for media catalog data and a user's list state.
//!
//! Every value here is immutable once built: constructors are the only place
//! invariants are checked, and deserialization goes through the same
//! constructors, so a value that exists is a valid value.

mod cache;
mod date;
mod entry;
mod id;
pub(crate) mod media;
mod relation;
mod score;
mod status;
mod title;
pub(crate) mod user;

use serde_json::{Map, Value};
use thiserror::Error;

pub use cache::IdMapping;
pub use date::Date;
pub use entry::ListEntry;
pub use id::{AnyId, Identifier, SiteType};
pub use media::{MediaData, MediaDetails};
pub use relation::{Relation, RelationKind};
pub use score::{Score, ScoreScale};
pub use status::{ConsumingStatus, MediaKind, ReleaseStatus};
pub use title::{Title, TitleLocale};
pub use user::{Progress, UserData};

/// Reasons a domain value refuses to be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
  #[error("at least one site id is required")]
  EmptyIdentifier,

  #[error("at least one title is required")]
  EmptyTitle,

  #[error("score {value} is outside 0..={max}")]
  ScoreOutOfRange { value: u32, max: u32 },

  #[error("{year}-{month}-{day} is not a calendar date")]
  InvalidDate { year: i32, month: u32, day: u32 },

  #[error("relation points back at its own source")]
  SelfRelation,

  #[error("media data and user data describe different entries")]
  MismatchedEntry,

  #[error("unknown media kind `{0}`")]
  UnknownMediaKind(String),

  #[error("unknown field `{0}`")]
  UnknownField(String),
}

/// Keys left over after the common fields of a record are taken must belong
/// to the variant its `media_type` selected.
fn check_variant_keys(rest: &Map<String, Value>, fields: &[&str]) -> Result<(), ModelError> {
  match rest
    .keys()
    .find(|key| key.as_str() != "media_type" && !fields.contains(&key.as_str()))
  {
    Some(key) => Err(ModelError::UnknownField(key.clone())),
    None => Ok(()),
  }
}
