use serde::{Deserialize, Serialize};

use super::{Identifier, MediaKind, ModelError};

/// How two entries are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
  Prequel,
  Sequel,
  Parent,
  SideStory,
  Summary,
  Character,
  SpinOff,
  Other,
  Adaptation,
  Alternative,
  Compilation,
  Contains,
  Source,
}

impl RelationKind {
  /// Direct story connections, as opposed to loose associations.
  pub fn is_important(self) -> bool {
    matches!(
      self,
      RelationKind::Prequel
        | RelationKind::Sequel
        | RelationKind::Parent
        | RelationKind::SideStory
        | RelationKind::Summary
    )
  }
}

/// A directed edge from one entry to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RelationRecord")]
pub struct Relation {
  source: Identifier,
  source_type: MediaKind,
  dest: Identifier,
  dest_type: MediaKind,
  relation_type: RelationKind,
}

impl Relation {
  pub fn new(
    source: Identifier,
    source_type: MediaKind,
    dest: Identifier,
    dest_type: MediaKind,
    relation_type: RelationKind,
  ) -> Result<Self, ModelError> {
    if source == dest && source_type == dest_type {
      return Err(ModelError::SelfRelation);
    }
    Ok(Self {
      source,
      source_type,
      dest,
      dest_type,
      relation_type,
    })
  }

  pub fn source(&self) -> &Identifier {
    &self.source
  }

  pub fn source_type(&self) -> MediaKind {
    self.source_type
  }

  pub fn dest(&self) -> &Identifier {
    &self.dest
  }

  pub fn dest_type(&self) -> MediaKind {
    self.dest_type
  }

  pub fn relation_type(&self) -> RelationKind {
    self.relation_type
  }

  pub fn is_important(&self) -> bool {
    self.relation_type.is_important()
  }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RelationRecord {
  source: Identifier,
  source_type: MediaKind,
  dest: Identifier,
  dest_type: MediaKind,
  relation_type: RelationKind,
}

impl TryFrom<RelationRecord> for Relation {
  type Error = ModelError;

  fn try_from(r: RelationRecord) -> Result<Self, Self::Error> {
    Relation::new(r.source, r.source_type, r.dest, r.dest_type, r.relation_type)
  }
}
