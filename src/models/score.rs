use serde::{Deserialize, Serialize};

use super::ModelError;

/// Rating scales used by the different sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreScale {
  ThreePoint,
  FivePoint,
  TenPoint,
  TenPointDecimal,
  Percentage,
}

impl ScoreScale {
  /// Highest value on this scale. `TenPointDecimal` counts half points.
  pub const fn max(self) -> u32 {
    match self {
      ScoreScale::ThreePoint => 3,
      ScoreScale::FivePoint => 5,
      ScoreScale::TenPoint => 10,
      ScoreScale::TenPointDecimal => 20,
      ScoreScale::Percentage => 100,
    }
  }
}

/// A user's rating on some scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ScoreRecord")]
pub struct Score {
  value: u32,
  scale: ScoreScale,
}

impl Score {
  pub fn new(value: u32, scale: ScoreScale) -> Result<Self, ModelError> {
    if value > scale.max() {
      return Err(ModelError::ScoreOutOfRange {
        value,
        max: scale.max(),
      });
    }
    Ok(Self { value, scale })
  }

  /// An unrated score.
  pub fn zero(scale: ScoreScale) -> Self {
    Self { value: 0, scale }
  }

  pub fn value(&self) -> u32 {
    self.value
  }

  pub fn scale(&self) -> ScoreScale {
    self.scale
  }

  /// The value expressed on another scale. Lossy: rounds half to even.
  pub fn converted_to(&self, target: ScoreScale) -> u32 {
    if target == self.scale {
      return self.value;
    }
    let ratio = f64::from(self.value) / f64::from(self.scale.max());
    (ratio * f64::from(target.max())).round_ties_even() as u32
  }

  /// Switch to another scale, converting the value.
  pub fn set_scale(&mut self, target: ScoreScale) {
    self.value = self.converted_to(target);
    self.scale = target;
  }

  pub fn is_zero(&self) -> bool {
    self.converted_to(ScoreScale::Percentage) == 0
  }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ScoreRecord {
  value: u32,
  scale: ScoreScale,
}

impl TryFrom<ScoreRecord> for Score {
  type Error = ModelError;

  fn try_from(record: ScoreRecord) -> Result<Self, Self::Error> {
    Score::new(record.value, record.scale)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::codec::{Codec, CodecError};
  use serde_json::json;

  #[test]
  fn test_conversion() {
    let score = Score::new(77, ScoreScale::Percentage).unwrap();
    assert_eq!(score.converted_to(ScoreScale::TenPointDecimal), 15);
    assert_eq!(score.converted_to(ScoreScale::TenPoint), 8);
    assert_eq!(score.converted_to(ScoreScale::FivePoint), 4);
    assert_eq!(score.converted_to(ScoreScale::ThreePoint), 2);
    assert_eq!(score.value(), 77);
  }

  #[test]
  fn test_equivalent_scores_agree() {
    let scores = [
      Score::new(4, ScoreScale::FivePoint).unwrap(),
      Score::new(8, ScoreScale::TenPoint).unwrap(),
      Score::new(16, ScoreScale::TenPointDecimal).unwrap(),
      Score::new(80, ScoreScale::Percentage).unwrap(),
    ];
    for a in &scores {
      for b in &scores {
        assert_eq!(
          a.converted_to(ScoreScale::Percentage),
          b.converted_to(ScoreScale::Percentage)
        );
      }
    }
  }

  #[test]
  fn test_set_scale_in_place() {
    let mut score = Score::new(50, ScoreScale::Percentage).unwrap();
    score.set_scale(ScoreScale::TenPoint);
    assert_eq!(score.value(), 5);
    assert_eq!(score.scale(), ScoreScale::TenPoint);
  }

  #[test]
  fn test_ties_round_to_even() {
    let score = Score::new(25, ScoreScale::Percentage).unwrap();
    assert_eq!(score.converted_to(ScoreScale::TenPoint), 2);
  }

  #[test]
  fn test_out_of_range() {
    assert_eq!(
      Score::new(11, ScoreScale::TenPoint),
      Err(ModelError::ScoreOutOfRange { value: 11, max: 10 })
    );
    assert!(Score::new(0, ScoreScale::ThreePoint).unwrap().is_zero());

    let record = json!({"value": 101, "scale": "PERCENTAGE"});
    let err = Score::from_record(record.as_object().unwrap()).unwrap_err();
    assert!(matches!(err, CodecError::InvalidValue { .. }));
  }

  #[test]
  fn test_string_value_is_type_mismatch() {
    let record = json!({"value": "77", "scale": "PERCENTAGE"});
    let err = Score::from_record(record.as_object().unwrap()).unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { .. }));
  }
}
