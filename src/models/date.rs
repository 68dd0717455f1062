use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ModelError;

/// A calendar day, serialized as `{year, month, day}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "DateRecord", into = "DateRecord")]
pub struct Date(NaiveDate);

impl Date {
  pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ModelError> {
    NaiveDate::from_ymd_opt(year, month, day)
      .map(Date)
      .ok_or(ModelError::InvalidDate { year, month, day })
  }

  pub fn year(&self) -> i32 {
    self.0.year()
  }

  pub fn month(&self) -> u32 {
    self.0.month()
  }

  pub fn day(&self) -> u32 {
    self.0.day()
  }

  pub fn as_naive(&self) -> NaiveDate {
    self.0
  }
}

impl From<NaiveDate> for Date {
  fn from(date: NaiveDate) -> Self {
    Date(date)
  }
}

impl fmt::Display for Date {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format("%Y-%m-%d"))
  }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DateRecord {
  year: i32,
  month: u32,
  day: u32,
}

impl From<Date> for DateRecord {
  fn from(date: Date) -> Self {
    Self {
      year: date.year(),
      month: date.month(),
      day: date.day(),
    }
  }
}

impl TryFrom<DateRecord> for Date {
  type Error = ModelError;

  fn try_from(record: DateRecord) -> Result<Self, Self::Error> {
    Date::new(record.year, record.month, record.day)
  }
}
