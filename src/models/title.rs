use serde::{Deserialize, Serialize};

use super::ModelError;

/// Locale a title is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TitleLocale {
  Romaji,
  English,
  Native,
}

impl TitleLocale {
  /// Fallback order when the requested default locale has no title.
  pub const PRIORITY: [TitleLocale; 3] = [TitleLocale::Romaji, TitleLocale::English, TitleLocale::Native];
}

/// Titles of an entry in each locale, plus the locale shown by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TitleRecord")]
pub struct Title {
  romaji: Option<String>,
  english: Option<String>,
  native: Option<String>,
  default: TitleLocale,
}

impl Title {
  /// Build a title. If `default` has no value the first populated locale in
  /// [`TitleLocale::PRIORITY`] becomes the default.
  pub fn new<I>(titles: I, default: TitleLocale) -> Result<Self, ModelError>
  where
    I: IntoIterator<Item = (TitleLocale, Option<String>)>,
  {
    let mut title = Self {
      romaji: None,
      english: None,
      native: None,
      default,
    };
    for (locale, value) in titles {
      if value.is_some() {
        *title.slot(locale) = value;
      }
    }

    if title.get_locale(default).is_none() {
      title.default = TitleLocale::PRIORITY
        .into_iter()
        .find(|locale| title.get_locale(*locale).is_some())
        .ok_or(ModelError::EmptyTitle)?;
    }
    Ok(title)
  }

  /// The title in the default locale.
  pub fn get(&self) -> &str {
    // The constructor guarantees the default locale is populated.
    self.get_locale(self.default).unwrap_or_default()
  }

  pub fn get_locale(&self, locale: TitleLocale) -> Option<&str> {
    match locale {
      TitleLocale::Romaji => self.romaji.as_deref(),
      TitleLocale::English => self.english.as_deref(),
      TitleLocale::Native => self.native.as_deref(),
    }
  }

  pub fn default_locale(&self) -> TitleLocale {
    self.default
  }

  fn slot(&mut self, locale: TitleLocale) -> &mut Option<String> {
    match locale {
      TitleLocale::Romaji => &mut self.romaji,
      TitleLocale::English => &mut self.english,
      TitleLocale::Native => &mut self.native,
    }
  }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TitleRecord {
  #[serde(deserialize_with = "Option::deserialize")]
  romaji: Option<String>,
  #[serde(deserialize_with = "Option::deserialize")]
  english: Option<String>,
  #[serde(deserialize_with = "Option::deserialize")]
  native: Option<String>,
  default: TitleLocale,
}

impl TryFrom<TitleRecord> for Title {
  type Error = ModelError;

  fn try_from(record: TitleRecord) -> Result<Self, Self::Error> {
    Title::new(
      [
        (TitleLocale::Romaji, record.romaji),
        (TitleLocale::English, record.english),
        (TitleLocale::Native, record.native),
      ],
      record.default,
    )
  }
}
