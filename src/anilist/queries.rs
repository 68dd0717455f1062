//! GraphQL documents sent to AniList.

macro_rules! fuzzy_date {
  () => {
    "{ year month day }"
  };
}

macro_rules! media_fields {
  () => {
    concat!(
      "id idMal type ",
      "title { romaji english native } ",
      "status episodes duration chapters volumes ",
      "coverImage { large } ",
      "startDate ",
      fuzzy_date!(),
      " endDate ",
      fuzzy_date!(),
      " relations { edges { node { id idMal type } relationType } }"
    )
  };
}

macro_rules! list_entry_fields {
  () => {
    concat!(
      "user { name } ",
      "score(format: POINT_100) status progress progressVolumes ",
      "startedAt ",
      fuzzy_date!(),
      " completedAt ",
      fuzzy_date!(),
      " media { ",
      media_fields!(),
      " }"
    )
  };
}

pub const MEDIA_BY_ID: &str = concat!(
  "query ($id: Int, $type: MediaType) { Media(id: $id, type: $type) { ",
  media_fields!(),
  " } }"
);

pub const MEDIA_BY_MAL_ID: &str = concat!(
  "query ($id: Int, $type: MediaType) { Media(idMal: $id, type: $type) { ",
  media_fields!(),
  " } }"
);

pub const LIST_ENTRY: &str = concat!(
  "query ($id: Int, $username: String, $type: MediaType) { ",
  "MediaList(mediaId: $id, userName: $username, type: $type) { ",
  list_entry_fields!(),
  " } }"
);

pub const LIST: &str = concat!(
  "query ($username: String, $type: MediaType) { ",
  "MediaListCollection(userName: $username, type: $type) { lists { entries { ",
  list_entry_fields!(),
  " } } } }"
);

pub const ID_BY_MAL_ID: &str =
  "query ($id: Int, $type: MediaType) { Media(idMal: $id, type: $type) { id idMal } }";
