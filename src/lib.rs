//! Anime and manga list records from remote cataloguing sites, normalized
//! into validated domain values and cached locally.

pub mod anilist;
pub mod api;
pub mod cache;
pub mod codec;
pub mod config;
pub mod models;
