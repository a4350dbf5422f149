//! Scrapes the Woordfees festival site: programme detail pages into
//! [`models::EventRecord`]s and the venue archive into [`models::Venue`]s.

pub mod config;
pub mod models;
pub mod normalize;
pub mod output;
pub mod scraping;
