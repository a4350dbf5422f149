use serde::{Deserialize, Serialize};

/// One programme entry scraped from an event detail page.
///
/// Every field that extraction can fail on is an `Option` and stays `None`
/// rather than degrading to an empty string. Records are assembled once per
/// page and never mutated afterwards.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EventRecord {
    pub id: String, // slug of the title, else of the URL tail
    pub title: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>, // YYYY-MM-DD
    pub time: Option<String>, // HH:MM
    pub duration_minutes: Option<u32>,
    pub venue_name: Option<String>,
    pub venue_map_url: Option<String>,
    pub venue_lat: Option<f64>,
    pub venue_lng: Option<f64>,
    pub price_text: Option<String>,
    pub price_currency: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub description: Option<String>,
    pub tickets_url: Option<String>,
}

/// One venue from the festival's venue archive.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub detail_url: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}
