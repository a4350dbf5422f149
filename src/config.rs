use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Scrape settings with per-edition knobs. The festival year feeds date
/// normalization, so one binary covers future editions without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub festival_year: i32,
    pub base_url: String,
    /// Pause after each page load, in milliseconds.
    pub settle_ms: u64,
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            festival_year: 2025,
            base_url: "https://woordfees.co.za".to_string(),
            settle_ms: 300,
            user_agent: "WoordfeesScrape/0.1 (+script)".to_string(),
        }
    }
}

impl ScrapeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn programme_index_url(&self) -> String {
        format!(
            "{}/en/chronological-programme/",
            self.base_url.trim_end_matches('/')
        )
    }

    pub fn venue_archive_url(&self) -> String {
        format!("{}/en/program-venue/", self.base_url.trim_end_matches('/'))
    }
}
