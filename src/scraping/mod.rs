pub mod base;
pub mod detail;
pub mod fields;
pub mod index;
pub mod venues;

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::config::ScrapeConfig;
use crate::models::{EventRecord, Venue};
use base::{HttpSource, PageSource};

pub struct ProgrammeScrape {
    pub events: Vec<EventRecord>,
    pub venues: Vec<Venue>,
}

/// Discovers the programme's detail pages and extracts one record per page,
/// sequentially. A page that fails to load is logged and skipped; the run
/// only errors when every page failed.
pub fn scrape_programme(
    source: &dyn PageSource,
    config: &ScrapeConfig,
    limit: Option<usize>,
) -> Result<Vec<EventRecord>> {
    let mut urls = index::discover_event_urls(source, config)?;
    if let Some(limit) = limit {
        urls.truncate(limit);
    }
    info!(count = urls.len(), "event detail pages discovered");

    let mut events = Vec::new();
    let mut failures = Vec::new();
    for url in &urls {
        match detail::scrape_event_detail(source, url, config) {
            Ok(event) => events.push(event),
            Err(err) => {
                warn!(url = %url, error = %err, "event page skipped");
                failures.push((url.clone(), err));
            }
        }
    }

    if events.is_empty() && !failures.is_empty() {
        let joined = failures
            .into_iter()
            .map(|(url, err)| format!("{url}: {err}"))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(anyhow!("all event pages failed: {joined}"));
    }

    info!(
        events = events.len(),
        skipped = failures.len(),
        "programme scrape complete"
    );
    Ok(events)
}

/// Full run: programme plus venue archive, over one HTTP source.
pub fn run(config: &ScrapeConfig, limit: Option<usize>) -> Result<ProgrammeScrape> {
    let source = HttpSource::new(config);
    let events = scrape_programme(&source, config, limit)?;
    let venues = venues::scrape_venues(&source, config)?;
    Ok(ProgrammeScrape { events, venues })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::base::PageLoadError;
    use super::fields::RenderedPage;
    use super::*;

    /// Pages by URL; unknown URLs come back as a 404-shaped load fault.
    struct FixtureSource {
        pages: HashMap<String, String>,
    }

    impl PageSource for FixtureSource {
        fn load(&self, url: &str) -> Result<RenderedPage, PageLoadError> {
            match self.pages.get(url) {
                Some(html) => Ok(RenderedPage::from_html(html)),
                None => Err(PageLoadError::Status {
                    url: url.to_string(),
                    status: reqwest::StatusCode::NOT_FOUND,
                }),
            }
        }
    }

    const INDEX_HTML: &str = r#"
    <main>
        <a href="/program/die-moord/">Die Moord op Monsieur</a>
        <a href="/program/vermiste-bladsy/">Vermiste Bladsy</a>
    </main>
    "#;

    const DETAIL_HTML: &str = r#"
    <h1>Die Moord op Monsieur</h1>
    <main>
        <li><strong>Prys:</strong> R150</li>
    </main>
    "#;

    fn fixture_source() -> FixtureSource {
        let config = ScrapeConfig::default();
        let mut pages = HashMap::new();
        pages.insert(config.programme_index_url(), INDEX_HTML.to_string());
        pages.insert(
            "https://woordfees.co.za/program/die-moord/".to_string(),
            DETAIL_HTML.to_string(),
        );
        FixtureSource { pages }
    }

    #[test]
    fn skips_failed_pages_and_keeps_the_rest() {
        let config = ScrapeConfig::default();
        let events =
            scrape_programme(&fixture_source(), &config, None).expect("partial run succeeds");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "die-moord-op-monsieur");
        assert_eq!(events[0].price_min, Some(150.0));
    }

    #[test]
    fn all_pages_failed_is_an_error() {
        let config = ScrapeConfig::default();
        let mut source = fixture_source();
        source
            .pages
            .remove("https://woordfees.co.za/program/die-moord/");
        let err = scrape_programme(&source, &config, None).expect_err("run must fail");
        assert!(err.to_string().contains("all event pages failed"));
    }

    #[test]
    fn limit_caps_detail_visits() {
        let config = ScrapeConfig::default();
        // Limit to the one URL that resolves; the missing second page is
        // never visited, so no skip happens.
        let events = scrape_programme(&fixture_source(), &config, Some(1))
            .expect("limited run succeeds");
        assert_eq!(events.len(), 1);
    }
}
