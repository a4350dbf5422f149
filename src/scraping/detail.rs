//! Builds one [`EventRecord`] from one detail page. Every field degrades to
//! `None` on its own; only a page that fails to load produces no record.

use once_cell::sync::Lazy;
use regex::Regex;

use super::base::{PageLoadError, PageSource};
use super::fields::FieldLocator;
use crate::config::ScrapeConfig;
use crate::models::EventRecord;
use crate::normalize::{
    extract_coords_from_maps_url, normalize_price, parse_date_from_detail,
    parse_duration_minutes, parse_price_text, slugify,
};

static DATE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}\s+\w+").expect("date token regex"));
static TIME_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}").expect("time token regex"));

pub fn scrape_event_detail(
    source: &dyn PageSource,
    url: &str,
    config: &ScrapeConfig,
) -> Result<EventRecord, PageLoadError> {
    let page = source.load(url)?;
    Ok(extract_event_detail(&page, url, config))
}

pub fn extract_event_detail<P: FieldLocator>(
    page: &P,
    url: &str,
    config: &ScrapeConfig,
) -> EventRecord {
    let title = page.heading();

    let category = non_empty(page.labeled_text("Kategorie", Some("Category")));
    let duration_minutes =
        parse_duration_minutes(&page.labeled_text("Tydsduur", Some("Duration")));

    let dt_block = page.labeled_text("Datum en Tyd", Some("Date and Time"));
    let date = DATE_TOKEN_RE
        .find(&dt_block)
        .and_then(|token| parse_date_from_detail(token.as_str(), config.festival_year));
    let time = TIME_TOKEN_RE
        .find(&dt_block)
        .map(|token| token.as_str().to_string());

    let venue_block = page.labeled_text("Venue", None);
    let (venue_name, venue_map_url) = match page.map_link() {
        Some(link) => (link.text, Some(link.href)),
        None => (
            venue_block
                .lines()
                .next()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty()),
            None,
        ),
    };

    let price_text = parse_price_text(&page.labeled_text("Prys", Some("Price")));
    let (price_currency, price_min, price_max) = normalize_price(&price_text);

    let description = non_empty(page.labeled_text("Beskrywing", Some("Description")));
    let tickets_url = page.link_href_by_text(&["Koop kaartjies", "Buy tickets"]);

    let (venue_lat, venue_lng) = match venue_map_url.as_deref() {
        Some(map_url) => extract_coords_from_maps_url(map_url),
        None => (None, None),
    };

    let id = match title.as_deref().map(slugify).filter(|s| !s.is_empty()) {
        Some(slug) => slug,
        None => slugify(last_path_segment(url)),
    };

    EventRecord {
        id,
        title,
        category,
        date,
        time,
        duration_minutes,
        venue_name,
        venue_map_url,
        venue_lat,
        venue_lng,
        price_text: non_empty(price_text),
        price_currency,
        price_min,
        price_max,
        description,
        tickets_url,
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn last_path_segment(url: &str) -> &str {
    url.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::fields::RenderedPage;

    const AFRIKAANS_DETAIL: &str = r#"
    <html><body>
    <h1>Die Moord op Monsieur</h1>
    <main>
        <ul class="meta">
            <li><strong>Kategorie:</strong> Teater</li>
            <li><strong>Tydsduur:</strong> 90 min</li>
            <li><strong>Datum en Tyd:</strong> 14 Maart om 19:30</li>
            <li><strong>Prys:</strong> R 80 - R120</li>
        </ul>
        <p><strong>Beskrywing:</strong> 'n Donker komedie in die Boland.</p>
        <p><a href="https://maps.google.com/@-33.9328,18.8644,15z">HB Thom-teater</a></p>
        <a class="button" href="https://www.webtickets.co.za/event/123">Koop kaartjies</a>
    </main>
    </body></html>
    "#;

    const ENGLISH_DETAIL: &str = r#"
    <html><body>
    <main>
        <div><span>Category</span>: Word Art</div>
        <div><span>Date and Time</span>: 8 October at 11:00</div>
        <div><span>Venue</span>: Blue Room, Stellenbosch</div>
        <div><span>Price</span>: Free entry</div>
    </main>
    </body></html>
    "#;

    #[test]
    fn builds_full_afrikaans_record() {
        let page = RenderedPage::from_html(AFRIKAANS_DETAIL);
        let config = ScrapeConfig::default();
        let record =
            extract_event_detail(&page, "https://woordfees.co.za/program/die-moord/", &config);

        assert_eq!(record.id, "die-moord-op-monsieur");
        assert_eq!(record.title.as_deref(), Some("Die Moord op Monsieur"));
        assert_eq!(record.category.as_deref(), Some("Teater"));
        assert_eq!(record.date.as_deref(), Some("2025-03-14"));
        assert_eq!(record.time.as_deref(), Some("19:30"));
        assert_eq!(record.duration_minutes, Some(90));
        assert_eq!(record.venue_name.as_deref(), Some("HB Thom-teater"));
        assert_eq!(
            record.venue_map_url.as_deref(),
            Some("https://maps.google.com/@-33.9328,18.8644,15z")
        );
        assert_eq!(record.venue_lat, Some(-33.9328));
        assert_eq!(record.venue_lng, Some(18.8644));
        assert_eq!(record.price_text.as_deref(), Some("R 80 - R120"));
        assert_eq!(record.price_currency.as_deref(), Some("ZAR"));
        assert_eq!(record.price_min, Some(80.0));
        assert_eq!(record.price_max, Some(120.0));
        assert_eq!(
            record.description.as_deref(),
            Some("'n Donker komedie in die Boland.")
        );
        assert_eq!(
            record.tickets_url.as_deref(),
            Some("https://www.webtickets.co.za/event/123")
        );
    }

    #[test]
    fn english_labels_and_fallbacks() {
        let page = RenderedPage::from_html(ENGLISH_DETAIL);
        let config = ScrapeConfig::default();
        let record = extract_event_detail(
            &page,
            "https://woordfees.co.za/program/blue-room-poetry/",
            &config,
        );

        // No heading, so the id falls back to the URL tail.
        assert_eq!(record.title, None);
        assert_eq!(record.id, "blue-room-poetry");

        assert_eq!(record.category.as_deref(), Some("Word Art"));
        assert_eq!(record.date.as_deref(), Some("2025-10-08"));
        assert_eq!(record.time.as_deref(), Some("11:00"));
        assert_eq!(record.duration_minutes, None);

        // No maps anchor: venue comes from the venue block text.
        assert_eq!(record.venue_name.as_deref(), Some("Blue Room, Stellenbosch"));
        assert_eq!(record.venue_map_url, None);
        assert_eq!(record.venue_lat, None);
        assert_eq!(record.venue_lng, None);

        assert_eq!(record.price_text.as_deref(), Some("Free entry"));
        assert_eq!(record.price_currency.as_deref(), Some("ZAR"));
        assert_eq!(record.price_min, Some(0.0));
        assert_eq!(record.price_max, Some(0.0));

        assert_eq!(record.description, None);
        assert_eq!(record.tickets_url, None);
    }

    #[test]
    fn configured_year_flows_into_dates() {
        let page = RenderedPage::from_html(AFRIKAANS_DETAIL);
        let config = ScrapeConfig {
            festival_year: 2026,
            ..ScrapeConfig::default()
        };
        let record =
            extract_event_detail(&page, "https://woordfees.co.za/program/die-moord/", &config);
        assert_eq!(record.date.as_deref(), Some("2026-03-14"));
    }

    #[test]
    fn empty_page_still_yields_a_record() {
        let page = RenderedPage::from_html("<main></main>");
        let config = ScrapeConfig::default();
        let record =
            extract_event_detail(&page, "https://woordfees.co.za/program/iets-anders/", &config);

        assert_eq!(record.id, "iets-anders");
        assert_eq!(record.title, None);
        assert_eq!(record.category, None);
        assert_eq!(record.date, None);
        assert_eq!(record.price_text, None);
        assert_eq!(record.price_currency, None);
    }

    #[test]
    fn price_bounds_stay_ordered() {
        let page = RenderedPage::from_html(AFRIKAANS_DETAIL);
        let config = ScrapeConfig::default();
        let record =
            extract_event_detail(&page, "https://woordfees.co.za/program/die-moord/", &config);
        if let (Some(min), Some(max)) = (record.price_min, record.price_max) {
            assert!(min <= max);
        } else {
            panic!("expected both price bounds");
        }
    }
}
