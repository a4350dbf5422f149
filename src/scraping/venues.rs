//! Walks the paginated venue archive and enriches each venue with
//! coordinates and a street address from its detail page when present.

use std::collections::HashSet;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use tracing::{debug, warn};

use super::base::{self, PageSource};
use super::fields::RenderedPage;
use crate::config::ScrapeConfig;
use crate::models::Venue;
use crate::normalize::{extract_coords_from_maps_url, slugify};

static ARTICLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".post-list article").expect("venue article selector"));
static NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").expect("venue name selector"));
static MORE_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.more-link").expect("more link selector"));
static ANY_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("venue anchor selector"));
static NEXT_PAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".pagination a.next").expect("next page selector"));
static MAP_OR_GEO_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href*='google.com/maps'], a[href*='maps.google'], a[href^='geo:']")
        .expect("venue map selector")
});
static ADDRESS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("address").expect("address selector"));
static CONTENT_PARA_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".single-venue__content p").expect("venue content selector"));

// geo: links and odd map hrefs carry a bare decimal pair.
static LOOSE_PAIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?\d+\.\d+)[,\s]+(-?\d+\.\d+)").expect("loose coord regex"));

pub fn scrape_venues(source: &dyn PageSource, config: &ScrapeConfig) -> Result<Vec<Venue>> {
    let mut venues = Vec::new();
    let mut visited = HashSet::new();
    let mut next = Some(config.venue_archive_url());

    while let Some(page_url) = next {
        if !visited.insert(page_url.clone()) {
            break;
        }
        let page = source.load(&page_url)?;
        next = collect_archive_page(&page, &page_url, &mut venues);
        debug!(page = %page_url, total = venues.len(), "venue archive page walked");
    }

    // Duplicate names across archive pages keep their first entry.
    let mut seen = HashSet::new();
    venues.retain(|venue: &Venue| seen.insert(venue.name.clone()));

    for venue in &mut venues {
        let Some(detail_url) = venue.detail_url.clone() else {
            continue;
        };
        match source.load(&detail_url) {
            Ok(page) => enrich_venue(venue, &page),
            Err(err) => {
                warn!(venue = %venue.name, error = %err, "venue detail load failed");
            }
        }
    }

    Ok(venues)
}

pub(crate) fn collect_archive_page(
    page: &RenderedPage,
    page_url: &str,
    venues: &mut Vec<Venue>,
) -> Option<String> {
    let root = page.root_element();
    for article in root.select(&ARTICLE_SELECTOR) {
        let Some(name) = base::first_text(&article, &NAME_SELECTOR) else {
            continue;
        };
        let href = base::first_attr(&article, &MORE_LINK_SELECTOR, "href").or_else(|| {
            article
                .select(&ANY_LINK_SELECTOR)
                .find(|a| base::inner_text(*a).to_lowercase().contains("read more"))
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string)
        });
        let detail_url = base::absolute_url(page_url, href);
        venues.push(Venue {
            id: slugify(&name),
            name,
            detail_url,
            address: None,
            lat: None,
            lng: None,
        });
    }
    base::absolute_url(page_url, base::first_attr(&root, &NEXT_PAGE_SELECTOR, "href"))
}

pub(crate) fn enrich_venue(venue: &mut Venue, page: &RenderedPage) {
    let root = page.root_element();

    if let Some(href) = base::first_attr(&root, &MAP_OR_GEO_SELECTOR, "href") {
        let (lat, lng) = coords_from_href(&href);
        venue.lat = lat;
        venue.lng = lng;
    }

    venue.address = base::first_text(&root, &ADDRESS_SELECTOR)
        .or_else(|| base::first_text(&root, &CONTENT_PARA_SELECTOR));
}

fn coords_from_href(href: &str) -> (Option<f64>, Option<f64>) {
    let (lat, lng) = extract_coords_from_maps_url(href);
    if lat.is_some() && lng.is_some() {
        return (lat, lng);
    }
    if let Some(caps) = LOOSE_PAIR_RE.captures(href) {
        if let (Ok(lat), Ok(lng)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            return (Some(lat), Some(lng));
        }
    }
    (None, None)
}
