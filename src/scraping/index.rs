//! Walks the paginated chronological-programme index and collects the
//! detail page URLs to visit.

use std::collections::HashSet;

use anyhow::Result;
use once_cell::sync::Lazy;
use scraper::Selector;
use tracing::debug;

use super::base::{self, PageSource};
use super::fields::RenderedPage;
use crate::config::ScrapeConfig;

static EVENT_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href*='/program/'], a[href*='/programme/']").expect("event link selector")
});
static NEXT_PAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".pagination a.next").expect("next page selector"));

pub fn discover_event_urls(
    source: &dyn PageSource,
    config: &ScrapeConfig,
) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    let mut seen = HashSet::new();
    let mut visited = HashSet::new();
    let mut next = Some(config.programme_index_url());

    while let Some(page_url) = next {
        if !visited.insert(page_url.clone()) {
            break; // pagination loop
        }
        let page = source.load(&page_url)?;
        next = collect_index_page(&page, &page_url, &mut urls, &mut seen);
        debug!(page = %page_url, total = urls.len(), "programme index page walked");
    }

    Ok(urls)
}

/// Gathers event links from one index page in document order, deduped, and
/// returns the next page's URL when there is one.
pub(crate) fn collect_index_page(
    page: &RenderedPage,
    page_url: &str,
    urls: &mut Vec<String>,
    seen: &mut HashSet<String>,
) -> Option<String> {
    let root = page.root_element();
    for link in root.select(&EVENT_LINK_SELECTOR) {
        let href = link.value().attr("href").map(str::to_string);
        if let Some(url) = base::absolute_url(page_url, href) {
            if seen.insert(url.clone()) {
                urls.push(url);
            }
        }
    }
    base::absolute_url(page_url, base::first_attr(&root, &NEXT_PAGE_SELECTOR, "href"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_HTML: &str = r#"
    <main>
        <ul>
            <li><span class="time">10:00</span>
                <a href="/program/die-moord/">Die Moord op Monsieur</a></li>
            <li><a href="https://woordfees.co.za/programme/woordkuns/">Woordkuns</a></li>
            <li><a href="/program/die-moord/">Die Moord op Monsieur</a></li>
            <li><a href="/about/">About the festival</a></li>
        </ul>
        <div class="pagination">
            <a class="next" href="/en/chronological-programme/page/2/">Next</a>
        </div>
    </main>
    "#;

    #[test]
    fn collects_event_links_and_next_page() {
        let page = RenderedPage::from_html(INDEX_HTML);
        let mut urls = Vec::new();
        let mut seen = HashSet::new();
        let next = collect_index_page(
            &page,
            "https://woordfees.co.za/en/chronological-programme/",
            &mut urls,
            &mut seen,
        );

        assert_eq!(
            urls,
            vec![
                "https://woordfees.co.za/program/die-moord/".to_string(),
                "https://woordfees.co.za/programme/woordkuns/".to_string(),
            ]
        );
        assert_eq!(
            next.as_deref(),
            Some("https://woordfees.co.za/en/chronological-programme/page/2/")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let page = RenderedPage::from_html("<main><a href='/program/solo/'>Solo</a></main>");
        let mut urls = Vec::new();
        let mut seen = HashSet::new();
        let next = collect_index_page(
            &page,
            "https://woordfees.co.za/en/chronological-programme/page/9/",
            &mut urls,
            &mut seen,
        );
        assert_eq!(urls.len(), 1);
        assert_eq!(next, None);
    }
}
