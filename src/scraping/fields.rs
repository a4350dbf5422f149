//! Label-driven field lookup over a rendered page.
//!
//! Detail pages mark fields with bilingual labels ("Kategorie" /
//! "Category") sitting in the same block as the value. The lookup is a
//! best-effort heuristic: find the first element whose own text carries a
//! label, read the enclosing block, strip the label prefix. A markup change
//! degrades a field to empty rather than failing the record.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::base::{clean_text, inner_text};

static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("heading selector"));
static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("main").expect("main selector"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector"));
static MAP_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href*='maps.google'], a[href*='maps.app.goo.gl'], a[href*='goo.gl/maps']")
        .expect("map link selector")
});

pub struct MapLink {
    pub text: Option<String>,
    pub href: String,
}

/// Read access to one rendered detail page, kept behind a trait so the
/// record builder does not care how the page was produced.
pub trait FieldLocator {
    /// Best-effort text for a bilingual field label pair; empty when the
    /// label is missing or the lookup faults.
    fn labeled_text(&self, primary: &str, alternate: Option<&str>) -> String;

    /// The page's primary heading.
    fn heading(&self) -> Option<String>;

    /// First anchor pointing at the mapping provider, with its visible text.
    fn map_link(&self) -> Option<MapLink>;

    /// Href of the first anchor whose visible text contains one of the
    /// given labels, tried in order.
    fn link_href_by_text(&self, labels: &[&str]) -> Option<String>;
}

/// A parsed HTML document, scoped to `<main>` for field lookup when the
/// page has one.
pub struct RenderedPage {
    document: Html,
}

impl RenderedPage {
    pub fn from_html(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn root_element(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    fn region(&self) -> ElementRef<'_> {
        self.document
            .select(&MAIN_SELECTOR)
            .next()
            .unwrap_or_else(|| self.document.root_element())
    }
}

impl FieldLocator for RenderedPage {
    fn labeled_text(&self, primary: &str, alternate: Option<&str>) -> String {
        let region = self.region();
        let mut labels = vec![primary];
        if let Some(alt) = alternate {
            labels.push(alt);
        }
        for label in &labels {
            let Some(block) = find_label_block(region, label) else {
                continue;
            };
            let text = inner_text(block);
            if text.is_empty() {
                continue;
            }
            return strip_label_prefixes(&text, &labels);
        }
        String::new()
    }

    fn heading(&self) -> Option<String> {
        self.document
            .select(&HEADING_SELECTOR)
            .next()
            .map(inner_text)
            .filter(|text| !text.is_empty())
    }

    fn map_link(&self) -> Option<MapLink> {
        let anchor = self.region().select(&MAP_LINK_SELECTOR).next()?;
        let href = anchor.value().attr("href")?.to_string();
        let text = Some(inner_text(anchor)).filter(|t| !t.is_empty());
        Some(MapLink { text, href })
    }

    fn link_href_by_text(&self, labels: &[&str]) -> Option<String> {
        for label in labels {
            let needle = label.to_lowercase();
            for anchor in self.document.select(&ANCHOR_SELECTOR) {
                if inner_text(anchor).to_lowercase().contains(&needle) {
                    return anchor.value().attr("href").map(str::to_string);
                }
            }
        }
        None
    }
}

/// First text node under `region` containing `label`; the returned element
/// is that node's enclosing block (the labeled element's parent), which is
/// where the value text usually sits.
fn find_label_block<'a>(region: ElementRef<'a>, label: &str) -> Option<ElementRef<'a>> {
    for node in region.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if !text.contains(label) {
            continue;
        }
        let Some(holder) = node.parent() else {
            continue;
        };
        let block = holder.parent().unwrap_or(holder);
        return ElementRef::wrap(block).or_else(|| ElementRef::wrap(holder));
    }
    None
}

fn strip_label_prefixes(text: &str, labels: &[&str]) -> String {
    let mut out = text.to_string();
    for label in labels {
        let pattern = format!(r"(?i)^\s*{}\s*:\s*", regex::escape(label));
        let re = Regex::new(&pattern).expect("label prefix regex");
        out = re.replace(&out, "").into_owned();
    }
    clean_text(&out)
}
