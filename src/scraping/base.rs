use std::{thread, time::Duration};

use reqwest::blocking::Client;
use scraper::{ElementRef, Selector};
use thiserror::Error;

use super::fields::RenderedPage;
use crate::config::ScrapeConfig;

pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn inner_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|node| {
            let cleaned = inner_text(node);
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        })
        .flatten()
}

pub fn first_attr(element: &ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

pub fn absolute_url(base: &str, href: Option<String>) -> Option<String> {
    let href = href?;
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href);
    }
    let base_url = reqwest::Url::parse(base).ok()?;
    base_url.join(&href).ok().map(|u| u.to_string())
}

/// Failure to bring up a page at all. Field-level extraction never raises
/// this; only navigation does, and the assembler decides what to do with it.
#[derive(Debug, Error)]
pub enum PageLoadError {
    #[error("request failed for {url}: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },
    #[error("non-success status {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("unable to read response body for {url}: {source}")]
    Body {
        url: String,
        source: reqwest::Error,
    },
}

/// Supplies rendered pages to the extraction layers. Backed by plain HTTP
/// here; tests substitute fixture-backed pages instead.
pub trait PageSource {
    fn load(&self, url: &str) -> Result<RenderedPage, PageLoadError>;
}

pub struct HttpSource {
    client: Client,
    settle: Duration,
}

impl HttpSource {
    pub fn new(config: &ScrapeConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent(config.user_agent.clone())
            .build()
            .expect("http client");
        Self {
            client,
            settle: Duration::from_millis(config.settle_ms),
        }
    }
}

impl PageSource for HttpSource {
    fn load(&self, url: &str) -> Result<RenderedPage, PageLoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| PageLoadError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(PageLoadError::Status {
                url: url.to_string(),
                status,
            });
        }
        let body = response.text().map_err(|source| PageLoadError::Body {
            url: url.to_string(),
            source,
        })?;

        // Fixed settle pause between sequential page loads.
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }

        Ok(RenderedPage::from_html(&body))
    }
}
