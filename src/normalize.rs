//! Pure text normalizers for the loosely structured bilingual strings the
//! festival site renders: slugs, durations, prices, dates and map
//! coordinates. No side effects; unparseable input always maps to `None`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_\- ]+").expect("slug charset regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static HYPHEN_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("hyphen run regex"));
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(min|minute)").expect("duration regex"));
static FREE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(gratis|free|geen koste)\b").expect("free price regex"));
static PRICE_NUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:[.,]\d{1,2})?").expect("price number regex"));
static COORD_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/@(-?\d+(?:\.\d+)?),\s*(-?\d+(?:\.\d+)?)").expect("coord path regex")
});
static COORD_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?),\s*(-?\d+(?:\.\d+)?)").expect("coord pair regex")
});

/// Month names as they appear on detail pages, Afrikaans and English.
const MONTHS: [(&str, u32); 21] = [
    ("januarie", 1),
    ("februarie", 2),
    ("maart", 3),
    ("april", 4),
    ("mei", 5),
    ("junie", 6),
    ("julie", 7),
    ("augustus", 8),
    ("september", 9),
    ("oktober", 10),
    ("november", 11),
    ("desember", 12),
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("october", 10),
    ("december", 12),
];

/// Lowercase slug over `[a-z0-9_-]`, no leading or trailing hyphen.
/// Idempotent; empty input yields an empty slug the caller must fall back on.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let stripped = NON_SLUG_RE.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RE.replace_all(stripped.trim(), "-");
    let collapsed = HYPHEN_RUN_RE.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// First `<integer> min|minute` occurrence, case-insensitive.
pub fn parse_duration_minutes(text: &str) -> Option<u32> {
    DURATION_RE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Collapses whitespace runs in a raw price string to single spaces.
pub fn parse_price_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classifies a price string into `(currency, min, max)`.
///
/// "Gratis"/"Free"/"geen koste" as whole words mean a zero-price entry.
/// Otherwise currency is "ZAR" iff the text carries a literal `R` or `ZAR`,
/// and min/max bound every numeric token found (comma accepted as decimal
/// separator). A range "R80 - R120" and a tier list "R80, R100, R120" are
/// indistinguishable here; both collapse to min/max.
pub fn normalize_price(price_text: &str) -> (Option<String>, Option<f64>, Option<f64>) {
    let trimmed = price_text.trim();
    if trimmed.is_empty() {
        return (None, None, None);
    }

    if FREE_RE.is_match(trimmed) {
        return (Some("ZAR".to_string()), Some(0.0), Some(0.0));
    }

    let currency = if trimmed.contains('R') || trimmed.contains("ZAR") {
        Some("ZAR".to_string())
    } else {
        None
    };

    let squeezed = trimmed.replace(' ', "");
    let mut values = Vec::new();
    for token in PRICE_NUM_RE.find_iter(&squeezed) {
        if let Ok(value) = token.as_str().replace(',', ".").parse::<f64>() {
            values.push(value);
        }
    }

    if values.is_empty() {
        return (currency, None, None);
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (currency, Some(min), Some(max))
}

/// Parses a `<day> <month name>` token into `YYYY-MM-DD` for the configured
/// festival year. The day must exist in that year's calendar; any missing or
/// unknown token yields `None`.
pub fn parse_date_from_detail(text: &str, year: i32) -> Option<String> {
    let mut parts = text.split_whitespace();
    let day_raw = parts.next()?;
    let month_raw = parts.next()?.to_lowercase();

    let day: u32 = day_raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()?;
    let month = MONTHS
        .iter()
        .find(|(name, _)| *name == month_raw)
        .map(|(_, number)| *number)?;

    NaiveDate::from_ymd_opt(year, month, day)?;
    Some(format!("{year:04}-{month:02}-{day:02}"))
}

/// Pulls `(lat, lng)` out of a Google Maps URL when the coordinates are
/// embedded: an `/@lat,lng` path segment first, then a `q=` or `ll=` query
/// value starting with `lat,lng`. Shortlinks carry no coordinates and any
/// malformed URL is treated the same way: `(None, None)`.
pub fn extract_coords_from_maps_url(url: &str) -> (Option<f64>, Option<f64>) {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return (None, None);
    };

    if let Some(caps) = COORD_PATH_RE.captures(parsed.path()) {
        if let (Ok(lat), Ok(lng)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            return (Some(lat), Some(lng));
        }
    }

    for key in ["q", "ll"] {
        let Some(value) = parsed
            .query_pairs()
            .find(|(name, _)| name.as_ref() == key)
            .map(|(_, value)| value.into_owned())
        else {
            continue;
        };
        if let Some(caps) = COORD_PAIR_RE.captures(&value) {
            if let (Ok(lat), Ok(lng)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
                return (Some(lat), Some(lng));
            }
        }
    }

    (None, None)
}
