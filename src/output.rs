//! Writes the scraped programme and venues as pretty JSON plus flat CSV
//! twins. CSV quoting is RFC-4180 style; absent fields render as empty.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{EventRecord, Venue};

pub const PROGRAMME_JSON: &str = "programme.json";
pub const VENUES_JSON: &str = "venues.json";
pub const PROGRAMME_CSV: &str = "programme.csv";
pub const VENUES_CSV: &str = "venues.csv";

const EVENT_HEADER: [&str; 16] = [
    "id",
    "title",
    "category",
    "date",
    "time",
    "duration_minutes",
    "venue_name",
    "venue_map_url",
    "venue_lat",
    "venue_lng",
    "price_text",
    "price_currency",
    "price_min",
    "price_max",
    "description",
    "tickets_url",
];

const VENUE_HEADER: [&str; 6] = ["id", "name", "detail_url", "address", "lat", "lng"];

pub fn write_outputs(dir: &Path, events: &[EventRecord], venues: &[Venue]) -> Result<()> {
    write_programme(dir, events)?;
    write_venues(dir, venues)
}

pub fn write_programme(dir: &Path, events: &[EventRecord]) -> Result<()> {
    ensure_dir(dir)?;
    write_json(dir, PROGRAMME_JSON, &events)?;
    write_file(dir, PROGRAMME_CSV, &programme_csv(events))
}

pub fn write_venues(dir: &Path, venues: &[Venue]) -> Result<()> {
    ensure_dir(dir)?;
    write_json(dir, VENUES_JSON, &venues)?;
    write_file(dir, VENUES_CSV, &venues_csv(venues))
}

pub fn programme_csv(events: &[EventRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, EVENT_HEADER.iter().map(|s| s.to_string()));
    for event in events {
        push_row(
            &mut out,
            [
                event.id.clone(),
                opt_text(&event.title),
                opt_text(&event.category),
                opt_text(&event.date),
                opt_text(&event.time),
                opt_display(&event.duration_minutes),
                opt_text(&event.venue_name),
                opt_text(&event.venue_map_url),
                opt_display(&event.venue_lat),
                opt_display(&event.venue_lng),
                opt_text(&event.price_text),
                opt_text(&event.price_currency),
                opt_display(&event.price_min),
                opt_display(&event.price_max),
                opt_text(&event.description),
                opt_text(&event.tickets_url),
            ]
            .into_iter(),
        );
    }
    out
}

pub fn venues_csv(venues: &[Venue]) -> String {
    let mut out = String::new();
    push_row(&mut out, VENUE_HEADER.iter().map(|s| s.to_string()));
    for venue in venues {
        push_row(
            &mut out,
            [
                venue.id.clone(),
                venue.name.clone(),
                opt_text(&venue.detail_url),
                opt_text(&venue.address),
                opt_display(&venue.lat),
                opt_display(&venue.lng),
            ]
            .into_iter(),
        );
    }
    out
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("unable to create {}", dir.display()))
}

fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value).context("serialize to json")?;
    write_file(dir, name, &contents)
}

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, contents).with_context(|| format!("unable to write {}", path.display()))
}

fn opt_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_display<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let row = fields
        .map(|field| csv_field(&field))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&row);
    out.push('\n');
}

fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
