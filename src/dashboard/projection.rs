//! Pure derivations from the [`Store`] into renderable shapes. Recomputed on
//! every frame; nothing here caches.

use chrono::{DateTime, Utc};

use crate::api::{CountryRecord, DateSeries, HistoricalSeries};
use crate::dashboard::Store;

/// Shown for any figure whose fetch has not completed.
pub const PLACEHOLDER: &str = "Loading...";
/// Shown while the history slot has no case series.
pub const HISTORY_PLACEHOLDER: &str = "Loading history...";

pub const TABLE_ROWS: usize = 10;
pub const TAIL_LEN: usize = 5;

/// Header and summary-box text for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub scope: String,
    pub updated: String,
    pub cases: String,
    pub deaths: String,
    pub recovered: String,
}

pub fn summary(store: &Store) -> Summary {
    let figures = store.selected_figures();
    Summary {
        scope: store.selection().name().to_string(),
        updated: format_updated(figures.updated),
        cases: format_figure(figures.cases),
        deaths: format_figure(figures.deaths),
        recovered: format_figure(figures.recovered),
    }
}

/// Format a count with thousands separators.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

pub fn format_figure(value: Option<u64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), format_count)
}

/// Epoch millis as `M/D/YYYY` (UTC)
pub fn format_updated(millis: Option<i64>) -> String {
    millis
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(|| PLACEHOLDER.to_string(), |t| t.format("%-m/%-d/%Y").to_string())
}

/// A country marker for the map surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Index into the store's country list, for click-to-select
    pub index: usize,
    pub country: String,
    pub lon: f64,
    pub lat: f64,
    /// Braille pixels
    pub radius: f64,
    pub tooltip: Vec<String>,
}

/// Sub-linear size encoding of a case count.
pub fn marker_radius(cases: u64) -> f64 {
    (cases as f64).sqrt() / 1000.0
}

/// One marker per country that has coordinates.
pub fn markers(countries: &[CountryRecord]) -> Vec<Marker> {
    countries
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let (lon, lat) = record.position()?;
            Some(Marker {
                index,
                country: record.country.clone(),
                lon,
                lat,
                radius: marker_radius(record.cases.unwrap_or(0)),
                tooltip: tooltip(record),
            })
        })
        .collect()
}

fn tooltip(record: &CountryRecord) -> Vec<String> {
    vec![
        record.country.clone(),
        format!("Cases: {}", format_figure(record.cases)),
        format!("Deaths: {}", format_figure(record.deaths)),
        format!("Recovered: {}", format_figure(record.recovered)),
    ]
}

/// Top countries by cases, highest first. Ties keep source order; the
/// store's list is not reordered.
pub fn ranked(countries: &[CountryRecord]) -> Vec<&CountryRecord> {
    let mut rows: Vec<&CountryRecord> = countries.iter().collect();
    rows.sort_by(|a, b| b.cases.unwrap_or(0).cmp(&a.cases.unwrap_or(0)));
    rows.truncate(TABLE_ROWS);
    rows
}

/// The last `TAIL_LEN` entries of a chronologically ordered series.
pub fn tail(series: &DateSeries) -> &[(String, u64)] {
    let entries = series.entries();
    &entries[entries.len().saturating_sub(TAIL_LEN)..]
}

/// `date: count | ` pairs for the case series, or the history placeholder.
pub fn history_line(history: &HistoricalSeries) -> String {
    match &history.cases {
        Some(cases) => tail(cases)
            .iter()
            .map(|(date, count)| format!("{date}: {} | ", format_count(*count)))
            .collect(),
        None => HISTORY_PLACEHOLDER.to_string(),
    }
}
