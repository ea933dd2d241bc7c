use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// The counters shared by every scope. `None` means the value has not been
/// loaded (or the payload omitted it), which is rendered as a placeholder and
/// never as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Figures {
    pub cases: Option<u64>,
    pub deaths: Option<u64>,
    pub recovered: Option<u64>,
    /// Epoch milliseconds of the last upstream update
    pub updated: Option<i64>,
}

/// World aggregate from `GET /all`. `Default` is the empty, not-yet-fetched snapshot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GlobalSnapshot {
    pub cases: Option<u64>,
    pub deaths: Option<u64>,
    pub recovered: Option<u64>,
    pub updated: Option<i64>,
}

impl GlobalSnapshot {
    pub fn figures(&self) -> Figures {
        Figures {
            cases: self.cases,
            deaths: self.deaths,
            recovered: self.recovered,
            updated: self.updated,
        }
    }
}

/// Map position of a country.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct CountryInfo {
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

/// One entry of `GET /countries`, keyed by `country`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub country: String,
    pub cases: Option<u64>,
    pub deaths: Option<u64>,
    pub recovered: Option<u64>,
    pub updated: Option<i64>,
    #[serde(default)]
    pub country_info: CountryInfo,
}

impl CountryRecord {
    pub fn figures(&self) -> Figures {
        Figures {
            cases: self.cases,
            deaths: self.deaths,
            recovered: self.recovered,
            updated: self.updated,
        }
    }

    /// `(lon, lat)` if the record carries coordinates
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.country_info.long?, self.country_info.lat?))
    }
}

/// Date → cumulative count, kept in the order the source sent it
/// (chronological for this API).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSeries(Vec<(String, u64)>);

impl DateSeries {
    pub fn entries(&self) -> &[(String, u64)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u64)> for DateSeries {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for DateSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SeriesVisitor;

        impl<'de> Visitor<'de> for SeriesVisitor {
            type Value = DateSeries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of date strings to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                // Null counts are dropped rather than read as zero
                while let Some((date, count)) = map.next_entry::<String, Option<u64>>()? {
                    if let Some(count) = count {
                        entries.push((date, count));
                    }
                }
                Ok(DateSeries(entries))
            }
        }

        deserializer.deserialize_map(SeriesVisitor)
    }
}

/// Normalized historical payload. Global and per-country responses both
/// decode into this shape; `Default` is the empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoricalSeries {
    pub cases: Option<DateSeries>,
    pub deaths: Option<DateSeries>,
    pub recovered: Option<DateSeries>,
}
