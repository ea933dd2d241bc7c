//! Fixtures shared by the dashboard and app tests.

use crate::api::{CountryInfo, CountryRecord, Dispatch, FetchRequest};

pub fn country(name: &str, cases: u64) -> CountryRecord {
    CountryRecord {
        country: name.to_string(),
        cases: Some(cases),
        deaths: Some(cases / 100),
        recovered: Some(cases / 2),
        updated: Some(1_600_000_000_000),
        country_info: CountryInfo {
            lat: Some(0.0),
            long: Some(0.0),
        },
    }
}

pub fn located(name: &str, cases: u64, lon: f64, lat: f64) -> CountryRecord {
    CountryRecord {
        country_info: CountryInfo {
            lat: Some(lat),
            long: Some(lon),
        },
        ..country(name, cases)
    }
}

/// Dispatcher that only records what it was asked to fetch.
#[derive(Default)]
pub struct Recorder {
    pub requests: Vec<FetchRequest>,
}

impl Dispatch for Recorder {
    fn dispatch(&mut self, request: FetchRequest) {
        self.requests.push(request);
    }
}
