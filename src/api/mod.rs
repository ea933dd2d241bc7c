//! Remote data source: endpoints, payload types, and the fetch adapter.

mod client;
mod decode;
mod endpoint;
mod error;
mod fetch;
mod model;

pub use client::{ApiClient, Source, DEFAULT_BASE_URL};
pub use endpoint::{Endpoint, Scope};
pub use error::FetchError;
pub use fetch::{Dispatch, FetchEvent, FetchRequest, Fetcher, RequestTag};
pub use model::{CountryRecord, DateSeries, Figures, GlobalSnapshot, HistoricalSeries};

#[cfg(test)]
pub use model::CountryInfo;
