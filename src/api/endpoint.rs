use reqwest::Url;

use crate::api::FetchError;

/// Geographic scope of a historical series request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    Country(String),
}

impl Scope {
    /// Path segment the historical endpoint expects for this scope
    fn segment(&self) -> &str {
        match self {
            Scope::Global => "all",
            Scope::Country(name) => name,
        }
    }
}

/// The three read-only endpoints of the aggregation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /all`
    Global,
    /// `GET /countries`
    Countries,
    /// `GET /historical/{all|country}?lastdays=all`
    History(Scope),
}

impl Endpoint {
    /// Resolve this endpoint against the API base URL.
    ///
    /// Country names are pushed as a single path segment, so spaces and
    /// slashes are percent-encoded.
    pub fn url(&self, base: &Url) -> Result<Url, FetchError> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| FetchError::Url(base.to_string()))?;
            segments.pop_if_empty();
            match self {
                Endpoint::Global => {
                    segments.push("all");
                }
                Endpoint::Countries => {
                    segments.push("countries");
                }
                Endpoint::History(scope) => {
                    segments.push("historical").push(scope.segment());
                }
            }
        }
        if let Endpoint::History(_) = self {
            url.query_pairs_mut().append_pair("lastdays", "all");
        }
        Ok(url)
    }
}
