//! JSON decode boundary. Payload shape differences are resolved here so the
//! controller only ever sees the normalized types.

use serde::Deserialize;

use crate::api::{CountryRecord, FetchError, GlobalSnapshot, HistoricalSeries, Scope};

/// Per-country historical responses nest the series one level deeper.
#[derive(Deserialize)]
struct CountryHistory {
    timeline: Option<HistoricalSeries>,
}

pub fn global(mut body: Vec<u8>) -> Result<GlobalSnapshot, FetchError> {
    Ok(simd_json::serde::from_slice(&mut body)?)
}

pub fn countries(mut body: Vec<u8>) -> Result<Vec<CountryRecord>, FetchError> {
    Ok(simd_json::serde::from_slice(&mut body)?)
}

/// Decode a historical payload for `scope`. A country response without a
/// `timeline` becomes the empty series rather than an error.
pub fn history(scope: &Scope, mut body: Vec<u8>) -> Result<HistoricalSeries, FetchError> {
    match scope {
        Scope::Global => Ok(simd_json::serde::from_slice(&mut body)?),
        Scope::Country(_) => {
            let wrapper: CountryHistory = simd_json::serde::from_slice(&mut body)?;
            Ok(wrapper.timeline.unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(s: &str) -> Vec<u8> {
        s.as_bytes().to_vec()
    }

    #[test]
    fn test_global_snapshot() {
        let snap = global(bytes(
            r#"{"updated":1700000000000,"cases":704753890,"todayCases":0,"deaths":7010681,"recovered":675619811,"affectedCountries":231}"#,
        ))
        .unwrap();
        assert_eq!(snap.cases, Some(704_753_890));
        assert_eq!(snap.deaths, Some(7_010_681));
        assert_eq!(snap.recovered, Some(675_619_811));
        assert_eq!(snap.updated, Some(1_700_000_000_000));
    }

    #[test]
    fn test_global_missing_fields_stay_unloaded() {
        let snap = global(bytes(r#"{"cases":10,"recovered":null}"#)).unwrap();
        assert_eq!(snap.cases, Some(10));
        assert_eq!(snap.deaths, None);
        assert_eq!(snap.recovered, None);
    }

    #[test]
    fn test_countries() {
        let list = countries(bytes(
            r#"[
                {"updated":1,"country":"USA","countryInfo":{"_id":840,"iso2":"US","lat":38,"long":-97,"flag":"x"},"cases":1000,"deaths":10,"recovered":900},
                {"country":"Diamond Princess","countryInfo":{"_id":null,"lat":null,"long":null},"cases":712,"deaths":13,"recovered":699}
            ]"#,
        ))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].country, "USA");
        assert_eq!(list[0].position(), Some((-97.0, 38.0)));
        assert_eq!(list[0].cases, Some(1000));
        assert_eq!(list[1].position(), None);
    }

    #[test]
    fn test_countries_rejects_non_list() {
        let err = countries(bytes(r#"{"message":"boom"}"#)).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_global_history_keeps_source_order() {
        let series = history(
            &Scope::Global,
            bytes(r#"{"cases":{"1/22/20":557,"1/23/20":657,"1/24/20":944},"deaths":{"1/22/20":17},"recovered":{}}"#),
        )
        .unwrap();
        let cases = series.cases.unwrap();
        let dates: Vec<&str> = cases.entries().iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(dates, ["1/22/20", "1/23/20", "1/24/20"]);
        assert_eq!(cases.entries()[2].1, 944);
        assert_eq!(series.deaths.unwrap().len(), 1);
        assert!(series.recovered.unwrap().is_empty());
    }

    #[test]
    fn test_country_history_unwraps_timeline() {
        let series = history(
            &Scope::Country("Brazil".into()),
            bytes(r#"{"country":"Brazil","province":["mainland"],"timeline":{"cases":{"1/1/21":10,"1/2/21":20}}}"#),
        )
        .unwrap();
        assert_eq!(series.cases.unwrap().len(), 2);
        assert_eq!(series.deaths, None);
    }

    #[test]
    fn test_country_history_without_timeline_is_empty() {
        let series = history(
            &Scope::Country("Atlantis".into()),
            bytes(r#"{"message":"Country not found or doesn't have any historical data"}"#),
        )
        .unwrap();
        assert_eq!(series, HistoricalSeries::default());
    }

    #[test]
    fn test_null_counts_are_dropped() {
        let series = history(&Scope::Global, bytes(r#"{"cases":{"1/1/21":1,"1/2/21":null,"1/3/21":3}}"#)).unwrap();
        assert_eq!(series.cases.unwrap().len(), 2);
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(global(bytes("<html>")), Err(FetchError::Decode(_))));
    }
}
