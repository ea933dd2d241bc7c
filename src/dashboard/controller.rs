use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{CountryRecord, Dispatch, FetchEvent, FetchRequest, HistoricalSeries, Scope};
use crate::dashboard::{Selection, Store};

/// Raised when a selection request cannot be resolved. State is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("country not found: {0:?}")]
    NotFound(String),
}

impl SelectError {
    /// Text for the blocking notice
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Country not found",
        }
    }
}

/// Case-insensitive exact match on the country name.
pub fn find_country<'a>(countries: &'a [CountryRecord], term: &str) -> Option<&'a CountryRecord> {
    let term = term.to_lowercase();
    countries.iter().find(|c| c.country.to_lowercase() == term)
}

/// Sole owner of the [`Store`]. Slots change only through [`Dashboard::start`]
/// completions, [`Dashboard::select`] and [`Dashboard::search_by_name`].
pub struct Dashboard<D> {
    store: Store,
    dispatcher: D,
}

impl<D: Dispatch> Dashboard<D> {
    pub fn new(dispatcher: D) -> Self {
        Self {
            store: Store::default(),
            dispatcher,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }


    #[cfg(test)]
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Issue the three startup fetches. They complete in any order.
    pub fn start(&mut self) {
        info!("Requesting global snapshot, country list and global history");
        self.dispatcher.dispatch(FetchRequest::Global);
        self.dispatcher.dispatch(FetchRequest::Countries);
        self.dispatcher.dispatch(FetchRequest::History {
            scope: Scope::Global,
            tag: self.store.history_tag,
        });
    }

    /// Make `selection` current and request its full historical series.
    ///
    /// Any history request still in flight is superseded: its result will be
    /// dropped on arrival.
    pub fn select(&mut self, selection: Selection) {
        let scope = selection.scope();
        let tag = self.store.history_tag.next();
        info!(selection = selection.name(), ?tag, "Selection changed");

        self.store.selection = selection;
        self.store.history_tag = tag;
        self.dispatcher.dispatch(FetchRequest::History { scope, tag });
    }

    /// Select the country whose name matches `term` ignoring case.
    pub fn search_by_name(&mut self, term: &str) -> Result<(), SelectError> {
        let Some(record) = find_country(&self.store.countries, term).cloned() else {
            info!(term, "Search matched no country");
            return Err(SelectError::NotFound(term.to_string()));
        };
        self.select(Selection::Country(record));
        Ok(())
    }

    /// Apply a fetch completion to its slot. Failures keep the previous value,
    /// except that a failed history for a different scope clears the series.
    pub fn apply(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Global(Ok(snapshot)) => {
                info!(cases = ?snapshot.cases, "Global snapshot loaded");
                self.store.global = snapshot;
            }
            FetchEvent::Global(Err(e)) => {
                warn!(slot = "global", error = %e, "Fetch failed, keeping previous value");
            }
            FetchEvent::Countries(Ok(countries)) => {
                info!(count = countries.len(), "Country list loaded");
                self.store.countries = countries;
            }
            FetchEvent::Countries(Err(e)) => {
                warn!(slot = "countries", error = %e, "Fetch failed, keeping previous value");
            }
            FetchEvent::History { scope, tag, result } => {
                if tag != self.store.history_tag {
                    debug!(?scope, ?tag, current = ?self.store.history_tag, "Discarding stale history");
                    return;
                }
                match result {
                    Ok(series) => {
                        info!(
                            ?scope,
                            days = series.cases.as_ref().map_or(0, |c| c.len()),
                            "History loaded"
                        );
                        self.store.history = series;
                        self.store.history_scope = Some(scope);
                    }
                    Err(e) if self.store.history_scope.as_ref() == Some(&scope) => {
                        warn!(slot = "history", ?scope, error = %e, "Fetch failed, keeping previous value");
                    }
                    Err(e) => {
                        // Never show another scope's series under this selection.
                        warn!(slot = "history", ?scope, error = %e, "Fetch failed, clearing history");
                        self.store.history = HistoricalSeries::default();
                        self.store.history_scope = Some(scope);
                    }
                }
            }
        }
    }
}
