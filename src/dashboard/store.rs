use crate::api::{CountryRecord, Figures, GlobalSnapshot, HistoricalSeries, RequestTag, Scope};

/// The currently focused scope. Exactly one is active at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    /// The world aggregate; its figures come from the global slot.
    #[default]
    Global,
    Country(CountryRecord),
}

impl Selection {
    pub const GLOBAL_NAME: &'static str = "Global";

    pub fn name(&self) -> &str {
        match self {
            Selection::Global => Self::GLOBAL_NAME,
            Selection::Country(record) => &record.country,
        }
    }

    /// Scope for the historical series that belongs to this selection
    pub fn scope(&self) -> Scope {
        match self {
            Selection::Global => Scope::Global,
            Selection::Country(record) => Scope::Country(record.country.clone()),
        }
    }
}

/// The four independently replaced slots plus the tag of the history request
/// whose result is currently wanted, and the scope the held series belongs to.
///
/// Fields are only written by [`super::Dashboard`]; everything else reads.
#[derive(Debug, Default)]
pub struct Store {
    pub(super) global: GlobalSnapshot,
    pub(super) countries: Vec<CountryRecord>,
    pub(super) selection: Selection,
    pub(super) history: HistoricalSeries,
    pub(super) history_tag: RequestTag,
    pub(super) history_scope: Option<Scope>,
}

impl Store {
    pub fn global(&self) -> &GlobalSnapshot {
        &self.global
    }

    /// Country list in source order
    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &HistoricalSeries {
        &self.history
    }

    pub fn history_tag(&self) -> RequestTag {
        self.history_tag
    }

    /// Scope of the series in the history slot, `None` before any history lands
    #[cfg(test)]
    pub fn history_scope(&self) -> Option<&Scope> {
        self.history_scope.as_ref()
    }

    /// Figures of the selected scope. A Global selection reads the global
    /// slot, so it fills in as soon as the startup snapshot lands.
    pub fn selected_figures(&self) -> Figures {
        match &self.selection {
            Selection::Global => self.global.figures(),
            Selection::Country(record) => record.figures(),
        }
    }
}
