//! The state of a calculator session and its transitions.
//!
//! Every user action is an [`Action`] applied through [`AppState::apply`];
//! the transition is deterministic and performs no I/O.
use crate::{history, CalculationError, CalculationResult, Location, MIN_QUERY_CHARS};

/// One of the two location inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Origin,
    Destination,
}

/// The state of a location input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldState {
    pub query: String,
    pub selected: Option<Location>,
    pub suggestions: Vec<Location>,
    /// Number of the latest search issued for this input
    latest_request: u64,
}

impl FieldState {
    pub fn latest_request(&self) -> u64 {
        self.latest_request
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The text of an input changed; issues a new search request
    QueryChanged { field: Field, query: String },
    /// Suggestions for search `request`; dropped unless it is the latest one issued
    SuggestionsReceived {
        field: Field,
        request: u64,
        suggestions: Vec<Location>,
    },
    LocationSelected { field: Field, location: Location },
    /// Raw passenger input
    PassengersChanged(String),
    HistoryLoaded(Vec<CalculationResult>),
    CalculationRequested,
    CalculationSucceeded(CalculationResult),
    CalculationFailed(String),
    /// Restores the inputs and the result of a history entry
    HistoryEntrySelected(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub origin: FieldState,
    pub destination: FieldState,
    pub passengers: u32,
    pub loading: bool,
    pub current: Option<CalculationResult>,
    /// Newest first, at most [`history::HISTORY_CAPACITY`]
    pub history: Vec<CalculationResult>,
    /// User-facing message of the last failure
    pub error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            origin: FieldState::default(),
            destination: FieldState::default(),
            passengers: 1,
            loading: false,
            current: None,
            history: vec![],
            error: None,
        }
    }
}

/// Parses the passenger input; empty, invalid or non-positive input is 1.
pub fn parse_passengers(input: &str) -> u32 {
    input
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|p| *p >= 1)
        .map(|p| p.min(u32::MAX as i64) as u32)
        .unwrap_or(1)
}

impl AppState {
    pub fn field(&self, field: Field) -> &FieldState {
        match field {
            Field::Origin => &self.origin,
            Field::Destination => &self.destination,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut FieldState {
        match field {
            Field::Origin => &mut self.origin,
            Field::Destination => &mut self.destination,
        }
    }

    /// Whether both locations are selected
    pub fn can_calculate(&self) -> bool {
        self.origin.selected.is_some() && self.destination.selected.is_some()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::QueryChanged { field, query } => {
                let state = self.field_mut(field);
                state.latest_request += 1;
                if query.chars().count() < MIN_QUERY_CHARS {
                    state.suggestions.clear();
                }
                state.query = query;
            }
            Action::SuggestionsReceived {
                field,
                request,
                suggestions,
            } => {
                let state = self.field_mut(field);
                if request != state.latest_request {
                    log::info!(
                        "{field:?} - dropping suggestions of request {request} (latest is {})",
                        state.latest_request
                    );
                    return;
                }
                state.suggestions = suggestions;
            }
            Action::LocationSelected { field, location } => {
                let state = self.field_mut(field);
                // in-flight searches no longer apply
                state.latest_request += 1;
                state.query = location.name.clone();
                state.selected = Some(location);
                state.suggestions.clear();
            }
            Action::PassengersChanged(input) => {
                self.passengers = parse_passengers(&input);
            }
            Action::HistoryLoaded(entries) => {
                self.history = entries;
                self.history.truncate(history::HISTORY_CAPACITY);
            }
            Action::CalculationRequested => {
                if self.can_calculate() {
                    self.loading = true;
                    self.error = None;
                } else {
                    self.loading = false;
                    self.error = Some(CalculationError::MissingLocations.to_string());
                }
            }
            Action::CalculationSucceeded(result) => {
                self.loading = false;
                self.error = None;
                history::prepend(&mut self.history, result.clone());
                self.current = Some(result);
            }
            Action::CalculationFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            Action::HistoryEntrySelected(index) => {
                let Some(entry) = self.history.get(index).cloned() else {
                    return;
                };
                for (field, location) in [
                    (Field::Origin, entry.origin.clone()),
                    (Field::Destination, entry.destination.clone()),
                ] {
                    let state = self.field_mut(field);
                    state.latest_request += 1;
                    state.query = location.name.clone();
                    state.selected = Some(location);
                    state.suggestions.clear();
                }
                self.passengers = entry.passengers;
                self.error = None;
                self.current = Some(entry);
            }
        }
    }
}
