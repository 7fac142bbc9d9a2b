use crate::state::{Action, AppState, Field};
use crate::{
    BlobStorageProvider, CalculationError, CalculationResult, History, Location,
    LocationResolver, RouteResolver,
};

/// A search issued for one of the inputs, see [`Session::issue_search`]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub field: Field,
    pub request: u64,
    pub query: String,
}

/// A calculator session: the [`AppState`], the external collaborators and the [`History`].
pub struct Session<'a> {
    state: AppState,
    locations: &'a dyn LocationResolver,
    routes: &'a dyn RouteResolver,
    history: History<'a>,
}

impl<'a> Session<'a> {
    /// Starts a session, loading the history stored in `history_key`.
    pub async fn start(
        locations: &'a dyn LocationResolver,
        routes: &'a dyn RouteResolver,
        storage: &'a dyn BlobStorageProvider,
        history_key: &str,
    ) -> Session<'a> {
        let history = History::open(storage, history_key).await;
        let mut state = AppState::default();
        state.apply(Action::HistoryLoaded(history.entries().to_vec()));
        Self {
            state,
            locations,
            routes,
            history,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn history(&self) -> &History<'a> {
        &self.history
    }

    /// Records that the text of `field` changed to `query`.
    /// Returns the search to perform, if `query` is long enough to be sent.
    pub fn issue_search(&mut self, field: Field, query: &str) -> Option<SearchRequest> {
        self.state.apply(Action::QueryChanged {
            field,
            query: query.to_string(),
        });
        (query.chars().count() >= crate::MIN_QUERY_CHARS).then(|| SearchRequest {
            field,
            request: self.state.field(field).latest_request(),
            query: query.to_string(),
        })
    }

    /// Performs `request`. Does not touch the state, so several requests may be in flight.
    pub async fn resolve(&self, request: &SearchRequest) -> Vec<Location> {
        self.locations.search(&request.query).await
    }

    /// Applies the suggestions of `request`, unless a newer search was issued meanwhile.
    pub fn complete_search(&mut self, request: SearchRequest, suggestions: Vec<Location>) {
        self.state.apply(Action::SuggestionsReceived {
            field: request.field,
            request: request.request,
            suggestions,
        });
    }

    /// Issues, resolves and completes a search for `field`.
    pub async fn search(&mut self, field: Field, query: &str) -> &[Location] {
        if let Some(request) = self.issue_search(field, query) {
            let suggestions = self.resolve(&request).await;
            self.complete_search(request, suggestions);
        }
        &self.state.field(field).suggestions
    }

    /// Selects suggestion `index` of `field`. Returns whether it existed.
    pub fn select(&mut self, field: Field, index: usize) -> bool {
        let Some(location) = self.state.field(field).suggestions.get(index).cloned() else {
            return false;
        };
        self.select_location(field, location);
        true
    }

    pub fn select_location(&mut self, field: Field, location: Location) {
        self.state.apply(Action::LocationSelected { field, location });
    }

    pub fn set_passengers(&mut self, input: &str) {
        self.state.apply(Action::PassengersChanged(input.to_string()));
    }

    /// Restores history entry `index` without recomputing it.
    pub fn restore(&mut self, index: usize) -> Option<&CalculationResult> {
        if index >= self.state.history.len() {
            return None;
        }
        self.state.apply(Action::HistoryEntrySelected(index));
        self.state.current.as_ref()
    }

    /// Computes the emissions of the selected trip and records them in the history.
    /// # Error
    /// Errors when a location is not selected, when there is no route between them
    /// or when the router cannot be reached.
    pub async fn calculate(&mut self) -> Result<CalculationResult, CalculationError> {
        self.state.apply(Action::CalculationRequested);
        let (Some(origin), Some(destination)) = (
            self.state.origin.selected.clone(),
            self.state.destination.selected.clone(),
        ) else {
            return Err(CalculationError::MissingLocations);
        };

        let route = match self.routes.fetch_route(&origin, &destination).await {
            Ok(Some(route)) => route,
            Ok(None) => return Err(self.fail(CalculationError::RouteUnavailable)),
            Err(e) => {
                log::error!("route({} -> {}) failed: {e}", origin.name, destination.name);
                return Err(self.fail(CalculationError::Transient(e)));
            }
        };
        log::info!(
            "{} -> {}: {:.1} km",
            origin.name,
            destination.name,
            route.distance_km()
        );

        let result = CalculationResult::new(
            origin,
            destination,
            &route,
            self.state.passengers,
            crate::now_millis(),
        );
        if let Err(e) = self.history.record(result.clone()).await {
            log::warn!("{} - failed to write history: {e}", self.history.key());
        }
        self.state.apply(Action::CalculationSucceeded(result.clone()));
        Ok(result)
    }

    fn fail(&mut self, error: CalculationError) -> CalculationError {
        self.state.apply(Action::CalculationFailed(error.to_string()));
        error
    }
}
