//! Session state and the search flow.
//!
//! The controller owns everything that changes while the application runs:
//! the typed city, the current snapshot, loading and error flags, the display
//! unit, the history and the derived theme. A search is split into
//! [`Controller::begin_search`] and [`Controller::complete_search`] so callers
//! that drive several lookups at once get "last completion wins" semantics;
//! [`Controller::search`] does both around one gateway call.

use tracing::{debug, info, warn};

use crate::{
    gateway::{GatewayError, WeatherGateway},
    history::{HistoryStore, merge_history},
    model::{HistoryEntry, Status, Theme, Unit, WeatherSnapshot},
    theme::classify,
};

/// The single message shown for any failed search.
pub const SEARCH_ERROR_MESSAGE: &str =
    "We couldn't find that city or the service is temporarily unavailable. Please try again.";

/// A search that has started but not yet been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    city: String,
    generation: u64,
}

impl PendingSearch {
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug)]
pub struct Controller {
    gateway: Box<dyn WeatherGateway>,
    history_store: HistoryStore,
    default_city: String,

    city_input: String,
    weather: Option<WeatherSnapshot>,
    loading: bool,
    error: Option<String>,
    unit: Unit,
    history: Vec<HistoryEntry>,
    theme: Theme,
    generation: u64,
}

impl Controller {
    /// Build a controller and hydrate history from the store before anything
    /// else runs.
    pub fn new(
        gateway: Box<dyn WeatherGateway>,
        history_store: HistoryStore,
        default_city: impl Into<String>,
    ) -> Self {
        let history = history_store.load();
        debug!(entries = history.len(), "loaded search history");

        Self {
            gateway,
            history_store,
            default_city: default_city.into(),
            city_input: String::new(),
            weather: None,
            loading: false,
            error: None,
            unit: Unit::default(),
            history,
            theme: Theme::default(),
            generation: 0,
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Search the default city; used once at startup.
    pub async fn bootstrap(&mut self) {
        let city = self.default_city.clone();
        self.search(&city).await;
    }

    /// Run a complete search. Blank input does nothing.
    pub async fn search(&mut self, city: &str) {
        let Some(pending) = self.begin_search(city) else {
            return;
        };

        let result = self.gateway.fetch_weather(pending.city()).await;
        self.complete_search(pending, result);
    }

    /// Enter the loading state for `city`. Returns `None` for blank input, in
    /// which case no state changes.
    pub fn begin_search(&mut self, city: &str) -> Option<PendingSearch> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }

        self.generation += 1;
        self.loading = true;
        self.error = None;
        debug!(city, generation = self.generation, "search started");

        Some(PendingSearch {
            city: city.to_string(),
            generation: self.generation,
        })
    }

    /// Apply the outcome of a search started with [`Self::begin_search`].
    pub fn complete_search(
        &mut self,
        pending: PendingSearch,
        result: Result<WeatherSnapshot, GatewayError>,
    ) {
        if pending.generation != self.generation {
            debug!(
                city = %pending.city,
                generation = pending.generation,
                latest = self.generation,
                "applying result of a superseded search"
            );
        }

        match result {
            Ok(snapshot) => {
                info!(city = %snapshot.city, condition = %snapshot.condition, "weather updated");
                self.theme = classify(&snapshot.condition);
                self.update_history(&snapshot);
                self.weather = Some(snapshot);
                self.error = None;
            }
            Err(err) => {
                debug!(city = %pending.city, error = %err, "search failed");
                self.error = Some(SEARCH_ERROR_MESSAGE.to_string());
            }
        }

        self.loading = false;
    }

    fn update_history(&mut self, snapshot: &WeatherSnapshot) {
        self.history = merge_history(&self.history, HistoryEntry::from(snapshot));

        if let Err(err) = self.history_store.save(&self.history) {
            warn!(error = %format!("{err:#}"), "failed to persist search history");
        }
    }

    /// Search again for the history entry at `index`; out of range is a no-op.
    pub async fn select_history(&mut self, index: usize) {
        let Some(city) = self.history.get(index).map(|h| h.city.clone()) else {
            return;
        };
        self.search(&city).await;
    }

    /// Forget all history, in memory and in the store.
    pub fn clear_history(&mut self) {
        self.history.clear();

        if let Err(err) = self.history_store.clear() {
            warn!(error = %format!("{err:#}"), "failed to clear stored search history");
        }
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggle();
    }

    pub fn set_city_input(&mut self, city: impl Into<String>) {
        self.city_input = city.into();
    }

    /// Search for whatever is currently typed.
    pub async fn submit(&mut self) {
        let city = self.city_input.clone();
        self.search(&city).await;
    }

    pub fn status(&self) -> Status {
        if self.loading {
            Status::Loading
        } else if self.error.is_some() {
            Status::Error
        } else if self.weather.is_some() {
            Status::Success
        } else {
            Status::Idle
        }
    }

    pub fn city_input(&self) -> &str {
        &self.city_input
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn history_store(&self) -> &HistoryStore {
        &self.history_store
    }
}
