//! Effects - side effects declared by the reducer, and the task wiring that
//! performs them

use std::sync::Arc;
use std::time::Duration;

use tui_dispatch::{TaskKey, TaskManager};

use crate::action::Action;
use crate::client::{CityRegistry, CitySearch};
use crate::debounce::{DEBOUNCE_TASK, QUIET_WINDOW};
use crate::state::City;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone)]
pub enum Effect {
    /// Restart the quiet window for an accepted query
    ScheduleQuery { generation: u64, query: String },
    /// Search for cities matching the query
    SearchCities { seq: u64, query: String },
    /// Register the city with the user's collection
    AddCity { city: City },
    /// Hand a confirmed city to the collection sink
    NotifyCollectionChanged { city: City },
}

/// Collaborators the effect handler talks to
#[derive(Clone)]
pub struct Services {
    pub search: Arc<dyn CitySearch>,
    pub registry: Arc<dyn CityRegistry>,
    pub quiet_window: Duration,
}

impl Services {
    pub fn new(search: Arc<dyn CitySearch>, registry: Arc<dyn CityRegistry>) -> Self {
        Self {
            search,
            registry,
            quiet_window: QUIET_WINDOW,
        }
    }

    pub fn with_quiet_window(mut self, quiet_window: Duration) -> Self {
        self.quiet_window = quiet_window;
        self
    }
}

/// Handle effects by spawning tasks
pub fn handle_effect(effect: Effect, tasks: &mut TaskManager<Action>, services: &Services) {
    match effect {
        Effect::ScheduleQuery { generation, query } => {
            tasks.debounce(DEBOUNCE_TASK, services.quiet_window, async move {
                Action::QueryReady { generation, query }
            });
        }
        Effect::SearchCities { seq, query } => {
            // Searches are never cancelled; stale completions are dropped by seq.
            let search = Arc::clone(&services.search);
            tasks.spawn(TaskKey::new(format!("city_search_{seq}")), async move {
                match search.search(&query).await {
                    Ok(cities) => Action::SearchDidLoad { seq, cities },
                    Err(error) => {
                        tracing::warn!(%error, %query, "city search failed");
                        Action::SearchDidError {
                            seq,
                            error: error.to_string(),
                        }
                    }
                }
            });
        }
        Effect::AddCity { city } => {
            let registry = Arc::clone(&services.registry);
            let key = format!("add_city_{}", city.label());
            tasks.spawn(TaskKey::new(key), async move {
                match registry.add(&city).await {
                    Ok(confirmed) => Action::CityAddDidSucceed(confirmed),
                    Err(error) => {
                        tracing::error!(%error, city = %city.label(), "adding city failed");
                        Action::CityAddDidFail {
                            already_present: error.has_city_already(),
                            error: error.to_string(),
                            city,
                        }
                    }
                }
            });
        }
        Effect::NotifyCollectionChanged { city } => {
            tracing::info!(city = %city.label(), "collection changed");
            let key = format!("collection_{}", city.label());
            tasks.spawn(TaskKey::new(key), async move {
                Action::CollectionDidChange(city)
            });
        }
    }
}
