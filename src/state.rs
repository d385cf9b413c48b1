//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::debounce::QueryGate;

/// A city candidate as returned by the search client
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct City {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    /// "Name, Country" when the country is known
    pub fn label(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

/// Animation timing for the spinner and the message flash.
pub const TICK_MS: u64 = 80;
pub const MESSAGE_FLASH_TICKS: u32 = 12;

/// State of the "add city" overlay.
///
/// `results` doubles as the searching flag: `Loading` while a search is in
/// flight, `Empty`/`Failed` when no results are present.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PanelState {
    pub is_open: bool,
    pub query: String,
    pub results: DataResource<Vec<City>>,
    pub selected: usize,
    pub message: String,
    pub message_visible: bool,
    pub can_repeat_identical_query: bool,
    /// Remaining ticks of the message flash; restarted on every pulse
    pub message_flash_ticks: u32,
    pub gate: QueryGate,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            is_open: false,
            query: String::new(),
            results: DataResource::Empty,
            selected: 0,
            message: String::new(),
            message_visible: false,
            can_repeat_identical_query: false,
            message_flash_ticks: 0,
            gate: QueryGate::default(),
        }
    }
}

impl PanelState {
    /// Fresh panel for a new open cycle. Gate counters carry over so that
    /// timers and responses from a previous cycle are recognisably stale.
    pub fn reopen(&mut self) {
        let gate = std::mem::take(&mut self.gate).carried_over();
        *self = Self {
            is_open: true,
            gate,
            ..Self::default()
        };
    }

    /// Internal reset, the panel stays open.
    pub fn clear(&mut self) {
        self.query.clear();
        self.results = DataResource::Empty;
        self.selected = 0;
        self.can_repeat_identical_query = true;
        self.message.clear();
        self.message_visible = false;
        self.gate.invalidate_searches();
    }

    pub fn show_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.message_visible = true;
    }

    pub fn pulse(&mut self) {
        self.message_flash_ticks = MESSAGE_FLASH_TICKS;
    }

    pub fn is_searching(&self) -> bool {
        self.results.is_loading()
    }

    /// Results of the last completed search, `None` when no search has
    /// produced a list
    pub fn results(&self) -> Option<&[City]> {
        self.results.data().map(Vec::as_slice)
    }

    pub fn visible_message(&self) -> Option<&str> {
        (self.message_visible && !self.message.is_empty()).then_some(self.message.as_str())
    }

    pub fn selected_city(&self) -> Option<&City> {
        self.results().and_then(|cities| cities.get(self.selected))
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// The user's tracked cities
    #[debug(section = "Collection", label = "Cities", debug_fmt)]
    pub collection: Vec<City>,

    /// Whether a registration is in flight
    #[debug(section = "Collection", label = "Busy")]
    pub is_busy: bool,

    #[debug(section = "Panel", label = "State", debug_fmt)]
    pub panel: PanelState,

    /// Animation frame counter (spinner)
    #[debug(skip)]
    pub tick_count: u32,
}

impl AppState {
    pub fn new(collection: Vec<City>) -> Self {
        Self {
            collection,
            is_busy: false,
            panel: PanelState::default(),
            tick_count: 0,
        }
    }

    pub fn animating(&self) -> bool {
        self.is_busy || self.panel.is_searching() || self.panel.message_flash_ticks > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
