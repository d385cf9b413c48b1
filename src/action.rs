//! Actions: user intents, timer expiries and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::City;

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Panel category =====
    /// Open the add-city overlay
    PanelOpen,

    /// Back-navigation: hide the overlay without touching its fields
    PanelDismiss,

    /// Interaction outside the overlay bounds: clear the panel
    PanelOutsideClick,

    // ===== Query category =====
    /// Raw text of the query field changed
    QueryInput(String),

    /// Quiet window elapsed for the query scheduled under `generation`
    QueryReady { generation: u64, query: String },

    // ===== Search category =====
    /// Result: search issued under `seq` returned cities
    SearchDidLoad { seq: u64, cities: Vec<City> },

    /// Result: search issued under `seq` failed
    SearchDidError { seq: u64, error: String },

    // ===== Result category =====
    /// Highlight a result in the list (by index)
    ResultSelect(usize),

    /// Add the highlighted result
    ResultConfirm,

    // ===== City category =====
    /// Register a city with the user's collection
    CityAdd(City),

    /// Result: registration confirmed
    CityAddDidSucceed(City),

    /// Result: registration failed for the requested city
    CityAddDidFail {
        city: City,
        already_present: bool,
        error: String,
    },

    // ===== Collection category =====
    /// The collection sink received a confirmed city
    CollectionDidChange(City),

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for spinner and message flash
    Tick,

    /// Exit the application
    Quit,
}
