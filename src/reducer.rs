//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, City};
use crate::validate::{QueryCheck, TOO_SHORT_MESSAGE, validate_query};

pub const NO_RESULTS_MESSAGE: &str = "No results.";
pub const ADD_FAILED_MESSAGE: &str = "We're sorry. We couldn't add this city. Try another one!";

pub fn added_message(city: &City) -> String {
    format!("{} has been added successfully. Check it out!", city.name)
}

pub fn already_present_message(city: &City) -> String {
    format!("{} is already on your list!", city.name)
}

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Panel actions =====
        Action::PanelOpen => {
            if state.panel.is_open {
                return DispatchResult::unchanged();
            }
            state.panel.reopen();
            DispatchResult::changed()
        }

        Action::PanelDismiss => {
            if !state.panel.is_open {
                return DispatchResult::unchanged();
            }
            state.panel.is_open = false;
            DispatchResult::changed()
        }

        Action::PanelOutsideClick => {
            if !state.panel.is_open {
                return DispatchResult::unchanged();
            }
            state.panel.clear();
            DispatchResult::changed()
        }

        // ===== Query actions =====
        Action::QueryInput(raw) => {
            if !state.panel.is_open {
                return DispatchResult::unchanged();
            }
            let panel = &mut state.panel;
            match validate_query(&raw) {
                QueryCheck::Empty => {
                    panel.clear();
                    DispatchResult::changed()
                }
                QueryCheck::TooShort(message) => {
                    panel.query = raw;
                    panel.show_message(message);
                    DispatchResult::changed()
                }
                QueryCheck::Accepted => {
                    if panel.message == TOO_SHORT_MESSAGE {
                        panel.message.clear();
                        panel.message_visible = false;
                    }
                    panel.query = raw.clone();
                    let generation = panel.gate.schedule();
                    DispatchResult::changed_with(Effect::ScheduleQuery {
                        generation,
                        query: raw,
                    })
                }
            }
        }

        Action::QueryReady { generation, query } => {
            if !state.panel.is_open {
                return DispatchResult::unchanged();
            }
            let panel = &mut state.panel;
            let can_repeat = panel.can_repeat_identical_query;
            let Some(query) = panel.gate.release(generation, query, can_repeat) else {
                return DispatchResult::unchanged();
            };

            panel.results = DataResource::Loading;
            panel.selected = 0;
            panel.can_repeat_identical_query = false;
            panel.message_visible = false;
            let seq = panel.gate.issue_search();
            DispatchResult::changed_with(Effect::SearchCities { seq, query })
        }

        // ===== Search actions =====
        Action::SearchDidLoad { seq, cities } => {
            let panel = &mut state.panel;
            if !panel.gate.is_current_search(seq) {
                return DispatchResult::unchanged();
            }
            if cities.is_empty() {
                panel.show_message(NO_RESULTS_MESSAGE);
            }
            panel.results = DataResource::Loaded(cities);
            panel.selected = 0;
            DispatchResult::changed()
        }

        Action::SearchDidError { seq, error } => {
            let panel = &mut state.panel;
            if !panel.gate.is_current_search(seq) {
                return DispatchResult::unchanged();
            }
            panel.results = DataResource::Failed(error);
            panel.selected = 0;
            panel.show_message(NO_RESULTS_MESSAGE);
            DispatchResult::changed()
        }

        // ===== Result actions =====
        Action::ResultSelect(index) => {
            let count = state.panel.results().map_or(0, <[City]>::len);
            if index < count && index != state.panel.selected {
                state.panel.selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::ResultConfirm => {
            let Some(city) = state.panel.selected_city().cloned() else {
                return DispatchResult::unchanged();
            };
            reducer(state, Action::CityAdd(city))
        }

        // ===== City actions =====
        Action::CityAdd(city) => {
            state.is_busy = true;
            state.panel.clear();
            DispatchResult::changed_with(Effect::AddCity { city })
        }

        Action::CityAddDidSucceed(city) => {
            state.is_busy = false;
            state.panel.show_message(added_message(&city));
            state.panel.pulse();
            DispatchResult::changed_with(Effect::NotifyCollectionChanged { city })
        }

        Action::CityAddDidFail {
            city,
            already_present,
            ..
        } => {
            state.is_busy = false;
            let message = if already_present {
                already_present_message(&city)
            } else {
                ADD_FAILED_MESSAGE.to_string()
            };
            state.panel.show_message(message);
            state.panel.pulse();
            DispatchResult::changed()
        }

        // ===== Collection actions =====
        Action::CollectionDidChange(city) => {
            if state.collection.contains(&city) {
                return DispatchResult::unchanged();
            }
            state.collection.push(city);
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            if !state.animating() {
                return DispatchResult::unchanged();
            }
            state.tick_count = state.tick_count.wrapping_add(1);
            state.panel.message_flash_ticks = state.panel.message_flash_ticks.saturating_sub(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}
