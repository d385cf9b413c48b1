//! Query pipeline tests: validation, quiet window, dedupe
//!
//! PATTERN: dispatch the same actions the runtime would, then assert on state
//! and on the effects the reducer requested.

use cityboard::{
    action::Action,
    components::{AddCityOverlay, AddCityOverlayProps, CityBoard, CityBoardProps, Component},
    effect::Effect,
    reducer::{NO_RESULTS_MESSAGE, reducer},
    state::AppState,
    validate::TOO_SHORT_MESSAGE,
};
use tui_dispatch::testing::key;
use tui_dispatch::{EffectStore, EventKind, assert_emitted, assert_not_emitted};

fn open_state() -> AppState {
    let mut state = AppState::default();
    reducer(&mut state, Action::PanelOpen);
    state
}

/// Dispatch a query change; returns the scheduled generation, if any.
fn type_query(state: &mut AppState, query: &str) -> Option<u64> {
    let result = reducer(state, Action::QueryInput(query.into()));
    result.effects.into_iter().find_map(|effect| match effect {
        Effect::ScheduleQuery { generation, .. } => Some(generation),
        _ => None,
    })
}

/// Let the quiet window for `generation` elapse; returns the searches issued.
fn elapse(state: &mut AppState, generation: u64, query: &str) -> Vec<(u64, String)> {
    let result = reducer(
        state,
        Action::QueryReady {
            generation,
            query: query.into(),
        },
    );
    result
        .effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::SearchCities { seq, query } => Some((seq, query)),
            _ => None,
        })
        .collect()
}

fn searched(searches: &[(u64, String)]) -> Vec<&str> {
    searches.iter().map(|(_, query)| query.as_str()).collect()
}

#[test]
fn test_open_through_store() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    let result = store.dispatch(Action::PanelOpen);

    assert!(result.changed);
    assert!(result.effects.is_empty());
    assert!(store.state().panel.is_open);
}

#[test]
fn test_empty_input_resets_panel() {
    let mut state = open_state();
    let generation = type_query(&mut state, "Paris").unwrap();
    let searches = elapse(&mut state, generation, "Paris");
    reducer(
        &mut state,
        Action::SearchDidLoad {
            seq: searches[0].0,
            cities: Vec::new(),
        },
    );
    assert_eq!(state.panel.visible_message(), Some(NO_RESULTS_MESSAGE));

    let result = reducer(&mut state, Action::QueryInput(String::new()));

    assert!(result.effects.is_empty());
    let panel = &state.panel;
    assert!(panel.is_open);
    assert!(panel.query.is_empty());
    assert!(panel.results().is_none());
    assert!(panel.message.is_empty());
    assert!(panel.visible_message().is_none());
    assert!(panel.can_repeat_identical_query);
}

#[test]
fn test_short_input_shows_message_without_search() {
    for query in ["P", "Pa"] {
        let mut state = open_state();

        let result = reducer(&mut state, Action::QueryInput(query.into()));

        assert!(result.effects.is_empty(), "no search for {query:?}");
        assert_eq!(state.panel.message, TOO_SHORT_MESSAGE);
        assert!(state.panel.message_visible);
    }
}

#[test]
fn test_only_trailing_query_of_window_is_searched() {
    let mut state = open_state();
    let first = type_query(&mut state, "Par").unwrap();
    let second = type_query(&mut state, "Pari").unwrap();
    let third = type_query(&mut state, "Paris").unwrap();

    // a superseded timer firing late is dropped
    assert!(elapse(&mut state, first, "Par").is_empty());
    assert!(elapse(&mut state, second, "Pari").is_empty());
    assert_eq!(searched(&elapse(&mut state, third, "Paris")), vec!["Paris"]);
}

#[test]
fn test_short_input_does_not_supersede_pending_query() {
    let mut state = open_state();
    let generation = type_query(&mut state, "Paris").unwrap();
    assert_eq!(type_query(&mut state, "Pa"), None);

    assert_eq!(searched(&elapse(&mut state, generation, "Paris")), vec!["Paris"]);
}

#[test]
fn test_identical_query_is_searched_once() {
    let mut state = open_state();
    let generation = type_query(&mut state, "Paris").unwrap();
    assert_eq!(elapse(&mut state, generation, "Paris").len(), 1);

    let generation = type_query(&mut state, "Paris").unwrap();
    assert!(elapse(&mut state, generation, "Paris").is_empty());
}

#[test]
fn test_identical_query_repeats_after_clear() {
    let mut state = open_state();
    let generation = type_query(&mut state, "Paris").unwrap();
    elapse(&mut state, generation, "Paris");

    reducer(&mut state, Action::PanelOutsideClick);
    assert!(state.panel.can_repeat_identical_query);

    let generation = type_query(&mut state, "Paris").unwrap();
    assert_eq!(searched(&elapse(&mut state, generation, "Paris")), vec!["Paris"]);
    assert!(!state.panel.can_repeat_identical_query);
}

#[test]
fn test_query_ready_ignored_while_closed() {
    let mut state = open_state();
    let generation = type_query(&mut state, "Paris").unwrap();
    reducer(&mut state, Action::PanelDismiss);

    assert!(elapse(&mut state, generation, "Paris").is_empty());
}

#[test]
fn test_input_ignored_while_closed() {
    let mut state = AppState::default();
    let result = reducer(&mut state, Action::QueryInput("Paris".into()));
    assert!(!result.changed);
    assert!(result.effects.is_empty());
}

#[test]
fn test_timer_from_previous_open_is_stale() {
    let mut state = open_state();
    let old = type_query(&mut state, "Paris").unwrap();
    reducer(&mut state, Action::PanelDismiss);
    reducer(&mut state, Action::PanelOpen);

    assert!(elapse(&mut state, old, "Paris").is_empty());
}

#[test]
fn test_search_response_after_clear_is_discarded() {
    let mut state = open_state();
    let generation = type_query(&mut state, "Paris").unwrap();
    let searches = elapse(&mut state, generation, "Paris");

    reducer(&mut state, Action::QueryInput(String::new()));
    let result = reducer(
        &mut state,
        Action::SearchDidError {
            seq: searches[0].0,
            error: "timeout".into(),
        },
    );

    assert!(!result.changed);
    assert!(state.panel.visible_message().is_none());
}

#[test]
fn test_board_key_opens_panel() {
    let state = AppState::default();
    let mut board = CityBoard;

    let actions: Vec<_> = board
        .handle_event(
            &EventKind::Key(key("a")),
            CityBoardProps {
                state: &state,
                is_focused: true,
            },
        )
        .into_iter()
        .collect();

    assert_emitted!(actions, Action::PanelOpen);
    assert_not_emitted!(actions, Action::Quit);
}

#[test]
fn test_back_navigation_dismisses_without_clearing() {
    let state = open_state();
    let mut overlay = AddCityOverlay::new();
    overlay.set_open(true);

    let actions: Vec<_> = overlay
        .handle_event(
            &EventKind::Key(key("esc")),
            AddCityOverlayProps {
                panel: &state.panel,
                tick_count: 0,
                is_focused: true,
                on_query_change: Action::QueryInput,
                on_select: Action::ResultSelect,
            },
        )
        .into_iter()
        .collect();

    assert_emitted!(actions, Action::PanelDismiss);
    assert_not_emitted!(actions, Action::PanelOutsideClick);
    assert_not_emitted!(actions, Action::QueryInput(_));
}
