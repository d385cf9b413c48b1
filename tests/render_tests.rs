//! Render snapshot tests using RenderHarness
//!
//! PATTERN: build a state, render a component to a test buffer and look for
//! the text the user would see.

use cityboard::{
    action::Action,
    components::{AddCityOverlay, AddCityOverlayProps, CityBoard, CityBoardProps, Component},
    reducer::NO_RESULTS_MESSAGE,
    state::{AppState, City, PanelState},
    validate::TOO_SHORT_MESSAGE,
};
use tui_dispatch::{DataResource, testing::*};

fn open_panel() -> PanelState {
    let mut panel = PanelState::default();
    panel.reopen();
    panel
}

fn render_overlay(panel: &PanelState) -> String {
    let mut render = RenderHarness::new(80, 24);
    let mut overlay = AddCityOverlay::new();

    render.render_to_string_plain(|frame| {
        let props = AddCityOverlayProps {
            panel,
            tick_count: 0,
            is_focused: true,
            on_query_change: Action::QueryInput,
            on_select: Action::ResultSelect,
        };
        overlay.render(frame, frame.area(), props);
    })
}

#[test]
fn test_render_empty_board() {
    let mut render = RenderHarness::new(60, 12);
    let mut component = CityBoard;
    let state = AppState::default();

    let output = render.render_to_string_plain(|frame| {
        let props = CityBoardProps {
            state: &state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(output.contains("No cities yet"), "Should show empty hint");
    assert!(output.contains("add city"), "Should show key hint");
}

#[test]
fn test_render_placeholder() {
    let output = render_overlay(&open_panel());
    assert!(output.contains("Search for a city..."));
}

#[test]
fn test_render_too_short_message() {
    let mut panel = open_panel();
    panel.query = "Pa".into();
    panel.show_message(TOO_SHORT_MESSAGE);

    let output = render_overlay(&panel);

    assert!(output.contains("at least 3 characters"), "{output}");
}

#[test]
fn test_render_searching_indicator() {
    let mut panel = open_panel();
    panel.query = "Paris".into();
    panel.results = DataResource::Loading;

    let output = render_overlay(&panel);

    assert!(output.contains("Searching"), "{output}");
}

#[test]
fn test_render_hidden_message_is_not_drawn() {
    let mut panel = open_panel();
    panel.message = NO_RESULTS_MESSAGE.into();
    panel.message_visible = false;

    let output = render_overlay(&panel);

    assert!(!output.contains(NO_RESULTS_MESSAGE));
}

#[test]
fn test_render_result_labels() {
    let mut panel = open_panel();
    panel.query = "Spring".into();
    panel.results = DataResource::Loaded(vec![
        City {
            name: "Springfield".into(),
            country: Some("United States".into()),
            lat: 39.8,
            lon: -89.64,
        },
        City {
            name: "Springs".into(),
            country: None,
            lat: -26.25,
            lon: 28.4,
        },
    ]);

    let output = render_overlay(&panel);

    assert!(output.contains("Springfield, United States"), "{output}");
    assert!(output.contains("Springs"), "{output}");
}
