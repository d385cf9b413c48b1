use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    prelude::{Frame, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::Component;
use crate::action::Action;
use crate::state::AppState;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn spinner_frame(tick_count: u32) -> &'static str {
    SPINNER[tick_count as usize % SPINNER.len()]
}

/// Props for CityBoard - read-only view of state
pub struct CityBoardProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Main screen: the tracked collection
#[derive(Default)]
pub struct CityBoard;

impl Component<Action> for CityBoard {
    type Props<'a> = CityBoardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('a') | KeyCode::Char('/') => Some(Action::PanelOpen),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: CityBoardProps<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([
            Constraint::Length(2), // Title
            Constraint::Min(1),    // Collection
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let mut title = vec![Span::styled(
            "My cities",
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if state.is_busy {
            title.push(Span::raw(" "));
            title.push(Span::styled(
                spinner_frame(state.tick_count),
                Style::default().fg(Color::Yellow),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(title)), chunks[0]);

        let lines: Vec<Line> = if state.collection.is_empty() {
            vec![Line::styled(
                "No cities yet. Press a to add one.",
                Style::default().fg(Color::DarkGray),
            )]
        } else {
            state
                .collection
                .iter()
                .map(|city| {
                    Line::from(vec![
                        Span::raw(city.label()),
                        Span::styled(
                            format!("  {:.2}°N, {:.2}°E", city.lat, city.lon),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ])
                })
                .collect()
        };
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[2],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("a", "add city"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::City;
    use tui_dispatch::testing::*;

    #[test]
    fn test_handle_event_open_panel() {
        let mut component = CityBoard;
        let state = AppState::default();
        let props = CityBoardProps {
            state: &state,
            is_focused: true,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("a")), props)
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::PanelOpen);
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let mut component = CityBoard;
        let state = AppState::default();
        let props = CityBoardProps {
            state: &state,
            is_focused: false,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("q")), props)
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_collection() {
        let mut render = RenderHarness::new(60, 12);
        let mut component = CityBoard;
        let state = AppState::new(vec![City {
            name: "Lisbon".into(),
            country: Some("Portugal".into()),
            lat: 38.72,
            lon: -9.13,
        }]);

        let output = render.render_to_string_plain(|frame| {
            let props = CityBoardProps {
                state: &state,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        });

        assert!(output.contains("Lisbon, Portugal"));
    }

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner_frame(0), "|");
        assert_eq!(spinner_frame(5), "/");
    }
}
