use crossterm::event::{KeyCode, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, ScrollbarStyle, SelectList,
    SelectListBehavior, SelectListProps, SelectListStyle, SelectionStyle, TextInput,
    TextInputProps, TextInputStyle, centered_rect, highlight_substring,
};

use super::Component;
use super::city_board::spinner_frame;
use crate::action::Action;
use crate::state::{City, PanelState};

const PLACEHOLDER: &str = "Search for a city...";

pub struct AddCityOverlay {
    input: TextInput,
    list: SelectList,
    modal: Modal,
    was_open: bool,
    /// Overlay bounds from the last render, for outside-click detection
    bounds: Option<Rect>,
    /// Result list area from the last render, for row clicks
    list_bounds: Option<Rect>,
}

pub struct AddCityOverlayProps<'a> {
    pub panel: &'a PanelState,
    pub tick_count: u32,
    pub is_focused: bool,
    // Action constructors
    pub on_query_change: fn(String) -> Action,
    pub on_select: fn(usize) -> Action,
}

impl Default for AddCityOverlay {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            list: SelectList::new(),
            modal: Modal::new(),
            was_open: false,
            bounds: None,
            list_bounds: None,
        }
    }
}

impl AddCityOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_open(&mut self, is_open: bool) {
        if is_open && !self.was_open {
            self.reset();
        }
        if !is_open {
            self.bounds = None;
            self.list_bounds = None;
        }
        self.was_open = is_open;
    }

    pub fn overlay_area(area: Rect) -> Rect {
        centered_rect(60, 16, area)
    }

    fn reset(&mut self) {
        self.input = TextInput::new();
        self.list = SelectList::new();
    }

    fn result_items(results: &[City], query: &str) -> Vec<Line<'static>> {
        let base = Style::default().fg(Color::Reset);
        let highlight = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        results
            .iter()
            .map(|city| highlight_substring(&city.label(), query, base, highlight))
            .collect()
    }

    fn list_style(padding: Padding) -> SelectListStyle {
        SelectListStyle {
            base: BaseStyle {
                border: None,
                padding,
                bg: None,
                fg: None,
            },
            selection: SelectionStyle::default(),
            scrollbar: ScrollbarStyle::default(),
        }
    }

    /// Result row under a press inside the list, if any
    fn clicked_row(&self, mouse: &MouseEvent, panel: &PanelState) -> Option<usize> {
        let list = self.list_bounds?;
        // one cell of padding around the rows
        let rows = list.inner(Margin::new(1, 1));
        if !rows.contains(Position::new(mouse.column, mouse.row)) {
            return None;
        }
        let visible = usize::from(rows.height).max(1);
        let offset = panel.selected.saturating_sub(visible - 1);
        let index = offset + usize::from(mouse.row - rows.y);
        let count = panel.results().map_or(0, <[City]>::len);
        (index < count).then_some(index)
    }

    fn message_line(props: &AddCityOverlayProps<'_>) -> Line<'static> {
        let panel = props.panel;
        if panel.is_searching() {
            return Line::styled(
                format!("Searching {}", spinner_frame(props.tick_count)),
                Style::default().fg(Color::DarkGray),
            );
        }
        let Some(message) = panel.visible_message() else {
            return Line::default();
        };
        let style = if panel.message_flash_ticks > 0 {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Line::styled(message.to_string(), style)
    }
}

impl Component<Action> for AddCityOverlay {
    type Props<'a> = AddCityOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let key = match event {
            EventKind::Key(key) => key,
            EventKind::Mouse(mouse) => {
                if !matches!(mouse.kind, MouseEventKind::Down(_)) {
                    return Vec::new();
                }
                let inside = self
                    .bounds
                    .is_some_and(|bounds| bounds.contains(Position::new(mouse.column, mouse.row)));
                if !inside {
                    return vec![Action::PanelOutsideClick];
                }
                return match self.clicked_row(mouse, props.panel) {
                    Some(index) => vec![(props.on_select)(index), Action::ResultConfirm],
                    None => Vec::new(),
                };
            }
            _ => return Vec::new(),
        };

        let results = props.panel.results().unwrap_or_default();

        // Handle special keys first
        match key.code {
            KeyCode::Esc => return vec![Action::PanelDismiss],
            KeyCode::Enter => {
                if !results.is_empty() {
                    return vec![Action::ResultConfirm];
                }
                return Vec::new();
            }
            // Up/down always navigate the list (if results exist)
            KeyCode::Down | KeyCode::Up => {
                if results.is_empty() {
                    return Vec::new();
                }
                let items = Self::result_items(results, &props.panel.query);
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: props.panel.selected,
                    is_focused: true,
                    style: Self::list_style(Padding::xy(1, 1)),
                    behavior: SelectListBehavior::default(),
                    on_select: props.on_select,
                    render_item: &|item| item.clone(),
                };
                return self
                    .list
                    .handle_event(event, list_props)
                    .into_iter()
                    .collect();
            }
            _ => {}
        }

        // All other keys go to the input
        let input_props = TextInputProps {
            value: &props.panel.query,
            placeholder: PLACEHOLDER,
            is_focused: true,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::new(1, 0, 1, 0),
                    bg: None,
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: props.on_query_change,
            on_submit: props.on_query_change,
            on_cursor_move: Some(|_| Action::Render),
        };

        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 20 || area.height < 8 {
            return;
        }

        let modal_area = Self::overlay_area(area);
        self.bounds = Some(modal_area);
        if props.panel.query.is_empty() {
            // cleared from outside the input; drop its cursor
            self.input = TextInput::new();
        }

        let message = Self::message_line(&props);
        let AddCityOverlay {
            input,
            list,
            modal,
            list_bounds,
            ..
        } = self;
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(3), // Input
                Constraint::Length(1), // Message
                Constraint::Min(1),    // Results
            ])
            .split(content_area);

            let input_props = TextInputProps {
                value: &props.panel.query,
                placeholder: PLACEHOLDER,
                is_focused: props.is_focused,
                style: TextInputStyle {
                    base: BaseStyle {
                        border: None,
                        padding: Padding::all(1),
                        bg: Some(Color::Rgb(50, 50, 60)),
                        fg: None,
                    },
                    placeholder_style: None,
                    cursor_style: None,
                },
                on_change: props.on_query_change,
                on_submit: props.on_query_change,
                on_cursor_move: Some(|_| Action::Render),
            };
            input.render(frame, chunks[0], input_props);

            frame.render_widget(Paragraph::new(message.clone()).centered(), chunks[1]);

            let results = props.panel.results().unwrap_or_default();
            let items = Self::result_items(results, &props.panel.query);
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: props.panel.selected,
                is_focused: props.is_focused,
                style: Self::list_style(Padding::all(1)),
                behavior: SelectListBehavior::default(),
                on_select: props.on_select,
                render_item: &|item| item.clone(),
            };
            *list_bounds = Some(chunks[2]);
            list.render(frame, chunks[2], list_props);
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(Color::Rgb(35, 35, 45)),
                        padding: Padding::default(),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::PanelDismiss,
                render_content: &mut render_content,
            },
        );
    }
}
