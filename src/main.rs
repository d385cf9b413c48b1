//! City board - add-city search overlay on tui-dispatch

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use cityboard::action::Action;
use cityboard::api::{HttpRegistry, OPEN_METEO_GEOCODING, OpenMeteoSearch};
use cityboard::client::{CityRegistry, LocalRegistry};
use cityboard::components::{
    AddCityOverlay, AddCityOverlayProps, CityBoard, CityBoardProps, Component,
};
use cityboard::debounce::QUIET_WINDOW;
use cityboard::effect::{Effect, Services, handle_effect};
use cityboard::logging::init_logging;
use cityboard::reducer::reducer;
use cityboard::state::{AppState, TICK_MS};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tui_dispatch::{
    EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// City board - track cities and add new ones through a search overlay
#[derive(Parser, Debug)]
#[command(name = "cityboard")]
#[command(about = "Track cities; add them through a debounced search overlay")]
struct Args {
    /// Base URL of the geocoding service used for search
    #[arg(long, default_value = OPEN_METEO_GEOCODING)]
    search_url: String,

    /// Base URL of the city registry service (in-memory registry when absent)
    #[arg(long)]
    registry_url: Option<String>,

    /// Quiet period in milliseconds before a typed query is searched
    #[arg(
        long,
        default_value_t = QUIET_WINDOW.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    quiet_window_ms: u64,

    /// File receiving diagnostic logs
    #[arg(long, default_value = "cityboard.log")]
    log_file: PathBuf,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum BoardComponentId {
    Board,
    AddCity,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum BoardContext {
    Main,
    AddCity,
}

impl EventRoutingState<BoardComponentId, BoardContext> for AppState {
    fn focused(&self) -> Option<BoardComponentId> {
        if self.panel.is_open {
            Some(BoardComponentId::AddCity)
        } else {
            Some(BoardComponentId::Board)
        }
    }

    fn modal(&self) -> Option<BoardComponentId> {
        if self.panel.is_open {
            Some(BoardComponentId::AddCity)
        } else {
            None
        }
    }

    fn binding_context(&self, id: BoardComponentId) -> BoardContext {
        match id {
            BoardComponentId::Board => BoardContext::Main,
            BoardComponentId::AddCity => BoardContext::AddCity,
        }
    }

    fn default_context(&self) -> BoardContext {
        BoardContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        search_url,
        registry_url,
        quiet_window_ms,
        log_file,
        log_level,
        debug: debug_args,
    } = Args::parse();

    init_logging(&log_file, &log_level)?;

    let registry: Arc<dyn CityRegistry> = match registry_url {
        Some(url) => {
            tracing::info!(%url, "using remote city registry");
            Arc::new(HttpRegistry::new(url))
        }
        None => {
            tracing::info!("using in-memory city registry");
            Arc::new(LocalRegistry::new())
        }
    };
    let services = Services::new(Arc::new(OpenMeteoSearch::new(search_url)), registry)
        .with_quiet_window(Duration::from_millis(quiet_window_ms));

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, services, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct BoardUi {
    board: CityBoard,
    add_city: AddCityOverlay,
}

impl BoardUi {
    fn new() -> Self {
        Self {
            board: CityBoard,
            add_city: AddCityOverlay::new(),
        }
    }

    fn overlay_props(state: &AppState, is_focused: bool) -> AddCityOverlayProps<'_> {
        AddCityOverlayProps {
            panel: &state.panel,
            tick_count: state.tick_count,
            is_focused,
            on_query_change: Action::QueryInput,
            on_select: Action::ResultSelect,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<BoardComponentId>,
    ) {
        event_ctx.set_component_area(BoardComponentId::Board, area);

        let props = CityBoardProps {
            state,
            is_focused: render_ctx.is_focused() && !state.panel.is_open,
        };
        self.board.render(frame, area, props);

        self.add_city.set_open(state.panel.is_open);
        if state.panel.is_open {
            event_ctx.set_component_area(
                BoardComponentId::AddCity,
                AddCityOverlay::overlay_area(area),
            );
            let props = Self::overlay_props(state, render_ctx.is_focused());
            self.add_city.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&BoardComponentId::AddCity);
        }
    }

    fn handle_board_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = CityBoardProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.board.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_add_city_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.add_city.set_open(state.panel.is_open);
        let props = Self::overlay_props(state, true);
        let actions: Vec<_> = self
            .add_city
            .handle_event(event, props)
            .into_iter()
            .collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    services: Services,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(BoardUi::new()));
    let mut bus: EventBus<AppState, Action, BoardComponentId, BoardContext> = EventBus::new();
    let keybindings: Keybindings<BoardContext> = Keybindings::new();

    let ui_board = Rc::clone(&ui);
    bus.register(BoardComponentId::Board, move |event, state| {
        ui_board.borrow_mut().handle_board_event(&event.kind, state)
    });

    let ui_add_city = Rc::clone(&ui);
    bus.register(BoardComponentId::AddCity, move |event, state| {
        ui_add_city
            .borrow_mut()
            .handle_add_city_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            None,
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx.tasks(), &services),
        )
        .await
}
