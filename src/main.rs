mod api;
mod app;
mod braille;
mod config;
mod dashboard;
mod data;
mod logging;
mod map;
mod ui;

use anyhow::Result;
use api::{ApiClient, Dispatch, FetchEvent, Fetcher};
use app::{App, Focus};
use clap::Parser;
use config::Args;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use dashboard::Dashboard;
use ratatui::DefaultTerminal;
use std::sync::mpsc::Receiver;
use std::time::Duration;
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_path(), args.log_level())?;

    let client = ApiClient::new(&args.base_url)?;
    info!(base_url = %client.base_url(), "Starting covid-dash");
    let (fetcher, events) = Fetcher::new(client);

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &args, fetcher, &events);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    info!("Exiting");

    result
}

/// Keys while the search field has focus
fn handle_search_key<D: Dispatch>(app: &mut App<D>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => app.leave_search(),
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
}

fn handle_key<D: Dispatch>(app: &mut App<D>, key: KeyEvent) {
    // Any key dismisses the notice and does nothing else
    if app.notice.is_some() {
        app.dismiss_notice();
        return;
    }
    if app.focus == Focus::Search {
        handle_search_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('/') => app.focus_search(),
        KeyCode::Tab => app.toggle_table_focus(),
        KeyCode::Char('g') | KeyCode::Char('G') => app.select_global(),

        // Table navigation
        KeyCode::Up if app.focus == Focus::Table => app.table_up(),
        KeyCode::Down if app.focus == Focus::Table => app.table_down(),
        KeyCode::Enter if app.focus == Focus::Table => app.activate_table_row(),

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        // Layer toggles
        KeyCode::Char('b') | KeyCode::Char('B') => app.map_renderer.toggle_borders(),
        KeyCode::Char('m') | KeyCode::Char('M') => app.map_renderer.toggle_markers(),

        KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

        _ => {}
    }
}

/// Handle mouse events for selection, panning and zooming
fn handle_mouse<D: Dispatch>(app: &mut App<D>, mouse: MouseEvent) {
    // Always track mouse position for cursor marker and tooltips
    app.set_mouse_pos(mouse.column, mouse.row);

    // While the notice is up, a click only dismisses it
    if app.notice.is_some() {
        if matches!(mouse.kind, MouseEventKind::Down(_)) {
            app.dismiss_notice();
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_at(mouse.column, mouse.row, true),
        MouseEventKind::ScrollDown => app.zoom_at(mouse.column, mouse.row, false),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.mouse_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(mouse.column, mouse.row),
        _ => {}
    }
}

fn run<D: Dispatch>(
    terminal: &mut DefaultTerminal,
    args: &Args,
    dispatcher: D,
    events: &Receiver<FetchEvent>,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(Dashboard::new(dispatcher), size.width, size.height);

    data::load_outlines(&mut app.map_renderer, &args.data_dir);
    if !app.map_renderer.has_data() {
        info!(dir = %args.data_dir.display(), "No outline data found, using built-in world");
        data::load_simple_world(&mut app.map_renderer);
    }

    app.dashboard.start();

    loop {
        // Completed fetches are applied here, on the UI thread
        while let Ok(event) = events.try_recv() {
            app.dashboard.apply(event);
        }

        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
