use crate::api::Dispatch;
use crate::app::{App, Focus};
use crate::braille::BrailleCanvas;
use crate::dashboard::projection::{self, Marker, Summary};
use crate::dashboard::{Selection, Store};
use crate::map::MapLayers;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Widget},
    Frame,
};

/// Screen regions, shared by the renderer and mouse hit-testing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub summary: Rect,
    pub search: Rect,
    pub history: Rect,
    pub map: Rect,
    pub table: Rect,
    pub status: Rect,
}

impl Areas {
    pub fn map_inner(&self) -> Rect {
        bordered().inner(self.map)
    }

    pub fn table_inner(&self) -> Rect {
        bordered().inner(self.table)
    }
}

fn bordered() -> Block<'static> {
    Block::default().borders(Borders::ALL)
}

pub fn layout(area: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Summary boxes
            Constraint::Length(3), // Search
            Constraint::Length(3), // History tail
            Constraint::Min(8),    // Map + table
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[4]);

    Areas {
        header: rows[0],
        summary: rows[1],
        search: rows[2],
        history: rows[3],
        map: body[0],
        table: body[1],
        status: rows[5],
    }
}

fn titled(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    bordered().border_style(Style::default().fg(border)).title(Span::styled(
        format!(" {title} "),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

/// Render the dashboard
pub fn render<D: Dispatch>(frame: &mut Frame, app: &App<D>) {
    let areas = *app.areas();
    let store = app.dashboard.store();
    let summary = projection::summary(store);

    render_header(frame, &summary, areas.header);
    render_summary(frame, &summary, areas.summary);
    render_search(frame, app, areas.search);
    render_history(frame, store, areas.history);
    render_map(frame, app, areas.map);
    render_table(frame, app, areas.table);
    render_status_bar(frame, app, areas.status);

    if let Some(notice) = app.notice {
        render_notice(frame, notice);
    }
}

fn render_header(frame: &mut Frame, summary: &Summary, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);
    let lines = vec![
        Line::from(vec![
            Span::styled("Showing Data For: ", label),
            Span::styled(summary.scope.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![Span::styled("Last Updated: ", label), Span::raw(summary.updated.clone())]),
    ];
    frame.render_widget(Paragraph::new(lines).block(titled("Covid 19 Dashboard", false)), area);
}

fn render_summary(frame: &mut Frame, summary: &Summary, area: Rect) {
    let boxes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let figures = [
        ("Total Cases", &summary.cases, Color::Yellow),
        ("Total Deaths", &summary.deaths, Color::Red),
        ("Total Recovery", &summary.recovered, Color::Green),
    ];
    for ((title, value, color), rect) in figures.into_iter().zip(boxes.iter()) {
        let text = Span::styled(value.as_str(), Style::default().fg(color).add_modifier(Modifier::BOLD));
        frame.render_widget(Paragraph::new(text).block(titled(title, false)), *rect);
    }
}

fn render_search<D: Dispatch>(frame: &mut Frame, app: &App<D>, area: Rect) {
    let focused = app.focus == Focus::Search;
    let block = titled("Country Search", focused);
    let inner = block.inner(area);

    let text = if app.search.is_empty() && !focused {
        Span::styled("Enter country (press / to search)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.search.as_str())
    };
    frame.render_widget(Paragraph::new(text).block(block), area);

    if focused {
        let offset = (app.search.chars().count() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position((inner.x + offset, inner.y));
    }
}

fn render_history(frame: &mut Frame, store: &Store, area: Rect) {
    let line = projection::history_line(store.history());
    frame.render_widget(Paragraph::new(line).block(titled("Cases Over Time", false)), area);
}

fn render_map<D: Dispatch>(frame: &mut Frame, app: &App<D>, area: Rect) {
    let block = titled("Interactive World Map", app.focus == Focus::Map);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let store = app.dashboard.store();
    let markers = projection::markers(store.countries());
    let selected = match store.selection() {
        Selection::Country(record) => Some(record.country.as_str()),
        Selection::Global => None,
    };
    let layers = app
        .map_renderer
        .render(inner.width as usize, inner.height as usize, &viewport, &markers, selected);

    let cursor_pos = app.mouse_pixel_pos().map(|(px, py)| ((px / 2) as u16, (py / 4) as u16));
    frame.render_widget(MapWidget { layers, cursor_pos }, inner);

    if let (Some(marker), Some((cx, cy))) = (app.hovered_marker(&markers), cursor_pos) {
        render_tooltip(frame, marker, inner, inner.x + cx, inner.y + cy);
    }
}

/// Braille map layers with the mouse cursor overlaid
struct MapWidget {
    layers: MapLayers,
    cursor_pos: Option<(u16, u16)>,
}

fn paint_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    let rows = canvas.height().min(area.height as usize);
    let cols = canvas.width().min(area.width as usize);
    for row in 0..rows {
        for col in 0..cols {
            if let Some(ch) = canvas.glyph(col, row) {
                buf[(area.x + col as u16, area.y + row as u16)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front
        paint_layer(&self.layers.coastlines, Color::Cyan, area, buf);
        paint_layer(&self.layers.borders, Color::DarkGray, area, buf);
        paint_layer(&self.layers.markers, Color::Red, area, buf);
        paint_layer(&self.layers.selected, Color::Yellow, area, buf);

        if let Some((cx, cy)) = self.cursor_pos {
            if cx < area.width && cy < area.height {
                buf[(area.x + cx, area.y + cy)].set_char('╋').set_fg(Color::White);
            }
        }
    }
}

/// Popup next to the cursor, kept inside the map area
fn render_tooltip(frame: &mut Frame, marker: &Marker, bounds: Rect, x: u16, y: u16) {
    let width = marker.tooltip.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 2;
    let height = marker.tooltip.len() as u16 + 2;
    if width > bounds.width || height > bounds.height {
        return;
    }

    let x = (x + 2).min(bounds.right() - width);
    let y = y.saturating_sub(height).max(bounds.y);
    let rect = Rect::new(x, y, width, height);

    let mut lines: Vec<Line> = marker.tooltip.iter().map(|l| Line::raw(l.as_str())).collect();
    if let Some(first) = lines.first_mut() {
        first.style = Style::default().add_modifier(Modifier::BOLD);
    }
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(bordered().border_style(Style::default().fg(Color::Red))),
        rect,
    );
}

fn render_table<D: Dispatch>(frame: &mut Frame, app: &App<D>, area: Rect) {
    let focused = app.focus == Focus::Table;
    let store = app.dashboard.store();
    let selected = store.selection().name();

    let header = Row::new(["Country", "Cases", "Deaths", "Recovered"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows = projection::ranked(store.countries()).into_iter().enumerate().map(|(i, record)| {
        let mut style = Style::default();
        if record.country == selected {
            style = style.fg(Color::Yellow);
        }
        if focused && i == app.table_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Row::new([
            record.country.clone(),
            projection::format_figure(record.cases),
            projection::format_figure(record.deaths),
            projection::format_figure(record.recovered),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(34),
        Constraint::Percentage(22),
        Constraint::Percentage(22),
        Constraint::Percentage(22),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(titled("Country Data Table", focused));
    frame.render_widget(table, area);
}

fn toggle_span(on: bool, on_text: &'static str, off_text: &'static str) -> Span<'static> {
    Span::styled(
        if on { on_text } else { off_text },
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

fn render_status_bar<D: Dispatch>(frame: &mut Frame, app: &App<D>, area: Rect) {
    let settings = &app.map_renderer.settings;
    let dim = Style::default().fg(Color::DarkGray);

    let hints = match app.focus {
        Focus::Search => " | Enter:search Esc:back",
        Focus::Table => " | ↑↓:row Enter:select Tab:map q:quit",
        Focus::Map => " | /:search g:global Tab:table hjkl:pan +/-:zoom r:reset q:quit",
    };

    let status = Line::from(vec![
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" (", dim),
        Span::styled(app.lod_level(), Style::default().fg(Color::Magenta)),
        Span::styled(") ", dim),
        toggle_span(settings.show_borders, "[B]order ", "[b]order "),
        toggle_span(settings.show_markers, "[M]arkers ", "[m]arkers "),
        Span::styled("| ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(hints, dim),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}

/// Blocking notice, centred on screen
fn render_notice(frame: &mut Frame, notice: &str) {
    let area = frame.area();
    let width = (notice.chars().count() as u16 + 6).max(24).min(area.width);
    let height = 4.min(area.height);
    let rect = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let lines = vec![
        Line::styled(notice, Style::default().add_modifier(Modifier::BOLD)),
        Line::styled("press any key", Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            bordered()
                .border_style(Style::default().fg(Color::Red))
                .title(Span::styled(" Notice ", Style::default().fg(Color::Red))),
        ),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FetchEvent, GlobalSnapshot};
    use crate::dashboard::testing::{country, Recorder};
    use crate::dashboard::Dashboard;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App<Recorder>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_layout_fills_screen() {
        let areas = layout(Rect::new(0, 0, 120, 40));
        assert_eq!(areas.header.height, 4);
        assert_eq!(areas.status.y, 39);
        assert_eq!(areas.map.y, areas.table.y);
        assert_eq!(areas.map.width + areas.table.width, 120);
    }

    #[test]
    fn test_renders_placeholders_before_data() {
        let app = App::new(Dashboard::new(Recorder::default()), 120, 40);
        let text = screen(&app);
        assert!(text.contains("Showing Data For: Global"));
        assert!(text.contains("Loading..."));
        assert!(text.contains("Loading history..."));
    }

    #[test]
    fn test_renders_loaded_dashboard() {
        let mut dashboard = Dashboard::new(Recorder::default());
        dashboard.apply(FetchEvent::Global(Ok(GlobalSnapshot {
            cases: Some(704_753_890),
            deaths: Some(7_010_681),
            recovered: Some(675_619_811),
            updated: Some(1_609_459_200_000),
        })));
        dashboard.apply(FetchEvent::Countries(Ok(vec![country("USA", 1000), country("Brazil", 2000)])));
        let app = App::new(dashboard, 120, 40);
        let text = screen(&app);

        assert!(text.contains("704,753,890"));
        assert!(text.contains("1/1/2021"));
        let brazil = text.find("Brazil").unwrap();
        let usa = text.find("USA").unwrap();
        assert!(brazil < usa);
    }

    #[test]
    fn test_renders_notice() {
        let mut app = App::new(Dashboard::new(Recorder::default()), 120, 40);
        app.search = "Narnia".into();
        app.submit_search();
        assert!(screen(&app).contains("Country not found"));
    }
}
