use ratatui::layout::{Position, Rect};

use crate::api::Dispatch;
use crate::dashboard::projection::{self, Marker};
use crate::dashboard::{Dashboard, Selection};
use crate::map::{hit_test, Lod, MapRenderer, Viewport};
use crate::ui::{self, Areas};

/// Which panel receives keyboard input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Map,
    Search,
    Table,
}

/// Application state: the dashboard plus everything about the terminal view
pub struct App<D> {
    pub dashboard: Dashboard<D>,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub focus: Focus,
    /// Search field contents
    pub search: String,
    /// Highlighted row when the table has focus
    pub table_cursor: usize,
    /// Blocking notice; swallows the next key or click
    pub notice: Option<&'static str>,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for the cursor marker and tooltips
    pub mouse_pos: Option<(u16, u16)>,
    dragged: bool,
    areas: Areas,
}

impl<D: Dispatch> App<D> {
    pub fn new(dashboard: Dashboard<D>, width: u16, height: u16) -> Self {
        let mut app = Self {
            dashboard,
            viewport: Viewport::world(0, 0),
            map_renderer: MapRenderer::new(),
            focus: Focus::Map,
            search: String::new(),
            table_cursor: 0,
            notice: None,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            dragged: false,
            areas: Areas::default(),
        };
        app.resize(width, height);
        app
    }

    /// Recompute panel areas and the map's braille canvas size
    pub fn resize(&mut self, width: u16, height: u16) {
        self.areas = ui::layout(Rect::new(0, 0, width, height));
        let inner = self.areas.map_inner();
        // Braille gives 2x4 resolution per character
        self.viewport.width = inner.width as usize * 2;
        self.viewport.height = inner.height as usize * 4;
    }

    pub fn areas(&self) -> &Areas {
        &self.areas
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom towards a terminal cell, if it lies on the map
    pub fn zoom_at(&mut self, col: u16, row: u16, zoom_in: bool) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.viewport.zoom_at(px, py, zoom_in);
        }
    }

    /// Back to the whole-world view; dashboard state is kept
    pub fn reset_view(&mut self) {
        self.viewport = Viewport::world(self.viewport.width, self.viewport.height);
    }

    /// Terminal cell to braille pixel on the map canvas
    fn map_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let inner = self.areas.map_inner();
        if !inner.contains(Position::new(col, row)) {
            return None;
        }
        Some(((col - inner.x) as i32 * 2, (row - inner.y) as i32 * 4))
    }

    /// Mouse position in braille pixels, when it is over the map
    pub fn mouse_pixel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.and_then(|(col, row)| self.map_pixel(col, row))
    }

    pub fn markers(&self) -> Vec<Marker> {
        projection::markers(self.dashboard.store().countries())
    }

    pub fn hovered_marker<'a>(&self, markers: &'a [Marker]) -> Option<&'a Marker> {
        let (px, py) = self.mouse_pixel_pos()?;
        hit_test(markers, &self.viewport, px, py)
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    pub fn mouse_down(&mut self, col: u16, row: u16) {
        if self.notice.take().is_some() {
            return;
        }
        let at = Position::new(col, row);
        if self.areas.map_inner().contains(at) {
            self.focus = Focus::Map;
            self.last_mouse = Some((col, row));
            self.dragged = false;
        } else if self.areas.search.contains(at) {
            self.focus = Focus::Search;
        } else if let Some(index) = self.table_row_at(col, row) {
            self.focus = Focus::Table;
            self.table_cursor = index;
            self.select_table_row(index);
        }
    }

    /// Drag pans the map; scale depends on zoom so it feels the same
    pub fn mouse_drag(&mut self, col: u16, row: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - col as i32;
            let dy = last_y as i32 - row as i32;
            let scale = if self.viewport.zoom < 2.0 {
                2
            } else if self.viewport.zoom < 4.0 {
                3
            } else {
                4
            };
            self.pan(dx * scale, dy * scale);
            self.dragged = true;
            self.last_mouse = Some((col, row));
        }
    }

    /// A press and release without dragging is a click on the map
    pub fn mouse_up(&mut self, col: u16, row: u16) {
        if self.last_mouse.take().is_some() && !self.dragged {
            self.click_map(col, row);
        }
        self.dragged = false;
    }

    fn click_map(&mut self, col: u16, row: u16) {
        let Some((px, py)) = self.map_pixel(col, row) else {
            return;
        };
        let markers = self.markers();
        if let Some(marker) = hit_test(&markers, &self.viewport, px, py) {
            self.select_country(marker.index);
        }
    }

    /// Index into the ranked table for a terminal cell
    fn table_row_at(&self, col: u16, row: u16) -> Option<usize> {
        let inner = self.areas.table_inner();
        if !inner.contains(Position::new(col, row)) {
            return None;
        }
        // First inner row is the header
        let index = (row - inner.y).checked_sub(1)? as usize;
        (index < self.ranked_len()).then_some(index)
    }

    fn ranked_len(&self) -> usize {
        projection::ranked(self.dashboard.store().countries()).len()
    }

    /// Select by position in the store's country list
    pub fn select_country(&mut self, index: usize) {
        if let Some(record) = self.dashboard.store().countries().get(index).cloned() {
            self.dashboard.select(Selection::Country(record));
        }
    }

    /// Select by position in the ranked table
    pub fn select_table_row(&mut self, index: usize) {
        let record = projection::ranked(self.dashboard.store().countries())
            .get(index)
            .map(|record| (*record).clone());
        if let Some(record) = record {
            self.dashboard.select(Selection::Country(record));
        }
    }

    pub fn select_global(&mut self) {
        self.dashboard.select(Selection::Global);
    }

    pub fn focus_search(&mut self) {
        self.focus = Focus::Search;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
    }

    pub fn leave_search(&mut self) {
        self.focus = Focus::Map;
    }

    /// Submit the search field. Not-found raises the blocking notice.
    pub fn submit_search(&mut self) {
        match self.dashboard.search_by_name(&self.search) {
            Ok(()) => self.focus = Focus::Map,
            Err(e) => self.notice = Some(e.user_message()),
        }
    }

    pub fn toggle_table_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Table => Focus::Map,
            Focus::Map | Focus::Search => Focus::Table,
        };
        self.table_cursor = self.table_cursor.min(self.ranked_len().saturating_sub(1));
    }

    pub fn table_up(&mut self) {
        self.table_cursor = self.table_cursor.saturating_sub(1);
    }

    pub fn table_down(&mut self) {
        let last = self.ranked_len().saturating_sub(1);
        self.table_cursor = (self.table_cursor + 1).min(last);
    }

    pub fn activate_table_row(&mut self) {
        self.select_table_row(self.table_cursor);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn lod_level(&self) -> &'static str {
        Lod::from_zoom(self.viewport.zoom).label()
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FetchEvent, FetchRequest, Scope};
    use crate::dashboard::testing::{located, Recorder};

    fn app() -> App<Recorder> {
        let mut dashboard = Dashboard::new(Recorder::default());
        dashboard.apply(FetchEvent::Countries(Ok(vec![
            located("USA", 1_000, -97.0, 38.0),
            located("Brazil", 25_000_000, -55.0, -10.0),
            located("India", 500, 77.0, 20.0),
        ])));
        App::new(dashboard, 120, 40)
    }

    fn selected(app: &App<Recorder>) -> &str {
        app.dashboard.store().selection().name()
    }

    /// Terminal cell that covers a lon/lat on the map
    fn cell_of(app: &App<Recorder>, lon: f64, lat: f64) -> (u16, u16) {
        let inner = app.areas().map_inner();
        let (px, py) = app.viewport.project(lon, lat);
        (inner.x + (px / 2) as u16, inner.y + (py / 4) as u16)
    }

    #[test]
    fn test_viewport_matches_map_area() {
        let app = app();
        let inner = app.areas().map_inner();
        assert_eq!(app.viewport.width, inner.width as usize * 2);
        assert_eq!(app.viewport.height, inner.height as usize * 4);
    }

    #[test]
    fn test_search_submit_selects() {
        let mut app = app();
        app.focus_search();
        for c in "bRaZiL".chars() {
            app.push_search_char(c);
        }
        app.submit_search();
        assert_eq!(selected(&app), "Brazil");
        assert_eq!(app.focus, Focus::Map);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_search_not_found_shows_notice() {
        let mut app = app();
        app.search = "Narnia".into();
        app.submit_search();
        assert_eq!(app.notice, Some("Country not found"));
        assert_eq!(selected(&app), "Global");

        // the next click only dismisses
        let (col, row) = cell_of(&app, -55.0, -10.0);
        app.mouse_down(col, row);
        assert!(app.notice.is_none());
        assert!(app.last_mouse.is_none());
    }

    #[test]
    fn test_backspace_edits_search() {
        let mut app = app();
        app.push_search_char('u');
        app.push_search_char('x');
        app.pop_search_char();
        app.push_search_char('s');
        app.push_search_char('a');
        app.submit_search();
        assert_eq!(selected(&app), "USA");
    }

    #[test]
    fn test_marker_click_selects() {
        let mut app = app();
        let (col, row) = cell_of(&app, -55.0, -10.0);
        app.mouse_down(col, row);
        app.mouse_up(col, row);
        assert_eq!(selected(&app), "Brazil");
        assert_eq!(
            app.dashboard.dispatcher().requests.last(),
            Some(&FetchRequest::History {
                scope: Scope::Country("Brazil".into()),
                tag: app.dashboard.store().history_tag(),
            })
        );
    }

    #[test]
    fn test_drag_does_not_select() {
        let mut app = app();
        let (col, row) = cell_of(&app, -55.0, -10.0);
        let lon = app.viewport.center_lon;
        app.mouse_down(col, row);
        app.mouse_drag(col + 3, row);
        app.mouse_up(col + 3, row);
        assert_eq!(selected(&app), "Global");
        assert_ne!(app.viewport.center_lon, lon);
    }

    #[test]
    fn test_click_on_empty_map_keeps_selection() {
        let mut app = app();
        let (col, row) = cell_of(&app, 150.0, -60.0);
        app.mouse_down(col, row);
        app.mouse_up(col, row);
        assert_eq!(selected(&app), "Global");
    }

    #[test]
    fn test_hover_finds_marker() {
        let mut app = app();
        let (col, row) = cell_of(&app, -55.0, -10.0);
        app.set_mouse_pos(col, row);
        let markers = app.markers();
        assert_eq!(app.hovered_marker(&markers).map(|m| m.country.as_str()), Some("Brazil"));
    }

    #[test]
    fn test_table_click_selects_ranked_row() {
        let mut app = app();
        let inner = app.areas().table_inner();
        // header, then Brazil, USA, India
        app.mouse_down(inner.x + 1, inner.y + 2);
        assert_eq!(selected(&app), "USA");
        assert_eq!(app.focus, Focus::Table);

        let requests = app.dashboard.dispatcher().requests.len();
        app.mouse_down(inner.x + 1, inner.y);
        app.mouse_down(inner.x + 1, inner.y + 9);
        assert_eq!(app.dashboard.dispatcher().requests.len(), requests);
    }

    #[test]
    fn test_table_keyboard() {
        let mut app = app();
        app.toggle_table_focus();
        assert_eq!(app.focus, Focus::Table);
        app.table_down();
        app.table_down();
        app.table_down();
        assert_eq!(app.table_cursor, 2);
        app.activate_table_row();
        assert_eq!(selected(&app), "India");
        app.table_up();
        app.activate_table_row();
        assert_eq!(selected(&app), "USA");
    }

    #[test]
    fn test_select_global_and_reset() {
        let mut app = app();
        app.select_table_row(0);
        app.zoom_in();
        app.select_global();
        app.reset_view();
        assert_eq!(selected(&app), "Global");
        assert_eq!(app.viewport.zoom, 1.0);
    }
}
