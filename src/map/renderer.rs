use crate::braille::BrailleCanvas;
use crate::dashboard::projection::Marker;
use crate::map::geometry::{draw_disc, draw_line};
use crate::map::projection::Viewport;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Extra braille pixels around a marker that still count as a hit
const HIT_SLOP: f64 = 2.0;

/// Level of detail for outline data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - world view
    Medium, // 50m - continental
    High,   // 10m - regional
}

impl Lod {
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 2.0 {
            Lod::Low
        } else if zoom < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lod::Low => "110m",
            Lod::Medium => "50m",
            Lod::High => "10m",
        }
    }
}

/// Layer toggles
#[derive(Clone, Debug)]
pub struct DisplaySettings {
    pub show_borders: bool,
    pub show_markers: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_borders: true,
            show_markers: true,
        }
    }
}

/// Rendered canvases, drawn back to front in different colours
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub markers: BrailleCanvas,
    pub selected: BrailleCanvas,
}

/// World outline store plus the marker overlay renderer
#[derive(Default)]
pub struct MapRenderer {
    coastlines_low: Vec<LineString>,
    coastlines_medium: Vec<LineString>,
    coastlines_high: Vec<LineString>,
    borders_medium: Vec<LineString>,
    borders_high: Vec<LineString>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finest coastline set available at or below `lod`
    fn coastlines(&self, lod: Lod) -> &[LineString] {
        let candidates = match lod {
            Lod::High => [&self.coastlines_high, &self.coastlines_medium, &self.coastlines_low],
            Lod::Medium => [&self.coastlines_medium, &self.coastlines_low, &self.coastlines_low],
            Lod::Low => [&self.coastlines_low, &self.coastlines_low, &self.coastlines_low],
        };
        candidates
            .into_iter()
            .find(|set| !set.is_empty())
            .map(|set| set.as_slice())
            .unwrap_or_default()
    }

    fn borders(&self, lod: Lod) -> &[LineString] {
        if lod == Lod::High && !self.borders_high.is_empty() {
            &self.borders_high
        } else {
            &self.borders_medium
        }
    }

    /// Render outlines and country markers for a `width` x `height` character area.
    /// The marker whose country equals `selected` goes on its own layer.
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        markers: &[Marker],
        selected: Option<&str>,
    ) -> MapLayers {
        let lod = Lod::from_zoom(viewport.zoom);
        let mut layers = MapLayers {
            coastlines: BrailleCanvas::new(width, height),
            borders: BrailleCanvas::new(width, height),
            markers: BrailleCanvas::new(width, height),
            selected: BrailleCanvas::new(width, height),
        };

        for line in self.coastlines(lod) {
            draw_linestring(&mut layers.coastlines, line, viewport);
        }

        if self.settings.show_borders {
            for line in self.borders(lod) {
                draw_linestring(&mut layers.borders, line, viewport);
            }
        }

        if self.settings.show_markers {
            for marker in markers {
                let (px, py) = viewport.project(marker.lon, marker.lat);
                if !viewport.is_visible(px, py) {
                    continue;
                }
                let canvas = if selected == Some(marker.country.as_str()) {
                    &mut layers.selected
                } else {
                    &mut layers.markers
                };
                draw_disc(canvas, px, py, marker.radius.round() as i32);
            }
        }

        layers
    }

    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    pub fn add_border(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::High => self.borders_high.push(line),
            Lod::Low | Lod::Medium => self.borders_medium.push(line),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty() || !self.coastlines_medium.is_empty() || !self.coastlines_high.is_empty()
    }

    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }

    pub fn toggle_markers(&mut self) {
        self.settings.show_markers = !self.settings.show_markers;
    }
}

/// Draw a linestring with viewport culling
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let point = viewport.project(lon, lat);
        if let Some(prev) = prev {
            // Skip segments that wrap around the antimeridian
            let dist = ((point.0 - prev.0).abs() + (point.1 - prev.1).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible(prev, point) {
                draw_line(canvas, prev.0, prev.1, point.0, point.1);
            }
        }
        prev = Some(point);
    }
}

/// The marker under canvas pixel (px, py), nearest centre first.
pub fn hit_test<'a>(markers: &'a [Marker], viewport: &Viewport, px: i32, py: i32) -> Option<&'a Marker> {
    markers
        .iter()
        .filter_map(|marker| {
            let (mx, my) = viewport.project(marker.lon, marker.lat);
            let dist = (f64::from(mx) - f64::from(px)).hypot(f64::from(my) - f64::from(py));
            (dist <= marker.radius + HIT_SLOP).then_some((dist, marker))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, marker)| marker)
}
