use crate::map::{Lod, MapRenderer};
use anyhow::Result;
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Natural Earth outline files and the LOD each one serves
const COASTLINE_FILES: [(&str, Lod); 4] = [
    ("ne_110m_coastline.json", Lod::Low),
    ("natural-earth.json", Lod::Medium),
    ("ne_50m_coastline.json", Lod::Medium),
    ("ne_10m_coastline.json", Lod::High),
];

const BORDER_FILES: [(&str, Lod); 2] = [("ne_50m_borders.json", Lod::Medium), ("ne_10m_borders.json", Lod::High)];

/// Load whatever outline data exists under `data_dir`. Missing files are
/// skipped; unreadable ones are logged and skipped.
pub fn load_outlines(renderer: &mut MapRenderer, data_dir: &Path) {
    for (filename, lod) in COASTLINE_FILES {
        load_if_present(data_dir, filename, |geojson| {
            for_each_line(geojson, &mut |line| renderer.add_coastline(line, lod));
        });
    }
    for (filename, lod) in BORDER_FILES {
        load_if_present(data_dir, filename, |geojson| {
            for_each_line(geojson, &mut |line| renderer.add_border(line, lod));
        });
    }
}

fn load_if_present(data_dir: &Path, filename: &str, apply: impl FnOnce(&GeoJson)) {
    let path = data_dir.join(filename);
    if !path.exists() {
        return;
    }
    match read_geojson(&path) {
        Ok(geojson) => {
            apply(&geojson);
            info!(file = filename, "Loaded map outlines");
        }
        Err(e) => warn!(file = filename, error = %e, "Failed to load map outlines"),
    }
}

fn read_geojson(path: &Path) -> Result<GeoJson> {
    let content = fs::read_to_string(path)?;
    Ok(content.parse()?)
}

/// Visit every line (and polygon exterior ring) in a GeoJSON document
fn for_each_line<F>(geojson: &GeoJson, add_line: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for geometry in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                geometry_lines(geometry, add_line);
            }
        }
        GeoJson::Feature(f) => {
            if let Some(geometry) = &f.geometry {
                geometry_lines(geometry, add_line);
            }
        }
        GeoJson::Geometry(geometry) => geometry_lines(geometry, add_line),
    }
}

fn geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    let to_line = |coords: &Vec<Vec<f64>>| -> Vec<(f64, f64)> { coords.iter().map(|c| (c[0], c[1])).collect() };

    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => lines.iter().for_each(|l| add_line(to_line(l))),
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_line(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for exterior in polygons.iter().filter_map(|rings| rings.first()) {
                add_line(to_line(exterior));
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

/// Rough continent outlines used when no outline files are available
const SIMPLE_WORLD: [&[(f64, f64)]; 7] = [
    // North America
    &[
        (-168.0, 65.0), (-166.0, 60.0), (-141.0, 60.0), (-130.0, 55.0), (-125.0, 48.0), (-124.0, 40.0),
        (-117.0, 32.0), (-110.0, 25.0), (-97.0, 25.0), (-97.0, 28.0), (-82.0, 24.0), (-80.0, 25.0),
        (-81.0, 31.0), (-75.0, 35.0), (-70.0, 41.0), (-67.0, 45.0), (-65.0, 47.0), (-55.0, 47.0),
        (-52.0, 47.0), (-55.0, 52.0), (-58.0, 55.0), (-64.0, 60.0), (-73.0, 62.0), (-80.0, 63.0),
        (-95.0, 62.0), (-110.0, 68.0), (-130.0, 70.0), (-145.0, 70.0), (-168.0, 65.0),
    ],
    // South America
    &[
        (-80.0, 10.0), (-75.0, 5.0), (-70.0, 5.0), (-60.0, 5.0), (-50.0, 0.0), (-35.0, -5.0),
        (-35.0, -10.0), (-38.0, -15.0), (-40.0, -22.0), (-48.0, -25.0), (-55.0, -34.0), (-58.0, -38.0),
        (-65.0, -42.0), (-68.0, -50.0), (-75.0, -52.0), (-75.0, -45.0), (-72.0, -40.0), (-72.0, -30.0),
        (-70.0, -20.0), (-70.0, -15.0), (-80.0, -5.0), (-80.0, 0.0), (-80.0, 10.0),
    ],
    // Europe
    &[
        (-10.0, 36.0), (-5.0, 36.0), (0.0, 38.0), (5.0, 43.0), (10.0, 44.0), (15.0, 45.0), (20.0, 40.0),
        (25.0, 37.0), (30.0, 40.0), (35.0, 42.0), (40.0, 43.0), (40.0, 55.0), (30.0, 60.0), (25.0, 65.0),
        (20.0, 70.0), (10.0, 71.0), (5.0, 62.0), (5.0, 58.0), (-5.0, 58.0), (-10.0, 52.0), (-5.0, 48.0),
        (-5.0, 43.0), (-10.0, 36.0),
    ],
    // Africa, west and south coast
    &[
        (-17.0, 15.0), (-15.0, 10.0), (-10.0, 5.0), (0.0, 5.0), (10.0, 5.0), (15.0, 0.0), (20.0, -5.0),
        (25.0, -10.0), (35.0, -20.0), (35.0, -25.0), (30.0, -30.0), (20.0, -35.0), (18.0, -35.0),
        (15.0, -30.0), (10.0, -15.0), (10.0, 0.0), (5.0, 5.0), (-5.0, 5.0), (-10.0, 10.0), (-17.0, 15.0),
    ],
    // Africa, north and east coast
    &[
        (-17.0, 15.0), (-17.0, 20.0), (-15.0, 28.0), (-5.0, 35.0), (10.0, 37.0), (20.0, 33.0),
        (25.0, 32.0), (35.0, 30.0), (35.0, 20.0), (42.0, 12.0), (50.0, 12.0), (45.0, 5.0), (35.0, -5.0),
        (35.0, -20.0),
    ],
    // Asia
    &[
        (35.0, 42.0), (40.0, 43.0), (50.0, 40.0), (55.0, 37.0), (60.0, 25.0), (65.0, 25.0), (70.0, 20.0),
        (75.0, 15.0), (80.0, 8.0), (80.0, 15.0), (88.0, 22.0), (92.0, 22.0), (95.0, 16.0), (100.0, 14.0),
        (105.0, 10.0), (110.0, 20.0), (115.0, 22.0), (120.0, 22.0), (122.0, 25.0), (125.0, 30.0),
        (130.0, 35.0), (135.0, 35.0), (140.0, 40.0), (145.0, 45.0), (145.0, 50.0), (140.0, 55.0),
        (135.0, 55.0), (130.0, 52.0), (130.0, 43.0), (120.0, 40.0), (110.0, 45.0), (90.0, 50.0),
        (70.0, 55.0), (60.0, 55.0), (50.0, 50.0), (40.0, 43.0),
    ],
    // Australia
    &[
        (115.0, -20.0), (120.0, -18.0), (130.0, -12.0), (140.0, -12.0), (145.0, -15.0), (150.0, -25.0),
        (153.0, -30.0), (150.0, -35.0), (145.0, -38.0), (140.0, -38.0), (135.0, -35.0), (130.0, -32.0),
        (125.0, -32.0), (115.0, -35.0), (115.0, -25.0), (115.0, -20.0),
    ],
];

/// Fall back to built-in outlines so the markers have some context
pub fn load_simple_world(renderer: &mut MapRenderer) {
    for outline in SIMPLE_WORLD {
        renderer.add_coastline(outline.to_vec(), Lod::Low);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_world_fallback() {
        let mut renderer = MapRenderer::new();
        load_simple_world(&mut renderer);
        assert!(renderer.has_data());
    }

    #[test]
    fn test_lines_from_feature_collection() {
        let geojson: GeoJson = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]], [[0.2, 0.2], [0.3, 0.3], [0.2, 0.2]]]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [5, 5]}}
            ]
        }"#
        .parse()
        .unwrap();

        let mut lines = Vec::new();
        for_each_line(&geojson, &mut |line| lines.push(line));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], vec![(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(lines[1].len(), 4);
    }

    #[test]
    fn test_missing_dir_loads_nothing() {
        let mut renderer = MapRenderer::new();
        load_outlines(&mut renderer, Path::new("/nonexistent/covid-dash-data"));
        assert!(!renderer.has_data());
    }
}
