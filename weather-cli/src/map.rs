//! Location map: geocoding hits plotted as numbered markers on a text grid.

use std::fmt::Write;
use weather_core::{LocationCandidate, MapConfig};

use crate::theme::RenderContext;

const WIDTH: usize = 48;
const HEIGHT: usize = 14;
/// Minimum padding in degrees around the markers.
const MIN_PAD_DEG: f64 = 0.5;

pub fn osm_link(lat: f64, lon: f64, zoom: u8) -> String {
    format!("https://www.openstreetmap.org/?mlat={lat:.4}&mlon={lon:.4}#map={zoom}/{lat:.4}/{lon:.4}")
}

/// `1`..`9`, then `*` for the rest.
pub fn marker_symbol(idx: usize) -> char {
    match idx {
        0..=8 => char::from(b'1' + idx as u8),
        _ => '*',
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

impl Bounds {
    fn around(points: impl Iterator<Item = (f64, f64)>) -> Option<Self> {
        let mut bounds: Option<Bounds> = None;
        for (lat, lon) in points {
            bounds = Some(match bounds {
                None => Bounds { lat_min: lat, lat_max: lat, lon_min: lon, lon_max: lon },
                Some(b) => Bounds {
                    lat_min: b.lat_min.min(lat),
                    lat_max: b.lat_max.max(lat),
                    lon_min: b.lon_min.min(lon),
                    lon_max: b.lon_max.max(lon),
                },
            });
        }
        bounds.map(|b| {
            let lat_pad = ((b.lat_max - b.lat_min) * 0.1).max(MIN_PAD_DEG);
            let lon_pad = ((b.lon_max - b.lon_min) * 0.1).max(MIN_PAD_DEG);
            Bounds {
                lat_min: b.lat_min - lat_pad,
                lat_max: b.lat_max + lat_pad,
                lon_min: b.lon_min - lon_pad,
                lon_max: b.lon_max + lon_pad,
            }
        })
    }

    fn centered(lat: f64, lon: f64) -> Self {
        Bounds {
            lat_min: lat - MIN_PAD_DEG,
            lat_max: lat + MIN_PAD_DEG,
            lon_min: lon - MIN_PAD_DEG,
            lon_max: lon + MIN_PAD_DEG,
        }
    }

    /// Grid cell (column, row) for a coordinate; north is up.
    fn project(&self, lat: f64, lon: f64) -> (usize, usize) {
        let x = (lon - self.lon_min) / (self.lon_max - self.lon_min) * (WIDTH - 1) as f64;
        let y = (self.lat_max - lat) / (self.lat_max - self.lat_min) * (HEIGHT - 1) as f64;
        (
            (x.round().max(0.0) as usize).min(WIDTH - 1),
            (y.round().max(0.0) as usize).min(HEIGHT - 1),
        )
    }
}

fn draw(ctx: &RenderContext, bounds: &Bounds, markers: &[(f64, f64, char)]) -> String {
    let p = &ctx.palette;
    let mut grid = vec![vec![None::<char>; WIDTH]; HEIGHT];
    for &(lat, lon, symbol) in markers {
        let (x, y) = bounds.project(lat, lon);
        grid[y][x] = Some(match grid[y][x] {
            Some(_) => '*',
            None => symbol,
        });
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", p.muted.apply_to(format!("{:.2}°N", bounds.lat_max)));
    let _ = writeln!(out, "{}", p.muted.apply_to(format!("┌{}┐", "─".repeat(WIDTH))));
    for row in grid {
        let cells: String = row
            .into_iter()
            .map(|cell| match cell {
                Some(symbol) => p.marker.apply_to(symbol).to_string(),
                None => p.muted.apply_to('·').to_string(),
            })
            .collect();
        let _ = writeln!(out, "{}{}{}", p.muted.apply_to('│'), cells, p.muted.apply_to('│'));
    }
    let _ = writeln!(out, "{}", p.muted.apply_to(format!("└{}┘", "─".repeat(WIDTH))));
    let _ = writeln!(
        out,
        "{}",
        p.muted.apply_to(format!(
            "{:.2}°N   lon {:.2} .. {:.2}",
            bounds.lat_min, bounds.lon_min, bounds.lon_max
        ))
    );
    out
}

pub fn map_view(ctx: &RenderContext, map: &MapConfig, candidates: &[LocationCandidate]) -> String {
    let p = &ctx.palette;
    let mut out = String::new();
    let _ = writeln!(out, "{}", p.title.apply_to("Location Map"));

    let bounds = Bounds::around(candidates.iter().map(|c| (c.latitude, c.longitude)));
    let Some(bounds) = bounds else {
        let _ = writeln!(out, "{}", p.muted.apply_to("No matching locations. Showing the default location."));
        let center = (map.default_lat, map.default_lon);
        let bounds = Bounds::centered(center.0, center.1);
        out.push_str(&draw(ctx, &bounds, &[(center.0, center.1, '+')]));
        let _ = writeln!(
            out,
            "  [+] {:.4}, {:.4}  {}",
            center.0,
            center.1,
            osm_link(center.0, center.1, map.default_zoom)
        );
        return out;
    };

    let markers: Vec<(f64, f64, char)> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| (c.latitude, c.longitude, marker_symbol(idx)))
        .collect();
    out.push_str(&draw(ctx, &bounds, &markers));

    for (idx, candidate) in candidates.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{}] {}  {:.4}, {:.4}  {}",
            p.marker.apply_to(marker_symbol(idx)),
            p.value.apply_to(candidate.label()),
            candidate.latitude,
            candidate.longitude,
            p.muted.apply_to(osm_link(candidate.latitude, candidate.longitude, map.default_zoom))
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;
    use weather_core::{Theme, UnitSystem};

    fn candidate(name: &str, lat: f64, lon: f64) -> LocationCandidate {
        LocationCandidate {
            name: name.into(),
            region: None,
            country: "US".into(),
            latitude: lat,
            longitude: lon,
        }
    }

    fn ctx() -> RenderContext {
        RenderContext::new(UnitSystem::Metric, Theme::Light)
    }

    fn grid_lines(out: &str) -> Vec<String> {
        out.lines().filter(|l| l.starts_with('│')).map(str::to_string).collect()
    }

    #[test]
    fn osm_link_format() {
        assert_eq!(
            osm_link(51.5074, -0.1278, 10),
            "https://www.openstreetmap.org/?mlat=51.5074&mlon=-0.1278#map=10/51.5074/-0.1278"
        );
    }

    #[test]
    fn marker_symbols() {
        assert_eq!(marker_symbol(0), '1');
        assert_eq!(marker_symbol(8), '9');
        assert_eq!(marker_symbol(9), '*');
    }

    #[test]
    fn markers_keep_relative_positions() {
        let found = [candidate("North", 45.0, -100.0), candidate("South", 30.0, -80.0)];
        let out = strip_ansi_codes(&map_view(&ctx(), &MapConfig::default(), &found)).into_owned();
        let rows = grid_lines(&out);
        assert_eq!(rows.len(), HEIGHT);

        let row_of = |c: char| rows.iter().position(|r| r.contains(c)).unwrap();
        let col_of = |c: char| rows[row_of(c)].chars().position(|x| x == c).unwrap();
        assert!(row_of('1') < row_of('2'), "north should be drawn above south");
        assert!(col_of('1') < col_of('2'), "west should be drawn left of east");

        assert!(out.contains("[1] North, US"));
        assert!(out.contains("[2] South, US"));
        assert!(out.contains("mlat=30.0000&mlon=-80.0000#map=10/"));
    }

    #[test]
    fn single_candidate_is_centered() {
        let found = [candidate("Only", 10.0, 20.0)];
        let out = strip_ansi_codes(&map_view(&ctx(), &MapConfig::default(), &found)).into_owned();
        let rows = grid_lines(&out);
        let row = rows.iter().position(|r| r.contains('1')).unwrap();
        assert!(row == HEIGHT / 2 || row + 1 == HEIGHT / 2);
    }

    #[test]
    fn no_candidates_falls_back_to_default_center() {
        let map = MapConfig { default_lat: 40.7128, default_lon: -74.006, default_zoom: 8 };
        let out = strip_ansi_codes(&map_view(&ctx(), &map, &[])).into_owned();
        assert!(out.contains("No matching locations"));
        assert!(out.contains("#map=8/40.7128/-74.0060"));
        assert_eq!(grid_lines(&out).iter().filter(|r| r.contains('+')).count(), 1);
    }

    #[test]
    fn overlapping_markers_are_merged() {
        let found = [candidate("A", 10.0, 20.0), candidate("B", 10.0, 20.0)];
        let out = strip_ansi_codes(&map_view(&ctx(), &MapConfig::default(), &found)).into_owned();
        let rows = grid_lines(&out);
        assert!(rows.iter().any(|r| r.contains('*')));
        assert!(!rows.iter().any(|r| r.contains('2')));
    }
}
