use serde::Serialize;
use std::f64::consts::PI;

/// Width of one slippy-map tile in pixels at integer zoom levels.
pub const TILE_SIZE: f64 = 512.0;

/// Latitude bound of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A pixel position relative to the top-left corner of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub cx: f64,
    pub cy: f64,
}

/// Maps geographic coordinates to viewport pixels.
pub trait Projector {
    fn project(&self, lon: f64, lat: f64) -> ScreenPoint;
}

/// Slippy-map viewport in Web Mercator.
#[derive(Debug, Clone, PartialEq)]
pub struct WebMercator {
    center: (f64, f64),
    zoom: f64,
    width: f64,
    height: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl WebMercator {
    /// `center` is `(lon, lat)`. `zoom` is clamped into the zoom bounds,
    /// which may be given in either order.
    pub fn new(center: (f64, f64), zoom: f64, size: (f64, f64), zoom_bounds: (f64, f64)) -> Self {
        let (min_zoom, max_zoom) = (
            zoom_bounds.0.min(zoom_bounds.1),
            zoom_bounds.0.max(zoom_bounds.1),
        );
        Self {
            center: (center.0, clamp_lat(center.1)),
            zoom: zoom.clamp(min_zoom, max_zoom),
            width: size.0,
            height: size.1,
            min_zoom,
            max_zoom,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    /// Inverse of [`Projector::project`].
    pub fn unproject(&self, point: ScreenPoint) -> (f64, f64) {
        let ws = self.world_size();
        let (cx, cy) = to_unit(self.center.0, self.center.1);
        let x = cx + (point.cx - self.width / 2.0) / ws;
        let y = cy + (point.cy - self.height / 2.0) / ws;
        from_unit(x, y)
    }

    /// Moves the view so the content shifts by `(-dx, -dy)` pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (lon, lat) = self.unproject(ScreenPoint {
            cx: self.width / 2.0 + dx,
            cy: self.height / 2.0 + dy,
        });
        self.center = (lon, clamp_lat(lat));
    }

    pub fn set_center(&mut self, lon: f64, lat: f64) {
        self.center = (lon, clamp_lat(lat));
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

impl Projector for WebMercator {
    fn project(&self, lon: f64, lat: f64) -> ScreenPoint {
        let ws = self.world_size();
        let (x, y) = to_unit(lon, lat);
        let (cx, cy) = to_unit(self.center.0, self.center.1);
        ScreenPoint {
            cx: (x - cx) * ws + self.width / 2.0,
            cy: (y - cy) * ws + self.height / 2.0,
        }
    }
}

fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
}

// Normalized world coordinates: (0, 0) is the north-west corner, (1, 1) the
// south-east.
fn to_unit(lon: f64, lat: f64) -> (f64, f64) {
    let phi = clamp_lat(lat).to_radians();
    let x = (lon + 180.0) / 360.0;
    let y = (1.0 - (PI / 4.0 + phi / 2.0).tan().ln() / PI) / 2.0;
    (x, y)
}

fn from_unit(x: f64, y: f64) -> (f64, f64) {
    let lon = x * 360.0 - 180.0;
    let lat = (PI - 2.0 * PI * y).sinh().atan().to_degrees();
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOSTON: (f64, f64) = (-71.09415, 42.36027);

    fn view() -> WebMercator {
        WebMercator::new(BOSTON, 12.0, (800.0, 600.0), (5.0, 18.0))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_center_projects_to_middle() {
        let p = view().project(BOSTON.0, BOSTON.1);
        assert!(close(p.cx, 400.0));
        assert!(close(p.cy, 300.0));
    }

    #[test]
    fn test_east_is_right_north_is_up() {
        let v = view();
        let east = v.project(BOSTON.0 + 0.01, BOSTON.1);
        let north = v.project(BOSTON.0, BOSTON.1 + 0.01);
        assert!(east.cx > 400.0);
        assert!(north.cy < 300.0);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let v = view();
        let p = v.project(-71.05, 42.38);
        let (lon, lat) = v.unproject(p);
        assert!(close(lon, -71.05));
        assert!(close(lat, 42.38));
    }

    #[test]
    fn test_zoom_doubles_distances() {
        let mut v = view();
        let before = v.project(BOSTON.0 + 0.01, BOSTON.1).cx - 400.0;
        v.set_zoom(13.0);
        let after = v.project(BOSTON.0 + 0.01, BOSTON.1).cx - 400.0;
        assert!(close(after, before * 2.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut v = view();
        v.set_zoom(30.0);
        assert_eq!(v.zoom(), 18.0);
        v.set_zoom(0.0);
        assert_eq!(v.zoom(), 5.0);
    }

    #[test]
    fn test_swapped_zoom_bounds_are_ordered() {
        let mut v = WebMercator::new(BOSTON, 12.0, (800.0, 600.0), (18.0, 5.0));
        assert_eq!(v.zoom(), 12.0);
        v.set_zoom(2.0);
        assert_eq!(v.zoom(), 5.0);
        v.set_zoom(20.0);
        assert_eq!(v.zoom(), 18.0);
    }

    #[test]
    fn test_set_center_recenters_and_clamps() {
        let mut v = view();
        v.set_center(-71.05, 42.38);
        let p = v.project(-71.05, 42.38);
        assert!(close(p.cx, 400.0));
        assert!(close(p.cy, 300.0));

        v.set_center(0.0, 89.0);
        assert_eq!(v.center(), (0.0, MAX_LATITUDE));
    }

    #[test]
    fn test_pan_moves_content() {
        let mut v = view();
        let before = v.project(BOSTON.0, BOSTON.1);
        v.pan_by(100.0, -50.0);
        let after = v.project(BOSTON.0, BOSTON.1);
        assert!((after.cx - (before.cx - 100.0)).abs() < 1e-6);
        assert!((after.cy - (before.cy + 50.0)).abs() < 1e-6);
    }

    #[test]
    fn test_resize_recenters() {
        let mut v = view();
        v.resize(1000.0, 1000.0);
        let p = v.project(BOSTON.0, BOSTON.1);
        assert!(close(p.cx, 500.0));
        assert!(close(p.cy, 500.0));
    }
}
