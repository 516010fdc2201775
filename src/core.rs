use crate::error::{DotmapError, DotmapResult};

pub use kurbo::{Circle, Point, Vec2};

/// Lattice spacing of the decorative background dot grid, in pixels.
pub const GRID_SPACING: f64 = 20.0;

/// Clock advance per animation tick.
pub const TIME_STEP: f64 = 0.01;

/// A geographic marker. Order within the marker list is significant:
/// consecutive markers are joined by connective lines.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub size: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64, size: f64) -> Self {
        Self { lat, lng, size }
    }

    /// Projected pixel position on a surface of the given dimensions.
    pub fn project(&self, size: SurfaceSize) -> Point {
        Point::new(
            project_x(self.lng, f64::from(size.width)),
            project_y(self.lat, f64::from(size.height)),
        )
    }
}

/// Equirectangular x: linear in longitude, no clamping.
///
/// Out-of-range longitudes project outside the surface rather than erroring;
/// the rasterizer clips them.
pub fn project_x(lng: f64, width: f64) -> f64 {
    ((lng + 180.0) / 360.0) * width
}

/// Equirectangular y: linear in latitude, north at the top, no clamping.
pub fn project_y(lat: f64, height: f64) -> f64 {
    ((90.0 - lat) / 180.0) * height
}

/// Straight-alpha RGBA8 color (not premultiplied; the rasterizer premultiplies).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }
}

/// Visual configuration for a map scene. Colors default to the stock palette:
/// blue grid dots, green markers, translucent blue connective lines.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub dot_size: f64,
    pub dot_color: Rgba8,
    pub marker_color: Rgba8,
    pub line_color: Rgba8,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            dot_size: 2.0,
            dot_color: Rgba8::from_rgb8(0x5a, 0x6f, 0xff),
            marker_color: Rgba8::from_rgb8(0x5f, 0xe1, 0xa5),
            // rgba(90, 111, 255, 0.3)
            line_color: Rgba8::from_rgb8(0x5a, 0x6f, 0xff).with_alpha(77),
        }
    }
}

impl MapStyle {
    pub fn validate(&self) -> DotmapResult<()> {
        if !(self.dot_size.is_finite() && self.dot_size > 0.0) {
            return Err(DotmapError::validation("MapStyle dot_size must be > 0"));
        }
        Ok(())
    }
}

/// Surface dimensions in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}
