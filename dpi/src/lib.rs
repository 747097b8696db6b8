//! # DPI
//!
//! Value types shared by everything that reacts to a window crossing monitors.
//!
//! ## Scale factors instead of raw DPI
//!
//! Windows reports pixel density as "dots per inch" relative to a baseline of [`BASE_DPI`] (96).
//! A monitor reporting 144 DPI therefore has a scale factor of `1.5`: a button that is 50 pixels
//! across at the baseline should be 75 pixels across there. The types in this crate always store
//! the *scale factor*, never the raw DPI, since that is what layout code multiplies by.
//!
//! The horizontal and vertical factors are kept separately. In practice they are identical on
//! every shipping version of Windows, but the `WM_DPICHANGED` message carries both and nothing is
//! gained by throwing one away.
//!
//! ## Geometry
//!
//! [`Position`], [`Size`] and [`WindowGeometry`] describe a window's outer rectangle in the
//! window manager's coordinate space. Coordinates are `f64` so that sizes can be rescaled
//! repeatedly (e.g. 96 -> 120 -> 144 -> 96 DPI during a drag) without accumulating rounding
//! error; they are rounded only when handed to the OS.
//!
//! ## Cargo Features
//!
//! * `serde`: Enables serialization/deserialization of all types with [Serde](https://crates.io/crates/serde).
//! * `mint`: Enables mint (math interoperability standard types) conversions.

#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg_hide), doc(cfg_hide(doc, docsrs)))]
#![forbid(unsafe_code)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The DPI that corresponds to a scale factor of `1.0`.
pub const BASE_DPI: u32 = 96;

/// Checks that the scale factor is a normal positive `f64`.
///
/// Zero, negative, subnormal, infinite and NaN factors are rejected. Every constructor in this
/// crate that takes a scale factor asserts this.
#[inline]
pub fn validate_scale_factor(scale_factor: f64) -> bool {
    scale_factor.is_sign_positive() && scale_factor.is_normal()
}

/// Converts a raw DPI value into a scale factor relative to [`BASE_DPI`].
#[inline]
pub fn dpi_to_scale_factor(dpi: u32) -> f64 {
    dpi as f64 / BASE_DPI as f64
}

/// Converts a scale factor back into the raw DPI it was derived from.
#[inline]
pub fn scale_factor_to_dpi(scale_factor: f64) -> u32 {
    (scale_factor * BASE_DPI as f64).round() as u32
}

/// The pixel density of a monitor, or of the content of a window, as a pair of scale factors.
///
/// Equality is structural. A window's content DPI and the DPI of the monitor under it are both
/// expressed with this type; they only differ while a transition is pending.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorDpi {
    pub x: f64,
    pub y: f64,
}

impl MonitorDpi {
    /// The baseline density (96 DPI on both axes).
    pub const IDENTITY: MonitorDpi = MonitorDpi { x: 1.0, y: 1.0 };

    /// Creates a density from horizontal and vertical scale factors.
    ///
    /// # Panics
    ///
    /// Panics if either factor fails [`validate_scale_factor`].
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        assert!(validate_scale_factor(x) && validate_scale_factor(y));
        MonitorDpi { x, y }
    }

    /// Creates a density with the same factor on both axes.
    #[inline]
    pub fn uniform(scale_factor: f64) -> Self {
        MonitorDpi::new(scale_factor, scale_factor)
    }

    /// Creates a density from raw DPI values as reported by the OS.
    ///
    /// Returns `None` if either value is zero, which is how several Win32 calls signal failure.
    #[inline]
    pub fn from_dpi(dpi_x: u32, dpi_y: u32) -> Option<Self> {
        if dpi_x == 0 || dpi_y == 0 {
            return None;
        }
        Some(MonitorDpi { x: dpi_to_scale_factor(dpi_x), y: dpi_to_scale_factor(dpi_y) })
    }

    #[inline]
    pub fn pixels_per_inch_x(&self) -> f64 {
        self.x * BASE_DPI as f64
    }

    #[inline]
    pub fn pixels_per_inch_y(&self) -> f64 {
        self.y * BASE_DPI as f64
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == MonitorDpi::IDENTITY
    }
}

impl Default for MonitorDpi {
    fn default() -> Self {
        MonitorDpi::IDENTITY
    }
}

/// The factor by which window content is scaled relative to the DPI it was laid out at.
///
/// [`ScaleFactor::IDENTITY`] is a distinct, exact value: callers compare against it to select an
/// identity render transform instead of a computed one that merely happens to be close to `1.0`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaleFactor {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactor {
    pub const IDENTITY: ScaleFactor = ScaleFactor { x: 1.0, y: 1.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        ScaleFactor { x, y }
    }

    /// The componentwise ratio `to / from`.
    #[inline]
    pub fn between(from: MonitorDpi, to: MonitorDpi) -> Self {
        ScaleFactor { x: to.x / from.x, y: to.y / from.y }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == ScaleFactor::IDENTITY
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        ScaleFactor::IDENTITY
    }
}

/// A position in the window manager's coordinate space.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Position {
        Position::new(x, y)
    }
}

impl From<Position> for (f64, f64) {
    fn from(p: Position) -> (f64, f64) {
        (p.x, p.y)
    }
}

impl From<[f64; 2]> for Position {
    fn from([x, y]: [f64; 2]) -> Position {
        Position::new(x, y)
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> [f64; 2] {
        [p.x, p.y]
    }
}

#[cfg(feature = "mint")]
impl From<mint::Point2<f64>> for Position {
    fn from(p: mint::Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}

#[cfg(feature = "mint")]
impl From<Position> for mint::Point2<f64> {
    fn from(p: Position) -> Self {
        mint::Point2 { x: p.x, y: p.y }
    }
}

/// A window size in the window manager's coordinate space.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }

    /// Rescales a size laid out at `from` so that it occupies the same physical extent at `to`.
    #[inline]
    pub fn rescale(&self, from: MonitorDpi, to: MonitorDpi) -> Size {
        Size { width: self.width * to.x / from.x, height: self.height * to.y / from.y }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<(f64, f64)> for Size {
    fn from((width, height): (f64, f64)) -> Size {
        Size::new(width, height)
    }
}

impl From<Size> for (f64, f64) {
    fn from(s: Size) -> (f64, f64) {
        (s.width, s.height)
    }
}

impl From<[f64; 2]> for Size {
    fn from([width, height]: [f64; 2]) -> Size {
        Size::new(width, height)
    }
}

impl From<Size> for [f64; 2] {
    fn from(s: Size) -> [f64; 2] {
        [s.width, s.height]
    }
}

#[cfg(feature = "mint")]
impl From<mint::Vector2<f64>> for Size {
    fn from(v: mint::Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }
}

#[cfg(feature = "mint")]
impl From<Size> for mint::Vector2<f64> {
    fn from(s: Size) -> Self {
        mint::Vector2 { x: s.width, y: s.height }
    }
}

/// A window's outer rectangle: location plus size.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl WindowGeometry {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        WindowGeometry { x, y, width, height }
    }

    #[inline]
    pub fn from_parts(position: Position, size: Size) -> Self {
        WindowGeometry::new(position.x, position.y, size.width, size.height)
    }

    /// Builds a rectangle from Win32-style edges (`left`, `top`, `right`, `bottom`).
    #[inline]
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        WindowGeometry::new(
            left as f64,
            top as f64,
            (right - left) as f64,
            (bottom - top) as f64,
        )
    }

    /// Returns the rectangle as rounded `left`, `top`, `right`, `bottom` edges.
    #[inline]
    pub fn to_edges(&self) -> (i32, i32, i32, i32) {
        let left = self.x.round() as i32;
        let top = self.y.round() as i32;
        (left, top, left + self.width.round() as i32, top + self.height.round() as i32)
    }

    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn with_position(self, position: Position) -> Self {
        WindowGeometry { x: position.x, y: position.y, ..self }
    }

    #[inline]
    pub fn with_size(self, size: Size) -> Self {
        WindowGeometry { width: size.width, height: size.height, ..self }
    }

    #[inline]
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_scale_factor() {
        assert!(validate_scale_factor(1.0));
        assert!(validate_scale_factor(2.0));
        assert!(validate_scale_factor(1.25));
        assert!(validate_scale_factor(0.5));

        assert!(!validate_scale_factor(0.0));
        assert!(!validate_scale_factor(-1.0));
        assert!(!validate_scale_factor(f64::INFINITY));
        assert!(!validate_scale_factor(f64::NAN));
        assert!(!validate_scale_factor(f64::NEG_INFINITY));
    }

    #[test]
    fn test_dpi_conversions() {
        assert_eq!(dpi_to_scale_factor(96), 1.0);
        assert_eq!(dpi_to_scale_factor(144), 1.5);
        assert_eq!(dpi_to_scale_factor(192), 2.0);
        assert_eq!(scale_factor_to_dpi(1.25), 120);
        assert_eq!(scale_factor_to_dpi(1.75), 168);
    }

    #[test]
    fn test_monitor_dpi_from_dpi() {
        assert_eq!(MonitorDpi::from_dpi(96, 96), Some(MonitorDpi::IDENTITY));
        assert_eq!(MonitorDpi::from_dpi(120, 144), Some(MonitorDpi { x: 1.25, y: 1.5 }));
        assert_eq!(MonitorDpi::from_dpi(0, 96), None);
        assert_eq!(MonitorDpi::from_dpi(96, 0), None);

        let dpi = MonitorDpi::uniform(1.5);
        assert_eq!(dpi.pixels_per_inch_x(), 144.0);
        assert_eq!(dpi.pixels_per_inch_y(), 144.0);
        assert!(!dpi.is_identity());
        assert!(MonitorDpi::default().is_identity());
    }

    #[test]
    #[should_panic]
    fn test_monitor_dpi_rejects_zero() {
        let _ = MonitorDpi::new(0.0, 1.0);
    }

    #[test]
    fn test_scale_factor_between() {
        let from = MonitorDpi::uniform(1.0);
        let to = MonitorDpi::new(1.5, 2.0);
        assert_eq!(ScaleFactor::between(from, to), ScaleFactor::new(1.5, 2.0));
        assert_eq!(ScaleFactor::between(to, to), ScaleFactor::IDENTITY);
        assert!(ScaleFactor::default().is_identity());
    }

    #[test]
    fn test_size_rescale() {
        let size = Size::new(800.0, 600.0);
        let rescaled = size.rescale(MonitorDpi::uniform(1.0), MonitorDpi::uniform(1.5));
        assert_eq!(rescaled, Size::new(1200.0, 900.0));

        // Going back and forth must not drift.
        let back = rescaled.rescale(MonitorDpi::uniform(1.5), MonitorDpi::uniform(1.0));
        assert_eq!(back, size);

        assert!(Size::new(0.0, 10.0).is_empty());
        assert!(!size.is_empty());
    }

    #[test]
    fn test_window_geometry_edges() {
        let geometry = WindowGeometry::from_edges(-10, 20, 790, 620);
        assert_eq!(geometry, WindowGeometry::new(-10.0, 20.0, 800.0, 600.0));
        assert_eq!(geometry.to_edges(), (-10, 20, 790, 620));
        assert_eq!(geometry.position(), Position::new(-10.0, 20.0));
        assert_eq!(geometry.size(), Size::new(800.0, 600.0));
        assert_eq!(geometry.center(), Position::new(390.0, 320.0));

        let moved = geometry.with_position(Position::new(0.0, 0.0)).with_size(Size::new(1.0, 2.0));
        assert_eq!(moved, WindowGeometry::new(0.0, 0.0, 1.0, 2.0));
    }

    #[test]
    fn test_tuple_and_array_conversions() {
        assert_eq!(Position::from((1.0, 2.0)), Position::new(1.0, 2.0));
        assert_eq!(Position::from([1.0, 2.0]), Position::new(1.0, 2.0));
        assert_eq!(Size::from((3.0, 4.0)), Size::new(3.0, 4.0));

        let x: (f64, f64) = Size::new(3.0, 4.0).into();
        assert_eq!(x, (3.0, 4.0));
        let x: [f64; 2] = Position::new(1.0, 2.0).into();
        assert_eq!(x, [1.0, 2.0]);
    }
}
