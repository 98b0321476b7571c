//! Logical/physical coordinate mapping for the drawing buffer.
//!
//! The canvas has two sizes: the *displayed* element size in CSS (logical)
//! pixels and the *buffer* size in device (physical) pixels. On a display with
//! pixel ratio `r`, the buffer is `r` times larger than the element and the
//! surface carries a uniform `scale(r, r)` so every primitive can be called
//! with logical coordinates.
//!
//! [`apply_viewport`] always resets the surface transform before scaling, so
//! calling it on every resize never compounds the ratio.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::DEFAULT_PIXEL_RATIO;
use crate::error::RenderError;
use crate::surface::DrawingSurface;

/// A point in either logical or physical pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Read access to the host window's size and display density.
pub trait HostWindow {
    /// Current inner window size in logical (CSS) pixels.
    fn inner_size(&self) -> (f64, f64);

    /// Physical pixels per logical pixel, if the host reports one.
    fn pixel_ratio(&self) -> Option<f64>;
}

/// The canvas element whose buffer and displayed size are kept in sync.
pub trait CanvasElement {
    /// Set the drawing buffer size in physical pixels.
    ///
    /// Values may be fractional; the host decides how to truncate them.
    fn set_buffer_size(&mut self, width: f64, height: f64);

    /// Set the displayed element size in logical pixels.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the host rejects the style update.
    fn set_display_size(&mut self, width: f64, height: f64) -> Result<(), RenderError>;
}

/// Logical viewport size plus the device pixel ratio.
///
/// `width` / `height` are in logical pixels. `pixel_ratio` is always finite
/// and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, pixel_ratio: DEFAULT_PIXEL_RATIO }
    }
}

impl Viewport {
    /// Build a viewport, falling back to a ratio of 1 for unusable ratios.
    #[must_use]
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self { width: width.max(0.0), height: height.max(0.0), pixel_ratio: sanitize_ratio(Some(pixel_ratio)) }
    }

    /// Drawing buffer width in physical pixels.
    #[must_use]
    pub fn physical_width(&self) -> f64 {
        self.width * self.pixel_ratio
    }

    /// Drawing buffer height in physical pixels.
    #[must_use]
    pub fn physical_height(&self) -> f64 {
        self.height * self.pixel_ratio
    }

    /// Convert a normalized `[0,1]²` position to logical pixels.
    #[must_use]
    pub fn to_logical(&self, nx: f64, ny: f64) -> Point {
        Point { x: nx * self.width, y: ny * self.height }
    }

    /// Convert a logical point to the physical pixel it lands on.
    #[must_use]
    pub fn to_physical(&self, logical: Point) -> Point {
        Point { x: logical.x * self.pixel_ratio, y: logical.y * self.pixel_ratio }
    }

    /// Re-read the host size and ratio, overwriting this viewport in place.
    pub fn recompute(&mut self, host: &impl HostWindow) {
        *self = compute_viewport(host);
    }
}

/// Map a host-reported ratio to a usable one: absent, non-finite and
/// non-positive values become [`DEFAULT_PIXEL_RATIO`].
#[must_use]
pub fn sanitize_ratio(reported: Option<f64>) -> f64 {
    match reported {
        Some(r) if r.is_finite() && r > 0.0 => r,
        _ => DEFAULT_PIXEL_RATIO,
    }
}

/// Read the current logical window size and pixel ratio.
#[must_use]
pub fn compute_viewport(host: &impl HostWindow) -> Viewport {
    let (width, height) = host.inner_size();
    Viewport::new(width, height, sanitize_ratio(host.pixel_ratio()))
}

/// Size the buffer and element for `viewport` and install the ratio scale.
///
/// Must be called in full after every resize: buffer, element, then a fresh
/// transform. The surface transform is reset before scaling.
///
/// # Errors
///
/// Propagates [`RenderError::Canvas`] from the element or surface.
pub fn apply_viewport<E, D>(element: &mut E, surface: &mut D, viewport: &Viewport) -> Result<(), RenderError>
where
    E: CanvasElement,
    D: DrawingSurface,
{
    element.set_buffer_size(viewport.physical_width(), viewport.physical_height());
    element.set_display_size(viewport.width, viewport.height)?;

    surface.reset_transform()?;
    surface.scale(viewport.pixel_ratio, viewport.pixel_ratio)?;

    log::info!(
        "viewport applied: {}x{} css px @ {} -> {}x{} buffer px",
        viewport.width,
        viewport.height,
        viewport.pixel_ratio,
        viewport.physical_width(),
        viewport.physical_height()
    );
    Ok(())
}
