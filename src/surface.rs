//! Drawing surface: the only path from the render loop to the 2D context.
//!
//! [`Context2d`] is the raw host seam (implemented for
//! `web_sys::CanvasRenderingContext2d` in [`crate::web`]). [`Surface`] wraps
//! exactly one context and implements [`DrawingSurface`], the primitive set the
//! render loop draws with. All coordinates passed to a surface are logical
//! pixels; the ratio scale installed by [`crate::viewport::apply_viewport`]
//! maps them to the physical buffer.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::consts::{ANIMAL_COLOR, FOOD_COLOR, FRAC_2PI_3, FRAC_4PI_3, NOSE_RATIO, TAU};
use crate::error::RenderError;
use crate::viewport::Point;

/// Raw 2D context operations used by [`Surface`].
///
/// Mirrors the subset of the canvas 2D API this crate needs. Calls the host
/// marks fallible return `Result`.
pub trait Context2d {
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);

    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the host rejects the arc (e.g. a negative radius).
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), RenderError>;

    fn set_fill_style(&mut self, style: &str);
    fn fill(&mut self);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the host rejects the transform.
    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), RenderError>;

    /// Replace the current transform with the matrix
    /// `[scale_x skew_x dx; skew_y scale_y dy]`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the host rejects the transform.
    fn set_transform(
        &mut self,
        scale_x: f64,
        skew_y: f64,
        skew_x: f64,
        scale_y: f64,
        dx: f64,
        dy: f64,
    ) -> Result<(), RenderError>;
}

/// Primitive drawing vocabulary, in logical pixels.
pub trait DrawingSurface {
    /// Start a new subpath at `(x, y)`.
    fn move_to(&mut self, x: f64, y: f64);

    /// Extend the current path to `(x, y)`.
    fn line_to(&mut self, x: f64, y: f64);

    /// Multiply the current transform by a scale. Persists until reset.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the host rejects the transform.
    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), RenderError>;

    /// Restore the identity transform.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the host rejects the transform.
    fn reset_transform(&mut self) -> Result<(), RenderError>;

    /// Erase a rectangle.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fill a forward-pointing triangle centred on `(x, y)`, nose along `rotation`.
    fn draw_triangle(&mut self, x: f64, y: f64, size: f64, rotation: f64);

    /// Fill a full circle centred on `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the host rejects the arc.
    fn draw_circle(&mut self, x: f64, y: f64, radius: f64) -> Result<(), RenderError>;
}

/// Vertices of the animal triangle: `[nose, tail_a, tail_b]`.
///
/// The nose sits `1.5 * size` from the centre along `rotation`; the tails sit
/// `size` from the centre at `rotation + 120°` and `rotation + 240°`.
#[must_use]
pub fn triangle_vertices(x: f64, y: f64, size: f64, rotation: f64) -> [Point; 3] {
    let at = |angle: f64, radius: f64| Point::new(x + angle.cos() * radius, y + angle.sin() * radius);
    [
        at(rotation, size * NOSE_RATIO),
        at(rotation + FRAC_2PI_3, size),
        at(rotation + FRAC_4PI_3, size),
    ]
}

/// The single implementation of [`DrawingSurface`], over any [`Context2d`].
pub struct Surface<C> {
    ctx: C,
    circle_fill: String,
    triangle_fill: String,
}

impl<C: Context2d> Surface<C> {
    /// Wrap a context with the default food/animal fill styles.
    #[must_use]
    pub fn new(ctx: C) -> Self {
        Self::with_fills(ctx, FOOD_COLOR, ANIMAL_COLOR)
    }

    /// Wrap a context with explicit fill styles for circles and triangles.
    #[must_use]
    pub fn with_fills(ctx: C, circle_fill: &str, triangle_fill: &str) -> Self {
        Self { ctx, circle_fill: circle_fill.to_owned(), triangle_fill: triangle_fill.to_owned() }
    }

    /// The wrapped context.
    #[must_use]
    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// Fill an arc sector from `start` to `end` radians around `(x, y)`.
    ///
    /// [`DrawingSurface::draw_circle`] is the full `0..2π` sweep; partial
    /// sweeps draw an open arc filled along its chord.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the host rejects the arc.
    pub fn draw_arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), RenderError> {
        self.ctx.begin_path();
        self.ctx.arc(x, y, radius, start, end)?;
        self.ctx.set_fill_style(&self.circle_fill);
        self.ctx.fill();
        Ok(())
    }
}

impl<C: Context2d> DrawingSurface for Surface<C> {
    fn move_to(&mut self, x: f64, y: f64) {
        log::trace!("moved to: ({x},{y})");
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        log::trace!("line to: ({x},{y})");
        self.ctx.line_to(x, y);
    }

    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), RenderError> {
        self.ctx.scale(sx, sy)
    }

    fn reset_transform(&mut self) -> Result<(), RenderError> {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn draw_triangle(&mut self, x: f64, y: f64, size: f64, rotation: f64) {
        let [nose, tail_a, tail_b] = triangle_vertices(x, y, size, rotation);

        self.ctx.begin_path();
        self.move_to(nose.x, nose.y);
        self.line_to(tail_a.x, tail_a.y);
        self.line_to(tail_b.x, tail_b.y);
        self.line_to(nose.x, nose.y);

        self.ctx.set_fill_style(&self.triangle_fill);
        self.ctx.fill();

        log::trace!("rendered triangle at ({x},{y})");
    }

    fn draw_circle(&mut self, x: f64, y: f64, radius: f64) -> Result<(), RenderError> {
        self.draw_arc(x, y, radius, 0.0, TAU)
    }
}
