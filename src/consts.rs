//! Shared numeric and style constants for the sim-canvas crate.

use std::f64::consts::PI;

// ── Math ────────────────────────────────────────────────────────

/// One full turn in radians.
pub const TAU: f64 = 2.0 * PI;

/// 120°: angular offset from the nose to each tail vertex of an animal triangle.
pub const FRAC_2PI_3: f64 = 2.0 * PI / 3.0;

/// 240°: angular offset from the nose to the second tail vertex.
pub const FRAC_4PI_3: f64 = 4.0 * PI / 3.0;

// ── Shapes ──────────────────────────────────────────────────────

/// Nose-to-tail radius ratio of the animal triangle.
pub const NOSE_RATIO: f64 = 1.5;

/// Default food radius as a fraction of viewport width.
pub const FOOD_RADIUS_RATIO: f64 = 0.01 / 2.0;

/// Default animal size as a fraction of viewport width.
pub const ANIMAL_SIZE_RATIO: f64 = 0.01;

// ── Colors ──────────────────────────────────────────────────────

/// Fill style for food circles.
pub const FOOD_COLOR: &str = "rgb(0, 255, 128)";

/// Fill style for animal triangles.
pub const ANIMAL_COLOR: &str = "rgb(255, 255, 255)";

// ── Viewport ────────────────────────────────────────────────────

/// Pixel ratio assumed when the host does not report a usable one.
pub const DEFAULT_PIXEL_RATIO: f64 = 1.0;
