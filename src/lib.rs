//! Renders an external simulation onto an HTML canvas, once per display frame.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It keeps the
//! canvas buffer sized for the display's pixel ratio, exposes a small set of
//! drawing primitives in logical (CSS) pixels, and drives a perpetual
//! clear → step → snapshot → draw cycle on `requestAnimationFrame`. The
//! simulation itself is supplied by the page and consumed through the
//! [`world::Simulation`] contract.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`viewport`] | Logical/physical viewport mapping and its application to the canvas |
//! | [`surface`] | [`surface::DrawingSurface`] primitives over a raw 2D context |
//! | [`render_loop`] | The step-then-draw cycle, scheduler seam and cancellation handle |
//! | [`runner`] | Shared ownership of a loop and its frame callback; start, stop and release |
//! | [`world`] | Snapshot entity types and the simulation contract |
//! | [`web`] | `web_sys` implementations of the host seams and the exported [`web::App`] |
//! | [`config`] | Render options passed in by the page |
//! | [`error`] | [`error::RenderError`] |
//! | [`consts`] | Shared numeric and style constants |

pub mod config;
pub mod consts;
pub mod error;
pub mod render_loop;
pub mod runner;
pub mod surface;
pub mod viewport;
pub mod web;
pub mod world;

#[cfg(test)]
mod testing;
