//! The perpetual step-then-draw cycle.
//!
//! [`RenderLoop::frame`] performs one iteration: clear, step, snapshot, draw
//! foods, draw animals, request the next frame. The host calls it from its
//! frame-presentation callback; tests call it directly a fixed number of
//! times. Resizes arrive between frames through [`RenderLoop::resize`].

#[cfg(test)]
#[path = "render_loop_test.rs"]
mod render_loop_test;

use std::cell::Cell;
use std::rc::Rc;

use crate::config::RenderOptions;
use crate::error::RenderError;
use crate::surface::DrawingSurface;
use crate::viewport::{CanvasElement, HostWindow, Viewport, apply_viewport};
use crate::world::Simulation;

/// Schedules the next frame on the host's presentation clock.
pub trait FrameScheduler {
    /// Ask the host to run the next frame. Must not block or recurse.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Schedule`] if the host refuses.
    fn request_frame(&mut self) -> Result<(), RenderError>;

    /// Drop any pending frame request.
    fn cancel(&mut self) {}
}

/// Cloneable cancellation flag for a [`RenderLoop`].
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    cancelled: Rc<Cell<bool>>,
}

impl LoopHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the loop before its next frame.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// What one frame drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// 1-based index of this frame.
    pub frame: u64,
    pub foods: usize,
    pub animals: usize,
}

/// Result of a call to [`RenderLoop::frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was drawn and the next one requested.
    Rendered(FrameStats),
    /// The loop was cancelled; nothing was drawn or requested.
    Stopped,
}

/// Owns the simulation, surface, canvas element and scheduler for one canvas.
pub struct RenderLoop<S, D, E, F> {
    simulation: S,
    surface: D,
    element: E,
    scheduler: F,
    viewport: Viewport,
    food_radius_ratio: f64,
    animal_size_ratio: f64,
    handle: LoopHandle,
    frames: u64,
}

impl<S, D, E, F> RenderLoop<S, D, E, F>
where
    S: Simulation,
    D: DrawingSurface,
    E: CanvasElement,
    F: FrameScheduler,
{
    /// Assemble a loop and apply `viewport` to the element and surface.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderError::Canvas`] from the initial viewport application.
    pub fn new(
        simulation: S,
        mut surface: D,
        mut element: E,
        scheduler: F,
        viewport: Viewport,
        options: &RenderOptions,
    ) -> Result<Self, RenderError> {
        apply_viewport(&mut element, &mut surface, &viewport)?;
        Ok(Self {
            simulation,
            surface,
            element,
            scheduler,
            viewport,
            food_radius_ratio: options.food_radius_ratio,
            animal_size_ratio: options.animal_size_ratio,
            handle: LoopHandle::new(),
            frames: 0,
        })
    }

    /// A handle that can cancel this loop.
    #[must_use]
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn surface(&self) -> &D {
        &self.surface
    }

    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    #[must_use]
    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    #[must_use]
    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    /// Number of frames drawn so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Recompute the viewport from the host in place and re-apply it in full.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderError::Canvas`] from the element or surface.
    pub fn resize(&mut self, host: &impl HostWindow) -> Result<(), RenderError> {
        self.viewport.recompute(host);
        apply_viewport(&mut self.element, &mut self.surface, &self.viewport)
    }

    /// Run one training round on the simulation.
    ///
    /// # Errors
    ///
    /// Propagates the simulation's error.
    pub fn train(&mut self) -> Result<String, RenderError> {
        self.simulation.train()
    }

    /// Cancel the loop and drop any pending frame request.
    pub fn stop(&mut self) {
        self.handle.cancel();
        self.scheduler.cancel();
    }

    /// Draw one frame and request the next.
    ///
    /// # Errors
    ///
    /// Returns the first simulation, canvas or scheduling error. The loop does
    /// not request another frame after an error.
    pub fn frame(&mut self) -> Result<FrameOutcome, RenderError> {
        if self.handle.is_cancelled() {
            return Ok(FrameOutcome::Stopped);
        }

        let viewport = self.viewport;
        self.surface.clear_rect(0.0, 0.0, viewport.width, viewport.height);

        self.simulation.step()?;
        let world = self.simulation.world()?;

        // Both sizes follow viewport width only, even on non-square viewports.
        let food_radius = self.food_radius_ratio * viewport.width;
        for food in &world.foods {
            let at = viewport.to_logical(food.x, food.y);
            self.surface.draw_circle(at.x, at.y, food_radius)?;
        }

        let animal_size = self.animal_size_ratio * viewport.width;
        for animal in &world.animals {
            let at = viewport.to_logical(animal.x, animal.y);
            self.surface.draw_triangle(at.x, at.y, animal_size, animal.rotation);
        }

        self.frames += 1;
        let stats = FrameStats { frame: self.frames, foods: world.foods.len(), animals: world.animals.len() };
        if world.is_empty() {
            log::debug!("frame {}: empty world", stats.frame);
        } else {
            log::debug!("frame {}: {} foods, {} animals", stats.frame, stats.foods, stats.animals);
        }

        self.scheduler.request_frame()?;
        Ok(FrameOutcome::Rendered(stats))
    }
}
