//! Shares a [`RenderLoop`] between its owner and the host's frame callback.
//!
//! The host callback has to own a handle to the loop so it can draw the next
//! frame, and the loop's scheduler has to reach the callback to resubmit it.
//! That is a reference cycle. [`LoopRunner`] owns both sides and breaks the
//! cycle in [`LoopRunner::stop`], which also runs when the runner is dropped.
//!
//! Every access to the shared loop goes through [`borrow_loop`], so a call
//! re-entered from inside a frame fails with [`RenderError::Busy`] instead of
//! panicking.

#[cfg(test)]
#[path = "runner_test.rs"]
mod runner_test;

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use crate::error::RenderError;
use crate::render_loop::{FrameOutcome, FrameScheduler, RenderLoop};
use crate::surface::DrawingSurface;
use crate::viewport::{CanvasElement, HostWindow};
use crate::world::Simulation;

/// Slot holding the installed frame callback, shared with the scheduler.
pub type CallbackSlot<C> = Rc<RefCell<Option<C>>>;

/// Mutably borrow a shared loop without panicking.
///
/// # Errors
///
/// Returns [`RenderError::Busy`] if the loop is already borrowed.
pub fn borrow_loop<S, D, E, F>(
    cell: &RefCell<RenderLoop<S, D, E, F>>,
) -> Result<RefMut<'_, RenderLoop<S, D, E, F>>, RenderError> {
    cell.try_borrow_mut().map_err(|_| RenderError::Busy)
}

/// Run one frame of a shared loop. This is the body of the host callback.
///
/// A stopped loop is logged and reported as [`FrameOutcome::Stopped`].
///
/// # Errors
///
/// Logs and returns the frame's error unchanged, so the host can surface it
/// as an unhandled failure.
pub fn drive_frame<S, D, E, F>(cell: &RefCell<RenderLoop<S, D, E, F>>) -> Result<FrameOutcome, RenderError>
where
    S: Simulation,
    D: DrawingSurface,
    E: CanvasElement,
    F: FrameScheduler,
{
    let mut render_loop = borrow_loop(cell)?;
    match render_loop.frame() {
        Ok(FrameOutcome::Stopped) => {
            log::info!("render loop stopped after {} frames", render_loop.frames());
            Ok(FrameOutcome::Stopped)
        }
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            log::error!("render loop halted: {err}");
            Err(err)
        }
    }
}

/// Owner of a shared [`RenderLoop`] and the frame callback `C` that drives it.
pub struct LoopRunner<S, D, E, F, C>
where
    S: Simulation,
    D: DrawingSurface,
    E: CanvasElement,
    F: FrameScheduler,
{
    render_loop: Rc<RefCell<RenderLoop<S, D, E, F>>>,
    callback: CallbackSlot<C>,
}

impl<S, D, E, F, C> LoopRunner<S, D, E, F, C>
where
    S: Simulation,
    D: DrawingSurface,
    E: CanvasElement,
    F: FrameScheduler,
{
    /// Wrap `render_loop`. `callback` is the same slot its scheduler reads.
    #[must_use]
    pub fn new(render_loop: RenderLoop<S, D, E, F>, callback: CallbackSlot<C>) -> Self {
        Self { render_loop: Rc::new(RefCell::new(render_loop)), callback }
    }

    /// Install the callback built by `make` and draw the first frame.
    ///
    /// `make` receives a handle to the shared loop for the callback to own.
    /// Starting an already started runner does nothing.
    ///
    /// # Errors
    ///
    /// Returns the first frame's error, or [`RenderError::Busy`] if the
    /// callback slot or the loop is borrowed.
    pub fn start(&self, make: impl FnOnce(Rc<RefCell<RenderLoop<S, D, E, F>>>) -> C) -> Result<(), RenderError> {
        {
            let mut slot = self.callback.try_borrow_mut().map_err(|_| RenderError::Busy)?;
            if slot.is_some() {
                log::warn!("render loop already started");
                return Ok(());
            }
            *slot = Some(make(Rc::clone(&self.render_loop)));
        }
        log::info!("render loop started");
        drive_frame(&self.render_loop)?;
        Ok(())
    }

    /// Re-read the host size and ratio and re-apply them in full.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Busy`] when re-entered from a frame, or the
    /// canvas error from re-applying the viewport.
    pub fn resize(&self, host: &impl HostWindow) -> Result<(), RenderError> {
        borrow_loop(&self.render_loop)?.resize(host)
    }

    /// Run one training round on the simulation.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Busy`] when re-entered from a frame, or the
    /// simulation's error.
    pub fn train(&self) -> Result<String, RenderError> {
        borrow_loop(&self.render_loop)?.train()
    }

    /// Cancel the loop and release the frame callback.
    ///
    /// Releasing the callback drops its handle to the loop, so nothing keeps
    /// the loop alive once the runner is gone.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Busy`] when re-entered from a frame.
    pub fn stop(&self) -> Result<(), RenderError> {
        borrow_loop(&self.render_loop)?.stop();
        let released = self.callback.try_borrow_mut().map_err(|_| RenderError::Busy)?.take();
        if released.is_some() {
            log::debug!("frame callback released");
        }
        Ok(())
    }
}

impl<S, D, E, F, C> Drop for LoopRunner<S, D, E, F, C>
where
    S: Simulation,
    D: DrawingSurface,
    E: CanvasElement,
    F: FrameScheduler,
{
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::warn!("render loop not released on drop: {err}");
        }
    }
}
