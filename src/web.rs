//! Browser bindings: the only module that talks to `web_sys`.
//!
//! Implements the crate's host seams against the DOM ([`Context2d`] for the
//! 2D context, [`CanvasElement`] for the canvas element, [`HostWindow`] for
//! the window, [`FrameScheduler`] over `requestAnimationFrame`), imports the
//! page's simulation object, and exports [`App`] to JavaScript.
//!
//! The page owns event wiring: it calls `app.resize()` from its resize
//! listener and `app.train()` from its button handler.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::config::RenderOptions;
use crate::error::RenderError;
use crate::render_loop::{FrameScheduler, RenderLoop};
use crate::runner::{CallbackSlot, LoopRunner, drive_frame};
use crate::surface::{Context2d, Surface};
use crate::viewport::{CanvasElement, HostWindow, compute_viewport};
use crate::world::{Simulation, WorldSnapshot};

type FrameCallback = Closure<dyn FnMut(f64) -> Result<(), JsValue>>;
type BrowserLoop = RenderLoop<JsSimulation, Surface<CanvasRenderingContext2d>, HtmlCanvasElement, RafScheduler>;
type BrowserRunner =
    LoopRunner<JsSimulation, Surface<CanvasRenderingContext2d>, HtmlCanvasElement, RafScheduler, FrameCallback>;

/// Best-effort text for a thrown JS value.
fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    match js_sys::JSON::stringify(value) {
        Ok(json) => String::from(json),
        Err(_) => format!("{value:?}"),
    }
}

fn canvas_error(value: JsValue) -> RenderError {
    RenderError::Canvas(describe(&value))
}

impl From<RenderError> for JsValue {
    fn from(err: RenderError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

// =============================================================
// Host seams
// =============================================================

impl Context2d for CanvasRenderingContext2d {
    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), RenderError> {
        CanvasRenderingContext2d::arc(self, x, y, radius, start, end).map_err(canvas_error)
    }

    fn set_fill_style(&mut self, style: &str) {
        self.set_fill_style_str(style);
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::clear_rect(self, x, y, width, height);
    }

    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), RenderError> {
        CanvasRenderingContext2d::scale(self, sx, sy).map_err(canvas_error)
    }

    fn set_transform(
        &mut self,
        scale_x: f64,
        skew_y: f64,
        skew_x: f64,
        scale_y: f64,
        dx: f64,
        dy: f64,
    ) -> Result<(), RenderError> {
        CanvasRenderingContext2d::set_transform(self, scale_x, skew_y, skew_x, scale_y, dx, dy).map_err(canvas_error)
    }
}

impl CanvasElement for HtmlCanvasElement {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn set_buffer_size(&mut self, width: f64, height: f64) {
        self.set_width(width as u32);
        self.set_height(height as u32);
    }

    fn set_display_size(&mut self, width: f64, height: f64) -> Result<(), RenderError> {
        let style = self.style();
        style.set_property("width", &format!("{width}px")).map_err(canvas_error)?;
        style.set_property("height", &format!("{height}px")).map_err(canvas_error)
    }
}

/// The global `window`, read for size and pixel ratio.
pub struct BrowserWindow(Window);

impl HostWindow for BrowserWindow {
    fn inner_size(&self) -> (f64, f64) {
        let read = |v: Result<JsValue, JsValue>| v.map_or(0.0, |v| v.as_f64().unwrap_or(0.0));
        (read(self.0.inner_width()), read(self.0.inner_height()))
    }

    fn pixel_ratio(&self) -> Option<f64> {
        Some(self.0.device_pixel_ratio())
    }
}

/// [`FrameScheduler`] over `window.requestAnimationFrame`.
///
/// The frame callback lives in a slot filled by [`App::start`]; the
/// scheduler re-submits that same closure every frame.
pub struct RafScheduler {
    window: Window,
    callback: CallbackSlot<FrameCallback>,
    pending: Option<i32>,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<(), RenderError> {
        let callback = self.callback.try_borrow().map_err(|_| RenderError::Busy)?;
        let Some(cb) = callback.as_ref() else {
            return Err(RenderError::Schedule("frame callback not installed".to_owned()));
        };
        let id = self
            .window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map_err(|e| RenderError::Schedule(describe(&e)))?;
        self.pending = Some(id);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("cancel_animation_frame({id}) failed: {}", describe(&e));
            }
        }
    }
}

// =============================================================
// Simulation import
// =============================================================

#[wasm_bindgen]
extern "C" {
    /// The page's simulation object: anything with `step()`, `world()` and `train()`.
    pub type JsSimulation;

    #[wasm_bindgen(method, catch, js_name = step)]
    fn js_step(this: &JsSimulation) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = world)]
    fn js_world(this: &JsSimulation) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = train)]
    fn js_train(this: &JsSimulation) -> Result<JsValue, JsValue>;
}

impl Simulation for JsSimulation {
    fn step(&mut self) -> Result<(), RenderError> {
        self.js_step().map_err(|e| RenderError::Simulation(describe(&e)))
    }

    fn world(&self) -> Result<WorldSnapshot, RenderError> {
        let value = self.js_world().map_err(|e| RenderError::Simulation(describe(&e)))?;
        serde_wasm_bindgen::from_value(value).map_err(|e| RenderError::Snapshot(e.to_string()))
    }

    fn train(&mut self) -> Result<String, RenderError> {
        let value = self.js_train().map_err(|e| RenderError::Simulation(describe(&e)))?;
        Ok(describe(&value))
    }
}

// =============================================================
// App
// =============================================================

fn parse_options(options: JsValue) -> Result<RenderOptions, RenderError> {
    let options = if options.is_undefined() || options.is_null() {
        RenderOptions::default()
    } else {
        serde_wasm_bindgen::from_value::<RenderOptions>(options).map_err(|e| RenderError::Options(e.to_string()))?
    };
    options.validate()?;
    Ok(options)
}

fn init_logging(options: &RenderOptions) -> Result<(), RenderError> {
    console_error_panic_hook::set_once();
    let level = options.level()?;
    if let Err(err) = console_log::init_with_level(level) {
        // A logger from an earlier App is still installed; only adjust its level.
        log::debug!("console logger already installed: {err}");
    }
    log::set_max_level(level.to_level_filter());
    Ok(())
}

/// Frame callback body. An error is thrown back into the page as an
/// uncaught exception from the animation frame.
fn frame_callback(render_loop: Rc<RefCell<BrowserLoop>>) -> FrameCallback {
    Closure::wrap(Box::new(move |_ts: f64| {
        drive_frame(&render_loop)?;
        Ok(())
    }) as Box<dyn FnMut(f64) -> Result<(), JsValue>>)
}

/// A simulation rendered onto one canvas, redrawn every display frame.
///
/// Freeing the `App` from JavaScript stops the loop and releases its frame
/// callback.
#[wasm_bindgen]
pub struct App {
    window: BrowserWindow,
    runner: BrowserRunner,
}

#[wasm_bindgen]
impl App {
    /// Bind to `canvas`, size it to the window, and prepare the loop.
    ///
    /// `options` may be `undefined` or an object of camelCase render options.
    ///
    /// # Errors
    ///
    /// Fails when the canvas has no 2D context, the options are invalid, or
    /// the initial viewport cannot be applied.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, simulation: JsSimulation, options: JsValue) -> Result<App, JsValue> {
        Ok(Self::try_new(canvas, simulation, options)?)
    }

    /// Draw the first frame and keep drawing on every animation frame.
    ///
    /// # Errors
    ///
    /// Throws the first frame's error. Later frames throw from the animation
    /// frame callback.
    pub fn start(&self) -> Result<(), JsValue> {
        self.runner.start(frame_callback)?;
        Ok(())
    }

    /// Re-read the window size and pixel ratio and re-apply them in full.
    ///
    /// # Errors
    ///
    /// Fails if the canvas rejects the new size or transform, or when called
    /// from inside a frame.
    pub fn resize(&self) -> Result<(), JsValue> {
        self.runner.resize(&self.window)?;
        Ok(())
    }

    /// Run one training round and log its result.
    ///
    /// # Errors
    ///
    /// Fails if the simulation's `train()` throws, or when called from inside
    /// a frame.
    pub fn train(&self) -> Result<String, JsValue> {
        let report = self.runner.train()?;
        log::info!("{report}");
        Ok(report)
    }

    /// Stop redrawing and release the frame callback. The last frame stays
    /// on the canvas.
    ///
    /// # Errors
    ///
    /// Fails when called from inside a frame.
    pub fn stop(&self) -> Result<(), JsValue> {
        self.runner.stop()?;
        Ok(())
    }
}

impl App {
    fn try_new(canvas: HtmlCanvasElement, simulation: JsSimulation, options: JsValue) -> Result<Self, RenderError> {
        let options = parse_options(options)?;
        init_logging(&options)?;

        let window = web_sys::window().ok_or(RenderError::WindowUnavailable)?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| RenderError::ContextUnavailable)?
            .ok_or(RenderError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::ContextUnavailable)?;

        let host = BrowserWindow(window.clone());
        let viewport = compute_viewport(&host);
        let callback = CallbackSlot::<FrameCallback>::default();
        let scheduler = RafScheduler { window, callback: Rc::clone(&callback), pending: None };
        let surface = Surface::with_fills(ctx, &options.food_color, &options.animal_color);

        let render_loop = RenderLoop::new(simulation, surface, canvas, scheduler, viewport, &options)?;
        Ok(Self { window: host, runner: LoopRunner::new(render_loop, callback) })
    }
}
