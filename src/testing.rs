//! In-memory stand-ins for the host seams, shared by unit tests.
//!
//! [`RecordingContext`] tracks the current transform the way a canvas does
//! and records every operation in physical (buffer) pixels, so tests can
//! assert where a logical call actually lands.

use std::collections::VecDeque;

use crate::error::RenderError;
use crate::render_loop::FrameScheduler;
use crate::surface::Context2d;
use crate::viewport::{CanvasElement, HostWindow, Point};
use crate::world::{AnimalEntity, FoodEntity, Simulation, WorldSnapshot};

/// A recorded context operation, in physical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    Arc { center: Point, radius: f64, start: f64, end: f64 },
    FillStyle(String),
    Fill,
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
}

/// A filled shape reconstructed from the recorded path.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { center: Point, radius: f64, fill: String },
    Triangle { points: Vec<Point>, fill: String },
}

/// A [`Context2d`] that records operations under a scale/translate transform.
#[derive(Debug, Clone)]
pub struct RecordingContext {
    pub ops: Vec<Op>,
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self { ops: Vec::new(), sx: 1.0, sy: 1.0, tx: 0.0, ty: 0.0 }
    }
}

impl RecordingContext {
    pub fn map(&self, x: f64, y: f64) -> Point {
        Point::new(x * self.sx + self.tx, y * self.sy + self.ty)
    }

    /// Every fill, paired with the path that preceded it.
    pub fn shapes(&self) -> Vec<Shape> {
        let mut shapes = Vec::new();
        let mut path: Vec<&Op> = Vec::new();
        let mut fill = String::new();
        for op in &self.ops {
            match op {
                Op::BeginPath => path.clear(),
                Op::FillStyle(style) => fill.clone_from(style),
                Op::Fill => {
                    if let Some(Op::Arc { center, radius, .. }) = path.first() {
                        shapes.push(Shape::Circle { center: *center, radius: *radius, fill: fill.clone() });
                    } else {
                        let points = path
                            .iter()
                            .filter_map(|op| match op {
                                Op::MoveTo(p) | Op::LineTo(p) => Some(*p),
                                _ => None,
                            })
                            .collect();
                        shapes.push(Shape::Triangle { points, fill: fill.clone() });
                    }
                }
                Op::MoveTo(_) | Op::LineTo(_) | Op::Arc { .. } => path.push(op),
                Op::ClearRect { .. } => {}
            }
        }
        shapes
    }

    pub fn clears(&self) -> Vec<&Op> {
        self.ops.iter().filter(|op| matches!(op, Op::ClearRect { .. })).collect()
    }
}

impl Context2d for RecordingContext {
    fn begin_path(&mut self) {
        self.ops.push(Op::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let p = self.map(x, y);
        self.ops.push(Op::MoveTo(p));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = self.map(x, y);
        self.ops.push(Op::LineTo(p));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), RenderError> {
        if radius < 0.0 {
            return Err(RenderError::Canvas(format!("IndexSizeError: radius {radius} is negative")));
        }
        let center = self.map(x, y);
        self.ops.push(Op::Arc { center, radius: radius * self.sx, start, end });
        Ok(())
    }

    fn set_fill_style(&mut self, style: &str) {
        self.ops.push(Op::FillStyle(style.to_owned()));
    }

    fn fill(&mut self) {
        self.ops.push(Op::Fill);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let origin = self.map(x, y);
        self.ops.push(Op::ClearRect { x: origin.x, y: origin.y, width: width * self.sx, height: height * self.sy });
    }

    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), RenderError> {
        self.sx *= sx;
        self.sy *= sy;
        Ok(())
    }

    fn set_transform(
        &mut self,
        scale_x: f64,
        _skew_y: f64,
        _skew_x: f64,
        scale_y: f64,
        dx: f64,
        dy: f64,
    ) -> Result<(), RenderError> {
        self.sx = scale_x;
        self.sy = scale_y;
        self.tx = dx;
        self.ty = dy;
        Ok(())
    }
}

/// A canvas element that remembers its buffer and display sizes.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub buffer: (f64, f64),
    pub display: (f64, f64),
    pub applications: usize,
}

impl CanvasElement for FakeElement {
    fn set_buffer_size(&mut self, width: f64, height: f64) {
        self.buffer = (width, height);
        self.applications += 1;
    }

    fn set_display_size(&mut self, width: f64, height: f64) -> Result<(), RenderError> {
        self.display = (width, height);
        Ok(())
    }
}

/// A window with a fixed size and optional pixel ratio.
#[derive(Debug, Clone, Copy)]
pub struct FakeHost {
    pub width: f64,
    pub height: f64,
    pub ratio: Option<f64>,
}

impl FakeHost {
    pub fn new(width: f64, height: f64, ratio: Option<f64>) -> Self {
        Self { width, height, ratio }
    }
}

impl HostWindow for FakeHost {
    fn inner_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn pixel_ratio(&self) -> Option<f64> {
        self.ratio
    }
}

/// A simulation that replays queued snapshots, repeating the last one.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSimulation {
    pub queue: VecDeque<WorldSnapshot>,
    pub current: WorldSnapshot,
    pub steps: usize,
    pub trained: usize,
    pub fail_step_at: Option<usize>,
}

impl ScriptedSimulation {
    pub fn fixed(world: WorldSnapshot) -> Self {
        Self { current: world, ..Self::default() }
    }

    pub fn sequence(worlds: Vec<WorldSnapshot>) -> Self {
        Self { queue: worlds.into(), ..Self::default() }
    }
}

impl Simulation for ScriptedSimulation {
    fn step(&mut self) -> Result<(), RenderError> {
        if self.fail_step_at == Some(self.steps + 1) {
            return Err(RenderError::Simulation(format!("step {} failed", self.steps + 1)));
        }
        self.steps += 1;
        if let Some(next) = self.queue.pop_front() {
            self.current = next;
        }
        Ok(())
    }

    fn world(&self) -> Result<WorldSnapshot, RenderError> {
        Ok(self.current.clone())
    }

    fn train(&mut self) -> Result<String, RenderError> {
        self.trained += 1;
        Ok(format!("generation {}", self.trained))
    }
}

/// A scheduler that only counts requests.
#[derive(Debug, Clone, Default)]
pub struct CountingScheduler {
    pub requests: usize,
    pub cancels: usize,
    pub refuse: bool,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) -> Result<(), RenderError> {
        if self.refuse {
            return Err(RenderError::Schedule("refused".to_owned()));
        }
        self.requests += 1;
        Ok(())
    }

    fn cancel(&mut self) {
        self.cancels += 1;
    }
}

pub fn food(x: f64, y: f64) -> FoodEntity {
    FoodEntity { x, y }
}

pub fn animal(x: f64, y: f64, rotation: f64) -> AnimalEntity {
    AnimalEntity { x, y, rotation }
}

pub const EPSILON: f64 = 1e-9;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

pub fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}
