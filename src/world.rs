//! World snapshot types and the simulation contract the render loop consumes.
//!
//! The simulation itself lives outside this crate. Each frame the loop calls
//! [`Simulation::step`] once and then reads a fresh [`WorldSnapshot`]; a
//! snapshot never outlives the frame that produced it.

#[cfg(test)]
#[path = "world_test.rs"]
mod world_test;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// A food pellet. Coordinates are normalized to `[0,1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodEntity {
    pub x: f64,
    pub y: f64,
}

/// An animal. Coordinates are normalized to `[0,1]`.
///
/// `rotation` is the heading in radians: 0 points along +x and angles grow
/// counter-clockwise in the math convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimalEntity {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

/// Read-only view of the simulation for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default)]
    pub foods: Vec<FoodEntity>,
    #[serde(default)]
    pub animals: Vec<AnimalEntity>,
}

impl WorldSnapshot {
    /// True when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty() && self.animals.is_empty()
    }
}

/// The external simulation, seen from the render loop.
pub trait Simulation {
    /// Advance the simulation by exactly one tick.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Simulation`] if the collaborator raised.
    fn step(&mut self) -> Result<(), RenderError>;

    /// Take a snapshot of the current world.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Simulation`] if the collaborator raised, or
    /// [`RenderError::Snapshot`] if its answer is not a valid snapshot.
    fn world(&self) -> Result<WorldSnapshot, RenderError>;

    /// Run one training round. The result is opaque and only displayed.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Simulation`] if the collaborator raised.
    fn train(&mut self) -> Result<String, RenderError>;
}
