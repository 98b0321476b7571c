//! Render options supplied by the host page.
//!
//! Every field is optional on the wire; missing fields fall back to the
//! defaults in [`crate::consts`]. Field names are camelCase so the page can
//! pass a plain JS object literal.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{ANIMAL_COLOR, ANIMAL_SIZE_RATIO, FOOD_COLOR, FOOD_RADIUS_RATIO};
use crate::error::RenderError;

/// Tunables for how entities are depicted and how loudly the crate logs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Food radius as a fraction of viewport width.
    pub food_radius_ratio: f64,
    /// Animal size as a fraction of viewport width.
    pub animal_size_ratio: f64,
    /// Canvas fill style for food.
    pub food_color: String,
    /// Canvas fill style for animals.
    pub animal_color: String,
    /// Console log level: `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            food_radius_ratio: FOOD_RADIUS_RATIO,
            animal_size_ratio: ANIMAL_SIZE_RATIO,
            food_color: FOOD_COLOR.to_owned(),
            animal_color: ANIMAL_COLOR.to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl RenderOptions {
    /// Check that size ratios are usable and the log level is recognised.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Options`] for non-finite or negative ratios and
    /// unknown log levels.
    pub fn validate(&self) -> Result<(), RenderError> {
        for (name, value) in [
            ("foodRadiusRatio", self.food_radius_ratio),
            ("animalSizeRatio", self.animal_size_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RenderError::Options(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        self.level()?;
        Ok(())
    }

    /// Parse `log_level` into a [`log::Level`].
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Options`] when the level name is unknown.
    pub fn level(&self) -> Result<log::Level, RenderError> {
        self.log_level
            .parse::<log::Level>()
            .map_err(|_| RenderError::Options(format!("unknown log level {:?}", self.log_level)))
    }
}
