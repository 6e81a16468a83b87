//! Host configuration parsed from environment variables.

use std::path::PathBuf;

use canvas::consts::DEFAULT_CANVAS_CM;
use canvas::doc::{CanvasSize, DocError};

pub const WIDTH_VAR: &str = "TRAJECTORY_CANVAS_WIDTH_CM";
pub const HEIGHT_VAR: &str = "TRAJECTORY_CANVAS_HEIGHT_CM";
pub const OUTPUT_DIR_VAR: &str = "TRAJECTORY_OUTPUT_DIR";
pub const DEFAULT_OUTPUT_DIR: &str = ".";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a number: '{value}'")]
    NotANumber { var: &'static str, value: String },
    #[error(transparent)]
    Canvas(#[from] DocError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub canvas: CanvasSize,
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `TRAJECTORY_CANVAS_WIDTH_CM`: default 100
    /// - `TRAJECTORY_CANVAS_HEIGHT_CM`: default 100
    /// - `TRAJECTORY_OUTPUT_DIR`: default `.`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let width = parse_cm(WIDTH_VAR, lookup(WIDTH_VAR).as_deref())?;
        let height = parse_cm(HEIGHT_VAR, lookup(HEIGHT_VAR).as_deref())?;
        let output_dir = lookup(OUTPUT_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        Ok(Self { canvas: CanvasSize::new(width, height)?, output_dir: PathBuf::from(output_dir) })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(
        self,
        width: Option<f64>,
        height: Option<f64>,
        output_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let canvas = CanvasSize::new(width.unwrap_or(self.canvas.width()), height.unwrap_or(self.canvas.height()))?;
        Ok(Self { canvas, output_dir: output_dir.unwrap_or(self.output_dir) })
    }
}

fn parse_cm(var: &'static str, raw: Option<&str>) -> Result<f64, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_CANVAS_CM),
        Some(value) => value
            .parse::<f64>()
            .map_err(|_| ConfigError::NotANumber { var, value: value.to_string() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
