use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TerrainError;
use crate::generator::{generate, Cursor, RampSegment, SlopeSchedule};
use crate::heightfield::{HeightfieldGeometry, HeightfieldStore};

/// World distance from the spawn point (x = 0) to the start of the course.
const SPAWN_CLEARANCE: f32 = 1.0;

/// Layout of a generated ramp course. Unset fields keep the hopper course
/// defaults; `elevation_offset` and `start_column` are derived from the
/// geometry when left out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub ncol: usize,
    pub world_extent: f32,
    pub origin_offset: f32,
    pub max_height: f32,
    pub elevation_offset: Option<f32>,
    /// Sample value of the starting plateau.
    pub initial_value: f32,
    pub start_column: Option<usize>,
    /// Columns per ramp when several slopes are mixed.
    pub segment_length: usize,
    pub slopes: Vec<f32>,
    /// Hand-authored course. When non-empty it replaces `slopes`.
    pub commands: Vec<RampSegment>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            ncol: 1000,
            world_extent: 400.0,
            origin_offset: 80.0,
            max_height: 2.0,
            elevation_offset: None,
            initial_value: 0.5,
            start_column: None,
            segment_length: 15,
            slopes: vec![0.0],
            commands: Vec::new(),
        }
    }
}

impl TerrainConfig {
    /// World z of a zero sample. Defaults to half the height range below
    /// zero, so a mid-height plateau sits at z = 0.
    #[must_use]
    pub fn elevation_offset(&self) -> f32 {
        self.elevation_offset.unwrap_or(-self.max_height / 2.0)
    }

    /// First generated column. Defaults to the last column at or before
    /// world x = 1, wherever the field origin sits.
    #[must_use]
    pub fn start_column(&self) -> usize {
        self.start_column.unwrap_or_else(|| {
            let field_x = (self.origin_offset + SPAWN_CLEARANCE).max(0.0);
            (field_x * self.ncol as f32 / self.world_extent).floor() as usize
        })
    }

    #[must_use]
    pub fn geometry(&self) -> HeightfieldGeometry {
        HeightfieldGeometry {
            ncol: self.ncol,
            world_extent: self.world_extent,
            origin_offset: self.origin_offset,
            max_height: self.max_height,
            elevation_offset: self.elevation_offset(),
        }
    }

    #[must_use]
    pub fn schedule(&self) -> SlopeSchedule {
        if !self.commands.is_empty() {
            return SlopeSchedule::Commands(self.commands.clone());
        }
        match self.slopes.as_slice() {
            [slope] => SlopeSchedule::Single(*slope),
            choices => SlopeSchedule::Random { choices: choices.to_vec(), segment_length: self.segment_length },
        }
    }

    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidGeometry`] or
    /// [`TerrainError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<(), TerrainError> {
        self.geometry().validate()?;
        let invalid = |msg: String| Err(TerrainError::InvalidConfig(msg));
        if self.slopes.is_empty() && self.commands.is_empty() {
            return invalid("at least one slope is required".into());
        }
        let command_slopes = self.commands.iter().map(|c| &c.slope);
        if let Some(slope) = self.slopes.iter().chain(command_slopes).find(|s| !s.is_finite()) {
            return invalid(format!("slope {slope} is not finite"));
        }
        if self.segment_length == 0 {
            return invalid("segment_length must be at least 1".into());
        }
        if !self.initial_value.is_finite() {
            return invalid("initial_value must be finite".into());
        }
        let start = self.start_column();
        if start >= self.ncol {
            return invalid(format!("course starts at column {start} of {}, leaving no course", self.ncol));
        }
        Ok(())
    }

    /// Build a finished course: a plateau at `initial_value` followed by the
    /// slope schedule from `start_column` on.
    ///
    /// # Errors
    ///
    /// Fails when the config does not validate.
    pub fn build(&self, rng: &mut fastrand::Rng) -> Result<HeightfieldStore, TerrainError> {
        self.validate()?;
        let mut store = HeightfieldStore::new(self.geometry())?;
        store.fill(0..self.ncol, self.initial_value)?;

        let start = Cursor { x: self.start_column(), value: store.samples()[0] };
        let commands = self.schedule().commands(self.ncol - start.x, rng);
        let end = generate(&mut store, &commands, start)?;
        debug!(slopes = ?self.slopes, start = start.x, end = end.x, "built terrain course");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hopper_course() {
        let config = TerrainConfig::default();
        assert_eq!(config.start_column(), 202);
        assert_eq!(config.elevation_offset(), -1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn course_start_follows_the_field_origin() {
        let config = TerrainConfig { origin_offset: 20.0, ..TerrainConfig::default() };
        assert_eq!(config.start_column(), 52);
        let column = config.world_extent / config.ncol as f32;
        let start_x = config.start_column() as f32 * column - config.origin_offset;
        assert!(start_x <= 1.0 && 1.0 - start_x < column, "course starts at x = {start_x}");
    }

    #[test]
    fn flat_course_is_a_plateau_at_zero_elevation() {
        let store = TerrainConfig::default().build(&mut fastrand::Rng::with_seed(1)).unwrap();
        assert!(store.samples().iter().all(|&v| v == 0.5));
        assert!(store.ground_elevation(0.0).unwrap().abs() < 1e-6);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: TerrainConfig = serde_json::from_str(r#"{ "slopes": [-0.01, 0.01] }"#).unwrap();
        assert_eq!(config.ncol, 1000);
        assert_eq!(config.slopes, vec![-0.01, 0.01]);
        assert!(matches!(config.schedule(), SlopeSchedule::Random { segment_length: 15, .. }));
    }

    #[test]
    fn explicit_commands_replace_slopes() {
        let json = r#"{ "commands": [ { "slope": 0.0, "run_length": 20 }, { "slope": 0.05, "run_length": 4 } ] }"#;
        let config: TerrainConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(config.schedule(), SlopeSchedule::Commands(ref c) if c.len() == 2));

        let store = config.build(&mut fastrand::Rng::with_seed(1)).unwrap();
        let row = store.row(0).unwrap();
        assert!(row[..222].iter().all(|&v| v == 0.5));
        assert!((row[225] - 0.7).abs() < 1e-5);
        assert!(row[226..].iter().all(|&v| (v - 0.7).abs() < 1e-5));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let empty = TerrainConfig { slopes: vec![], ..TerrainConfig::default() };
        assert!(matches!(empty.validate(), Err(TerrainError::InvalidConfig(_))));
        let nan = TerrainConfig { slopes: vec![f32::NAN], ..TerrainConfig::default() };
        assert!(nan.validate().is_err());
        let nan_command = TerrainConfig { commands: vec![RampSegment::new(f32::INFINITY)], ..TerrainConfig::default() };
        assert!(nan_command.validate().is_err());
        let no_segments = TerrainConfig { segment_length: 0, ..TerrainConfig::default() };
        assert!(no_segments.validate().is_err());
        let no_course = TerrainConfig { start_column: Some(1000), ..TerrainConfig::default() };
        assert!(no_course.validate().is_err());
    }
}
