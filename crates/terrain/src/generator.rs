//! # Ramp Generator
//!
//! Terrain is authored as a sequence of [`RampSegment`] commands consumed by
//! a [`Cursor`] that only moves right. A non-zero slope climbs or descends one
//! sample step per column; a zero slope holds the current height. After every
//! command the columns right of the cursor are levelled to the cursor value,
//! so the field never has an undefined tail.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::TerrainError;
use crate::heightfield::HeightfieldStore;

/// One authoring command. `run_length: None` derives the run from the
/// current height.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RampSegment {
    pub slope: f32,
    #[serde(default)]
    pub run_length: Option<usize>,
}

impl RampSegment {
    #[must_use]
    pub fn new(slope: f32) -> Self {
        Self { slope, run_length: None }
    }

    #[must_use]
    pub fn with_run(slope: f32, run_length: usize) -> Self {
        Self { slope, run_length: Some(run_length) }
    }
}

/// Next column to write and the height reached so far.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cursor {
    pub x: usize,
    pub value: f32,
}

/// How a course is laid out.
#[derive(Clone, Debug, PartialEq)]
pub enum SlopeSchedule {
    /// One ramp with a derived run length.
    Single(f32),
    /// One slope per `segment_length` columns, drawn uniformly from `choices`.
    Random { choices: Vec<f32>, segment_length: usize },
    /// Explicit commands, applied as given.
    Commands(Vec<RampSegment>),
}

impl SlopeSchedule {
    /// Expand into commands for a course of `course_length` columns.
    #[must_use]
    pub fn commands(&self, course_length: usize, rng: &mut fastrand::Rng) -> Vec<RampSegment> {
        match self {
            SlopeSchedule::Single(slope) => vec![RampSegment::new(*slope)],
            SlopeSchedule::Random { choices, segment_length } => {
                if choices.is_empty() || *segment_length == 0 {
                    return Vec::new();
                }
                (0..course_length / segment_length)
                    .map(|_| RampSegment::with_run(choices[rng.usize(..choices.len())], *segment_length))
                    .collect()
            }
            SlopeSchedule::Commands(commands) => commands.clone(),
        }
    }
}

/// Writes ramp commands into a store.
pub struct TerrainGenerator<'a> {
    store: &'a mut HeightfieldStore,
    cursor: Cursor,
}

impl<'a> TerrainGenerator<'a> {
    /// # Errors
    ///
    /// Returns [`TerrainError::ColumnOutOfRange`] when the cursor starts past
    /// the last column.
    pub fn new(store: &'a mut HeightfieldStore, start: Cursor) -> Result<Self, TerrainError> {
        let ncol = store.ncol();
        if start.x > ncol {
            return Err(TerrainError::ColumnOutOfRange { index: start.x, ncol });
        }
        let value = if start.value.is_nan() { 0.0 } else { start.value.clamp(0.0, 1.0) };
        Ok(Self { store, cursor: Cursor { x: start.x, value } })
    }

    /// Apply one command and level the tail.
    ///
    /// # Errors
    ///
    /// Only store bounds errors, which the cursor invariant rules out.
    pub fn apply(&mut self, segment: RampSegment) -> Result<(), TerrainError> {
        let ncol = self.store.ncol();
        let slope = segment.slope;

        if !slope.is_finite() {
            warn!(slope, "skipping non-finite slope");
        } else if slope == 0.0 {
            if let Some(run) = segment.run_length {
                let end = self.cursor.x.saturating_add(run).min(ncol);
                self.store.fill(self.cursor.x..end, self.cursor.value)?;
                self.cursor.x = end;
            }
        } else {
            // Derived runs are floored at one column so a ramp always moves.
            let run = segment
                .run_length
                .unwrap_or_else(|| (self.cursor.value / slope.abs()).floor() as usize)
                .max(1);
            for written in 0..run {
                if self.cursor.x == ncol {
                    warn!(slope, run, written, "ramp truncated at the end of the field");
                    break;
                }
                self.cursor.value = (self.cursor.value + slope).clamp(0.0, 1.0);
                self.store.write(self.cursor.x, self.cursor.value)?;
                self.cursor.x += 1;
            }
        }

        self.store.fill(self.cursor.x..ncol, self.cursor.value)
    }

    /// Apply `commands` in order and return the final cursor.
    ///
    /// # Errors
    ///
    /// See [`TerrainGenerator::apply`].
    pub fn run(mut self, commands: &[RampSegment]) -> Result<Cursor, TerrainError> {
        for segment in commands {
            self.apply(*segment)?;
        }
        debug!(
            commands = commands.len(),
            end_column = self.cursor.x,
            end_value = self.cursor.value,
            "terrain generated"
        );
        Ok(self.cursor)
    }
}

/// Apply `commands` to `store` starting from `start`.
///
/// # Errors
///
/// Returns [`TerrainError::ColumnOutOfRange`] when `start` lies past the
/// field.
pub fn generate(
    store: &mut HeightfieldStore,
    commands: &[RampSegment],
    start: Cursor,
) -> Result<Cursor, TerrainError> {
    TerrainGenerator::new(store, start)?.run(commands)
}
