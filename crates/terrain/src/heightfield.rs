//! # Heightfield Store
//!
//! A row of `ncol` height samples stored twice, front row then back row, in
//! one flat buffer: index `ncol + i` always mirrors index `i`. Samples live in
//! `[0, 1]` and are scaled by `max_height` when queried.
//!
//! Column `i` sits at world `x = i * world_extent / ncol - origin_offset`.

use std::ops::Range;

use physics::{HeightfieldShape, PhysicsAdapter, PhysicsError};
use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Number of mirrored rows in the buffer.
pub const ROWS: usize = 2;

/// Fractional indices this close past the last column snap onto it, so
/// positions clamped to [`HeightfieldStore::valid_range`] always resolve.
const EDGE_TOLERANCE: f32 = 1e-3;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightfieldGeometry {
    pub ncol: usize,
    /// World length covered by the columns.
    pub world_extent: f32,
    /// World x of column 0 is `-origin_offset`.
    pub origin_offset: f32,
    pub max_height: f32,
    /// World z of a zero sample.
    pub elevation_offset: f32,
}

impl HeightfieldGeometry {
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidGeometry`] for an empty grid or unusable
    /// scales.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.ncol == 0 {
            return Err(TerrainError::InvalidGeometry("ncol must be at least 1"));
        }
        if !(self.world_extent.is_finite() && self.world_extent > 0.0) {
            return Err(TerrainError::InvalidGeometry("world extent must be positive and finite"));
        }
        if !(self.max_height.is_finite() && self.max_height > 0.0) {
            return Err(TerrainError::InvalidGeometry("max height must be positive and finite"));
        }
        if !self.origin_offset.is_finite() || !self.elevation_offset.is_finite() {
            return Err(TerrainError::InvalidGeometry("offsets must be finite"));
        }
        Ok(())
    }

    fn last_index(&self) -> f32 {
        (self.ncol - 1) as f32
    }
}

#[derive(Clone, Debug)]
pub struct HeightfieldStore {
    geometry: HeightfieldGeometry,
    data: Vec<f32>,
    dirty: bool,
}

fn sanitize(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl HeightfieldStore {
    /// A flat field of zero samples. A fresh store counts as dirty so the
    /// first [`HeightfieldStore::sync`] always uploads.
    ///
    /// # Errors
    ///
    /// Fails when `geometry` does not validate.
    pub fn new(geometry: HeightfieldGeometry) -> Result<Self, TerrainError> {
        geometry.validate()?;
        Ok(Self { geometry, data: vec![0.0; ROWS * geometry.ncol], dirty: true })
    }

    #[must_use]
    pub fn geometry(&self) -> &HeightfieldGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn ncol(&self) -> usize {
        self.geometry.ncol
    }

    /// Both rows, front row first.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        self.data.chunks_exact(self.geometry.ncol).nth(row)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set column `index` in both rows. Values are clamped to `[0, 1]`; NaN
    /// is stored as `0`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ColumnOutOfRange`] for `index >= ncol`.
    pub fn write(&mut self, index: usize, value: f32) -> Result<(), TerrainError> {
        let ncol = self.geometry.ncol;
        if index >= ncol {
            return Err(TerrainError::ColumnOutOfRange { index, ncol });
        }
        let value = sanitize(value);
        self.data[index] = value;
        self.data[ncol + index] = value;
        self.dirty = true;
        Ok(())
    }

    /// Overwrite the columns in `range` in both rows.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ColumnOutOfRange`] when the range ends past
    /// the last column.
    pub fn fill(&mut self, range: Range<usize>, value: f32) -> Result<(), TerrainError> {
        let ncol = self.geometry.ncol;
        if range.end > ncol {
            return Err(TerrainError::ColumnOutOfRange { index: range.end, ncol });
        }
        if range.is_empty() {
            return Ok(());
        }
        let value = sanitize(value);
        self.data[range.clone()].fill(value);
        self.data[ncol + range.start..ncol + range.end].fill(value);
        self.dirty = true;
        Ok(())
    }

    /// Continuous column index of world position `x`.
    #[must_use]
    pub fn fractional_index(&self, x: f32) -> f32 {
        let g = &self.geometry;
        (g.origin_offset + x) / g.world_extent * g.ncol as f32
    }

    /// World-x interval whose height queries stay on the field.
    #[must_use]
    pub fn valid_range(&self) -> (f32, f32) {
        let g = &self.geometry;
        let lo = -g.origin_offset;
        let hi = g.last_index() * g.world_extent / g.ncol as f32 - g.origin_offset;
        (lo, hi)
    }

    /// Scaled terrain height at `x`, linearly interpolated between the two
    /// neighbouring columns of the front row. Exact on integer indices.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::PositionOutOfRange`] when `x` falls outside
    /// [`HeightfieldStore::valid_range`].
    pub fn query_height(&self, x: f32) -> Result<f32, TerrainError> {
        let last = self.geometry.last_index();
        let mut index = self.fractional_index(x);
        if index > last && index <= last + EDGE_TOLERANCE {
            index = last;
        }
        if !(index >= 0.0 && index <= last) {
            return Err(TerrainError::PositionOutOfRange { x, index });
        }
        let lo = index.floor();
        let a = index - lo;
        let i = lo as usize;
        let j = index.ceil() as usize;
        Ok(((1.0 - a) * self.data[i] + a * self.data[j]) * self.geometry.max_height)
    }

    /// World z of the surface at `x`.
    ///
    /// # Errors
    ///
    /// Same as [`HeightfieldStore::query_height`].
    pub fn ground_elevation(&self, x: f32) -> Result<f32, TerrainError> {
        Ok(self.query_height(x)? + self.geometry.elevation_offset)
    }

    /// Snapshot handed to a physics engine.
    #[must_use]
    pub fn to_shape(&self) -> HeightfieldShape {
        let g = &self.geometry;
        HeightfieldShape {
            ncol: g.ncol,
            nrow: ROWS,
            world_extent: g.world_extent,
            origin_offset: g.origin_offset,
            max_height: g.max_height,
            elevation_offset: g.elevation_offset,
            data: self.data.clone(),
        }
    }

    /// Upload the field when it changed since the last sync. Returns whether
    /// an upload happened.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's upload error; the store stays dirty.
    pub fn sync<A: PhysicsAdapter + ?Sized>(&mut self, adapter: &mut A) -> Result<bool, PhysicsError> {
        if !self.dirty {
            return Ok(false);
        }
        adapter.upload_heightfield(&self.to_shape())?;
        self.dirty = false;
        tracing::debug!(ncol = self.geometry.ncol, "heightfield synced");
        Ok(true)
    }
}
