//! Sector type definitions

use std::fmt;

use crate::coord::CoordError;

/// Recursion level bounds. `SectorId` is a `u32`, so 16 is the deepest grid
/// whose index space (`4^16`) still fits.
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 16;

/// Recursion level the bundled databases are built with.
pub const DEFAULT_LEVEL: u8 = 10;

/// Depth of the grid subdivision; the grid is `2^level × 2^level` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    /// Create a level, rejecting values outside `1..=16`.
    pub fn new(level: u8) -> Result<Self, SectorError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(SectorError::InvalidLevel(level));
        }
        Ok(Self(level))
    }

    /// Raw recursion depth.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of rows (and columns) of the grid: `2^level`.
    #[inline]
    pub fn map_dimension(self) -> u32 {
        1u32 << self.0
    }

    /// Number of sectors in the grid: `4^level`.
    #[inline]
    pub fn sector_count(self) -> u64 {
        let dim = self.map_dimension() as u64;
        dim * dim
    }
}

impl Default for Level {
    fn default() -> Self {
        Self(DEFAULT_LEVEL)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a sector along the Hilbert curve at a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectorId(u32);

impl SectorId {
    /// Wrap a raw curve index. No range check; see [`super::decode`].
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw curve index, as stored in the `sector_id` column.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<SectorId> for i64 {
    fn from(sector: SectorId) -> Self {
        sector.0 as i64
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grid cell coordinates.
///
/// Row 0 is the southern edge (latitude -90), column 0 the western edge
/// (longitude -180).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// South-north index
    pub row: u32,
    /// West-east index
    pub col: u32,
}

/// Errors from sector computations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SectorError {
    #[error("Invalid recursion level: {0} (must be between {} and {})", MIN_LEVEL, MAX_LEVEL)]
    InvalidLevel(u8),

    #[error("{0}")]
    InvalidCoordinate(#[from] CoordError),

    #[error("Sector {sector} does not exist at level {level}")]
    SectorOutOfRange { sector: SectorId, level: Level },

    #[error("Cell ({row}, {col}) is outside the {dimension}x{dimension} grid")]
    CellOutOfRange { row: u32, col: u32, dimension: u32 },
}
