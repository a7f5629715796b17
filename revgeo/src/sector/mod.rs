//! Sector indexing on a Hilbert space-filling curve.
//!
//! The latitude/longitude plane is quantized into a `2^level × 2^level` grid
//! and each cell is numbered by its position along a Hilbert curve of the
//! same order. A single integer per place lets the database answer candidate
//! queries with `sector_id IN (...)` instead of 2D range scans.
//!
//! The mapping must stay bit-for-bit stable: it is baked into the
//! `sector_id` column when the place database is built.
//!
//! Everything here is pure; no I/O.
//!
//! # Example
//!
//! ```
//! use revgeo::coord::Coordinate;
//! use revgeo::sector::{neighbors_of, sector_for, Level};
//!
//! let level = Level::default();
//! let coord = Coordinate::new(39.0, -89.6).unwrap();
//! let sector = sector_for(&coord, level);
//! let neighbors = neighbors_of(sector, level).unwrap();
//! assert_eq!(neighbors.len(), 8);
//! assert!(!neighbors.contains(&sector));
//! ```

mod types;

pub use types::{Cell, Level, SectorError, SectorId, DEFAULT_LEVEL, MAX_LEVEL, MIN_LEVEL};

use crate::coord::{Coordinate, MIN_LAT, MIN_LON};

/// Quantize a coordinate into its grid cell.
///
/// Latitude 90 and longitude 180 saturate into the last row/column.
pub fn cell_for(coordinate: &Coordinate, level: Level) -> Cell {
    let n = level.map_dimension();
    let max = n - 1;
    let scale = n as f64;

    let row = ((coordinate.latitude() - MIN_LAT) / 180.0 * scale).floor() as u32;
    let col = ((coordinate.longitude() - MIN_LON) / 360.0 * scale).floor() as u32;

    Cell {
        row: row.min(max),
        col: col.min(max),
    }
}

/// Sector containing a coordinate at the given level.
#[inline]
pub fn sector_for(coordinate: &Coordinate, level: Level) -> SectorId {
    let cell = cell_for(coordinate, level);
    encode_cell(cell, level)
}

/// Validating variant of [`sector_for`] for raw degrees.
pub fn sector_for_lat_lon(
    latitude: f64,
    longitude: f64,
    level: Level,
) -> Result<SectorId, SectorError> {
    let coordinate = Coordinate::new(latitude, longitude)?;
    Ok(sector_for(&coordinate, level))
}

/// Hilbert index of a cell.
pub fn encode(cell: Cell, level: Level) -> Result<SectorId, SectorError> {
    let n = level.map_dimension();
    if cell.row >= n || cell.col >= n {
        return Err(SectorError::CellOutOfRange {
            row: cell.row,
            col: cell.col,
            dimension: n,
        });
    }
    Ok(encode_cell(cell, level))
}

/// Cell addressed by a Hilbert index.
pub fn decode(sector: SectorId, level: Level) -> Result<Cell, SectorError> {
    if u64::from(sector.value()) >= level.sector_count() {
        return Err(SectorError::SectorOutOfRange { sector, level });
    }

    let n = u64::from(level.map_dimension());
    let mut t = u64::from(sector.value());
    let mut x = 0u64;
    let mut y = 0u64;
    let mut s = 1u64;
    while s < n {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        rotate(s, &mut x, &mut y, rx, ry);
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }

    Ok(Cell {
        row: y as u32,
        col: x as u32,
    })
}

/// Sectors sharing an edge or a corner with `sector`.
///
/// Up to eight ids, never including `sector` itself. Cells on the grid edge
/// get fewer neighbours: there is no wraparound across the antimeridian or
/// the poles.
pub fn neighbors_of(sector: SectorId, level: Level) -> Result<Vec<SectorId>, SectorError> {
    let center = decode(sector, level)?;
    let max = i64::from(level.map_dimension()) - 1;

    let mut neighbors = Vec::with_capacity(8);
    for d_row in -1i64..=1 {
        for d_col in -1i64..=1 {
            if d_row == 0 && d_col == 0 {
                continue;
            }
            let row = i64::from(center.row) + d_row;
            let col = i64::from(center.col) + d_col;
            if !(0..=max).contains(&row) || !(0..=max).contains(&col) {
                continue;
            }
            neighbors.push(encode_cell(
                Cell {
                    row: row as u32,
                    col: col as u32,
                },
                level,
            ));
        }
    }

    Ok(neighbors)
}

/// The sector followed by its neighbours: every sector a lookup must scan.
pub fn neighborhood(sector: SectorId, level: Level) -> Result<Vec<SectorId>, SectorError> {
    let mut sectors = Vec::with_capacity(9);
    sectors.push(sector);
    sectors.extend(neighbors_of(sector, level)?);
    Ok(sectors)
}

fn encode_cell(cell: Cell, level: Level) -> SectorId {
    let n = u64::from(level.map_dimension());
    let mut x = u64::from(cell.col);
    let mut y = u64::from(cell.row);
    let mut d = 0u64;
    let mut s = n / 2;
    while s > 0 {
        let rx = u64::from((x & s) > 0);
        let ry = u64::from((y & s) > 0);
        d += s * s * ((3 * rx) ^ ry);
        rotate(n, &mut x, &mut y, rx, ry);
        s /= 2;
    }
    // d < 4^16 == 2^32
    SectorId::new(d as u32)
}

/// Rotate/flip a quadrant so the sub-curve has the canonical orientation.
#[inline]
fn rotate(n: u64, x: &mut u64, y: &mut u64, rx: u64, ry: u64) {
    if ry == 0 {
        if rx == 1 {
            *x = n - 1 - *x;
            *y = n - 1 - *y;
        }
        std::mem::swap(x, y);
    }
}
