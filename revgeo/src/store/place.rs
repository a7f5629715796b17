//! Place rows.

use std::fmt;

use rusqlite::Row;

use crate::sector::SectorId;

/// A named place as stored in the `places` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Row id; stable sort key for tie-breaking
    pub id: i64,
    /// Place name (e.g., "Springfield")
    pub name: String,
    /// Country name or code (e.g., "USA")
    pub country: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Sector assigned at build time
    pub sector_id: SectorId,
}

impl Place {
    /// Map a row selected with `PLACE_COLUMNS`.
    pub(super) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let raw_sector: i64 = row.get(5)?;
        let sector = u32::try_from(raw_sector)
            .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(5, raw_sector))?;

        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            country: row.get(2)?,
            latitude: row.get(3)?,
            longitude: row.get(4)?,
            sector_id: SectorId::new(sector),
        })
    }
}

impl fmt::Display for Place {
    /// `"Name, Country"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}
