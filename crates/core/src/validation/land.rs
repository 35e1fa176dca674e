//! Registered-versus-surveyed land area mismatch.

use serde::Serialize;

use crate::coercion::{coerce_column, exceeds};
use crate::error::ConfigurationError;
use crate::report::{numeric_cell, Tabular};
use crate::table::{text, Table};

pub const COL_FARMER_ID: &str = "farmer_id";
pub const COL_LAND_AREA: &str = "land_area";
pub const COL_REGISTERED_AREA: &str = "registered_area";

/// A record whose registered area is larger than the surveyed area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandMismatch {
    /// Index of the source row in the input table.
    #[serde(skip)]
    pub row: usize,
    pub farmer_id: String,
    pub land_area: f64,
    pub registered_area: f64,
}

impl Tabular for LandMismatch {
    const COLUMNS: &'static [&'static str] = &[COL_FARMER_ID, COL_LAND_AREA, COL_REGISTERED_AREA];

    fn cells(&self) -> Vec<String> {
        vec![
            self.farmer_id.clone(),
            numeric_cell(Some(self.land_area)),
            numeric_cell(Some(self.registered_area)),
        ]
    }
}

/// Flag records where `registered_area > land_area`.
///
/// Both areas are coerced first; a record with either area undefined is
/// never flagged. Findings keep the input row order.
pub fn validate_land_mismatch(table: &Table) -> Result<Vec<LandMismatch>, ConfigurationError> {
    table.require_columns(&[COL_FARMER_ID, COL_LAND_AREA, COL_REGISTERED_AREA])?;

    let land_area = coerce_column(table, COL_LAND_AREA);
    let registered_area = coerce_column(table, COL_REGISTERED_AREA);

    let findings: Vec<LandMismatch> = table
        .rows
        .iter()
        .zip(land_area.into_iter().zip(registered_area))
        .enumerate()
        .filter_map(|(row, (record, (land, registered)))| match (land, registered) {
            (Some(land_area), Some(registered_area)) if exceeds(registered, land) => Some(LandMismatch {
                row,
                farmer_id: text(record.get(COL_FARMER_ID)).unwrap_or_default(),
                land_area,
                registered_area,
            }),
            _ => None,
        })
        .collect();

    tracing::debug!(
        table = %table.name,
        rows = table.len(),
        flagged = findings.len(),
        "Land mismatch rule evaluated",
    );

    Ok(findings)
}
