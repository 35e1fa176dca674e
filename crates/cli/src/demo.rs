//! Fixed worked examples for each rule, printed as a narrative.
//!
//! The tables here are synthetic; they exist to show what each rule flags
//! and why.

use std::io::Write;

use serde::Serialize;
use serde_json::json;

use claimcheck_core::coercion::{coerce_column, product};
use claimcheck_core::report::{numeric_cell, to_markdown};
use claimcheck_core::table::text;
use claimcheck_core::validation::transport::{
    COL_CLAIMED_AMOUNT, COL_DISTANCE_KM, COL_FARMER_ID, COL_WEIGHT_TON,
};
use claimcheck_core::validation::{
    tracked_costs, transport_rate, validate_crop_rules, validate_land_mismatch, validate_transport_claims,
    CropRuleFindings, LandMismatch, TransportFraud,
};
use claimcheck_core::{ConfigurationError, Table};

use crate::config::{DemoConfig, OutputFormat};

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize findings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Input tables for all three worked examples.
pub struct DemoTables {
    pub land: Table,
    pub transport_claims: Table,
    pub rates: Table,
    pub tracking: Table,
    pub crop_claims: Table,
    pub crop_rules: Table,
}

impl DemoTables {
    pub fn build(transport_rate: f64) -> Result<Self, ConfigurationError> {
        Ok(Self {
            land: Table::from_columns(
                "land_records",
                vec![
                    ("farmer_id", vec![json!("F001"), json!("F002"), json!("F003")]),
                    ("land_area", vec![json!(4.0), json!("6.5"), json!("unsurveyed")]),
                    ("registered_area", vec![json!(5.5), json!(6.0), json!(9.0)]),
                ],
            )?,
            transport_claims: Table::from_columns(
                "transport_claims",
                vec![
                    ("farmer_id", vec![json!("F001"), json!("F002"), json!("F003"), json!("F004")]),
                    ("distance_km", vec![json!(100), json!(50), json!(200), json!(150)]),
                    ("weight_ton", vec![json!(5), json!(10), json!(3), json!(4)]),
                    ("claimed_amount", vec![json!(5500), json!(5000), json!(6500), json!(4500)]),
                ],
            )?,
            rates: Table::from_columns(
                "transport_rates",
                vec![("rate_per_km_per_ton", vec![json!(transport_rate)])],
            )?,
            tracking: Table::from_columns(
                "gps_tracking",
                vec![
                    ("farmer_id", vec![json!("F001"), json!("F002"), json!("F003")]),
                    ("tracked_cost", vec![json!(5000), json!(5500), json!(5500)]),
                ],
            )?,
            crop_claims: Table::from_columns(
                "crop_claims",
                vec![
                    (
                        "farmer_id",
                        vec![json!("F001"), json!("F001"), json!("F001"), json!("F002"), json!("F003")],
                    ),
                    (
                        "season",
                        vec![json!("Kharif"), json!("Kharif"), json!("Kharif"), json!("Kharif"), json!("Rabi")],
                    ),
                    (
                        "crop",
                        vec![json!("Rice"), json!("Maize"), json!("Cotton"), json!("Wheat"), json!("Saffron")],
                    ),
                ],
            )?,
            crop_rules: Table::from_columns(
                "crop_rules",
                vec![
                    ("crop", vec![json!("Rice"), json!("Wheat"), json!("Maize"), json!("Cotton")]),
                    (
                        "allowed_season",
                        vec![json!("Kharif"), json!("Rabi"), json!("Kharif"), json!("Kharif")],
                    ),
                ],
            )?,
        })
    }
}

/// Findings from all three worked examples.
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub land_mismatch: Vec<LandMismatch>,
    pub transport_fraud: Vec<TransportFraud>,
    pub crop_rules: CropRuleFindings,
}

/// Evaluate every rule over the demo tables.
pub fn evaluate(tables: &DemoTables) -> Result<DemoReport, ConfigurationError> {
    Ok(DemoReport {
        land_mismatch: validate_land_mismatch(&tables.land)?,
        transport_fraud: validate_transport_claims(&tables.transport_claims, &tables.rates, &tables.tracking)?,
        crop_rules: validate_crop_rules(&tables.crop_claims, &tables.crop_rules)?,
    })
}

/// Build the demo tables, evaluate them and write the result to `out`.
pub fn run(config: &DemoConfig, out: &mut impl Write) -> Result<DemoReport, DemoError> {
    let tables = DemoTables::build(config.transport_rate)?;
    let report = evaluate(&tables)?;

    tracing::info!(
        land = report.land_mismatch.len(),
        transport = report.transport_fraud.len(),
        over_cap = report.crop_rules.more_than_2_crops.len(),
        off_season = report.crop_rules.not_allowed_crops.len(),
        "Demo rules evaluated",
    );

    match config.output {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Markdown => write_markdown(&tables, &report, out)?,
    }

    Ok(report)
}

fn write_markdown(tables: &DemoTables, report: &DemoReport, out: &mut impl Write) -> Result<(), DemoError> {
    writeln!(out, "--- Running Transport Claims Validation Example (with Tracking Data) ---")?;
    writeln!(out)?;
    writeln!(out, "Calculations:")?;
    for line in transport_narrative(tables, &report.transport_fraud)? {
        writeln!(out, "{line}")?;
    }

    writeln!(out)?;
    writeln!(out, "--- Identified Transport Fraud ---")?;
    write!(out, "{}", to_markdown(&report.transport_fraud))?;

    writeln!(out)?;
    writeln!(out, "--- Land Area Mismatch ---")?;
    write!(out, "{}", to_markdown(&report.land_mismatch))?;

    writeln!(out)?;
    writeln!(out, "--- More Than 2 Crops Per Season ---")?;
    write!(out, "{}", to_markdown(&report.crop_rules.more_than_2_crops))?;

    writeln!(out)?;
    writeln!(out, "--- Crops Outside Allowed Season ---")?;
    write!(out, "{}", to_markdown(&report.crop_rules.not_allowed_crops))?;

    Ok(())
}

/// One line per transport claim explaining how its verdict was reached.
pub fn transport_narrative(
    tables: &DemoTables,
    flagged: &[TransportFraud],
) -> Result<Vec<String>, ConfigurationError> {
    let rate = transport_rate(&tables.rates)?;
    let distance = coerce_column(&tables.transport_claims, COL_DISTANCE_KM);
    let weight = coerce_column(&tables.transport_claims, COL_WEIGHT_TON);
    let claimed = coerce_column(&tables.transport_claims, COL_CLAIMED_AMOUNT);
    let tracked_by_farmer = tracked_costs(&tables.tracking)?;

    let lines = tables
        .transport_claims
        .rows
        .iter()
        .enumerate()
        .map(|(row, record)| {
            let farmer_id = text(record.get(COL_FARMER_ID)).unwrap_or_default();
            let tracked = tracked_by_farmer.get(&farmer_id).copied().flatten();
            let expected = product(&[distance[row], weight[row], Some(rate)]);
            let verdict = match flagged.iter().find(|f| f.row == row) {
                Some(fraud) => format!("FRAUD ({})", fraud.reason()),
                None => "OK".to_string(),
            };

            format!(
                "{farmer_id} Expected: {} * {} * {} = {}. Claimed: {}. Tracked: {}. -> {verdict}",
                numeric_cell(distance[row]),
                numeric_cell(weight[row]),
                numeric_cell(Some(rate)),
                numeric_cell(expected),
                numeric_cell(claimed[row]),
                numeric_cell(tracked),
            )
        })
        .collect();

    Ok(lines)
}
