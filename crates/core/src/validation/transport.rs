//! Transport subsidy claims checked against the published rate and tracked cost.

use std::collections::HashMap;

use serde::Serialize;

use crate::coercion::{coerce_column, exceeds, product, to_numeric, Numeric};
use crate::error::ConfigurationError;
use crate::report::{numeric_cell, Tabular};
use crate::table::{text, Table};

pub const COL_FARMER_ID: &str = "farmer_id";
pub const COL_DISTANCE_KM: &str = "distance_km";
pub const COL_WEIGHT_TON: &str = "weight_ton";
pub const COL_CLAIMED_AMOUNT: &str = "claimed_amount";
pub const COL_EXPECTED_COST: &str = "expected_cost";
pub const COL_VERIFIED_TRACKED_COST: &str = "verified_tracked_cost";
pub const COL_RATE_PER_KM_PER_TON: &str = "rate_per_km_per_ton";
pub const COL_TRACKED_COST: &str = "tracked_cost";

/// A transport claim above at least one of its reference costs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportFraud {
    /// Index of the source row in the claims table.
    #[serde(skip)]
    pub row: usize,
    pub farmer_id: String,
    pub distance_km: Numeric,
    pub weight_ton: Numeric,
    pub claimed_amount: f64,
    pub expected_cost: Numeric,
    pub verified_tracked_cost: Numeric,
}

impl Tabular for TransportFraud {
    const COLUMNS: &'static [&'static str] = &[
        COL_FARMER_ID,
        COL_DISTANCE_KM,
        COL_WEIGHT_TON,
        COL_CLAIMED_AMOUNT,
        COL_EXPECTED_COST,
        COL_VERIFIED_TRACKED_COST,
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.farmer_id.clone(),
            numeric_cell(self.distance_km),
            numeric_cell(self.weight_ton),
            numeric_cell(Some(self.claimed_amount)),
            numeric_cell(self.expected_cost),
            numeric_cell(self.verified_tracked_cost),
        ]
    }
}

impl TransportFraud {
    /// The comparisons that tripped the flag, such as `6500 > 6000 AND 6500 > 5500`.
    ///
    /// A reference equal to one already listed is not repeated.
    pub fn reason(&self) -> String {
        let claimed = Some(self.claimed_amount);
        let mut exceeded: Vec<f64> = Vec::new();
        for reference in [self.expected_cost, self.verified_tracked_cost].into_iter().flatten() {
            if exceeds(claimed, Some(reference)) && !exceeded.contains(&reference) {
                exceeded.push(reference);
            }
        }
        exceeded
            .iter()
            .map(|r| format!("{} > {}", numeric_cell(claimed), numeric_cell(Some(*r))))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

/// Rate per km per ton, read from the first row of the rate table.
///
/// Later rows are ignored. A differing later rate is logged, not averaged.
pub fn transport_rate(rates: &Table) -> Result<f64, ConfigurationError> {
    rates.require_columns(&[COL_RATE_PER_KM_PER_TON])?;

    let first = rates.rows.first().ok_or_else(|| ConfigurationError::EmptyTable {
        table: rates.name.clone(),
    })?;
    let raw = first.get(COL_RATE_PER_KM_PER_TON);
    let rate = to_numeric(raw).ok_or_else(|| ConfigurationError::NonNumericReference {
        table: rates.name.clone(),
        column: COL_RATE_PER_KM_PER_TON.to_string(),
        value: raw.map_or_else(|| "null".to_string(), |v| v.to_string()),
    })?;

    let ignored = coerce_column(rates, COL_RATE_PER_KM_PER_TON)
        .into_iter()
        .skip(1)
        .filter(|other| *other != Some(rate))
        .count();
    if ignored > 0 {
        tracing::warn!(
            table = %rates.name,
            rate,
            ignored,
            "Rate table has differing rows after the first; only the first is used",
        );
    }

    Ok(rate)
}

/// Tracked cost per farmer, keyed by farmer id. The first record for a
/// farmer wins; later duplicates are logged and ignored.
pub fn tracked_costs(tracking: &Table) -> Result<HashMap<String, Numeric>, ConfigurationError> {
    tracking.require_columns(&[COL_FARMER_ID, COL_TRACKED_COST])?;

    let mut costs = HashMap::with_capacity(tracking.len());
    for record in &tracking.rows {
        let Some(farmer_id) = text(record.get(COL_FARMER_ID)) else {
            continue;
        };
        if costs.contains_key(&farmer_id) {
            tracing::warn!(
                table = %tracking.name,
                farmer_id = %farmer_id,
                "Duplicate tracking record ignored",
            );
            continue;
        }
        costs.insert(farmer_id, to_numeric(record.get(COL_TRACKED_COST)));
    }
    Ok(costs)
}

/// Flag claims whose amount exceeds the expected or the tracked cost.
///
/// `expected_cost = distance_km * weight_ton * rate`. A claim is flagged when
/// `claimed_amount > expected_cost`, or when it exceeds the tracked cost
/// (falling back to the expected cost for farmers with no tracking record).
/// Any comparison with an undefined side is false, so a claim with neither
/// an expected nor a tracked cost is never flagged.
pub fn validate_transport_claims(
    claims: &Table,
    rates: &Table,
    tracking: &Table,
) -> Result<Vec<TransportFraud>, ConfigurationError> {
    claims.require_columns(&[COL_FARMER_ID, COL_DISTANCE_KM, COL_WEIGHT_TON, COL_CLAIMED_AMOUNT])?;
    let rate = transport_rate(rates)?;
    let tracked = tracked_costs(tracking)?;

    let distance = coerce_column(claims, COL_DISTANCE_KM);
    let weight = coerce_column(claims, COL_WEIGHT_TON);
    let claimed = coerce_column(claims, COL_CLAIMED_AMOUNT);

    let mut findings = Vec::new();
    for (row, record) in claims.rows.iter().enumerate() {
        let farmer_id = text(record.get(COL_FARMER_ID));
        let expected_cost = product(&[distance[row], weight[row], Some(rate)]);
        let tracked_cost = farmer_id
            .as_ref()
            .and_then(|id| tracked.get(id).copied())
            .flatten();

        let above_expected = exceeds(claimed[row], expected_cost);
        let above_tracked = exceeds(claimed[row], tracked_cost.or(expected_cost));
        if !(above_expected || above_tracked) {
            continue;
        }

        // Both comparisons require a defined claim.
        let Some(claimed_amount) = claimed[row] else {
            continue;
        };
        findings.push(TransportFraud {
            row,
            farmer_id: farmer_id.unwrap_or_default(),
            distance_km: distance[row],
            weight_ton: weight[row],
            claimed_amount,
            expected_cost,
            verified_tracked_cost: tracked_cost,
        });
    }

    tracing::debug!(
        table = %claims.name,
        rows = claims.len(),
        rate,
        tracked = tracked.len(),
        flagged = findings.len(),
        "Transport claim rule evaluated",
    );

    Ok(findings)
}
