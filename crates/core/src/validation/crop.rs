//! Seasonal crop claims: per-season volume cap and crop/season whitelist.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::coercion::same_text;
use crate::error::ConfigurationError;
use crate::report::{text_cell, Tabular};
use crate::table::{text, Table};

pub const COL_FARMER_ID: &str = "farmer_id";
pub const COL_SEASON: &str = "season";
pub const COL_CROP: &str = "crop";
pub const COL_ALLOWED_SEASON: &str = "allowed_season";

/// Most crops a farmer may claim in one season.
pub const MAX_CROPS_PER_SEASON: usize = 2;

/// A farmer/season group that claimed more than [`MAX_CROPS_PER_SEASON`] crops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropVolumeViolation {
    pub farmer_id: String,
    pub season: String,
    /// Number of crops claimed in the group, reported under the `crop` column.
    #[serde(rename = "crop")]
    pub crop_count: usize,
}

impl Tabular for CropVolumeViolation {
    const COLUMNS: &'static [&'static str] = &[COL_FARMER_ID, COL_SEASON, COL_CROP];

    fn cells(&self) -> Vec<String> {
        vec![
            self.farmer_id.clone(),
            self.season.clone(),
            self.crop_count.to_string(),
        ]
    }
}

/// A claim for a crop outside its allowed season, or with no rule at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonViolation {
    /// Index of the source row in the claims table.
    #[serde(skip)]
    pub row: usize,
    pub farmer_id: String,
    pub crop: Option<String>,
    pub season: Option<String>,
    pub allowed_season: Option<String>,
}

impl Tabular for SeasonViolation {
    const COLUMNS: &'static [&'static str] = &[COL_FARMER_ID, COL_CROP, COL_SEASON, COL_ALLOWED_SEASON];

    fn cells(&self) -> Vec<String> {
        vec![
            self.farmer_id.clone(),
            text_cell(self.crop.as_deref()),
            text_cell(self.season.as_deref()),
            text_cell(self.allowed_season.as_deref()),
        ]
    }
}

/// Both crop findings. A claim may appear in either, both or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CropRuleFindings {
    pub more_than_2_crops: Vec<CropVolumeViolation>,
    pub not_allowed_crops: Vec<SeasonViolation>,
}

impl CropRuleFindings {
    pub fn is_empty(&self) -> bool {
        self.more_than_2_crops.is_empty() && self.not_allowed_crops.is_empty()
    }
}

/// Evaluate the volume cap and the season whitelist over `claims`.
pub fn validate_crop_rules(claims: &Table, rules: &Table) -> Result<CropRuleFindings, ConfigurationError> {
    claims.require_columns(&[COL_FARMER_ID, COL_SEASON, COL_CROP])?;
    rules.require_columns(&[COL_CROP, COL_ALLOWED_SEASON])?;

    let findings = CropRuleFindings {
        more_than_2_crops: crop_volume_violations(claims),
        not_allowed_crops: season_violations(claims, rules),
    };

    tracing::debug!(
        table = %claims.name,
        rows = claims.len(),
        rules = rules.len(),
        over_cap = findings.more_than_2_crops.len(),
        off_season = findings.not_allowed_crops.len(),
        "Crop rule evaluated",
    );

    Ok(findings)
}

/// Groups are keyed by `(farmer_id, season)` and reported in key order.
///
/// Rows with an undefined farmer or season belong to no group, and only
/// rows with a defined crop are counted.
fn crop_volume_violations(claims: &Table) -> Vec<CropVolumeViolation> {
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for record in &claims.rows {
        let (Some(farmer_id), Some(season)) = (
            text(record.get(COL_FARMER_ID)),
            text(record.get(COL_SEASON)),
        ) else {
            continue;
        };
        let count = counts.entry((farmer_id, season)).or_default();
        if text(record.get(COL_CROP)).is_some() {
            *count += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > MAX_CROPS_PER_SEASON)
        .map(|((farmer_id, season), crop_count)| CropVolumeViolation {
            farmer_id,
            season,
            crop_count,
        })
        .collect()
}

/// Left join of claims to rules on `crop`.
///
/// A crop listed under several rules yields one joined row per rule, in rule
/// order; a crop with no rule yields one row with an undefined allowed season.
fn season_violations(claims: &Table, rules: &Table) -> Vec<SeasonViolation> {
    let mut allowed: HashMap<String, Vec<Option<String>>> = HashMap::new();
    for rule in &rules.rows {
        if let Some(crop) = text(rule.get(COL_CROP)) {
            allowed
                .entry(crop)
                .or_default()
                .push(text(rule.get(COL_ALLOWED_SEASON)));
        }
    }

    let unmatched: [Option<String>; 1] = [None];
    let mut violations = Vec::new();
    for (row, record) in claims.rows.iter().enumerate() {
        let crop = text(record.get(COL_CROP));
        let season = text(record.get(COL_SEASON));
        let matches = crop
            .as_ref()
            .and_then(|c| allowed.get(c))
            .map_or(&unmatched[..], Vec::as_slice);

        for allowed_season in matches {
            if same_text(season.as_deref(), allowed_season.as_deref()) {
                continue;
            }
            violations.push(SeasonViolation {
                row,
                farmer_id: text(record.get(COL_FARMER_ID)).unwrap_or_default(),
                crop: crop.clone(),
                season: season.clone(),
                allowed_season: allowed_season.clone(),
            });
        }
    }
    violations
}
