//! End-to-end scenarios for the claim rules.
//!
//! Covers the worked transport example, the land and crop examples, and the
//! property that re-running a rule on its own non-flagged rows finds nothing.

use claimcheck_core::report::{to_markdown, Tabular};
use claimcheck_core::validation::{
    validate_crop_rules, validate_land_mismatch, validate_transport_claims, CropRuleFindings,
    LandMismatch, TransportFraud,
};
use claimcheck_core::Table;
use serde_json::{json, Value};

fn transport_claims() -> Table {
    Table::from_columns(
        "claims",
        vec![
            ("farmer_id", vec![json!("F001"), json!("F002"), json!("F003"), json!("F004")]),
            ("distance_km", vec![json!(100), json!(50), json!(200), json!(150)]),
            ("weight_ton", vec![json!(5), json!(10), json!(3), json!(4)]),
            ("claimed_amount", vec![json!(5500), json!(5000), json!(6500), json!(4500)]),
        ],
    )
    .expect("columns have equal length")
}

fn rates() -> Table {
    Table::from_columns("rates", vec![("rate_per_km_per_ton", vec![json!(10.0)])])
        .expect("single column")
}

fn tracking() -> Table {
    Table::from_columns(
        "tracking",
        vec![
            ("farmer_id", vec![json!("F001"), json!("F002"), json!("F003")]),
            ("tracked_cost", vec![json!(5000), json!(5500), json!(5500)]),
        ],
    )
    .expect("columns have equal length")
}

fn land_records() -> Table {
    Table::from_columns(
        "land",
        vec![
            ("farmer_id", vec![json!("F001"), json!("F002"), json!("F003"), json!("F004")]),
            ("land_area", vec![json!(4.0), json!("6.5"), json!("n/a"), json!(2.0)]),
            ("registered_area", vec![json!(5.5), json!(6.0), json!(9.0), Value::Null]),
        ],
    )
    .expect("columns have equal length")
}

fn crop_claims() -> Table {
    Table::from_columns(
        "crop_claims",
        vec![
            (
                "farmer_id",
                vec![json!("F001"), json!("F001"), json!("F001"), json!("F002"), json!("F003")],
            ),
            (
                "season",
                vec![json!("Kharif"), json!("Kharif"), json!("Kharif"), json!("Rabi"), json!("Kharif")],
            ),
            (
                "crop",
                vec![json!("Rice"), json!("Maize"), json!("Cotton"), json!("Rice"), json!("X")],
            ),
        ],
    )
    .expect("columns have equal length")
}

fn crop_rules() -> Table {
    Table::from_columns(
        "crop_rules",
        vec![
            ("crop", vec![json!("Rice"), json!("Wheat"), json!("Maize"), json!("Cotton")]),
            ("allowed_season", vec![json!("Kharif"), json!("Rabi"), json!("Kharif"), json!("Kharif")]),
        ],
    )
    .expect("columns have equal length")
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// F001 exceeds both references and F003 exceeds both; F002 matches its
/// expected cost exactly and F004 is under its expected cost with no tracking.
#[test]
fn worked_transport_example_flags_f001_and_f003() {
    let findings = validate_transport_claims(&transport_claims(), &rates(), &tracking())
        .expect("valid reference tables");

    let ids: Vec<&str> = findings.iter().map(|f| f.farmer_id.as_str()).collect();
    assert_eq!(ids, vec!["F001", "F003"]);

    assert_eq!(
        findings[0],
        TransportFraud {
            row: 0,
            farmer_id: "F001".into(),
            distance_km: Some(100.0),
            weight_ton: Some(5.0),
            claimed_amount: 5500.0,
            expected_cost: Some(5000.0),
            verified_tracked_cost: Some(5000.0),
        }
    );
    assert_eq!(findings[1].row, 2);
    assert_eq!(findings[1].expected_cost, Some(6000.0));
    assert_eq!(findings[1].verified_tracked_cost, Some(5500.0));
}

#[test]
fn worked_transport_example_renders_contract_columns() {
    let findings = validate_transport_claims(&transport_claims(), &rates(), &tracking())
        .expect("valid reference tables");
    let md = to_markdown(&findings);
    let header = md.lines().next().expect("header line");

    for column in TransportFraud::COLUMNS {
        assert!(header.contains(column), "missing column {column} in {header}");
    }
    assert_eq!(md.lines().count(), 4);
}

#[test]
fn transport_complement_is_never_flagged() {
    let claims = transport_claims();
    let findings = validate_transport_claims(&claims, &rates(), &tracking()).unwrap();
    let flagged: Vec<usize> = findings.iter().map(|f| f.row).collect();

    let rest = claims.without_rows(&flagged);
    assert_eq!(rest.len(), 2);
    assert!(validate_transport_claims(&rest, &rates(), &tracking())
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Land
// ---------------------------------------------------------------------------

/// Only F001 has two defined areas with the registered one larger.
#[test]
fn land_example_flags_only_defined_mismatches() {
    let findings = validate_land_mismatch(&land_records()).unwrap();
    assert_eq!(
        findings,
        vec![LandMismatch {
            row: 0,
            farmer_id: "F001".into(),
            land_area: 4.0,
            registered_area: 5.5,
        }]
    );
}

#[test]
fn land_complement_is_never_flagged() {
    let land = land_records();
    let flagged: Vec<usize> = validate_land_mismatch(&land)
        .unwrap()
        .iter()
        .map(|f| f.row)
        .collect();
    assert!(validate_land_mismatch(&land.without_rows(&flagged))
        .unwrap()
        .is_empty());
}

/// Tables arrive as JSON from the import pipeline. Rows may carry keys the
/// table does not declare and may omit declared ones.
#[test]
fn land_rule_runs_over_a_deserialized_table() {
    let land: Table = serde_json::from_value(json!({
        "name": "land",
        "columns": ["farmer_id", "land_area", "registered_area"],
        "rows": [
            {"farmer_id": "F001", "land_area": "4", "registered_area": 5.5, "notes": "resurvey"},
            {"farmer_id": "F002", "land_area": 3},
            {"farmer_id": "F003", "land_area": 7.0, "registered_area": "6.5"},
        ],
    }))
    .expect("valid table json");

    assert_eq!(land.columns, vec!["farmer_id", "land_area", "registered_area"]);
    assert_eq!(land.rows[0]["notes"], json!("resurvey"));

    let findings = validate_land_mismatch(&land).unwrap();
    let ids: Vec<&str> = findings.iter().map(|f| f.farmer_id.as_str()).collect();
    assert_eq!(ids, vec!["F001"]);
    assert_eq!(findings[0].land_area, 4.0);
}

#[test]
fn deserialized_table_without_rows_is_empty() {
    let land: Table = serde_json::from_value(json!({
        "name": "land",
        "columns": ["farmer_id", "land_area", "registered_area"],
    }))
    .expect("rows default to empty");

    assert!(land.is_empty());
    assert!(validate_land_mismatch(&land).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Crops
// ---------------------------------------------------------------------------

#[test]
fn crop_example_reports_both_findings() {
    let CropRuleFindings {
        more_than_2_crops,
        not_allowed_crops,
    } = validate_crop_rules(&crop_claims(), &crop_rules()).unwrap();

    assert_eq!(more_than_2_crops.len(), 1);
    assert_eq!(more_than_2_crops[0].farmer_id, "F001");
    assert_eq!(more_than_2_crops[0].crop_count, 3);

    let over_cap = serde_json::to_value(&more_than_2_crops[0]).unwrap();
    assert_eq!(over_cap, json!({"farmer_id": "F001", "season": "Kharif", "crop": 3}));

    // F002 grows rice in Rabi; F003 claims a crop with no rule.
    let off_season: Vec<(&str, Option<&str>)> = not_allowed_crops
        .iter()
        .map(|v| (v.farmer_id.as_str(), v.allowed_season.as_deref()))
        .collect();
    assert_eq!(off_season, vec![("F002", Some("Kharif")), ("F003", None)]);
}

#[test]
fn crop_whitelist_complement_is_never_flagged() {
    let claims = crop_claims();
    let flagged: Vec<usize> = validate_crop_rules(&claims, &crop_rules())
        .unwrap()
        .not_allowed_crops
        .iter()
        .map(|v| v.row)
        .collect();
    let rest = claims.without_rows(&flagged);

    assert!(validate_crop_rules(&rest, &crop_rules())
        .unwrap()
        .not_allowed_crops
        .is_empty());
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn rules_run_concurrently_on_disjoint_inputs() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Table>();
    assert_send_sync::<TransportFraud>();
    assert_send_sync::<CropRuleFindings>();

    let (land, transport) = std::thread::scope(|s| {
        let land = s.spawn(|| validate_land_mismatch(&land_records()));
        let transport = s.spawn(|| validate_transport_claims(&transport_claims(), &rates(), &tracking()));
        (land.join().unwrap(), transport.join().unwrap())
    });

    assert_eq!(land.unwrap().len(), 1);
    assert_eq!(transport.unwrap().len(), 2);
}
