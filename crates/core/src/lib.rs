//! `claimcheck-core` -- rule engine for agricultural subsidy claims.
//!
//! Compares self-reported claim figures against independent reference data
//! (land survey, transport rate tables, tracked logistics cost, crop-season
//! rulebooks) and surfaces the mismatching rows for review. No I/O.

pub mod coercion;
pub mod error;
pub mod report;
pub mod table;
pub mod validation;

pub use error::ConfigurationError;
pub use table::{Row, Table};
pub use validation::{validate_crop_rules, validate_land_mismatch, validate_transport_claims};
