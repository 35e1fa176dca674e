//! Claim validation rules.
//!
//! Each rule is a pure function over caller-owned [`Table`](crate::table::Table)s
//! that returns the rows judged anomalous. Rules share no state and can run
//! in any order or in parallel on disjoint inputs.

pub mod crop;
pub mod land;
pub mod transport;

pub use crop::{validate_crop_rules, CropRuleFindings, CropVolumeViolation, SeasonViolation};
pub use land::{validate_land_mismatch, LandMismatch};
pub use transport::{tracked_costs, transport_rate, validate_transport_claims, TransportFraud};
