use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{RelationshipCode, TaxSystem};

/// A tax-free allowance attached to one relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationRule {
    pub relationship: RelationshipCode,
    pub label: String,
    pub allowance_amount: Decimal,
    /// Length of one allowance cycle, counted from the donation that opened it.
    pub frequency_years: u32,
    /// The donor must be strictly younger than this.
    pub donor_max_age: u32,
    pub receiver_min_age: u32,
    #[serde(default)]
    pub cumulative: bool,
    #[serde(default)]
    pub bidirectional: bool,
    pub tax_system: TaxSystem,
}

/// A canonical family tie and the rules that apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub code: RelationshipCode,
    pub label: String,
    pub rules: Vec<DonationRule>,
}
