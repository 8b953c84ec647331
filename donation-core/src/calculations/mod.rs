//! Allowance and gift-tax calculations over a [`FamilyGraph`](crate::FamilyGraph).
//!
//! Every calculator borrows the graph and the reference data it needs; none
//! of them mutates the graph or performs I/O.

pub mod allowance;
pub mod classifier;
pub mod common;
pub mod consumption;
pub mod missed;
pub mod overview;
pub mod plan;
pub mod saving;
pub mod validation;

pub use allowance::{AllowanceSimulation, AllowanceSimulator, RuleAllowance, RuleRejection};
pub use classifier::classify;
pub use consumption::{ConsumedAmounts, ConsumptionAccumulator};
pub use missed::{
    AllowancePeriod, MissedOpportunityAnalysis, MissedOpportunityAnalyzer, NeverUsedOpportunity,
};
pub use overview::{FamilyDashboard, FamilyOverview, FutureDashboard, PersonOverview};
pub use plan::{FamilyPlanner, PlanEntry};
pub use saving::TaxSavingCalculator;
pub use validation::{DonationValidator, DonationViolation};
