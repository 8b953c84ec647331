//! French gift-tax allowance engine.
//!
//! A [`FamilyGraph`] holds people, their parent/child links and the gifts
//! they made. Calculators in [`calculations`] classify the tie between two
//! people, work out what is left of each tax-free allowance, rank the gifts
//! a family can still make, and report allowances that lapsed unused. All
//! reference data (rules, bracket schedules, labels) comes from an
//! [`EngineConfig`].

pub mod calculations;
pub mod config;
pub mod engine;
pub mod genealogy;
pub mod models;
pub mod rules;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, EngineConfig, ReferenceData};
pub use engine::DonationEngine;
pub use genealogy::{FamilyGraph, GraphError};
pub use models::*;
