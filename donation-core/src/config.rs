//! Engine configuration.
//!
//! All reference data the engine needs (relationships, allowance rules,
//! bracket schedules, display labels and the recall window) is read once
//! from TOML into an [`EngineConfig`], validated, and turned into the
//! [`ReferenceData`] that calculators take in their constructors.
//!
//! ```
//! use donation_core::EngineConfig;
//! use donation_core::models::RelationshipCode;
//! use donation_core::rules::RuleRepository;
//!
//! let reference = EngineConfig::french_reference()
//!     .and_then(EngineConfig::into_reference_data)
//!     .unwrap();
//!
//! assert_eq!(reference.recall_window_years, 15);
//! assert_eq!(reference.rules.rules_for(RelationshipCode::Enfant).len(), 2);
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    BracketCategory, DonationRule, Relationship, RelationshipCode, TaxBracket,
};
use crate::rules::{BracketTable, GenderedLabel, LabelBook, RuleBook};

/// Look-back period for prior gifts counted against an allowance.
///
/// Fixed by the fiscal recall rule and deliberately distinct from
/// [`DonationRule::frequency_years`].
pub const DEFAULT_RECALL_WINDOW_YEARS: u32 = 15;

const FRENCH_REFERENCE: &str = include_str!("../data/reference.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("recall window must be at least one year")]
    InvalidRecallWindow,

    #[error("relationship {0} is declared more than once")]
    DuplicateRelationship(RelationshipCode),

    #[error("rule '{label}' references undeclared relationship {code}")]
    UnknownRelationship { label: String, code: RelationshipCode },

    #[error("rule '{0}' has a negative allowance amount")]
    NegativeAllowance(String),

    #[error("brackets for {category} are not in ascending order at limit {limit}")]
    UnorderedBrackets {
        category: BracketCategory,
        limit: Decimal,
    },

    #[error("brackets for {0} must end with exactly one unbounded slice")]
    MissingUnboundedBracket(BracketCategory),

    #[error("bracket rate for {category} must be between 0 and 1, got {rate}")]
    InvalidRate {
        category: BracketCategory,
        rate: Decimal,
    },

    #[error("no brackets configured for {0}")]
    MissingCategory(BracketCategory),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipConfig {
    pub code: RelationshipCode,
    pub label: String,
}

fn default_recall_window() -> u32 {
    DEFAULT_RECALL_WINDOW_YEARS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_recall_window")]
    pub recall_window_years: u32,
    #[serde(default)]
    pub relationships: Vec<RelationshipConfig>,
    #[serde(default)]
    pub rules: Vec<DonationRule>,
    #[serde(default)]
    pub brackets: Vec<TaxBracket>,
    #[serde(default)]
    pub labels: Vec<GenderedLabel>,
}

/// Validated lookup tables handed to the calculators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceData {
    pub recall_window_years: u32,
    pub rules: RuleBook,
    pub brackets: BracketTable,
    pub labels: LabelBook,
}

impl EngineConfig {
    /// Current French allowances and schedules, embedded at build time.
    pub fn french_reference() -> Result<Self, ConfigError> {
        Self::from_toml_str(FRENCH_REFERENCE)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks cross-references and schedules.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] variant except `Io` and `Parse`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recall_window_years == 0 {
            return Err(ConfigError::InvalidRecallWindow);
        }

        let mut declared = BTreeSet::new();
        for relationship in &self.relationships {
            if !declared.insert(relationship.code) {
                return Err(ConfigError::DuplicateRelationship(relationship.code));
            }
        }

        for rule in &self.rules {
            if !declared.contains(&rule.relationship) {
                return Err(ConfigError::UnknownRelationship {
                    label: rule.label.clone(),
                    code: rule.relationship,
                });
            }
            if rule.allowance_amount < Decimal::ZERO {
                return Err(ConfigError::NegativeAllowance(rule.label.clone()));
            }
        }

        let table = BracketTable::new(self.brackets.clone())?;
        for category in BracketCategory::ALL {
            if table.schedule(category).is_none() {
                return Err(ConfigError::MissingCategory(category));
            }
        }

        Ok(())
    }

    pub fn rule_book(&self) -> Result<RuleBook, ConfigError> {
        let relationships = self
            .relationships
            .iter()
            .map(|r| Relationship {
                code: r.code,
                label: r.label.clone(),
                rules: self
                    .rules
                    .iter()
                    .filter(|rule| rule.relationship == r.code)
                    .cloned()
                    .collect(),
            })
            .collect();
        RuleBook::new(relationships)
    }

    pub fn bracket_table(&self) -> Result<BracketTable, ConfigError> {
        BracketTable::new(self.brackets.clone())
    }

    pub fn label_book(&self) -> LabelBook {
        LabelBook::new(self.labels.clone())
    }

    pub fn into_reference_data(self) -> Result<ReferenceData, ConfigError> {
        self.validate()?;
        Ok(ReferenceData {
            recall_window_years: self.recall_window_years,
            rules: self.rule_book()?,
            brackets: self.bracket_table()?,
            labels: self.label_book(),
        })
    }
}
