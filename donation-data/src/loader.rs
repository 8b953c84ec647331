use std::collections::BTreeMap;
use std::io::Read;

use donation_core::models::{BracketCategory, TaxBracket};
use donation_core::{ConfigError, EngineConfig, GraphError};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when importing CSV data.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid bracket category: {0}")]
    InvalidCategory(String),

    #[error("Invalid tax system: {0}")]
    InvalidTaxSystem(String),

    #[error("Person '{0}' is declared more than once")]
    DuplicatePerson(String),

    #[error("Person '{0}' is not declared in the people file")]
    UnknownPerson(String),

    #[error("Family graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        LoaderError::CsvParse(err.to_string())
    }
}

/// Reads every row of a headed CSV into `T`.
pub(crate) fn parse_records<T, R>(reader: R) -> Result<Vec<T>, LoaderError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: T = result?;
        records.push(record);
    }

    Ok(records)
}

/// A single record from the tax brackets CSV file.
///
/// - `category`: The bracket category code (`progressif_direct`,
///   `freres_soeurs`, `neveux_nieces`, `tiers`)
/// - `amount_limit`: Upper bound of the slice (empty for the last, unbounded slice)
/// - `rate`: The marginal rate as a decimal (e.g., 0.20 for 20%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub category: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub amount_limit: Option<Decimal>,
    pub rate: Decimal,
}

pub(crate) fn deserialize_optional_decimal<'de, D>(
    deserializer: D
) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for progressive tax schedules from CSV files.
///
/// Schedules read from CSV replace the ones of the same category in an
/// [`EngineConfig`], so a yearly update of the rates does not require
/// editing the TOML configuration.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse tax bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, LoaderError> {
        parse_records(reader)
    }

    /// Convert records into typed brackets, keeping their order.
    pub fn brackets(records: &[TaxBracketRecord]) -> Result<Vec<TaxBracket>, LoaderError> {
        records
            .iter()
            .map(|record| {
                let category = BracketCategory::parse(&record.category)
                    .ok_or_else(|| LoaderError::InvalidCategory(record.category.clone()))?;
                Ok(TaxBracket {
                    category,
                    amount_limit: record.amount_limit,
                    rate: record.rate,
                })
            })
            .collect()
    }

    /// Load tax bracket records into `config`.
    ///
    /// For each category present in the records, every existing bracket of
    /// that category is dropped and the new ones are inserted. Categories
    /// absent from the records are left untouched, and loading the same
    /// records twice gives the same configuration. The resulting
    /// configuration is validated before returning.
    ///
    /// Returns the number of brackets inserted.
    pub fn load(
        config: &mut EngineConfig,
        records: &[TaxBracketRecord],
    ) -> Result<usize, LoaderError> {
        let mut groups: BTreeMap<BracketCategory, Vec<TaxBracket>> = BTreeMap::new();
        for bracket in Self::brackets(records)? {
            groups.entry(bracket.category).or_default().push(bracket);
        }

        let mut inserted = 0;
        for (category, brackets) in groups {
            config.brackets.retain(|b| b.category != category);
            debug!(%category, count = brackets.len(), "replacing schedule");
            inserted += brackets.len();
            config.brackets.extend(brackets);
        }

        config.validate()?;
        Ok(inserted)
    }
}
