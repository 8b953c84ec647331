use std::collections::BTreeMap;
use std::io::Read;

use chrono::NaiveDate;
use donation_core::FamilyGraph;
use donation_core::models::{Gender, NewDonation, OwnerId, Person, PersonId, TaxSystem};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::loader::{LoaderError, deserialize_optional_decimal, parse_records};

/// A single record from the people CSV file.
///
/// - `key`: Identifier used by the links and donations files
/// - `gender`: `M`, `F`, or anything else for unspecified
/// - `death_date`: Empty while the person is alive
/// - `owner`: Account the person's family tree belongs to
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PersonRecord {
    pub key: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_optional_date")]
    pub death_date: Option<NaiveDate>,
    pub owner: i64,
}

/// A parent-child link, both sides given by person key.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LinkRecord {
    pub parent: String,
    pub child: String,
}

/// A recorded gift. `tax_paid` may be left empty.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DonationRecord {
    pub donor: String,
    pub beneficiary: String,
    pub amount: Decimal,
    pub created_at: NaiveDate,
    pub tax_system: String,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub tax_paid: Option<Decimal>,
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// A family graph built from CSV, with the file keys kept for lookups.
#[derive(Debug, Default)]
pub struct LoadedFamily {
    pub graph: FamilyGraph,
    keys: BTreeMap<String, PersonId>,
}

impl LoadedFamily {
    pub fn person_id(
        &self,
        key: &str,
    ) -> Result<PersonId, LoaderError> {
        self.keys
            .get(key)
            .copied()
            .ok_or_else(|| LoaderError::UnknownPerson(key.to_string()))
    }

    pub fn key_of(
        &self,
        id: PersonId,
    ) -> Option<&str> {
        self.keys
            .iter()
            .find(|(_, candidate)| **candidate == id)
            .map(|(key, _)| key.as_str())
    }
}

/// Loader for family trees and gift history from CSV files.
pub struct FamilyLoader;

impl FamilyLoader {
    pub fn parse_people<R: Read>(reader: R) -> Result<Vec<PersonRecord>, LoaderError> {
        parse_records(reader)
    }

    pub fn parse_links<R: Read>(reader: R) -> Result<Vec<LinkRecord>, LoaderError> {
        parse_records(reader)
    }

    pub fn parse_donations<R: Read>(reader: R) -> Result<Vec<DonationRecord>, LoaderError> {
        parse_records(reader)
    }

    /// Build the family graph.
    ///
    /// People are added first, then links, then donations. Links and
    /// donations must only reference declared keys, and every donation goes
    /// through the graph's own checks.
    pub fn load(
        people: &[PersonRecord],
        links: &[LinkRecord],
        donations: &[DonationRecord],
    ) -> Result<LoadedFamily, LoaderError> {
        let mut family = LoadedFamily::default();

        for record in people {
            if family.keys.contains_key(&record.key) {
                return Err(LoaderError::DuplicatePerson(record.key.clone()));
            }
            let mut person = Person::new(
                record.first_name.as_str(),
                record.last_name.as_str(),
                Gender::parse(&record.gender),
                record.birth_date,
                OwnerId(record.owner),
            );
            if let Some(death_date) = record.death_date {
                person = person.with_death_date(death_date);
            }
            let id = family.graph.add_person(person);
            family.keys.insert(record.key.clone(), id);
        }

        for record in links {
            let parent = family.person_id(&record.parent)?;
            let child = family.person_id(&record.child)?;
            family.graph.link_parent(parent, child)?;
        }

        for record in donations {
            let tax_system = TaxSystem::parse(&record.tax_system)
                .ok_or_else(|| LoaderError::InvalidTaxSystem(record.tax_system.clone()))?;
            let donation = NewDonation {
                donor: family.person_id(&record.donor)?,
                beneficiary: family.person_id(&record.beneficiary)?,
                amount: record.amount,
                created_at: record.created_at,
                tax_system,
                tax_paid: record.tax_paid.unwrap_or(Decimal::ZERO),
            };
            family.graph.record_donation(donation)?;
        }

        info!(
            people = people.len(),
            links = links.len(),
            donations = donations.len(),
            "family loaded"
        );

        Ok(family)
    }
}
