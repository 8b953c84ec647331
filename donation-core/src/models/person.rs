use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Index of a person inside a [`FamilyGraph`](crate::FamilyGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub usize);

impl fmt::Display for PersonId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Account owner a family tree belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Other => "O",
        }
    }

    /// Accepts the short codes and the French spellings found in user input.
    /// Anything unrecognised is `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "m" | "homme" | "masculin" => Self::Male,
            "f" | "femme" | "féminin" | "feminin" => Self::Female,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub death_date: Option<NaiveDate>,
    pub owner: OwnerId,
}

impl Person {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        gender: Gender,
        birth_date: NaiveDate,
        owner: OwnerId,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender,
            birth_date,
            death_date: None,
            owner,
        }
    }

    pub fn with_death_date(
        mut self,
        death_date: NaiveDate,
    ) -> Self {
        self.death_date = Some(death_date);
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// True once the death date has been reached.
    pub fn is_deceased_at(
        &self,
        date: NaiveDate,
    ) -> bool {
        self.death_date.is_some_and(|death| death <= date)
    }

    /// Age in completed years at `date`.
    ///
    /// Age stops at the death date, and a date before birth yields 0.
    pub fn age_at(
        &self,
        date: NaiveDate,
    ) -> u32 {
        let end = match self.death_date {
            Some(death) if date > death => death,
            _ => date,
        };

        if end < self.birth_date {
            return 0;
        }

        let mut years = end.year() - self.birth_date.year();
        if (end.month(), end.day()) < (self.birth_date.month(), self.birth_date.day()) {
            years -= 1;
        }
        years.max(0) as u32
    }
}
