//! Fixtures shared by unit tests.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::FamilyGraph;
use crate::models::{
    DonationRule, Gender, NewDonation, OwnerId, Person, PersonId, Relationship, RelationshipCode,
    TaxSystem,
};
use crate::rules::RuleBook;

pub(crate) const OWNER: OwnerId = OwnerId(1);

pub(crate) fn date(
    y: i32,
    m: u32,
    d: u32,
) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Rule with no age limits and a 15-year cycle.
pub(crate) fn rule(
    relationship: RelationshipCode,
    allowance_amount: Decimal,
    tax_system: TaxSystem,
) -> DonationRule {
    DonationRule {
        relationship,
        label: format!("{} {}", relationship.as_str(), tax_system.as_str()),
        allowance_amount,
        frequency_years: 15,
        donor_max_age: 150,
        receiver_min_age: 0,
        cumulative: true,
        bidirectional: false,
        tax_system,
    }
}

pub(crate) fn rule_book(rules: Vec<DonationRule>) -> RuleBook {
    let mut grouped: BTreeMap<RelationshipCode, Vec<DonationRule>> = BTreeMap::new();
    for rule in rules {
        grouped.entry(rule.relationship).or_default().push(rule);
    }
    let relationships = grouped
        .into_iter()
        .map(|(code, rules)| Relationship {
            code,
            label: code.as_str().to_string(),
            rules,
        })
        .collect();
    RuleBook::new(relationships).unwrap()
}

/// Builds a [`FamilyGraph`] owned by [`OWNER`], panicking on invalid input.
pub(crate) struct FamilyBuilder {
    graph: FamilyGraph,
}

impl FamilyBuilder {
    pub(crate) fn new() -> Self {
        Self {
            graph: FamilyGraph::new(),
        }
    }

    pub(crate) fn person(
        &mut self,
        first_name: &str,
        birth_date: NaiveDate,
    ) -> PersonId {
        self.graph
            .add_person(Person::new(first_name, "Martin", Gender::Male, birth_date, OWNER))
    }

    pub(crate) fn deceased(
        &mut self,
        first_name: &str,
        birth_date: NaiveDate,
        death_date: NaiveDate,
    ) -> PersonId {
        self.graph.add_person(
            Person::new(first_name, "Martin", Gender::Male, birth_date, OWNER)
                .with_death_date(death_date),
        )
    }

    pub(crate) fn stranger(
        &mut self,
        first_name: &str,
        owner: OwnerId,
        birth_date: NaiveDate,
    ) -> PersonId {
        self.graph
            .add_person(Person::new(first_name, "Durand", Gender::Other, birth_date, owner))
    }

    pub(crate) fn link(
        &mut self,
        parent: PersonId,
        child: PersonId,
    ) {
        self.graph.link_parent(parent, child).unwrap();
    }

    pub(crate) fn donate(
        &mut self,
        donor: PersonId,
        beneficiary: PersonId,
        amount: Decimal,
        created_at: NaiveDate,
        tax_system: TaxSystem,
    ) {
        self.graph
            .record_donation(NewDonation {
                donor,
                beneficiary,
                amount,
                created_at,
                tax_system,
                tax_paid: Decimal::ZERO,
            })
            .unwrap();
    }

    pub(crate) fn build(self) -> FamilyGraph {
        self.graph
    }
}
