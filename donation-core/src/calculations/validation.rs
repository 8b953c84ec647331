//! Checks a gift against the family tree and the rule book before it is
//! recorded.
//!
//! Amount checks always run. Age checks need a matching rule, so they are
//! skipped when the relationship allows no such gift. Ages are taken at the
//! gift's own date.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FamilyGraph;
use crate::calculations::classifier::classify;
use crate::models::{NewDonation, PersonId, RelationshipCode, TaxSystem};
use crate::rules::RuleRepository;

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationViolation {
    #[error("personne inconnue : {0}")]
    UnknownPerson(PersonId),

    #[error("Une personne ne peut pas se faire une donation à elle-même.")]
    SelfDonation,

    #[error("Le lien de parenté détecté ({relationship}) ne permet pas ce type de donation fiscale ({tax_system}).")]
    NoApplicableRule {
        relationship: RelationshipCode,
        tax_system: TaxSystem,
    },

    #[error("Âge limite dépassé : le donateur doit avoir moins de {max_age} ans.")]
    DonorTooOld { age: u32, max_age: u32 },

    #[error("Condition d'âge non remplie : le bénéficiaire doit avoir au moins {min_age} ans.")]
    BeneficiaryTooYoung { age: u32, min_age: u32 },

    #[error("Le montant du don ne peut pas être négatif.")]
    NegativeAmount,

    #[error("Le montant de l'impôt payé ne peut pas être négatif.")]
    NegativeTaxPaid,

    #[error("Le montant de l'impôt ne peut pas être supérieur au montant du don lui-même.")]
    TaxExceedsAmount,
}

#[derive(Clone, Copy)]
pub struct DonationValidator<'a> {
    graph: &'a FamilyGraph,
    rules: &'a dyn RuleRepository,
}

impl<'a> DonationValidator<'a> {
    pub fn new(
        graph: &'a FamilyGraph,
        rules: &'a dyn RuleRepository,
    ) -> Self {
        Self { graph, rules }
    }

    /// Every reason `donation` should not be recorded. Empty when it is valid.
    pub fn validate(
        &self,
        donation: &NewDonation,
    ) -> Vec<DonationViolation> {
        let mut violations = Vec::new();

        if donation.amount < Decimal::ZERO {
            violations.push(DonationViolation::NegativeAmount);
        }
        if donation.tax_paid < Decimal::ZERO {
            violations.push(DonationViolation::NegativeTaxPaid);
        }
        if donation.tax_paid > donation.amount {
            violations.push(DonationViolation::TaxExceedsAmount);
        }

        let donor = self.graph.person(donation.donor);
        let beneficiary = self.graph.person(donation.beneficiary);
        let (Some(donor), Some(beneficiary)) = (donor, beneficiary) else {
            for id in [donation.donor, donation.beneficiary] {
                if !self.graph.contains(id) {
                    violations.push(DonationViolation::UnknownPerson(id));
                }
            }
            return violations;
        };

        if donation.donor == donation.beneficiary {
            violations.push(DonationViolation::SelfDonation);
            return violations;
        }

        let relationship = classify(self.graph, donation.donor, donation.beneficiary);
        let Some(rule) = self.rules.rule_for(relationship, donation.tax_system) else {
            violations.push(DonationViolation::NoApplicableRule {
                relationship,
                tax_system: donation.tax_system,
            });
            return violations;
        };

        let donor_age = donor.age_at(donation.created_at);
        if donor_age >= rule.donor_max_age {
            violations.push(DonationViolation::DonorTooOld {
                age: donor_age,
                max_age: rule.donor_max_age,
            });
        }
        let beneficiary_age = beneficiary.age_at(donation.created_at);
        if beneficiary_age < rule.receiver_min_age {
            violations.push(DonationViolation::BeneficiaryTooYoung {
                age: beneficiary_age,
                min_age: rule.receiver_min_age,
            });
        }

        violations
    }
}
