mod donation;
mod donation_rule;
mod person;
mod relationship_code;
mod tax_bracket;
mod tax_system;

pub use donation::{Donation, DonationId, NewDonation};
pub use donation_rule::{DonationRule, Relationship};
pub use person::{Gender, OwnerId, Person, PersonId};
pub use relationship_code::RelationshipCode;
pub use tax_bracket::{BracketCategory, TaxBracket};
pub use tax_system::{AllowanceBucket, TaxSystem};
