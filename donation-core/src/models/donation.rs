use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PersonId, TaxSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DonationId(pub usize);

/// A recorded gift between two members of the same family tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub id: DonationId,
    pub donor: PersonId,
    pub beneficiary: PersonId,
    pub amount: Decimal,
    /// Date the gift was executed.
    pub created_at: NaiveDate,
    pub tax_system: TaxSystem,
    pub tax_paid: Decimal,
}

/// For recording new donations (no id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDonation {
    pub donor: PersonId,
    pub beneficiary: PersonId,
    pub amount: Decimal,
    pub created_at: NaiveDate,
    pub tax_system: TaxSystem,
    pub tax_paid: Decimal,
}

impl NewDonation {
    pub fn into_donation(
        self,
        id: DonationId,
    ) -> Donation {
        Donation {
            id,
            donor: self.donor,
            beneficiary: self.beneficiary,
            amount: self.amount,
            created_at: self.created_at,
            tax_system: self.tax_system,
            tax_paid: self.tax_paid,
        }
    }
}
