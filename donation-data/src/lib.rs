//! CSV import for family trees, recorded gifts and tax bracket schedules.

mod family;
mod loader;

pub use family::{DonationRecord, FamilyLoader, LinkRecord, LoadedFamily, PersonRecord};
pub use loader::{LoaderError, TaxBracketLoader, TaxBracketRecord};
