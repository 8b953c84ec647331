//! Allowance rules, bracket schedules and relationship labels.

mod brackets;
mod labels;
mod repository;

pub use brackets::BracketTable;
pub use labels::{GenderedLabel, LabelBook};
pub use repository::{RuleBook, RuleRepository};
