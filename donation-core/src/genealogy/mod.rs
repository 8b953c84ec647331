//! Family tree storage and derived-relative queries.

mod graph;
pub mod navigator;

pub use graph::{FamilyGraph, GraphError};
