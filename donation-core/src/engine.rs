//! One place to build every calculator over the same graph and reference
//! data.

use crate::FamilyGraph;
use crate::calculations::{
    AllowanceSimulator, DonationValidator, FamilyOverview, FamilyPlanner,
    MissedOpportunityAnalyzer, TaxSavingCalculator,
};
use crate::config::ReferenceData;

#[derive(Debug, Clone, Copy)]
pub struct DonationEngine<'a> {
    graph: &'a FamilyGraph,
    reference: &'a ReferenceData,
}

impl<'a> DonationEngine<'a> {
    pub fn new(
        graph: &'a FamilyGraph,
        reference: &'a ReferenceData,
    ) -> Self {
        Self { graph, reference }
    }

    pub fn graph(&self) -> &'a FamilyGraph {
        self.graph
    }

    pub fn reference_data(&self) -> &'a ReferenceData {
        self.reference
    }

    pub fn simulator(&self) -> AllowanceSimulator<'a> {
        AllowanceSimulator::new(
            self.graph,
            &self.reference.rules,
            self.reference.recall_window_years,
        )
    }

    pub fn planner(&self) -> FamilyPlanner<'a> {
        FamilyPlanner::new(self.simulator())
    }

    pub fn analyzer(&self) -> MissedOpportunityAnalyzer<'a> {
        MissedOpportunityAnalyzer::new(self.simulator())
    }

    pub fn saving(&self) -> TaxSavingCalculator<'a> {
        TaxSavingCalculator::new(&self.reference.brackets)
    }

    pub fn validator(&self) -> DonationValidator<'a> {
        DonationValidator::new(self.graph, &self.reference.rules)
    }

    pub fn overview(&self) -> FamilyOverview<'a> {
        FamilyOverview::new(self.simulator(), self.saving())
    }
}
