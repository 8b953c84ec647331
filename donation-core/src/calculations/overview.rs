//! Read-only summaries built on top of the simulator: one person's full
//! picture, the family's gift history, and the projection at a future date.

use std::cmp::Reverse;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::allowance::{AllowanceSimulation, AllowanceSimulator};
use crate::calculations::common::today;
use crate::calculations::consumption::ConsumptionAccumulator;
use crate::calculations::missed::{MissedOpportunityAnalysis, MissedOpportunityAnalyzer};
use crate::calculations::plan::{FamilyPlanner, PlanEntry};
use crate::calculations::saving::TaxSavingCalculator;
use crate::genealogy::GraphError;
use crate::models::{Donation, OwnerId, PersonId};

/// What a person can receive from their elders and give to their juniors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonOverview {
    pub person: PersonId,
    pub reference_date: NaiveDate,

    /// From parents, grandparents, great-grandparents, uncles and aunts.
    pub received_simulations: Vec<AllowanceSimulation>,

    /// To children, grandchildren, great-grandchildren, siblings, nephews
    /// and nieces.
    pub given_simulations: Vec<AllowanceSimulation>,

    /// Newest first.
    pub history_received: Vec<Donation>,

    /// Newest first.
    pub history_given: Vec<Donation>,

    /// Sum of `total_available` over `given_simulations`.
    pub total_given_allowance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyDashboard {
    pub total_members: usize,
    /// Gifts made inside the recall window, newest first.
    pub active_donations: Vec<Donation>,
    /// Older gifts, newest first.
    pub expired_donations: Vec<Donation>,
}

/// The family's situation projected to a reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureDashboard {
    pub reference_date: NaiveDate,
    pub analysis: MissedOpportunityAnalysis,
    pub family_plan: Vec<PlanEntry>,
    pub total_available: Decimal,
    /// Tax avoided if every planned gift is made.
    pub total_saving: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct FamilyOverview<'a> {
    simulator: AllowanceSimulator<'a>,
    saving: TaxSavingCalculator<'a>,
}

impl<'a> FamilyOverview<'a> {
    pub fn new(
        simulator: AllowanceSimulator<'a>,
        saving: TaxSavingCalculator<'a>,
    ) -> Self {
        Self { simulator, saving }
    }

    /// # Errors
    ///
    /// [`GraphError::UnknownPerson`] when `person` is not in the graph.
    pub fn person_overview(
        &self,
        person: PersonId,
        reference: Option<NaiveDate>,
    ) -> Result<PersonOverview, GraphError> {
        let reference = reference.unwrap_or_else(today);
        let graph = self.simulator.graph();
        if !graph.contains(person) {
            return Err(GraphError::UnknownPerson(person));
        }

        let donors = unique([
            graph.parents(person).to_vec(),
            graph.grandparents(person),
            graph.great_grandparents(person),
            graph.uncles_and_aunts(person),
        ]);
        let targets = unique([
            graph.children(person).to_vec(),
            graph.grandchildren(person),
            graph.great_grandchildren(person),
            graph.siblings(person),
            graph.nephews_and_nieces(person),
        ]);

        let received_simulations = donors
            .into_iter()
            .map(|donor| self.simulator.simulate(donor, person, Some(reference)))
            .collect::<Result<Vec<_>, _>>()?;
        let given_simulations = targets
            .into_iter()
            .map(|target| self.simulator.simulate(person, target, Some(reference)))
            .collect::<Result<Vec<_>, _>>()?;

        let total_given_allowance = given_simulations.iter().map(|s| s.total_available).sum();

        Ok(PersonOverview {
            person,
            reference_date: reference,
            received_simulations,
            given_simulations,
            history_received: newest_first(graph.donations_received(person)),
            history_given: newest_first(graph.donations_given(person)),
            total_given_allowance,
        })
    }

    /// Splits every gift made by a member of `owner`'s family around the
    /// start of the recall window ending on `reference`.
    pub fn family_dashboard(
        &self,
        owner: OwnerId,
        reference: Option<NaiveDate>,
    ) -> FamilyDashboard {
        let reference = reference.unwrap_or_else(today);
        let graph = self.simulator.graph();
        let window_start = ConsumptionAccumulator::new(graph, self.simulator.recall_window_years())
            .window_start(reference);
        let people = graph.people_of(owner);

        let (active, expired): (Vec<&Donation>, Vec<&Donation>) = people
            .iter()
            .flat_map(|id| graph.donations_given(*id))
            .partition(|d| d.created_at >= window_start);

        FamilyDashboard {
            total_members: people.len(),
            active_donations: newest_first(active),
            expired_donations: newest_first(expired),
        }
    }

    /// # Errors
    ///
    /// Propagates [`GraphError`] from the planner and the analyzer.
    pub fn future_dashboard(
        &self,
        owner: OwnerId,
        reference: Option<NaiveDate>,
    ) -> Result<FutureDashboard, GraphError> {
        let reference = reference.unwrap_or_else(today);
        let people = self.simulator.graph().people_of(owner);

        let analysis = MissedOpportunityAnalyzer::new(self.simulator).analyze(owner, Some(reference))?;
        let family_plan = FamilyPlanner::new(self.simulator).plan(&people, Some(reference))?;

        let total_available = family_plan.iter().map(|e| e.available).sum();
        let total_saving = family_plan
            .iter()
            .map(|e| self.saving.saving(e.available, e.relationship_code))
            .sum();

        Ok(FutureDashboard {
            reference_date: reference,
            analysis,
            family_plan,
            total_available,
            total_saving,
        })
    }
}

fn unique<const N: usize>(groups: [Vec<PersonId>; N]) -> Vec<PersonId> {
    let mut out = Vec::new();
    for id in groups.into_iter().flatten() {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

fn newest_first<'d>(donations: impl IntoIterator<Item = &'d Donation>) -> Vec<Donation> {
    let mut out: Vec<Donation> = donations.into_iter().cloned().collect();
    out.sort_by_key(|d| Reverse(d.created_at));
    out
}
