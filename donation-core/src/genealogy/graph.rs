use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::models::{Donation, DonationId, NewDonation, OwnerId, Person, PersonId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("person {0} not found")]
    UnknownPerson(PersonId),

    #[error("donation {0:?} not found")]
    UnknownDonation(DonationId),

    #[error("person {0} cannot be their own parent")]
    SelfParent(PersonId),

    #[error("person {0} cannot make a donation to themselves")]
    SelfDonation(PersonId),

    #[error("donation amount must be non-negative, got {0}")]
    NegativeAmount(Decimal),

    #[error("tax paid must be non-negative, got {0}")]
    NegativeTaxPaid(Decimal),

    #[error("tax paid ({tax_paid}) cannot exceed the donation amount ({amount})")]
    TaxExceedsAmount { tax_paid: Decimal, amount: Decimal },
}

#[derive(Debug, Clone)]
struct Node {
    person: Person,
    parents: Vec<PersonId>,
    children: Vec<PersonId>,
    given: Vec<DonationId>,
    received: Vec<DonationId>,
}

/// Arena holding a family tree and its donation history.
///
/// People and donations are addressed by index. Removing an entry leaves an
/// empty slot, so ids handed out earlier never point at someone else.
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    nodes: Vec<Option<Node>>,
    donations: Vec<Option<Donation>>,
}

impl FamilyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(
        &mut self,
        person: Person,
    ) -> PersonId {
        let id = PersonId(self.nodes.len());
        self.nodes.push(Some(Node {
            person,
            parents: Vec::new(),
            children: Vec::new(),
            given: Vec::new(),
            received: Vec::new(),
        }));
        id
    }

    fn node(
        &self,
        id: PersonId,
    ) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(
        &mut self,
        id: PersonId,
    ) -> Result<&mut Node, GraphError> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(GraphError::UnknownPerson(id))
    }

    fn require(
        &self,
        id: PersonId,
    ) -> Result<(), GraphError> {
        self.node(id).map(|_| ()).ok_or(GraphError::UnknownPerson(id))
    }

    pub fn person(
        &self,
        id: PersonId,
    ) -> Option<&Person> {
        self.node(id).map(|n| &n.person)
    }

    pub fn contains(
        &self,
        id: PersonId,
    ) -> bool {
        self.node(id).is_some()
    }

    /// Every live person, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| PersonId(i))
    }

    pub fn people_of(
        &self,
        owner: OwnerId,
    ) -> Vec<PersonId> {
        self.ids()
            .filter(|id| self.person(*id).is_some_and(|p| p.owner == owner))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ids().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // parent/child edges
    // =========================================================================

    pub fn parents(
        &self,
        id: PersonId,
    ) -> &[PersonId] {
        self.node(id).map(|n| n.parents.as_slice()).unwrap_or(&[])
    }

    pub fn children(
        &self,
        id: PersonId,
    ) -> &[PersonId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn is_parent_of(
        &self,
        parent: PersonId,
        child: PersonId,
    ) -> bool {
        self.children(parent).contains(&child)
    }

    /// Records `parent` as a parent of `child`. Linking twice is a no-op.
    pub fn link_parent(
        &mut self,
        parent: PersonId,
        child: PersonId,
    ) -> Result<(), GraphError> {
        if parent == child {
            return Err(GraphError::SelfParent(child));
        }
        self.require(parent)?;
        self.require(child)?;

        if self.is_parent_of(parent, child) {
            return Ok(());
        }

        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parents.push(parent);
        Ok(())
    }

    /// Removes the edge in both directions. Returns whether an edge existed.
    pub fn unlink_parent(
        &mut self,
        parent: PersonId,
        child: PersonId,
    ) -> Result<bool, GraphError> {
        self.require(parent)?;
        self.require(child)?;

        if !self.is_parent_of(parent, child) {
            return Ok(false);
        }

        self.node_mut(parent)?.children.retain(|c| *c != child);
        self.node_mut(child)?.parents.retain(|p| *p != parent);
        Ok(true)
    }

    // =========================================================================
    // donations
    // =========================================================================

    pub fn record_donation(
        &mut self,
        donation: NewDonation,
    ) -> Result<DonationId, GraphError> {
        self.require(donation.donor)?;
        self.require(donation.beneficiary)?;

        if donation.donor == donation.beneficiary {
            return Err(GraphError::SelfDonation(donation.donor));
        }
        if donation.amount < Decimal::ZERO {
            return Err(GraphError::NegativeAmount(donation.amount));
        }
        if donation.tax_paid < Decimal::ZERO {
            return Err(GraphError::NegativeTaxPaid(donation.tax_paid));
        }
        if donation.tax_paid > donation.amount {
            return Err(GraphError::TaxExceedsAmount {
                tax_paid: donation.tax_paid,
                amount: donation.amount,
            });
        }

        let id = DonationId(self.donations.len());
        let (donor, beneficiary) = (donation.donor, donation.beneficiary);
        self.donations.push(Some(donation.into_donation(id)));
        self.node_mut(donor)?.given.push(id);
        self.node_mut(beneficiary)?.received.push(id);

        debug!(donation = id.0, donor = donor.0, beneficiary = beneficiary.0, "donation recorded");
        Ok(id)
    }

    pub fn donation(
        &self,
        id: DonationId,
    ) -> Option<&Donation> {
        self.donations.get(id.0).and_then(Option::as_ref)
    }

    /// Every live donation, in recording order.
    pub fn donations(&self) -> impl Iterator<Item = &Donation> + '_ {
        self.donations.iter().filter_map(Option::as_ref)
    }

    pub fn donations_given(
        &self,
        id: PersonId,
    ) -> impl Iterator<Item = &Donation> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.given.iter())
            .filter_map(|d| self.donation(*d))
    }

    pub fn donations_received(
        &self,
        id: PersonId,
    ) -> impl Iterator<Item = &Donation> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.received.iter())
            .filter_map(|d| self.donation(*d))
    }

    /// Donations from `donor` to `beneficiary`, in that direction only.
    pub fn donations_between(
        &self,
        donor: PersonId,
        beneficiary: PersonId,
    ) -> Vec<&Donation> {
        self.donations_given(donor)
            .filter(|d| d.beneficiary == beneficiary)
            .collect()
    }

    pub fn remove_donation(
        &mut self,
        id: DonationId,
    ) -> Result<Donation, GraphError> {
        let donation = self
            .donations
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(GraphError::UnknownDonation(id))?;

        if let Ok(node) = self.node_mut(donation.donor) {
            node.given.retain(|d| *d != id);
        }
        if let Ok(node) = self.node_mut(donation.beneficiary) {
            node.received.retain(|d| *d != id);
        }
        Ok(donation)
    }

    /// Removes a person together with their edges and every donation they
    /// gave or received.
    pub fn remove_person(
        &mut self,
        id: PersonId,
    ) -> Result<Person, GraphError> {
        let node = self
            .nodes
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(GraphError::UnknownPerson(id))?;

        for parent in &node.parents {
            if let Ok(p) = self.node_mut(*parent) {
                p.children.retain(|c| *c != id);
            }
        }
        for child in &node.children {
            if let Ok(c) = self.node_mut(*child) {
                c.parents.retain(|p| *p != id);
            }
        }
        for donation in node.given.iter().chain(node.received.iter()) {
            // The other party's index still references it until removed here.
            let _ = self.remove_donation(*donation);
        }

        debug!(person = id.0, "person removed");
        Ok(node.person)
    }
}
