//! Derived relatives computed from the parent/child edges.
//!
//! Each query walks a fixed number of generations. The walks never revisit
//! the starting person and deduplicate by id, so a malformed graph that
//! contains a cycle still terminates; the cycle is logged and the origin is
//! left out of the result.

use tracing::warn;

use super::FamilyGraph;
use crate::models::PersonId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

fn push_unique(
    out: &mut Vec<PersonId>,
    id: PersonId,
) {
    if !out.contains(&id) {
        out.push(id);
    }
}

impl FamilyGraph {
    fn step(
        &self,
        id: PersonId,
        direction: Direction,
    ) -> &[PersonId] {
        match direction {
            Direction::Up => self.parents(id),
            Direction::Down => self.children(id),
        }
    }

    /// People exactly `depth` generations away from `origin`. Callers only
    /// ask for two or three generations.
    fn generation(
        &self,
        origin: PersonId,
        depth: usize,
        direction: Direction,
    ) -> Vec<PersonId> {
        let mut frontier = vec![origin];
        for _ in 0..depth {
            let mut next = Vec::new();
            for id in &frontier {
                for relative in self.step(*id, direction) {
                    if *relative == origin {
                        warn!(person = origin.0, "genealogy cycle detected");
                        continue;
                    }
                    push_unique(&mut next, *relative);
                }
            }
            frontier = next;
        }
        frontier
    }

    pub fn grandparents(
        &self,
        id: PersonId,
    ) -> Vec<PersonId> {
        self.generation(id, 2, Direction::Up)
    }

    pub fn great_grandparents(
        &self,
        id: PersonId,
    ) -> Vec<PersonId> {
        self.generation(id, 3, Direction::Up)
    }

    pub fn grandchildren(
        &self,
        id: PersonId,
    ) -> Vec<PersonId> {
        self.generation(id, 2, Direction::Down)
    }

    pub fn great_grandchildren(
        &self,
        id: PersonId,
    ) -> Vec<PersonId> {
        self.generation(id, 3, Direction::Down)
    }

    /// Children of any of `id`'s parents, half-siblings included.
    pub fn siblings(
        &self,
        id: PersonId,
    ) -> Vec<PersonId> {
        let mut out = Vec::new();
        for parent in self.parents(id) {
            for child in self.children(*parent) {
                if *child != id {
                    push_unique(&mut out, *child);
                }
            }
        }
        out
    }

    pub fn uncles_and_aunts(
        &self,
        id: PersonId,
    ) -> Vec<PersonId> {
        let mut out = Vec::new();
        for parent in self.parents(id) {
            for relative in self.siblings(*parent) {
                if relative != id {
                    push_unique(&mut out, relative);
                }
            }
        }
        out
    }

    pub fn nephews_and_nieces(
        &self,
        id: PersonId,
    ) -> Vec<PersonId> {
        let mut out = Vec::new();
        for sibling in self.siblings(id) {
            for child in self.children(sibling) {
                if *child != id {
                    push_unique(&mut out, *child);
                }
            }
        }
        out
    }

    /// True when `a` and `b` have at least one parent in common.
    pub fn share_a_parent(
        &self,
        a: PersonId,
        b: PersonId,
    ) -> bool {
        self.parents(a)
            .iter()
            .any(|parent| self.parents(b).contains(parent))
    }
}
