//! Fiscal relationship between an ordered donor/beneficiary pair.
//!
//! Checks run in a fixed order and the first match wins: descendants first
//! (closest generation first), then ascendants, then collaterals. When a
//! malformed tree makes two paths match, the earlier check decides.

use crate::FamilyGraph;
use crate::models::{PersonId, RelationshipCode};

/// Classifies the tie from `donor` to `beneficiary`.
///
/// The result for `donor == beneficiary` is not meaningful; callers reject
/// self-pairs before reaching the engine.
pub fn classify(
    graph: &FamilyGraph,
    donor: PersonId,
    beneficiary: PersonId,
) -> RelationshipCode {
    if graph.is_parent_of(donor, beneficiary) {
        return RelationshipCode::Enfant;
    }
    if graph.grandchildren(donor).contains(&beneficiary) {
        return RelationshipCode::PetitEnfant;
    }
    if graph.great_grandchildren(donor).contains(&beneficiary) {
        return RelationshipCode::ArrierePetitEnfant;
    }
    if graph.is_parent_of(beneficiary, donor) {
        return RelationshipCode::Parent;
    }
    if graph.grandparents(donor).contains(&beneficiary) {
        return RelationshipCode::GrandParent;
    }
    if graph.share_a_parent(donor, beneficiary) {
        return RelationshipCode::FrereSoeur;
    }
    if graph.nephews_and_nieces(donor).contains(&beneficiary) {
        return RelationshipCode::NeveuNiece;
    }
    if graph.nephews_and_nieces(beneficiary).contains(&donor) {
        return RelationshipCode::OncleTante;
    }
    RelationshipCode::Tiers
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{FamilyBuilder, date};

    struct Tree {
        graph: FamilyGraph,
        robert: PersonId,
        jean: PersonId,
        sophie: PersonId,
        marc: PersonId,
        hugo: PersonId,
        theo: PersonId,
        stranger: PersonId,
    }

    fn tree() -> Tree {
        let mut b = FamilyBuilder::new();
        let robert = b.person("Robert", date(1945, 5, 12));
        let jean = b.person("Jean", date(1972, 10, 25));
        let sophie = b.person("Sophie", date(1975, 4, 9));
        let marc = b.person("Marc", date(2002, 1, 10));
        let hugo = b.person("Hugo", date(2004, 2, 1));
        let theo = b.person("Théo", date(2024, 9, 30));
        let stranger = b.person("Paul", date(1980, 1, 1));
        b.link(robert, jean);
        b.link(robert, sophie);
        b.link(jean, marc);
        b.link(sophie, hugo);
        b.link(marc, theo);
        Tree {
            graph: b.build(),
            robert,
            jean,
            sophie,
            marc,
            hugo,
            theo,
            stranger,
        }
    }

    #[test]
    fn descending_line() {
        let t = tree();

        assert_eq!(classify(&t.graph, t.jean, t.marc), RelationshipCode::Enfant);
        assert_eq!(classify(&t.graph, t.robert, t.marc), RelationshipCode::PetitEnfant);
        assert_eq!(
            classify(&t.graph, t.robert, t.theo),
            RelationshipCode::ArrierePetitEnfant
        );
    }

    #[test]
    fn ascending_line() {
        let t = tree();

        assert_eq!(classify(&t.graph, t.marc, t.jean), RelationshipCode::Parent);
        assert_eq!(classify(&t.graph, t.marc, t.robert), RelationshipCode::GrandParent);
    }

    #[test]
    fn great_grandparent_is_a_third_party() {
        let t = tree();

        assert_eq!(classify(&t.graph, t.theo, t.robert), RelationshipCode::Tiers);
    }

    #[test]
    fn collateral_lines() {
        let t = tree();

        assert_eq!(classify(&t.graph, t.jean, t.sophie), RelationshipCode::FrereSoeur);
        assert_eq!(classify(&t.graph, t.sophie, t.marc), RelationshipCode::NeveuNiece);
        assert_eq!(classify(&t.graph, t.marc, t.sophie), RelationshipCode::OncleTante);
    }

    #[test]
    fn cousins_and_strangers_are_third_parties() {
        let t = tree();

        assert_eq!(classify(&t.graph, t.marc, t.hugo), RelationshipCode::Tiers);
        assert_eq!(classify(&t.graph, t.stranger, t.marc), RelationshipCode::Tiers);
    }

    #[test]
    fn parent_child_pairs_classify_in_exactly_one_direction_each() {
        let t = tree();

        for (parent, child) in [(t.robert, t.jean), (t.jean, t.marc), (t.marc, t.theo)] {
            assert_eq!(classify(&t.graph, parent, child), RelationshipCode::Enfant);
            assert_eq!(classify(&t.graph, child, parent), RelationshipCode::Parent);
        }
    }

    #[test]
    fn closer_generation_wins_when_two_paths_match() {
        // Robert is both Léa's parent and, through Jean, her grandparent.
        let mut b = FamilyBuilder::new();
        let robert = b.person("Robert", date(1945, 5, 12));
        let jean = b.person("Jean", date(1965, 1, 1));
        let lea = b.person("Léa", date(1990, 1, 1));
        b.link(robert, jean);
        b.link(jean, lea);
        b.link(robert, lea);
        let graph = b.build();

        assert_eq!(classify(&graph, robert, lea), RelationshipCode::Enfant);
        assert_eq!(classify(&graph, lea, robert), RelationshipCode::Parent);
    }

    #[test]
    fn child_wins_over_sibling_when_both_match() {
        // Jean and Luc share Robert as a parent; Luc is also a child of Jean.
        let mut b = FamilyBuilder::new();
        let robert = b.person("Robert", date(1945, 5, 12));
        let jean = b.person("Jean", date(1965, 1, 1));
        let luc = b.person("Luc", date(1990, 1, 1));
        b.link(robert, jean);
        b.link(robert, luc);
        b.link(jean, luc);
        let graph = b.build();

        assert_eq!(classify(&graph, jean, luc), RelationshipCode::Enfant);
        assert_eq!(classify(&graph, luc, jean), RelationshipCode::Parent);
    }

    #[test]
    fn half_siblings_are_siblings() {
        let mut b = FamilyBuilder::new();
        let anne = b.person("Anne", date(1960, 1, 1));
        let emma = b.person("Emma", date(1985, 1, 1));
        let nina = b.person("Nina", date(1990, 1, 1));
        b.link(anne, emma);
        b.link(anne, nina);
        let graph = b.build();

        assert_eq!(classify(&graph, emma, nina), RelationshipCode::FrereSoeur);
    }
}
