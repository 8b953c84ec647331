use std::fmt;

use serde::{Deserialize, Serialize};

/// Fiscal family tie between a donor and a beneficiary, read in the
/// donor-to-beneficiary direction (`Enfant` means the beneficiary is the
/// donor's child).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipCode {
    Enfant,
    PetitEnfant,
    ArrierePetitEnfant,
    Parent,
    GrandParent,
    FrereSoeur,
    NeveuNiece,
    OncleTante,
    Conjoint,
    Handicap,
    Tiers,
}

impl RelationshipCode {
    /// Codes the family planner considers: donor-to-descendant flows only.
    pub const DESCENDING: [RelationshipCode; 3] = [
        RelationshipCode::Enfant,
        RelationshipCode::PetitEnfant,
        RelationshipCode::ArrierePetitEnfant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enfant => "ENFANT",
            Self::PetitEnfant => "PETIT_ENFANT",
            Self::ArrierePetitEnfant => "ARRIERE_PETIT_ENFANT",
            Self::Parent => "PARENT",
            Self::GrandParent => "GRAND_PARENT",
            Self::FrereSoeur => "FRERE_SOEUR",
            Self::NeveuNiece => "NEVEU_NIECE",
            Self::OncleTante => "ONCLE_TANTE",
            Self::Conjoint => "CONJOINT",
            Self::Handicap => "HANDICAP",
            Self::Tiers => "TIERS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ENFANT" => Some(Self::Enfant),
            "PETIT_ENFANT" => Some(Self::PetitEnfant),
            "ARRIERE_PETIT_ENFANT" => Some(Self::ArrierePetitEnfant),
            "PARENT" => Some(Self::Parent),
            "GRAND_PARENT" => Some(Self::GrandParent),
            "FRERE_SOEUR" => Some(Self::FrereSoeur),
            "NEVEU_NIECE" => Some(Self::NeveuNiece),
            "ONCLE_TANTE" => Some(Self::OncleTante),
            "CONJOINT" => Some(Self::Conjoint),
            "HANDICAP" => Some(Self::Handicap),
            "TIERS" => Some(Self::Tiers),
            _ => None,
        }
    }

    pub fn is_descending(&self) -> bool {
        Self::DESCENDING.contains(self)
    }
}

impl fmt::Display for RelationshipCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_round_trips_every_code() {
        let all = [
            RelationshipCode::Enfant,
            RelationshipCode::PetitEnfant,
            RelationshipCode::ArrierePetitEnfant,
            RelationshipCode::Parent,
            RelationshipCode::GrandParent,
            RelationshipCode::FrereSoeur,
            RelationshipCode::NeveuNiece,
            RelationshipCode::OncleTante,
            RelationshipCode::Conjoint,
            RelationshipCode::Handicap,
            RelationshipCode::Tiers,
        ];

        for code in all {
            assert_eq!(RelationshipCode::parse(code.as_str()), Some(code));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_lowercase_codes() {
        assert_eq!(RelationshipCode::parse("COUSIN"), None);
        assert_eq!(RelationshipCode::parse("enfant"), None);
    }

    #[test]
    fn only_descendant_codes_are_descending() {
        assert!(RelationshipCode::Enfant.is_descending());
        assert!(RelationshipCode::ArrierePetitEnfant.is_descending());
        assert!(!RelationshipCode::Parent.is_descending());
        assert!(!RelationshipCode::NeveuNiece.is_descending());
    }
}
