use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RelationshipCode;

/// Group of progressive schedules shared by several relationship codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketCategory {
    ProgressifDirect,
    FreresSoeurs,
    NeveuxNieces,
    Tiers,
}

impl BracketCategory {
    pub const ALL: [BracketCategory; 4] = [
        BracketCategory::ProgressifDirect,
        BracketCategory::FreresSoeurs,
        BracketCategory::NeveuxNieces,
        BracketCategory::Tiers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProgressifDirect => "progressif_direct",
            Self::FreresSoeurs => "freres_soeurs",
            Self::NeveuxNieces => "neveux_nieces",
            Self::Tiers => "tiers",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "progressif_direct" => Some(Self::ProgressifDirect),
            "freres_soeurs" => Some(Self::FreresSoeurs),
            "neveux_nieces" => Some(Self::NeveuxNieces),
            "tiers" => Some(Self::Tiers),
            _ => None,
        }
    }

    /// Schedule applied to a gift along `code`.
    pub fn for_relationship(code: RelationshipCode) -> Self {
        match code {
            RelationshipCode::Enfant
            | RelationshipCode::PetitEnfant
            | RelationshipCode::Conjoint
            | RelationshipCode::Handicap => Self::ProgressifDirect,
            RelationshipCode::FrereSoeur => Self::FreresSoeurs,
            RelationshipCode::NeveuNiece => Self::NeveuxNieces,
            _ => Self::Tiers,
        }
    }
}

impl fmt::Display for BracketCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slice of a progressive schedule. `amount_limit` is the upper bound of
/// the slice; `None` marks the unbounded last slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub category: BracketCategory,
    pub amount_limit: Option<Decimal>,
    pub rate: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn direct_line_codes_use_direct_schedule() {
        for code in [
            RelationshipCode::Enfant,
            RelationshipCode::PetitEnfant,
            RelationshipCode::Conjoint,
            RelationshipCode::Handicap,
        ] {
            assert_eq!(
                BracketCategory::for_relationship(code),
                BracketCategory::ProgressifDirect
            );
        }
    }

    #[test]
    fn collateral_codes_use_their_own_schedules() {
        assert_eq!(
            BracketCategory::for_relationship(RelationshipCode::FrereSoeur),
            BracketCategory::FreresSoeurs
        );
        assert_eq!(
            BracketCategory::for_relationship(RelationshipCode::NeveuNiece),
            BracketCategory::NeveuxNieces
        );
    }

    #[test]
    fn everything_else_falls_back_to_third_party_schedule() {
        for code in [
            RelationshipCode::ArrierePetitEnfant,
            RelationshipCode::Parent,
            RelationshipCode::GrandParent,
            RelationshipCode::OncleTante,
            RelationshipCode::Tiers,
        ] {
            assert_eq!(BracketCategory::for_relationship(code), BracketCategory::Tiers);
        }
    }
}
