use std::fmt;

use serde::{Deserialize, Serialize};

/// Tax scheme a rule belongs to, and the scheme a recorded donation was
/// declared under.
///
/// The stable string codes are the ones used in configuration and CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxSystem {
    /// Standard allowance taxed on the direct-line schedule.
    ProgressifDirect,
    /// Allowance between brothers and sisters.
    FreresSoeurs,
    /// Allowance from an uncle or aunt to a nephew or niece.
    NeveuxNieces,
    /// Allowance for a disabled beneficiary.
    Handicap,
    /// Family cash-gift exemption, stacked on top of the standard allowance.
    #[serde(alias = "sarkozy")]
    DonFamilial,
    /// Catch-all for unrelated parties.
    Tiers,
}

/// Consumption bucket a scheme draws from.
///
/// Donations under the cash-gift exemption only eat into that exemption;
/// everything else shares the classic bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllowanceBucket {
    Bonus,
    Classic,
}

impl AllowanceBucket {
    /// Planner ranking: bonus schemes are used first.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Bonus => 1,
            Self::Classic => 2,
        }
    }
}

impl TaxSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProgressifDirect => "progressif_direct",
            Self::FreresSoeurs => "freres_soeurs",
            Self::NeveuxNieces => "neveux_nieces",
            Self::Handicap => "handicap",
            Self::DonFamilial => "don_familial",
            Self::Tiers => "tiers",
        }
    }

    /// Case-insensitive parse of a stable code. `sarkozy`, the tag older
    /// exports use for the cash-gift exemption, is read as `don_familial`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "progressif_direct" => Some(Self::ProgressifDirect),
            "freres_soeurs" => Some(Self::FreresSoeurs),
            "neveux_nieces" => Some(Self::NeveuxNieces),
            "handicap" => Some(Self::Handicap),
            "don_familial" | "sarkozy" => Some(Self::DonFamilial),
            "tiers" => Some(Self::Tiers),
            _ => None,
        }
    }

    pub fn bucket(&self) -> AllowanceBucket {
        match self {
            Self::DonFamilial => AllowanceBucket::Bonus,
            _ => AllowanceBucket::Classic,
        }
    }
}

impl fmt::Display for TaxSystem {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
