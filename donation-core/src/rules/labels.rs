use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Gender, RelationshipCode};

/// Display labels for one relationship code, per gender of the relative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderedLabel {
    pub code: RelationshipCode,
    pub male: Option<String>,
    pub female: Option<String>,
    pub other: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelBook {
    labels: HashMap<RelationshipCode, GenderedLabel>,
}

impl LabelBook {
    pub fn new(labels: Vec<GenderedLabel>) -> Self {
        Self {
            labels: labels.into_iter().map(|l| (l.code, l)).collect(),
        }
    }

    /// Gendered label for `code`, falling back to the neutral label and
    /// then to the raw code.
    pub fn label_for(
        &self,
        code: RelationshipCode,
        gender: Gender,
    ) -> String {
        let Some(entry) = self.labels.get(&code) else {
            return code.as_str().to_string();
        };

        let gendered = match gender {
            Gender::Male => entry.male.as_ref(),
            Gender::Female => entry.female.as_ref(),
            Gender::Other => None,
        };

        gendered
            .or(entry.other.as_ref())
            .cloned()
            .unwrap_or_else(|| code.as_str().to_string())
    }
}
