use std::collections::BTreeMap;

use crate::config::ConfigError;
use crate::models::{DonationRule, Relationship, RelationshipCode, TaxSystem};

/// Read access to the allowance rules, keyed by relationship.
pub trait RuleRepository: Send + Sync {
    fn relationship(
        &self,
        code: RelationshipCode,
    ) -> Option<&Relationship>;

    /// Every rule attached to `code`; empty when the relationship is unknown.
    fn rules_for(
        &self,
        code: RelationshipCode,
    ) -> &[DonationRule] {
        self.relationship(code)
            .map(|r| r.rules.as_slice())
            .unwrap_or(&[])
    }

    /// The rule a donation declared under `tax_system` falls under.
    fn rule_for(
        &self,
        code: RelationshipCode,
        tax_system: TaxSystem,
    ) -> Option<&DonationRule> {
        self.rules_for(code)
            .iter()
            .find(|rule| rule.tax_system == tax_system)
    }
}

/// In-memory rule catalogue built once from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleBook {
    relationships: BTreeMap<RelationshipCode, Relationship>,
}

impl RuleBook {
    /// # Errors
    ///
    /// [`ConfigError::DuplicateRelationship`] when a code appears twice.
    pub fn new(relationships: Vec<Relationship>) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for relationship in relationships {
            let code = relationship.code;
            if map.insert(code, relationship).is_some() {
                return Err(ConfigError::DuplicateRelationship(code));
            }
        }
        Ok(Self { relationships: map })
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> + '_ {
        self.relationships.values()
    }
}

impl RuleRepository for RuleBook {
    fn relationship(
        &self,
        code: RelationshipCode,
    ) -> Option<&Relationship> {
        self.relationships.get(&code)
    }
}
