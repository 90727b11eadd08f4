//! Family types for the record graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::individual::Xref;

/// Role under which a family refers to an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReferenceRole {
    /// `HUSB` reference.
    Husband,
    /// `WIFE` reference.
    Wife,
    /// `CHIL` reference.
    Child,
}

impl fmt::Display for ReferenceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Husband => write!(f, "husband"),
            Self::Wife => write!(f, "wife"),
            Self::Child => write!(f, "child"),
        }
    }
}

/// A family: up to two partners and their children.
///
/// Children keep source record order, which drives sibling and
/// descendant ordering in the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    /// Unique identifier.
    pub id: Xref,
    /// Husband, if recorded.
    pub husband: Option<Xref>,
    /// Wife, if recorded.
    pub wife: Option<Xref>,
    /// Children in record order.
    pub children: Vec<Xref>,
}

impl Family {
    /// Create an empty family.
    pub fn new(id: impl Into<Xref>) -> Self {
        Self {
            id: id.into(),
            husband: None,
            wife: None,
            children: Vec::new(),
        }
    }

    /// Set the husband.
    pub fn with_husband(mut self, id: impl Into<Xref>) -> Self {
        self.husband = Some(id.into());
        self
    }

    /// Set the wife.
    pub fn with_wife(mut self, id: impl Into<Xref>) -> Self {
        self.wife = Some(id.into());
        self
    }

    /// Append a child.
    pub fn with_child(mut self, id: impl Into<Xref>) -> Self {
        self.children.push(id.into());
        self
    }

    /// Partners in husband, wife order.
    pub fn partners(&self) -> impl Iterator<Item = &Xref> {
        self.husband.iter().chain(self.wife.iter())
    }

    /// Every reference this family makes, with its role, in record order.
    pub fn references(&self) -> impl Iterator<Item = (ReferenceRole, &Xref)> {
        self.husband
            .iter()
            .map(|id| (ReferenceRole::Husband, id))
            .chain(self.wife.iter().map(|id| (ReferenceRole::Wife, id)))
            .chain(self.children.iter().map(|id| (ReferenceRole::Child, id)))
    }

    /// Whether `id` is a partner in this family.
    pub fn has_partner(&self, id: &Xref) -> bool {
        self.partners().any(|p| p == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_in_record_order() {
        let family = Family::new("F1")
            .with_wife("I2")
            .with_husband("I1")
            .with_child("I4")
            .with_child("I3");

        let refs: Vec<_> = family
            .references()
            .map(|(role, id)| (role, id.as_str().to_string()))
            .collect();

        assert_eq!(
            refs,
            vec![
                (ReferenceRole::Husband, "I1".to_string()),
                (ReferenceRole::Wife, "I2".to_string()),
                (ReferenceRole::Child, "I4".to_string()),
                (ReferenceRole::Child, "I3".to_string()),
            ]
        );
    }

    #[test]
    fn test_partners_skip_missing() {
        let family = Family::new("F1").with_wife("I2");
        let partners: Vec<_> = family.partners().collect();
        assert_eq!(partners, vec![&Xref::new("I2")]);
        assert!(family.has_partner(&Xref::new("I2")));
        assert!(!family.has_partner(&Xref::new("I1")));
    }
}
