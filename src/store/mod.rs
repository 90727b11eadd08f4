//! Record storage and relationship queries.

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::types::{Family, Individual, Xref};

/// Flat, decoded record set: individuals and families as they came out of
/// the decoder, with family-to-individual links still expressed as
/// identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Individuals in record order.
    pub individuals: Vec<Individual>,
    /// Families in record order.
    pub families: Vec<Family>,
}

impl RecordSet {
    /// Create an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an individual.
    pub fn add_individual(&mut self, individual: Individual) {
        self.individuals.push(individual);
    }

    /// Add a family.
    pub fn add_family(&mut self, family: Family) {
        self.families.push(family);
    }
}

/// Relationship queries over a resolved record graph.
///
/// Implementations must return results in family record order, and
/// children in the order their family lists them. The derived views
/// (`parents_of`, `children_of`, ...) are computed from the family
/// records on every call and never stored separately.
pub trait RelationshipIndex {
    /// Fetch an individual by ID.
    fn individual(&self, id: &Xref) -> Option<&Individual>;

    /// Fetch a family by ID.
    fn family(&self, id: &Xref) -> Option<&Family>;

    /// Families in which `id` is a child.
    fn parent_families(&self, id: &Xref) -> Vec<&Family>;

    /// Families in which `id` is a husband or wife.
    fn spouse_families(&self, id: &Xref) -> Vec<&Family>;

    /// The birth family followed during traversal: the first one in record order.
    fn parent_family(&self, id: &Xref) -> Option<&Family> {
        self.parent_families(id).into_iter().next()
    }

    /// Parents from the birth family (0-2), husband first.
    fn parents_of(&self, id: &Xref) -> Vec<&Individual> {
        self.parent_family(id)
            .map(|family| {
                family
                    .partners()
                    .filter_map(|p| self.individual(p))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Children over all spouse families, each listed once.
    fn children_of(&self, id: &Xref) -> Vec<&Individual> {
        let mut out: Vec<&Individual> = Vec::new();
        for family in self.spouse_families(id) {
            for child in family.children.iter().filter_map(|c| self.individual(c)) {
                if !out.iter().any(|seen| seen.id == child.id) {
                    out.push(child);
                }
            }
        }
        out
    }

    /// Partners over all spouse families, each listed once.
    fn spouses_of(&self, id: &Xref) -> Vec<&Individual> {
        let mut out: Vec<&Individual> = Vec::new();
        for family in self.spouse_families(id) {
            for partner in family.partners().filter(|p| *p != id) {
                if let Some(spouse) = self.individual(partner) {
                    if !out.iter().any(|seen| seen.id == spouse.id) {
                        out.push(spouse);
                    }
                }
            }
        }
        out
    }

    /// Other children of the birth family, excluding `id`, in family order.
    fn siblings_of(&self, id: &Xref) -> Vec<&Individual> {
        self.parent_family(id)
            .map(|family| {
                family
                    .children
                    .iter()
                    .filter(|c| *c != id)
                    .filter_map(|c| self.individual(c))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub use memory::{build_index, IndexError, RecordGraph};
