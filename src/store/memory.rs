//! In-memory record graph and the index builder that produces it.

use std::collections::BTreeMap;
use tracing::{info, warn};

use super::{RecordSet, RelationshipIndex};
use crate::types::{Family, Individual, ReferenceRole, Xref};

/// Error type for index construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// A family refers to an individual that is not in the record set.
    #[error("Family {family} references unknown individual {individual} as {role}")]
    DanglingReference {
        /// Offending family.
        family: Xref,
        /// Role of the broken reference.
        role: ReferenceRole,
        /// Identifier that did not resolve.
        individual: Xref,
    },
}

/// Resolved, read-only record graph.
///
/// Uses BTreeMap for lookups and keeps record order alongside, so every
/// query is deterministic. Individuals carry their family links; those
/// links are derived from the family records during [`build_index`] and
/// are never edited afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordGraph {
    /// Individuals by ID.
    individuals: BTreeMap<Xref, Individual>,
    /// Families by ID.
    families: BTreeMap<Xref, Family>,
    /// Individual IDs in record order.
    individual_order: Vec<Xref>,
    /// Family IDs in record order.
    family_order: Vec<Xref>,
}

/// Build a [`RecordGraph`] from a decoded record set.
///
/// Every husband/wife/child reference must name a known individual;
/// otherwise construction stops with [`IndexError::DanglingReference`]
/// and no graph is returned. When an identifier is used twice, the first
/// record wins.
pub fn build_index(records: RecordSet) -> Result<RecordGraph, IndexError> {
    RecordGraph::build(records)
}

impl RecordGraph {
    /// Build the graph from a record set. See [`build_index`].
    pub fn build(records: RecordSet) -> Result<Self, IndexError> {
        let RecordSet { individuals: input_individuals, families: input_families } = records;

        let mut individuals = BTreeMap::new();
        let mut individual_order = Vec::with_capacity(input_individuals.len());
        for mut individual in input_individuals {
            if individuals.contains_key(&individual.id) {
                warn!(id = %individual.id, "duplicate individual identifier, keeping the first record");
                continue;
            }
            // Links are rebuilt from the family records below
            individual.child_in.clear();
            individual.spouse_in.clear();
            individual_order.push(individual.id.clone());
            individuals.insert(individual.id.clone(), individual);
        }

        let mut families = BTreeMap::new();
        let mut family_order = Vec::with_capacity(input_families.len());
        for family in input_families {
            if families.contains_key(&family.id) {
                warn!(id = %family.id, "duplicate family identifier, keeping the first record");
                continue;
            }
            if let Some((role, missing)) = family
                .references()
                .find(|(_, id)| !individuals.contains_key(*id))
            {
                return Err(IndexError::DanglingReference {
                    family: family.id.clone(),
                    role,
                    individual: missing.clone(),
                });
            }
            family_order.push(family.id.clone());
            families.insert(family.id.clone(), family);
        }

        for family_id in &family_order {
            let family = &families[family_id];
            for (role, member) in family.references() {
                // Every reference was checked above
                let Some(individual) = individuals.get_mut(member) else {
                    continue;
                };
                let links = match role {
                    ReferenceRole::Husband | ReferenceRole::Wife => &mut individual.spouse_in,
                    ReferenceRole::Child => &mut individual.child_in,
                };
                if !links.contains(family_id) {
                    links.push(family_id.clone());
                }
            }
        }

        info!(
            individuals = individual_order.len(),
            families = family_order.len(),
            "record graph built"
        );

        Ok(Self {
            individuals,
            families,
            individual_order,
            family_order,
        })
    }

    /// Individuals in record order.
    pub fn individuals(&self) -> impl Iterator<Item = &Individual> {
        self.individual_order
            .iter()
            .filter_map(|id| self.individuals.get(id))
    }

    /// Families in record order.
    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.family_order.iter().filter_map(|id| self.families.get(id))
    }

    /// Get number of individuals.
    pub fn num_individuals(&self) -> usize {
        self.individuals.len()
    }

    /// Get number of families.
    pub fn num_families(&self) -> usize {
        self.families.len()
    }

    /// Whether an individual with this ID exists.
    pub fn contains(&self, id: &Xref) -> bool {
        self.individuals.contains_key(id)
    }

    fn resolve<'a>(&'a self, ids: &'a [Xref]) -> Vec<&'a Family> {
        ids.iter().filter_map(|id| self.families.get(id)).collect()
    }
}

impl RelationshipIndex for RecordGraph {
    fn individual(&self, id: &Xref) -> Option<&Individual> {
        self.individuals.get(id)
    }

    fn family(&self, id: &Xref) -> Option<&Family> {
        self.families.get(id)
    }

    fn parent_families(&self, id: &Xref) -> Vec<&Family> {
        self.individuals
            .get(id)
            .map(|i| self.resolve(&i.child_in))
            .unwrap_or_default()
    }

    fn spouse_families(&self, id: &Xref) -> Vec<&Family> {
        self.individuals
            .get(id)
            .map(|i| self.resolve(&i.spouse_in))
            .unwrap_or_default()
    }
}
