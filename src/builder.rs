//! Bounded sandclock tree builder.
//!
//! Expands around a root individual in both directions: parents upward,
//! children downward, each bounded by its own generation limit.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::policy::{EffectiveLimits, GenerationLimit, NaturalDepths, TreeConfig};
use crate::store::RelationshipIndex;
use crate::types::{Family, Individual, NodeRole, TreeNode, Xref};

/// Error type for tree building.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The requested root is not in the record graph.
    #[error("Root individual not found: {0}")]
    UnknownRootIdentifier(Xref),
}

/// Build a sandclock tree around `root` with a one-off builder.
pub fn build_tree<'g, S: RelationshipIndex>(
    graph: &'g S,
    root: &Xref,
    config: &TreeConfig,
) -> Result<TreeNode<'g>, BuildError> {
    TreeBuilder::new(graph, config.clone()).build(root)
}

/// Identifiers on the path from the root to the node being expanded.
///
/// Scoped to the current path, not the whole tree: the same person may
/// appear on unrelated branches, but never twice on one path.
struct PathGuard<'g> {
    on_path: HashSet<&'g Xref>,
}

impl<'g> PathGuard<'g> {
    fn new(root: &'g Xref) -> Self {
        let mut on_path = HashSet::new();
        on_path.insert(root);
        Self { on_path }
    }

    /// Step onto `id`. Returns false if it is already on the path.
    fn enter(&mut self, id: &'g Xref) -> bool {
        self.on_path.insert(id)
    }

    fn leave(&mut self, id: &Xref) {
        self.on_path.remove(id);
    }

    fn contains(&self, id: &Xref) -> bool {
        self.on_path.contains(id)
    }
}

/// Bounded sandclock tree builder.
///
/// ## Algorithm
///
/// 1. Resolve the root; fail with `UnknownRootIdentifier` if absent
/// 2. Work out effective limits (redistributing slack if dynamic limits are on)
/// 3. Ancestors: follow the first birth family upward; every expanded
///    ancestor gets its parents and, if enabled, its siblings
/// 4. Root siblings, if enabled
/// 5. Descendants: per spouse family, the spouse then the children,
///    recursing into each child
///
/// A link that leads back to someone already on the current path is
/// dropped, so traversal always terminates on cyclic input.
///
/// The record graph is only read, so one builder (or many) can build
/// trees for any number of roots.
pub struct TreeBuilder<'g, S: RelationshipIndex> {
    graph: &'g S,
    config: TreeConfig,
}

impl<'g, S: RelationshipIndex> TreeBuilder<'g, S> {
    /// Create a new builder over a record graph.
    pub fn new(graph: &'g S, config: TreeConfig) -> Self {
        Self { graph, config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Build the sandclock tree around `root_id`.
    pub fn build(&self, root_id: &Xref) -> Result<TreeNode<'g>, BuildError> {
        let root = self
            .graph
            .individual(root_id)
            .ok_or_else(|| BuildError::UnknownRootIdentifier(root_id.clone()))?;

        let limits = self.effective_limits(root);
        debug!(
            root = %root.id,
            ancestors = %limits.ancestors,
            descendants = %limits.descendants,
            "building sandclock tree"
        );

        let birth_family = self.birth_family(root);
        let mut tree = TreeNode::new(NodeRole::Root, root, 0, birth_family.map(|f| &f.id));
        let mut path = PathGuard::new(&root.id);

        if let Some(family) = birth_family {
            if limits.ancestors.allows(1) {
                self.attach_parents(&mut tree, family, 1, limits.ancestors, &mut path);
            }
            // Root siblings do not depend on the ancestor limit
            if self.config.include_siblings {
                self.attach_siblings(&mut tree, family, &path);
            }
        }

        self.attach_descendants(&mut tree, 0, limits.descendants, &mut path);

        Ok(tree)
    }

    /// Limits applied for `root`, after dynamic redistribution if enabled.
    pub fn effective_limits(&self, root: &'g Individual) -> EffectiveLimits {
        let ancestors = self.config.max_ancestor_generations;
        let descendants = self.config.max_descendant_generations;

        if !self.config.dynamic_generation_limits
            || ancestors.is_unlimited()
            || descendants.is_unlimited()
        {
            return EffectiveLimits::fixed(ancestors, descendants);
        }

        let natural = self.natural_depths(root);
        let limits = EffectiveLimits::redistribute(ancestors, descendants, natural);
        debug!(
            natural_ancestors = natural.ancestors,
            natural_descendants = natural.descendants,
            "redistributed generation limits"
        );
        limits
    }

    /// Generations the graph reaches around `root` with no limits applied.
    pub fn natural_depths(&self, root: &'g Individual) -> NaturalDepths {
        let mut path = PathGuard::new(&root.id);
        NaturalDepths {
            ancestors: self.natural_ancestor_depth(root, &mut path),
            descendants: self.natural_descendant_depth(root, &mut path),
        }
    }

    fn natural_ancestor_depth(&self, individual: &'g Individual, path: &mut PathGuard<'g>) -> u32 {
        let Some(family) = self.graph.parent_family(&individual.id) else {
            return 0;
        };

        let mut deepest = 0;
        for parent in self.partners(family) {
            if !path.enter(&parent.id) {
                continue;
            }
            deepest = deepest.max(1 + self.natural_ancestor_depth(parent, path));
            path.leave(&parent.id);
        }
        deepest
    }

    fn natural_descendant_depth(&self, individual: &'g Individual, path: &mut PathGuard<'g>) -> u32 {
        let mut deepest = 0;
        for family in self.graph.spouse_families(&individual.id) {
            for child in self.children(family) {
                if !path.enter(&child.id) {
                    continue;
                }
                deepest = deepest.max(1 + self.natural_descendant_depth(child, path));
                path.leave(&child.id);
            }
        }
        deepest
    }

    /// Birth family followed upward: the first in record order.
    fn birth_family(&self, individual: &'g Individual) -> Option<&'g Family> {
        let families = self.graph.parent_families(&individual.id);
        if families.len() > 1 {
            warn!(
                id = %individual.id,
                count = families.len(),
                chosen = %families[0].id,
                "multiple birth families, following the first"
            );
        }
        families.into_iter().next()
    }

    fn partners(&self, family: &'g Family) -> Vec<&'g Individual> {
        family
            .partners()
            .filter_map(|id| self.graph.individual(id))
            .collect()
    }

    fn children(&self, family: &'g Family) -> Vec<&'g Individual> {
        family
            .children
            .iter()
            .filter_map(|id| self.graph.individual(id))
            .collect()
    }

    /// Add the partners of `family` as ancestors `generation` steps up.
    fn attach_parents(
        &self,
        node: &mut TreeNode<'g>,
        family: &'g Family,
        generation: u32,
        limit: GenerationLimit,
        path: &mut PathGuard<'g>,
    ) {
        for parent in self.partners(family) {
            if !path.enter(&parent.id) {
                debug!(id = %parent.id, family = %family.id, "ancestor already on path, not expanding");
                continue;
            }
            let parent_node = self.ancestor_node(parent, family, generation, limit, path);
            path.leave(&parent.id);
            node.children.push(parent_node);
        }
    }

    fn ancestor_node(
        &self,
        individual: &'g Individual,
        via: &'g Family,
        generation: u32,
        limit: GenerationLimit,
        path: &mut PathGuard<'g>,
    ) -> TreeNode<'g> {
        let mut node = TreeNode::new(
            NodeRole::Ancestor,
            individual,
            -(generation as i32),
            Some(&via.id),
        );

        // Siblings hang in the same family block as the parents, so both
        // need the next generation to be in range
        if !limit.allows(generation + 1) {
            return node;
        }
        if let Some(family) = self.birth_family(individual) {
            self.attach_parents(&mut node, family, generation + 1, limit, path);
            if self.config.include_ancestor_siblings {
                self.attach_siblings(&mut node, family, path);
            }
        }
        node
    }

    /// Add the other children of `family` as sibling leaves of `node`.
    fn attach_siblings(&self, node: &mut TreeNode<'g>, family: &'g Family, path: &PathGuard<'g>) {
        let depth = node.depth;
        let mut seen: Vec<&Xref> = Vec::new();

        for sibling in self.graph.siblings_of(&node.individual.id) {
            if path.contains(&sibling.id) || seen.contains(&&sibling.id) {
                continue;
            }
            seen.push(&sibling.id);
            node.children
                .push(TreeNode::new(NodeRole::Sibling, sibling, depth, Some(&family.id)));
        }
    }

    /// Add spouses and children of `node`, `generation` steps below the root.
    fn attach_descendants(
        &self,
        node: &mut TreeNode<'g>,
        generation: u32,
        limit: GenerationLimit,
        path: &mut PathGuard<'g>,
    ) {
        if !limit.allows(generation + 1) {
            return;
        }
        let individual = node.individual;
        let depth = generation as i32;

        for family in self.graph.spouse_families(&individual.id) {
            for spouse in self.partners(family) {
                if spouse.id == individual.id {
                    continue;
                }
                if path.contains(&spouse.id) {
                    debug!(id = %spouse.id, family = %family.id, "spouse already on path, skipping");
                    continue;
                }
                node.children
                    .push(TreeNode::new(NodeRole::Spouse, spouse, depth, Some(&family.id)));
            }

            for child in self.children(family) {
                if !path.enter(&child.id) {
                    debug!(id = %child.id, family = %family.id, "descendant already on path, not expanding");
                    continue;
                }
                let mut child_node =
                    TreeNode::new(NodeRole::Descendant, child, depth + 1, Some(&family.id));
                self.attach_descendants(&mut child_node, generation + 1, limit, path);
                path.leave(&child.id);
                node.children.push(child_node);
            }
        }
    }
}
