//! Bounded sandclock tree produced by the tree builder.
//!
//! A [`TreeNode`] tree is built fresh for one root and one configuration,
//! borrows the individuals it shows from the record graph, and is thrown
//! away after rendering.
//!
//! ## Shape
//!
//! ```text
//!                 Ancestor(-2) Ancestor(-2) Sibling(-1)
//!                        \        |        /
//!   Ancestor(-1)          Ancestor(-1)          Sibling(0)
//!             \           /                    /
//!              ---------- Root(0) -------------
//!                        /       \
//!              Spouse(0)          Descendant(1) ...
//! ```
//!
//! Ancestor nodes hold their parents and siblings as children; descendant
//! nodes (and the root) hold one group per spouse family: the spouse
//! first, then that family's children. Every node records the family that
//! links it to the node it hangs under.

use serde::{Serialize, Serializer};
use std::fmt;

use super::individual::{Individual, Xref};
use crate::canonical::canonical_hash_hex;

/// Role of a node in the sandclock tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeRole {
    /// The proband the tree is built around.
    Root,
    /// A parent, grandparent, ... of the root.
    Ancestor,
    /// A child, grandchild, ... of the root.
    Descendant,
    /// Partner of the root or of a descendant. Always a leaf.
    Spouse,
    /// Sibling of the root or of an ancestor. Always a leaf.
    Sibling,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Ancestor => write!(f, "ancestor"),
            Self::Descendant => write!(f, "descendant"),
            Self::Spouse => write!(f, "spouse"),
            Self::Sibling => write!(f, "sibling"),
        }
    }
}

/// One rendered position in the sandclock tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<'g> {
    /// Role of this position.
    pub role: NodeRole,
    /// Individual shown at this position.
    #[serde(rename = "id", serialize_with = "serialize_individual_id")]
    pub individual: &'g Individual,
    /// Generation relative to the root: negative above, positive below.
    pub depth: i32,
    /// Family linking this node to the node it hangs under. For the root
    /// this is the family it was born into.
    pub family: Option<&'g Xref>,
    /// Child positions in traversal order.
    pub children: Vec<TreeNode<'g>>,
}

fn serialize_individual_id<S: Serializer>(
    individual: &&Individual,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    individual.id.serialize(serializer)
}

impl<'g> TreeNode<'g> {
    /// Create a leaf node.
    pub fn new(
        role: NodeRole,
        individual: &'g Individual,
        depth: i32,
        family: Option<&'g Xref>,
    ) -> Self {
        Self {
            role,
            individual,
            depth,
            family,
            children: Vec::new(),
        }
    }

    /// Identifier of the individual at this position.
    pub fn id(&self) -> &'g Xref {
        &self.individual.id
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Children with the given role, in order.
    pub fn children_with_role(&self, role: NodeRole) -> impl Iterator<Item = &TreeNode<'g>> {
        self.children.iter().filter(move |c| c.role == role)
    }

    /// Pre-order iterator over this node and all its descendants.
    pub fn iter(&self) -> TreeIter<'_, 'g> {
        TreeIter { stack: vec![self] }
    }

    /// Total number of nodes in this tree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of ancestor generations present (0 if none).
    pub fn ancestor_generations(&self) -> u32 {
        self.iter()
            .filter(|n| n.role == NodeRole::Ancestor)
            .map(|n| n.depth.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Number of descendant generations present (0 if none).
    pub fn descendant_generations(&self) -> u32 {
        self.iter()
            .filter(|n| n.role == NodeRole::Descendant)
            .map(|n| n.depth.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Every root-to-leaf path, as identifier sequences.
    pub fn paths(&self) -> Vec<Vec<&'g Xref>> {
        fn walk<'g>(node: &TreeNode<'g>, prefix: &mut Vec<&'g Xref>, out: &mut Vec<Vec<&'g Xref>>) {
            prefix.push(node.id());
            if node.is_leaf() {
                out.push(prefix.clone());
            } else {
                for child in &node.children {
                    walk(child, prefix, out);
                }
            }
            prefix.pop();
        }

        let mut out = Vec::new();
        walk(self, &mut Vec::new(), &mut out);
        out
    }

    /// Stable hash of the tree structure (roles, ids, depths, families and
    /// child order). Structurally identical trees share a fingerprint.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }
}

/// Pre-order iterator over a [`TreeNode`] tree.
pub struct TreeIter<'a, 'g> {
    stack: Vec<&'a TreeNode<'g>>,
}

impl<'a, 'g> Iterator for TreeIter<'a, 'g> {
    type Item = &'a TreeNode<'g>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse so children come out in order
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
