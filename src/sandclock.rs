//! Sandclock rendering for the LaTeX genealogytree package.
//!
//! ## Output
//!
//! ```text
//! sandclock[id=F2]{
//!   child[id=F3]{ g[id=I6]{..} p[id=I9]{..} c[id=I10]{..} union[id=F5]{ p{..} c{..} } }
//!   parent[id=F1]{ g[id=I4]{..} p[id=I1]{..} p[id=I2]{..} c[id=I3]{..} }
//!   p[id=I5]{..}
//!   c[id=I7]{..}
//! }
//! ```
//!
//! (Whitespace added for reading; the real output has none.)
//!
//! The root's own `child` block comes first, then its parents, then its
//! siblings. A node with nothing expanded under it is written as a leaf
//! (`c` below the root, `p` above it).

use std::borrow::Cow;

use crate::types::{Event, Individual, NodeRole, Sex, TreeNode, Xref};

/// Characters with a meaning in LaTeX and what they become.
const ESCAPES: [(char, &str); 10] = [
    ('\\', r"\textbackslash{}"),
    ('{', r"\{"),
    ('}', r"\}"),
    ('%', r"\%"),
    ('#', r"\#"),
    ('$', r"\$"),
    ('&', r"\&"),
    ('_', r"\_"),
    ('~', r"\textasciitilde{}"),
    ('^', r"\textasciicircum{}"),
];

/// Rough output size per node, used to pre-size the buffer.
const BYTES_PER_NODE: usize = 96;

/// Escape text for use inside genealogytree field values.
pub fn escape_latex(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| ESCAPES.iter().any(|(special, _)| *special == c)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match ESCAPES.iter().find(|(special, _)| *special == c) {
            Some((_, replacement)) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Render a tree in sandclock notation.
///
/// Deterministic: structurally identical trees give byte-identical text.
/// A root node becomes the `sandclock` wrapper; any other node renders as
/// the subtree it would be inside one.
pub fn render(tree: &TreeNode<'_>) -> String {
    let mut out = String::with_capacity(tree.len() * BYTES_PER_NODE);
    match tree.role {
        NodeRole::Root => write_sandclock(&mut out, tree),
        NodeRole::Ancestor => write_ancestor(&mut out, tree),
        NodeRole::Descendant => write_descendant(&mut out, tree),
        NodeRole::Spouse => write_leaf(&mut out, "p", tree),
        NodeRole::Sibling => write_leaf(&mut out, "c", tree),
    }
    out
}

fn write_sandclock(out: &mut String, root: &TreeNode<'_>) {
    out.push_str("sandclock");
    push_id(out, root.family);
    out.push('{');
    write_descendant(out, root);
    for parent in root.children_with_role(NodeRole::Ancestor) {
        write_ancestor(out, parent);
    }
    for sibling in root.children_with_role(NodeRole::Sibling) {
        write_leaf(out, "c", sibling);
    }
    out.push('}');
}

/// `parent[id=F]{g.. parents.. siblings..}`, or `p` for someone with no
/// known birth family. An ancestor cut off by the limit keeps its
/// `parent` block with only the `g` entry.
fn write_ancestor(out: &mut String, node: &TreeNode<'_>) {
    let family = node
        .children
        .iter()
        .find(|c| matches!(c.role, NodeRole::Ancestor | NodeRole::Sibling))
        .and_then(|c| c.family)
        .or_else(|| node.individual.child_families().first());
    let Some(family) = family else {
        write_leaf(out, "p", node);
        return;
    };

    out.push_str("parent");
    push_id(out, Some(family));
    out.push('{');
    write_leaf(out, "g", node);
    for parent in node.children_with_role(NodeRole::Ancestor) {
        write_ancestor(out, parent);
    }
    for sibling in node.children_with_role(NodeRole::Sibling) {
        write_leaf(out, "c", sibling);
    }
    out.push('}');
}

/// `child[id=F1]{g.. p.. c.. union[id=F2]{p.. c..}}`, or `c` if nothing was expanded.
fn write_descendant(out: &mut String, node: &TreeNode<'_>) {
    let groups = family_groups(node);
    if groups.is_empty() {
        write_leaf(out, "c", node);
        return;
    }

    for (index, (family, members)) in groups.iter().enumerate() {
        if index == 0 {
            out.push_str("child");
            push_id(out, *family);
            out.push('{');
            write_leaf(out, "g", node);
        } else {
            out.push_str("union");
            push_id(out, *family);
            out.push('{');
        }

        for member in members {
            match member.role {
                NodeRole::Spouse => write_leaf(out, "p", member),
                _ => write_descendant(out, member),
            }
        }

        if index > 0 {
            out.push('}');
        }
    }
    out.push('}');
}

/// Spouse and descendant children, grouped by the family linking them.
fn family_groups<'a, 'g>(node: &'a TreeNode<'g>) -> Vec<(Option<&'g Xref>, Vec<&'a TreeNode<'g>>)> {
    let mut groups: Vec<(Option<&'g Xref>, Vec<&'a TreeNode<'g>>)> = Vec::new();
    for child in node
        .children
        .iter()
        .filter(|c| matches!(c.role, NodeRole::Spouse | NodeRole::Descendant))
    {
        if let Some((family, members)) = groups.last_mut() {
            if *family == child.family {
                members.push(child);
                continue;
            }
        }
        groups.push((child.family, vec![child]));
    }
    groups
}

fn write_leaf(out: &mut String, tag: &str, node: &TreeNode<'_>) {
    out.push_str(tag);
    push_id(out, Some(node.id()));
    out.push('{');
    push_fields(out, node.individual);
    out.push('}');
}

fn push_id(out: &mut String, id: Option<&Xref>) {
    if let Some(id) = id {
        out.push_str("[id=");
        out.push_str(id.as_str());
        out.push(']');
    }
}

/// `name={..},birth..,death..,sex={..},` in that order.
fn push_fields(out: &mut String, individual: &Individual) {
    let given = individual.name.given.as_deref().unwrap_or("?");
    let surname = individual.name.surname.as_deref().unwrap_or("?");
    out.push_str(r"name={\pref{");
    out.push_str(&escape_latex(given));
    out.push_str(r"} \surn{");
    out.push_str(&escape_latex(surname));
    out.push_str("}},");

    if let Some(birth) = &individual.birth {
        push_event(out, "birth", birth);
    }
    if let Some(death) = &individual.death {
        push_event(out, "death", death);
    }

    match individual.sex {
        Some(Sex::Female) => out.push_str("sex={female},"),
        Some(Sex::Male) => out.push_str("sex={male},"),
        None => {}
    }
}

/// `key={date}{place}`, `key-={date}` or `key+={place}`.
fn push_event(out: &mut String, key: &str, event: &Event) {
    let date = event.date.as_ref().and_then(|d| d.to_gtr());
    let place = event
        .place
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(escape_latex);

    match (date, place) {
        (Some(date), Some(place)) => {
            out.push_str(&format!("{key}={{{date}}}{{{place}}},"));
        }
        (Some(date), None) => {
            out.push_str(&format!("{key}-={{{date}}},"));
        }
        (None, Some(place)) => {
            out.push_str(&format!("{key}+={{{place}}},"));
        }
        (None, None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DateValue, Name};

    #[test]
    fn test_escape_latex() {
        assert!(matches!(escape_latex("Plain Name"), Cow::Borrowed(_)));
        assert_eq!(escape_latex("50% {odd}"), r"50\% \{odd\}");
        assert_eq!(escape_latex(r"a\b"), r"a\textbackslash{}b");
        assert_eq!(escape_latex("R&D #1 $5 x_y"), r"R\&D \#1 \$5 x\_y");
        assert_eq!(escape_latex("~^"), r"\textasciitilde{}\textasciicircum{}");
    }

    #[test]
    fn test_leaf_fields() {
        let person = Individual::new("I1", Name::new("Anna", "O'Brien_Smith"))
            .with_sex(Sex::Female)
            .with_birth(Event::new(
                Some(DateValue::parse("1 JAN 1900")),
                Some("St. Mary's {Parish}".to_string()),
            ))
            .with_death(Event::new(Some(DateValue::parse("ABT 1950")), None));
        let node = TreeNode::new(NodeRole::Sibling, &person, 0, None);

        assert_eq!(
            render(&node),
            r"c[id=I1]{name={\pref{Anna} \surn{O'Brien\_Smith}},birth={(AD)1900-01-01}{St. Mary's \{Parish\}},death-={(caAD)1950},sex={female},}"
        );
    }

    #[test]
    fn test_place_only_and_phrase_dates() {
        let person = Individual::new("I2", Name::default())
            .with_birth(Event::new(Some(DateValue::parse("(unknown)")), Some("Oslo".to_string())))
            .with_death(Event::new(Some(DateValue::parse("(lost at sea)")), None));
        let node = TreeNode::new(NodeRole::Spouse, &person, 0, None);

        assert_eq!(
            render(&node),
            r"p[id=I2]{name={\pref{?} \surn{?}},birth+={Oslo},}"
        );
    }

    #[test]
    fn test_lone_root() {
        let person = Individual::new("I3", Name::new("Solo", "Root")).with_sex(Sex::Male);
        let tree = TreeNode::new(NodeRole::Root, &person, 0, None);

        assert_eq!(
            render(&tree),
            r"sandclock{c[id=I3]{name={\pref{Solo} \surn{Root}},sex={male},}}"
        );
    }

    #[test]
    fn test_second_family_becomes_union() {
        let root = Individual::new("A", Name::new("A", "X"));
        let w1 = Individual::new("W1", Name::new("W", "1"));
        let w2 = Individual::new("W2", Name::new("W", "2"));
        let k2 = Individual::new("K2", Name::new("K", "2"));
        let (f1, f2) = (Xref::new("F1"), Xref::new("F2"));

        let mut tree = TreeNode::new(NodeRole::Root, &root, 0, None);
        tree.children.push(TreeNode::new(NodeRole::Spouse, &w1, 0, Some(&f1)));
        tree.children.push(TreeNode::new(NodeRole::Spouse, &w2, 0, Some(&f2)));
        tree.children.push(TreeNode::new(NodeRole::Descendant, &k2, 1, Some(&f2)));

        assert_eq!(
            render(&tree),
            concat!(
                r"sandclock{child[id=F1]{g[id=A]{name={\pref{A} \surn{X}},}",
                r"p[id=W1]{name={\pref{W} \surn{1}},}",
                r"union[id=F2]{p[id=W2]{name={\pref{W} \surn{2}},}",
                r"c[id=K2]{name={\pref{K} \surn{2}},}}}}",
            )
        );
    }
}
