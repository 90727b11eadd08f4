//! Core types for the record graph and the sandclock tree.

pub mod individual;
pub mod family;
pub mod date;
pub mod tree;

pub use individual::{Xref, Individual, Name, Sex, Event};
pub use family::{Family, ReferenceRole};
pub use date::{CalendarDate, DateValue};
pub use tree::{TreeNode, NodeRole, TreeIter};
