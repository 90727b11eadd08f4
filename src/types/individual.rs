//! Individual types for the record graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::date::DateValue;

/// Cross-reference identifier of a record (individual or family).
///
/// GEDCOM writes these as `@I0001@`; the surrounding `@` are stripped on
/// construction so `I0001` and `@I0001@` name the same record.
/// Implements `Ord` for deterministic ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Xref(String);

impl Xref {
    /// Create a new Xref, stripping surrounding `@` markers.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().trim_matches('@').to_string())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Xref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Xref {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Xref {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Sex of an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Sex {
    /// Parse a GEDCOM `SEX` value. Anything but `M`/`F` is unknown.
    pub fn from_gedcom(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "M" => Some(Self::Male),
            "F" => Some(Self::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// Display name of an individual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    /// Given name(s).
    pub given: Option<String>,
    /// Surname.
    pub surname: Option<String>,
}

impl Name {
    /// Create a name from given name and surname.
    pub fn new(given: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            given: non_empty(given.into()),
            surname: non_empty(surname.into()),
        }
    }

    /// Parse a GEDCOM personal name such as `John Henry /Smith/ Jr.`.
    ///
    /// The surname is the part between slashes; text before it is the
    /// given name. Text after the surname is dropped.
    pub fn from_gedcom(value: &str) -> Self {
        let mut parts = value.splitn(3, '/');
        let given = parts.next().unwrap_or_default().trim().to_string();
        let surname = parts.next().unwrap_or_default().trim().to_string();
        Self {
            given: non_empty(given),
            surname: non_empty(surname),
        }
    }

    /// Whether neither part of the name is known.
    pub fn is_empty(&self) -> bool {
        self.given.is_none() && self.surname.is_none()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.given.as_deref().unwrap_or("?"),
            self.surname.as_deref().unwrap_or("?"),
        )
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// A life event (birth or death) with optional date and place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// When it happened.
    pub date: Option<DateValue>,
    /// Where it happened.
    pub place: Option<String>,
}

impl Event {
    /// Create an event from optional date and place.
    pub fn new(date: Option<DateValue>, place: Option<String>) -> Self {
        Self { date, place }
    }

    /// Whether the event carries neither date nor place.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.place.is_none()
    }
}

/// A person in the record graph.
///
/// Family links are owned by the index builder: they are rebuilt from the
/// family records, so any links present on an input individual are
/// replaced when the graph is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Unique identifier.
    pub id: Xref,
    /// Display name.
    pub name: Name,
    /// Sex, if recorded.
    pub sex: Option<Sex>,
    /// Birth event.
    pub birth: Option<Event>,
    /// Death event.
    pub death: Option<Event>,
    /// Families in which this individual is a child, in family record order.
    pub(crate) child_in: Vec<Xref>,
    /// Families in which this individual is a spouse, in family record order.
    pub(crate) spouse_in: Vec<Xref>,
}

impl Individual {
    /// Create a new individual with no events and no family links.
    pub fn new(id: impl Into<Xref>, name: Name) -> Self {
        Self {
            id: id.into(),
            name,
            sex: None,
            birth: None,
            death: None,
            child_in: Vec::new(),
            spouse_in: Vec::new(),
        }
    }

    /// Set the sex.
    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    /// Set the birth event.
    pub fn with_birth(mut self, birth: Event) -> Self {
        self.birth = Some(birth);
        self
    }

    /// Set the death event.
    pub fn with_death(mut self, death: Event) -> Self {
        self.death = Some(death);
        self
    }

    /// Families in which this individual is a child.
    pub fn child_families(&self) -> &[Xref] {
        &self.child_in
    }

    /// Families in which this individual is a spouse.
    pub fn spouse_families(&self) -> &[Xref] {
        &self.spouse_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xref_strips_markers() {
        assert_eq!(Xref::new("@I0001@"), Xref::new("I0001"));
        assert_eq!(Xref::new(" @F1@ ").as_str(), "F1");
    }

    #[test]
    fn test_name_from_gedcom() {
        let name = Name::from_gedcom("John Henry /Smith/ Jr.");
        assert_eq!(name.given.as_deref(), Some("John Henry"));
        assert_eq!(name.surname.as_deref(), Some("Smith"));

        let no_surname = Name::from_gedcom("Maria");
        assert_eq!(no_surname.given.as_deref(), Some("Maria"));
        assert!(no_surname.surname.is_none());

        let only_surname = Name::from_gedcom("/Doe/");
        assert!(only_surname.given.is_none());
        assert_eq!(only_surname.to_string(), "? Doe");
    }

    #[test]
    fn test_sex_from_gedcom() {
        assert_eq!(Sex::from_gedcom("M"), Some(Sex::Male));
        assert_eq!(Sex::from_gedcom("f"), Some(Sex::Female));
        assert_eq!(Sex::from_gedcom("U"), None);
    }
}
