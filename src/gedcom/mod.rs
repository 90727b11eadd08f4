//! GEDCOM decoding into a flat [`RecordSet`].
//!
//! Only what the sandclock tree needs is decoded:
//!
//! - `INDI`: `NAME` (with `GIVN`, `SURN`, `TYPE`), `SEX`, `BIRT`/`DEAT` (`DATE`, `PLAC`)
//! - `FAM`: `HUSB`, `WIFE`, `CHIL`
//!
//! Everything else is skipped. References are not checked here; that is
//! the index builder's job.

pub mod line;

use std::path::Path;
use tracing::debug;

use crate::store::RecordSet;
use crate::types::{DateValue, Event, Family, Individual, Name, Sex, Xref};
use line::Node;

/// Error type for GEDCOM decoding.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Line does not start with a numeric level.
    #[error("line {line}: invalid level {text:?}")]
    InvalidLevel {
        /// Line number.
        line: usize,
        /// Offending text.
        text: String,
    },
    /// Level deeper than the enclosing line allows.
    #[error("line {line}: level {level} skips past open level {open}")]
    LevelJump {
        /// Line number.
        line: usize,
        /// Level found.
        level: usize,
        /// Deepest level that could follow.
        open: usize,
    },
    /// Line has a level but no tag.
    #[error("line {line}: missing tag")]
    MissingTag {
        /// Line number.
        line: usize,
    },
    /// `INDI` or `FAM` record without an `@XREF@`.
    #[error("line {line}: {tag} record without cross-reference id")]
    MissingXref {
        /// Line number.
        line: usize,
        /// Record tag.
        tag: String,
    },
    /// Pointer value that is not `@XREF@`.
    #[error("line {line}: expected a pointer like @I1@ for {tag}, found {value:?}")]
    InvalidPointer {
        /// Line number.
        line: usize,
        /// Pointer tag.
        tag: String,
        /// Offending value.
        value: String,
    },
    /// Cross-reference id with characters that cannot appear in `[id=..]`.
    #[error("line {line}: {tag} cross-reference id {value:?} may only use letters, digits, '_', '-' and '.'")]
    InvalidXref {
        /// Line number.
        line: usize,
        /// Record or pointer tag.
        tag: String,
        /// Offending id.
        value: String,
    },
    /// File could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Name types in order of preference for display.
const NAME_PREFERENCE: [Option<&str>; 4] = [Some("maiden"), Some("birth"), None, Some("married")];

/// Decode GEDCOM text.
pub fn parse_str(text: &str) -> Result<RecordSet, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let records = line::parse_records(text)?;

    let mut set = RecordSet::new();
    for record in &records {
        match record.tag.as_str() {
            "INDI" => set.add_individual(decode_individual(record)?),
            "FAM" => set.add_family(decode_family(record)?),
            _ => {}
        }
    }

    debug!(
        individuals = set.individuals.len(),
        families = set.families.len(),
        "decoded GEDCOM records"
    );
    Ok(set)
}

/// Read and decode a GEDCOM file. Invalid UTF-8 is replaced, not rejected.
pub fn read_file(path: impl AsRef<Path>) -> Result<RecordSet, ParseError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_str(&String::from_utf8_lossy(&bytes))
}

fn is_xref_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn checked_xref(node: &Node, raw: &str) -> Result<Xref, ParseError> {
    let id = Xref::new(raw);
    if id.as_str().is_empty() || !id.as_str().chars().all(is_xref_char) {
        return Err(ParseError::InvalidXref {
            line: node.line,
            tag: node.tag.clone(),
            value: raw.to_string(),
        });
    }
    Ok(id)
}

fn record_id(record: &Node) -> Result<Xref, ParseError> {
    let raw = record.xref.as_deref().ok_or_else(|| ParseError::MissingXref {
        line: record.line,
        tag: record.tag.clone(),
    })?;
    checked_xref(record, raw)
}

fn decode_individual(record: &Node) -> Result<Individual, ParseError> {
    let mut individual = Individual::new(record_id(record)?, Name::default());
    let mut names: Vec<(Option<String>, Name)> = Vec::new();

    for field in &record.children {
        match field.tag.as_str() {
            "NAME" => names.push(decode_name(field)),
            "SEX" => individual.sex = Sex::from_gedcom(&field.value),
            "BIRT" if individual.birth.is_none() => individual.birth = decode_event(field),
            "DEAT" if individual.death.is_none() => individual.death = decode_event(field),
            _ => {}
        }
    }

    individual.name = choose_name(names);
    Ok(individual)
}

fn decode_name(field: &Node) -> (Option<String>, Name) {
    let mut name = Name::from_gedcom(&field.value);
    let mut kind = None;
    for part in &field.children {
        let value = part.value.trim();
        match part.tag.as_str() {
            "GIVN" if !value.is_empty() => name.given = Some(value.to_string()),
            "SURN" if !value.is_empty() => name.surname = Some(value.to_string()),
            "TYPE" if !value.is_empty() => kind = Some(value.to_lowercase()),
            _ => {}
        }
    }
    (kind, name)
}

/// Pick the display name: maiden, birth, untyped, married, then whatever is left.
fn choose_name(names: Vec<(Option<String>, Name)>) -> Name {
    for preferred in NAME_PREFERENCE {
        if let Some((_, name)) = names
            .iter()
            .find(|(kind, name)| kind.as_deref() == preferred && !name.is_empty())
        {
            return name.clone();
        }
    }
    names
        .into_iter()
        .map(|(_, name)| name)
        .find(|name| !name.is_empty())
        .unwrap_or_default()
}

fn decode_event(field: &Node) -> Option<Event> {
    let date = field
        .child("DATE")
        .map(|d| d.value.trim())
        .filter(|d| !d.is_empty())
        .map(DateValue::parse);
    let place = field
        .child("PLAC")
        .map(|p| p.value.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    let event = Event::new(date, place);
    (!event.is_empty()).then_some(event)
}

fn decode_pointer(field: &Node) -> Result<Xref, ParseError> {
    let value = field.value.trim();
    if value.len() > 2 && value.starts_with('@') && value.ends_with('@') {
        checked_xref(field, value)
    } else {
        Err(ParseError::InvalidPointer {
            line: field.line,
            tag: field.tag.clone(),
            value: value.to_string(),
        })
    }
}

fn decode_family(record: &Node) -> Result<Family, ParseError> {
    let mut family = Family::new(record_id(record)?);

    for field in &record.children {
        match field.tag.as_str() {
            "HUSB" if family.husband.is_none() => family.husband = Some(decode_pointer(field)?),
            "WIFE" if family.wife.is_none() => family.wife = Some(decode_pointer(field)?),
            "CHIL" => family.children.push(decode_pointer(field)?),
            _ => {}
        }
    }

    Ok(family)
}
