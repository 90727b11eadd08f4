//! GEDCOM date values and their genealogytree form.
//!
//! Dates are carried through the graph untouched; the only interpretation
//! done here is turning them into the `(AD)YYYY-MM-DD` strings that the
//! genealogytree package reads.
//!
//! | GEDCOM | genealogytree |
//! |--------|---------------|
//! | `1 JAN 1900` | `(AD)1900-01-01` |
//! | `44 B.C.` | `(BC)44` |
//! | `ABT 1900` / `CAL` / `EST` / `INT` | `(caAD)1900` |
//! | `FROM a TO b` / `BET a AND b` | `a/b` |
//! | `FROM a` / `AFT a` | `a/` |
//! | `TO a` / `BEF a` | `/a` |
//! | `(text)` | not rendered |

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// A single calendar date with optional month and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    /// Year; negative for BC.
    pub year: i32,
    /// Month (1-12).
    pub month: Option<u8>,
    /// Day of month. Only meaningful together with a month.
    pub day: Option<u8>,
}

impl CalendarDate {
    /// Create a date with year only.
    pub fn year(year: i32) -> Self {
        Self { year, month: None, day: None }
    }

    /// Create a full year-month-day date.
    pub fn ymd(year: i32, month: u8, day: u8) -> Self {
        Self { year, month: Some(month), day: Some(day) }
    }

    /// Parse `[DAY] [MON] YEAR [B.C.]`.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = calendar_regex().captures(s.trim())?;

        let mut year: i32 = caps.get(3)?.as_str().parse().ok()?;
        if caps.get(4).is_some() {
            year = -year;
        }

        let month = match caps.get(2) {
            Some(m) => {
                let upper = m.as_str().to_uppercase();
                let index = MONTHS.iter().position(|name| *name == upper)?;
                Some(index as u8 + 1)
            }
            None => None,
        };

        let day = match caps.get(1) {
            Some(d) => {
                // A day without a month is not a date
                month?;
                Some(d.as_str().parse().ok()?)
            }
            None => None,
        };

        Some(Self { year, month, day })
    }

    fn to_gtr(self, uncertain: bool) -> String {
        let (era, year) = if self.year < 0 {
            ("BC", -self.year)
        } else {
            ("AD", self.year)
        };
        let prefix = if uncertain { "ca" } else { "" };

        let mut out = format!("({prefix}{era}){year}");
        if let Some(month) = self.month {
            out.push_str(&format!("-{month:02}"));
            if let Some(day) = self.day {
                out.push_str(&format!("-{day:02}"));
            }
        }
        out
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(day), Some(_)) = (self.day, self.month) {
            write!(f, "{day} ")?;
        }
        if let Some(month) = self.month {
            write!(f, "{} ", MONTHS[(month as usize).saturating_sub(1).min(11)])?;
        }
        if self.year < 0 {
            write!(f, "{} B.C.", -self.year)
        } else {
            write!(f, "{}", self.year)
        }
    }
}

/// A GEDCOM date value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateValue {
    /// A plain date.
    Simple(CalendarDate),
    /// `FROM a TO b`.
    Period(CalendarDate, CalendarDate),
    /// `BET a AND b`.
    Range(CalendarDate, CalendarDate),
    /// `FROM a`.
    From(CalendarDate),
    /// `AFT a`.
    After(CalendarDate),
    /// `TO a`.
    To(CalendarDate),
    /// `BEF a`.
    Before(CalendarDate),
    /// `ABT a`.
    About(CalendarDate),
    /// `CAL a`.
    Calculated(CalendarDate),
    /// `EST a`.
    Estimated(CalendarDate),
    /// `INT a (phrase)`.
    Interpreted(CalendarDate, String),
    /// Free text, including anything that could not be decoded.
    Phrase(String),
}

impl DateValue {
    /// Decode a GEDCOM date string. Never fails: undecodable input
    /// becomes a [`DateValue::Phrase`] holding the original text.
    pub fn parse(s: &str) -> Self {
        let text = strip_calendar_escape(s.trim());
        Self::try_parse(text).unwrap_or_else(|| Self::Phrase(s.trim().to_string()))
    }

    fn try_parse(text: &str) -> Option<Self> {
        if let Some(caps) = phrase_regex().captures(text) {
            return Some(Self::Phrase(caps[1].trim().to_string()));
        }
        if let Some(caps) = pair_regex().captures(text) {
            let first = CalendarDate::parse(&caps[2])?;
            let second = CalendarDate::parse(&caps[4])?;
            let keyword = caps[1].to_uppercase();
            return Some(if keyword == "FROM" {
                Self::Period(first, second)
            } else {
                Self::Range(first, second)
            });
        }
        if let Some(caps) = interpreted_regex().captures(text) {
            let date = CalendarDate::parse(&caps[1])?;
            return Some(Self::Interpreted(date, caps[2].trim().to_string()));
        }
        if let Some(caps) = qualified_regex().captures(text) {
            let date = CalendarDate::parse(&caps[2])?;
            return Some(match caps[1].to_uppercase().as_str() {
                "FROM" => Self::From(date),
                "AFT" => Self::After(date),
                "TO" => Self::To(date),
                "BEF" => Self::Before(date),
                "ABT" => Self::About(date),
                "CAL" => Self::Calculated(date),
                "EST" => Self::Estimated(date),
                // INT without a phrase
                _ => Self::Interpreted(date, String::new()),
            });
        }
        CalendarDate::parse(text).map(Self::Simple)
    }

    /// Render in genealogytree date notation. Phrases have no such form.
    pub fn to_gtr(&self) -> Option<String> {
        let out = match self {
            Self::Simple(d) => d.to_gtr(false),
            Self::Period(a, b) | Self::Range(a, b) => {
                format!("{}/{}", a.to_gtr(false), b.to_gtr(false))
            }
            Self::From(d) | Self::After(d) => format!("{}/", d.to_gtr(false)),
            Self::To(d) | Self::Before(d) => format!("/{}", d.to_gtr(false)),
            Self::About(d) | Self::Calculated(d) | Self::Estimated(d) | Self::Interpreted(d, _) => {
                d.to_gtr(true)
            }
            Self::Phrase(_) => return None,
        };
        Some(out)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(d) => write!(f, "{d}"),
            Self::Period(a, b) => write!(f, "FROM {a} TO {b}"),
            Self::Range(a, b) => write!(f, "BET {a} AND {b}"),
            Self::From(d) => write!(f, "FROM {d}"),
            Self::After(d) => write!(f, "AFT {d}"),
            Self::To(d) => write!(f, "TO {d}"),
            Self::Before(d) => write!(f, "BEF {d}"),
            Self::About(d) => write!(f, "ABT {d}"),
            Self::Calculated(d) => write!(f, "CAL {d}"),
            Self::Estimated(d) => write!(f, "EST {d}"),
            Self::Interpreted(d, phrase) if phrase.is_empty() => write!(f, "INT {d}"),
            Self::Interpreted(d, phrase) => write!(f, "INT {d} ({phrase})"),
            Self::Phrase(text) => write!(f, "({text})"),
        }
    }
}

/// Drop a leading `@#DGREGORIAN@`-style calendar escape.
fn strip_calendar_escape(s: &str) -> &str {
    if let Some(rest) = s.strip_prefix("@#") {
        if let Some(end) = rest.find('@') {
            return rest[end + 1..].trim_start();
        }
    }
    s
}

fn calendar_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:(\d{1,2})\s+)?(?:([a-z]{3})\s+)?(\d{1,4})(?:/\d{1,2})?(?:\s*(B\.?C\.?))?$")
            .expect("calendar date pattern is valid")
    })
}

fn phrase_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\((.*)\)$").expect("phrase pattern is valid"))
}

fn pair_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(FROM|BET)\s+(.+?)\s+(TO|AND)\s+(.+)$").expect("pair pattern is valid")
    })
}

fn interpreted_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^INT\s+(.+?)\s*\((.*)\)$").expect("interpreted pattern is valid")
    })
}

fn qualified_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(FROM|AFT|TO|BEF|ABT|CAL|EST|INT)\s+(.+)$")
            .expect("qualified pattern is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_dates() {
        assert_eq!(
            DateValue::parse("1 JAN 1900"),
            DateValue::Simple(CalendarDate::ymd(1900, 1, 1))
        );
        assert_eq!(
            DateValue::parse("dec 1895"),
            DateValue::Simple(CalendarDate { year: 1895, month: Some(12), day: None })
        );
        assert_eq!(DateValue::parse("1750"), DateValue::Simple(CalendarDate::year(1750)));
        assert_eq!(DateValue::parse("44 B.C."), DateValue::Simple(CalendarDate::year(-44)));
        assert_eq!(
            DateValue::parse("@#DGREGORIAN@ 3 MAR 1801"),
            DateValue::Simple(CalendarDate::ymd(1801, 3, 3))
        );
    }

    #[test]
    fn test_parse_qualified_dates() {
        let d = CalendarDate::year(1900);
        let e = CalendarDate::year(1910);
        assert_eq!(DateValue::parse("ABT 1900"), DateValue::About(d));
        assert_eq!(DateValue::parse("BEF 1900"), DateValue::Before(d));
        assert_eq!(DateValue::parse("AFT 1900"), DateValue::After(d));
        assert_eq!(DateValue::parse("FROM 1900 TO 1910"), DateValue::Period(d, e));
        assert_eq!(DateValue::parse("BET 1900 AND 1910"), DateValue::Range(d, e));
        assert_eq!(DateValue::parse("FROM 1900"), DateValue::From(d));
        assert_eq!(
            DateValue::parse("INT 1900 (around new year)"),
            DateValue::Interpreted(d, "around new year".to_string())
        );
    }

    #[test]
    fn test_unparseable_becomes_phrase() {
        assert_eq!(
            DateValue::parse("(during the war)"),
            DateValue::Phrase("during the war".to_string())
        );
        assert_eq!(
            DateValue::parse("sometime 19th century"),
            DateValue::Phrase("sometime 19th century".to_string())
        );
        assert_eq!(DateValue::parse("5 1900"), DateValue::Phrase("5 1900".to_string()));
    }

    #[test]
    fn test_to_gtr() {
        assert_eq!(
            DateValue::parse("1 JAN 1900").to_gtr().as_deref(),
            Some("(AD)1900-01-01")
        );
        assert_eq!(DateValue::parse("44 BC").to_gtr().as_deref(), Some("(BC)44"));
        assert_eq!(DateValue::parse("EST 1900").to_gtr().as_deref(), Some("(caAD)1900"));
        assert_eq!(
            DateValue::parse("BET MAR 1900 AND 1910").to_gtr().as_deref(),
            Some("(AD)1900-03/(AD)1910")
        );
        assert_eq!(DateValue::parse("AFT 1900").to_gtr().as_deref(), Some("(AD)1900/"));
        assert_eq!(DateValue::parse("BEF 1900").to_gtr().as_deref(), Some("/(AD)1900"));
        assert_eq!(DateValue::parse("(unknown)").to_gtr(), None);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for text in ["1 JAN 1900", "ABT 44 B.C.", "FROM 1900 TO 1910", "INT 1900 (guess)"] {
            let value = DateValue::parse(text);
            assert_eq!(DateValue::parse(&value.to_string()), value);
        }
    }
}
