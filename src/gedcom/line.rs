//! GEDCOM line grammar and record tree assembly.
//!
//! Each line is `LEVEL [@XREF@] TAG [VALUE]`. Lines are folded into a tree
//! of [`Node`]s by level; `CONC`/`CONT` lines are merged into the value of
//! the line they continue.

use super::ParseError;

/// One tagged line with its sub-lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Tag, e.g. `INDI` or `NAME`.
    pub tag: String,
    /// Cross-reference id with the `@` markers, if any.
    pub xref: Option<String>,
    /// Line value (empty if none), continuations merged in.
    pub value: String,
    /// 1-based source line number.
    pub line: usize,
    /// Nested lines in source order.
    pub children: Vec<Node>,
}

impl Node {
    /// First child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.tag == tag)
    }
}

struct Line<'a> {
    level: usize,
    xref: Option<&'a str>,
    tag: &'a str,
    value: &'a str,
}

/// Split off the first space-delimited token. The rest keeps its inner spacing.
fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(' ') {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    }
}

fn parse_line(raw: &str, number: usize) -> Result<Line<'_>, ParseError> {
    let (level_text, rest) = split_token(raw);
    let level = level_text.parse::<usize>().map_err(|_| ParseError::InvalidLevel {
        line: number,
        text: level_text.to_string(),
    })?;

    let (mut tag, mut rest) = split_token(rest);
    let mut xref = None;
    if tag.len() > 1 && tag.starts_with('@') && tag.ends_with('@') {
        xref = Some(tag);
        (tag, rest) = split_token(rest);
    }
    if tag.is_empty() {
        return Err(ParseError::MissingTag { line: number });
    }

    Ok(Line { level, xref, tag, value: rest })
}

/// Parse GEDCOM text into level-0 records.
pub fn parse_records(text: &str) -> Result<Vec<Node>, ParseError> {
    let mut records = Vec::new();
    // Open nodes; the node at index i has level i
    let mut open: Vec<Node> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let raw = raw.trim_end_matches('\r');
        if raw.trim().is_empty() {
            continue;
        }
        let line = parse_line(raw, number)?;

        if line.level > open.len() {
            return Err(ParseError::LevelJump {
                line: number,
                level: line.level,
                open: open.len(),
            });
        }
        while open.len() > line.level {
            close_node(&mut open, &mut records);
        }

        if line.level > 0 && matches!(line.tag, "CONC" | "CONT") {
            if let Some(parent) = open.last_mut() {
                if line.tag == "CONT" {
                    parent.value.push('\n');
                }
                parent.value.push_str(line.value);
            }
            continue;
        }

        open.push(Node {
            tag: line.tag.to_uppercase(),
            xref: line.xref.map(str::to_string),
            value: line.value.to_string(),
            line: number,
            children: Vec::new(),
        });
    }

    while !open.is_empty() {
        close_node(&mut open, &mut records);
    }
    Ok(records)
}

fn close_node(open: &mut Vec<Node>, records: &mut Vec<Node>) {
    if let Some(node) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => records.push(node),
        }
    }
}
