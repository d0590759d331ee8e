// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small selector language: compound selectors without combinators.
//!
//! Supported: `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]` (value bare or
//! quoted), chained without spaces, and comma-separated lists.

use crate::element::ElementData;

/// Why a selector string was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// Nothing to match.
    #[error("empty selector")]
    Empty,
    /// Descendant/child/sibling combinators are not supported.
    #[error("combinators are not supported (at byte {at})")]
    Combinator {
        /// Byte offset of the combinator.
        at: usize,
    },
    /// A character that cannot start or continue a selector part.
    #[error("unexpected {found:?} at byte {at}")]
    Unexpected {
        /// The offending character.
        found: char,
        /// Its byte offset.
        at: usize,
    },
    /// `#`, `.`, or `[` with no name after it.
    #[error("missing name at byte {at}")]
    MissingName {
        /// Byte offset where a name was expected.
        at: usize,
    },
    /// `[` without a matching `]`, or an unterminated quoted value.
    #[error("unterminated attribute selector")]
    Unterminated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Part {
    Tag(String),
    Id(String),
    Class(String),
    Attr(String, Option<String>),
}

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Vec<Part>>,
}

impl Selector {
    /// Parse `input`.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        let mut offset = 0;
        for chunk in input.split(',') {
            let lead = chunk.len() - chunk.trim_start().len();
            alternatives.push(parse_compound(chunk.trim(), offset + lead)?);
            offset += chunk.len() + 1;
        }
        Ok(Self { alternatives })
    }

    pub(crate) fn matches(&self, el: &ElementData) -> bool {
        self.alternatives
            .iter()
            .any(|parts| parts.iter().all(|p| part_matches(p, el)))
    }
}

fn part_matches(part: &Part, el: &ElementData) -> bool {
    match part {
        Part::Tag(t) => el.tag.eq_ignore_ascii_case(t),
        Part::Id(id) => el.id.as_deref() == Some(id.as_str()),
        Part::Class(c) => el.classes.iter().any(|have| have == c),
        Part::Attr(name, None) => el.attrs.iter().any(|(k, _)| k == name),
        Part::Attr(name, Some(value)) => el.attrs.iter().any(|(k, v)| k == name && v == value),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(s: &str, base: usize) -> Result<Vec<Part>, SelectorError> {
    if s.is_empty() {
        return Err(SelectorError::Empty);
    }
    let mut parts = Vec::new();
    let mut rest = s;
    let at = |rest: &str| base + s.len() - rest.len();

    if let Some(r) = rest.strip_prefix('*') {
        rest = r;
    } else {
        let (name, r) = take_name(rest);
        if !name.is_empty() {
            parts.push(Part::Tag(name.to_string()));
            rest = r;
        }
    }

    while let Some(c) = rest.chars().next() {
        let here = at(rest);
        match c {
            '#' | '.' => {
                let (name, r) = take_name(&rest[1..]);
                if name.is_empty() {
                    return Err(SelectorError::MissingName { at: here + 1 });
                }
                parts.push(if c == '#' {
                    Part::Id(name.to_string())
                } else {
                    Part::Class(name.to_string())
                });
                rest = r;
            }
            '[' => {
                let close = closing_bracket(rest).ok_or(SelectorError::Unterminated)?;
                parts.push(parse_attr(&rest[1..close], here + 1)?);
                rest = &rest[close + 1..];
            }
            c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                return Err(SelectorError::Combinator { at: here });
            }
            found => return Err(SelectorError::Unexpected { found, at: here }),
        }
    }
    // A lone `*` leaves `parts` empty, which matches every element.
    Ok(parts)
}

/// Byte offset of the `]` closing the attribute selector that starts `s`,
/// skipping over quoted values.
fn closing_bracket(s: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (None, ']') => return Some(i),
            (Some(q), c) if c == q => quote = None,
            _ => {}
        }
    }
    None
}

fn take_name(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !is_name_char(c)).unwrap_or(s.len());
    s.split_at(end)
}

fn parse_attr(body: &str, at: usize) -> Result<Part, SelectorError> {
    let (name, value) = match body.split_once('=') {
        Some((n, v)) => (n.trim(), Some(v.trim())),
        None => (body.trim(), None),
    };
    if name.is_empty() || !name.chars().all(is_name_char) {
        return Err(SelectorError::MissingName { at });
    }
    let value = match value {
        None => None,
        Some(v) => Some(unquote(v)?.to_string()),
    };
    Ok(Part::Attr(name.to_string(), value))
}

fn unquote(v: &str) -> Result<&str, SelectorError> {
    for q in ['"', '\''] {
        if let Some(inner) = v.strip_prefix(q) {
            return inner.strip_suffix(q).ok_or(SelectorError::Unterminated);
        }
    }
    Ok(v)
}
