// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small selector language: tags and attribute conditions, comma-separated.
//!
//! ## Grammar
//!
//! ```text
//! list      := compound ("," compound)*
//! compound  := tag? condition*           (at least one of the two)
//! tag       := ident | "*"
//! condition := "[" ident "]"
//!            | "[" ident "=" value "]"
//!            | "[" ident "~=" value "]"
//! value     := ident | '"' .* '"' | "'" .* "'"
//! ```
//!
//! Combinators are not supported; matching never looks at ancestors.
//!
//! ```
//! use catalyst_dom::Selector;
//!
//! let s = Selector::parse("[data-action], x-foo[data-target~=\"x-foo.input\"]").unwrap();
//! assert_eq!(s.to_string(), "[data-action],x-foo[data-target~=\"x-foo.input\"]");
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::error::SelectorError;

/// How an attribute condition compares values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrMatch {
    /// `[name]`: the attribute is present.
    Present,
    /// `[name="v"]`: the value equals `v`.
    Equals(String),
    /// `[name~="v"]`: the value, split on ASCII whitespace, contains `v`.
    Includes(String),
}

impl AttrMatch {
    /// Test an attribute value (`None` when absent).
    pub fn test(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (_, None) => false,
            (Self::Present, Some(_)) => true,
            (Self::Equals(want), Some(v)) => v == want,
            (Self::Includes(word), Some(v)) => {
                !word.is_empty() && v.split_ascii_whitespace().any(|w| w == word)
            }
        }
    }
}

/// A single attribute condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrCondition {
    /// Attribute name (lower-case).
    pub name: String,
    /// Comparison.
    pub matcher: AttrMatch,
}

/// A tag plus attribute conditions, all of which must hold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compound {
    /// Tag name, or `None` for any element (`*` or omitted).
    pub tag: Option<String>,
    /// Attribute conditions.
    pub conditions: Vec<AttrCondition>,
}

/// A comma-separated list of [`Compound`]s; matches when any part matches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    /// Parse selector text.
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let mut parts = Vec::new();
        let mut offset = 0;
        for piece in text.split(',') {
            parts.push(parse_compound(piece, offset)?);
            offset += piece.len() + 1;
        }
        Ok(Self { parts })
    }

    /// Selector matching any element with the given tag.
    pub fn tag(tag: &str) -> Self {
        Self {
            parts: alloc::vec![Compound {
                tag: Some(tag.to_ascii_lowercase()),
                conditions: Vec::new(),
            }],
        }
    }

    /// Selector matching elements that carry any of `names`.
    ///
    /// An empty iterator produces a selector that matches nothing.
    pub fn any_attribute<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let parts = names
            .into_iter()
            .map(|name| Compound {
                tag: None,
                conditions: alloc::vec![AttrCondition {
                    name: name.to_ascii_lowercase(),
                    matcher: AttrMatch::Present,
                }],
            })
            .collect();
        Self { parts }
    }

    /// Selector matching elements whose `name` attribute includes the word `word`.
    pub fn includes(name: &str, word: &str) -> Self {
        Self {
            parts: alloc::vec![Compound {
                tag: None,
                conditions: alloc::vec![AttrCondition {
                    name: name.to_ascii_lowercase(),
                    matcher: AttrMatch::Includes(word.to_string()),
                }],
            }],
        }
    }

    /// The compound parts of this selector.
    pub fn parts(&self) -> &[Compound] {
        &self.parts
    }

    /// Returns true if this selector can never match.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Test a tag name and an attribute lookup against the selector.
    pub fn matches_with<'a>(&self, tag: &str, attr: impl Fn(&str) -> Option<&'a str>) -> bool {
        self.parts.iter().any(|part| {
            part.tag.as_deref().is_none_or(|t| t == tag)
                && part
                    .conditions
                    .iter()
                    .all(|c| c.matcher.test(attr(&c.name)))
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if let Some(tag) = &part.tag {
                f.write_str(tag)?;
            }
            for c in &part.conditions {
                match &c.matcher {
                    AttrMatch::Present => write!(f, "[{}]", c.name)?,
                    AttrMatch::Equals(v) => write!(f, "[{}=\"{}\"]", c.name, v)?,
                    AttrMatch::Includes(v) => write!(f, "[{}~=\"{}\"]", c.name, v)?,
                }
            }
        }
        Ok(())
    }
}

impl core::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(piece: &str, offset: usize) -> Result<Compound, SelectorError> {
    let lead = piece.len() - piece.trim_start().len();
    let src = piece.trim();
    if src.is_empty() {
        return Err(SelectorError::Empty);
    }
    let bytes_at = |i: usize| offset + lead + i;
    let mut compound = Compound::default();
    let mut chars = src.char_indices().peekable();

    // Tag.
    if let Some(&(_, '*')) = chars.peek() {
        chars.next();
    } else {
        let mut tag = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            tag.push(c.to_ascii_lowercase());
            chars.next();
        }
        if !tag.is_empty() {
            compound.tag = Some(tag);
        }
    }

    // Conditions.
    while let Some((at, c)) = chars.next() {
        if c != '[' {
            return Err(SelectorError::Unexpected {
                found: c,
                at: bytes_at(at),
            });
        }
        let mut name = String::new();
        let mut matcher = AttrMatch::Present;
        let mut closed = false;
        while let Some((at, c)) = chars.next() {
            match c {
                ']' => {
                    closed = true;
                    break;
                }
                '~' => {
                    match chars.next() {
                        Some((_, '=')) => {}
                        Some((at, found)) => {
                            return Err(SelectorError::Unexpected {
                                found,
                                at: bytes_at(at),
                            });
                        }
                        None => return Err(SelectorError::Unterminated(src.to_string())),
                    }
                    matcher = AttrMatch::Includes(parse_value(&mut chars, src)?);
                }
                '=' => matcher = AttrMatch::Equals(parse_value(&mut chars, src)?),
                c if is_ident_char(c) && matches!(matcher, AttrMatch::Present) => {
                    name.push(c.to_ascii_lowercase());
                }
                found => {
                    return Err(SelectorError::Unexpected {
                        found,
                        at: bytes_at(at),
                    });
                }
            }
        }
        if !closed {
            return Err(SelectorError::Unterminated(src.to_string()));
        }
        if name.is_empty() {
            return Err(SelectorError::Empty);
        }
        compound.conditions.push(AttrCondition { name, matcher });
    }

    if compound.tag.is_none() && compound.conditions.is_empty() && !src.starts_with('*') {
        return Err(SelectorError::Empty);
    }
    Ok(compound)
}

fn parse_value(
    chars: &mut core::iter::Peekable<core::str::CharIndices<'_>>,
    src: &str,
) -> Result<String, SelectorError> {
    let mut value = String::new();
    match chars.peek().map(|&(_, c)| c) {
        Some(quote @ ('"' | '\'')) => {
            chars.next();
            loop {
                match chars.next() {
                    Some((_, c)) if c == quote => break,
                    Some((_, c)) => value.push(c),
                    None => return Err(SelectorError::Unterminated(src.to_string())),
                }
            }
        }
        _ => {
            while let Some(&(_, c)) = chars.peek() {
                if !is_ident_char(c) && c != '.' {
                    break;
                }
                value.push(c);
                chars.next();
            }
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<&'a str> {
        move |name| pairs.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    #[test]
    fn parses_attribute_list_and_renders_canonically() {
        let s = Selector::parse(" [data-action] , [data-shadowroot]").unwrap();
        assert_eq!(s.parts().len(), 2);
        assert_eq!(s.to_string(), "[data-action],[data-shadowroot]");
    }

    #[test]
    fn tag_and_includes_condition() {
        let s = Selector::parse("X-Foo[data-target~='x-foo.input']").unwrap();
        assert!(s.matches_with("x-foo", attrs(&[("data-target", "a x-foo.input b")])));
        assert!(!s.matches_with("x-foo", attrs(&[("data-target", "x-foo.inputs")])));
        assert!(!s.matches_with("x-bar", attrs(&[("data-target", "x-foo.input")])));
    }

    #[test]
    fn equals_and_universal() {
        let s = Selector::parse("*[mode=closed]").unwrap();
        assert!(s.matches_with("template", attrs(&[("mode", "closed")])));
        assert!(!s.matches_with("template", attrs(&[("mode", "open")])));
        assert!(Selector::parse("*").unwrap().matches_with("div", attrs(&[])));
    }

    #[test]
    fn empty_attribute_set_matches_nothing() {
        let s = Selector::any_attribute([]);
        assert!(s.is_empty());
        assert!(!s.matches_with("div", attrs(&[("data-action", "")])));
        assert_eq!(s.to_string(), "");
    }

    #[test]
    fn rejects_combinators_and_garbage() {
        assert!(matches!(
            Selector::parse("div span"),
            Err(SelectorError::Unexpected { found: ' ', at: 3 })
        ));
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("a,,b"), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse("[data-x"),
            Err(SelectorError::Unterminated(_))
        ));
        assert!(matches!(
            Selector::parse("[data-x=\"oops]"),
            Err(SelectorError::Unterminated(_))
        ));
    }
}
