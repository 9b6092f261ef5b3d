// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item selectors: which elements under a root count as sortable items.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

/// A query describing which elements under a root are selected.
///
/// Parsed from a tiny subset of CSS selector syntax:
///
/// | input       | selector                         |
/// |-------------|----------------------------------|
/// | `">"`, `"> *"` | [`Selector::Children`]       |
/// | `"> li"`    | [`Selector::ChildTag`]`("li")`   |
/// | `"*"`       | [`Selector::Descendants`]        |
/// | `"li"`      | [`Selector::DescendantTag`]`("li")` |
///
/// ```
/// use dragdrop_surface::Selector;
///
/// let s: Selector = "> div".parse().unwrap();
/// assert_eq!(s, Selector::ChildTag("div".into()));
/// assert!("> a b".parse::<Selector>().is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Every direct child.
    #[default]
    Children,
    /// Direct children with the given tag.
    ChildTag(String),
    /// Every descendant, in document order.
    Descendants,
    /// Descendants with the given tag, in document order.
    DescendantTag(String),
}

impl Selector {
    /// Returns true if the selector only looks at direct children.
    pub fn is_shallow(&self) -> bool {
        matches!(self, Self::Children | Self::ChildTag(_))
    }

    /// Returns true if an element with `tag` satisfies the tag part of the selector.
    pub fn matches_tag(&self, tag: &str) -> bool {
        match self {
            Self::Children | Self::Descendants => true,
            Self::ChildTag(t) | Self::DescendantTag(t) => t.eq_ignore_ascii_case(tag),
        }
    }
}

/// Error returned when a selector string is not in the supported subset.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The input was empty or only whitespace.
    #[error("empty selector")]
    Empty,
    /// The input contained more than one compound (`"a b"`, `"> a > b"`).
    #[error("unsupported compound selector `{0}`")]
    Compound(String),
    /// A tag contained characters outside `[A-Za-z0-9_-]`.
    #[error("invalid tag name `{0}`")]
    InvalidTag(String),
}

fn parse_tag(raw: &str) -> Result<Option<String>, SelectorError> {
    if raw == "*" {
        return Ok(None);
    }
    if raw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(Some(raw.to_ascii_lowercase()))
    } else {
        Err(SelectorError::InvalidTag(raw.to_string()))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SelectorError::Empty);
        }
        let (shallow, rest) = match s.strip_prefix('>') {
            Some(rest) => (true, rest.trim()),
            None => (false, s),
        };
        if rest.contains(|c: char| c.is_whitespace() || c == '>') {
            return Err(SelectorError::Compound(s.to_string()));
        }
        if rest.is_empty() {
            return if shallow {
                Ok(Self::Children)
            } else {
                Err(SelectorError::Empty)
            };
        }
        Ok(match (shallow, parse_tag(rest)?) {
            (true, None) => Self::Children,
            (true, Some(tag)) => Self::ChildTag(tag),
            (false, None) => Self::Descendants,
            (false, Some(tag)) => Self::DescendantTag(tag),
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Children => f.write_str("> *"),
            Self::ChildTag(t) => write!(f, "> {t}"),
            Self::Descendants => f.write_str("*"),
            Self::DescendantTag(t) => f.write_str(t),
        }
    }
}
