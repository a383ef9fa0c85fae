//! Locator strategies and injection-safe query construction.
//!
//! A [`Locator`] pairs a WebDriver selector [`Strategy`] with a selector
//! string. Caller-supplied text is never spliced into selector syntax
//! directly: [`xpath_literal`] renders arbitrary text as a valid XPath
//! string literal (switching quote style, or falling back to `concat(...)`
//! when the text mixes both quote kinds), and [`text_query`] builds the
//! page-wide text-containment query from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::result::EsperarError;

/// Selector strategy understood by WebDriver-style query clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// CSS selector (e.g., "table#fruit tr.first")
    Css,
    /// XPath expression
    XPath,
    /// Element `id` attribute
    Id,
    /// Element `name` attribute
    Name,
    /// Single class name
    ClassName,
    /// Tag name
    Tag,
    /// Exact anchor text
    LinkText,
    /// Substring anchor text
    PartialLinkText,
}

impl Strategy {
    /// Wire-protocol name for this strategy
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css selector",
            Self::XPath => "xpath",
            Self::Id => "id",
            Self::Name => "name",
            Self::ClassName => "class name",
            Self::Tag => "tag name",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = EsperarError;

    /// Parse a wire-protocol name or its short alias
    ///
    /// Accepts `"css selector"`/`"css"`, `"xpath"`, `"id"`, `"name"`,
    /// `"class name"`/`"class"`, `"tag name"`/`"tag"`,
    /// `"link text"`/`"link"`, `"partial link text"`/`"partial_link"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "css selector" | "css" => Ok(Self::Css),
            "xpath" => Ok(Self::XPath),
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "class name" | "class" => Ok(Self::ClassName),
            "tag name" | "tag" => Ok(Self::Tag),
            "link text" | "link" => Ok(Self::LinkText),
            "partial link text" | "partial_link" => Ok(Self::PartialLinkText),
            other => Err(EsperarError::UnknownStrategy {
                strategy: other.to_string(),
            }),
        }
    }
}

/// A (strategy, selector) pair handed to the query client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    /// How the selector is interpreted
    pub strategy: Strategy,
    /// The selector string itself
    pub selector: String,
}

impl Locator {
    /// Create a locator from a strategy and selector
    #[must_use]
    pub fn new(strategy: Strategy, selector: impl Into<String>) -> Self {
        Self {
            strategy,
            selector: selector.into(),
        }
    }

    /// CSS selector shorthand
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// XPath shorthand
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, selector)
    }

    /// `id` attribute shorthand
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::new(Strategy::Id, value)
    }

    /// `name` attribute shorthand
    #[must_use]
    pub fn name(value: impl Into<String>) -> Self {
        Self::new(Strategy::Name, value)
    }

    /// Exact anchor-text shorthand
    #[must_use]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, text)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.strategy, self.selector)
    }
}

// ============================================================================
// Query construction
// ============================================================================

/// Render arbitrary text as a syntactically valid XPath string literal.
///
/// XPath 1.0 string literals have no escape sequences, so the delimiter
/// quote cannot appear inside the literal. Text without single quotes is
/// single-quoted, text without double quotes is double-quoted, and text
/// containing both becomes a `concat(...)` expression that splices the
/// single quotes back in.
///
/// # Examples
///
/// ```
/// use esperar::locator::xpath_literal;
///
/// assert_eq!(xpath_literal("plain"), "'plain'");
/// assert_eq!(xpath_literal("it's"), "\"it's\"");
/// assert_eq!(
///     xpath_literal(r#"it's "fine""#),
///     r#"concat('it', "'", 's "fine"')"#
/// );
/// ```
#[must_use]
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    // Both quote kinds present. Split on single quotes; each chunk is then
    // single-quotable, and the separators are re-inserted double-quoted.
    let mut parts = Vec::new();
    for (i, chunk) in text.split('\'').enumerate() {
        if i > 0 {
            parts.push("\"'\"".to_string());
        }
        if !chunk.is_empty() {
            parts.push(format!("'{chunk}'"));
        }
    }
    format!("concat({})", parts.join(", "))
}

/// Collapse whitespace runs to single spaces and trim the ends.
///
/// Mirrors XPath's `normalize-space()` so a needle normalized here compares
/// equal against browser-side normalized text.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the page-wide text-containment query used by `has_text`.
///
/// Matches any element whose whitespace-normalized text content contains
/// the (normalized) needle. The needle is embedded via [`xpath_literal`],
/// so quotes in the caller's text cannot corrupt the query.
#[must_use]
pub fn text_query(text: &str) -> Locator {
    let literal = xpath_literal(&normalize_text(text));
    Locator::xpath(format!("//*[contains(normalize-space(.), {literal})]"))
}

// ============================================================================
// Tests
// ============================================================================
