//! Semantic element lookup: kind + human-facing text to a concrete match.
//!
//! Test authors name elements the way users see them ("the Email field",
//! "the Sign in button"), not by selector. [`find`] maps an
//! [`ElementKind`] plus that text to an ordered list of candidate
//! [`Locator`]s and returns the first hit, or [`Found::Absent`] when
//! nothing matches.
//!
//! The finder is a single best-effort pass: it never retries. Predicates
//! compose it with [`crate::retry`] to tolerate pages that are still
//! rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::driver::{ElementQuery, Found};
use crate::locator::{normalize_text, xpath_literal, Locator};
use crate::result::EsperarResult;
use crate::session::Session;

/// Semantic locator kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Text-like `<input>` or `<textarea>`
    FillableField,
    /// Anchor element
    Link,
    /// `<button>` or button-typed `<input>`
    Button,
    /// Checkbox or radio `<input>`
    CheckboxOrRadio,
    /// `<select>` element
    Select,
    /// `<table>` element
    Table,
}

impl ElementKind {
    /// Human-readable kind name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FillableField => "fillable field",
            Self::Link => "link",
            Self::Button => "button",
            Self::CheckboxOrRadio => "checkbox or radio",
            Self::Select => "select",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<input type=...>` values that render as buttons
const BUTTON_INPUT_TYPES: &str =
    "@type = 'submit' or @type = 'button' or @type = 'image' or @type = 'reset'";

/// XPath fragment selecting `for` attributes of labels whose normalized
/// text equals `label`
fn label_for(label: &str) -> String {
    format!(
        "//label[normalize-space(.) = {}]/@for",
        xpath_literal(&normalize_text(label))
    )
}

/// Candidate locators for `kind`, in the order they are tried.
///
/// First match wins. The precedence per kind:
///
/// - `FillableField`: id attribute, name attribute, `<label for=...>`
///   association (input/textarea), placeholder (input/textarea).
/// - `Link`: id attribute, exact link text, title attribute, nested
///   `<img alt=...>`.
/// - `Button`: id attribute, value (submit/button/image/reset inputs),
///   visible `<button>` text, name attribute (both button forms).
/// - `CheckboxOrRadio`: id attribute, name attribute, `<label for=...>`
///   association (checkbox/radio inputs only).
/// - `Select`: id attribute, name attribute, `<label for=...>`
///   association.
/// - `Table`: id attribute, `<caption>` text.
///
/// The id and name candidates use the plain id/name strategies, so they
/// cannot filter on element type: an id lookup for a fillable field will
/// match whatever element carries that id. Label and visible-text
/// comparisons normalize whitespace on both sides; all caller text is
/// embedded via [`xpath_literal`].
#[must_use]
pub fn candidates(kind: ElementKind, text: &str) -> Vec<Locator> {
    let attr = xpath_literal(text);
    match kind {
        ElementKind::FillableField => {
            let assoc = label_for(text);
            vec![
                Locator::id(text),
                Locator::name(text),
                Locator::xpath(format!(
                    "//input[@id = {assoc}] | //textarea[@id = {assoc}]"
                )),
                Locator::xpath(format!(
                    "//input[@placeholder = {attr}] | //textarea[@placeholder = {attr}]"
                )),
            ]
        }
        ElementKind::Link => vec![
            Locator::id(text),
            Locator::link_text(text),
            Locator::xpath(format!("//a[@title = {attr}]")),
            Locator::xpath(format!("//a[img[@alt = {attr}]]")),
        ],
        ElementKind::Button => {
            let label = xpath_literal(&normalize_text(text));
            vec![
                Locator::id(text),
                Locator::xpath(format!(
                    "//input[({BUTTON_INPUT_TYPES}) and @value = {attr}]"
                )),
                Locator::xpath(format!("//button[normalize-space(.) = {label}]")),
                Locator::xpath(format!(
                    "//input[({BUTTON_INPUT_TYPES}) and @name = {attr}] | //button[@name = {attr}]"
                )),
            ]
        }
        ElementKind::CheckboxOrRadio => {
            let assoc = label_for(text);
            vec![
                Locator::id(text),
                Locator::name(text),
                Locator::xpath(format!(
                    "//input[(@type = 'checkbox' or @type = 'radio') and @id = {assoc}]"
                )),
            ]
        }
        ElementKind::Select => {
            let assoc = label_for(text);
            vec![
                Locator::id(text),
                Locator::name(text),
                Locator::xpath(format!("//select[@id = {assoc}]")),
            ]
        }
        ElementKind::Table => {
            let caption = xpath_literal(&normalize_text(text));
            vec![
                Locator::id(text),
                Locator::xpath(format!("//table[caption[normalize-space(.) = {caption}]]")),
            ]
        }
    }
}

/// Find the first element matching any candidate locator for `kind`.
///
/// A single synchronous pass over the candidates; no match is
/// [`Found::Absent`], never an error.
///
/// # Errors
///
/// Transport/protocol failures from the client propagate.
pub fn find<C: ElementQuery>(
    client: &C,
    session: Session,
    kind: ElementKind,
    text: &str,
) -> EsperarResult<Found> {
    for locator in candidates(kind, text) {
        match client.query_element(session, &locator)? {
            Found::Element(handle) => {
                debug!(%kind, %locator, element = %handle.id, "candidate matched");
                return Ok(Found::Element(handle));
            }
            Found::Absent => {}
        }
    }
    Ok(Found::Absent)
}

/// Selected/checked state of the first matching element.
///
/// `None` when no candidate matches; `Some(state)` otherwise.
///
/// # Errors
///
/// Client failures propagate, including a stale handle between lookup and
/// state read.
pub fn selected_state<C: ElementQuery>(
    client: &C,
    session: Session,
    kind: ElementKind,
    text: &str,
) -> EsperarResult<Option<bool>> {
    match find(client, session, kind, text)? {
        Found::Element(handle) => Ok(Some(client.is_selected(&handle)?)),
        Found::Absent => Ok(None),
    }
}

// ============================================================================
// Tests
// ============================================================================
