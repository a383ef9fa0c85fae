//! Element query boundary: handles, the query trait, and a scriptable mock.
//!
//! [`ElementQuery`] is the full surface this crate needs from a WebDriver
//! client. Implementations answer "no match" with an empty result, never an
//! error; `Err` is reserved for transport/protocol failures and stale
//! handles, which the retry engine propagates instead of retrying.
//!
//! [`MockBrowser`] is an in-memory implementation for tests: a flat element
//! store plus a script of timed mutations, so a test can express "the row
//! appears on the third poll" or "the connection drops on the second query"
//! without a browser.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::locator::{Locator, Strategy};
use crate::result::{EsperarError, EsperarResult};
use crate::session::{Session, SessionId};

/// Reference to a DOM node inside a session
///
/// A weak reference: valid only while the owning session is live and the
/// node is still attached. Queries that dereference a dead handle fail
/// with [`EsperarError::StaleElement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned element id
    pub id: String,
    /// Session the element belongs to
    pub session: SessionId,
}

impl ElementHandle {
    /// Create a handle for a driver-assigned id
    #[must_use]
    pub fn new(id: impl Into<String>, session: SessionId) -> Self {
        Self {
            id: id.into(),
            session,
        }
    }
}

/// Result of a single-element lookup
///
/// "Not found" is a value, not an error, and carries no element to
/// accidentally dereference. Match on it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    /// A matching element
    Element(ElementHandle),
    /// No element matched
    Absent,
}

impl Found {
    /// Whether a matching element was found
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    /// The found element, if any
    #[must_use]
    pub fn element(self) -> Option<ElementHandle> {
        match self {
            Self::Element(handle) => Some(handle),
            Self::Absent => None,
        }
    }
}

/// Boundary to the WebDriver-style query client
///
/// The three operations the core needs: enumerate matches, fetch the first
/// match, and read selected state. Session and element lifetimes belong to
/// the implementation; this crate only reads.
pub trait ElementQuery {
    /// All elements matching `locator` in `session`
    ///
    /// # Errors
    ///
    /// Transport or protocol failure only. "No matches" is `Ok(vec![])`.
    fn query_elements(
        &self,
        session: Session,
        locator: &Locator,
    ) -> EsperarResult<Vec<ElementHandle>>;

    /// First element matching `locator`, or [`Found::Absent`]
    ///
    /// # Errors
    ///
    /// Transport or protocol failure only.
    fn query_element(&self, session: Session, locator: &Locator) -> EsperarResult<Found> {
        let mut matches = self.query_elements(session, locator)?;
        if matches.is_empty() {
            Ok(Found::Absent)
        } else {
            Ok(Found::Element(matches.remove(0)))
        }
    }

    /// Whether a checkbox, radio, or option element is currently selected
    ///
    /// # Errors
    ///
    /// [`EsperarError::StaleElement`] if the handle no longer refers to a
    /// live element; transport failures as usual. Never maps staleness to
    /// `Ok(false)`.
    fn is_selected(&self, element: &ElementHandle) -> EsperarResult<bool>;
}

// ============================================================================
// Mock browser
// ============================================================================

/// One DOM node in a [`MockBrowser`] page
///
/// Structural strategies (`Id`, `Name`, `Tag`, `ClassName`, `LinkText`,
/// `PartialLinkText`) are evaluated against the record's fields. `Css` and
/// `XPath` selectors are matched by declaration: the element lists the
/// selector strings it should answer to via [`MockElement::with_marker`].
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Driver-assigned element id
    pub element_id: String,
    /// Tag name
    pub tag: String,
    /// `id` attribute
    pub id_attr: Option<String>,
    /// `name` attribute
    pub name_attr: Option<String>,
    /// Class list
    pub classes: Vec<String>,
    /// Text content
    pub text: String,
    /// Selected/checked state
    pub selected: bool,
    /// Raw css/xpath selectors this element declares it matches
    pub markers: Vec<String>,
}

impl MockElement {
    /// Create an element with the given driver id and tag
    #[must_use]
    pub fn new(element_id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            tag: tag.into(),
            id_attr: None,
            name_attr: None,
            classes: Vec::new(),
            text: String::new(),
            selected: false,
            markers: Vec::new(),
        }
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id_attr = Some(id.into());
        self
    }

    /// Set the `name` attribute
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name_attr = Some(name.into());
        self
    }

    /// Add a class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the selected/checked state
    #[must_use]
    pub const fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Declare a raw css/xpath selector this element matches
    #[must_use]
    pub fn with_marker(mut self, selector: impl Into<String>) -> Self {
        self.markers.push(selector.into());
        self
    }

    fn matches(&self, locator: &Locator) -> bool {
        let selector = locator.selector.as_str();
        match locator.strategy {
            Strategy::Css | Strategy::XPath => self.markers.iter().any(|m| m == selector),
            Strategy::Id => self.id_attr.as_deref() == Some(selector),
            Strategy::Name => self.name_attr.as_deref() == Some(selector),
            Strategy::ClassName => self.classes.iter().any(|c| c == selector),
            Strategy::Tag => self.tag == selector,
            Strategy::LinkText => self.tag == "a" && self.text == selector,
            Strategy::PartialLinkText => self.tag == "a" && self.text.contains(selector),
        }
    }
}

#[derive(Debug, Clone)]
enum ScriptStep {
    Insert(MockElement),
    Remove(String),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    elements: Vec<MockElement>,
    script: Vec<(u64, ScriptStep)>,
    queries: u64,
}

impl MockState {
    /// Advance the query counter and apply every step that is due.
    /// Returns the scripted failure for this query, if one was scheduled.
    fn on_query(&mut self) -> Option<EsperarError> {
        self.queries += 1;
        let now = self.queries;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.script.len() {
            if self.script[i].0 <= now {
                due.push(self.script.remove(i).1);
            } else {
                i += 1;
            }
        }

        let mut failure = None;
        for step in due {
            match step {
                ScriptStep::Insert(element) => self.elements.push(element),
                ScriptStep::Remove(element_id) => {
                    self.elements.retain(|e| e.element_id != element_id);
                }
                ScriptStep::Fail(message) => failure = Some(EsperarError::transport(message)),
            }
        }
        failure
    }
}

/// Scriptable in-memory query client for tests
///
/// Hosts a single page; the session argument on queries is accepted but
/// not checked. Script indices count individual element queries, not
/// predicate polls; a finder pass issues one query per candidate tried.
/// [`MockBrowser::is_selected`] does not advance the counter.
#[derive(Debug, Default)]
pub struct MockBrowser {
    state: Mutex<MockState>,
}

impl MockBrowser {
    /// Create an empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element, visible from the next query on
    pub fn add_element(&self, element: MockElement) {
        if let Ok(mut state) = self.state.lock() {
            state.elements.push(element);
        }
    }

    /// Schedule `element` to be part of the page from the `query`th
    /// element query on (1-based)
    pub fn insert_at(&self, query: u64, element: MockElement) {
        if let Ok(mut state) = self.state.lock() {
            state.script.push((query, ScriptStep::Insert(element)));
        }
    }

    /// Schedule the element with the given driver id to disappear from the
    /// `query`th element query on
    pub fn remove_at(&self, query: u64, element_id: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.script.push((query, ScriptStep::Remove(element_id.into())));
        }
    }

    /// Schedule the `query`th element query to fail with a transport error
    ///
    /// One-shot: later queries succeed again.
    pub fn fail_at(&self, query: u64, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.script.push((query, ScriptStep::Fail(message.into())));
        }
    }

    /// Flip the selected state of the element with the given driver id
    pub fn set_selected(&self, element_id: &str, selected: bool) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(element) = state
                .elements
                .iter_mut()
                .find(|e| e.element_id == element_id)
            {
                element.selected = selected;
            }
        }
    }

    /// Number of element queries answered so far
    #[must_use]
    pub fn query_count(&self) -> u64 {
        self.state.lock().map(|s| s.queries).unwrap_or(0)
    }
}

impl ElementQuery for MockBrowser {
    fn query_elements(
        &self,
        session: Session,
        locator: &Locator,
    ) -> EsperarResult<Vec<ElementHandle>> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| EsperarError::transport("mock state poisoned"))?;
        if let Some(failure) = state.on_query() {
            return Err(failure);
        }
        Ok(state
            .elements
            .iter()
            .filter(|e| e.matches(locator))
            .map(|e| ElementHandle::new(e.element_id.clone(), session.id()))
            .collect())
    }

    fn is_selected(&self, element: &ElementHandle) -> EsperarResult<bool> {
        let state = self
            .state
            .lock()
            .map_err(|_| EsperarError::transport("mock state poisoned"))?;
        state
            .elements
            .iter()
            .find(|e| e.element_id == element.id)
            .map(|e| e.selected)
            .ok_or_else(|| EsperarError::stale(element.id.clone()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new()
    }

    mod found_tests {
        use super::*;

        #[test]
        fn test_is_present() {
            let handle = ElementHandle::new("e1", SessionId::new());
            assert!(Found::Element(handle).is_present());
            assert!(!Found::Absent.is_present());
        }

        #[test]
        fn test_element_accessor() {
            let handle = ElementHandle::new("e1", SessionId::new());
            assert_eq!(Found::Element(handle.clone()).element(), Some(handle));
            assert_eq!(Found::Absent.element(), None);
        }
    }

    mod element_handle_tests {
        use super::*;

        #[test]
        fn test_serde_round_trip() {
            let handle = ElementHandle::new("elem-7", SessionId::new());
            let json = serde_json::to_string(&handle).unwrap();
            let back: ElementHandle = serde_json::from_str(&json).unwrap();
            assert_eq!(back, handle);
        }
    }

    mod matching_tests {
        use super::*;

        fn anchor() -> MockElement {
            MockElement::new("e1", "a")
                .with_id("home-link")
                .with_name("nav")
                .with_class("primary")
                .with_text("Home page")
                .with_marker("a.primary")
        }

        #[test]
        fn test_id_strategy() {
            assert!(anchor().matches(&Locator::id("home-link")));
            assert!(!anchor().matches(&Locator::id("other")));
        }

        #[test]
        fn test_name_strategy() {
            assert!(anchor().matches(&Locator::name("nav")));
        }

        #[test]
        fn test_tag_strategy() {
            assert!(anchor().matches(&Locator::new(Strategy::Tag, "a")));
            assert!(!anchor().matches(&Locator::new(Strategy::Tag, "div")));
        }

        #[test]
        fn test_class_strategy() {
            assert!(anchor().matches(&Locator::new(Strategy::ClassName, "primary")));
        }

        #[test]
        fn test_link_text_is_exact_and_anchors_only() {
            assert!(anchor().matches(&Locator::link_text("Home page")));
            assert!(!anchor().matches(&Locator::link_text("Home")));
            let div = MockElement::new("e2", "div").with_text("Home page");
            assert!(!div.matches(&Locator::link_text("Home page")));
        }

        #[test]
        fn test_partial_link_text_is_substring() {
            let locator = Locator::new(Strategy::PartialLinkText, "Home");
            assert!(anchor().matches(&locator));
        }

        #[test]
        fn test_css_and_xpath_match_by_marker() {
            assert!(anchor().matches(&Locator::css("a.primary")));
            assert!(!anchor().matches(&Locator::css("a.secondary")));
            let marked = MockElement::new("e3", "td").with_marker("//td[1]");
            assert!(marked.matches(&Locator::xpath("//td[1]")));
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_query_elements_filters() {
            let browser = MockBrowser::new();
            browser.add_element(MockElement::new("e1", "div").with_marker("div.x"));
            browser.add_element(MockElement::new("e2", "div").with_marker("div.x"));
            browser.add_element(MockElement::new("e3", "span"));

            let found = browser
                .query_elements(session(), &Locator::css("div.x"))
                .unwrap();
            assert_eq!(found.len(), 2);
            assert_eq!(found[0].id, "e1");
        }

        #[test]
        fn test_query_element_takes_first_match() {
            let browser = MockBrowser::new();
            browser.add_element(MockElement::new("e1", "input").with_name("q"));
            browser.add_element(MockElement::new("e2", "input").with_name("q"));

            let found = browser
                .query_element(session(), &Locator::name("q"))
                .unwrap();
            assert_eq!(found.element().unwrap().id, "e1");
        }

        #[test]
        fn test_query_element_absent_on_empty_page() {
            let browser = MockBrowser::new();
            let found = browser
                .query_element(session(), &Locator::css("div.x"))
                .unwrap();
            assert_eq!(found, Found::Absent);
        }

        #[test]
        fn test_handles_carry_the_queried_session() {
            let browser = MockBrowser::new();
            browser.add_element(MockElement::new("e1", "div").with_marker("div.x"));
            let queried = session();
            let found = browser
                .query_elements(queried, &Locator::css("div.x"))
                .unwrap();
            assert_eq!(found[0].session, queried.id());
        }
    }

    mod script_tests {
        use super::*;

        #[test]
        fn test_insert_at_appears_on_scheduled_query() {
            let browser = MockBrowser::new();
            browser.insert_at(3, MockElement::new("e1", "tr").with_marker("tr.first"));
            let locator = Locator::css("tr.first");

            assert!(browser.query_elements(session(), &locator).unwrap().is_empty());
            assert!(browser.query_elements(session(), &locator).unwrap().is_empty());
            assert_eq!(browser.query_elements(session(), &locator).unwrap().len(), 1);
        }

        #[test]
        fn test_remove_at_disappears_on_scheduled_query() {
            let browser = MockBrowser::new();
            browser.add_element(MockElement::new("e1", "div").with_marker("div.x"));
            browser.remove_at(2, "e1");
            let locator = Locator::css("div.x");

            assert_eq!(browser.query_elements(session(), &locator).unwrap().len(), 1);
            assert!(browser.query_elements(session(), &locator).unwrap().is_empty());
        }

        #[test]
        fn test_fail_at_is_one_shot() {
            let browser = MockBrowser::new();
            browser.fail_at(2, "connection reset");
            let locator = Locator::css("div.x");

            assert!(browser.query_elements(session(), &locator).is_ok());
            let err = browser.query_elements(session(), &locator).unwrap_err();
            assert!(matches!(err, EsperarError::Transport { .. }));
            assert!(browser.query_elements(session(), &locator).is_ok());
        }

        #[test]
        fn test_query_count_tracks_queries() {
            let browser = MockBrowser::new();
            assert_eq!(browser.query_count(), 0);
            let _ = browser.query_elements(session(), &Locator::css("div"));
            let _ = browser.query_element(session(), &Locator::css("div"));
            assert_eq!(browser.query_count(), 2);
        }
    }

    mod selected_tests {
        use super::*;

        #[test]
        fn test_is_selected_reads_state() {
            let browser = MockBrowser::new();
            browser.add_element(
                MockElement::new("cb1", "input")
                    .with_id("terms")
                    .with_selected(true),
            );
            let handle = ElementHandle::new("cb1", SessionId::new());
            assert!(browser.is_selected(&handle).unwrap());
        }

        #[test]
        fn test_set_selected_flips_state() {
            let browser = MockBrowser::new();
            browser.add_element(MockElement::new("cb1", "input").with_id("terms"));
            let handle = ElementHandle::new("cb1", SessionId::new());

            assert!(!browser.is_selected(&handle).unwrap());
            browser.set_selected("cb1", true);
            assert!(browser.is_selected(&handle).unwrap());
        }

        #[test]
        fn test_unknown_handle_is_stale_not_false() {
            let browser = MockBrowser::new();
            let handle = ElementHandle::new("gone", SessionId::new());
            let err = browser.is_selected(&handle).unwrap_err();
            match err {
                EsperarError::StaleElement { id } => assert_eq!(id, "gone"),
                other => panic!("expected StaleElement, got {other:?}"),
            }
        }

        #[test]
        fn test_is_selected_does_not_advance_query_counter() {
            let browser = MockBrowser::new();
            browser.add_element(MockElement::new("cb1", "input"));
            let handle = ElementHandle::new("cb1", SessionId::new());
            let _ = browser.is_selected(&handle);
            assert_eq!(browser.query_count(), 0);
        }
    }
}
