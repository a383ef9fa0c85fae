//! Page predicates: the boolean assertion surface over one session.
//!
//! A [`Page`] borrows a query client and carries the session every call
//! runs against. Each predicate builds a probe closure and hands it to the
//! retry engine, so both positive (`has_x`) and negative (`has_no_x`)
//! checks tolerate pages that are still mutating. `has_no_x` polls too:
//! an element that is about to disappear must eventually make the
//! predicate true, and a naive inverted single check would not wait.
//!
//! All predicates return `Ok(bool)`. A `false` can mean "confirmed" or
//! "deadline passed while still false"; client failures surface as `Err`.

use std::fmt;

use crate::driver::ElementQuery;
use crate::finder::{self, ElementKind};
use crate::locator::{text_query, Locator};
use crate::result::EsperarResult;
use crate::retry::{self, RetryPolicy};
use crate::session::{self, Session};

/// Predicate surface for one browser session
///
/// # Examples
///
/// ```
/// use esperar::{MockBrowser, MockElement, Page, RetryPolicy, Session};
///
/// let browser = MockBrowser::new();
/// browser.add_element(MockElement::new("e1", "div").with_marker("div.banner"));
///
/// let page = Page::new(&browser, Session::new()).with_policy(RetryPolicy::fast());
/// assert!(page.has_css("div.banner")?);
/// assert!(page.has_no_css("div.missing")?);
/// # Ok::<(), esperar::EsperarError>(())
/// ```
pub struct Page<'c, C: ElementQuery> {
    client: &'c C,
    session: Session,
    policy: Option<RetryPolicy>,
}

impl<'c, C: ElementQuery> Page<'c, C> {
    /// Predicates over an explicitly supplied session
    #[must_use]
    pub const fn new(client: &'c C, session: Session) -> Self {
        Self {
            client,
            session,
            policy: None,
        }
    }

    /// Predicates over the ambient session registered via
    /// [`session::set_current`]
    ///
    /// # Errors
    ///
    /// [`EsperarError::NoSession`](crate::EsperarError::NoSession) when no
    /// ambient session is registered.
    pub fn attached(client: &'c C) -> EsperarResult<Self> {
        Ok(Self::new(client, session::current()?))
    }

    /// Pin the retry timing for this page
    ///
    /// Without an override, every predicate call reads the process-wide
    /// policy at call time.
    #[must_use]
    pub const fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// The session this page queries
    #[must_use]
    pub const fn session(&self) -> Session {
        self.session
    }

    fn poll<F>(&self, probe: F) -> EsperarResult<bool>
    where
        F: FnMut() -> EsperarResult<bool>,
    {
        let policy = self.policy.unwrap_or_else(retry::current_policy);
        retry::retry_with(policy, probe)
    }

    // ------------------------------------------------------------------
    // Raw locators
    // ------------------------------------------------------------------

    /// True once any element matches `locator`
    ///
    /// # Errors
    ///
    /// Client transport/protocol failures propagate unretried.
    pub fn has_selector(&self, locator: &Locator) -> EsperarResult<bool> {
        self.poll(|| {
            Ok(self
                .client
                .query_element(self.session, locator)?
                .is_present())
        })
    }

    /// True once no element matches `locator`
    ///
    /// # Errors
    ///
    /// Client transport/protocol failures propagate unretried.
    pub fn has_no_selector(&self, locator: &Locator) -> EsperarResult<bool> {
        self.poll(|| {
            Ok(!self
                .client
                .query_element(self.session, locator)?
                .is_present())
        })
    }

    /// True once exactly `count` elements match `locator`
    ///
    /// # Errors
    ///
    /// Client transport/protocol failures propagate unretried.
    pub fn has_selector_count(&self, locator: &Locator, count: usize) -> EsperarResult<bool> {
        self.poll(|| Ok(self.client.query_elements(self.session, locator)?.len() == count))
    }

    /// [`has_selector`](Self::has_selector) over a CSS selector
    pub fn has_css(&self, selector: &str) -> EsperarResult<bool> {
        self.has_selector(&Locator::css(selector))
    }

    /// [`has_no_selector`](Self::has_no_selector) over a CSS selector
    pub fn has_no_css(&self, selector: &str) -> EsperarResult<bool> {
        self.has_no_selector(&Locator::css(selector))
    }

    /// [`has_selector_count`](Self::has_selector_count) over a CSS selector
    pub fn has_css_count(&self, selector: &str, count: usize) -> EsperarResult<bool> {
        self.has_selector_count(&Locator::css(selector), count)
    }

    /// [`has_selector`](Self::has_selector) over an XPath expression
    pub fn has_xpath(&self, selector: &str) -> EsperarResult<bool> {
        self.has_selector(&Locator::xpath(selector))
    }

    /// [`has_no_selector`](Self::has_no_selector) over an XPath expression
    pub fn has_no_xpath(&self, selector: &str) -> EsperarResult<bool> {
        self.has_no_selector(&Locator::xpath(selector))
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// True once any element's normalized text contains `text`
    ///
    /// The needle is whitespace-normalized and embedded as a proper XPath
    /// literal, so quotes and metacharacters in it match literally instead
    /// of corrupting the query.
    ///
    /// # Errors
    ///
    /// Client transport/protocol failures propagate unretried.
    pub fn has_text(&self, text: &str) -> EsperarResult<bool> {
        self.has_selector(&text_query(text))
    }

    /// True once no element's normalized text contains `text`
    ///
    /// # Errors
    ///
    /// Client transport/protocol failures propagate unretried.
    pub fn has_no_text(&self, text: &str) -> EsperarResult<bool> {
        self.has_no_selector(&text_query(text))
    }

    // ------------------------------------------------------------------
    // Semantic kinds
    // ------------------------------------------------------------------

    /// True once the finder locates a `kind` element for `text`
    ///
    /// # Errors
    ///
    /// Client transport/protocol failures propagate unretried.
    pub fn has_element(&self, kind: ElementKind, text: &str) -> EsperarResult<bool> {
        self.poll(|| Ok(finder::find(self.client, self.session, kind, text)?.is_present()))
    }

    /// True once the finder locates no `kind` element for `text`
    ///
    /// # Errors
    ///
    /// Client transport/protocol failures propagate unretried.
    pub fn has_no_element(&self, kind: ElementKind, text: &str) -> EsperarResult<bool> {
        self.poll(|| Ok(!finder::find(self.client, self.session, kind, text)?.is_present()))
    }

    /// True once a fillable field matches `text`
    pub fn has_field(&self, text: &str) -> EsperarResult<bool> {
        self.has_element(ElementKind::FillableField, text)
    }

    /// True once no fillable field matches `text`
    pub fn has_no_field(&self, text: &str) -> EsperarResult<bool> {
        self.has_no_element(ElementKind::FillableField, text)
    }

    /// True once a link matches `text`
    pub fn has_link(&self, text: &str) -> EsperarResult<bool> {
        self.has_element(ElementKind::Link, text)
    }

    /// True once no link matches `text`
    pub fn has_no_link(&self, text: &str) -> EsperarResult<bool> {
        self.has_no_element(ElementKind::Link, text)
    }

    /// True once a button matches `text`
    pub fn has_button(&self, text: &str) -> EsperarResult<bool> {
        self.has_element(ElementKind::Button, text)
    }

    /// True once no button matches `text`
    pub fn has_no_button(&self, text: &str) -> EsperarResult<bool> {
        self.has_no_element(ElementKind::Button, text)
    }

    /// True once a select matches `text`
    pub fn has_select(&self, text: &str) -> EsperarResult<bool> {
        self.has_element(ElementKind::Select, text)
    }

    /// True once no select matches `text`
    pub fn has_no_select(&self, text: &str) -> EsperarResult<bool> {
        self.has_no_element(ElementKind::Select, text)
    }

    /// True once a table matches `text`
    pub fn has_table(&self, text: &str) -> EsperarResult<bool> {
        self.has_element(ElementKind::Table, text)
    }

    /// True once no table matches `text`
    pub fn has_no_table(&self, text: &str) -> EsperarResult<bool> {
        self.has_no_element(ElementKind::Table, text)
    }

    // ------------------------------------------------------------------
    // Checked state
    // ------------------------------------------------------------------

    fn checkbox_state(&self, text: &str) -> EsperarResult<Option<bool>> {
        finder::selected_state(self.client, self.session, ElementKind::CheckboxOrRadio, text)
    }

    /// True once a checkbox/radio matching `text` exists and is checked
    ///
    /// An absent element is `false`, the same as an unchecked one; only
    /// the combination found-and-checked satisfies the probe.
    ///
    /// # Errors
    ///
    /// Stale-handle and transport failures propagate unretried.
    pub fn has_checked_field(&self, text: &str) -> EsperarResult<bool> {
        self.poll(|| match self.checkbox_state(text)? {
            Some(selected) => Ok(selected),
            None => Ok(false),
        })
    }

    /// True once no checked checkbox/radio matches `text`
    ///
    /// Satisfied by an absent element or an unchecked one.
    ///
    /// # Errors
    ///
    /// Stale-handle and transport failures propagate unretried.
    pub fn has_no_checked_field(&self, text: &str) -> EsperarResult<bool> {
        self.poll(|| match self.checkbox_state(text)? {
            Some(selected) => Ok(!selected),
            None => Ok(true),
        })
    }

    /// True once a checkbox/radio matching `text` exists and is unchecked
    ///
    /// An absent element is `false`: absence is not conflated with
    /// "unchecked".
    ///
    /// # Errors
    ///
    /// Stale-handle and transport failures propagate unretried.
    pub fn has_unchecked_field(&self, text: &str) -> EsperarResult<bool> {
        self.poll(|| match self.checkbox_state(text)? {
            Some(selected) => Ok(!selected),
            None => Ok(false),
        })
    }

    /// True once no unchecked checkbox/radio matches `text`
    ///
    /// Satisfied by an absent element or a checked one.
    ///
    /// # Errors
    ///
    /// Stale-handle and transport failures propagate unretried.
    pub fn has_no_unchecked_field(&self, text: &str) -> EsperarResult<bool> {
        self.poll(|| match self.checkbox_state(text)? {
            Some(selected) => Ok(selected),
            None => Ok(true),
        })
    }
}

impl<C: ElementQuery> fmt::Debug for Page<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("session", &self.session)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
