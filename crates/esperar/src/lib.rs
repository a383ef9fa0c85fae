//! Esperar: Polling Browser-State Assertions
//!
//! Esperar (Spanish: "to wait / to expect") turns single-shot DOM queries
//! into boolean predicates that poll a live browser session until the page
//! reaches the asserted state or a deadline passes. Pages mutate
//! asynchronously after load, so `has_no_css` the instant after a click
//! proves nothing; polling both the positive and the negative predicates
//! is what makes the booleans trustworthy.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    ESPERAR Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │   ┌───────────┐    ┌──────────┐    ┌──────────────────────┐  │
//! │   │ Page      │───►│ Retry    │───►│ Finder / Locator     │  │
//! │   │ predicates│    │ engine   │    │ (candidate queries)  │  │
//! │   └───────────┘    └──────────┘    └──────────┬───────────┘  │
//! │                                               │              │
//! │                                    ┌──────────▼───────────┐  │
//! │                                    │ ElementQuery client  │  │
//! │                                    │ (WebDriver session)  │  │
//! │                                    └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Predicates build probe closures, the retry engine polls them, and each
//! probe issues fresh queries through the [`ElementQuery`] boundary.
//! Timeouts come back as plain `false`; client failures come back as
//! errors, never silently retried.
//!
//! # Quick start
//!
//! ```
//! use esperar::{MockBrowser, MockElement, Page, RetryPolicy, Session};
//!
//! let browser = MockBrowser::new();
//! browser.add_element(MockElement::new("b1", "button").with_id("save"));
//! browser.insert_at(3, MockElement::new("n1", "div").with_marker("div.notice"));
//!
//! let page = Page::new(&browser, Session::new()).with_policy(RetryPolicy::fast());
//!
//! // Present right away.
//! assert!(page.has_button("save")?);
//! // Appears on the third query; polling finds it before the deadline.
//! assert!(page.has_css("div.notice")?);
//! # Ok::<(), esperar::EsperarError>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod driver;
pub mod finder;
pub mod locator;
pub mod page;
pub mod result;
pub mod retry;
pub mod session;

pub use driver::{ElementHandle, ElementQuery, Found, MockBrowser, MockElement};
pub use finder::{candidates, find, selected_state, ElementKind};
pub use locator::{normalize_text, text_query, xpath_literal, Locator, Strategy};
pub use page::Page;
pub use result::{EsperarError, EsperarResult};
pub use retry::{
    configure_defaults, current_policy, reset_defaults, retry, retry_with,
    set_default_interval, set_default_timeout, RetryPolicy, DEFAULT_INTERVAL_MS,
    DEFAULT_TIMEOUT_MS,
};
pub use session::{Session, SessionId};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::driver::*;
    pub use super::finder::*;
    pub use super::locator::*;
    pub use super::page::*;
    pub use super::result::*;
    pub use super::retry::*;
    pub use super::session::{clear_current, current, set_current, Session, SessionId};
}
