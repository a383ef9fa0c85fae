//! Result and error types for Esperar.

use thiserror::Error;

/// Result type for Esperar operations
pub type EsperarResult<T> = Result<T, EsperarError>;

/// Errors that can occur in Esperar
///
/// Timeouts are deliberately absent: exhausting a retry budget is a normal
/// `false` outcome, not an error (see [`crate::retry`]).
#[derive(Debug, Error)]
pub enum EsperarError {
    /// No browser session registered
    #[error("No active session. Call session::set_current before querying")]
    NoSession,

    /// Connection or protocol failure reported by the query client
    #[error("Transport failure: {message}")]
    Transport {
        /// Error message from the underlying client
        message: String,
    },

    /// Element handle no longer refers to a live DOM node
    #[error("Stale element reference: {id}")]
    StaleElement {
        /// Driver-assigned element id
        id: String,
    },

    /// Locator strategy name not in the recognized set
    #[error("Unknown locator strategy: {strategy:?}")]
    UnknownStrategy {
        /// The unrecognized strategy name as supplied by the caller
        strategy: String,
    },
}

impl EsperarError {
    /// Build a transport error from any client-reported failure message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a stale-element error for the given driver-assigned id.
    pub fn stale(id: impl Into<String>) -> Self {
        Self::StaleElement { id: id.into() }
    }
}

// ============================================================================
// Tests
// ============================================================================
