//! Browser session handles and the ambient current-session registry.
//!
//! A [`Session`] names one browser automation connection. The external
//! query client owns the connection's lifetime; this crate only reads the
//! handle. Every finder and predicate call takes a `Session` explicitly.
//!
//! For harnesses that drive a single session, a process-scoped ambient
//! default is available as configuration: register it with [`set_current`]
//! during suite setup, read it with [`current`], and remove it with
//! [`clear_current`] during teardown. The registry is plain configuration
//! state, not a session manager; nothing in this crate writes to it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;
use uuid::Uuid;

/// Unique identifier for one browser automation connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh random identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to one browser automation connection
///
/// Sessions are not safe to share across threads that mutate the same
/// page concurrently; give each test thread its own session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
}

impl Session {
    /// Create a handle with a fresh identifier
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
        }
    }

    /// Create a handle for a known identifier
    #[must_use]
    pub const fn with_id(id: SessionId) -> Self {
        Self { id }
    }

    /// The identifier this handle names
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session {}", self.id)
    }
}

// ============================================================================
// Ambient current-session registry
// ============================================================================

static CURRENT: RwLock<Option<Session>> = RwLock::new(None);

/// Register `session` as the process-wide ambient session
///
/// Call once during suite setup. Replaces any previously registered
/// session. Pair with [`clear_current`] in teardown.
pub fn set_current(session: Session) {
    if let Ok(mut current) = CURRENT.write() {
        *current = Some(session);
    }
}

/// The ambient session registered via [`set_current`]
///
/// # Errors
///
/// Returns [`EsperarError::NoSession`](crate::EsperarError::NoSession) if
/// no session is registered.
pub fn current() -> crate::EsperarResult<Session> {
    CURRENT
        .read()
        .ok()
        .and_then(|current| *current)
        .ok_or(crate::EsperarError::NoSession)
}

/// Remove the ambient session
///
/// Call during suite teardown so later suites start from a clean slate.
pub fn clear_current() {
    if let Ok(mut current) = CURRENT.write() {
        *current = None;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod session_id_tests {
        use super::*;

        #[test]
        fn test_ids_are_unique() {
            assert_ne!(SessionId::new(), SessionId::new());
        }

        #[test]
        fn test_display_is_uuid_shaped() {
            let rendered = SessionId::new().to_string();
            assert_eq!(rendered.len(), 36);
            assert_eq!(rendered.matches('-').count(), 4);
        }

        #[test]
        fn test_serde_round_trip() {
            let id = SessionId::new();
            let json = serde_json::to_string(&id).unwrap();
            let back: SessionId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, back);
        }
    }

    mod session_tests {
        use super::*;

        #[test]
        fn test_with_id_preserves_id() {
            let id = SessionId::new();
            assert_eq!(Session::with_id(id).id(), id);
        }

        #[test]
        fn test_copies_compare_equal() {
            let session = Session::new();
            let copy = session;
            assert_eq!(session, copy);
        }

        #[test]
        fn test_display_names_the_id() {
            let session = Session::new();
            assert!(session.to_string().contains(&session.id().to_string()));
        }
    }

    mod registry_tests {
        use super::*;

        // Single test because the registry is process-global: parallel
        // tests mutating it would interleave.
        #[test]
        fn test_registry_lifecycle() {
            let first = Session::new();
            let second = Session::new();

            set_current(first);
            assert_eq!(current().unwrap(), first);

            set_current(second);
            assert_eq!(current().unwrap(), second);

            clear_current();
            assert!(matches!(current(), Err(crate::EsperarError::NoSession)));
        }
    }
}
