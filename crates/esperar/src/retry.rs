//! Polling retry engine with process-wide timing defaults.
//!
//! Browser pages mutate asynchronously, so a single query proves nothing:
//! [`retry_with`] invokes a probe immediately, then re-invokes it at a
//! fixed interval until it reports `true` or an overall deadline passes.
//! Exhausting the deadline is a normal `Ok(false)` outcome, never an
//! error; an `Err` from the probe itself (transport fault, stale handle)
//! aborts the loop immediately and propagates.
//!
//! One consequence callers should know: `Ok(false)` covers both "the
//! probe was genuinely false" and "the deadline passed while it stayed
//! false". The two are not distinguishable from the return value; the
//! resolution details appear only in debug-level trace events.
//!
//! [`retry`] uses the process-wide default policy. Suites that need
//! different timing either pass an explicit [`RetryPolicy`] or adjust the
//! defaults during setup and call [`reset_defaults`] in teardown.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::result::EsperarResult;

/// Default overall deadline for one retry loop (2 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Default pause between consecutive probes (50 milliseconds)
pub const DEFAULT_INTERVAL_MS: u64 = 50;

/// Timing for one retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Overall deadline, measured from just before the first probe
    pub timeout: Duration,
    /// Pause between consecutive probes
    pub interval: Duration,
}

impl RetryPolicy {
    /// Policy with the given deadline and the default interval
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }

    /// Set the deadline
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the inter-probe pause
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Short deadline, tight polling. Keeps polling tests quick.
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            timeout: Duration::from_millis(500),
            interval: Duration::from_millis(10),
        }
    }

    /// Zero deadline: the probe runs exactly once
    #[must_use]
    pub const fn single_shot() -> Self {
        Self {
            timeout: Duration::ZERO,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

// ============================================================================
// Process-wide defaults
// ============================================================================

static TIMEOUT_MS: AtomicU64 = AtomicU64::new(DEFAULT_TIMEOUT_MS);
static INTERVAL_MS: AtomicU64 = AtomicU64::new(DEFAULT_INTERVAL_MS);

/// The policy [`retry`] currently resolves to
#[must_use]
pub fn current_policy() -> RetryPolicy {
    RetryPolicy {
        timeout: Duration::from_millis(TIMEOUT_MS.load(Ordering::SeqCst)),
        interval: Duration::from_millis(INTERVAL_MS.load(Ordering::SeqCst)),
    }
}

/// Set the process-wide deadline (truncated to whole milliseconds)
pub fn set_default_timeout(timeout: Duration) {
    TIMEOUT_MS.store(timeout.as_millis() as u64, Ordering::SeqCst);
}

/// Set the process-wide inter-probe pause (truncated to whole milliseconds)
pub fn set_default_interval(interval: Duration) {
    INTERVAL_MS.store(interval.as_millis() as u64, Ordering::SeqCst);
}

/// Set both process-wide values from one policy
pub fn configure_defaults(policy: RetryPolicy) {
    set_default_timeout(policy.timeout);
    set_default_interval(policy.interval);
}

/// Restore the compiled-in defaults
///
/// Pair with [`configure_defaults`]: suites that adjust the defaults in
/// setup call this in teardown so later suites see the stock timing.
pub fn reset_defaults() {
    TIMEOUT_MS.store(DEFAULT_TIMEOUT_MS, Ordering::SeqCst);
    INTERVAL_MS.store(DEFAULT_INTERVAL_MS, Ordering::SeqCst);
}

// ============================================================================
// Engine
// ============================================================================

/// Poll `probe` under the process-wide default policy
///
/// # Errors
///
/// Whatever the probe itself reports; never a timeout.
pub fn retry<F>(probe: F) -> EsperarResult<bool>
where
    F: FnMut() -> EsperarResult<bool>,
{
    retry_with(current_policy(), probe)
}

/// Poll `probe` under an explicit policy
///
/// The probe runs immediately; `Ok(true)` returns at once. Otherwise the
/// engine sleeps `policy.interval` and probes again until
/// `policy.timeout` has elapsed since just before the first invocation,
/// then returns `Ok(false)`. The probe always runs at least once, even
/// with a zero timeout.
///
/// # Errors
///
/// Any `Err` from the probe propagates immediately, aborting the loop.
/// Retrying is only for "not yet", never for a broken client.
pub fn retry_with<F>(policy: RetryPolicy, mut probe: F) -> EsperarResult<bool>
where
    F: FnMut() -> EsperarResult<bool>,
{
    let start = Instant::now();
    let mut attempts: u64 = 0;

    loop {
        attempts += 1;
        trace!(attempt = attempts, "probing");

        if probe()? {
            debug!(
                attempts,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "probe satisfied"
            );
            return Ok(true);
        }

        if start.elapsed() >= policy.timeout {
            debug!(
                attempts,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "budget exhausted, reporting false"
            );
            return Ok(false);
        }

        std::thread::sleep(policy.interval);
    }
}

// ============================================================================
// Tests
// ============================================================================
