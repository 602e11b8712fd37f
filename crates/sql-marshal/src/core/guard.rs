//! Exactly-once release for statements and cursors.

use tracing::warn;

use super::traits::Close;
use crate::error::SqlFailure;

/// Outcome of an explicit close request on a scoped resource.
///
/// The swallowed-failure policy is a named variant rather than an empty
/// catch block: a close failure during cleanup never masks the operation's
/// primary result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The resource closed cleanly on the first request.
    Closed,
    /// Close had already run; the request is tolerated and does nothing.
    AlreadyClosed,
    /// Close failed; the failure is swallowed by policy and carried here
    /// for callers that want to inspect it.
    SecondaryFailureIgnored(SqlFailure),
}

/// Scoped owner of a closeable resource.
///
/// Guarantees the resource is closed exactly once on every exit path —
/// explicit [`close`](Scoped::close) or drop — and tolerates double-close.
///
/// # Example
///
/// ```ignore
/// let mut stmt = Scoped::new(backend_statement);
/// encoder.encode(&mut *stmt, &value, 1)?;
/// // closed here whether encode succeeded or returned early
/// ```
pub struct Scoped<T: Close> {
    inner: T,
    closed: bool,
}

impl<T: Close> Scoped<T> {
    /// Take ownership of a resource.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    /// Whether the resource has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the resource. Safe to call more than once.
    pub fn close(&mut self) -> CloseOutcome {
        if self.closed {
            return CloseOutcome::AlreadyClosed;
        }
        self.closed = true;
        match self.inner.close() {
            Ok(()) => CloseOutcome::Closed,
            Err(failure) => {
                warn!(%failure, "ignoring close failure during release");
                CloseOutcome::SecondaryFailureIgnored(failure)
            }
        }
    }
}

impl<T: Close> std::ops::Deref for Scoped<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: Close> std::ops::DerefMut for Scoped<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: Close> Drop for Scoped<T> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
