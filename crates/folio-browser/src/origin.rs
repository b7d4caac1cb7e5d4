//! Origin gate for inbound `postMessage` frames.
//!
//! Both windows only talk to their same-origin counterpart. Anything else
//! on the page (extensions, embedded widgets, hostile frames) can post to
//! us too, so every inbound frame is gated on `event.origin` before it is
//! even parsed. Failing the gate has no side effects beyond a log line.

/// Strict origin equality. Origins are compared as the serialized strings
/// the browser hands out (`scheme://host[:port]`), no normalization.
pub fn same_origin(own_origin: &str, event_origin: &str) -> bool {
    !own_origin.is_empty() && own_origin == event_origin
}

/// What became of an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum InboundOutcome<T> {
    /// Frame passed the gate, parsed, and was applied.
    Applied(T),
    /// `event.origin` was foreign; dropped unparsed.
    IgnoredOrigin,
    /// Same-origin frame that is not a protocol message; dropped.
    IgnoredMalformed,
}

impl<T> InboundOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}
