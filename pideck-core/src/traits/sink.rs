//! Dispatch sink for decoded events

use alloc::vec::Vec;

use pideck_protocol::{DecodeError, Event};

/// Consumer of the events produced by one tick
///
/// The presentation layer implements this. Outgoing traffic (broadcasts)
/// goes back through [`crate::link::Link::send_broadcast`].
pub trait DispatchSink {
    /// Handle one tick's events, in frame arrival order
    ///
    /// A `LoadingStatus` event, if present, is always first.
    fn on_events(&mut self, events: &[Event]);

    /// Handle a line that named a known verb but could not be decoded
    ///
    /// The line was not acknowledged. Default: ignore.
    fn on_rejected(&mut self, _line: &str, _error: &DecodeError) {}
}

/// Collects every event, in order
impl DispatchSink for Vec<Event> {
    fn on_events(&mut self, events: &[Event]) {
        self.extend_from_slice(events);
    }
}

impl<S: DispatchSink + ?Sized> DispatchSink for &mut S {
    fn on_events(&mut self, events: &[Event]) {
        S::on_events(self, events)
    }

    fn on_rejected(&mut self, line: &str, error: &DecodeError) {
        S::on_rejected(self, line, error)
    }
}
