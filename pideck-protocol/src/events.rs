//! Events handed to the presentation layer

use alloc::string::String;

use crate::messages::{Command, Incoming};

/// Loading text shown while the device waits for the host
pub const LOADING_WAITING: &str = "Initial Loading\nWaiting for host...";

/// Loading text shown on the tick the handshake completes
pub const LOADING_ONLINE: &str = "Initial Loading\nHost is online!";

/// Events produced while draining one tick's frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Connection progress while the handshake is pending
    LoadingStatus { text: String },
    /// A decoded UI command (already acknowledged)
    Command(Command),
    /// The peer acknowledged one of our commands
    Ack,
    /// A peer broadcast its correlation token
    Broadcast { token: String },
}

impl Event {
    /// Loading status event with the given text
    pub fn loading(text: &str) -> Self {
        Event::LoadingStatus {
            text: String::from(text),
        }
    }

    /// Returns true if this is a loading status
    pub fn is_loading_status(&self) -> bool {
        matches!(self, Event::LoadingStatus { .. })
    }

    /// Returns the UI command carried by this event, if any
    pub fn command(&self) -> Option<&Command> {
        match self {
            Event::Command(command) => Some(command),
            _ => None,
        }
    }
}

impl From<Incoming> for Event {
    fn from(incoming: Incoming) -> Self {
        match incoming {
            Incoming::Command(command) => Event::Command(command),
            Incoming::Ack => Event::Ack,
            Incoming::Broadcast { token } => Event::Broadcast { token },
        }
    }
}
