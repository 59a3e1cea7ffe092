//! Link errors

use core::fmt;

use pideck_protocol::DecodeError;

use crate::state::{HandshakeError, Role};

/// Errors returned by [`super::Link`] operations
///
/// `E` is the transport error type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// The serial port failed; the link makes no retry
    Transport(E),
    /// The handshake was stepped after it completed
    Handshake(HandshakeError),
    /// A line with a known verb could not be decoded
    Decode(DecodeError),
    /// Command traffic attempted before the handshake completed
    NotReady,
    /// Operation reserved for the other end of the link
    WrongRole { required: Role },
    /// The blocking handshake ran out of attempts
    Timeout,
}

impl<E> LinkError<E> {
    /// Returns true for errors caused by the caller, not by the peer or port
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            LinkError::Handshake(_) | LinkError::NotReady | LinkError::WrongRole { .. }
        )
    }
}

impl<E> From<HandshakeError> for LinkError<E> {
    fn from(err: HandshakeError) -> Self {
        LinkError::Handshake(err)
    }
}

impl<E> From<DecodeError> for LinkError<E> {
    fn from(err: DecodeError) -> Self {
        LinkError::Decode(err)
    }
}

impl<E: fmt::Debug> fmt::Display for LinkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Transport(err) => write!(f, "serial transport failed: {:?}", err),
            LinkError::Handshake(err) => write!(f, "{}", err),
            LinkError::Decode(err) => write!(f, "{}", err),
            LinkError::NotReady => f.write_str("handshake not complete"),
            LinkError::WrongRole { required } => write!(f, "only the {} may do this", required),
            LinkError::Timeout => f.write_str("timed out waiting for handshake"),
        }
    }
}
