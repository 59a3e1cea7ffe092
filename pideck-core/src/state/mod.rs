//! Connection state
//!
//! A link is either still negotiating readiness with its peer or ready for
//! command traffic. The transition is one-way.

pub mod handshake;

pub use handshake::{Handshake, HandshakeError, HandshakeState, Role, Step};
