//! Handshake state machine
//!
//! Both ends start `Pending`. The device repeats `handshake stage1 init` on
//! every step until it sees `handshake stage1 complete`; the host stays silent
//! until it sees an init and then answers once.

use core::fmt;

use pideck_protocol::{Frame, Outgoing, HANDSHAKE_COMPLETE, HANDSHAKE_INIT};
use serde::Deserialize;

/// Which end of the link this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Controller driving the deck; answers the handshake
    Host,
    /// Display client; initiates the handshake
    Device,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Host => f.write_str("host"),
            Role::Device => f.write_str("device"),
        }
    }
}

/// Link readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeState {
    /// Waiting for the peer; no command traffic accepted
    Pending,
    /// Ready for command traffic
    Complete,
}

/// Errors from stepping the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeError {
    /// The handshake already completed; callers must check the state first
    AlreadyComplete,
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeError::AlreadyComplete => f.write_str("handshake already complete"),
        }
    }
}

/// Outcome of one handshake step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Line to send to the peer, if any
    pub reply: Option<Outgoing<'static>>,
    /// State after this step
    pub state: HandshakeState,
}

/// Handshake for one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handshake {
    role: Role,
    state: HandshakeState,
}

impl Handshake {
    /// Create a pending handshake
    pub const fn new(role: Role) -> Self {
        Self {
            role,
            state: HandshakeState::Pending,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == HandshakeState::Complete
    }

    /// Work out the step for `frame` without applying it
    ///
    /// This is the core transition logic; [`Handshake::advance`] commits it
    /// once the reply has been sent.
    pub fn next(&self, frame: &Frame) -> Result<Step, HandshakeError> {
        if self.is_complete() {
            return Err(HandshakeError::AlreadyComplete);
        }

        let step = match self.role {
            Role::Host if frame.contains(HANDSHAKE_INIT) => Step {
                reply: Some(Outgoing::HandshakeComplete),
                state: HandshakeState::Complete,
            },
            Role::Host => Step {
                reply: None,
                state: HandshakeState::Pending,
            },
            // The device keeps announcing itself, even on the step that completes
            Role::Device => Step {
                reply: Some(Outgoing::HandshakeInit),
                state: if frame.contains(HANDSHAKE_COMPLETE) {
                    HandshakeState::Complete
                } else {
                    HandshakeState::Pending
                },
            },
        };

        Ok(step)
    }

    /// Commit a step returned by [`Handshake::next`]
    ///
    /// The state only ever moves from `Pending` to `Complete`.
    pub fn advance(&mut self, step: &Step) {
        if step.state == HandshakeState::Complete {
            self.state = HandshakeState::Complete;
        }
    }

    /// Compute and commit a step in one go
    pub fn step(&mut self, frame: &Frame) -> Result<Step, HandshakeError> {
        let step = self.next(frame)?;
        self.advance(&step);
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_waits_silently() {
        let mut handshake = Handshake::new(Role::Host);
        let step = handshake.step(&Frame::new("ui clean 2 2")).unwrap();
        assert_eq!(step.reply, None);
        assert_eq!(handshake.state(), HandshakeState::Pending);

        let step = handshake.step(&Frame::empty()).unwrap();
        assert_eq!(step.reply, None);
    }

    #[test]
    fn test_host_answers_init() {
        let mut handshake = Handshake::new(Role::Host);
        let step = handshake
            .step(&Frame::new("garbage handshake stage1 init garbage"))
            .unwrap();
        assert_eq!(step.reply, Some(Outgoing::HandshakeComplete));
        assert!(handshake.is_complete());
    }

    #[test]
    fn test_device_always_sends_init() {
        let mut handshake = Handshake::new(Role::Device);
        for line in ["", "noise", "handshake stage1 init"] {
            let step = handshake.step(&Frame::new(line)).unwrap();
            assert_eq!(step.reply, Some(Outgoing::HandshakeInit));
            assert_eq!(step.state, HandshakeState::Pending);
        }

        let step = handshake
            .step(&Frame::new("handshake stage1 complete"))
            .unwrap();
        assert_eq!(step.reply, Some(Outgoing::HandshakeInit));
        assert_eq!(step.state, HandshakeState::Complete);
        assert!(handshake.is_complete());
    }

    #[test]
    fn test_step_after_complete_fails() {
        for (role, line) in [
            (Role::Host, HANDSHAKE_INIT),
            (Role::Device, HANDSHAKE_COMPLETE),
        ] {
            let mut handshake = Handshake::new(role);
            handshake.step(&Frame::new(line)).unwrap();

            let again = handshake.step(&Frame::new(line));
            assert_eq!(again, Err(HandshakeError::AlreadyComplete));
            assert!(handshake.is_complete());
        }
    }

    #[test]
    fn test_next_does_not_mutate() {
        let handshake = Handshake::new(Role::Host);
        let step = handshake.next(&Frame::new(HANDSHAKE_INIT)).unwrap();
        assert_eq!(step.state, HandshakeState::Complete);
        assert_eq!(handshake.state(), HandshakeState::Pending);
    }
}
