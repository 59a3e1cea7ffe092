//! Message types for the Pideck protocol
//!
//! Messages are divided into two directions:
//! - Host → Display: handshake reply, UI commands, broadcasts
//! - Display → Host: handshake init, acknowledgements, broadcasts

use alloc::string::String;
use core::fmt;

use crate::lexer::encode_field;

// Literal lines
pub const HANDSHAKE_INIT: &str = "handshake stage1 init";
pub const HANDSHAKE_COMPLETE: &str = "handshake stage1 complete";
pub const ACK: &str = "ok";
/// Prefix of a broadcast line; the spelling is part of the wire format
pub const BROADCAST_RECEIVE: &str = "broadcast recieve";

/// Button action keyword for broadcasting buttons
pub(crate) const ACTION_BROADCAST: &str = "broadcast";
/// Button action keyword for locally dispatched buttons
const ACTION_DISPATCH: &str = "dispatch";

/// Verbs recognised by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verb {
    /// `ui clean`
    Clean,
    /// `ui button`
    Button,
    /// `ui bgcolor`
    BgColor,
    /// `ui textcolor`
    TextColor,
    /// `ui icon`
    Icon,
    /// `ok`
    Ack,
    /// `broadcast recieve`
    Broadcast,
}

impl Verb {
    /// Identify the verb from the first two words of a line
    pub fn recognize(first: &str, second: Option<&str>) -> Option<Self> {
        match (first, second) {
            ("ui", Some("clean")) => Some(Verb::Clean),
            ("ui", Some("button")) => Some(Verb::Button),
            ("ui", Some("bgcolor")) => Some(Verb::BgColor),
            ("ui", Some("textcolor")) => Some(Verb::TextColor),
            ("ui", Some("icon")) => Some(Verb::Icon),
            ("ok", _) => Some(Verb::Ack),
            ("broadcast", Some("recieve")) => Some(Verb::Broadcast),
            _ => None,
        }
    }

    /// Total number of words in a well-formed line
    pub fn arity(self) -> usize {
        match self {
            Verb::Clean => 4,
            Verb::Button => 9,
            Verb::BgColor | Verb::TextColor | Verb::Icon => 5,
            Verb::Ack => 1,
            Verb::Broadcast => 3,
        }
    }

    /// Returns true for `ui ...` commands, which are acknowledged
    pub fn is_ui(self) -> bool {
        !matches!(self, Verb::Ack | Verb::Broadcast)
    }

    /// Wire spelling of the verb
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Clean => "ui clean",
            Verb::Button => "ui button",
            Verb::BgColor => "ui bgcolor",
            Verb::TextColor => "ui textcolor",
            Verb::Icon => "ui icon",
            Verb::Ack => ACK,
            Verb::Broadcast => BROADCAST_RECEIVE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which color of a grid cell a color command sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorKind {
    Background,
    Text,
}

impl ColorKind {
    /// Verb carrying this kind on the wire
    pub fn verb(self) -> Verb {
        match self {
            ColorKind::Background => Verb::BgColor,
            ColorKind::Text => Verb::TextColor,
        }
    }
}

/// UI commands sent by the host to the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clear the deck and resize the grid
    Clean { width: u32, height: u32 },
    /// Place a button on the grid
    Button {
        x: u32,
        y: u32,
        x_span: u32,
        y_span: u32,
        text: String,
        /// Broadcast `message` when pressed instead of dispatching it locally
        broadcast: bool,
        message: String,
    },
    /// Set the background or text color of a button
    Color {
        kind: ColorKind,
        x: u32,
        y: u32,
        color: String,
    },
    /// Set the icon of a button
    Icon {
        x: u32,
        y: u32,
        payload_base64: String,
    },
}

impl Command {
    /// Verb of this command
    pub fn verb(&self) -> Verb {
        match self {
            Command::Clean { .. } => Verb::Clean,
            Command::Button { .. } => Verb::Button,
            Command::Color { kind, .. } => kind.verb(),
            Command::Icon { .. } => Verb::Icon,
        }
    }

    /// Decode a line that is expected to carry a UI command
    ///
    /// Replies (`ok`, broadcasts) and unknown lines yield `Ok(None)`.
    pub fn decode(line: &str) -> Result<Option<Self>, crate::DecodeError> {
        Ok(match crate::decode(line)? {
            Some(Incoming::Command(command)) => Some(command),
            _ => None,
        })
    }
}

/// Wire form of the command, without the line terminator
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Clean { width, height } => {
                write!(f, "{} {} {}", Verb::Clean, width, height)
            }
            Command::Button {
                x,
                y,
                x_span,
                y_span,
                text,
                broadcast,
                message,
            } => {
                let action = if *broadcast {
                    ACTION_BROADCAST
                } else {
                    ACTION_DISPATCH
                };
                write!(
                    f,
                    "{} {} {} {} {} {} {} {}",
                    Verb::Button,
                    x,
                    y,
                    x_span,
                    y_span,
                    encode_field(text),
                    action,
                    encode_field(message)
                )
            }
            Command::Color { kind, x, y, color } => {
                write!(f, "{} {} {} {}", kind.verb(), x, y, encode_field(color))
            }
            Command::Icon {
                x,
                y,
                payload_base64,
            } => write!(
                f,
                "{} {} {} {}",
                Verb::Icon,
                x,
                y,
                encode_field(payload_base64)
            ),
        }
    }
}

/// Messages a link writes to its peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outgoing<'a> {
    /// Device asks the host to complete the handshake
    HandshakeInit,
    /// Host confirms the handshake
    HandshakeComplete,
    /// A UI command was decoded successfully
    Ack,
    /// A broadcasting button was activated
    BroadcastReceive(&'a str),
    /// UI command re-emitted to a downstream display
    Command(&'a Command),
}

impl Outgoing<'_> {
    /// Encode the message as a newline-terminated line
    pub fn to_line(&self) -> String {
        use alloc::string::ToString;

        let mut line = self.to_string();
        line.push('\n');
        line
    }
}

impl fmt::Display for Outgoing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outgoing::HandshakeInit => f.write_str(HANDSHAKE_INIT),
            Outgoing::HandshakeComplete => f.write_str(HANDSHAKE_COMPLETE),
            Outgoing::Ack => f.write_str(ACK),
            Outgoing::BroadcastReceive(token) => {
                write!(f, "{} {}", BROADCAST_RECEIVE, encode_field(token))
            }
            Outgoing::Command(command) => fmt::Display::fmt(command, f),
        }
    }
}

/// Messages decoded from a received line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// A UI command, to be acknowledged
    Command(Command),
    /// The peer acknowledged one of our commands
    Ack,
    /// A peer button broadcast its correlation token
    Broadcast { token: String },
}
