//! Grid cells

use alloc::string::String;
use alloc::vec::Vec;

/// Local dispatches a button may trigger
pub const SUPPORTED_DISPATCHES: &[&str] = &["nop"];

/// What pressing a button does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send `broadcast recieve <token>` to the host
    Broadcast(String),
    /// Run a local dispatch
    Dispatch(String),
}

impl Action {
    /// Build the action for a decoded button
    ///
    /// Returns `None` for a dispatch this deck cannot run.
    pub fn new(broadcast: bool, message: &str) -> Option<Self> {
        if broadcast {
            return Some(Action::Broadcast(String::from(message)));
        }

        let name = message.to_ascii_lowercase();
        SUPPORTED_DISPATCHES
            .contains(&name.as_str())
            .then_some(Action::Dispatch(name))
    }

    /// Broadcast token, if this action broadcasts
    pub fn token(&self) -> Option<&str> {
        match self {
            Action::Broadcast(token) => Some(token),
            Action::Dispatch(_) => None,
        }
    }
}

/// One grid position
///
/// A freshly cleaned grid is full of blank cells; `ui button` replaces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub x_span: u32,
    pub y_span: u32,
    pub action: Option<Action>,
    /// `#RRGGBB` or a color name, passed through untouched
    pub background: Option<String>,
    pub text_color: Option<String>,
    /// Decoded icon image bytes
    pub icon: Option<Vec<u8>>,
    /// Toggled by `broadcast recieve` for this cell's token
    pub active: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

impl Cell {
    /// Empty 1x1 cell with no action
    pub fn blank() -> Self {
        Self {
            text: String::new(),
            x_span: 1,
            y_span: 1,
            action: None,
            background: None,
            text_color: None,
            icon: None,
            active: false,
        }
    }

    /// Button cell
    pub fn button(text: &str, x_span: u32, y_span: u32, action: Action) -> Self {
        Self {
            text: String::from(text),
            x_span,
            y_span,
            action: Some(action),
            ..Self::blank()
        }
    }

    pub fn is_blank(&self) -> bool {
        self.action.is_none()
    }

    /// Returns true if pressing this cell broadcasts `token`
    pub fn broadcasts(&self, token: &str) -> bool {
        self.action
            .as_ref()
            .and_then(Action::token)
            .is_some_and(|own| own == token)
    }
}
