//! Deck model
//!
//! Keeps the state a display client renders: either the loading screen or a
//! grid of buttons. The deck is fed by [`pideck_core::Link::dispatch`] and
//! never talks to the port itself; [`Deck::press`] hands the broadcast token
//! back to the caller, who sends it with [`pideck_core::Link::send_broadcast`].

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pideck_core::DispatchSink;
use pideck_protocol::{ColorKind, Command, DecodeError, Event};

use crate::cell::{Action, Cell};

/// Largest grid a `ui clean` may ask for
pub const MAX_GRID_CELLS: u32 = 1024;

/// Errors from applying an event to the deck
///
/// These never stop the link; the deck collects them for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeckError {
    /// No cell at this position, or the position is outside the grid
    InvalidCoordinates { x: u32, y: u32 },
    /// The button names a local dispatch the deck cannot run
    UnsupportedDispatch { x: u32, y: u32 },
    /// The icon payload is not valid base64
    InvalidIcon { x: u32, y: u32 },
    /// `ui clean` asked for more than [`MAX_GRID_CELLS`] cells
    GridTooLarge { width: u32, height: u32 },
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::InvalidCoordinates { x, y } => write!(f, "no cell at ({}, {})", x, y),
            DeckError::UnsupportedDispatch { x, y } => {
                write!(f, "button at ({}, {}) has an unsupported dispatch", x, y)
            }
            DeckError::InvalidIcon { x, y } => write!(f, "icon for ({}, {}) is not base64", x, y),
            DeckError::GridTooLarge { width, height } => {
                write!(f, "grid {}x{} is too large", width, height)
            }
        }
    }
}

/// What the deck is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Loading text, until the first `ui clean`
    Loading,
    /// The button grid
    Grid,
}

/// Headless button deck
#[derive(Debug, Clone)]
pub struct Deck {
    screen: Screen,
    loading_text: String,
    width: u32,
    height: u32,
    cells: BTreeMap<(u32, u32), Cell>,
    /// Whether the deck needs to be redrawn
    dirty: bool,
    acks: usize,
    errors: Vec<DeckError>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Create a deck showing an empty loading screen
    pub fn new() -> Self {
        Self {
            screen: Screen::Loading,
            loading_text: String::new(),
            width: 0,
            height: 0,
            cells: BTreeMap::new(),
            dirty: true,
            acks: 0,
            errors: Vec::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn loading_text(&self) -> &str {
        &self.loading_text
    }

    /// Grid size as (width, height)
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<&Cell> {
        self.cells.get(&(x, y))
    }

    /// All cells with their (x, y) position, column by column
    pub fn cells(&self) -> impl Iterator<Item = ((u32, u32), &Cell)> {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    /// Check if the deck needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the deck as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Number of `ok` replies seen
    pub fn acks(&self) -> usize {
        self.acks
    }

    pub fn errors(&self) -> &[DeckError] {
        &self.errors
    }

    /// Return the collected errors and forget them
    pub fn take_errors(&mut self) -> Vec<DeckError> {
        core::mem::take(&mut self.errors)
    }

    /// Apply one event
    pub fn apply(&mut self, event: &Event) -> Result<(), DeckError> {
        match event {
            Event::LoadingStatus { text } => {
                self.screen = Screen::Loading;
                self.loading_text.clone_from(text);
                self.dirty = true;
            }
            Event::Command(command) => self.apply_command(command)?,
            Event::Ack => self.acks += 1,
            Event::Broadcast { token } => self.toggle(token),
        }
        Ok(())
    }

    /// Press the cell at (x, y)
    ///
    /// Returns the token to broadcast if the cell is a broadcasting button.
    pub fn press(&mut self, x: u32, y: u32) -> Option<String> {
        if self.screen != Screen::Grid {
            return None;
        }
        let cell = self.cells.get(&(x, y))?;
        self.dirty = true;

        match cell.action.as_ref()? {
            Action::Broadcast(token) => {
                debug!("pressed ({}, {}), broadcasting", x, y);
                Some(token.clone())
            }
            // nop
            Action::Dispatch(_) => None,
        }
    }

    fn apply_command(&mut self, command: &Command) -> Result<(), DeckError> {
        match command {
            Command::Clean { width, height } => self.clean(*width, *height)?,
            Command::Button {
                x,
                y,
                x_span,
                y_span,
                text,
                broadcast,
                message,
            } => {
                let cell = self.cell_mut(*x, *y)?;
                let Some(action) = Action::new(*broadcast, message) else {
                    *cell = Cell::blank();
                    self.dirty = true;
                    return Err(DeckError::UnsupportedDispatch { x: *x, y: *y });
                };
                *cell = Cell::button(text, *x_span, *y_span, action);
            }
            Command::Color { kind, x, y, color } => {
                let cell = self.cell_mut(*x, *y)?;
                let slot = match kind {
                    ColorKind::Background => &mut cell.background,
                    ColorKind::Text => &mut cell.text_color,
                };
                *slot = Some(color.clone());
            }
            Command::Icon {
                x,
                y,
                payload_base64,
            } => {
                let cell = self.cell_mut(*x, *y)?;
                let icon = STANDARD
                    .decode(payload_base64)
                    .map_err(|_| DeckError::InvalidIcon { x: *x, y: *y })?;
                cell.icon = Some(icon);
            }
        }

        debug!("applied {}", command.verb());
        self.dirty = true;
        Ok(())
    }

    /// Resize the grid, fill it with blank cells and show it
    fn clean(&mut self, width: u32, height: u32) -> Result<(), DeckError> {
        if width.saturating_mul(height) > MAX_GRID_CELLS {
            return Err(DeckError::GridTooLarge { width, height });
        }

        self.width = width;
        self.height = height;
        self.cells = (0..width)
            .flat_map(|x| (0..height).map(move |y| ((x, y), Cell::blank())))
            .collect();
        self.screen = Screen::Grid;
        info!("deck resized to {}x{}", width, height);
        Ok(())
    }

    fn cell_mut(&mut self, x: u32, y: u32) -> Result<&mut Cell, DeckError> {
        self.cells
            .get_mut(&(x, y))
            .ok_or(DeckError::InvalidCoordinates { x, y })
    }

    fn toggle(&mut self, token: &str) {
        for cell in self.cells.values_mut().filter(|cell| cell.broadcasts(token)) {
            cell.active = !cell.active;
            self.dirty = true;
        }
    }
}

impl DispatchSink for Deck {
    fn on_events(&mut self, events: &[Event]) {
        for event in events {
            if let Err(err) = self.apply(event) {
                warn!("deck: {}", err);
                self.errors.push(err);
            }
        }
    }

    fn on_rejected(&mut self, line: &str, error: &DecodeError) {
        warn!("deck: dropped '{}': {}", line, error);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Deck {
    fn format(&self, f: defmt::Formatter) {
        match self.screen {
            Screen::Loading => defmt::write!(f, "Deck[loading: {}]", self.loading_text.as_str()),
            Screen::Grid => defmt::write!(
                f,
                "Deck[{}x{}, {} buttons]",
                self.width,
                self.height,
                self.cells.values().filter(|cell| !cell.is_blank()).count()
            ),
        }
    }
}
