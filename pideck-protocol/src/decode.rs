//! Line decoder
//!
//! Turns one received line into at most one [`Incoming`] message. Lines whose
//! verb is unknown are ignored so that newer peers can add verbs without
//! breaking older decoders; lines with a known verb but bad arguments are
//! rejected with a [`DecodeError`].

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::lexer::{tokenize, LexError};
use crate::messages::{ColorKind, Command, Incoming, Verb, ACTION_BROADCAST};

/// Errors that can occur while decoding a line with a known verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The line could not be split into words
    Lex(LexError),
    /// Wrong number of words for the verb
    Arity {
        verb: Verb,
        expected: usize,
        found: usize,
    },
    /// A word that must be a base-10 unsigned integer is not one
    InvalidInteger { verb: Verb, index: usize },
    /// Recognised but unsupported variant (e.g. a themed `ui clean`)
    Unsupported { verb: Verb },
}

impl From<LexError> for DecodeError {
    fn from(err: LexError) -> Self {
        DecodeError::Lex(err)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Lex(err) => write!(f, "cannot split line: {}", err),
            DecodeError::Arity {
                verb,
                expected,
                found,
            } => write!(f, "`{}` takes {} words, got {}", verb, expected, found),
            DecodeError::InvalidInteger { verb, index } => {
                write!(f, "`{}` word {} is not an unsigned integer", verb, index)
            }
            DecodeError::Unsupported { verb } => write!(f, "unsupported `{}` variant", verb),
        }
    }
}

/// Drop quote characters from a word of a line that failed to split
fn strip_quotes(word: &str) -> String {
    word.chars().filter(|c| !matches!(c, '\'' | '"')).collect()
}

/// Decode a received line
///
/// Returns `Ok(None)` for blank lines and lines with an unknown verb.
pub fn decode(line: &str) -> Result<Option<Incoming>, DecodeError> {
    let words = match tokenize(line) {
        Ok(words) => words,
        Err(err) => {
            // Unknown verbs are ignored even when the rest of the line is garbage
            let mut raw = line.split_whitespace().map(strip_quotes);
            let first = raw.next();
            let second = raw.next();
            let known = first
                .and_then(|first| Verb::recognize(&first, second.as_deref()))
                .is_some();
            return if known { Err(err.into()) } else { Ok(None) };
        }
    };

    let Some(first) = words.first() else {
        return Ok(None);
    };
    let Some(verb) = Verb::recognize(first, words.get(1).map(String::as_str)) else {
        return Ok(None);
    };

    check_arity(verb, &words)?;
    decode_words(verb, words).map(Some)
}

fn check_arity(verb: Verb, words: &[String]) -> Result<(), DecodeError> {
    let expected = verb.arity();
    match words.len() {
        n if n == expected => Ok(()),
        // `ui clean <w> <h> <theme>`
        5 if verb == Verb::Clean => Err(DecodeError::Unsupported { verb }),
        found => Err(DecodeError::Arity {
            verb,
            expected,
            found,
        }),
    }
}

/// Build the message from a word list of the right length
fn decode_words(verb: Verb, words: Vec<String>) -> Result<Incoming, DecodeError> {
    let int = |index: usize| parse_uint(verb, &words, index);

    let message = match verb {
        Verb::Clean => Incoming::Command(Command::Clean {
            width: int(2)?,
            height: int(3)?,
        }),
        Verb::Button => {
            let (x, y, x_span, y_span) = (int(2)?, int(3)?, int(4)?, int(5)?);
            let mut rest = words.into_iter().skip(6);
            let text = rest.next().unwrap_or_default();
            let broadcast = rest.next().is_some_and(|action| action == ACTION_BROADCAST);
            let message = rest.next().unwrap_or_default();
            Incoming::Command(Command::Button {
                x,
                y,
                x_span,
                y_span,
                text,
                broadcast,
                message,
            })
        }
        Verb::BgColor | Verb::TextColor => {
            let kind = if verb == Verb::BgColor {
                ColorKind::Background
            } else {
                ColorKind::Text
            };
            let (x, y) = (int(2)?, int(3)?);
            Incoming::Command(Command::Color {
                kind,
                x,
                y,
                color: last_word(words),
            })
        }
        Verb::Icon => {
            let (x, y) = (int(2)?, int(3)?);
            Incoming::Command(Command::Icon {
                x,
                y,
                payload_base64: last_word(words),
            })
        }
        Verb::Ack => Incoming::Ack,
        Verb::Broadcast => Incoming::Broadcast {
            token: last_word(words),
        },
    };

    Ok(message)
}

fn last_word(mut words: Vec<String>) -> String {
    words.pop().unwrap_or_default()
}

/// Parse a base-10 unsigned integer, digits only
fn parse_uint(verb: Verb, words: &[String], index: usize) -> Result<u32, DecodeError> {
    let invalid = DecodeError::InvalidInteger { verb, index };
    let word = words.get(index).ok_or(invalid)?;
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid);
    }
    word.parse().map_err(|_| invalid)
}
