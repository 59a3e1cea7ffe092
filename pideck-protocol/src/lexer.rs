//! Field escaping and shell-style word splitting
//!
//! A line goes through two layers on the way in:
//!
//! 1. [`unescape`]: `\\` becomes `\` and the two characters `\n` become a
//!    newline, in a single left-to-right scan.
//! 2. [`split`]: POSIX shell word splitting with `shell_words`. Single
//!    quotes are literal, double quotes honour `\"` and `\\`, a backslash
//!    outside quotes escapes the next character, and adjacent segments join
//!    into one word.
//!
//! [`encode_field`] applies the inverse for outgoing fields.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Errors that can occur while splitting a line into words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LexError {
    /// A quote was opened but never closed
    UnmatchedQuote,
}

impl From<shell_words::ParseError> for LexError {
    fn from(_: shell_words::ParseError) -> Self {
        LexError::UnmatchedQuote
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnmatchedQuote => f.write_str("unmatched quote"),
        }
    }
}

/// Undo the wire escaping of backslashes and newlines
pub fn unescape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            _ => out.push('\\'),
        }
    }

    out
}

/// Stands in for `#` while splitting
const HASH_PLACEHOLDER: char = '\u{E000}';

/// Split unescaped text into words
///
/// `#` is an ordinary character on this wire (`ui bgcolor 3 0 #FF0000`), but
/// `shell_words` treats it as the start of a comment, so it is swapped out
/// for the duration of the split.
pub fn split(input: &str) -> Result<Vec<String>, LexError> {
    if !input.contains('#') || input.contains(HASH_PLACEHOLDER) {
        return shell_words::split(input).map_err(LexError::from);
    }

    let masked = input.replace('#', "\u{E000}");
    let words = shell_words::split(&masked)?;
    Ok(words
        .into_iter()
        .map(|word| word.replace(HASH_PLACEHOLDER, "#"))
        .collect())
}

/// Unescape and split a received line
pub fn tokenize(line: &str) -> Result<Vec<String>, LexError> {
    split(&unescape(line))
}

/// Quote a field so [`split`] returns it as a single word
pub fn quote(field: &str) -> String {
    shell_words::quote(field).into_owned()
}

/// Apply the wire escaping undone by [`unescape`]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

/// Quote and escape a field for an outgoing line
pub fn encode_field(field: &str) -> String {
    escape(&quote(field))
}
