//! # Virtual Machine Module
//!
//! This module contains all things related to the virtual machine.
//!
//! ### What is this machine?
//!
//! This virtual machine is a deterministic single-tape Turing machine.
//! A program for it is a [`TransitionTable`]: an ordered list of states,
//! each with an *entry direction* that moves the cursor the instant the
//! machine enters the state, a map from the symbol under the cursor to the
//! next state, and a map from the symbol under the cursor to the symbol
//! that overwrites it.
//!
//! ### What data can it use?
//!
//! The tape holds [`Symbol`]s. Numbers are stored in unary as runs of
//! [`Symbol::One`] separated by single [`Symbol::Blank`]s. The two scratch
//! symbols are markers that a table may use while it runs, but that must
//! be gone again by the time the table reaches its accept or reject state.
//!
//! ### How is it built?
//!
//! Tables are never written out as literals. They are assembled with a
//! [`TableBuilder`], which numbers states as they are appended, stitches
//! tables together in sequence, and checks the result for consistency.
use serde_derive::{Deserialize, Serialize};
use std::fmt;

mod builder;
mod core;
mod interpreter;
mod tape;

pub use self::builder::*;
pub use self::core::*;
pub use self::interpreter::*;
pub use self::tape::*;

/// A symbol that can be written on the tape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    /// Padding, and the delimiter between registers.
    Blank,
    /// A unary digit.
    One,
    /// A transient marker.
    ScratchX,
    /// A second transient marker, used as a checkpoint.
    ScratchA,
}

impl Symbol {
    /// Every symbol of the alphabet.
    pub const ALL: [Symbol; 4] = [Symbol::Blank, Symbol::One, Symbol::ScratchX, Symbol::ScratchA];

    /// The character this symbol is written as.
    pub fn as_char(self) -> char {
        match self {
            Symbol::Blank => '#',
            Symbol::One => '1',
            Symbol::ScratchX => 'x',
            Symbol::ScratchA => 'a',
        }
    }

    /// Read a symbol from its character.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '#' => Some(Symbol::Blank),
            '1' => Some(Symbol::One),
            'x' => Some(Symbol::ScratchX),
            'a' => Some(Symbol::ScratchA),
            _ => None,
        }
    }

    /// Is this one of the transient markers?
    pub fn is_scratch(self) -> bool {
        matches!(self, Symbol::ScratchX | Symbol::ScratchA)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The direction a state moves the cursor when it is entered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Stay on the current cell.
    #[default]
    None,
    /// Move one cell toward the start of the tape.
    Left,
    /// Move one cell toward the end of the tape.
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::None => write!(f, "none"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// An error produced by the virtual machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The machine read a symbol its current state has no transition for.
    UndefinedTransition { state: usize, symbol: Symbol },
    /// A table failed the consistency check.
    MalformedTable(String),
    /// The machine took more steps than it was allowed.
    StepLimitExceeded(usize),
    /// A tape was read from a string containing a character outside `{'#', '1'}`.
    InvalidSymbol(char, usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UndefinedTransition { state, symbol } => {
                write!(f, "state {state} has no transition on `{symbol}`")
            }
            Error::MalformedTable(reason) => write!(f, "malformed transition table: {reason}"),
            Error::StepLimitExceeded(limit) => {
                write!(f, "machine did not halt within {limit} steps")
            }
            Error::InvalidSymbol(ch, position) => {
                write!(f, "invalid tape symbol {ch:?} at position {position}")
            }
        }
    }
}
