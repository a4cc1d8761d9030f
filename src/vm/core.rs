//! # Transition Tables
//!
//! A transition table is the program the Turing machine runs. Tables are
//! produced by the [`TableBuilder`](super::TableBuilder) and are consumed
//! by a single run of the [`Interpreter`](super::Interpreter).
//!
//! States are numbered from 1. The listing printed by `{:#}` shows one
//! state per line in the form
//!
//! ```text
//! 0001: right (1/1,1) (#/1,2)
//! ```
//!
//! which reads: on entering state 1, move right; reading `1`, write `1`
//! and go to state 1; reading `#`, write `1` and go to state 2.
use super::{Direction, Symbol};
use serde_derive::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// A single state of a transition table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// The move applied to the cursor whenever this state is entered.
    pub direction: Direction,
    /// The state to enter next, keyed by the symbol under the cursor.
    pub transitions: BTreeMap<Symbol, usize>,
    /// The symbol to overwrite the cell with, keyed by the symbol read.
    pub writes: BTreeMap<Symbol, Symbol>,
}

impl State {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    /// Build a state from `(read, write, next)` arms.
    pub fn with_arms(
        direction: Direction,
        arms: impl IntoIterator<Item = (Symbol, Symbol, usize)>,
    ) -> Self {
        arms.into_iter()
            .fold(Self::new(direction), |state, (read, write, next)| {
                state.on(read, write, next)
            })
    }

    /// Add an arm: reading `read`, write `write` and enter `next`.
    pub fn on(mut self, read: Symbol, write: Symbol, next: usize) -> Self {
        self.transitions.insert(read, next);
        if read != write {
            self.writes.insert(read, write);
        }
        self
    }

    /// A state that passes every symbol through to `next` without moving.
    pub fn junction(next: usize) -> Self {
        Symbol::ALL
            .into_iter()
            .fold(Self::new(Direction::None), |state, symbol| {
                state.on(symbol, symbol, next)
            })
    }

    /// A state with no moves and no transitions.
    pub fn terminal() -> Self {
        Self::default()
    }

    /// The state entered after reading `symbol`, and what to overwrite it with.
    pub fn arm(&self, symbol: Symbol) -> Option<(usize, Symbol)> {
        let next = *self.transitions.get(&symbol)?;
        let write = self.writes.get(&symbol).copied().unwrap_or(symbol);
        Some((next, write))
    }

    /// Shift every target by `offset`.
    pub(crate) fn offset(mut self, offset: usize) -> Self {
        for next in self.transitions.values_mut() {
            *next += offset;
        }
        self
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.direction)?;
        for (read, next) in &self.transitions {
            let write = self.writes.get(read).unwrap_or(read);
            write!(f, " ({read}/{write},{next})")?;
        }
        Ok(())
    }
}

/// A compiled Turing machine program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTable {
    pub(crate) states: Vec<State>,
    pub(crate) accept: usize,
    pub(crate) reject: Option<usize>,
}

impl TransitionTable {
    /// Get a state by its 1-based index.
    pub fn state(&self, index: usize) -> Option<&State> {
        index.checked_sub(1).and_then(|i| self.states.get(i))
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The number of states in the table, terminals included.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn accept(&self) -> usize {
        self.accept
    }

    pub fn reject(&self) -> Option<usize> {
        self.reject
    }

    /// Is this state one where the machine stops?
    pub fn is_terminal(&self, index: usize) -> bool {
        index == self.accept || Some(index) == self.reject
    }
}

impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, state) in self.states.iter().enumerate() {
            let index = i + 1;
            if f.alternate() {
                write!(f, "{index:04}: ")?;
            }
            if index == self.accept {
                writeln!(f, "accept")?;
            } else if Some(index) == self.reject {
                writeln!(f, "reject")?;
            } else {
                writeln!(f, "{state}")?;
            }
        }
        Ok(())
    }
}
