//! # Table Builder
//!
//! Tables are assembled by appending states in order. Each appended state
//! gets the next index, so a generator can compute forward references with
//! plain arithmetic on [`TableBuilder::next_index`].
//!
//! Finished tables can be chained with [`TableBuilder::then`]: the accept
//! state of everything built so far becomes a *junction* that hands control
//! straight to the first state of the next table.
use super::{Error, State, TransitionTable};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default)]
pub struct TableBuilder {
    states: Vec<State>,
    accept: Option<usize>,
    reject: Option<usize>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The index the next pushed state will receive.
    pub fn next_index(&self) -> usize {
        self.states.len() + 1
    }

    /// Append a state, returning its index.
    pub fn push(&mut self, state: State) -> usize {
        self.states.push(state);
        self.states.len()
    }

    /// Append the accept state.
    pub fn accept(&mut self) -> usize {
        let index = self.push(State::terminal());
        self.accept = Some(index);
        index
    }

    /// Append the reject state.
    pub fn reject(&mut self) -> usize {
        let index = self.push(State::terminal());
        self.reject = Some(index);
        index
    }

    /// Append a finished table after everything built so far.
    ///
    /// The current accept state becomes a junction into the first state of
    /// `table`, and the accept state of `table` becomes the new accept.
    /// If both sides can reject, the reject of `table` forwards to the
    /// existing one.
    pub fn then(mut self, table: TransitionTable) -> Self {
        let offset = self.states.len();
        if let Some(accept) = self.accept.take() {
            self.states[accept - 1] = State::junction(offset + 1);
        }

        let TransitionTable {
            states,
            accept,
            reject,
        } = table;
        self.states
            .extend(states.into_iter().map(|state| state.offset(offset)));
        self.accept = Some(accept + offset);

        if let Some(reject) = reject {
            let reject = reject + offset;
            match self.reject {
                Some(existing) => self.states[reject - 1] = State::junction(existing),
                None => self.reject = Some(reject),
            }
        }
        self
    }

    /// Check the table for consistency and finish it.
    ///
    /// Every transition must point at an existing state, the accept state
    /// must exist and must differ from the reject state, terminal states
    /// must have no transitions, and some terminal state must be reachable
    /// from the first state.
    pub fn build(self) -> Result<TransitionTable, Error> {
        let accept = self
            .accept
            .ok_or_else(|| Error::MalformedTable("no accept state".to_string()))?;
        if Some(accept) == self.reject {
            return Err(Error::MalformedTable(format!(
                "state {accept} is both accept and reject"
            )));
        }

        let len = self.states.len();
        for (i, state) in self.states.iter().enumerate() {
            let index = i + 1;
            let terminal = index == accept || Some(index) == self.reject;
            if terminal && !state.transitions.is_empty() {
                return Err(Error::MalformedTable(format!(
                    "terminal state {index} has transitions"
                )));
            }
            if let Some((symbol, next)) = state
                .transitions
                .iter()
                .find(|(_, next)| **next == 0 || **next > len)
            {
                return Err(Error::MalformedTable(format!(
                    "state {index} goes to missing state {next} on `{symbol}`"
                )));
            }
            if let Some(symbol) = state
                .writes
                .keys()
                .find(|symbol| !state.transitions.contains_key(symbol))
            {
                return Err(Error::MalformedTable(format!(
                    "state {index} writes on `{symbol}` without a transition"
                )));
            }
        }

        let table = TransitionTable {
            states: self.states,
            accept,
            reject: self.reject,
        };
        if !reaches_terminal(&table) {
            return Err(Error::MalformedTable(
                "no terminal state is reachable".to_string(),
            ));
        }
        Ok(table)
    }
}

/// Chain tables one after another.
pub fn sequence(tables: impl IntoIterator<Item = TransitionTable>) -> Result<TransitionTable, Error> {
    tables
        .into_iter()
        .fold(TableBuilder::new(), TableBuilder::then)
        .build()
}

fn reaches_terminal(table: &TransitionTable) -> bool {
    let mut seen = BTreeSet::new();
    let mut pending = vec![1];
    while let Some(index) = pending.pop() {
        if table.is_terminal(index) {
            return true;
        }
        if !seen.insert(index) {
            continue;
        }
        if let Some(state) = table.state(index) {
            pending.extend(state.transitions.values().copied());
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::{Direction, Symbol::*};

    #[test]
    fn test_then_makes_junction() {
        let mut first = TableBuilder::new();
        first.push(State::with_arms(Direction::Right, [(One, One, 1), (Blank, Blank, 2)]));
        first.accept();
        let first = first.build().unwrap();

        let table = TableBuilder::new().then(first.clone()).then(first).build().unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.accept(), 4);
        assert_eq!(table.state(2), Some(&State::junction(3)));
        assert_eq!(table.state(3).unwrap().transitions[&One], 3);
    }

    #[test]
    fn test_build_rejects_dangling_transition() {
        let mut builder = TableBuilder::new();
        builder.push(State::with_arms(Direction::Left, [(One, Blank, 7)]));
        builder.accept();
        assert!(matches!(builder.build(), Err(Error::MalformedTable(_))));
    }

    #[test]
    fn test_build_requires_accept() {
        let mut builder = TableBuilder::new();
        builder.push(State::with_arms(Direction::Left, [(One, Blank, 1)]));
        assert!(builder.build().is_err());
    }
}
