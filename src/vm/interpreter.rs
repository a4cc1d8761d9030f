//! # Interpreter Module
//!
//! This module implements the interpreter for transition tables.
//!
//! The machine starts in state 1, applying its entry direction before it
//! reads anything. On every step it reads the symbol under the cursor,
//! overwrites it if the state says so, and enters the next state, moving
//! the cursor in that state's direction. It stops as soon as it enters
//! the accept or reject state.
use super::{Error, Tape, TransitionTable};
use log::trace;

/// The result of running a table to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the machine stopped in the accept state.
    pub accepted: bool,
    /// The number of transitions taken.
    pub steps: usize,
    /// How many cells the tape grew on the right past its reserved length.
    pub grown: usize,
}

/// Runs transition tables against a tape.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interpreter {
    /// Give up after this many transitions.
    step_limit: Option<usize>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Run a table from the tape's cursor until it reaches a terminal state.
    pub fn run(&self, table: &TransitionTable, tape: &mut Tape) -> Result<Outcome, Error> {
        let mut machine = Machine {
            table,
            state: 1,
            steps: 0,
        };
        machine.enter(1, tape)?;
        while !table.is_terminal(machine.state) {
            machine.step(tape)?;
            if let Some(limit) = self.step_limit {
                if machine.steps > limit {
                    return Err(Error::StepLimitExceeded(limit));
                }
            }
        }

        Ok(Outcome {
            accepted: machine.state == table.accept(),
            steps: machine.steps,
            grown: tape.overflow(),
        })
    }
}

/// Run a table with no step limit.
pub fn run(table: &TransitionTable, tape: &mut Tape) -> Result<Outcome, Error> {
    Interpreter::new().run(table, tape)
}

/// A single run of a table.
struct Machine<'a> {
    table: &'a TransitionTable,
    /// The current state.
    state: usize,
    steps: usize,
}

impl Machine<'_> {
    /// Enter a state, applying its entry direction.
    fn enter(&mut self, index: usize, tape: &mut Tape) -> Result<(), Error> {
        let state = self.table.state(index).ok_or_else(|| {
            Error::MalformedTable(format!("state {index} does not exist"))
        })?;
        self.state = index;
        tape.step(state.direction);
        Ok(())
    }

    /// Take a single transition.
    fn step(&mut self, tape: &mut Tape) -> Result<(), Error> {
        let symbol = tape.read();
        let (next, write) = self
            .table
            .state(self.state)
            .and_then(|state| state.arm(symbol))
            .ok_or(Error::UndefinedTransition {
                state: self.state,
                symbol,
            })?;

        trace!(
            "state {} reads `{symbol}` at {}, writes `{write}`, enters {next}",
            self.state,
            tape.cursor()
        );
        tape.write(write);
        self.steps += 1;
        self.enter(next, tape)
    }
}
