//! # Comparisons
//!
//! Tables for the branching instructions. A comparison pops the top two
//! registers `a` (lower) and `b` (upper), walking them in lock-step and
//! marking visited digits `x` until one of them runs out. Both registers
//! are then erased, and the machine accepts if `a <cmp> b` holds.
use super::{Error, Predicate};
use crate::vm::{self, sequence, Direction, State, Symbol::*, TableBuilder, Tape, TransitionTable};

use super::core::shift_left;

const LEFT: Direction = Direction::Left;
const RIGHT: Direction = Direction::Right;

impl Predicate {
    /// Assemble the table for this predicate.
    pub fn assemble(&self) -> Result<TransitionTable, Error> {
        let core = match self {
            Self::GreaterThan => ordering(15, Verdict::Accept, Verdict::Reject)?,
            Self::GreaterOrEqual => ordering(10, Verdict::Accept, Verdict::Reject)?,
            Self::LessThan => ordering(10, Verdict::Reject, Verdict::Accept)?,
            Self::LessOrEqual => ordering(15, Verdict::Reject, Verdict::Accept)?,
            Self::Equal => equality(Verdict::Accept)?,
            Self::NotEqual => equality(Verdict::Reject)?,
            Self::Jump => return Ok(shift_left(0)?),
        };
        Ok(sequence([shift_left(2)?, core])?)
    }

    /// Run this predicate against a tape, returning whether it holds.
    pub fn evaluate(&self, interpreter: &vm::Interpreter, tape: &mut Tape) -> Result<bool, Error> {
        let table = self.assemble()?;
        Ok(interpreter.run(&table, tape)?.accepted)
    }
}

#[derive(Clone, Copy)]
enum Verdict {
    Accept,
    Reject,
}

fn verdict(b: &mut TableBuilder, verdict: Verdict) {
    match verdict {
        Verdict::Accept => b.accept(),
        Verdict::Reject => b.reject(),
    };
}

/// The shared topology of `>`, `>=`, `<` and `<=`.
///
/// State 10 is reached when the upper register ran out first, or from
/// state 9 when `tie` is 10. State 15 is reached when the lower register
/// ran out first, or from state 9 when `tie` is 15.
fn ordering(tie: usize, upper_short: Verdict, lower_short: Verdict) -> Result<TransitionTable, vm::Error> {
    let mut b = TableBuilder::new();
    b.push(State::with_arms(RIGHT, [(One, ScratchX, 2), (Blank, ScratchX, 11)]));
    b.push(State::with_arms(RIGHT, [(One, One, 2), (Blank, Blank, 3)]));
    b.push(State::with_arms(RIGHT, [(ScratchX, ScratchX, 3), (One, ScratchX, 4), (Blank, Blank, 6)]));
    b.push(State::with_arms(LEFT, [(ScratchX, ScratchX, 4), (Blank, Blank, 5)]));
    b.push(State::with_arms(LEFT, [(One, One, 5), (ScratchX, ScratchX, 1)]));
    // The upper register ran out.
    b.push(State::with_arms(LEFT, [(ScratchX, Blank, 6), (Blank, Blank, 7)]));
    b.push(State::with_arms(LEFT, [(One, Blank, 7), (ScratchX, Blank, 7), (Blank, Blank, 10)]));
    b.push(State::with_arms(LEFT, [(Blank, Blank, 8), (ScratchX, Blank, 9)]));
    b.push(State::with_arms(LEFT, [(ScratchX, Blank, 9), (Blank, Blank, tie)]));
    verdict(&mut b, upper_short);
    // The lower register ran out.
    b.push(State::with_arms(RIGHT, [(ScratchX, Blank, 11), (One, Blank, 12), (Blank, Blank, 8)]));
    b.push(State::with_arms(RIGHT, [(One, Blank, 12), (Blank, Blank, 13)]));
    b.push(State::with_arms(LEFT, [(Blank, Blank, 13), (ScratchX, Blank, 14)]));
    b.push(State::with_arms(LEFT, [(ScratchX, Blank, 14), (Blank, Blank, 15)]));
    verdict(&mut b, lower_short);
    b.build()
}

/// The topology of `==` and `!=`. State 9 is reached on a tie.
fn equality(tie: Verdict) -> Result<TransitionTable, vm::Error> {
    let other = match tie {
        Verdict::Accept => Verdict::Reject,
        Verdict::Reject => Verdict::Accept,
    };

    let mut b = TableBuilder::new();
    b.push(State::with_arms(RIGHT, [(One, ScratchX, 2), (Blank, ScratchX, 6)]));
    b.push(State::with_arms(RIGHT, [(One, One, 2), (Blank, Blank, 3)]));
    b.push(State::with_arms(RIGHT, [(ScratchX, ScratchX, 3), (One, ScratchX, 4), (Blank, Blank, 13)]));
    b.push(State::with_arms(LEFT, [(ScratchX, ScratchX, 4), (Blank, Blank, 5)]));
    b.push(State::with_arms(LEFT, [(One, One, 5), (ScratchX, ScratchX, 1)]));
    b.push(State::with_arms(RIGHT, [(ScratchX, Blank, 6), (One, Blank, 10), (Blank, Blank, 7)]));
    b.push(State::with_arms(LEFT, [(Blank, Blank, 7), (ScratchX, Blank, 8)]));
    b.push(State::with_arms(LEFT, [(ScratchX, Blank, 8), (Blank, Blank, 9)]));
    verdict(&mut b, tie);
    b.push(State::with_arms(RIGHT, [(One, Blank, 10), (Blank, Blank, 11)]));
    b.push(State::with_arms(LEFT, [(Blank, Blank, 11), (ScratchX, Blank, 12)]));
    b.push(State::with_arms(LEFT, [(ScratchX, Blank, 12), (Blank, Blank, 15)]));
    b.push(State::with_arms(LEFT, [(ScratchX, Blank, 13), (Blank, Blank, 14)]));
    b.push(State::with_arms(LEFT, [(One, Blank, 14), (ScratchX, Blank, 14), (Blank, Blank, 15)]));
    verdict(&mut b, other);
    b.build()
}
