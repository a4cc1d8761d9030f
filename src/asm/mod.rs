//! # Assembly Module
//!
//! This module contains the small assembly language implemented over the
//! virtual machine. Every instruction is assembled into its own
//! [`TransitionTable`](crate::vm::TransitionTable), which is run against the
//! shared tape and then thrown away.
//!
//! ## Registers
//!
//! Registers are unary numbers separated by single blanks. Between
//! instructions the cursor rests on the blank just right of the topmost
//! register, so the registers to its left form a stack of operands:
//!
//! ```text
//! #111#11#
//!        ^   two registers: 3 below, 2 on top
//! ```
//!
//! A register holding zero has no cells, so it vanishes when the tape is
//! normalized between instructions.
//!
//! ## Instructions
//!
//! | Instruction | Effect                                                       |
//! |-------------|--------------------------------------------------------------|
//! | `const k`   | push a register holding `k`                                  |
//! | `shL k`     | move the cursor left across `k` registers                    |
//! | `shR k`     | move the cursor right across `k` registers                   |
//! | `copy k`    | push a copy of the top `k` registers                         |
//! | `move j k`  | delete the `j` registers under the top `k`                   |
//! | `swap`      | exchange the top two registers                               |
//! | `add`       | pop `b` and `a`, push `a + b`                                |
//! | `monus`     | pop `b` and `a`, push `a - b`, or zero if `b > a`            |
//! | `mult`      | pop `b` and `a`, push `a * b`                                |
//! | `divide`    | pop `b` and `a`, push `a / b` rounded down                   |
//! | `ifGT n`    | pop `b` and `a`, jump to instruction `n` if `a > b`          |
//! | `goto n`    | jump to instruction `n`                                      |
//! | `halt`      | stop                                                         |
//!
//! `ifGE`, `ifLT`, `ifLE`, `ifEQ` and `ifNE` work like `ifGT`.
//! Instructions are numbered from 1.
use serde_derive::{Deserialize, Serialize};
use std::fmt;

pub mod compare;
pub mod core;
mod program;

pub use self::program::Program;

/// An instruction that transforms the tape and falls through to the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroOp {
    Constant(usize),
    ShiftLeft(usize),
    ShiftRight(usize),
    Copy(usize),
    Move(usize, usize),
    Swap,
    Add,
    Monus,
    Multiply,
    Divide,
}

/// The test a branching instruction performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Predicate {
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Equal,
    NotEqual,
    /// Always taken.
    Jump,
}

impl Predicate {
    /// Evaluate the predicate on two register values, the lower one first.
    pub fn holds(&self, a: usize, b: usize) -> bool {
        match self {
            Self::GreaterThan => a > b,
            Self::GreaterOrEqual => a >= b,
            Self::LessThan => a < b,
            Self::LessOrEqual => a <= b,
            Self::Equal => a == b,
            Self::NotEqual => a != b,
            Self::Jump => true,
        }
    }

    /// The mnemonic for this predicate.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GreaterThan => "ifGT",
            Self::GreaterOrEqual => "ifGE",
            Self::LessThan => "ifLT",
            Self::LessOrEqual => "ifLE",
            Self::Equal => "ifEQ",
            Self::NotEqual => "ifNE",
            Self::Jump => "goto",
        }
    }
}

/// A single instruction of a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    Next(MacroOp),
    /// Branch to the 1-based instruction index if the predicate holds.
    Goto(Predicate, usize),
    Halt,
}

impl fmt::Display for MacroOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Constant(k) => write!(f, "const {k}"),
            Self::ShiftLeft(k) => write!(f, "shL {k}"),
            Self::ShiftRight(k) => write!(f, "shR {k}"),
            Self::Copy(k) => write!(f, "copy {k}"),
            Self::Move(j, k) => write!(f, "move {j} {k}"),
            Self::Swap => write!(f, "swap"),
            Self::Add => write!(f, "add"),
            Self::Monus => write!(f, "monus"),
            Self::Multiply => write!(f, "mult"),
            Self::Divide => write!(f, "divide"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Next(op) => write!(f, "{op}"),
            Self::Goto(predicate, target) => write!(f, "{} {target}", predicate.name()),
            Self::Halt => write!(f, "halt"),
        }
    }
}

/// An error returned by the assembly language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    VirtualMachineError(crate::vm::Error),
    /// The program is rejected before it runs. Carries the 1-based
    /// instruction index and the reason.
    MalformedProgram(usize, String),
    /// A `divide` found an empty divisor register.
    DivisionByZero,
}

impl From<crate::vm::Error> for Error {
    fn from(e: crate::vm::Error) -> Self {
        Self::VirtualMachineError(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::VirtualMachineError(e) => write!(f, "{e}"),
            Self::MalformedProgram(index, reason) => {
                write!(f, "malformed program at instruction {index}: {reason}")
            }
            Self::DivisionByZero => write!(f, "division by zero"),
        }
    }
}
