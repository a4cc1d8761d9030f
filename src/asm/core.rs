//! # Core Tape Transforms
//!
//! Table generators for the instructions that fall through to the next
//! instruction. Every generator returns a table that starts and ends with
//! the cursor on the blank right of the topmost register.
//!
//! The two-operand instructions are built from a fixed core that expects
//! the cursor on the blank *left* of the lower operand, wrapped in shifts.
use super::{Error, MacroOp};
use crate::vm::{
    self, sequence, Direction, State, Symbol::*, TableBuilder, Tape, TransitionTable,
};
use log::warn;

const LEFT: Direction = Direction::Left;
const RIGHT: Direction = Direction::Right;

impl MacroOp {
    /// Assemble the table for this instruction.
    pub fn assemble(&self) -> Result<TransitionTable, Error> {
        let table = match *self {
            Self::Constant(k) => constant(k)?,
            Self::ShiftLeft(k) => shift_left(k)?,
            Self::ShiftRight(k) => shift_right(k)?,
            Self::Copy(k) => copy(k)?,
            Self::Move(j, k) => move_registers(j, k)?,
            Self::Swap => sequence([shift_left(2)?, swap()?, shift_right(2)?])?,
            Self::Add => sequence([shift_left(2)?, add()?, shift_right(1)?])?,
            Self::Monus => sequence([shift_left(2)?, monus()?, shift_right(1)?])?,
            Self::Multiply => {
                sequence([shift_left(2)?, multiply()?, relocate(2, 1)?, shift_right(1)?])?
            }
            Self::Divide => {
                sequence([shift_left(2)?, divide()?, relocate(2, 1)?, shift_right(1)?])?
            }
        };
        Ok(table)
    }

    /// The number of blank cells to reserve at the right end of the tape
    /// before this instruction runs.
    pub fn capacity(&self, tape: &Tape) -> usize {
        match *self {
            Self::Constant(k) => 2 * k,
            Self::ShiftRight(k) => k,
            Self::Copy(k) => tape.registers_left(k).iter().sum::<usize>() + k + 1,
            Self::Multiply => {
                let operands = tape.registers_left(2);
                operands[0] * operands[1] + 2
            }
            Self::Divide => tape.count_ones(),
            _ => 0,
        }
    }

    /// Run this instruction against a tape.
    ///
    /// The tape is padded to the instruction's capacity first. A `divide`
    /// whose divisor register is empty fails without running.
    pub fn execute(&self, interpreter: &vm::Interpreter, tape: &mut Tape) -> Result<(), Error> {
        if *self == Self::Divide && tape.registers_left(1)[0] == 0 {
            return Err(Error::DivisionByZero);
        }

        let table = self.assemble()?;
        let capacity = self.capacity(tape);
        tape.pad(capacity);
        let outcome = interpreter.run(&table, tape)?;
        if outcome.grown > 0 && matches!(self, Self::Multiply | Self::Divide) {
            warn!(
                "CapacityMiscalculation: `{self}` grew the tape {} cells past its reservation",
                outcome.grown
            );
        }
        Ok(())
    }
}

/// Write a register of `k` ones right of the cursor, and step past it.
pub fn constant(k: usize) -> Result<TransitionTable, vm::Error> {
    let mut b = TableBuilder::new();
    for i in 0..k {
        b.push(State::with_arms(RIGHT, [(Blank, One, i + 2)]));
    }
    b.push(State::with_arms(RIGHT, [(Blank, Blank, k + 2)]));
    b.accept();
    b.build()
}

/// Walk `k` registers in one direction, stopping on the blank past the last.
fn shift(direction: Direction, k: usize) -> Result<TransitionTable, vm::Error> {
    let mut b = TableBuilder::new();
    for i in 0..k {
        b.push(State::with_arms(
            direction,
            [(One, One, i + 1), (Blank, Blank, i + 2)],
        ));
    }
    b.accept();
    b.build()
}

pub fn shift_left(k: usize) -> Result<TransitionTable, vm::Error> {
    shift(LEFT, k)
}

pub fn shift_right(k: usize) -> Result<TransitionTable, vm::Error> {
    shift(RIGHT, k)
}

/// Push a copy of the top `k` registers, in order.
///
/// Each register is copied one digit at a time: the source digit is marked
/// `x`, the machine crosses `k` blanks to reach the copy, appends a digit,
/// crosses back and restores the mark.
pub fn copy(k: usize) -> Result<TransitionTable, vm::Error> {
    let mut b = TableBuilder::new();
    // Walk to the blank left of the lowest register being copied.
    for i in 0..k {
        b.push(State::with_arms(LEFT, [(One, One, i + 1), (Blank, Blank, i + 2)]));
    }

    let block = 2 * k + 3;
    let finish = k + 1 + k * block;
    for i in 0..k {
        let read = b.next_index();
        let next_register = if i + 1 < k { read + block } else { finish };
        b.push(State::with_arms(
            RIGHT,
            [(One, ScratchX, read + 1), (Blank, Blank, next_register)],
        ));
        for _ in 0..k {
            let s = b.next_index();
            b.push(State::with_arms(RIGHT, [(One, One, s), (Blank, Blank, s + 1)]));
        }
        let write = b.next_index();
        b.push(State::with_arms(RIGHT, [(One, One, write), (Blank, One, write + 1)]));
        for _ in 0..k {
            let s = b.next_index();
            b.push(State::with_arms(LEFT, [(One, One, s), (Blank, Blank, s + 1)]));
        }
        let find = b.next_index();
        b.push(State::with_arms(LEFT, [(One, One, find), (ScratchX, One, read)]));
    }

    // Step over the copies.
    for _ in 0..k {
        let s = b.next_index();
        b.push(State::with_arms(RIGHT, [(One, One, s), (Blank, Blank, s + 1)]));
    }
    b.accept();
    b.build()
}

/// Delete the `j` registers under the top `k`, closing the gap.
pub fn move_registers(j: usize, k: usize) -> Result<TransitionTable, vm::Error> {
    if j == 0 {
        return shift_left(0);
    }
    sequence([shift_left(k)?, relocate(j, k)?, shift_right(k)?])
}

/// The core of `move`: with the cursor on the blank left of the top `k`
/// registers, erase the `j` registers below them and carry the top `k`
/// down into the space, leaving the cursor on the blank left of them.
///
/// The starting cell is marked `x`. Erasing leaves an `a` checkpoint where
/// the moved block will start. The block is then carried one cell at a
/// time: each source cell is replaced by `x` and its symbol is written at
/// the end of the growing copy, with separators written as `a`. A final
/// sweep turns the separators and the checkpoint back into blanks.
pub fn relocate(j: usize, k: usize) -> Result<TransitionTable, vm::Error> {
    let mut b = TableBuilder::new();
    if k == 0 {
        for i in 0..j {
            b.push(State::with_arms(LEFT, [(One, Blank, i + 1), (Blank, Blank, i + 2)]));
        }
        b.accept();
        return b.build();
    }

    b.push(State::with_arms(Direction::None, [(Blank, ScratchX, 2)]));
    for i in 0..j {
        let s = b.next_index();
        let boundary = if i + 1 < j { Blank } else { ScratchA };
        b.push(State::with_arms(LEFT, [(One, Blank, s), (Blank, boundary, s + 1)]));
    }
    let back = b.next_index();
    let base = back + 1;
    b.push(State::with_arms(RIGHT, [(Blank, Blank, back), (ScratchX, Blank, base)]));

    let gather = base + 7 * k;
    for i in 0..k {
        let read = b.next_index();
        let (one_back, one_write, one_return) = (read + 1, read + 2, read + 3);
        let (sep_back, sep_write, sep_return) = (read + 4, read + 5, read + 6);
        let next_register = read + 7;
        let last = i + 1 == k;

        let read_state = if last {
            State::with_arms(RIGHT, [(One, ScratchX, one_back), (Blank, Blank, gather)])
        } else {
            State::with_arms(RIGHT, [(One, ScratchX, one_back), (Blank, ScratchX, sep_back)])
        };
        b.push(read_state);
        b.push(State::with_arms(
            LEFT,
            [(Blank, Blank, one_back), (One, One, one_write), (ScratchA, ScratchA, one_write)],
        ));
        b.push(State::with_arms(RIGHT, [(Blank, One, one_return)]));
        b.push(State::with_arms(
            RIGHT,
            [(Blank, Blank, one_return), (ScratchX, Blank, read)],
        ));
        b.push(State::with_arms(
            LEFT,
            [(Blank, Blank, sep_back), (One, One, sep_write), (ScratchA, ScratchA, sep_write)],
        ));
        b.push(State::with_arms(RIGHT, [(Blank, ScratchA, sep_return)]));
        b.push(State::with_arms(
            RIGHT,
            [(Blank, Blank, sep_return), (ScratchX, Blank, next_register)],
        ));
    }

    // Sweep left over the moved block, clearing the separators and the checkpoint.
    b.push(State::with_arms(
        LEFT,
        [(Blank, Blank, gather), (One, One, gather + 1), (ScratchA, Blank, gather + 2)],
    ));
    for i in 1..=k {
        let s = gather + i;
        b.push(State::with_arms(LEFT, [(One, One, s), (ScratchA, Blank, s + 1)]));
    }
    b.accept();
    b.build()
}

/// Exchange two registers. Expects the cursor left of the lower one.
pub fn swap() -> Result<TransitionTable, vm::Error> {
    let mut b = TableBuilder::new();
    b.push(State::with_arms(RIGHT, [(One, ScratchX, 2), (Blank, Blank, 7)]));
    b.push(State::with_arms(RIGHT, [(One, One, 2), (Blank, Blank, 3)]));
    b.push(State::with_arms(RIGHT, [(One, One, 3), (ScratchX, ScratchX, 3), (Blank, Blank, 4)]));
    b.push(State::with_arms(LEFT, [(One, ScratchX, 5), (ScratchX, ScratchX, 4), (Blank, One, 15)]));
    b.push(State::with_arms(LEFT, [(One, One, 5), (Blank, Blank, 6)]));
    b.push(State::with_arms(LEFT, [(One, One, 6), (ScratchX, One, 1)]));
    b.push(State::with_arms(RIGHT, [(ScratchX, One, 12), (One, One, 8), (Blank, Blank, 18)]));
    b.push(State::with_arms(LEFT, [(Blank, One, 9)]));
    b.push(State::with_arms(RIGHT, [(One, One, 9), (ScratchX, ScratchX, 10), (Blank, Blank, 10)]));
    b.push(State::with_arms(LEFT, [(One, Blank, 11)]));
    b.push(State::with_arms(RIGHT, [(ScratchX, One, 11), (Blank, Blank, 13)]));
    b.push(State::with_arms(RIGHT, [(ScratchX, One, 12), (Blank, Blank, 13)]));
    b.push(State::with_arms(LEFT, [(One, One, 13), (Blank, Blank, 14)]));
    b.push(State::with_arms(LEFT, [(One, One, 14), (Blank, Blank, 17)]));
    b.push(State::with_arms(RIGHT, [(One, One, 15), (ScratchX, One, 15), (Blank, Blank, 16)]));
    b.push(State::with_arms(LEFT, [(One, One, 16), (ScratchX, Blank, 16), (Blank, Blank, 17)]));
    b.accept();
    b.push(State::with_arms(LEFT, [(Blank, Blank, 16)]));
    b.build()
}

/// Join two registers by moving the last digit of the upper one into the gap.
pub fn add() -> Result<TransitionTable, vm::Error> {
    let mut b = TableBuilder::new();
    b.push(State::with_arms(RIGHT, [(One, One, 1), (Blank, One, 2)]));
    b.push(State::with_arms(RIGHT, [(One, One, 2), (Blank, Blank, 3)]));
    b.push(State::with_arms(LEFT, [(One, Blank, 4)]));
    b.push(State::with_arms(LEFT, [(One, One, 4), (Blank, Blank, 5)]));
    b.accept();
    b.build()
}

/// Truncated subtraction: cancel digits pairwise until the upper register runs out.
pub fn monus() -> Result<TransitionTable, vm::Error> {
    let mut b = TableBuilder::new();
    b.push(State::with_arms(RIGHT, [(One, One, 1), (Blank, Blank, 2)]));
    b.push(State::with_arms(RIGHT, [(One, One, 2), (Blank, Blank, 3)]));
    b.push(State::with_arms(LEFT, [(One, Blank, 4), (Blank, Blank, 7)]));
    b.push(State::with_arms(LEFT, [(One, One, 4), (Blank, Blank, 5)]));
    b.push(State::with_arms(LEFT, [(ScratchX, ScratchX, 5), (One, ScratchX, 6), (Blank, ScratchA, 9)]));
    b.push(State::with_arms(RIGHT, [(ScratchX, ScratchX, 6), (Blank, Blank, 2)]));
    b.push(State::with_arms(LEFT, [(ScratchX, Blank, 7), (One, One, 7), (Blank, Blank, 8)]));
    b.accept();
    // The lower register ran out first: erase from the checkpoint.
    b.push(State::with_arms(RIGHT, [(ScratchX, Blank, 9), (Blank, Blank, 10)]));
    b.push(State::with_arms(RIGHT, [(One, Blank, 10), (Blank, Blank, 11)]));
    b.push(State::with_arms(LEFT, [(Blank, Blank, 11), (ScratchA, Blank, 8)]));
    b.build()
}

/// Append the product of two registers after them.
///
/// For every digit of the lower register, marked `x`, each digit of the
/// upper register is marked `a` in turn and a digit is appended to the
/// product.
pub fn multiply() -> Result<TransitionTable, vm::Error> {
    let mut b = TableBuilder::new();
    b.push(State::with_arms(RIGHT, [(One, ScratchX, 2), (Blank, Blank, 10)]));
    b.push(State::with_arms(RIGHT, [(One, One, 2), (Blank, Blank, 3)]));
    b.push(State::with_arms(RIGHT, [(ScratchA, ScratchA, 3), (One, ScratchA, 4), (Blank, Blank, 8)]));
    b.push(State::with_arms(RIGHT, [(One, One, 4), (Blank, Blank, 5)]));
    b.push(State::with_arms(RIGHT, [(One, One, 5), (Blank, One, 6)]));
    b.push(State::with_arms(LEFT, [(One, One, 6), (Blank, Blank, 7)]));
    b.push(State::with_arms(LEFT, [(One, One, 7), (ScratchA, ScratchA, 3)]));
    b.push(State::with_arms(LEFT, [(ScratchA, One, 8), (Blank, Blank, 9)]));
    b.push(State::with_arms(LEFT, [(One, One, 9), (ScratchX, One, 1)]));
    b.push(State::with_arms(RIGHT, [(One, One, 10), (Blank, Blank, 11)]));
    b.accept();
    b.build()
}

/// Append the quotient of two registers after them, by repeated subtraction.
pub fn divide() -> Result<TransitionTable, vm::Error> {
    let mut b = TableBuilder::new();
    b.push(State::with_arms(RIGHT, [(One, One, 1), (Blank, Blank, 2)]));
    b.push(State::with_arms(RIGHT, [(One, ScratchX, 3), (Blank, Blank, 7)]));
    b.push(State::with_arms(LEFT, [(One, One, 3), (Blank, Blank, 4)]));
    b.push(State::with_arms(LEFT, [(One, One, 4), (Blank, Blank, 5), (ScratchX, One, 5)]));
    b.push(State::with_arms(RIGHT, [(Blank, Blank, 6), (One, ScratchX, 10)]));
    b.push(State::with_arms(RIGHT, [(One, One, 6), (ScratchX, One, 6), (Blank, Blank, 12)]));
    b.push(State::with_arms(RIGHT, [(One, One, 7), (Blank, One, 8)]));
    b.push(State::with_arms(LEFT, [(One, One, 8), (Blank, Blank, 9)]));
    b.push(State::with_arms(LEFT, [(One, One, 9), (Blank, Blank, 2)]));
    b.push(State::with_arms(RIGHT, [(One, One, 10), (Blank, Blank, 11)]));
    b.push(State::with_arms(RIGHT, [(One, One, 11), (ScratchX, One, 2)]));
    b.accept();
    b.build()
}
