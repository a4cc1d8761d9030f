//! # Tape
//!
//! The tape is a growable buffer of [`Symbol`]s with a cursor.
//! It extends itself with blanks whenever the cursor walks off either end.
use super::{Direction, Error, Symbol};
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// A Turing tape, and the cursor that instructions share.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    /// The cells of the tape. Never empty.
    cells: Vec<Symbol>,
    /// The index of the cell under the cursor.
    cursor: usize,
    /// The number of cells the tape was sized to before the current run.
    reserved: usize,
    /// How many cells the tape has grown past `reserved` on the right.
    overflow: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self {
            cells: vec![Symbol::Blank],
            cursor: 0,
            reserved: 1,
            overflow: 0,
        }
    }
}

impl Tape {
    /// Create a blank tape of a single cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tape from raw cells and a cursor, without normalizing it.
    pub fn from_symbols(cells: Vec<Symbol>, cursor: usize) -> Self {
        let mut cells = cells;
        if cells.is_empty() {
            cells.push(Symbol::Blank);
        }
        while cursor >= cells.len() {
            cells.push(Symbol::Blank);
        }
        let reserved = cells.len();
        Self {
            cells,
            cursor,
            reserved,
            overflow: 0,
        }
    }

    /// Read a tape from a string of `#` and `1`.
    ///
    /// The tape is normalized, and the cursor starts on its final blank,
    /// so every register in the input is available as an operand.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut cells = Vec::with_capacity(input.len() + 2);
        for (i, ch) in input.chars().enumerate() {
            match Symbol::from_char(ch) {
                Some(symbol) if !symbol.is_scratch() => cells.push(symbol),
                _ => return Err(Error::InvalidSymbol(ch, i)),
            }
        }
        let cursor = cells.len();
        let mut tape = Self::from_symbols(cells, cursor);
        tape.normalize();
        Ok(tape)
    }

    /// The index of the cell under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// How many cells the tape grew on the right past its reserved length.
    pub fn overflow(&self) -> usize {
        self.overflow
    }

    /// Read the symbol under the cursor.
    pub fn read(&self) -> Symbol {
        self.cells[self.cursor]
    }

    /// Overwrite the symbol under the cursor.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.cursor] = symbol;
    }

    /// Move the cursor one cell, growing the tape if it walks off an end.
    ///
    /// Growing on the left shifts every cell right by one, so the cursor
    /// stays at index zero.
    pub fn step(&mut self, direction: Direction) {
        match direction {
            Direction::None => {}
            Direction::Left => {
                if self.cursor == 0 {
                    self.cells.insert(0, Symbol::Blank);
                    self.reserved += 1;
                } else {
                    self.cursor -= 1;
                }
            }
            Direction::Right => {
                self.cursor += 1;
                if self.cursor == self.cells.len() {
                    self.cells.push(Symbol::Blank);
                    if self.cells.len() > self.reserved {
                        self.overflow += 1;
                    }
                }
            }
        }
    }

    /// Append `n` blanks to the right end, and reserve the resulting length.
    pub fn pad(&mut self, n: usize) {
        self.cells.resize(self.cells.len() + n, Symbol::Blank);
        self.reserved = self.cells.len();
        self.overflow = 0;
    }

    /// Collapse every run of blanks into a single blank.
    ///
    /// The tape keeps exactly one leading blank and always ends in a blank.
    /// The cursor stays on the same logical cell: a cursor anywhere in a run
    /// of blanks lands on the blank that run collapses into.
    pub fn normalize(&mut self) {
        let mut cells = Vec::with_capacity(self.cells.len());
        cells.push(Symbol::Blank);
        let mut cursor = None;
        for (i, &symbol) in self.cells.iter().enumerate() {
            if symbol != Symbol::Blank || cells.last() != Some(&Symbol::Blank) {
                cells.push(symbol);
            }
            if i == self.cursor {
                cursor = Some(cells.len() - 1);
            }
        }
        if cells.last() != Some(&Symbol::Blank) {
            cells.push(Symbol::Blank);
        }

        self.cursor = cursor.unwrap_or(cells.len() - 1);
        self.reserved = cells.len();
        self.overflow = 0;
        self.cells = cells;
    }

    /// The lengths of the `k` registers to the left of the cursor,
    /// topmost first. Missing registers count as empty.
    pub fn registers_left(&self, k: usize) -> Vec<usize> {
        let mut lengths = Vec::with_capacity(k);
        let mut i = self.cursor;
        while lengths.len() < k && i > 0 {
            let mut len = 0;
            while i > 0 && self.cells[i - 1] == Symbol::One {
                len += 1;
                i -= 1;
            }
            lengths.push(len);
            // Skip the separator.
            i = i.saturating_sub(1);
        }
        lengths.resize(k, 0);
        lengths
    }

    /// Every register on the tape, from left to right.
    pub fn registers(&self) -> Vec<usize> {
        self.cells
            .split(|symbol| *symbol != Symbol::One)
            .filter(|run| !run.is_empty())
            .map(<[Symbol]>::len)
            .collect()
    }

    /// The number of unary digits on the whole tape.
    pub fn count_ones(&self) -> usize {
        self.cells.iter().filter(|s| **s == Symbol::One).count()
    }

    /// The first cell holding a scratch marker, if any.
    pub fn find_scratch(&self) -> Option<usize> {
        self.cells.iter().position(|s| s.is_scratch())
    }

    /// A line with a caret under the cursor, to print beneath the tape.
    pub fn caret(&self) -> String {
        format!("{}^", " ".repeat(self.cursor))
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for symbol in &self.cells {
            write!(f, "{symbol}")?;
        }
        if f.alternate() {
            write!(f, "\n{}", self.caret())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_blanks() {
        let mut tape = Tape::from_symbols(
            "##11###1####"
                .chars()
                .filter_map(Symbol::from_char)
                .collect(),
            5,
        );
        tape.normalize();
        assert_eq!(tape.to_string(), "#11#1#");
        assert_eq!(tape.cursor(), 3);
    }

    #[test]
    fn test_normalize_cursor_past_end() {
        let mut tape = Tape::from_symbols(vec![Symbol::One], 4);
        tape.normalize();
        assert_eq!(tape.to_string(), "#1#");
        assert_eq!(tape.cursor(), 2);
    }

    #[test]
    fn test_step_left_grows_tape() {
        let mut tape = Tape::parse("1").unwrap();
        tape.step(Direction::Left);
        tape.step(Direction::Left);
        tape.step(Direction::Left);
        assert_eq!(tape.cursor(), 0);
        assert_eq!(tape.to_string(), "##1#");
        assert_eq!(tape.overflow(), 0);
    }

    #[test]
    fn test_step_right_counts_overflow() {
        let mut tape = Tape::parse("11").unwrap();
        tape.pad(1);
        for _ in 0..3 {
            tape.step(Direction::Right);
        }
        assert_eq!(tape.len(), 7);
        assert_eq!(tape.overflow(), 2);
    }

    #[test]
    fn test_registers_left() {
        let tape = Tape::parse("#111#1#11").unwrap();
        assert_eq!(tape.registers_left(2), vec![2, 1]);
        assert_eq!(tape.registers_left(4), vec![2, 1, 3, 0]);
        assert_eq!(tape.registers(), vec![3, 1, 2]);
    }
}
