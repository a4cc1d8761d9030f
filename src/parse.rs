//! # Parsing Module
//!
//! This module parses the textual form of programs.
//!
//! A program has one instruction per line: the mnemonic, followed by its
//! integer parameters separated by whitespace. A line may start with a
//! label such as `3)`, `3:` or `3`, which is ignored. Blank lines and
//! comments (`// ...` and `/* ... */`) are skipped.
//!
//! ```text
//! 1) copy 2
//! 2) ifLE 4   // already sorted
//! 3) swap
//! 4) halt
//! ```
use crate::asm::{self, Instruction, MacroOp, Predicate, Program};
use lazy_static::lazy_static;
use maplit::hashmap;
use no_comment::{languages, IntoWithoutComments as _};
use nom::{
    character::complete::{alpha1, digit1, one_of, space0, space1},
    combinator::{all_consuming, map_res, opt},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult, Offset,
};
use std::{collections::HashMap, fmt};

lazy_static! {
    /// The number of parameters each mnemonic takes.
    static ref ARITY: HashMap<&'static str, usize> = hashmap! {
        "const" => 1,
        "shL" => 1,
        "shR" => 1,
        "copy" => 1,
        "move" => 2,
        "swap" => 0,
        "add" => 0,
        "monus" => 0,
        "mult" => 0,
        "divide" => 0,
        "ifGT" => 1,
        "ifGE" => 1,
        "ifLT" => 1,
        "ifLE" => 1,
        "ifEQ" => 1,
        "ifNE" => 1,
        "goto" => 1,
        "halt" => 0,
    };
}

/// A span of source code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceCodeLocation {
    /// The 1-based line number.
    pub line: usize,
    /// The 1-based column number.
    pub column: usize,
    /// The byte offset from the start of the source.
    pub offset: usize,
    /// The length of the span in bytes.
    pub length: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The line does not have the shape of an instruction.
    Syntax,
    UnknownOperation(String),
    WrongArity {
        name: String,
        expected: usize,
        found: usize,
    },
    /// The instructions parsed, but do not form a valid program.
    Malformed(asm::Error),
}

/// An error found while parsing a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub location: SourceCodeLocation,
    pub kind: ErrorKind,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "expected an instruction"),
            Self::UnknownOperation(name) => write!(f, "unknown operation `{name}`"),
            Self::WrongArity {
                name,
                expected,
                found,
            } => write!(
                f,
                "`{name}` takes {expected} parameter{}, found {found}",
                if *expected == 1 { "" } else { "s" }
            ),
            Self::Malformed(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.location.line, self.location.column, self.kind
        )
    }
}

/// Remove comments from source code, keeping line breaks.
pub fn strip_comments(input: impl ToString) -> String {
    input
        .to_string()
        .chars()
        .without_comments(languages::rust())
        .collect()
}

/// Parse a whole program. Comments must already be stripped with
/// [`strip_comments`], so that error offsets line up with the text the
/// caller reports them against.
pub fn parse_program(input: &str) -> Result<Program, Error> {
    let mut instructions = vec![];
    let mut locations = vec![];

    let mut offset = 0;
    for (i, raw) in input.split('\n').enumerate() {
        let line = raw.trim_end_matches('\r');
        let start = offset;
        offset += raw.len() + 1;
        if line.trim().is_empty() {
            continue;
        }

        let location = SourceCodeLocation {
            line: i + 1,
            column: 1,
            offset: start,
            length: line.len(),
        };
        instructions.push(parse_line(line, location)?);
        locations.push(location);
    }

    Program::new(instructions).map_err(|e| {
        let location = match &e {
            asm::Error::MalformedProgram(index, _) => {
                locations.get(index - 1).copied().unwrap_or_default()
            }
            _ => SourceCodeLocation::default(),
        };
        Error {
            location,
            kind: ErrorKind::Malformed(e),
        }
    })
}

/// Parse a single instruction. Labels and trailing comments are allowed.
pub fn parse_instruction(input: &str) -> Result<Instruction, Error> {
    let line = strip_comments(input);
    let line = line.trim_end();
    parse_line(
        line,
        SourceCodeLocation {
            line: 1,
            column: 1,
            offset: 0,
            length: line.len(),
        },
    )
}

fn label(input: &str) -> IResult<&str, &str> {
    terminated(digit1, opt(one_of(").:")))(input)
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |digits: &str| digits.parse::<usize>())(input)
}

fn statement(input: &str) -> IResult<&str, (&str, Vec<usize>)> {
    all_consuming(delimited(
        tuple((space0, opt(terminated(label, space0)))),
        pair(alpha1, many0(preceded(space1, number))),
        space0,
    ))(input)
}

fn parse_line(line: &str, location: SourceCodeLocation) -> Result<Instruction, Error> {
    let at = |fragment: &str, length: usize, kind: ErrorKind| {
        let column = line.offset(fragment);
        Error {
            location: SourceCodeLocation {
                column: column + 1,
                offset: location.offset + column,
                length,
                ..location
            },
            kind,
        }
    };

    let (_, (name, params)) = statement(line).map_err(|e| match e {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let length = e.input.split_whitespace().next().map_or(1, str::len);
            at(e.input, length, ErrorKind::Syntax)
        }
        nom::Err::Incomplete(_) => at(line, line.len(), ErrorKind::Syntax),
    })?;

    let expected = *ARITY
        .get(name)
        .ok_or_else(|| at(name, name.len(), ErrorKind::UnknownOperation(name.to_string())))?;
    if params.len() != expected {
        return Err(at(
            name,
            line.len() - line.offset(name),
            ErrorKind::WrongArity {
                name: name.to_string(),
                expected,
                found: params.len(),
            },
        ));
    }

    let p = |i: usize| params[i];
    Ok(match name {
        "const" => Instruction::Next(MacroOp::Constant(p(0))),
        "shL" => Instruction::Next(MacroOp::ShiftLeft(p(0))),
        "shR" => Instruction::Next(MacroOp::ShiftRight(p(0))),
        "copy" => Instruction::Next(MacroOp::Copy(p(0))),
        "move" => Instruction::Next(MacroOp::Move(p(0), p(1))),
        "swap" => Instruction::Next(MacroOp::Swap),
        "add" => Instruction::Next(MacroOp::Add),
        "monus" => Instruction::Next(MacroOp::Monus),
        "mult" => Instruction::Next(MacroOp::Multiply),
        "divide" => Instruction::Next(MacroOp::Divide),
        "ifGT" => Instruction::Goto(Predicate::GreaterThan, p(0)),
        "ifGE" => Instruction::Goto(Predicate::GreaterOrEqual, p(0)),
        "ifLT" => Instruction::Goto(Predicate::LessThan, p(0)),
        "ifLE" => Instruction::Goto(Predicate::LessOrEqual, p(0)),
        "ifEQ" => Instruction::Goto(Predicate::Equal, p(0)),
        "ifNE" => Instruction::Goto(Predicate::NotEqual, p(0)),
        "goto" => Instruction::Goto(Predicate::Jump, p(0)),
        _ => Instruction::Halt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_optional() {
        let expected = Instruction::Next(MacroOp::Move(1, 2));
        assert_eq!(parse_instruction("move 1 2").unwrap(), expected);
        assert_eq!(parse_instruction("4) move 1 2").unwrap(), expected);
        assert_eq!(parse_instruction("  4:move   1 2  ").unwrap(), expected);
        assert_eq!(parse_instruction("4 move 1 2 // relocate").unwrap(), expected);
    }

    #[test]
    fn test_error_columns() {
        let err = parse_instruction("1) const 3x").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.location.column, 11);

        let err = parse_instruction("1) jump 3").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownOperation("jump".to_string()));
        assert_eq!(err.location.column, 4);
        assert_eq!(err.location.length, 4);
    }
}
