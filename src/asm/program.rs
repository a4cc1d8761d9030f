use super::{Error, Instruction, MacroOp};
use serde_derive::{Deserialize, Serialize};
use std::{fmt, ops::Index};

/// A validated list of instructions.
///
/// Every branch target is a valid 1-based instruction index, and no
/// `divide` directly follows a `const 0`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Instruction>")]
pub struct Program(Vec<Instruction>);

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Result<Self, Error> {
        let len = instructions.len();
        for (i, instruction) in instructions.iter().enumerate() {
            let index = i + 1;
            match instruction {
                Instruction::Goto(_, target) if *target == 0 || *target > len => {
                    return Err(Error::MalformedProgram(
                        index,
                        format!("branch target {target} is outside instructions 1 to {len}"),
                    ));
                }
                Instruction::Next(MacroOp::Divide)
                    if i > 0
                        && instructions[i - 1] == Instruction::Next(MacroOp::Constant(0)) =>
                {
                    return Err(Error::MalformedProgram(
                        index,
                        "division by the constant zero".to_string(),
                    ));
                }
                _ => {}
            }
        }
        Ok(Self(instructions))
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.0
    }

    /// Get an instruction by its 0-based position.
    pub fn get(&self, i: usize) -> Option<&Instruction> {
        self.0.get(i)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for Program {
    type Output = Instruction;

    fn index(&self, i: usize) -> &Instruction {
        &self.0[i]
    }
}

impl TryFrom<Vec<Instruction>> for Program {
    type Error = Error;

    fn try_from(instructions: Vec<Instruction>) -> Result<Self, Error> {
        Self::new(instructions)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, instruction) in self.0.iter().enumerate() {
            writeln!(f, "{}) {instruction}", i + 1)?;
        }
        Ok(())
    }
}
