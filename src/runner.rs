//! # Runner Module
//!
//! The runner executes a [`Program`] over an input tape. It assembles each
//! instruction into a table as it is reached, runs it from the shared
//! cursor, and then normalizes the tape before moving on.
//!
//! The state shared between instructions is an explicit [`Context`]: the
//! tape (which carries the cursor) and the condition flag set by the last
//! comparison.
use crate::{
    asm::{self, Instruction, Predicate, Program},
    vm::{self, Interpreter, Tape},
};
use log::{debug, info};
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// The state threaded through every instruction of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context {
    pub tape: Tape,
    /// The result of the most recent comparison.
    pub cond: bool,
}

/// The tape after an instruction, recorded when tracing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The 1-based index of the instruction that just ran, or `None` for
    /// the initial tape.
    pub index: Option<usize>,
    pub instruction: Option<Instruction>,
    pub tape: String,
    pub cursor: usize,
    pub cond: bool,
}

impl Snapshot {
    fn new(index: Option<usize>, instruction: Option<Instruction>, ctx: &Context) -> Self {
        Self {
            index,
            instruction,
            tape: ctx.tape.to_string(),
            cursor: ctx.tape.cursor(),
            cond: ctx.cond,
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.index, &self.instruction) {
            (Some(index), Some(instruction)) => writeln!(f, "=== {index}) {instruction} ===")?,
            _ => writeln!(f, "=== INPUT ===")?,
        }
        writeln!(f, "{}", self.tape)?;
        write!(f, "{}^", " ".repeat(self.cursor))
    }
}

/// The result of running a program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// The final tape, normalized.
    pub tape: String,
    pub cursor: usize,
    /// One snapshot per executed instruction, when tracing was enabled.
    pub trace: Option<Vec<Snapshot>>,
}

impl Run {
    /// The registers left on the tape, from left to right.
    pub fn registers(&self) -> Vec<usize> {
        self.tape
            .split('#')
            .filter(|run| !run.is_empty())
            .map(str::len)
            .collect()
    }
}

/// An error raised while running a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The input string was not a valid tape.
    InvalidInput(vm::Error),
    /// An instruction failed. Carries where it failed and the tape at that point.
    Instruction {
        index: usize,
        instruction: Instruction,
        tape: String,
        cursor: usize,
        error: asm::Error,
    },
    /// An instruction left a scratch marker on the tape.
    ScratchLeak {
        index: usize,
        instruction: Instruction,
        tape: String,
    },
    /// The run executed more instructions than it was allowed.
    InstructionLimitExceeded(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidInput(e) => write!(f, "invalid input: {e}"),
            Error::Instruction {
                index,
                instruction,
                tape,
                cursor,
                error,
            } => write!(
                f,
                "instruction {index} (`{instruction}`) failed: {error}\n{tape}\n{}^",
                " ".repeat(*cursor)
            ),
            Error::ScratchLeak {
                index,
                instruction,
                tape,
            } => write!(
                f,
                "instruction {index} (`{instruction}`) left a scratch marker on the tape: {tape}"
            ),
            Error::InstructionLimitExceeded(limit) => {
                write!(f, "program did not halt within {limit} instructions")
            }
        }
    }
}

/// What the runner does after an instruction.
enum Flow {
    Continue(usize),
    Halt,
}

/// Runs a program over input tapes.
#[derive(Clone, Debug)]
pub struct Runner<'a> {
    program: &'a Program,
    interpreter: Interpreter,
    trace: bool,
    instruction_limit: Option<usize>,
}

impl<'a> Runner<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            interpreter: Interpreter::new(),
            trace: false,
            instruction_limit: None,
        }
    }

    /// Record a snapshot of the tape after every instruction.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Fail any single table that takes more than `limit` transitions.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.interpreter = self.interpreter.with_step_limit(limit);
        self
    }

    /// Fail a run that executes more than `limit` instructions.
    pub fn with_instruction_limit(mut self, limit: usize) -> Self {
        self.instruction_limit = Some(limit);
        self
    }

    /// Run the program over an input string of `#` and `1`.
    pub fn run(&self, input: &str) -> Result<Run, Error> {
        let mut ctx = Context {
            tape: Tape::parse(input).map_err(Error::InvalidInput)?,
            cond: false,
        };
        info!("running program on {}", ctx.tape);

        let mut trace = self
            .trace
            .then(|| vec![Snapshot::new(None, None, &ctx)]);

        let mut idx = 0;
        let mut executed = 0;
        while let Some(instruction) = self.program.get(idx) {
            if let Some(limit) = self.instruction_limit {
                if executed >= limit {
                    return Err(Error::InstructionLimitExceeded(limit));
                }
            }
            executed += 1;

            let flow = self.step(&mut ctx, idx, instruction)?;
            if let Some(trace) = trace.as_mut() {
                trace.push(Snapshot::new(Some(idx + 1), Some(*instruction), &ctx));
            }
            match flow {
                Flow::Continue(next) => idx = next,
                Flow::Halt => break,
            }
        }

        info!("halted after {executed} instructions with {}", ctx.tape);
        Ok(Run {
            tape: ctx.tape.to_string(),
            cursor: ctx.tape.cursor(),
            trace,
        })
    }

    /// Execute the instruction at `idx`, and decide where to go next.
    fn step(&self, ctx: &mut Context, idx: usize, instruction: &Instruction) -> Result<Flow, Error> {
        let index = idx + 1;
        let before = ctx.tape.clone();
        let fail = |error: asm::Error| Error::Instruction {
            index,
            instruction: *instruction,
            tape: before.to_string(),
            cursor: before.cursor(),
            error,
        };

        debug!("{index}) {instruction} at {}", ctx.tape.cursor());
        let flow = match instruction {
            Instruction::Halt => return Ok(Flow::Halt),
            Instruction::Next(op) => {
                op.execute(&self.interpreter, &mut ctx.tape).map_err(fail)?;
                Flow::Continue(idx + 1)
            }
            Instruction::Goto(Predicate::Jump, target) => Flow::Continue(target - 1),
            Instruction::Goto(predicate, target) => {
                ctx.cond = predicate
                    .evaluate(&self.interpreter, &mut ctx.tape)
                    .map_err(fail)?;
                if ctx.cond {
                    Flow::Continue(target - 1)
                } else {
                    Flow::Continue(idx + 1)
                }
            }
        };

        ctx.tape.normalize();
        if ctx.tape.find_scratch().is_some() {
            return Err(Error::ScratchLeak {
                index,
                instruction: *instruction,
                tape: ctx.tape.to_string(),
            });
        }
        debug!("{}", ctx.tape);
        Ok(flow)
    }
}

/// Run a program over an input string, without tracing.
pub fn compile_and_run(program: &Program, input: &str) -> Result<Run, Error> {
    Runner::new(program).run(input)
}
