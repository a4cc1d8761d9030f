//! # Tally
//!
//! ```text
//!  # 1 1 1 # 1 1 # 1 1 1 1 1 # 1 # # # # # #
//!                             ^
//! ```
//!
//! This crate implements a small register machine whose registers are
//! unary numbers written on a single Turing tape, and whose instructions
//! are compiled, one at a time, into Turing machine transition tables.
//!
//! ## What is Tally?
//!
//! Tally is a two-layer virtual machine. The bottom layer is a plain
//! single-tape Turing machine with a four-symbol alphabet: the blank `#`,
//! the unary digit `1`, and two scratch markers `x` and `a` that are only
//! ever used while a single instruction is executing. The top layer is a
//! tiny assembly language of arithmetic and control instructions:
//!
//! |            | Instructions                                              |
//! |------------|-----------------------------------------------------------|
//! | Registers  | `const k`, `shL k`, `shR k`, `copy k`, `move j k`, `swap` |
//! | Arithmetic | `add`, `monus`, `mult`, `divide`                          |
//! | Control    | `ifGT n`, `ifGE n`, `ifLT n`, `ifLE n`, `ifEQ n`, `ifNE n`, `goto n`, `halt` |
//!
//! Every instruction is assembled into a fresh transition table, which is
//! then run against the shared tape starting from the shared cursor.
//! Registers behave like a stack: the cursor rests on the blank to the
//! right of the topmost register, and instructions consume and produce
//! registers to the left of it.
//!
//! ## Index
//!
//! 1. [The Assembly Language](./asm/index.html)
//! 2. [The Virtual Machine](./vm/index.html)
//! 3. [The Program Runner](./runner/index.html)
//! 4. [The Program Parser](./parse/index.html)
//!
//! ## Example
//!
//! ```rust
//! use tally::{parse::parse_program, runner::compile_and_run};
//!
//! let program = parse_program("const 3\nconst 2\nadd\nhalt").unwrap();
//! let run = compile_and_run(&program, "#").unwrap();
//! assert_eq!(run.tape, "#11111#");
//! ```

pub mod asm;
pub mod parse;
pub mod runner;
pub mod vm;

/// The character art for the logo of the machine.
pub const LOGO: &str = r#"
 ████████╗ █████╗ ██╗     ██╗  ██╗   ██╗
 ╚══██╔══╝██╔══██╗██║     ██║  ╚██╗ ██╔╝
    ██║   ███████║██║     ██║   ╚████╔╝
    ██║   ██╔══██║██║     ██║    ╚██╔╝
    ██║   ██║  ██║███████╗███████╗██║
    ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝
   # 1 1 1 # 1 1 # 1 1 1 1 1 # 1 # #
                                 ^"#;

/// The character art for the logo of the machine, using ANSI escape codes for color.
pub const LOGO_WITH_COLOR: &str = "\x1b[32m
 ████████╗ █████╗ ██╗     ██╗  ██╗   ██╗
 ╚══██╔══╝██╔══██╗██║     ██║  ╚██╗ ██╔╝
    ██║   ███████║██║     ██║   ╚████╔╝
    ██║   ██╔══██║██║     ██║    ╚██╔╝
    ██║   ██║  ██║███████╗███████╗██║
    ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝
   # 1 1 1 # 1 1 # 1 1 1 1 1 # 1 # #
                                 ^\x1b[0m";
