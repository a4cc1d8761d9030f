use clap::*;
use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFiles,
    term::{
        emit,
        termcolor::{ColorChoice, StandardStream},
    },
};
use log::LevelFilter;
use rayon::prelude::*;
use std::{
    fmt,
    fs::read_to_string,
    io::{self, BufRead, Write},
};
use tally::{
    asm::Program,
    parse::{self, parse_program, strip_comments},
    runner::{self, Run, Runner},
    LOGO_WITH_COLOR,
};

#[derive(Parser, Debug)]
#[clap(author, version, about = LOGO_WITH_COLOR, long_about = Some(LOGO_WITH_COLOR))]
struct Args {
    /// The program to load. If omitted, the program is typed in line by line.
    #[clap(value_parser)]
    program: Option<String>,

    /// Tapes to run the program on. If omitted, tapes are read one per line
    /// until `exit`.
    #[clap(short, long, value_parser)]
    input: Vec<String>,

    /// Print the tape after every instruction.
    #[clap(short, long)]
    trace: bool,

    /// Log every transition the machine takes.
    #[clap(short, long)]
    debug: bool,

    /// Give up on an instruction after its table takes this many steps.
    #[clap(short, long, value_parser)]
    step_limit: Option<usize>,

    /// Give up on a tape after this many instructions.
    #[clap(short = 'l', long, value_parser)]
    instruction_limit: Option<usize>,
}

enum Error {
    IO(io::Error),
    Parse(parse::Error),
    Run(runner::Error),
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IO(e) => write!(f, "IO error: {:?}", e),
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Run(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

fn read_file(name: &str) -> Result<String, Error> {
    read_to_string(name).map_err(Error::IO)
}

/// Read a program from standard input, one instruction per line, until an empty line.
fn read_program_interactively() -> Result<String, Error> {
    println!("Enter program string:");
    let stdin = io::stdin();
    let mut source = String::new();
    for i in 1.. {
        print!("{i}) ");
        io::stdout().flush().map_err(Error::IO)?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).map_err(Error::IO)? == 0 || line.trim().is_empty() {
            break;
        }
        source.push_str(&line);
    }
    Ok(source)
}

/// Parse a program, printing a diagnostic for any error.
fn load(filename: &str, source: &str) -> Result<Program, Error> {
    let code = strip_comments(source);
    parse_program(&code).map_err(|e| {
        let mut files = SimpleFiles::new();
        let file_id = files.add(filename, &code);
        let parse::SourceCodeLocation {
            line,
            column,
            offset,
            length,
        } = e.location;

        let diagnostic = Diagnostic::error()
            .with_message(format!("Error at {filename}:{line}:{column}"))
            .with_labels(vec![Label::primary(
                file_id,
                offset..(offset + length).min(code.len()),
            )
            .with_message(e.kind.to_string())]);

        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();
        if let Err(err) = emit(&mut writer.lock(), &config, &files, &diagnostic) {
            log::error!("could not render diagnostic: {err}");
        }
        Error::Parse(e)
    })
}

fn report(input: &str, run: &Run) {
    if let Some(trace) = &run.trace {
        for snapshot in trace {
            println!("{snapshot}\n");
        }
    }
    println!("{input} => {}", run.tape);
    println!("{}^", " ".repeat(run.cursor + input.len() + 4));
}

/// Report every result of a batch, returning the failures in input order.
fn report_all(inputs: &[String], results: Vec<Result<Run, runner::Error>>) -> Vec<runner::Error> {
    let mut failures = vec![];
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(run) => report(input, &run),
            Err(e) => {
                eprintln!("{input}: {e}");
                failures.push(e);
            }
        }
    }
    failures
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.debug {
            LevelFilter::Trace
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let (filename, source) = match &args.program {
        Some(path) => (path.clone(), read_file(path)?),
        None => ("<stdin>".to_string(), read_program_interactively()?),
    };
    let program = load(&filename, &source)?;
    println!("=== PROGRAM ===\n{program}");

    let mut runner = Runner::new(&program).with_trace(args.trace);
    if let Some(limit) = args.step_limit {
        runner = runner.with_step_limit(limit);
    }
    if let Some(limit) = args.instruction_limit {
        runner = runner.with_instruction_limit(limit);
    }

    if !args.input.is_empty() {
        let results = args
            .input
            .par_iter()
            .map(|input| runner.run(input))
            .collect::<Vec<_>>();
        return match report_all(&args.input, results).into_iter().next() {
            Some(e) => Err(Error::Run(e)),
            None => Ok(()),
        };
    }

    let stdin = io::stdin();
    loop {
        print!("\nType 'exit' to close\nEnter string: ");
        io::stdout().flush().map_err(Error::IO)?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).map_err(Error::IO)? == 0 {
            break;
        }
        let input = line.trim();
        if input == "exit" {
            break;
        }
        match runner.run(input) {
            Ok(run) => report(input, &run),
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_reports_past_failures() {
        let program = parse_program("const 1\nadd\nhalt").unwrap();
        let batch = Runner::new(&program);
        let inputs = ["#1#", "#1x#", "11", "#2#"].map(String::from).to_vec();
        let results = inputs.iter().map(|input| batch.run(input)).collect::<Vec<_>>();
        assert!(results[2].is_ok());

        let failures = report_all(&inputs, results);
        assert_eq!(failures.len(), 2);
        assert!(failures
            .iter()
            .all(|e| matches!(e, runner::Error::InvalidInput(_))));
    }
}
