use tally::vm::{self, Symbol::*, *};

/// A table that appends a digit to the register under the cursor.
fn increment() -> TransitionTable {
    let mut b = TableBuilder::new();
    b.push(State::new(Direction::None).on(One, One, 2).on(Blank, One, 3));
    b.push(State::new(Direction::Right).on(One, One, 2).on(Blank, One, 3));
    b.accept();
    b.build().unwrap()
}

/// A table that accepts if the register right of the cursor is even.
fn even() -> TransitionTable {
    let mut b = TableBuilder::new();
    b.push(State::new(Direction::Right).on(One, One, 2).on(Blank, Blank, 3));
    b.push(State::new(Direction::Right).on(One, One, 1).on(Blank, Blank, 4));
    b.accept();
    b.reject();
    b.build().unwrap()
}

#[test]
fn test_parse_tape() {
    let tape = Tape::parse("11##1").unwrap();
    assert_eq!(tape.to_string(), "#11#1#");
    assert_eq!(tape.cursor(), 5);
    assert_eq!(tape.registers(), vec![2, 1]);

    assert_eq!(Tape::parse("").unwrap().to_string(), "#");
    assert_eq!(Tape::parse("#").unwrap().cursor(), 0);
    assert_eq!(Tape::parse("#12#"), Err(Error::InvalidSymbol('2', 2)));
    assert_eq!(Tape::parse("1x"), Err(Error::InvalidSymbol('x', 1)));
}

#[test]
fn test_normalize_is_idempotent() {
    for input in ["", "#", "1", "##1##11###", "111#1#11#", "#####"] {
        let mut once = Tape::parse(input).unwrap();
        once.normalize();
        let mut twice = once.clone();
        twice.normalize();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_increment() {
    let mut tape = Tape::from_symbols(vec![Blank, One, One, Blank], 1);
    let outcome = vm::run(&increment(), &mut tape).unwrap();
    assert!(outcome.accepted);
    assert_eq!(outcome.steps, 3);
    assert_eq!(tape.to_string(), "#111");
    assert_eq!(tape.cursor(), 3);
}

#[test]
fn test_accept_and_reject() {
    for n in 0..8 {
        let mut cells = vec![Blank];
        cells.extend(std::iter::repeat(One).take(n));
        cells.push(Blank);
        let mut tape = Tape::from_symbols(cells, 0);
        let outcome = vm::run(&even(), &mut tape).unwrap();
        assert_eq!(outcome.accepted, n % 2 == 0, "n = {n}");
    }
}

#[test]
fn test_undefined_transition() {
    let mut tape = Tape::from_symbols(vec![Blank, ScratchX], 0);
    let err = vm::run(&even(), &mut tape).unwrap_err();
    assert_eq!(
        err,
        Error::UndefinedTransition {
            state: 1,
            symbol: ScratchX
        }
    );
}

#[test]
fn test_entry_direction_fires_on_first_state() {
    let mut b = TableBuilder::new();
    b.push(State::new(Direction::Left).on(One, ScratchA, 2));
    b.accept();
    let table = b.build().unwrap();

    let mut tape = Tape::from_symbols(vec![One, Blank], 1);
    let outcome = vm::run(&table, &mut tape).unwrap();
    assert_eq!(outcome.steps, 1);
    assert_eq!(tape.cells(), &[ScratchA, Blank]);
}

#[test]
fn test_tape_grows_both_ways() {
    // Walk left off the tape, then right off the other end.
    let mut b = TableBuilder::new();
    b.push(State::new(Direction::Left).on(One, One, 1).on(Blank, One, 2));
    b.push(State::new(Direction::Right).on(One, One, 2).on(Blank, Blank, 3));
    b.accept();
    let table = b.build().unwrap();

    let mut tape = Tape::from_symbols(vec![One, One], 1);
    let outcome = vm::run(&table, &mut tape).unwrap();
    assert!(outcome.accepted);
    assert_eq!(tape.to_string(), "111#");
    assert_eq!(tape.cursor(), 3);
    assert_eq!(outcome.grown, 1);
}

#[test]
fn test_step_limit() {
    let mut b = TableBuilder::new();
    b.push(State::new(Direction::Right).on(Blank, Blank, 1).on(One, One, 2));
    b.accept();
    let table = b.build().unwrap();

    let mut tape = Tape::new();
    let err = Interpreter::new()
        .with_step_limit(100)
        .run(&table, &mut tape)
        .unwrap_err();
    assert_eq!(err, Error::StepLimitExceeded(100));
}

#[test]
fn test_sequence_forwards_reject() {
    let table = sequence([even(), even()]).unwrap();
    assert_eq!(table.accept(), 7);
    assert_eq!(table.reject(), Some(4));
    assert_eq!(table.state(3), Some(&State::junction(5)));
    assert_eq!(table.state(8), Some(&State::junction(4)));

    // Two even registers in a row.
    let mut tape = Tape::from_symbols(vec![Blank, One, One, Blank, One, One, Blank], 0);
    assert!(vm::run(&table, &mut tape).unwrap().accepted);
    assert_eq!(tape.cursor(), 6);

    let mut tape = Tape::from_symbols(vec![Blank, One, One, Blank, One, Blank], 0);
    assert!(!vm::run(&table, &mut tape).unwrap().accepted);
}

#[test]
fn test_listing() {
    let listing = format!("{:#}", increment());
    assert_eq!(
        listing,
        "0001: none (#/1,3) (1/1,2)\n0002: right (#/1,3) (1/1,2)\n0003: accept\n"
    );
}
