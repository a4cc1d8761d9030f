use tally::{
    asm::{self, core, MacroOp, Predicate},
    vm::{self, sequence, Symbol, Tape, TransitionTable},
};

/// Lay registers out on a tape, `#` separated, with the cursor on the
/// final blank. Empty registers are kept as adjacent blanks.
fn registers(lengths: &[usize]) -> Tape {
    let mut cells = vec![Symbol::Blank];
    for &len in lengths {
        cells.extend(std::iter::repeat(Symbol::One).take(len));
        cells.push(Symbol::Blank);
    }
    let cursor = cells.len() - 1;
    let mut tape = Tape::from_symbols(cells, cursor);
    tape.pad(64);
    tape
}

/// Run a table over the given registers, and return the registers left
/// behind and whether the table accepted.
fn run(table: &TransitionTable, lengths: &[usize]) -> (Vec<usize>, bool) {
    let mut tape = registers(lengths);
    let outcome = vm::run(table, &mut tape).unwrap();
    assert_eq!(tape.find_scratch(), None, "scratch left on {tape}");

    tape.normalize();
    // The cursor must end on the final blank, right of the top register.
    assert_eq!(tape.cursor(), tape.len() - 1, "cursor misplaced on {tape:#}");
    (tape.registers(), outcome.accepted)
}

fn nonzero(lengths: &[usize]) -> Vec<usize> {
    lengths.iter().copied().filter(|n| *n > 0).collect()
}

fn check_binary(op: MacroOp, f: impl Fn(usize, usize) -> Vec<usize>) {
    let table = op.assemble().unwrap();
    for prefix in [vec![], vec![2], vec![1, 3]] {
        for a in 0..=6 {
            for b in 0..=6 {
                let mut input = prefix.clone();
                input.extend([a, b]);
                let mut expected = prefix.clone();
                expected.extend(f(a, b));
                assert_eq!(
                    run(&table, &input).0,
                    nonzero(&expected),
                    "{op} on {input:?}"
                );
            }
        }
    }
}

#[test]
fn test_constant() {
    for k in 0..6 {
        let mut tape = Tape::new();
        let outcome = vm::run(&core::constant(k).unwrap(), &mut tape).unwrap();
        assert!(outcome.accepted);
        assert_eq!(tape.cells()[1..=k], vec![Symbol::One; k][..]);
        assert_eq!(tape.cursor(), k + 1);
        assert_eq!(tape.read(), Symbol::Blank);

        assert_eq!(run(&core::constant(k).unwrap(), &[3]).0, nonzero(&[3, k]));
    }
}

#[test]
fn test_shift_round_trip() {
    for k in 0..4 {
        let table = sequence([core::shift_left(k).unwrap(), core::shift_right(k).unwrap()]).unwrap();
        let mut tape = registers(&[1, 2, 3]);
        let before = tape.clone();
        vm::run(&table, &mut tape).unwrap();
        assert_eq!(tape.cursor(), before.cursor());
        assert_eq!(tape.to_string(), before.to_string());
    }
}

#[test]
fn test_shift_left() {
    let mut tape = registers(&[1, 2, 3]);
    vm::run(&core::shift_left(2).unwrap(), &mut tape).unwrap();
    // On the blank between the registers of length 1 and 2.
    assert_eq!(tape.cursor(), 2);
    assert_eq!(tape.registers_left(1), vec![1]);
}

#[test]
fn test_add() {
    check_binary(MacroOp::Add, |a, b| vec![a + b]);
}

#[test]
fn test_monus() {
    check_binary(MacroOp::Monus, |a, b| vec![a.saturating_sub(b)]);
}

#[test]
fn test_multiply() {
    check_binary(MacroOp::Multiply, |a, b| vec![a * b]);
}

#[test]
fn test_swap() {
    check_binary(MacroOp::Swap, |a, b| vec![b, a]);
}

#[test]
fn test_divide() {
    let table = MacroOp::Divide.assemble().unwrap();
    for prefix in [vec![], vec![2]] {
        for a in 0..8 {
            for b in 1..6 {
                let mut input = prefix.clone();
                input.extend([a, b]);
                let mut expected = prefix.clone();
                expected.push(a / b);
                assert_eq!(run(&table, &input).0, nonzero(&expected), "{a} / {b}");
            }
        }
    }
}

#[test]
fn test_comparisons() {
    let predicates = [
        Predicate::GreaterThan,
        Predicate::GreaterOrEqual,
        Predicate::LessThan,
        Predicate::LessOrEqual,
        Predicate::Equal,
        Predicate::NotEqual,
    ];
    for predicate in predicates {
        let table = predicate.assemble().unwrap();
        for prefix in [vec![], vec![2], vec![1, 3]] {
            for a in 0..6 {
                for b in 0..6 {
                    let mut input = prefix.clone();
                    input.extend([a, b]);
                    let (left, accepted) = run(&table, &input);
                    assert_eq!(accepted, predicate.holds(a, b), "{} {a} {b}", predicate.name());
                    // Both operands are consumed.
                    assert_eq!(left, nonzero(&prefix));
                }
            }
        }
    }
}

#[test]
fn test_copy() {
    for k in 0..4 {
        let table = MacroOp::Copy(k).assemble().unwrap();
        for n in 0..4usize.pow(k as u32) {
            let top = (0..k).map(|i| n / 4usize.pow(i as u32) % 4).collect::<Vec<_>>();
            for prefix in [vec![], vec![2]] {
                let mut input = prefix.clone();
                input.extend(&top);
                let mut expected = input.clone();
                expected.extend(&top);
                assert_eq!(run(&table, &input).0, nonzero(&expected), "copy {k} on {input:?}");
            }
        }
    }
}

#[test]
fn test_move() {
    for j in 0..4 {
        for k in 0..4 {
            let table = MacroOp::Move(j, k).assemble().unwrap();
            let count = (j + k) as u32;
            for n in 0..4usize.pow(count) {
                let regs = (0..count)
                    .map(|i| n / 4usize.pow(i) % 4)
                    .collect::<Vec<_>>();
                for prefix in [vec![], vec![2]] {
                    let mut input = prefix.clone();
                    input.extend(&regs);
                    let mut expected = prefix.clone();
                    expected.extend(&regs[j..]);
                    assert_eq!(
                        run(&table, &input).0,
                        nonzero(&expected),
                        "move {j} {k} on {input:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_capacity() {
    let tape = Tape::parse("#111#11#").unwrap();
    assert_eq!(MacroOp::Constant(4).capacity(&tape), 8);
    assert_eq!(MacroOp::ShiftRight(3).capacity(&tape), 3);
    assert_eq!(MacroOp::Copy(2).capacity(&tape), 3 + 2 + 2 + 1);
    assert_eq!(MacroOp::Multiply.capacity(&tape), 3 * 2 + 2);
    assert_eq!(MacroOp::Divide.capacity(&tape), 5);
    assert_eq!(MacroOp::Swap.capacity(&tape), 0);
}

#[test]
fn test_divide_by_empty_register() {
    let interpreter = vm::Interpreter::new();
    for mut tape in [registers(&[3, 0]), Tape::new()] {
        let before = tape.clone();
        let err = MacroOp::Divide.execute(&interpreter, &mut tape).unwrap_err();
        assert_eq!(err, asm::Error::DivisionByZero);
        assert_eq!(tape, before);
    }
}

#[test]
fn test_execute_reserves_capacity() {
    let interpreter = vm::Interpreter::new();
    for (a, b) in [(3, 4), (5, 5), (7, 2)] {
        for op in [MacroOp::Multiply, MacroOp::Divide] {
            let mut tape = Tape::parse(&format!("#{}#{}#", "1".repeat(a), "1".repeat(b))).unwrap();
            op.execute(&interpreter, &mut tape).unwrap();
            assert_eq!(tape.overflow(), 0, "{op} {a} {b}");
        }
    }
}

#[test]
fn test_tables_are_consistent() {
    let ops = [
        MacroOp::Constant(3),
        MacroOp::ShiftLeft(2),
        MacroOp::ShiftRight(2),
        MacroOp::Copy(3),
        MacroOp::Move(2, 3),
        MacroOp::Swap,
        MacroOp::Add,
        MacroOp::Monus,
        MacroOp::Multiply,
        MacroOp::Divide,
    ];
    for op in ops {
        let table = op.assemble().unwrap();
        assert!(table.reject().is_none(), "{op}");
        assert!(table.state(table.accept()).unwrap().transitions.is_empty());
    }
    assert!(Predicate::Equal.assemble().unwrap().reject().is_some());
    assert_eq!(Predicate::Jump.assemble().unwrap().len(), 1);
}
