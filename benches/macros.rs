use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fs::read_to_string;
use tally::{
    asm::{MacroOp, Program},
    parse::{parse_program, strip_comments},
    runner::compile_and_run,
};

fn load(filename: &str) -> Program {
    let source = read_to_string(filename).unwrap();
    parse_program(&strip_comments(source)).unwrap()
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("Assemble");

    group.bench_function("copy 3", |b| b.iter(|| MacroOp::Copy(black_box(3)).assemble().unwrap()));
    group.bench_function("move 3 3", |b| b.iter(|| MacroOp::Move(black_box(3), 3).assemble().unwrap()));
    group.bench_function("mult", |b| b.iter(|| MacroOp::Multiply.assemble().unwrap()));

    group.finish();
}

fn bench_programs(c: &mut Criterion) {
    let mut group = c.benchmark_group("Demo Programs");
    group.sample_size(10);

    let triangle = load("demos/triangle.tally");
    let parity = load("demos/parity.tally");
    let sort_two = load("demos/sort_two.tally");

    group.bench_function("Triangle (n = 12)", |b| {
        b.iter(|| compile_and_run(&triangle, black_box("111111111111")).unwrap())
    });
    group.bench_function("Parity (n = 15)", |b| {
        b.iter(|| compile_and_run(&parity, black_box("111111111111111")).unwrap())
    });
    group.bench_function("Sort two", |b| {
        b.iter(|| compile_and_run(&sort_two, black_box("#11111111#111#")).unwrap())
    });
    group.bench_function("Triangle (parse + run)", |b| {
        b.iter(|| compile_and_run(&load("demos/triangle.tally"), "11111").unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_assemble, bench_programs);
criterion_main!(benches);
