//! End-to-End Parser Benchmarks
//!
//! This benchmark suite measures the performance of this crate's
//! lex-parse-typecheck pass across several categories of source text:
//!
//! - **Simple Programs**: bare declarations and arithmetic
//! - **Control Flow**: `if`/`while` bodies, nested blocks
//! - **Procedures**: literals, calls, and generic instantiation
//! - **Stress Tests**: deep nesting and wide programs
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench simple_programs
//! cargo bench procedures
//! cargo bench stress_tests
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use staticlang_parser::parse;

fn bench_simple_programs(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple_programs");

    let programs = vec![
        ("single_decl", "long x = 1;"),
        ("arithmetic_chain", "long x = 1 + 2 * 3 - 4 / 2;"),
        (
            "several_decls",
            "long a = 1; float b = 2.5; bool c = true; char d = 'x';",
        ),
        ("readonly_decl", "readonly long x = 42;"),
        ("global_decl", "global long counter = 0;"),
        ("reassignment", "long x = 1; x = 2; x = x + 1;"),
    ];

    for (name, source) in programs {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(name), &source, |b, src| {
            b.iter(|| parse(black_box(src)));
        });
    }

    group.finish();
}

fn bench_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("control_flow");

    let programs = vec![
        (
            "if_else",
            "long x = 1; if (x == 1) { x = 2; } else { x = 3; }",
        ),
        (
            "while_loop",
            "long i = 0; while (i < 10) { i = i + 1; }",
        ),
        (
            "nested_loops",
            "long i = 0; while (i < 5) { long j = 0; while (j < 5) { j = j + 1; } i = i + 1; }",
        ),
        (
            "loop_with_break_continue",
            "long i = 0; while (i < 100) { i = i + 1; if (i == 50) { break; } if (i == 2) { continue; } }",
        ),
        (
            "array_literal_and_index",
            "array<long> xs = [1, 2, 3, 4, 5]; long first = xs[0];",
        ),
        (
            "alloc_array",
            "array<long> xs = new long[10]; xs[0] = 1;",
        ),
    ];

    for (name, source) in programs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &source, |b, src| {
            b.iter(|| parse(black_box(src)));
        });
    }

    group.finish();
}

fn bench_procedures(c: &mut Criterion) {
    let mut group = c.benchmark_group("procedures");

    let programs = vec![
        (
            "trivial_proc",
            "auto f = proc<>() return nothing {};",
        ),
        (
            "proc_call",
            "auto add = proc<>(long a, long b) return long { return a + b; }; long r = add(1, 2);",
        ),
        (
            "generic_identity",
            "auto id = proc<T>(T x) return T { return x; }; long r = id<long>(5);",
        ),
        (
            "recursive_proc",
            "auto fact = proc<>(long n) return long { if (n == 0) { return 1; } return n * thisproc(n - 1); };",
        ),
        (
            "nested_proc_literal",
            "auto outer = proc<>() return long { auto inner = proc<>() return long { return 1; }; return inner(); };",
        ),
    ];

    for (name, source) in programs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &source, |b, src| {
            b.iter(|| parse(black_box(src)));
        });
    }

    group.finish();
}

// ============================================================================
// Stress Tests
// ============================================================================

/// Builds `a - a - a - ... - a` with `depth` subtractions, stressing the
/// left-recursive precedence-climbing loop in `parser::expr`.
fn deep_binary_chain(depth: usize) -> String {
    let mut source = String::from("long a = 1; long r = a");
    for _ in 0..depth {
        source.push_str(" - a");
    }
    source.push(';');
    source
}

/// Builds `depth` nested `if (true) { ... }` blocks, stressing frame-stack
/// depth and block nesting.
fn deep_nested_blocks(depth: usize) -> String {
    let mut source = String::new();
    for _ in 0..depth {
        source.push_str("if (true) {");
    }
    source.push_str("long x = 1;");
    for _ in 0..depth {
        source.push('}');
    }
    source
}

/// Builds a program with `width` independent top-level declarations,
/// stressing the global declaration table rather than nesting depth.
fn wide_program(width: usize) -> String {
    let mut source = String::new();
    for i in 0..width {
        source.push_str(&format!("long x{i} = {i};"));
    }
    source
}

fn bench_stress_tests(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress_tests");
    group.sample_size(30);

    for depth in [10, 50, 100] {
        let source = deep_binary_chain(depth);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("deep_binary_chain", depth),
            &source,
            |b, src| b.iter(|| parse(black_box(src))),
        );
    }

    for depth in [4, 8, 16] {
        let source = deep_nested_blocks(depth);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("deep_nested_blocks", depth),
            &source,
            |b, src| b.iter(|| parse(black_box(src))),
        );
    }

    for width in [50, 200, 500] {
        let source = wide_program(width);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("wide_program", width), &source, |b, src| {
            b.iter(|| parse(black_box(src)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_programs,
    bench_control_flow,
    bench_procedures,
    bench_stress_tests
);
criterion_main!(benches);
