//! End-to-end listing generation throughput.
//!
//! Measures static data collection alone and the full compile (collection,
//! lowering, runtime and layout) on synthetic programs of growing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tasmgen::ast::{Alternative, BinOp, Node};
use tasmgen::collect::StaticData;
use tasmgen::{compile_with_options, CompileOptions, RedeclarationPolicy};

/// Build a program of `n` statements mixing every construct.
fn synthetic_program(n: usize) -> Node {
    let stmts: Vec<Node> = (0..n)
        .map(|i| {
            let var = format!("v{}", i % 16);
            match i % 4 {
                0 => Node::assign(
                    var.clone(),
                    Node::binary(BinOp::Add, Node::ident(var), Node::number(i.to_string())),
                ),
                1 => Node::if_(
                    Node::binary(BinOp::Lt, Node::ident(var), Node::number("100")),
                    Node::string(format!("low {}", i % 8)),
                    Some(Alternative::else_(Node::string("high"))),
                ),
                2 => Node::while_(
                    Node::binary(BinOp::Gt, Node::ident(var.clone()), Node::number("0")),
                    Node::assign(
                        var.clone(),
                        Node::binary(BinOp::Div, Node::ident(var), Node::number("2")),
                    ),
                ),
                _ => Node::for_(
                    Node::assign("i", Node::number("0")),
                    Node::binary(BinOp::Lt, Node::ident("i"), Node::number("10")),
                    Node::assign(
                        "i",
                        Node::binary(BinOp::Add, Node::ident("i"), Node::number("1")),
                    ),
                    Node::string("step"),
                ),
            }
        })
        .collect();
    Node::block(stmts).unwrap_or(Node::Unknown)
}

fn bench_collect(c: &mut Criterion) {
    let small = synthetic_program(100);
    let large = synthetic_program(2_000);

    let mut group = c.benchmark_group("collect");
    group.bench_function("100_stmts", |b| {
        b.iter(|| StaticData::collect(black_box(&small)))
    });
    group.bench_function("2000_stmts", |b| {
        b.iter(|| StaticData::collect(black_box(&large)))
    });
    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let small = synthetic_program(100);
    let large = synthetic_program(2_000);
    let options = CompileOptions {
        redeclaration: RedeclarationPolicy::Allow,
        ..CompileOptions::default()
    };

    let mut group = c.benchmark_group("compile");
    group.bench_function("100_stmts", |b| {
        b.iter(|| compile_with_options(black_box(&small), &options))
    });
    group.bench_function("2000_stmts", |b| {
        b.iter(|| compile_with_options(black_box(&large), &options))
    });
    group.finish();
}

criterion_group!(benches, bench_collect, bench_compile);
criterion_main!(benches);
