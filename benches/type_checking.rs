//! Benchmarks for type checking and cascading re-validation
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fyre_pipeline::pipeline::{
    ConfigValue, ConstantElement, Element, MatrixMultiplyElement, NodeId, Pipeline,
};
use fyre_pipeline::{ScalarKind, TypeDescriptor};

fn vector(kind: ScalarKind, n: usize) -> TypeDescriptor {
    TypeDescriptor::vector(kind, n)
}

fn square(kind: ScalarKind, n: usize) -> TypeDescriptor {
    TypeDescriptor::matrix(kind, vec![n, n]).unwrap()
}

/// A chain of `stages` multiply nodes fed by one vector constant.
fn build_chain(stages: usize) -> (Pipeline, NodeId) {
    let mut pipeline = Pipeline::new();
    let source = pipeline
        .add_node(ConstantElement::with_type(vector(ScalarKind::Int, 8)))
        .unwrap();
    let mut upstream = source;
    for _ in 0..stages {
        let m = pipeline
            .add_node(ConstantElement::with_type(square(ScalarKind::Int, 8)))
            .unwrap();
        let stage = pipeline.add_node(MatrixMultiplyElement::new()).unwrap();
        pipeline.add_edge(upstream, 0, stage, 0).unwrap();
        pipeline.add_edge(m, 0, stage, 1).unwrap();
        upstream = stage;
    }
    (pipeline, source)
}

fn bench_matrix_multiply_check(c: &mut Criterion) {
    let element = MatrixMultiplyElement::new();
    let accepted = [vector(ScalarKind::Int, 3), square(ScalarKind::Int, 3)];
    let rejected = [vector(ScalarKind::Int, 3), square(ScalarKind::Float, 3)];

    let mut group = c.benchmark_group("matrix_multiply_check");
    group.bench_function("accepted", |b| b.iter(|| element.check(black_box(&accepted))));
    group.bench_function("rejected", |b| b.iter(|| element.check(black_box(&rejected))));
    group.finish();
}

fn bench_type_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("type_parsing");
    for text in ["int", "float[3,4]", "pair(pair(int))"] {
        group.bench_with_input(BenchmarkId::from_parameter(text), text, |b, text| {
            b.iter(|| black_box(text).parse::<TypeDescriptor>())
        });
    }
    group.finish();
}

fn bench_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade");

    for stages in [10, 100, 500] {
        group.throughput(Throughput::Elements(stages as u64));
        group.bench_with_input(BenchmarkId::from_parameter(stages), &stages, |b, &stages| {
            let (mut pipeline, source) = build_chain(stages);
            let int = ConfigValue::Type(vector(ScalarKind::Int, 8));
            let float = ConfigValue::Type(vector(ScalarKind::Float, 8));
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let value = if flip { &float } else { &int };
                pipeline.configure_node(source, "type", value).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_matrix_multiply_check,
    bench_type_parsing,
    bench_cascade
);
criterion_main!(benches);
