//! Criterion benchmarks for laborsim_core
//!
//! Run with: cargo bench -p laborsim_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use laborsim_core::SimulationBuilder;
use laborsim_core::config::SimulationConfig;
use laborsim_core::simulation::simulate;
use laborsim_core::solver::{HoursProblem, NewtonHoursSolver, SolverOptions, initial_guess};

fn create_reform_config(population_size: usize) -> SimulationConfig {
    SimulationBuilder::new()
        .population_size(population_size)
        .seed(42)
        .regime("baseline", 0.5, 0.5)
        .taxed_regime("reform", 0.5, 0.5, 0.8, 0.05)
        .build()
        .unwrap()
}

fn bench_single_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("newton_solve");
    let problem = HoursProblem::new(1.3, 0.6, -1.5, 0.8, 1.0);
    let h0 = initial_guess(problem.wage, problem.adjusted_income);

    let fixed = NewtonHoursSolver::default();
    group.bench_function("fixed_30", |b| {
        b.iter(|| fixed.solve(black_box(h0), black_box(&problem)))
    });

    let tolerant = NewtonHoursSolver::new(SolverOptions::tolerance(1e-12, 100));
    group.bench_function("tolerance_1e-12", |b| {
        b.iter(|| tolerant.solve(black_box(h0), black_box(&problem)))
    });

    // Starts outside the feasible region
    let infeasible = HoursProblem::new(1.0, -5.0, -1.5, 0.8, 1.0);
    group.bench_function("infeasible_start", |b| {
        b.iter(|| fixed.solve(black_box(1.0), black_box(&infeasible)))
    });

    group.finish();
}

fn bench_population_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_section");

    for size in [1_000, 10_000, 100_000].iter() {
        let config = create_reform_config(*size);
        group.bench_with_input(BenchmarkId::new("agents", size), size, |b, _| {
            b.iter(|| simulate(black_box(&config)))
        });
    }

    group.finish();
}

fn bench_pipeline_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_variants");
    let config = create_reform_config(10_000);

    group.bench_function("independent", |b| {
        b.iter(|| simulate(black_box(&config)))
    });

    let mut panel = config.clone();
    panel.sampling = laborsim_core::config::SamplingMode::Panel;
    group.bench_function("panel", |b| b.iter(|| simulate(black_box(&panel))));

    let mut interior = config.clone();
    interior.stages.participation = false;
    group.bench_function("interior_only", |b| {
        b.iter(|| simulate(black_box(&interior)))
    });

    let mut heterogeneous = config.clone();
    heterogeneous.preferences.disutility = laborsim_core::model::Disutility::heterogeneous();
    group.bench_function("heterogeneous", |b| {
        b.iter(|| simulate(black_box(&heterogeneous)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_solve,
    bench_population_sizes,
    bench_pipeline_variants,
);
criterion_main!(benches);
