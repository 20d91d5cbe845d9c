use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rlc_charge_loop::circuits::CircuitModel;
use rlc_charge_loop::config::LoopConfig;
use rlc_charge_loop::simulation::integrate_current;
use rlc_charge_loop::transport::ChargeTransport;

fn bench_reference_run(c: &mut Criterion) {
    let config = LoopConfig::default();
    let model = CircuitModel::from_config(&config).expect("reference config is valid");
    let transport = ChargeTransport::from_config(&config).expect("reference config is valid");

    let mut group = c.benchmark_group("reference_run");
    group.bench_function(BenchmarkId::new("rk4_current", config.step_count()), |b| {
        b.iter(|| integrate_current(&model, config.time_step, config.duration))
    });

    let series = integrate_current(&model, config.time_step, config.duration).expect("integrates");
    group.bench_function(BenchmarkId::new("dense_then_sample", config.marker_count()), |b| {
        b.iter_batched(
            || series.clone(),
            |series| transport.advance(&series).sample(config.data_increment),
            BatchSize::LargeInput,
        )
    });
    group.bench_function(BenchmarkId::new("streamed_sample", config.marker_count()), |b| {
        b.iter(|| transport.sample(&series, config.data_increment))
    });
    group.finish();
}

criterion_group!(benches, bench_reference_run);
criterion_main!(benches);
