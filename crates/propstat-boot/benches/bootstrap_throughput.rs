use criterion::{black_box, criterion_group, criterion_main, Criterion};
use propstat_boot::{bootstrap, BootstrapOptions, GroupPartition, NamedSeries};
use propstat_core::PropError;

fn mean(data: &NamedSeries) -> Result<f64, PropError> {
    let values = data.get("x")?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

fn bootstrap_bench(c: &mut Criterion) {
    let x: Vec<f64> = (0..5_000).map(|i| (f64::from(i) * 0.01).sin()).collect();
    let data = NamedSeries::from_pairs([("x", x)]).unwrap();
    let partition = GroupPartition::new(vec![2_000, 2_000, 1_000]).unwrap();
    let options = BootstrapOptions::default().with_seed(7);

    c.bench_function("bootstrap_single_group", |b| {
        b.iter(|| black_box(bootstrap(&data, mean, &options, None).unwrap()));
    });

    c.bench_function("bootstrap_three_groups_parallel", |b| {
        let options = options.clone().with_concurrency(4);
        b.iter(|| black_box(bootstrap(&data, mean, &options, Some(&partition)).unwrap()));
    });
}

criterion_group!(benches, bootstrap_bench);
criterion_main!(benches);
