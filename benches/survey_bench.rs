use criterion::{black_box, criterion_group, criterion_main, Criterion};

use landsurvey::angle::{decimal_to_dms, dms_to_decimal, Angle};
use landsurvey::proj::gauss_kruger::GaussKruger;
use landsurvey::proj::Projection;
use landsurvey::resection::{resect_two_point, Station};

/// Geodetic points spread over MGA zone 55, latitude/longitude in decimal degrees.
fn make_points(n: usize) -> Vec<(Angle, Angle)> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            (Angle::Decimal(-44.0 + t * 34.0), Angle::Decimal(144.0 + t * 6.0))
        })
        .collect()
}

fn bench_project_single(c: &mut Criterion) {
    let gk = GaussKruger::mga_zone(55).unwrap();
    c.bench_function("gauss_kruger_flinders_peak", |b| {
        b.iter(|| {
            black_box(
                gk.project(
                    black_box(Angle::Dms(-37.570372030)),
                    black_box(Angle::Dms(144.252952442)),
                )
                .unwrap(),
            )
        });
    });
}

fn bench_projection_throughput(c: &mut Criterion) {
    // Points/sec through the trait's sequential batch path
    let n = 1_000_000_usize;
    let gk = GaussKruger::mga_zone(55).unwrap();
    let reset = |coords: &mut [(f64, f64)]| {
        for (i, c) in coords.iter_mut().enumerate() {
            let t = i as f64 / n as f64;
            *c = ((144.0 + t * 6.0).to_radians(), (-44.0 + t * 34.0).to_radians());
        }
    };
    let mut coords = vec![(0.0, 0.0); n];

    c.bench_function("gauss_kruger_forward_batch_1M", |b| {
        b.iter(|| {
            reset(&mut coords);
            gk.forward_batch(&mut coords).unwrap();
        });
    });

    reset(&mut coords);
    gk.forward_batch(&mut coords).unwrap();
    let projected = coords.clone();
    c.bench_function("gauss_kruger_inverse_batch_1M", |b| {
        b.iter(|| {
            coords.copy_from_slice(&projected);
            gk.inverse_batch(&mut coords).unwrap();
        });
    });
}

fn bench_project_many_thread_scaling(c: &mut Criterion) {
    // Parallel batch projection, 1M points, different thread counts
    let gk = GaussKruger::mga_zone(55).unwrap();
    let points = make_points(1_000_000);

    for &threads in &[1, 2, 4, 8] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();

        c.bench_function(&format!("project_many_threads_{threads}_1M"), |b| {
            b.iter(|| black_box(pool.install(|| gk.project_many(&points).unwrap())));
        });
    }
}

fn bench_resection(c: &mut Criterion) {
    let a = Station::new(11813.150, 54078.732, 18.147, Angle::Dms(188.2100));
    let b = Station::new(11834.832, 54079.154, 4.334, Angle::Dms(329.1659));
    c.bench_function("resect_two_point_reference", |bench| {
        bench.iter(|| black_box(resect_two_point(black_box(&a), black_box(&b)).unwrap()));
    });
}

fn bench_dms_codec(c: &mut Criterion) {
    let values: Vec<f64> = (0..100_000).map(|i| -359.0 + i as f64 * 0.00718).collect();
    c.bench_function("dms_round_trip_100k", |b| {
        b.iter(|| {
            for &v in &values {
                black_box(dms_to_decimal(decimal_to_dms(v)).unwrap());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_project_single,
    bench_projection_throughput,
    bench_project_many_thread_scaling,
    bench_resection,
    bench_dms_codec
);
criterion_main!(benches);
