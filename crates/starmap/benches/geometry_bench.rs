use criterion::{black_box, criterion_group, criterion_main, Criterion};
use starmap::{segment_intersects_circle, PositionIndex, Vector};

fn bench_segment_intersects_circle(c: &mut Criterion) {
    let from = Vector::new(-120.0, 3.0);
    let to = Vector::new(140.0, -7.0);
    let center = Vector::new(10.0, 0.0);

    c.bench_function("segment_intersects_circle", |b| {
        b.iter(|| {
            segment_intersects_circle(black_box(from), black_box(to), center, black_box(31.6))
        })
    });
}

fn bench_position_index_relocate(c: &mut Criterion) {
    // A dense map: 400 positions with a few handles each
    let mut index = PositionIndex::new();
    for i in 0..400u32 {
        let position = Vector::new(f64::from(i % 20) * 25.0, f64::from(i / 20) * 25.0);
        for slot in 0..3 {
            index.insert(position, i * 3 + slot);
        }
    }

    let home = Vector::new(0.0, 0.0);
    let away = Vector::new(12.0, 12.0);

    c.bench_function("position_index_relocate", |b| {
        b.iter(|| {
            let _ = index.relocate(black_box(1), home, away);
            let _ = index.relocate(black_box(1), away, home);
        })
    });
}

criterion_group!(benches, bench_segment_intersects_circle, bench_position_index_relocate);
criterion_main!(benches);
