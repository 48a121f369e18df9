use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starmap::Vector;
use stellar_core::entity::{Fleet, Planet, Waypoint};
use stellar_core::minefield::{check_collision, MineField, MineFieldType};
use stellar_core::player::{Player, PlayerTable};
use stellar_core::rules::Rules;
use stellar_core::universe::{Universe, UniverseData};

fn players() -> PlayerTable {
    (1..=8).map(|num| Player::new(num, format!("Player {num}"))).collect()
}

/// A 40 x 40 grid of planets with a fleet over each and a mine field every fourth spot.
fn galaxy() -> UniverseData {
    let mut data = UniverseData::default();
    for i in 0..1600u32 {
        let position = Vector::new(f64::from(i % 40) * 25.0, f64::from(i / 40) * 25.0);
        let owner = i % 8 + 1;
        data.planets.push(Planet::new(owner, i + 1, format!("Planet {i}"), position));
        data.fleets.push(Fleet::new(owner, i / 8 + 1, format!("Fleet {i}"), position));
        if i % 4 == 0 {
            data.mine_fields.push(MineField::new(
                owner,
                i / 4 + 1,
                format!("Mines {i}"),
                MineFieldType::Standard,
                400,
                position + Vector::new(12.0, 12.0),
            ));
        }
    }
    data
}

fn bench_universe_build(c: &mut Criterion) {
    let players = players();
    let data = galaxy();

    c.bench_function("universe_build", |b| {
        b.iter(|| Universe::build(black_box(data.clone()), players.iter()))
    });
}

fn bench_check_collision(c: &mut Criterion) {
    let players = players();
    let universe = Universe::build(galaxy(), players.iter());
    let rules = Rules::default();
    let fleet = Fleet::new(1, 9999, "Raider", Vector::new(-50.0, 480.0));
    let destination = Waypoint::new(Vector::new(1050.0, 480.0), 9);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("check_collision", |b| {
        b.iter(|| {
            check_collision(
                &rules,
                &players,
                universe.mine_fields(),
                black_box(&fleet),
                &destination,
                black_box(1100.0),
                &mut rng,
            )
        })
    });
}

fn bench_decay(c: &mut Criterion) {
    let players = players();
    let universe = Universe::build(galaxy(), players.iter());
    let rules = Rules::default();

    c.bench_function("update_mine_field_specs", |b| {
        b.iter(|| {
            let mut universe = universe.clone();
            universe.update_mine_field_specs(&rules, &players);
            black_box(universe)
        })
    });
}

criterion_group!(benches, bench_universe_build, bench_check_collision, bench_decay);
criterion_main!(benches);
