use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use breath::game::input::InputFrame;
use breath::game::state::{Level, SpawnKind, TileKind};
use breath::game::tables::GameTables;
use breath::game::tick::{tick, LevelConfig};
use breath::FixedVec2;

fn populated_level() -> Level {
    let mut level = Level::new(GameTables::default(), LevelConfig::default()).expect("default tables");
    level.spawn(SpawnKind::Player, FixedVec2::from_ints(640, 640)).expect("player");

    let monsters = ["squid", "raccoon", "spirit", "bamboo"];
    for i in 0..32 {
        let x = 128 + (i % 8) * 160;
        let y = 128 + (i / 8) * 320;
        let monster = monsters[i as usize % monsters.len()];
        level
            .spawn(SpawnKind::Enemy(monster.to_string()), FixedVec2::from_ints(x, y))
            .expect("enemy");
    }
    for i in 0..40 {
        level
            .spawn(SpawnKind::Tile(TileKind::Boundary), FixedVec2::from_ints(i * 64, 0))
            .expect("boundary");
        level
            .spawn(SpawnKind::Tile(TileKind::Grass), FixedVec2::from_ints(i * 64, 1408))
            .expect("grass");
    }
    level
}

fn bench_tick(c: &mut Criterion) {
    let frame = InputFrame::from_flags(InputFrame::FLAG_RIGHT | InputFrame::FLAG_ATTACK);

    c.bench_function("tick_populated_level", |b| {
        b.iter_batched(
            populated_level,
            |mut level| {
                for t in 0..60 {
                    let now = level.config().frame_time(t);
                    black_box(tick(&mut level, &frame, now));
                }
                level
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("state_hash", |b| {
        let level = populated_level();
        b.iter(|| black_box(level.compute_hash()))
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
