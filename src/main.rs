//! Breath of Python Demo
//!
//! Loads a small built-in map, drives the player with a scripted input
//! pattern, logs what happens and checks that a replay of the recorded
//! input lands on the same state hash.

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use breath::{
    TICK_RATE, VERSION,
    game::{
        events::GameEventData,
        input::{InputFrame, InputRecording},
        map::MapLayout,
        state::Level,
        tables::GameTables,
        tick::{tick, replay, LevelConfig},
    },
};

const DEMO_TICKS: u32 = 1800;

const BOUNDARY: &str = "\
395,395,395,395,395,395,395,395,395,395
395,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,395
395,-1,-1,-1,-1,-1,-1,-1,-1,395
395,395,395,395,395,395,395,395,395,395
";

const GRASS: &str = "\
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,8,8,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,9,-1
-1,-1,-1,-1,-1,-1,-1,-1,9,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
";

const OBJECT: &str = "\
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,20,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
";

const ENTITIES: &str = "\
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,394,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,393,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,390,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
-1,-1,-1,-1,-1,-1,-1,-1,-1,-1
";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Breath core v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    demo_level()
}

/// Scripted input: walk a square, swinging and casting on the way.
fn scripted_input(t: u32) -> InputFrame {
    let mut frame = match (t / 90) % 4 {
        0 => InputFrame::from_flags(InputFrame::FLAG_RIGHT),
        1 => InputFrame::from_flags(InputFrame::FLAG_DOWN),
        2 => InputFrame::from_flags(InputFrame::FLAG_LEFT),
        _ => InputFrame::from_flags(InputFrame::FLAG_UP),
    };
    if t % 45 == 0 {
        frame = frame.with(InputFrame::FLAG_ATTACK);
    }
    if t % 240 == 120 {
        frame = frame.with(InputFrame::FLAG_MAGIC);
    }
    if t % 600 == 599 {
        frame = frame.with(InputFrame::FLAG_SWITCH_WEAPON);
    }
    if t % 900 == 450 {
        frame = frame.with(InputFrame::FLAG_SWITCH_MAGIC);
    }
    frame
}

fn demo_level() -> Result<()> {
    info!("=== Starting Demo Level ===");

    let layout = MapLayout::from_csv(BOUNDARY, GRASS, OBJECT, ENTITIES).context("parsing demo map")?;
    let initial = Level::from_layout(&layout, GameTables::default(), LevelConfig::default())
        .context("building demo level")?;

    let mut level = initial.clone();
    let mut recording = InputRecording::new();
    let mut total_events = 0;

    info!("Running {} ticks...", DEMO_TICKS);

    for _ in 0..DEMO_TICKS {
        let t = level.tick;
        let frame = scripted_input(t);
        recording.record(t, frame);

        let now = level.config().frame_time(t);
        let result = tick(&mut level, &frame, now);
        total_events += result.events.len();

        // Report every 10 seconds
        if t > 0 && t % (TICK_RATE * 10) == 0 {
            if let Some(hud) = level.hud() {
                info!(
                    "Tick {}: health {}/{}, energy {}/{}, exp {}, {} enemies left",
                    t, hud.health, hud.max_health, hud.energy, hud.max_energy, hud.exp,
                    level.enemies().len()
                );
            }
        }

        // Log important events
        for event in &result.events {
            match &event.data {
                GameEventData::EnemyKilled { monster, exp } => {
                    info!("Tick {}: {} killed (+{} exp)", event.tick, monster, exp);
                }
                GameEventData::PropDestroyed { kind } => {
                    info!("Tick {}: {} destroyed", event.tick, kind.as_str());
                }
                GameEventData::WeaponSwitched { name, .. } => {
                    info!("Tick {}: switched to {}", event.tick, name);
                }
                GameEventData::PlayerDefeated => {
                    info!("Tick {}: player defeated", event.tick);
                }
                _ => {}
            }
        }

        if result.level_ended {
            info!("Level ended at tick {}", t);
            break;
        }
    }
    recording.finalize(level.tick.saturating_sub(1));

    // Print final results
    info!("=== Level Results ===");
    let hash = level.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Total events: {}", total_events);
    info!(
        "Recorded {} input changes over {} ticks (~{} bytes)",
        recording.delta_count(),
        recording.tick_count(),
        recording.estimated_size()
    );

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, replay_events) = replay(initial, &recording);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash || replay_events.len() != total_events {
        bail!("replay diverged: {} vs {}", hex::encode(hash), hex::encode(replay_hash));
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
