//! Level Simulation Tick
//!
//! The core game loop. One call samples input, advances every entity,
//! resolves movement and combat, then hands events back to the caller.
//! The clock is sampled once by the caller and threaded through, so
//! every timer comparison within a tick sees the same `now`.

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::core::fixed::{Fixed, to_fixed};
use crate::core::vec2::FixedVec2;
use crate::game::combat::{Attack, TargetKind, check_all_attack_collisions};
use crate::game::command::{Command, Outbox};
use crate::game::entity::{DamageKind, Damageable, Hit, Movable};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::{InputFrame, InputRecording};
use crate::game::magic::{CastOutcome, cast};
use crate::game::player::PlayerTimings;
use crate::game::state::{EntityId, Level, LevelPhase};
use crate::game::weapon::weapon_hitbox;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Pixels shaved off each sprite rect to get its collision hitbox,
/// as `(width, height)`. The hitbox keeps the rect's center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitboxInsets {
    /// Player
    pub player: (i32, i32),
    /// Every monster
    pub enemy: (i32, i32),
    /// Invisible walls
    pub boundary: (i32, i32),
    /// Bushes
    pub grass: (i32, i32),
    /// Two-tile objects
    pub object: (i32, i32),
}

impl Default for HitboxInsets {
    fn default() -> Self {
        Self {
            player: (6, 26),
            enemy: (0, 10),
            boundary: (0, 0),
            grass: (0, 10),
            object: (0, 40),
        }
    }
}

/// Configuration for level simulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Edge of one map tile (pixels)
    pub tile_size: i32,
    /// Sprite-to-hitbox shrink per entity kind
    pub hitbox_insets: HitboxInsets,
    /// Player cooldowns and invincibility
    pub player: PlayerTimings,
    /// Animation frames advanced per tick (Fixed)
    pub animation_speed: Fixed,
    /// Weapon hitbox offset when facing left or right
    pub weapon_offset_horizontal: (i32, i32),
    /// Weapon hitbox offset when facing up or down
    pub weapon_offset_vertical: (i32, i32),
    /// How long each flame hitbox stays in play
    pub flame_lifetime_ms: u64,
    /// Number of flame hitboxes in a cast
    pub flame_reach: u32,
    /// Energy recovered per tick, per point of the magic stat (Fixed)
    pub energy_recovery: Fixed,
    /// Clock step between ticks in replays
    pub frame_duration_ms: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            tile_size: 64,
            hitbox_insets: HitboxInsets::default(),
            player: PlayerTimings::default(),
            animation_speed: to_fixed(0.15),
            weapon_offset_horizontal: (0, 16),
            weapon_offset_vertical: (-10, 0),
            flame_lifetime_ms: 400,
            flame_reach: 5,
            energy_recovery: to_fixed(0.01),
            frame_duration_ms: 16,
        }
    }
}

impl LevelConfig {
    /// Clock value for a tick index on the fixed frame grid.
    pub fn frame_time(&self, tick: u32) -> u64 {
        tick as u64 * self.frame_duration_ms
    }
}

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the level is over (player defeated)
    pub level_ended: bool,
}

type Intent = (EntityId, Command);

// =============================================================================
// TICK
// =============================================================================

/// Run one simulation tick.
///
/// # Arguments
///
/// * `level` - The level state (will be mutated)
/// * `input` - Keys held this tick
/// * `now_ms` - Clock value, non-decreasing across calls
///
/// # Ordering
///
/// The player moves before enemies perceive, so enemies chase its
/// post-move position. Combat runs after all movement. Intents are
/// drained after every entity has updated, and removals happen after
/// the combat sweep has finished iterating.
pub fn tick(level: &mut Level, input: &InputFrame, now_ms: u64) -> TickResult {
    let mut result = TickResult::default();

    match level.phase {
        LevelPhase::Waiting => {
            // Nothing to simulate without a player
            return result;
        }
        LevelPhase::Defeated => {
            result.level_ended = true;
            return result;
        }
        LevelPhase::Playing => {}
    }

    // 0. Advance tick counter and clock
    level.tick += 1;
    level.now_ms = now_ms;

    // 1. Drop flame hitboxes that ran out
    expire_attacks(level);

    // 2. Player: input, timers, movement
    let mut intents = Vec::new();
    update_player(level, input, &mut intents);

    // 3. Enemies: perception against the moved player, movement
    update_enemies(level, &mut intents);

    // 4. Apply queued intents in order
    for (source, command) in intents {
        apply_command(level, source, command);
    }

    // 5. Sweep attacks against attackables
    process_attack_collisions(level);

    // 6. Remove enemies whose health ran out
    process_dead_enemies(level);

    // 7. Player defeat
    if process_defeat(level) {
        result.level_ended = true;
    }

    // 8. Collect events
    result.events = level.take_events();

    result
}

/// Re-run a recorded session from `initial`, one tick per recorded frame.
///
/// Returns the final level and every event in order.
pub fn replay(mut level: Level, recording: &InputRecording) -> (Level, Vec<GameEvent>) {
    let mut events = Vec::new();
    for (t, frame) in recording.replay_iter() {
        let now_ms = level.config.frame_time(t);
        let result = tick(&mut level, &frame, now_ms);
        events.extend(result.events);
    }
    (level, events)
}

// =============================================================================
// ENTITY UPDATES
// =============================================================================

fn expire_attacks(level: &mut Level) {
    let now = level.now_ms;
    let expired: Vec<EntityId> = level
        .attacks
        .iter()
        .filter(|(_, attack)| attack.is_expired(now))
        .map(|(id, _)| *id)
        .collect();

    for id in expired {
        level.despawn(id);
    }
}

fn update_player(level: &mut Level, input: &InputFrame, intents: &mut Vec<Intent>) {
    let obstacles = level.obstacle_hitboxes();
    let (tick, now) = (level.tick, level.now_ms);
    let Some((id, player)) = level.player.as_mut() else {
        return;
    };
    let id = *id;

    let weapon_before = player.weapon_index();
    let magic_before = player.magic_index();

    let mut outbox = Outbox::new();
    player.update(input, now, &level.tables, &obstacles, &mut outbox);

    let mut events = Vec::new();
    if player.weapon_index() != weapon_before {
        let index = player.weapon_index();
        let name = level.tables.weapon(index).name.clone();
        events.push(GameEvent::new(tick, now, Some(id), GameEventData::WeaponSwitched { index, name }));
    }
    if player.magic_index() != magic_before {
        let index = player.magic_index();
        let name = level.tables.spell(index).name.clone();
        events.push(GameEvent::new(tick, now, Some(id), GameEventData::MagicSwitched { index, name }));
    }

    intents.extend(outbox.into_iter().map(|command| (id, command)));
    for event in events {
        level.push_event(event);
    }
}

fn update_enemies(level: &mut Level, intents: &mut Vec<Intent>) {
    let Some(player_center) = level.player().map(|p| p.center()) else {
        return;
    };
    let obstacles = level.obstacle_hitboxes();
    let now = level.now_ms;

    for (id, enemy) in level.enemies.iter_mut() {
        let mut outbox = Outbox::new();
        enemy.update(player_center, now, &obstacles, &mut outbox);
        intents.extend(outbox.into_iter().map(|command| (*id, command)));
    }
}

// =============================================================================
// INTENTS
// =============================================================================

fn apply_command(level: &mut Level, source: EntityId, command: Command) {
    match command {
        Command::CreateAttack => create_attack(level),
        Command::DestroyAttack => destroy_attack(level),
        Command::CreateMagic { style, strength, cost } => create_magic(level, &style, strength, cost),
        Command::DamagePlayer { amount, attack_type, origin } => {
            damage_player(level, source, amount, attack_type, origin)
        }
    }
}

fn create_attack(level: &mut Level) {
    let Some((player_id, player)) = level.player.as_ref() else {
        return;
    };
    let player_id = *player_id;
    let weapon = level.tables.weapon(player.weapon_index());
    let facing = player.status.facing;
    let rect = weapon_hitbox(&player.body().rect, facing, weapon, &level.config);
    let sprite = format!("{}_{}", weapon.name, facing.as_str());
    let name = weapon.name.clone();

    if let Some(stale) = level.current_attack.take() {
        level.despawn(stale);
    }

    let id = level.add_attack(Attack::weapon(rect, sprite));
    level.current_attack = Some(id);
    debug!(%id, weapon = %name, "weapon attack created");

    level.push_event(GameEvent::new(
        level.tick,
        level.now_ms,
        Some(player_id),
        GameEventData::AttackStarted { weapon: name },
    ));
}

fn destroy_attack(level: &mut Level) {
    let Some(id) = level.current_attack.take() else {
        warn!(tick = level.tick, "destroy requested with no active attack");
        return;
    };
    level.despawn(id);
    level.push_event(GameEvent::new(level.tick, level.now_ms, level.player_id(), GameEventData::AttackEnded));
}

fn create_magic(level: &mut Level, style: &str, strength: i32, cost: i32) {
    let spell = match level.tables.spell_named(style) {
        Ok(spell) => spell.clone(),
        Err(err) => {
            warn!(%err, "cast ignored");
            return;
        }
    };
    let (tick, now) = (level.tick, level.now_ms);
    let Some((player_id, player)) = level.player.as_mut() else {
        return;
    };
    let player_id = *player_id;

    let data = match cast(player, &spell, strength, cost, &level.config) {
        CastOutcome::Healed { amount } => {
            debug!(amount, "heal cast");
            GameEventData::MagicCast { style: spell.name, strength, cost }
        }
        CastOutcome::Flame { hitboxes } => {
            let expires_at = now + level.config.flame_lifetime_ms;
            debug!(count = hitboxes.len(), "flame cast");
            for rect in hitboxes {
                level.add_attack(Attack::magic(rect, spell.name.as_str(), expires_at));
            }
            GameEventData::MagicCast { style: spell.name, strength, cost }
        }
        CastOutcome::Fizzled => {
            debug!(style = %spell.name, cost, "not enough energy");
            GameEventData::MagicFizzled { style: spell.name, cost }
        }
    };

    level.push_event(GameEvent::new(tick, now, Some(player_id), data));
}

fn damage_player(level: &mut Level, source: EntityId, amount: i32, attack_type: String, origin: FixedVec2) {
    let (tick, now) = (level.tick, level.now_ms);
    let Some((player_id, player)) = level.player.as_mut() else {
        return;
    };
    let player_id = *player_id;

    let hit = Hit { origin, kind: DamageKind::Weapon, amount };
    if !player.receive_damage(&hit, now) {
        return;
    }
    let health = player.health();
    debug!(%source, amount, health, "player hurt");

    level.push_event(GameEvent::new(
        tick,
        now,
        Some(player_id),
        GameEventData::PlayerHurt { amount, attack_type, health },
    ));
}

// =============================================================================
// COMBAT AND REMOVALS
// =============================================================================

fn process_attack_collisions(level: &mut Level) {
    let targets = level.attack_targets();
    let collisions = check_all_attack_collisions(&level.attacks, &targets);
    if collisions.is_empty() {
        return;
    }

    let Some(player) = level.player() else {
        return;
    };
    let origin = player.center();
    let weapon_damage = player.full_weapon_damage(&level.tables);
    let (tick, now) = (level.tick, level.now_ms);

    for collision in collisions {
        match collision.target_kind {
            TargetKind::Prop => {
                let Some(kind) = level.props.get(&collision.target).map(|p| p.kind) else {
                    continue;
                };
                if level.despawn(collision.target) {
                    level.push_event(GameEvent::new(
                        tick,
                        now,
                        Some(collision.target),
                        GameEventData::PropDestroyed { kind },
                    ));
                }
            }
            TargetKind::Enemy => {
                let Some(enemy) = level.enemies.get_mut(&collision.target) else {
                    continue;
                };
                let amount = match collision.damage_kind {
                    DamageKind::Weapon => weapon_damage,
                    DamageKind::Magic => 0,
                };
                let hit = Hit { origin, kind: collision.damage_kind, amount };
                if !enemy.receive_damage(&hit, now) {
                    continue;
                }
                let data = GameEventData::EnemyHit {
                    monster: enemy.monster().to_string(),
                    kind: collision.damage_kind,
                    amount,
                    health: enemy.health(),
                };
                level.push_event(GameEvent::new(tick, now, Some(collision.target), data));
            }
        }
    }
}

fn process_dead_enemies(level: &mut Level) {
    let dead: Vec<(EntityId, String, u32)> = level
        .enemies
        .iter()
        .filter(|(_, enemy)| enemy.is_dead())
        .map(|(id, enemy)| (*id, enemy.monster().to_string(), enemy.stats().exp))
        .collect();

    for (id, monster, exp) in dead {
        level.despawn(id);
        if let Some(player) = level.player_mut() {
            player.add_exp(exp);
        }
        debug!(%id, %monster, exp, "enemy killed");
        level.push_event(GameEvent::enemy_killed(level.tick, level.now_ms, id, &monster, exp));
    }
}

fn process_defeat(level: &mut Level) -> bool {
    let Some(id) = level
        .player
        .as_ref()
        .filter(|(_, player)| player.is_dead())
        .map(|(id, _)| *id)
    else {
        return false;
    };

    level.phase = LevelPhase::Defeated;
    info!(tick = level.tick, "player defeated");
    level.push_event(GameEvent::player_defeated(level.tick, level.now_ms, id));
    true
}

// =============================================================================
// TESTS
// =============================================================================
