//! Player Controller
//!
//! Turns held keys into movement, attacks, spell casts and equipment
//! switches. Every timed gate is a boolean mirror of "a window opened at
//! this timestamp has not yet elapsed", refreshed from the tick's `now`.
//!
//! Per-tick order: input, cooldowns, status, animation, movement, energy.

use serde::{Serialize, Deserialize};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::fixed::{Fixed, from_int, fixed_mul, fixed_min};
use crate::core::hash::StateHasher;
use crate::core::rect::Rect;
use crate::core::vec2::FixedVec2;
use crate::game::command::{Command, Outbox};
use crate::game::entity::{Body, Damageable, Hit, Movable, elapsed, wave_value};
use crate::game::input::InputFrame;
use crate::game::status::{Activity, Facing, Status};
use crate::game::tables::{AnimationFrames, GameTables, PlayerStats};
use crate::game::tick::LevelConfig;

/// Player timing windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTimings {
    /// Added to the weapon's own cooldown
    pub base_attack_cooldown_ms: u64,
    /// Minimum time between equipment switches
    pub switch_cooldown_ms: u64,
    /// Invulnerability after being hurt
    pub invincibility_ms: u64,
}

impl Default for PlayerTimings {
    fn default() -> Self {
        Self {
            base_attack_cooldown_ms: 400,
            switch_cooldown_ms: 200,
            invincibility_ms: 500,
        }
    }
}

/// The player character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    body: Body,
    /// Facing and activity, drives the animation key
    pub status: Status,
    stats: PlayerStats,
    frames: AnimationFrames,
    timings: PlayerTimings,
    energy_recovery: Fixed,

    health: i32,
    /// Fractional so slow recovery accumulates
    energy: Fixed,
    exp: u32,

    weapon_index: usize,
    magic_index: usize,

    attacking: bool,
    attack_time: u64,
    /// The open attack window owns a weapon hitbox
    weapon_out: bool,

    can_switch_weapon: bool,
    weapon_switch_time: u64,
    can_switch_magic: bool,
    magic_switch_time: u64,

    vulnerable: bool,
    hurt_time: u64,
}

impl Player {
    /// Spawn with full health and energy, first weapon and spell equipped.
    pub fn new(rect: Rect, tables: &GameTables, config: &LevelConfig) -> Self {
        let inset = config.hitbox_insets.player;
        let stats = tables.player.clone();
        Self {
            body: Body::new(rect, FixedVec2::from_ints(inset.0, inset.1), config.animation_speed),
            status: Status::default(),
            health: stats.health,
            energy: from_int(stats.energy),
            stats,
            frames: tables.player_frames,
            timings: config.player,
            energy_recovery: config.energy_recovery,
            exp: 0,
            weapon_index: 0,
            magic_index: 0,
            attacking: false,
            attack_time: 0,
            weapon_out: false,
            can_switch_weapon: true,
            weapon_switch_time: 0,
            can_switch_magic: true,
            magic_switch_time: 0,
            vulnerable: true,
            hurt_time: 0,
        }
    }

    /// Advance one tick.
    pub fn update(
        &mut self,
        input: &InputFrame,
        now_ms: u64,
        tables: &GameTables,
        obstacles: &[Rect],
        outbox: &mut Outbox,
    ) {
        self.input(input, now_ms, tables, outbox);
        self.cooldowns(now_ms, tables, outbox);
        self.refresh_status();
        self.animate();
        self.body.move_by(from_int(self.stats.speed), obstacles);
        self.recover_energy();

        #[cfg(feature = "debug-tracing")]
        trace!(status = %self.status.animation_key(), health = self.health, "player updated");
    }

    fn input(&mut self, input: &InputFrame, now_ms: u64, tables: &GameTables, outbox: &mut Outbox) {
        if self.attacking {
            return;
        }

        // Vertical first: on a diagonal the horizontal facing wins.
        let vertical = input.vertical();
        self.body.direction.y = from_int(vertical);
        if vertical != 0 {
            let facing = if vertical < 0 { Facing::Up } else { Facing::Down };
            self.status = Status::new(facing, Activity::Moving);
        }

        let horizontal = input.horizontal();
        self.body.direction.x = from_int(horizontal);
        if horizontal != 0 {
            let facing = if horizontal < 0 { Facing::Left } else { Facing::Right };
            self.status = Status::new(facing, Activity::Moving);
        }

        if input.attack_pressed() {
            self.start_attack_window(now_ms);
            self.weapon_out = true;
            outbox.push(Command::CreateAttack);
        }

        if input.magic_pressed() {
            self.start_attack_window(now_ms);
            let spell = tables.spell(self.magic_index);
            outbox.push(Command::CreateMagic {
                style: spell.name.clone(),
                strength: spell.strength + self.stats.magic,
                cost: spell.cost,
            });
        }

        if input.switch_weapon_pressed() && self.can_switch_weapon {
            self.can_switch_weapon = false;
            self.weapon_switch_time = now_ms;
            self.weapon_index = (self.weapon_index + 1) % tables.weapons.len();
        }

        if input.switch_magic_pressed() && self.can_switch_magic {
            self.can_switch_magic = false;
            self.magic_switch_time = now_ms;
            self.magic_index = (self.magic_index + 1) % tables.magic.len();
        }
    }

    fn start_attack_window(&mut self, now_ms: u64) {
        self.attacking = true;
        self.attack_time = now_ms;
        self.body.direction = FixedVec2::ZERO;
        self.status.activity = Activity::Attacking;
    }

    fn cooldowns(&mut self, now_ms: u64, tables: &GameTables, outbox: &mut Outbox) {
        if self.attacking {
            let window = self.timings.base_attack_cooldown_ms + tables.weapon(self.weapon_index).cooldown_ms;
            if elapsed(now_ms, self.attack_time, window) {
                self.attacking = false;
                if self.weapon_out {
                    self.weapon_out = false;
                    outbox.push(Command::DestroyAttack);
                }
            }
        }

        if !self.can_switch_weapon
            && elapsed(now_ms, self.weapon_switch_time, self.timings.switch_cooldown_ms)
        {
            self.can_switch_weapon = true;
        }

        if !self.can_switch_magic
            && elapsed(now_ms, self.magic_switch_time, self.timings.switch_cooldown_ms)
        {
            self.can_switch_magic = true;
        }

        self.refresh_vulnerability(now_ms);
    }

    fn refresh_vulnerability(&mut self, now_ms: u64) {
        if !self.vulnerable && elapsed(now_ms, self.hurt_time, self.timings.invincibility_ms) {
            self.vulnerable = true;
        }
    }

    fn refresh_status(&mut self) {
        if self.body.direction.is_zero() && self.status.activity == Activity::Moving {
            self.status.activity = Activity::Idle;
        }

        if self.attacking {
            self.body.direction = FixedVec2::ZERO;
            self.status.activity = Activity::Attacking;
        } else if self.status.activity == Activity::Attacking {
            self.status.activity = Activity::Moving;
        }
    }

    fn animate(&mut self) {
        let len = self.animation_len();
        self.body.animator.advance(len);
    }

    fn recover_energy(&mut self) {
        let max = from_int(self.stats.energy);
        if self.energy < max {
            let step = fixed_mul(self.energy_recovery, from_int(self.stats.magic));
            self.energy = fixed_min(self.energy + step, max);
        }
    }

    /// Frames in the sequence the current status plays.
    pub fn animation_len(&self) -> u32 {
        match self.status.activity {
            Activity::Moving => self.frames.moving,
            Activity::Idle => self.frames.idle,
            Activity::Attacking => self.frames.attack,
        }
    }

    /// Sprite alpha: flickers while invulnerable.
    pub fn alpha(&self, now_ms: u64) -> u8 {
        if self.vulnerable { 255 } else { wave_value(now_ms) }
    }

    /// Damage dealt by one weapon hit.
    pub fn full_weapon_damage(&self, tables: &GameTables) -> i32 {
        self.stats.attack + tables.weapon(self.weapon_index).damage
    }

    /// Spend energy if there is enough of it.
    pub fn try_spend_energy(&mut self, cost: i32) -> bool {
        let cost = from_int(cost);
        if self.energy >= cost {
            self.energy -= cost;
            true
        } else {
            false
        }
    }

    /// Restore health, capped at the maximum. Returns the amount restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.stats.health);
        self.health - before
    }

    /// Add experience, saturating.
    pub fn add_exp(&mut self, amount: u32) {
        self.exp = self.exp.saturating_add(amount);
    }

    /// Base stats from the player table.
    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Current energy (Fixed).
    pub fn energy(&self) -> Fixed {
        self.energy
    }

    /// Experience collected so far.
    pub fn exp(&self) -> u32 {
        self.exp
    }

    /// Index into the weapon catalog.
    pub fn weapon_index(&self) -> usize {
        self.weapon_index
    }

    /// Index into the magic catalog.
    pub fn magic_index(&self) -> usize {
        self.magic_index
    }

    /// True while an attack or cast window is open.
    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    /// True right after a weapon switch, until the switch cooldown elapses.
    pub fn weapon_just_switched(&self) -> bool {
        !self.can_switch_weapon
    }

    /// True right after a magic switch, until the switch cooldown elapses.
    pub fn magic_just_switched(&self) -> bool {
        !self.can_switch_magic
    }

    pub(crate) fn hash_into(&self, hasher: &mut StateHasher) {
        self.body.hash_into(hasher);
        hasher.update_u8(self.status.facing as u8);
        hasher.update_u8(self.status.activity as u8);
        hasher.update_i32(self.health);
        hasher.update_fixed(self.energy);
        hasher.update_u32(self.exp);
        hasher.update_u32(self.weapon_index as u32);
        hasher.update_u32(self.magic_index as u32);
        hasher.update_bool(self.attacking);
        hasher.update_u64(self.attack_time);
        hasher.update_bool(self.weapon_out);
        hasher.update_bool(self.can_switch_weapon);
        hasher.update_u64(self.weapon_switch_time);
        hasher.update_bool(self.can_switch_magic);
        hasher.update_u64(self.magic_switch_time);
        hasher.update_bool(self.vulnerable);
        hasher.update_u64(self.hurt_time);
    }
}

impl Movable for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Damageable for Player {
    fn receive_damage(&mut self, hit: &Hit, now_ms: u64) -> bool {
        self.refresh_vulnerability(now_ms);
        if !self.vulnerable {
            return false;
        }
        self.health = (self.health - hit.amount).max(0);
        self.vulnerable = false;
        self.hurt_time = now_ms;
        true
    }

    fn is_vulnerable(&self) -> bool {
        self.vulnerable
    }

    fn health(&self) -> i32 {
        self.health
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::DamageKind;

    fn setup() -> (Player, GameTables) {
        let tables = GameTables::default();
        let player = Player::new(Rect::from_ints(100, 100, 64, 64), &tables, &LevelConfig::default());
        (player, tables)
    }

    fn step(player: &mut Player, tables: &GameTables, input: InputFrame, now: u64) -> Outbox {
        let mut outbox = Vec::new();
        player.update(&input, now, tables, &[], &mut outbox);
        outbox
    }

    fn keys(flags: u8) -> InputFrame {
        InputFrame::from_flags(flags)
    }

    #[test]
    fn test_one_move_at_speed_five() {
        let (mut player, tables) = setup();
        let before = player.body().hitbox.center();
        step(&mut player, &tables, keys(InputFrame::FLAG_RIGHT), 0);
        let after = player.body().hitbox.center();
        assert_eq!(after.x, before.x + from_int(5));
        assert_eq!(after.y, before.y);
        assert_eq!(player.status, Status::new(Facing::Right, Activity::Moving));
    }

    #[test]
    fn test_opposing_keys_cancel_and_idle() {
        let (mut player, tables) = setup();
        let before = player.body().hitbox;
        step(&mut player, &tables, keys(InputFrame::FLAG_LEFT | InputFrame::FLAG_RIGHT), 0);
        assert_eq!(player.body().hitbox, before);
        assert_eq!(player.status.activity, Activity::Idle);
    }

    #[test]
    fn test_horizontal_wins_facing_on_diagonal() {
        let (mut player, tables) = setup();
        step(&mut player, &tables, keys(InputFrame::FLAG_UP | InputFrame::FLAG_LEFT), 0);
        assert_eq!(player.status.facing, Facing::Left);
    }

    #[test]
    fn test_idle_keeps_facing() {
        let (mut player, tables) = setup();
        step(&mut player, &tables, keys(InputFrame::FLAG_UP), 0);
        step(&mut player, &tables, InputFrame::new(), 16);
        assert_eq!(player.status.animation_key(), "up_idle");
    }

    #[test]
    fn test_held_attack_creates_one_attack_per_window() {
        let (mut player, tables) = setup();
        let attack = keys(InputFrame::FLAG_ATTACK | InputFrame::FLAG_RIGHT);
        // sword window: 400 + 100
        let mut creates = 0;
        let mut destroys = 0;
        for now in (0..500).step_by(16) {
            for cmd in step(&mut player, &tables, attack, now) {
                match cmd {
                    Command::CreateAttack => creates += 1,
                    Command::DestroyAttack => destroys += 1,
                    _ => {}
                }
            }
        }
        assert_eq!(creates, 1);
        assert_eq!(destroys, 0);
        assert!(player.is_attacking());
        assert_eq!(player.status.animation_key(), "right_attack");

        let cmds = step(&mut player, &tables, InputFrame::new(), 500);
        assert_eq!(cmds, vec![Command::DestroyAttack]);
        assert!(!player.is_attacking());
    }

    #[test]
    fn test_attack_freezes_movement() {
        let (mut player, tables) = setup();
        let before = player.body().hitbox;
        step(&mut player, &tables, keys(InputFrame::FLAG_ATTACK | InputFrame::FLAG_DOWN), 0);
        step(&mut player, &tables, keys(InputFrame::FLAG_DOWN), 16);
        assert_eq!(player.body().hitbox, before);
        assert_eq!(player.body().direction, FixedVec2::ZERO);
    }

    #[test]
    fn test_attack_end_drops_suffix_then_idles() {
        let (mut player, tables) = setup();
        step(&mut player, &tables, keys(InputFrame::FLAG_ATTACK), 0);
        step(&mut player, &tables, InputFrame::new(), 500);
        assert_eq!(player.status.activity, Activity::Moving);
        step(&mut player, &tables, InputFrame::new(), 516);
        assert_eq!(player.status.activity, Activity::Idle);
    }

    #[test]
    fn test_magic_forwards_cost_and_strength() {
        let (mut player, tables) = setup();
        let cmds = step(&mut player, &tables, keys(InputFrame::FLAG_MAGIC), 0);
        assert_eq!(
            cmds,
            vec![Command::CreateMagic { style: "flame".into(), strength: 5 + 4, cost: 20 }]
        );
        assert!(player.is_attacking());

        // A spell window closes without a weapon hitbox to remove.
        let cmds = step(&mut player, &tables, InputFrame::new(), 500);
        assert!(cmds.is_empty());
        assert!(!player.is_attacking());
    }

    #[test]
    fn test_weapon_switch_cycles_back_to_start() {
        let (mut player, tables) = setup();
        let n = tables.weapons.len();
        let mut now = 0;
        for _ in 0..n {
            step(&mut player, &tables, keys(InputFrame::FLAG_SWITCH_WEAPON), now);
            assert!(player.weapon_just_switched());
            step(&mut player, &tables, InputFrame::new(), now + 200);
            assert!(!player.weapon_just_switched());
            now += 216;
        }
        assert_eq!(player.weapon_index(), 0);
    }

    #[test]
    fn test_held_switch_is_gated_by_cooldown() {
        let (mut player, tables) = setup();
        let switch = keys(InputFrame::FLAG_SWITCH_MAGIC);
        for now in (0..200).step_by(16) {
            step(&mut player, &tables, switch, now);
        }
        assert_eq!(player.magic_index(), 1);
        // The gate reopens during the 200ms tick; the held key fires on the next one.
        step(&mut player, &tables, switch, 200);
        assert_eq!(player.magic_index(), 1);
        step(&mut player, &tables, switch, 216);
        assert_eq!(player.magic_index(), 0);
    }

    #[test]
    fn test_no_switch_while_attacking() {
        let (mut player, tables) = setup();
        step(&mut player, &tables, keys(InputFrame::FLAG_ATTACK), 0);
        step(&mut player, &tables, keys(InputFrame::FLAG_SWITCH_WEAPON), 16);
        assert_eq!(player.weapon_index(), 0);
    }

    #[test]
    fn test_full_weapon_damage() {
        let (mut player, tables) = setup();
        assert_eq!(player.full_weapon_damage(&tables), 10 + 15);
        step(&mut player, &tables, keys(InputFrame::FLAG_SWITCH_WEAPON), 0);
        assert_eq!(player.full_weapon_damage(&tables), 10 + 30);
    }

    #[test]
    fn test_damage_then_invulnerable_window() {
        let (mut player, _) = setup();
        let hit = Hit { origin: FixedVec2::ZERO, kind: DamageKind::Weapon, amount: 25 };

        assert!(player.receive_damage(&hit, 1000));
        assert_eq!(player.health(), 75);
        assert!(!player.is_vulnerable());

        assert!(!player.receive_damage(&hit, 1499));
        assert_eq!(player.health(), 75);

        assert!(player.receive_damage(&hit, 1500));
        assert_eq!(player.health(), 50);
    }

    #[test]
    fn test_flicker_only_while_invulnerable() {
        let (mut player, _) = setup();
        assert_eq!(player.alpha(4), 255);
        let hit = Hit { origin: FixedVec2::ZERO, kind: DamageKind::Weapon, amount: 1 };
        player.receive_damage(&hit, 0);
        assert_eq!(player.alpha(4), wave_value(4));
    }

    #[test]
    fn test_energy_recovers_to_max() {
        let (mut player, tables) = setup();
        assert!(player.try_spend_energy(20));
        let spent = player.energy();
        step(&mut player, &tables, InputFrame::new(), 0);
        assert!(player.energy() > spent);

        for t in 0..2000 {
            step(&mut player, &tables, InputFrame::new(), t * 16);
        }
        assert_eq!(player.energy(), from_int(60));
    }

    #[test]
    fn test_heal_is_capped() {
        let (mut player, _) = setup();
        let hit = Hit { origin: FixedVec2::ZERO, kind: DamageKind::Weapon, amount: 10 };
        player.receive_damage(&hit, 0);
        assert_eq!(player.heal(24), 10);
        assert_eq!(player.health(), 100);
    }
}
