//! Enemy Controller
//!
//! Three-state perception recomputed every tick from the live distance to
//! the player, with no hysteresis:
//!
//! - within `attack_radius` and `can_attack`: **attack**
//! - within `notice_radius`: **move** toward the player
//! - otherwise: **idle**
//!
//! Radius checks compare squared distances, so the boundary is exact.

#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::fixed::{from_int, FIXED_SCALE};
use crate::core::hash::StateHasher;
use crate::core::rect::Rect;
use crate::core::vec2::FixedVec2;
use crate::game::command::{Command, Outbox};
use crate::game::entity::{Body, DamageKind, Damageable, Hit, Movable, elapsed, wave_value};
use crate::game::error::ContentError;
use crate::game::status::EnemyStatus;
use crate::game::tables::{GameTables, MonsterStats};
use crate::game::tick::LevelConfig;

/// A monster placed on the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    body: Body,
    /// Monster table key
    monster: String,
    stats: MonsterStats,
    /// Perception state from the last tick
    pub status: EnemyStatus,
    health: i32,
    can_attack: bool,
    attack_time: u64,
    vulnerable: bool,
    hit_time: u64,
}

/// True if `distance_sq` (Q32.32) is within a whole-pixel radius.
#[inline]
fn within(distance_sq: i64, radius: i32) -> bool {
    let r = (radius as i64) << FIXED_SCALE;
    distance_sq <= r * r
}

impl Enemy {
    /// Spawn a monster from the table. Unknown keys are content errors.
    pub fn new(
        monster: &str,
        rect: Rect,
        tables: &GameTables,
        config: &LevelConfig,
    ) -> Result<Self, ContentError> {
        let stats = tables.monster(monster)?.clone();
        let inset = config.hitbox_insets.enemy;
        Ok(Self {
            body: Body::new(rect, FixedVec2::from_ints(inset.0, inset.1), config.animation_speed),
            monster: monster.to_string(),
            health: stats.health,
            stats,
            status: EnemyStatus::Idle,
            can_attack: true,
            attack_time: 0,
            vulnerable: true,
            hit_time: 0,
        })
    }

    /// Advance one tick against the player's post-move center.
    pub fn update(
        &mut self,
        player_center: FixedVec2,
        now_ms: u64,
        obstacles: &[Rect],
        outbox: &mut Outbox,
    ) {
        self.cooldowns(now_ms);
        self.perceive(player_center);
        self.act(player_center, now_ms, outbox);
        self.hit_reaction();
        self.body.move_by(from_int(self.stats.speed), obstacles);
        self.animate();

        #[cfg(feature = "debug-tracing")]
        trace!(monster = %self.monster, status = self.status.as_str(), health = self.health, "enemy updated");
    }

    fn cooldowns(&mut self, now_ms: u64) {
        if !self.can_attack && elapsed(now_ms, self.attack_time, self.stats.attack_cooldown_ms) {
            self.can_attack = true;
        }
        if !self.vulnerable && elapsed(now_ms, self.hit_time, self.stats.invincibility_ms) {
            self.vulnerable = true;
        }
    }

    /// Unit vector from this enemy toward `target` (zero if coincident).
    fn direction_to(&self, target: FixedVec2) -> FixedVec2 {
        (target - self.body.center()).normalize()
    }

    fn perceive(&mut self, player_center: FixedVec2) {
        let distance_sq = self.body.center().distance_squared(player_center);

        if within(distance_sq, self.stats.attack_radius) && self.can_attack {
            if self.status != EnemyStatus::Attack {
                self.body.animator.reset();
            }
            self.status = EnemyStatus::Attack;
        } else if within(distance_sq, self.stats.notice_radius) {
            self.status = EnemyStatus::Move;
        } else {
            self.status = EnemyStatus::Idle;
        }
    }

    fn act(&mut self, player_center: FixedVec2, now_ms: u64, outbox: &mut Outbox) {
        match self.status {
            EnemyStatus::Attack => {
                self.attack_time = now_ms;
                self.can_attack = false;
                outbox.push(Command::DamagePlayer {
                    amount: self.stats.damage,
                    attack_type: self.stats.attack_type.clone(),
                    origin: self.body.center(),
                });
            }
            EnemyStatus::Move => {
                self.body.direction = self.direction_to(player_center);
            }
            EnemyStatus::Idle => {
                self.body.direction = FixedVec2::ZERO;
            }
        }
    }

    /// Knockback: while invulnerable, reverse direction at normal speed.
    fn hit_reaction(&mut self) {
        if !self.vulnerable {
            self.body.direction = self.body.direction.negate().scale_int(self.stats.resistance);
        }
    }

    fn animate(&mut self) {
        let len = self.animation_len();
        let wrapped = self.body.animator.advance(len);
        if wrapped && self.status == EnemyStatus::Attack {
            self.can_attack = false;
        }
    }

    /// Frame count of the current status' sequence.
    pub fn animation_len(&self) -> u32 {
        match self.status {
            EnemyStatus::Idle => self.stats.frames.idle,
            EnemyStatus::Move => self.stats.frames.moving,
            EnemyStatus::Attack => self.stats.frames.attack,
        }
    }

    /// Sprite alpha: flickers while invulnerable.
    pub fn alpha(&self, now_ms: u64) -> u8 {
        if self.vulnerable { 255 } else { wave_value(now_ms) }
    }

    /// Monster table key.
    pub fn monster(&self) -> &str {
        &self.monster
    }

    /// Stats copied from the monster table at spawn.
    pub fn stats(&self) -> &MonsterStats {
        &self.stats
    }

    /// True while the attack cooldown allows a new attack.
    pub fn can_attack(&self) -> bool {
        self.can_attack
    }

    pub(crate) fn hash_into(&self, hasher: &mut StateHasher) {
        self.body.hash_into(hasher);
        hasher.update_str(&self.monster);
        hasher.update_u8(self.status as u8);
        hasher.update_i32(self.health);
        hasher.update_bool(self.can_attack);
        hasher.update_u64(self.attack_time);
        hasher.update_bool(self.vulnerable);
        hasher.update_u64(self.hit_time);
    }
}

impl Movable for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Damageable for Enemy {
    fn receive_damage(&mut self, hit: &Hit, now_ms: u64) -> bool {
        self.cooldowns(now_ms);
        if !self.vulnerable {
            return false;
        }

        // Points at the source; hit_reaction flips it into knockback.
        self.body.direction = self.direction_to(hit.origin);
        match hit.kind {
            DamageKind::Weapon => self.health -= hit.amount,
            // Spells knock back but deal no damage to monsters.
            DamageKind::Magic => {}
        }
        self.hit_time = now_ms;
        self.vulnerable = false;
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
