//! Combat Resolution
//!
//! Sweeps every active attack hitbox against a snapshot of the attackable
//! set. The sweep is pure: it reports collisions in deterministic order and
//! the level applies them afterwards, so nothing is added to or removed from
//! a collection while it is being iterated.
//!
//! Policy: one swing may hit any number of overlapping targets. Enemies
//! only take damage here; they leave play when their health reaches zero.
//! Breakable props are destroyed on touch.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::core::rect::Rect;
use crate::game::entity::DamageKind;
use crate::game::state::EntityId;

/// An active attack hitbox.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    /// Hitbox
    pub rect: Rect,
    /// Sprite key, e.g. `"sword_right"` or `"flame"`
    pub sprite: String,
    /// Weapon or spell
    pub kind: DamageKind,
    /// Spell hitboxes expire on their own; weapon hitboxes live until
    /// the attack window closes.
    pub expires_at_ms: Option<u64>,
}

impl Attack {
    /// Weapon hitbox, removed when the attack window closes.
    pub fn weapon(rect: Rect, sprite: impl Into<String>) -> Self {
        Self { rect, sprite: sprite.into(), kind: DamageKind::Weapon, expires_at_ms: None }
    }

    /// Spell hitbox that expires at `expires_at_ms`.
    pub fn magic(rect: Rect, sprite: impl Into<String>, expires_at_ms: u64) -> Self {
        Self { rect, sprite: sprite.into(), kind: DamageKind::Magic, expires_at_ms: Some(expires_at_ms) }
    }

    /// True once a timed hitbox has run out.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        matches!(self.expires_at_ms, Some(at) if now_ms >= at)
    }
}

/// How a target reacts to being touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// Destroyed on touch
    Prop,
    /// Goes through damage intake
    Enemy,
}

/// Snapshot of one attackable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    /// Enemy or prop id
    pub id: EntityId,
    /// Sprite rect the sweep tests against
    pub rect: Rect,
    /// How the target reacts
    pub kind: TargetKind,
}

/// One attack touching one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackCollision {
    /// Attack hitbox id
    pub attack: EntityId,
    /// Touched entity
    pub target: EntityId,
    /// How the target reacts
    pub target_kind: TargetKind,
    /// Weapon or spell
    pub damage_kind: DamageKind,
}

/// Check if an attack hitbox touches a target.
#[inline]
pub fn check_attack_collision(attack: &Attack, target: &Target) -> bool {
    attack.rect.intersects(&target.rect)
}

/// Check all attacks against all targets.
///
/// Ordered by attack id, then by target order in the snapshot.
pub fn check_all_attack_collisions(
    attacks: &BTreeMap<EntityId, Attack>,
    targets: &[Target],
) -> Vec<AttackCollision> {
    let mut collisions = Vec::new();

    for (attack_id, attack) in attacks {
        for target in targets {
            if check_attack_collision(attack, target) {
                collisions.push(AttackCollision {
                    attack: *attack_id,
                    target: target.id,
                    target_kind: target.kind,
                    damage_kind: attack.kind,
                });
            }
        }
    }

    collisions
}
