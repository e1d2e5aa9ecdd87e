//! Spell Resolution
//!
//! The player only announces a cast; the level resolves it here once all
//! entities have moved. Both spells need `energy >= cost`, otherwise the
//! cast fizzles and nothing is spent.

use serde::{Serialize, Deserialize};

use crate::core::rect::Rect;
use crate::core::vec2::FixedVec2;
use crate::game::entity::Movable;
use crate::game::player::Player;
use crate::game::tables::{MagicEffect, MagicStats};
use crate::game::tick::LevelConfig;

/// What a resolved cast did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastOutcome {
    /// Health restored (possibly 0 when already full)
    Healed {
        /// Health actually added
        amount: i32,
    },
    /// Fire hitboxes to spawn, nearest first
    Flame {
        /// One rect per flame
        hitboxes: Vec<Rect>,
    },
    /// Not enough energy
    Fizzled,
}

/// Resolve a cast of `spell` with the strength and cost the player announced.
pub fn cast(
    player: &mut Player,
    spell: &MagicStats,
    strength: i32,
    cost: i32,
    config: &LevelConfig,
) -> CastOutcome {
    if !player.try_spend_energy(cost) {
        return CastOutcome::Fizzled;
    }

    match spell.effect {
        MagicEffect::Heal => CastOutcome::Healed {
            amount: player.heal(strength),
        },
        MagicEffect::Flame => CastOutcome::Flame {
            hitboxes: flame_hitboxes(player.body().rect.center(), player.status.facing.unit(), config),
        },
    }
}

/// Tile-sized boxes marching away from `origin` along `facing`.
pub fn flame_hitboxes(origin: FixedVec2, facing: FixedVec2, config: &LevelConfig) -> Vec<Rect> {
    let tile = config.tile_size;
    (1..=config.flame_reach as i32)
        .map(|i| {
            let center = origin + facing.scale_int(i * tile);
            Rect::from_ints(0, 0, tile, tile).with_center(center)
        })
        .collect()
}
