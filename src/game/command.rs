//! Entity Intents
//!
//! Controllers never reach into the level. They push `Command`s into an
//! outbox during their update; the level drains the outbox after every
//! entity has moved and performs the side effects in order.

use serde::{Serialize, Deserialize};
use crate::core::vec2::FixedVec2;

/// Something an entity wants the level to do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Spawn the player's weapon hitbox
    CreateAttack,

    /// Remove the player's weapon hitbox
    DestroyAttack,

    /// Cast a spell; `cost` is forwarded unmodified from the catalog
    CreateMagic {
        /// Spell name
        style: String,
        /// Spell strength plus the magic stat
        strength: i32,
        /// Energy cost
        cost: i32,
    },

    /// An enemy attack landed on the player
    DamagePlayer {
        /// Monster damage
        amount: i32,
        /// Monster attack style
        attack_type: String,
        /// Attacker center, for knockback direction
        origin: FixedVec2,
    },
}

/// Per-entity command queue.
pub type Outbox = Vec<Command>;
