//! Game Events
//!
//! Observable state changes emitted by a tick, for the HUD, effects and
//! replay verification.

use serde::{Serialize, Deserialize};
use crate::game::entity::DamageKind;
use crate::game::state::{EntityId, TileKind};

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Deaths and defeat first
    Elimination = 0,
    /// Then damage taken
    Damage = 1,
    /// Then attacks and spells
    AbilityEffect = 2,
    /// Then equipment changes
    Equipment = 3,
    /// Lowest priority
    Other = 255,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Weapon hitbox spawned
    AttackStarted {
        /// Weapon name
        weapon: String,
    },

    /// Weapon hitbox removed
    AttackEnded,

    /// Spell resolved with enough energy
    MagicCast {
        /// Spell name
        style: String,
        /// Spell strength plus the magic stat
        strength: i32,
        /// Energy spent
        cost: i32,
    },

    /// Spell failed for lack of energy
    MagicFizzled {
        /// Spell name
        style: String,
        /// Energy it would have cost
        cost: i32,
    },

    /// Player cycled to another weapon
    WeaponSwitched {
        /// New catalog index
        index: usize,
        /// New weapon name
        name: String,
    },

    /// Player cycled to another spell
    MagicSwitched {
        /// New catalog index
        index: usize,
        /// New spell name
        name: String,
    },

    /// An enemy attack landed
    PlayerHurt {
        /// Damage taken
        amount: i32,
        /// Attacker's attack style
        attack_type: String,
        /// Health left
        health: i32,
    },

    /// Player health reached zero
    PlayerDefeated,

    /// A weapon or spell connected with an enemy
    EnemyHit {
        /// Monster table key
        monster: String,
        /// Weapon or spell
        kind: DamageKind,
        /// Health removed
        amount: i32,
        /// Health left
        health: i32,
    },

    /// Enemy removed after its health reached zero
    EnemyKilled {
        /// Monster table key
        monster: String,
        /// Experience granted
        exp: u32,
    },

    /// Breakable prop destroyed by an attack
    PropDestroyed {
        /// Tile kind
        kind: TileKind,
    },
}

impl GameEventData {
    /// Default processing priority of this kind of event.
    pub fn priority(&self) -> EventPriority {
        match self {
            GameEventData::PlayerDefeated | GameEventData::EnemyKilled { .. } => {
                EventPriority::Elimination
            }
            GameEventData::PlayerHurt { .. }
            | GameEventData::EnemyHit { .. }
            | GameEventData::PropDestroyed { .. } => EventPriority::Damage,
            GameEventData::AttackStarted { .. }
            | GameEventData::AttackEnded
            | GameEventData::MagicCast { .. }
            | GameEventData::MagicFizzled { .. } => EventPriority::AbilityEffect,
            GameEventData::WeaponSwitched { .. } | GameEventData::MagicSwitched { .. } => {
                EventPriority::Equipment
            }
        }
    }
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Clock value of that tick
    pub time_ms: u64,

    /// Processing priority
    pub priority: EventPriority,

    /// Entity involved (for tie-breaking)
    pub entity: Option<EntityId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event with the data's default priority.
    pub fn new(tick: u32, time_ms: u64, entity: Option<EntityId>, data: GameEventData) -> Self {
        Self {
            tick,
            time_ms,
            priority: data.priority(),
            entity,
            data,
        }
    }

    /// Enemy removal with the experience it granted.
    pub fn enemy_killed(tick: u32, time_ms: u64, enemy: EntityId, monster: &str, exp: u32) -> Self {
        Self::new(
            tick,
            time_ms,
            Some(enemy),
            GameEventData::EnemyKilled { monster: monster.to_string(), exp },
        )
    }

    /// Player health reached zero.
    pub fn player_defeated(tick: u32, time_ms: u64, player: EntityId) -> Self {
        Self::new(tick, time_ms, Some(player), GameEventData::PlayerDefeated)
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick
            && self.priority == other.priority
            && self.entity == other.entity
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then entity
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.entity.cmp(&other.entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ordering() {
        let killed = GameEvent::enemy_killed(10, 160, EntityId(4), "squid", 100);
        let hurt = GameEvent::new(
            10,
            160,
            Some(EntityId(1)),
            GameEventData::PlayerHurt { amount: 20, attack_type: "slash".into(), health: 80 },
        );
        let killed_later_id = GameEvent::enemy_killed(10, 160, EntityId(9), "raccoon", 250);
        let next_tick = GameEvent::player_defeated(11, 176, EntityId(1));

        // Same tick, but elimination < damage
        assert!(killed < hurt);

        // Same tick and priority, lower id first
        assert!(killed < killed_later_id);

        assert!(hurt < next_tick);
    }

    #[test]
    fn test_priorities_by_kind() {
        assert_eq!(GameEventData::AttackEnded.priority(), EventPriority::AbilityEffect);
        assert_eq!(
            GameEventData::WeaponSwitched { index: 1, name: "lance".into() }.priority(),
            EventPriority::Equipment
        );
        assert_eq!(
            GameEventData::PropDestroyed { kind: TileKind::Grass }.priority(),
            EventPriority::Damage
        );
    }
}
