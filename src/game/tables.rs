//! Static Content Tables
//!
//! Player base stats, the ordered weapon and magic catalogs, and the
//! monster table. Loaded once (built-in defaults or a JSON document) and
//! validated before any entity is spawned; lookups of unknown keys are
//! configuration errors, never runtime conditions.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::game::error::ContentError;

/// Player base stats, fixed at spawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Maximum (and starting) health
    pub health: i32,
    /// Maximum (and starting) energy
    pub energy: i32,
    /// Added to every weapon's damage
    pub attack: i32,
    /// Added to every spell's strength; also drives energy recovery
    pub magic: i32,
    /// Pixels per tick
    pub speed: i32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            health: 100,
            energy: 60,
            attack: 10,
            magic: 4,
            speed: 5,
        }
    }
}

/// Frame counts of the three animation families an entity plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationFrames {
    /// Frames while standing still
    pub idle: u32,
    /// Frames while walking
    pub moving: u32,
    /// Frames while attacking
    pub attack: u32,
}

impl AnimationFrames {
    /// Player sprite sheet: four walk frames, single idle and attack poses.
    pub const PLAYER: Self = Self { idle: 1, moving: 4, attack: 1 };

    /// Frame counts shared by the stock monsters.
    pub const MONSTER: Self = Self { idle: 4, moving: 4, attack: 4 };

    fn validate(&self, owner: &str) -> Result<(), ContentError> {
        for (key, frames) in [("idle", self.idle), ("move", self.moving), ("attack", self.attack)] {
            if frames == 0 {
                return Err(ContentError::EmptyAnimation {
                    owner: owner.to_string(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for AnimationFrames {
    fn default() -> Self {
        Self::MONSTER
    }
}

/// One melee weapon of the player's catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Catalog key
    pub name: String,
    /// Added to the base attack cooldown
    pub cooldown_ms: u64,
    /// Added to the player's attack stat
    pub damage: i32,
    /// Hitbox extent along the facing axis (pixels)
    pub length: i32,
    /// Hitbox extent across the facing axis (pixels)
    pub width: i32,
}

impl WeaponStats {
    fn new(name: &str, cooldown_ms: u64, damage: i32, length: i32, width: i32) -> Self {
        Self { name: name.to_string(), cooldown_ms, damage, length, width }
    }
}

/// What a spell does once the level resolves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagicEffect {
    /// Restore health
    Heal,
    /// Line of fire hitboxes along the facing direction
    Flame,
}

/// One spell of the player's catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicStats {
    /// Catalog key, also the cast style
    pub name: String,
    /// Effect resolved by the level
    pub effect: MagicEffect,
    /// Base strength before the player's magic stat
    pub strength: i32,
    /// Energy cost
    pub cost: i32,
}

/// Static stats of one monster type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterStats {
    /// Health at spawn
    pub health: i32,
    /// Experience granted on death
    pub exp: u32,
    /// Damage dealt per attack
    pub damage: i32,
    /// Attack style reported with the damage (particle key)
    pub attack_type: String,
    /// Pixels per tick
    pub speed: i32,
    /// Scales the reversed direction while invulnerable; speed is unchanged
    pub resistance: i32,
    /// Attack range from center to center (pixels)
    pub attack_radius: i32,
    /// Chase range from center to center (pixels)
    pub notice_radius: i32,
    /// Minimum time between attacks
    pub attack_cooldown_ms: u64,
    /// Invulnerability window after a hit
    pub invincibility_ms: u64,
    /// Frames per status sequence
    #[serde(default)]
    pub frames: AnimationFrames,
}

impl MonsterStats {
    #[allow(clippy::too_many_arguments)]
    fn new(
        health: i32,
        exp: u32,
        damage: i32,
        attack_type: &str,
        speed: i32,
        attack_radius: i32,
        notice_radius: i32,
    ) -> Self {
        Self {
            health,
            exp,
            damage,
            attack_type: attack_type.to_string(),
            speed,
            resistance: 3,
            attack_radius,
            notice_radius,
            attack_cooldown_ms: 400,
            invincibility_ms: 300,
            frames: AnimationFrames::MONSTER,
        }
    }
}

/// Every static table the simulation reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTables {
    /// Player base stats
    #[serde(default)]
    pub player: PlayerStats,
    /// Frames per player status sequence
    #[serde(default = "player_frames")]
    pub player_frames: AnimationFrames,
    /// Ordered catalog; switching cycles through it
    pub weapons: Vec<WeaponStats>,
    /// Ordered catalog; switching cycles through it
    pub magic: Vec<MagicStats>,
    /// Keyed by monster name
    pub monsters: BTreeMap<String, MonsterStats>,
}

fn player_frames() -> AnimationFrames {
    AnimationFrames::PLAYER
}

impl Default for GameTables {
    fn default() -> Self {
        let weapons = vec![
            WeaponStats::new("sword", 100, 15, 40, 20),
            WeaponStats::new("lance", 400, 30, 64, 16),
            WeaponStats::new("axe", 300, 20, 44, 28),
            WeaponStats::new("rapier", 50, 8, 52, 12),
            WeaponStats::new("sai", 80, 10, 32, 20),
        ];

        let magic = vec![
            MagicStats { name: "flame".into(), effect: MagicEffect::Flame, strength: 5, cost: 20 },
            MagicStats { name: "heal".into(), effect: MagicEffect::Heal, strength: 20, cost: 10 },
        ];

        let mut monsters = BTreeMap::new();
        monsters.insert("squid".to_string(), MonsterStats::new(100, 100, 20, "slash", 3, 80, 360));
        monsters.insert("raccoon".to_string(), MonsterStats::new(300, 250, 40, "claw", 2, 120, 400));
        monsters.insert("spirit".to_string(), MonsterStats::new(100, 110, 8, "thunder", 4, 60, 350));
        monsters.insert("bamboo".to_string(), MonsterStats::new(70, 120, 6, "leaf_attack", 3, 50, 300));

        Self {
            player: PlayerStats::default(),
            player_frames: AnimationFrames::PLAYER,
            weapons,
            magic,
            monsters,
        }
    }
}

impl GameTables {
    /// Parse and validate a JSON table document.
    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        let tables: GameTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Reject tables the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.weapons.is_empty() {
            return Err(ContentError::EmptyCatalog("weapon"));
        }
        if self.magic.is_empty() {
            return Err(ContentError::EmptyCatalog("magic"));
        }
        self.player_frames.validate("player")?;
        for (name, monster) in &self.monsters {
            monster.frames.validate(name)?;
        }
        Ok(())
    }

    /// Weapon at a catalog position. Positions are always kept in range
    /// by the player's cycling, so this wraps instead of failing.
    pub fn weapon(&self, index: usize) -> &WeaponStats {
        &self.weapons[index % self.weapons.len()]
    }

    /// Spell at a catalog position (wrapping, like [`GameTables::weapon`]).
    pub fn spell(&self, index: usize) -> &MagicStats {
        &self.magic[index % self.magic.len()]
    }

    /// Catalog position of a weapon by key.
    pub fn weapon_index(&self, name: &str) -> Result<usize, ContentError> {
        self.weapons
            .iter()
            .position(|w| w.name == name)
            .ok_or_else(|| ContentError::UnknownWeapon(name.to_string()))
    }

    /// Spell by key.
    pub fn spell_named(&self, name: &str) -> Result<&MagicStats, ContentError> {
        self.magic
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ContentError::UnknownMagic(name.to_string()))
    }

    /// Monster stats by key.
    pub fn monster(&self, name: &str) -> Result<&MonsterStats, ContentError> {
        self.monsters
            .get(name)
            .ok_or_else(|| ContentError::UnknownMonster(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_valid() {
        let tables = GameTables::default();
        assert!(tables.validate().is_ok());
        assert_eq!(tables.weapons[0].name, "sword");
        assert_eq!(tables.monster("squid").map(|m| m.notice_radius), Ok(360));
    }

    #[test]
    fn test_unknown_keys_are_errors() {
        let tables = GameTables::default();
        assert_eq!(
            tables.monster("dragon"),
            Err(ContentError::UnknownMonster("dragon".into()))
        );
        assert_eq!(
            tables.weapon_index("bow"),
            Err(ContentError::UnknownWeapon("bow".into()))
        );
        assert!(matches!(tables.spell_named("ice"), Err(ContentError::UnknownMagic(_))));
    }

    #[test]
    fn test_catalog_lookup_wraps() {
        let tables = GameTables::default();
        let n = tables.weapons.len();
        assert_eq!(tables.weapon(n).name, tables.weapon(0).name);
        assert_eq!(tables.weapon_index("lance"), Ok(1));
    }

    #[test]
    fn test_json_round_trip_keeps_catalog_order() {
        let tables = GameTables::default();
        let json = serde_json::to_string(&tables).unwrap();
        let parsed = GameTables::from_json_str(&json).unwrap();
        assert_eq!(parsed, tables);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let mut tables = GameTables::default();
        tables.magic.clear();
        assert_eq!(tables.validate(), Err(ContentError::EmptyCatalog("magic")));
    }

    #[test]
    fn test_zero_frame_animation_rejected() {
        let json = r#"{
            "weapons": [{"name": "stick", "cooldown_ms": 0, "damage": 1, "length": 10, "width": 10}],
            "magic": [{"name": "heal", "effect": "heal", "strength": 1, "cost": 1}],
            "monsters": {
                "blob": {
                    "health": 1, "exp": 1, "damage": 1, "attack_type": "slash",
                    "speed": 1, "resistance": 1, "attack_radius": 1, "notice_radius": 2,
                    "attack_cooldown_ms": 1, "invincibility_ms": 1,
                    "frames": {"idle": 1, "moving": 0, "attack": 1}
                }
            }
        }"#;
        assert!(matches!(
            GameTables::from_json_str(json),
            Err(ContentError::EmptyAnimation { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_table_error() {
        assert!(matches!(
            GameTables::from_json_str("{ not json"),
            Err(ContentError::MalformedTable(_))
        ));
    }
}
