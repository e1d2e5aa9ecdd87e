//! Level State
//!
//! The level owns every entity and its group memberships. Entities never
//! own each other; the tick talks to them through the level.
//! Uses BTreeMap/BTreeSet for deterministic iteration order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::core::hash::{StateHash, compute_state_hash};
use crate::core::fixed::{from_int, to_int};
use crate::core::rect::Rect;
use crate::core::vec2::FixedVec2;
use crate::game::combat::{Attack, Target, TargetKind};
use crate::game::enemy::Enemy;
use crate::game::entity::{Damageable, Movable};
use crate::game::error::ContentError;
use crate::game::events::GameEvent;
use crate::game::map::MapLayout;
use crate::game::player::Player;
use crate::game::tables::GameTables;
use crate::game::tick::LevelConfig;

// =============================================================================
// ENTITY ID
// =============================================================================

/// Level-unique entity identifier, allocated from a monotonic counter.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// TILES
// =============================================================================

/// Static map tile kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    /// Invisible wall at the map edge
    Boundary = 0,
    /// Breakable bush
    Grass = 1,
    /// Tree, rock or statue; two tiles tall
    Object = 2,
}

impl TileKind {
    /// Layer name.
    pub fn as_str(self) -> &'static str {
        match self {
            TileKind::Boundary => "boundary",
            TileKind::Grass => "grass",
            TileKind::Object => "object",
        }
    }
}

/// A placed tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prop {
    /// Tile kind
    pub kind: TileKind,
    /// Sprite rect
    pub rect: Rect,
    /// Collision box
    pub hitbox: Rect,
}

/// What to place with [`Level::spawn`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    /// The single player
    Player,
    /// Monster table key
    Enemy(String),
    /// A static tile
    Tile(TileKind),
}

// =============================================================================
// GROUPS
// =============================================================================

/// Named membership sets read by the renderer and the combat sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// Drawn every frame
    Visible,
    /// Blocks movement
    Obstacle,
    /// Can be hit by attacks
    Attackable,
    /// Active attack hitboxes
    Attack,
}

impl Group {
    /// Every group.
    pub const ALL: [Group; 4] = [Group::Visible, Group::Obstacle, Group::Attackable, Group::Attack];
}

/// Membership of every entity in every group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Groups {
    visible: BTreeSet<EntityId>,
    obstacle: BTreeSet<EntityId>,
    attackable: BTreeSet<EntityId>,
    attack: BTreeSet<EntityId>,
}

impl Groups {
    fn set_mut(&mut self, group: Group) -> &mut BTreeSet<EntityId> {
        match group {
            Group::Visible => &mut self.visible,
            Group::Obstacle => &mut self.obstacle,
            Group::Attackable => &mut self.attackable,
            Group::Attack => &mut self.attack,
        }
    }

    /// Members of one group, in id order.
    pub fn get(&self, group: Group) -> &BTreeSet<EntityId> {
        match group {
            Group::Visible => &self.visible,
            Group::Obstacle => &self.obstacle,
            Group::Attackable => &self.attackable,
            Group::Attack => &self.attack,
        }
    }

    /// Add `id` to each listed group.
    pub fn insert(&mut self, id: EntityId, groups: &[Group]) {
        for group in groups {
            self.set_mut(*group).insert(id);
        }
    }

    /// Remove from every group.
    pub fn remove(&mut self, id: EntityId) {
        for group in Group::ALL {
            self.set_mut(group).remove(&id);
        }
    }

    /// True if `id` belongs to `group`.
    pub fn contains(&self, group: Group, id: EntityId) -> bool {
        self.get(group).contains(&id)
    }
}

// =============================================================================
// LEVEL PHASE
// =============================================================================

/// Current phase of the level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum LevelPhase {
    /// No player yet
    #[default]
    Waiting = 0,
    /// Active gameplay
    Playing = 1,
    /// Player health reached zero
    Defeated = 2,
}

// =============================================================================
// READ-ONLY VIEWS
// =============================================================================

/// Everything the HUD shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    /// Current health
    pub health: i32,
    /// Health cap
    pub max_health: i32,
    /// Whole energy points
    pub energy: i32,
    /// Energy cap
    pub max_energy: i32,
    /// Experience
    pub exp: u32,
    /// Selected weapon slot
    pub weapon_index: usize,
    /// Selected weapon name
    pub weapon: String,
    /// Selected spell slot
    pub magic_index: usize,
    /// Selected spell name
    pub magic: String,
    /// Weapon switch cooldown running
    pub weapon_just_switched: bool,
    /// Magic switch cooldown running
    pub magic_just_switched: bool,
}

/// What kind of thing a sprite is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    /// The player
    Player,
    /// A monster
    Enemy,
    /// A visible tile
    Tile(TileKind),
    /// Weapon or spell hitbox
    Attack,
}

/// One sprite to draw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteView {
    /// Entity drawn
    pub id: EntityId,
    /// What it is
    pub kind: SpriteKind,
    /// Where to draw it
    pub rect: Rect,
    /// Animation sequence key, e.g. `"down_idle"` or `"squid/move"`
    pub animation: String,
    /// Frame within the animation
    pub frame: u32,
    /// 255 opaque, 0 hidden (invulnerability flicker)
    pub alpha: u8,
}

// =============================================================================
// LEVEL
// =============================================================================

/// Largest world coordinate on either axis, in pixels. Everything placed
/// at load time fits within `-WORLD_EXTENT_PX..=WORLD_EXTENT_PX`; the rest
/// of the Q16.16 range is headroom for movement and flame reach.
pub const WORLD_EXTENT_PX: i32 = 1 << 14;

/// True if every edge of `rect` lies within the world extent.
fn in_world(rect: &Rect) -> bool {
    let limit = from_int(WORLD_EXTENT_PX) as i64;
    let (x, y) = (rect.x as i64, rect.y as i64);
    x >= -limit && y >= -limit && x + rect.w as i64 <= limit && y + rect.h as i64 <= limit
}

/// Complete state of a level.
#[derive(Clone, Debug)]
pub struct Level {
    /// Ticks simulated so far
    pub tick: u32,

    /// Clock value of the last tick
    pub now_ms: u64,

    /// Current level phase
    pub phase: LevelPhase,

    pub(crate) config: LevelConfig,
    pub(crate) tables: GameTables,

    /// Next entity id (monotonic counter)
    next_id: u32,

    pub(crate) player: Option<(EntityId, Player)>,
    pub(crate) enemies: BTreeMap<EntityId, Enemy>,
    pub(crate) props: BTreeMap<EntityId, Prop>,
    pub(crate) attacks: BTreeMap<EntityId, Attack>,

    /// The player's weapon hitbox, while an attack window is open
    pub(crate) current_attack: Option<EntityId>,

    groups: Groups,

    /// Events generated this tick (cleared each tick)
    pending_events: Vec<GameEvent>,
}

impl Level {
    /// Create an empty level. Tables are validated here.
    pub fn new(tables: GameTables, config: LevelConfig) -> Result<Self, ContentError> {
        tables.validate()?;
        if config.tile_size <= 0 || config.tile_size > WORLD_EXTENT_PX / 2 {
            return Err(ContentError::InvalidTileSize(config.tile_size));
        }
        Ok(Self {
            tick: 0,
            now_ms: 0,
            phase: LevelPhase::Waiting,
            config,
            tables,
            next_id: 0,
            player: None,
            enemies: BTreeMap::new(),
            props: BTreeMap::new(),
            attacks: BTreeMap::new(),
            current_attack: None,
            groups: Groups::default(),
            pending_events: Vec::new(),
        })
    }

    /// Build a level from a parsed map layout.
    pub fn from_layout(
        layout: &MapLayout,
        tables: GameTables,
        config: LevelConfig,
    ) -> Result<Self, ContentError> {
        let mut level = Self::new(tables, config)?;
        let tile = level.config.tile_size;

        let (rows, cols) = layout.size();
        let extent = rows.max(cols) as i64 * tile as i64;
        if extent > WORLD_EXTENT_PX as i64 {
            return Err(ContentError::MapTooLarge { rows, cols });
        }

        for placement in layout.placements()? {
            let position = FixedVec2::from_ints(placement.col as i32 * tile, placement.row as i32 * tile);
            level.spawn(placement.kind, position)?;
        }

        info!(
            props = level.props.len(),
            enemies = level.enemies.len(),
            has_player = level.player.is_some(),
            "level loaded"
        );
        Ok(level)
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place an entity whose tile-sized rect has its top-left at `position`.
    ///
    /// Fails if the entity's rect would reach outside the world extent.
    pub fn spawn(&mut self, kind: SpawnKind, position: FixedVec2) -> Result<EntityId, ContentError> {
        let tile = self.config.tile_size;
        let rect = Rect::at_topleft(position, FixedVec2::from_ints(tile, tile));
        let rect = match kind {
            SpawnKind::Tile(TileKind::Object) => Rect::at_topleft(
                position - FixedVec2::from_ints(0, tile),
                FixedVec2::from_ints(tile, tile * 2),
            ),
            _ => rect,
        };
        if !in_world(&rect) {
            return Err(ContentError::SpawnOutOfBounds { x: to_int(rect.x), y: to_int(rect.y) });
        }

        match kind {
            SpawnKind::Player => {
                if self.player.is_some() {
                    return Err(ContentError::PlayerAlreadySpawned);
                }
                let player = Player::new(rect, &self.tables, &self.config);
                let id = self.allocate_id();
                self.player = Some((id, player));
                self.groups.insert(id, &[Group::Visible]);
                if self.phase == LevelPhase::Waiting {
                    self.phase = LevelPhase::Playing;
                }
                debug!(%id, x = to_int(position.x), y = to_int(position.y), "player spawned");
                Ok(id)
            }
            SpawnKind::Enemy(monster) => {
                let enemy = Enemy::new(&monster, rect, &self.tables, &self.config)?;
                let id = self.allocate_id();
                self.enemies.insert(id, enemy);
                self.groups.insert(id, &[Group::Visible, Group::Attackable]);
                debug!(%id, %monster, "enemy spawned");
                Ok(id)
            }
            SpawnKind::Tile(kind) => {
                let insets = &self.config.hitbox_insets;
                let (inset, groups): ((i32, i32), &[Group]) = match kind {
                    TileKind::Boundary => (insets.boundary, &[Group::Obstacle]),
                    TileKind::Grass => (insets.grass, &[Group::Visible, Group::Obstacle, Group::Attackable]),
                    TileKind::Object => (insets.object, &[Group::Visible, Group::Obstacle]),
                };
                let hitbox = rect.inflate(-from_int(inset.0), -from_int(inset.1));
                let id = self.allocate_id();
                self.props.insert(id, Prop { kind, rect, hitbox });
                self.groups.insert(id, groups);
                Ok(id)
            }
        }
    }

    /// Add an attack hitbox to the visible and attack groups.
    pub(crate) fn add_attack(&mut self, attack: Attack) -> EntityId {
        let id = self.allocate_id();
        self.attacks.insert(id, attack);
        self.groups.insert(id, &[Group::Visible, Group::Attack]);
        id
    }

    /// Remove an entity from storage and from every group.
    ///
    /// The player is never despawned; defeat is a level phase.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let removed = self.enemies.remove(&id).is_some()
            || self.props.remove(&id).is_some()
            || self.attacks.remove(&id).is_some();

        if removed {
            self.groups.remove(id);
            if self.current_attack == Some(id) {
                self.current_attack = None;
            }
            debug!(%id, "entity despawned");
        }
        removed
    }

    /// Hitboxes of every obstacle, in id order.
    pub fn obstacle_hitboxes(&self) -> Vec<Rect> {
        self.groups
            .get(Group::Obstacle)
            .iter()
            .filter_map(|id| self.props.get(id).map(|p| p.hitbox))
            .collect()
    }

    /// Snapshot of the attackable set for the combat sweep.
    pub fn attack_targets(&self) -> Vec<Target> {
        self.groups
            .get(Group::Attackable)
            .iter()
            .filter_map(|id| {
                if let Some(enemy) = self.enemies.get(id) {
                    Some(Target { id: *id, rect: enemy.body().rect, kind: TargetKind::Enemy })
                } else {
                    self.props
                        .get(id)
                        .map(|prop| Target { id: *id, rect: prop.rect, kind: TargetKind::Prop })
                }
            })
            .collect()
    }

    /// The player, once spawned.
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref().map(|(_, p)| p)
    }

    /// Mutable player, once spawned.
    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut().map(|(_, p)| p)
    }

    /// Player id, once spawned.
    pub fn player_id(&self) -> Option<EntityId> {
        self.player.as_ref().map(|(id, _)| *id)
    }

    /// Enemy by id.
    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    /// Mutable enemy by id.
    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    /// Live enemies in id order.
    pub fn enemies(&self) -> &BTreeMap<EntityId, Enemy> {
        &self.enemies
    }

    /// Placed tiles in id order.
    pub fn props(&self) -> &BTreeMap<EntityId, Prop> {
        &self.props
    }

    /// Live attack hitboxes in id order.
    pub fn attacks(&self) -> &BTreeMap<EntityId, Attack> {
        &self.attacks
    }

    /// The weapon hitbox, while a swing is open.
    pub fn current_attack(&self) -> Option<EntityId> {
        self.current_attack
    }

    /// Group memberships.
    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// Static tables.
    pub fn tables(&self) -> &GameTables {
        &self.tables
    }

    /// Level configuration.
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// True once the player has been defeated.
    pub fn is_defeated(&self) -> bool {
        matches!(self.phase, LevelPhase::Defeated)
    }

    /// HUD snapshot, if a player exists.
    pub fn hud(&self) -> Option<Hud> {
        let player = self.player()?;
        let stats = player.stats();
        Some(Hud {
            health: player.health(),
            max_health: stats.health,
            energy: to_int(player.energy()),
            max_energy: stats.energy,
            exp: player.exp(),
            weapon_index: player.weapon_index(),
            weapon: self.tables.weapon(player.weapon_index()).name.clone(),
            magic_index: player.magic_index(),
            magic: self.tables.spell(player.magic_index()).name.clone(),
            weapon_just_switched: player.weapon_just_switched(),
            magic_just_switched: player.magic_just_switched(),
        })
    }

    /// Visible sprites, sorted by rect center y (ties by id) for overlap.
    pub fn render_list(&self, now_ms: u64) -> Vec<SpriteView> {
        let mut sprites: Vec<SpriteView> = self
            .groups
            .get(Group::Visible)
            .iter()
            .filter_map(|id| self.sprite_view(*id, now_ms))
            .collect();

        sprites.sort_by_key(|s| (s.rect.center().y, s.id));
        sprites
    }

    fn sprite_view(&self, id: EntityId, now_ms: u64) -> Option<SpriteView> {
        if let Some((player_id, player)) = &self.player {
            if *player_id == id {
                return Some(SpriteView {
                    id,
                    kind: SpriteKind::Player,
                    rect: player.body().rect,
                    animation: player.status.animation_key(),
                    frame: player.body().animator.frame_index(player.animation_len()),
                    alpha: player.alpha(now_ms),
                });
            }
        }

        if let Some(enemy) = self.enemies.get(&id) {
            return Some(SpriteView {
                id,
                kind: SpriteKind::Enemy,
                rect: enemy.body().rect,
                animation: format!("{}/{}", enemy.monster(), enemy.status.as_str()),
                frame: enemy.body().animator.frame_index(enemy.animation_len()),
                alpha: enemy.alpha(now_ms),
            });
        }

        if let Some(prop) = self.props.get(&id) {
            return Some(SpriteView {
                id,
                kind: SpriteKind::Tile(prop.kind),
                rect: prop.rect,
                animation: prop.kind.as_str().to_string(),
                frame: 0,
                alpha: 255,
            });
        }

        self.attacks.get(&id).map(|attack| SpriteView {
            id,
            kind: SpriteKind::Attack,
            rect: attack.rect,
            animation: attack.sprite.clone(),
            frame: 0,
            alpha: 255,
        })
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.now_ms, |hasher| {
            hasher.update_u8(self.phase as u8);
            hasher.update_u32(self.next_id);

            if let Some((id, player)) = &self.player {
                hasher.update_u32(id.0);
                player.hash_into(hasher);
            }

            for (id, enemy) in &self.enemies {
                hasher.update_u32(id.0);
                enemy.hash_into(hasher);
            }

            for (id, prop) in &self.props {
                hasher.update_u32(id.0);
                hasher.update_u8(prop.kind as u8);
                hasher.update_rect(&prop.rect);
                hasher.update_rect(&prop.hitbox);
            }

            for (id, attack) in &self.attacks {
                hasher.update_u32(id.0);
                hasher.update_rect(&attack.rect);
                hasher.update_u8(attack.kind as u8);
                hasher.update_opt_u64(attack.expires_at_ms);
            }
            hasher.update_opt_u64(self.current_attack.map(|id| id.0 as u64));

            for group in Group::ALL {
                let members = self.groups.get(group);
                hasher.update_u32(members.len() as u32);
                for id in members {
                    hasher.update_u32(id.0);
                }
            }
        })
    }

    /// Take pending events in processing order (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.pending_events);
        events.sort();
        events
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> Level {
        Level::new(GameTables::default(), LevelConfig::default()).unwrap()
    }

    #[test]
    fn test_entity_id_ordering() {
        assert!(EntityId(1) < EntityId(2));
        assert_eq!(EntityId(7).to_string(), "#7");
    }

    #[test]
    fn test_spawn_assigns_groups() {
        let mut level = level();
        let player = level.spawn(SpawnKind::Player, FixedVec2::from_ints(0, 0)).unwrap();
        let squid = level.spawn(SpawnKind::Enemy("squid".into()), FixedVec2::from_ints(256, 0)).unwrap();
        let wall = level.spawn(SpawnKind::Tile(TileKind::Boundary), FixedVec2::from_ints(0, 128)).unwrap();
        let grass = level.spawn(SpawnKind::Tile(TileKind::Grass), FixedVec2::from_ints(64, 128)).unwrap();

        let groups = level.groups();
        assert!(groups.contains(Group::Visible, player));
        assert!(!groups.contains(Group::Attackable, player));
        assert!(groups.contains(Group::Attackable, squid));
        assert!(!groups.contains(Group::Visible, wall));
        assert!(groups.contains(Group::Obstacle, wall));
        assert!(groups.contains(Group::Attackable, grass));
        assert!(groups.contains(Group::Obstacle, grass));

        assert_eq!(level.phase, LevelPhase::Playing);
        assert_eq!(level.obstacle_hitboxes().len(), 2);
    }

    #[test]
    fn test_unknown_monster_fails_without_side_effects() {
        let mut level = level();
        let err = level.spawn(SpawnKind::Enemy("dragon".into()), FixedVec2::ZERO);
        assert_eq!(err, Err(ContentError::UnknownMonster("dragon".into())));
        assert!(level.enemies().is_empty());
        let id = level.spawn(SpawnKind::Tile(TileKind::Grass), FixedVec2::ZERO).unwrap();
        assert_eq!(id, EntityId(0));
    }

    #[test]
    fn test_second_player_rejected() {
        let mut level = level();
        level.spawn(SpawnKind::Player, FixedVec2::ZERO).unwrap();
        assert_eq!(
            level.spawn(SpawnKind::Player, FixedVec2::ZERO),
            Err(ContentError::PlayerAlreadySpawned)
        );
    }

    #[test]
    fn test_spawn_outside_world_is_rejected() {
        let mut level = level();
        let edge = WORLD_EXTENT_PX - 64;
        assert!(level.spawn(SpawnKind::Tile(TileKind::Boundary), FixedVec2::from_ints(edge, 0)).is_ok());
        assert_eq!(
            level.spawn(SpawnKind::Player, FixedVec2::from_ints(edge + 1, 0)),
            Err(ContentError::SpawnOutOfBounds { x: edge + 1, y: 0 })
        );
        // object rect starts a tile above its cell
        let top = -WORLD_EXTENT_PX;
        assert_eq!(
            level.spawn(SpawnKind::Tile(TileKind::Object), FixedVec2::from_ints(0, top)),
            Err(ContentError::SpawnOutOfBounds { x: 0, y: top - 64 })
        );
        assert!(level.player().is_none());
        assert_eq!(level.phase, LevelPhase::Waiting);
        assert_eq!(level.props().len(), 1);
    }

    #[test]
    fn test_invalid_tile_size() {
        for tile_size in [0, -64, WORLD_EXTENT_PX] {
            let config = LevelConfig { tile_size, ..LevelConfig::default() };
            assert_eq!(
                Level::new(GameTables::default(), config).unwrap_err(),
                ContentError::InvalidTileSize(tile_size)
            );
        }
    }

    #[test]
    fn test_despawn_leaves_every_group() {
        let mut level = level();
        let grass = level.spawn(SpawnKind::Tile(TileKind::Grass), FixedVec2::ZERO).unwrap();
        assert!(level.despawn(grass));
        for group in Group::ALL {
            assert!(!level.groups().contains(group, grass));
        }
        assert!(!level.despawn(grass));
    }

    #[test]
    fn test_object_is_two_tiles_tall() {
        let mut level = level();
        let id = level.spawn(SpawnKind::Tile(TileKind::Object), FixedVec2::from_ints(64, 128)).unwrap();
        let prop = level.props()[&id];
        assert_eq!(prop.rect, Rect::from_ints(64, 64, 64, 128));
        assert_eq!(prop.hitbox.h, 88 << 16);
        assert_eq!(prop.hitbox.center(), prop.rect.center());
    }

    #[test]
    fn test_render_list_is_y_sorted() {
        let mut level = level();
        level.spawn(SpawnKind::Tile(TileKind::Grass), FixedVec2::from_ints(0, 300)).unwrap();
        level.spawn(SpawnKind::Player, FixedVec2::from_ints(0, 100)).unwrap();
        level.spawn(SpawnKind::Enemy("spirit".into()), FixedVec2::from_ints(0, 200)).unwrap();
        level.spawn(SpawnKind::Tile(TileKind::Boundary), FixedVec2::from_ints(0, 0)).unwrap();

        let sprites = level.render_list(0);
        assert_eq!(sprites.len(), 3);
        let kinds: Vec<_> = sprites.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SpriteKind::Player, SpriteKind::Enemy, SpriteKind::Tile(TileKind::Grass)]
        );
        assert_eq!(sprites[0].animation, "down_idle");
        assert_eq!(sprites[1].animation, "spirit/idle");
    }

    #[test]
    fn test_hud_snapshot() {
        let mut level = level();
        assert!(level.hud().is_none());
        level.spawn(SpawnKind::Player, FixedVec2::ZERO).unwrap();
        let hud = level.hud().unwrap();
        assert_eq!(hud.health, 100);
        assert_eq!(hud.max_energy, 60);
        assert_eq!(hud.energy, 60);
        assert_eq!(hud.weapon, "sword");
        assert_eq!(hud.magic, "flame");
        assert!(!hud.weapon_just_switched);
    }

    #[test]
    fn test_level_hash_determinism() {
        let build = || {
            let mut level = level();
            level.spawn(SpawnKind::Player, FixedVec2::from_ints(64, 64)).unwrap();
            level.spawn(SpawnKind::Enemy("raccoon".into()), FixedVec2::from_ints(320, 64)).unwrap();
            level.spawn(SpawnKind::Tile(TileKind::Grass), FixedVec2::from_ints(128, 128)).unwrap();
            level
        };

        let a = build();
        let mut b = build();
        assert_eq!(a.compute_hash(), b.compute_hash());

        let grass = *b.props().keys().next().unwrap();
        b.despawn(grass);
        assert_ne!(a.compute_hash(), b.compute_hash());
    }
}
