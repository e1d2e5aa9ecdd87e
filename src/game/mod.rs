//! Game Logic Module
//!
//! All level simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `input`: Held keys, input recording for replay
//! - `status`: Facing/activity pair and enemy perception state
//! - `entity`: Shared body, axis-separated movement, damage intake
//! - `tables`: Player, weapon, magic and monster stats
//! - `player`: Player controller
//! - `enemy`: Enemy controller
//! - `command`: Intents entities hand to the level
//! - `weapon`, `magic`: Attack hitbox placement and spell resolution
//! - `combat`: Attack sweep against attackables
//! - `map`: CSV tile layers
//! - `state`: The level, its entities and groups
//! - `tick`: Simulation loop and replay
//! - `events`: Game events for HUD and verification

pub mod input;
pub mod status;
pub mod entity;
pub mod error;
pub mod tables;
pub mod command;
pub mod player;
pub mod enemy;
pub mod weapon;
pub mod magic;
pub mod combat;
pub mod map;
pub mod state;
pub mod tick;
pub mod events;

// Re-export key types
pub use input::{InputFrame, InputDelta, InputRecording};
pub use state::{EntityId, Level, LevelPhase, SpawnKind, TileKind, Group, Hud, SpriteView};
pub use tick::{tick, replay, LevelConfig, TickResult};
pub use events::{GameEvent, GameEventData};
pub use error::ContentError;
pub use tables::GameTables;
