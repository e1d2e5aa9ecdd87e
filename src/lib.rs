//! # Breath of Python Core
//!
//! Deterministic entity simulation for Breath of Python: movement with
//! axis-separated collision, the player and enemy controllers, and combat.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BREATH CORE                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - 2D vector with fixed-point                │
//! │  ├── rect.rs     - Axis-aligned rectangles                   │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── entity.rs   - Movement, collision, damage intake        │
//! │  ├── player.rs   - Player controller                         │
//! │  ├── enemy.rs    - Enemy perception and actions              │
//! │  ├── combat.rs   - Attack sweep                              │
//! │  ├── state.rs    - Level, entities and groups                │
//! │  └── tick.rs     - Simulation loop and replay                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No floating-point arithmetic in simulation logic
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time dependencies; the caller passes the clock in
//!
//! Given identical inputs and clock values, a level produces
//! **identical results** on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use core::vec2::FixedVec2;
pub use core::rect::Rect;
pub use game::input::{InputFrame, InputRecording};
pub use game::state::{EntityId, Level, LevelPhase};
pub use game::tick::{tick, LevelConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
