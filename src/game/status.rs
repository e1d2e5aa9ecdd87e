//! Entity Status
//!
//! Player status is a facing/activity pair; the animation key is derived
//! from both fields, so there is no way to build an illegal combination
//! such as "down_idle_attack".

use serde::{Serialize, Deserialize};
use crate::core::vec2::FixedVec2;

/// Direction the player sprite looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Facing {
    /// Toward the top of the screen
    Up = 0,
    /// Toward the bottom of the screen
    #[default]
    Down = 1,
    /// Toward the left edge
    Left = 2,
    /// Toward the right edge
    Right = 3,
}

impl Facing {
    /// Unit vector in screen space (+Y down).
    pub fn unit(self) -> FixedVec2 {
        match self {
            Facing::Up => FixedVec2::UP,
            Facing::Down => FixedVec2::DOWN,
            Facing::Left => FixedVec2::LEFT,
            Facing::Right => FixedVec2::RIGHT,
        }
    }

    /// Animation key prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

/// What the player is doing while facing somewhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Activity {
    /// Walking, or about to
    Moving = 0,
    /// Standing still
    #[default]
    Idle = 1,
    /// Inside an attack or cast window
    Attacking = 2,
}

/// Composite player status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Status {
    /// Where the sprite looks
    pub facing: Facing,
    /// What it is doing
    pub activity: Activity,
}

impl Status {
    /// Status from its two parts.
    pub const fn new(facing: Facing, activity: Activity) -> Self {
        Self { facing, activity }
    }

    /// Animation key: `"down"`, `"down_idle"` or `"down_attack"`.
    pub fn animation_key(&self) -> String {
        match self.activity {
            Activity::Moving => self.facing.as_str().to_string(),
            Activity::Idle => format!("{}_idle", self.facing.as_str()),
            Activity::Attacking => format!("{}_attack", self.facing.as_str()),
        }
    }

    /// True for any attacking status.
    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.activity == Activity::Attacking
    }
}

/// Enemy perception state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EnemyStatus {
    /// Player out of notice radius
    #[default]
    Idle = 0,
    /// Chasing the player
    Move = 1,
    /// Player within attack radius
    Attack = 2,
}

impl EnemyStatus {
    /// Animation key.
    pub fn as_str(self) -> &'static str {
        match self {
            EnemyStatus::Idle => "idle",
            EnemyStatus::Move => "move",
            EnemyStatus::Attack => "attack",
        }
    }
}
