//! Movable Entities
//!
//! The motion and collision primitive shared by the player and enemies.
//!
//! Every entity carries a visual rect and a smaller hitbox. Movement is
//! axis-separated: the hitbox moves along X and is pushed out of any
//! obstacle it now overlaps, then the same happens along Y, and finally
//! the rect is re-centered on the hitbox. Resolving each axis fully keeps
//! diagonal moves from tunnelling through corners; the price is that an
//! entity can occasionally stick on some corner geometries.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, from_int, to_int};
use crate::core::hash::StateHasher;
use crate::core::rect::Rect;
use crate::core::vec2::FixedVec2;

// =============================================================================
// ANIMATION
// =============================================================================

/// Fractional frame cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animator {
    /// Current frame position (fractional)
    frame: Fixed,
    /// Frames advanced per tick
    speed: Fixed,
}

impl Animator {
    /// Cursor at frame 0, advancing `speed` frames per tick.
    pub fn new(speed: Fixed) -> Self {
        Self { frame: 0, speed }
    }

    /// Restart the current sequence.
    #[inline]
    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// Advance one tick through a sequence of `len` frames.
    ///
    /// Wraps by modulo. Returns true when the cursor passed the end of the
    /// sequence this tick. An empty sequence pins the cursor at 0.
    pub fn advance(&mut self, len: u32) -> bool {
        if len == 0 {
            self.frame = 0;
            return false;
        }
        let end = from_int(len as i32);
        self.frame += self.speed;
        if self.frame >= end {
            self.frame %= end;
            true
        } else {
            false
        }
    }

    /// Whole frame index, always `< len` (0 for an empty sequence).
    pub fn frame_index(&self, len: u32) -> u32 {
        if len == 0 {
            return 0;
        }
        (to_int(self.frame).max(0) as u32) % len
    }

    /// Fractional frame cursor.
    #[inline]
    pub fn frame(&self) -> Fixed {
        self.frame
    }
}

/// Flicker alpha for invulnerable sprites.
///
/// A pure function of the clock, so every flickering entity is in phase.
/// Render-side only; the simulation never reads it.
pub fn wave_value(now_ms: u64) -> u8 {
    if (now_ms as f64).sin() >= 0.0 {
        255
    } else {
        0
    }
}

// =============================================================================
// BODY
// =============================================================================

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Position, hitbox and motion state of one entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    /// Visual box (sprite placement)
    pub rect: Rect,
    /// Collision box, centered on `rect`
    pub hitbox: Rect,
    /// Desired motion; normalized by `move_by`, zero when still
    pub direction: FixedVec2,
    /// Animation cursor
    pub animator: Animator,
}

impl Body {
    /// Body whose hitbox is `rect` shrunk by `inset` on each axis.
    pub fn new(rect: Rect, inset: FixedVec2, animation_speed: Fixed) -> Self {
        Self {
            rect,
            hitbox: rect.inflate(-inset.x, -inset.y),
            direction: FixedVec2::ZERO,
            animator: Animator::new(animation_speed),
        }
    }

    /// Move `speed` pixels along `direction`, resolving against `obstacles`.
    pub fn move_by(&mut self, speed: Fixed, obstacles: &[Rect]) {
        self.direction = self.direction.normalize();
        let step = self.direction.scale(speed);

        self.hitbox.x += step.x;
        self.resolve(Axis::Horizontal, obstacles);
        self.hitbox.y += step.y;
        self.resolve(Axis::Vertical, obstacles);

        self.rect.set_center(self.hitbox.center());
    }

    /// Push the hitbox out of every overlapping obstacle along one axis.
    ///
    /// A zero component on that axis leaves overlaps untouched.
    fn resolve(&mut self, axis: Axis, obstacles: &[Rect]) {
        for obstacle in obstacles {
            if !obstacle.intersects(&self.hitbox) {
                continue;
            }
            match axis {
                Axis::Horizontal => {
                    if self.direction.x > 0 {
                        self.hitbox.set_right(obstacle.left());
                    } else if self.direction.x < 0 {
                        self.hitbox.set_left(obstacle.right());
                    }
                }
                Axis::Vertical => {
                    if self.direction.y > 0 {
                        self.hitbox.set_bottom(obstacle.top());
                    } else if self.direction.y < 0 {
                        self.hitbox.set_top(obstacle.bottom());
                    }
                }
            }
        }
    }

    /// Center of the sprite rect.
    #[inline]
    pub fn center(&self) -> FixedVec2 {
        self.rect.center()
    }

    pub(crate) fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_rect(&self.rect);
        hasher.update_rect(&self.hitbox);
        hasher.update_vec2(self.direction);
        hasher.update_fixed(self.animator.frame());
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Anything that walks through the level.
pub trait Movable {
    /// Movement state.
    fn body(&self) -> &Body;

    /// Mutable movement state.
    fn body_mut(&mut self) -> &mut Body;

    /// See [`Body::move_by`].
    fn move_by(&mut self, speed: Fixed, obstacles: &[Rect]) {
        self.body_mut().move_by(speed, obstacles);
    }

    /// Center of the sprite rect.
    fn center(&self) -> FixedVec2 {
        self.body().center()
    }
}

/// Source of incoming damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DamageKind {
    /// Player weapon swing
    Weapon = 0,
    /// Spell hitbox
    Magic = 1,
}

/// One incoming hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    /// Where the hit came from (drives knockback)
    pub origin: FixedVec2,
    /// Weapon or spell
    pub kind: DamageKind,
    /// Health to take before any kind-specific rule
    pub amount: i32,
}

/// Anything with health and an invulnerability window.
pub trait Damageable {
    /// Apply a hit at `now_ms`. Returns false if the hit was ignored
    /// because the target was still invulnerable.
    fn receive_damage(&mut self, hit: &Hit, now_ms: u64) -> bool;

    /// False during the invulnerability window.
    fn is_vulnerable(&self) -> bool;

    /// Current health.
    fn health(&self) -> i32;

    /// True once health has run out.
    fn is_dead(&self) -> bool {
        self.health() <= 0
    }
}

/// True once `duration_ms` has fully elapsed since `since_ms`.
#[inline]
pub(crate) fn elapsed(now_ms: u64, since_ms: u64, duration_ms: u64) -> bool {
    now_ms.saturating_sub(since_ms) >= duration_ms
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::{to_fixed, FIXED_ONE};
    use proptest::prelude::*;

    fn body_at(x: i32, y: i32) -> Body {
        Body::new(Rect::from_ints(x, y, 64, 64), FixedVec2::ZERO, to_fixed(0.15))
    }

    #[test]
    fn test_straight_move_without_obstacles() {
        let mut body = body_at(100, 100);
        let before = body.hitbox.center();
        body.direction = FixedVec2::RIGHT;
        body.move_by(from_int(5), &[]);

        let after = body.hitbox.center();
        assert_eq!(after.x, before.x + from_int(5));
        assert_eq!(after.y, before.y);
        assert_eq!(body.rect.center(), body.hitbox.center());
    }

    #[test]
    fn test_direction_is_normalized_before_moving() {
        let mut body = body_at(0, 0);
        body.direction = FixedVec2::from_ints(10, 0);
        body.move_by(from_int(3), &[]);
        assert_eq!(body.direction, FixedVec2::RIGHT);
        assert_eq!(body.hitbox.left(), from_int(3));
    }

    #[test]
    fn test_zero_direction_does_not_move() {
        let mut body = body_at(10, 10);
        let before = body.clone();
        body.move_by(from_int(5), &[Rect::from_ints(0, 0, 20, 20)]);
        assert_eq!(body, before);
    }

    #[test]
    fn test_blocked_axis_clamps_to_obstacle_edge() {
        let mut body = body_at(0, 0);
        body.direction = FixedVec2::RIGHT;
        let wall = Rect::from_ints(66, 0, 64, 64);
        body.move_by(from_int(5), &[wall]);
        assert_eq!(body.hitbox.right(), wall.left());

        body.direction = FixedVec2::LEFT;
        let left_wall = Rect::from_ints(-66, 0, 64, 64);
        body.move_by(from_int(10), &[left_wall]);
        assert_eq!(body.hitbox.left(), left_wall.right());
    }

    #[test]
    fn test_diagonal_into_l_shape_slides_on_free_axis() {
        // Wall to the right only; moving down-right must keep sliding down.
        let mut body = body_at(0, 0);
        let wall = Rect::from_ints(65, -200, 64, 400);
        body.direction = FixedVec2::from_ints(1, 1);
        let start = body.hitbox;

        for _ in 0..10 {
            body.move_by(from_int(4), &[wall]);
        }

        assert_eq!(body.hitbox.right(), wall.left());
        assert!(body.hitbox.top() > start.top() + from_int(20));
    }

    #[test]
    fn test_l_shaped_corner_blocks_both_axes() {
        // Wall to the right plus floor below: diagonal push ends in the corner.
        let mut body = body_at(0, 0);
        let wall = Rect::from_ints(70, -200, 64, 400);
        let floor = Rect::from_ints(-200, 70, 270, 64);
        body.direction = FixedVec2::from_ints(1, 1);

        for _ in 0..20 {
            body.move_by(from_int(4), &[wall, floor]);
        }

        assert_eq!(body.hitbox.right(), wall.left());
        assert_eq!(body.hitbox.bottom(), floor.top());
    }

    #[test]
    fn test_hitbox_inset_keeps_center() {
        let body = Body::new(Rect::from_ints(0, 0, 64, 64), FixedVec2::from_ints(0, 26), FIXED_ONE);
        assert_eq!(body.hitbox.h, from_int(38));
        assert_eq!(body.hitbox.w, from_int(64));
        assert_eq!(body.hitbox.center(), body.rect.center());
    }

    #[test]
    fn test_animator_wraps_and_reports_cycle() {
        let mut anim = Animator::new(to_fixed(0.5));
        assert!(!anim.advance(2));
        assert_eq!(anim.frame_index(2), 0);
        assert!(!anim.advance(2));
        assert_eq!(anim.frame_index(2), 1);
        assert!(!anim.advance(2));
        assert!(anim.advance(2));
        assert_eq!(anim.frame_index(2), 0);
    }

    #[test]
    fn test_animator_empty_sequence() {
        let mut anim = Animator::new(FIXED_ONE);
        assert!(!anim.advance(0));
        assert_eq!(anim.frame_index(0), 0);
    }

    #[test]
    fn test_wave_value_is_binary_and_phase_locked() {
        for t in [0u64, 1, 2, 3, 4, 5, 1000, 123_456] {
            let v = wave_value(t);
            assert!(v == 0 || v == 255);
            assert_eq!(v, wave_value(t));
        }
        assert_eq!(wave_value(0), 255);
        assert_eq!(wave_value(4), 0);
    }

    #[test]
    fn test_elapsed_boundary() {
        assert!(!elapsed(1299, 1000, 300));
        assert!(elapsed(1300, 1000, 300));
    }

    proptest! {
        #[test]
        fn prop_frame_index_in_range(speed in 1i32..200_000, len in 1u32..12, ticks in 0usize..300) {
            let mut anim = Animator::new(speed);
            for _ in 0..ticks {
                anim.advance(len);
                prop_assert!(anim.frame_index(len) < len);
                prop_assert!(anim.frame() < from_int(len as i32));
            }
        }
    }
}
