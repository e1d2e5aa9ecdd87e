//! Weapon Hitbox Placement
//!
//! The weapon hitbox sits against the side of the player rect it faces,
//! shifted by a fixed per-axis offset so the blade lines up with the hand.

use crate::core::rect::Rect;
use crate::core::vec2::FixedVec2;
use crate::game::status::Facing;
use crate::game::tables::WeaponStats;
use crate::game::tick::LevelConfig;

/// Hitbox size for a weapon held toward `facing`.
pub fn weapon_size(weapon: &WeaponStats, facing: Facing) -> FixedVec2 {
    match facing {
        Facing::Left | Facing::Right => FixedVec2::from_ints(weapon.length, weapon.width),
        Facing::Up | Facing::Down => FixedVec2::from_ints(weapon.width, weapon.length),
    }
}

/// Hitbox of `weapon` swung by a player occupying `player_rect`.
pub fn weapon_hitbox(
    player_rect: &Rect,
    facing: Facing,
    weapon: &WeaponStats,
    config: &LevelConfig,
) -> Rect {
    let size = weapon_size(weapon, facing);
    let (hx, hy) = config.weapon_offset_horizontal;
    let (vx, vy) = config.weapon_offset_vertical;
    let horizontal = FixedVec2::from_ints(hx, hy);
    let vertical = FixedVec2::from_ints(vx, vy);

    match facing {
        Facing::Right => Rect::with_mid_left(player_rect.mid_right() + horizontal, size),
        Facing::Left => Rect::with_mid_right(player_rect.mid_left() + horizontal, size),
        Facing::Down => Rect::with_mid_top(player_rect.mid_bottom() + vertical, size),
        Facing::Up => Rect::with_mid_bottom(player_rect.mid_top() + vertical, size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::from_int;
    use crate::game::tables::GameTables;

    fn sword() -> WeaponStats {
        GameTables::default().weapons[0].clone()
    }

    #[test]
    fn test_hitbox_touches_facing_side() {
        let config = LevelConfig::default();
        let player = Rect::from_ints(100, 100, 64, 64);

        let right = weapon_hitbox(&player, Facing::Right, &sword(), &config);
        assert_eq!(right.left(), player.right());
        assert_eq!(right.center().y, player.center().y + from_int(16));

        let left = weapon_hitbox(&player, Facing::Left, &sword(), &config);
        assert_eq!(left.right(), player.left());
        assert_eq!(left.center().y, player.center().y + from_int(16));

        let up = weapon_hitbox(&player, Facing::Up, &sword(), &config);
        assert_eq!(up.bottom(), player.top());
        assert_eq!(up.center().x, player.center().x - from_int(10));

        let down = weapon_hitbox(&player, Facing::Down, &sword(), &config);
        assert_eq!(down.top(), player.bottom());
        assert_eq!(down.center().x, player.center().x - from_int(10));
    }

    #[test]
    fn test_vertical_swing_is_rotated() {
        let weapon = sword();
        assert_eq!(weapon_size(&weapon, Facing::Right), FixedVec2::from_ints(40, 20));
        assert_eq!(weapon_size(&weapon, Facing::Up), FixedVec2::from_ints(20, 40));
    }
}
