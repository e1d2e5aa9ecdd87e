//! Q16.16 Fixed-Point Arithmetic
//!
//! Deterministic fixed-point math for the simulation. Positions, directions,
//! speeds and energy are all stored as `Fixed`; timers are integer milliseconds.
//!
//! ## Format: Q16.16
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bit Layout: Q16.16 (32-bit signed integer)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  [S][IIIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]                    │
//! │   │  └──── 16 bits ────┘└──── 16 bits ────┘                 │
//! │   └─ Sign bit                                               │
//! │                                                             │
//! │  Range: -32768.0 to +32767.99998 (approx)                   │
//! │  Precision: 1/65536 ≈ 0.000015 pixels                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! World coordinates are pixels. Levels are loaded within half the range
//! on each axis, but *products* of pixel distances do not fit, so squared
//! lengths are computed in a widened Q32.32 `i64` (see [`fixed_sqrt_wide`]).

/// Q16.16 fixed-point number stored as i32.
/// 16 bits integer, 16 bits fractional.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE; // 65536

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1; // 32768

/// Maximum positive value
pub const FIXED_MAX: Fixed = i32::MAX;

// =============================================================================
// CORE OPERATIONS (All deterministic)
// =============================================================================

/// Convert a compile-time float to fixed-point.
///
/// # Warning
/// Only use at compile-time or initialization. NEVER in tick loop.
///
/// # Example
/// ```
/// use breath::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i32 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert an integer to fixed-point.
#[inline]
pub const fn from_int(i: i32) -> Fixed {
    i << FIXED_SCALE
}

/// Truncate to whole pixels (toward negative infinity).
#[inline]
pub fn to_int(f: Fixed) -> i32 {
    f >> FIXED_SCALE
}

/// Multiply two fixed-point numbers.
///
/// Uses i64 intermediate to prevent overflow, then truncates.
#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    let wide = (a as i64) * (b as i64);
    (wide >> FIXED_SCALE) as Fixed
}

/// Divide two fixed-point numbers.
///
/// Pre-shifts numerator to maintain precision.
/// Returns 0 on divide-by-zero.
#[inline]
pub fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    if b == 0 {
        return 0;
    }
    let wide = (a as i64) << FIXED_SCALE;
    (wide / b as i64) as Fixed
}

/// Square root of a widened Q32.32 value, returning Q16.16.
///
/// `sqrt(v * 2^32) == sqrt(v) * 2^16`, so an integer square root of the
/// raw Q32.32 bits is exactly the Q16.16 result (floored).
#[inline]
pub fn fixed_sqrt_wide(x: i64) -> Fixed {
    if x <= 0 {
        return 0;
    }
    let root = isqrt_u64(x as u64);
    root.min(FIXED_MAX as u64) as Fixed
}

/// Floor integer square root.
fn isqrt_u64(n: u64) -> u64 {
    if n < 2 {
        return n;
    }

    // Start above the root so Newton's iteration decreases monotonically.
    let bits = 64 - n.leading_zeros();
    let mut x = 1u64 << bits.div_ceil(2);
    loop {
        let y = (x + n / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Minimum of two fixed-point numbers.
#[inline]
pub fn fixed_min(a: Fixed, b: Fixed) -> Fixed {
    if a < b { a } else { b }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_constants() {
        assert_eq!(FIXED_ONE, 65536);
        assert_eq!(FIXED_HALF, 32768);
        assert_eq!(FIXED_SCALE, 16);
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(1.0), FIXED_ONE);
        assert_eq!(to_fixed(0.5), FIXED_HALF);
        assert_eq!(to_fixed(2.0), FIXED_ONE * 2);
        assert_eq!(to_fixed(-1.0), -FIXED_ONE);
        assert_eq!(from_int(64), 64 * FIXED_ONE);
    }

    #[test]
    fn test_to_int_truncates() {
        assert_eq!(to_int(to_fixed(3.75)), 3);
        assert_eq!(to_int(from_int(-2)), -2);
    }

    #[test]
    fn test_fixed_mul() {
        assert_eq!(fixed_mul(to_fixed(2.0), to_fixed(3.0)), to_fixed(6.0));
        assert_eq!(fixed_mul(FIXED_HALF, FIXED_HALF), to_fixed(0.25));
        assert_eq!(fixed_mul(to_fixed(-2.0), to_fixed(3.0)), to_fixed(-6.0));
    }

    #[test]
    fn test_fixed_div() {
        assert_eq!(fixed_div(to_fixed(6.0), to_fixed(2.0)), to_fixed(3.0));
        assert_eq!(fixed_div(FIXED_ONE, to_fixed(4.0)), to_fixed(0.25));

        // Divide by zero returns 0
        assert_eq!(fixed_div(FIXED_ONE, 0), 0);
    }

    #[test]
    fn test_fixed_sqrt_wide_exact_squares() {
        // 200px: 200^2 in Q32.32
        let wide = (200i64 * 200) << 32;
        assert_eq!(fixed_sqrt_wide(wide), from_int(200));

        // 1.0
        assert_eq!(fixed_sqrt_wide(1i64 << 32), FIXED_ONE);

        assert_eq!(fixed_sqrt_wide(0), 0);
        assert_eq!(fixed_sqrt_wide(-5), 0);
    }

    #[test]
    fn test_isqrt_floor() {
        for n in [2u64, 3, 15, 16, 17, 99, 100, 101, u32::MAX as u64, u64::MAX] {
            let r = isqrt_u64(n);
            assert!(r.checked_mul(r).is_some_and(|sq| sq <= n));
            assert!((r + 1).checked_mul(r + 1).map_or(true, |sq| sq > n));
        }
    }

    #[test]
    fn test_fixed_min() {
        assert_eq!(fixed_min(from_int(5), from_int(3)), from_int(3));
        assert_eq!(fixed_min(-FIXED_ONE, 0), -FIXED_ONE);
    }

    #[test]
    fn test_fixed_determinism() {
        for _ in 0..1000 {
            let a = 12345678;
            let b = 87654321;

            assert_eq!(fixed_mul(a, b), fixed_mul(a, b));
            assert_eq!(fixed_div(a, b), fixed_div(a, b));
            assert_eq!(fixed_sqrt_wide(a as i64 * b as i64), fixed_sqrt_wide(a as i64 * b as i64));
        }
    }
}
