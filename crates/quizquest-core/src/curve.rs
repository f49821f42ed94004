//! Player level curve.
//!
//! Reaching level `L + 1` from level `L` costs `base_xp + increment_xp *
//! (L - 1)` XP, so the cumulative threshold of level `L` is
//!
//! ```text
//! T(L) = (L - 1) * base_xp + increment_xp * (L - 1) * (L - 2) / 2
//! ```
//!
//! With the defaults (100, 50) the thresholds are 0, 100, 250, 450, 700,
//! 1000, ... Both queries evaluate the closed form in `u128` and never
//! iterate level by level, so they stay cheap for any XP value.

use rust_decimal::Decimal;

use crate::config::CurveConfig;
use crate::error::CoreError;

/// The first player level.
pub const FIRST_LEVEL: u64 = 1;

/// Maps accumulated XP to a player level and the next level's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCurve {
    base_xp: u64,
    increment_xp: u64,
}

impl LevelCurve {
    /// Build a curve from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `base_xp` is zero, which would
    /// make every level free.
    pub fn new(config: &CurveConfig) -> Result<Self, CoreError> {
        if config.base_xp == 0 {
            return Err(CoreError::InvalidConfig {
                reason: "curve.base_xp must be greater than zero".to_owned(),
            });
        }
        Ok(Self {
            base_xp: config.base_xp,
            increment_xp: config.increment_xp,
        })
    }

    /// The default curve: 100 XP for level 2, each step 50 XP dearer.
    pub const fn standard() -> Self {
        Self {
            base_xp: 100,
            increment_xp: 50,
        }
    }

    /// XP cost of the first level-up.
    pub const fn base_xp(&self) -> u64 {
        self.base_xp
    }

    /// Extra XP each later level-up costs over the previous one.
    pub const fn increment_xp(&self) -> u64 {
        self.increment_xp
    }

    /// Cumulative XP needed to reach `level`, or `None` if it exceeds
    /// `u64::MAX`. Levels 0 and 1 both need no XP.
    pub fn threshold_for_level(&self, level: u64) -> Option<u64> {
        self.threshold_wide(level)
            .and_then(|threshold| u64::try_from(threshold).ok())
    }

    /// Player level for `xp`: the highest level whose threshold is at most
    /// `xp`.
    ///
    /// Every level-up costs at least one XP, so the level never exceeds
    /// `xp + 1` and always fits in `u64`.
    pub fn player_level(&self, xp: u64) -> u64 {
        let wide = u128::from(xp);
        let reached = |level: u64| self.threshold_wide(level).is_some_and(|t| t <= wide);

        let mut low = FIRST_LEVEL;
        let mut high = xp.saturating_add(1);
        while low < high {
            let mid = low.saturating_add(high.saturating_sub(low).div_ceil(2));
            if reached(mid) {
                low = mid;
            } else {
                high = mid.saturating_sub(1);
            }
        }
        low
    }

    /// XP threshold at which the player level would next increase.
    ///
    /// Always greater than `xp` unless the next threshold does not fit in
    /// `u64`, in which case this saturates at `u64::MAX` and the level can
    /// no longer rise.
    pub fn xp_for_next_level(&self, xp: u64) -> u64 {
        self.player_level(xp)
            .checked_add(1)
            .and_then(|next| self.threshold_for_level(next))
            .unwrap_or(u64::MAX)
    }

    /// Progress-bar fraction `xp / xp_for_next_level(xp)`, capped at one.
    pub fn level_progress(&self, xp: u64) -> Decimal {
        let next = self.xp_for_next_level(xp);
        if next == 0 {
            return Decimal::ONE;
        }
        Decimal::from(xp)
            .checked_div(Decimal::from(next))
            .unwrap_or(Decimal::ONE)
            .min(Decimal::ONE)
    }

    /// `T(level)` in `u128`; `None` only when even `u128` overflows.
    fn threshold_wide(&self, level: u64) -> Option<u128> {
        let steps = u128::from(level.saturating_sub(1));
        let triangle = steps
            .checked_mul(steps.saturating_sub(1))
            .and_then(|product| product.checked_div(2))?;
        let linear = steps.checked_mul(u128::from(self.base_xp))?;
        let ramp = triangle.checked_mul(u128::from(self.increment_xp))?;
        linear.checked_add(ramp)
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn standard_thresholds() {
        let curve = LevelCurve::standard();
        let thresholds: Vec<Option<u64>> = (1..=6).map(|l| curve.threshold_for_level(l)).collect();
        assert_eq!(
            thresholds,
            vec![Some(0), Some(100), Some(250), Some(450), Some(700), Some(1000)]
        );
    }

    #[test]
    fn zero_xp_is_level_one() {
        let curve = LevelCurve::standard();
        assert_eq!(curve.player_level(0), 1);
        assert_eq!(curve.xp_for_next_level(0), 100);
    }

    #[test]
    fn levels_change_exactly_at_thresholds() {
        let curve = LevelCurve::standard();
        assert_eq!(curve.player_level(99), 1);
        assert_eq!(curve.player_level(100), 2);
        assert_eq!(curve.player_level(249), 2);
        assert_eq!(curve.player_level(250), 3);
        assert_eq!(curve.player_level(1000), 6);
    }

    #[test]
    fn next_level_is_consistent_for_small_xp() {
        let curve = LevelCurve::standard();
        for xp in 0..5_000_u64 {
            let level = curve.player_level(xp);
            let next = curve.xp_for_next_level(xp);
            assert!(next > xp, "next threshold {next} not above {xp}");
            assert_eq!(curve.player_level(next.saturating_sub(1)), level);
            assert!(curve.player_level(next) > level);
        }
    }

    #[test]
    fn next_level_is_consistent_for_large_xp() {
        let curve = LevelCurve::standard();
        for xp in [1_000_000_u64, 123_456_789, 1 << 40, 1 << 62] {
            let level = curve.player_level(xp);
            let next = curve.xp_for_next_level(xp);
            assert!(next > xp);
            assert_eq!(curve.player_level(next.saturating_sub(1)), level);
            assert!(curve.player_level(next) > level);
        }
    }

    #[test]
    fn player_level_is_monotonic() {
        let curve = LevelCurve::standard();
        let mut previous = curve.player_level(0);
        for xp in (0..100_000_u64).step_by(37) {
            let level = curve.player_level(xp);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn max_xp_does_not_overflow() {
        let curve = LevelCurve::standard();
        let level = curve.player_level(u64::MAX);
        assert!(level > 1);
        assert_eq!(curve.xp_for_next_level(u64::MAX), u64::MAX);
    }

    #[test]
    fn flat_curve_is_linear() {
        let config = CurveConfig {
            base_xp: 10,
            increment_xp: 0,
        };
        let curve = LevelCurve::new(&config).unwrap();
        assert_eq!(curve.player_level(35), 4);
        assert_eq!(curve.xp_for_next_level(35), 40);
    }

    #[test]
    fn cheap_flat_curve_passes_u32_levels() {
        let config = CurveConfig {
            base_xp: 1,
            increment_xp: 0,
        };
        let curve = LevelCurve::new(&config).unwrap();
        let xp = 5_000_000_000_u64;
        let level = curve.player_level(xp);
        assert_eq!(level, 5_000_000_001);

        let next = curve.xp_for_next_level(xp);
        assert_eq!(next, 5_000_000_001);
        assert_eq!(curve.player_level(next.saturating_sub(1)), level);
        assert!(curve.player_level(next) > level);
    }

    #[test]
    fn cheap_flat_curve_is_consistent_near_max_xp() {
        let config = CurveConfig {
            base_xp: 1,
            increment_xp: 0,
        };
        let curve = LevelCurve::new(&config).unwrap();
        for xp in [u64::MAX.saturating_sub(3), u64::MAX.saturating_sub(2)] {
            let level = curve.player_level(xp);
            let next = curve.xp_for_next_level(xp);
            assert_eq!(level, xp.saturating_add(1));
            assert_eq!(next, xp.saturating_add(1));
            assert!(curve.player_level(next) > level);
        }
    }

    #[test]
    fn zero_base_is_rejected() {
        let config = CurveConfig {
            base_xp: 0,
            increment_xp: 50,
        };
        let err = LevelCurve::new(&config).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
        assert_eq!(err.kind(), quizquest_types::ErrorKind::InvalidInput);
    }

    #[test]
    fn level_progress_is_a_fraction_of_next_threshold() {
        let curve = LevelCurve::standard();
        assert_eq!(curve.level_progress(0), Decimal::ZERO);
        assert_eq!(curve.level_progress(50), Decimal::new(5, 1));
        assert_eq!(curve.level_progress(125), Decimal::new(5, 1));
        assert!(curve.level_progress(u64::MAX) <= Decimal::ONE);
    }
}
