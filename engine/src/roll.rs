use serde::{Deserialize, Serialize};

use crate::Dice;

/// Multiplier applied to a critical hit, for both sides.
pub const CRIT_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollOdds {
    pub miss: f64,
    pub crit: f64,
    pub crit_multiplier: f64,
}

impl RollOdds {
    pub fn new(miss: f64, crit: f64) -> Self {
        Self { miss, crit, crit_multiplier: CRIT_MULTIPLIER }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RollOutcome {
    pub damage: i32,
    pub missed: bool,
    pub critical: bool,
}

/// Roll an attack once: a single unit draw decides miss, then crit.
///
/// Status-only attacks (`base == 0`) still roll so that a miss can be told
/// apart from a landed status effect.
pub fn roll(dice: &mut Dice, base: i32, odds: RollOdds) -> RollOutcome {
    let r = dice.unit();
    if r < odds.miss {
        return RollOutcome { damage: 0, missed: true, critical: false };
    }
    let critical = r < odds.miss + odds.crit;
    let mult = if critical { odds.crit_multiplier } else { 1.0 };
    let damage = (base as f64 * mult).round().max(0.0) as i32;
    RollOutcome { damage, missed: false, critical }
}

/// Damage-only variant used for the player's moves.
pub fn apply_variance(dice: &mut Dice, base: i32, odds: RollOdds) -> i32 {
    roll(dice, base, odds).damage
}

/// Scale landed damage, rounding to the nearest point.
pub fn scale_damage(damage: i32, factor: f64) -> i32 {
    (damage as f64 * factor).round().max(0.0) as i32
}
