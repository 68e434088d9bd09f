//! Small value types shared by the player and enemies.

use serde::{Deserialize, Serialize};

/// Health pool clamped to `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() { max.max(1.0) } else { 1.0 };
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Subtract damage and return how much was actually removed.
    /// Negative and NaN amounts count as zero.
    pub fn damage(&mut self, amount: f32) -> f32 {
        let amount = sanitize_amount(amount);
        let before = self.current;
        self.current = (self.current - amount).max(0.0);
        before - self.current
    }
}

fn sanitize_amount(amount: f32) -> f32 {
    if amount.is_nan() {
        0.0
    } else {
        amount.clamp(0.0, f32::MAX)
    }
}

/// Which side fired a projectile. Projectiles never hit their own side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

/// Player movement posture, which drives stamina regeneration and noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Posture {
    #[default]
    Idle,
    Walking,
    Sprinting,
}

/// Result of a `take_damage` call on the player or an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DamageOutcome {
    /// Already dead, or the amount was negative or not finite
    Ignored,
    Wounded,
    /// This hit brought health to zero
    Killed,
}

/// Damage amounts that entities accept: finite and non-negative.
pub fn is_valid_damage(amount: f32) -> bool {
    amount.is_finite() && amount >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_clamps_at_zero() {
        let mut health = Health::new(50.0);
        assert_eq!(health.damage(80.0), 50.0);
        assert_eq!(health.current(), 0.0);
        assert!(health.is_depleted());
    }

    #[test]
    fn test_health_ignores_bad_amounts() {
        let mut health = Health::new(50.0);
        health.damage(-10.0);
        health.damage(f32::NAN);
        assert_eq!(health.current(), 50.0);

        health.damage(f32::INFINITY);
        assert_eq!(health.current(), 0.0);
    }
}
