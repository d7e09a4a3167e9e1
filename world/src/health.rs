//! Hit points of the origin.

/// Health pool drained by creeps that reach the origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OriginHealth {
    health: u32,
}

impl OriginHealth {
    /// Creates a health pool with the provided starting value.
    #[must_use]
    pub const fn new(health: u32) -> Self {
        Self { health }
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Subtracts `amount`, clamping at zero, and returns the remaining health.
    pub fn decrement_health(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    /// Replaces the current health.
    pub fn set_health(&mut self, health: u32) {
        self.health = health;
    }

    /// Reports whether the pool is drained.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.health == 0
    }
}

#[cfg(test)]
mod tests {
    use super::OriginHealth;

    #[test]
    fn decrement_clamps_at_zero() {
        let mut health = OriginHealth::new(2);
        assert_eq!(health.decrement_health(1), 1);
        assert_eq!(health.decrement_health(5), 0);
        assert!(health.is_depleted());
    }

    #[test]
    fn set_health_replaces_value() {
        let mut health = OriginHealth::new(0);
        health.set_health(10);
        assert_eq!(health.health(), 10);
        assert!(!health.is_depleted());
    }
}
