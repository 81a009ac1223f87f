//! ResourcePool — ограниченное значение с регенерацией после задержки
//!
//! Используется трижды на персонажа: health (без regen), stamina, mana.
//!
//! Инвариант: 0.0 ≤ current ≤ max, max > 0 (после любой операции).

use bevy::prelude::*;

use crate::config::PoolConfig;
use crate::logger;

/// Подставляется вместо невалидного max (≤ 0, NaN, inf).
pub const FALLBACK_POOL_MAX: f32 = 1.0;

/// Bounded numeric stat with optional delayed regeneration.
///
/// Мутируется только через consume / restore / tick.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ResourcePool {
    current: f32,
    max: f32,
    /// units per second
    regen_rate: f32,
    /// seconds after a consume before regen resumes
    regen_delay: f32,
    /// seconds remaining until regen resumes
    regen_timer: f32,
}

impl ResourcePool {
    /// Пул без регенерации (health).
    pub fn new(max: f32) -> Self {
        Self::with_regen(max, 0.0, 0.0)
    }

    /// max ≤ 0 или не-finite заменяется на `FALLBACK_POOL_MAX` с warning'ом;
    /// конфиги отсекает `PoolConfig::validate` ещё до сборки.
    pub fn with_regen(max: f32, regen_rate: f32, regen_delay: f32) -> Self {
        let max = if max.is_finite() && max > 0.0 {
            max
        } else {
            logger::log_warning(&format!(
                "ResourcePool: invalid max {}, using {}",
                max, FALLBACK_POOL_MAX
            ));
            FALLBACK_POOL_MAX
        };
        Self {
            current: max,
            max,
            regen_rate: sanitize(regen_rate),
            regen_delay: sanitize(regen_delay),
            regen_timer: 0.0,
        }
    }

    pub fn from_config(config: &PoolConfig) -> Self {
        Self::with_regen(config.max, config.regen_rate, config.regen_delay)
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn regen_rate(&self) -> f32 {
        self.regen_rate
    }

    pub fn regen_delay(&self) -> f32 {
        self.regen_delay
    }

    pub fn regen_timer(&self) -> f32 {
        self.regen_timer
    }

    /// current / max
    pub fn percent(&self) -> f32 {
        self.current / self.max
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn has_enough(&self, amount: f32) -> bool {
        self.current >= amount
    }

    /// Gated consume: no mutation on negative amount or insufficiency.
    pub fn try_consume(&mut self, amount: f32) -> bool {
        if !is_valid_amount(amount) || !self.has_enough(amount) {
            return false;
        }
        self.consume(amount);
        true
    }

    /// Non-gated consume (overdraft clamps to zero).
    ///
    /// Returns the amount actually removed. Negative amounts are ignored.
    pub fn consume(&mut self, amount: f32) -> f32 {
        if !is_valid_amount(amount) {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current - amount).clamp(0.0, self.max);
        self.regen_timer = self.regen_delay;
        before - self.current
    }

    /// Adds up to max, regen timer untouched. Returns the actual increase.
    pub fn restore(&mut self, amount: f32) -> f32 {
        if !is_valid_amount(amount) {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount).clamp(0.0, self.max);
        self.current - before
    }

    /// Advances the regen clock by `delta_time` seconds.
    ///
    /// Delay countdown eats time first; the leftover of the same step
    /// regenerates (consume(50) → tick(0.5) → tick(0.6) → +0.1 s of regen).
    /// Returns the amount regenerated this step.
    pub fn tick(&mut self, delta_time: f32) -> f32 {
        let mut remaining_time = delta_time.max(0.0);

        if self.regen_timer > 0.0 {
            let delay_time = self.regen_timer.min(remaining_time);
            self.regen_timer -= delay_time;
            remaining_time -= delay_time;
        }

        if remaining_time <= 0.0 || self.regen_rate <= 0.0 || self.is_full() {
            return 0.0;
        }

        let before = self.current;
        self.current = (self.current + self.regen_rate * remaining_time).min(self.max);
        self.current - before
    }
}

fn is_valid_amount(amount: f32) -> bool {
    amount >= 0.0 // NaN тоже отсекается
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamina() -> ResourcePool {
        ResourcePool::with_regen(100.0, 20.0, 1.0)
    }

    #[test]
    fn test_starts_full() {
        let pool = stamina();
        assert_eq!(pool.current(), 100.0);
        assert_eq!(pool.percent(), 1.0);
        assert_eq!(pool.regen_timer(), 0.0);
    }

    #[test]
    fn test_try_consume_insufficient_leaves_pool_untouched() {
        let mut pool = stamina();
        assert!(pool.try_consume(70.0));
        assert_eq!(pool.current(), 30.0);

        pool.tick(5.0); // регенерация до 100? нет: delay 1s, затем 4s × 20 = 80 → clamp
        assert_eq!(pool.current(), 100.0);

        assert!(pool.try_consume(60.0));
        assert!(!pool.try_consume(60.0)); // 40 < 60
        assert_eq!(pool.current(), 40.0);
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        let mut pool = stamina();
        pool.consume(10.0);
        let timer = pool.regen_timer();

        assert!(!pool.try_consume(-5.0));
        assert_eq!(pool.consume(-5.0), 0.0);
        assert_eq!(pool.restore(-5.0), 0.0);
        assert_eq!(pool.current(), 90.0);
        assert_eq!(pool.regen_timer(), timer);
    }

    #[test]
    fn test_consume_resets_regen_timer() {
        let mut pool = stamina();
        pool.consume(10.0);
        assert_eq!(pool.regen_timer(), 1.0);

        pool.tick(0.4);
        assert!(pool.regen_timer() < 1.0);

        pool.try_consume(10.0);
        assert_eq!(pool.regen_timer(), pool.regen_delay());
    }

    #[test]
    fn test_consume_overdraft_clamps_to_zero() {
        let mut pool = stamina();
        let removed = pool.consume(150.0);
        assert_eq!(removed, 100.0);
        assert_eq!(pool.current(), 0.0);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_restore_clamps_and_keeps_timer() {
        let mut pool = stamina();
        pool.consume(30.0);
        assert_eq!(pool.restore(50.0), 30.0);
        assert_eq!(pool.current(), 100.0);
        assert_eq!(pool.regen_timer(), 1.0);
    }

    #[test]
    fn test_delay_then_regen_carries_leftover_time() {
        let mut pool = stamina();
        pool.consume(50.0);
        assert_eq!(pool.current(), 50.0);
        assert_eq!(pool.regen_timer(), 1.0);

        assert_eq!(pool.tick(0.5), 0.0);
        assert_eq!(pool.current(), 50.0);

        pool.tick(0.6);
        assert_eq!(pool.regen_timer(), 0.0);
        assert!((pool.current() - 52.0).abs() < 1e-4);
    }

    #[test]
    fn test_health_pool_never_regenerates() {
        let mut health = ResourcePool::new(100.0);
        health.consume(40.0);
        assert_eq!(health.tick(10.0), 0.0);
        assert_eq!(health.current(), 60.0);
    }

    #[test]
    fn test_bounds_hold_over_mixed_sequence() {
        let mut pool = ResourcePool::with_regen(50.0, 15.0, 0.25);
        let ops: [(u8, f32); 10] = [
            (0, 20.0),
            (2, 0.1),
            (1, 7.0),
            (0, 80.0),
            (2, 3.0),
            (1, 500.0),
            (0, 0.0),
            (2, 0.016),
            (0, 49.9),
            (2, 100.0),
        ];
        for (op, amount) in ops {
            match op {
                0 => {
                    pool.consume(amount);
                }
                1 => {
                    pool.restore(amount);
                }
                _ => {
                    pool.tick(amount);
                }
            }
            assert!(pool.current() >= 0.0 && pool.current() <= pool.max());
        }
    }

    #[test]
    fn test_invalid_max_falls_back_to_positive() {
        for max in [0.0, -10.0, f32::NAN, f32::INFINITY] {
            let pool = ResourcePool::with_regen(max, 5.0, 1.0);
            assert_eq!(pool.max(), FALLBACK_POOL_MAX, "max {}", max);
            assert_eq!(pool.current(), FALLBACK_POOL_MAX);
            assert_eq!(pool.percent(), 1.0);
        }
        assert_eq!(ResourcePool::new(0.0).max(), FALLBACK_POOL_MAX);
    }
}
