use std::sync::atomic::{AtomicI64, Ordering};

/// The standalone pushup counter. Plain add/sub with no clamping: a
/// negative value means the broadcaster is owed pushups, and several
/// handlers rely on exactly that arithmetic.
#[derive(Debug, Default)]
pub struct PushupCounter {
    value: AtomicI64,
}

impl PushupCounter {
    pub fn new() -> Self {
        Self {
            value: AtomicI64::new(0),
        }
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }

    pub fn set(&self, n: i64) {
        self.value.store(n, Ordering::SeqCst);
    }

    /// Returns the new value. `n` may be negative.
    pub fn add(&self, n: i64) -> i64 {
        self.value.fetch_add(n, Ordering::SeqCst) + n
    }

    /// Returns the new value; may go below zero.
    pub fn sub(&self, n: i64) -> i64 {
        self.add(-n)
    }
}

/// The daily-challenge remainder. Unlike [`PushupCounter`], logging done
/// reps clamps at zero; finishing early does not build up credit.
#[derive(Debug)]
pub struct DailyChallenge {
    remaining: AtomicI64,
}

impl DailyChallenge {
    pub fn new(goal: i64) -> Self {
        Self {
            remaining: AtomicI64::new(goal),
        }
    }

    pub fn remaining(&self) -> i64 {
        self.remaining.load(Ordering::SeqCst)
    }

    pub fn reset(&self, goal: i64) {
        self.remaining.store(goal, Ordering::SeqCst);
    }

    /// Log `n` completed reps; returns the new remainder, clamped at zero.
    pub fn log_done(&self, n: i64) -> i64 {
        let updated = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
                Some((v - n).max(0))
            });
        match updated {
            Ok(prev) => (prev - n).max(0),
            Err(prev) => prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standalone_counter_goes_negative() {
        let c = PushupCounter::new();
        c.set(5);
        assert_eq!(c.sub(8), -3);
        assert_eq!(c.get(), -3);
    }

    #[test]
    fn set_accepts_negative_values() {
        let c = PushupCounter::new();
        c.set(-3);
        assert_eq!(c.get(), -3);
    }

    #[test]
    fn daily_challenge_clamps_at_zero() {
        let d = DailyChallenge::new(5);
        assert_eq!(d.log_done(8), 0);
        assert_eq!(d.remaining(), 0);
    }

    // The two variants must diverge on exactly the clamping point.
    #[test]
    fn variants_diverge_on_overshoot() {
        let c = PushupCounter::new();
        c.set(5);
        let d = DailyChallenge::new(5);
        assert_eq!(c.sub(8), -3);
        assert_eq!(d.log_done(8), 0);
    }

    #[test]
    fn daily_challenge_counts_down() {
        let d = DailyChallenge::new(100);
        assert_eq!(d.log_done(30), 70);
        assert_eq!(d.log_done(30), 40);
        d.reset(100);
        assert_eq!(d.remaining(), 100);
    }
}
