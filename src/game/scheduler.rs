use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Fixed-interval tick source the game loop arms and disarms
///
/// Disarming an already disarmed scheduler is a no-op.
pub trait Scheduler {
    fn arm(&mut self, interval: Duration);
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
}

/// Scheduler driven by hand, for tests
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    interval: Option<Duration>,
    arms: usize,
    disarms: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn arm_count(&self) -> usize {
        self.arms
    }

    /// Disarms that actually stopped an armed timer
    pub fn disarm_count(&self) -> usize {
        self.disarms
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, interval: Duration) {
        self.interval = Some(interval);
        self.arms += 1;
    }

    fn disarm(&mut self) {
        if self.interval.take().is_some() {
            self.disarms += 1;
        }
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }
}

/// Wall-clock scheduler backed by a tokio interval
///
/// Late ticks are delayed rather than bunched up, so two ticks never run
/// back to back to catch up.
#[derive(Debug, Default)]
pub struct IntervalScheduler {
    interval: Option<Interval>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the next tick. Pends forever while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Scheduler for IntervalScheduler {
    fn arm(&mut self, period: Duration) {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn disarm(&mut self) {
        self.interval = None;
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_disarm_is_idempotent() {
        let mut scheduler = ManualScheduler::new();
        scheduler.arm(Duration::from_millis(200));
        assert!(scheduler.is_armed());

        scheduler.disarm();
        scheduler.disarm();
        assert!(!scheduler.is_armed());
        assert_eq!(scheduler.arm_count(), 1);
        assert_eq!(scheduler.disarm_count(), 1);
    }

    #[tokio::test]
    async fn test_interval_ticks_when_armed() {
        let mut scheduler = IntervalScheduler::new();
        scheduler.arm(Duration::from_millis(5));

        let ticked = tokio::time::timeout(Duration::from_secs(2), scheduler.tick()).await;
        assert!(ticked.is_ok());
    }

    #[tokio::test]
    async fn test_disarmed_interval_never_ticks() {
        let mut scheduler = IntervalScheduler::new();
        scheduler.arm(Duration::from_millis(5));
        scheduler.disarm();
        scheduler.disarm();
        assert!(!scheduler.is_armed());

        let ticked = tokio::time::timeout(Duration::from_millis(30), scheduler.tick()).await;
        assert!(ticked.is_err());
    }
}
