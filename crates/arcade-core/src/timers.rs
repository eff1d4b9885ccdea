use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

/// Shortest interval period accepted; keeps a zero period from firing forever.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a scheduled timeout or interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: Duration,
    period: Option<Duration>,
}

/// Virtual clock plus the timeouts and intervals scheduled against it.
///
/// Nothing fires on its own: the owner advances the clock and pops due
/// timers one at a time with [`Timers::pop_due`], dispatching each to the
/// game before asking for the next, so a callback can cancel or schedule
/// timers that are due in the same window.
#[derive(Debug, Default)]
pub struct Timers {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<TimerId, Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire once, `delay` from now.
    pub fn set_timeout(&mut self, delay: Duration) -> TimerId {
        self.insert(Timer {
            due: self.now + delay,
            period: None,
        })
    }

    /// Fire every `period`, first time one period from now.
    pub fn set_interval(&mut self, period: Duration) -> TimerId {
        let period = period.max(MIN_INTERVAL);
        self.insert(Timer {
            due: self.now + period,
            period: Some(period),
        })
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn clear(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Cancel everything, returning how many timers were still pending.
    pub fn clear_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Number of timers still scheduled.
    pub fn active(&self) -> usize {
        self.pending.len()
    }

    /// Take the earliest timer due at or before `until`, moving the clock to
    /// its due time. Intervals are rescheduled, timeouts removed. Ties fire
    /// in creation order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let (&id, &timer) = self
            .pending
            .iter()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(id, t)| (t.due, **id))?;

        self.now = self.now.max(timer.due);
        match timer.period {
            Some(period) => {
                if let Some(entry) = self.pending.get_mut(&id) {
                    entry.due += period;
                }
            },
            None => {
                self.pending.remove(&id);
            },
        }
        Some(id)
    }

    /// Move the clock to `until` once every due timer has been popped.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn insert(&mut self, timer: Timer) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert(id, timer);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn drain(timers: &mut Timers, until: Duration) -> Vec<TimerId> {
        let mut fired = Vec::new();
        while let Some(id) = timers.pop_due(until) {
            fired.push(id);
        }
        timers.settle(until);
        fired
    }

    #[test]
    fn timeout_fires_once() {
        let mut timers = Timers::new();
        let id = timers.set_timeout(ms(500));
        assert!(drain(&mut timers, ms(499)).is_empty());
        assert_eq!(drain(&mut timers, ms(500)), vec![id]);
        assert!(drain(&mut timers, ms(5000)).is_empty());
        assert_eq!(timers.active(), 0);
    }

    #[test]
    fn interval_repeats_until_cleared() {
        let mut timers = Timers::new();
        let id = timers.set_interval(ms(200));
        assert_eq!(drain(&mut timers, ms(1000)).len(), 5);
        assert!(timers.clear(id));
        assert!(drain(&mut timers, ms(2000)).is_empty());
        assert!(!timers.clear(id));
    }

    #[test]
    fn fires_in_due_order_then_creation_order() {
        let mut timers = Timers::new();
        let late = timers.set_timeout(ms(300));
        let early = timers.set_timeout(ms(100));
        let tie = timers.set_timeout(ms(300));
        assert_eq!(drain(&mut timers, ms(300)), vec![early, late, tie]);
    }

    #[test]
    fn clock_reads_due_time_while_popping() {
        let mut timers = Timers::new();
        timers.set_timeout(ms(120));
        assert!(timers.pop_due(ms(1000)).is_some());
        assert_eq!(timers.now(), ms(120));
        timers.settle(ms(1000));
        assert_eq!(timers.now(), ms(1000));
    }

    #[test]
    fn zero_period_interval_is_clamped() {
        let mut timers = Timers::new();
        timers.set_interval(Duration::ZERO);
        assert_eq!(drain(&mut timers, ms(10)).len(), 10);
    }

    #[test]
    fn clear_all_reports_pending_count() {
        let mut timers = Timers::new();
        timers.set_timeout(ms(10));
        timers.set_interval(ms(10));
        assert_eq!(timers.clear_all(), 2);
        assert_eq!(timers.active(), 0);
    }
}
