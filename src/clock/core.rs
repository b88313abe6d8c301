use std::time::Duration;

/// Autoplay cadence used when the configuration does not override it.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

/// Shortest beat the clock accepts; zero would fire unboundedly.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Opaque identity of one started timer. A reset yields a fresh handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    interval: Duration,
    since_beat: Duration,
}

/// Single repeating timer. At most one timer is pending at any time.
#[derive(Debug, Default)]
pub struct RotationClock {
    pending: Option<PendingTimer>,
    issued: u64,
}

impl RotationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start beating every `interval`. Starting a running clock keeps the
    /// existing timer and its phase.
    pub fn start(&mut self, interval: Duration) -> TimerHandle {
        if let Some(pending) = self.pending {
            return pending.handle;
        }
        self.issued += 1;
        let handle = TimerHandle(self.issued);
        self.pending = Some(PendingTimer {
            handle,
            interval: interval.max(MIN_INTERVAL),
            since_beat: Duration::ZERO,
        });
        handle
    }

    /// Cancel the pending timer, returning it if there was one.
    pub fn stop(&mut self) -> Option<TimerHandle> {
        self.pending.take().map(|pending| pending.handle)
    }

    /// Restart the cadence from now.
    pub fn reset(&mut self, interval: Duration) -> TimerHandle {
        self.stop();
        self.start(interval)
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.pending.map(|pending| pending.handle)
    }

    pub fn active_timers(&self) -> usize {
        usize::from(self.pending.is_some())
    }

    /// Time left until the next beat, if running.
    pub fn until_next_beat(&self) -> Option<Duration> {
        self.pending
            .map(|pending| pending.interval.saturating_sub(pending.since_beat))
    }

    /// Feed elapsed time and return how many beats became due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let Some(pending) = self.pending.as_mut() else {
            return 0;
        };

        let total = pending.since_beat.as_nanos() + elapsed.as_nanos();
        let interval = pending.interval.as_nanos();
        let beats = total / interval;
        pending.since_beat = duration_from_nanos(total % interval);
        u32::try_from(beats).unwrap_or(u32::MAX)
    }
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Lossless for anything shorter than an interval, which is itself a `Duration`.
fn duration_from_nanos(nanos: u128) -> Duration {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn beats_fire_on_interval_boundaries() {
        let mut clock = RotationClock::new();
        clock.start(5 * SECOND);
        assert_eq!(clock.advance(4 * SECOND), 0);
        assert_eq!(clock.advance(SECOND), 1);
        assert_eq!(clock.advance(11 * SECOND), 2);
        assert_eq!(clock.until_next_beat(), Some(4 * SECOND));
    }

    #[test]
    fn stopped_clock_never_beats() {
        let mut clock = RotationClock::new();
        assert_eq!(clock.advance(60 * SECOND), 0);
        clock.start(SECOND);
        clock.stop();
        assert_eq!(clock.stop(), None);
        assert_eq!(clock.advance(60 * SECOND), 0);
        assert_eq!(clock.active_timers(), 0);
    }

    #[test]
    fn repeated_start_keeps_single_timer() {
        let mut clock = RotationClock::new();
        let first = clock.start(5 * SECOND);
        clock.advance(3 * SECOND);
        let second = clock.start(5 * SECOND);
        assert_eq!(first, second);
        assert_eq!(clock.active_timers(), 1);
        assert_eq!(clock.advance(2 * SECOND), 1);
    }

    #[test]
    fn reset_restarts_cadence_with_new_handle() {
        let mut clock = RotationClock::new();
        let first = clock.start(5 * SECOND);
        clock.advance(4 * SECOND);
        let second = clock.reset(5 * SECOND);
        assert_ne!(first, second);
        assert_eq!(clock.advance(4 * SECOND), 0);
        assert_eq!(clock.advance(SECOND), 1);
    }

    #[test]
    fn very_long_interval_keeps_its_phase() {
        let interval = Duration::from_secs(u64::MAX / 2);
        let mut clock = RotationClock::new();
        clock.start(interval);
        assert_eq!(clock.advance(interval - Duration::from_secs(1)), 0);
        assert_eq!(clock.until_next_beat(), Some(Duration::from_secs(1)));
        assert_eq!(clock.advance(Duration::from_millis(1500)), 1);
        assert_eq!(clock.until_next_beat(), Some(interval - Duration::from_millis(500)));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut clock = RotationClock::new();
        clock.start(Duration::ZERO);
        assert_eq!(clock.advance(Duration::from_millis(3)), 3);
    }
}
