//! Rate Window Module
//!
//! Sliding record of recent outbound call times.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

// == Rate Window ==
/// Timestamps of admitted calls within the trailing `period`, oldest first.
#[derive(Debug)]
pub struct RateWindow {
    call_timestamps: VecDeque<Instant>,
    limit: usize,
    period: Duration,
}

impl RateWindow {
    pub fn new(limit: usize, period: Duration) -> Self {
        Self {
            call_timestamps: VecDeque::with_capacity(limit.min(1024)),
            limit,
            period,
        }
    }

    // == Prune ==
    /// Drops timestamps that are `period` or more before `now`.
    pub fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.call_timestamps.front() {
            if now.saturating_duration_since(oldest) >= self.period {
                self.call_timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    // == Try Admit ==
    /// Records a call at `now` if the window has room.
    ///
    /// Otherwise returns how long until the oldest call leaves the window.
    /// Must not be called with a zero limit; the caller handles that case.
    pub fn try_admit(&mut self, now: Instant) -> Result<(), Duration> {
        self.prune(now);

        if self.call_timestamps.len() < self.limit {
            self.call_timestamps.push_back(now);
            return Ok(());
        }

        let wait = self
            .call_timestamps
            .front()
            .map(|&oldest| self.period.saturating_sub(now.saturating_duration_since(oldest)))
            .unwrap_or(self.period);
        Err(wait)
    }

    /// Number of calls currently inside the window.
    pub fn in_window(&mut self, now: Instant) -> usize {
        self.prune(now);
        self.call_timestamps.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_admits_up_to_limit() {
        let start = Instant::now();
        let mut window = RateWindow::new(2, Duration::from_secs(30));

        assert!(window.try_admit(start).is_ok());
        assert!(window.try_admit(start + Duration::from_millis(10)).is_ok());

        let wait = window.try_admit(start + Duration::from_secs(1)).unwrap_err();
        assert_eq!(wait, Duration::from_secs(29));
        assert_eq!(window.in_window(start + Duration::from_secs(1)), 2);
    }

    #[test]
    fn test_oldest_leaves_after_period() {
        let start = Instant::now();
        let mut window = RateWindow::new(1, Duration::from_secs(5));

        window.try_admit(start).unwrap();
        assert!(window.try_admit(start + Duration::from_millis(4999)).is_err());
        assert!(window.try_admit(start + Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_prune_keeps_recent() {
        let start = Instant::now();
        let mut window = RateWindow::new(10, Duration::from_secs(10));
        for offset in [0, 3, 6, 9] {
            window.try_admit(start + Duration::from_secs(offset)).unwrap();
        }

        assert_eq!(window.in_window(start + Duration::from_secs(12)), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        // No trailing window ever contains more admitted calls than the limit.
        #[test]
        fn prop_trailing_window_never_exceeds_limit(
            limit in 1usize..6,
            period_ms in 1u64..500,
            gaps in prop::collection::vec(0u64..200, 1..80)
        ) {
            let start = Instant::now();
            let period = Duration::from_millis(period_ms);
            let mut window = RateWindow::new(limit, period);
            let mut admitted: Vec<Instant> = Vec::new();
            let mut now = start;

            for gap in gaps {
                now += Duration::from_millis(gap);
                if window.try_admit(now).is_ok() {
                    admitted.push(now);
                }
            }

            for (i, &t) in admitted.iter().enumerate() {
                let in_window = admitted[..=i]
                    .iter()
                    .filter(|&&earlier| t.duration_since(earlier) < period)
                    .count();
                prop_assert!(in_window <= limit, "{} calls within {:?}", in_window, period);
            }
        }

        // A refused call is told to wait exactly until the oldest call expires.
        #[test]
        fn prop_wait_hint_frees_a_slot(
            limit in 1usize..5,
            period_ms in 1u64..1000,
            gap_ms in 0u64..1000
        ) {
            let start = Instant::now();
            let period = Duration::from_millis(period_ms);
            let mut window = RateWindow::new(limit, period);
            for _ in 0..limit {
                window.try_admit(start).unwrap();
            }

            let now = start + Duration::from_millis(gap_ms);
            match window.try_admit(now) {
                Ok(()) => prop_assert!(gap_ms >= period_ms),
                Err(wait) => {
                    prop_assert!(gap_ms < period_ms);
                    prop_assert!(window.try_admit(now + wait).is_ok());
                }
            }
        }
    }
}
