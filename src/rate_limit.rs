use dashmap::DashMap;
use std::time::{Duration, Instant};

// Fixed policy: 10 requests per rolling 60 seconds, per key
pub const MAX_REQUESTS: usize = 10;
pub const WINDOW: Duration = Duration::from_secs(60);
pub const RETRY_AFTER_SECS: u64 = 60;

// Per-key sliding window limiter. Each key maps to the timestamps of its
// admitted requests; entries older than the window are pruned lazily on
// access, never by a background task. Keys that stop sending traffic keep
// their entry for the process lifetime.
pub struct RateLimiter {
    windows: DashMap<String, Vec<Instant>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn limit(&self) -> usize {
        self.max_requests
    }

    // Prune, check and record as one atomic unit: the entry guard holds the
    // key's shard lock for the whole call, so two concurrent callers can
    // never both see a free slot and both record. A timestamp exactly one
    // window old counts as expired.
    pub fn try_admit(&self, key: &str, now: Instant) -> bool {
        let mut entry = self.windows.entry(key.to_string()).or_default();
        let timestamps = entry.value_mut();
        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() >= self.max_requests {
            return false;
        }

        timestamps.push(now);
        true
    }

    // Read-only view of the quota left for a key, counted under the shard
    // guard so the result is a snapshot consistent with try_admit.
    // Never-seen keys report the full limit.
    pub fn remaining(&self, key: &str, now: Instant) -> usize {
        let in_window = self
            .windows
            .get(key)
            .map(|entry| {
                entry
                    .iter()
                    .filter(|t| now.duration_since(**t) < self.window)
                    .count()
            })
            .unwrap_or(0);

        self.max_requests.saturating_sub(in_window)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MAX_REQUESTS, WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn unseen_key_has_full_quota_and_is_admitted() {
        let limiter = RateLimiter::default();
        let now = Instant::now();

        assert_eq!(limiter.remaining("fresh", now), MAX_REQUESTS);
        assert!(limiter.try_admit("fresh", now));
        assert_eq!(limiter.remaining("fresh", now), MAX_REQUESTS - 1);
    }

    #[test]
    fn remaining_does_not_consume_quota() {
        let limiter = RateLimiter::default();
        let now = Instant::now();

        for _ in 0..100 {
            assert_eq!(limiter.remaining("idle", now), MAX_REQUESTS);
        }
        assert!(limiter.try_admit("idle", now));
    }

    #[test]
    fn burst_fills_window_then_denies() {
        let limiter = RateLimiter::default();
        let t0 = Instant::now();

        let mut seen = Vec::new();
        for i in 0..MAX_REQUESTS {
            let now = t0 + Duration::from_millis(100 * i as u64);
            assert!(limiter.try_admit("qa-key", now), "request {i} should be admitted");
            seen.push(limiter.remaining("qa-key", now));
        }
        // quota drains one slot at a time, never negative
        assert_eq!(seen, vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);

        let eleventh = t0 + Duration::from_secs(6);
        assert!(!limiter.try_admit("qa-key", eleventh));
        assert_eq!(limiter.remaining("qa-key", eleventh), 0);
    }

    #[test]
    fn denied_request_is_not_recorded() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let t0 = Instant::now();

        assert!(limiter.try_admit("k", t0));
        assert!(!limiter.try_admit("k", t0 + Duration::from_secs(1)));
        assert!(!limiter.try_admit("k", t0 + Duration::from_secs(2)));
        // only the admitted request ages out; the denials left no trace
        assert!(limiter.try_admit("k", t0 + Duration::from_secs(61)));
    }

    #[test]
    fn slot_frees_once_oldest_entry_ages_out() {
        let limiter = RateLimiter::default();
        let t0 = Instant::now();

        for i in 0..MAX_REQUESTS {
            assert!(limiter.try_admit("k", t0 + Duration::from_millis(100 * i as u64)));
        }
        assert!(!limiter.try_admit("k", t0 + Duration::from_secs(6)));

        // all ten fell inside the first second, so they are gone at +61s
        let later = t0 + Duration::from_secs(61);
        assert!(limiter.try_admit("k", later));
        assert_eq!(limiter.remaining("k", later), MAX_REQUESTS - 1);
    }

    #[test]
    fn entry_exactly_one_window_old_is_expired() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let t0 = Instant::now();

        assert!(limiter.try_admit("k", t0));
        // one window is outside the half-open interval, so the slot is free
        assert!(limiter.try_admit("k", t0 + Duration::from_secs(60)));
        // 59.999s after the second admit it is still held
        assert!(!limiter.try_admit(
            "k",
            t0 + Duration::from_secs(60) + Duration::from_millis(59_999)
        ));
    }

    #[test]
    fn keys_do_not_share_windows() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.try_admit("a", now));
        assert!(limiter.try_admit("a", now));
        assert!(!limiter.try_admit("a", now));
        assert!(limiter.try_admit("b", now));
        assert_eq!(limiter.remaining("b", now), 1);
    }

    #[test]
    fn concurrent_admissions_never_overshoot() {
        let limiter = Arc::new(RateLimiter::default());
        let now = Instant::now();

        // four slots already taken, six left
        for _ in 0..4 {
            assert!(limiter.try_admit("shared", now));
        }

        let admitted = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..32)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let admitted = Arc::clone(&admitted);
                thread::spawn(move || {
                    if limiter.try_admit("shared", now) {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(admitted.load(Ordering::SeqCst), 6);
        assert_eq!(limiter.remaining("shared", now), 0);
    }
}
