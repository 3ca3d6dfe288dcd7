//! Fixed-window quota for the recovery endpoints — blunts OTP brute-forcing
//! and email-bombing (3 requests per 15 minutes per client).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Once the map holds this many keys, stale windows are dropped on the next
/// check. Keys arrive from unauthenticated endpoints, so the map must not
/// grow without bound.
const PRUNE_THRESHOLD: usize = 1024;

pub struct FixedWindowQuota {
    max: u32,
    window: Duration,
    windows: Mutex<HashMap<String, (Instant, u32)>>,
}

impl FixedWindowQuota {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Record one attempt for `key`. Returns `false` when the key has
    /// exhausted its quota for the current window.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap();
        if windows.len() >= PRUNE_THRESHOLD {
            let window = self.window;
            windows.retain(|_, (started, _)| now.duration_since(*started) < window);
        }
        match windows.get_mut(key) {
            Some((started, count)) if now.duration_since(*started) < self.window => {
                if *count >= self.max {
                    return false;
                }
                *count += 1;
                true
            }
            _ => {
                windows.insert(key.to_owned(), (now, 1));
                true
            }
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.windows.lock().unwrap().len()
    }
}
