// src/search/rate_limit.rs
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Fixed-window call limiter shared by every outbound request.
///
/// `acquire` sleeps until the window has capacity instead of rejecting, so
/// callers never see a rate-limit error; they just wait their turn. Safe to
/// share across concurrent inbound requests: the window state sits behind a
/// mutex and the lock is never held across an await.
pub struct RateLimiter {
    max_calls: u32,
    period: Duration,
    window: Mutex<Window>,
}

struct Window {
    started: Instant,
    calls: u32,
}

impl RateLimiter {
    pub fn new(max_calls: u32, period: Duration) -> Self {
        Self {
            max_calls,
            period,
            window: Mutex::new(Window {
                started: Instant::now(),
                calls: 0,
            }),
        }
    }

    /// Waits until the current window has capacity, then counts the call.
    pub async fn acquire(&self) {
        loop {
            let window_ends = {
                let mut window = self.window.lock().await;
                let now = Instant::now();
                if now.duration_since(window.started) >= self.period {
                    window.started = now;
                    window.calls = 0;
                }
                if window.calls < self.max_calls {
                    window.calls += 1;
                    return;
                }
                window.started + self.period
            };
            sleep_until(window_ends).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn caps_calls_per_window() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));
        let start = Instant::now();

        let mut offsets = Vec::new();
        for _ in 0..30 {
            limiter.acquire().await;
            offsets.push(start.elapsed());
        }

        // 10 immediate, 10 after the first window rolls, 10 after the next.
        for (i, offset) in offsets.iter().enumerate() {
            let expected = Duration::from_secs(60) * (i as u32 / 10);
            assert_eq!(*offset, expected, "call {} started at {:?}", i, offset);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_window() {
        let limiter = Arc::new(RateLimiter::new(10, Duration::from_secs(60)));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..15 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                start.elapsed()
            }));
        }

        let mut offsets = Vec::new();
        for handle in handles {
            offsets.push(handle.await.unwrap());
        }
        offsets.sort();

        let first_window = offsets
            .iter()
            .filter(|o| **o < Duration::from_secs(60))
            .count();
        assert_eq!(first_window, 10);
        assert!(offsets[10..]
            .iter()
            .all(|o| *o >= Duration::from_secs(60)));
    }
}
