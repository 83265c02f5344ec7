/// Client-side throttle for explorer API requests (sliding one-second window)
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct RateLimiter {
    /// Request timestamps within the last window
    request_times: Mutex<VecDeque<Instant>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize) -> Self {
        Self {
            request_times: Mutex::new(VecDeque::new()),
            max_requests: max_requests.max(1),
            window: Duration::from_secs(1),
        }
    }

    fn check_and_record(&self, now: Instant) -> Duration {
        let mut request_times = match self.request_times.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        while let Some(&front) = request_times.front() {
            if now.duration_since(front) > self.window {
                request_times.pop_front();
            } else {
                break;
            }
        }

        if request_times.len() >= self.max_requests {
            if let Some(&oldest) = request_times.front() {
                let elapsed = now.duration_since(oldest);
                if elapsed < self.window {
                    return self.window - elapsed;
                }
            }
        }

        request_times.push_back(now);
        Duration::from_secs(0)
    }

    /// Wait if necessary so we stay under `max_requests` per second
    pub async fn acquire(&self) {
        loop {
            let wait_duration = self.check_and_record(Instant::now());
            if wait_duration.is_zero() {
                return;
            }
            tracing::debug!("API rate limit: waiting {}ms", wait_duration.as_millis());
            tokio::time::sleep(wait_duration).await;
        }
    }
}
