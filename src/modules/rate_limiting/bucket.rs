//! Token bucket implementation for rate limiting.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Mutable bucket state, guarded as one unit.
#[derive(Debug)]
struct BucketState {
    /// Current token level, always within `[0, capacity]`.
    tokens: f64,

    /// Last refill timestamp.
    last_refill: Instant,
}

/// A token bucket for per-subscriber rate limiting.
///
/// Tokens accumulate at `refill_rate` per second up to `capacity`, and each
/// granted request consumes one. Refill and consume happen as a single
/// locked step, so two concurrent requests can never both take the last
/// token.
#[derive(Debug)]
pub struct TokenBucket {
    /// Maximum tokens (burst capacity).
    capacity: f64,

    /// Token refill rate (tokens per second).
    refill_rate: f64,

    /// Guarded token level and refill timestamp.
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a new bucket, starting full.
    #[must_use]
    pub fn new(capacity: u32, refill_rate: f64) -> Self {
        Self {
            capacity: f64::from(capacity),
            refill_rate,
            state: Mutex::new(BucketState {
                tokens: f64::from(capacity),
                last_refill: Instant::now(),
            }),
        }
    }

    /// Try to consume one token.
    ///
    /// Returns `true` if a token was consumed, `false` if the bucket is
    /// empty. Never blocks or waits for a refill.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        self.refill_locked(&mut state);

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Current token level after refill.
    #[must_use]
    pub fn available_tokens(&self) -> f64 {
        let mut state = self.state.lock().unwrap();
        self.refill_locked(&mut state);
        state.tokens
    }

    /// Time until one token becomes available.
    #[must_use]
    pub fn time_until_ready(&self) -> Duration {
        let mut state = self.state.lock().unwrap();
        self.refill_locked(&mut state);

        if state.tokens >= 1.0 {
            return Duration::ZERO;
        }

        let deficit = 1.0 - state.tokens;
        Duration::from_secs_f64(deficit / self.refill_rate)
    }

    /// The burst capacity.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity as u32
    }

    /// The refill rate (tokens per second).
    #[must_use]
    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    /// Replenish tokens for the elapsed time, clamped to capacity.
    fn refill_locked(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_rate).min(self.capacity);
        state.last_refill = now;
    }
}
