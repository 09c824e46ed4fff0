use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use governor::{
    clock::Clock, middleware::NoOpMiddleware, state::InMemoryState, state::NotKeyed, Quota,
    RateLimiter,
};

use crate::{Error, Result};

/// Every permit is charged as this many half-period cells.
///
/// governor's GCRA hands out `burst + 1` cells at once when the bucket refills
/// after idling. Splitting a permit into two cells of half the period, with
/// twice the burst, keeps every burst at exactly `n` permits, fresh or refilled.
const CELLS_PER_PERMIT: NonZeroU32 = match NonZeroU32::new(2) {
    Some(n) => n,
    None => unreachable!(),
};

/// Token bucket holding `n` permits, refilled at one permit every `60s / n`.
/// Measured in cells, see [`CELLS_PER_PERMIT`].
pub fn quota(requests_per_minute: NonZeroU32) -> Quota {
    let cell = (Duration::from_secs(60) / requests_per_minute.get() / CELLS_PER_PERMIT.get())
        .max(Duration::from_nanos(1));
    Quota::with_period(cell)
        .unwrap_or_else(|| Quota::per_minute(requests_per_minute))
        .allow_burst(requests_per_minute.saturating_mul(CELLS_PER_PERMIT))
}

/// governor clock that follows tokio's timer, so a paused runtime drives it too.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Run-wide request limiter. One permit is taken right before every request.
pub struct ScrapeLimiter<C: Clock = TokioClock> {
    limiter: RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<C::Instant>>,
    clock: C,
    requests_per_minute: NonZeroU32,
    permits: u64,
}

impl ScrapeLimiter {
    pub fn per_minute(requests_per_minute: NonZeroU32) -> Self {
        Self::with_clock(requests_per_minute, TokioClock)
    }

    /// Waits (without spinning) until the bucket hands out a permit.
    /// There is no timeout: a starved bucket blocks the caller indefinitely.
    pub async fn wait(&mut self) -> Result<()> {
        loop {
            match self.limiter.check_n(CELLS_PER_PERMIT)? {
                Ok(()) => break,
                Err(not_until) => {
                    tokio::time::sleep(not_until.wait_time_from(self.clock.now())).await;
                }
            }
        }
        self.permits += 1;
        Ok(())
    }
}

impl<C: Clock> ScrapeLimiter<C> {
    pub fn with_clock(requests_per_minute: NonZeroU32, clock: C) -> Self {
        Self {
            limiter: RateLimiter::direct_with_clock(quota(requests_per_minute), &clock),
            clock,
            requests_per_minute,
            permits: 0,
        }
    }

    /// Takes a permit if one is available right now.
    pub fn try_acquire(&mut self) -> Result<bool> {
        let granted = self.limiter.check_n(CELLS_PER_PERMIT)?.is_ok();
        if granted {
            self.permits += 1;
        }
        Ok(granted)
    }

    /// Permits handed out so far.
    pub fn permits(&self) -> u64 {
        self.permits
    }

    pub fn requests_per_minute(&self) -> NonZeroU32 {
        self.requests_per_minute
    }
}

impl<C: Clock> std::fmt::Debug for ScrapeLimiter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeLimiter")
            .field("requests_per_minute", &self.requests_per_minute)
            .field("permits", &self.permits)
            .finish()
    }
}

impl From<governor::InsufficientCapacity> for Error {
    fn from(value: governor::InsufficientCapacity) -> Self {
        Error::Limiter(value.0)
    }
}
