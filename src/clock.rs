use crate::Error;
use embedded_hal::blocking::delay::DelayMs;
use embedded_time::{duration::Microseconds, rate::Fraction, Clock, Instant};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall clock counting microseconds since the UNIX epoch,
/// the same time base as upstream message stamps.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type T = u64;

    const SCALING_FACTOR: Fraction = Fraction::new(1, 1_000_000);

    fn try_now(&self) -> Result<Instant<Self>, embedded_time::clock::Error> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| embedded_time::clock::Error::Unspecified)?;
        Ok(Instant::new(since_epoch.as_micros() as u64))
    }
}

/// Read `clock` in seconds.
pub fn now_seconds<C>(clock: &C) -> Result<f64, Error>
where
    C: Clock<T = u64>,
{
    let micros = Microseconds::<u64>::try_from(clock.try_now()?.duration_since_epoch())?;
    Ok(micros.0 as f64 * 1e-6)
}

/// Blocking delay for hosts that dispatch on a plain thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl DelayMs<u16> for StdDelay {
    fn delay_ms(&mut self, ms: u16) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }
}
