use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

/// What to do when the room wakes up later than a tick was due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Report the missed ticks in [`TickInfo::ticks_skipped`] and resume
    /// one period from now.
    #[default]
    Skip,
    /// Fire missed ticks back to back, at most `max_catchup` of them.
    CatchUp { max_catchup: u32 },
    /// Ignore the lateness. The next tick keeps the original cadence.
    Drop,
}

#[derive(Debug, Clone)]
pub struct CountdownConfig {
    /// Time between ticks. One second for `time_left` countdowns.
    pub period: Duration,
    pub policy: TickPolicy,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            policy: TickPolicy::default(),
        }
    }
}

/// Returned by [`Countdown::wait_for_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Ticks since the last [`Countdown::start`], starting at 1.
    pub tick: u64,
    /// The tick fired more than a tenth of a period late.
    pub overrun: bool,
    /// Whole periods that elapsed without a tick of their own. A caller
    /// counting down seconds should subtract `1 + ticks_skipped`.
    pub ticks_skipped: u64,
}

/// A restartable fixed-period ticker.
///
/// A stopped countdown never fires. [`start`](Self::start) on a running
/// countdown replaces its schedule instead of adding a second one, so a
/// room can never decrement twice per period.
#[derive(Debug)]
pub struct Countdown {
    config: CountdownConfig,
    tick_count: u64,
    next_tick: Option<Instant>,
    generation: u64,
}

impl Countdown {
    pub fn new(config: CountdownConfig) -> Self {
        Self {
            config,
            tick_count: 0,
            next_tick: None,
            generation: 0,
        }
    }

    /// (Re)starts the countdown: the first tick fires one period from now.
    pub fn start(&mut self) {
        if self.next_tick.is_some() {
            debug!(generation = self.generation, "countdown restarted");
        }
        self.generation += 1;
        self.tick_count = 0;
        self.next_tick = Some(Instant::now() + self.config.period);
    }

    /// Stops the countdown. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if self.next_tick.take().is_some() {
            trace!(generation = self.generation, ticks = self.tick_count, "countdown stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Ticks fired since the last start.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Incremented by every [`start`](Self::start).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn period(&self) -> Duration {
        self.config.period
    }

    /// Waits for the next tick. Pends forever while stopped.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let Some(next) = self.next_tick else {
            return std::future::pending().await;
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        let period = self.config.period;
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > period / 10;
        let behind = if overrun {
            (late_by.as_nanos() / period.as_nanos().max(1)) as u64
        } else {
            0
        };
        let mut ticks_skipped = 0;

        self.next_tick = Some(match self.config.policy {
            TickPolicy::Skip => {
                ticks_skipped = behind;
                if behind > 0 {
                    warn!(
                        tick = self.tick_count,
                        skipped = behind,
                        late_ms = late_by.as_millis() as u64,
                        "countdown fell behind, skipping ahead"
                    );
                }
                now + period
            }
            TickPolicy::CatchUp { max_catchup } => {
                if behind == 0 {
                    next + period
                } else if behind <= u64::from(max_catchup) {
                    debug!(tick = self.tick_count, behind, "countdown catching up");
                    next + period
                } else {
                    ticks_skipped = behind - u64::from(max_catchup);
                    warn!(
                        tick = self.tick_count,
                        behind,
                        skipped = ticks_skipped,
                        "countdown catch-up capped at {max_catchup}"
                    );
                    now + period
                }
            }
            TickPolicy::Drop => {
                if overrun {
                    warn!(
                        tick = self.tick_count,
                        late_ms = late_by.as_millis() as u64,
                        "countdown tick late, keeping cadence"
                    );
                }
                next + period
            }
        });

        trace!(tick = self.tick_count, overrun, "countdown tick");

        TickInfo {
            tick: self.tick_count,
            overrun,
            ticks_skipped,
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(CountdownConfig::default())
    }
}
