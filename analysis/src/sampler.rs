pub const DEFAULT_TICK_INTERVAL: u32 = 10;

/// Snapshots per second of match time the sampler aims for once the tick
/// rate is known.
pub const SAMPLES_PER_SECOND: f64 = 10.0;

/// The sampling interval for a tick rate, truncated and at least one frame.
/// 64 tick gives 6, 128 tick gives 12.
pub fn interval_for_tick_rate(tick_rate: f64) -> u32 {
    ((tick_rate / SAMPLES_PER_SECOND) as u32).max(1)
}

/// Decides on which frames the per player snapshots are taken.
#[derive(Debug, Clone)]
pub struct TickSampler {
    interval: u32,
    tick_rate_known: bool,
    last_sampled: Option<i32>,
}

impl TickSampler {
    pub fn new(default_interval: u32) -> Self {
        Self {
            interval: default_interval,
            tick_rate_known: false,
            last_sampled: None,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Replaces the interval the first time a positive tick rate is seen.
    /// Returns whether the interval was recomputed by this call.
    pub fn observe_tick_rate(&mut self, tick_rate: f64) -> bool {
        if self.tick_rate_known || !(tick_rate > 0.0) {
            return false;
        }

        self.interval = interval_for_tick_rate(tick_rate);
        self.tick_rate_known = true;
        tracing::info!(tick_rate, interval = self.interval, "Tick rate discovered");

        true
    }

    pub fn should_sample(&mut self, frame: i32) -> bool {
        let due = match self.last_sampled {
            Some(last) => frame as i64 - last as i64 >= self.interval as i64,
            None => true,
        };

        if due {
            self.last_sampled = Some(frame);
        }
        due
    }
}

impl Default for TickSampler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}
