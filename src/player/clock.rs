use std::time::Instant;

/// Wall clock driving the playback position, in milliseconds, with pause
/// and variable-rate support.
pub struct PlaybackClock {
    started: Option<Instant>,
    paused_at_ms: f64,
    offset_ms: f64,
    rate: f64,
    paused: bool,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            started: None,
            paused_at_ms: 0.0,
            offset_ms: 0.0,
            rate: 1.0,
            paused: true,
        }
    }

    /// Start or resume the clock.
    pub fn resume(&mut self) {
        if self.paused {
            self.started = Some(Instant::now());
            self.offset_ms = self.paused_at_ms;
            self.paused = false;
        }
    }

    /// Pause, freezing the current position.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused_at_ms = self.time_ms();
            self.paused = true;
        }
    }

    /// Back to zero, paused.
    pub fn reset(&mut self) {
        self.started = None;
        self.paused_at_ms = 0.0;
        self.offset_ms = 0.0;
        self.paused = true;
    }

    /// Jump to a position (seeking).
    pub fn set_time_ms(&mut self, ms: f64) {
        if self.paused {
            self.paused_at_ms = ms;
        } else {
            self.started = Some(Instant::now());
            self.offset_ms = ms;
        }
    }

    /// Change the rate without losing the current position. Elapsed time up
    /// to now keeps the old rate.
    pub fn set_rate(&mut self, rate: f64) {
        let now = self.time_ms();
        self.rate = rate;
        if self.paused {
            self.paused_at_ms = now;
        } else {
            self.started = Some(Instant::now());
            self.offset_ms = now;
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Current position in milliseconds.
    pub fn time_ms(&self) -> f64 {
        if self.paused {
            self.paused_at_ms
        } else if let Some(started) = self.started {
            started.elapsed().as_secs_f64() * 1000.0 * self.rate + self.offset_ms
        } else {
            0.0
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn pause_freezes_time() {
        let mut clock = PlaybackClock::new();
        assert!(clock.is_paused());
        assert!(clock.time_ms().abs() < 0.001);

        clock.resume();
        sleep(Duration::from_millis(100));
        let t = clock.time_ms();
        assert!(t >= 90.0 && t <= 300.0, "t = {t}");

        clock.pause();
        let t1 = clock.time_ms();
        sleep(Duration::from_millis(50));
        let t2 = clock.time_ms();
        assert!((t1 - t2).abs() < 0.001);
    }

    #[test]
    fn seek_sets_the_position() {
        let mut clock = PlaybackClock::new();
        clock.set_time_ms(10_000.0);
        assert!((clock.time_ms() - 10_000.0).abs() < 0.001);

        clock.resume();
        sleep(Duration::from_millis(100));
        let t = clock.time_ms();
        assert!(t >= 10_090.0 && t <= 10_300.0, "t = {t}");
    }

    #[test]
    fn rate_scales_elapsed_time() {
        let mut clock = PlaybackClock::new();
        clock.set_rate(2.0);
        clock.resume();
        sleep(Duration::from_millis(100));
        let t = clock.time_ms();
        assert!(t >= 180.0 && t <= 600.0, "t = {t}");
    }

    #[test]
    fn rate_change_keeps_the_position() {
        let mut clock = PlaybackClock::new();
        clock.set_time_ms(5_000.0);
        clock.set_rate(0.5);
        assert!((clock.time_ms() - 5_000.0).abs() < 0.001);
    }
}
