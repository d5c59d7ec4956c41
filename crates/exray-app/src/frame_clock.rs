//! Frame pacing and frame rate measurement.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of recent frames the rate is averaged over.
const SAMPLE_WINDOW: usize = 60;

/// Paces redraws to a target rate and measures the rate actually achieved.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Minimum time between frames, `None` when uncapped.
    interval: Option<Duration>,
    frame_times: VecDeque<Instant>,
}

impl FrameClock {
    /// A clock targeting `frame_rate` frames per second. Zero means uncapped.
    pub fn new(frame_rate: u32) -> Self {
        let interval = (frame_rate > 0).then(|| Duration::from_secs(1) / frame_rate);
        Self {
            interval,
            frame_times: VecDeque::with_capacity(SAMPLE_WINDOW + 1),
        }
    }

    pub fn is_capped(&self) -> bool {
        self.interval.is_some()
    }

    /// Record a frame presented at `now`.
    pub fn tick(&mut self, now: Instant) {
        self.frame_times.push_back(now);
        while self.frame_times.len() > SAMPLE_WINDOW {
            self.frame_times.pop_front();
        }
    }

    /// Average frames per second over the recent window, rounded.
    pub fn fps(&self) -> u32 {
        let (Some(oldest), Some(newest)) = (self.frame_times.front(), self.frame_times.back())
        else {
            return 0;
        };
        let elapsed = newest.saturating_duration_since(*oldest).as_secs_f64();
        if elapsed <= 0.0 {
            return 0;
        }
        ((self.frame_times.len() - 1) as f64 / elapsed).round() as u32
    }

    /// When the next frame is due. `None` when uncapped or before the first frame.
    pub fn next_frame(&self) -> Option<Instant> {
        let interval = self.interval?;
        self.frame_times.back().map(|last| *last + interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measures_steady_rate() {
        let start = Instant::now();
        let mut clock = FrameClock::new(60);
        for i in 0..10 {
            clock.tick(start + Duration::from_millis(50) * i);
        }
        assert_eq!(clock.fps(), 20);
    }

    #[test]
    fn test_rate_follows_recent_frames() {
        let start = Instant::now();
        let mut clock = FrameClock::new(0);
        let mut now = start;
        for _ in 0..100 {
            clock.tick(now);
            now += Duration::from_millis(100);
        }
        for _ in 0..SAMPLE_WINDOW {
            now += Duration::from_millis(25);
            clock.tick(now);
        }
        assert_eq!(clock.fps(), 40);
    }

    #[test]
    fn test_no_rate_before_two_frames() {
        let mut clock = FrameClock::new(60);
        assert_eq!(clock.fps(), 0);
        clock.tick(Instant::now());
        assert_eq!(clock.fps(), 0);
    }

    #[test]
    fn test_next_frame_deadline() {
        let start = Instant::now();
        let mut clock = FrameClock::new(50);
        assert!(clock.is_capped());
        assert_eq!(clock.next_frame(), None);

        clock.tick(start);
        assert_eq!(clock.next_frame(), Some(start + Duration::from_millis(20)));
    }

    #[test]
    fn test_uncapped_has_no_deadline() {
        let mut clock = FrameClock::new(0);
        clock.tick(Instant::now());
        assert!(!clock.is_capped());
        assert_eq!(clock.next_frame(), None);
    }
}
