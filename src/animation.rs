//! Reveal and counter animation math
//!
//! The browser runs the actual frames; this module owns the curves so the
//! numbers are the same in the web UI and the terminal.

use serde::Serialize;
use std::time::Duration;

pub const REVEAL_DURATION: Duration = Duration::from_millis(300);
pub const STAGGER_STEP: Duration = Duration::from_millis(100);
/// Spacing of sampled reveal frames
pub const REVEAL_FRAME: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reveal {
    /// Height grows from 0 to the content height
    SlideDown,
    /// Opacity grows from 0 to 1
    FadeIn,
}

impl Reveal {
    /// Progress in `[0, 1]` after each `REVEAL_FRAME` tick; the last is 1.
    ///
    /// Slide frames are a fraction of the content height, which only the
    /// page knows.
    pub fn frames(self, duration: Duration) -> Vec<f64> {
        let count = (duration.as_millis() / REVEAL_FRAME.as_millis()).max(1) as u32;
        let step = duration.checked_div(count).unwrap_or(Duration::ZERO);
        (1..=count)
            .map(|i| {
                let elapsed = step * i;
                match self {
                    Reveal::FadeIn => fade_opacity(elapsed, duration),
                    Reveal::SlideDown => slide_height(elapsed, duration, 1.0),
                }
            })
            .collect()
    }
}

fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

pub fn fade_opacity(elapsed: Duration, duration: Duration) -> f64 {
    progress(elapsed, duration)
}

pub fn slide_height(elapsed: Duration, duration: Duration, target_height: f64) -> f64 {
    (progress(elapsed, duration) * target_height).min(target_height)
}

/// Entrance delay of the `index`-th card when a tab is re-entered
pub fn stagger_delay(index: usize) -> Duration {
    STAGGER_STEP.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// CSS `animation-delay` for the `index`-th card of a grid ("0.3s")
pub fn card_delay_css(index: usize) -> String {
    format!("{:.1}s", index as f64 * 0.1)
}

/// Counts a stat card up from 0 to `target` in `steps` linear ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterAnimation {
    pub target: u32,
    pub steps: u32,
    #[serde(serialize_with = "as_millis")]
    pub tick: Duration,
    #[serde(serialize_with = "as_millis")]
    pub start_delay: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

impl CounterAnimation {
    pub const DEFAULT_STEPS: u32 = 30;
    pub const DEFAULT_TICK: Duration = Duration::from_millis(50);
    pub const DEFAULT_START_DELAY: Duration = Duration::from_millis(500);

    pub fn new(target: u32) -> Self {
        Self {
            target,
            steps: Self::DEFAULT_STEPS,
            tick: Self::DEFAULT_TICK,
            start_delay: Self::DEFAULT_START_DELAY,
        }
    }

    /// Value shown after tick `k` (1-based). The last tick is exactly `target`.
    pub fn value_at(&self, k: u32) -> u32 {
        if k >= self.steps {
            return self.target;
        }
        (u64::from(self.target) * u64::from(k) / u64::from(self.steps)) as u32
    }

    pub fn frames(&self) -> Vec<u32> {
        if self.target == 0 {
            return vec![0];
        }
        (1..=self.steps).map(|k| self.value_at(k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // REVEAL CURVE TESTS
    // ==========================================================================

    #[test]
    fn test_fade_opacity_clamps() {
        assert_eq!(fade_opacity(Duration::ZERO, REVEAL_DURATION), 0.0);
        assert!((fade_opacity(Duration::from_millis(150), REVEAL_DURATION) - 0.5).abs() < 1e-9);
        assert_eq!(fade_opacity(Duration::from_millis(900), REVEAL_DURATION), 1.0);
        assert_eq!(fade_opacity(Duration::from_millis(5), Duration::ZERO), 1.0);
    }

    #[test]
    fn test_slide_height_never_exceeds_target() {
        for ms in (0..=600).step_by(25) {
            let h = slide_height(Duration::from_millis(ms), REVEAL_DURATION, 240.0);
            assert!(h <= 240.0);
        }
        assert_eq!(slide_height(Duration::from_millis(300), REVEAL_DURATION, 240.0), 240.0);
    }

    #[test]
    fn test_reveal_frames_follow_curves() {
        let fade = Reveal::FadeIn.frames(REVEAL_DURATION);
        assert_eq!(fade.len(), 15);
        assert!((fade[0] - 20.0 / 300.0).abs() < 1e-9);
        assert!((fade[6] - 140.0 / 300.0).abs() < 1e-9);
        assert_eq!(*fade.last().unwrap(), 1.0);
        assert!(fade.windows(2).all(|w| w[0] < w[1]));

        let slide = Reveal::SlideDown.frames(REVEAL_DURATION);
        assert_eq!(slide, fade);
        assert_eq!(Reveal::FadeIn.frames(Duration::ZERO), vec![1.0]);
    }

    #[test]
    fn test_stagger_saturates() {
        assert_eq!(stagger_delay(usize::MAX), STAGGER_STEP.saturating_mul(u32::MAX));
    }

    #[test]
    fn test_stagger_is_linear() {
        assert_eq!(stagger_delay(0), Duration::ZERO);
        assert_eq!(stagger_delay(1), Duration::from_millis(100));
        assert_eq!(stagger_delay(4), Duration::from_millis(400));
        assert_eq!(card_delay_css(0), "0.0s");
        assert_eq!(card_delay_css(3), "0.3s");
    }

    // ==========================================================================
    // COUNTER TESTS
    // ==========================================================================
    //
    // Counters must climb monotonically from 0 and land exactly on target.
    // ==========================================================================

    #[test]
    fn test_counters_settle_on_target_without_overshoot() {
        for target in [3u32, 1, 0, 5] {
            let frames = CounterAnimation::new(target).frames();
            assert_eq!(*frames.last().unwrap(), target, "target {}", target);
            assert!(frames.iter().all(|v| *v <= target), "overshoot for {}", target);
            assert!(frames.windows(2).all(|w| w[0] <= w[1]), "not monotonic for {}", target);
        }
    }

    #[test]
    fn test_counter_frame_count() {
        assert_eq!(CounterAnimation::new(5).frames().len(), 30);
        assert_eq!(CounterAnimation::new(0).frames(), vec![0]);
    }

    #[test]
    fn test_counter_large_target_is_exact() {
        let frames = CounterAnimation::new(1000).frames();
        assert_eq!(frames.len(), 30);
        assert_eq!(frames[0], 33);
        assert_eq!(frames[28], 966);
        assert_eq!(frames[29], 1000);
    }

    #[test]
    fn test_counter_starts_low() {
        let frames = CounterAnimation::new(3).frames();
        assert_eq!(frames[0], 0);
        assert_eq!(frames[9], 1);
    }
}
