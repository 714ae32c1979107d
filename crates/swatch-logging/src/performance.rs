// ABOUTME: Stage timing for the validation and fallback pipelines
// ABOUTME: Each timer owns a DEBUG span and reports its duration when dropped

use std::time::{Duration, Instant};

use tracing::{Span, debug, debug_span, field, warn};

/// Times one pipeline stage; the measurement is emitted on drop.
pub struct PerfTimer {
    stage: String,
    span: Span,
    started: Instant,
    slow_after: Option<Duration>,
}

impl PerfTimer {
    pub fn new(stage: &str) -> Self {
        Self {
            stage: stage.to_owned(),
            span: debug_span!("pipeline_stage", stage, elapsed_ms = field::Empty),
            started: Instant::now(),
            slow_after: None,
        }
    }

    /// Warn instead of logging at DEBUG when the stage takes longer than `threshold`
    pub fn with_warn_threshold(mut self, threshold: Duration) -> Self {
        self.slow_after = Some(threshold);
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop timing now and return the elapsed time
    pub fn finish(self) -> Duration {
        self.elapsed()
    }
}

impl Drop for PerfTimer {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.span.record("elapsed_ms", elapsed_ms);

        let _entered = self.span.enter();
        match self.slow_after {
            Some(limit) if elapsed > limit => warn!(
                stage = %self.stage,
                elapsed_ms,
                limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                "Stage ran past its time budget"
            ),
            _ => debug!(stage = %self.stage, elapsed_ms, "Stage finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_measures_elapsed_time() {
        let timer = PerfTimer::new("extract_tokens");
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.elapsed() >= Duration::from_millis(5));
        assert!(timer.finish() >= Duration::from_millis(5));
    }

    #[test]
    fn test_threshold_is_kept() {
        let timer = PerfTimer::new("render_fallbacks").with_warn_threshold(Duration::ZERO);
        assert_eq!(timer.slow_after, Some(Duration::ZERO));
        std::thread::sleep(Duration::from_millis(1));
        // Past the threshold: dropping logs a warning rather than panicking
        drop(timer);
    }
}
