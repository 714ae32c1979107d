// ABOUTME: Shared tracing setup for every swatch crate
// ABOUTME: Crates log through the re-exported macros; only the binary installs a subscriber

pub mod config;
pub mod layers;
pub mod performance;
pub mod subscriber;

pub use tracing::{Level, Span, debug, error, info, instrument, span, trace, warn};

pub use config::{LogLevel, LoggingConfig};
pub use performance::PerfTimer;
pub use subscriber::{LoggingGuard, init_subscriber};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::{fmt, prelude::*};

    /// In-memory writer for a subscriber scoped to one test
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(move || writer.clone()),
        );
        tracing::subscriber::with_default(subscriber, f);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_macros_emit_structured_fields() {
        let output = capture(|| {
            info!(category = "modes", "Comparing token trees");
            warn!(token = "palette-primary-400", "Unresolved color-mix reference");
        });
        assert!(output.contains("Comparing token trees"));
        assert!(output.contains("category=\"modes\""));
        assert!(output.contains("palette-primary-400"));
    }

    #[test]
    fn test_perf_timer_logs_stage_on_drop() {
        let output = capture(|| {
            let timer = PerfTimer::new("validate_plan");
            timer.finish();
        });
        assert!(output.contains("Stage finished"));
        assert!(output.contains("validate_plan"));
    }

    #[test]
    fn test_perf_timer_warns_past_threshold() {
        let output = capture(|| {
            let timer = PerfTimer::new("generate_fallbacks")
                .with_warn_threshold(std::time::Duration::ZERO);
            std::thread::sleep(std::time::Duration::from_millis(2));
            timer.finish();
        });
        assert!(output.contains("WARN"));
        assert!(output.contains("Stage ran past its time budget"));
        assert!(!output.contains("Stage finished"));
    }

    #[test]
    fn test_fast_stage_stays_at_debug() {
        let output = capture(|| {
            let _timer = PerfTimer::new("validate_plan")
                .with_warn_threshold(std::time::Duration::from_secs(60));
        });
        assert!(output.contains("DEBUG"));
        assert!(!output.contains("time budget"));
    }
}
