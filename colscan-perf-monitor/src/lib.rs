//! Phase timing for load, filter and aggregate work.
//!
//! Everything here compiles down to nothing unless the `perf-mon` feature is
//! enabled. The feature check inside [`measure!`] is expanded in the calling
//! crate, so each caller forwards a `perf-mon` feature of its own.

use std::cell::Cell;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

const THRESHOLD_ENV: &str = "COLSCAN_PERF_THRESHOLD_MS";
const DEFAULT_THRESHOLD: Duration = Duration::from_millis(1);

/// An open timing scope. Nesting depth drops again when it goes away, even if
/// the timed expression returned early.
pub struct ScopeTimer {
    label: Option<&'static str>,
    started: Instant,
}

impl ScopeTimer {
    pub fn start(label: Option<&'static str>) -> Self {
        DEPTH.with(|d| d.set(d.get() + 1));
        Self {
            label,
            started: Instant::now(),
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    pub fn finish(self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Open [`ScopeTimer`]s on this thread.
pub fn depth() -> usize {
    DEPTH.with(Cell::get)
}

/// Evaluate an expression and time it.
///
/// Returns `(result, duration)`. Without `perf-mon` in the calling crate the
/// clock is never read and the duration is `Duration::ZERO`.
#[macro_export]
macro_rules! measure {
    ($label:literal, $e:expr) => {
        $crate::__measure_scope!(Some($label), $e)
    };
    ($e:expr) => {
        $crate::__measure_scope!(None, $e)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __measure_scope {
    ($label:expr, $e:expr) => {{
        #[cfg(feature = "perf-mon")]
        let timer = $crate::ScopeTimer::start($label);
        let result = $e;
        #[cfg(feature = "perf-mon")]
        let elapsed = timer.finish();
        #[cfg(not(feature = "perf-mon"))]
        let elapsed = ::std::time::Duration::ZERO;
        (result, elapsed)
    }};
}

fn threshold() -> Duration {
    static THRESHOLD: OnceLock<Duration> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var(THRESHOLD_ENV)
            .ok()
            .and_then(|ms| ms.trim().parse::<u64>().ok())
            .map_or(DEFAULT_THRESHOLD, Duration::from_millis)
    })
}

/// Whether `duration` is over `COLSCAN_PERF_THRESHOLD_MS` (1ms when unset).
/// Always false without `perf-mon`.
pub fn is_slow(duration: Duration) -> bool {
    cfg!(feature = "perf-mon") && duration > threshold()
}

/// Emit one `colscan::perf` event when any part is slow, indented by the
/// current scope depth. Returns whether anything was logged.
pub fn log_if_slow(label: &str, parts: &[(&str, Duration)]) -> bool {
    if !parts.iter().any(|&(_, d)| is_slow(d)) {
        return false;
    }
    let timings = parts
        .iter()
        .map(|(name, d)| format!("{name}={d:?}"))
        .collect::<Vec<_>>()
        .join(" ");
    tracing::info!(
        target: "colscan::perf",
        depth = depth(),
        "{}slow {label}: {timings}",
        "  ".repeat(depth())
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_track_depth() {
        assert_eq!(depth(), 0);
        let outer = ScopeTimer::start(Some("outer"));
        {
            let inner = ScopeTimer::start(None);
            assert_eq!(depth(), 2);
            assert_eq!(inner.label(), None);
        }
        assert_eq!(depth(), 1);
        assert_eq!(outer.label(), Some("outer"));
        let _ = outer.finish();
        assert_eq!(depth(), 0);
    }
}
