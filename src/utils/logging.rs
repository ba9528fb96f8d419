use log::{Level, log_enabled, warn};
use std::time::Instant;

/// Simple scoped timer for tracing the phases of a simulation step.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("start {label}");
        }
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            let elapsed = self.start.elapsed();
            log::trace!("end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Warns when total energy has drifted further than `tolerance` from its baseline.
///
/// Returns whether the warning fired. A non-positive tolerance disables the check.
pub fn warn_if_energy_drift_exceeded(drift: f64, tolerance: f64) -> bool {
    if tolerance <= 0.0 || drift.abs() <= tolerance {
        return false;
    }
    warn!(
        "Energy drifted by {drift:.6} (tolerance {tolerance:.6}); \
         consider a smaller timestep or more correction iterations"
    );
    true
}
