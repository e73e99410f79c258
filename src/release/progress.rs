//! Wall-clock progress for multi-day releases.

use std::time::Instant;

/// Reports progress through the days of a release.
#[derive(Clone, Debug)]
pub struct ProgressReporter {
    /// Wall clock at creation
    start_instant: Instant,
    label: String,
    total_days: usize,
    days_done: usize,
    /// Particle sub-steps taken, for throughput
    n_particle_steps: u64,
}

impl ProgressReporter {
    /// Create a reporter for `total_days` tracking days.
    pub fn new(label: impl Into<String>, total_days: usize) -> Self {
        Self {
            start_instant: Instant::now(),
            label: label.into(),
            total_days,
            days_done: 0,
            n_particle_steps: 0,
        }
    }

    /// Days finished so far.
    #[inline]
    pub fn days_done(&self) -> usize {
        self.days_done
    }

    /// Fraction of the release finished, in [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.total_days == 0 {
            1.0
        } else {
            (self.days_done as f64 / self.total_days as f64).min(1.0)
        }
    }

    /// Record a finished day of `particle_steps` particle sub-steps and log it.
    pub fn day_done(&mut self, particle_steps: u64) {
        self.days_done += 1;
        self.n_particle_steps += particle_steps;

        let elapsed = self.start_instant.elapsed().as_secs_f64();
        let pct = self.fraction() * 100.0;
        let eta = if self.days_done > 0 {
            let remaining = elapsed / self.days_done as f64
                * self.total_days.saturating_sub(self.days_done) as f64;
            format_duration(remaining)
        } else {
            "calculating...".to_string()
        };
        let steps_per_sec = if elapsed > 0.0 {
            self.n_particle_steps as f64 / elapsed
        } else {
            0.0
        };

        log::info!(
            "{}: day {}/{} [{:>5.1}%] | elapsed={} | ETA={} | {:.0} particle-steps/s",
            self.label,
            self.days_done,
            self.total_days,
            pct,
            format_duration(elapsed),
            eta,
            steps_per_sec
        );
    }

    /// Log the final summary and return the wall time in seconds.
    pub fn finish(&self) -> f64 {
        let elapsed = self.start_instant.elapsed().as_secs_f64();
        log::info!(
            "{}: {} of {} days in {}",
            self.label,
            self.days_done,
            self.total_days,
            format_duration(elapsed)
        );
        elapsed
    }
}

/// Format seconds as a short human-readable duration.
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let s = secs - mins * 60.0;
        format!("{:.0}m{:.0}s", mins, s)
    } else {
        let hours = (secs / 3600.0).floor();
        let mins = ((secs - hours * 3600.0) / 60.0).floor();
        format!("{:.0}h{:.0}m", hours, mins)
    }
}
