//! Profiling metrics with time-based measurements.
//!
//! Frame timing statistics plus update and paint counters. The `DebugLog`
//! type is in the common crate since it doesn't need time.

use std::time::{Duration, Instant};

use g5_common::debug_log::push_u32;
use g5_common::parameters::BatchReport;
use heapless::String;

/// Frame timing and render statistics for profiling.
pub struct ProfilingMetrics {
    // Frame timing (microseconds)
    pub frame_time_us: u32,
    pub render_time_us: u32,
    pub sleep_time_us: u32,

    // Statistics
    pub frame_time_min_us: u32,
    pub frame_time_max_us: u32,
    frame_time_avg_us: f32,

    // Counters
    pub total_frames: u64,
    pub batches: u32,
    pub params_applied: u32,
    pub params_rejected: u32,
    pub paints: u32,

    // Uptime tracking
    start_time: Instant,
}

impl ProfilingMetrics {
    const EMA_ALPHA: f32 = 0.1;

    pub fn new() -> Self {
        Self {
            frame_time_us: 0,
            render_time_us: 0,
            sleep_time_us: 0,
            frame_time_min_us: u32::MAX,
            frame_time_max_us: 0,
            frame_time_avg_us: 0.0,
            total_frames: 0,
            batches: 0,
            params_applied: 0,
            params_rejected: 0,
            paints: 0,
            start_time: Instant::now(),
        }
    }

    /// Record frame timing for this frame.
    pub fn record_frame(
        &mut self,
        total_time: Duration,
        render_time: Duration,
        sleep_time: Duration,
    ) {
        let total_us = total_time.as_micros() as u32;

        self.frame_time_us = total_us;
        self.render_time_us = render_time.as_micros() as u32;
        self.sleep_time_us = sleep_time.as_micros() as u32;

        self.frame_time_min_us = self.frame_time_min_us.min(total_us);
        self.frame_time_max_us = self.frame_time_max_us.max(total_us);

        if self.total_frames == 0 {
            self.frame_time_avg_us = total_us as f32;
        } else {
            self.frame_time_avg_us =
                Self::EMA_ALPHA.mul_add(total_us as f32, (1.0 - Self::EMA_ALPHA) * self.frame_time_avg_us);
        }

        self.total_frames += 1;
    }

    /// Count one applied update batch.
    pub fn record_batch(
        &mut self,
        report: BatchReport,
    ) {
        self.batches += 1;
        self.params_applied += report.applied;
        self.params_rejected += report.rejected;
    }

    #[inline]
    pub fn inc_paints(&mut self) { self.paints += 1; }

    /// Get average frame time in microseconds.
    #[inline]
    pub const fn frame_time_avg_us(&self) -> u32 { self.frame_time_avg_us as u32 }

    #[inline]
    pub fn uptime(&self) -> Duration { self.start_time.elapsed() }

    /// Format uptime as HH:MM:SS string.
    pub fn uptime_string(&self) -> String<12> { format_hms(self.uptime().as_secs()) }
}

impl Default for ProfilingMetrics {
    fn default() -> Self { Self::new() }
}

fn format_hms(secs: u64) -> String<12> {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    let mut s = String::new();
    for (i, part) in [hours, mins, secs].into_iter().enumerate() {
        if i > 0 {
            s.push(':').ok();
        }
        if part < 10 {
            s.push('0').ok();
        }
        push_u32(&mut s, part as u32);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_statistics() {
        let mut m = ProfilingMetrics::new();
        m.record_frame(Duration::from_millis(20), Duration::from_millis(5), Duration::from_millis(15));
        m.record_frame(Duration::from_millis(10), Duration::from_millis(4), Duration::from_millis(6));
        assert_eq!(m.frame_time_min_us, 10_000);
        assert_eq!(m.frame_time_max_us, 20_000);
        assert_eq!(m.total_frames, 2);
        // EMA moves a tenth of the way toward the new sample
        assert!((18_990..=19_010).contains(&m.frame_time_avg_us()));
    }

    #[test]
    fn test_batch_counters() {
        let mut m = ProfilingMetrics::new();
        m.record_batch(BatchReport { applied: 3, rejected: 1 });
        m.record_batch(BatchReport { applied: 2, rejected: 0 });
        assert_eq!((m.batches, m.params_applied, m.params_rejected), (2, 5, 1));
    }

    #[test]
    fn test_uptime_format() {
        assert_eq!(format_hms(0).as_str(), "00:00:00");
        assert_eq!(format_hms(3 * 3600 + 7 * 60 + 42).as_str(), "03:07:42");
    }
}
