use std::time::{Duration, Instant};

/// Collects frame times and reports an average about once a second.
pub struct FrameStats {
    frametimes: Vec<f64>,
    last_report: Instant,
    report_every: Duration,
}

/// Average over one reporting window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub avg_frametime: f64,
    pub fps: f64,
    pub frames: usize,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            frametimes: Vec::with_capacity(240),
            last_report: now,
            report_every: Duration::from_secs(1),
        }
    }

    /// Record one frame that took `frametime`. Returns a report when a window closed.
    pub fn record(&mut self, frametime: Duration, now: Instant) -> Option<FrameReport> {
        self.frametimes.push(frametime.as_secs_f64());

        if now.duration_since(self.last_report) < self.report_every {
            return None;
        }
        // can't reduce since we're keeping this Vec around
        let total_time: f64 = self.frametimes.iter().sum();
        let frames = self.frametimes.len();
        let avg_frametime = total_time / frames as f64;
        self.frametimes.clear();
        self.last_report = now;

        Some(FrameReport {
            avg_frametime,
            fps: if avg_frametime > 0.0 {
                1.0 / avg_frametime
            } else {
                0.0
            },
            frames,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_window() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        let frame = Duration::from_millis(10);

        for i in 1..100 {
            assert!(stats.record(frame, start + frame * i).is_none());
        }
        let report = stats.record(frame, start + Duration::from_secs(1)).unwrap();
        assert_eq!(report.frames, 100);
        assert!((report.avg_frametime - 0.01).abs() < 1e-9);
        assert!((report.fps - 100.0).abs() < 1e-6);

        // the window restarted
        assert!(stats
            .record(frame, start + Duration::from_millis(1500))
            .is_none());
    }
}
