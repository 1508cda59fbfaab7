//! Rolling frame-rate statistics reported by the render loop.

use std::{collections::VecDeque, time::Duration};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);
const TRAILING_WINDOW: Duration = Duration::from_secs(10);

/// Durations measured for one iteration of the render loop.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FrameSample {
    pub(crate) frame: Duration,
    pub(crate) simulation: Duration,
    pub(crate) render: Duration,
}

/// Averages produced once per reporting interval.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrameReport {
    pub(crate) fps: f32,
    pub(crate) trailing_fps: f32,
    pub(crate) simulation: Duration,
    pub(crate) render: Duration,
}

#[derive(Debug, Default)]
pub(crate) struct FrameStats {
    interval: Vec<FrameSample>,
    interval_elapsed: Duration,
    trailing: VecDeque<Duration>,
    trailing_elapsed: Duration,
}

impl FrameStats {
    /// Adds a sample, yielding a report whenever a full interval has elapsed.
    pub(crate) fn sample(&mut self, sample: FrameSample) -> Option<FrameReport> {
        self.interval.push(sample);
        self.interval_elapsed += sample.frame;

        self.trailing.push_back(sample.frame);
        self.trailing_elapsed += sample.frame;
        while self.trailing_elapsed > TRAILING_WINDOW {
            match self.trailing.pop_front() {
                Some(oldest) => self.trailing_elapsed -= oldest,
                None => break,
            }
        }

        if self.interval_elapsed < REPORT_INTERVAL {
            return None;
        }

        let seconds = std::mem::take(&mut self.interval_elapsed).as_secs_f32();
        let samples = std::mem::take(&mut self.interval);
        let count = u32::try_from(samples.len()).ok().filter(|count| *count > 0)?;
        if seconds <= f32::EPSILON {
            return None;
        }

        let fps = count as f32 / seconds;
        let trailing_seconds = self.trailing_elapsed.as_secs_f32();
        let trailing_fps = if trailing_seconds > f32::EPSILON {
            self.trailing.len() as f32 / trailing_seconds
        } else {
            fps
        };
        let simulation: Duration = samples.iter().map(|sample| sample.simulation).sum();
        let render: Duration = samples.iter().map(|sample| sample.render).sum();

        Some(FrameReport {
            fps,
            trailing_fps,
            simulation: simulation / count,
            render: render / count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_of(millis: u64) -> FrameSample {
        FrameSample {
            frame: Duration::from_millis(millis),
            ..FrameSample::default()
        }
    }

    #[test]
    fn reports_once_per_second() {
        let mut stats = FrameStats::default();
        let reports: Vec<_> = (0..40)
            .filter_map(|_| stats.sample(frame_of(50)))
            .collect();

        assert_eq!(reports.len(), 2);
        assert!((reports[0].fps - 20.0).abs() <= 1e-3);
        assert!((reports[1].trailing_fps - 20.0).abs() <= 1e-3);
    }

    #[test]
    fn trailing_rate_blends_slow_and_fast_seconds() {
        let mut stats = FrameStats::default();
        for _ in 0..9 {
            for _ in 0..4 {
                let _ = stats.sample(frame_of(250));
            }
        }

        let mut last = None;
        for _ in 0..20 {
            last = stats.sample(frame_of(50)).or(last);
        }

        let report = last.expect("a full second of fast frames");
        assert!((report.fps - 20.0).abs() <= 1e-3);
        assert!((report.trailing_fps - 5.6).abs() <= 1e-3);
    }

    #[test]
    fn stage_durations_are_averaged_over_the_interval() {
        let mut stats = FrameStats::default();
        let mut report = None;
        for step in 0..2u64 {
            report = stats.sample(FrameSample {
                frame: Duration::from_millis(500),
                simulation: Duration::from_millis(1 + 2 * step),
                render: Duration::from_millis(4),
            });
        }

        let report = report.expect("one second elapsed");
        assert_eq!(report.simulation, Duration::from_millis(2));
        assert_eq!(report.render, Duration::from_millis(4));
    }
}
