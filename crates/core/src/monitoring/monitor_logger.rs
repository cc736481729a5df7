use std::collections::HashMap;
use std::time::Instant;

pub const STAGE_CAPTURE: &str = "capture";
pub const STAGE_DETECT: &str = "detect";
pub const STAGE_REPORT: &str = "report";

pub const COUNTER_SAMPLED: &str = "sampled";
pub const COUNTER_REPORTED: &str = "reported";
pub const COUNTER_DROPPED: &str = "dropped";

/// Observer for sampling-loop activity.
///
/// Keeps the loop independent of where timings and counters end up, so the
/// binary can print a summary while tests stay silent.
pub trait MonitorLogger: Send {
    /// Record how long a named stage took for one sampled frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Bump a named event counter by one.
    fn count(&mut self, counter: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

pub struct NullMonitorLogger;

impl MonitorLogger for NullMonitorLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn count(&mut self, _counter: &str) {}
}

/// Running aggregate of one stage's timings. Its size does not depend on
/// how many frames were timed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageTimings {
    pub runs: usize,
    pub total_ms: f64,
    pub max_ms: f64,
}

impl StageTimings {
    fn record(&mut self, duration_ms: f64) {
        self.runs += 1;
        self.total_ms += duration_ms;
        self.max_ms = self.max_ms.max(duration_ms);
    }

    pub fn avg_ms(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.total_ms / self.runs as f64
        }
    }
}

/// Aggregates per-stage timings and counters and logs a summary at `info`
/// when the session ends.
pub struct SummaryMonitorLogger {
    timings: HashMap<String, StageTimings>,
    counters: HashMap<String, usize>,
    start_time: Instant,
}

impl SummaryMonitorLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            counters: HashMap::new(),
            start_time: Instant::now(),
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.counters.is_empty() {
            return None;
        }

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!("Monitor summary ({elapsed:.1}s running):")];

        let mut stages: Vec<_> = self.timings.iter().collect();
        stages.sort_by(|a, b| a.0.cmp(b.0));
        for (stage, stats) in stages {
            lines.push(format!(
                "  {stage:8}: avg {:6.1}ms  max {:6.1}ms  ({} runs)",
                stats.avg_ms(),
                stats.max_ms,
                stats.runs
            ));
        }

        let mut counters: Vec<_> = self.counters.iter().collect();
        counters.sort();
        for (name, value) in counters {
            lines.push(format!("  {name}: {value}"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<StageTimings> {
        self.timings.get(stage).copied()
    }

    pub fn counter(&self, name: &str) -> usize {
        self.counters.get(name).copied().unwrap_or(0)
    }
}

impl Default for SummaryMonitorLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorLogger for SummaryMonitorLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        match self.timings.get_mut(stage) {
            Some(stats) => stats.record(duration_ms),
            None => {
                let mut stats = StageTimings::default();
                stats.record(duration_ms);
                self.timings.insert(stage.to_string(), stats);
            }
        }
    }

    fn count(&mut self, counter: &str) {
        match self.counters.get_mut(counter) {
            Some(value) => *value += 1,
            None => {
                self.counters.insert(counter.to_string(), 1);
            }
        }
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_is_noop() {
        let mut logger = NullMonitorLogger;
        logger.timing(STAGE_DETECT, 5.0);
        logger.count(COUNTER_SAMPLED);
        logger.summary();
    }

    #[test]
    fn test_timing_records_values_per_stage() {
        let mut logger = SummaryMonitorLogger::new();
        logger.timing(STAGE_DETECT, 20.0);
        logger.timing(STAGE_DETECT, 30.0);
        logger.timing(STAGE_REPORT, 5.0);

        let detect = logger.timings_for(STAGE_DETECT).unwrap();
        assert_eq!(detect.runs, 2);
        assert_relative_eq!(detect.avg_ms(), 25.0);
        assert_relative_eq!(detect.max_ms, 30.0);
        assert_eq!(logger.timings_for(STAGE_REPORT).unwrap().runs, 1);
        assert!(logger.timings_for(STAGE_CAPTURE).is_none());
    }

    #[test]
    fn test_long_session_keeps_aggregates_only() {
        let mut logger = SummaryMonitorLogger::new();
        // One day at one sample per second.
        for i in 0..86_400 {
            logger.timing(STAGE_DETECT, if i == 100 { 9.0 } else { 1.0 });
        }

        let detect = logger.timings_for(STAGE_DETECT).unwrap();
        assert_eq!(detect.runs, 86_400);
        assert_relative_eq!(detect.max_ms, 9.0);
        assert_relative_eq!(detect.total_ms, 86_408.0);
        assert_eq!(logger.timings.len(), 1);
    }

    #[test]
    fn test_empty_stage_average_is_zero() {
        assert_relative_eq!(StageTimings::default().avg_ms(), 0.0);
    }

    #[test]
    fn test_counters_accumulate() {
        let mut logger = SummaryMonitorLogger::new();
        logger.count(COUNTER_SAMPLED);
        logger.count(COUNTER_SAMPLED);
        logger.count(COUNTER_DROPPED);

        assert_eq!(logger.counter(COUNTER_SAMPLED), 2);
        assert_eq!(logger.counter(COUNTER_DROPPED), 1);
        assert_eq!(logger.counter(COUNTER_REPORTED), 0);
    }

    #[test]
    fn test_summary_lists_stages_and_counters() {
        let mut logger = SummaryMonitorLogger::new();
        logger.timing(STAGE_DETECT, 10.0);
        logger.timing(STAGE_DETECT, 30.0);
        logger.count(COUNTER_REPORTED);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Monitor summary"));
        assert!(summary.contains("detect"));
        assert!(summary.contains("avg   20.0ms"));
        assert!(summary.contains("max   30.0ms"));
        assert!(summary.contains("reported: 1"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(SummaryMonitorLogger::new().summary_string().is_none());
    }
}
