//! Rolling check metrics

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;

/// History entries kept per scheduler
pub const HISTORY_LIMIT: usize = 10;

/// One completed check
#[derive(Debug, Clone)]
pub struct CheckRecord {
    pub timestamp: DateTime<Utc>,
    pub response_time_ms: u64,
    pub suggestion_count: usize,
}

/// Rolling metrics over completed checks
#[derive(Debug, Clone, Default)]
pub struct CheckMetrics {
    pub total_checks: u64,
    pub total_suggestions: u64,

    /// Two-point rolling average: `(previous + latest) / 2`
    pub average_response_time_ms: f64,

    /// Most recent checks, oldest first, capped at [`HISTORY_LIMIT`]
    pub history: VecDeque<CheckRecord>,
}

impl CheckMetrics {
    pub fn record(&mut self, response_time: Duration, suggestion_count: usize) {
        let ms = response_time.as_millis() as f64;
        self.total_checks += 1;
        self.total_suggestions += suggestion_count as u64;
        self.average_response_time_ms = if self.total_checks == 1 {
            ms
        } else {
            (self.average_response_time_ms + ms) / 2.0
        };

        self.history.push_back(CheckRecord {
            timestamp: Utc::now(),
            response_time_ms: response_time.as_millis() as u64,
            suggestion_count,
        });
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_record_sets_average() {
        let mut metrics = CheckMetrics::default();
        metrics.record(Duration::from_millis(200), 3);

        assert_eq!(metrics.total_checks, 1);
        assert_eq!(metrics.total_suggestions, 3);
        assert_eq!(metrics.average_response_time_ms, 200.0);
    }

    #[test]
    fn test_rolling_average_is_two_point() {
        let mut metrics = CheckMetrics::default();
        metrics.record(Duration::from_millis(200), 1);
        metrics.record(Duration::from_millis(100), 2);

        assert_eq!(metrics.average_response_time_ms, 150.0);
        assert_eq!(metrics.total_suggestions, 3);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut metrics = CheckMetrics::default();
        for i in 0..15 {
            metrics.record(Duration::from_millis(i), i as usize);
        }

        assert_eq!(metrics.history.len(), HISTORY_LIMIT);
        assert_eq!(metrics.total_checks, 15);
        // Oldest entries dropped first
        assert_eq!(metrics.history.front().unwrap().response_time_ms, 5);
    }
}
