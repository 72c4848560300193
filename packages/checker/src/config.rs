//! Scheduler configuration

use std::time::Duration;

/// Tunables for the check scheduler
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Master switch for realtime (debounced) checking
    pub enabled: bool,

    /// Quiet period after the last keystroke before a check fires
    pub debounce_delay: Duration,

    /// Texts shorter than this are not worth checking; the store is cleared
    pub min_text_length: usize,

    /// Realtime checks refuse texts longer than this; manual checks ignore it
    pub max_text_length: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_delay: Duration::from_millis(1000),
            min_text_length: 10,
            max_text_length: 10_000,
        }
    }
}
