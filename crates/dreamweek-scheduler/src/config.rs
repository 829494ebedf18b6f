use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Check-ins per week for weekly goals that do not set a frequency.
    pub weekly_frequency: u32,
    /// Check-ins per week for monthly goals that do not set a frequency.
    pub monthly_frequency: u32,
    /// Buffered signals per event-bus subscriber before it lags.
    pub event_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            weekly_frequency: 1,
            monthly_frequency: 2,
            event_capacity: 64,
        }
    }
}
