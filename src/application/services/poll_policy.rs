use std::time::Duration;

/// Bounds and pacing for polling a transcription job.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub backoff_factor: f64,
    pub max_attempts: u32,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(60),
            backoff_factor: 2.0,
            max_attempts: 100,
            timeout: Duration::from_secs(3600),
        }
    }
}

impl PollPolicy {
    /// Wait before the poll with zero-based index `attempt`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(i32::MAX as u32) as i32;
        let factor = self.backoff_factor.max(1.0).powi(exponent);
        let secs = (self.initial_interval.as_secs_f64() * factor)
            .min(self.max_interval.as_secs_f64());
        Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(self.max_interval)
    }
}
