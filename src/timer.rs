use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum TimerError {
    #[error("stopwatch: missing start point")]
    MissingStart,
    #[error("stopwatch: missing end point")]
    MissingEnd,
}

/// Wall-clock stopwatch with whole-second resolution.
#[derive(Debug, Default)]
pub struct Stopwatch {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started() -> Self {
        let mut watch = Self::new();
        watch.start();
        watch
    }

    pub fn start(&mut self) {
        self.start = Some(Utc::now());
    }

    pub fn stop(&mut self) {
        self.end = Some(Utc::now());
    }

    /// Seconds between the recorded points. Both points are cleared on success.
    pub fn take_elapsed_secs(&mut self) -> Result<u64, TimerError> {
        let start = self.start.ok_or(TimerError::MissingStart)?;
        let end = self.end.ok_or(TimerError::MissingEnd)?;
        self.start = None;
        self.end = None;
        Ok(offset_secs(start, end))
    }
}

fn offset_secs(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    // Truncate each point to whole seconds before subtracting.
    let delta = end.timestamp() - start.timestamp();
    u64::try_from(delta).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn missing_points_are_reported() {
        let mut watch = Stopwatch::new();
        assert_eq!(watch.take_elapsed_secs(), Err(TimerError::MissingStart));
        watch.start();
        assert_eq!(watch.take_elapsed_secs(), Err(TimerError::MissingEnd));
    }

    #[test]
    fn reading_resets_points() {
        let mut watch = Stopwatch::started();
        watch.stop();
        assert!(watch.take_elapsed_secs().is_ok());
        assert_eq!(watch.take_elapsed_secs(), Err(TimerError::MissingStart));
    }

    #[test]
    fn offset_truncates_to_whole_seconds() {
        let start = Utc.timestamp_opt(100, 900_000_000).unwrap();
        let end = Utc.timestamp_opt(103, 100_000_000).unwrap();
        assert_eq!(offset_secs(start, end), 3);
    }

    #[test]
    fn backwards_clock_clamps_to_zero() {
        let start = Utc.timestamp_opt(200, 0).unwrap();
        let end = Utc.timestamp_opt(150, 0).unwrap();
        assert_eq!(offset_secs(start, end), 0);
    }
}
