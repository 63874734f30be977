//! Error types for the protection scheduler and screen capture

use thiserror::Error;

/// Errors reported synchronously when controlling protection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Interval or break duration was zero or negative
    #[error("Please enter valid values for interval and break duration.")]
    InvalidSettings {
        interval_minutes: i64,
        break_duration_secs: i64,
    },
    /// Start was requested while protection is already running or paused
    #[error("Eye protection is already active")]
    AlreadyActive,
}

/// Errors raised while grabbing or processing the primary display image
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Screen capture is not available on this platform
    #[error("screen capture is not supported on this platform")]
    Unsupported,
    /// The display reported unusable dimensions
    #[error("invalid display dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    /// An OS call in the capture path failed
    #[error("{call} failed")]
    Os { call: &'static str },
    /// Captured pixel buffer did not match the reported dimensions
    #[error("captured buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Errors raised when a break overlay cannot be opened
#[derive(Debug, Error)]
pub enum BreakError {
    /// A break is already on screen
    #[error("a break session is already active")]
    AlreadyActive,
    /// Break duration must be positive
    #[error("break duration must be positive, got {0}")]
    InvalidDuration(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_settings_dialog_text() {
        let error = ScheduleError::InvalidSettings {
            interval_minutes: 0,
            break_duration_secs: -5,
        };
        assert_eq!(
            error.to_string(),
            "Please enter valid values for interval and break duration."
        );
    }
}
