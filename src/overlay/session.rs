//! Break session state and its single-shot completion signal

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

use crate::error::BreakError;

/// Remaining seconds at or below which a break may be skipped
pub const SKIP_WINDOW_SECS: u32 = 5;

/// How a break session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakOutcome {
    /// The countdown reached zero
    TimedOut,
    /// The user skipped inside the skip window
    Skipped,
}

/// Producer half of the completion channel; sends at most once
#[derive(Debug)]
pub struct BreakCompletion {
    sender: Option<Sender<BreakOutcome>>,
}

/// Consumer half of the completion channel, held by the scheduler
#[derive(Debug)]
pub struct BreakWaiter {
    receiver: Receiver<BreakOutcome>,
}

/// State of the completion channel as seen by the waiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakStatus {
    /// Break still on screen
    Pending,
    /// Break ended with the given outcome
    Finished(BreakOutcome),
    /// The producer went away without signalling
    Failed,
}

/// Create a linked completion pair
pub fn completion_channel() -> (BreakCompletion, BreakWaiter) {
    let (sender, receiver) = bounded(1);
    (
        BreakCompletion {
            sender: Some(sender),
        },
        BreakWaiter { receiver },
    )
}

impl BreakCompletion {
    /// Signal completion; returns false if already signalled
    pub fn complete(&mut self, outcome: BreakOutcome) -> bool {
        match self.sender.take() {
            Some(sender) => {
                // The waiter may be gone if protection was torn down mid-break
                let _ = sender.send(outcome);
                true
            }
            None => false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.sender.is_none()
    }
}

impl BreakWaiter {
    /// Non-blocking check of the completion channel
    pub fn poll(&self) -> BreakStatus {
        match self.receiver.try_recv() {
            Ok(outcome) => BreakStatus::Finished(outcome),
            Err(TryRecvError::Empty) => BreakStatus::Pending,
            Err(TryRecvError::Disconnected) => BreakStatus::Failed,
        }
    }
}

/// Message shown on the overlay for the remaining time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakMessage {
    RestYourEyes,
    AlmostDone,
    NearlyFinished,
    Complete,
}

impl BreakMessage {
    pub fn for_remaining(remaining: u32) -> Self {
        match remaining {
            16.. => Self::RestYourEyes,
            6..=15 => Self::AlmostDone,
            1..=5 => Self::NearlyFinished,
            0 => Self::Complete,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::RestYourEyes => "Look away from your screen and rest your eyes",
            Self::AlmostDone => "Almost done! Keep resting your eyes",
            Self::NearlyFinished => "Great job! You can return to work soon",
            Self::Complete => "Break complete! You may now resume work",
        }
    }
}

/// Why a skip request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipRejected {
    /// More than the skip window remains
    TooEarly { remaining: u32 },
    /// The break already ended
    AlreadyComplete,
}

/// Countdown for one break
#[derive(Debug)]
pub struct BreakSession {
    total_secs: u32,
    remaining_secs: u32,
    completion: BreakCompletion,
    outcome: Option<BreakOutcome>,
}

impl BreakSession {
    /// Start a session and hand back the waiter for its completion
    pub fn new(duration_secs: u32) -> Result<(Self, BreakWaiter), BreakError> {
        if duration_secs == 0 {
            return Err(BreakError::InvalidDuration(duration_secs));
        }
        let (completion, waiter) = completion_channel();
        Ok((
            Self {
                total_secs: duration_secs,
                remaining_secs: duration_secs,
                completion,
                outcome: None,
            },
            waiter,
        ))
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_completed()
    }

    pub fn outcome(&self) -> Option<BreakOutcome> {
        self.outcome
    }

    /// One-second countdown tick; completes the session on reaching zero
    pub fn tick(&mut self) {
        if self.is_completed() {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.finish(BreakOutcome::TimedOut);
        }
    }

    /// Whether the skip control is shown
    pub fn skip_visible(&self) -> bool {
        !self.is_completed() && self.remaining_secs > 0 && self.remaining_secs <= SKIP_WINDOW_SECS
    }

    /// Skip from the key or the button; accepted only inside the skip window
    pub fn request_skip(&mut self) -> Result<(), SkipRejected> {
        if self.is_completed() {
            return Err(SkipRejected::AlreadyComplete);
        }
        if self.remaining_secs > SKIP_WINDOW_SECS {
            return Err(SkipRejected::TooEarly {
                remaining: self.remaining_secs,
            });
        }
        self.finish(BreakOutcome::Skipped);
        Ok(())
    }

    /// Percentage of the break already elapsed
    pub fn progress_percent(&self) -> f32 {
        let elapsed = self.total_secs - self.remaining_secs;
        elapsed as f32 / self.total_secs as f32 * 100.0
    }

    pub fn countdown_text(&self) -> String {
        self.remaining_secs.to_string()
    }

    pub fn message(&self) -> BreakMessage {
        BreakMessage::for_remaining(self.remaining_secs)
    }

    pub fn skip_label(&self, key_name: &str) -> String {
        format!("Press {} to Skip ({}s remaining)", key_name, self.remaining_secs)
    }

    fn finish(&mut self, outcome: BreakOutcome) {
        if self.completion.complete(outcome) {
            self.outcome = Some(outcome);
        }
    }
}
