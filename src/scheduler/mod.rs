//! Protection Scheduler
//!
//! Owns the break interval timer and the once-a-second countdown display
//! timer. When the interval elapses it stops itself, asks the host to open a
//! break, and polls the break's completion channel from the UI loop until the
//! break ends. Nothing here blocks; every method runs to completion on the
//! UI thread.

pub mod timer;

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::{BreakError, ScheduleError};
use crate::notifier::Notifier;
use crate::overlay::session::{BreakStatus, BreakWaiter};
use crate::scheduler::timer::RepeatingTimer;

/// Readout shown while protection is stopped
pub const STOPPED_READOUT: &str = "--:--";
/// Readout shown while protection is paused
pub const PAUSED_READOUT: &str = "PAUSED";
/// Readout shown once the next break is due
pub const BREAK_DUE_READOUT: &str = "Break Time!";

/// Protection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtectionState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Validated interval and break length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectionSettings {
    interval_minutes: u32,
    break_duration_secs: u32,
}

impl ProtectionSettings {
    /// Both values must be positive
    pub fn new(interval_minutes: i64, break_duration_secs: i64) -> Result<Self, ScheduleError> {
        let invalid = ScheduleError::InvalidSettings {
            interval_minutes,
            break_duration_secs,
        };
        if interval_minutes <= 0 || break_duration_secs <= 0 {
            return Err(invalid);
        }
        Ok(Self {
            interval_minutes: u32::try_from(interval_minutes).map_err(|_| invalid.clone())?,
            break_duration_secs: u32::try_from(break_duration_secs).map_err(|_| invalid)?,
        })
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn break_duration_secs(&self) -> u32 {
        self.break_duration_secs
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_minutes) * 60)
    }
}

/// Something that can put a break on screen
pub trait BreakHost {
    /// Open a break of the given length and return its completion waiter
    fn open_break(&mut self, duration_secs: u32) -> Result<BreakWaiter, BreakError>;
}

/// Drives the break schedule
pub struct ProtectionScheduler<N: Notifier> {
    state: ProtectionState,
    settings: Option<ProtectionSettings>,
    interval_timer: RepeatingTimer,
    countdown_timer: RepeatingTimer,
    next_break_at: Option<Instant>,
    remaining_secs: Option<u64>,
    active_break: Option<BreakWaiter>,
    status_text: String,
    time_remaining_text: String,
    notifier: N,
}

impl<N: Notifier> ProtectionScheduler<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            state: ProtectionState::Stopped,
            settings: None,
            interval_timer: RepeatingTimer::new(Duration::from_secs(60)),
            countdown_timer: RepeatingTimer::new(Duration::from_secs(1)),
            next_break_at: None,
            remaining_secs: None,
            active_break: None,
            status_text: String::new(),
            time_remaining_text: STOPPED_READOUT.to_string(),
            notifier,
        }
    }

    pub fn state(&self) -> ProtectionState {
        self.state
    }

    pub fn settings(&self) -> Option<ProtectionSettings> {
        self.settings
    }

    pub fn next_break_at(&self) -> Option<Instant> {
        self.next_break_at
    }

    /// Seconds until the next break as of the last countdown tick
    pub fn remaining_secs(&self) -> Option<u64> {
        self.remaining_secs
    }

    pub fn is_break_active(&self) -> bool {
        self.active_break.is_some()
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn time_remaining_text(&self) -> &str {
        &self.time_remaining_text
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Start protection from Stopped
    pub fn start(
        &mut self,
        interval_minutes: i64,
        break_duration_secs: i64,
        now: Instant,
    ) -> Result<(), ScheduleError> {
        let settings = ProtectionSettings::new(interval_minutes, break_duration_secs)?;
        if self.state != ProtectionState::Stopped {
            return Err(ScheduleError::AlreadyActive);
        }

        self.settings = Some(settings);
        self.state = ProtectionState::Running;
        self.interval_timer.set_period(settings.interval());
        self.arm_interval(now);
        self.countdown_timer.start(now);

        self.status_text = format!(
            "Eye protection active - Break every {} minutes",
            settings.interval_minutes()
        );
        self.refresh_countdown(now);
        self.notifier.update_status("Eye Protection Active", true, false);

        info!(
            "Protection started: break every {} min for {} s",
            settings.interval_minutes(),
            settings.break_duration_secs()
        );
        Ok(())
    }

    /// Stop protection from Running or Paused
    pub fn stop(&mut self) {
        if self.state == ProtectionState::Stopped {
            return;
        }

        self.interval_timer.stop();
        self.countdown_timer.stop();
        self.state = ProtectionState::Stopped;
        self.next_break_at = None;
        self.remaining_secs = None;

        self.status_text = "Eye protection stopped".to_string();
        self.time_remaining_text = STOPPED_READOUT.to_string();
        self.notifier.update_status("Eye Protection Stopped", false, false);

        info!("Protection stopped");
    }

    /// Pause a running schedule; no-op otherwise
    pub fn pause(&mut self) {
        if self.state != ProtectionState::Running {
            return;
        }

        self.interval_timer.stop();
        self.countdown_timer.stop();
        self.state = ProtectionState::Paused;

        self.status_text = "Eye protection paused".to_string();
        self.time_remaining_text = PAUSED_READOUT.to_string();
        self.notifier.update_status("Eye Protection Paused", true, true);
        self.notifier
            .show_notification("Protection Paused", "Eye protection has been paused.");

        info!("Protection paused");
    }

    /// Resume a paused schedule; the next break is a full interval from `now`
    pub fn resume(&mut self, now: Instant) {
        if self.state != ProtectionState::Paused {
            return;
        }
        let Some(settings) = self.settings else {
            return;
        };

        self.state = ProtectionState::Running;
        // A break still on screen re-arms the interval when it completes
        if self.active_break.is_none() {
            self.arm_interval(now);
        } else {
            self.next_break_at = None;
        }
        self.countdown_timer.start(now);

        self.status_text = format!(
            "Eye protection resumed - Break every {} minutes",
            settings.interval_minutes()
        );
        self.refresh_countdown(now);
        self.notifier.update_status("Eye Protection Active", true, false);
        self.notifier
            .show_notification("Protection Resumed", "Eye protection has been resumed.");

        info!("Protection resumed");
    }

    /// Tray/hotkey toggle: start when stopped, otherwise pause or resume
    pub fn toggle(
        &mut self,
        interval_minutes: i64,
        break_duration_secs: i64,
        now: Instant,
    ) -> Result<(), ScheduleError> {
        match self.state {
            ProtectionState::Stopped => self.start(interval_minutes, break_duration_secs, now),
            ProtectionState::Paused => {
                self.resume(now);
                Ok(())
            }
            ProtectionState::Running => {
                self.pause();
                Ok(())
            }
        }
    }

    /// Advance timers and the pending break; call once per UI frame
    pub fn poll(&mut self, now: Instant, host: &mut dyn BreakHost) {
        if self.countdown_timer.poll(now) {
            self.refresh_countdown(now);
        }

        if self.interval_timer.poll(now) {
            self.on_interval_elapsed(now, host);
        }

        let status = match &self.active_break {
            Some(waiter) => waiter.poll(),
            None => return,
        };
        match status {
            BreakStatus::Pending => {}
            BreakStatus::Finished(outcome) => {
                info!("Break finished: {:?}", outcome);
                self.finish_break(now);
            }
            BreakStatus::Failed => {
                warn!("Break ended without signalling completion");
                self.finish_break(now);
            }
        }
    }

    fn on_interval_elapsed(&mut self, now: Instant, host: &mut dyn BreakHost) {
        if self.state != ProtectionState::Running || self.active_break.is_some() {
            return;
        }
        let Some(settings) = self.settings else {
            return;
        };

        self.interval_timer.stop();
        info!("Break due, opening overlay for {} s", settings.break_duration_secs());

        match host.open_break(settings.break_duration_secs()) {
            Ok(waiter) => self.active_break = Some(waiter),
            Err(e) => {
                warn!("Failed to open break overlay: {}", e);
                self.finish_break(now);
            }
        }
    }

    fn finish_break(&mut self, now: Instant) {
        self.active_break = None;
        if self.state == ProtectionState::Running {
            self.arm_interval(now);
            self.refresh_countdown(now);
        }
    }

    fn arm_interval(&mut self, now: Instant) {
        if let Some(settings) = self.settings {
            self.next_break_at = Some(now + settings.interval());
            self.interval_timer.start(now);
        }
    }

    fn refresh_countdown(&mut self, now: Instant) {
        if self.state != ProtectionState::Running {
            return;
        }
        let Some(next_break_at) = self.next_break_at else {
            self.remaining_secs = Some(0);
            self.time_remaining_text = BREAK_DUE_READOUT.to_string();
            return;
        };

        let remaining = next_break_at.saturating_duration_since(now);
        if remaining.is_zero() {
            self.remaining_secs = Some(0);
            self.time_remaining_text = BREAK_DUE_READOUT.to_string();
            return;
        }

        let total = remaining.as_secs();
        let readout = format_mm_ss(total);
        self.remaining_secs = Some(total);
        self.notifier
            .update_tooltip(&format!("BreakBuddy - Next break in {}", readout));
        debug!("Next break in {}", readout);
        self.time_remaining_text = readout;
    }
}

/// Format seconds as zero-padded `MM:SS`
pub fn format_mm_ss(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::tests::RecordingNotifier;
    use crate::overlay::session::{BreakOutcome, BreakSession};

    /// Host that keeps opened sessions so tests can drive them
    #[derive(Default)]
    struct TestHost {
        sessions: Vec<BreakSession>,
        fail: bool,
    }

    impl BreakHost for TestHost {
        fn open_break(&mut self, duration_secs: u32) -> Result<BreakWaiter, BreakError> {
            if self.fail {
                return Err(BreakError::AlreadyActive);
            }
            let (session, waiter) = BreakSession::new(duration_secs)?;
            self.sessions.push(session);
            Ok(waiter)
        }
    }

    fn minutes(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    fn scheduler() -> ProtectionScheduler<RecordingNotifier> {
        ProtectionScheduler::new(RecordingNotifier::default())
    }

    #[test]
    fn test_start_with_positive_values() {
        for (interval, duration) in [(1, 1), (25, 20), (60, 300), (1440, 3600)] {
            let mut s = scheduler();
            let now = Instant::now();

            s.start(interval, duration, now).unwrap();

            assert_eq!(s.state(), ProtectionState::Running);
            assert_eq!(s.next_break_at(), Some(now + minutes(interval as u64)));
        }
    }

    #[test]
    fn test_start_rejects_non_positive_values() {
        for (interval, duration) in [(0, 20), (25, 0), (-5, 20), (25, -1), (0, 0)] {
            let mut s = scheduler();

            let err = s.start(interval, duration, Instant::now()).unwrap_err();

            assert!(matches!(err, ScheduleError::InvalidSettings { .. }));
            assert_eq!(s.state(), ProtectionState::Stopped);
            assert_eq!(s.next_break_at(), None);
            assert!(s.notifier().calls.is_empty());
        }
    }

    #[test]
    fn test_start_when_active_is_rejected() {
        let mut s = scheduler();
        let now = Instant::now();
        s.start(25, 20, now).unwrap();

        assert_eq!(
            s.start(10, 10, now + Duration::from_secs(5)),
            Err(ScheduleError::AlreadyActive)
        );
        assert_eq!(s.next_break_at(), Some(now + minutes(25)));
    }

    #[test]
    fn test_start_updates_display_and_tray() {
        let mut s = scheduler();
        s.start(25, 20, Instant::now()).unwrap();

        assert_eq!(s.status_text(), "Eye protection active - Break every 25 minutes");
        assert_eq!(s.time_remaining_text(), "25:00");
        assert_eq!(s.notifier().last_status(), Some("Eye Protection Active"));
        assert_eq!(
            s.notifier().last_tooltip(),
            Some("BreakBuddy - Next break in 25:00")
        );
    }

    #[test]
    fn test_pause_then_resume_returns_to_running() {
        let mut s = scheduler();
        let t0 = Instant::now();
        s.start(25, 20, t0).unwrap();

        s.pause();
        assert_eq!(s.state(), ProtectionState::Paused);
        assert_eq!(s.time_remaining_text(), PAUSED_READOUT);

        let t1 = t0 + minutes(10);
        s.resume(t1);
        assert_eq!(s.state(), ProtectionState::Running);
        assert_eq!(s.next_break_at(), Some(t1 + minutes(25)));
        assert_eq!(
            s.notifier().notification_titles(),
            vec!["Protection Paused", "Protection Resumed"]
        );
        assert!(!s
            .notifier()
            .calls
            .iter()
            .any(|c| matches!(c, crate::notifier::tests::Recorded::Status { status, .. } if status == "Eye Protection Stopped")));
    }

    #[test]
    fn test_paused_schedule_does_not_fire() {
        let mut s = scheduler();
        let mut host = TestHost::default();
        let t0 = Instant::now();
        s.start(1, 5, t0).unwrap();
        s.pause();

        s.poll(t0 + minutes(5), &mut host);

        assert!(host.sessions.is_empty());
        assert_eq!(s.time_remaining_text(), PAUSED_READOUT);
    }

    #[test]
    fn test_pause_and_resume_are_noops_in_wrong_state() {
        let mut s = scheduler();
        s.pause();
        s.resume(Instant::now());
        assert_eq!(s.state(), ProtectionState::Stopped);

        s.start(25, 20, Instant::now()).unwrap();
        s.resume(Instant::now());
        assert_eq!(s.state(), ProtectionState::Running);
        assert!(s.notifier().notification_titles().is_empty());
    }

    #[test]
    fn test_stop_from_any_active_state() {
        let mut s = scheduler();
        let now = Instant::now();
        s.start(25, 20, now).unwrap();
        s.stop();
        assert_eq!(s.state(), ProtectionState::Stopped);
        assert_eq!(s.time_remaining_text(), STOPPED_READOUT);
        assert_eq!(s.status_text(), "Eye protection stopped");

        s.start(25, 20, now).unwrap();
        s.pause();
        s.stop();
        assert_eq!(s.state(), ProtectionState::Stopped);
        assert_eq!(s.notifier().last_status(), Some("Eye Protection Stopped"));
    }

    #[test]
    fn test_toggle_cycles_states() {
        let mut s = scheduler();
        let now = Instant::now();

        s.toggle(25, 20, now).unwrap();
        assert_eq!(s.state(), ProtectionState::Running);
        s.toggle(25, 20, now).unwrap();
        assert_eq!(s.state(), ProtectionState::Paused);
        s.toggle(25, 20, now).unwrap();
        assert_eq!(s.state(), ProtectionState::Running);
    }

    #[test]
    fn test_toggle_from_stopped_validates() {
        let mut s = scheduler();
        assert!(s.toggle(0, 20, Instant::now()).is_err());
        assert_eq!(s.state(), ProtectionState::Stopped);
    }

    #[test]
    fn test_countdown_tick_formats_remaining_time() {
        let mut s = scheduler();
        let mut host = TestHost::default();
        let t0 = Instant::now();
        s.start(25, 20, t0).unwrap();

        s.poll(t0 + Duration::from_secs(1), &mut host);
        assert_eq!(s.time_remaining_text(), "24:59");
        assert_eq!(s.remaining_secs(), Some(1499));

        s.poll(t0 + Duration::from_secs(95), &mut host);
        assert_eq!(s.time_remaining_text(), "23:25");
        assert_eq!(
            s.notifier().last_tooltip(),
            Some("BreakBuddy - Next break in 23:25")
        );
    }

    #[test]
    fn test_break_skip_reschedules_from_now() {
        let mut s = scheduler();
        let mut host = TestHost::default();
        let t0 = Instant::now();
        s.start(25, 20, t0).unwrap();

        let due = t0 + minutes(25);
        s.poll(due, &mut host);
        assert_eq!(host.sessions.len(), 1);
        assert!(s.is_break_active());
        assert_eq!(host.sessions[0].total_secs(), 20);

        let session = &mut host.sessions[0];
        for _ in 0..15 {
            session.tick();
        }
        assert_eq!(session.remaining_secs(), 5);
        assert!(session.skip_visible());
        session.tick();
        session.tick();
        assert_eq!(session.remaining_secs(), 3);
        assert_eq!(session.request_skip(), Ok(()));

        let skipped_at = due + Duration::from_secs(17);
        s.poll(skipped_at, &mut host);

        assert!(!s.is_break_active());
        assert_eq!(s.state(), ProtectionState::Running);
        assert_eq!(s.next_break_at(), Some(skipped_at + minutes(25)));
    }

    #[test]
    fn test_no_second_break_while_one_is_active() {
        let mut s = scheduler();
        let mut host = TestHost::default();
        let t0 = Instant::now();
        s.start(1, 120, t0).unwrap();

        s.poll(t0 + minutes(1), &mut host);
        s.poll(t0 + minutes(2), &mut host);
        s.poll(t0 + minutes(3), &mut host);

        assert_eq!(host.sessions.len(), 1);
    }

    #[test]
    fn test_failed_break_still_reschedules() {
        let mut s = scheduler();
        let mut host = TestHost {
            fail: true,
            ..Default::default()
        };
        let t0 = Instant::now();
        s.start(5, 20, t0).unwrap();

        let due = t0 + minutes(5);
        s.poll(due, &mut host);

        assert!(!s.is_break_active());
        assert_eq!(s.next_break_at(), Some(due + minutes(5)));
    }

    #[test]
    fn test_vanished_break_still_reschedules() {
        let mut s = scheduler();
        let mut host = TestHost::default();
        let t0 = Instant::now();
        s.start(5, 20, t0).unwrap();

        let due = t0 + minutes(5);
        s.poll(due, &mut host);
        host.sessions.clear();

        let later = due + Duration::from_secs(2);
        s.poll(later, &mut host);

        assert!(!s.is_break_active());
        assert_eq!(s.next_break_at(), Some(later + minutes(5)));
    }

    #[test]
    fn test_stop_during_break_does_not_reschedule() {
        let mut s = scheduler();
        let mut host = TestHost::default();
        let t0 = Instant::now();
        s.start(5, 10, t0).unwrap();

        let due = t0 + minutes(5);
        s.poll(due, &mut host);
        s.stop();
        for _ in 0..10 {
            host.sessions[0].tick();
        }
        assert_eq!(host.sessions[0].outcome(), Some(BreakOutcome::TimedOut));

        s.poll(due + Duration::from_secs(10), &mut host);

        assert!(!s.is_break_active());
        assert_eq!(s.state(), ProtectionState::Stopped);
        assert_eq!(s.next_break_at(), None);
        assert_eq!(s.time_remaining_text(), STOPPED_READOUT);
    }

    #[test]
    fn test_pause_during_break_then_resume() {
        let mut s = scheduler();
        let mut host = TestHost::default();
        let t0 = Instant::now();
        s.start(5, 10, t0).unwrap();

        let due = t0 + minutes(5);
        s.poll(due, &mut host);
        s.pause();
        for _ in 0..10 {
            host.sessions[0].tick();
        }
        let ended = due + Duration::from_secs(10);
        s.poll(ended, &mut host);
        assert_eq!(s.state(), ProtectionState::Paused);

        let resumed = ended + minutes(1);
        s.resume(resumed);
        assert_eq!(s.next_break_at(), Some(resumed + minutes(5)));
    }

    #[test]
    fn test_break_due_readout_while_break_active() {
        let mut s = scheduler();
        let mut host = TestHost::default();
        let t0 = Instant::now();
        s.start(1, 30, t0).unwrap();

        s.poll(t0 + minutes(1), &mut host);
        s.poll(t0 + minutes(1) + Duration::from_secs(1), &mut host);

        assert_eq!(s.time_remaining_text(), BREAK_DUE_READOUT);
    }

    #[test]
    fn test_format_mm_ss() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(59), "00:59");
        assert_eq!(format_mm_ss(1500), "25:00");
        assert_eq!(format_mm_ss(6000), "100:00");
    }
}
