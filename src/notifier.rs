//! Capability set the scheduler uses to report to the tray

/// Feedback sink for protection state changes
///
/// Implementations must swallow their own failures; tray feedback is a
/// convenience and never affects scheduling.
pub trait Notifier {
    /// Protection status changed; `paused` distinguishes Paused from Running/Stopped
    fn update_status(&mut self, status: &str, active: bool, paused: bool);
    /// Replace the tray tooltip
    fn update_tooltip(&mut self, tooltip: &str);
    /// Show a transient desktop notification
    fn show_notification(&mut self, title: &str, message: &str);
}
