//! Break Overlay
//!
//! A full-screen, always-on-top viewport shown for the length of one break.
//! The primary display is captured and blurred once when the overlay is
//! created; if that fails the overlay falls back to a solid colour and the
//! break runs as normal.

pub mod session;
pub mod widgets;

use egui::{Align, Color32, Layout, Rect, RichText, TextureHandle, ViewportBuilder, ViewportCommand, ViewportId};
use image::RgbaImage;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::capture::{self, ScreenCapturer};
use crate::config::OverlaySettings;
use crate::error::BreakError;
use crate::overlay::session::{BreakSession, BreakWaiter, SkipRejected};
use crate::overlay::widgets::{card_frame, countdown_text, OverlayStyle};
use crate::scheduler::timer::RepeatingTimer;
use crate::scheduler::BreakHost;

/// Eye-care suggestions; one is picked per break
pub const EYE_CARE_TIPS: [&str; 8] = [
    "Look at something 20 feet away for 20 seconds",
    "Blink slowly and deliberately to lubricate your eyes",
    "Close your eyes and relax for a moment",
    "Look around the room to exercise your eye muscles",
    "Focus on distant objects to relax eye strain",
    "Roll your eyes gently in circles",
    "Massage your temples lightly",
    "Take deep breaths and relax your shoulders",
];

/// Tip for a break, picked from the wall clock so consecutive breaks vary
pub fn pick_tip(seed: u128) -> &'static str {
    EYE_CARE_TIPS[(seed % EYE_CARE_TIPS.len() as u128) as usize]
}

/// Overlay configuration
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Blur radius for the captured background
    pub blur_radius: u32,
    /// Key that skips the break inside the skip window
    pub skip_key: egui::Key,
    /// Background when capture fails
    pub fallback_color: Color32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::from_settings(&OverlaySettings::default())
    }
}

impl OverlayConfig {
    /// Build from the persisted settings, falling back to Escape for an
    /// unknown skip key
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        let skip_key = egui::Key::from_name(&settings.skip_key).unwrap_or_else(|| {
            warn!("Unknown skip key '{}', using Escape", settings.skip_key);
            egui::Key::Escape
        });
        let [r, g, b] = settings.fallback_color;

        Self {
            blur_radius: settings.blur_radius,
            skip_key,
            fallback_color: Color32::from_rgb(r, g, b),
        }
    }

    /// Label used in the skip prompt
    pub fn skip_key_label(&self) -> &'static str {
        match self.skip_key {
            egui::Key::Escape => "ESC",
            key => key.name(),
        }
    }
}

/// What the overlay draws behind the countdown
pub enum Background {
    /// Blurred screen, waiting to be uploaded as a texture
    Pending(RgbaImage),
    /// Blurred screen uploaded to the GPU
    Texture(TextureHandle),
    /// Capture failed
    Solid(Color32),
}

/// One break on screen
pub struct BreakOverlay {
    session: BreakSession,
    background: Background,
    tick_timer: RepeatingTimer,
    tip: &'static str,
    config: OverlayConfig,
    style: OverlayStyle,
    focused: bool,
    started_at: Instant,
}

impl BreakOverlay {
    /// Capture and blur the screen, then start the countdown
    ///
    /// The countdown starts once the background is ready, so a slow capture
    /// does not eat into the break.
    pub fn create(
        duration_secs: u32,
        config: &OverlayConfig,
        capturer: &dyn ScreenCapturer,
    ) -> Result<(Self, BreakWaiter), BreakError> {
        let (session, waiter) = BreakSession::new(duration_secs)?;

        let background = match capture::capture_blurred(capturer, config.blur_radius) {
            Ok(image) => Background::Pending(image),
            Err(e) => {
                warn!("Screen capture failed, using solid background: {}", e);
                Background::Solid(config.fallback_color)
            }
        };

        let started_at = Instant::now();
        let mut tick_timer = RepeatingTimer::new(Duration::from_secs(1));
        tick_timer.start(started_at);

        let tip = pick_tip(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
        );

        info!("Break overlay created for {} s", duration_secs);

        Ok((
            Self {
                session,
                background,
                tick_timer,
                tip,
                config: config.clone(),
                style: OverlayStyle::default(),
                focused: false,
                started_at,
            },
            waiter,
        ))
    }

    pub fn session(&self) -> &BreakSession {
        &self.session
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// When the countdown started
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn tip(&self) -> &'static str {
        self.tip
    }

    pub fn is_finished(&self) -> bool {
        self.session.is_completed()
    }

    /// Run the one-second countdown
    pub fn advance(&mut self, now: Instant) {
        if self.is_finished() {
            self.tick_timer.stop();
            return;
        }
        if self.tick_timer.poll(now) {
            self.session.tick();
            debug!("Break countdown: {} s left", self.session.remaining_secs());
            if self.is_finished() {
                self.tick_timer.stop();
            }
        }
    }

    /// Handle a skip from the key or the button
    pub fn try_skip(&mut self, source: &str) -> bool {
        match self.session.request_skip() {
            Ok(()) => {
                info!("Break skipped via {}", source);
                self.tick_timer.stop();
                true
            }
            Err(SkipRejected::TooEarly { remaining }) => {
                debug!("Skip via {} ignored, {} s remaining", source, remaining);
                false
            }
            Err(SkipRejected::AlreadyComplete) => false,
        }
    }

    /// Draw the overlay viewport for this frame
    pub fn show(&mut self, ctx: &egui::Context) {
        let builder = ViewportBuilder::default()
            .with_title("BreakBuddy - Eye Break")
            .with_fullscreen(true)
            .with_decorations(false)
            .with_always_on_top();

        ctx.show_viewport_immediate(ViewportId::from_hash_of("break_overlay"), builder, |ctx, _class| {
            if ctx.input(|i| i.viewport().close_requested()) {
                ctx.send_viewport_cmd(ViewportCommand::CancelClose);
            }
            if !self.focused {
                ctx.send_viewport_cmd(ViewportCommand::Focus);
                self.focused = true;
            }
            if ctx.input(|i| i.key_pressed(self.config.skip_key)) {
                self.try_skip("key");
            }

            self.upload_background(ctx);

            egui::CentralPanel::default()
                .frame(egui::Frame::none())
                .show(ctx, |ui| self.draw(ui));
        });
    }

    fn upload_background(&mut self, ctx: &egui::Context) {
        if let Background::Pending(image) = &self.background {
            let size = [image.width() as usize, image.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
            let texture = ctx.load_texture("break-background", color_image, egui::TextureOptions::LINEAR);
            self.background = Background::Texture(texture);
        }
    }

    fn draw(&mut self, ui: &mut egui::Ui) {
        let screen = ui.max_rect();
        let painter = ui.painter();

        match &self.background {
            Background::Texture(texture) => {
                let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture.id(), screen, uv, Color32::WHITE);
                painter.rect_filled(screen, 0.0, self.style.scrim);
            }
            Background::Solid(color) => {
                painter.rect_filled(screen, 0.0, *color);
            }
            Background::Pending(_) => {
                painter.rect_filled(screen, 0.0, self.config.fallback_color);
            }
        }

        let style = self.style.clone();
        let mut skip_clicked = false;

        ui.with_layout(Layout::centered_and_justified(egui::Direction::TopDown), |ui| {
            ui.with_layout(Layout::top_down(Align::Center), |ui| {
                ui.add_space((screen.height() * 0.25).max(0.0));
                card_frame(&style).show(ui, |ui| {
                    ui.set_max_width(style.progress_width + style.card_padding);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("Time for an eye break")
                                .size(28.0)
                                .color(style.title_color)
                                .strong(),
                        );
                        ui.add_space(8.0);
                        ui.label(
                            RichText::new(self.session.message().text())
                                .size(18.0)
                                .color(style.text_color),
                        );
                        ui.add_space(16.0);
                        ui.label(countdown_text(&self.session.countdown_text(), &style));
                        ui.add_space(12.0);
                        ui.add(
                            egui::ProgressBar::new(self.session.progress_percent() / 100.0)
                                .desired_width(style.progress_width),
                        );
                        ui.add_space(16.0);
                        ui.label(RichText::new(self.tip).size(16.0).color(style.tip_color).italics());

                        if self.session.skip_visible() {
                            ui.add_space(20.0);
                            let label = self.session.skip_label(self.config.skip_key_label());
                            if ui.button(label).clicked() {
                                skip_clicked = true;
                            }
                        }
                    });
                });
            });
        });

        if skip_clicked {
            self.try_skip("button");
        }
    }
}

/// Owns the break overlay between creation and completion
pub struct OverlayHost {
    config: OverlayConfig,
    capturer: Box<dyn ScreenCapturer>,
    active: Option<BreakOverlay>,
}

impl OverlayHost {
    pub fn new(config: OverlayConfig, capturer: Box<dyn ScreenCapturer>) -> Self {
        Self {
            config,
            capturer,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&BreakOverlay> {
        self.active.as_ref()
    }

    /// Replace the overlay settings; a break already on screen keeps its own
    pub fn set_config(&mut self, config: OverlayConfig) {
        debug!("Overlay config updated: {:?}", config);
        self.config = config;
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Advance the countdown and close the overlay once it has completed
    pub fn advance(&mut self, now: Instant) {
        let finished = match self.active.as_mut() {
            Some(overlay) => {
                overlay.advance(now);
                overlay.is_finished()
            }
            None => return,
        };
        if finished {
            info!("Break overlay closed");
            self.active = None;
        }
    }

    /// Draw the overlay if a break is running
    pub fn show(&mut self, ctx: &egui::Context, now: Instant) {
        self.advance(now);
        if let Some(overlay) = self.active.as_mut() {
            overlay.show(ctx);
        }
        // A skip during this frame closes the overlay right away
        self.advance(now);
    }
}

impl BreakHost for OverlayHost {
    fn open_break(&mut self, duration_secs: u32) -> Result<BreakWaiter, BreakError> {
        if self.active.is_some() {
            return Err(BreakError::AlreadyActive);
        }
        let (overlay, waiter) =
            BreakOverlay::create(duration_secs, &self.config, self.capturer.as_ref())?;
        self.active = Some(overlay);
        Ok(waiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::tests::{FailingCapture, FlatCapture};
    use crate::capture::frame::CapturedFrame;
    use crate::error::CaptureError;
    use crate::overlay::session::{BreakOutcome, BreakStatus};

    /// Capture that takes a while and then fails
    struct SlowCapture(Duration);

    impl ScreenCapturer for SlowCapture {
        fn capture_primary(&self) -> Result<CapturedFrame, CaptureError> {
            std::thread::sleep(self.0);
            Err(CaptureError::Unsupported)
        }
    }

    fn flat() -> FlatCapture {
        FlatCapture {
            width: 6,
            height: 4,
            rgba: [10, 20, 30, 255],
        }
    }

    #[test]
    fn test_capture_failure_uses_fallback_color() {
        let config = OverlayConfig::default();
        let (overlay, _waiter) =
            BreakOverlay::create(20, &config, &FailingCapture).unwrap();

        match overlay.background() {
            Background::Solid(color) => assert_eq!(*color, Color32::from_rgb(47, 79, 79)),
            _ => panic!("expected solid background"),
        }
        assert_eq!(overlay.session().remaining_secs(), 20);
    }

    #[test]
    fn test_captured_background_is_pending_upload() {
        let (overlay, _waiter) =
            BreakOverlay::create(20, &OverlayConfig::default(), &flat()).unwrap();

        match overlay.background() {
            Background::Pending(image) => assert_eq!(image.dimensions(), (6, 4)),
            _ => panic!("expected pending background"),
        }
        assert!(EYE_CARE_TIPS.contains(&overlay.tip()));
    }

    #[test]
    fn test_fallback_break_still_runs_full_duration() {
        let (mut overlay, waiter) =
            BreakOverlay::create(3, &OverlayConfig::default(), &FailingCapture).unwrap();
        let t0 = overlay.started_at();

        overlay.advance(t0 + Duration::from_secs(1));
        overlay.advance(t0 + Duration::from_secs(2));
        assert!(!overlay.is_finished());
        assert_eq!(waiter.poll(), BreakStatus::Pending);

        overlay.advance(t0 + Duration::from_secs(3));
        assert!(overlay.is_finished());
        assert_eq!(waiter.poll(), BreakStatus::Finished(BreakOutcome::TimedOut));
    }

    #[test]
    fn test_countdown_ticks_once_per_second() {
        let (mut overlay, _waiter) =
            BreakOverlay::create(10, &OverlayConfig::default(), &flat()).unwrap();
        let t0 = overlay.started_at();

        overlay.advance(t0 + Duration::from_millis(500));
        assert_eq!(overlay.session().remaining_secs(), 10);
        overlay.advance(t0 + Duration::from_secs(1));
        overlay.advance(t0 + Duration::from_millis(1200));
        assert_eq!(overlay.session().remaining_secs(), 9);
    }

    #[test]
    fn test_try_skip_respects_window() {
        let (mut overlay, waiter) =
            BreakOverlay::create(8, &OverlayConfig::default(), &flat()).unwrap();
        let t0 = overlay.started_at();

        assert!(!overlay.try_skip("key"));
        for s in 1..=3 {
            overlay.advance(t0 + Duration::from_secs(s));
        }
        assert_eq!(overlay.session().remaining_secs(), 5);
        assert!(overlay.try_skip("button"));
        assert!(!overlay.try_skip("key"));
        assert_eq!(waiter.poll(), BreakStatus::Finished(BreakOutcome::Skipped));
    }

    #[test]
    fn test_host_allows_one_overlay_at_a_time() {
        let mut host = OverlayHost::new(OverlayConfig::default(), Box::new(FailingCapture));

        let _waiter = host.open_break(20).unwrap();
        assert!(host.active().is_some());
        assert!(matches!(host.open_break(20), Err(BreakError::AlreadyActive)));
    }

    #[test]
    fn test_host_closes_finished_overlay() {
        let mut host = OverlayHost::new(OverlayConfig::default(), Box::new(FailingCapture));
        let waiter = host.open_break(1).unwrap();

        host.advance(Instant::now() + Duration::from_secs(2));

        assert!(host.active().is_none());
        assert_eq!(waiter.poll(), BreakStatus::Finished(BreakOutcome::TimedOut));
    }

    #[test]
    fn test_overlay_config_from_settings() {
        let mut settings = OverlaySettings::default();
        settings.skip_key = "Space".to_string();
        settings.fallback_color = [1, 2, 3];

        let config = OverlayConfig::from_settings(&settings);
        assert_eq!(config.skip_key, egui::Key::Space);
        assert_eq!(config.fallback_color, Color32::from_rgb(1, 2, 3));
        assert_eq!(config.skip_key_label(), "Space");

        settings.skip_key = "NotAKey".to_string();
        let config = OverlayConfig::from_settings(&settings);
        assert_eq!(config.skip_key, egui::Key::Escape);
        assert_eq!(config.skip_key_label(), "ESC");
    }

    #[test]
    fn test_set_config_applies_to_next_break() {
        let mut host = OverlayHost::new(OverlayConfig::default(), Box::new(FailingCapture));
        let mut settings = OverlaySettings::default();
        settings.fallback_color = [9, 9, 9];
        host.set_config(OverlayConfig::from_settings(&settings));
        assert_eq!(host.config().fallback_color, Color32::from_rgb(9, 9, 9));

        let _waiter = host.open_break(5).unwrap();
        match host.active().map(BreakOverlay::background) {
            Some(Background::Solid(color)) => assert_eq!(*color, Color32::from_rgb(9, 9, 9)),
            _ => panic!("expected solid background"),
        }
    }

    #[test]
    fn test_pick_tip_wraps_around() {
        assert_eq!(pick_tip(0), EYE_CARE_TIPS[0]);
        assert_eq!(pick_tip(9), EYE_CARE_TIPS[1]);
        assert_eq!(pick_tip(u128::MAX), EYE_CARE_TIPS[7]);
    }

    #[test]
    fn test_countdown_starts_after_slow_capture() {
        let before = Instant::now();
        let delay = Duration::from_millis(50);
        let (mut overlay, waiter) =
            BreakOverlay::create(2, &OverlayConfig::default(), &SlowCapture(delay)).unwrap();

        assert!(overlay.started_at() >= before + delay);

        // One second after the request, but less than one after capture finished
        overlay.advance(before + Duration::from_secs(1));
        assert_eq!(overlay.session().remaining_secs(), 2);

        let started = overlay.started_at();
        overlay.advance(started + Duration::from_secs(1));
        overlay.advance(started + Duration::from_secs(2));
        assert_eq!(waiter.poll(), BreakStatus::Finished(BreakOutcome::TimedOut));
    }

    #[test]
    fn test_host_starts_countdown_after_capture() {
        let before = Instant::now();
        let delay = Duration::from_millis(50);
        let mut host = OverlayHost::new(OverlayConfig::default(), Box::new(SlowCapture(delay)));
        let waiter = host.open_break(1).unwrap();

        host.advance(before + Duration::from_secs(1));
        assert!(host.active().is_some());
        assert_eq!(waiter.poll(), BreakStatus::Pending);
    }
}
