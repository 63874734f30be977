//! Styling and egui pieces for the break overlay

use egui::{Color32, FontId, RichText, Rounding};

/// Visual settings for the break overlay
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    /// Tint drawn over the blurred background
    pub scrim: Color32,
    /// Card behind the countdown text
    pub card_fill: Color32,
    pub card_rounding: f32,
    pub card_padding: f32,
    pub title_color: Color32,
    pub text_color: Color32,
    pub tip_color: Color32,
    pub countdown_size: f32,
    pub progress_width: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            scrim: Color32::from_black_alpha(110),
            card_fill: Color32::from_rgba_unmultiplied(20, 24, 32, 200),
            card_rounding: 16.0,
            card_padding: 32.0,
            title_color: Color32::from_rgb(240, 240, 245),
            text_color: Color32::from_rgb(220, 224, 232),
            tip_color: Color32::from_rgb(136, 200, 255),
            countdown_size: 96.0,
            progress_width: 420.0,
        }
    }
}

/// Card framing the countdown
pub fn card_frame(style: &OverlayStyle) -> egui::Frame {
    egui::Frame::none()
        .fill(style.card_fill)
        .rounding(Rounding::same(style.card_rounding))
        .inner_margin(style.card_padding)
}

/// Large countdown number
pub fn countdown_text(text: &str, style: &OverlayStyle) -> RichText {
    RichText::new(text)
        .font(FontId::proportional(style.countdown_size))
        .color(style.title_color)
        .strong()
}
