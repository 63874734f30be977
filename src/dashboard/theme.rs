//! Dashboard theme and styling
//!
//! Muted dark theme, easy on the eyes between breaks.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

/// Calm dark color palette
pub struct ThemeColors;

impl ThemeColors {
    // Background colors
    pub const BG_DARK: Color32 = Color32::from_rgb(20, 26, 28);
    pub const BG_MEDIUM: Color32 = Color32::from_rgb(30, 38, 40);
    pub const BG_LIGHT: Color32 = Color32::from_rgb(42, 52, 54);
    pub const BG_HOVER: Color32 = Color32::from_rgb(54, 66, 68);

    // Accent colors
    pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(46, 170, 160);
    pub const ACCENT_WARNING: Color32 = Color32::from_rgb(230, 180, 80);

    // Text colors
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(232, 238, 236);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 176, 174);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(104, 120, 118);

    pub const BORDER: Color32 = Color32::from_rgb(56, 70, 72);

    // Protection state colors
    pub const STATUS_RUNNING: Color32 = Color32::from_rgb(96, 200, 140);
    pub const STATUS_PAUSED: Color32 = Self::ACCENT_WARNING;
    pub const STATUS_STOPPED: Color32 = Self::TEXT_SECONDARY;
}

/// Apply the dashboard theme to egui
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let mut visuals = Visuals::dark();

    visuals.window_fill = ThemeColors::BG_MEDIUM;
    visuals.panel_fill = ThemeColors::BG_DARK;
    visuals.faint_bg_color = ThemeColors::BG_LIGHT;
    visuals.extreme_bg_color = ThemeColors::BG_DARK;

    let widgets = [
        (&mut visuals.widgets.noninteractive, ThemeColors::BG_MEDIUM, ThemeColors::TEXT_SECONDARY),
        (&mut visuals.widgets.inactive, ThemeColors::BG_LIGHT, ThemeColors::TEXT_PRIMARY),
        (&mut visuals.widgets.hovered, ThemeColors::BG_HOVER, ThemeColors::TEXT_PRIMARY),
        (&mut visuals.widgets.active, ThemeColors::ACCENT_PRIMARY, ThemeColors::TEXT_PRIMARY),
        (&mut visuals.widgets.open, ThemeColors::BG_HOVER, ThemeColors::TEXT_PRIMARY),
    ];
    for (widget, fill, text) in widgets {
        widget.bg_fill = fill;
        widget.fg_stroke = Stroke::new(1.0, text);
        widget.rounding = Rounding::same(6.0);
    }

    visuals.selection.bg_fill = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 77);
    visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);
    visuals.hyperlink_color = ThemeColors::ACCENT_PRIMARY;

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_shadow.blur = 8.0;
    visuals.window_stroke = Stroke::new(1.0, ThemeColors::BORDER);
    visuals.popup_shadow.blur = 4.0;
    visuals.menu_rounding = Rounding::same(6.0);

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(16.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(15.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(15.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(15.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_with_alpha_keeps_channels() {
        let tinted = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 255);
        assert_eq!(tinted, ThemeColors::ACCENT_PRIMARY);
        assert_eq!(color_with_alpha(ThemeColors::ACCENT_PRIMARY, 0).a(), 0);
    }
}
