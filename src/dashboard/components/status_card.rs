//! Status card component for displaying protection state

use egui::{Color32, RichText, Rounding, Vec2};
use crate::dashboard::theme::ThemeColors;
use crate::scheduler::ProtectionState;

/// A card displaying a labelled value with a coloured state dot
pub struct StatusCard {
    pub title: String,
    pub value: String,
    pub status: CardStatus,
}

/// Status types for cards
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardStatus {
    Running,
    Paused,
    Stopped,
}

impl From<ProtectionState> for CardStatus {
    fn from(state: ProtectionState) -> Self {
        match state {
            ProtectionState::Running => CardStatus::Running,
            ProtectionState::Paused => CardStatus::Paused,
            ProtectionState::Stopped => CardStatus::Stopped,
        }
    }
}

impl CardStatus {
    pub fn color(&self) -> Color32 {
        match self {
            CardStatus::Running => ThemeColors::STATUS_RUNNING,
            CardStatus::Paused => ThemeColors::STATUS_PAUSED,
            CardStatus::Stopped => ThemeColors::STATUS_STOPPED,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardStatus::Running => "Running",
            CardStatus::Paused => "Paused",
            CardStatus::Stopped => "Stopped",
        }
    }
}

impl StatusCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>, status: CardStatus) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            status,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(ThemeColors::BG_MEDIUM)
            .rounding(Rounding::same(8.0))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_width(180.0);

                ui.horizontal(|ui| {
                    let dot = ui.cursor().left_top() + Vec2::new(6.0, 10.0);
                    ui.painter().circle_filled(dot, 4.0, self.status.color());
                    ui.add_space(16.0);

                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(&self.title)
                                .size(12.0)
                                .color(ThemeColors::TEXT_MUTED)
                        );
                        ui.add_space(4.0);
                        ui.label(
                            RichText::new(&self.value)
                                .size(28.0)
                                .color(ThemeColors::TEXT_PRIMARY)
                                .strong()
                        );
                        ui.add_space(4.0);
                        ui.label(
                            RichText::new(self.status.label())
                                .size(11.0)
                                .color(self.status.color())
                        );
                    });
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_protection_state() {
        assert_eq!(CardStatus::from(ProtectionState::Running), CardStatus::Running);
        assert_eq!(CardStatus::from(ProtectionState::Paused), CardStatus::Paused);
        assert_eq!(CardStatus::from(ProtectionState::Stopped), CardStatus::Stopped);
        assert_eq!(CardStatus::Paused.color(), ThemeColors::ACCENT_WARNING);
    }
}
