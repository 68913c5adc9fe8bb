//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use herbivore_core::Guess;
use herbivore_rendering::GuessButton;
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Tint applied to a guess button once its verdict is known.
const CORRECT_TINT: Color = Color::new(0.3, 1.0, 0.3, 1.0);
const WRONG_TINT: Color = Color::new(1.0, 0.3, 0.3, 1.0);

/// Which buttons the panel hosts this frame.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PanelButtons {
    /// Friend/foe verdict buttons under the mask.
    Guesses(Vec<GuessButton>),
    /// Restart button on the end panel.
    Restart,
    /// Play button on the intro banner.
    Play,
}

/// Outcome of drawing the button panel during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PanelUiResult {
    /// Guess button pressed this frame.
    pub guess: Option<Guess>,
    /// Whether the restart button was pressed.
    pub restart: bool,
    /// Whether the play button was pressed.
    pub start: bool,
}

/// Snapshot of the button panel's layout for the current frame.
#[derive(Clone, Debug)]
pub(crate) struct PanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub origin: Vec2,
    /// Panel dimensions in screen space.
    pub size: Vec2,
    /// Background colour applied to the window skin.
    pub background: Color,
    /// Buttons to draw.
    pub buttons: PanelButtons,
}

fn button_label(guess: Guess) -> &'static str {
    match guess {
        Guess::Friend => "Friend",
        Guess::Foe => "Foe",
    }
}

pub(crate) fn feedback_tint(feedback: Option<bool>) -> Color {
    match feedback {
        Some(true) => CORRECT_TINT,
        Some(false) => WRONG_TINT,
        None => Color::from_rgba(70, 70, 70, 255),
    }
}

/// Draws the panel's buttons and reports which were pressed.
pub(crate) fn draw_panel_ui(ui: &mut Ui, context: PanelUiContext) -> PanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .margin(RectOffset::new(12.0, 12.0, 8.0, 8.0))
        .build();
    skin.window_style = window_style;

    let tint = match &context.buttons {
        PanelButtons::Guesses(buttons) => {
            feedback_tint(buttons.iter().find_map(|button| button.feedback))
        }
        PanelButtons::Restart | PanelButtons::Play => feedback_tint(None),
    };
    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(tint)
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(16.0, 16.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut result = PanelUiResult::default();
    let _ = ui.window(hash!("button_panel"), context.origin, context.size, |ui| {
        match &context.buttons {
            PanelButtons::Guesses(buttons) => {
                for (slot, button) in buttons.iter().enumerate() {
                    let position = Vec2::new(slot as f32 * context.size.x * 0.5, 0.0);
                    if ui.button(position, button_label(button.guess)) && button.feedback.is_none()
                    {
                        result.guess = Some(button.guess);
                    }
                }
            }
            PanelButtons::Restart => result.restart = ui.button(None, "Restart"),
            PanelButtons::Play => result.start = ui.button(None, "Play"),
        }
    });

    ui.pop_skin();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_buttons_use_the_neutral_tint() {
        assert_eq!(feedback_tint(None), Color::from_rgba(70, 70, 70, 255));
        assert_eq!(feedback_tint(Some(true)), CORRECT_TINT);
        assert_eq!(feedback_tint(Some(false)), WRONG_TINT);
    }

    #[test]
    fn guess_labels_name_the_verdict() {
        assert_eq!(button_label(Guess::Friend), "Friend");
        assert_eq!(button_label(Guess::Foe), "Foe");
    }
}
