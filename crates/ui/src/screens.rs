//! Full-screen menu and game-over panels, plus the Space keybind that moves
//! between them.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use simulation::app_state::AppState;
use simulation::game::{GameOverReason, GameStats};

/// Where Space goes from each state. Space starts a run from the menu and
/// returns to the menu after a run; entering Playing is what resets the
/// world, so the crash scene stays on screen behind the game-over panel.
fn next_after_space(current: AppState) -> Option<AppState> {
    match current {
        AppState::MainMenu => Some(AppState::Playing),
        AppState::GameOver => Some(AppState::MainMenu),
        AppState::Playing => None,
    }
}

fn reason_line(reason: GameOverReason) -> &'static str {
    match reason {
        GameOverReason::Crashed => "You crashed into the ground!",
        GameOverReason::OutOfFuel => "You ran out of fuel!",
    }
}

/// Advance the state machine on Space.
pub fn space_keybinds(
    keyboard: Res<ButtonInput<KeyCode>>,
    app_state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut contexts: EguiContexts,
) {
    // Don't intercept Space if egui is consuming keyboard input.
    if contexts.ctx_mut().wants_keyboard_input() {
        return;
    }
    if !keyboard.just_pressed(KeyCode::Space) {
        return;
    }
    if let Some(next) = next_after_space(*app_state.get()) {
        next_state.set(next);
    }
}

pub fn main_menu_ui(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();

    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.fill(egui::Color32::from_rgba_premultiplied(16, 26, 40, 240)))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                let available = ui.available_height();
                ui.add_space(available * 0.28);

                ui.label(
                    egui::RichText::new("SKYHOPPER")
                        .size(64.0)
                        .strong()
                        .color(egui::Color32::from_rgb(126, 192, 238)),
                );
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new("Endless mountains, one tank of fuel")
                        .size(18.0)
                        .color(egui::Color32::from_rgb(150, 178, 202)),
                );
                ui.add_space(48.0);

                ui.label(
                    egui::RichText::new("Press Space to take off")
                        .size(22.0)
                        .color(egui::Color32::from_rgb(235, 238, 245)),
                );
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new("Arrow keys steer. Q and E roll, Shift boosts.")
                        .size(14.0)
                        .color(egui::Color32::from_rgb(130, 140, 160)),
                );
            });
        });
}

pub fn game_over_ui(
    mut contexts: EguiContexts,
    stats: Res<GameStats>,
    reason: Res<GameOverReason>,
) {
    let ctx = contexts.ctx_mut();

    // Translucent: the crash site stays visible underneath.
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.fill(egui::Color32::from_rgba_premultiplied(24, 10, 10, 170)))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                let available = ui.available_height();
                ui.add_space(available * 0.3);

                ui.label(
                    egui::RichText::new("GAME OVER")
                        .size(56.0)
                        .strong()
                        .color(egui::Color32::from_rgb(225, 90, 80)),
                );
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(reason_line(*reason))
                        .size(20.0)
                        .color(egui::Color32::from_rgb(210, 210, 220)),
                );
                ui.add_space(24.0);
                ui.label(
                    egui::RichText::new(format!("Final score {}", stats.points))
                        .size(30.0)
                        .strong()
                        .color(egui::Color32::from_rgb(235, 238, 245)),
                );
                ui.add_space(40.0);
                ui.label(
                    egui::RichText::new("Press Space to continue")
                        .size(20.0)
                        .color(egui::Color32::from_rgb(200, 205, 215)),
                );
            });
        });
}
