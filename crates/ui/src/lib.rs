use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use simulation::app_state::AppState;

pub mod hud;
pub mod screens;
pub mod theme;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Startup, theme::apply_sky_theme)
            .add_systems(
                Update,
                (
                    hud::hud_ui.run_if(in_state(AppState::Playing)),
                    screens::main_menu_ui.run_if(in_state(AppState::MainMenu)),
                    screens::game_over_ui.run_if(in_state(AppState::GameOver)),
                    screens::space_keybinds,
                ),
            );
    }
}
