//! In-flight overlay: score readout and fuel gauge.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use simulation::config::FUEL_MAX;
use simulation::game::GameStats;

/// Fuel gauge fill, stepping from green through amber to red as the tank
/// drains.
fn fuel_color(frac: f32) -> egui::Color32 {
    if frac > 0.5 {
        egui::Color32::from_rgb(90, 180, 90)
    } else if frac > 0.25 {
        egui::Color32::from_rgb(220, 170, 60)
    } else {
        egui::Color32::from_rgb(205, 70, 60)
    }
}

/// Top-left score and fuel overlay, visible only in flight.
pub fn hud_ui(mut contexts: EguiContexts, stats: Res<GameStats>) {
    let ctx = contexts.ctx_mut();
    egui::Area::new(egui::Id::new("flight_hud"))
        .fixed_pos(egui::pos2(16.0, 16.0))
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgba_premultiplied(20, 22, 30, 180))
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(format!("Score {}", stats.points))
                            .size(26.0)
                            .strong()
                            .color(egui::Color32::from_rgb(235, 238, 245)),
                    );
                    ui.add_space(4.0);

                    let frac = (stats.fuel / FUEL_MAX).clamp(0.0, 1.0);
                    ui.add(
                        egui::ProgressBar::new(frac)
                            .desired_width(220.0)
                            .fill(fuel_color(frac))
                            .text(
                                egui::RichText::new(format!("Fuel {:.0}", stats.fuel))
                                    .color(egui::Color32::WHITE),
                            ),
                    );
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_color_tier_boundaries() {
        assert_eq!(fuel_color(1.0), fuel_color(0.51));
        assert_eq!(fuel_color(0.5), fuel_color(0.26));
        assert_eq!(fuel_color(0.25), fuel_color(0.0));
        assert_ne!(fuel_color(1.0), fuel_color(0.5));
        assert_ne!(fuel_color(0.5), fuel_color(0.25));
    }
}
