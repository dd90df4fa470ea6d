use bevy_egui::{egui, EguiContexts};

/// Tune egui toward the game's palette: dark slate panels with the sky
/// blue as the accent.
pub fn apply_sky_theme(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();
    let mut style = (*ctx.style()).clone();

    let panel = egui::Color32::from_rgb(24, 31, 42);
    let inactive = egui::Color32::from_rgb(37, 48, 63);
    let hover = egui::Color32::from_rgb(56, 76, 100);
    let accent = egui::Color32::from_rgb(126, 192, 238);

    style.visuals.widgets.noninteractive.bg_fill = panel;
    style.visuals.widgets.inactive.bg_fill = inactive;
    style.visuals.widgets.hovered.bg_fill = hover;
    style.visuals.widgets.active.bg_fill = accent;
    style.visuals.widgets.inactive.weak_bg_fill = inactive;
    style.visuals.widgets.hovered.weak_bg_fill = hover;
    style.visuals.widgets.active.weak_bg_fill = accent;

    style.visuals.window_fill = panel;
    style.visuals.panel_fill = panel;
    style.visuals.selection.bg_fill = accent;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, accent);

    // egui 0.31+ uses CornerRadius with u8 values
    style.visuals.window_corner_radius = egui::CornerRadius::same(8);
    style.visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(6);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(6);

    ctx.set_style(style);
}
