//! UI overlays using bevy_egui: the hotspot marker and the X-Ray button

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use hotspot_core::Rgba;

use crate::app::{SurfaceSize, ViewerSettings};
use crate::hotspot::HotspotOverlay;
use crate::models::ToggleMaterial;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.add_systems(EguiPrimaryContextPass, (draw_hotspot, material_button));
    }
}

fn egui_color(color: Rgba) -> egui::Color32 {
    let [r, g, b, a] = color.to_rgba8();
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Paint each visible hotspot as a filled ring centred on its screen position
fn draw_hotspot(
    mut contexts: EguiContexts,
    overlays: Query<&HotspotOverlay>,
    settings: Res<ViewerSettings>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let style = &settings.hotspot;

    // Behind every window so the button stays clickable on top
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("hotspot"),
    ));

    for overlay in overlays.iter() {
        let alpha = overlay.alpha();
        if alpha <= 0.0 {
            continue;
        }
        let Some(position) = overlay.marker.screen_position() else { continue };

        let fill = egui_color(style.fill_color.with_alpha(style.fill_color.a * alpha));
        let ring = egui_color(style.ring_color.with_alpha(style.ring_color.a * alpha));
        // Ring drawn inside the marker bounds
        let radius = (style.size - style.thickness) / 2.0;
        painter.circle(
            egui::pos2(position.x, position.y),
            radius.max(0.0),
            fill,
            egui::Stroke::new(style.thickness, ring),
        );
    }
}

/// Bottom-centred toggle between the metallic and wireframe materials
fn material_button(
    mut contexts: EguiContexts,
    settings: Res<ViewerSettings>,
    surface: Res<SurfaceSize>,
    mut toggles: MessageWriter<ToggleMaterial>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let button = &settings.button;
    let [width, height] = button.size;

    let bottom_offset = button.bottom_offset(surface.height);

    egui::Area::new(egui::Id::new("material_toggle"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -bottom_offset))
        .show(ctx, |ui| {
            let label = egui::RichText::new(&button.label)
                .color(egui_color(button.text_color))
                .size(16.0);
            let clicked = ui
                .add(
                    egui::Button::new(label)
                        .fill(egui_color(button.background))
                        .min_size(egui::vec2(width, height)),
                )
                .clicked();

            if clicked {
                toggles.write(ToggleMaterial);
            }
        });
}
