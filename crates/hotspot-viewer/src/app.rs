//! Bevy application setup

use bevy::prelude::*;
use bevy::window::WindowResized;
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use bevy_picking::{DefaultPickingPlugins, prelude::MeshPickingPlugin};
use hotspot_core::{Rgba, ViewerConfig};

use crate::camera::CameraPlugin;
use crate::environment::EnvironmentPlugin;
use crate::hotspot::HotspotPlugin;
use crate::models::ModelsPlugin;
use crate::ui::UiPlugin;

/// Loaded viewer configuration, read-only after startup
#[derive(Resource, Debug, Clone, Deref)]
pub struct ViewerSettings(pub ViewerConfig);

/// Current output surface size in logical pixels
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

/// Convert a configured sRGB color to a Bevy color
pub fn bevy_color(color: Rgba) -> Color {
    Color::srgba(color.r, color.g, color.b, color.a)
}

pub fn run(config: ViewerConfig) {
    let window = primary_window(&config);

    let mut app = App::new();
    app.insert_resource(ClearColor(bevy_color(config.surface.clear_color)))
        // Continuous rendering, the hotspot is re-evaluated every frame
        .insert_resource(WinitSettings::default())
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(window),
                ..default()
            })
            .set(AssetPlugin {
                // Assets are served next to the page (or the working directory)
                file_path: "".to_string(),
                // Don't look for .meta files - static hosting doesn't have them
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
            .set(render_plugin())
        )
        // DefaultPickingPlugins must be added BEFORE EguiPlugin so it can detect PickingPlugin
        // MeshPickingPlugin provides the MeshRayCast system param used for occlusion
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .insert_resource(ViewerSettings(config))
        .init_resource::<SurfaceSize>()
        .add_plugins(CameraPlugin)
        .add_plugins(EnvironmentPlugin)
        .add_plugins(ModelsPlugin)
        .add_plugins(HotspotPlugin)
        .add_plugins(UiPlugin)
        .add_systems(Startup, init_surface_size)
        .add_systems(Update, handle_resize);

    add_wireframe_rendering(&mut app);

    app.run();
}

#[cfg(target_arch = "wasm32")]
fn primary_window(config: &ViewerConfig) -> Window {
    Window {
        title: config.surface.title.clone(),
        canvas: Some(format!("#{}", config.surface.canvas_id)),
        fit_canvas_to_parent: true,
        prevent_default_event_handling: false,
        ..default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn primary_window(config: &ViewerConfig) -> Window {
    let [width, height] = config.surface.window_size;
    Window {
        title: config.surface.title.clone(),
        resolution: bevy::window::WindowResolution::new(width, height),
        ..default()
    }
}

// Line rendering needs POLYGON_MODE_LINE, which browsers don't expose.
// On the web the X-Ray edges are line-list overlay meshes (see `EdgeOverlays`).
#[cfg(not(target_arch = "wasm32"))]
fn render_plugin() -> bevy::render::RenderPlugin {
    use bevy::render::settings::{RenderCreation, WgpuFeatures, WgpuSettings};

    bevy::render::RenderPlugin {
        render_creation: RenderCreation::Automatic(WgpuSettings {
            features: WgpuFeatures::POLYGON_MODE_LINE,
            ..default()
        }),
        ..default()
    }
}

#[cfg(target_arch = "wasm32")]
fn render_plugin() -> bevy::render::RenderPlugin {
    bevy::render::RenderPlugin::default()
}

#[cfg(not(target_arch = "wasm32"))]
fn add_wireframe_rendering(app: &mut App) {
    use bevy::pbr::wireframe::{WireframeConfig, WireframePlugin};

    app.add_plugins(WireframePlugin::default())
        // Only meshes tagged with `Wireframe` get lines
        .insert_resource(WireframeConfig {
            global: false,
            default_color: Color::WHITE,
            ..default()
        });
}

// Edges come from `models::EdgeOverlays`, on by default for wasm
#[cfg(target_arch = "wasm32")]
fn add_wireframe_rendering(_app: &mut App) {}

fn init_surface_size(windows: Query<&Window>, mut surface: ResMut<SurfaceSize>) {
    if let Ok(window) = windows.single() {
        surface.width = window.width();
        surface.height = window.height();
    }
}

/// Track surface size changes, Bevy reconfigures the swap chain itself
fn handle_resize(mut resized: MessageReader<WindowResized>, mut surface: ResMut<SurfaceSize>) {
    if let Some(event) = resized.read().last() {
        surface.width = event.width;
        surface.height = event.height;
        tracing::info!(width = event.width, height = event.height, "Surface resized");
    }
}
