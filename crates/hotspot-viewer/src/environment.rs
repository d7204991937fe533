//! HDRI environment lighting and the ambient "sky" light

use bevy::asset::{LoadState, RenderAssetUsages};
use bevy::light::GeneratedEnvironmentMapLight;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use hotspot_core::cubemap::to_rgba16f_bytes;
use hotspot_core::{CubemapError, EquirectImage, equirect_to_cubemap};
use thiserror::Error;

use crate::app::{ViewerSettings, bevy_color};
use crate::camera::MainCamera;

pub struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_lighting)
            .add_systems(Update, build_environment_map);
    }
}

/// The equirectangular source while it is loading
#[derive(Resource)]
struct EnvironmentSource {
    handle: Handle<Image>,
}

fn setup_lighting(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<ViewerSettings>,
) {
    // Stands in for a hemispheric light pointing up: uniform fill from the sky
    commands.insert_resource(AmbientLight {
        color: bevy_color(settings.lighting.ambient_color),
        brightness: settings.lighting.ambient_brightness,
        ..default()
    });

    let handle = asset_server.load(settings.environment.path.clone());
    commands.insert_resource(EnvironmentSource { handle });
}

/// Once the HDRI has loaded, convert it to a cubemap and light the camera with it
fn build_environment_map(
    mut commands: Commands,
    source: Option<Res<EnvironmentSource>>,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    settings: Res<ViewerSettings>,
    camera: Query<Entity, With<MainCamera>>,
) {
    let Some(source) = source else { return };

    match asset_server.get_load_state(source.handle.id()) {
        Some(LoadState::Loaded) => {}
        Some(LoadState::Failed(err)) => {
            tracing::error!(path = %settings.environment.path, "Failed to load environment: {err}");
            commands.remove_resource::<EnvironmentSource>();
            return;
        }
        // Still loading
        _ => return,
    }
    commands.remove_resource::<EnvironmentSource>();

    let Some(image) = images.get(&source.handle) else { return };
    let cubemap = match cubemap_image(image, settings.environment.resolution) {
        Ok(cubemap) => cubemap,
        Err(err) => {
            tracing::error!(path = %settings.environment.path, "Failed to build environment cubemap: {err}");
            return;
        }
    };
    let cubemap = images.add(cubemap);

    let Ok(camera) = camera.single() else { return };
    commands.entity(camera).insert(GeneratedEnvironmentMapLight {
        environment_map: cubemap,
        intensity: settings.environment.intensity,
        ..default()
    });
    tracing::info!(
        path = %settings.environment.path,
        resolution = settings.environment.resolution,
        "Environment map ready"
    );
}

#[derive(Error, Debug)]
enum EnvironmentError {
    #[error("expected Rgba32Float texels, got {0:?}")]
    UnsupportedFormat(TextureFormat),
    #[error("image has no CPU-side data")]
    MissingData,
    #[error(transparent)]
    Cubemap(#[from] CubemapError),
}

fn cubemap_image(source: &Image, face_size: u32) -> Result<Image, EnvironmentError> {
    let format = source.texture_descriptor.format;
    if format != TextureFormat::Rgba32Float {
        return Err(EnvironmentError::UnsupportedFormat(format));
    }
    let data = source.data.as_deref().ok_or(EnvironmentError::MissingData)?;

    let equirect = EquirectImage::from_rgba32f_bytes(source.width(), source.height(), data)?;
    let texels = equirect_to_cubemap(&equirect, face_size)?;

    let mut image = Image::new(
        Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: 6,
        },
        TextureDimension::D2,
        to_rgba16f_bytes(&texels),
        TextureFormat::Rgba16Float,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    Ok(image)
}
