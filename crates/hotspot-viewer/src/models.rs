//! Model loading and material switching

use bevy::asset::{LoadState, RenderAssetUsages};
use bevy::gltf::Gltf;
use bevy::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};
use bevy::pbr::wireframe::{Wireframe, WireframeColor};
use bevy::prelude::*;
use hotspot_core::{HotspotMarker, MaterialKind, MaterialSwitcher, unique_edges};

use crate::app::{ViewerSettings, bevy_color};
use crate::hotspot::HotspotOverlay;

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelLoad>()
            .init_resource::<EdgeOverlays>()
            .add_message::<ToggleMaterial>()
            .add_systems(Startup, (setup_materials, start_model_load))
            .add_systems(Update, (
                poll_model_load,
                collect_meshes,
                handle_material_toggle,
            ).chain());
    }
}

/// Request to flip between the metallic and wireframe materials
#[derive(Message, Debug, Clone, Copy)]
pub struct ToggleMaterial;

/// Draw X-Ray edges with line-list overlay meshes instead of the wireframe
/// render plugin. Browsers have no polygon line mode, so this is on for web
/// builds.
#[derive(Resource, Debug, Clone, Copy)]
pub struct EdgeOverlays(pub bool);

impl Default for EdgeOverlays {
    fn default() -> Self {
        Self(cfg!(target_arch = "wasm32"))
    }
}

/// One renderable sub-mesh of the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelMesh {
    pub entity: Entity,
    /// Hidden line-list child shown while the wireframe material is active
    pub edges: Option<Entity>,
}

/// Material state of the loaded model
#[derive(Resource)]
pub struct ViewerState {
    pub switcher: MaterialSwitcher<Handle<StandardMaterial>>,
    /// Every renderable sub-mesh of the model, empty until it has loaded
    pub meshes: Vec<ModelMesh>,
    wireframe_color: Color,
    edge_material: Handle<StandardMaterial>,
}

impl ViewerState {
    pub fn material(&self) -> MaterialKind {
        self.switcher.current()
    }
}

/// Progress of the model asset
#[derive(Resource, Default)]
enum ModelLoad {
    #[default]
    Idle,
    Loading(Handle<Gltf>),
    /// Scene spawned, waiting for its mesh entities to appear
    Spawned(Entity),
    Ready,
    Failed,
}

fn setup_materials(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<ViewerSettings>,
) {
    let metallic = &settings.materials.metallic;
    let metallic = materials.add(StandardMaterial {
        base_color: bevy_color(metallic.base_color),
        metallic: metallic.metallic,
        perceptual_roughness: metallic.roughness,
        ..default()
    });

    // Faint see-through surface; the edges come from line rendering
    let line_color = settings.materials.wireframe.color;
    let wireframe = materials.add(StandardMaterial {
        base_color: bevy_color(line_color.with_alpha(0.15)),
        emissive: bevy_color(line_color).into(),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    let edge_material = materials.add(StandardMaterial {
        base_color: bevy_color(line_color),
        emissive: bevy_color(line_color).into(),
        unlit: true,
        ..default()
    });

    commands.insert_resource(ViewerState {
        switcher: MaterialSwitcher::new(metallic, wireframe),
        meshes: Vec::new(),
        wireframe_color: bevy_color(line_color),
        edge_material,
    });
}

fn start_model_load(
    mut load: ResMut<ModelLoad>,
    asset_server: Res<AssetServer>,
    settings: Res<ViewerSettings>,
) {
    tracing::info!(path = %settings.model.path, "Loading model");
    *load = ModelLoad::Loading(asset_server.load(settings.model.path.clone()));
}

/// Check loading state and spawn the model scene once the glTF is ready
fn poll_model_load(
    mut commands: Commands,
    mut load: ResMut<ModelLoad>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    settings: Res<ViewerSettings>,
) {
    let ModelLoad::Loading(handle) = &*load else { return };

    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            let Some(gltf) = gltf_assets.get(handle) else { return };
            // Use first scene if no default
            let scene = gltf
                .default_scene
                .clone()
                .or_else(|| gltf.scenes.first().cloned());

            *load = match scene {
                Some(scene) => {
                    let root = commands.spawn((SceneRoot(scene), Name::new("model"))).id();
                    ModelLoad::Spawned(root)
                }
                None => {
                    tracing::error!(path = %settings.model.path, "Model has no scenes");
                    ModelLoad::Failed
                }
            };
        }
        Some(LoadState::Failed(err)) => {
            tracing::error!(path = %settings.model.path, "Failed to load model: {err}");
            *load = ModelLoad::Failed;
        }
        _ => {
            // Still loading
        }
    }
}

/// Gather the spawned sub-meshes, normalize their nodes and give them the
/// metallic material, then place the hotspot
fn collect_meshes(
    mut commands: Commands,
    mut load: ResMut<ModelLoad>,
    mut state: ResMut<ViewerState>,
    mut mesh_assets: ResMut<Assets<Mesh>>,
    children: Query<&Children>,
    primitives: Query<(&Mesh3d, Option<&ChildOf>)>,
    mut transforms: Query<&mut Transform>,
    edge_overlays: Res<EdgeOverlays>,
    settings: Res<ViewerSettings>,
) {
    let ModelLoad::Spawned(root) = *load else { return };

    let found: Vec<(Entity, Handle<Mesh>, Option<Entity>)> = children
        .iter_descendants(root)
        .filter_map(|entity| {
            let (mesh, parent) = primitives.get(entity).ok()?;
            Some((entity, mesh.0.clone(), parent.map(ChildOf::parent)))
        })
        .collect();
    if found.is_empty() {
        // Scene instance not spawned yet
        return;
    }

    // glTF primitives sit at identity under their node; the node carries
    // the placement
    let mut nodes: Vec<Entity> = found.iter().filter_map(|(_, _, node)| *node).collect();
    nodes.sort();
    nodes.dedup();
    for node in nodes {
        if let Ok(mut transform) = transforms.get_mut(node) {
            transform.translation.y = settings.model.vertical_position;
        }
    }

    let ViewerState { switcher, meshes, wireframe_color, edge_material } = &mut *state;
    *meshes = found
        .iter()
        .map(|(entity, mesh, _)| ModelMesh {
            entity: *entity,
            edges: edge_overlays
                .0
                .then(|| spawn_edge_overlay(&mut commands, &mut mesh_assets, *entity, mesh, edge_material))
                .flatten(),
        })
        .collect();

    switcher.apply(meshes, |mesh, material, kind| {
        assign_material(&mut commands, mesh, material, kind, *wireframe_color);
    });

    commands.spawn((
        HotspotOverlay::new(HotspotMarker::new(settings.hotspot.anchor)),
        Name::new("hotspot"),
    ));

    tracing::info!(meshes = meshes.len(), edge_overlays = edge_overlays.0, "Model ready");
    *load = ModelLoad::Ready;
}

/// Spawn a hidden line-list copy of `source` under `parent`
fn spawn_edge_overlay(
    commands: &mut Commands,
    mesh_assets: &mut Assets<Mesh>,
    parent: Entity,
    source: &Handle<Mesh>,
    material: &Handle<StandardMaterial>,
) -> Option<Entity> {
    let Some(lines) = mesh_assets.get(source).and_then(edge_mesh) else {
        tracing::debug!(?parent, "No edge overlay for mesh");
        return None;
    };
    let lines = mesh_assets.add(lines);

    let overlay = commands
        .spawn((
            Mesh3d(lines),
            MeshMaterial3d(material.clone()),
            Transform::default(),
            Visibility::Hidden,
            ChildOf(parent),
            Name::new("edges"),
        ))
        .id();
    Some(overlay)
}

/// Line-list mesh with one segment per unique triangle edge
fn edge_mesh(mesh: &Mesh) -> Option<Mesh> {
    if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
        return None;
    }
    let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return None;
    };

    let triangles: Vec<u32> = match mesh.indices() {
        Some(indices) => indices.iter().map(|i| i as u32).collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let edges = unique_edges(&triangles);
    if edges.is_empty() {
        return None;
    }

    let mut lines = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    lines.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions.clone());
    lines.insert_indices(Indices::U32(edges.into_iter().flatten().collect()));
    Some(lines)
}

fn handle_material_toggle(
    mut commands: Commands,
    mut toggles: MessageReader<ToggleMaterial>,
    mut state: ResMut<ViewerState>,
) {
    let ViewerState { switcher, meshes, wireframe_color, .. } = &mut *state;
    for _ in toggles.read() {
        if let Some(kind) = switcher.toggle(meshes, |mesh, material, kind| {
            assign_material(&mut commands, mesh, material, kind, *wireframe_color);
        }) {
            tracing::info!(material = %kind, "Material toggled");
        }
    }
}

/// Point one mesh at `material`; line rendering follows the wireframe material
fn assign_material(
    commands: &mut Commands,
    mesh: &ModelMesh,
    material: &Handle<StandardMaterial>,
    kind: MaterialKind,
    wireframe_color: Color,
) {
    let Ok(mut entity_commands) = commands.get_entity(mesh.entity) else {
        tracing::warn!(entity = ?mesh.entity, "Mesh entity no longer exists");
        return;
    };
    entity_commands.insert(MeshMaterial3d(material.clone()));
    match kind {
        MaterialKind::Wireframe => {
            entity_commands.insert((Wireframe, WireframeColor { color: wireframe_color }));
        }
        MaterialKind::Metallic => {
            entity_commands.remove::<(Wireframe, WireframeColor)>();
        }
    }

    if let Some(edges) = mesh.edges {
        if let Ok(mut edge_commands) = commands.get_entity(edges) {
            edge_commands.insert(match kind {
                MaterialKind::Wireframe => Visibility::Inherited,
                MaterialKind::Metallic => Visibility::Hidden,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotspot_core::ViewerConfig;

    fn test_app(edge_overlays: bool) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .add_message::<ToggleMaterial>()
            .insert_resource(ViewerSettings(ViewerConfig::default()))
            .insert_resource(EdgeOverlays(edge_overlays))
            .init_resource::<ModelLoad>()
            .add_systems(Startup, setup_materials)
            .add_systems(Update, (collect_meshes, handle_material_toggle).chain());
        // Runs Startup so the materials exist
        app.update();
        app
    }

    /// Scene root -> node (raised) -> `count` cube primitives
    fn spawn_model(app: &mut App, count: usize) -> (Entity, Vec<Entity>) {
        let world = app.world_mut();
        let cube = world
            .resource_mut::<Assets<Mesh>>()
            .add(Mesh::from(Cuboid::default()));

        let root = world.spawn(Transform::default()).id();
        let node = world
            .spawn((Transform::from_xyz(1.0, 2.0, 3.0), ChildOf(root)))
            .id();
        let primitives = (0..count)
            .map(|_| {
                world
                    .spawn((Mesh3d(cube.clone()), Transform::default(), ChildOf(node)))
                    .id()
            })
            .collect();

        *world.resource_mut::<ModelLoad>() = ModelLoad::Spawned(root);
        app.update();
        (node, primitives)
    }

    fn material_of(app: &App, entity: Entity) -> Handle<StandardMaterial> {
        app.world()
            .get::<MeshMaterial3d<StandardMaterial>>(entity)
            .unwrap()
            .0
            .clone()
    }

    fn assert_uniform(app: &App, primitives: &[Entity], kind: MaterialKind) {
        let state = app.world().resource::<ViewerState>();
        let expected = state.switcher.material(kind).clone();
        for entity in primitives {
            assert_eq!(material_of(app, *entity), expected);
            let has_wireframe = app.world().get::<Wireframe>(*entity).is_some();
            assert_eq!(has_wireframe, kind == MaterialKind::Wireframe);
        }
    }

    #[test]
    fn test_collect_meshes_places_nodes_and_assigns_metallic() {
        let mut app = test_app(false);
        let (node, primitives) = spawn_model(&mut app, 3);

        assert!(matches!(*app.world().resource::<ModelLoad>(), ModelLoad::Ready));
        let state = app.world().resource::<ViewerState>();
        let collected: Vec<Entity> = state.meshes.iter().map(|m| m.entity).collect();
        assert_eq!(collected, primitives);
        assert!(state.meshes.iter().all(|m| m.edges.is_none()));

        let translation = app.world().get::<Transform>(node).unwrap().translation;
        assert_eq!(translation, Vec3::new(1.0, 0.0, 3.0));

        assert_uniform(&app, &primitives, MaterialKind::Metallic);
    }

    #[test]
    fn test_toggle_reassigns_every_mesh() {
        let mut app = test_app(false);
        let (_, primitives) = spawn_model(&mut app, 3);

        app.world_mut().write_message(ToggleMaterial);
        app.update();
        assert_uniform(&app, &primitives, MaterialKind::Wireframe);

        app.world_mut().write_message(ToggleMaterial);
        app.update();
        assert_uniform(&app, &primitives, MaterialKind::Metallic);
    }

    #[test]
    fn test_toggle_before_load_is_noop() {
        let mut app = test_app(false);
        app.world_mut().write_message(ToggleMaterial);
        app.update();
        assert_eq!(
            app.world().resource::<ViewerState>().material(),
            MaterialKind::Metallic
        );
    }

    #[test]
    fn test_edge_overlays_follow_material() {
        let mut app = test_app(true);
        let (_, primitives) = spawn_model(&mut app, 2);

        let overlays: Vec<Entity> = app
            .world()
            .resource::<ViewerState>()
            .meshes
            .iter()
            .map(|m| m.edges.unwrap())
            .collect();
        assert_eq!(overlays.len(), primitives.len());

        let visibility = |app: &App, entity: Entity| *app.world().get::<Visibility>(entity).unwrap();
        for (overlay, primitive) in overlays.iter().zip(&primitives) {
            assert_eq!(visibility(&app, *overlay), Visibility::Hidden);
            assert_eq!(app.world().get::<ChildOf>(*overlay).unwrap().parent(), *primitive);
        }

        app.world_mut().write_message(ToggleMaterial);
        app.update();
        for overlay in &overlays {
            assert_eq!(visibility(&app, *overlay), Visibility::Inherited);
        }

        app.world_mut().write_message(ToggleMaterial);
        app.update();
        for overlay in &overlays {
            assert_eq!(visibility(&app, *overlay), Visibility::Hidden);
        }
    }

    #[test]
    fn test_edge_mesh_from_cube() {
        let lines = edge_mesh(&Mesh::from(Cuboid::default())).unwrap();
        assert_eq!(lines.primitive_topology(), PrimitiveTopology::LineList);
        // Six faces of four unshared vertices, each face split into two
        // triangles: four border edges plus one diagonal
        assert_eq!(lines.indices().unwrap().len(), 6 * 5 * 2);
    }

    #[test]
    fn test_edge_mesh_rejects_line_topology() {
        let lines = edge_mesh(&Mesh::from(Cuboid::default())).unwrap();
        assert!(edge_mesh(&lines).is_none());
    }
}
