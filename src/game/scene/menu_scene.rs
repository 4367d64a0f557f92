use bevy::prelude::*;

use crate::game::skins::{AppliedSkin, PreviewCharacter, Region, SkinCatalog};

/// Marker component for entities of the menu scene
#[derive(Component)]
pub struct MenuSceneEntity;

const PREVIEW_HEIGHT: f32 = 1.8;
const PREVIEW_RADIUS: f32 = 0.4;

/// Spawn the menu scene: camera, light, the main region, every showcase region
/// from the catalog, and the preview character.
pub fn spawn_menu_scene(
    mut commands: Commands,
    catalog: Res<SkinCatalog>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("Spawning menu scene...");

    commands.spawn((
        Name::new("Menu Camera"),
        MenuSceneEntity,
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.6, 5.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
    ));

    commands.spawn((
        Name::new("Key Light"),
        MenuSceneEntity,
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -1.0, -0.5, 0.0)),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 200.0,
        affects_lightmapped_meshes: false,
    });

    // ===== MAIN MENU REGION =====
    let floor = meshes.add(Cuboid::new(12.0, 0.2, 12.0));
    let pedestal = meshes.add(Cylinder::new(1.0, 0.3));
    let floor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.5, 0.3),
        perceptual_roughness: 0.9,
        ..default()
    });
    let pedestal_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.6, 0.6, 0.65),
        ..default()
    });
    commands.spawn((
        Name::new("Main Menu Region"),
        MenuSceneEntity,
        Region::Main,
        Transform::default(),
        Visibility::Visible,
        children![
            (
                Mesh3d(floor),
                MeshMaterial3d(floor_material),
                Transform::from_xyz(0.0, -0.1, 0.0),
            ),
            (
                Mesh3d(pedestal),
                MeshMaterial3d(pedestal_material),
                Transform::from_xyz(0.0, 0.15, 0.0),
            ),
        ],
    ));

    // ===== SHOWCASE REGIONS =====
    for index in 0..catalog.showcase_regions {
        spawn_showcase_region(&mut commands, &mut meshes, &mut materials, index);
    }

    // ===== PREVIEW CHARACTER =====
    commands.spawn((
        Name::new("Preview Character"),
        MenuSceneEntity,
        PreviewCharacter,
        AppliedSkin::default(),
        Mesh3d(meshes.add(Capsule3d::new(PREVIEW_RADIUS, PREVIEW_HEIGHT - 2.0 * PREVIEW_RADIUS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.8, 0.8, 0.8),
            ..default()
        })),
        Transform::from_xyz(0.0, 0.3 + PREVIEW_HEIGHT / 2.0, 0.0),
    ));

    info!(
        "Menu scene spawned with {} showcase regions",
        catalog.showcase_regions
    );
}

/// Helper function to spawn one showcase backdrop, hidden until a presentation
/// enters it
fn spawn_showcase_region(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    index: u32,
) {
    let hue = (index as f32 * 90.0 + 200.0).rem_euclid(360.0);
    let backdrop = materials.add(StandardMaterial {
        base_color: Color::hsl(hue, 0.5, 0.25),
        emissive: LinearRgba::rgb(0.05, 0.05, 0.1),
        ..default()
    });
    let stage = materials.add(StandardMaterial {
        base_color: Color::hsl(hue, 0.3, 0.15),
        ..default()
    });

    commands.spawn((
        Name::new(format!("Showcase Region {index}")),
        MenuSceneEntity,
        Region::Showcase(index),
        Transform::default(),
        Visibility::Hidden,
        children![
            (
                Mesh3d(meshes.add(Cuboid::new(10.0, 6.0, 0.2))),
                MeshMaterial3d(backdrop),
                Transform::from_xyz(0.0, 3.0, -3.0),
            ),
            (
                Mesh3d(meshes.add(Cylinder::new(2.5, 0.1))),
                MeshMaterial3d(stage),
                Transform::from_xyz(0.0, 0.05, 0.0),
            ),
        ],
    ));

    debug!("Spawned showcase region {index}");
}
