//! Plants and rocks on the tank floor.

use bevy::prelude::*;
use shared::config::AquariumConfig;
use shared::generators::{
    generate_plant_bed, generate_rock_field, PartRole, PlacedPlant, PlacedRock, PlantKind,
};
use shared::rng::SceneRng;
use shared::settings::SceneSettings;

use super::meshing::build_mesh;
use super::SceneMaterials;

/// Root of a plant or rock. Everything tagged is thrown away on regeneration.
#[derive(Component)]
pub struct Scenery;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plant(pub PlantKind);

#[derive(Component)]
pub struct Rock;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantPart(pub PartRole);

impl SceneMaterials {
    fn plant_material(&self, role: PartRole) -> Handle<StandardMaterial> {
        match role {
            PartRole::Stem => self.stem.clone(),
            PartRole::Leaf | PartRole::Moss => self.leaf.clone(),
        }
    }
}

fn spawn_plant(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &SceneMaterials,
    plant: &PlacedPlant,
) {
    let placement = plant.placement;
    commands
        .spawn((
            Scenery,
            Plant(plant.blueprint.kind),
            Transform::from_translation(placement.translation)
                .with_rotation(Quat::from_rotation_y(placement.yaw)),
            Visibility::default(),
        ))
        .with_children(|parent| {
            for part in &plant.blueprint.parts {
                parent.spawn((
                    PlantPart(part.role),
                    Mesh3d(meshes.add(build_mesh(&part.mesh))),
                    MeshMaterial3d(materials.plant_material(part.role)),
                ));
            }
        });
}

fn spawn_rock(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &SceneMaterials,
    rock: &PlacedRock,
) {
    commands.spawn((
        Scenery,
        Rock,
        Mesh3d(meshes.add(build_mesh(&rock.mesh))),
        MeshMaterial3d(materials.rock.clone()),
        Transform::from_translation(rock.placement.translation)
            .with_rotation(Quat::from_rotation_y(rock.placement.yaw)),
    ));
}

/// Generates rocks then plants from the current settings and spawns them.
fn populate_scenery(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &SceneMaterials,
    config: &AquariumConfig,
    settings: &SceneSettings,
    rng: &mut SceneRng,
) {
    let bounds = config.tank.floor_bounds();
    let rocks = generate_rock_field(&mut rng.0, &config.rocks, &bounds, 0.0);
    let plants = generate_plant_bed(&mut rng.0, &settings.plant_bed(config), &bounds, 0.0);

    for rock in &rocks {
        spawn_rock(commands, meshes, materials, rock);
    }
    for plant in &plants {
        spawn_plant(commands, meshes, materials, plant);
    }
    info!(
        "Spawned {} rocks and {} plants (density {}, variety {})",
        rocks.len(),
        plants.len(),
        settings.plant_density,
        settings.plant_variety
    );
}

/// Sets leaf and stem colors for a plant color.
pub fn tint_plants(
    materials: &mut Assets<StandardMaterial>,
    handles: &SceneMaterials,
    plant_color: Color,
) {
    for role in [PartRole::Leaf, PartRole::Stem] {
        if let Some(material) = materials.get_mut(&handles.plant_material(role)) {
            material.base_color = role.tint(plant_color);
        }
    }
}

pub fn spawn_scenery(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<SceneMaterials>,
    config: Res<AquariumConfig>,
    settings: Res<SceneSettings>,
    mut rng: ResMut<SceneRng>,
) {
    populate_scenery(
        &mut commands,
        &mut meshes,
        &materials,
        &config,
        &settings,
        &mut rng,
    );
}

pub fn regenerate_scenery(
    mut commands: Commands,
    scenery: Query<Entity, With<Scenery>>,
    mut meshes: ResMut<Assets<Mesh>>,
    handles: Res<SceneMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<AquariumConfig>,
    settings: Res<SceneSettings>,
    mut rng: ResMut<SceneRng>,
) {
    for entity in scenery.iter() {
        commands.entity(entity).despawn();
    }
    tint_plants(&mut materials, &handles, settings.plant_color);
    populate_scenery(
        &mut commands,
        &mut meshes,
        &handles,
        &config,
        &settings,
        &mut rng,
    );
}

pub fn recolor_plants(
    handles: Res<SceneMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<SceneSettings>,
) {
    tint_plants(&mut materials, &handles, settings.plant_color);
    debug!("Plants recolored");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use shared::generators::plant_counts;

    #[test]
    fn test_tint_keeps_stems_darker_than_leaves() {
        let mut materials = Assets::<StandardMaterial>::default();
        let handles = SceneMaterials::for_tests(&mut materials);

        tint_plants(&mut materials, &handles, Color::srgb(0.3, 0.9, 0.6));

        let leaf = materials.get(&handles.leaf).unwrap().base_color.to_srgba();
        let stem = materials.get(&handles.stem).unwrap().base_color.to_srgba();
        assert!((stem.red - leaf.red * 0.7).abs() < 1e-6);
        assert!((stem.green - leaf.green * 0.7).abs() < 1e-6);
        assert!((stem.blue - leaf.blue * 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_regeneration_replaces_every_plant_and_rock() {
        let config = AquariumConfig::default();
        let mut settings = SceneSettings::from_config(&config);
        let mut materials = Assets::<StandardMaterial>::default();
        let handles = SceneMaterials::for_tests(&mut materials);

        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .insert_resource(materials)
            .insert_resource(handles)
            .insert_resource(SceneRng::seeded(3))
            .insert_resource(settings.clone())
            .insert_resource(config.clone());
        app.world_mut().run_system_once(spawn_scenery).unwrap();

        settings.plant_density = 0.5;
        settings.plant_variety = 1;
        app.insert_resource(settings);
        app.world_mut().run_system_once(regenerate_scenery).unwrap();

        let world = app.world_mut();
        let plants = world.query::<&Plant>().iter(world).count();
        let rocks = world.query::<&Rock>().iter(world).count();
        let roots = world
            .query_filtered::<(), With<Scenery>>()
            .iter(world)
            .count();
        assert_eq!(plants, plant_counts(0.5, 1).total() as usize);
        assert_eq!(rocks, config.rocks.count as usize);
        assert_eq!(roots, plants + rocks);
        assert_eq!(
            world
                .query::<&Plant>()
                .iter(world)
                .filter(|plant| plant.0 == PlantKind::Secondary)
                .count(),
            0
        );
    }
}
