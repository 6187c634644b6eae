//! Renderable fish.
//!
//! The school resource owns every pose; fish entities only carry a `FishId`
//! and copy their transform from the school after each fixed step.

use bevy::prelude::*;
use shared::config::AquariumConfig;
use shared::fish::{Fish, FishId, FishSchool};
use shared::generators::{generate_fish, random_appearance};
use shared::rng::SceneRng;
use shared::settings::SceneSettings;

use super::meshing::build_mesh;
use super::SceneMaterials;

/// Tail fin of the fish with the given id, swung around its pivot.
#[derive(Component, Debug, Clone, Copy)]
pub struct FishTail(pub FishId);

fn spawn_fish_renderable(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    handles: &SceneMaterials,
    config: &AquariumConfig,
    rng: &mut SceneRng,
    fish: &Fish,
) {
    let appearance = random_appearance(&mut rng.0, &config.fish);
    let blueprint = generate_fish(&mut rng.0, appearance.size);

    let body_material = materials.add(StandardMaterial {
        base_color: appearance.body_color,
        perceptual_roughness: 0.4,
        ..default()
    });
    let fin_material = materials.add(StandardMaterial {
        base_color: appearance.fin_color.with_alpha(0.85),
        alpha_mode: AlphaMode::Blend,
        cull_mode: None,
        double_sided: true,
        ..default()
    });

    commands
        .spawn((
            fish.id,
            Mesh3d(meshes.add(build_mesh(&blueprint.body))),
            MeshMaterial3d(body_material),
            Transform::from_translation(fish.pose.translation).with_rotation(fish.pose.rotation),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(build_mesh(&blueprint.fins))),
                MeshMaterial3d(fin_material.clone()),
            ));
            parent.spawn((
                Mesh3d(meshes.add(build_mesh(&blueprint.eyes))),
                MeshMaterial3d(handles.fish_eye.clone()),
            ));
            parent.spawn((
                FishTail(fish.id),
                Mesh3d(meshes.add(build_mesh(&blueprint.tail))),
                MeshMaterial3d(fin_material),
                Transform::from_translation(blueprint.tail_pivot),
            ));
        });
}

pub fn spawn_school(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    handles: Res<SceneMaterials>,
    config: Res<AquariumConfig>,
    settings: Res<SceneSettings>,
    mut rng: ResMut<SceneRng>,
    time: Res<Time>,
) {
    let school = FishSchool::populate(
        settings.fish_count,
        config.fish.clone(),
        config.tank.swim_bounds(),
        &mut rng.0,
        time.elapsed_secs(),
    );
    for fish in school.iter() {
        spawn_fish_renderable(
            &mut commands,
            &mut meshes,
            &mut materials,
            &handles,
            &config,
            &mut rng,
            fish,
        );
    }
    commands.insert_resource(school);
}

/// Resizes the school to the requested count. Surviving fish keep their
/// renderables; removed ones are despawned and new ones spawned.
pub fn rebuild_school(
    mut commands: Commands,
    mut school: ResMut<FishSchool>,
    fish_entities: Query<(Entity, &FishId)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    handles: Res<SceneMaterials>,
    config: Res<AquariumConfig>,
    settings: Res<SceneSettings>,
    mut rng: ResMut<SceneRng>,
    time: Res<Time>,
) {
    let before = school.len();
    school.resize(settings.fish_count, &mut rng.0, time.elapsed_secs());
    let after = school.len();

    for (entity, id) in fish_entities.iter() {
        if id.0 >= after {
            commands.entity(entity).despawn();
        }
    }
    for index in before..after {
        if let Some(fish) = school.get(FishId(index)) {
            spawn_fish_renderable(
                &mut commands,
                &mut meshes,
                &mut materials,
                &handles,
                &config,
                &mut rng,
                fish,
            );
        }
    }
    info!("Fish school resized from {} to {}", before, after);
}

/// One fixed steering step for the whole school.
pub fn step_school_system(
    time: Res<Time>,
    mut school: ResMut<FishSchool>,
    mut rng: ResMut<SceneRng>,
) {
    school.step(time.elapsed_secs(), &mut rng.0);
}

pub fn sync_fish_transforms(
    school: Res<FishSchool>,
    mut fish_entities: Query<(&FishId, &mut Transform)>,
) {
    for (id, mut transform) in fish_entities.iter_mut() {
        let Some(fish) = school.get(*id) else {
            continue;
        };
        transform.translation = fish.pose.translation;
        transform.rotation = fish.pose.rotation;
    }
}

pub fn animate_fish_tails(
    time: Res<Time>,
    school: Res<FishSchool>,
    mut tails: Query<(&FishTail, &mut Transform)>,
) {
    let elapsed = time.elapsed_secs();
    for (tail, mut transform) in tails.iter_mut() {
        if let Some(angle) = school.tail_angle(tail.0, elapsed) {
            transform.rotation = Quat::from_rotation_y(angle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::time::TimeUpdateStrategy;
    use rand::{rngs::StdRng, SeedableRng};
    use shared::config::FishConfig;
    use shared::fish::TankBounds;
    use std::time::Duration;

    fn school(count: u32) -> FishSchool {
        let mut rng = StdRng::seed_from_u64(17);
        FishSchool::populate(
            count,
            FishConfig::default(),
            TankBounds::default(),
            &mut rng,
            0.0,
        )
    }

    fn spawned_school(count: u32) -> App {
        let mut config = AquariumConfig::default();
        config.fish.count = count;
        let mut materials = Assets::<StandardMaterial>::default();
        let handles = SceneMaterials::for_tests(&mut materials);

        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<Assets<Mesh>>()
            .insert_resource(materials)
            .insert_resource(handles)
            .insert_resource(SceneSettings::from_config(&config))
            .insert_resource(config)
            .insert_resource(SceneRng::seeded(8));
        app.world_mut().run_system_once(spawn_school).unwrap();
        app
    }

    fn resize_to(app: &mut App, count: u32) {
        app.world_mut().resource_mut::<SceneSettings>().fish_count = count;
        app.world_mut().run_system_once(rebuild_school).unwrap();
    }

    fn fish_ids(app: &mut App) -> Vec<usize> {
        let world = app.world_mut();
        let mut ids: Vec<usize> = world.query::<&FishId>().iter(world).map(|id| id.0).collect();
        ids.sort_unstable();
        ids
    }

    fn tail_count(app: &mut App) -> usize {
        let world = app.world_mut();
        world.query::<&FishTail>().iter(world).count()
    }

    #[test]
    fn test_shrinking_school_despawns_highest_ids() {
        let mut app = spawned_school(6);
        assert_eq!(fish_ids(&mut app), (0..6).collect::<Vec<_>>());

        resize_to(&mut app, 2);

        assert_eq!(fish_ids(&mut app), vec![0, 1]);
        assert_eq!(tail_count(&mut app), 2);
        assert_eq!(app.world().resource::<FishSchool>().len(), 2);
    }

    #[test]
    fn test_growing_school_keeps_survivors() {
        let mut app = spawned_school(2);
        let survivor = app.world().resource::<FishSchool>().get(FishId(1)).cloned();

        resize_to(&mut app, 5);

        assert_eq!(fish_ids(&mut app), (0..5).collect::<Vec<_>>());
        assert_eq!(tail_count(&mut app), 5);
        assert_eq!(
            app.world().resource::<FishSchool>().get(FishId(1)).cloned(),
            survivor
        );
    }

    #[test]
    fn test_renderables_follow_school_after_step() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(school(3))
            .insert_resource(SceneRng::seeded(17))
            .add_systems(Update, (step_school_system, sync_fish_transforms).chain());

        let entities: Vec<Entity> = (0..3)
            .map(|index| {
                app.world_mut()
                    .spawn((FishId(index), Transform::default()))
                    .id()
            })
            .collect();

        let before = app.world().resource::<FishSchool>().clone();
        app.update();

        let school = app.world().resource::<FishSchool>();
        for (index, entity) in entities.into_iter().enumerate() {
            let fish = school.get(FishId(index)).unwrap();
            let transform = app.world().get::<Transform>(entity).unwrap();
            assert_eq!(transform.translation, fish.pose.translation);
            assert_eq!(transform.rotation, fish.pose.rotation);
            // Fish spawn far from their first target and must have moved
            let start = before.get(FishId(index)).unwrap().pose.translation;
            assert_ne!(transform.translation, start);
        }
    }

    #[test]
    fn test_tails_swing_with_time() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
                250,
            )))
            .insert_resource(school(1))
            .add_systems(Update, animate_fish_tails);
        let tail = app
            .world_mut()
            .spawn((FishTail(FishId(0)), Transform::default()))
            .id();

        app.update();
        app.update();

        let elapsed = app.world().resource::<Time>().elapsed_secs();
        let expected = app
            .world()
            .resource::<FishSchool>()
            .tail_angle(FishId(0), elapsed)
            .unwrap();
        let rotation = app.world().get::<Transform>(tail).unwrap().rotation;
        assert!(rotation.angle_between(Quat::from_rotation_y(expected)) < 1e-5);
    }
}
