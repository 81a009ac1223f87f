//! Headless симуляция Arcane Redemption
//!
//! Запускает Bevy App без рендера: игрок по скрипту идёт к ближайшему
//! врагу и атакует, враги живут по своему FSM.
//!
//! Usage: `arcane_simulation [config.ron]`

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use arcane_simulation::combat::PrimaryAttackIntent;
use arcane_simulation::logger;
use arcane_simulation::{
    create_headless_app, drain_events, run_fixed_tick, Character, DamageDealt, DeterministicRng, EnemyBehavior,
    EnemyStateChanged, HeadlessMovementPlugin, Hurtbox, MovementIntent, Player, SimulationConfig, SimulationPlugin,
    SwitchWeaponIntent, TickSet, WeaponManager, WeaponSelection,
};

/// Скорость скриптового игрока (m/s)
const PLAYER_SPEED: f32 = 3.5;
/// Дальше этого игрок стреляет из посоха, ближе бьёт мечом
const STAFF_DISTANCE: f32 = 6.0;
const SWORD_REACH: f32 = 1.8;

#[derive(Resource)]
struct DemoSettings {
    player_weapon_count: usize,
}

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                logger::init_logger();
                logger::log_error(&format!("Failed to load config {}: {}", path, err));
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    let mut app = create_headless_app(config.seed);
    logger::set_log_level(config.log_level);
    logger::log_info(&format!(
        "Starting Arcane Redemption headless simulation (seed: {}, ticks: {})",
        config.seed, config.ticks
    ));

    app.add_plugins((SimulationPlugin, HeadlessMovementPlugin))
        .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
        .insert_resource(DemoSettings {
            player_weapon_count: config.player_weapons.len(),
        })
        .add_systems(FixedUpdate, drive_scripted_player.in_set(TickSet::Decide));

    spawn_world(&mut app, &config);

    let delta = (1.0 / config.tick_hz) as f32;
    let mut damage_events = 0usize;
    let mut state_changes = 0usize;

    for tick in 0..config.ticks {
        run_fixed_tick(&mut app, delta);

        damage_events += drain_events::<DamageDealt>(&mut app).len();
        state_changes += drain_events::<EnemyStateChanged>(&mut app).len();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            logger::log_info(&format!("Tick {}: {} entities", tick, entity_count));
        }
    }

    let world = app.world_mut();
    let enemies_alive = world
        .query_filtered::<&Character, With<EnemyBehavior>>()
        .iter(world)
        .filter(|character| character.is_alive())
        .count();
    let player_health = world
        .query_filtered::<&Character, With<Player>>()
        .iter(world)
        .map(|character| character.health().current())
        .next()
        .unwrap_or(0.0);

    logger::log_info(&format!(
        "Simulation complete: {} damage events, {} enemy state changes, {} enemies alive, player health {:.1}",
        damage_events, state_changes, enemies_alive, player_health
    ));
}

fn spawn_world(app: &mut App, config: &SimulationConfig) {
    let world = app.world_mut();

    world.spawn((
        Character::from_config(&config.player),
        Player,
        Hurtbox::actor(),
        WeaponManager::from_configs(&config.player_weapons, 0),
        MovementIntent::default(),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    let positions: Vec<Vec3> = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        (0..config.enemy_count)
            .map(|_| {
                let angle = rng.rng.gen_range(0.0..TAU);
                let distance = rng.rng.gen_range(config.spawn_radius * 0.5..=config.spawn_radius);
                Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
            })
            .collect()
    };

    for position in positions {
        world.spawn((
            Character::from_config(&config.enemy),
            EnemyBehavior::new(config.enemy_ai.clone()),
            Hurtbox::actor(),
            WeaponManager::from_configs(&config.enemy_weapons, 0),
            MovementIntent::default(),
            Transform::from_translation(position),
        ));
    }
}

/// System: игрок идёт к ближайшему живому врагу и атакует.
///
/// Вдали стреляет из посоха (если он есть в ростере), вблизи бьёт мечом.
fn drive_scripted_player(
    settings: Res<DemoSettings>,
    mut players: Query<(Entity, &Transform, &Character, &WeaponManager, &mut MovementIntent), With<Player>>,
    enemies: Query<(Entity, &Transform, &Character), With<EnemyBehavior>>,
    mut attacks: EventWriter<PrimaryAttackIntent>,
    mut switches: EventWriter<SwitchWeaponIntent>,
) {
    for (entity, transform, character, manager, mut intent) in players.iter_mut() {
        intent.stop();
        if !character.is_alive() {
            continue;
        }

        let position = transform.translation;
        let nearest = enemies
            .iter()
            .filter(|(_, _, enemy)| enemy.is_alive())
            .map(|(enemy, enemy_transform, _)| {
                (enemy, enemy_transform.translation, enemy_transform.translation.distance(position))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2).then_with(|| a.0.cmp(&b.0)));

        let Some((_, target, distance)) = nearest else {
            continue;
        };

        let wanted = if distance > STAFF_DISTANCE && settings.player_weapon_count > 1 {
            1
        } else {
            0
        };
        if settings.player_weapon_count > 0 && manager.active_index() != Some(wanted) {
            switches.write(SwitchWeaponIntent {
                entity,
                selection: WeaponSelection::Index(wanted),
            });
        }

        intent.look_at = Some(target);
        intent.rotation_speed = 10.0;
        intent.speed = PLAYER_SPEED;
        if distance > SWORD_REACH {
            intent.direction = Vec3::new(target.x - position.x, 0.0, target.z - position.z).normalize_or_zero();
        }

        let facing_target = (transform.rotation * Vec3::NEG_Z)
            .dot((target - position).normalize_or_zero())
            > 0.9;
        if facing_target && (distance <= SWORD_REACH || wanted == 1) {
            attacks.write(PrimaryAttackIntent { entity });
        }
    }
}
