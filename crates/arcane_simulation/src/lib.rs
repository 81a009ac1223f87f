//! Arcane Redemption Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: ресурсы персонажа, экипировка,
//! оружие (melee / снаряды) и AI врагов.
//!
//! Движок (рендер, физика, анимации) живёт снаружи и общается с core:
//! - вход: `PrimaryAttackIntent`, `SecondaryAttackIntent`, `SwitchWeaponIntent`
//! - выход: notifications, `DamageDealt`, `EffectCue`, `MovementIntent`
//! - capability: `SpatialQuery` / `PlayerLocator` (по умолчанию `SpatialIndex`)
//!
//! Тик = один прогон `FixedUpdate`, см. `schedule::TickSet`.

use bevy::ecs::event::event_update_system;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod item_system;
pub mod logger;
pub mod movement;
pub mod schedule;
pub mod spatial;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, EnemyBehavior, EnemyState, EnemyStateChanged};
pub use combat::{
    CharacterNotification, CombatPlugin, DamageDealt, DespawnAfter, EffectCue, Projectile, PrimaryAttackIntent,
    SecondaryAttackIntent, SwitchWeaponIntent, Weapon, WeaponEvent, WeaponManager, WeaponNotification,
    WeaponSelection,
};
pub use components::*;
pub use config::{AIConfig, CharacterConfig, ConfigError, SimulationConfig, WeaponConfig};
pub use item_system::{InstanceIdAllocator, ItemHandle, ItemId, ItemInstance};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel};
pub use movement::HeadlessMovementPlugin;
pub use schedule::TickSet;
pub use spatial::{Hurtbox, PlayerLocator, SpatialIndex, SpatialQuery};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Mover не входит: в движке его роль играет физика,
/// в headless режиме добавьте `HeadlessMovementPlugin`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        // Seed от create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins((CombatPlugin, AIPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Один детерминированный тик: сдвигает `Time<Fixed>` на `delta_secs`,
/// прогоняет `FixedUpdate`, не глядя на реальное время, и ротирует
/// буферы событий (как `First` в обычном `app.update()`).
///
/// Событие живёт два тика: тот, в котором записано, и следующий.
/// Кто хочет видеть всё, вызывает `drain_events` после каждого тика.
pub fn run_fixed_tick(app: &mut App, delta_secs: f32) {
    let world = app.world_mut();
    world
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f32(delta_secs.max(0.0)));
    world.run_schedule(FixedUpdate);

    if let Err(err) = world.run_system_cached(event_update_system) {
        log_error(&format!("Event buffer update failed: {:?}", err));
    }
}

/// Забирает события типа `T`, записанные за текущий и предыдущий тик.
pub fn drain_events<T: Event>(app: &mut App) -> Vec<T> {
    match app.world_mut().get_resource_mut::<Events<T>>() {
        Some(mut events) => events.drain().collect(),
        None => Vec::new(),
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
