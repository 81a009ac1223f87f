//! Combat system module
//!
//! ECS ответственность:
//! - Game state: пулы персонажей, ростер оружия, снаряды
//! - Combat rules: cooldown, стоимость атак, конус melee, одноразовый урон снаряда
//! - Events: DamageDealt, ProjectileImpact, Character/Weapon notifications
//!
//! Presentation (anim, audio, VFX) подписывается на events и `EffectCue`.

use bevy::prelude::*;

pub mod effects;
pub mod events;
pub mod projectile;
pub mod systems;
pub mod weapon;
pub mod weapon_manager;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod weapon_tests;

// Re-export основных типов
pub use effects::{EffectCue, EffectKind, EffectSchedule, GLOW_FLASH_DURATION, TRAIL_DURATION};
pub use events::*;
pub use projectile::Projectile;
pub use systems::DespawnAfter;
pub use weapon::{
    AttackOrigin, AttackResolution, MeleeProfile, MeleeStrike, ProjectileLaunch, RangedProfile, Weapon,
    WeaponKind,
};
pub use weapon_manager::{WeaponEvent, WeaponManager};

use crate::schedule::{configure_tick_sets, TickSet};
use crate::spatial::{rebuild_spatial_index, SpatialIndex};

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. Prepare: rebuild_spatial_index → regenerate_resources
/// 2. Resolve: смена оружия → запросы атак → melee → снаряды
/// 3. Cleanup: despawn по таймеру → отложенные cue → выгрузка notifications
///
/// AI (`TickSet::Decide`) встаёт между Prepare и Resolve.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        configure_tick_sets(app);

        app.init_resource::<SpatialIndex>()
            .init_resource::<EffectSchedule>();

        // Регистрация событий
        app.add_event::<PrimaryAttackIntent>()
            .add_event::<SecondaryAttackIntent>()
            .add_event::<SwitchWeaponIntent>()
            .add_event::<MeleeSwing>()
            .add_event::<DamageDealt>()
            .add_event::<ProjectileLaunched>()
            .add_event::<ProjectileImpact>()
            .add_event::<CharacterNotification>()
            .add_event::<WeaponNotification>()
            .add_event::<EffectCue>();

        app.add_systems(
            FixedUpdate,
            (rebuild_spatial_index, systems::regenerate_resources)
                .chain()
                .in_set(TickSet::Prepare),
        )
        .add_systems(
            FixedUpdate,
            (
                systems::process_weapon_switches,
                systems::process_attack_intents,
                systems::resolve_melee_swings,
                systems::advance_projectiles,
            )
                .chain()
                .in_set(TickSet::Resolve),
        )
        .add_systems(
            FixedUpdate,
            (
                systems::despawn_after_timeout,
                effects::dispatch_effect_cues,
                systems::flush_notifications,
            )
                .chain()
                .in_set(TickSet::Cleanup),
        );
    }
}
