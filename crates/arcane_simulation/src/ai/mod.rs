//! AI decision-making module
//!
//! EnemyBehavior: FSM Idle / Patrol / Alert / Combat / Retreat / Dead
//! поверх Character + WeaponManager. AI решает *куда* двигаться и
//! *когда* атаковать; урон и cooldown остаются за combat.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::{BehaviorOutput, EnemyBehavior, EnemyState, SelfPerception, StateTransition};
pub use events::EnemyStateChanged;

use crate::combat::systems::flush_notifications;
use crate::schedule::{configure_tick_sets, TickSet};

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. evaluate_enemy_behaviors (Decide) — восприятие → состояние → MovementIntent / PrimaryAttackIntent
/// 2. handle_enemy_deaths (Cleanup) — Dead + DespawnAfter для трупов
///
/// Рассчитан на работу вместе с `CombatPlugin` (SpatialIndex, attack intents).
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        configure_tick_sets(app);

        app.add_event::<EnemyStateChanged>();

        app.add_systems(
            FixedUpdate,
            systems::evaluate_enemy_behaviors.in_set(TickSet::Decide),
        )
        .add_systems(
            FixedUpdate,
            systems::handle_enemy_deaths
                .in_set(TickSet::Cleanup)
                .before(flush_notifications),
        );
    }
}
