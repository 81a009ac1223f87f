//! AI systems: оценка поведения и уборка мёртвых врагов.

use bevy::prelude::*;

use crate::ai::components::{EnemyBehavior, SelfPerception, StateTransition};
use crate::ai::events::EnemyStateChanged;
use crate::combat::{DespawnAfter, PrimaryAttackIntent};
use crate::components::{Character, MovementIntent};
use crate::logger;
use crate::spatial::SpatialIndex;

fn notify(
    writer: &mut EventWriter<EnemyStateChanged>,
    entity: Entity,
    transitions: impl IntoIterator<Item = StateTransition>,
) {
    for StateTransition { from, to } in transitions {
        logger::log(&format!("🧠 Enemy {:?}: {} → {}", entity, from, to));
        writer.write(EnemyStateChanged { entity, from, to });
    }
}

/// System: каждый враг решает куда идти и атаковать ли (TickSet::Decide).
///
/// Результат: `MovementIntent` (вставляется если нет) и `PrimaryAttackIntent`,
/// который combat обработает в этом же тике.
pub fn evaluate_enemy_behaviors(
    mut commands: Commands,
    index: Res<SpatialIndex>,
    mut enemies: Query<(
        Entity,
        &Transform,
        &Character,
        &mut EnemyBehavior,
        Option<&mut MovementIntent>,
    )>,
    mut attacks: EventWriter<PrimaryAttackIntent>,
    mut state_changes: EventWriter<EnemyStateChanged>,
) {
    // Порядок событий не должен зависеть от порядка архетипов
    let mut enemies: Vec<_> = enemies.iter_mut().collect();
    enemies.sort_by_key(|(entity, ..)| *entity);

    for (entity, transform, character, mut behavior, intent) in enemies {
        if behavior.is_disabled() {
            continue;
        }

        let me = SelfPerception {
            position: transform.translation,
            alive: character.is_alive(),
            health_percent: character.health_percent(),
        };
        let output = behavior.evaluate(&me, &*index);
        notify(&mut state_changes, entity, output.transitions.iter().copied());

        let config = behavior.config();
        let next_intent = MovementIntent {
            direction: output.movement.unwrap_or(Vec3::ZERO),
            speed: config.move_speed,
            look_at: output.look_at,
            rotation_speed: config.rotation_speed,
        };
        match intent {
            Some(mut intent) => *intent = next_intent,
            None => {
                commands.entity(entity).insert(next_intent);
            }
        }

        if output.attack {
            attacks.write(PrimaryAttackIntent { entity });
        }
    }
}

/// System: враг умер в этом тике → Dead, труп убирается через `corpse_lifetime`.
pub fn handle_enemy_deaths(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut enemies: Query<
        (Entity, &Character, &mut EnemyBehavior, Option<&mut MovementIntent>),
        Without<DespawnAfter>,
    >,
    mut state_changes: EventWriter<EnemyStateChanged>,
) {
    let now = time.elapsed_secs();

    let mut dead: Vec<_> = enemies
        .iter_mut()
        .filter(|(_, character, ..)| !character.is_alive())
        .collect();
    dead.sort_by_key(|(entity, ..)| *entity);

    for (entity, character, mut behavior, intent) in dead {
        notify(&mut state_changes, entity, behavior.force_dead());

        if let Some(mut intent) = intent {
            intent.stop();
        }

        let corpse_lifetime = behavior.config().corpse_lifetime;
        commands.entity(entity).insert(DespawnAfter {
            despawn_time: now + corpse_lifetime,
        });
        logger::log(&format!(
            "💀 {} ({:?}) died, corpse removed in {:.1}s",
            character.name(),
            entity,
            corpse_lifetime
        ));
    }
}
