//! Projectile flight: движение, попадание, lifetime.

use bevy::prelude::*;

use crate::combat::effects::{EffectCue, EffectKind};
use crate::combat::events::{DamageDealt, DamageSource, ProjectileImpact};
use crate::combat::projectile::Projectile;
use crate::combat::systems::damage::DespawnAfter;
use crate::components::Character;
use crate::spatial::{layer_name, SpatialIndex, SpatialQuery};

/// System: сдвинуть снаряды и обработать первое попадание.
///
/// Коллизия проверяется по всему отрезку шага (сфера вокруг середины),
/// чтобы быстрый снаряд не проскакивал тонкие цели.
pub fn advance_projectiles(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    index: Res<SpatialIndex>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
    mut characters: Query<&mut Character>,
    mut damage_events: EventWriter<DamageDealt>,
    mut impacts: EventWriter<ProjectileImpact>,
    mut cues: EventWriter<EffectCue>,
) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs();

    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        // застрявший снаряд ждёт DespawnAfter
        if projectile.has_resolved() {
            continue;
        }

        let start = transform.translation;
        let step = projectile.velocity * delta;
        transform.translation = start + step;

        let hits = index.entities_within_sphere(
            start + step * 0.5,
            projectile.radius + step.length() * 0.5,
            projectile.target_layers,
        );

        if let Some(hit) = projectile.try_resolve(&hits).copied() {
            impacts.write(ProjectileImpact {
                projectile: entity,
                shooter: projectile.owner,
                target: hit.root,
                position: transform.translation,
            });
            cues.write(EffectCue {
                entity,
                kind: EffectKind::Impact,
                position: transform.translation,
            });

            if let Ok(mut character) = characters.get_mut(hit.root) {
                let outcome = character.take_damage(projectile.damage);
                damage_events.write(DamageDealt {
                    attacker: projectile.owner,
                    target: hit.root,
                    damage: outcome.applied,
                    source: DamageSource::Projectile,
                    target_died: outcome.killed,
                });
            } else {
                crate::logger::log(&format!(
                    "💥 Projectile {:?} hit {} {:?}",
                    entity,
                    layer_name(hit.layers),
                    hit.entity
                ));
            }

            if projectile.destroy_on_impact {
                commands.entity(entity).despawn();
            } else {
                commands.entity(entity).insert(DespawnAfter {
                    despawn_time: now + projectile.impact_linger,
                });
            }
            continue;
        }

        if projectile.tick_lifetime(delta) {
            commands.entity(entity).despawn();
        }
    }
}
