//! Melee resolution: sphere overlap → конус → урон каждой цели.

use bevy::prelude::*;

use crate::combat::events::{DamageDealt, DamageSource, MeleeSwing};
use crate::components::Character;
use crate::spatial::{SpatialIndex, SpatialQuery};

/// System: применить урон от взмахов этого тика.
///
/// Все цели в конусе получают урон (без single-target exclusivity).
pub fn resolve_melee_swings(
    mut swings: EventReader<MeleeSwing>,
    index: Res<SpatialIndex>,
    mut characters: Query<&mut Character>,
    mut damage_events: EventWriter<DamageDealt>,
) {
    for swing in swings.read() {
        let strike = &swing.strike;
        let hits = index.entities_within_sphere(strike.origin.position, strike.range, strike.target_layers);

        for target in strike.select_targets(&hits, Some(swing.attacker)) {
            let Ok(mut character) = characters.get_mut(target) else {
                continue;
            };
            if !character.is_alive() {
                continue;
            }

            let outcome = character.take_damage(strike.damage);
            damage_events.write(DamageDealt {
                attacker: Some(swing.attacker),
                target,
                damage: outcome.applied,
                source: DamageSource::Melee,
                target_died: outcome.killed,
            });
            crate::logger::log(&format!(
                "⚔️ {:?} hit {:?} for {:.1} (health {:.1})",
                swing.attacker,
                target,
                outcome.applied,
                character.health().current()
            ));
        }
    }
}
