//! Выгрузка outbox'ов компонентов в Bevy events.

use bevy::prelude::*;

use crate::combat::events::{CharacterNotification, WeaponNotification};
use crate::combat::weapon_manager::WeaponManager;
use crate::components::Character;

/// System: последний шаг тика.
pub fn flush_notifications(
    mut characters: Query<(Entity, &mut Character)>,
    mut managers: Query<(Entity, &mut WeaponManager)>,
    mut character_events: EventWriter<CharacterNotification>,
    mut weapon_events: EventWriter<WeaponNotification>,
) {
    for (entity, mut character) in characters.iter_mut() {
        if character.pending_events().is_empty() {
            continue;
        }
        for event in character.drain_events() {
            character_events.write(CharacterNotification { entity, event });
        }
    }

    for (entity, mut manager) in managers.iter_mut() {
        if manager.pending_events().is_empty() {
            continue;
        }
        for event in manager.drain_events() {
            weapon_events.write(WeaponNotification { entity, event });
        }
    }
}
