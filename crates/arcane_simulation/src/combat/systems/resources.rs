//! Регенерация stamina/mana.

use bevy::prelude::*;

use crate::components::Character;

/// System: тикает пулы всех персонажей (первое, что происходит в тике).
pub fn regenerate_resources(mut characters: Query<&mut Character>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut character in characters.iter_mut() {
        if character.is_alive() {
            character.tick(delta);
        }
    }
}
