//! Отложенный despawn (трупы, застрявшие снаряды).

use bevy::prelude::*;

/// Компонент-маркер: деспавн entity после указанного времени
///
/// Используется для уборки мёртвых врагов и снарядов, оставшихся
/// на месте попадания.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах `Time<Fixed>` от старта)
    pub despawn_time: f32,
}

/// System: despawn entity, чьё время вышло.
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::logger::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
