//! Порядок тика симуляции (FixedUpdate)
//!
//! ```text
//! Prepare  → spatial snapshot, регенерация stamina/mana
//! Decide   → AI выбирает состояние, движение, атаку
//! Resolve  → смена оружия, атаки, melee, снаряды, урон
//! Cleanup  → смерть, despawn, отложенные cue, выгрузка notifications
//! ```
//!
//! Все наборы выполняются строго последовательно: "проверить cooldown и
//! ресурсы → списать → нанести урон" не перемежается с другими атаками.

use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    Prepare,
    Decide,
    Resolve,
    Cleanup,
}

/// Каждый plugin вызывает это сам: плагины можно добавлять по отдельности.
pub fn configure_tick_sets(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            TickSet::Prepare,
            TickSet::Decide,
            TickSet::Resolve,
            TickSet::Cleanup,
        )
            .chain(),
    );
}
