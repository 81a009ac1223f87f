//! AI Events — уведомления о смене состояния врага
//!
//! Presentation слой (анимации, звук "aggro", UI) подписывается сюда,
//! AI сам эти события не читает.

use bevy::prelude::*;

use crate::ai::components::EnemyState;

/// Event: враг сменил состояние.
///
/// За тик может прийти несколько (например Combat → Retreat → Idle),
/// в порядке применения.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyStateChanged {
    pub entity: Entity,
    pub from: EnemyState,
    pub to: EnemyState,
}
