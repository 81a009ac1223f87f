//! Player marker component
//!
//! Отмечает entity, которым управляет игрок (в отличие от AI).

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// - Враги ищут цель только среди entity с `Player` (через `PlayerLocator`)
/// - Input systems шлют `PrimaryAttackIntent` / `SwitchWeaponIntent` для `With<Player>`
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;
