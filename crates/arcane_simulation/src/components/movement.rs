//! Movement intent: куда персонаж хочет двигаться и куда смотреть
//!
//! Core (AI) решает *куда*. Внешний mover (движок, или
//! `HeadlessMovementPlugin` в headless режиме) реально двигает entity.

use bevy::prelude::*;

/// Намерение движения на текущий тик.
///
/// - `direction`: горизонтальное направление (normalized или ZERO)
/// - `speed`: m/s
/// - `look_at`: точка, к которой повернуться (None = не поворачивать)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementIntent {
    pub direction: Vec3,
    pub speed: f32,
    pub look_at: Option<Vec3>,
    /// radians per second
    pub rotation_speed: f32,
}

impl MovementIntent {
    pub fn stop(&mut self) {
        self.direction = Vec3::ZERO;
        self.look_at = None;
    }

    pub fn is_moving(&self) -> bool {
        self.direction.length_squared() > 0.0 && self.speed > 0.0
    }
}
