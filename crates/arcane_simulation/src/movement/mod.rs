//! Headless mover — применяет `MovementIntent` к `Transform`
//!
//! В движке позицию двигает физика / NavigationAgent. Без движка
//! (headless binary, тесты) это делает `HeadlessMovementPlugin`:
//! прямое интегрирование скорости + поворот к `look_at`.

use bevy::prelude::*;

use crate::components::{Character, MovementIntent};
use crate::schedule::{configure_tick_sets, TickSet};

/// Двигает entities после всех решений тика (после `TickSet::Cleanup`).
pub struct HeadlessMovementPlugin;

impl Plugin for HeadlessMovementPlugin {
    fn build(&self, app: &mut App) {
        configure_tick_sets(app);
        app.add_systems(
            FixedUpdate,
            apply_movement_intents.after(TickSet::Cleanup),
        );
    }
}

/// System: `direction * speed * dt` + поворот к `look_at`.
///
/// Мёртвые персонажи стоят на месте.
pub fn apply_movement_intents(
    time: Res<Time<Fixed>>,
    mut movers: Query<(&mut Transform, &MovementIntent, Option<&Character>)>,
) {
    let delta = time.delta_secs();

    for (mut transform, intent, character) in movers.iter_mut() {
        if character.is_some_and(|character| !character.is_alive()) {
            continue;
        }

        if intent.is_moving() {
            transform.translation += intent.direction * intent.speed * delta;
        }

        if let Some(look_at) = intent.look_at {
            rotate_towards(&mut transform, look_at, intent.rotation_speed * delta);
        }
    }
}

/// Поворот вокруг Y к точке, не быстрее `max_angle` радиан за вызов.
pub fn rotate_towards(transform: &mut Transform, point: Vec3, max_angle: f32) {
    let to_point = point - transform.translation;
    let Some(direction) = Vec3::new(to_point.x, 0.0, to_point.z).try_normalize() else {
        return;
    };

    let desired = Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation;
    let angle = transform.rotation.angle_between(desired);
    if angle <= max_angle || angle <= f32::EPSILON {
        transform.rotation = desired;
    } else {
        transform.rotation = transform.rotation.slerp(desired, max_angle / angle);
    }
}
