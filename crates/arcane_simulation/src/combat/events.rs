//! Combat events
//!
//! Входящие (input / AI → core): `PrimaryAttackIntent`, `SecondaryAttackIntent`,
//! `SwitchWeaponIntent`.
//!
//! Исходящие (core → anim / audio / UI): `CharacterNotification`,
//! `WeaponNotification`, `DamageDealt`, `ProjectileLaunched`, `ProjectileImpact`.

use bevy::prelude::*;

use crate::combat::weapon::MeleeStrike;
use crate::combat::weapon_manager::WeaponEvent;
use crate::components::CharacterEvent;

/// Event: основная атака активным оружием.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryAttackIntent {
    pub entity: Entity,
}

/// Event: вторичное действие (прицеливание).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryAttackIntent {
    pub entity: Entity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeaponSelection {
    Next,
    Index(usize),
    Name(String),
}

/// Event: смена активного оружия.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SwitchWeaponIntent {
    pub entity: Entity,
    pub selection: WeaponSelection,
}

/// Event: успешный взмах, цели ищутся в том же тике.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MeleeSwing {
    pub attacker: Entity,
    pub strike: MeleeStrike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Melee,
    Projectile,
}

/// Event: урон нанесён.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    /// Реально списанный health
    pub damage: f32,
    pub source: DamageSource,
    pub target_died: bool,
}

/// Event: снаряд заспавнен.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectileLaunched {
    pub shooter: Entity,
    pub projectile: Entity,
}

/// Event: снаряд во что-то попал (персонаж или стена).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileImpact {
    pub projectile: Entity,
    pub shooter: Option<Entity>,
    pub target: Entity,
    pub position: Vec3,
}

/// Event: notification персонажа (выгружается из outbox раз в тик).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CharacterNotification {
    pub entity: Entity,
    pub event: CharacterEvent,
}

/// Event: notification оружия.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct WeaponNotification {
    pub entity: Entity,
    pub event: WeaponEvent,
}
