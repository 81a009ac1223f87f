//! Weapon — cooldown + стоимость ресурсов + стратегия поиска целей
//!
//! # Architecture
//!
//! Закрытый набор вариантов вместо иерархии классов:
//! - `WeaponKind::Melee(MeleeProfile)` — конус перед точкой атаки
//! - `WeaponKind::Ranged(RangedProfile)` — спавн `Projectile`, режим прицеливания
//!
//! # Attack Flow
//!
//! ```text
//! try_primary_attack(now, owner, pose)
//!   ↓ cooldown elapsed? equipped? owner alive?
//!   ↓ Character::try_pay(stamina_cost, mana_cost)  (обе проверки до списания)
//!   ↓ last_used_at = now
//! AttackResolution::Melee(MeleeStrike) | AttackResolution::Ranged(ProjectileLaunch)
//!   ↓ (systems, тот же тик)
//! resolve_melee_swings / spawn projectile
//! ```

use bevy::prelude::*;

use crate::components::Character;
use crate::config::{WeaponConfig, WeaponKindConfig};
use crate::spatial::SpatialHit;

/// Поза точки атаки в мире (anchor меча, дуло посоха).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOrigin {
    pub position: Vec3,
    /// normalized
    pub forward: Vec3,
}

impl AttackOrigin {
    /// Offset задаётся в локальных координатах владельца (-Z = вперёд).
    pub fn from_transform(transform: &Transform, local_offset: Vec3) -> Self {
        Self {
            position: transform.translation + transform.rotation * local_offset,
            forward: (transform.rotation * Vec3::NEG_Z).normalize_or_zero(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeProfile {
    pub range: f32,
    /// full cone angle, degrees
    pub angle: f32,
    pub target_layers: u32,
    pub anchor_offset: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangedProfile {
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_radius: f32,
    pub destroy_on_impact: bool,
    pub impact_linger: f32,
    pub has_aim_mode: bool,
    pub target_layers: u32,
    pub muzzle_offset: Vec3,
    pub aiming: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponKind {
    Melee(MeleeProfile),
    Ranged(RangedProfile),
}

/// Мгновенный удар: кого бить решает `select_targets`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeStrike {
    pub damage: f32,
    pub origin: AttackOrigin,
    pub range: f32,
    pub half_angle: f32,
    pub target_layers: u32,
}

impl MeleeStrike {
    /// Фильтрует результаты sphere-запроса: конус, без владельца.
    ///
    /// Угол меряется в горизонтальной плоскости. Один корень иерархии
    /// получает урон один раз за удар, даже если у него несколько hurtbox'ов.
    pub fn select_targets(&self, hits: &[SpatialHit], owner: Option<Entity>) -> Vec<Entity> {
        let forward = flatten(self.origin.forward);
        let mut targets: Vec<Entity> = Vec::new();

        for hit in hits {
            if Some(hit.root) == owner || targets.contains(&hit.root) {
                continue;
            }
            let to_target = flatten(hit.position - self.origin.position);
            // цель ровно в точке атаки — считаем попаданием
            let in_cone = to_target == Vec3::ZERO
                || forward == Vec3::ZERO
                || forward.angle_between(to_target).to_degrees() <= self.half_angle;
            if in_cone {
                targets.push(hit.root);
            }
        }
        targets
    }
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Параметры снаряда для спавна.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileLaunch {
    pub damage: f32,
    pub origin: AttackOrigin,
    pub velocity: Vec3,
    pub lifetime: f32,
    pub radius: f32,
    pub destroy_on_impact: bool,
    pub impact_linger: f32,
    pub target_layers: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackResolution {
    Melee(MeleeStrike),
    Ranged(ProjectileLaunch),
}

/// Оружие в ростере `WeaponManager`.
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    pub name: String,
    pub damage: f32,
    /// seconds between successful attacks
    pub cooldown: f32,
    pub stamina_cost: f32,
    pub mana_cost: f32,
    pub kind: WeaponKind,
    last_used_at: Option<f32>,
    equipped: bool,
}

impl Weapon {
    pub fn new(name: impl Into<String>, damage: f32, cooldown: f32, kind: WeaponKind) -> Self {
        Self {
            name: name.into(),
            damage: damage.max(0.0),
            cooldown: cooldown.max(0.0),
            stamina_cost: 0.0,
            mana_cost: 0.0,
            kind,
            last_used_at: None,
            equipped: false,
        }
    }

    pub fn with_costs(mut self, stamina_cost: f32, mana_cost: f32) -> Self {
        self.stamina_cost = stamina_cost.max(0.0);
        self.mana_cost = mana_cost.max(0.0);
        self
    }

    pub fn from_config(config: &WeaponConfig) -> Self {
        let kind = match &config.kind {
            WeaponKindConfig::Melee {
                range,
                angle,
                target_layers,
                anchor_offset,
            } => WeaponKind::Melee(MeleeProfile {
                range: *range,
                angle: *angle,
                target_layers: *target_layers,
                anchor_offset: Vec3::from_array(*anchor_offset),
            }),
            WeaponKindConfig::Ranged {
                projectile_speed,
                projectile_lifetime,
                projectile_radius,
                destroy_on_impact,
                impact_linger,
                has_aim_mode,
                target_layers,
                muzzle_offset,
            } => WeaponKind::Ranged(RangedProfile {
                projectile_speed: *projectile_speed,
                projectile_lifetime: *projectile_lifetime,
                projectile_radius: *projectile_radius,
                destroy_on_impact: *destroy_on_impact,
                impact_linger: *impact_linger,
                has_aim_mode: *has_aim_mode,
                target_layers: *target_layers,
                muzzle_offset: Vec3::from_array(*muzzle_offset),
                aiming: false,
            }),
        };
        Weapon::new(config.name.clone(), config.damage, config.cooldown, kind)
            .with_costs(config.stamina_cost, config.mana_cost)
    }

    pub fn last_used_at(&self) -> Option<f32> {
        self.last_used_at
    }

    pub fn is_equipped(&self) -> bool {
        self.equipped
    }

    pub fn is_aiming(&self) -> bool {
        matches!(self.kind, WeaponKind::Ranged(RangedProfile { aiming: true, .. }))
    }

    pub fn can_attack(&self, now: f32) -> bool {
        match self.last_used_at {
            Some(last) => now - last >= self.cooldown,
            None => true,
        }
    }

    /// Секунды до готовности (0.0 = готово).
    pub fn cooldown_remaining(&self, now: f32) -> f32 {
        self.last_used_at
            .map_or(0.0, |last| (last + self.cooldown - now).max(0.0))
    }

    pub fn on_equipped(&mut self) {
        self.equipped = true;
    }

    /// Returns `Some(false)` when unequipping forced aim mode off.
    pub fn on_unequipped(&mut self) -> Option<bool> {
        self.equipped = false;
        match &mut self.kind {
            WeaponKind::Ranged(profile) if profile.aiming => {
                profile.aiming = false;
                Some(false)
            }
            _ => None,
        }
    }

    /// Основная атака.
    ///
    /// Гейты: экипировано, cooldown истёк, владелец жив и платит обе
    /// стоимости. Ресурсы списываются целиком или не списываются вовсе.
    pub fn try_primary_attack(
        &mut self,
        now: f32,
        owner: Option<&mut Character>,
        pose: &Transform,
    ) -> Option<AttackResolution> {
        if !self.equipped || !self.can_attack(now) {
            return None;
        }
        if let Some(owner) = owner {
            if !owner.try_pay(self.stamina_cost, self.mana_cost) {
                return None;
            }
        }

        self.last_used_at = Some(now);

        let resolution = match &self.kind {
            WeaponKind::Melee(profile) => AttackResolution::Melee(MeleeStrike {
                damage: self.damage,
                origin: AttackOrigin::from_transform(pose, profile.anchor_offset),
                range: profile.range,
                half_angle: profile.angle * 0.5,
                target_layers: profile.target_layers,
            }),
            WeaponKind::Ranged(profile) => {
                let origin = AttackOrigin::from_transform(pose, profile.muzzle_offset);
                AttackResolution::Ranged(ProjectileLaunch {
                    damage: self.damage,
                    origin,
                    velocity: origin.forward * profile.projectile_speed,
                    lifetime: profile.projectile_lifetime,
                    radius: profile.projectile_radius,
                    destroy_on_impact: profile.destroy_on_impact,
                    impact_linger: profile.impact_linger,
                    target_layers: profile.target_layers,
                })
            }
        };
        Some(resolution)
    }

    /// Вторичное действие: переключение прицеливания (без cooldown).
    ///
    /// Returns the new aim state, `None` if the weapon has no secondary.
    pub fn try_secondary_attack(&mut self) -> Option<bool> {
        if !self.equipped {
            return None;
        }
        match &mut self.kind {
            WeaponKind::Ranged(profile) if profile.has_aim_mode => {
                profile.aiming = !profile.aiming;
                Some(profile.aiming)
            }
            _ => None,
        }
    }
}
