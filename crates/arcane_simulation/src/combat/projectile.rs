//! Projectile — снаряд дальнобойного оружия
//!
//! Независимая entity: летит по прямой, живёт `remaining_lifetime`,
//! наносит урон максимум один раз (`has_resolved`).

use bevy::prelude::*;

use crate::combat::weapon::ProjectileLaunch;
use crate::spatial::{layers_overlap, SpatialHit};

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    pub damage: f32,
    /// Стрелок (для исключения self-hit). Может быть уже despawned.
    pub owner: Option<Entity>,
    pub velocity: Vec3,
    pub radius: f32,
    pub target_layers: u32,
    pub destroy_on_impact: bool,
    /// seconds to keep the entity after impact when not destroyed on impact
    pub impact_linger: f32,
    remaining_lifetime: f32,
    has_resolved: bool,
}

impl Projectile {
    pub fn from_launch(launch: &ProjectileLaunch, owner: Option<Entity>) -> Self {
        Self {
            damage: launch.damage,
            owner,
            velocity: launch.velocity,
            radius: launch.radius,
            target_layers: launch.target_layers,
            destroy_on_impact: launch.destroy_on_impact,
            impact_linger: launch.impact_linger,
            remaining_lifetime: launch.lifetime,
            has_resolved: false,
        }
    }

    pub fn remaining_lifetime(&self) -> f32 {
        self.remaining_lifetime
    }

    pub fn has_resolved(&self) -> bool {
        self.has_resolved
    }

    /// Уменьшает lifetime. true = время вышло.
    pub fn tick_lifetime(&mut self, delta_time: f32) -> bool {
        self.remaining_lifetime -= delta_time.max(0.0);
        self.remaining_lifetime <= 0.0
    }

    /// Первое валидное попадание из отсортированных кандидатов.
    ///
    /// Валидное = слой совпадает и это не иерархия стрелка.
    /// После первого попадания всегда `None`; застрявший снаряд останавливается.
    pub fn try_resolve<'a>(&mut self, hits: &'a [SpatialHit]) -> Option<&'a SpatialHit> {
        if self.has_resolved {
            return None;
        }
        let hit = hits.iter().find(|hit| {
            Some(hit.root) != self.owner && layers_overlap(hit.layers, self.target_layers)
        })?;

        self.has_resolved = true;
        self.velocity = Vec3::ZERO;
        Some(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::weapon::AttackOrigin;
    use crate::spatial::{COLLISION_LAYER_ACTORS, COLLISION_LAYER_ENVIRONMENT};

    fn launch() -> ProjectileLaunch {
        ProjectileLaunch {
            damage: 15.0,
            origin: AttackOrigin {
                position: Vec3::ZERO,
                forward: Vec3::X,
            },
            velocity: Vec3::X * 20.0,
            lifetime: 5.0,
            radius: 0.3,
            destroy_on_impact: true,
            impact_linger: 0.0,
            target_layers: COLLISION_LAYER_ACTORS,
        }
    }

    fn hit(index: u32, root: u32, layers: u32) -> SpatialHit {
        SpatialHit {
            entity: Entity::from_raw(index),
            root: Entity::from_raw(root),
            position: Vec3::X,
            layers,
            distance: 1.0,
        }
    }

    #[test]
    fn test_resolves_at_most_once() {
        let mut projectile = Projectile::from_launch(&launch(), Some(Entity::from_raw(1)));
        let hits = [hit(2, 2, COLLISION_LAYER_ACTORS)];

        assert_eq!(projectile.try_resolve(&hits).map(|h| h.root), Some(Entity::from_raw(2)));
        assert!(projectile.has_resolved());
        assert_eq!(projectile.velocity, Vec3::ZERO);
        assert!(projectile.try_resolve(&hits).is_none());
    }

    #[test]
    fn test_skips_owner_hierarchy_and_foreign_layers() {
        let owner = Entity::from_raw(1);
        let mut projectile = Projectile::from_launch(&launch(), Some(owner));
        let hits = [
            hit(10, 1, COLLISION_LAYER_ACTORS),      // рука стрелка
            hit(11, 11, COLLISION_LAYER_ENVIRONMENT), // стена, но маска только Actors
        ];

        assert!(projectile.try_resolve(&hits).is_none());
        assert!(!projectile.has_resolved());
    }

    #[test]
    fn test_lifetime_expires() {
        let mut projectile = Projectile::from_launch(&launch(), None);
        assert!(!projectile.tick_lifetime(4.0));
        assert!(projectile.tick_lifetime(1.0));
    }
}
