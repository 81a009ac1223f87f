//! Tests for Weapon attack gating and target selection.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combat::weapon::*;
    use crate::components::{Character, Loadout, ResourcePool};
    use crate::config::WeaponConfig;
    use crate::spatial::{SpatialHit, COLLISION_LAYER_ACTORS};

    fn owner() -> Character {
        Character::new("Owner", ResourcePool::new(100.0), Loadout::single(Some("W".into())))
            .with_stamina(ResourcePool::with_regen(100.0, 20.0, 1.0))
            .with_mana(ResourcePool::with_regen(20.0, 10.0, 2.0))
    }

    fn equipped(config: WeaponConfig) -> Weapon {
        let mut weapon = Weapon::from_config(&config);
        weapon.on_equipped();
        weapon
    }

    fn hit(index: u32, position: Vec3) -> SpatialHit {
        let entity = Entity::from_raw(index);
        SpatialHit {
            entity,
            root: entity,
            position,
            layers: COLLISION_LAYER_ACTORS,
            distance: position.length(),
        }
    }

    #[test]
    fn test_cooldown_gates_attacks() {
        let mut sword = equipped(WeaponConfig::sword());
        let mut character = owner();
        let pose = Transform::IDENTITY;

        assert!(sword.try_primary_attack(0.0, Some(&mut character), &pose).is_some());
        assert_eq!(sword.last_used_at(), Some(0.0));
        assert!(sword.try_primary_attack(0.5, Some(&mut character), &pose).is_none());
        assert!((sword.cooldown_remaining(0.5) - 0.5).abs() < 1e-6);
        assert!(sword.try_primary_attack(1.0, Some(&mut character), &pose).is_some());

        // 2 успешные атаки × 5 stamina
        assert_eq!(character.stamina().unwrap().current(), 90.0);
    }

    #[test]
    fn test_failed_attack_does_not_restart_cooldown() {
        let mut sword = equipped(WeaponConfig::sword());
        let mut character = owner();
        character.consume_stamina(98.0);

        assert!(sword.try_primary_attack(0.0, Some(&mut character), &Transform::IDENTITY).is_none());
        assert_eq!(sword.last_used_at(), None);
    }

    #[test]
    fn test_insufficient_mana_leaves_stamina_untouched() {
        let mut config = WeaponConfig::staff();
        config.stamina_cost = 10.0;
        config.mana_cost = 50.0; // у владельца всего 20
        let mut staff = equipped(config);
        let mut character = owner();

        assert!(staff.try_primary_attack(0.0, Some(&mut character), &Transform::IDENTITY).is_none());
        assert_eq!(character.stamina().unwrap().current(), 100.0);
        assert_eq!(character.mana().unwrap().current(), 20.0);
    }

    #[test]
    fn test_unequipped_weapon_cannot_attack() {
        let mut sword = Weapon::from_config(&WeaponConfig::sword());
        assert!(!sword.is_equipped());
        assert!(sword.try_primary_attack(0.0, None, &Transform::IDENTITY).is_none());
    }

    #[test]
    fn test_dead_owner_cannot_attack() {
        let mut sword = equipped(WeaponConfig::sword());
        let mut character = owner();
        character.take_damage(100.0);
        assert!(sword.try_primary_attack(0.0, Some(&mut character), &Transform::IDENTITY).is_none());
    }

    #[test]
    fn test_ownerless_weapon_skips_costs() {
        let mut staff = equipped(WeaponConfig::staff());
        let resolution = staff.try_primary_attack(0.0, None, &Transform::IDENTITY);
        assert!(matches!(resolution, Some(AttackResolution::Ranged(_))));
    }

    #[test]
    fn test_ranged_launch_follows_owner_facing() {
        let mut staff = equipped(WeaponConfig::staff());
        let pose = Transform::from_xyz(1.0, 0.0, 1.0).looking_at(Vec3::new(11.0, 0.0, 1.0), Vec3::Y);

        let Some(AttackResolution::Ranged(launch)) = staff.try_primary_attack(0.0, None, &pose) else {
            panic!("expected a projectile launch");
        };
        assert!((launch.velocity - Vec3::new(20.0, 0.0, 0.0)).length() < 1e-3);
        assert!((launch.origin.position - Vec3::new(1.6, 0.0, 1.0)).length() < 1e-3);
        assert_eq!(launch.lifetime, 5.0);
        assert!(launch.destroy_on_impact);
    }

    #[test]
    fn test_aim_toggle_and_unequip_exits_aim() {
        let mut staff = equipped(WeaponConfig::staff());
        assert_eq!(staff.try_secondary_attack(), Some(true));
        assert!(staff.is_aiming());
        assert_eq!(staff.try_secondary_attack(), Some(false));
        assert_eq!(staff.try_secondary_attack(), Some(true));

        assert_eq!(staff.on_unequipped(), Some(false));
        assert!(!staff.is_aiming());
        assert_eq!(staff.try_secondary_attack(), None);
    }

    #[test]
    fn test_melee_has_no_secondary() {
        let mut sword = equipped(WeaponConfig::sword());
        assert_eq!(sword.try_secondary_attack(), None);
        assert_eq!(sword.on_unequipped(), None);
    }

    #[test]
    fn test_melee_cone_filters_targets() {
        let mut sword = equipped(WeaponConfig::sword());
        let Some(AttackResolution::Melee(strike)) =
            sword.try_primary_attack(0.0, None, &Transform::IDENTITY)
        else {
            panic!("expected a melee strike");
        };
        assert_eq!(strike.half_angle, 30.0);

        // forward = -Z, anchor at (0, 0, -0.5)
        let hits = [
            hit(1, Vec3::new(0.0, 0.0, -1.5)), // прямо впереди
            hit(2, Vec3::new(0.4, 0.0, -1.5)), // ~22° — внутри
            hit(3, Vec3::new(1.5, 0.0, -0.5)), // 90° — сбоку
            hit(4, Vec3::new(0.0, 0.0, 1.0)),  // сзади
        ];
        let targets = strike.select_targets(&hits, None);
        assert_eq!(targets, vec![Entity::from_raw(1), Entity::from_raw(2)]);
    }

    #[test]
    fn test_melee_skips_owner_hierarchy_and_duplicates() {
        let strike = MeleeStrike {
            damage: 10.0,
            origin: AttackOrigin {
                position: Vec3::ZERO,
                forward: Vec3::NEG_Z,
            },
            range: 2.0,
            half_angle: 30.0,
            target_layers: COLLISION_LAYER_ACTORS,
        };
        let owner = Entity::from_raw(10);
        let target = Entity::from_raw(20);
        let hits = [
            SpatialHit { root: owner, ..hit(11, Vec3::new(0.0, 0.0, -0.5)) },
            SpatialHit { root: target, ..hit(21, Vec3::new(0.0, 0.0, -1.0)) },
            SpatialHit { root: target, ..hit(22, Vec3::new(0.1, 0.0, -1.2)) },
        ];

        assert_eq!(strike.select_targets(&hits, Some(owner)), vec![target]);
    }
}
