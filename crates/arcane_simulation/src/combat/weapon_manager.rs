//! WeaponManager — ростер оружия персонажа
//!
//! Держит упорядоченный список `Weapon` и индекс активного.
//! Только активное оружие получает запросы атак; остальные лежат
//! в ростере "выключенными" (`equipped = false`).

use bevy::prelude::*;

use crate::combat::weapon::{AttackResolution, Weapon};
use crate::components::Character;
use crate::config::WeaponConfig;
use crate::logger;

/// Notification hooks оружия (anim / audio / UI).
#[derive(Debug, Clone, PartialEq)]
pub enum WeaponEvent {
    Equipped { weapon: String },
    Unequipped { weapon: String },
    AttackPerformed { weapon: String },
    AimChanged { weapon: String, aiming: bool },
}

#[derive(Component, Debug, Default)]
pub struct WeaponManager {
    roster: Vec<Weapon>,
    active: Option<usize>,
    events: Vec<WeaponEvent>,
}

impl WeaponManager {
    /// Ростер без активного оружия.
    pub fn new(roster: Vec<Weapon>) -> Self {
        Self {
            roster,
            active: None,
            events: Vec::new(),
        }
    }

    /// Ростер с экипированным стартовым оружием.
    pub fn with_starting(roster: Vec<Weapon>, starting_index: usize) -> Self {
        let mut manager = Self::new(roster);
        if !manager.roster.is_empty() {
            manager.equip_by_index(starting_index);
        }
        manager
    }

    pub fn from_configs(configs: &[WeaponConfig], starting_index: usize) -> Self {
        Self::with_starting(configs.iter().map(Weapon::from_config).collect(), starting_index)
    }

    pub fn roster(&self) -> &[Weapon] {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_weapon(&self) -> Option<&Weapon> {
        self.active.and_then(|index| self.roster.get(index))
    }

    pub fn active_weapon_mut(&mut self) -> Option<&mut Weapon> {
        self.active.and_then(|index| self.roster.get_mut(index))
    }

    pub fn pending_events(&self) -> &[WeaponEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<WeaponEvent> {
        std::mem::take(&mut self.events)
    }

    /// Следующее оружие по кругу (с "ничего" → первое).
    pub fn switch_to_next(&mut self) -> bool {
        if self.roster.is_empty() {
            return false;
        }
        let next = self.active.map_or(0, |index| (index + 1) % self.roster.len());
        self.equip_by_index(next)
    }

    pub fn equip_by_index(&mut self, index: usize) -> bool {
        if index >= self.roster.len() {
            logger::log_warning(&format!(
                "WeaponManager: invalid weapon index {} (roster size {})",
                index,
                self.roster.len()
            ));
            return false;
        }

        if let Some(old) = self.active.and_then(|i| self.roster.get_mut(i)) {
            let aim_change = old.on_unequipped();
            let name = old.name.clone();
            if let Some(aiming) = aim_change {
                self.events.push(WeaponEvent::AimChanged { weapon: name.clone(), aiming });
            }
            self.events.push(WeaponEvent::Unequipped { weapon: name });
        }

        let weapon = &mut self.roster[index];
        weapon.on_equipped();
        self.events.push(WeaponEvent::Equipped { weapon: weapon.name.clone() });
        self.active = Some(index);

        logger::log(&format!("🗡️ Equipped weapon: {}", weapon.name));
        true
    }

    pub fn equip_by_name(&mut self, name: &str) -> bool {
        match self.roster.iter().position(|weapon| weapon.name == name) {
            Some(index) => self.equip_by_index(index),
            None => {
                logger::log_warning(&format!("WeaponManager: weapon '{}' not found", name));
                false
            }
        }
    }

    /// Основная атака активным оружием. No-op без активного оружия.
    pub fn request_primary(
        &mut self,
        now: f32,
        owner: Option<&mut Character>,
        pose: &Transform,
    ) -> Option<AttackResolution> {
        let weapon = self.active.and_then(|index| self.roster.get_mut(index))?;
        let resolution = weapon.try_primary_attack(now, owner, pose)?;
        self.events.push(WeaponEvent::AttackPerformed { weapon: weapon.name.clone() });
        Some(resolution)
    }

    /// Вторичное действие активного оружия (прицеливание).
    pub fn request_secondary(&mut self) -> Option<bool> {
        let weapon = self.active.and_then(|index| self.roster.get_mut(index))?;
        let aiming = weapon.try_secondary_attack()?;
        self.events.push(WeaponEvent::AimChanged {
            weapon: weapon.name.clone(),
            aiming,
        });
        Some(aiming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Weapon> {
        vec![
            Weapon::from_config(&WeaponConfig::sword()),
            Weapon::from_config(&WeaponConfig::staff()),
        ]
    }

    #[test]
    fn test_new_manager_has_no_active_weapon() {
        let mut manager = WeaponManager::new(roster());
        assert_eq!(manager.active_index(), None);
        assert!(manager.request_primary(0.0, None, &Transform::IDENTITY).is_none());
        assert!(manager.request_secondary().is_none());
        assert!(manager.roster().iter().all(|weapon| !weapon.is_equipped()));
    }

    #[test]
    fn test_starting_weapon_is_equipped() {
        let manager = WeaponManager::with_starting(roster(), 1);
        assert_eq!(manager.active_weapon().unwrap().name, "Staff");
        assert!(manager.active_weapon().unwrap().is_equipped());
        assert!(!manager.roster()[0].is_equipped());
    }

    #[test]
    fn test_switch_to_next_cycles_and_notifies() {
        let mut manager = WeaponManager::with_starting(roster(), 0);
        manager.drain_events();

        assert!(manager.switch_to_next());
        assert_eq!(manager.active_index(), Some(1));
        assert_eq!(
            manager.drain_events(),
            vec![
                WeaponEvent::Unequipped { weapon: "Sword".into() },
                WeaponEvent::Equipped { weapon: "Staff".into() },
            ]
        );

        assert!(manager.switch_to_next());
        assert_eq!(manager.active_index(), Some(0));
        assert!(manager.roster()[0].is_equipped());
        assert!(!manager.roster()[1].is_equipped());
    }

    #[test]
    fn test_switch_on_empty_roster_fails() {
        let mut manager = WeaponManager::new(Vec::new());
        assert!(!manager.switch_to_next());
    }

    #[test]
    fn test_invalid_index_and_name_keep_active() {
        let mut manager = WeaponManager::with_starting(roster(), 0);
        manager.drain_events();

        assert!(!manager.equip_by_index(5));
        assert!(!manager.equip_by_name("Halberd"));
        assert_eq!(manager.active_index(), Some(0));
        assert!(manager.drain_events().is_empty());

        assert!(manager.equip_by_name("Staff"));
        assert_eq!(manager.active_index(), Some(1));
    }

    #[test]
    fn test_switching_away_from_aiming_staff_exits_aim() {
        let mut manager = WeaponManager::with_starting(roster(), 1);
        assert_eq!(manager.request_secondary(), Some(true));
        manager.drain_events();

        manager.switch_to_next();
        let events = manager.drain_events();
        assert_eq!(
            events[0],
            WeaponEvent::AimChanged { weapon: "Staff".into(), aiming: false }
        );
        assert!(!manager.roster()[1].is_aiming());
    }

    #[test]
    fn test_only_active_weapon_attacks() {
        let mut manager = WeaponManager::with_starting(roster(), 0);
        manager.drain_events();

        let resolution = manager.request_primary(0.0, None, &Transform::IDENTITY);
        assert!(matches!(resolution, Some(AttackResolution::Melee(_))));
        assert_eq!(
            manager.drain_events(),
            vec![WeaponEvent::AttackPerformed { weapon: "Sword".into() }]
        );
        assert_eq!(manager.roster()[1].last_used_at(), None);
    }
}
