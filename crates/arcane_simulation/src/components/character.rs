//! Character — персонаж (игрок, враг, NPC)
//!
//! Агрегирует пулы ресурсов (health всегда; stamina/mana опционально)
//! и слоты экипировки. Все мутации идут через методы, каждое изменение
//! кладёт `CharacterEvent` в outbox; `flush_notifications` раз в тик
//! выгружает outbox в Bevy `Events<CharacterNotification>`.
//!
//! Смерть терминальна: после неё consume/damage/heal/equip — no-op.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::equipment::{EquipError, Loadout, SlotKind, SwapError};
use crate::components::resource_pool::ResourcePool;
use crate::config::{CharacterConfig, LoadoutConfig};
use crate::item_system::{InstanceIdAllocator, ItemHandle, ItemId, ItemInstance};
use crate::logger;

/// Health ≤ 30% — "критически ранен".
pub const CRITICAL_HEALTH_PERCENT: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    Health,
    Stamina,
    Mana,
}

/// Notification hooks персонажа (anim / audio / UI подписываются снаружи).
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterEvent {
    DamageTaken { amount: f32, remaining: f32 },
    Healed { amount: f32 },
    ResourceConsumed { pool: PoolKind, amount: f32 },
    ResourceRestored { pool: PoolKind, amount: f32 },
    ResourceRegenerated { pool: PoolKind, amount: f32 },
    Died,
    ItemEquipped { slot: SlotKind, item: ItemHandle },
    ItemUnequipped { slot: SlotKind, item: ItemHandle },
    HandsSwapped,
}

/// Итог `take_damage`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    /// Сколько health реально списано
    pub applied: f32,
    /// Этот вызов убил персонажа
    pub killed: bool,
}

#[derive(Component, Debug)]
pub struct Character {
    name: String,
    health: ResourcePool,
    stamina: Option<ResourcePool>,
    mana: Option<ResourcePool>,
    loadout: Loadout,
    alive: bool,
    item_ids: InstanceIdAllocator,
    events: Vec<CharacterEvent>,
}

impl Character {
    pub fn new(name: impl Into<String>, health: ResourcePool, loadout: Loadout) -> Self {
        Self {
            name: name.into(),
            health,
            stamina: None,
            mana: None,
            loadout,
            alive: health.current() > 0.0,
            item_ids: InstanceIdAllocator::default(),
            events: Vec::new(),
        }
    }

    pub fn with_stamina(mut self, stamina: ResourcePool) -> Self {
        self.stamina = Some(stamina);
        self
    }

    pub fn with_mana(mut self, mana: ResourcePool) -> Self {
        self.mana = Some(mana);
        self
    }

    /// Собирает персонажа из конфига и экипирует предметы по умолчанию.
    pub fn from_config(config: &CharacterConfig) -> Self {
        let (loadout, defaults) = match &config.loadout {
            LoadoutConfig::Hands {
                right_anchor,
                left_anchor,
                right_item,
                left_item,
            } => (
                Loadout::hands(right_anchor.clone(), left_anchor.clone()),
                vec![
                    (SlotKind::RightHand, right_item.clone()),
                    (SlotKind::LeftHand, left_item.clone()),
                ],
            ),
            LoadoutConfig::WeaponSlot { anchor, item } => (
                Loadout::single(anchor.clone()),
                vec![(SlotKind::Weapon, item.clone())],
            ),
        };

        let mut character = Character::new(
            config.name.clone(),
            ResourcePool::from_config(&config.health),
            loadout,
        );
        character.stamina = config.stamina.as_ref().map(ResourcePool::from_config);
        character.mana = config.mana.as_ref().map(ResourcePool::from_config);

        for (slot, item) in defaults {
            if let Some(item_id) = item {
                let instance = character.spawn_item(item_id);
                character.equip(slot, Some(instance));
            }
        }
        character
    }

    /// Новый экземпляр предмета с id из счётчика персонажа.
    pub fn spawn_item(&mut self, item_id: impl Into<ItemId>) -> ItemInstance {
        self.item_ids.spawn(item_id)
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn health(&self) -> &ResourcePool {
        &self.health
    }

    pub fn stamina(&self) -> Option<&ResourcePool> {
        self.stamina.as_ref()
    }

    pub fn mana(&self) -> Option<&ResourcePool> {
        self.mana.as_ref()
    }

    pub fn pool(&self, kind: PoolKind) -> Option<&ResourcePool> {
        match kind {
            PoolKind::Health => Some(&self.health),
            PoolKind::Stamina => self.stamina.as_ref(),
            PoolKind::Mana => self.mana.as_ref(),
        }
    }

    pub fn health_percent(&self) -> f32 {
        self.health.percent()
    }

    pub fn stamina_percent(&self) -> f32 {
        self.stamina.map_or(0.0, |pool| pool.percent())
    }

    pub fn mana_percent(&self) -> f32 {
        self.mana.map_or(0.0, |pool| pool.percent())
    }

    pub fn is_critically_wounded(&self) -> bool {
        self.health_percent() <= CRITICAL_HEALTH_PERCENT
    }

    pub fn should_retreat(&self, threshold: f32) -> bool {
        self.health_percent() <= threshold
    }

    /// Pure predicate. Отсутствующий пул "хватает" только на нулевую стоимость.
    pub fn has_enough(&self, kind: PoolKind, amount: f32) -> bool {
        match self.pool(kind) {
            Some(pool) => pool.has_enough(amount),
            None => amount <= 0.0,
        }
    }

    pub fn has_enough_stamina(&self, amount: f32) -> bool {
        self.has_enough(PoolKind::Stamina, amount)
    }

    pub fn has_enough_mana(&self, amount: f32) -> bool {
        self.has_enough(PoolKind::Mana, amount)
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn item_in(&self, slot: SlotKind) -> Option<&ItemInstance> {
        self.loadout.slot(slot).and_then(|slot| slot.occupant())
    }

    pub fn has_any_item_equipped(&self) -> bool {
        self.loadout.has_any_item_equipped()
    }

    pub fn pending_events(&self) -> &[CharacterEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<CharacterEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.accepts_amount("take damage", amount) || !self.alive {
            return DamageOutcome::default();
        }

        let was_alive = self.health.current() > 0.0;
        let applied = self.health.consume(amount);
        self.events.push(CharacterEvent::DamageTaken {
            amount,
            remaining: self.health.current(),
        });

        let killed = was_alive && self.health.is_empty();
        if killed {
            self.die();
        }
        DamageOutcome { applied, killed }
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.accepts_amount("heal", amount) || !self.alive {
            return 0.0;
        }

        let healed = self.health.restore(amount);
        if healed > 0.0 {
            self.events.push(CharacterEvent::Healed { amount: healed });
        }
        healed
    }

    fn die(&mut self) {
        self.alive = false;
        logger::log_info(&format!("💀 {} died", self.name));
        self.clear_loadout();
        self.events.push(CharacterEvent::Died);
    }

    // ------------------------------------------------------------------
    // Stamina / Mana
    // ------------------------------------------------------------------

    pub fn try_consume_stamina(&mut self, amount: f32) -> bool {
        self.try_consume(PoolKind::Stamina, amount)
    }

    pub fn try_consume_mana(&mut self, amount: f32) -> bool {
        self.try_consume(PoolKind::Mana, amount)
    }

    pub fn consume_stamina(&mut self, amount: f32) -> f32 {
        self.consume(PoolKind::Stamina, amount)
    }

    pub fn consume_mana(&mut self, amount: f32) -> f32 {
        self.consume(PoolKind::Mana, amount)
    }

    pub fn restore_stamina(&mut self, amount: f32) -> f32 {
        self.restore(PoolKind::Stamina, amount)
    }

    pub fn restore_mana(&mut self, amount: f32) -> f32 {
        self.restore(PoolKind::Mana, amount)
    }

    /// Оплата атаки: обе стоимости проверяются до списания любой из них.
    pub fn try_pay(&mut self, stamina_cost: f32, mana_cost: f32) -> bool {
        if !self.accepts_amount("pay stamina", stamina_cost)
            || !self.accepts_amount("pay mana", mana_cost)
            || !self.alive
        {
            return false;
        }
        if !self.has_enough_stamina(stamina_cost) || !self.has_enough_mana(mana_cost) {
            return false;
        }

        if stamina_cost > 0.0 {
            self.consume(PoolKind::Stamina, stamina_cost);
        }
        if mana_cost > 0.0 {
            self.consume(PoolKind::Mana, mana_cost);
        }
        true
    }

    fn try_consume(&mut self, kind: PoolKind, amount: f32) -> bool {
        if !self.accepts_amount("consume", amount) || !self.alive {
            return false;
        }
        let Some(pool) = self.regen_pool_mut(kind) else {
            return amount == 0.0;
        };
        if !pool.try_consume(amount) {
            return false;
        }
        if amount > 0.0 {
            self.events.push(CharacterEvent::ResourceConsumed { pool: kind, amount });
        }
        true
    }

    fn consume(&mut self, kind: PoolKind, amount: f32) -> f32 {
        if !self.accepts_amount("consume", amount) || !self.alive {
            return 0.0;
        }
        let Some(pool) = self.regen_pool_mut(kind) else {
            return 0.0;
        };
        let consumed = pool.consume(amount);
        if consumed > 0.0 {
            self.events.push(CharacterEvent::ResourceConsumed { pool: kind, amount: consumed });
        }
        consumed
    }

    fn restore(&mut self, kind: PoolKind, amount: f32) -> f32 {
        if !self.accepts_amount("restore", amount) || !self.alive {
            return 0.0;
        }
        let Some(pool) = self.regen_pool_mut(kind) else {
            return 0.0;
        };
        let restored = pool.restore(amount);
        if restored > 0.0 {
            self.events.push(CharacterEvent::ResourceRestored { pool: kind, amount: restored });
        }
        restored
    }

    fn regen_pool_mut(&mut self, kind: PoolKind) -> Option<&mut ResourcePool> {
        match kind {
            PoolKind::Health => None,
            PoolKind::Stamina => self.stamina.as_mut(),
            PoolKind::Mana => self.mana.as_mut(),
        }
    }

    /// Регенерация stamina/mana за тик (мёртвые не регенерируют).
    pub fn tick(&mut self, delta_time: f32) {
        if !self.alive {
            return;
        }
        for kind in [PoolKind::Stamina, PoolKind::Mana] {
            let Some(pool) = self.regen_pool_mut(kind) else {
                continue;
            };
            let regenerated = pool.tick(delta_time);
            if regenerated > 0.0 {
                self.events.push(CharacterEvent::ResourceRegenerated {
                    pool: kind,
                    amount: regenerated,
                });
            }
        }
    }

    // ------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------

    pub fn equip(&mut self, slot: SlotKind, item: Option<ItemInstance>) -> bool {
        self.try_equip(slot, item).is_ok()
    }

    pub fn equip_right_hand(&mut self, item: Option<ItemInstance>) -> bool {
        self.equip(SlotKind::RightHand, item)
    }

    pub fn equip_left_hand(&mut self, item: Option<ItemInstance>) -> bool {
        self.equip(SlotKind::LeftHand, item)
    }

    pub fn equip_weapon(&mut self, item: Option<ItemInstance>) -> bool {
        self.equip(SlotKind::Weapon, item)
    }

    /// Как `equip`, но с причиной отказа.
    pub fn try_equip(&mut self, slot: SlotKind, item: Option<ItemInstance>) -> Result<(), EquipError> {
        if !self.alive {
            logger::log(&format!("{}: equip ignored, character is dead", self.name));
            return Err(EquipError::Unavailable);
        }
        let Some(target) = self.loadout.slot_mut(slot) else {
            logger::log_warning(&format!("{}: no {} slot", self.name, slot));
            return Err(EquipError::Unavailable);
        };

        let equipped = item.as_ref().map(ItemInstance::handle);
        let replaced = target.equip(item)?;

        if let Some(old) = replaced {
            self.events.push(CharacterEvent::ItemUnequipped { slot, item: old });
        }
        if let Some(item) = equipped {
            self.events.push(CharacterEvent::ItemEquipped { slot, item });
        }
        Ok(())
    }

    /// Уничтожает предмет в слоте. false если слот пуст / нет слота / мёртв.
    pub fn unequip(&mut self, slot: SlotKind) -> bool {
        if !self.alive {
            return false;
        }
        let Some(removed) = self.loadout.slot_mut(slot).and_then(|slot| slot.unequip()) else {
            return false;
        };
        self.events.push(CharacterEvent::ItemUnequipped { slot, item: removed });
        true
    }

    pub fn unequip_right_hand(&mut self) -> bool {
        self.unequip(SlotKind::RightHand)
    }

    pub fn unequip_left_hand(&mut self) -> bool {
        self.unequip(SlotKind::LeftHand)
    }

    pub fn unequip_weapon(&mut self) -> bool {
        self.unequip(SlotKind::Weapon)
    }

    pub fn unequip_all(&mut self) {
        if self.alive {
            self.clear_loadout();
        }
    }

    fn clear_loadout(&mut self) {
        for slot in self.loadout.slots_mut() {
            let kind = slot.kind();
            if let Some(removed) = slot.unequip() {
                self.events.push(CharacterEvent::ItemUnequipped { slot: kind, item: removed });
            }
        }
    }

    pub fn swap_hands(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        match self.loadout.swap_hands() {
            Ok(()) => {
                self.events.push(CharacterEvent::HandsSwapped);
                true
            }
            Err(SwapError::NotTwoHanded) => {
                logger::log_warning(&format!("{}: swap_hands on a single-slot character", self.name));
                false
            }
            Err(SwapError::SlotUninitialized(slot)) => {
                logger::log_error(&format!("{}: cannot swap, {} anchor is not set", self.name, slot));
                false
            }
        }
    }

    fn accepts_amount(&self, action: &str, amount: f32) -> bool {
        if amount >= 0.0 {
            return true;
        }
        logger::log_warning(&format!(
            "{}: cannot {} a negative amount ({})",
            self.name, action, amount
        ));
        false
    }
}
