//! Equipment slots: владение экипированными предметами
//!
//! # Architecture
//! - `EquipmentSlot` владеет максимум одним `ItemInstance`
//! - Equip = unequip (уничтожение старого) + attach нового к anchor'у
//! - `remove_without_destroy` / `set_item` — пара для swap'а рук
//! - `Loadout` — набор слотов персонажа: руки (right + left) или один weapon-слот

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::item_system::{ItemHandle, ItemInstance};
use crate::logger;

/// Какой слот персонажа адресуется.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    RightHand,
    LeftHand,
    Weapon,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotKind::RightHand => "Right Hand",
            SlotKind::LeftHand => "Left Hand",
            SlotKind::Weapon => "Weapon",
        };
        f.write_str(name)
    }
}

/// Слот экипировки с точкой крепления.
#[derive(Debug, PartialEq)]
pub struct EquipmentSlot {
    kind: SlotKind,
    /// None = слот не инициализирован (anchor не назначен)
    anchor: Option<String>,
    occupant: Option<ItemInstance>,
}

impl EquipmentSlot {
    pub fn new(kind: SlotKind, anchor: Option<String>) -> Self {
        Self {
            kind,
            anchor,
            occupant: None,
        }
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn occupant(&self) -> Option<&ItemInstance> {
        self.occupant.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Экипирует предмет, уничтожая текущий.
    ///
    /// Fails on a missing item or an unset anchor (slot left untouched).
    /// On success returns the handle of the destroyed previous occupant, if any.
    pub fn equip(&mut self, item: Option<ItemInstance>) -> Result<Option<ItemHandle>, EquipError> {
        let Some(mut item) = item else {
            logger::log_warning(&format!("[{}] Cannot equip: item is missing", self.kind));
            return Err(EquipError::MissingItem);
        };
        let Some(anchor) = self.anchor.as_deref() else {
            logger::log_error(&format!("[{}] Cannot equip: slot anchor is not set", self.kind));
            return Err(EquipError::SlotUninitialized(self.kind));
        };

        item.attach_to(anchor);
        let replaced = self.unequip();
        self.occupant = Some(item);
        Ok(replaced)
    }

    /// Уничтожает occupant (drop) и очищает слот. No-op если пусто.
    pub fn unequip(&mut self) -> Option<ItemHandle> {
        self.occupant.take().map(|item| item.handle())
    }

    /// Detaches the occupant and hands it back alive.
    pub fn remove_without_destroy(&mut self) -> Option<ItemInstance> {
        let mut item = self.occupant.take()?;
        item.detach();
        Some(item)
    }

    /// Force-attaches an existing instance (no instantiation).
    ///
    /// On an unset anchor the item is handed back untouched.
    pub fn set_item(&mut self, item: Option<ItemInstance>) -> Result<(), Option<ItemInstance>> {
        let Some(mut item) = item else {
            self.occupant = None;
            return Ok(());
        };
        let Some(anchor) = self.anchor.as_deref() else {
            return Err(Some(item));
        };
        item.attach_to(anchor);
        self.occupant = Some(item);
        Ok(())
    }

    /// Слот может принять предмет (anchor назначен).
    pub fn can_hold(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Почему equip не состоялся.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipError {
    MissingItem,
    SlotUninitialized(SlotKind),
    /// Персонаж мёртв или у него нет такого слота
    Unavailable,
}

/// Почему swap рук не состоялся.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    NotTwoHanded,
    SlotUninitialized(SlotKind),
}

/// Набор слотов персонажа.
#[derive(Debug, PartialEq)]
pub enum Loadout {
    Hands {
        right: EquipmentSlot,
        left: EquipmentSlot,
    },
    Single {
        weapon: EquipmentSlot,
    },
}

impl Loadout {
    pub fn hands(right_anchor: Option<String>, left_anchor: Option<String>) -> Self {
        Loadout::Hands {
            right: EquipmentSlot::new(SlotKind::RightHand, right_anchor),
            left: EquipmentSlot::new(SlotKind::LeftHand, left_anchor),
        }
    }

    pub fn single(anchor: Option<String>) -> Self {
        Loadout::Single {
            weapon: EquipmentSlot::new(SlotKind::Weapon, anchor),
        }
    }

    pub fn slot(&self, kind: SlotKind) -> Option<&EquipmentSlot> {
        match (self, kind) {
            (Loadout::Hands { right, .. }, SlotKind::RightHand) => Some(right),
            (Loadout::Hands { left, .. }, SlotKind::LeftHand) => Some(left),
            (Loadout::Single { weapon }, SlotKind::Weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn slot_mut(&mut self, kind: SlotKind) -> Option<&mut EquipmentSlot> {
        match (self, kind) {
            (Loadout::Hands { right, .. }, SlotKind::RightHand) => Some(right),
            (Loadout::Hands { left, .. }, SlotKind::LeftHand) => Some(left),
            (Loadout::Single { weapon }, SlotKind::Weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn slots(&self) -> Vec<&EquipmentSlot> {
        match self {
            Loadout::Hands { right, left } => vec![right, left],
            Loadout::Single { weapon } => vec![weapon],
        }
    }

    pub fn slots_mut(&mut self) -> Vec<&mut EquipmentSlot> {
        match self {
            Loadout::Hands { right, left } => vec![right, left],
            Loadout::Single { weapon } => vec![weapon],
        }
    }

    pub fn has_any_item_equipped(&self) -> bool {
        self.slots().iter().any(|slot| !slot.is_empty())
    }

    /// Атомарный обмен предметами между руками.
    ///
    /// Оба anchor'а проверяются до любых мутаций: либо обмен целиком,
    /// либо оба слота остаются как были. Экземпляры не уничтожаются.
    pub fn swap_hands(&mut self) -> Result<(), SwapError> {
        let Loadout::Hands { right, left } = self else {
            return Err(SwapError::NotTwoHanded);
        };
        if !right.can_hold() {
            return Err(SwapError::SlotUninitialized(SlotKind::RightHand));
        }
        if !left.can_hold() {
            return Err(SwapError::SlotUninitialized(SlotKind::LeftHand));
        }

        let right_item = right.remove_without_destroy();
        let left_item = left.remove_without_destroy();

        // anchors проверены выше; если set_item всё же откажет, возвращаем как было
        if let Err(left_item) = right.set_item(left_item) {
            let _ = left.set_item(left_item);
            let _ = right.set_item(right_item);
            return Err(SwapError::SlotUninitialized(SlotKind::RightHand));
        }
        if let Err(right_item) = left.set_item(right_item) {
            let left_item = right.remove_without_destroy();
            let _ = left.set_item(left_item);
            let _ = right.set_item(right_item);
            return Err(SwapError::SlotUninitialized(SlotKind::LeftHand));
        }
        Ok(())
    }
}
