//! Item System — предметы, которые можно держать в слотах экипировки
//!
//! # Архитектура
//!
//! **ItemId** — идентификатор blueprint'а ("iron_sword", "wooden_shield").
//!
//! **ItemInstance** — конкретный runtime предмет:
//! - `instance_id`, уникальный в пределах владельца (`InstanceIdAllocator`)
//! - ссылка на blueprint через `ItemId`
//! - `attachment` — к какому anchor'у прикреплён и с каким локальным offset
//!
//! Владение: слот владеет `ItemInstance`. Drop экземпляра = "уничтожение"
//! предмета. Снять без уничтожения можно только через
//! `EquipmentSlot::remove_without_destroy` (используется swap'ом рук).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Item identifier (unique string ID)
///
/// # Examples
/// - "iron_sword"
/// - "wooden_shield"
/// - "oak_staff"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Куда прикреплён предмет: anchor слота + локальная поза относительно него.
#[derive(Clone, Debug, PartialEq)]
pub struct Attachment {
    pub anchor: String,
    pub local: Transform,
}

/// Runtime экземпляр предмета.
///
/// Не `Clone`: два слота не могут держать один и тот же экземпляр.
#[derive(Debug, PartialEq)]
pub struct ItemInstance {
    instance_id: u64,
    item_id: ItemId,
    attachment: Option<Attachment>,
}

impl ItemInstance {
    /// Экземпляр с заданным id. Обычно id выдаёт `InstanceIdAllocator`.
    pub fn new(instance_id: u64, item_id: impl Into<ItemId>) -> Self {
        Self {
            instance_id,
            item_id: item_id.into(),
            attachment: None,
        }
    }

    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Лёгкая копия для notifications (экземпляр может быть уже уничтожен).
    pub fn handle(&self) -> ItemHandle {
        ItemHandle {
            instance_id: self.instance_id,
            item_id: self.item_id.clone(),
        }
    }

    /// Прикрепляет к anchor'у: нулевой offset, identity rotation.
    pub(crate) fn attach_to(&mut self, anchor: &str) {
        self.attachment = Some(Attachment {
            anchor: anchor.to_string(),
            local: Transform::IDENTITY,
        });
    }

    pub(crate) fn detach(&mut self) {
        self.attachment = None;
    }
}

/// Счётчик instance id.
///
/// Никакого глобального состояния: одинаковая последовательность spawn'ов
/// даёт одинаковые id в любом прогоне.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdAllocator {
    next: u64,
}

impl Default for InstanceIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl InstanceIdAllocator {
    /// Создаёт новый экземпляр (аналог instantiate из blueprint'а).
    pub fn spawn(&mut self, item_id: impl Into<ItemId>) -> ItemInstance {
        let instance = ItemInstance::new(self.next, item_id);
        self.next += 1;
        instance
    }
}

/// Описание предмета без владения (для событий).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemHandle {
    pub instance_id: u64,
    pub item_id: ItemId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_instances_get_unique_ids() {
        let mut ids = InstanceIdAllocator::default();
        let a = ids.spawn("iron_sword");
        let b = ids.spawn("iron_sword");

        assert_ne!(a.instance_id(), b.instance_id());
        assert_eq!(a.item_id(), b.item_id());
        assert!(a.attachment().is_none());
    }

    #[test]
    fn test_separate_allocators_repeat_the_same_ids() {
        let mut first = InstanceIdAllocator::default();
        let mut second = InstanceIdAllocator::default();

        let a: Vec<_> = ["iron_sword", "wooden_shield"].map(|id| first.spawn(id).handle()).into();
        let b: Vec<_> = ["iron_sword", "wooden_shield"].map(|id| second.spawn(id).handle()).into();

        assert_eq!(a, b);
        assert_eq!(a[0].instance_id, 1);
        assert_eq!(a[1].instance_id, 2);
    }

    #[test]
    fn test_attach_uses_identity_local_pose() {
        let mut shield = ItemInstance::new(1, "wooden_shield");
        shield.attach_to("LeftHandAnchor");

        let attachment = shield.attachment().unwrap();
        assert_eq!(attachment.anchor, "LeftHandAnchor");
        assert_eq!(attachment.local, Transform::IDENTITY);

        shield.detach();
        assert!(shield.attachment().is_none());
    }
}
