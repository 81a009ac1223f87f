//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - resource_pool: ограниченные значения с регенерацией (health, stamina, mana)
//! - equipment: слоты экипировки (EquipmentSlot, Loadout)
//! - character: персонаж (пулы + слоты + notifications)
//! - movement: намерение движения (MovementIntent)
//! - player: player control marker (Player)

pub mod resource_pool;
pub mod equipment;
pub mod character;
pub mod movement;
pub mod player;


// Re-exports для удобного импорта
pub use resource_pool::*;
pub use equipment::*;
pub use character::*;
pub use movement::*;
pub use player::*;
