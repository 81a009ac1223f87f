//! Combat systems (порядок см. `CombatPlugin`)

pub mod resources;
pub mod weapon;
pub mod melee;
pub mod projectile;
pub mod damage;
pub mod notifications;

// Re-export all systems
pub use resources::*;
pub use weapon::*;
pub use melee::*;
pub use projectile::*;
pub use damage::*;
pub use notifications::*;
