//! Collision Layers Constants
//!
//! Битовые маски слоёв для spatial queries.
//!
//! - Layer 2 (0b10 = 2): Actors (игрок, враги, NPC)
//! - Layer 3 (0b100 = 4): Environment (стены, препятствия)
//!
//! Снаряды сами в индекс не попадают, поэтому своего слоя у них нет.
//!
//! Оружие хранит `target_layers` — с какими слоями его атака взаимодействует.

/// Layer 2: Actors
pub const COLLISION_LAYER_ACTORS: u32 = 0b10;

/// Layer 3: Environment
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 0b100;

/// Получить название слоя для debug логов
pub fn layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        COLLISION_LAYER_ACTORS => "Actors",
        COLLISION_LAYER_ENVIRONMENT => "Environment",
        _ => "Unknown",
    }
}

/// Пересекаются ли слои объекта с маской запроса.
pub fn layers_overlap(layers: u32, mask: u32) -> bool {
    layers & mask != 0
}
