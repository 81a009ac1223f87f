//! Spatial queries: "кто в радиусе" для оружия и восприятия AI
//!
//! Core не знает про физический движок. Он потребляет две capability:
//! - `SpatialQuery::entities_within_sphere` — melee overlap и попадания снарядов
//! - `PlayerLocator::nearest_player` — восприятие врагов
//!
//! Дефолтная реализация — `SpatialIndex`, snapshot позиций, который
//! пересобирается в начале каждого тика (brute-force, headless).
//! Движок может подменить его своими запросами через те же traits.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::components::{Character, Player};

pub mod layers;

pub use layers::*;

/// Коллайдер, по которому бьют атаки.
///
/// `root` — корень иерархии (персонаж-владелец). Нужен для исключения
/// self-hit и для поиска `Character`, которому уходит урон.
/// `None` = сама entity и есть корень.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hurtbox {
    pub layers: u32,
    pub radius: f32,
    pub root: Option<Entity>,
}

impl Hurtbox {
    /// Капсула персонажа на слое Actors.
    pub fn actor() -> Self {
        Self {
            layers: COLLISION_LAYER_ACTORS,
            radius: 0.5,
            root: None,
        }
    }

    /// Статичное препятствие (стена): снаряды о него гаснут.
    pub fn environment(radius: f32) -> Self {
        Self {
            layers: COLLISION_LAYER_ENVIRONMENT,
            radius,
            root: None,
        }
    }

    pub fn with_root(mut self, root: Entity) -> Self {
        self.root = Some(root);
        self
    }
}

/// Результат spatial запроса.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialHit {
    pub entity: Entity,
    pub root: Entity,
    pub position: Vec3,
    pub layers: u32,
    /// Расстояние от центра запроса до центра коллайдера
    pub distance: f32,
}

/// Ближайший замеченный игрок.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceivedPlayer {
    pub entity: Entity,
    pub position: Vec3,
    pub distance: f32,
}

pub trait SpatialQuery {
    /// Все коллайдеры на слоях `layer_mask`, пересекающие сферу.
    ///
    /// Порядок детерминирован: по расстоянию, затем по entity.
    fn entities_within_sphere(&self, center: Vec3, radius: f32, layer_mask: u32) -> Vec<SpatialHit>;
}

pub trait PlayerLocator {
    fn nearest_player(&self, from: Vec3, radius: f32) -> Option<PerceivedPlayer>;

    /// Позиция живого персонажа. None = ссылка невалидна (despawn / смерть).
    fn living_position(&self, entity: Entity) -> Option<Vec3>;
}

#[derive(Debug, Clone, Copy)]
struct ColliderEntry {
    entity: Entity,
    root: Entity,
    position: Vec3,
    layers: u32,
    radius: f32,
}

/// Per-tick snapshot коллайдеров и живых персонажей.
#[derive(Resource, Debug, Default)]
pub struct SpatialIndex {
    colliders: Vec<ColliderEntry>,
    players: Vec<(Entity, Vec3)>,
    living: HashMap<Entity, Vec3>,
}

impl SpatialIndex {
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.players.clear();
        self.living.clear();
    }

    pub fn insert_collider(&mut self, entity: Entity, position: Vec3, hurtbox: &Hurtbox) {
        self.colliders.push(ColliderEntry {
            entity,
            root: hurtbox.root.unwrap_or(entity),
            position,
            layers: hurtbox.layers,
            radius: hurtbox.radius.max(0.0),
        });
    }

    pub fn insert_living(&mut self, entity: Entity, position: Vec3, is_player: bool) {
        self.living.insert(entity, position);
        if is_player {
            self.players.push((entity, position));
        }
    }
}

impl SpatialQuery for SpatialIndex {
    fn entities_within_sphere(&self, center: Vec3, radius: f32, layer_mask: u32) -> Vec<SpatialHit> {
        let mut hits: Vec<SpatialHit> = self
            .colliders
            .iter()
            .filter(|entry| layers_overlap(entry.layers, layer_mask))
            .filter_map(|entry| {
                let distance = entry.position.distance(center);
                (distance <= radius + entry.radius).then_some(SpatialHit {
                    entity: entry.entity,
                    root: entry.root,
                    position: entry.position,
                    layers: entry.layers,
                    distance,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.entity.cmp(&b.entity))
        });
        hits
    }
}

impl PlayerLocator for SpatialIndex {
    fn nearest_player(&self, from: Vec3, radius: f32) -> Option<PerceivedPlayer> {
        self.players
            .iter()
            .map(|(entity, position)| PerceivedPlayer {
                entity: *entity,
                position: *position,
                distance: position.distance(from),
            })
            .filter(|player| player.distance <= radius)
            .min_by(|a, b| {
                a.distance
                    .total_cmp(&b.distance)
                    .then_with(|| a.entity.cmp(&b.entity))
            })
    }

    fn living_position(&self, entity: Entity) -> Option<Vec3> {
        self.living.get(&entity).copied()
    }
}

/// System: пересобрать snapshot (начало тика).
pub fn rebuild_spatial_index(
    mut index: ResMut<SpatialIndex>,
    colliders: Query<(Entity, &Transform, &Hurtbox)>,
    actors: Query<(Entity, &Transform, &Character, Has<Player>)>,
) {
    index.clear();

    for (entity, transform, hurtbox) in colliders.iter() {
        // Трупы не перехватывают удары и снаряды
        let root = hurtbox.root.unwrap_or(entity);
        if let Ok((_, _, character, _)) = actors.get(root) {
            if !character.is_alive() {
                continue;
            }
        }
        index.insert_collider(entity, transform.translation, hurtbox);
    }

    for (entity, transform, character, is_player) in actors.iter() {
        if character.is_alive() {
            index.insert_living(entity, transform.translation, is_player);
        }
    }

    // Query order не гарантирован между запусками: фиксируем порядок
    index.colliders.sort_by_key(|entry| entry.entity);
    index.players.sort_by_key(|(entity, _)| *entity);
}
