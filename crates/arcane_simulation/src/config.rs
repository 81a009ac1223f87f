//! Конфигурация симуляции: пулы, персонажи, оружие, AI.
//!
//! Все структуры — serde, пресеты захардкожены (`Default` / именованные
//! конструкторы), опционально грузятся из RON:
//!
//! ```ron
//! (
//!     seed: 7,
//!     enemy_count: 2,
//!     enemy_ai: (detection_radius: 20.0, combat_radius: 4.0, attack_range: 2.0),
//! )
//! ```
//!
//! Отсутствующие поля берутся из пресетов.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logger::LogLevel;
use crate::spatial::layers::{COLLISION_LAYER_ACTORS, COLLISION_LAYER_ENVIRONMENT};

/// Ошибки загрузки конфигурации.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Файл не прочитался.
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// RON не распарсился.
    #[error("Config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Значения нарушают инварианты (max > 0, вложенность радиусов, ...).
    #[error("Invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// Resource pools
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max: f32,
    /// units per second
    pub regen_rate: f32,
    /// seconds
    pub regen_delay: f32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::health(100.0)
    }
}

impl PoolConfig {
    /// Health: без регенерации.
    pub fn health(max: f32) -> Self {
        Self {
            max,
            regen_rate: 0.0,
            regen_delay: 0.0,
        }
    }

    /// Stamina: 20/s после 1 s паузы.
    pub fn stamina() -> Self {
        Self {
            max: 100.0,
            regen_rate: 20.0,
            regen_delay: 1.0,
        }
    }

    /// Mana: 10/s после 2 s паузы.
    pub fn mana() -> Self {
        Self {
            max: 100.0,
            regen_rate: 10.0,
            regen_delay: 2.0,
        }
    }

    fn validate(&self, label: &str) -> Result<(), ConfigError> {
        if !(self.max > 0.0) {
            return Err(ConfigError::Invalid(format!("{label}: max must be > 0 (got {})", self.max)));
        }
        if !(self.regen_rate >= 0.0) || !(self.regen_delay >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "{label}: regen_rate and regen_delay must be >= 0"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Characters
// ============================================================================

/// Слоты персонажа + предметы, экипируемые при спавне.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoadoutConfig {
    Hands {
        right_anchor: Option<String>,
        left_anchor: Option<String>,
        #[serde(default)]
        right_item: Option<String>,
        #[serde(default)]
        left_item: Option<String>,
    },
    WeaponSlot {
        anchor: Option<String>,
        #[serde(default)]
        item: Option<String>,
    },
}

impl Default for LoadoutConfig {
    fn default() -> Self {
        LoadoutConfig::Hands {
            right_anchor: Some("RightHandAnchor".to_string()),
            left_anchor: Some("LeftHandAnchor".to_string()),
            right_item: None,
            left_item: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub name: String,
    pub health: PoolConfig,
    pub stamina: Option<PoolConfig>,
    pub mana: Option<PoolConfig>,
    pub loadout: LoadoutConfig,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self::player()
    }
}

impl CharacterConfig {
    pub fn player() -> Self {
        Self {
            name: "Player".to_string(),
            health: PoolConfig::health(100.0),
            stamina: Some(PoolConfig::stamina()),
            mana: Some(PoolConfig::mana()),
            loadout: LoadoutConfig::default(),
        }
    }

    /// Враг с мечом и щитом в руках.
    pub fn enemy() -> Self {
        Self {
            name: "Enemy".to_string(),
            health: PoolConfig::health(100.0),
            stamina: Some(PoolConfig::stamina()),
            mana: Some(PoolConfig::mana()),
            loadout: LoadoutConfig::Hands {
                right_anchor: Some("RightHandAnchor".to_string()),
                left_anchor: Some("LeftHandAnchor".to_string()),
                right_item: Some("rusty_sword".to_string()),
                left_item: Some("wooden_shield".to_string()),
            },
        }
    }

    /// Мирный NPC: только health и один слот.
    pub fn villager() -> Self {
        Self {
            name: "Villager".to_string(),
            health: PoolConfig::health(50.0),
            stamina: None,
            mana: None,
            loadout: LoadoutConfig::WeaponSlot {
                anchor: Some("ToolAnchor".to_string()),
                item: None,
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.health.validate(&format!("{}.health", self.name))?;
        if let Some(stamina) = &self.stamina {
            stamina.validate(&format!("{}.stamina", self.name))?;
        }
        if let Some(mana) = &self.mana {
            mana.validate(&format!("{}.mana", self.name))?;
        }
        Ok(())
    }
}

// ============================================================================
// Weapons
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeaponKindConfig {
    Melee {
        range: f32,
        /// full cone angle, degrees
        angle: f32,
        target_layers: u32,
        /// attack point relative to the owner
        anchor_offset: [f32; 3],
    },
    Ranged {
        projectile_speed: f32,
        projectile_lifetime: f32,
        projectile_radius: f32,
        destroy_on_impact: bool,
        /// seconds the projectile lingers after impact when not destroyed on impact
        impact_linger: f32,
        has_aim_mode: bool,
        target_layers: u32,
        muzzle_offset: [f32; 3],
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub name: String,
    pub damage: f32,
    pub cooldown: f32,
    #[serde(default)]
    pub stamina_cost: f32,
    #[serde(default)]
    pub mana_cost: f32,
    pub kind: WeaponKindConfig,
}

impl WeaponConfig {
    pub fn sword() -> Self {
        Self {
            name: "Sword".to_string(),
            damage: 10.0,
            cooldown: 1.0,
            stamina_cost: 5.0,
            mana_cost: 0.0,
            kind: WeaponKindConfig::Melee {
                range: 2.0,
                angle: 60.0,
                target_layers: COLLISION_LAYER_ACTORS,
                anchor_offset: [0.0, 0.0, -0.5],
            },
        }
    }

    /// Посох: снаряд за ману, есть режим прицеливания.
    pub fn staff() -> Self {
        Self {
            name: "Staff".to_string(),
            damage: 15.0,
            cooldown: 0.75,
            stamina_cost: 0.0,
            mana_cost: 10.0,
            kind: WeaponKindConfig::Ranged {
                projectile_speed: 20.0,
                projectile_lifetime: 5.0,
                projectile_radius: 0.3,
                destroy_on_impact: true,
                impact_linger: 0.0,
                has_aim_mode: true,
                target_layers: COLLISION_LAYER_ACTORS | COLLISION_LAYER_ENVIRONMENT,
                muzzle_offset: [0.0, 0.0, -0.6],
            },
        }
    }

    /// Оружие врага: медленнее игрока (cooldown 2 s).
    pub fn rusty_sword() -> Self {
        Self {
            name: "Rusty Sword".to_string(),
            cooldown: 2.0,
            ..Self::sword()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [self.damage, self.cooldown, self.stamina_cost, self.mana_cost];
        if non_negative.iter().any(|value| !(*value >= 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "weapon '{}': damage, cooldown and costs must be >= 0",
                self.name
            )));
        }
        match &self.kind {
            WeaponKindConfig::Melee { range, angle, .. } => {
                if !(*range > 0.0) || !(*angle > 0.0 && *angle <= 360.0) {
                    return Err(ConfigError::Invalid(format!(
                        "weapon '{}': melee range must be > 0 and angle in (0, 360]",
                        self.name
                    )));
                }
            }
            WeaponKindConfig::Ranged {
                projectile_speed,
                projectile_lifetime,
                projectile_radius,
                impact_linger,
                ..
            } => {
                let positive = [*projectile_speed, *projectile_lifetime, *projectile_radius];
                if positive.iter().any(|value| !(*value > 0.0)) || !(*impact_linger >= 0.0) {
                    return Err(ConfigError::Invalid(format!(
                        "weapon '{}': projectile speed, lifetime and radius must be > 0",
                        self.name
                    )));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Enemy AI
// ============================================================================

/// Параметры поведения врага.
///
/// Радиусы вложены: detection_radius ≥ combat_radius ≥ attack_range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AIConfig {
    pub detection_radius: f32,
    pub combat_radius: f32,
    pub attack_range: f32,
    /// health percent at or below which the enemy retreats
    pub retreat_threshold: f32,
    pub move_speed: f32,
    /// radians per second toward the look-at point
    pub rotation_speed: f32,
    pub patrol_points: Vec<[f32; 3]>,
    pub arrival_epsilon: f32,
    pub retreat_distance: f32,
    /// seconds a dead enemy stays in the world before despawn
    pub corpse_lifetime: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            detection_radius: 15.0,
            combat_radius: 3.0,
            attack_range: 2.0,
            retreat_threshold: 0.2,
            move_speed: 3.0,
            rotation_speed: 5.0,
            patrol_points: Vec::new(),
            arrival_epsilon: 0.5,
            retreat_distance: 10.0,
            corpse_lifetime: 3.0,
        }
    }
}

impl AIConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.attack_range >= 0.0
            && self.attack_range <= self.combat_radius
            && self.combat_radius <= self.detection_radius)
        {
            return Err(ConfigError::Invalid(format!(
                "AI radii must nest: attack_range ({}) <= combat_radius ({}) <= detection_radius ({})",
                self.attack_range, self.combat_radius, self.detection_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.retreat_threshold) {
            return Err(ConfigError::Invalid(format!(
                "AI retreat_threshold must be in [0, 1] (got {})",
                self.retreat_threshold
            )));
        }
        let non_negative = [
            self.move_speed,
            self.rotation_speed,
            self.arrival_epsilon,
            self.retreat_distance,
            self.corpse_lifetime,
        ];
        if non_negative.iter().any(|value| !(*value >= 0.0)) {
            return Err(ConfigError::Invalid(
                "AI speeds, distances and corpse_lifetime must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// Полный конфиг headless прогона.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub tick_hz: f64,
    pub ticks: u32,
    pub log_level: LogLevel,
    pub player: CharacterConfig,
    pub player_weapons: Vec<WeaponConfig>,
    pub enemy: CharacterConfig,
    pub enemy_weapons: Vec<WeaponConfig>,
    pub enemy_ai: AIConfig,
    pub enemy_count: u32,
    pub spawn_radius: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            ticks: 1200,
            log_level: LogLevel::Info,
            player: CharacterConfig::player(),
            player_weapons: vec![WeaponConfig::sword(), WeaponConfig::staff()],
            enemy: CharacterConfig::enemy(),
            enemy_weapons: vec![WeaponConfig::rusty_sword()],
            enemy_ai: AIConfig::default(),
            enemy_count: 3,
            spawn_radius: 12.0,
        }
    }
}

impl SimulationConfig {
    /// Парсит RON и валидирует.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_hz > 0.0 && self.tick_hz.is_finite()) {
            return Err(ConfigError::Invalid(format!("tick_hz must be > 0 (got {})", self.tick_hz)));
        }
        if !(self.spawn_radius >= 0.0 && self.spawn_radius.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "spawn_radius must be a finite value >= 0 (got {})",
                self.spawn_radius
            )));
        }
        self.player.validate()?;
        self.enemy.validate()?;
        self.enemy_ai.validate()?;
        for weapon in self.player_weapons.iter().chain(self.enemy_weapons.iter()) {
            weapon.validate()?;
        }
        Ok(())
    }
}
