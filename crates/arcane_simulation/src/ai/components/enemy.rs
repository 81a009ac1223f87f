//! EnemyBehavior — state machine врага поверх Character + WeaponManager.
//!
//! Порядок проверок за тик:
//! 1. смерть (форсирует Dead один раз)
//! 2. порог health → Retreat
//! 3. восприятие (Combat / Alert / потеря цели)
//! 4. обработчик текущего состояния → `BehaviorOutput`
//!
//! Чистая логика: ECS системы только собирают `SelfPerception`,
//! передают `PlayerLocator` и применяют результат.

use bevy::prelude::*;

use crate::config::AIConfig;
use crate::spatial::PlayerLocator;

/// Состояния врага
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum EnemyState {
    /// Стоит на месте
    #[default]
    Idle,
    /// Обходит waypoints по кругу
    Patrol,
    /// Заметил игрока, идёт к нему
    Alert,
    /// Бой: подходит и атакует
    Combat,
    /// Мало health, убегает лицом к цели
    Retreat,
    /// Терминальное состояние
    Dead,
}

impl std::fmt::Display for EnemyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: EnemyState,
    pub to: EnemyState,
}

/// Что враг знает о себе в этом тике.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfPerception {
    pub position: Vec3,
    pub alive: bool,
    pub health_percent: f32,
}

/// Решение за тик. Движение горизонтальное (y = 0), нормализованное.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviorOutput {
    pub movement: Option<Vec3>,
    pub look_at: Option<Vec3>,
    pub attack: bool,
    pub transitions: Vec<StateTransition>,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyBehavior {
    state: EnemyState,
    target: Option<Entity>,
    last_known_target_position: Option<Vec3>,
    patrol_index: usize,
    config: AIConfig,
}

impl EnemyBehavior {
    /// Стартует в Patrol если есть waypoints, иначе Idle.
    pub fn new(config: AIConfig) -> Self {
        let state = if config.patrol_points.is_empty() {
            EnemyState::Idle
        } else {
            EnemyState::Patrol
        };
        Self {
            state,
            target: None,
            last_known_target_position: None,
            patrol_index: 0,
            config,
        }
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn last_known_target_position(&self) -> Option<Vec3> {
        self.last_known_target_position
    }

    pub fn patrol_index(&self) -> usize {
        self.patrol_index
    }

    pub fn config(&self) -> &AIConfig {
        &self.config
    }

    pub fn is_disabled(&self) -> bool {
        self.state == EnemyState::Dead
    }

    /// Перевод в Dead. Повторный вызов ничего не делает.
    pub fn force_dead(&mut self) -> Option<StateTransition> {
        if self.state == EnemyState::Dead {
            return None;
        }
        self.target = None;
        let from = self.state;
        self.state = EnemyState::Dead;
        Some(StateTransition { from, to: EnemyState::Dead })
    }

    pub fn evaluate(&mut self, me: &SelfPerception, locator: &impl PlayerLocator) -> BehaviorOutput {
        let mut output = BehaviorOutput::default();

        if self.is_disabled() {
            return output;
        }
        if !me.alive {
            output.transitions.extend(self.force_dead());
            return output;
        }

        if me.health_percent <= self.config.retreat_threshold && self.state != EnemyState::Retreat {
            self.set_state(EnemyState::Retreat, &mut output);
        }

        self.perceive(me.position, locator, &mut output);

        let target_position = self.target.and_then(|target| locator.living_position(target));
        if target_position.is_some() {
            self.last_known_target_position = target_position;
        }

        match self.state {
            EnemyState::Idle | EnemyState::Dead => {}
            EnemyState::Patrol => self.handle_patrol(me.position, &mut output),
            EnemyState::Alert => self.handle_alert(me.position, target_position, &mut output),
            EnemyState::Combat => self.handle_combat(me.position, target_position, &mut output),
            EnemyState::Retreat => self.handle_retreat(me.position, target_position, &mut output),
        }

        output
    }

    fn perceive(&mut self, position: Vec3, locator: &impl PlayerLocator, output: &mut BehaviorOutput) {
        let nearest = locator.nearest_player(position, self.config.detection_radius);

        match nearest {
            Some(player) => {
                // Раненому есть от кого убегать
                if self.state == EnemyState::Retreat && self.target.is_none() {
                    self.target = Some(player.entity);
                }

                if player.distance <= self.config.combat_radius {
                    if !matches!(self.state, EnemyState::Combat | EnemyState::Retreat) {
                        self.target = Some(player.entity);
                        self.set_state(EnemyState::Combat, output);
                    }
                } else if matches!(self.state, EnemyState::Idle | EnemyState::Patrol) {
                    self.target = Some(player.entity);
                    self.set_state(EnemyState::Alert, output);
                }
            }
            None => {
                if matches!(self.state, EnemyState::Alert | EnemyState::Combat) {
                    self.lose_target(output);
                }
            }
        }
    }

    fn handle_patrol(&mut self, position: Vec3, output: &mut BehaviorOutput) {
        if self.config.patrol_points.is_empty() {
            self.set_state(EnemyState::Idle, output);
            return;
        }

        let count = self.config.patrol_points.len();
        self.patrol_index %= count;
        let mut waypoint = Vec3::from_array(self.config.patrol_points[self.patrol_index]);

        if horizontal(waypoint - position).length() < self.config.arrival_epsilon {
            self.patrol_index = (self.patrol_index + 1) % count;
            waypoint = Vec3::from_array(self.config.patrol_points[self.patrol_index]);
        }

        output.movement = heading(position, waypoint);
        output.look_at = Some(waypoint);
    }

    fn handle_alert(&mut self, position: Vec3, target_position: Option<Vec3>, output: &mut BehaviorOutput) {
        let Some(target_position) = target_position else {
            self.lose_target(output);
            return;
        };
        output.movement = heading(position, target_position);
        output.look_at = Some(target_position);
    }

    fn handle_combat(&mut self, position: Vec3, target_position: Option<Vec3>, output: &mut BehaviorOutput) {
        let Some(target_position) = target_position else {
            self.lose_target(output);
            return;
        };

        let distance = position.distance(target_position);
        if distance <= self.config.attack_range {
            output.look_at = Some(target_position);
            output.attack = true;
        } else if distance <= self.config.combat_radius {
            output.movement = heading(position, target_position);
            output.look_at = Some(target_position);
        } else {
            self.set_state(EnemyState::Alert, output);
        }
    }

    fn handle_retreat(&mut self, position: Vec3, target_position: Option<Vec3>, output: &mut BehaviorOutput) {
        if self.target.is_none() {
            // Ещё не видели игрока: стоим
            return;
        }
        let Some(target_position) = target_position else {
            self.target = None;
            self.set_state(EnemyState::Idle, output);
            return;
        };

        let away = horizontal(position - target_position).normalize_or_zero();
        let retreat_point = position + away * self.config.retreat_distance;
        output.movement = heading(position, retreat_point);
        output.look_at = Some(target_position);
    }

    fn lose_target(&mut self, output: &mut BehaviorOutput) {
        self.target = None;
        let next = if self.config.patrol_points.is_empty() {
            EnemyState::Idle
        } else {
            EnemyState::Patrol
        };
        self.set_state(next, output);
    }

    fn set_state(&mut self, next: EnemyState, output: &mut BehaviorOutput) {
        if self.state == next {
            return;
        }
        output.transitions.push(StateTransition {
            from: self.state,
            to: next,
        });
        self.state = next;
    }
}

fn horizontal(vector: Vec3) -> Vec3 {
    Vec3::new(vector.x, 0.0, vector.z)
}

/// Горизонтальное направление from → to. None если уже на месте.
fn heading(from: Vec3, to: Vec3) -> Option<Vec3> {
    horizontal(to - from).try_normalize()
}
