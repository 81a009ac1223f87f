//! Tests for EnemyBehavior state machine.

#[cfg(test)]
mod tests {
    use super::super::enemy::*;
    use crate::config::AIConfig;
    use crate::spatial::SpatialIndex;
    use bevy::prelude::*;

    const PLAYER: u32 = 1;

    fn world_with_player_at(x: f32) -> SpatialIndex {
        let mut index = SpatialIndex::default();
        index.insert_living(Entity::from_raw(PLAYER), Vec3::new(x, 0.0, 0.0), true);
        index
    }

    fn healthy_at_origin() -> SelfPerception {
        SelfPerception {
            position: Vec3::ZERO,
            alive: true,
            health_percent: 1.0,
        }
    }

    fn transition(from: EnemyState, to: EnemyState) -> StateTransition {
        StateTransition { from, to }
    }

    #[test]
    fn test_initial_state_depends_on_patrol_points() {
        assert_eq!(EnemyBehavior::new(AIConfig::default()).state(), EnemyState::Idle);

        let config = AIConfig {
            patrol_points: vec![[5.0, 0.0, 0.0]],
            ..AIConfig::default()
        };
        assert_eq!(EnemyBehavior::new(config).state(), EnemyState::Patrol);
    }

    #[test]
    fn test_idle_without_player_does_nothing() {
        let mut behavior = EnemyBehavior::new(AIConfig::default());
        let output = behavior.evaluate(&healthy_at_origin(), &SpatialIndex::default());

        assert_eq!(output, BehaviorOutput::default());
        assert_eq!(behavior.state(), EnemyState::Idle);
    }

    #[test]
    fn test_detection_combat_attack_scenario() {
        let mut behavior = EnemyBehavior::new(AIConfig::default());
        let me = healthy_at_origin();

        // 10: Alert, идём к игроку
        let output = behavior.evaluate(&me, &world_with_player_at(10.0));
        assert_eq!(behavior.state(), EnemyState::Alert);
        assert_eq!(output.transitions, vec![transition(EnemyState::Idle, EnemyState::Alert)]);
        assert_eq!(output.movement, Some(Vec3::X));
        assert_eq!(output.look_at, Some(Vec3::new(10.0, 0.0, 0.0)));
        assert!(!output.attack);
        assert_eq!(behavior.target(), Some(Entity::from_raw(PLAYER)));

        // 2.5: Combat, сближение без атаки
        let output = behavior.evaluate(&me, &world_with_player_at(2.5));
        assert_eq!(behavior.state(), EnemyState::Combat);
        assert_eq!(output.movement, Some(Vec3::X));
        assert!(!output.attack);

        // 1.5: атака на месте
        let output = behavior.evaluate(&me, &world_with_player_at(1.5));
        assert_eq!(behavior.state(), EnemyState::Combat);
        assert!(output.attack);
        assert_eq!(output.movement, None);
        assert_eq!(output.look_at, Some(Vec3::new(1.5, 0.0, 0.0)));
        assert!(output.transitions.is_empty());
    }

    #[test]
    fn test_target_escaping_combat_radius_falls_back_to_alert() {
        let mut behavior = EnemyBehavior::new(AIConfig::default());
        let me = healthy_at_origin();
        behavior.evaluate(&me, &world_with_player_at(2.0));
        assert_eq!(behavior.state(), EnemyState::Combat);

        let output = behavior.evaluate(&me, &world_with_player_at(6.0));
        assert_eq!(behavior.state(), EnemyState::Alert);
        assert_eq!(output.transitions, vec![transition(EnemyState::Combat, EnemyState::Alert)]);
    }

    #[test]
    fn test_losing_player_returns_to_patrol_or_idle() {
        let me = healthy_at_origin();

        let mut idle = EnemyBehavior::new(AIConfig::default());
        idle.evaluate(&me, &world_with_player_at(10.0));
        idle.evaluate(&me, &world_with_player_at(30.0));
        assert_eq!(idle.state(), EnemyState::Idle);
        assert_eq!(idle.target(), None);

        let config = AIConfig {
            patrol_points: vec![[0.0, 0.0, 8.0]],
            ..AIConfig::default()
        };
        let mut patrol = EnemyBehavior::new(config);
        patrol.evaluate(&me, &world_with_player_at(2.0));
        assert_eq!(patrol.state(), EnemyState::Combat);

        let output = patrol.evaluate(&me, &SpatialIndex::default());
        assert_eq!(patrol.state(), EnemyState::Patrol);
        assert_eq!(output.movement, Some(Vec3::Z));
    }

    #[test]
    fn test_patrol_advances_cyclically_on_arrival() {
        let config = AIConfig {
            patrol_points: vec![[0.0, 0.0, 0.0], [4.0, 0.0, 0.0]],
            ..AIConfig::default()
        };
        let mut behavior = EnemyBehavior::new(config);
        let empty = SpatialIndex::default();

        // Стоим на первой точке: следующая
        let output = behavior.evaluate(&healthy_at_origin(), &empty);
        assert_eq!(behavior.patrol_index(), 1);
        assert_eq!(output.movement, Some(Vec3::X));

        let at_second = SelfPerception {
            position: Vec3::new(3.8, 0.0, 0.0),
            ..healthy_at_origin()
        };
        let output = behavior.evaluate(&at_second, &empty);
        assert_eq!(behavior.patrol_index(), 0);
        assert_eq!(output.movement, Some(Vec3::NEG_X));
    }

    #[test]
    fn test_low_health_forces_retreat_and_flees_facing_target() {
        let mut behavior = EnemyBehavior::new(AIConfig::default());
        let index = world_with_player_at(1.5);
        behavior.evaluate(&healthy_at_origin(), &index);
        assert_eq!(behavior.state(), EnemyState::Combat);

        let wounded = SelfPerception {
            health_percent: 0.2,
            ..healthy_at_origin()
        };
        let output = behavior.evaluate(&wounded, &index);

        assert_eq!(behavior.state(), EnemyState::Retreat);
        assert_eq!(output.transitions, vec![transition(EnemyState::Combat, EnemyState::Retreat)]);
        assert_eq!(output.movement, Some(Vec3::NEG_X));
        assert_eq!(output.look_at, Some(Vec3::new(1.5, 0.0, 0.0)));
        assert!(!output.attack);

        // Остаётся в Retreat, даже если игрок в зоне боя
        let output = behavior.evaluate(&wounded, &index);
        assert_eq!(behavior.state(), EnemyState::Retreat);
        assert!(output.transitions.is_empty());
    }

    #[test]
    fn test_low_health_forces_retreat_from_any_live_state() {
        let patrol = AIConfig {
            patrol_points: vec![[5.0, 0.0, 0.0]],
            ..AIConfig::default()
        };
        let cases = [
            (EnemyState::Idle, AIConfig::default(), SpatialIndex::default()),
            (EnemyState::Patrol, patrol, SpatialIndex::default()),
            (EnemyState::Alert, AIConfig::default(), world_with_player_at(10.0)),
            (EnemyState::Combat, AIConfig::default(), world_with_player_at(1.5)),
        ];

        let wounded = SelfPerception {
            health_percent: 0.2,
            ..healthy_at_origin()
        };
        for (start, config, index) in cases {
            let mut behavior = EnemyBehavior::new(config);
            behavior.evaluate(&healthy_at_origin(), &index);
            assert_eq!(behavior.state(), start);

            let output = behavior.evaluate(&wounded, &index);
            assert_eq!(behavior.state(), EnemyState::Retreat, "from {}", start);
            assert_eq!(output.transitions, vec![transition(start, EnemyState::Retreat)], "from {}", start);
            assert!(!output.attack, "from {}", start);
        }
    }

    #[test]
    fn test_retreat_with_invalid_target_falls_back_to_idle() {
        let mut behavior = EnemyBehavior::new(AIConfig::default());
        behavior.evaluate(&healthy_at_origin(), &world_with_player_at(2.0));

        let wounded = SelfPerception {
            health_percent: 0.1,
            ..healthy_at_origin()
        };
        behavior.evaluate(&wounded, &world_with_player_at(2.0));
        assert_eq!(behavior.state(), EnemyState::Retreat);

        // Игрок исчез из мира
        let output = behavior.evaluate(&wounded, &SpatialIndex::default());
        assert_eq!(behavior.state(), EnemyState::Idle);
        assert_eq!(output.transitions, vec![transition(EnemyState::Retreat, EnemyState::Idle)]);
        assert_eq!(behavior.last_known_target_position(), Some(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_death_is_terminal() {
        let mut behavior = EnemyBehavior::new(AIConfig::default());
        let index = world_with_player_at(1.0);
        behavior.evaluate(&healthy_at_origin(), &index);

        let dead = SelfPerception {
            alive: false,
            health_percent: 0.0,
            ..healthy_at_origin()
        };
        let output = behavior.evaluate(&dead, &index);
        assert_eq!(output.transitions, vec![transition(EnemyState::Combat, EnemyState::Dead)]);
        assert!(!output.attack);
        assert_eq!(output.movement, None);

        // Больше никаких решений
        let output = behavior.evaluate(&healthy_at_origin(), &index);
        assert_eq!(output, BehaviorOutput::default());
        assert!(behavior.is_disabled());
        assert_eq!(behavior.force_dead(), None);
    }
}
