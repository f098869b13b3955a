//! Tests for FSM state types.

#[cfg(test)]
mod tests {
    use bevy::prelude::Vec3;

    use super::super::fsm::{AnimationState, EnemyState, EnemyStateKind};

    #[test]
    fn test_state_kind_mapping() {
        assert_eq!(EnemyState::Idle { remaining: 1.0 }.kind(), EnemyStateKind::Idle);
        assert_eq!(
            EnemyState::Patrol { destination: Vec3::X, idle_check: None }.kind(),
            EnemyStateKind::Patrol
        );
        assert_eq!(EnemyState::Chase { frozen: true }.kind(), EnemyStateKind::Chase);
        assert_eq!(EnemyState::Ending.kind(), EnemyStateKind::Ending);
    }

    #[test]
    fn test_override_only_from_calm_states() {
        assert!(EnemyState::Idle { remaining: 0.0 }.accepts_perception_override());
        assert!(EnemyState::Patrol { destination: Vec3::ZERO, idle_check: Some(1.0) }.accepts_perception_override());
        assert!(EnemyState::Investigate { target: None, linger: 0.0 }.accepts_perception_override());

        assert!(!EnemyState::Roaring { remaining: 1.0 }.accepts_perception_override());
        assert!(!EnemyState::Chase { frozen: false }.accepts_perception_override());
        assert!(!EnemyState::Ending.accepts_perception_override());
    }

    #[test]
    fn test_animation_is_mutually_exclusive_per_state() {
        assert_eq!(EnemyState::Idle { remaining: 1.0 }.animation(), AnimationState::Idle);
        assert_eq!(
            EnemyState::Investigate { target: Some(Vec3::ONE), linger: 2.0 }.animation(),
            AnimationState::Walk
        );
        // Осматриваемся на месте после последнего alert'а
        assert_eq!(
            EnemyState::Investigate { target: None, linger: 2.0 }.animation(),
            AnimationState::Idle
        );
        assert_eq!(EnemyState::Roaring { remaining: 1.0 }.animation(), AnimationState::Roar);
        assert_eq!(EnemyState::Chase { frozen: false }.animation(), AnimationState::Run);
        assert_eq!(EnemyState::Chase { frozen: true }.animation(), AnimationState::Idle);
        assert_eq!(EnemyState::Ending.animation(), AnimationState::Ending);
    }

    #[test]
    fn test_state_kind_display() {
        assert_eq!(EnemyStateKind::Roaring.to_string(), "Roaring");
        assert_eq!(EnemyStateKind::default(), EnemyStateKind::Idle);
        assert_eq!(AnimationState::Ending.as_str(), "Jumpscare");
    }
}
