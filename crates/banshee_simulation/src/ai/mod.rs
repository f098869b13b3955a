//! Enemy AI module
//!
//! Один `EnemyController` на врага: FSM Idle/Patrol/Investigate/Roaring/Chase/Ending
//! поверх perception (гистерезис), navigation adapter, effects dispatcher и
//! ending sequencer. Контроллер — обычная структура (тестируется без App),
//! ECS слой только кормит его входами и превращает outbox в events.

use bevy::prelude::*;

pub mod components;
pub mod controller;
pub mod effects;
pub mod ending;
pub mod events;
pub mod navigation;
pub mod perception;
pub mod systems;


// Re-export основных типов
pub use components::{AnimationState, EnemyState, EnemyStateKind, PendingAlerts};
pub use controller::{EnemyBrain, EnemyController};
pub use effects::{Effect, EffectsDispatcher};
pub use ending::EndingSequencer;
pub use events::{AlertTriggered, EnemyEffect, EnemyIssueRaised, EnemyStateChanged};
pub use navigation::{KinematicNavigator, NavigationAdapter, NavigationBackend, WalkableBounds};
pub use perception::{perceive, Perception, PlayerSighting, PlayerSignal};

/// Системы врагов (для `.after(EnemyAISystems)` у потребителей events)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnemyAISystems;

/// Enemy AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. resolve_player_targets — привязка к игроку
/// 2. route_alert_events — AlertTriggered → очереди контроллеров
/// 3. tick_enemy_controllers — perception + FSM + effects
/// 4. advance_enemy_navigation — движение + Transform sync
pub struct EnemyAIPlugin;

impl Plugin for EnemyAIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AlertTriggered>()
            .add_event::<EnemyEffect>()
            .add_event::<EnemyStateChanged>()
            .add_event::<EnemyIssueRaised>()
            .register_type::<EnemyStateKind>()
            .register_type::<crate::components::EnemyStatus>()
            .register_type::<crate::components::SightingHints>()
            .add_systems(
                FixedUpdate,
                (
                    systems::resolve_player_targets,
                    systems::route_alert_events,
                    systems::tick_enemy_controllers,
                    systems::advance_enemy_navigation,
                )
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(EnemyAISystems),
            );
    }
}
