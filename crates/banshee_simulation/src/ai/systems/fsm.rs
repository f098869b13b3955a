//! FSM systems: alert routing, controller tick, outbox → events.

use bevy::prelude::*;

use crate::ai::events::{AlertTriggered, EnemyEffect, EnemyIssueRaised, EnemyStateChanged};
use crate::ai::perception::PlayerSighting;
use crate::ai::EnemyController;
use crate::components::{EnemyStatus, Player, PlayerTarget, SightingHints};

/// Система: раздать AlertTriggered контроллерам
///
/// `enemy: None` → broadcast. Alert для несуществующего врага молча теряется.
pub fn route_alert_events(
    mut alerts: EventReader<AlertTriggered>,
    mut enemies: Query<(Entity, &mut EnemyController)>,
) {
    for alert in alerts.read() {
        match alert.enemy {
            Some(enemy) => {
                if let Ok((_, mut controller)) = enemies.get_mut(enemy) {
                    controller.trigger_alert(alert.position);
                }
            }
            None => {
                for (_, mut controller) in enemies.iter_mut() {
                    controller.trigger_alert(alert.position);
                }
            }
        }
    }
}

/// Система: тик всех EnemyController
///
/// Perception вход собирается из Transform игрока + SightingHints хоста.
/// Outbox (effects, issues) сразу превращается в Bevy events.
pub fn tick_enemy_controllers(
    mut enemies: Query<(
        Entity,
        &mut EnemyController,
        &PlayerTarget,
        Option<&SightingHints>,
        &mut EnemyStatus,
    )>,
    players: Query<&Transform, With<Player>>,
    time: Res<Time<Fixed>>,
    mut effects: EventWriter<EnemyEffect>,
    mut transitions: EventWriter<EnemyStateChanged>,
    mut issues: EventWriter<EnemyIssueRaised>,
) {
    let delta = time.delta_secs();

    for (enemy, mut controller, target, hints, mut status) in enemies.iter_mut() {
        let sighting = target
            .0
            .and_then(|player| players.get(player).ok())
            .map(|transform| {
                let hints = hints.copied().unwrap_or_default();
                PlayerSighting {
                    position: transform.translation,
                    line_of_sight: hints.line_of_sight,
                    watching_agent: hints.watched_by_player,
                }
            });

        controller.update(delta, sighting);

        for effect in controller.drain_effects() {
            effects.write(EnemyEffect { enemy, effect });
        }
        for issue in controller.drain_issues() {
            issues.write(EnemyIssueRaised { enemy, issue });
        }

        let state = controller.current_state();
        if status.state != state {
            transitions.write(EnemyStateChanged {
                enemy,
                from: status.state,
                to: state,
            });
        }

        let next = EnemyStatus {
            state,
            pending_alerts: controller.pending_alerts().len(),
            ending_active: controller.is_ending_sequence_active(),
        };
        if *status != next {
            *status = next;
        }
    }
}
