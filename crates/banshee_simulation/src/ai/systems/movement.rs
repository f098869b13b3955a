//! Navigation advance + Transform sync.

use bevy::prelude::*;

use crate::ai::EnemyController;

/// Система: продвинуть navigation backend и синхронизировать Transform
///
/// Для движков со своим циклом (Godot NavigationAgent3D) advance — no-op,
/// Transform всё равно берём из backend'а (он authoritative для позиции).
pub fn advance_enemy_navigation(
    mut enemies: Query<(&mut EnemyController, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut controller, mut transform) in enemies.iter_mut() {
        controller.advance_navigation(delta);

        let position = controller.position();
        if transform.translation != position {
            transform.translation = position;
        }
    }
}
