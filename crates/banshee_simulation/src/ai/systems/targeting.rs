//! Player target resolution.

use bevy::prelude::*;

use crate::components::{Player, PlayerTarget};

/// Система: привязать врагов без цели к игроку
///
/// Резолвим один раз: если игрок потом despawned, ссылка остаётся
/// битой и perception деградирует в "no signal".
pub fn resolve_player_targets(
    mut targets: Query<(Entity, &mut PlayerTarget)>,
    players: Query<Entity, With<Player>>,
) {
    let Some(player) = players.iter().next() else {
        return;
    };

    for (enemy, mut target) in targets.iter_mut() {
        if target.0.is_none() {
            target.0 = Some(player);
            crate::log(&format!("🎯 Enemy {:?} locked on player {:?}", enemy, player));
        }
    }
}
