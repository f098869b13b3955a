//! Компоненты врага вокруг `EnemyController`: ссылка на игрока,
//! подсказки perception от хоста, read-only статус для UI/debug.

use bevy::prelude::*;

use crate::ai::components::EnemyStateKind;

/// Ссылка на игрока (резолвится лениво, один раз)
///
/// None или despawned entity → perception "no signal" + `MissingPlayerReference`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTarget(pub Option<Entity>);

/// Что хост знает про видимость на этом тике (LOS raycast, frustum игрока)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SightingHints {
    /// None → хост LOS не проверяет
    pub line_of_sight: Option<bool>,
    /// Игрок смотрит на врага (stalker)
    pub watched_by_player: bool,
}

/// Read-only зеркало состояния контроллера
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyStatus {
    pub state: EnemyStateKind,
    pub pending_alerts: usize,
    pub ending_active: bool,
}
