//! FSM состояния врага + анимационный state для presentation.

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Состояние врага (ровно одно активно — гарантируется enum'ом)
///
/// Per-state таймеры живут внутри варианта: выходим из состояния → таймер исчезает.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Стоим на месте, ждём окончания idle таймера
    Idle {
        /// Секунды до перехода в Patrol
        remaining: f32,
    },

    /// Идём к patrol точке
    Patrol {
        destination: Vec3,
        /// До следующего броска "постоять" (None → пауз посреди пути нет)
        idle_check: Option<f32>,
    },

    /// Идём к ближайшему alert'у
    Investigate {
        /// None → все alert'ы разобраны, стоим и осматриваемся
        target: Option<Vec3>,
        /// Оставшееся время осмотра после последнего alert'а
        linger: f32,
    },

    /// Заметили игрока: стоим и орём перед Chase
    Roaring { remaining: f32 },

    /// Преследуем игрока (destination обновляется каждый тик)
    Chase {
        /// Stalker: игрок смотрит на нас → замерли
        frozen: bool,
    },

    /// Jumpscare + отложенная загрузка сцены. Терминальное состояние.
    Ending,
}

impl EnemyState {
    pub fn kind(&self) -> EnemyStateKind {
        match self {
            EnemyState::Idle { .. } => EnemyStateKind::Idle,
            EnemyState::Patrol { .. } => EnemyStateKind::Patrol,
            EnemyState::Investigate { .. } => EnemyStateKind::Investigate,
            EnemyState::Roaring { .. } => EnemyStateKind::Roaring,
            EnemyState::Chase { .. } => EnemyStateKind::Chase,
            EnemyState::Ending => EnemyStateKind::Ending,
        }
    }

    /// Можно ли перебить состояние обнаружением игрока
    pub fn accepts_perception_override(&self) -> bool {
        !matches!(
            self,
            EnemyState::Roaring { .. } | EnemyState::Chase { .. } | EnemyState::Ending
        )
    }

    /// Анимация, соответствующая состоянию (взаимоисключающая)
    pub fn animation(&self) -> AnimationState {
        match self {
            EnemyState::Idle { .. } => AnimationState::Idle,
            EnemyState::Patrol { .. } => AnimationState::Walk,
            EnemyState::Investigate { target: Some(_), .. } => AnimationState::Walk,
            EnemyState::Investigate { target: None, .. } => AnimationState::Idle,
            EnemyState::Roaring { .. } => AnimationState::Roar,
            EnemyState::Chase { frozen: true } => AnimationState::Idle,
            EnemyState::Chase { frozen: false } => AnimationState::Run,
            EnemyState::Ending => AnimationState::Ending,
        }
    }
}

/// Read-only вид состояния (UI / debug / events)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum EnemyStateKind {
    #[default]
    Idle,
    Patrol,
    Investigate,
    Roaring,
    Chase,
    Ending,
}

impl fmt::Display for EnemyStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnemyStateKind::Idle => "Idle",
            EnemyStateKind::Patrol => "Patrol",
            EnemyStateKind::Investigate => "Investigate",
            EnemyStateKind::Roaring => "Roaring",
            EnemyStateKind::Chase => "Chase",
            EnemyStateKind::Ending => "Ending",
        };
        f.write_str(name)
    }
}

/// Анимационное состояние (заменяет пачку animator bool'ов одним значением)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum AnimationState {
    Idle,
    Walk,
    Run,
    Roar,
    Ending,
}

impl AnimationState {
    /// Имя state'а в animation player'е хоста
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationState::Idle => "Idle",
            AnimationState::Walk => "Walk",
            AnimationState::Run => "Run",
            AnimationState::Roar => "Roar",
            AnimationState::Ending => "Jumpscare",
        }
    }
}
