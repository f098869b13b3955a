//! AI Events — вход (alert'ы от уровня) и выход (presentation, переходы FSM)
//!
//! Хост (Godot/Unity/headless runner) пишет `AlertTriggered`, читает остальные.

use bevy::prelude::*;

use crate::ai::components::EnemyStateKind;
use crate::ai::effects::Effect;
use crate::error::AiIssue;

/// Шум / триггер уровня в world позиции
#[derive(Event, Debug, Clone)]
pub struct AlertTriggered {
    pub position: Vec3,
    /// None → broadcast всем врагам
    pub enemy: Option<Entity>,
}

impl AlertTriggered {
    pub fn broadcast(position: Vec3) -> Self {
        Self {
            position,
            enemy: None,
        }
    }

    pub fn to_enemy(enemy: Entity, position: Vec3) -> Self {
        Self {
            position,
            enemy: Some(enemy),
        }
    }
}

/// Presentation команда конкретного врага (анимация, звук, камера, сцена)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EnemyEffect {
    pub enemy: Entity,
    pub effect: Effect,
}

/// Переход FSM (для UI / debug / аналитики)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EnemyStateChanged {
    pub enemy: Entity,
    pub from: EnemyStateKind,
    pub to: EnemyStateKind,
}

/// Нефатальная проблема AI (уже залогирована контроллером)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EnemyIssueRaised {
    pub enemy: Entity,
    pub issue: AiIssue,
}
