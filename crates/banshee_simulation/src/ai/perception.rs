//! Perception — дистанция/видимость игрока → сигнал для FSM
//!
//! Чистая функция: никаких side effects, решения о переходах принимает FSM.
//! Гистерезис: detection_range ≤ lose_range, между ними сигнала нет →
//! Chase не дребезжит на границе.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EnemyConfig;

/// Что хост знает об игроке на этом тике
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSighting {
    /// World позиция игрока
    pub position: Vec3,
    /// Line-of-sight / frustum тест хоста. None → хост не проверяет (distance-only)
    pub line_of_sight: Option<bool>,
    /// Игрок смотрит на врага (для stalker варианта)
    pub watching_agent: bool,
}

impl PlayerSighting {
    /// Distance-only наблюдение
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            line_of_sight: None,
            watching_agent: false,
        }
    }

    pub fn with_line_of_sight(mut self, visible: bool) -> Self {
        self.line_of_sight = Some(visible);
        self
    }

    pub fn watched(mut self, watching: bool) -> Self {
        self.watching_agent = watching;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSignal {
    /// Игрока нет, или он в полосе гистерезиса
    NoSignal,
    /// В радиусе обнаружения (и видим, если требуется LOS)
    Detected,
    /// Дальше lose_range
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub signal: PlayerSignal,
    /// None если игрока нет
    pub distance: Option<f32>,
    pub watched: bool,
}

impl Perception {
    pub fn none() -> Self {
        Self {
            signal: PlayerSignal::NoSignal,
            distance: None,
            watched: false,
        }
    }

    /// Игрок ближе `range` (чистая дистанция, без LOS)
    pub fn within(&self, range: f32) -> bool {
        self.distance.is_some_and(|d| d <= range)
    }
}

pub fn perceive(
    agent_position: Vec3,
    sighting: Option<&PlayerSighting>,
    config: &EnemyConfig,
) -> Perception {
    let Some(sighting) = sighting else {
        return Perception::none();
    };

    let distance = agent_position.distance(sighting.position);

    // Хост не сообщает LOS → считаем видимым (distance-only варианты)
    let visible = !config.require_line_of_sight || sighting.line_of_sight.unwrap_or(true);

    let signal = if distance <= config.detection_range && visible {
        PlayerSignal::Detected
    } else if distance > config.lose_range {
        PlayerSignal::Lost
    } else {
        PlayerSignal::NoSignal
    };

    Perception {
        signal,
        distance: Some(distance),
        watched: sighting.watching_agent,
    }
}
