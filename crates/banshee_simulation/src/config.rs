//! Параметры врага (detection ranges, скорости, таймеры, ending)
//!
//! Грузится из JSON (`#[serde(default)]` — можно задавать только отличия от
//! дефолтов). Простые варианты AI (distance-only chase) = подмножество
//! конфигурации, а не отдельная реализация.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Верхняя граница для таймеров (сутки): дальше `Duration` из f32 теряет смысл
pub const MAX_TIMER_SECS: f32 = 86_400.0;

/// Откуда брать patrol точки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub enum PatrolRoute {
    /// Случайная достижимая точка в сфере `patrol_radius` вокруг patrol center
    RandomInRadius,
    /// Фиксированные точки в перемешанном порядке (reshuffle после полного круга)
    Waypoints(Vec<Vec3>),
}

impl Default for PatrolRoute {
    fn default() -> Self {
        Self::RandomInRadius
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct EnemyConfig {
    /// Имя для логов ("Banshee", "Angel")
    pub label: String,

    // --- Perception ---
    /// Радиус обнаружения игрока (метры)
    pub detection_range: f32,
    /// Радиус потери игрока в Chase (метры), >= detection_range
    pub lose_range: f32,
    /// Detection требует line-of-sight от хоста (если хост его сообщает)
    pub require_line_of_sight: bool,

    // --- Navigation ---
    /// Остаток пути, который считается "дошёл"
    pub arrival_threshold: f32,
    pub patrol_route: PatrolRoute,
    pub patrol_radius: f32,
    /// None → позиция спавна
    pub patrol_center: Option<Vec3>,
    /// Радиус второй (fallback) попытки вокруг самого агента
    pub fallback_patrol_radius: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Скорость движения к alert'у. None → chase_speed (бежим на шум)
    pub investigate_speed: Option<f32>,

    // --- Timers ---
    pub min_idle_time: f32,
    pub max_idle_time: f32,
    /// Сколько стоим на последней alert точке перед решением Chase/Idle.
    /// 0 → решение на тике прибытия.
    pub investigate_linger: f32,
    pub roar_duration: f32,

    /// Шанс (0..=1) остановиться посреди patrol'а; бросок каждые 1–3с
    pub idle_chance_while_patrolling: f32,

    // --- Variant switches ---
    pub investigate_enabled: bool,
    /// false → detection сразу в Chase (simple chaser)
    pub roar_enabled: bool,
    /// Stalker: замирает пока игрок на него смотрит
    pub freeze_when_watched: bool,

    // --- Presentation / ending ---
    pub roar_clip: String,
    pub jumpscare_distance: f32,
    pub ending_duration: f32,
    pub target_scene: String,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            label: "Banshee".to_string(),
            detection_range: 15.0,
            lose_range: 20.0,
            require_line_of_sight: false,
            arrival_threshold: 1.0,
            patrol_route: PatrolRoute::RandomInRadius,
            patrol_radius: 10.0,
            patrol_center: None,
            fallback_patrol_radius: 5.0,
            patrol_speed: 2.0,
            chase_speed: 5.0,
            investigate_speed: None,
            min_idle_time: 2.0,
            max_idle_time: 5.0,
            investigate_linger: 0.0,
            roar_duration: 1.0,
            idle_chance_while_patrolling: 0.0,
            investigate_enabled: true,
            roar_enabled: true,
            freeze_when_watched: false,
            roar_clip: "banshee_roar".to_string(),
            jumpscare_distance: 2.0,
            ending_duration: 2.0,
            target_scene: "MainMenu".to_string(),
        }
    }
}

impl EnemyConfig {
    /// Distance-only chaser: без roar и investigate
    pub fn simple_chaser() -> Self {
        Self {
            label: "Chaser".to_string(),
            detection_range: 10.0,
            lose_range: 12.0,
            patrol_radius: 20.0,
            min_idle_time: 5.0,
            max_idle_time: 5.0,
            idle_chance_while_patrolling: 0.5,
            investigate_enabled: false,
            roar_enabled: false,
            ..Self::default()
        }
    }

    /// Stalker ("angel"): двигается только когда игрок не смотрит
    pub fn stalker() -> Self {
        Self {
            label: "Angel".to_string(),
            roar_enabled: false,
            investigate_enabled: false,
            freeze_when_watched: true,
            ..Self::default()
        }
    }

    pub fn investigate_speed(&self) -> f32 {
        self.investigate_speed.unwrap_or(self.chase_speed)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("detection_range", self.detection_range),
            ("lose_range", self.lose_range),
            ("arrival_threshold", self.arrival_threshold),
            ("fallback_patrol_radius", self.fallback_patrol_radius),
            ("patrol_speed", self.patrol_speed),
            ("chase_speed", self.chase_speed),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if let Some(value) = self.investigate_speed {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive {
                    field: "investigate_speed",
                    value,
                });
            }
        }

        let non_negative = [
            ("patrol_radius", self.patrol_radius),
            ("min_idle_time", self.min_idle_time),
            ("max_idle_time", self.max_idle_time),
            ("investigate_linger", self.investigate_linger),
            ("roar_duration", self.roar_duration),
            ("jumpscare_distance", self.jumpscare_distance),
            ("ending_duration", self.ending_duration),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let timers = [
            ("min_idle_time", self.min_idle_time),
            ("max_idle_time", self.max_idle_time),
            ("investigate_linger", self.investigate_linger),
            ("roar_duration", self.roar_duration),
            ("ending_duration", self.ending_duration),
        ];
        for (field, value) in timers {
            if value > MAX_TIMER_SECS {
                return Err(ConfigError::TooLarge {
                    field,
                    value,
                    max: MAX_TIMER_SECS,
                });
            }
        }

        let chance = self.idle_chance_while_patrolling;
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigError::NotAProbability {
                field: "idle_chance_while_patrolling",
                value: chance,
            });
        }

        if self.detection_range > self.lose_range {
            return Err(ConfigError::InvertedRanges {
                detection: self.detection_range,
                lose: self.lose_range,
            });
        }

        if self.min_idle_time > self.max_idle_time {
            return Err(ConfigError::InvertedIdleBounds {
                min: self.min_idle_time,
                max: self.max_idle_time,
            });
        }

        if let PatrolRoute::Waypoints(points) = &self.patrol_route {
            if points.is_empty() {
                return Err(ConfigError::EmptyWaypoints);
            }
        }

        if self.target_scene.trim().is_empty() {
            return Err(ConfigError::EmptyTargetScene);
        }

        Ok(())
    }
}
