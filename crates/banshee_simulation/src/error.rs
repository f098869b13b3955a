//! Ошибки симуляции
//!
//! Две категории:
//! - `ConfigError` — единственное что может провалить создание врага
//! - `AiIssue` — деградации во время тиков, никогда не фатальны

use bevy::prelude::Vec3;
use serde::{Deserialize, Serialize};

/// Невалидная конфигурация врага (проверяется один раз при создании)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Гистерезис требует detection ≤ lose, иначе Chase↔Patrol дребезжит
    #[error("detection range {detection} must not exceed lose range {lose}")]
    InvertedRanges { detection: f32, lose: f32 },

    #[error("idle time bounds are inverted: min {min} > max {max}")]
    InvertedIdleBounds { min: f32, max: f32 },

    #[error("`{field}` must be finite and >= 0, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be finite and > 0, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("`{field}` = {value} exceeds the maximum of {max}")]
    TooLarge {
        field: &'static str,
        value: f32,
        max: f32,
    },

    #[error("`{field}` must be within 0..=1, got {value}")]
    NotAProbability { field: &'static str, value: f32 },

    #[error("waypoint patrol route has no points")]
    EmptyWaypoints,

    #[error("target scene identifier is empty")]
    EmptyTargetScene,

    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Нефатальные проблемы AI
///
/// Каждая фиксируется по фронту (один раз на эпизод), логируется как warning
/// и отдаётся хосту через `EnemyController::drain_issues`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum AiIssue {
    /// Игрок не найден / despawned: perception → no-signal
    #[error("player reference is missing, perception degraded to no-signal")]
    MissingPlayerReference,

    /// Ни основной sample, ни fallback не нашли точку на NavMesh
    #[error("no reachable patrol point around {center} within {radius}m (fallback included)")]
    NoReachablePatrolPoint { center: Vec3, radius: f32 },

    /// Alert принят в очередь, но путь к нему не строится
    #[error("alert position {0} is not reachable")]
    InvalidAlertPosition(Vec3),
}
