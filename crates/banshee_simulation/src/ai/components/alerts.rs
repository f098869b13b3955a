//! Очередь alert позиций (шум, триггеры уровня).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Позиции ближе этого считаются одним alert'ом
pub const ALERT_DEDUP_EPSILON: f32 = 1e-3;

/// Упорядоченное множество alert позиций (порядок вставки, без дублей)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingAlerts {
    positions: Vec<Vec3>,
}

impl PendingAlerts {
    /// Добавляет alert. false если такая позиция уже в очереди.
    pub fn push(&mut self, position: Vec3) -> bool {
        if self.contains(position) {
            return false;
        }
        self.positions.push(position);
        true
    }

    pub fn contains(&self, position: Vec3) -> bool {
        self.positions
            .iter()
            .any(|p| p.abs_diff_eq(position, ALERT_DEDUP_EPSILON))
    }

    /// Ближайший alert по евклидовой дистанции; при равенстве — раньше добавленный
    pub fn nearest(&self, from: Vec3) -> Option<Vec3> {
        let mut best: Option<(Vec3, f32)> = None;
        for &position in &self.positions {
            let distance = from.distance_squared(position);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((position, distance)),
            }
        }
        best.map(|(position, _)| position)
    }

    pub fn remove(&mut self, position: Vec3) -> bool {
        let before = self.positions.len();
        self.positions
            .retain(|p| !p.abs_diff_eq(position, ALERT_DEDUP_EPSILON));
        self.positions.len() != before
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec3> {
        self.positions.iter()
    }
}
