//! Navigation Adapter — изоляция FSM от конкретного pathfinding движка
//!
//! Хост (Godot NavigationAgent3D, Unity NavMeshAgent, ...) реализует
//! `NavigationBackend`. Симуляция никогда не строит пути сама.
//! `KinematicNavigator` — headless backend без препятствий (тесты, headless runner).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod kinematic;
pub mod patrol;

#[cfg(test)]
pub(crate) mod test_support;

pub use kinematic::{KinematicNavigator, WalkableBounds};
pub use patrol::{pick_patrol_point, random_point_in_sphere, WaypointCursor};

/// Capability pathfinding движка (внедряется при создании врага)
pub trait NavigationBackend: Send + Sync + 'static {
    /// Текущая позиция агента
    fn position(&self) -> Vec3;

    /// Запросить путь. false → точка вне NavMesh / путь не строится
    fn set_destination(&mut self, point: Vec3) -> bool;

    fn has_path(&self) -> bool;

    fn path_pending(&self) -> bool;

    fn remaining_distance(&self) -> f32;

    fn velocity(&self) -> Vec3;

    fn set_speed(&mut self, speed: f32);

    fn set_stopped(&mut self, stopped: bool);

    /// Ближайшая точка NavMesh в пределах `radius` от `center`
    fn sample_reachable_point(&self, center: Vec3, radius: f32) -> Option<Vec3>;

    /// Продвинуть движение на `dt`. Движки с собственным циклом оставляют no-op.
    fn advance(&mut self, _dt: f32) {}
}

/// Что адаптер последний раз просил у движка (для snapshot/restore)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionPlan {
    pub destination: Option<Vec3>,
    pub has_valid_path: bool,
    pub speed: f32,
    pub stopped: bool,
}

pub struct NavigationAdapter {
    backend: Box<dyn NavigationBackend>,
    arrival_threshold: f32,
    plan: MotionPlan,
}

impl NavigationAdapter {
    pub fn new(backend: Box<dyn NavigationBackend>, arrival_threshold: f32) -> Self {
        Self {
            backend,
            arrival_threshold,
            plan: MotionPlan::default(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.backend.position()
    }

    pub fn velocity(&self) -> Vec3 {
        self.backend.velocity()
    }

    /// Запрос пути. Off-mesh точка не ошибка: логируем (на фронте) и
    /// отдаём `has_valid_path = false`.
    pub fn set_destination(&mut self, point: Vec3) -> bool {
        let ok = self.backend.set_destination(point);

        let was_valid_for_point =
            self.plan.has_valid_path || self.plan.destination != Some(point);
        if !ok && was_valid_for_point {
            crate::log_warning(&format!(
                "🧭 Navigation: no valid path to {:?} (from {:?})",
                point,
                self.backend.position()
            ));
        }

        self.plan.destination = Some(point);
        self.plan.has_valid_path = ok;
        ok
    }

    pub fn current_destination(&self) -> Option<Vec3> {
        self.plan.destination
    }

    pub fn has_valid_path(&self) -> bool {
        self.plan.has_valid_path && self.backend.has_path()
    }

    /// Дошли: путь посчитан, он есть и остаток меньше arrival threshold
    pub fn is_arrived(&self) -> bool {
        !self.backend.path_pending()
            && self.backend.has_path()
            && self.backend.remaining_distance() < self.arrival_threshold
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.plan.speed = speed;
        self.backend.set_speed(speed);
    }

    pub fn stop(&mut self) {
        self.plan.stopped = true;
        self.backend.set_stopped(true);
    }

    pub fn resume(&mut self) {
        self.plan.stopped = false;
        self.backend.set_stopped(false);
    }

    pub fn is_stopped(&self) -> bool {
        self.plan.stopped
    }

    pub fn sample_reachable_point(&self, center: Vec3, radius: f32) -> Option<Vec3> {
        self.backend.sample_reachable_point(center, radius)
    }

    pub fn advance(&mut self, dt: f32) {
        self.backend.advance(dt);
    }

    pub fn plan(&self) -> MotionPlan {
        self.plan
    }

    /// Повторить сохранённый план на (новом) backend'е после restore
    pub fn replay(&mut self, plan: MotionPlan) {
        self.backend.set_speed(plan.speed);
        self.backend.set_stopped(plan.stopped);
        if let Some(destination) = plan.destination {
            self.backend.set_destination(destination);
        }
        self.plan = plan;
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::ScriptedNavigator;
    use super::*;

    fn adapter(nav: ScriptedNavigator) -> NavigationAdapter {
        NavigationAdapter::new(Box::new(nav), 1.0)
    }

    #[test]
    fn test_arrived_when_close_and_not_pending() {
        let nav = ScriptedNavigator {
            has_path: true,
            path_pending: false,
            remaining: 0.5,
            ..ScriptedNavigator::default()
        };
        assert!(adapter(nav).is_arrived());
    }

    #[test]
    fn test_not_arrived_while_pending() {
        let nav = ScriptedNavigator {
            has_path: true,
            path_pending: true,
            remaining: 0.0,
            ..ScriptedNavigator::default()
        };
        assert!(!adapter(nav).is_arrived());
    }

    #[test]
    fn test_not_arrived_without_path() {
        // Движок без пути отдаёт remaining = 0 — это не прибытие
        let nav = ScriptedNavigator {
            has_path: false,
            remaining: 0.0,
            ..ScriptedNavigator::default()
        };
        assert!(!adapter(nav).is_arrived());
    }

    #[test]
    fn test_threshold_is_strict() {
        let nav = ScriptedNavigator {
            has_path: true,
            remaining: 1.0,
            ..ScriptedNavigator::default()
        };
        assert!(!adapter(nav).is_arrived());
    }

    #[test]
    fn test_off_mesh_destination_reports_invalid_path() {
        let nav = ScriptedNavigator {
            accept_destinations: false,
            ..ScriptedNavigator::default()
        };
        let mut adapter = adapter(nav);

        assert!(!adapter.set_destination(Vec3::new(100.0, 0.0, 0.0)));
        assert!(!adapter.has_valid_path());
        assert_eq!(adapter.current_destination(), Some(Vec3::new(100.0, 0.0, 0.0)));
    }

    #[test]
    fn test_plan_tracks_speed_and_stop() {
        let mut adapter = adapter(ScriptedNavigator::default());
        adapter.set_speed(3.5);
        adapter.stop();
        assert!(adapter.is_stopped());
        adapter.resume();

        let plan = adapter.plan();
        assert_eq!(plan.speed, 3.5);
        assert!(!plan.stopped);
    }
}
