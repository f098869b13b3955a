//! KinematicNavigator — headless pathfinding без препятствий
//!
//! Прямая линия к цели с постоянной скоростью внутри walkable AABB.
//! Детерминистичен (никакого RNG), годится для тестов и headless прогонов.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::NavigationBackend;

/// Проходимая область (AABB). min.y == max.y → плоский пол
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkableBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl WalkableBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Плоский квадратный пол `[-half, half]` на высоте y = 0
    pub fn flat_square(half_extent: f32) -> Self {
        let half = half_extent.abs();
        Self::new(Vec3::new(-half, 0.0, -half), Vec3::new(half, 0.0, half))
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicNavigator {
    position: Vec3,
    destination: Option<Vec3>,
    speed: f32,
    stopped: bool,
    velocity: Vec3,
    bounds: Option<WalkableBounds>,
}

impl KinematicNavigator {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            destination: None,
            speed: 0.0,
            stopped: false,
            velocity: Vec3::ZERO,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: WalkableBounds) -> Self {
        self.position = bounds.clamp(self.position);
        self.bounds = Some(bounds);
        self
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Телепорт (spawn коррекция, тесты)
    pub fn warp(&mut self, position: Vec3) {
        self.position = match self.bounds {
            Some(bounds) => bounds.clamp(position),
            None => position,
        };
    }

    fn is_walkable(&self, point: Vec3) -> bool {
        self.bounds.map_or(true, |bounds| bounds.contains(point))
    }
}

impl NavigationBackend for KinematicNavigator {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_destination(&mut self, point: Vec3) -> bool {
        if self.is_walkable(point) {
            self.destination = Some(point);
            true
        } else {
            self.destination = None;
            false
        }
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
    }

    fn path_pending(&self) -> bool {
        false
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map_or(0.0, |destination| self.position.distance(destination))
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
        if stopped {
            self.velocity = Vec3::ZERO;
        }
    }

    fn sample_reachable_point(&self, center: Vec3, radius: f32) -> Option<Vec3> {
        let snapped = match self.bounds {
            Some(bounds) => bounds.clamp(center),
            None => center,
        };
        (snapped.distance(center) <= radius).then_some(snapped)
    }

    fn advance(&mut self, dt: f32) {
        let Some(destination) = self.destination else {
            self.velocity = Vec3::ZERO;
            return;
        };
        if self.stopped || dt <= 0.0 {
            self.velocity = Vec3::ZERO;
            return;
        }

        let offset = destination - self.position;
        let distance = offset.length();
        let step = self.speed * dt;

        if distance <= step || distance <= f32::EPSILON {
            self.position = destination;
            self.velocity = Vec3::ZERO;
        } else {
            let direction = offset / distance;
            self.position += direction * step;
            self.velocity = direction * self.speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_towards_destination_without_overshoot() {
        let mut nav = KinematicNavigator::new(Vec3::ZERO);
        nav.set_speed(2.0);
        assert!(nav.set_destination(Vec3::new(3.0, 0.0, 0.0)));

        nav.advance(1.0);
        assert_eq!(nav.position(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(nav.velocity(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(nav.remaining_distance(), 1.0);

        nav.advance(1.0);
        assert_eq!(nav.position(), Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(nav.velocity(), Vec3::ZERO);
        assert!(nav.has_path());
    }

    #[test]
    fn test_stopped_agent_holds_position() {
        let mut nav = KinematicNavigator::new(Vec3::ZERO);
        nav.set_speed(5.0);
        nav.set_destination(Vec3::new(10.0, 0.0, 0.0));
        nav.set_stopped(true);

        nav.advance(1.0);
        assert_eq!(nav.position(), Vec3::ZERO);
    }

    #[test]
    fn test_off_bounds_destination_has_no_path() {
        let mut nav = KinematicNavigator::new(Vec3::ZERO).with_bounds(WalkableBounds::flat_square(10.0));

        assert!(!nav.set_destination(Vec3::new(20.0, 0.0, 0.0)));
        assert!(!nav.has_path());
        assert_eq!(nav.remaining_distance(), 0.0);
    }

    #[test]
    fn test_sample_snaps_to_floor_within_radius() {
        let nav = KinematicNavigator::new(Vec3::ZERO).with_bounds(WalkableBounds::flat_square(10.0));

        assert_eq!(
            nav.sample_reachable_point(Vec3::new(1.0, 0.5, 1.0), 1.0),
            Some(Vec3::new(1.0, 0.0, 1.0))
        );
        // До края пола дальше радиуса → нет точки
        assert_eq!(nav.sample_reachable_point(Vec3::new(30.0, 0.0, 0.0), 5.0), None);
    }
}
