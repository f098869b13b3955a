//! Scripted navigation backend для unit тестов (значения выставляются руками).

use std::sync::Mutex;

use bevy::prelude::*;

use super::NavigationBackend;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SampleMode {
    /// Любая точка достижима как есть
    #[default]
    Always,
    /// Sample проходит только с radius ≤ limit
    MaxRadius(f32),
    Never,
}

#[derive(Debug)]
pub struct ScriptedNavigator {
    pub position: Vec3,
    pub destination: Option<Vec3>,
    pub has_path: bool,
    pub path_pending: bool,
    pub remaining: f32,
    pub velocity: Vec3,
    pub speed: f32,
    pub stopped: bool,
    pub accept_destinations: bool,
    pub sample_mode: SampleMode,
    /// (center, radius) каждого sample запроса
    pub samples: Mutex<Vec<(Vec3, f32)>>,
}

impl Default for ScriptedNavigator {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            destination: None,
            has_path: false,
            path_pending: false,
            remaining: 0.0,
            velocity: Vec3::ZERO,
            speed: 0.0,
            stopped: false,
            accept_destinations: true,
            sample_mode: SampleMode::Always,
            samples: Mutex::new(Vec::new()),
        }
    }
}

impl NavigationBackend for ScriptedNavigator {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_destination(&mut self, point: Vec3) -> bool {
        if self.accept_destinations {
            self.destination = Some(point);
            self.has_path = true;
            self.remaining = self.position.distance(point);
        } else {
            self.destination = None;
            self.has_path = false;
        }
        self.accept_destinations
    }

    fn has_path(&self) -> bool {
        self.has_path
    }

    fn path_pending(&self) -> bool {
        self.path_pending
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn sample_reachable_point(&self, center: Vec3, radius: f32) -> Option<Vec3> {
        if let Ok(mut samples) = self.samples.lock() {
            samples.push((center, radius));
        }
        match self.sample_mode {
            SampleMode::Always => Some(center),
            SampleMode::MaxRadius(limit) if radius <= limit => Some(center),
            SampleMode::MaxRadius(_) | SampleMode::Never => None,
        }
    }
}
