//! Выбор patrol точек (чистые функции от seeded RNG → детерминизм в тестах)

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::NavigationAdapter;
use crate::error::AiIssue;

/// Равномерная точка внутри сферы (rejection sampling в кубе)
pub fn random_point_in_sphere<R: Rng + ?Sized>(rng: &mut R, center: Vec3, radius: f32) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if candidate.length_squared() <= 1.0 {
            return center + candidate * radius;
        }
    }
}

/// Случайная достижимая patrol точка
///
/// 1. Сфера `radius` вокруг patrol center → sample на NavMesh
/// 2. Fallback (один раз): сфера `fallback_radius` вокруг самого агента
/// 3. Иначе `NoReachablePatrolPoint` — агент остаётся на месте
pub fn pick_patrol_point<R: Rng + ?Sized>(
    rng: &mut R,
    nav: &NavigationAdapter,
    center: Vec3,
    radius: f32,
    fallback_radius: f32,
) -> Result<Vec3, AiIssue> {
    let candidate = random_point_in_sphere(rng, center, radius);
    if let Some(point) = nav.sample_reachable_point(candidate, radius) {
        return Ok(point);
    }

    let agent_position = nav.position();
    let fallback = random_point_in_sphere(rng, agent_position, fallback_radius);
    if let Some(point) = nav.sample_reachable_point(fallback, fallback_radius) {
        crate::log(&format!(
            "🧭 Patrol: primary sample failed, fallback point {:?}",
            point
        ));
        return Ok(point);
    }

    Err(AiIssue::NoReachablePatrolPoint { center, radius })
}

/// Курсор по фиксированным waypoint'ам: перемешанный порядок,
/// reshuffle после полного круга (Fisher–Yates через `SliceRandom`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointCursor {
    order: Vec<usize>,
    next: usize,
}

impl WaypointCursor {
    /// Индекс следующего waypoint'а; None если waypoint'ов нет
    pub fn next_index<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }

        // Первый вызов или сменилось число точек (hot-reload конфига)
        if self.order.len() != count {
            self.order = (0..count).collect();
            self.order.shuffle(rng);
            self.next = 0;
        }

        let index = self.order.get(self.next).copied();
        self.next += 1;
        if self.next >= count {
            self.next = 0;
            self.order.shuffle(rng);
        }
        index
    }
}
