//! EnemyController — per-agent FSM (patrol / investigate / roar / chase / ending)
//!
//! Порядок тика:
//! 1. Ending активен → только countdown, всё остальное заморожено
//! 2. Perception → PlayerSignal
//! 3. Perception override (высший приоритет): Detected → Roaring/Chase
//! 4. Поведение активного состояния (может запросить переход)
//! 5. Effects Dispatcher → presentation нового состояния
//!
//! Детерминизм: весь рандом из seeded ChaCha8Rng внутри `EnemyBrain`,
//! таймеры уменьшаются на dt тика (не wall clock).

use std::fmt;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai::components::{EnemyState, EnemyStateKind, PendingAlerts, ALERT_DEDUP_EPSILON};
use crate::ai::effects::{Effect, EffectsDispatcher};
use crate::ai::ending::EndingSequencer;
use crate::ai::navigation::{
    pick_patrol_point, MotionPlan, NavigationAdapter, NavigationBackend, WaypointCursor,
};
use crate::ai::perception::{perceive, Perception, PlayerSighting, PlayerSignal};
use crate::config::{EnemyConfig, PatrolRoute};
use crate::error::{AiIssue, ConfigError};

/// Интервал между бросками "постоять посреди patrol'а" (секунды)
const IDLE_CHECK_MIN_SECS: f32 = 1.0;
const IDLE_CHECK_MAX_SECS: f32 = 3.0;

/// Фронтовые флаги для нефатальных проблем (чтобы не спамить каждый тик)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueLatch {
    player_missing: bool,
    patrol_unreachable: bool,
    unreachable_alerts: Vec<Vec3>,
}

/// Сериализуемое состояние агента (state + таймеры + alerts + RNG)
///
/// snapshot → restore воспроизводит те же переходы при тех же входах.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyBrain {
    pub state: EnemyState,
    pub alerts: PendingAlerts,
    pub patrol_center: Vec3,
    pub waypoints: WaypointCursor,
    pub effects: EffectsDispatcher,
    pub ending: EndingSequencer,
    /// План навигации на момент snapshot'а
    pub motion: MotionPlan,
    pub rng: ChaCha8Rng,
    pub issues: IssueLatch,
}

#[derive(Component)]
pub struct EnemyController {
    config: EnemyConfig,
    nav: NavigationAdapter,
    brain: EnemyBrain,
    outbox: Vec<Effect>,
    issues: Vec<AiIssue>,
}

impl EnemyController {
    /// Создать агента: валидация конфига, patrol center, seeded RNG, старт в Idle
    pub fn new(
        config: EnemyConfig,
        backend: Box<dyn NavigationBackend>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut nav = NavigationAdapter::new(backend, config.arrival_threshold);
        nav.set_speed(config.patrol_speed);
        let patrol_center = config.patrol_center.unwrap_or_else(|| nav.position());

        let brain = EnemyBrain {
            state: EnemyState::Idle { remaining: 0.0 },
            alerts: PendingAlerts::default(),
            patrol_center,
            waypoints: WaypointCursor::default(),
            effects: EffectsDispatcher::default(),
            ending: EndingSequencer::default(),
            motion: MotionPlan::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            issues: IssueLatch::default(),
        };

        let mut controller = Self {
            config,
            nav,
            brain,
            outbox: Vec::new(),
            issues: Vec::new(),
        };
        controller.enter_idle("spawned");
        controller.present(None);

        crate::log_info(&format!(
            "👻 {} spawned at {:?} (patrol center {:?}, seed {})",
            controller.config.label,
            controller.nav.position(),
            patrol_center,
            seed
        ));

        Ok(controller)
    }

    /// Восстановить агента из snapshot'а с новым (или тем же) navigation backend'ом
    pub fn restore(
        config: EnemyConfig,
        backend: Box<dyn NavigationBackend>,
        brain: EnemyBrain,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut nav = NavigationAdapter::new(backend, config.arrival_threshold);
        nav.replay(brain.motion);

        crate::log(&format!(
            "♻️ {} restored in {} at {:?}",
            config.label,
            brain.state.kind(),
            nav.position()
        ));

        Ok(Self {
            config,
            nav,
            brain,
            outbox: Vec::new(),
            issues: Vec::new(),
        })
    }

    pub fn snapshot(&self) -> EnemyBrain {
        let mut brain = self.brain.clone();
        brain.motion = self.nav.plan();
        brain
    }

    // ------------------------------------------------------------------
    // Public surface
    // ------------------------------------------------------------------

    /// Один тик симуляции
    pub fn update(&mut self, dt: f32, sighting: Option<PlayerSighting>) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if self.brain.ending.is_active() {
            self.tick_ending(dt);
            return;
        }

        let previous = self.brain.state.kind();
        self.note_player_presence(sighting.is_some());
        let perception = perceive(self.nav.position(), sighting.as_ref(), &self.config);

        if !self.apply_perception_override(&perception, sighting.as_ref()) {
            self.run_state(dt, &perception, sighting.as_ref());
        }

        self.present(Some(previous));
    }

    /// Внешний стимул (шум). false если alert дублирует очередь или отклонён.
    pub fn trigger_alert(&mut self, position: Vec3) -> bool {
        if self.brain.ending.is_active() {
            crate::log(&format!(
                "🔇 {}: alert at {:?} ignored (ending sequence active)",
                self.config.label, position
            ));
            return false;
        }
        if !self.config.investigate_enabled {
            return false;
        }
        if !position.is_finite() {
            crate::log_warning(&format!(
                "🔇 {}: alert with non-finite position {:?} rejected",
                self.config.label, position
            ));
            return false;
        }

        let added = self.brain.alerts.push(position);
        if added {
            crate::log(&format!(
                "📢 {}: alert at {:?} queued ({} pending, state {})",
                self.config.label,
                position,
                self.brain.alerts.len(),
                self.brain.state.kind()
            ));
        }
        added
    }

    pub fn current_state(&self) -> EnemyStateKind {
        self.brain.state.kind()
    }

    pub fn state(&self) -> &EnemyState {
        &self.brain.state
    }

    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.nav.position()
    }

    pub fn velocity(&self) -> Vec3 {
        self.nav.velocity()
    }

    pub fn patrol_center(&self) -> Vec3 {
        self.brain.patrol_center
    }

    pub fn pending_alerts(&self) -> &PendingAlerts {
        &self.brain.alerts
    }

    pub fn is_ending_sequence_active(&self) -> bool {
        self.brain.ending.is_active()
    }

    pub fn navigation(&self) -> &NavigationAdapter {
        &self.nav
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationAdapter {
        &mut self.nav
    }

    /// Продвинуть navigation backend (headless движки двигаются здесь)
    pub fn advance_navigation(&mut self, dt: f32) {
        self.nav.advance(dt);
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.outbox)
    }

    pub fn drain_issues(&mut self) -> Vec<AiIssue> {
        std::mem::take(&mut self.issues)
    }

    // ------------------------------------------------------------------
    // Perception override
    // ------------------------------------------------------------------

    fn apply_perception_override(
        &mut self,
        perception: &Perception,
        sighting: Option<&PlayerSighting>,
    ) -> bool {
        if perception.signal != PlayerSignal::Detected
            || !self.brain.state.accepts_perception_override()
        {
            return false;
        }
        let Some(sighting) = sighting else {
            return false;
        };

        if !self.brain.alerts.is_empty() {
            crate::log(&format!(
                "📢 {}: {} pending alerts superseded by player detection",
                self.config.label,
                self.brain.alerts.len()
            ));
            self.clear_alerts();
        }

        let distance = perception.distance.unwrap_or_default();
        if self.config.roar_enabled {
            self.enter_roaring(distance);
        } else {
            self.enter_chase(
                sighting.position,
                &format!("player detected at {:.1}m", distance),
            );
        }
        true
    }

    // ------------------------------------------------------------------
    // State behaviors
    // ------------------------------------------------------------------

    fn run_state(&mut self, dt: f32, perception: &Perception, sighting: Option<&PlayerSighting>) {
        match self.brain.state.clone() {
            EnemyState::Idle { remaining } => self.run_idle(dt, remaining),
            EnemyState::Patrol {
                destination,
                idle_check,
            } => self.run_patrol(dt, destination, idle_check),
            EnemyState::Investigate { target, linger } => {
                self.run_investigate(dt, target, linger, perception, sighting)
            }
            EnemyState::Roaring { remaining } => self.run_roaring(dt, remaining, sighting),
            EnemyState::Chase { frozen } => self.run_chase(frozen, perception, sighting),
            // Ending обрабатывается в update() до perception
            EnemyState::Ending => {}
        }
    }

    fn run_idle(&mut self, dt: f32, remaining: f32) {
        if self.try_begin_investigation() {
            return;
        }

        let remaining = remaining - dt;
        if remaining <= 0.0 {
            self.enter_patrol("idle timer expired");
        } else {
            self.brain.state = EnemyState::Idle { remaining };
        }
    }

    fn run_patrol(&mut self, dt: f32, destination: Vec3, idle_check: Option<f32>) {
        if self.try_begin_investigation() {
            return;
        }

        if self.nav.is_arrived() {
            self.enter_idle("arrived at patrol point");
            return;
        }
        if !self.nav.has_valid_path() {
            self.enter_patrol("patrol path lost, picking new point");
            return;
        }

        let Some(check) = idle_check else {
            return;
        };
        let check = check - dt;
        if check > 0.0 {
            self.brain.state = EnemyState::Patrol {
                destination,
                idle_check: Some(check),
            };
            return;
        }

        if self.brain.rng.gen::<f32>() < self.config.idle_chance_while_patrolling {
            self.enter_idle("random pause while patrolling");
        } else {
            self.brain.state = EnemyState::Patrol {
                destination,
                idle_check: self.draw_idle_check(),
            };
        }
    }

    fn run_investigate(
        &mut self,
        dt: f32,
        target: Option<Vec3>,
        linger: f32,
        perception: &Perception,
        sighting: Option<&PlayerSighting>,
    ) {
        let position = self.nav.position();

        let Some(current) = target else {
            // Осматриваемся. Новый alert прерывает осмотр.
            if let Some(next) = self.brain.alerts.nearest(position) {
                self.head_to_alert(next, "new alert while lingering");
                return;
            }
            let linger = linger - dt;
            if linger <= 0.0 {
                self.finish_investigation(perception, sighting);
            } else {
                self.brain.state = EnemyState::Investigate {
                    target: None,
                    linger,
                };
            }
            return;
        };

        // Ближайший мог смениться (новый alert ближе текущего)
        match self.brain.alerts.nearest(position) {
            Some(nearest) if !nearest.abs_diff_eq(current, ALERT_DEDUP_EPSILON) => {
                self.head_to_alert(nearest, "closer alert");
                return;
            }
            Some(_) => {}
            None => {
                // Текущий alert уже не в очереди — считаем разобранным
                self.after_alert_consumed(perception, sighting);
                return;
            }
        }

        if self.nav.is_arrived() {
            self.brain.alerts.remove(current);
            crate::log(&format!(
                "🔎 {}: reached alert {:?} ({} left)",
                self.config.label,
                current,
                self.brain.alerts.len()
            ));
            self.after_alert_consumed(perception, sighting);
        }
    }

    fn after_alert_consumed(&mut self, perception: &Perception, sighting: Option<&PlayerSighting>) {
        if let Some(next) = self.brain.alerts.nearest(self.nav.position()) {
            self.head_to_alert(next, "next alert");
            return;
        }

        if self.config.investigate_linger <= 0.0 {
            self.finish_investigation(perception, sighting);
        } else {
            self.nav.stop();
            self.brain.state = EnemyState::Investigate {
                target: None,
                linger: self.config.investigate_linger,
            };
        }
    }

    fn finish_investigation(&mut self, perception: &Perception, sighting: Option<&PlayerSighting>) {
        match sighting {
            Some(sighting) if perception.within(self.config.detection_range) => {
                self.enter_chase(sighting.position, "player nearby after investigation");
            }
            _ => self.enter_idle("alerts cleared"),
        }
    }

    fn run_roaring(&mut self, dt: f32, remaining: f32, sighting: Option<&PlayerSighting>) {
        let Some(sighting) = sighting else {
            self.enter_patrol("player reference lost while roaring");
            return;
        };

        let remaining = remaining - dt;
        if remaining <= 0.0 {
            self.enter_chase(sighting.position, "roar finished");
        } else {
            self.brain.state = EnemyState::Roaring { remaining };
        }
    }

    fn run_chase(&mut self, frozen: bool, perception: &Perception, sighting: Option<&PlayerSighting>) {
        let Some(sighting) = sighting else {
            self.enter_patrol("player reference lost while chasing");
            return;
        };

        if perception.signal == PlayerSignal::Lost {
            let distance = perception.distance.unwrap_or_default();
            self.enter_patrol(&format!("player beyond lose range ({:.1}m)", distance));
            return;
        }

        if self.config.freeze_when_watched && perception.watched {
            if !frozen {
                self.nav.stop();
                crate::log(&format!("🗿 {}: watched by player, freezing", self.config.label));
            }
            self.brain.state = EnemyState::Chase { frozen: true };
            return;
        }

        if frozen {
            self.nav.resume();
        }
        // Steering: цель обновляется каждый тик
        self.nav.set_speed(self.config.chase_speed);
        self.nav.set_destination(sighting.position);
        self.brain.state = EnemyState::Chase { frozen: false };

        if perception.within(self.config.jumpscare_distance) {
            self.enter_ending();
        }
    }

    fn try_begin_investigation(&mut self) -> bool {
        if !self.config.investigate_enabled {
            return false;
        }
        match self.brain.alerts.nearest(self.nav.position()) {
            Some(target) => {
                self.head_to_alert(target, "alert pending");
                true
            }
            None => false,
        }
    }

    fn tick_ending(&mut self, dt: f32) {
        if self.brain.ending.tick(dt) {
            crate::log_info(&format!(
                "🎬 {}: ending countdown elapsed → loading scene '{}'",
                self.config.label, self.config.target_scene
            ));
            self.outbox.push(Effect::LoadScene {
                scene: self.config.target_scene.clone(),
            });
        }
    }

    // ------------------------------------------------------------------
    // State entries (навигационные команды + смена состояния)
    // ------------------------------------------------------------------

    fn enter_idle(&mut self, reason: &str) {
        let remaining = self.draw_idle_time();
        self.nav.stop();
        self.transition(EnemyState::Idle { remaining }, reason);
    }

    fn enter_patrol(&mut self, reason: &str) {
        self.nav.set_speed(self.config.patrol_speed);
        self.nav.resume();

        // Точка, на которую движок не строит путь, = нет patrol точки
        let planned = self.next_patrol_point().and_then(|destination| {
            if self.nav.set_destination(destination) {
                Ok(destination)
            } else {
                Err(AiIssue::NoReachablePatrolPoint {
                    center: self.brain.patrol_center,
                    radius: self.config.patrol_radius,
                })
            }
        });

        match planned {
            Ok(destination) => {
                self.brain.issues.patrol_unreachable = false;
                let idle_check = self.draw_idle_check();
                self.transition(
                    EnemyState::Patrol {
                        destination,
                        idle_check,
                    },
                    reason,
                );
            }
            Err(issue) => {
                if !self.brain.issues.patrol_unreachable {
                    self.brain.issues.patrol_unreachable = true;
                    self.raise(issue);
                }
                self.enter_idle("no reachable patrol point, holding position");
            }
        }
    }

    fn head_to_alert(&mut self, target: Vec3, reason: &str) {
        self.nav.set_speed(self.config.investigate_speed());
        self.nav.resume();
        if !self.nav.set_destination(target) {
            self.report_unreachable_alert(target);
        }

        if self.brain.state.kind() == EnemyStateKind::Investigate {
            crate::log(&format!(
                "🔎 {}: investigating {:?} ({})",
                self.config.label, target, reason
            ));
        }
        self.transition(
            EnemyState::Investigate {
                target: Some(target),
                linger: self.config.investigate_linger,
            },
            reason,
        );
    }

    fn enter_roaring(&mut self, distance: f32) {
        self.nav.stop();
        self.transition(
            EnemyState::Roaring {
                remaining: self.config.roar_duration,
            },
            &format!("player detected at {:.1}m", distance),
        );
    }

    fn enter_chase(&mut self, player_position: Vec3, reason: &str) {
        self.nav.set_speed(self.config.chase_speed);
        self.nav.resume();
        self.nav.set_destination(player_position);
        self.transition(EnemyState::Chase { frozen: false }, reason);
    }

    fn enter_ending(&mut self) {
        self.nav.stop();
        self.clear_alerts();
        if self.brain.ending.begin(self.config.ending_duration) {
            crate::log_info(&format!(
                "💀 {}: JUMPSCARE! scene '{}' in {:.1}s",
                self.config.label, self.config.target_scene, self.config.ending_duration
            ));
        }
        self.transition(EnemyState::Ending, "player within jumpscare distance");
    }

    fn transition(&mut self, next: EnemyState, reason: &str) {
        let from = self.brain.state.kind();
        let to = next.kind();
        if from != to {
            crate::log(&format!("{}: {} → {} ({})", self.config.label, from, to, reason));
        }
        self.brain.state = next;
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn draw_idle_time(&mut self) -> f32 {
        let (min, max) = (self.config.min_idle_time, self.config.max_idle_time);
        if max > min {
            self.brain.rng.gen_range(min..=max)
        } else {
            min
        }
    }

    fn draw_idle_check(&mut self) -> Option<f32> {
        if self.config.idle_chance_while_patrolling > 0.0 {
            Some(
                self.brain
                    .rng
                    .gen_range(IDLE_CHECK_MIN_SECS..=IDLE_CHECK_MAX_SECS),
            )
        } else {
            None
        }
    }

    /// |velocity| / заданная скорость, 0..=1 (стоим → 0)
    fn normalized_speed(&self) -> f32 {
        let plan = self.nav.plan();
        if plan.stopped || plan.speed <= 0.0 {
            return 0.0;
        }
        let normalized = self.nav.velocity().length() / plan.speed;
        if normalized.is_finite() {
            normalized.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn next_patrol_point(&mut self) -> Result<Vec3, AiIssue> {
        match &self.config.patrol_route {
            PatrolRoute::RandomInRadius => pick_patrol_point(
                &mut self.brain.rng,
                &self.nav,
                self.brain.patrol_center,
                self.config.patrol_radius,
                self.config.fallback_patrol_radius,
            ),
            PatrolRoute::Waypoints(points) => self
                .brain
                .waypoints
                .next_index(&mut self.brain.rng, points.len())
                .and_then(|index| points.get(index).copied())
                .ok_or(AiIssue::NoReachablePatrolPoint {
                    center: self.brain.patrol_center,
                    radius: self.config.patrol_radius,
                }),
        }
    }

    fn note_player_presence(&mut self, present: bool) {
        if present {
            self.brain.issues.player_missing = false;
        } else if !self.brain.issues.player_missing {
            self.brain.issues.player_missing = true;
            self.raise(AiIssue::MissingPlayerReference);
        }
    }

    fn report_unreachable_alert(&mut self, target: Vec3) {
        let known = self
            .brain
            .issues
            .unreachable_alerts
            .iter()
            .any(|p| p.abs_diff_eq(target, ALERT_DEDUP_EPSILON));
        if !known {
            self.brain.issues.unreachable_alerts.push(target);
            self.raise(AiIssue::InvalidAlertPosition(target));
        }
    }

    fn clear_alerts(&mut self) {
        self.brain.alerts.clear();
        self.brain.issues.unreachable_alerts.clear();
    }

    fn raise(&mut self, issue: AiIssue) {
        crate::log_warning(&format!("⚠️ {}: {}", self.config.label, issue));
        self.issues.push(issue);
    }

    fn present(&mut self, previous: Option<EnemyStateKind>) {
        self.brain
            .effects
            .present(previous, &self.brain.state, &self.config, &mut self.outbox);
        let speed = self.normalized_speed();
        self.brain.effects.present_speed(speed, &mut self.outbox);
    }
}

impl fmt::Debug for EnemyController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnemyController")
            .field("label", &self.config.label)
            .field("state", &self.brain.state)
            .field("position", &self.nav.position())
            .field("pending_alerts", &self.brain.alerts.len())
            .field("ending_active", &self.brain.ending.is_active())
            .finish()
    }
}
