//! BANSHEE Simulation Core
//!
//! Enemy AI для horror игры на Bevy 0.16 ECS (headless, без рендера).
//!
//! HYBRID ARCHITECTURE:
//! - Simulation = решения (FSM, perception, alert'ы, ending)
//! - Хост (Godot/Unity/headless runner) = pathfinding, анимации, звук, сцены
//!
//! Хост внедряет `NavigationBackend`, исполняет `Effect`'ы из outbox'а.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod components;
pub mod config;
pub mod error;
pub mod logger;

// Re-export базовых типов для удобства
pub use ai::{
    AlertTriggered, Effect, EnemyAIPlugin, EnemyAISystems, EnemyBrain, EnemyController,
    EnemyEffect, EnemyIssueRaised, EnemyState, EnemyStateChanged, EnemyStateKind,
    KinematicNavigator, NavigationBackend, PlayerSighting, WalkableBounds,
};
pub use components::*;
pub use config::{EnemyConfig, PatrolRoute};
pub use error::{AiIssue, ConfigError};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};

/// Частота simulation tick
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .add_plugins(EnemyAIPlugin);

        // Детерминистичный RNG (seed по умолчанию, если хост не поставил свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Раздаёт seed'ы контроллерам при spawn'е: один seed мира → одинаковые
/// patrol точки и idle таймеры у всех врагов при повторном прогоне.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время шагает ровно на один fixed tick за `app.update()` (не wall clock),
/// поэтому прогоны детерминистичны.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )))
        .add_plugins(SimulationPlugin);

    app
}

/// Заспавнить врага с внедрённым navigation backend'ом
///
/// Seed контроллера берётся из `DeterministicRng` мира.
pub fn spawn_enemy(
    world: &mut World,
    config: EnemyConfig,
    navigator: impl NavigationBackend,
) -> Result<Entity, ConfigError> {
    let seed = world
        .get_resource_mut::<DeterministicRng>()
        .map(|mut rng| rng.next_seed())
        .unwrap_or_default();

    let position = navigator.position();
    let label = config.label.clone();
    let controller = EnemyController::new(config, Box::new(navigator), seed)?;
    let status = EnemyStatus {
        state: controller.current_state(),
        ..EnemyStatus::default()
    };

    let entity = world
        .spawn((
            Name::new(label),
            controller,
            PlayerTarget::default(),
            SightingHints::default(),
            status,
            Transform::from_translation(position),
        ))
        .id();

    Ok(entity)
}

/// Snapshot мира для сравнения детерминизма
/// (через Debug; полноценный snapshot врага — `EnemyController::snapshot`)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
