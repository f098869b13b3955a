//! Headless симуляция BANSHEE
//!
//! Сценарий: игрок шумит (alert), враг идёт проверять, потом игрок
//! подходит вплотную → roar → chase → jumpscare → загрузка сцены.
//!
//! `banshee_simulation [config.json]`, уровень логов через `BANSHEE_LOG`.

use bevy::prelude::*;
use banshee_simulation::{
    create_headless_app, init_logger, log_error, log_info, set_log_level, spawn_enemy, Effect,
    EnemyConfig, EnemyEffect, EnemyStateChanged, EnemyStatus, KinematicNavigator, LogLevel, Player,
    WalkableBounds, AlertTriggered,
};

const MAX_TICKS: usize = 60 * 120;

/// Собранные за прогон события (читается после каждого update)
#[derive(Resource, Default)]
struct RunReport {
    transitions: Vec<EnemyStateChanged>,
    scene_requested: Option<String>,
}

fn record_enemy_events(
    mut effects: EventReader<EnemyEffect>,
    mut transitions: EventReader<EnemyStateChanged>,
    mut report: ResMut<RunReport>,
) {
    for transition in transitions.read() {
        report.transitions.push(*transition);
    }
    for event in effects.read() {
        match &event.effect {
            Effect::LoadScene { scene } => report.scene_requested = Some(scene.clone()),
            Effect::AnimationSpeed(_) => {}
            other => log_info(&format!("🎭 {:?}: {:?}", event.enemy, other)),
        }
    }
}

fn load_config() -> Result<EnemyConfig, banshee_simulation::ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => EnemyConfig::from_path(path),
        None => Ok(EnemyConfig::default()),
    }
}

fn main() {
    init_logger();
    if let Some(level) = std::env::var("BANSHEE_LOG").ok().as_deref().and_then(LogLevel::parse) {
        set_log_level(level);
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(error) => {
            log_error(&format!("❌ Invalid enemy config: {}", error));
            std::process::exit(1);
        }
    };

    let seed = 42;
    log_info(&format!("Starting BANSHEE headless simulation (seed: {})", seed));

    let mut app = create_headless_app(seed);
    app.init_resource::<RunReport>()
        .add_systems(FixedUpdate, record_enemy_events.after(banshee_simulation::EnemyAISystems));

    let navigator = KinematicNavigator::new(Vec3::ZERO).with_bounds(WalkableBounds::flat_square(40.0));
    let enemy = match spawn_enemy(app.world_mut(), config, navigator) {
        Ok(enemy) => enemy,
        Err(error) => {
            log_error(&format!("❌ Failed to spawn enemy: {}", error));
            std::process::exit(1);
        }
    };
    let player = app
        .world_mut()
        .spawn((Player, Transform::from_xyz(35.0, 0.0, 35.0)))
        .id();

    // Игрок роняет что-то в стороне
    app.world_mut()
        .send_event(AlertTriggered::broadcast(Vec3::new(8.0, 0.0, -6.0)));

    for tick in 0..MAX_TICKS {
        // Через 20 секунд игрок идёт к врагу
        if tick > 60 * 20 {
            let target = app
                .world()
                .get::<Transform>(enemy)
                .map(|transform| transform.translation)
                .unwrap_or_default();
            if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
                let offset = target - transform.translation;
                if offset.length() > 0.5 {
                    transform.translation += offset.normalize() * (3.0 / 60.0);
                }
            }
        }

        app.update();

        if tick % 600 == 0 {
            if let Some(status) = app.world().get::<EnemyStatus>(enemy) {
                log_info(&format!("Tick {}: {:?}", tick, status));
            }
        }
        if app.world().resource::<RunReport>().scene_requested.is_some() {
            break;
        }
    }

    let report = app.world().resource::<RunReport>();
    for transition in &report.transitions {
        log_info(&format!("  {} → {}", transition.from, transition.to));
    }
    match &report.scene_requested {
        Some(scene) => log_info(&format!("Simulation complete: scene '{}' requested", scene)),
        None => log_info("Simulation complete: player survived"),
    }
}
