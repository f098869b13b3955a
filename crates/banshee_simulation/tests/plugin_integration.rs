//! Integration тесты EnemyAIPlugin (headless App, 60Hz FixedUpdate)
//!
//! Проверяем ECS обвязку: резолв игрока, роутинг alert'ов, events из outbox'а,
//! Transform sync. Логика FSM покрыта unit тестами контроллера.

use bevy::prelude::*;
use banshee_simulation::{
    create_headless_app, spawn_enemy, AiIssue, AlertTriggered, Effect, EnemyAISystems,
    EnemyConfig, EnemyController, EnemyEffect, EnemyIssueRaised, EnemyState, EnemyStateChanged,
    EnemyStateKind, EnemyStatus, KinematicNavigator, Player, PlayerTarget, SightingHints,
    WalkableBounds,
};

/// Всё что враги отдали наружу за прогон
#[derive(Resource, Default)]
struct Collected {
    effects: Vec<EnemyEffect>,
    transitions: Vec<EnemyStateChanged>,
    issues: Vec<EnemyIssueRaised>,
}

fn collect_enemy_events(
    mut effects: EventReader<EnemyEffect>,
    mut transitions: EventReader<EnemyStateChanged>,
    mut issues: EventReader<EnemyIssueRaised>,
    mut collected: ResMut<Collected>,
) {
    collected.effects.extend(effects.read().cloned());
    collected.transitions.extend(transitions.read().copied());
    collected.issues.extend(issues.read().cloned());
}

fn test_app() -> App {
    let mut app = create_headless_app(7);
    app.init_resource::<Collected>()
        .add_systems(FixedUpdate, collect_enemy_events.after(EnemyAISystems));
    // Первый update только запускает часы (delta = 0, FixedUpdate не тикает)
    app.update();
    app
}

fn waiting_config() -> EnemyConfig {
    EnemyConfig {
        min_idle_time: 100.0,
        max_idle_time: 100.0,
        ..EnemyConfig::default()
    }
}

fn spawn_at(app: &mut App, config: EnemyConfig, position: Vec3) -> Entity {
    let navigator = KinematicNavigator::new(position).with_bounds(WalkableBounds::flat_square(50.0));
    spawn_enemy(app.world_mut(), config, navigator).expect("valid config")
}

fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

fn status(app: &App, enemy: Entity) -> EnemyStatus {
    *app.world().get::<EnemyStatus>(enemy).expect("enemy has status")
}

#[test]
fn test_player_target_resolved_once() {
    let mut app = test_app();
    let enemy = spawn_at(&mut app, waiting_config(), Vec3::ZERO);
    let player = app
        .world_mut()
        .spawn((Player, Transform::from_xyz(100.0, 0.0, 0.0)))
        .id();

    run(&mut app, 1);
    assert_eq!(app.world().get::<PlayerTarget>(enemy), Some(&PlayerTarget(Some(player))));

    // Второй "игрок" не перехватывает уже привязанного врага
    app.world_mut().spawn((Player, Transform::from_xyz(1.0, 0.0, 0.0)));
    run(&mut app, 5);
    assert_eq!(app.world().get::<PlayerTarget>(enemy), Some(&PlayerTarget(Some(player))));
    assert_eq!(status(&app, enemy).state, EnemyStateKind::Idle);
}

#[test]
fn test_full_encounter_ends_with_single_scene_load() {
    let mut app = test_app();
    let config = EnemyConfig {
        roar_duration: 0.5,
        ending_duration: 0.5,
        target_scene: "GameOver".to_string(),
        ..waiting_config()
    };
    let enemy = spawn_at(&mut app, config, Vec3::ZERO);
    app.world_mut()
        .spawn((Player, Transform::from_xyz(6.0, 0.0, 0.0)));

    run(&mut app, 600);

    let collected = app.world().resource::<Collected>();
    let path: Vec<(EnemyStateKind, EnemyStateKind)> = collected
        .transitions
        .iter()
        .map(|transition| (transition.from, transition.to))
        .collect();
    assert_eq!(
        path,
        vec![
            (EnemyStateKind::Idle, EnemyStateKind::Roaring),
            (EnemyStateKind::Roaring, EnemyStateKind::Chase),
            (EnemyStateKind::Chase, EnemyStateKind::Ending),
        ]
    );

    let count = |wanted: &Effect| {
        collected
            .effects
            .iter()
            .filter(|event| event.enemy == enemy && &event.effect == wanted)
            .count()
    };
    assert_eq!(count(&Effect::PlayOneShot { clip: "banshee_roar".to_string() }), 1);
    assert_eq!(count(&Effect::DisablePlayerControl), 1);
    assert_eq!(count(&Effect::EnableEndingCamera), 1);
    assert_eq!(count(&Effect::LoadScene { scene: "GameOver".to_string() }), 1);

    let status = status(&app, enemy);
    assert_eq!(status.state, EnemyStateKind::Ending);
    assert!(status.ending_active);
}

#[test]
fn test_targeted_alert_reaches_only_its_enemy() {
    let mut app = test_app();
    let listener = spawn_at(&mut app, waiting_config(), Vec3::ZERO);
    let bystander = spawn_at(&mut app, waiting_config(), Vec3::new(-20.0, 0.0, 0.0));
    app.world_mut()
        .spawn((Player, Transform::from_xyz(500.0, 0.0, 500.0)));

    app.world_mut()
        .send_event(AlertTriggered::to_enemy(listener, Vec3::new(5.0, 0.0, 0.0)));
    run(&mut app, 1);

    let listener_status = status(&app, listener);
    assert_eq!(listener_status.state, EnemyStateKind::Investigate);
    assert_eq!(listener_status.pending_alerts, 1);
    assert_eq!(status(&app, bystander).state, EnemyStateKind::Idle);
}

#[test]
fn test_broadcast_alert_reaches_every_enemy() {
    let mut app = test_app();
    let a = spawn_at(&mut app, waiting_config(), Vec3::ZERO);
    let b = spawn_at(&mut app, waiting_config(), Vec3::new(0.0, 0.0, 10.0));
    app.world_mut()
        .spawn((Player, Transform::from_xyz(500.0, 0.0, 500.0)));

    app.world_mut()
        .send_event(AlertTriggered::broadcast(Vec3::new(5.0, 0.0, 5.0)));
    run(&mut app, 1);

    assert_eq!(status(&app, a).state, EnemyStateKind::Investigate);
    assert_eq!(status(&app, b).state, EnemyStateKind::Investigate);
}

#[test]
fn test_missing_player_raises_single_issue() {
    let mut app = test_app();
    let enemy = spawn_at(&mut app, waiting_config(), Vec3::ZERO);

    run(&mut app, 30);

    let collected = app.world().resource::<Collected>();
    assert_eq!(
        collected.issues,
        vec![EnemyIssueRaised {
            enemy,
            issue: AiIssue::MissingPlayerReference
        }]
    );
    assert_eq!(status(&app, enemy).state, EnemyStateKind::Idle);
}

#[test]
fn test_watched_stalker_holds_still() {
    let mut app = test_app();
    let config = EnemyConfig {
        min_idle_time: 100.0,
        max_idle_time: 100.0,
        ..EnemyConfig::stalker()
    };
    let enemy = spawn_at(&mut app, config, Vec3::ZERO);
    app.world_mut()
        .spawn((Player, Transform::from_xyz(10.0, 0.0, 0.0)));
    app.world_mut().entity_mut(enemy).insert(SightingHints {
        line_of_sight: Some(true),
        watched_by_player: true,
    });

    run(&mut app, 2);
    let frozen_at = app.world().get::<Transform>(enemy).expect("transform").translation;
    run(&mut app, 30);

    let controller = app.world().get::<EnemyController>(enemy).expect("controller");
    assert_eq!(controller.state(), &EnemyState::Chase { frozen: true });
    assert_eq!(app.world().get::<Transform>(enemy).expect("transform").translation, frozen_at);

    // Отвернулся — двинулся
    app.world_mut().entity_mut(enemy).insert(SightingHints {
        line_of_sight: Some(true),
        watched_by_player: false,
    });
    run(&mut app, 10);
    let moved_to = app.world().get::<Transform>(enemy).expect("transform").translation;
    assert!(moved_to.x > frozen_at.x, "stalker did not resume: {:?}", moved_to);
}

#[test]
fn test_transform_follows_navigation() {
    let mut app = test_app();
    let config = EnemyConfig {
        min_idle_time: 0.0,
        max_idle_time: 0.0,
        ..EnemyConfig::default()
    };
    let enemy = spawn_at(&mut app, config, Vec3::ZERO);
    app.world_mut()
        .spawn((Player, Transform::from_xyz(500.0, 0.0, 500.0)));

    run(&mut app, 120);

    let controller_position = app
        .world()
        .get::<EnemyController>(enemy)
        .expect("controller")
        .position();
    let transform = app.world().get::<Transform>(enemy).expect("transform");
    assert_eq!(transform.translation, controller_position);
    assert_ne!(controller_position, Vec3::ZERO, "enemy never left spawn");
}
