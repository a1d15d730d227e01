//! Тесты детерминизма
//!
//! Одинаковый seed + одинаковый поток intent → идентичное состояние оружия,
//! health и идентичные трассы выстрелов.

use bevy::prelude::*;
use gunline_simulation::*;
use std::sync::Arc;

#[derive(Resource, Default)]
struct TraceLog(Vec<String>);

fn record_traces(mut log: ResMut<TraceLog>, mut traces: EventReader<ShotTrace>) {
    for trace in traces.read() {
        log.0.push(format!("{:?}", trace));
    }
}

/// Скриптованный поток intent: очереди, перезарядки, прицеливание
fn scripted_intent(tick: usize) -> WeaponIntent {
    WeaponIntent {
        fire_held: tick % 150 < 90,
        reload_pressed: tick % 150 == 120,
        aim_held: tick % 300 >= 150,
        ..Default::default()
    }
}

/// Запускает симуляцию и возвращает (snapshot мира, трассы)
fn run_simulation(seed: u64, tick_count: usize) -> (Vec<u8>, Vec<String>) {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin::default())
        .init_resource::<TraceLog>()
        .add_systems(FixedUpdate, record_traces.after(TickSet::HitResolution));
    app.update();

    let shooters: Vec<Entity> = [
        (WeaponProfile::assault_rifle(), Vec3::new(-2.0, 0.0, 0.0)),
        (WeaponProfile::smg(), Vec3::new(2.0, 0.0, 0.0)),
    ]
    .into_iter()
    .map(|(profile, position)| {
        spawn_shooter(
            &mut app.world_mut().commands(),
            Arc::new(profile),
            Transform::from_translation(position),
        )
    })
    .collect();

    for index in 0..5 {
        spawn_target(
            &mut app.world_mut().commands(),
            Vec3::new(index as f32 * 1.5 - 3.0, 0.0, -25.0),
            0.6,
            200,
        );
    }
    app.world_mut().flush();

    for tick in 0..tick_count {
        for &shooter in &shooters {
            *app.world_mut().get_mut::<WeaponIntent>(shooter).unwrap() = scripted_intent(tick);
        }
        app.update();
    }

    let mut snapshot = world_snapshot::<Weapon>(app.world_mut());
    snapshot.extend(world_snapshot::<Health>(app.world_mut()));
    snapshot.extend(world_snapshot::<ViewFeedback>(app.world_mut()));

    let traces = app.world_mut().resource_mut::<TraceLog>().0.drain(..).collect();
    (snapshot, traces)
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 600;

    let (snapshot1, traces1) = run_simulation(SEED, TICK_COUNT);
    let (snapshot2, traces2) = run_simulation(SEED, TICK_COUNT);

    assert!(!traces1.is_empty());
    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
    assert_eq!(traces1, traces2);
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 300;

    // Запускаем 3 раза — все должны быть идентичны
    let runs: Vec<_> = (0..3).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, run) in runs.iter().enumerate().skip(1) {
        assert_eq!(
            runs[0], *run,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_different_seed_changes_spread() {
    let (_, traces_a) = run_simulation(1, 300);
    let (_, traces_b) = run_simulation(2, 300);

    assert_eq!(traces_a.len(), traces_b.len(), "fire cadence does not depend on seed");
    assert_ne!(traces_a, traces_b);
}
