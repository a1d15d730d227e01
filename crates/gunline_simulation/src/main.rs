//! Headless симуляция Gunline
//!
//! Стрелок с автоматом стреляет очередями по двум целям, перезаряжается
//! и переключает оружие. Печатает HUD и health целей.
//!
//! `gunline_simulation [debug|info|warning|error]`

use bevy::prelude::*;
use gunline_simulation::*;
use std::sync::Arc;

fn main() {
    let seed = 42;
    println!("Starting Gunline headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    // Первый аргумент: уровень логов (debug|info|warning|error)
    let log_level = match std::env::args().nth(1).map(|arg| arg.parse::<LogLevel>()) {
        Some(Ok(level)) => level,
        Some(Err(err)) => {
            log_warning(&format!("{}, falling back to info", err));
            LogLevel::Info
        }
        None => LogLevel::Info,
    };
    app.add_plugins(SimulationPlugin {
        log_level,
        ..Default::default()
    });
    app.update();

    let catalog = app.world().resource::<WeaponCatalog>().clone();
    let Some(rifle) = catalog.find("assault_rifle").map(Arc::clone) else {
        log_error("assault_rifle preset missing from catalog");
        return;
    };

    let shooter = spawn_shooter(
        &mut app.world_mut().commands(),
        rifle,
        Transform::from_xyz(0.0, 1.6, 0.0),
    );
    let near = spawn_target(&mut app.world_mut().commands(), Vec3::new(0.0, 1.6, -15.0), 0.8, 150);
    let far = spawn_target(&mut app.world_mut().commands(), Vec3::new(0.5, 1.6, -30.0), 0.8, 100);
    app.world_mut().flush();
    app.world_mut().entity_mut(far).insert(DespawnOnDeath { delay: 1.0 });
    let targets = [near, far];

    // Запускаем 1000 тиков симуляции (~15.6 sec при 64Hz)
    for tick in 0..1000 {
        let intent = WeaponIntent {
            fire_held: tick % 200 < 120,
            reload_pressed: tick % 200 == 150,
            ..Default::default()
        };
        if let Some(mut current) = app.world_mut().get_mut::<WeaponIntent>(shooter) {
            *current = intent;
        }
        if tick == 800 {
            app.world_mut().send_event(CycleWeaponIntent { entity: shooter });
        }

        app.update();

        if tick % 100 == 0 {
            print_status(&app, tick, shooter, &targets);
        }
    }

    println!("Simulation complete!");
}

fn print_status(app: &App, tick: usize, shooter: Entity, targets: &[Entity]) {
    let world = app.world();

    if let Some(weapon) = world.get::<Weapon>(shooter) {
        let hud = weapon.hud();
        println!(
            "Tick {}: {} {}/{}{}{}{} spread {:.2}",
            tick,
            weapon.profile().name,
            hud.ammo_loaded,
            hud.ammo_reserve,
            if hud.reloading { " [reloading]" } else { "" },
            if hud.needs_reload { " [reload!]" } else { "" },
            if hud.low_ammo { " [low]" } else { "" },
            weapon.spread()
        );
    }

    for &target in targets {
        match world.get::<Health>(target) {
            Some(health) if world.get::<Dead>(target).is_some() => {
                println!("  target {:?}: dead ({}/{})", target, health.current(), health.max())
            }
            Some(health) => println!("  target {:?}: {}/{}", target, health.current(), health.max()),
            None => println!("  target {:?}: despawned", target),
        }
    }
}
