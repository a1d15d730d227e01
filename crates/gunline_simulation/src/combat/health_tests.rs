//! Tests for health ledger + health systems.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    use crate::authority::{AuthorityGate, NetworkRole};
    use crate::combat::systems::{
        despawn_after_timeout, handle_deaths, process_damage_intents, process_heal_intents,
    };
    use crate::combat::{
        DamageIntent, Dead, DespawnOnDeath, EntityDied, HealIntent, Health, HealthChanged,
    };

    #[test]
    fn test_health_clamps_to_range() {
        let mut health = Health::new(100);

        let change = health.take_damage(30);
        assert_eq!((change.previous, change.current), (100, 70));
        assert!(!change.died);

        let change = health.heal(1000);
        assert_eq!(change.current, 100);
        assert_eq!(health.current(), health.max());

        let change = health.take_damage(500); // Saturating sub
        assert_eq!(change.current, 0);
        assert!(change.died);
    }

    #[test]
    fn test_heal_at_zero_is_noop() {
        let mut health = Health::new(100);
        health.take_damage(120);

        let change = health.heal(50);
        assert!(!change.changed());
        assert_eq!(health.current(), 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_death_only_on_transition() {
        let mut health = Health::new(50);
        assert!(health.take_damage(50).died);

        // Повторный урон по трупу — no-op, без второй смерти
        let change = health.take_damage(10);
        assert!(!change.died);
        assert!(!change.changed());
        assert_eq!(health.current(), 0);
    }

    #[test]
    fn test_with_current_clamps() {
        let health = Health::with_current(150, 100);
        assert_eq!(health.current(), 100);
        assert!(Health::with_current(0, 100).current() == 0);
        assert!(!Health::with_current(0, 100).is_alive());
    }

    #[test]
    fn test_health_stays_in_range_for_mixed_sequence() {
        let mut health = Health::new(80);
        let mut deaths = 0;

        for (index, amount) in [15, 40, 7, 90, 3, 200, 1, 64, 33].iter().enumerate() {
            let change = if index % 3 == 2 {
                health.heal(*amount)
            } else {
                health.take_damage(*amount)
            };
            if change.died {
                deaths += 1;
            }
            assert!(health.current() <= health.max());
        }

        // Каждая смерть — отдельное пересечение нуля
        assert!(deaths >= 1);
    }

    #[derive(Resource, Default)]
    struct Recorded {
        deaths: Vec<EntityDied>,
        changes: Vec<HealthChanged>,
    }

    fn record(
        mut recorded: ResMut<Recorded>,
        mut deaths: EventReader<EntityDied>,
        mut changes: EventReader<HealthChanged>,
    ) {
        recorded.deaths.extend(deaths.read().copied());
        recorded.changes.extend(changes.read().copied());
    }

    fn health_app(role: NetworkRole) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
                1.0 / 64.0,
            )))
            .insert_resource(Time::<Fixed>::from_hz(64.0))
            .insert_resource(AuthorityGate::new(role))
            .init_resource::<Recorded>()
            .add_event::<DamageIntent>()
            .add_event::<HealIntent>()
            .add_event::<HealthChanged>()
            .add_event::<EntityDied>()
            .add_systems(
                FixedUpdate,
                (
                    process_damage_intents,
                    process_heal_intents,
                    record,
                    handle_deaths,
                    despawn_after_timeout,
                )
                    .chain(),
            );
        // Первый update только запускает часы
        app.update();
        app
    }

    fn tick(app: &mut App, times: usize) {
        for _ in 0..times {
            app.update();
        }
    }

    #[test]
    fn test_damage_intent_kills_once_and_marks_dead() {
        let mut app = health_app(NetworkRole::Server);
        let target = app.world_mut().spawn(Health::new(100)).id();

        app.world_mut().send_event(DamageIntent {
            target,
            amount: 120,
            source: None,
        });
        tick(&mut app, 2);

        app.world_mut().send_event(DamageIntent {
            target,
            amount: 10,
            source: None,
        });
        tick(&mut app, 2);

        let health = app.world().get::<Health>(target).unwrap();
        assert_eq!(health.current(), 0);
        assert!(app.world().get::<Dead>(target).is_some());

        let recorded = app.world().resource::<Recorded>();
        assert_eq!(recorded.deaths.len(), 1, "death notification fires exactly once");
        assert_eq!(recorded.changes.len(), 1);
        assert_eq!(recorded.changes[0].previous, 100);
        assert_eq!(recorded.changes[0].current, 0);
    }

    #[test]
    fn test_heal_in_kill_tick_does_not_revive() {
        let mut app = health_app(NetworkRole::Server);
        let target = app.world_mut().spawn(Health::new(100)).id();

        // Kill + heal в одном тике: Dead ещё не вставлен, когда идёт heal
        app.world_mut().send_event(DamageIntent {
            target,
            amount: 120,
            source: None,
        });
        app.world_mut().send_event(HealIntent { target, amount: 50 });
        tick(&mut app, 1);

        assert_eq!(app.world().get::<Health>(target).unwrap().current(), 0);
        assert!(app.world().get::<Dead>(target).is_some());

        app.world_mut().send_event(DamageIntent {
            target,
            amount: 50,
            source: None,
        });
        tick(&mut app, 2);

        let recorded = app.world().resource::<Recorded>();
        assert_eq!(recorded.deaths.len(), 1, "corpse never dies twice");
        assert_eq!(recorded.changes.len(), 1);
    }

    #[test]
    fn test_client_intents_are_rejected() {
        let mut app = health_app(NetworkRole::Client);
        let target = app.world_mut().spawn(Health::with_current(50, 100)).id();

        app.world_mut().send_event(DamageIntent {
            target,
            amount: 30,
            source: None,
        });
        app.world_mut().send_event(HealIntent { target, amount: 30 });
        tick(&mut app, 2);

        assert_eq!(app.world().get::<Health>(target).unwrap().current(), 50);
        assert!(app.world().resource::<Recorded>().changes.is_empty());
    }

    #[test]
    fn test_heal_is_clamped_and_skips_dead() {
        let mut app = health_app(NetworkRole::Host);
        let wounded = app.world_mut().spawn(Health::with_current(90, 100)).id();
        let corpse = app.world_mut().spawn((Health::with_current(0, 100), Dead)).id();

        app.world_mut().send_event(HealIntent {
            target: wounded,
            amount: 25,
        });
        app.world_mut().send_event(HealIntent {
            target: corpse,
            amount: 25,
        });
        tick(&mut app, 2);

        assert_eq!(app.world().get::<Health>(wounded).unwrap().current(), 100);
        assert_eq!(app.world().get::<Health>(corpse).unwrap().current(), 0);
    }

    #[test]
    fn test_despawn_on_death_after_delay() {
        let mut app = health_app(NetworkRole::Standalone);
        let target = app
            .world_mut()
            .spawn((Health::new(10), DespawnOnDeath { delay: 0.25 }))
            .id();

        app.world_mut().send_event(DamageIntent {
            target,
            amount: 10,
            source: None,
        });
        tick(&mut app, 2);
        assert!(app.world().get_entity(target).is_ok(), "still present right after death");

        // 0.25s = 16 тиков при 64Hz
        tick(&mut app, 24);
        assert!(app.world().get_entity(target).is_err());
    }
}
