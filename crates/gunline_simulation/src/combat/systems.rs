//! Health systems: внешние damage/heal intents и обработка смерти

use bevy::prelude::*;

use super::health::{
    DamageIntent, Dead, DespawnAfter, DespawnOnDeath, EntityDied, HealIntent, Health, HealthChanged,
};
use crate::authority::AuthorityGate;
use crate::logger::{log, log_info, log_warning};

/// System: DamageIntent → AuthorityGate → Health
///
/// Неавторитетная сторона: warning, health не меняется.
pub fn process_damage_intents(
    mut damage_events: EventReader<DamageIntent>,
    gate: Res<AuthorityGate>,
    mut targets: Query<&mut Health>,
    mut health_events: EventWriter<HealthChanged>,
    mut death_events: EventWriter<EntityDied>,
) {
    for intent in damage_events.read() {
        let Ok(mut health) = targets.get_mut(intent.target) else {
            log_warning(&format!("DamageIntent: target {:?} has no Health", intent.target));
            continue;
        };

        let change = match gate.apply_damage(intent.target, &mut health, intent.amount) {
            Ok(change) => change,
            Err(err) => {
                log_warning(&format!("Rejected DamageIntent: {}", err));
                continue;
            }
        };

        if change.changed() {
            health_events.write(HealthChanged::from_change(intent.target, change, intent.source));
        }

        if change.died {
            death_events.write(EntityDied {
                entity: intent.target,
                killer: intent.source,
            });
            log_info(&format!("💀 {:?} died (killer {:?})", intent.target, intent.source));
        }
    }
}

/// System: HealIntent → AuthorityGate → Health
///
/// Мёртвых не лечим (воскрешение — отдельная механика).
pub fn process_heal_intents(
    mut heal_events: EventReader<HealIntent>,
    gate: Res<AuthorityGate>,
    mut targets: Query<&mut Health, Without<Dead>>,
    mut health_events: EventWriter<HealthChanged>,
) {
    for intent in heal_events.read() {
        let Ok(mut health) = targets.get_mut(intent.target) else {
            continue;
        };

        match gate.heal(intent.target, &mut health, intent.amount) {
            Ok(change) if change.changed() => {
                health_events.write(HealthChanged::from_change(intent.target, change, None));
            }
            Ok(_) => {}
            Err(err) => log_warning(&format!("Rejected HealIntent: {}", err)),
        }
    }
}

/// System: EntityDied → Dead marker (+ DespawnAfter если DespawnOnDeath)
pub fn handle_deaths(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    despawn_rules: Query<&DespawnOnDeath>,
    time: Res<Time<Fixed>>,
) {
    for event in death_events.read() {
        let Ok(mut entity_commands) = commands.get_entity(event.entity) else {
            continue;
        };

        entity_commands.insert(Dead);

        if let Ok(rule) = despawn_rules.get(event.entity) {
            entity_commands.insert(DespawnAfter {
                despawn_time: time.elapsed_secs() + rule.delay.max(0.0),
            });
            log(&format!(
                "{:?} will despawn in {:.2}s",
                event.entity,
                rule.delay.max(0.0)
            ));
        }
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
