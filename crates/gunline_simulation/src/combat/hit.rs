//! Hit resolution: ShotFired → ray cast → (authoritative) damage
//!
//! Каждая сторона резолвит выстрел и получает `ShotTrace` для tracer/impact VFX.
//! Health меняется только если `AuthorityGate` авторитетен; иначе попадание чисто
//! косметическое.

use bevy::prelude::*;

use super::health::{Dead, EntityDied, Health, HealthChanged};
use super::raycast::{nearest, HurtboxCaster, Hurtbox, RayCaster, WorldRaycaster};
use crate::authority::AuthorityGate;
use crate::logger::{log, log_info};
use crate::weapon::ShotFired;

/// Точка попадания для VFX
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub entity: Option<Entity>,
}

/// Cosmetic trace выстрела (есть у всех сторон)
///
/// Промах: `end = origin + direction * max_range`, `hit = None`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ShotTrace {
    pub shooter: Entity,
    pub origin: Vec3,
    pub end: Vec3,
    pub hit: Option<TraceHit>,
}

/// System: резолв выстрелов этого тика
///
/// Выстрелы применяются в порядке событий — порядок мутаций health детерминирован.
pub fn resolve_shots(
    mut shot_events: EventReader<ShotFired>,
    gate: Res<AuthorityGate>,
    world_caster: Option<Res<WorldRaycaster>>,
    hurtboxes: Query<(Entity, &Transform, &Hurtbox), Without<Dead>>,
    mut targets: Query<&mut Health>,
    mut trace_events: EventWriter<ShotTrace>,
    mut health_events: EventWriter<HealthChanged>,
    mut death_events: EventWriter<EntityDied>,
) {
    for shot in shot_events.read() {
        let direction = shot.direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            continue;
        }

        // Снимок hurtbox'ов: цель, убитая предыдущим выстрелом этого тика, остаётся
        // в query до применения Commands, но повторная смерть отсекается Health
        let spheres = hurtboxes
            .iter()
            .map(|(entity, transform, hurtbox)| (entity, transform.translation, hurtbox.radius))
            .collect();
        let caster = HurtboxCaster::new(spheres).excluding(shot.shooter);

        let hurtbox_hit = caster.cast(shot.origin, direction, shot.max_range);
        let world_hit = world_caster
            .as_ref()
            .and_then(|world| world.0.cast(shot.origin, direction, shot.max_range))
            .filter(|hit| hit.entity != Some(shot.shooter));
        let hit = nearest(hurtbox_hit, world_hit);

        let end = hit
            .map(|hit| hit.point)
            .unwrap_or(shot.origin + direction * shot.max_range);

        trace_events.write(ShotTrace {
            shooter: shot.shooter,
            origin: shot.origin,
            end,
            hit: hit.map(|hit| TraceHit {
                point: hit.point,
                normal: hit.normal,
                entity: hit.entity,
            }),
        });

        let Some(target) = hit.and_then(|hit| hit.entity) else {
            continue;
        };

        // Цель без Health — non-damageable попадание
        let Ok(mut health) = targets.get_mut(target) else {
            continue;
        };

        if !gate.is_authoritative() {
            log(&format!(
                "{:?} hit {:?} (cosmetic only, role {:?})",
                shot.shooter,
                target,
                gate.role()
            ));
            continue;
        }

        let Ok(change) = gate.apply_damage(target, &mut health, shot.damage) else {
            continue;
        };

        if change.changed() {
            health_events.write(HealthChanged::from_change(target, change, Some(shot.shooter)));
        }

        if change.died {
            death_events.write(EntityDied {
                entity: target,
                killer: Some(shot.shooter),
            });
            log_info(&format!("💀 {:?} killed by {:?}", target, shot.shooter));
        }
    }
}
