//! Combat module: hit resolution + health ledger
//!
//! ECS ответственность:
//! - Ray cast выстрела (hurtbox сферы + опциональный WorldRaycaster)
//! - Cosmetic ShotTrace для всех сторон
//! - Health мутации только через AuthorityGate
//! - Events: HealthChanged, EntityDied (один раз на смерть)

use bevy::prelude::*;

pub mod health;
pub mod hit;
pub mod raycast;
pub mod systems;

#[cfg(test)]
mod health_tests;

// Re-export основных типов
pub use health::{
    DamageIntent, Dead, DespawnAfter, DespawnOnDeath, EntityDied, HealIntent, Health, HealthChange,
    HealthChanged,
};
pub use hit::{resolve_shots, ShotTrace, TraceHit};
pub use raycast::{nearest, ray_sphere, spawn_target, Hurtbox, HurtboxCaster, RayCaster, RayHit, WorldRaycaster};

use crate::TickSet;

/// Combat Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. `TickSet::HitResolution` — resolve_shots (ShotFired этого тика)
/// 2. `TickSet::Health` — damage/heal intents → deaths → despawn
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Health>()
            .register_type::<Hurtbox>();

        app.add_event::<ShotTrace>()
            .add_event::<HealthChanged>()
            .add_event::<EntityDied>()
            .add_event::<DamageIntent>()
            .add_event::<HealIntent>();

        app.add_systems(FixedUpdate, resolve_shots.in_set(TickSet::HitResolution));

        app.add_systems(
            FixedUpdate,
            (
                systems::process_damage_intents,
                systems::process_heal_intents,
                systems::handle_deaths,
                systems::despawn_after_timeout,
            )
                .chain()
                .in_set(TickSet::Health),
        );
    }
}
