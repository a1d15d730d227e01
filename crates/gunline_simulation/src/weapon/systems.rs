//! Weapon systems
//!
//! - `process_equip_intents` — weapon switch (каталог → `set_profile`)
//! - `drive_weapons` — intent → state machine → `ShotFired` / `ReloadProgress`

use bevy::prelude::*;
use std::sync::Arc;

use super::catalog::WeaponCatalog;
use super::events::{CycleWeaponIntent, EquipWeaponIntent, ReloadProgress, ShotFired, WeaponEquipped};
use super::profile::WeaponProfile;
use super::state::{Muzzle, ReloadPhase, ViewFeedback, Weapon};
use crate::combat::Dead;
use crate::feedback::perturb_direction;
use crate::input::{Controlled, WeaponIntent};
use crate::logger::{log, log_info, log_warning};
use crate::DeterministicRng;

/// System: equip / cycle intents
///
/// Невалидный индекс или entity без `Weapon` → warning, состояние не меняется.
pub fn process_equip_intents(
    mut equip_events: EventReader<EquipWeaponIntent>,
    mut cycle_events: EventReader<CycleWeaponIntent>,
    catalog: Res<WeaponCatalog>,
    mut weapons: Query<&mut Weapon>,
    mut equipped_events: EventWriter<WeaponEquipped>,
) {
    for intent in equip_events.read() {
        let Some(profile) = catalog.get(intent.index) else {
            log_warning(&format!(
                "Invalid weapon index {} for {:?} (catalog size {})",
                intent.index,
                intent.entity,
                catalog.len()
            ));
            continue;
        };

        equip_profile(intent.entity, Arc::clone(profile), &mut weapons, &mut equipped_events);
    }

    for intent in cycle_events.read() {
        let Ok(weapon) = weapons.get(intent.entity) else {
            log_warning(&format!("CycleWeaponIntent: {:?} has no Weapon", intent.entity));
            continue;
        };

        let Some(next) = catalog.next_after(&weapon.profile().id) else {
            continue;
        };

        equip_profile(intent.entity, Arc::clone(next), &mut weapons, &mut equipped_events);
    }
}

fn equip_profile(
    entity: Entity,
    profile: Arc<WeaponProfile>,
    weapons: &mut Query<&mut Weapon>,
    equipped_events: &mut EventWriter<WeaponEquipped>,
) {
    let Ok(mut weapon) = weapons.get_mut(entity) else {
        log_warning(&format!("EquipWeaponIntent: {:?} has no Weapon", entity));
        return;
    };

    let profile_id = profile.id.clone();
    let cancelled_reload = weapon.set_profile(profile);

    equipped_events.write(WeaponEquipped {
        entity,
        profile_id: profile_id.clone(),
        cancelled_reload,
    });

    log_info(&format!(
        "✅ {:?} equipped {} (reload cancelled: {})",
        entity, profile_id, cancelled_reload
    ));
}

/// System: тик оружия для controlled entities
///
/// 1. State machine по intent snapshot (reload edge потребляется)
/// 2. Выстрел → FOV kick + `ShotFired` (origin = muzzle или камера)
/// 3. Reload фазы → `ReloadProgress`
pub fn drive_weapons(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    mut shooters: Query<
        (
            Entity,
            &mut Weapon,
            &mut WeaponIntent,
            &mut ViewFeedback,
            &Transform,
            Option<&Muzzle>,
        ),
        (With<Controlled>, Without<Dead>),
    >,
    muzzles: Query<&Transform>,
    mut shot_events: EventWriter<ShotFired>,
    mut reload_events: EventWriter<ReloadProgress>,
) {
    let now = time.elapsed_secs_f64();
    let delta = time.delta_secs();

    for (entity, mut weapon, mut intent, mut feedback, camera, muzzle) in shooters.iter_mut() {
        let outcome = weapon.tick(&intent, now, delta, &mut rng.rng);

        // Edge-triggered: один press = одна попытка
        if intent.reload_pressed {
            intent.reload_pressed = false;
        }

        if let Some(shot) = outcome.shot {
            let origin = muzzle
                .and_then(|muzzle| muzzles.get(muzzle.0).ok())
                .map(|transform| transform.translation)
                .unwrap_or(camera.translation);
            let direction = perturb_direction(camera.forward().as_vec3(), shot.spread_offset);

            feedback.fov.kick(weapon.profile().fov_kick_duration);

            shot_events.write(ShotFired {
                shooter: entity,
                origin,
                direction,
                max_range: shot.max_range,
                damage: shot.damage,
            });

            log(&format!(
                "🔫 {:?} fired ({} / {}), spread {:.2}",
                entity,
                weapon.ammo_loaded(),
                weapon.ammo_reserve(),
                weapon.spread()
            ));
        }

        if let Some(phase) = outcome.reload {
            match phase {
                ReloadPhase::Started => log(&format!("{:?} reloading...", entity)),
                ReloadPhase::Cancelled => log(&format!("{:?} reload cancelled", entity)),
                ReloadPhase::Completed => log(&format!(
                    "{:?} reload complete: loaded {}, reserve {}",
                    entity,
                    weapon.ammo_loaded(),
                    weapon.ammo_reserve()
                )),
            }
            reload_events.write(ReloadProgress { entity, phase });
        }
    }
}
