//! Weapon module: profile + catalog + state machine
//!
//! Один state machine, параметризованный immutable `WeaponProfile`
//! (full-auto / semi-auto — данные, не типы).

use bevy::prelude::*;

pub mod catalog;
pub mod events;
pub mod profile;
pub mod state;
pub mod systems;


// Re-export основных типов
pub use catalog::{CatalogError, WeaponCatalog};
pub use events::{CycleWeaponIntent, EquipWeaponIntent, ReloadProgress, ShotFired, WeaponEquipped};
pub use profile::{CameraFov, FireMode, ProfileError, WeaponProfile};
pub use state::{
    Muzzle, ReloadOperation, ReloadPhase, ShotSample, TickOutcome, ViewFeedback, Weapon, WeaponHud,
    WeaponMode,
};
pub use systems::{drive_weapons, process_equip_intents};

use crate::input::WeaponIntent;
use crate::TickSet;

/// Weapon Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. `TickSet::Equip` — weapon switch до тика оружия
/// 2. `TickSet::Weapons` — state machine, ShotFired / ReloadProgress
pub struct WeaponPlugin;

impl Plugin for WeaponPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<WeaponIntent>()
            .register_type::<ViewFeedback>();

        app.add_event::<EquipWeaponIntent>()
            .add_event::<CycleWeaponIntent>()
            .add_event::<WeaponEquipped>()
            .add_event::<ShotFired>()
            .add_event::<ReloadProgress>();

        app.add_systems(FixedUpdate, process_equip_intents.in_set(TickSet::Equip))
            .add_systems(FixedUpdate, drive_weapons.in_set(TickSet::Weapons));
    }
}

/// Spawn controlled стрелка: камера = `transform`, оружие из `profile`
///
/// Стрелок сам по себе цель (Hurtbox + Health) — свой луч его не задевает.
pub fn spawn_shooter(
    commands: &mut Commands,
    profile: std::sync::Arc<WeaponProfile>,
    transform: Transform,
) -> Entity {
    commands
        .spawn((
            transform,
            ViewFeedback::for_profile(&profile),
            Weapon::new(profile),
            WeaponIntent::default(),
            crate::input::Controlled,
            crate::combat::Hurtbox { radius: 0.5 },
            crate::combat::Health::new(100),
        ))
        .id()
}
