//! Weapon events
//!
//! **Intents (host → ECS):**
//! - `EquipWeaponIntent` — equip профиля каталога по индексу
//! - `CycleWeaponIntent` — следующий профиль каталога (wrap)
//!
//! **Notifications (ECS → host / hit resolution):**
//! - `WeaponEquipped`, `ShotFired`, `ReloadProgress`

use bevy::prelude::*;

use super::state::ReloadPhase;

/// Equip оружия из `WeaponCatalog` по индексу
#[derive(Event, Debug, Clone)]
pub struct EquipWeaponIntent {
    pub entity: Entity,
    pub index: usize,
}

/// Переключить на следующее оружие каталога
#[derive(Event, Debug, Clone)]
pub struct CycleWeaponIntent {
    pub entity: Entity,
}

/// Оружие сменилось (`set_profile` отработал)
#[derive(Event, Debug, Clone)]
pub struct WeaponEquipped {
    pub entity: Entity,
    pub profile_id: String,
    /// Смена прервала перезарядку
    pub cancelled_reload: bool,
}

/// Выстрел: луч для hit resolution
///
/// `direction` уже с учётом spread, нормализован.
#[derive(Event, Debug, Clone)]
pub struct ShotFired {
    pub shooter: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_range: f32,
    pub damage: u32,
}

/// Прогресс перезарядки (HUD, звук, анимация)
#[derive(Event, Debug, Clone)]
pub struct ReloadProgress {
    pub entity: Entity,
    pub phase: ReloadPhase,
}
