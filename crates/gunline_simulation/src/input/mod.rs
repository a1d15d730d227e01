//! Input intent — per-tick snapshot от внешнего Intent Source
//!
//! Ядро НЕ опрашивает устройства. Хост (engine bridge, сетевой слой на сервере)
//! пишет `WeaponIntent` каждый тик, симуляция только читает.

use bevy::prelude::*;

/// Snapshot намерений игрока на текущий тик
///
/// - `move_axis`, `look`: для locomotion (ядро оружия их не использует)
/// - `fire_held`: LMB зажата
/// - `reload_pressed`: edge — ставится на один тик, сбрасывается симуляцией после чтения
/// - `aim_held`: RMB зажата (ADS)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponIntent {
    pub move_axis: Vec2,
    pub look: Vec2,
    pub fire_held: bool,
    pub reload_pressed: bool,
    pub aim_held: bool,
}

impl WeaponIntent {
    pub fn firing() -> Self {
        Self {
            fire_held: true,
            ..Default::default()
        }
    }

    pub fn reload() -> Self {
        Self {
            reload_pressed: true,
            ..Default::default()
        }
    }

    pub fn aiming() -> Self {
        Self {
            aim_held: true,
            ..Default::default()
        }
    }
}

/// Marker: entity симулируется этим процессом (owner / server-side input)
///
/// Оружие без `Controlled` — удалённая копия: его тик здесь не крутится,
/// состояние приходит извне и только отображается.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Controlled;
