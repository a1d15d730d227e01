//! Weapon profile — immutable tuning одного типа оружия
//!
//! Architecture Decision:
//! - Один state machine, параметризованный профилем (без иерархии типов оружия)
//! - Профиль шарится через `Arc` всеми владельцами этого типа, в runtime НЕ мутируется
//! - Swap оружия = замена `Arc` + re-seed runtime state (см. `Weapon::set_profile`)
//!
//! Единицы: углы в градусах, время в секундах.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Режим стрельбы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireMode {
    /// Стреляет пока зажата кнопка (с интервалом `fire_interval`)
    FullAuto,
    /// Один выстрел на нажатие (нужен release между выстрелами)
    SemiAuto,
}

/// FOV параметры одной камеры
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFov {
    /// FOV от бедра
    pub default_fov: f32,
    /// FOV в ADS
    pub aim_fov: f32,
    /// Kick на выстрел (прибавка к target FOV пока таймер не истёк)
    pub kick: f32,
}

impl CameraFov {
    pub fn base(&self, aiming: bool) -> f32 {
        if aiming {
            self.aim_fov
        } else {
            self.default_fov
        }
    }
}

/// Ошибка валидации профиля
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("magazine capacity must be positive")]
    EmptyMagazine,
    #[error("fire interval must be positive, got {0}")]
    InvalidFireInterval(f32),
    #[error("field `{field}` must be finite and non-negative, got {value}")]
    NegativeValue { field: &'static str, value: f32 },
    #[error("horizontal bias must be within [-1, 1], got {0}")]
    BiasOutOfRange(f32),
    #[error("base spread {base} exceeds max spread {max}")]
    BaseSpreadAboveMax { base: f32, max: f32 },
    #[error("starting reserve {start} exceeds reserve capacity {capacity}")]
    ReserveAboveCapacity { start: u32, capacity: u32 },
}

/// Immutable tuning оружия
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponProfile {
    /// Stable ID (lookup в каталоге)
    pub id: String,
    /// Отображаемое имя
    pub name: String,

    // === Fire ===
    pub fire_mode: FireMode,
    /// Минимальный интервал между выстрелами
    pub fire_interval: f32,
    /// Урон за попадание
    pub damage: u32,
    /// Дальность raycast (метры)
    pub max_range: f32,

    // === Ammo ===
    pub magazine_capacity: u32,
    pub reserve_capacity: u32,
    /// Reserve при equip (не больше reserve_capacity)
    pub starting_reserve: u32,
    pub reload_duration: f32,
    /// Авто-reload пустого магазина (если огонь не зажат)
    pub auto_reload: bool,
    /// HUD "low ammo" при 0 < loaded <= threshold
    pub low_ammo_threshold: u32,

    // === Spread (bloom) ===
    /// Resting spread от бедра
    pub base_spread: f32,
    /// Target spread в ADS
    pub aim_spread: f32,
    pub max_spread: f32,
    /// Прирост spread за выстрел
    pub spread_per_shot: f32,
    /// Скорость возврата к target (градусы/сек)
    pub spread_recovery: f32,

    // === Recoil ===
    pub vertical_recoil: f32,
    pub horizontal_recoil: f32,
    /// Directional drift [-1, 1]: >0 тянет вправо, <0 влево
    pub horizontal_bias: f32,
    /// Скорость затухания recoil accumulator (градусы/сек)
    pub recoil_recovery: f32,

    // === FOV ===
    pub first_person_fov: CameraFov,
    pub observer_fov: CameraFov,
    pub fov_kick_duration: f32,
    /// Скорость lerp displayed FOV → target
    pub fov_change_speed: f32,
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self::assault_rifle()
    }
}

impl WeaponProfile {
    /// Автомат — профиль по умолчанию
    pub fn assault_rifle() -> Self {
        Self {
            id: "assault_rifle".into(),
            name: "Assault Rifle".into(),
            fire_mode: FireMode::FullAuto,
            fire_interval: 0.1,
            damage: 10,
            max_range: 100.0,
            magazine_capacity: 30,
            reserve_capacity: 180,
            starting_reserve: 90,
            reload_duration: 2.0,
            auto_reload: false,
            low_ammo_threshold: 5,
            base_spread: 0.5,
            aim_spread: 0.0,
            max_spread: 5.0,
            spread_per_shot: 1.0,
            spread_recovery: 5.0,
            vertical_recoil: 1.5,
            horizontal_recoil: 0.6,
            horizontal_bias: 0.0,
            recoil_recovery: 10.0,
            first_person_fov: CameraFov {
                default_fov: 80.0,
                aim_fov: 50.0,
                kick: 2.0,
            },
            observer_fov: CameraFov {
                default_fov: 90.0,
                aim_fov: 60.0,
                kick: 3.0,
            },
            fov_kick_duration: 0.15,
            fov_change_speed: 8.0,
        }
    }

    /// Пистолет (semi-auto)
    pub fn pistol() -> Self {
        Self {
            id: "pistol".into(),
            name: "Pistol".into(),
            fire_mode: FireMode::SemiAuto,
            fire_interval: 0.2,
            damage: 15,
            max_range: 60.0,
            magazine_capacity: 12,
            reserve_capacity: 72,
            starting_reserve: 36,
            reload_duration: 1.4,
            low_ammo_threshold: 3,
            base_spread: 0.3,
            max_spread: 3.0,
            spread_per_shot: 0.8,
            spread_recovery: 6.0,
            vertical_recoil: 2.5,
            horizontal_recoil: 0.4,
            ..Self::assault_rifle()
        }
    }

    /// SMG — быстрый темп, сильный дрейф вправо
    pub fn smg() -> Self {
        Self {
            id: "smg".into(),
            name: "SMG".into(),
            fire_interval: 0.06,
            damage: 7,
            max_range: 50.0,
            magazine_capacity: 40,
            reserve_capacity: 200,
            starting_reserve: 120,
            reload_duration: 1.8,
            low_ammo_threshold: 8,
            base_spread: 1.0,
            max_spread: 7.0,
            spread_per_shot: 0.6,
            vertical_recoil: 0.9,
            horizontal_recoil: 0.8,
            horizontal_bias: 0.5,
            ..Self::assault_rifle()
        }
    }

    /// Марксманская винтовка — медленно, точно, сильный kick
    pub fn marksman() -> Self {
        Self {
            id: "marksman".into(),
            name: "Marksman Rifle".into(),
            fire_mode: FireMode::SemiAuto,
            fire_interval: 0.5,
            damage: 45,
            max_range: 250.0,
            magazine_capacity: 10,
            reserve_capacity: 40,
            starting_reserve: 20,
            reload_duration: 2.6,
            low_ammo_threshold: 2,
            base_spread: 0.2,
            max_spread: 4.0,
            spread_per_shot: 2.5,
            spread_recovery: 3.0,
            vertical_recoil: 4.0,
            horizontal_recoil: 0.3,
            horizontal_bias: -0.3,
            first_person_fov: CameraFov {
                default_fov: 80.0,
                aim_fov: 30.0,
                kick: 4.0,
            },
            observer_fov: CameraFov {
                default_fov: 90.0,
                aim_fov: 40.0,
                kick: 5.0,
            },
            ..Self::assault_rifle()
        }
    }

    /// Camera FOV по роли камеры
    pub fn camera_fov(&self, first_person: bool) -> &CameraFov {
        if first_person {
            &self.first_person_fov
        } else {
            &self.observer_fov
        }
    }

    /// Проверка инвариантов tuning (для данных из внешнего источника)
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.magazine_capacity == 0 {
            return Err(ProfileError::EmptyMagazine);
        }
        if !self.fire_interval.is_finite() || self.fire_interval <= 0.0 {
            return Err(ProfileError::InvalidFireInterval(self.fire_interval));
        }
        if self.starting_reserve > self.reserve_capacity {
            return Err(ProfileError::ReserveAboveCapacity {
                start: self.starting_reserve,
                capacity: self.reserve_capacity,
            });
        }

        let non_negative = [
            ("max_range", self.max_range),
            ("reload_duration", self.reload_duration),
            ("base_spread", self.base_spread),
            ("aim_spread", self.aim_spread),
            ("max_spread", self.max_spread),
            ("spread_per_shot", self.spread_per_shot),
            ("spread_recovery", self.spread_recovery),
            ("vertical_recoil", self.vertical_recoil),
            ("horizontal_recoil", self.horizontal_recoil),
            ("recoil_recovery", self.recoil_recovery),
            ("fov_kick_duration", self.fov_kick_duration),
            ("fov_change_speed", self.fov_change_speed),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ProfileError::NegativeValue { field, value });
            }
        }

        if !(-1.0..=1.0).contains(&self.horizontal_bias) {
            return Err(ProfileError::BiasOutOfRange(self.horizontal_bias));
        }
        if self.base_spread > self.max_spread {
            return Err(ProfileError::BaseSpreadAboveMax {
                base: self.base_spread,
                max: self.max_spread,
            });
        }

        Ok(())
    }
}
