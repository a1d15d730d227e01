//! FOV feedback — ADS zoom + kick на выстрел для двух камер
//!
//! Target = base(aiming) + kick (пока таймер kick не истёк).
//! Displayed FOV догоняет target через lerp со скоростью `fov_change_speed`.

use bevy::prelude::*;

use crate::weapon::{CameraFov, WeaponProfile};

/// Состояние одной камеры
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct FovChannel {
    pub current: f32,
    pub target: f32,
}

impl FovChannel {
    fn update(&mut self, camera: &CameraFov, aiming: bool, kicking: bool, lerp: f32) {
        self.target = camera.base(aiming) + if kicking { camera.kick } else { 0.0 };
        self.current += (self.target - self.current) * lerp;
    }

    fn snap(&mut self, camera: &CameraFov) {
        self.target = camera.default_fov;
        self.current = camera.default_fov;
    }
}

/// FOV для first-person и observer (main) камер
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct FovFeedback {
    pub first_person: FovChannel,
    pub observer: FovChannel,
    kick_timer: f32,
    primed: bool,
}

impl FovFeedback {
    pub fn for_profile(profile: &WeaponProfile) -> Self {
        let mut feedback = Self::default();
        feedback.prime(profile);
        feedback
    }

    /// Первый кадр — сразу на default FOV (без наезда с нуля)
    pub fn prime(&mut self, profile: &WeaponProfile) {
        self.first_person.snap(&profile.first_person_fov);
        self.observer.snap(&profile.observer_fov);
        self.primed = true;
    }

    pub fn is_kicking(&self) -> bool {
        self.kick_timer > 0.0
    }

    /// Выстрел: перезапуск таймера kick
    pub fn kick(&mut self, duration: f32) {
        self.kick_timer = duration.max(0.0);
    }

    pub fn update(&mut self, profile: &WeaponProfile, aiming: bool, delta: f32) {
        if !self.primed {
            self.prime(profile);
        }

        let kicking = self.is_kicking();
        let lerp = (profile.fov_change_speed * delta).clamp(0.0, 1.0);
        self.first_person
            .update(&profile.first_person_fov, aiming, kicking, lerp);
        self.observer.update(&profile.observer_fov, aiming, kicking, lerp);

        if kicking {
            self.kick_timer = (self.kick_timer - delta).max(0.0);
        }
    }
}
