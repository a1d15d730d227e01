//! Recoil accumulator — затухающий offset ориентации камеры после выстрелов
//!
//! Цикл: accumulate (на выстрел) → expose (дельта для view) → decay (каждый тик).
//! View получает только изменение offset с прошлого тика, поэтому один и тот же
//! kick никогда не применяется дважды.

use bevy::prelude::*;
use rand::Rng;

/// Симметричный предел accumulator (градусы)
pub const RECOIL_LIMIT: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct RecoilAccumulator {
    pitch: f32,
    yaw: f32,
    /// Сколько offset уже отдано view
    applied_pitch: f32,
    applied_yaw: f32,
}

impl RecoilAccumulator {
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Kick на выстрел
    ///
    /// Горизонталь: uniform в [-h·(1 - max(w,0)), h·(1 + min(w,0))], где w — bias.
    /// w > 0 сужает отрицательную границу, w < 0 — положительную.
    pub fn kick(&mut self, vertical: f32, horizontal: f32, bias: f32, rng: &mut impl Rng) {
        let bias = bias.clamp(-1.0, 1.0);
        let low = -horizontal * (1.0 - bias.max(0.0));
        let high = horizontal * (1.0 + bias.min(0.0));

        let sideways = if high > low {
            rng.gen_range(low..=high)
        } else {
            0.0
        };

        self.pitch = (self.pitch + vertical).clamp(-RECOIL_LIMIT, RECOIL_LIMIT);
        self.yaw = (self.yaw + sideways).clamp(-RECOIL_LIMIT, RECOIL_LIMIT);
    }

    /// Линейное затухание к нулю (не зависит от того, стреляем ли)
    pub fn decay(&mut self, rate: f32, delta: f32) {
        let step = (rate * delta).max(0.0);
        self.pitch = approach_zero(self.pitch, step);
        self.yaw = approach_zero(self.yaw, step);
    }

    /// Дельта (pitch, yaw) для view с прошлого вызова; после — считается применённой
    pub fn take_view_delta(&mut self) -> (f32, f32) {
        let delta = (self.pitch - self.applied_pitch, self.yaw - self.applied_yaw);
        self.applied_pitch = self.pitch;
        self.applied_yaw = self.yaw;
        delta
    }
}

fn approach_zero(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else {
        (value + step).min(0.0)
    }
}
