//! Spread (bloom) — угловой конус, в котором возмущается направление выстрела
//!
//! - Выстрел: +`spread_per_shot`, clamp до `max_spread`
//! - Каждый тик без выстрела: линейный возврат к target (ADS → `aim_spread`,
//!   иначе `base_spread`) со скоростью `spread_recovery`, без перелёта
//! - Направление: два независимых uniform sample в [-spread, +spread]

use bevy::prelude::*;
use rand::Rng;

/// Текущий spread (градусы). Инвариант: 0 ≤ current ≤ max
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct Spread {
    current: f32,
}

impl Spread {
    pub fn new(current: f32) -> Self {
        Self {
            current: current.max(0.0),
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Bloom после выстрела
    pub fn grow(&mut self, increment: f32, max: f32) {
        self.current = (self.current + increment).clamp(0.0, max.max(0.0));
    }

    /// Bounded linear approach к target
    pub fn relax(&mut self, target: f32, rate: f32, delta: f32, max: f32) {
        let target = target.clamp(0.0, max.max(0.0));
        let step = (rate * delta).max(0.0);

        if self.current > target {
            self.current = (self.current - step).max(target);
        } else {
            self.current = (self.current + step).min(target);
        }
    }

    /// Угловое возмущение (x = yaw, y = pitch), градусы
    pub fn sample(&self, rng: &mut impl Rng) -> Vec2 {
        if self.current <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            rng.gen_range(-self.current..=self.current),
            rng.gen_range(-self.current..=self.current),
        )
    }
}

/// Повернуть aim direction на (yaw, pitch) градусов вокруг локальных осей
///
/// Локальные оси строятся от direction (up = мировой Y). Для вертикального
/// прицела берём X как right.
pub fn perturb_direction(direction: Vec3, offset_degrees: Vec2) -> Vec3 {
    let forward = direction.normalize_or(Vec3::NEG_Z);
    if offset_degrees == Vec2::ZERO {
        return forward;
    }

    let right = forward.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
    let up = right.cross(forward).normalize();

    let yaw = Quat::from_axis_angle(up, offset_degrees.x.to_radians());
    let pitch = Quat::from_axis_angle(right, offset_degrees.y.to_radians());

    (yaw * pitch * forward).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_grow_clamped_to_max() {
        let mut spread = Spread::new(0.5);
        for _ in 0..20 {
            spread.grow(1.0, 5.0);
            assert!(spread.current() <= 5.0);
        }
        assert_eq!(spread.current(), 5.0);
    }

    #[test]
    fn test_relax_is_gradual_and_never_overshoots() {
        let mut spread = Spread::new(5.0);

        // 5 deg/s × 0.25s = 1.25 за шаг
        spread.relax(0.5, 5.0, 0.25, 5.0);
        assert_eq!(spread.current(), 3.75);

        for _ in 0..10 {
            spread.relax(0.5, 5.0, 0.25, 5.0);
            assert!(spread.current() >= 0.5);
        }
        assert_eq!(spread.current(), 0.5);
    }

    #[test]
    fn test_relax_up_towards_resting() {
        // После ADS (spread 0) возвращаемся к resting spread снизу
        let mut spread = Spread::new(0.0);
        spread.relax(0.5, 1.0, 0.25, 5.0);
        assert_eq!(spread.current(), 0.25);
        spread.relax(0.5, 1.0, 1.0, 5.0);
        assert_eq!(spread.current(), 0.5);
    }

    #[test]
    fn test_sample_within_cone() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let spread = Spread::new(2.0);
        for _ in 0..500 {
            let offset = spread.sample(&mut rng);
            assert!(offset.x.abs() <= 2.0 && offset.y.abs() <= 2.0, "{:?}", offset);
        }
    }

    #[test]
    fn test_zero_spread_is_exact() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(Spread::new(0.0).sample(&mut rng), Vec2::ZERO);
        assert_eq!(perturb_direction(Vec3::NEG_Z, Vec2::ZERO), Vec3::NEG_Z);
    }

    #[test]
    fn test_perturb_direction_angle() {
        let dir = perturb_direction(Vec3::NEG_Z, Vec2::new(3.0, 0.0));
        let angle = dir.angle_between(Vec3::NEG_Z).to_degrees();
        assert!((angle - 3.0).abs() < 1e-3, "angle = {}", angle);
        // Yaw не меняет высоту
        assert!(dir.y.abs() < 1e-5);

        let dir = perturb_direction(Vec3::NEG_Z, Vec2::new(0.0, 4.0));
        assert!(dir.y > 0.0, "positive pitch поднимает ствол");

        // Вертикальный прицел не ломает базис
        let dir = perturb_direction(Vec3::Y, Vec2::new(1.0, 1.0));
        assert!(dir.is_normalized());
    }
}
