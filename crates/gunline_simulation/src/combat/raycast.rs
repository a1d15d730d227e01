//! World query: ray cast primitive
//!
//! Два источника препятствий:
//! - `Hurtbox` сферы (всегда, считаются по Transform)
//! - `WorldRaycaster` resource (опционально: геометрия уровня, physics adapter)
//!
//! Побеждает ближайшее попадание. Стрелок не попадает сам в себя.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, Sensor};
use std::sync::Arc;

use super::health::Health;

/// Результат ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    /// None — препятствие без entity (стена, terrain)
    pub entity: Option<Entity>,
}

/// Ray cast primitive: `direction` нормализован, попадания дальше `max_range` не возвращаются
pub trait RayCaster: Send + Sync {
    fn cast(&self, origin: Vec3, direction: Vec3, max_range: f32) -> Option<RayHit>;
}

/// Внешний caster (level geometry, physics engine bridge)
#[derive(Resource, Clone)]
pub struct WorldRaycaster(pub Arc<dyn RayCaster>);

impl WorldRaycaster {
    pub fn new(caster: impl RayCaster + 'static) -> Self {
        Self(Arc::new(caster))
    }
}

/// Сферический hurtbox вокруг Transform.translation
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Hurtbox {
    pub radius: f32,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

/// Снимок hurtbox'ов на момент резолва выстрела
#[derive(Debug, Default)]
pub struct HurtboxCaster {
    spheres: Vec<(Entity, Vec3, f32)>,
    exclude: Option<Entity>,
}

impl HurtboxCaster {
    pub fn new(spheres: Vec<(Entity, Vec3, f32)>) -> Self {
        Self {
            spheres,
            exclude: None,
        }
    }

    /// Исключить entity (стрелок)
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }
}

impl RayCaster for HurtboxCaster {
    fn cast(&self, origin: Vec3, direction: Vec3, max_range: f32) -> Option<RayHit> {
        self.spheres
            .iter()
            .filter(|(entity, _, _)| Some(*entity) != self.exclude)
            .filter_map(|&(entity, center, radius)| {
                ray_sphere(origin, direction, center, radius, max_range).map(|mut hit| {
                    hit.entity = Some(entity);
                    hit
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Пересечение луча со сферой
///
/// Origin внутри сферы → попадание в точке origin (distance 0).
pub fn ray_sphere(
    origin: Vec3,
    direction: Vec3,
    center: Vec3,
    radius: f32,
    max_range: f32,
) -> Option<RayHit> {
    if radius <= 0.0 {
        return None;
    }

    let offset = origin - center;
    let b = offset.dot(direction);
    let c = offset.length_squared() - radius * radius;

    if c <= 0.0 {
        return Some(RayHit {
            point: origin,
            normal: -direction,
            distance: 0.0,
            entity: None,
        });
    }

    // Сфера позади либо луч проходит мимо
    let discriminant = b * b - c;
    if b > 0.0 || discriminant < 0.0 {
        return None;
    }

    let distance = -b - discriminant.sqrt();
    if distance > max_range {
        return None;
    }

    let point = origin + direction * distance;
    Some(RayHit {
        point,
        normal: (point - center).normalize_or_zero(),
        distance,
        entity: None,
    })
}

/// Ближайшее из двух попаданий
pub fn nearest(a: Option<RayHit>, b: Option<RayHit>) -> Option<RayHit> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.distance < a.distance { b } else { a }),
        (a, b) => a.or(b),
    }
}

/// Spawn цели: Hurtbox + Health + rapier sensor того же радиуса
pub fn spawn_target(commands: &mut Commands, position: Vec3, radius: f32, max_health: u32) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Hurtbox { radius },
            Health::new(max_health),
            Collider::ball(radius),
            Sensor,
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_sphere_front_surface() {
        let hit = ray_sphere(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, -10.0), 1.0, 100.0)
            .expect("sphere straight ahead");
        assert!((hit.distance - 9.0).abs() < 1e-4);
        assert!((hit.point.z + 9.0).abs() < 1e-4);
        assert!((hit.normal - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_ray_misses_sphere_behind_or_aside() {
        assert!(ray_sphere(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, 10.0), 1.0, 100.0).is_none());
        assert!(ray_sphere(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(3.0, 0.0, -10.0), 1.0, 100.0).is_none());
    }

    #[test]
    fn test_ray_respects_max_range() {
        assert!(ray_sphere(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, -10.0), 1.0, 5.0).is_none());
    }

    #[test]
    fn test_origin_inside_sphere_hits_immediately() {
        let hit = ray_sphere(Vec3::ZERO, Vec3::NEG_Z, Vec3::ZERO, 1.0, 100.0).unwrap();
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_hurtbox_caster_picks_nearest_and_skips_shooter() {
        let shooter = Entity::from_raw(1);
        let near = Entity::from_raw(2);
        let far = Entity::from_raw(3);

        let caster = HurtboxCaster::new(vec![
            (shooter, Vec3::ZERO, 0.5),
            (far, Vec3::new(0.0, 0.0, -20.0), 1.0),
            (near, Vec3::new(0.0, 0.0, -8.0), 1.0),
        ])
        .excluding(shooter);

        let hit = caster.cast(Vec3::ZERO, Vec3::NEG_Z, 100.0).unwrap();
        assert_eq!(hit.entity, Some(near));
    }

    #[test]
    fn test_nearest_prefers_closer_hit() {
        let wall = RayHit {
            point: Vec3::new(0.0, 0.0, -3.0),
            normal: Vec3::Z,
            distance: 3.0,
            entity: None,
        };
        let target = RayHit {
            distance: 7.0,
            entity: Some(Entity::from_raw(9)),
            ..wall
        };

        assert_eq!(nearest(Some(target), Some(wall)), Some(wall));
        assert_eq!(nearest(None, Some(target)), Some(target));
        assert_eq!(nearest(None, None), None);
    }

    #[test]
    fn test_spawn_target_collider_matches_hurtbox() {
        let mut world = World::new();
        let radius = 0.75;
        let target = spawn_target(&mut world.commands(), Vec3::new(1.0, 0.0, -5.0), radius, 40);
        world.flush();

        let hurtbox = world.get::<Hurtbox>(target).expect("hurtbox");
        assert_eq!(hurtbox.radius, radius);

        // Rapier-коллайдер той же сферы, sensor: не толкает, только детектит
        let collider_radius = world
            .get::<Collider>(target)
            .and_then(|collider| collider.as_ball())
            .map(|ball| ball.radius());
        assert_eq!(collider_radius, Some(radius));
        assert!(world.get::<Sensor>(target).is_some());

        assert_eq!(world.get::<Health>(target).map(Health::current), Some(40));
        assert_eq!(
            world.get::<Transform>(target).map(|t| t.translation),
            Some(Vec3::new(1.0, 0.0, -5.0))
        );
    }
}
