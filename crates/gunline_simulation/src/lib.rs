//! Gunline Simulation Core
//!
//! ECS-симуляция оружия на Bevy 0.16: state machine оружия, spread/recoil/FOV,
//! hit resolution с authority gate, health ledger.
//!
//! Один fixed тик (64Hz по умолчанию):
//! Equip → Weapons → Feedback → HitResolution → Health
//!
//! Хост (engine bridge / dedicated server) пишет `WeaponIntent`, читает
//! `ViewFeedback`, `ShotTrace`, `HealthChanged` и HUD snapshot.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod authority;
pub mod combat;
pub mod feedback;
pub mod input;
pub mod logger;
pub mod weapon;

// Re-export базовых типов для удобства
pub use authority::{AuthorityError, AuthorityGate, NetworkRole};
pub use combat::{
    spawn_target, CombatPlugin, DamageIntent, Dead, DespawnOnDeath, EntityDied, HealIntent, Health,
    HealthChanged, Hurtbox, RayCaster, RayHit, ShotTrace, TraceHit, WorldRaycaster,
};
pub use feedback::FeedbackPlugin;
pub use input::{Controlled, WeaponIntent};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel, UnknownLogLevel,
};
pub use weapon::{
    spawn_shooter, CycleWeaponIntent, EquipWeaponIntent, FireMode, Muzzle, ReloadPhase, ReloadProgress,
    ShotFired, ViewFeedback, Weapon, WeaponCatalog, WeaponEquipped, WeaponHud, WeaponPlugin,
    WeaponProfile,
};

/// Default fixed tick rate
pub const DEFAULT_TICK_HZ: f64 = 64.0;

/// Порядок фаз внутри одного fixed тика (chain)
///
/// intent → transition → spread/recoil → hit resolution → health
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    Equip,
    Weapons,
    Feedback,
    HitResolution,
    Health,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// `seed` используется только если `DeterministicRng` ещё не вставлен
/// (`create_headless_app` вставляет свой).
pub struct SimulationPlugin {
    pub role: NetworkRole,
    pub tick_hz: f64,
    pub seed: u64,
    /// Минимальный уровень глобального logger'а (debug = каждый выстрел)
    pub log_level: LogLevel,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            role: NetworkRole::Standalone,
            tick_hz: DEFAULT_TICK_HZ,
            seed: 42,
            log_level: LogLevel::Info,
        }
    }
}

impl SimulationPlugin {
    pub fn with_role(role: NetworkRole) -> Self {
        Self {
            role,
            ..Default::default()
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        set_log_level(self.log_level);

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(self.seed));
        }

        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(self.tick_hz))
            .insert_resource(AuthorityGate::new(self.role))
            // Каталог по умолчанию (presets), хост может вставить свой заранее
            .init_resource::<WeaponCatalog>()
            .configure_sets(
                FixedUpdate,
                (
                    TickSet::Equip,
                    TickSet::Weapons,
                    TickSet::Feedback,
                    TickSet::HitResolution,
                    TickSet::Health,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((WeaponPlugin, FeedbackPlugin, CombatPlugin));

        logger::log_info(&format!(
            "Simulation: role {:?}, {} Hz, authoritative: {}",
            self.role,
            self.tick_hz,
            self.role.is_authoritative()
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Виртуальные часы двигаются ровно на один fixed шаг за `App::update`
/// (первый update только запускает часы).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / DEFAULT_TICK_HZ,
        )))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(DEFAULT_TICK_HZ));

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Компоненты сериализуются через Debug, отсортированные по Entity index.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
