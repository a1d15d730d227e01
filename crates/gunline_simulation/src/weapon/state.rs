//! Weapon runtime state + state machine (Idle / Firing / Reloading, orthogonal Aiming)
//!
//! Архитектура:
//! - `Weapon` component = shared `Arc<WeaponProfile>` + mutable runtime state
//! - Мутируется ТОЛЬКО тиком владельца (`drive_weapons`), один тик = максимум один выстрел
//! - Reload = `ReloadOperation` внутри `WeaponMode::Reloading`: операция забирается
//!   из mode по значению и поглощается либо `cancel`, либо `complete` — ровно одно из двух
//!
//! Инварианты:
//! - 0 ≤ ammo_loaded ≤ magazine_capacity, 0 ≤ ammo_reserve ≤ reserve_capacity
//! - Reloading ⇒ огонь и aiming заблокированы
//! - 0 ≤ spread ≤ max_spread

use bevy::prelude::*;
use rand::Rng;
use std::sync::Arc;

use super::profile::{FireMode, WeaponProfile};
use crate::feedback::{FovFeedback, RecoilAccumulator, Spread};
use crate::input::WeaponIntent;

/// Таймерная отменяемая операция перезарядки
///
/// Не `Clone`: операция существует в единственном экземпляре и исчезает
/// при `cancel`/`complete`.
#[derive(Debug, PartialEq)]
pub struct ReloadOperation {
    elapsed: f32,
    duration: f32,
}

impl ReloadOperation {
    fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    /// Отмена: патроны не трогаем
    fn cancel(self) -> ReloadPhase {
        ReloadPhase::Cancelled
    }

    /// Завершение: остаток магазина → reserve, затем магазин из reserve
    fn complete(
        self,
        ammo_loaded: &mut u32,
        ammo_reserve: &mut u32,
        magazine_capacity: u32,
        reserve_capacity: u32,
    ) -> ReloadPhase {
        let total = ammo_loaded.saturating_add(*ammo_reserve);
        let loaded = total.min(magazine_capacity);
        *ammo_loaded = loaded;
        *ammo_reserve = (total - loaded).min(reserve_capacity);
        ReloadPhase::Completed
    }
}

/// Режим оружия
#[derive(Debug, Default, PartialEq)]
pub enum WeaponMode {
    #[default]
    Idle,
    /// Transient: выстрел был на этом тике, на следующем → Idle
    Firing,
    Reloading(ReloadOperation),
}

impl WeaponMode {
    pub fn is_reloading(&self) -> bool {
        matches!(self, WeaponMode::Reloading(_))
    }

    pub fn is_firing(&self) -> bool {
        matches!(self, WeaponMode::Firing)
    }
}

/// Фаза reload для событий/логов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ReloadPhase {
    Started,
    Cancelled,
    Completed,
}

/// Выстрел на этом тике: угловое возмущение spread (градусы, x = yaw, y = pitch)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSample {
    pub spread_offset: Vec2,
    pub damage: u32,
    pub max_range: f32,
}

/// Результат одного тика
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub shot: Option<ShotSample>,
    pub reload: Option<ReloadPhase>,
}

/// Read-only snapshot для HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponHud {
    pub ammo_loaded: u32,
    pub ammo_reserve: u32,
    pub reloading: bool,
    pub needs_reload: bool,
    pub low_ammo: bool,
}

/// Экипированное оружие (profile + runtime state)
#[derive(Component, Debug)]
#[require(WeaponIntent, ViewFeedback, Transform)]
pub struct Weapon {
    profile: Arc<WeaponProfile>,
    ammo_loaded: u32,
    ammo_reserve: u32,
    mode: WeaponMode,
    aiming: bool,
    needs_reload: bool,
    spread: Spread,
    recoil: RecoilAccumulator,
    /// Timestamp (секунды симуляции), раньше которого огонь запрещён.
    /// f64: у f32 шаг ~0.06s уже после суток аптайма
    next_fire_allowed_at: f64,
    /// Semi-auto gate: кнопку отпускали после последнего выстрела
    fire_released_since_last_shot: bool,
}

impl Weapon {
    /// Equip: runtime state копируется из defaults профиля
    pub fn new(profile: Arc<WeaponProfile>) -> Self {
        Self {
            ammo_loaded: profile.magazine_capacity,
            ammo_reserve: profile.starting_reserve.min(profile.reserve_capacity),
            mode: WeaponMode::Idle,
            aiming: false,
            needs_reload: false,
            spread: Spread::new(profile.base_spread.min(profile.max_spread)),
            recoil: RecoilAccumulator::default(),
            next_fire_allowed_at: 0.0,
            fire_released_since_last_shot: true,
            profile,
        }
    }

    /// Конкретные патроны (сценарии, восстановление состояния с сервера)
    pub fn with_ammo(mut self, loaded: u32, reserve: u32) -> Self {
        self.ammo_loaded = loaded.min(self.profile.magazine_capacity);
        self.ammo_reserve = reserve.min(self.profile.reserve_capacity);
        self.needs_reload = self.ammo_loaded == 0;
        self
    }

    pub fn profile(&self) -> &Arc<WeaponProfile> {
        &self.profile
    }

    pub fn ammo_loaded(&self) -> u32 {
        self.ammo_loaded
    }

    pub fn ammo_reserve(&self) -> u32 {
        self.ammo_reserve
    }

    pub fn mode(&self) -> &WeaponMode {
        &self.mode
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    pub fn spread(&self) -> f32 {
        self.spread.current()
    }

    pub fn recoil(&self) -> &RecoilAccumulator {
        &self.recoil
    }

    pub fn next_fire_allowed_at(&self) -> f64 {
        self.next_fire_allowed_at
    }

    pub fn hud(&self) -> WeaponHud {
        WeaponHud {
            ammo_loaded: self.ammo_loaded,
            ammo_reserve: self.ammo_reserve,
            reloading: self.mode.is_reloading(),
            needs_reload: self.needs_reload,
            low_ammo: self.ammo_loaded > 0 && self.ammo_loaded <= self.profile.low_ammo_threshold,
        }
    }

    /// Weapon switch: новый профиль, магазин полный, resting spread, reload отменён
    ///
    /// Возвращает `true` если был отменён reload. Recoil не сбрасывается —
    /// камера доигрывает kick предыдущего оружия.
    pub fn set_profile(&mut self, profile: Arc<WeaponProfile>) -> bool {
        let cancelled = match std::mem::take(&mut self.mode) {
            WeaponMode::Reloading(operation) => {
                operation.cancel();
                true
            }
            _ => false,
        };

        self.ammo_loaded = profile.magazine_capacity;
        self.ammo_reserve = profile.starting_reserve.min(profile.reserve_capacity);
        self.aiming = false;
        self.needs_reload = false;
        self.spread = Spread::new(profile.base_spread.min(profile.max_spread));
        self.next_fire_allowed_at = 0.0;
        self.fire_released_since_last_shot = true;
        self.profile = profile;

        cancelled
    }

    /// Один тик state machine
    ///
    /// Порядок: reload (cancel-check → timer) либо aiming → fire → reload start.
    /// `now` — время симуляции на этом тике, `delta` — длина тика.
    pub fn tick(
        &mut self,
        intent: &WeaponIntent,
        now: f64,
        delta: f32,
        rng: &mut impl Rng,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.mode.is_firing() {
            self.mode = WeaponMode::Idle;
        }
        if !intent.fire_held {
            self.fire_released_since_last_shot = true;
        }

        if self.mode.is_reloading() {
            self.aiming = false;
            outcome.reload = self.advance_reload(intent.fire_held, delta);
            return outcome;
        }

        self.aiming = intent.aim_held && self.ammo_loaded > 0;

        let trigger = match self.profile.fire_mode {
            FireMode::FullAuto => intent.fire_held,
            FireMode::SemiAuto => intent.fire_held && self.fire_released_since_last_shot,
        };

        if trigger {
            if self.ammo_loaded == 0 {
                self.needs_reload = true;
            } else if now >= self.next_fire_allowed_at {
                outcome.shot = Some(self.fire(now, rng));
            }
        }

        let wants_reload = intent.reload_pressed
            || (self.profile.auto_reload && self.needs_reload && !intent.fire_held);
        if outcome.shot.is_none() && wants_reload && self.can_start_reload() {
            self.mode = WeaponMode::Reloading(ReloadOperation::new(self.profile.reload_duration));
            self.aiming = false;
            outcome.reload = Some(ReloadPhase::Started);
        }

        outcome
    }

    /// Spread/recoil/FOV релаксация (каждый тик, после state machine)
    ///
    /// Spread не релаксирует на тике выстрела; recoil затухает всегда.
    pub fn relax(&mut self, fov: &mut FovFeedback, delta: f32) -> (f32, f32) {
        let profile = &self.profile;

        if !self.mode.is_firing() {
            let target = if self.aiming {
                profile.aim_spread
            } else {
                profile.base_spread
            };
            self.spread
                .relax(target, profile.spread_recovery, delta, profile.max_spread);
        }

        self.recoil.decay(profile.recoil_recovery, delta);
        fov.update(profile, self.aiming, delta);

        self.recoil.take_view_delta()
    }

    fn can_start_reload(&self) -> bool {
        !self.mode.is_reloading()
            && !self.aiming
            && self.ammo_loaded < self.profile.magazine_capacity
            && self.ammo_reserve > 0
    }

    fn fire(&mut self, now: f64, rng: &mut impl Rng) -> ShotSample {
        let profile = Arc::clone(&self.profile);

        self.ammo_loaded -= 1;
        self.next_fire_allowed_at = now + f64::from(profile.fire_interval);
        self.fire_released_since_last_shot = false;
        self.mode = WeaponMode::Firing;

        // Направление берём из spread ДО bloom этого выстрела
        let spread_offset = self.spread.sample(rng);
        self.spread.grow(profile.spread_per_shot, profile.max_spread);
        self.recoil.kick(
            profile.vertical_recoil,
            profile.horizontal_recoil,
            profile.horizontal_bias,
            rng,
        );

        if self.ammo_loaded == 0 {
            self.needs_reload = true;
            self.aiming = false;
        }

        ShotSample {
            spread_offset,
            damage: profile.damage,
            max_range: profile.max_range,
        }
    }

    /// Cancel-check до продвижения таймера: латентность отмены ≤ 1 тик
    fn advance_reload(&mut self, cancel: bool, delta: f32) -> Option<ReloadPhase> {
        let WeaponMode::Reloading(mut operation) = std::mem::take(&mut self.mode) else {
            return None;
        };

        if cancel {
            return Some(operation.cancel());
        }

        operation.elapsed += delta;
        if operation.elapsed < operation.duration {
            self.mode = WeaponMode::Reloading(operation);
            return None;
        }

        let phase = operation.complete(
            &mut self.ammo_loaded,
            &mut self.ammo_reserve,
            self.profile.magazine_capacity,
            self.profile.reserve_capacity,
        );
        self.needs_reload = self.ammo_loaded == 0;
        Some(phase)
    }
}

/// Feedback sink: что камера должна применить на этом тике
///
/// `pitch_delta`/`yaw_delta` — изменение recoil offset с прошлого тика
/// (перезаписывается каждый тик, потребитель только читает).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ViewFeedback {
    pub pitch_delta: f32,
    pub yaw_delta: f32,
    pub fov: FovFeedback,
}

impl ViewFeedback {
    pub fn for_profile(profile: &WeaponProfile) -> Self {
        Self {
            fov: FovFeedback::for_profile(profile),
            ..Default::default()
        }
    }
}

/// Ссылка на entity дула (origin луча); нет / битая ссылка → позиция камеры
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Muzzle(pub Entity);
