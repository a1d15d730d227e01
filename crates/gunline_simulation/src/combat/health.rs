//! Health ledger: Health component + damage/heal/death events
//!
//! Мутация Health только через `AuthorityGate` (pub(crate) take_damage/heal).
//! Внешний код видит read-only getters.

use bevy::prelude::*;

/// Здоровье entity
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

/// Результат изменения health (что было → что стало)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthChange {
    pub previous: u32,
    pub current: u32,
    pub max: u32,
    /// true ровно на переходе >0 → 0
    pub died: bool,
}

impl HealthChange {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Частично повреждённая цель (current клампится в [0, max])
    pub fn with_current(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub(crate) fn take_damage(&mut self, amount: u32) -> HealthChange {
        let previous = self.current;
        self.current = self.current.saturating_sub(amount);
        HealthChange {
            previous,
            current: self.current,
            max: self.max,
            died: previous > 0 && self.current == 0,
        }
    }

    /// Труп (current == 0) не лечится, даже если `Dead` ещё не вставлен
    pub(crate) fn heal(&mut self, amount: u32) -> HealthChange {
        let previous = self.current;
        if self.is_alive() {
            self.current = self.current.saturating_add(amount).min(self.max);
        }
        HealthChange {
            previous,
            current: self.current,
            max: self.max,
            died: false,
        }
    }
}

/// Событие: health изменился (только authoritative сторона)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub previous: u32,
    pub current: u32,
    pub max: u32,
    pub source: Option<Entity>,
}

impl HealthChanged {
    pub fn from_change(entity: Entity, change: HealthChange, source: Option<Entity>) -> Self {
        Self {
            entity,
            previous: change.previous,
            current: change.current,
            max: change.max,
            source,
        }
    }
}

/// Событие: entity умер (health дошёл до 0) — один раз на смерть
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Запрос на урон не от выстрела (environment, скрипты, сетевой слой)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageIntent {
    pub target: Entity,
    pub amount: u32,
    pub source: Option<Entity>,
}

/// Запрос на лечение
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealIntent {
    pub target: Entity,
    pub amount: u32,
}

/// Компонент-маркер: entity мертв (Health == 0)
///
/// Мёртвые не стреляют и не получают повторных EntityDied.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Opt-in: после смерти деспавн через `delay` секунд
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnOnDeath {
    pub delay: f32,
}

/// Компонент-маркер: деспавн entity после указанного времени
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах симуляции)
    pub despawn_time: f32,
}
