//! Authority gate — кто имеет право менять Health
//!
//! Роль резолвится один раз на сессию (`NetworkRole`) и живёт в resource
//! `AuthorityGate`. Все мутации Health идут через gate: неавторитетная сторона
//! получает `AuthorityError`, состояние не меняется.

use bevy::prelude::*;
use thiserror::Error;

use crate::combat::{Health, HealthChange};

/// Роль процесса в сетевой сессии
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum NetworkRole {
    /// Без networking — локальная игра, сам себе сервер
    #[default]
    Standalone,
    /// Listen-server (сервер + локальный игрок)
    Host,
    /// Dedicated server
    Server,
    /// Клиент: только cosmetic feedback, урон не коммитит
    Client,
}

impl NetworkRole {
    pub fn is_authoritative(&self) -> bool {
        !matches!(self, NetworkRole::Client)
    }
}

/// Попытка мутации Health без авторитета
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    #[error("non-authoritative party tried to mutate health of {target:?}")]
    NotAuthoritative { target: Entity },
}

/// Единственная точка мутации HealthLedger
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct AuthorityGate {
    role: NetworkRole,
}

impl AuthorityGate {
    pub fn new(role: NetworkRole) -> Self {
        Self { role }
    }

    pub fn role(&self) -> NetworkRole {
        self.role
    }

    pub fn is_authoritative(&self) -> bool {
        self.role.is_authoritative()
    }

    /// Урон по цели (только для авторитетной стороны)
    pub fn apply_damage(
        &self,
        target: Entity,
        health: &mut Health,
        amount: u32,
    ) -> Result<HealthChange, AuthorityError> {
        if !self.is_authoritative() {
            return Err(AuthorityError::NotAuthoritative { target });
        }
        Ok(health.take_damage(amount))
    }

    /// Лечение цели (только для авторитетной стороны)
    pub fn heal(
        &self,
        target: Entity,
        health: &mut Health,
        amount: u32,
    ) -> Result<HealthChange, AuthorityError> {
        if !self.is_authoritative() {
            return Err(AuthorityError::NotAuthoritative { target });
        }
        Ok(health.heal(amount))
    }
}
