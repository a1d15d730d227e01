//! Weapon catalog — упорядоченный список профилей (hotkeys / cycle)
//!
//! Профили хранятся как `Arc<WeaponProfile>`: equip клонирует указатель,
//! tuning никогда не копируется и не мутируется.
//! Источник: hardcoded presets (`Default`) или JSON от внешнего загрузчика.

use bevy::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::profile::{ProfileError, WeaponProfile};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse weapon catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("weapon catalog is empty")]
    Empty,
    #[error("duplicate weapon id `{0}`")]
    DuplicateId(String),
    #[error("invalid weapon profile `{id}`: {source}")]
    InvalidProfile {
        id: String,
        #[source]
        source: ProfileError,
    },
}

/// Каталог доступных оружий (порядок = индекс слота)
#[derive(Resource, Debug, Clone)]
pub struct WeaponCatalog {
    profiles: Vec<Arc<WeaponProfile>>,
    by_id: HashMap<String, usize>,
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        // Presets заведомо валидны и уникальны
        let profiles = vec![
            WeaponProfile::assault_rifle(),
            WeaponProfile::pistol(),
            WeaponProfile::smg(),
            WeaponProfile::marksman(),
        ];
        let by_id = profiles
            .iter()
            .enumerate()
            .map(|(index, profile)| (profile.id.clone(), index))
            .collect();

        Self {
            profiles: profiles.into_iter().map(Arc::new).collect(),
            by_id,
        }
    }
}

impl WeaponCatalog {
    /// Собрать каталог из профилей (валидация + уникальность id)
    pub fn new(profiles: Vec<WeaponProfile>) -> Result<Self, CatalogError> {
        if profiles.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut by_id = HashMap::with_capacity(profiles.len());
        for (index, profile) in profiles.iter().enumerate() {
            profile
                .validate()
                .map_err(|source| CatalogError::InvalidProfile {
                    id: profile.id.clone(),
                    source,
                })?;

            if by_id.insert(profile.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId(profile.id.clone()));
            }
        }

        Ok(Self {
            profiles: profiles.into_iter().map(Arc::new).collect(),
            by_id,
        })
    }

    /// JSON массив профилей; пропущенные поля берутся из `WeaponProfile::default()`
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let profiles: Vec<WeaponProfile> = serde_json::from_str(json)?;
        Self::new(profiles)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<WeaponProfile>> {
        self.profiles.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Arc<WeaponProfile>> {
        self.index_of(id).and_then(|index| self.profiles.get(index))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Следующий профиль после `current_id` (wrap). Неизвестный id считается индексом 0.
    pub fn next_after(&self, current_id: &str) -> Option<&Arc<WeaponProfile>> {
        if self.profiles.is_empty() {
            return None;
        }
        let current = self.index_of(current_id).unwrap_or(0);
        self.profiles.get((current + 1) % self.profiles.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<WeaponProfile>> {
        self.profiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapon::FireMode;

    #[test]
    fn test_default_catalog_order() {
        let catalog = WeaponCatalog::default();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get(0).unwrap().id, "assault_rifle");
        assert_eq!(catalog.index_of("smg"), Some(2));
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn test_next_after_wraps() {
        let catalog = WeaponCatalog::default();
        assert_eq!(catalog.next_after("assault_rifle").unwrap().id, "pistol");
        assert_eq!(catalog.next_after("marksman").unwrap().id, "assault_rifle");
        // Неизвестный id → как будто текущий индекс 0
        assert_eq!(catalog.next_after("railgun").unwrap().id, "pistol");
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let json = r#"[
            { "id": "shotgun", "name": "Shotgun", "fire_mode": "semi_auto",
              "magazine_capacity": 6, "starting_reserve": 24, "damage": 60 },
            { "id": "carbine" }
        ]"#;

        let catalog = WeaponCatalog::from_json(json).unwrap();
        let shotgun = catalog.find("shotgun").unwrap();
        assert_eq!(shotgun.fire_mode, FireMode::SemiAuto);
        assert_eq!(shotgun.magazine_capacity, 6);
        assert_eq!(shotgun.damage, 60);
        // Не указано → default (rifle)
        assert_eq!(shotgun.reload_duration, 2.0);

        let carbine = catalog.find("carbine").unwrap();
        assert_eq!(carbine.magazine_capacity, 30);
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            WeaponCatalog::from_json("not json"),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(WeaponCatalog::from_json("[]"), Err(CatalogError::Empty)));
        assert!(matches!(
            WeaponCatalog::from_json(r#"[{ "id": "a" }, { "id": "a" }]"#),
            Err(CatalogError::DuplicateId(id)) if id == "a"
        ));
        assert!(matches!(
            WeaponCatalog::from_json(r#"[{ "id": "broken", "magazine_capacity": 0 }]"#),
            Err(CatalogError::InvalidProfile { id, source: ProfileError::EmptyMagazine }) if id == "broken"
        ));
    }

    #[test]
    fn test_profiles_are_shared() {
        let catalog = WeaponCatalog::default();
        let a = Arc::clone(catalog.get(1).unwrap());
        let b = Arc::clone(catalog.find("pistol").unwrap());
        assert!(Arc::ptr_eq(&a, &b));
    }
}
