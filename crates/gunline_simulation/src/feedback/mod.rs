//! Spread & Recoil model — локальный feedback стрелка
//!
//! Содержит:
//! - `Spread` (bloom cone + perturbation направления)
//! - `RecoilAccumulator` (kick → view delta → decay)
//! - `FovFeedback` (ADS zoom + kick на выстрел, first-person + observer)
//! - `relax_weapon_feedback` system

use bevy::prelude::*;

pub mod fov;
pub mod recoil;
pub mod spread;
pub mod systems;

pub use fov::{FovChannel, FovFeedback};
pub use recoil::{RecoilAccumulator, RECOIL_LIMIT};
pub use spread::{perturb_direction, Spread};
pub use systems::relax_weapon_feedback;

use crate::TickSet;

/// Feedback Plugin: релаксация после тика оружия (`TickSet::Feedback`)
pub struct FeedbackPlugin;

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, relax_weapon_feedback.in_set(TickSet::Feedback));
    }
}
