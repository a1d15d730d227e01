//! Feedback systems — релаксация spread / recoil / FOV и выдача дельт камере

use bevy::prelude::*;

use crate::combat::Dead;
use crate::input::Controlled;
use crate::weapon::{ViewFeedback, Weapon};

/// System: accumulate → expose → decay
///
/// Запускается после `drive_weapons`: на тике выстрела spread ещё не релаксирует,
/// recoil затухает всегда, `ViewFeedback` получает дельту этого тика.
pub fn relax_weapon_feedback(
    time: Res<Time<Fixed>>,
    mut weapons: Query<(&mut Weapon, &mut ViewFeedback), (With<Controlled>, Without<Dead>)>,
) {
    let delta = time.delta_secs();

    for (mut weapon, mut feedback) in weapons.iter_mut() {
        let feedback = &mut *feedback;
        let (pitch_delta, yaw_delta) = weapon.relax(&mut feedback.fov, delta);
        feedback.pitch_delta = pitch_delta;
        feedback.yaw_delta = yaw_delta;
    }
}
