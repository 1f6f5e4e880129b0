//! Death handling: a short telegraph window, then despawn.
//!
//! Destroyed towers skip all of this; they stay in the world as dead
//! entities so end-of-match health comparison can still read them.

use bevy::prelude::*;

use crate::gameplay::Dead;
use crate::gameplay::clock::{SimTick, tick_is_live};
use crate::gameplay::units::Unit;
use crate::{SimSet, simulation_running};

// === Constants ===

/// How long a dead unit lingers before despawning, giving presentation
/// layers time to play a death animation.
pub const DEATH_TELEGRAPH_SECS: f32 = 0.5;

// === Components ===

/// Countdown from death to despawn.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct DeathTimer(pub Timer);

impl Default for DeathTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(DEATH_TELEGRAPH_SECS, TimerMode::Once))
    }
}

// === Systems ===

fn reap_dead_units(
    tick: Res<SimTick>,
    mut commands: Commands,
    mut dying: Query<(Entity, &mut DeathTimer), (With<Unit>, With<Dead>)>,
) {
    for (entity, mut timer) in &mut dying {
        timer.0.tick(std::time::Duration::from_secs_f32(tick.delta_secs));
        if timer.0.just_finished() {
            commands.entity(entity).despawn();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<DeathTimer>();

    app.add_systems(
        Update,
        reap_dead_units
            .in_set(SimSet::Death)
            .run_if(simulation_running.and(tick_is_live)),
    );
}
