//! Simulation clock: per-frame delta sanitation and the match countdown.

use bevy::prelude::*;

use crate::{SimSet, simulation_running};

// === Constants ===

/// Frame deltas at or above this many seconds are dropped entirely. A tab
/// coming back from the background must not replay minutes of combat in
/// one tick.
pub const MAX_TICK_SECS: f32 = 0.5;

/// Match length in seconds.
pub const MATCH_DURATION_SECS: f32 = 180.0;

// === Resources ===

/// The sanitized delta for the current frame. Every simulation system
/// reads this instead of [`Time`] so tests can drive the clock directly.
/// A `delta_secs` of zero means the frame was dropped.
#[derive(Resource, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Resource)]
pub struct SimTick {
    pub delta_secs: f32,
}

/// Seconds remaining until the match times out and sudden-death comparison
/// of main tower health decides the outcome.
#[derive(Resource, Debug, Clone, Copy, Reflect)]
#[reflect(Resource)]
pub struct MatchTimer {
    pub remaining_secs: f32,
}

impl Default for MatchTimer {
    fn default() -> Self {
        Self {
            remaining_secs: MATCH_DURATION_SECS,
        }
    }
}

// === Run Conditions ===

/// Run condition: this frame carries a usable delta.
pub fn tick_is_live(tick: Res<SimTick>) -> bool {
    tick.delta_secs > 0.0
}

// === Systems ===

/// Samples the frame delta and drops it if it is non-positive or at the
/// runaway ceiling.
fn advance_sim_tick(time: Res<Time>, mut tick: ResMut<SimTick>) {
    let delta = time.delta_secs();
    tick.delta_secs = if delta > 0.0 && delta < MAX_TICK_SECS {
        delta
    } else {
        0.0
    };
}

/// Counts the match timer down, clamped at zero.
fn tick_match_timer(tick: Res<SimTick>, mut timer: ResMut<MatchTimer>) {
    timer.remaining_secs = (timer.remaining_secs - tick.delta_secs).max(0.0);
}

pub(crate) fn reset_clock(mut tick: ResMut<SimTick>, mut timer: ResMut<MatchTimer>) {
    tick.delta_secs = 0.0;
    timer.remaining_secs = MATCH_DURATION_SECS;
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<SimTick>().register_type::<MatchTimer>();
    app.init_resource::<SimTick>().init_resource::<MatchTimer>();

    app.add_systems(
        Update,
        (
            advance_sim_tick.run_if(simulation_running),
            tick_match_timer.run_if(simulation_running.and(tick_is_live)),
        )
            .chain()
            .in_set(SimSet::Tick),
    );
}
