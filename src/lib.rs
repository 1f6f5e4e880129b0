//! Headless real-time battle simulation for a two-lane card battler.
//!
//! The crate exposes a single [`plugin`] that a host application adds to a
//! Bevy [`App`]. The host drives the simulation by calling `app.update()`,
//! feeds it [`PlayCard`](gameplay::deploy::PlayCard) messages, and observes
//! outcomes through the message types in [`signals`] and the
//! [`MatchResult`](gameplay::endgame::MatchResult) resource. No rendering,
//! input, or audio lives here.

use bevy::prelude::*;

pub mod catalog;
pub mod element;
pub mod gameplay;
pub mod signals;

#[cfg(test)]
pub(crate) mod testing;

// === States ===

/// Top-level lifecycle of a battle.
///
/// `Idle` is the resting state before a battle is configured. Entering
/// `Running` builds the battlefield from [`gameplay::BattleSetup`]. The
/// evaluator moves the app to `Finished` exactly once; after that every
/// simulation system stops and the world stays frozen for inspection.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum BattleState {
    #[default]
    Idle,
    Running,
    Finished,
}

// === System Sets ===

/// Fixed per-frame ordering of the simulation.
///
/// Mirrors the causal order of a single tick: measure the frame delta,
/// regenerate elixir, pick targets, move, fight, apply health changes, let
/// the scripted opponent act, reap the dead, then check for a winner.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Tick,
    Economy,
    Targeting,
    Movement,
    Combat,
    Damage,
    Opponent,
    Death,
    Evaluate,
}

// === Run Conditions ===

/// Run condition: the battle is in progress.
pub fn simulation_running(state: Res<State<BattleState>>) -> bool {
    matches!(state.get(), BattleState::Running)
}

// === Plugin ===

/// Installs the whole simulation. The host app must also provide Bevy's
/// state machinery (`DefaultPlugins` or `StatesPlugin` under
/// `MinimalPlugins`).
pub fn plugin(app: &mut App) {
    app.init_state::<BattleState>();
    app.register_type::<BattleState>();

    app.configure_sets(
        Update,
        (
            SimSet::Tick,
            SimSet::Economy,
            SimSet::Targeting,
            SimSet::Movement,
            SimSet::Combat,
            SimSet::Damage,
            SimSet::Opponent,
            SimSet::Death,
            SimSet::Evaluate,
        )
            .chain(),
    );

    app.add_plugins((signals::plugin, gameplay::plugin));
}
