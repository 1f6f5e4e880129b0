//! Win evaluation: main tower destruction, concession, and the timeout
//! tiebreak.

use bevy::ecs::query::Has;
use bevy::prelude::*;

use crate::BattleState;
use crate::gameplay::battlefield::MainTower;
use crate::gameplay::clock::MatchTimer;
use crate::gameplay::{Dead, Health, Side};
use crate::{SimSet, simulation_running};

// === Types ===

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum MatchOutcome {
    Victory(Side),
    Tie,
}

// === Resources ===

/// Set exactly once, when the evaluator declares an outcome and moves the
/// battle to [`BattleState::Finished`].
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct MatchResult(pub Option<MatchOutcome>);

// === Messages ===

/// A side gives up; the other side wins immediately.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Concede {
    pub side: Side,
}

// === Systems ===

pub(crate) fn reset_result(mut result: ResMut<MatchResult>) {
    result.0 = None;
}

/// Declares the outcome at most once per battle.
///
/// Checked in order: concession, the player's main tower falling (a
/// simultaneous double-destruction frame counts as a defeat), the enemy's
/// main tower falling, then the timeout tiebreak on remaining main tower
/// health.
fn evaluate_match(
    timer: Res<MatchTimer>,
    mut concedes: MessageReader<Concede>,
    mains: Query<(&Side, &Health, Has<Dead>), With<MainTower>>,
    mut result: ResMut<MatchResult>,
    mut next_state: ResMut<NextState<BattleState>>,
) {
    let mut declare = |outcome: MatchOutcome| {
        info!("match over: {outcome:?}");
        result.0 = Some(outcome);
        next_state.set(BattleState::Finished);
    };

    if let Some(concede) = concedes.read().next() {
        declare(MatchOutcome::Victory(concede.side.opposing()));
        return;
    }

    let tower = |wanted: Side| {
        mains
            .iter()
            .find(|(side, ..)| **side == wanted)
            .map(|(_, health, dead)| (health.current, dead))
    };
    let Some((player_hp, player_dead)) = tower(Side::Player) else {
        return;
    };
    let Some((enemy_hp, enemy_dead)) = tower(Side::Enemy) else {
        return;
    };

    if player_dead {
        declare(MatchOutcome::Victory(Side::Enemy));
    } else if enemy_dead {
        declare(MatchOutcome::Victory(Side::Player));
    } else if timer.remaining_secs <= 0.0 {
        if player_hp > enemy_hp {
            declare(MatchOutcome::Victory(Side::Player));
        } else if enemy_hp > player_hp {
            declare(MatchOutcome::Victory(Side::Enemy));
        } else {
            declare(MatchOutcome::Tie);
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<MatchResult>();
    app.init_resource::<MatchResult>();
    app.add_message::<Concede>();

    app.add_systems(
        Update,
        evaluate_match
            .in_set(SimSet::Evaluate)
            .run_if(simulation_running),
    );
}
