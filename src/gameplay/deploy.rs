//! Card deployment: validates play requests from either side, spends
//! elixir, and spawns units or resolves spells.

use bevy::prelude::*;

use crate::gameplay::combat::HealthDelta;
use crate::gameplay::spells::{SpellRecipients, resolve_spell};
use crate::gameplay::units::spawn_card_units;
use crate::gameplay::{Side, SimRng, battlefield, economy::Elixir};
use crate::catalog::{CardData, CardPayload};
use crate::signals::{SpellCast, UnitSpawned};
use crate::{SimSet, simulation_running};

/// A request to play a card at a battlefield position. Invalid requests
/// (bad card data, wrong drop zone, not enough elixir) are logged and
/// dropped without side effects.
#[derive(Message, Debug, Clone)]
pub struct PlayCard {
    pub card: CardData,
    pub position: Vec2,
    pub side: Side,
}

pub(crate) fn handle_play_card(
    mut plays: MessageReader<PlayCard>,
    mut elixir: ResMut<Elixir>,
    mut rng: ResMut<SimRng>,
    mut commands: Commands,
    recipients: SpellRecipients,
    mut spawned: MessageWriter<UnitSpawned>,
    mut casts: MessageWriter<SpellCast>,
    mut deltas: MessageWriter<HealthDelta>,
) {
    for play in plays.read() {
        if let Err(reason) = play.card.validate() {
            warn!("rejecting card '{}': {reason}", play.card.id);
            continue;
        }
        if !battlefield::is_valid_drop_zone(play.position, play.side, play.card.kind()) {
            warn!(
                "rejecting card '{}': {:?} cannot deploy at {:?}",
                play.card.id, play.side, play.position
            );
            continue;
        }
        let pool = elixir.pool_mut(play.side);
        if !pool.can_afford(play.card.cost) {
            debug!(
                "rejecting card '{}': {:?} cannot afford {}",
                play.card.id, play.side, play.card.cost
            );
            continue;
        }
        pool.spend(play.card.cost);

        match &play.card.payload {
            CardPayload::Unit { stats } | CardPayload::Building { stats } => {
                spawn_card_units(
                    &mut commands,
                    &mut rng,
                    &play.card.name,
                    stats,
                    play.card.element,
                    play.side,
                    play.position,
                    &mut spawned,
                );
            }
            CardPayload::Spell { effect } => {
                resolve_spell(
                    effect,
                    play.card.element,
                    play.position,
                    play.side,
                    &recipients,
                    &mut deltas,
                    &mut casts,
                );
            }
        }
    }
}

/// Drops stale play requests when no battle is running so cards queued in
/// menus cannot fire into the next match.
fn discard_stale_plays(mut plays: MessageReader<PlayCard>) {
    plays.clear();
}

pub(super) fn plugin(app: &mut App) {
    app.add_message::<PlayCard>();

    app.add_systems(
        Update,
        (
            handle_play_card
                .in_set(SimSet::Opponent)
                .run_if(simulation_running),
            discard_stale_plays.run_if(not(simulation_running)),
        ),
    );
}
