//! The scripted opponent: difficulty profiles, a cycling card pool, and a
//! periodic play decision.

use bevy::prelude::*;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, CardData};
use crate::gameplay::battlefield::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::gameplay::clock::{SimTick, tick_is_live};
use crate::gameplay::deploy::{PlayCard, handle_play_card};
use crate::gameplay::economy::Elixir;
use crate::gameplay::{BattleSetup, Side, SimRng, validated_deck};
use crate::{SimSet, simulation_running};

// === Constants ===

/// Cards the opponent holds at once.
pub const HAND_SIZE: usize = 4;

/// Horizontal deployment band, as fractions of the arena width.
const DEPLOY_X_BAND: (f32, f32) = (0.3, 0.7);

/// Vertical deployment band, as fractions of the arena height. Stays
/// within the opponent's own half.
const DEPLOY_Y_BAND: (f32, f32) = (0.1, 0.4);

// === Types ===

/// Opponent skill level. Each level maps to a fixed profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

/// Tuning knobs derived from a [`Difficulty`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Seconds between play decisions.
    pub think_interval: f32,
    /// Multiplier on the opponent's elixir regeneration.
    pub elixir_rate_multiplier: f32,
    /// Levels added to every card in the opponent's deck.
    pub card_level_bonus: i32,
    /// Chance per decision to actually play a card.
    pub aggressiveness: f32,
}

impl Difficulty {
    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile {
                think_interval: 3.0,
                elixir_rate_multiplier: 0.8,
                card_level_bonus: -1,
                aggressiveness: 0.3,
            },
            Self::Normal => DifficultyProfile {
                think_interval: 2.0,
                elixir_rate_multiplier: 1.0,
                card_level_bonus: 0,
                aggressiveness: 0.5,
            },
            Self::Hard => DifficultyProfile {
                think_interval: 1.5,
                elixir_rate_multiplier: 1.2,
                card_level_bonus: 1,
                aggressiveness: 0.7,
            },
            Self::Expert => DifficultyProfile {
                think_interval: 1.0,
                elixir_rate_multiplier: 1.5,
                card_level_bonus: 2,
                aggressiveness: 0.9,
            },
        }
    }
}

// === Resources ===

/// The opponent's cards and decision clock.
///
/// The hand is refilled from a draw pool. Draws pop the end of the pool,
/// played cards cycle to the front, and the full deck is reshuffled in
/// whenever the pool runs dry.
#[derive(Resource, Debug, Default)]
pub struct Opponent {
    pub deck: Vec<CardData>,
    pub pool: Vec<CardData>,
    pub hand: Vec<CardData>,
    pub think_timer: f32,
    pub profile: DifficultyProfile,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Difficulty::Normal.profile()
    }
}

impl Opponent {
    /// Draws one card into the hand, reshuffling the deck into the pool
    /// if it is empty.
    fn draw(&mut self, rng: &mut SimRng) {
        if self.pool.is_empty() {
            self.pool = self.deck.clone();
            self.pool.shuffle(&mut rng.0);
        }
        if let Some(card) = self.pool.pop() {
            self.hand.push(card);
        }
    }
}

// === Systems ===

/// Rebuilds the opponent for a new battle: validates and level-scales the
/// configured deck, shuffles, and deals the opening hand.
pub(crate) fn reset_opponent(
    mut opponent: ResMut<Opponent>,
    mut rng: ResMut<SimRng>,
    setup: Res<BattleSetup>,
) {
    let profile = setup.difficulty.profile();
    // Difficulty stacks on top of whatever level the deck already carries.
    let deck: Vec<CardData> = validated_deck(&setup.opponent_deck)
        .iter()
        .map(|card| catalog::scale_for_level(card, (card.level + profile.card_level_bonus).max(1)))
        .collect();

    opponent.profile = profile;
    opponent.think_timer = profile.think_interval;
    opponent.deck = deck.clone();
    opponent.pool = deck;
    opponent.pool.shuffle(&mut rng.0);
    opponent.hand.clear();
    for _ in 0..HAND_SIZE {
        opponent.draw(&mut rng);
    }
}

/// Periodic play decision. Each time the think timer elapses the opponent
/// looks at its affordable cards, rolls against its aggressiveness, and
/// either passes or plays one at random somewhere in its deployment band.
fn opponent_think(
    tick: Res<SimTick>,
    mut opponent: ResMut<Opponent>,
    elixir: Res<Elixir>,
    mut rng: ResMut<SimRng>,
    mut plays: MessageWriter<PlayCard>,
) {
    opponent.think_timer -= tick.delta_secs;
    if opponent.think_timer > 0.0 {
        return;
    }
    opponent.think_timer = opponent.profile.think_interval;

    let pool = elixir.pool(Side::Enemy);
    let affordable: Vec<usize> = opponent
        .hand
        .iter()
        .enumerate()
        .filter(|(_, card)| pool.can_afford(card.cost))
        .map(|(index, _)| index)
        .collect();
    if affordable.is_empty() {
        return;
    }
    if rng.0.random::<f32>() > opponent.profile.aggressiveness {
        return;
    }

    let pick = affordable[rng.0.random_range(0..affordable.len())];
    let card = opponent.hand.remove(pick);

    let position = Vec2::new(
        ARENA_WIDTH * rng.0.random_range(DEPLOY_X_BAND.0..DEPLOY_X_BAND.1),
        ARENA_HEIGHT * rng.0.random_range(DEPLOY_Y_BAND.0..DEPLOY_Y_BAND.1),
    );
    debug!("opponent plays '{}' at {position:?}", card.id);
    plays.write(PlayCard {
        card: card.clone(),
        position,
        side: Side::Enemy,
    });

    // Played card cycles to the back of the pool; refill the hand.
    opponent.pool.insert(0, card);
    opponent.draw(&mut rng);
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Difficulty>();
    app.init_resource::<Opponent>();

    app.add_systems(
        Update,
        opponent_think
            .in_set(SimSet::Opponent)
            .before(handle_play_card)
            .run_if(simulation_running.and(tick_is_live)),
    );
}
